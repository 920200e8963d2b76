//! Façade the HTTP layer talks to
//!
//! Composes validation, the store and the query engine behind the
//! operations a route needs.

use crate::error::{LinkError, Result};
use crate::model::Link;
use crate::query::{self, SortKey};
use crate::store::LinkStore;
use crate::validator::is_reserved;

pub struct LinkService {
    store: LinkStore,
}

impl LinkService {
    pub fn new(store: LinkStore) -> Self {
        Self { store }
    }

    /// Creates a link; an empty custom code counts as no custom code
    pub fn create(&self, target: &str, custom_code: Option<&str>) -> Result<Link> {
        let custom_code = custom_code.filter(|code| !code.is_empty());
        self.store.create(target, custom_code)
    }

    /// Filtered, ordered snapshot of all links
    pub fn list(&self, q: &str, sort: SortKey) -> Vec<Link> {
        query::sort(query::filter(self.store.list(), q), sort)
    }

    pub fn get(&self, code: &str) -> Result<Link> {
        self.store.get(code)
    }

    pub fn delete(&self, code: &str) -> Result<()> {
        self.store.delete(code)
    }

    /// Counts a visit and returns the URL to redirect to
    ///
    /// The click is durably recorded before the target is handed back, so a
    /// client that retries after a lost response is counted twice.
    pub fn resolve_and_track(&self, code: &str) -> Result<String> {
        if is_reserved(code) {
            return Err(LinkError::not_found());
        }
        self.store.record_click(code).map(|link| link.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::JsonFile;
    use tempfile::{tempdir, TempDir};

    fn service() -> (LinkService, TempDir) {
        let dir = tempdir().unwrap();
        let backend = JsonFile::open(dir.path().join("links.json")).unwrap();
        let store = LinkStore::open(Box::new(backend)).unwrap();
        (LinkService::new(store), dir)
    }

    #[test]
    fn empty_custom_code_falls_back_to_random() {
        let (service, _dir) = service();

        let link = service.create("https://example.com", Some("")).unwrap();

        assert!(crate::validator::is_valid_code(&link.code));
    }

    #[test]
    fn resolve_counts_the_click() {
        let (service, _dir) = service();
        service.create("https://example.com", Some("abc123")).unwrap();

        assert_eq!(service.resolve_and_track("ABC123").unwrap(), "https://example.com");
        assert_eq!(service.get("abc123").unwrap().clicks, 1);
    }

    #[test]
    fn reserved_codes_never_reach_the_store() {
        let (service, _dir) = service();

        for code in ["", "api", "healthz", "CODE"] {
            assert_eq!(
                service.resolve_and_track(code).unwrap_err(),
                LinkError::not_found()
            );
        }
    }

    #[test]
    fn list_filters_then_sorts() {
        let (service, _dir) = service();
        service.create("https://example.com/a", Some("alpha1")).unwrap();
        service.create("https://rust-lang.org", Some("beta22")).unwrap();
        service.create("https://example.com/c", Some("gamma3")).unwrap();
        service.resolve_and_track("gamma3").unwrap();

        let links = service.list("example", SortKey::ClicksDesc);
        let codes: Vec<_> = links.iter().map(|l| l.code.as_str()).collect();

        assert_eq!(codes, ["gamma3", "alpha1"]);
        assert_eq!(service.list("", SortKey::CreatedAsc).len(), 3);
    }
}
