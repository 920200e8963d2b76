//! Filtering and ordering of link snapshots for listing

use std::str::FromStr;

use crate::model::Link;

/// Listing order; ties keep the snapshot's insertion order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    CreatedDesc,
    CreatedAsc,
    ClicksDesc,
    ClicksAsc,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_desc" => Ok(SortKey::CreatedDesc),
            "created_asc" => Ok(SortKey::CreatedAsc),
            "clicks_desc" => Ok(SortKey::ClicksDesc),
            "clicks_asc" => Ok(SortKey::ClicksAsc),
            other => Err(format!("unknown sort key '{}'", other)),
        }
    }
}

/// Keeps links whose code or target contains `query`, ignoring case
///
/// A blank query keeps everything.
pub fn filter(snapshot: Vec<Link>, query: &str) -> Vec<Link> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return snapshot;
    }

    snapshot
        .into_iter()
        .filter(|link| {
            link.code.to_lowercase().contains(&needle)
                || link.target.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Orders links by `key` using a stable sort
pub fn sort(mut links: Vec<Link>, key: SortKey) -> Vec<Link> {
    match key {
        SortKey::CreatedDesc => links.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::CreatedAsc => links.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortKey::ClicksDesc => links.sort_by(|a, b| b.clicks.cmp(&a.clicks)),
        SortKey::ClicksAsc => links.sort_by(|a, b| a.clicks.cmp(&b.clicks)),
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn link(code: &str, target: &str, created: i64, clicks: u64) -> Link {
        Link {
            code: code.to_string(),
            target: target.to_string(),
            created_at: at(created),
            clicks,
            last_clicked: None,
        }
    }

    fn codes(links: &[Link]) -> Vec<&str> {
        links.iter().map(|l| l.code.as_str()).collect()
    }

    fn snapshot() -> Vec<Link> {
        vec![
            link("aaa111", "https://example.com/docs", 0, 5),
            link("BBB222", "https://rust-lang.org", 1, 0),
            link("ccc333", "https://Example.org/blog", 1, 5),
            link("ddd444", "http://news.test", 2, 9),
        ]
    }

    #[test]
    fn blank_query_keeps_everything() {
        assert_eq!(filter(snapshot(), ""), snapshot());
        assert_eq!(filter(snapshot(), "   "), snapshot());
    }

    #[test]
    fn query_matches_code_or_target_ignoring_case() {
        assert_eq!(codes(&filter(snapshot(), "EXAMPLE")), ["aaa111", "ccc333"]);
        assert_eq!(codes(&filter(snapshot(), "bbb")), ["BBB222"]);
        assert!(filter(snapshot(), "nothing-here").is_empty());
    }

    #[test]
    fn created_orders_keep_ties_stable() {
        assert_eq!(
            codes(&sort(snapshot(), SortKey::CreatedDesc)),
            ["ddd444", "BBB222", "ccc333", "aaa111"]
        );
        assert_eq!(
            codes(&sort(snapshot(), SortKey::CreatedAsc)),
            ["aaa111", "BBB222", "ccc333", "ddd444"]
        );
    }

    #[test]
    fn click_orders_keep_ties_stable() {
        assert_eq!(
            codes(&sort(snapshot(), SortKey::ClicksDesc)),
            ["ddd444", "aaa111", "ccc333", "BBB222"]
        );
        assert_eq!(
            codes(&sort(snapshot(), SortKey::ClicksAsc)),
            ["BBB222", "aaa111", "ccc333", "ddd444"]
        );
    }

    #[test]
    fn parses_sort_keys() {
        assert_eq!("clicks_asc".parse::<SortKey>(), Ok(SortKey::ClicksAsc));
        assert_eq!("created_desc".parse::<SortKey>(), Ok(SortKey::CreatedDesc));
        assert!("newest".parse::<SortKey>().is_err());
        assert_eq!(SortKey::default(), SortKey::CreatedDesc);
    }
}
