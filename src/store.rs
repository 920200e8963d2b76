//! The link store: sole owner of the persisted link set
//!
//! All reads and writes go through one mutex. A mutation is applied to the
//! in-memory set, flushed through the backend, and rolled back if the flush
//! fails, so memory and disk never disagree after a call returns.

use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info};

use crate::database::Persistence;
use crate::error::{LinkError, Result};
use crate::generator::allocate_unique_code;
use crate::model::Link;
use crate::validator::{is_reserved, is_valid_code, is_valid_url};

pub struct LinkStore {
    backend: Box<dyn Persistence>,
    links: Mutex<Vec<Link>>,
}

fn position(links: &[Link], code: &str) -> Option<usize> {
    links
        .iter()
        .position(|link| link.code.eq_ignore_ascii_case(code))
}

impl LinkStore {
    /// Loads the persisted link set from `backend`
    pub fn open(backend: Box<dyn Persistence>) -> Result<Self> {
        let links = backend.load()?;
        info!(backend = backend.name(), count = links.len(), "link set loaded");

        Ok(Self {
            backend,
            links: Mutex::new(links),
        })
    }

    // Every mutation rolls itself back before releasing the lock, so a
    // poisoned guard still holds a consistent set.
    fn lock(&self) -> MutexGuard<'_, Vec<Link>> {
        self.links.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, links: &[Link]) -> Result<()> {
        self.backend.save(links).inspect_err(|err| {
            error!(backend = self.backend.name(), %err, "failed to persist link set");
        })
    }

    /// Creates a link for `target`, using `custom_code` when given
    ///
    /// Without a custom code a fresh random code is allocated. Nothing is
    /// inserted unless every check and the durable write succeed.
    pub fn create(&self, target: &str, custom_code: Option<&str>) -> Result<Link> {
        if target.is_empty() {
            return Err(LinkError::missing_target());
        }
        if !is_valid_url(target) {
            return Err(LinkError::invalid_target());
        }
        if let Some(code) = custom_code {
            if !is_valid_code(code) {
                return Err(LinkError::invalid_code());
            }
            if is_reserved(code) {
                return Err(LinkError::reserved_code(code));
            }
        }

        let mut links = self.lock();

        let code = match custom_code {
            Some(code) => {
                if position(&links, code).is_some() {
                    return Err(LinkError::conflict());
                }
                code.to_string()
            }
            None => allocate_unique_code(|candidate| {
                is_reserved(candidate) || position(&links, candidate).is_some()
            })?,
        };

        // created_at never runs backwards relative to insertion order
        let now = Utc::now();
        let created_at = links
            .last()
            .map_or(now, |newest| newest.created_at.max(now));

        let link = Link {
            code,
            target: target.to_string(),
            created_at,
            clicks: 0,
            last_clicked: None,
        };

        links.push(link.clone());
        if let Err(err) = self.persist(&links) {
            links.pop();
            return Err(err);
        }

        info!(code = %link.code, target = %link.target, "link created");
        Ok(link)
    }

    /// Case-insensitive lookup
    pub fn get(&self, code: &str) -> Result<Link> {
        let links = self.lock();
        position(&links, code)
            .map(|idx| links[idx].clone())
            .ok_or_else(LinkError::not_found)
    }

    /// Point-in-time copy of every link, in insertion order
    pub fn list(&self) -> Vec<Link> {
        self.lock().clone()
    }

    /// Counts one click on `code` and returns the updated link
    pub fn record_click(&self, code: &str) -> Result<Link> {
        self.record_click_at(code, Utc::now())
    }

    fn record_click_at(&self, code: &str, at: DateTime<Utc>) -> Result<Link> {
        let mut links = self.lock();
        let idx = position(&links, code).ok_or_else(LinkError::not_found)?;

        let previous = (links[idx].clicks, links[idx].last_clicked);
        // last_clicked only moves forward even if the wall clock steps back
        let at = previous.1.map_or(at, |last| last.max(at));
        links[idx].clicks += 1;
        links[idx].last_clicked = Some(at);

        if let Err(err) = self.persist(&links) {
            (links[idx].clicks, links[idx].last_clicked) = previous;
            return Err(err);
        }

        debug!(code = %links[idx].code, clicks = links[idx].clicks, "click recorded");
        Ok(links[idx].clone())
    }

    /// Removes the link; a second delete of the same code is `NotFound`
    pub fn delete(&self, code: &str) -> Result<()> {
        let mut links = self.lock();
        let idx = position(&links, code).ok_or_else(LinkError::not_found)?;

        let removed = links.remove(idx);
        if let Err(err) = self.persist(&links) {
            links.insert(idx, removed);
            return Err(err);
        }

        info!(code = %removed.code, "link deleted");
        Ok(())
    }
}
