//! Rendered-page cache and its invalidation signal
//!
//! Pages are keyed by route path plus a normalized variant (for the invoice
//! list, the search term and page). Capacity is bounded; the least useful
//! entries are evicted by moka.
//!
//! Filling the cache is a two-step affair: a reader takes a [`Generation`]
//! before running its query and hands it back on insert. Any revalidation in
//! between bumps the generation and the late insert is dropped, so a page
//! read before a write can never be cached after the write's revalidation.

use moka::sync::Cache;
use std::sync::RwLock;

pub const DEFAULT_CAPACITY: u64 = 1_000;

/// Signal that cached renders of a route are stale
pub trait PathRevalidator: Send + Sync {
    fn revalidate_path(&self, path: &str);
}

/// Revalidation counter observed before a cache fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

type PageKey = (String, String);

pub struct PageCache {
    pages: Cache<PageKey, serde_json::Value>,
    // Held for reading while inserting, for writing while revalidating
    generation: RwLock<u64>,
}

impl Default for PageCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            pages: Cache::new(capacity),
            generation: RwLock::new(0),
        }
    }

    pub fn get(&self, path: &str, variant: &str) -> Option<serde_json::Value> {
        self.pages.get(&(path.to_string(), variant.to_string()))
    }

    pub fn generation(&self) -> Generation {
        Generation(self.generation.read().map(|g| *g).unwrap_or(u64::MAX))
    }

    /// Store a page read under `seen`; returns false when a revalidation
    /// happened since and the page was discarded
    pub fn insert_if_fresh(
        &self,
        path: &str,
        variant: &str,
        seen: Generation,
        page: serde_json::Value,
    ) -> bool {
        let Ok(current) = self.generation.read() else {
            return false;
        };
        if Generation(*current) != seen {
            tracing::debug!(path, variant, "page read before revalidation, not cached");
            return false;
        }
        self.pages
            .insert((path.to_string(), variant.to_string()), page);
        true
    }

    pub fn len(&self) -> u64 {
        self.pages.run_pending_tasks();
        self.pages.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PathRevalidator for PageCache {
    fn revalidate_path(&self, path: &str) {
        let Ok(mut generation) = self.generation.write() else {
            tracing::warn!(path, "page cache lock poisoned, skipping revalidation");
            return;
        };
        *generation += 1;

        let stale: Vec<PageKey> = self
            .pages
            .iter()
            .filter(|(key, _)| key.0 == path)
            .map(|(key, _)| (*key).clone())
            .collect();
        for key in &stale {
            self.pages.invalidate(key);
        }
        tracing::debug!(path, dropped = stale.len(), "revalidated path");
    }
}
