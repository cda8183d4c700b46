//! Pagination store: the accumulated item list and its fetch lifecycle.
//!
//! Fetching is split into `begin_fetch` / `fulfill` / `reject` so the
//! loading guard is an observable state transition: a driver asks for the
//! next page request, performs the fetch, and reports the outcome. At most
//! one request is in flight at a time; `begin_fetch` while one is pending
//! is a no-op.

use crate::types::ContentItem;

/// One-shot initial-fetch state machine. Leaves `Uninitialized` the
/// instant the first fetch is dispatched, before any response arrives, so
/// a legitimate empty first page cannot re-trigger initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitPhase {
    Uninitialized,
    Loading,
    Ready,
}

/// Next-page request produced by `begin_fetch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
}

#[derive(Debug)]
pub struct PaginationStore {
    items: Vec<ContentItem>,
    loading: bool,
    error: Option<String>,
    has_more: bool,
    page: u32,
    phase: InitPhase,
    generation: u64,
}

impl PaginationStore {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            has_more: true,
            page: 0,
            phase: InitPhase::Uninitialized,
            generation: 0,
        }
    }

    /// Accumulated items, in fetch arrival order. Append-only between
    /// resets.
    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Last successfully fetched page; 0 before the first fetch.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn phase(&self) -> InitPhase {
        self.phase
    }

    /// Bumped on every reset. Together with `items().len()` this
    /// fingerprints the append-only sequence for memoization.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Dispatch a fetch for the next page. Returns `None` while a fetch is
    /// already in flight (no queueing, no retry).
    pub fn begin_fetch(&mut self) -> Option<PageRequest> {
        if self.loading {
            return None;
        }
        self.loading = true;
        self.error = None;
        if self.phase == InitPhase::Uninitialized {
            self.phase = InitPhase::Loading;
        }
        Some(PageRequest {
            page: self.page + 1,
        })
    }

    /// Apply a successful fetch: append in order, advance the cursor.
    /// `has_more` drops to false on an empty page and stays false.
    pub fn fulfill(&mut self, items: Vec<ContentItem>) {
        self.has_more = self.has_more && !items.is_empty();
        self.items.extend(items);
        self.page += 1;
        self.loading = false;
        self.error = None;
        self.phase = InitPhase::Ready;
    }

    /// Apply a failed fetch: record the message, leave items, cursor and
    /// `has_more` untouched so a retry resumes from the same page.
    pub fn reject(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
        self.phase = InitPhase::Ready;
    }

    /// Clear items and cursor. Deliberately leaves `has_more` and
    /// `loading` alone; must not be called while a fetch is in flight.
    pub fn reset(&mut self) {
        self.items.clear();
        self.page = 0;
        self.phase = InitPhase::Uninitialized;
        self.generation += 1;
    }
}

impl Default for PaginationStore {
    fn default() -> Self {
        Self::new()
    }
}
