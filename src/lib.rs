pub mod config;
pub mod debounce;
pub mod filters;
pub mod render;
pub mod scroll;
pub mod slider;
pub mod source;
pub mod store;
pub mod types;
pub mod view;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::config::VitrineConfig;
    pub use crate::filters::{FilterParams, FilterSnapshot};
    pub use crate::render::CardView;
    pub use crate::source::{ContentSource, FetchError, HttpSource};
    pub use crate::store::InitPhase;
    pub use crate::types::{ContentItem, PricingOption, SortKey};
    pub use crate::{CatalogStats, LoadOutcome, Vitrine};
}

use std::time::{Duration, Instant};

use crate::config::VitrineConfig;
use crate::debounce::Debouncer;
use crate::filters::{FilterParams, FilterSnapshot};
use crate::render::{card_from_item, CardView};
use crate::scroll::SentinelWatcher;
use crate::source::ContentSource;
use crate::store::{InitPhase, PaginationStore};
use crate::types::{ContentItem, PricingOption, SortKey};
use crate::view::DerivedView;

/// Result of one load-more attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The page was fetched and merged; carries the item count.
    Fetched(usize),
    /// A fetch was already in flight; nothing was dispatched.
    AlreadyLoading,
    /// The source is exhausted; nothing was dispatched.
    Exhausted,
    /// The fetch failed; the message is in `error()` and a retry resumes
    /// from the same page.
    Failed,
}

/// Counters for the CLI summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogStats {
    pub fetched: usize,
    pub visible: usize,
    pub page: u32,
    pub has_more: bool,
}

/// Catalog browsing session. Owns the pagination store, the durable filter
/// params, the derived-view memo and the content source; all state is
/// explicit and dependency-injected, driven by the caller's event loop.
pub struct Vitrine {
    source: Box<dyn ContentSource>,
    store: PaginationStore,
    params: FilterParams,
    view: DerivedView,
    watcher: SentinelWatcher,
    debouncer: Debouncer,
    page_size: u32,
}

impl Vitrine {
    pub fn new(source: Box<dyn ContentSource>, config: &VitrineConfig) -> Self {
        Self {
            source,
            store: PaginationStore::new(),
            params: FilterParams::new(),
            view: DerivedView::new(),
            watcher: SentinelWatcher::with_settings(
                config.scroll_threshold,
                Duration::from_millis(config.scroll_cooldown_ms),
            ),
            debouncer: Debouncer::new(Duration::from_millis(config.debounce_ms)),
            page_size: config.page_size,
        }
    }

    /// Restore filter state from a shared query string.
    pub fn with_query(source: Box<dyn ContentSource>, config: &VitrineConfig, query: &str) -> Self {
        let mut session = Self::new(source, config);
        session.params = FilterParams::parse(query);
        session
    }

    /// Fetch page 1 exactly once, keyed on the init phase rather than the
    /// item count, so an empty first page does not re-trigger. Returns
    /// `None` when initialization has already been dispatched.
    pub async fn ensure_initialized(&mut self) -> Option<LoadOutcome> {
        if self.store.phase() != InitPhase::Uninitialized {
            return None;
        }
        Some(self.load_more().await)
    }

    /// Guarded next-page fetch. A call while one is in flight is a no-op,
    /// never a queued retry; filter changes never come through here.
    pub async fn load_more(&mut self) -> LoadOutcome {
        if !self.store.has_more() {
            return LoadOutcome::Exhausted;
        }
        let Some(req) = self.store.begin_fetch() else {
            return LoadOutcome::AlreadyLoading;
        };
        match self.source.fetch_page(req.page, self.page_size).await {
            Ok(items) => {
                let count = items.len();
                tracing::debug!(page = req.page, count, "page merged");
                self.store.fulfill(items);
                LoadOutcome::Fetched(count)
            }
            Err(e) => {
                tracing::error!(page = req.page, error = %e, "page fetch failed");
                self.store.reject(e.to_string());
                LoadOutcome::Failed
            }
        }
    }

    /// Feed a sentinel visibility event through the watcher; fires at most
    /// one load-more per loading cycle.
    pub async fn on_sentinel(&mut self, visible_ratio: f64, now: Instant) -> Option<LoadOutcome> {
        let fire = self.watcher.observe(
            visible_ratio,
            self.store.is_loading(),
            self.store.has_more(),
            now,
        );
        if fire {
            Some(self.load_more().await)
        } else {
            None
        }
    }

    /// Detach the sentinel watcher on teardown; later events are ignored.
    pub fn detach_sentinel(&mut self) {
        self.watcher.detach();
    }

    // --- filter state (changes recompute locally, no fetch) ---

    pub fn set_pricing_options(&mut self, options: &[PricingOption]) {
        self.params.set_pricing_options(options);
    }

    pub fn set_sort_by(&mut self, sort: SortKey) {
        self.params.set_sort_by(sort);
    }

    pub fn set_price_range(&mut self, range: (u32, u32)) {
        self.params.set_price_range(range);
    }

    /// Commit a search keyword immediately, bypassing the debounce.
    pub fn set_search_keyword(&mut self, keyword: &str) {
        self.params.set_search_keyword(keyword);
    }

    /// Record a search-box keystroke; committed by `tick` once the
    /// debounce delay passes without another one.
    pub fn type_search(&mut self, text: &str, now: Instant) {
        self.debouncer.input(text, now);
    }

    /// Drive the debounce timer; call from the event loop.
    pub fn tick(&mut self, now: Instant) {
        if let Some(keyword) = self.debouncer.poll(now) {
            self.params.set_search_keyword(&keyword);
        }
    }

    pub fn reset_filters(&mut self) {
        self.debouncer.cancel();
        self.params.reset_filters();
    }

    pub fn filters(&self) -> &FilterParams {
        &self.params
    }

    pub fn filter_snapshot(&self) -> FilterSnapshot {
        self.params.snapshot()
    }

    /// The durable filter representation, ready to share.
    pub fn share_query(&self) -> String {
        self.params.encode()
    }

    // --- derived view ---

    /// The filtered, sorted view over everything fetched so far.
    /// Memoized: the same slice comes back until items or filters change.
    pub fn visible_items(&mut self) -> &[ContentItem] {
        let snapshot = self.params.snapshot();
        self.view
            .get(self.store.generation(), self.store.items(), &snapshot)
    }

    pub fn visible_cards(&mut self) -> Vec<CardView> {
        self.visible_items().iter().map(card_from_item).collect()
    }

    // --- store state ---

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.store.error()
    }

    pub fn has_more(&self) -> bool {
        self.store.has_more()
    }

    pub fn page(&self) -> u32 {
        self.store.page()
    }

    pub fn fetched_count(&self) -> usize {
        self.store.items().len()
    }

    pub fn stats(&mut self) -> CatalogStats {
        let visible = self.visible_items().len();
        CatalogStats {
            fetched: self.store.items().len(),
            visible,
            page: self.store.page(),
            has_more: self.store.has_more(),
        }
    }

    /// Clear accumulated items and cursor for a reload cycle. Must not be
    /// called while a fetch is in flight.
    pub fn reset(&mut self) {
        self.store.reset();
        self.view.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FetchError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Serves pre-baked pages; optionally fails one specific page. The
    /// fetch counter is shared so no-op guarantees are observable.
    struct ScriptedSource {
        pages: Vec<Vec<ContentItem>>,
        fail_page: Option<u32>,
        calls: Arc<AtomicU32>,
    }

    impl ScriptedSource {
        fn new(pages: Vec<Vec<ContentItem>>) -> Self {
            Self {
                pages,
                fail_page: None,
                calls: Arc::new(AtomicU32::new(0)),
            }
        }

        fn failing_on(pages: Vec<Vec<ContentItem>>, page: u32) -> Self {
            Self {
                fail_page: Some(page),
                ..Self::new(pages)
            }
        }

        fn call_counter(&self) -> Arc<AtomicU32> {
            Arc::clone(&self.calls)
        }
    }

    #[async_trait]
    impl ContentSource for ScriptedSource {
        async fn fetch_page(&self, page: u32, _limit: u32) -> Result<Vec<ContentItem>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_page == Some(page) {
                return Err(FetchError::Status(503));
            }
            Ok(self
                .pages
                .get((page - 1) as usize)
                .cloned()
                .unwrap_or_default())
        }
    }

    fn item(id: &str, title: &str, option: PricingOption, price: f64) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            path: String::new(),
            creator: "c".into(),
            title: title.to_string(),
            pricing_option: option,
            price,
        }
    }

    fn session(source: ScriptedSource) -> Vitrine {
        Vitrine::new(Box::new(source), &VitrineConfig::default())
    }

    #[tokio::test]
    async fn initializes_exactly_once_even_on_an_empty_first_page() {
        let source = ScriptedSource::new(vec![Vec::new()]);
        let calls = source.call_counter();
        let mut v = session(source);

        assert_eq!(v.ensure_initialized().await, Some(LoadOutcome::Fetched(0)));
        assert!(!v.has_more());
        assert_eq!(v.ensure_initialized().await, None);
        assert_eq!(v.fetched_count(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn load_more_paginates_until_exhausted() {
        let source = ScriptedSource::new(vec![
            vec![item("1:a", "A", PricingOption::Free, 0.0)],
            vec![item("2:b", "B", PricingOption::Free, 0.0)],
            Vec::new(),
        ]);
        let mut v = session(source);

        v.ensure_initialized().await;
        assert_eq!(v.load_more().await, LoadOutcome::Fetched(1));
        assert_eq!(v.load_more().await, LoadOutcome::Fetched(0));
        assert!(!v.has_more());
        assert_eq!(v.load_more().await, LoadOutcome::Exhausted);
        assert_eq!(v.fetched_count(), 2);
        assert_eq!(v.page(), 3);
    }

    #[tokio::test]
    async fn failed_fetch_is_retryable_from_the_same_page() {
        let source = ScriptedSource::failing_on(
            vec![
                vec![item("1:a", "A", PricingOption::Free, 0.0)],
                vec![item("2:b", "B", PricingOption::Free, 0.0)],
            ],
            2,
        );
        let mut v = session(source);

        v.ensure_initialized().await;
        assert_eq!(v.load_more().await, LoadOutcome::Failed);
        assert_eq!(v.error(), Some("unexpected status 503"));
        assert_eq!(v.page(), 1);
        assert_eq!(v.fetched_count(), 1);
        assert!(v.has_more());
    }

    #[tokio::test]
    async fn sentinel_event_fires_at_most_once_per_cooldown() {
        let source = ScriptedSource::new(vec![
            vec![item("1:a", "A", PricingOption::Free, 0.0)],
            vec![item("2:b", "B", PricingOption::Free, 0.0)],
        ]);
        let mut v = session(source);
        v.ensure_initialized().await;

        let t0 = Instant::now();
        assert_eq!(
            v.on_sentinel(1.0, t0).await,
            Some(LoadOutcome::Fetched(1))
        );
        // Same instant: still cooling down, no second fetch.
        assert_eq!(v.on_sentinel(1.0, t0).await, None);
        assert_eq!(v.page(), 2);
    }

    #[tokio::test]
    async fn detached_sentinel_never_loads() {
        let source = ScriptedSource::new(vec![vec![item("1:a", "A", PricingOption::Free, 0.0)]]);
        let mut v = session(source);
        v.ensure_initialized().await;

        v.detach_sentinel();
        assert_eq!(v.on_sentinel(1.0, Instant::now()).await, None);
        assert_eq!(v.page(), 1);
    }

    #[tokio::test]
    async fn exhausted_source_stops_the_sentinel() {
        let source = ScriptedSource::new(vec![vec![], vec![item("x", "X", PricingOption::Free, 0.0)]]);
        let calls = source.call_counter();
        let mut v = session(source);
        v.ensure_initialized().await;
        assert!(!v.has_more());

        let later = Instant::now() + Duration::from_secs(10);
        assert_eq!(v.on_sentinel(1.0, later).await, None);
        assert_eq!(v.page(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn filter_changes_recompute_without_fetching() {
        let source = ScriptedSource::new(vec![vec![
            item("1:a", "Zeta", PricingOption::Free, 0.0),
            item("1:b", "Alpha", PricingOption::Paid, 30.0),
        ]]);
        let mut v = session(source);
        v.ensure_initialized().await;

        let titles: Vec<String> = v.visible_items().iter().map(|i| i.title.clone()).collect();
        assert_eq!(titles, vec!["Alpha", "Zeta"]);

        v.set_sort_by(SortKey::PriceHigh);
        let view = v.visible_items();
        assert_eq!(view[0].title, "Alpha");
        assert_eq!(view[0].price, 30.0);
        assert_eq!(view[1].price, 0.0);

        v.set_pricing_options(&[PricingOption::Paid]);
        assert_eq!(v.visible_items().len(), 1);
        // Only the initial fetch happened; filtering is local.
        assert_eq!(v.page(), 1);
    }

    #[tokio::test]
    async fn typed_search_commits_after_the_debounce_delay() {
        let source = ScriptedSource::new(vec![vec![
            item("1:a", "Velvet Dress", PricingOption::Free, 0.0),
            item("1:b", "Plain Tee", PricingOption::Free, 0.0),
        ]]);
        let mut v = session(source);
        v.ensure_initialized().await;

        let t0 = Instant::now();
        v.type_search("vel", t0);
        v.tick(t0 + Duration::from_millis(100));
        assert_eq!(v.visible_items().len(), 2);

        v.tick(t0 + Duration::from_millis(300));
        assert_eq!(v.visible_items().len(), 1);
        assert_eq!(v.share_query(), "search=vel");
    }

    #[tokio::test]
    async fn share_query_round_trips_into_a_new_session() {
        let pages = || {
            vec![vec![
                item("1:a", "Cheap", PricingOption::Paid, 5.0),
                item("1:b", "Dear", PricingOption::Paid, 500.0),
                item("1:c", "Gratis", PricingOption::Free, 0.0),
            ]]
        };
        let mut v = session(ScriptedSource::new(pages()));
        v.ensure_initialized().await;
        v.set_pricing_options(&[PricingOption::Paid]);
        v.set_price_range((0, 100));
        let query = v.share_query();

        let mut restored = Vitrine::with_query(
            Box::new(ScriptedSource::new(pages())),
            &VitrineConfig::default(),
            &query,
        );
        restored.ensure_initialized().await;
        let titles: Vec<String> = restored
            .visible_items()
            .iter()
            .map(|i| i.title.clone())
            .collect();
        assert_eq!(titles, vec!["Cheap"]);
    }

    #[tokio::test]
    async fn reset_filters_restores_defaults() {
        let source = ScriptedSource::new(vec![Vec::new()]);
        let mut v = session(source);
        v.set_pricing_options(&[PricingOption::ViewOnly]);
        v.set_search_keyword("x");
        v.set_sort_by(SortKey::PriceLow);
        v.set_price_range((3, 4));

        v.reset_filters();
        assert_eq!(v.filter_snapshot(), FilterSnapshot::default());
        assert_eq!(v.share_query(), "");
    }

    #[tokio::test]
    async fn stats_track_fetched_versus_visible() {
        let source = ScriptedSource::new(vec![vec![
            item("1:a", "A", PricingOption::Paid, 10.0),
            item("1:b", "B", PricingOption::Free, 0.0),
        ]]);
        let mut v = session(source);
        v.ensure_initialized().await;
        v.set_pricing_options(&[PricingOption::Free]);

        let stats = v.stats();
        assert_eq!(stats.fetched, 2);
        assert_eq!(stats.visible, 1);
        assert_eq!(stats.page, 1);
        assert!(stats.has_more);
    }
}
