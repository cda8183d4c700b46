//! Derivation engine: the pure filter/sort join over accumulated items.

use std::cmp::Ordering;

use crate::filters::FilterSnapshot;
use crate::types::{ContentItem, SortKey};

/// Filter and sort the accumulated items. Pure: neither input is mutated,
/// the result is a fresh copy.
pub fn derive_view(items: &[ContentItem], filters: &FilterSnapshot) -> Vec<ContentItem> {
    let keyword = filters.search_keyword.to_lowercase();
    let price_gated = filters.includes_paid();
    let (min, max) = filters.price_range;

    let mut out: Vec<ContentItem> = items
        .iter()
        .filter(|item| {
            filters.pricing_options.is_empty()
                || filters.pricing_options.contains(&item.pricing_option)
        })
        .filter(|item| {
            keyword.is_empty()
                || item.creator.to_lowercase().contains(&keyword)
                || item.title.to_lowercase().contains(&keyword)
        })
        .filter(|item| !price_gated || (item.price >= min as f64 && item.price <= max as f64))
        .cloned()
        .collect();

    // The sorts below are stable, so ties keep fetch arrival order.
    match filters.sort_by {
        SortKey::PriceHigh => out.sort_by(|a, b| cmp_price(b, a)),
        SortKey::PriceLow => out.sort_by(|a, b| cmp_price(a, b)),
        // Case-insensitive, approximating locale collation: "apple"
        // sorts before "Banana".
        SortKey::Title => out.sort_by_cached_key(|i| i.title.to_lowercase()),
    }
    out
}

fn cmp_price(a: &ContentItem, b: &ContentItem) -> Ordering {
    a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal)
}

/// Memoized view over `derive_view`. Items are append-only within a store
/// generation, so `(generation, len)` fingerprints them; the snapshot is
/// compared by value. While nothing changes the cached slice is returned
/// untouched, so downstream rendering can compare by identity.
#[derive(Debug, Default)]
pub struct DerivedView {
    key: Option<ViewKey>,
    view: Vec<ContentItem>,
}

#[derive(Debug, PartialEq)]
struct ViewKey {
    generation: u64,
    len: usize,
    filters: FilterSnapshot,
}

impl DerivedView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &mut self,
        generation: u64,
        items: &[ContentItem],
        filters: &FilterSnapshot,
    ) -> &[ContentItem] {
        let key = ViewKey {
            generation,
            len: items.len(),
            filters: filters.clone(),
        };
        if self.key.as_ref() != Some(&key) {
            self.view = derive_view(items, filters);
            self.key = Some(key);
        }
        &self.view
    }

    /// Drop the cached result; the next `get` recomputes.
    pub fn invalidate(&mut self) {
        self.key = None;
        self.view.clear();
    }
}
