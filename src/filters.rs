//! Filter state, kept durable as query-string pairs.
//!
//! The pair list is the single source of truth: every read decodes from it
//! on demand, so nothing can drift out of sync with the shareable query.

use url::form_urlencoded;

use crate::types::{PricingOption, SortKey};

pub const DEFAULT_PRICE_RANGE: (u32, u32) = (0, 999);

const KEY_PRICING: &str = "pricing";
const KEY_SEARCH: &str = "search";
const KEY_SORT: &str = "sort";
const KEY_PRICE_RANGE: &str = "priceRange";

/// Decoded filter state, as consumed by the derivation engine.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSnapshot {
    /// Active pricing tiers; empty means every tier passes.
    pub pricing_options: Vec<PricingOption>,
    pub search_keyword: String,
    pub sort_by: SortKey,
    /// Inclusive price bounds, applied only while `Paid` is selected.
    pub price_range: (u32, u32),
}

impl Default for FilterSnapshot {
    fn default() -> Self {
        Self {
            pricing_options: Vec::new(),
            search_keyword: String::new(),
            sort_by: SortKey::Title,
            price_range: DEFAULT_PRICE_RANGE,
        }
    }
}

impl FilterSnapshot {
    pub fn includes_paid(&self) -> bool {
        self.pricing_options.contains(&PricingOption::Paid)
    }
}

/// Durable, shareable filter representation. Keys not owned by the filter
/// set (anything besides `pricing`/`search`/`sort`/`priceRange`) survive
/// parsing and setters untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    pairs: Vec<(String, String)>,
}

impl FilterParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string (with or without a leading `?`).
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    /// Encode back to a query string.
    pub fn encode(&self) -> String {
        let mut ser = form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.pairs {
            ser.append_pair(k, v);
        }
        ser.finish()
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace the first occurrence in place and drop any duplicates, so
    /// a parsed query with repeated keys collapses to one value.
    fn set(&mut self, key: &str, value: String) {
        let mut replaced = false;
        self.pairs.retain_mut(|(k, v)| {
            if k != key {
                return true;
            }
            if replaced {
                return false;
            }
            *v = value.clone();
            replaced = true;
            true
        });
        if !replaced {
            self.pairs.push((key.to_string(), value));
        }
    }

    fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    // --- derived reads ---

    /// Active tiers from the `pricing` key. Unparseable or unknown codes
    /// are skipped; duplicates collapse, order preserved.
    pub fn pricing_options(&self) -> Vec<PricingOption> {
        let Some(raw) = self.get(KEY_PRICING) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for part in raw.split(',') {
            if let Some(opt) = part
                .trim()
                .parse::<u8>()
                .ok()
                .and_then(PricingOption::from_code)
            {
                if !out.contains(&opt) {
                    out.push(opt);
                }
            }
        }
        out
    }

    pub fn search_keyword(&self) -> String {
        self.get(KEY_SEARCH).unwrap_or_default().to_string()
    }

    pub fn sort_by(&self) -> SortKey {
        self.get(KEY_SORT).map(SortKey::parse).unwrap_or_default()
    }

    /// `priceRange` as an inclusive pair; absent or malformed falls back
    /// to the default.
    pub fn price_range(&self) -> (u32, u32) {
        let Some(raw) = self.get(KEY_PRICE_RANGE) else {
            return DEFAULT_PRICE_RANGE;
        };
        let mut parts = raw.splitn(2, ',');
        match (
            parts.next().and_then(|s| s.trim().parse::<u32>().ok()),
            parts.next().and_then(|s| s.trim().parse::<u32>().ok()),
        ) {
            (Some(min), Some(max)) => (min, max),
            _ => DEFAULT_PRICE_RANGE,
        }
    }

    // --- setters (each rewrites the durable pairs immediately) ---

    pub fn set_pricing_options(&mut self, options: &[PricingOption]) {
        if options.is_empty() {
            self.remove(KEY_PRICING);
        } else {
            let codes: Vec<String> = options.iter().map(|o| o.code().to_string()).collect();
            self.set(KEY_PRICING, codes.join(","));
        }
    }

    pub fn set_search_keyword(&mut self, keyword: &str) {
        if keyword.is_empty() {
            self.remove(KEY_SEARCH);
        } else {
            self.set(KEY_SEARCH, keyword.to_string());
        }
    }

    pub fn set_sort_by(&mut self, sort: SortKey) {
        if sort == SortKey::Title {
            self.remove(KEY_SORT);
        } else {
            self.set(KEY_SORT, sort.as_str().to_string());
        }
    }

    /// Stores the pair exactly as given, equal bounds included; clamping
    /// out-of-order input is the slider's job, not the store's.
    pub fn set_price_range(&mut self, range: (u32, u32)) {
        self.set(KEY_PRICE_RANGE, format!("{},{}", range.0, range.1));
    }

    /// Remove all four filter keys, restoring the default tuple.
    pub fn reset_filters(&mut self) {
        self.remove(KEY_PRICING);
        self.remove(KEY_SEARCH);
        self.remove(KEY_SORT);
        self.remove(KEY_PRICE_RANGE);
    }

    /// Decode all four projections at once.
    pub fn snapshot(&self) -> FilterSnapshot {
        FilterSnapshot {
            pricing_options: self.pricing_options(),
            search_keyword: self.search_keyword(),
            sort_by: self.sort_by(),
            price_range: self.price_range(),
        }
    }
}
