use serde::{Deserialize, Serialize};

/// Pricing tier of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PricingOption {
    Paid,
    Free,
    ViewOnly,
}

impl PricingOption {
    /// Stable numeric code used by the remote API and the share query.
    pub fn code(self) -> u8 {
        match self {
            PricingOption::Paid => 0,
            PricingOption::Free => 1,
            PricingOption::ViewOnly => 2,
        }
    }

    /// Decode a wire code. Anything outside the known set yields `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(PricingOption::Paid),
            1 => Some(PricingOption::Free),
            2 => Some(PricingOption::ViewOnly),
            _ => None,
        }
    }

    /// Flag name as used by the CLI.
    pub fn name(self) -> &'static str {
        match self {
            PricingOption::Paid => "paid",
            PricingOption::Free => "free",
            PricingOption::ViewOnly => "view-only",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "paid" => Some(PricingOption::Paid),
            "free" => Some(PricingOption::Free),
            "view-only" | "view_only" | "viewonly" => Some(PricingOption::ViewOnly),
            _ => None,
        }
    }
}

/// Sort order applied to the derived view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    Title,
    PriceHigh,
    PriceLow,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::PriceHigh => "price-high",
            SortKey::PriceLow => "price-low",
        }
    }

    /// Unrecognized keys fall back to title order.
    pub fn parse(s: &str) -> Self {
        match s {
            "price-high" => SortKey::PriceHigh,
            "price-low" => SortKey::PriceLow,
            _ => SortKey::Title,
        }
    }
}

/// One product entry as accumulated by the pagination store. Immutable once
/// fetched; `price` is only meaningful when `pricing_option` is `Paid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub path: String,
    pub creator: String,
    pub title: String,
    pub pricing_option: PricingOption,
    pub price: f64,
}
