use serde::Serialize;

use crate::source::PLACEHOLDER_IMAGE;
use crate::types::{ContentItem, PricingOption};

/// Display-ready projection of one catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub title: String,
    pub byline: String,
    pub price_badge: String,
    pub image: String,
}

impl CardView {
    /// Single-line rendering for the CLI listing.
    pub fn line(&self) -> String {
        format!("{} — {} [{}]", self.title, self.byline, self.price_badge)
    }
}

/// Badge text for a pricing option; `None` stands for a value outside the
/// known set and renders as empty text rather than failing.
pub fn price_badge_for(option: Option<PricingOption>, price: f64) -> String {
    match option {
        Some(PricingOption::Paid) => format!("${:.2}", price),
        Some(PricingOption::Free) => "Free".to_string(),
        Some(PricingOption::ViewOnly) => "View Only".to_string(),
        None => String::new(),
    }
}

pub fn price_badge(item: &ContentItem) -> String {
    price_badge_for(Some(item.pricing_option), item.price)
}

pub fn card_from_item(item: &ContentItem) -> CardView {
    let image = if item.path.trim().is_empty() {
        PLACEHOLDER_IMAGE.to_string()
    } else {
        item.path.clone()
    };
    CardView {
        title: item.title.clone(),
        byline: format!("By {}", item.creator),
        price_badge: price_badge(item),
        image,
    }
}
