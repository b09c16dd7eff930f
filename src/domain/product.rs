//! Product Catalog Entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Document;

/// Alternate look of a product (colourway, character, bundle) with its
/// own image. Variations share the parent's price and stock pool.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    pub id: Uuid,
    pub image: String,
    pub label: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub price: i64,
    /// Discounted price; `0` means no sale running.
    #[serde(default)]
    pub sale_price: i64,
    pub total_stock: u32,
    #[serde(default)]
    pub average_review: f64,
    #[serde(default)]
    pub variations: Vec<Variation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Price a buyer actually pays right now.
    pub fn effective_price(&self) -> i64 {
        if self.sale_price > 0 {
            self.sale_price
        } else {
            self.price
        }
    }

    /// Primary image with gallery and variation fallbacks.
    pub fn display_image(&self) -> Option<&str> {
        self.image
            .as_deref()
            .filter(|img| !img.is_empty())
            .or_else(|| self.images.first().map(String::as_str))
            .or_else(|| self.variations.first().map(|v| v.image.as_str()))
    }

    pub fn has_image(&self) -> bool {
        self.display_image().is_some()
    }

    /// Take `quantity` off the shelf. Short stock leaves the count
    /// untouched and reports `false`; the caller decides whether that
    /// skips the line or fails the request.
    pub fn pick(&mut self, quantity: u32) -> bool {
        if self.total_stock >= quantity {
            self.total_stock -= quantity;
            self.updated_at = Utc::now();
            true
        } else {
            false
        }
    }
}

impl Document for Product {
    const COLLECTION: &'static str = "products";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: u32) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4(),
            image: None,
            images: vec![],
            title: "Wooden Train".into(),
            description: String::new(),
            category: "toddlers".into(),
            price: 2500,
            sale_price: 0,
            total_stock: stock,
            average_review: 0.0,
            variations: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_pick_decrements_when_covered() {
        let mut p = product(5);
        assert!(p.pick(3));
        assert_eq!(p.total_stock, 2);
    }

    #[test]
    fn test_pick_short_stock_is_a_noop() {
        let mut p = product(2);
        assert!(!p.pick(5));
        assert_eq!(p.total_stock, 2);
    }

    #[test]
    fn test_sale_price_wins_when_set() {
        let mut p = product(1);
        assert_eq!(p.effective_price(), 2500);
        p.sale_price = 1999;
        assert_eq!(p.effective_price(), 1999);
    }

    #[test]
    fn test_display_image_falls_back() {
        let mut p = product(1);
        assert!(p.display_image().is_none());
        p.variations.push(Variation {
            id: Uuid::new_v4(),
            image: "lion.webp".into(),
            label: "Lion".into(),
        });
        assert_eq!(p.display_image(), Some("lion.webp"));
        p.images.push("train.webp".into());
        assert_eq!(p.display_image(), Some("train.webp"));
        p.image = Some("hero.webp".into());
        assert_eq!(p.display_image(), Some("hero.webp"));
    }
}
