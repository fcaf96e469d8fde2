//! Externally computed combo suggestions.

use serde::{Deserialize, Serialize};

use super::{Price, Product, Sku};

/// A candidate combo offered for one-click adoption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    /// Why the items sell well together.
    pub rationale: String,
    pub items: Vec<SuggestionItem>,
}

/// A product proposed by a suggestion, with its sales signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionItem {
    pub sku: Sku,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub original_price: Option<Price>,
    pub category: String,
    #[serde(default)]
    pub sales_30d: u32,
    #[serde(default)]
    pub rating_avg: Option<f64>,
    /// Already sold as part of another combo.
    #[serde(default)]
    pub in_existing_combo: bool,
}

impl SuggestionItem {
    /// The catalog view of the item. Suggestions carry no stock level.
    #[must_use]
    pub fn to_product(&self) -> Product {
        Product {
            sku: self.sku.clone(),
            name: self.name.clone(),
            price: self.price,
            original_price: self.original_price,
            category: self.category.clone(),
            stock: 0,
            rating_avg: self.rating_avg,
        }
    }
}
