//! Catalog products and the line items that reference them.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::{Price, Sku};

/// A catalog product.
///
/// Reference data owned by the external catalog. The combo console never
/// edits products; a line item keeps the copy that was current when it was
/// selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub sku: Sku,
    pub name: String,
    /// Selling price.
    pub price: Price,
    /// List price before discount, when the catalog provides one.
    #[serde(default)]
    pub original_price: Option<Price>,
    pub category: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub rating_avg: Option<f64>,
}

impl Product {
    /// Create a product with no stock or rating information.
    #[must_use]
    pub fn new(sku: Sku, name: impl Into<String>, price: Price, category: impl Into<String>) -> Self {
        Self {
            sku,
            name: name.into(),
            price,
            original_price: None,
            category: category.into(),
            stock: 0,
            rating_avg: None,
        }
    }

    /// Set the stock level.
    #[must_use]
    pub const fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    /// Set the list price before discount.
    #[must_use]
    pub const fn with_original_price(mut self, original_price: Price) -> Self {
        self.original_price = Some(original_price);
        self
    }

    /// List price, falling back to the selling price.
    #[must_use]
    pub fn list_price(&self) -> Price {
        self.original_price.unwrap_or(self.price)
    }
}

/// One product-plus-quantity entry of a combo.
///
/// The quantity is never zero; decrementing a line to zero removes it
/// (see [`crate::reconcile::change_quantity`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: NonZeroU32,
}

impl LineItem {
    /// A line for a single unit of `product`.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self {
            product,
            quantity: NonZeroU32::MIN,
        }
    }

    /// A line with an explicit quantity.
    #[must_use]
    pub const fn with_quantity(product: Product, quantity: NonZeroU32) -> Self {
        Self { product, quantity }
    }

    /// Identity of the line.
    #[must_use]
    pub const fn sku(&self) -> &Sku {
        &self.product.sku
    }

    /// Quantity as a plain integer.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn iphone() -> Product {
        Product::new(
            Sku::parse("1").unwrap(),
            "iPhone 15 Pro",
            Price::new(29_990_000),
            "Electronics",
        )
        .with_stock(50)
    }

    #[test]
    fn test_new_line_has_quantity_one() {
        let line = LineItem::new(iphone());
        assert_eq!(line.quantity(), 1);
        assert_eq!(line.line_total(), Price::new(29_990_000));
    }

    #[test]
    fn test_line_total() {
        let line = LineItem::with_quantity(iphone(), NonZeroU32::new(3).unwrap());
        assert_eq!(line.line_total(), Price::new(89_970_000));
    }

    #[test]
    fn test_list_price_falls_back_to_price() {
        let product = iphone();
        assert_eq!(product.list_price(), Price::new(29_990_000));

        let discounted = product.with_original_price(Price::new(32_000_000));
        assert_eq!(discounted.list_price(), Price::new(32_000_000));
    }

    #[test]
    fn test_zero_quantity_is_rejected_on_deserialize() {
        let json = r#"{"sku":"1","name":"x","price":1,"category":"c","quantity":0}"#;
        assert!(serde_json::from_str::<LineItem>(json).is_err());
    }
}
