//! Combo list and product picker filters.

use crate::types::{Combo, LineItem, Product, StatusFilter};

/// Search and status filter of the combo list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComboFilter {
    /// Matched case-insensitively against the combo name and its item names.
    pub search: String,
    pub status: StatusFilter,
}

impl ComboFilter {
    #[must_use]
    pub fn new(search: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            search: search.into(),
            status,
        }
    }

    #[must_use]
    pub fn matches(&self, combo: &Combo) -> bool {
        if !self.status.accepts(combo.status) {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        combo.name.to_lowercase().contains(&needle)
            || combo
                .items
                .iter()
                .any(|item| item.product.name.to_lowercase().contains(&needle))
    }

    /// Matching combos, in list order.
    #[must_use]
    pub fn apply<'a>(&self, combos: &'a [Combo]) -> Vec<&'a Combo> {
        combos.iter().filter(|combo| self.matches(combo)).collect()
    }
}

/// Filter of the product picker.
///
/// Products already in the selection are never offered again; adding the
/// same product twice goes through the quantity controls instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub search: String,
    /// Exact category label; `None` for all categories.
    pub category: Option<String>,
}

impl ProductFilter {
    #[must_use]
    pub fn new(search: impl Into<String>, category: Option<String>) -> Self {
        Self {
            search: search.into(),
            category,
        }
    }

    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|category| product.category == category);
        category_ok
            && product
                .name
                .to_lowercase()
                .contains(&self.search.trim().to_lowercase())
    }

    /// Catalog products matching the filter that are not in `selected`.
    #[must_use]
    pub fn available<'a>(&self, products: &'a [Product], selected: &[LineItem]) -> Vec<&'a Product> {
        products
            .iter()
            .filter(|product| self.matches(product))
            .filter(|product| selected.iter().all(|line| line.sku() != &product.sku))
            .collect()
    }
}
