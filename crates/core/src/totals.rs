//! Derived combo totals.
//!
//! Everything here is recomputed from the line list on each call. Combos hold
//! tens of lines at most, so nothing is cached.

use crate::types::{LineItem, Price};
use crate::validation::MIN_COMBO_ITEMS;

/// Sum of unit price times quantity, at the prices stored on the lines.
#[must_use]
pub fn total_value(items: &[LineItem]) -> Price {
    items.iter().map(LineItem::line_total).sum()
}

/// Sum of line quantities.
#[must_use]
pub fn total_quantity(items: &[LineItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity())).sum()
}

/// Unique category labels in first-seen order.
#[must_use]
pub fn distinct_categories(items: &[LineItem]) -> Vec<&str> {
    let mut categories: Vec<&str> = Vec::new();
    for item in items {
        let category = item.product.category.as_str();
        if !categories.contains(&category) {
            categories.push(category);
        }
    }
    categories
}

/// Value of the lines at list price (the original price before discount,
/// falling back to the selling price).
#[must_use]
pub fn original_value(items: &[LineItem]) -> Price {
    items
        .iter()
        .map(|item| item.product.list_price().times(item.quantity()))
        .sum()
}

#[must_use]
pub fn is_valid_for_submission(items: &[LineItem]) -> bool {
    items.len() >= MIN_COMBO_ITEMS
}

/// Validity of a draft as a function of its line count.
///
/// Only `Valid` allows creating or updating a combo. A draft can move between
/// the states any number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftState {
    /// No lines.
    Empty,
    /// One line.
    Insufficient,
    /// Two or more lines.
    Valid,
}

impl DraftState {
    #[must_use]
    pub const fn of(items: &[LineItem]) -> Self {
        match items.len() {
            0 => Self::Empty,
            n if n < MIN_COMBO_ITEMS => Self::Insufficient,
            _ => Self::Valid,
        }
    }

    #[must_use]
    pub const fn can_submit(self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// All derived values of a line list, for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ComboSummary {
    /// Number of distinct SKUs.
    pub line_count: usize,
    pub total_quantity: u64,
    pub total_value: Price,
    pub original_value: Price,
    pub categories: Vec<String>,
    pub state: DraftState,
}

impl ComboSummary {
    #[must_use]
    pub fn of(items: &[LineItem]) -> Self {
        Self {
            line_count: items.len(),
            total_quantity: total_quantity(items),
            total_value: total_value(items),
            original_value: original_value(items),
            categories: distinct_categories(items)
                .into_iter()
                .map(str::to_owned)
                .collect(),
            state: DraftState::of(items),
        }
    }

    /// How much cheaper the combo is than its list price.
    #[must_use]
    pub fn savings(&self) -> Price {
        self.original_value - self.total_value
    }

    /// Savings as a percentage of list value, `None` when list value is zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // amounts stay far below 2^52 dong
    pub fn discount_percent(&self) -> Option<f64> {
        let original = self.original_value.amount();
        if original == 0 {
            return None;
        }
        Some(self.savings().amount() as f64 * 100.0 / original as f64)
    }
}
