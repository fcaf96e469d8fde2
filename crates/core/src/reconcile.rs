//! Line-item reconciliation.
//!
//! Keeps a combo's line list at one line per SKU with a quantity of at least
//! one. Every function returns a new list and leaves its input untouched, so
//! callers can tell whether a selection changed by comparing lists.

use std::num::NonZeroU32;

use crate::types::{LineItem, Product, Sku, SuggestionItem};

/// Add one unit of `product`.
///
/// An existing line for the same SKU has its quantity incremented in place;
/// otherwise a new line with quantity 1 is appended. Relative order of all
/// other lines is preserved.
#[must_use]
pub fn add_product(items: &[LineItem], product: &Product) -> Vec<LineItem> {
    if items.iter().any(|item| item.sku() == &product.sku) {
        return items
            .iter()
            .map(|item| {
                if item.sku() == &product.sku {
                    LineItem {
                        quantity: item.quantity.saturating_add(1),
                        ..item.clone()
                    }
                } else {
                    item.clone()
                }
            })
            .collect();
    }

    let mut next = items.to_vec();
    next.push(LineItem::new(product.clone()));
    next
}

/// Shift the quantity of the line for `sku` by `delta`.
///
/// A resulting quantity of zero or less removes the line. Decrementing to
/// zero and removing are the same operation here; there is no separate
/// "zero quantity" state. An unknown SKU leaves the list unchanged.
#[must_use]
pub fn change_quantity(items: &[LineItem], sku: &Sku, delta: i32) -> Vec<LineItem> {
    items
        .iter()
        .filter_map(|item| {
            if item.sku() != sku {
                return Some(item.clone());
            }
            let next = i64::from(item.quantity()) + i64::from(delta);
            if next <= 0 {
                return None;
            }
            let quantity = NonZeroU32::new(u32::try_from(next).unwrap_or(u32::MAX))?;
            Some(LineItem {
                quantity,
                ..item.clone()
            })
        })
        .collect()
}

/// Drop the line for `sku`. Removing an absent SKU is a no-op.
#[must_use]
pub fn remove_product(items: &[LineItem], sku: &Sku) -> Vec<LineItem> {
    items
        .iter()
        .filter(|item| item.sku() != sku)
        .cloned()
        .collect()
}

/// Build a fresh selection from suggestion items, one unit each.
///
/// Any prior selection is discarded by the caller. A SKU listed twice by the
/// suggestion still yields a single line.
#[must_use]
pub fn apply_suggestion(suggestion_items: &[SuggestionItem]) -> Vec<LineItem> {
    let mut lines: Vec<LineItem> = Vec::with_capacity(suggestion_items.len());
    for item in suggestion_items {
        if lines.iter().all(|line| line.sku() != &item.sku) {
            lines.push(LineItem::new(item.to_product()));
        }
    }
    lines
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::totals::{is_valid_for_submission, total_value};
    use crate::types::Price;

    fn sku(s: &str) -> Sku {
        Sku::parse(s).unwrap()
    }

    fn product(id: &str, price: i64) -> Product {
        Product::new(sku(id), format!("Product {id}"), Price::new(price), "Electronics")
    }

    fn line(id: &str, price: i64, quantity: u32) -> LineItem {
        LineItem::with_quantity(product(id, price), NonZeroU32::new(quantity).unwrap())
    }

    fn suggestion_item(id: &str, price: i64) -> SuggestionItem {
        SuggestionItem {
            sku: sku(id),
            name: format!("Suggested {id}"),
            price: Price::new(price),
            original_price: None,
            category: "Accessory".to_string(),
            sales_30d: 0,
            rating_avg: None,
            in_existing_combo: false,
        }
    }

    #[test]
    fn test_add_new_product_appends_single_unit() {
        let items = vec![line("1", 100, 2)];
        let next = add_product(&items, &product("2", 50));

        assert_eq!(next.len(), items.len() + 1);
        assert_eq!(next[1].sku(), &sku("2"));
        assert_eq!(next[1].quantity(), 1);
        assert_eq!(next[0], items[0]);
    }

    #[test]
    fn test_add_existing_product_merges_quantity() {
        let items = vec![line("1", 100, 1), line("2", 200, 3), line("3", 300, 1)];
        let next = add_product(&items, &product("2", 200));

        assert_eq!(next.len(), 3);
        assert_eq!(next[1].quantity(), 4);
        assert_eq!(next[0], items[0]);
        assert_eq!(next[2], items[2]);
    }

    #[test]
    fn test_add_does_not_mutate_input() {
        let items = vec![line("1", 100, 1)];
        let snapshot = items.clone();
        let _ = add_product(&items, &product("1", 100));
        let _ = add_product(&items, &product("9", 100));
        assert_eq!(items, snapshot);
    }

    #[test]
    fn test_add_same_product_twice_scenario() {
        let items = vec![line("1", 29_990_000, 1)];
        let next = add_product(&items, &product("1", 29_990_000));

        assert_eq!(next.len(), 1);
        assert_eq!(next[0].quantity(), 2);
        assert_eq!(total_value(&next), Price::new(59_980_000));
    }

    #[test]
    fn test_add_keeps_price_from_selection_time() {
        let items = vec![line("1", 100, 1)];
        let repriced = product("1", 999);
        let next = add_product(&items, &repriced);

        assert_eq!(next[0].product.price, Price::new(100));
        assert_eq!(total_value(&next), Price::new(200));
    }

    #[test]
    fn test_change_quantity_increments_and_decrements() {
        let items = vec![line("1", 100, 2), line("2", 100, 1)];

        let up = change_quantity(&items, &sku("1"), 3);
        assert_eq!(up[0].quantity(), 5);
        assert_eq!(up[1], items[1]);

        let down = change_quantity(&items, &sku("1"), -1);
        assert_eq!(down[0].quantity(), 1);
    }

    #[test]
    fn test_change_quantity_to_zero_removes_line() {
        let items = vec![line("1", 100, 1), line("2", 100, 1)];
        let next = change_quantity(&items, &sku("1"), -1);

        assert_eq!(next, vec![line("2", 100, 1)]);
        assert!(!is_valid_for_submission(&next));
    }

    #[test]
    fn test_change_quantity_below_zero_removes_line() {
        let items = vec![line("1", 100, 3), line("2", 100, 2)];
        for delta in [-3, -4, -100, i32::MIN] {
            let next = change_quantity(&items, &sku("1"), delta);
            assert_eq!(next.len(), 1);
            assert!(next.iter().all(|item| item.quantity() >= 1));
        }
    }

    #[test]
    fn test_change_quantity_unknown_sku_is_noop() {
        let items = vec![line("1", 100, 2)];
        assert_eq!(change_quantity(&items, &sku("404"), -5), items);
        assert_eq!(change_quantity(&items, &sku("404"), 5), items);
    }

    #[test]
    fn test_change_quantity_saturates() {
        let items = vec![line("1", 1, u32::MAX - 1)];
        let next = change_quantity(&items, &sku("1"), i32::MAX);
        assert_eq!(next[0].quantity(), u32::MAX);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let items = vec![line("1", 100, 1), line("2", 200, 2), line("3", 300, 1)];
        let once = remove_product(&items, &sku("2"));
        let twice = remove_product(&once, &sku("2"));

        assert_eq!(once, vec![line("1", 100, 1), line("3", 300, 1)]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_remove_unknown_sku_is_noop() {
        let items = vec![line("1", 100, 1)];
        assert_eq!(remove_product(&items, &sku("2")), items);
    }

    #[test]
    fn test_apply_suggestion_scenario() {
        let next = apply_suggestion(&[suggestion_item("x", 100), suggestion_item("y", 200)]);

        assert_eq!(next.len(), 2);
        assert_eq!(next[0].sku(), &sku("x"));
        assert_eq!(next[1].sku(), &sku("y"));
        assert!(next.iter().all(|item| item.quantity() == 1));
        assert_eq!(total_value(&next), Price::new(300));
    }

    #[test]
    fn test_apply_suggestion_collapses_duplicates() {
        let next = apply_suggestion(&[
            suggestion_item("x", 100),
            suggestion_item("x", 100),
            suggestion_item("y", 200),
        ]);

        assert_eq!(next.len(), 2);
        assert_eq!(next[0].quantity(), 1);
    }

    #[test]
    fn test_apply_empty_suggestion() {
        assert!(apply_suggestion(&[]).is_empty());
    }
}
