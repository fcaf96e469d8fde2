//! Combo drafts and persisted combos.

use chrono::{DateTime, Utc};

use super::{ComboId, ComboStatus, LineItem, Product, Sku, Suggestion};
use crate::reconcile;
use crate::totals::{ComboSummary, DraftState};
use crate::validation::{ValidationError, validate_for_submission};

/// A combo being assembled or edited.
///
/// Derived values (totals, categories, validity) are computed from `items`
/// on every call and never stored.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComboDraft {
    /// Set when the draft was loaded from a persisted combo.
    pub id: Option<ComboId>,
    pub name: String,
    pub note: String,
    pub status: ComboStatus,
    /// Insertion order is display order.
    pub items: Vec<LineItem>,
}

impl ComboDraft {
    /// An empty, active draft.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add one unit of `product`, merging into its line if present.
    pub fn add_product(&mut self, product: &Product) {
        self.items = reconcile::add_product(&self.items, product);
    }

    /// Shift the quantity of a line; a result of zero or less removes it.
    pub fn change_quantity(&mut self, sku: &Sku, delta: i32) {
        self.items = reconcile::change_quantity(&self.items, sku, delta);
    }

    /// Drop a line. Unknown SKUs are ignored.
    pub fn remove_product(&mut self, sku: &Sku) {
        self.items = reconcile::remove_product(&self.items, sku);
    }

    /// Adopt a suggestion: its name, rationale, and items replace the draft's.
    pub fn apply_suggestion(&mut self, suggestion: &Suggestion) {
        self.name.clone_from(&suggestion.name);
        self.note.clone_from(&suggestion.rationale);
        self.items = reconcile::apply_suggestion(&suggestion.items);
    }

    /// Whether the draft holds a line for `sku`.
    #[must_use]
    pub fn contains(&self, sku: &Sku) -> bool {
        self.items.iter().any(|item| item.sku() == sku)
    }

    #[must_use]
    pub fn summary(&self) -> ComboSummary {
        ComboSummary::of(&self.items)
    }

    #[must_use]
    pub fn state(&self) -> DraftState {
        DraftState::of(&self.items)
    }

    /// Check the submission gate.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::TooFewItems` if the draft has fewer than two
    /// lines.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_for_submission(&self.items)
    }
}

impl From<&Combo> for ComboDraft {
    fn from(combo: &Combo) -> Self {
        Self {
            id: Some(combo.id.clone()),
            name: combo.name.clone(),
            note: combo.note.clone(),
            status: combo.status,
            items: combo.items.clone(),
        }
    }
}

/// A combo persisted by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Combo {
    pub id: ComboId,
    pub name: String,
    pub note: String,
    pub status: ComboStatus,
    pub items: Vec<LineItem>,
    pub created_at: Option<DateTime<Utc>>,
    pub created_by: String,
}

impl Combo {
    #[must_use]
    pub fn summary(&self) -> ComboSummary {
        ComboSummary::of(&self.items)
    }

    /// Item names joined the way the combo list shows them: `A + B + C`.
    #[must_use]
    pub fn product_names(&self) -> String {
        self.items
            .iter()
            .map(|item| item.product.name.as_str())
            .collect::<Vec<_>>()
            .join(" + ")
    }

    /// Creation date as `dd/mm/yyyy`, if known.
    #[must_use]
    pub fn created_on(&self) -> Option<String> {
        self.created_at
            .map(|at| at.format("%d/%m/%Y").to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::types::{Price, SuggestionItem};

    fn product(sku: &str, price: i64) -> Product {
        Product::new(Sku::parse(sku).unwrap(), format!("P{sku}"), Price::new(price), "Electronics")
    }

    fn suggestion_item(sku: &str, price: i64) -> SuggestionItem {
        SuggestionItem {
            sku: Sku::parse(sku).unwrap(),
            name: format!("S{sku}"),
            price: Price::new(price),
            original_price: None,
            category: "Audio".to_string(),
            sales_30d: 12,
            rating_avg: Some(4.5),
            in_existing_combo: false,
        }
    }

    #[test]
    fn test_draft_state_follows_mutations() {
        let mut draft = ComboDraft::new("Work from home");
        assert_eq!(draft.state(), DraftState::Empty);

        draft.add_product(&product("1", 100));
        assert_eq!(draft.state(), DraftState::Insufficient);
        assert!(draft.validate().is_err());

        draft.add_product(&product("2", 200));
        assert_eq!(draft.state(), DraftState::Valid);
        assert!(draft.validate().is_ok());

        draft.change_quantity(&Sku::parse("2").unwrap(), -1);
        assert_eq!(draft.state(), DraftState::Insufficient);
    }

    #[test]
    fn test_apply_suggestion_replaces_everything() {
        let mut draft = ComboDraft::new("Old");
        draft.note = "old note".to_string();
        draft.add_product(&product("1", 100));
        draft.add_product(&product("1", 100));

        let suggestion = Suggestion {
            name: "Audio bundle".to_string(),
            rationale: "Bought together".to_string(),
            items: vec![suggestion_item("x", 100), suggestion_item("y", 200)],
        };
        draft.apply_suggestion(&suggestion);

        assert_eq!(draft.name, "Audio bundle");
        assert_eq!(draft.note, "Bought together");
        assert_eq!(draft.items.len(), 2);
        assert!(draft.items.iter().all(|item| item.quantity() == 1));
        assert!(!draft.contains(&Sku::parse("1").unwrap()));
        assert_eq!(draft.summary().total_value, Price::new(300));
    }

    #[test]
    fn test_draft_from_combo_keeps_identity() {
        let combo = Combo {
            id: ComboId::parse("c-1").unwrap(),
            name: "Bundle".to_string(),
            note: String::new(),
            status: ComboStatus::Paused,
            items: vec![LineItem::new(product("1", 100))],
            created_at: None,
            created_by: "creator".to_string(),
        };

        let draft = ComboDraft::from(&combo);
        assert_eq!(draft.id, Some(combo.id.clone()));
        assert_eq!(draft.status, ComboStatus::Paused);
        assert_eq!(draft.items, combo.items);
    }

    #[test]
    fn test_product_names_and_date() {
        let combo = Combo {
            id: ComboId::parse("c-1").unwrap(),
            name: "Bundle".to_string(),
            note: String::new(),
            status: ComboStatus::Active,
            items: vec![LineItem::new(product("1", 100)), LineItem::new(product("2", 5))],
            created_at: Some(Utc.with_ymd_and_hms(2025, 3, 9, 8, 0, 0).unwrap()),
            created_by: "creator".to_string(),
        };

        assert_eq!(combo.product_names(), "P1 + P2");
        assert_eq!(combo.created_on().as_deref(), Some("09/03/2025"));
    }
}
