//! Wire record to domain type conversion functions.
//!
//! Single-record conversions return `ConversionError`; list conversions skip
//! bad records with a warning so one malformed entry does not hide the rest.

use std::num::NonZeroU32;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;
use tracing::warn;

use combo_console_core::{
    Combo, ComboDraft, ComboId, ComboStatus, LineItem, Price, Product, Sku, Suggestion,
    SuggestionItem,
};

use super::types::{
    Amount, ComboItemPayload, ComboItemRecord, ComboRecord, ProductRecord, RawId,
    SuggestionItemRecord, SuggestionRecord, UpsertComboPayload,
};

/// A wire record that cannot become a domain value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("record '{0}' has no usable sku or id")]
    MissingIdentity(String),

    #[error("invalid {field} on '{name}'")]
    InvalidAmount { field: &'static str, name: String },

    #[error("combo has a blank id")]
    BlankComboId,

    #[error("unknown combo status '{0}'")]
    UnknownStatus(String),
}

// =============================================================================
// Shared helpers
// =============================================================================

/// Canonical identity: `sku` when present and non-blank, otherwise `id`.
/// Either may be a string or a number.
fn identity(name: &str, sku: Option<&RawId>, id: Option<&RawId>) -> Result<Sku, ConversionError> {
    [sku, id]
        .into_iter()
        .flatten()
        .find_map(|raw| Sku::parse(&raw.to_string()).ok())
        .ok_or_else(|| ConversionError::MissingIdentity(name.to_string()))
}

fn rating(amount: Option<&Amount>) -> Option<f64> {
    amount.and_then(Amount::as_f64)
}

/// Stored quantity; absent, non-positive or unreadable reads as 1.
fn quantity(amount: Option<&Amount>) -> NonZeroU32 {
    amount
        .and_then(Amount::value)
        .and_then(|value| u32::try_from(value).ok())
        .and_then(NonZeroU32::new)
        .unwrap_or(NonZeroU32::MIN)
}

fn price(field: &'static str, name: &str, amount: &Amount) -> Result<Price, ConversionError> {
    amount
        .value()
        .filter(|value| *value >= 0)
        .map(Price::new)
        .ok_or_else(|| ConversionError::InvalidAmount {
            field,
            name: name.to_string(),
        })
}

fn optional_price(
    field: &'static str,
    name: &str,
    amount: Option<&Amount>,
) -> Result<Option<Price>, ConversionError> {
    amount.map(|amount| price(field, name, amount)).transpose()
}

/// Non-negative count clamped into `u32`; unreadable counts become 0.
fn count(amount: Option<&Amount>) -> u32 {
    amount
        .and_then(Amount::value)
        .map_or(0, |value| u32::try_from(value.max(0)).unwrap_or(u32::MAX))
}

/// Parse a creation timestamp. Accepts RFC 3339 and the naive formats the
/// backend has been seen to emit (taken as UTC); anything else is `None`.
pub fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(at.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
}

// =============================================================================
// Products
// =============================================================================

pub fn convert_product(record: ProductRecord) -> Result<Product, ConversionError> {
    let sku = identity(&record.name, record.sku.as_ref(), record.id.as_ref())?;
    let price = price("price", &record.name, &record.price)?;
    let original_price =
        optional_price("originalPrice", &record.name, record.original_price.as_ref())?;

    Ok(Product {
        sku,
        price,
        original_price,
        category: record.category,
        stock: count(record.stock.as_ref()),
        rating_avg: rating(record.rating_avg.as_ref()),
        name: record.name,
    })
}

pub fn convert_products(records: Vec<ProductRecord>) -> Vec<Product> {
    records
        .into_iter()
        .filter_map(|record| {
            convert_product(record)
                .inspect_err(|e| warn!(error = %e, "Skipping malformed product record"))
                .ok()
        })
        .collect()
}

// =============================================================================
// Combos
// =============================================================================

fn convert_combo_item(record: ComboItemRecord) -> Result<LineItem, ConversionError> {
    let sku = identity(&record.name, record.sku.as_ref(), record.id.as_ref())?;
    let price = price("price", &record.name, &record.price)?;
    let original_price =
        optional_price("originalPrice", &record.name, record.original_price.as_ref())?;
    let quantity = quantity(record.quantity.as_ref());

    let product = Product {
        sku,
        price,
        original_price,
        category: record.category,
        stock: 0,
        rating_avg: rating(record.rating_avg.as_ref()),
        name: record.name,
    };

    Ok(LineItem::with_quantity(product, quantity))
}

/// Merge item records into lines, one per SKU. A SKU stored twice keeps its
/// first position and the sum of both quantities.
fn convert_combo_items(combo_name: &str, records: Vec<ComboItemRecord>) -> Vec<LineItem> {
    let mut lines: Vec<LineItem> = Vec::with_capacity(records.len());
    for record in records {
        let line = match convert_combo_item(record) {
            Ok(line) => line,
            Err(e) => {
                warn!(combo = %combo_name, error = %e, "Skipping malformed combo item");
                continue;
            }
        };
        if let Some(existing) = lines.iter_mut().find(|l| l.sku() == line.sku()) {
            existing.quantity = existing.quantity.saturating_add(line.quantity());
        } else {
            lines.push(line);
        }
    }
    lines
}

pub fn convert_combo(record: ComboRecord) -> Result<Combo, ConversionError> {
    let id = ComboId::parse(&record.id.to_string()).map_err(|_| ConversionError::BlankComboId)?;
    let status = match record.status.as_deref().map(str::trim) {
        None | Some("") => ComboStatus::default(),
        Some(raw) => raw
            .to_ascii_lowercase()
            .parse::<ComboStatus>()
            .map_err(|_| ConversionError::UnknownStatus(raw.to_string()))?,
    };
    let items = convert_combo_items(&record.name, record.items);

    Ok(Combo {
        id,
        note: record.note.unwrap_or_default(),
        status,
        items,
        created_at: record.created_at.as_deref().and_then(parse_created_at),
        created_by: record.created_by.unwrap_or_default(),
        name: record.name,
    })
}

pub fn convert_combos(records: Vec<ComboRecord>) -> Vec<Combo> {
    records
        .into_iter()
        .filter_map(|record| {
            convert_combo(record)
                .inspect_err(|e| warn!(error = %e, "Skipping malformed combo record"))
                .ok()
        })
        .collect()
}

/// Build the upsert body for a draft. A draft with an id overwrites that
/// combo; one without creates a new combo.
pub fn to_upsert_payload(draft: &ComboDraft, created_by: &str) -> UpsertComboPayload {
    UpsertComboPayload {
        combo_id: draft.id.as_ref().map(|id| id.as_str().to_string()),
        created_by: created_by.to_string(),
        items: draft
            .items
            .iter()
            .map(|line| ComboItemPayload {
                sku: line.sku().as_str().to_string(),
                name: line.product.name.clone(),
                original_price: line.product.list_price().amount(),
                rating_avg: line.product.rating_avg,
                price: line.product.price.amount(),
                category: line.product.category.clone(),
                quantity: line.quantity(),
            })
            .collect(),
        name: draft.name.clone(),
        note: draft.note.clone(),
        status: draft.status,
    }
}

// =============================================================================
// Suggestions
// =============================================================================

fn convert_suggestion_item(record: SuggestionItemRecord) -> Result<SuggestionItem, ConversionError> {
    let sku = identity(&record.name, record.sku.as_ref(), record.id.as_ref())?;
    let price = price("price", &record.name, &record.price)?;
    let original_price =
        optional_price("originalPrice", &record.name, record.original_price.as_ref())?;

    Ok(SuggestionItem {
        sku,
        price,
        original_price,
        category: record.category,
        sales_30d: count(record.sales_30d.as_ref()),
        rating_avg: rating(record.rating_avg.as_ref()),
        in_existing_combo: record.in_existing_combo,
        name: record.name,
    })
}

pub fn convert_suggestion(record: SuggestionRecord) -> Suggestion {
    let name = record.combo_name;
    let items = record
        .items
        .into_iter()
        .filter_map(|item| {
            convert_suggestion_item(item)
                .inspect_err(|e| {
                    warn!(suggestion = %name, error = %e, "Skipping malformed suggestion item");
                })
                .ok()
        })
        .collect();

    Suggestion {
        name,
        rationale: record.rationale,
        items,
    }
}

pub fn convert_suggestions(records: Vec<SuggestionRecord>) -> Vec<Suggestion> {
    records.into_iter().map(convert_suggestion).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    use super::*;

    fn product_record(value: serde_json::Value) -> ProductRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_product_identity_prefers_sku() {
        let product = convert_product(product_record(json!({
            "sku": "IP15", "id": 3, "name": "iPhone 15", "price": 100, "category": "Phone"
        })))
        .unwrap();
        assert_eq!(product.sku.as_str(), "IP15");
    }

    #[test]
    fn test_product_identity_falls_back_to_id() {
        let product = convert_product(product_record(json!({
            "sku": "  ", "id": 3, "name": "iPhone 15", "price": "29990000", "category": "Phone",
            "originalPrice": 32000000.0, "stock": 50, "rating_avg": 4.8
        })))
        .unwrap();
        assert_eq!(product.sku.as_str(), "3");
        assert_eq!(product.price, Price::new(29_990_000));
        assert_eq!(product.original_price, Some(Price::new(32_000_000)));
        assert_eq!(product.stock, 50);
    }

    #[test]
    fn test_product_without_identity_is_rejected() {
        let err = convert_product(product_record(json!({
            "name": "Mystery", "price": 1
        })))
        .unwrap_err();
        assert_eq!(err, ConversionError::MissingIdentity("Mystery".to_string()));
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let err = convert_product(product_record(json!({
            "sku": "x", "name": "Broken", "price": -5
        })))
        .unwrap_err();
        assert!(matches!(err, ConversionError::InvalidAmount { field: "price", .. }));
    }

    #[test]
    fn test_product_list_skips_bad_records() {
        let records = vec![
            product_record(json!({"sku": "1", "name": "A", "price": 10})),
            product_record(json!({"name": "B", "price": 10})),
            product_record(json!({"sku": "3", "name": "C", "price": "abc"})),
        ];
        let products = convert_products(records);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "A");
    }

    #[test]
    fn test_combo_merges_duplicate_items() {
        let record: ComboRecord = serde_json::from_value(json!({
            "id": "c-1",
            "name": "Bundle",
            "status": "paused",
            "createdAt": "2025-03-09T08:00:00Z",
            "items": [
                {"sku": "1", "name": "A", "price": 10, "quantity": 2},
                {"sku": "2", "name": "B", "price": 20},
                {"sku": "1", "name": "A", "price": 10, "quantity": 3},
                {"name": "no identity", "price": 1}
            ]
        }))
        .unwrap();

        let combo = convert_combo(record).unwrap();
        assert_eq!(combo.status, ComboStatus::Paused);
        assert_eq!(combo.items.len(), 2);
        assert_eq!(combo.items[0].quantity(), 5);
        assert_eq!(combo.items[1].quantity(), 1);
        assert_eq!(combo.created_on().as_deref(), Some("09/03/2025"));
        assert!(combo.note.is_empty());
    }

    #[test]
    fn test_zero_quantity_reads_as_one() {
        let record: ComboRecord = serde_json::from_value(json!({
            "id": 1, "name": "Bundle",
            "items": [{"sku": "1", "name": "A", "price": 10, "quantity": 0}]
        }))
        .unwrap();
        assert_eq!(convert_combo(record).unwrap().items[0].quantity(), 1);
    }

    #[test]
    fn test_numeric_sku_and_quantity_shapes() {
        let record: ComboRecord = serde_json::from_value(json!({
            "id": 1, "name": "Bundle",
            "items": [
                {"sku": 7, "name": "A", "price": 10, "quantity": "3", "category": null},
                {"sku": null, "id": 8, "name": "B", "price": 20, "quantity": -2},
                {"sku": "7", "name": "A", "price": 10, "quantity": 1.0}
            ]
        }))
        .unwrap();

        let combo = convert_combo(record).unwrap();
        assert_eq!(combo.items.len(), 2);
        assert_eq!(combo.items[0].sku().as_str(), "7");
        assert_eq!(combo.items[0].quantity(), 4);
        assert!(combo.items[0].product.category.is_empty());
        assert_eq!(combo.items[1].sku().as_str(), "8");
        assert_eq!(combo.items[1].quantity(), 1);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let record: ComboRecord =
            serde_json::from_value(json!({"id": 1, "name": "Bundle", "status": "archived"}))
                .unwrap();
        assert_eq!(
            convert_combo(record).unwrap_err(),
            ConversionError::UnknownStatus("archived".to_string())
        );
    }

    #[test]
    fn test_parse_created_at_formats() {
        let at = parse_created_at("2025-03-09 14:30:00").unwrap();
        assert_eq!((at.day(), at.hour(), at.minute()), (9, 14, 30));

        let offset = parse_created_at("2025-03-09T01:00:00+07:00").unwrap();
        assert_eq!((offset.day(), offset.hour()), (8, 18));

        assert!(parse_created_at("2025-03-09").is_some());
        assert!(parse_created_at("last tuesday").is_none());
    }

    #[test]
    fn test_upsert_payload_from_draft() {
        let mut draft = ComboDraft::new("Bundle");
        let product = Product::new(Sku::parse("1").unwrap(), "A", Price::new(90), "Audio")
            .with_original_price(Price::new(100));
        draft.add_product(&product);
        draft.add_product(&product);

        let payload = to_upsert_payload(&draft, "creator");
        assert!(payload.combo_id.is_none());
        assert_eq!(payload.created_by, "creator");
        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.items[0].quantity, 2);
        assert_eq!(payload.items[0].original_price, 100);
        assert_eq!(payload.items[0].price, 90);

        draft.id = Some(ComboId::parse("c-9").unwrap());
        assert_eq!(
            to_upsert_payload(&draft, "creator").combo_id.as_deref(),
            Some("c-9")
        );
    }

    #[test]
    fn test_suggestion_conversion() {
        let record: SuggestionRecord = serde_json::from_value(json!({
            "combo_name": "Audio bundle",
            "rationale": "Bought together",
            "items": [
                {"sku": "x", "name": "X", "price": 100, "sales_30d": 12.0, "in_existing_combo": true},
                {"name": "nameless", "price": 1}
            ]
        }))
        .unwrap();

        let suggestion = convert_suggestion(record);
        assert_eq!(suggestion.name, "Audio bundle");
        assert_eq!(suggestion.items.len(), 1);
        assert_eq!(suggestion.items[0].sales_30d, 12);
        assert!(suggestion.items[0].in_existing_combo);
    }
}
