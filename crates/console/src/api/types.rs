//! Combo API wire types.
//!
//! The backend is loose about number and identifier encodings, so the
//! records here accept several shapes, read `null` as absent, and leave
//! validation to [`super::conversions`]. Lists are decoded one element at a
//! time so a record of an unexpected shape is dropped on its own.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use combo_console_core::ComboStatus;

/// Wrapper for every response: `{"data": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// An identifier sent as either a string or a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl std::fmt::Display for RawId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

/// A money or count value sent as an integer, a float, or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Amount {
    /// The value as a float, `None` if it is not numeric.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            Self::Text(text) => text.trim().parse::<f64>().ok(),
        }
        .filter(|f| f.is_finite())
    }

    /// The value rounded to a whole number, `None` if it is not numeric or
    /// out of range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // range checked before the cast
    pub fn value(&self) -> Option<i64> {
        let float = match self {
            Self::Integer(n) => return Some(*n),
            Self::Float(f) => *f,
            Self::Text(text) => {
                let text = text.trim();
                if let Ok(n) = text.parse::<i64>() {
                    return Some(n);
                }
                text.parse::<f64>().ok()?
            }
        };
        let rounded = float.round();
        if rounded.is_finite() && rounded >= -9.0e18 && rounded <= 9.0e18 {
            Some(rounded as i64)
        } else {
            None
        }
    }
}

/// Decode each element of a JSON array on its own, dropping the ones that do
/// not fit `T`.
pub fn decode_each<T: DeserializeOwned>(kind: &'static str, values: Vec<Value>) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            serde_json::from_value(value)
                .inspect_err(|e| warn!(kind, index, error = %e, "Skipping undecodable record"))
                .ok()
        })
        .collect()
}

/// `null` reads as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A nested array decoded with [`decode_each`]; `null` is empty.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(decode_each("nested", values))
}

/// Product record from `GET /products`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    #[serde(default)]
    pub sku: Option<RawId>,
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub price: Amount,
    #[serde(default, rename = "originalPrice", alias = "original_price")]
    pub original_price: Option<Amount>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default)]
    pub stock: Option<Amount>,
    #[serde(default)]
    pub rating_avg: Option<Amount>,
}

/// Combo record from `GET /combos` and `POST /combos`.
#[derive(Debug, Clone, Deserialize)]
pub struct ComboRecord {
    pub id: RawId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, alias = "description")]
    pub note: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "createdAt", alias = "created_at")]
    pub created_at: Option<String>,
    #[serde(default, rename = "createdBy", alias = "created_by")]
    pub created_by: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub items: Vec<ComboItemRecord>,
}

/// One item of a combo record.
#[derive(Debug, Clone, Deserialize)]
pub struct ComboItemRecord {
    #[serde(default)]
    pub sku: Option<RawId>,
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub price: Amount,
    #[serde(default, rename = "originalPrice", alias = "original_price")]
    pub original_price: Option<Amount>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default)]
    pub rating_avg: Option<Amount>,
    /// Absent on combos saved without quantities.
    #[serde(default)]
    pub quantity: Option<Amount>,
}

/// Body of `POST /combos`. Creates when `combo_id` is absent, otherwise
/// overwrites that combo.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpsertComboPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combo_id: Option<String>,
    pub created_by: String,
    pub items: Vec<ComboItemPayload>,
    pub name: String,
    pub note: String,
    pub status: ComboStatus,
}

/// One item of an upsert body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComboItemPayload {
    pub sku: String,
    pub name: String,
    #[serde(rename = "originalPrice")]
    pub original_price: i64,
    pub rating_avg: Option<f64>,
    pub price: i64,
    pub category: String,
    pub quantity: u32,
}

/// `data` of a `POST /suggest-combo` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestionsData {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub suggestions: Vec<SuggestionRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionRecord {
    #[serde(alias = "name", default, deserialize_with = "null_as_default")]
    pub combo_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rationale: String,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub items: Vec<SuggestionItemRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionItemRecord {
    #[serde(default)]
    pub sku: Option<RawId>,
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub price: Amount,
    #[serde(default, rename = "originalPrice", alias = "original_price")]
    pub original_price: Option<Amount>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default)]
    pub sales_30d: Option<Amount>,
    #[serde(default)]
    pub rating_avg: Option<Amount>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub in_existing_combo: bool,
}

/// Free-form filter object sent to `POST /suggest-combo`.
///
/// Serializes as a JSON object; the default is `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SuggestionFilter(Map<String, Value>);

impl SuggestionFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one filter entry.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Parse a `key=value` pair. The value is read as JSON when it parses
    /// (numbers, booleans, quoted strings) and kept as a plain string
    /// otherwise. Returns `None` when there is no `=` or the key is blank.
    #[must_use]
    pub fn parse_pair(pair: &str) -> Option<(String, Value)> {
        let (key, raw) = pair.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        let value = serde_json::from_str::<Value>(raw.trim())
            .unwrap_or_else(|_| Value::String(raw.trim().to_string()));
        Some((key.to_string(), value))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl FromIterator<(String, Value)> for SuggestionFilter {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
