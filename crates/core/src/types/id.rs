//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create string ID wrappers that prevent
//! accidentally comparing a product SKU with a combo ID.

/// Errors that can occur when parsing an identifier.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input is empty or only whitespace.
    #[error("identifier cannot be empty")]
    Empty,
}

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` as a plain string, rejecting blank values
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `parse()` which trims surrounding whitespace
/// - `Display`, `FromStr`, `AsRef<str>`, and `TryFrom<String>`
///
/// # Example
///
/// ```rust
/// # use combo_console_core::define_id;
/// define_id!(WarehouseId);
///
/// let id = WarehouseId::parse(" wh-1 ").unwrap();
/// assert_eq!(id.as_str(), "wh-1");
/// assert!(WarehouseId::parse("   ").is_err());
/// ```
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse an ID, trimming surrounding whitespace.
            ///
            /// # Errors
            ///
            /// Returns an error if the input is empty after trimming.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::types::IdError> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err($crate::types::IdError::Empty);
                }
                Ok(Self(trimmed.to_owned()))
            }

            /// Returns the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the ID and returns its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl ::core::convert::TryFrom<String> for $name {
            type Error = $crate::types::IdError;

            fn try_from(s: String) -> ::core::result::Result<Self, Self::Error> {
                Self::parse(&s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Canonical product identity.
    ///
    /// Every line-item operation compares SKUs and nothing else, so a product
    /// can appear at most once in a combo.
    Sku
);

define_id!(
    /// Server-assigned combo identity.
    ComboId
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims() {
        let sku = Sku::parse("  IP15-PRO ").unwrap();
        assert_eq!(sku.as_str(), "IP15-PRO");
    }

    #[test]
    fn test_parse_blank() {
        assert_eq!(Sku::parse(""), Err(IdError::Empty));
        assert_eq!(ComboId::parse(" \t"), Err(IdError::Empty));
    }

    #[test]
    fn test_serde_as_plain_string() {
        let sku = Sku::parse("x").unwrap();
        assert_eq!(serde_json::to_string(&sku).unwrap(), "\"x\"");

        let parsed: Sku = serde_json::from_str("\"x\"").unwrap();
        assert_eq!(parsed, sku);
    }

    #[test]
    fn test_deserialize_rejects_blank() {
        assert!(serde_json::from_str::<ComboId>("\"  \"").is_err());
    }

    #[test]
    fn test_display_and_from_str() {
        let id: ComboId = "combo-7".parse().unwrap();
        assert_eq!(format!("{id}"), "combo-7");
    }
}
