//! Core types for the combo console.
//!
//! This module provides type-safe wrappers for the catalog and bundle domain.

pub mod combo;
pub mod id;
pub mod price;
pub mod product;
pub mod status;
pub mod suggestion;

pub use combo::{Combo, ComboDraft};
pub use id::*;
pub use price::Price;
pub use product::{LineItem, Product};
pub use status::*;
pub use suggestion::{Suggestion, SuggestionItem};
