//! Combo Console Core - Shared types and bundle logic.
//!
//! This crate provides the types and pure logic used by every combo console
//! component:
//! - `console` - API client and creator/management services
//! - `cli` - Command-line operator surface
//!
//! # Architecture
//!
//! The core crate contains only types and synchronous functions - no I/O, no
//! HTTP clients, no async. Every operation takes a line-item list and returns
//! a new one, so callers can detect changes by comparing lists.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for SKUs, combo IDs, prices, statuses, and
//!   the product / line item / combo / suggestion records
//! - [`reconcile`] - Add, merge, re-quantify, and remove line items
//! - [`totals`] - Derived totals and draft validity
//! - [`validation`] - The submission gate
//! - [`filter`] - Combo list and product picker filters

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod filter;
pub mod reconcile;
pub mod totals;
pub mod types;
pub mod validation;

pub use filter::{ComboFilter, ProductFilter};
pub use totals::{ComboSummary, DraftState};
pub use types::*;
pub use validation::{MIN_COMBO_ITEMS, ValidationError, validate_for_submission};
