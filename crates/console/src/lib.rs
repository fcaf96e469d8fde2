//! Combo console library.
//!
//! Talks to the combo backend and drives the two console workflows on top of
//! the pure types in `combo_console_core`:
//! - Creation: assemble a draft from the catalog or a suggestion, then submit
//! - Management: list, filter, edit, toggle, and delete persisted combos
//!
//! Network access goes through the capability traits in [`store`], which the
//! [`api::ComboApiClient`] implements.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod store;

pub use api::{ApiError, ComboApiClient, SuggestionFilter};
pub use config::{ApiConfig, ConfigError, ConsoleConfig};
pub use error::ConsoleError;
pub use services::{ComboCreator, ComboManager, EditSession};
pub use store::{ComboStore, ProductCatalog, SuggestionSource};
