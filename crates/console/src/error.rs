//! Service-level errors.

use thiserror::Error;

use combo_console_core::ValidationError;

use crate::api::ApiError;

/// Errors returned by the console services.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The draft failed the submission gate. Nothing was sent.
    #[error("Invalid combo: {0}")]
    Validation(#[from] ValidationError),

    /// The backend call failed.
    #[error("Combo API error: {0}")]
    Api(#[from] ApiError),

    /// A product, combo, or suggestion was not found locally.
    #[error("Not found: {0}")]
    NotFound(String),
}
