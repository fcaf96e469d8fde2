//! The combo submission gate.

use crate::types::LineItem;

/// Fewest distinct products a combo may contain.
pub const MIN_COMBO_ITEMS: usize = 2;

/// Errors raised before a combo is sent to the backend.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Not enough distinct products.
    #[error("combo needs at least {required} products (has {actual})")]
    TooFewItems {
        /// Minimum line count.
        required: usize,
        /// Current line count.
        actual: usize,
    },
}

/// Check that `items` may be created or re-saved as a combo.
///
/// # Errors
///
/// Returns `ValidationError::TooFewItems` when there are fewer than
/// [`MIN_COMBO_ITEMS`] lines. Quantities do not count: one line of five
/// units is still one product.
pub fn validate_for_submission(items: &[LineItem]) -> Result<(), ValidationError> {
    if items.len() < MIN_COMBO_ITEMS {
        return Err(ValidationError::TooFewItems {
            required: MIN_COMBO_ITEMS,
            actual: items.len(),
        });
    }
    Ok(())
}
