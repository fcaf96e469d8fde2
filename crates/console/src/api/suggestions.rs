//! Combo suggestion operations.

use tracing::instrument;

use combo_console_core::Suggestion;

use super::conversions::convert_suggestions;
use super::types::{SuggestionFilter, SuggestionsData};
use super::{ApiError, ComboApiClient};

impl ComboApiClient {
    /// Ask the backend for suggested combos.
    ///
    /// An empty filter is sent as `{}`. Suggestions or items that cannot be
    /// read are skipped.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or the body has no suggestion list.
    #[instrument(skip(self))]
    pub async fn fetch_suggestions(
        &self,
        filter: &SuggestionFilter,
    ) -> Result<Vec<Suggestion>, ApiError> {
        let data: SuggestionsData = self.post(&["suggest-combo"], filter).await?;
        Ok(convert_suggestions(data.suggestions))
    }
}
