//! Combo persistence operations.

use serde_json::Value;
use tracing::{debug, instrument};

use combo_console_core::{Combo, ComboDraft, ComboId};

use super::conversions::{convert_combo, convert_combos, to_upsert_payload};
use super::types::{ComboRecord, decode_each};
use super::{ApiError, ComboApiClient};

impl ComboApiClient {
    /// Fetch every persisted combo.
    ///
    /// Records that cannot be read are skipped.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or the body is not a combo list.
    #[instrument(skip(self))]
    pub async fn fetch_combos(&self) -> Result<Vec<Combo>, ApiError> {
        let values: Vec<Value> = self.get(&["combos"]).await?;
        let received = values.len();
        let combos = convert_combos(decode_each::<ComboRecord>("combo", values));
        debug!(received, kept = combos.len(), "Fetched combos");
        Ok(combos)
    }

    /// Create or overwrite a combo.
    ///
    /// The draft's id decides: no id creates, an id overwrites that combo.
    /// Returns the combo as the backend stored it.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or the stored combo cannot be
    /// read back.
    #[instrument(skip(self, draft), fields(combo_id = ?draft.id, items = draft.items.len()))]
    pub async fn post_combo(&self, draft: &ComboDraft, created_by: &str) -> Result<Combo, ApiError> {
        let payload = to_upsert_payload(draft, created_by);
        let record: ComboRecord = self.post(&["combos"], &payload).await?;
        convert_combo(record).map_err(|e| ApiError::Parse(format!("Invalid combo in response: {e}")))
    }

    /// Delete a combo.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the backend does not know the combo,
    /// or another error if the request fails.
    #[instrument(skip(self, id), fields(combo_id = %id))]
    pub async fn remove_combo(&self, id: &ComboId) -> Result<(), ApiError> {
        self.delete(&["combos", id.as_str()]).await
    }
}
