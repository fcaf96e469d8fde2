//! Management of persisted combos.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use combo_console_core::{
    Combo, ComboDraft, ComboFilter, ComboId, ComboStatus, ComboSummary, DraftState, Product, Sku,
    StatusFilter,
};

use crate::error::ConsoleError;
use crate::store::ComboStore;

/// The combo list with its active search and status filter.
pub struct ComboManager {
    store: Arc<dyn ComboStore>,
    created_by: String,
    combos: Vec<Combo>,
    filter: ComboFilter,
}

impl ComboManager {
    pub fn new(store: Arc<dyn ComboStore>, created_by: impl Into<String>) -> Self {
        Self {
            store,
            created_by: created_by.into(),
            combos: Vec::new(),
            filter: ComboFilter::default(),
        }
    }

    /// Replace the local list with the backend's.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Api` if the list cannot be fetched; the previous
    /// list is kept.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<usize, ConsoleError> {
        self.combos = self.store.list_combos().await?;
        debug!(count = self.combos.len(), "Refreshed combo list");
        Ok(self.combos.len())
    }

    #[must_use]
    pub fn combos(&self) -> &[Combo] {
        &self.combos
    }

    #[must_use]
    pub const fn filter(&self) -> &ComboFilter {
        &self.filter
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
    }

    pub const fn set_status_filter(&mut self, status: StatusFilter) {
        self.filter.status = status;
    }

    /// Combos passing the current filter, in list order.
    #[must_use]
    pub fn visible(&self) -> Vec<&Combo> {
        self.filter.apply(&self.combos)
    }

    #[must_use]
    pub fn get(&self, id: &ComboId) -> Option<&Combo> {
        self.combos.iter().find(|combo| &combo.id == id)
    }

    fn require(&self, id: &ComboId) -> Result<&Combo, ConsoleError> {
        self.get(id)
            .ok_or_else(|| ConsoleError::NotFound(format!("combo {id}")))
    }

    /// Creator to record on a write: the combo's own when known.
    fn author_of<'a>(&'a self, combo: Option<&'a Combo>) -> &'a str {
        combo
            .map(|combo| combo.created_by.as_str())
            .filter(|author| !author.trim().is_empty())
            .unwrap_or(&self.created_by)
    }

    /// Keep the local list in step with a combo the backend just stored.
    fn replace_or_append(&mut self, stored: Combo) {
        if let Some(existing) = self.combos.iter_mut().find(|c| c.id == stored.id) {
            *existing = stored;
        } else {
            self.combos.push(stored);
        }
    }

    /// Flip a combo between active and paused and persist it.
    ///
    /// The two-product minimum is not checked; a status flip never changes
    /// items.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::NotFound` for an unknown id, or
    /// `ConsoleError::Api` if the backend rejects the write. The local copy
    /// is unchanged on error.
    #[instrument(skip(self, id), fields(combo_id = %id))]
    pub async fn toggle_status(&mut self, id: &ComboId) -> Result<Combo, ConsoleError> {
        let combo = self.require(id)?;
        let mut draft = ComboDraft::from(combo);
        draft.status = draft.status.toggle();
        let author = self.author_of(Some(combo)).to_string();

        let stored = self.store.upsert_combo(&draft, &author).await?;
        info!(combo_id = %stored.id, status = %stored.status, "Toggled combo status");
        self.replace_or_append(stored.clone());
        Ok(stored)
    }

    /// Open a persisted combo for editing.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::NotFound` for an unknown id.
    pub fn begin_edit(&self, id: &ComboId) -> Result<EditSession, ConsoleError> {
        let combo = self.require(id)?;
        Ok(EditSession {
            draft: ComboDraft::from(combo),
        })
    }

    /// Start a combo from scratch on the management page.
    #[must_use]
    pub fn new_combo(&self) -> EditSession {
        EditSession {
            draft: ComboDraft::default(),
        }
    }

    /// Validate and persist an edit session.
    ///
    /// A session from [`Self::begin_edit`] overwrites its combo; one from
    /// [`Self::new_combo`] creates a combo.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Validation` without touching the backend when
    /// the draft has fewer than two lines, or `ConsoleError::Api` when the
    /// backend rejects it. The session is left as it was.
    #[instrument(skip(self, session), fields(combo_id = ?session.draft.id))]
    pub async fn save(&mut self, session: &EditSession) -> Result<Combo, ConsoleError> {
        session.draft.validate()?;
        let existing = session.draft.id.as_ref().and_then(|id| self.get(id));
        let author = self.author_of(existing).to_string();

        let stored = self.store.upsert_combo(&session.draft, &author).await?;
        if session.draft.id.is_some() {
            info!(combo_id = %stored.id, "Updated combo");
        } else {
            info!(combo_id = %stored.id, "Created combo");
        }
        self.replace_or_append(stored.clone());
        Ok(stored)
    }

    /// Delete a combo remotely, then drop it from the local list.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Api` if the backend delete fails; the local list
    /// is unchanged in that case.
    #[instrument(skip(self, id), fields(combo_id = %id))]
    pub async fn delete(&mut self, id: &ComboId) -> Result<(), ConsoleError> {
        self.store.delete_combo(id).await?;
        self.combos.retain(|combo| &combo.id != id);
        info!(combo_id = %id, "Deleted combo");
        Ok(())
    }
}

impl std::fmt::Debug for ComboManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComboManager")
            .field("created_by", &self.created_by)
            .field("combos", &self.combos.len())
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

/// An open edit of a persisted or new combo.
///
/// Uses the same reconciliation as creation: adding a product already in the
/// combo raises its quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    draft: ComboDraft,
}

impl EditSession {
    #[must_use]
    pub const fn draft(&self) -> &ComboDraft {
        &self.draft
    }

    /// Id of the combo being edited; `None` for a new combo.
    #[must_use]
    pub const fn id(&self) -> Option<&ComboId> {
        self.draft.id.as_ref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.draft.note = note.into();
    }

    pub const fn set_status(&mut self, status: ComboStatus) {
        self.draft.status = status;
    }

    pub fn add_product(&mut self, product: &Product) {
        self.draft.add_product(product);
        debug!(sku = %product.sku, lines = self.draft.items.len(), "Added product to edit");
    }

    pub fn change_quantity(&mut self, sku: &Sku, delta: i32) {
        self.draft.change_quantity(sku, delta);
        debug!(%sku, delta, lines = self.draft.items.len(), "Changed edit quantity");
    }

    pub fn remove_product(&mut self, sku: &Sku) {
        self.draft.remove_product(sku);
        debug!(%sku, lines = self.draft.items.len(), "Removed product from edit");
    }

    #[must_use]
    pub fn summary(&self) -> ComboSummary {
        self.draft.summary()
    }

    #[must_use]
    pub fn state(&self) -> DraftState {
        self.draft.state()
    }
}
