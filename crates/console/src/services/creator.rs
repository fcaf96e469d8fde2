//! Combo creation workflow.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use combo_console_core::{
    Combo, ComboDraft, ComboSummary, Product, ProductFilter, Sku, Suggestion,
};

use crate::api::SuggestionFilter;
use crate::error::ConsoleError;
use crate::store::{ComboStore, ProductCatalog, SuggestionSource};

/// Assembles one new combo at a time.
///
/// Holds the draft, the catalog snapshot the picker offers, and the last
/// fetched suggestions. The draft survives a failed submit and is cleared
/// by a successful one.
pub struct ComboCreator {
    catalog: Arc<dyn ProductCatalog>,
    store: Arc<dyn ComboStore>,
    suggester: Arc<dyn SuggestionSource>,
    created_by: String,
    draft: ComboDraft,
    products: Vec<Product>,
    suggestions: Vec<Suggestion>,
}

impl ComboCreator {
    pub fn new(
        catalog: Arc<dyn ProductCatalog>,
        store: Arc<dyn ComboStore>,
        suggester: Arc<dyn SuggestionSource>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            store,
            suggester,
            created_by: created_by.into(),
            draft: ComboDraft::default(),
            products: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    #[must_use]
    pub const fn draft(&self) -> &ComboDraft {
        &self.draft
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.draft.note = note.into();
    }

    /// Replace the catalog snapshot with a fresh fetch.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Api` if the catalog cannot be fetched; the
    /// previous snapshot is kept.
    #[instrument(skip(self))]
    pub async fn load_catalog(&mut self) -> Result<&[Product], ConsoleError> {
        self.products = self.catalog.list_products().await?;
        debug!(count = self.products.len(), "Loaded catalog");
        Ok(&self.products)
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Catalog products the picker offers: matching `filter` and not yet in
    /// the draft.
    #[must_use]
    pub fn available_products(&self, filter: &ProductFilter) -> Vec<&Product> {
        filter.available(&self.products, &self.draft.items)
    }

    /// Add one unit of the catalog product with this SKU.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::NotFound` if the SKU is not in the loaded catalog.
    pub fn add_sku(&mut self, sku: &Sku) -> Result<(), ConsoleError> {
        let product = self
            .products
            .iter()
            .find(|product| &product.sku == sku)
            .cloned()
            .ok_or_else(|| ConsoleError::NotFound(format!("product {sku}")))?;
        self.add_product(&product);
        Ok(())
    }

    pub fn add_product(&mut self, product: &Product) {
        self.draft.add_product(product);
        debug!(sku = %product.sku, lines = self.draft.items.len(), "Added product to draft");
    }

    pub fn change_quantity(&mut self, sku: &Sku, delta: i32) {
        self.draft.change_quantity(sku, delta);
        debug!(%sku, delta, lines = self.draft.items.len(), "Changed draft quantity");
    }

    pub fn remove_product(&mut self, sku: &Sku) {
        self.draft.remove_product(sku);
        debug!(%sku, lines = self.draft.items.len(), "Removed product from draft");
    }

    /// Fetch suggestions, replacing the previous list.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Api` if the request fails.
    #[instrument(skip(self))]
    pub async fn fetch_suggestions(
        &mut self,
        filter: &SuggestionFilter,
    ) -> Result<&[Suggestion], ConsoleError> {
        self.suggestions = self.suggester.suggest(filter).await?;
        debug!(count = self.suggestions.len(), "Fetched suggestions");
        Ok(&self.suggestions)
    }

    #[must_use]
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Replace the draft's name, note, and items with those of the suggestion
    /// at `index` in the last fetched list.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::NotFound` if `index` is out of range.
    pub fn apply_suggestion(&mut self, index: usize) -> Result<(), ConsoleError> {
        let suggestion = self
            .suggestions
            .get(index)
            .ok_or_else(|| ConsoleError::NotFound(format!("suggestion #{index}")))?;
        self.draft.apply_suggestion(suggestion);
        debug!(
            name = %self.draft.name,
            lines = self.draft.items.len(),
            "Applied suggestion to draft"
        );
        Ok(())
    }

    #[must_use]
    pub fn summary(&self) -> ComboSummary {
        self.draft.summary()
    }

    /// Validate and create the draft as a new combo.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Validation` without touching the backend when
    /// the draft has fewer than two lines, or `ConsoleError::Api` when the
    /// backend rejects it. The draft is kept in both cases.
    #[instrument(skip(self), fields(name = %self.draft.name, lines = self.draft.items.len()))]
    pub async fn submit(&mut self) -> Result<Combo, ConsoleError> {
        self.draft.validate()?;
        let combo = self.store.upsert_combo(&self.draft, &self.created_by).await?;
        info!(combo_id = %combo.id, name = %combo.name, "Created combo");
        self.draft = ComboDraft::default();
        Ok(combo)
    }
}

impl std::fmt::Debug for ComboCreator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComboCreator")
            .field("created_by", &self.created_by)
            .field("draft", &self.draft)
            .field("products", &self.products.len())
            .field("suggestions", &self.suggestions.len())
            .finish_non_exhaustive()
    }
}
