//! Capabilities the console services need from the backend.
//!
//! Services are generic over these traits so they can run against the HTTP
//! client or an in-memory stand-in.

use async_trait::async_trait;

use combo_console_core::{Combo, ComboDraft, ComboId, Product, Suggestion};

use crate::api::{ApiError, ComboApiClient, SuggestionFilter};

/// Read access to the product catalog.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;
}

/// Persistence of combos.
#[async_trait]
pub trait ComboStore: Send + Sync {
    async fn list_combos(&self) -> Result<Vec<Combo>, ApiError>;

    /// Create the draft when it has no id, otherwise overwrite that combo.
    /// Returns the stored combo.
    async fn upsert_combo(&self, draft: &ComboDraft, created_by: &str) -> Result<Combo, ApiError>;

    async fn delete_combo(&self, id: &ComboId) -> Result<(), ApiError>;
}

/// Source of suggested combos.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn suggest(&self, filter: &SuggestionFilter) -> Result<Vec<Suggestion>, ApiError>;
}

#[async_trait]
impl ProductCatalog for ComboApiClient {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.fetch_products().await
    }
}

#[async_trait]
impl ComboStore for ComboApiClient {
    async fn list_combos(&self) -> Result<Vec<Combo>, ApiError> {
        self.fetch_combos().await
    }

    async fn upsert_combo(&self, draft: &ComboDraft, created_by: &str) -> Result<Combo, ApiError> {
        self.post_combo(draft, created_by).await
    }

    async fn delete_combo(&self, id: &ComboId) -> Result<(), ApiError> {
        self.remove_combo(id).await
    }
}

#[async_trait]
impl SuggestionSource for ComboApiClient {
    async fn suggest(&self, filter: &SuggestionFilter) -> Result<Vec<Suggestion>, ApiError> {
        self.fetch_suggestions(filter).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod fakes {
    //! In-memory backend for service tests.

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    pub struct FakeBackend {
        pub products: Mutex<Vec<Product>>,
        pub combos: Mutex<Vec<Combo>>,
        pub suggestions: Mutex<Vec<Suggestion>>,
        /// Makes every write fail with a 500.
        pub fail_writes: AtomicBool,
        pub upserts: AtomicUsize,
        pub deletes: AtomicUsize,
        pub last_filter: Mutex<Option<SuggestionFilter>>,
        next_id: AtomicUsize,
    }

    impl FakeBackend {
        pub fn with_products(products: Vec<Product>) -> Self {
            Self {
                products: Mutex::new(products),
                ..Self::default()
            }
        }

        pub fn upsert_count(&self) -> usize {
            self.upserts.load(Ordering::SeqCst)
        }

        pub fn delete_count(&self) -> usize {
            self.deletes.load(Ordering::SeqCst)
        }

        fn check_writable(&self) -> Result<(), ApiError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(ApiError::Api {
                    status: 500,
                    message: "backend down".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ProductCatalog for FakeBackend {
        async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
            Ok(self.products.lock().unwrap().clone())
        }
    }

    #[async_trait]
    impl ComboStore for FakeBackend {
        async fn list_combos(&self) -> Result<Vec<Combo>, ApiError> {
            Ok(self.combos.lock().unwrap().clone())
        }

        async fn upsert_combo(
            &self,
            draft: &ComboDraft,
            created_by: &str,
        ) -> Result<Combo, ApiError> {
            self.upserts.fetch_add(1, Ordering::SeqCst);
            self.check_writable()?;

            let id = draft.id.clone().unwrap_or_else(|| {
                let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                ComboId::parse(&format!("fake-{n}")).unwrap()
            });
            let stored = Combo {
                id,
                name: draft.name.clone(),
                note: draft.note.clone(),
                status: draft.status,
                items: draft.items.clone(),
                created_at: None,
                created_by: created_by.to_string(),
            };

            let mut combos = self.combos.lock().unwrap();
            if let Some(existing) = combos.iter_mut().find(|c| c.id == stored.id) {
                *existing = stored.clone();
            } else {
                combos.push(stored.clone());
            }
            Ok(stored)
        }

        async fn delete_combo(&self, id: &ComboId) -> Result<(), ApiError> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.check_writable()?;

            let mut combos = self.combos.lock().unwrap();
            let before = combos.len();
            combos.retain(|c| &c.id != id);
            if combos.len() == before {
                return Err(ApiError::NotFound(format!("/combos/{id}")));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl SuggestionSource for FakeBackend {
        async fn suggest(&self, filter: &SuggestionFilter) -> Result<Vec<Suggestion>, ApiError> {
            *self.last_filter.lock().unwrap() = Some(filter.clone());
            Ok(self.suggestions.lock().unwrap().clone())
        }
    }
}
