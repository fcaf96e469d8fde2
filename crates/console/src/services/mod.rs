//! Console workflows over the capability traits.

mod creator;
mod management;

pub use creator::ComboCreator;
pub use management::{ComboManager, EditSession};

use std::sync::Arc;

use crate::api::ComboApiClient;

impl ComboCreator {
    /// Creator backed entirely by the HTTP client.
    #[must_use]
    pub fn from_client(client: &ComboApiClient, created_by: impl Into<String>) -> Self {
        let client = Arc::new(client.clone());
        Self::new(client.clone(), client.clone(), client, created_by)
    }
}

impl ComboManager {
    /// Manager backed by the HTTP client.
    #[must_use]
    pub fn from_client(client: &ComboApiClient, created_by: impl Into<String>) -> Self {
        Self::new(Arc::new(client.clone()), created_by)
    }
}
