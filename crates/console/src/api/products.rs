//! Catalog operations.

use serde_json::Value;
use tracing::{debug, instrument};

use combo_console_core::Product;

use super::conversions::convert_products;
use super::types::{ProductRecord, decode_each};
use super::{ApiError, ComboApiClient};

impl ComboApiClient {
    /// Fetch the product catalog.
    ///
    /// Records of an unexpected shape, or without a usable identity or
    /// price, are skipped.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or the body is not a product list.
    #[instrument(skip(self))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        let values: Vec<Value> = self.get(&["products"]).await?;
        let received = values.len();
        let products = convert_products(decode_each::<ProductRecord>("product", values));
        debug!(received, kept = products.len(), "Fetched products");
        Ok(products)
    }
}
