//! Integration tests for the combo console.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p combo-console-integration-tests
//! ```
//!
//! The tests need no external services. [`MockApi`] serves the combo API
//! endpoints from memory on `127.0.0.1` with an OS-assigned port and records
//! every request it receives.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

use combo_console::{ApiConfig, ComboApiClient};

/// One request seen by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub authorization: Option<String>,
}

/// Backend contents. Records are raw JSON so tests can seed any shape.
#[derive(Debug, Default)]
pub struct MockData {
    pub products: Vec<Value>,
    pub combos: Vec<Value>,
    pub suggestions: Vec<Value>,
    /// When set, every endpoint answers with this status.
    pub fail_status: Option<u16>,
    pub requests: Vec<RecordedRequest>,
    next_id: u64,
}

impl MockData {
    #[must_use]
    pub fn new(products: Vec<Value>, combos: Vec<Value>, suggestions: Vec<Value>) -> Self {
        Self {
            products,
            combos,
            suggestions,
            fail_status: None,
            requests: Vec::new(),
            next_id: 100,
        }
    }

    /// Data matching the sample catalog in [`sample_products`].
    #[must_use]
    pub fn sample() -> Self {
        Self::new(sample_products(), sample_combos(), sample_suggestions())
    }
}

#[derive(Clone, Default)]
struct MockState(Arc<Mutex<MockData>>);

impl MockState {
    fn lock(&self) -> MutexGuard<'_, MockData> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the request, then return the forced failure if one is set.
    fn record(
        &self,
        method: Method,
        path: String,
        headers: &HeaderMap,
        body: Option<Value>,
    ) -> Option<Response> {
        let mut data = self.lock();
        data.requests.push(RecordedRequest {
            method,
            path,
            body,
            authorization: headers
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string),
        });
        data.fail_status.map(|status| {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let mut response = (status, "mock failure").into_response();
            if status == StatusCode::TOO_MANY_REQUESTS {
                response
                    .headers_mut()
                    .insert("Retry-After", axum::http::HeaderValue::from_static("7"));
            }
            response
        })
    }
}

/// A running mock combo API.
pub struct MockApi {
    state: MockState,
    base_url: String,
    handle: JoinHandle<()>,
}

impl MockApi {
    /// Serve `data` on a fresh local port.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(data: MockData) -> Self {
        let state = MockState(Arc::new(Mutex::new(data)));
        let app = Router::new()
            .route("/api/products", get(list_products))
            .route("/api/combos", get(list_combos).post(upsert_combo))
            .route("/api/combos/{id}", delete(delete_combo))
            .route("/api/suggest-combo", post(suggest_combo))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|e| panic!("Failed to bind mock API: {e}"));
        let addr = listener
            .local_addr()
            .unwrap_or_else(|e| panic!("Mock API has no address: {e}"));
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            state,
            base_url: format!("http://{addr}/api"),
            handle,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Client pointed at this mock, without a token.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client(&self) -> ComboApiClient {
        let config = ApiConfig::new(&self.base_url)
            .unwrap_or_else(|e| panic!("Invalid mock URL: {e}"));
        ComboApiClient::new(&config).unwrap_or_else(|e| panic!("Failed to build client: {e}"))
    }

    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    #[must_use]
    pub fn combos(&self) -> Vec<Value> {
        self.state.lock().combos.clone()
    }

    pub fn fail_with(&self, status: Option<u16>) {
        self.state.lock().fail_status = status;
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_products(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if let Some(failure) = state.record(Method::GET, "/products".into(), &headers, None) {
        return failure;
    }
    let products = state.lock().products.clone();
    Json(json!({ "data": products })).into_response()
}

async fn list_combos(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if let Some(failure) = state.record(Method::GET, "/combos".into(), &headers, None) {
        return failure;
    }
    let combos = state.lock().combos.clone();
    Json(json!({ "data": combos })).into_response()
}

async fn upsert_combo(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(failure) =
        state.record(Method::POST, "/combos".into(), &headers, Some(body.clone()))
    {
        return failure;
    }

    let mut data = state.lock();
    let requested_id = body.get("combo_id").and_then(Value::as_str).map(str::to_string);
    let existing = requested_id.as_ref().and_then(|id| {
        data.combos
            .iter()
            .position(|combo| id_of(combo).as_deref() == Some(id.as_str()))
    });

    let id = if let Some(id) = requested_id {
        Value::String(id)
    } else {
        data.next_id += 1;
        json!(data.next_id)
    };
    let created_at = existing
        .and_then(|index| data.combos.get(index))
        .and_then(|combo| combo.get("createdAt").cloned())
        .unwrap_or_else(|| json!("2025-03-09T08:00:00Z"));

    let record = json!({
        "id": id,
        "name": body.get("name").cloned().unwrap_or(Value::Null),
        "note": body.get("note").cloned().unwrap_or(Value::Null),
        "status": body.get("status").cloned().unwrap_or(Value::Null),
        "createdAt": created_at,
        "createdBy": body.get("created_by").cloned().unwrap_or(Value::Null),
        "items": body.get("items").cloned().unwrap_or_else(|| json!([])),
    });

    match existing.and_then(|index| data.combos.get_mut(index)) {
        Some(slot) => *slot = record.clone(),
        None => data.combos.push(record.clone()),
    }

    Json(json!({ "data": record })).into_response()
}

async fn delete_combo(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Some(failure) =
        state.record(Method::DELETE, format!("/combos/{id}"), &headers, None)
    {
        return failure;
    }

    let mut data = state.lock();
    let before = data.combos.len();
    data.combos
        .retain(|combo| id_of(combo).as_deref() != Some(id.as_str()));
    if data.combos.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "combo not found" }))).into_response();
    }
    Json(json!({ "data": null })).into_response()
}

async fn suggest_combo(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(failure) =
        state.record(Method::POST, "/suggest-combo".into(), &headers, Some(body))
    {
        return failure;
    }
    let suggestions = state.lock().suggestions.clone();
    Json(json!({ "data": { "suggestions": suggestions } })).into_response()
}

fn id_of(combo: &Value) -> Option<String> {
    match combo.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

// =============================================================================
// Sample data
// =============================================================================

/// Five products in the shapes the backend sends: some keyed by `sku`, one
/// only by numeric `id`, prices as numbers or strings.
#[must_use]
pub fn sample_products() -> Vec<Value> {
    vec![
        json!({"sku": "IP15", "name": "iPhone 15 Pro", "price": 29_990_000, "originalPrice": 32_990_000, "category": "Smartphone", "stock": 50, "rating_avg": 4.8}),
        json!({"sku": "MBA2", "name": "MacBook Air M2", "price": 27_990_000, "category": "Laptop", "stock": 30}),
        json!({"sku": "APP", "name": "AirPods Pro", "price": "6490000", "originalPrice": 6_990_000, "category": "Accessory", "stock": 100}),
        json!({"id": 4, "name": "iPad Air", "price": 16_990_000, "category": "Tablet", "stock": 25}),
        json!({"sku": "AW9", "name": "Apple Watch Series 9", "price": 10_990_000.0, "category": "Accessory", "stock": 40}),
    ]
}

#[must_use]
pub fn sample_combos() -> Vec<Value> {
    vec![
        json!({
            "id": "1",
            "name": "Combo Apple Ecosystem",
            "note": "Flagship set",
            "status": "active",
            "createdAt": "2025-01-15T10:00:00Z",
            "createdBy": "alice",
            "items": [
                {"sku": "IP15", "name": "iPhone 15 Pro", "price": 29_990_000, "originalPrice": 32_990_000, "category": "Smartphone", "rating_avg": 4.8},
                {"sku": "APP", "name": "AirPods Pro", "price": 6_490_000, "originalPrice": 6_990_000, "category": "Accessory", "quantity": 2}
            ]
        }),
        json!({
            "id": 2,
            "name": "Student Pack",
            "status": "paused",
            "createdAt": "2025-02-01 09:30:00",
            "createdBy": "bob",
            "items": [
                {"id": 4, "name": "iPad Air", "price": 16_990_000, "category": "Tablet"},
                {"sku": "AW9", "name": "Apple Watch Series 9", "price": 10_990_000, "category": "Accessory"}
            ]
        }),
    ]
}

#[must_use]
pub fn sample_suggestions() -> Vec<Value> {
    vec![
        json!({
            "combo_name": "Audio Lovers",
            "rationale": "AirPods and Watch sell together on weekends",
            "items": [
                {"sku": "APP", "name": "AirPods Pro", "price": 6_490_000, "originalPrice": 6_990_000, "category": "Accessory", "sales_30d": 120, "rating_avg": 4.7, "in_existing_combo": true},
                {"sku": "AW9", "name": "Apple Watch Series 9", "price": 10_990_000, "originalPrice": 11_990_000, "category": "Accessory", "sales_30d": 85, "rating_avg": 4.6, "in_existing_combo": false}
            ]
        }),
        json!({
            "combo_name": "Work Setup",
            "rationale": "Laptop buyers add a tablet",
            "items": [
                {"sku": "MBA2", "name": "MacBook Air M2", "price": 27_990_000, "category": "Laptop", "sales_30d": 40},
                {"sku": "MBA2", "name": "MacBook Air M2", "price": 27_990_000, "category": "Laptop", "sales_30d": 40},
                {"id": 4, "name": "iPad Air", "price": 16_990_000, "category": "Tablet", "sales_30d": 33}
            ]
        }),
    ]
}
