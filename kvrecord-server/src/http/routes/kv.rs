//! Key-value endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::diagnostics::StatusResponse;
use crate::http::error::ApiError;
use crate::http::extractors::{KeyPath, LenientJson};
use crate::http::server::AppState;
use crate::models::{stored_value, EntryKey};

/// Store request body
#[derive(Debug, Default, Deserialize)]
pub struct StoreRequest {
    pub value: Option<JsonValue>,
}

/// Store response
#[derive(Serialize)]
pub struct StoreResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub key: String,
    pub value: String,
}

/// Retrieve response
#[derive(Serialize)]
pub struct EntryResponse {
    pub status: &'static str,
    pub key: String,
    pub value: String,
}

/// All-keys response
#[derive(Serialize)]
pub struct KeysResponse {
    pub status: &'static str,
    pub keys: Vec<String>,
}

/// POST /store/{key} - insert or update
async fn store_entry(
    State(state): State<Arc<AppState>>,
    KeyPath(key): KeyPath,
    LenientJson(req): LenientJson<StoreRequest>,
) -> Result<Json<StoreResponse>, ApiError> {
    let value = stored_value(req.value)?;
    let key = EntryKey::new(&key)?;

    let outcome = state.store.upsert(&key, &value).await?;
    tracing::debug!(key = key.as_str(), ?outcome, "upserted");

    Ok(Json(StoreResponse {
        status: "success",
        message: outcome.message(),
        key: key.as_str().to_owned(),
        value,
    }))
}

/// GET /retrieve/{key}
async fn retrieve_entry(
    State(state): State<Arc<AppState>>,
    KeyPath(key): KeyPath,
) -> Result<Json<EntryResponse>, ApiError> {
    let value = state
        .store
        .retrieve(&key)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            message: format!("Key '{}' not found.", key),
        })?;

    Ok(Json(EntryResponse {
        status: "success",
        key,
        value,
    }))
}

/// DELETE /delete/{key}
async fn delete_entry(
    State(state): State<Arc<AppState>>,
    KeyPath(key): KeyPath,
) -> Result<Json<StatusResponse>, ApiError> {
    if !state.store.delete(&key).await? {
        return Err(ApiError::NotFound {
            message: format!("Key '{}' not found or already deleted.", key),
        });
    }

    Ok(Json(StatusResponse {
        status: "success",
        message: format!("Key '{}' deleted successfully.", key),
    }))
}

/// GET /all_keys
async fn all_keys(State(state): State<Arc<AppState>>) -> Result<Json<KeysResponse>, ApiError> {
    let keys = state.store.list_keys().await?;

    Ok(Json(KeysResponse {
        status: "success",
        keys,
    }))
}

/// Key-value routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/store/{key}", post(store_entry))
        .route("/retrieve/{key}", get(retrieve_entry))
        .route("/delete/{key}", delete(delete_entry))
        .route("/all_keys", get(all_keys))
}
