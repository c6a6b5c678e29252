//! Connectivity, schema and client-address endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Map, Value as JsonValue};

use crate::http::error::ApiError;
use crate::http::extractors::ClientIp;
use crate::http::server::AppState;

/// Generic `{status, message}` body
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: String,
}

/// Client address response
#[derive(Serialize)]
pub struct IpResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub ip_address: Option<String>,
}

/// GET /db_test - round-trip to the store and report its version
async fn db_test(State(state): State<Arc<AppState>>) -> Result<Json<JsonValue>, ApiError> {
    let version = state
        .store
        .server_version()
        .await?
        .ok_or_else(|| ApiError::Internal {
            message: "Connected but could not fetch database version.".to_string(),
        })?;

    // The version key is named after the backend, e.g. `postgres_version`
    let mut body = Map::new();
    body.insert("status".into(), json!("success"));
    body.insert(
        "message".into(),
        json!("Successfully connected to database!"),
    );
    body.insert(format!("{}_version", state.store.backend()), json!(version));

    Ok(Json(JsonValue::Object(body)))
}

/// GET /create_table - idempotent key-value table DDL
async fn create_table(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.store.ensure_kv_table().await?;

    Ok(Json(StatusResponse {
        status: "success",
        message: "Table 'key_value_store' created or already exists.".to_string(),
    }))
}

/// GET /ip
async fn client_ip(ClientIp(ip): ClientIp) -> Json<IpResponse> {
    Json(IpResponse {
        status: "success",
        message: "Your IP address is:",
        ip_address: ip.map(|ip| ip.to_string()),
    })
}

/// Diagnostic routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/db_test", get(db_test))
        .route("/create_table", get(create_table))
        .route("/ip", get(client_ip))
}
