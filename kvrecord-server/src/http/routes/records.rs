//! Record endpoints
//!
//! Errors here use the `{"error": ...}` body. Validation happens before the
//! store is touched.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::http::error::RecordApiError;
use crate::http::extractors::{LenientJson, RecordQuery};
use crate::http::server::AppState;
use crate::models::{DayRange, NewRecord, RawRecord, Record, RecordDate, ValidationError};

/// Range query parameters (`dd-mm-yyyy`)
#[derive(Debug, Default, Deserialize)]
pub struct RangeParams {
    #[serde(rename = "start-time")]
    pub start_time: Option<String>,
    #[serde(rename = "end-time")]
    pub end_time: Option<String>,
}

/// Name query parameters
#[derive(Debug, Default, Deserialize)]
pub struct NameParams {
    pub name: Option<String>,
}

/// Record response
#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub id: i64,
    pub name: String,
    pub score: i32,
    pub created_at: String,
}

impl From<Record> for RecordResponse {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            name: record.name,
            score: record.score,
            created_at: RecordDate::from(record.created_at).to_string(),
        }
    }
}

/// Created response
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub id: i64,
}

fn into_responses(records: Vec<Record>) -> Json<Vec<RecordResponse>> {
    Json(records.into_iter().map(RecordResponse::from).collect())
}

/// GET /record?start-time=..&end-time=.. - records created within whole days
async fn records_in_range(
    State(state): State<Arc<AppState>>,
    RecordQuery(params): RecordQuery<RangeParams>,
) -> Result<Json<Vec<RecordResponse>>, RecordApiError> {
    let range = DayRange::from_bounds(params.start_time.as_deref(), params.end_time.as_deref())?;

    let records = state.store.query_by_range(range).await?;
    Ok(into_responses(records))
}

/// GET /record-by-name?name=.. - exact name match, possibly empty
async fn records_by_name(
    State(state): State<Arc<AppState>>,
    RecordQuery(params): RecordQuery<NameParams>,
) -> Result<Json<Vec<RecordResponse>>, RecordApiError> {
    let name = params
        .name
        .filter(|n| !n.is_empty())
        .ok_or(ValidationError::MissingName)?;

    let records = state.store.query_by_name(&name).await?;
    tracing::debug!(name = %name, count = records.len(), "records by name");
    Ok(into_responses(records))
}

/// POST /record
async fn create_record(
    State(state): State<Arc<AppState>>,
    LenientJson(raw): LenientJson<RawRecord>,
) -> Result<(StatusCode, Json<CreatedResponse>), RecordApiError> {
    let record = NewRecord::from_raw(raw)?;

    let id = state.store.insert_record(&record).await?;
    tracing::info!(id, name = %record.name, "record added");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Record added successfully",
            id,
        }),
    ))
}

/// Record routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/record", get(records_in_range).post(create_record))
        .route("/record-by-name", get(records_by_name))
}
