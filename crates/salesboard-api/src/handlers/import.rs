use axum::{extract::State, Json};
use serde::Serialize;

use crate::{error::ApiResult, state::ApiState, ApiError};

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub message: &'static str,
    pub inserted: u64,
    pub skipped: usize,
}

/// Fetch the upstream dataset and append it to the store
pub async fn fetch_data(State(state): State<ApiState>) -> ApiResult<Json<ImportResponse>> {
    let report = state
        .importer
        .import(state.store.as_ref())
        .await
        .map_err(ApiError::import)?;

    Ok(Json(ImportResponse {
        message: "Successfully imported data",
        inserted: report.inserted,
        skipped: report.skipped,
    }))
}
