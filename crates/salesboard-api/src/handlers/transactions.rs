use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use salesboard_core::{ListingParams, RecordFilter, StoredTransaction};

use crate::{
    error::{ApiResult, Reply},
    state::ApiState,
    ApiError,
};

/// Month-filtered, searchable, paginated listing
pub async fn list_transactions(
    State(state): State<ApiState>,
    params: Result<Query<ListingParams>, QueryRejection>,
) -> ApiResult<Json<Vec<StoredTransaction>>> {
    let Query(params) = params.map_err(|e| ApiError::internal("fetching transactions", e))?;
    let query = params
        .translate(&state.date_matching)
        .map_err(|e| ApiError::internal("fetching transactions", e))?;

    let records = state
        .store
        .find(&query.filter, Some(query.page))
        .await
        .map_err(|e| ApiError::internal("fetching transactions", e))?;

    Ok(Json(records))
}

/// Every stored record, unfiltered
pub async fn combined_data(State(state): State<ApiState>) -> ApiResult<Json<Vec<StoredTransaction>>> {
    let records = state
        .store
        .find(&RecordFilter::all(), None)
        .await
        .map_err(|e| ApiError::new("fetching data", Reply::FetchFailed, e))?;

    Ok(Json(records))
}
