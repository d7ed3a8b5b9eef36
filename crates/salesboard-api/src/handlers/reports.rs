use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use salesboard_core::{BandCount, CategoryCount, MonthParams, SalesSummary};

use crate::{error::ApiResult, state::ApiState, ApiError};

/// Sale total plus sold / not-sold counts for a month
pub async fn statistics(
    State(state): State<ApiState>,
    params: Result<Query<MonthParams>, QueryRejection>,
) -> ApiResult<Json<SalesSummary>> {
    let Query(params) = params.map_err(|e| ApiError::internal("fetching statistics", e))?;
    let filter = params.translate(&state.date_matching);
    let sold = filter.clone().with_sold(true);
    let not_sold = filter.clone().with_sold(false);

    let (total_sale_amount, total_sold_items, total_not_sold_items) = tokio::try_join!(
        state.store.sum_price(&filter),
        state.store.count(&sold),
        state.store.count(&not_sold),
    )
    .map_err(|e| ApiError::internal("fetching statistics", e))?;

    Ok(Json(SalesSummary {
        total_sale_amount,
        total_sold_items,
        total_not_sold_items,
    }))
}

/// Price-band histogram for a month
pub async fn bar_chart(
    State(state): State<ApiState>,
    params: Result<Query<MonthParams>, QueryRejection>,
) -> ApiResult<Json<Vec<BandCount>>> {
    let Query(params) = params.map_err(|e| ApiError::internal("fetching bar chart data", e))?;
    let filter = params.translate(&state.date_matching);

    let bands = state
        .store
        .count_by_price_band(&filter)
        .await
        .map_err(|e| ApiError::internal("fetching bar chart data", e))?;

    Ok(Json(bands))
}

/// Per-category counts for a month
pub async fn pie_chart(
    State(state): State<ApiState>,
    params: Result<Query<MonthParams>, QueryRejection>,
) -> ApiResult<Json<Vec<CategoryCount>>> {
    let Query(params) = params.map_err(|e| ApiError::internal("fetching pie chart data", e))?;
    let filter = params.translate(&state.date_matching);

    let categories = state
        .store
        .count_by_category(&filter)
        .await
        .map_err(|e| ApiError::internal("fetching pie chart data", e))?;

    Ok(Json(categories))
}
