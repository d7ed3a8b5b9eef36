use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::{cors, handlers, state::ApiState, OriginPolicy};

pub fn create_router(state: ApiState, origins: OriginPolicy) -> Router {
    let cors_layer = origins.cors_layer();

    Router::new()
        // Import
        .route("/fetch-data", get(handlers::import::fetch_data))

        // Listings
        .route("/transactions", get(handlers::transactions::list_transactions))
        .route("/combinedData", get(handlers::transactions::combined_data))

        // Reports
        .route("/statistics", get(handlers::reports::statistics))
        .route("/barchart", get(handlers::reports::bar_chart))
        .route("/pie-chart", get(handlers::reports::pie_chart))

        // Add state
        .with_state(state)

        // Origin allow-list, then CORS headers and preflight
        .layer(middleware::from_fn_with_state(origins, cors::enforce_origin))
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
}
