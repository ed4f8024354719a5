use axum::routing::get;
use axum::Router;
use katastr_core::CorsConfig;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::cors::build_cors_layer;
use crate::handlers::{buildings, health, parcels, proceedings, units, version};
use crate::state::AppState;

/// Build the full router: `/health` plus the `/api` resource routes.
pub fn build_router(state: AppState, cors: &CorsConfig) -> Router {
    let api = Router::new()
        .route("/version", get(version::version))
        // Parcels
        .route("/parcels/search", get(parcels::search))
        .route("/parcels/polygon", get(parcels::polygon))
        .route("/parcels/neighbors/{id}", get(parcels::neighbors))
        .route("/parcels/{id}", get(parcels::get))
        // Buildings
        .route("/buildings/search", get(buildings::search))
        .route("/buildings/{id}", get(buildings::get))
        // Units
        .route("/units/search", get(units::search))
        .route("/units/{id}", get(units::get))
        // Proceedings
        .route("/proceedings/{id}", get(proceedings::get));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer(cors)),
        )
        .with_state(state)
}
