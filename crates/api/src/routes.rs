use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use crate::{
    handlers::*,
    middleware::require_api_key,
    openapi::{create_redoc, create_swagger_ui},
    AppState,
};

/// Directory endpoints; every one of them needs a valid API key.
pub fn directory_routes() -> Router<AppState> {
    Router::new()
        .route("/buildings/:building_id/organizations", get(get_orgs_by_building))
        .route("/activities", get(list_activities))
        .route("/activities/:activity_id/organizations", get(get_orgs_by_activity))
        .route("/organizations/nearby", get(get_orgs_in_radius))
        .route("/organizations/search/activity", get(search_orgs_by_activity_tree))
        .route("/organizations/search/name", get(search_orgs_by_name))
        .route("/organizations/:org_id", get(get_organization))
        .route("/organizations/", post(create_organization))
        .route("/organizations", post(create_organization))
}

pub fn create_router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(directory_routes().route_layer(from_fn_with_state(state, require_api_key)))
        .route("/", get(root_redirect))
        .route("/healthz", get(health_check))
        .route("/metrics", get(metrics))
        .merge(create_swagger_ui())
        .merge(create_redoc())
}

pub fn build_router(state: AppState) -> Router {
    create_router(state.clone()).with_state(state)
}
