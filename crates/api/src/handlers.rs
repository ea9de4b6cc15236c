use axum::{
    extract::State,
    http::StatusCode,
    response::{Json, Redirect},
};
use directory_metrics::TracingService;
use directory_models::{
    ActivityNode, ActivitySearchQuery, CreateOrganizationRequest, DirectoryError, ErrorShape,
    NameSearchQuery, NearbyQuery, Organization,
};
use tracing::{error, info, instrument, warn};

use crate::extract::{ValidJson, ValidPath, ValidQuery};
use crate::AppState;

type ApiError = (StatusCode, Json<ErrorShape>);

fn reject(state: &AppState, endpoint: &str, e: DirectoryError) -> ApiError {
    let status = StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!("{} failed: {}", endpoint, e);
    } else {
        warn!("{} rejected: {}", endpoint, e);
    }
    state.metrics.record_error(endpoint, e.error_type());
    (status, Json(e.to_error_shape()))
}

/// Organizations located in a building
#[utoipa::path(
    get,
    path = "/buildings/{building_id}/organizations",
    tag = "organizations",
    params(("building_id" = i64, Path, description = "Building ID")),
    responses(
        (status = 200, description = "Organizations in the building", body = [Organization]),
        (status = 401, description = "Missing API key", body = ErrorShape),
        (status = 403, description = "Invalid API key", body = ErrorShape)
    ),
    security(("api_key" = []))
)]
#[instrument(skip(state))]
pub async fn get_orgs_by_building(
    State(state): State<AppState>,
    ValidPath(building_id): ValidPath<i64>,
) -> Result<Json<Vec<Organization>>, ApiError> {
    state.metrics.record_request("get_orgs_by_building");

    match state.catalog.organizations_in_building(building_id).await {
        Ok(organizations) => Ok(Json(organizations)),
        Err(e) => Err(reject(&state, "get_orgs_by_building", e)),
    }
}

/// Organizations directly tagged with an activity
#[utoipa::path(
    get,
    path = "/activities/{activity_id}/organizations",
    tag = "organizations",
    params(("activity_id" = i64, Path, description = "Activity ID")),
    responses(
        (status = 200, description = "Organizations with the activity", body = [Organization]),
        (status = 401, description = "Missing API key", body = ErrorShape),
        (status = 403, description = "Invalid API key", body = ErrorShape)
    ),
    security(("api_key" = []))
)]
#[instrument(skip(state))]
pub async fn get_orgs_by_activity(
    State(state): State<AppState>,
    ValidPath(activity_id): ValidPath<i64>,
) -> Result<Json<Vec<Organization>>, ApiError> {
    state.metrics.record_request("get_orgs_by_activity");

    match state.catalog.organizations_with_activity(activity_id).await {
        Ok(organizations) => Ok(Json(organizations)),
        Err(e) => Err(reject(&state, "get_orgs_by_activity", e)),
    }
}

/// All activity kinds with their parents
#[utoipa::path(
    get,
    path = "/activities",
    tag = "activities",
    responses(
        (status = 200, description = "Activity hierarchy as a flat list", body = [ActivityNode]),
        (status = 401, description = "Missing API key", body = ErrorShape),
        (status = 403, description = "Invalid API key", body = ErrorShape)
    ),
    security(("api_key" = []))
)]
#[instrument(skip(state))]
pub async fn list_activities(
    State(state): State<AppState>,
) -> Result<Json<Vec<ActivityNode>>, ApiError> {
    state.metrics.record_request("list_activities");

    match state.catalog.list_activities().await {
        Ok(activities) => Ok(Json(activities)),
        Err(e) => Err(reject(&state, "list_activities", e)),
    }
}

/// Organizations within a radius of a point
#[utoipa::path(
    get,
    path = "/organizations/nearby",
    tag = "organizations",
    params(NearbyQuery),
    responses(
        (status = 200, description = "Organizations within the radius", body = [Organization]),
        (status = 400, description = "Coordinates out of range", body = ErrorShape),
        (status = 401, description = "Missing API key", body = ErrorShape),
        (status = 403, description = "Invalid API key", body = ErrorShape)
    ),
    security(("api_key" = []))
)]
#[instrument(skip(state))]
pub async fn get_orgs_in_radius(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<NearbyQuery>,
) -> Result<Json<Vec<Organization>>, ApiError> {
    state.metrics.record_request("get_orgs_in_radius");

    match state
        .catalog
        .organizations_nearby(query.lat, query.lon, query.radius)
        .await
    {
        Ok(organizations) => Ok(Json(organizations)),
        Err(e) => Err(reject(&state, "get_orgs_in_radius", e)),
    }
}

/// Full information about one organization
#[utoipa::path(
    get,
    path = "/organizations/{org_id}",
    tag = "organizations",
    params(("org_id" = i64, Path, description = "Organization ID")),
    responses(
        (status = 200, description = "The organization", body = Organization),
        (status = 404, description = "Organization not found", body = ErrorShape),
        (status = 401, description = "Missing API key", body = ErrorShape),
        (status = 403, description = "Invalid API key", body = ErrorShape)
    ),
    security(("api_key" = []))
)]
#[instrument(skip(state))]
pub async fn get_organization(
    State(state): State<AppState>,
    ValidPath(org_id): ValidPath<i64>,
) -> Result<Json<Organization>, ApiError> {
    state.metrics.record_request("get_organization");

    match state.catalog.get_organization(org_id).await {
        Ok(organization) => Ok(Json(organization)),
        Err(e) => Err(reject(&state, "get_organization", e)),
    }
}

/// Search by activity, including nested activity kinds
#[utoipa::path(
    get,
    path = "/organizations/search/activity",
    tag = "search",
    params(ActivitySearchQuery),
    responses(
        (status = 200, description = "Organizations practising the activity", body = [Organization]),
        (status = 401, description = "Missing API key", body = ErrorShape),
        (status = 403, description = "Invalid API key", body = ErrorShape)
    ),
    security(("api_key" = []))
)]
#[instrument(skip(state))]
pub async fn search_orgs_by_activity_tree(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ActivitySearchQuery>,
) -> Result<Json<Vec<Organization>>, ApiError> {
    state.metrics.record_request("search_orgs_by_activity_tree");

    match state.catalog.search_by_activity(&query.activity_name).await {
        Ok(organizations) => Ok(Json(organizations)),
        Err(e) => Err(reject(&state, "search_orgs_by_activity_tree", e)),
    }
}

/// Search by part of the organization name
#[utoipa::path(
    get,
    path = "/organizations/search/name",
    tag = "search",
    params(NameSearchQuery),
    responses(
        (status = 200, description = "Matching organizations", body = [Organization]),
        (status = 401, description = "Missing API key", body = ErrorShape),
        (status = 403, description = "Invalid API key", body = ErrorShape)
    ),
    security(("api_key" = []))
)]
#[instrument(skip(state))]
pub async fn search_orgs_by_name(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<NameSearchQuery>,
) -> Result<Json<Vec<Organization>>, ApiError> {
    state.metrics.record_request("search_orgs_by_name");

    match state.catalog.search_by_name(&query.name).await {
        Ok(organizations) => Ok(Json(organizations)),
        Err(e) => Err(reject(&state, "search_orgs_by_name", e)),
    }
}

/// Add an organization to the directory
#[utoipa::path(
    post,
    path = "/organizations/",
    tag = "organizations",
    request_body = CreateOrganizationRequest,
    responses(
        (status = 200, description = "The created organization", body = Organization),
        (status = 400, description = "Invalid request", body = ErrorShape),
        (status = 404, description = "Building not found", body = ErrorShape),
        (status = 401, description = "Missing API key", body = ErrorShape),
        (status = 403, description = "Invalid API key", body = ErrorShape)
    ),
    security(("api_key" = []))
)]
#[instrument(skip(state))]
pub async fn create_organization(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateOrganizationRequest>,
) -> Result<Json<Organization>, ApiError> {
    info!("Creating organization: {}", payload.name);
    state.metrics.record_request("create_organization");

    match state.catalog.create_organization(payload).await {
        Ok(organization) => {
            state.metrics.record_organization_created(organization.id);
            TracingService::log_organization_created(&organization);
            Ok(Json(organization))
        }
        Err(e) => Err(reject(&state, "create_organization", e)),
    }
}

pub async fn root_redirect() -> Redirect {
    Redirect::temporary("/api/docs")
}

#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn health_check() -> &'static str {
    "OK"
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "health",
    responses((status = 200, description = "Prometheus metrics", body = String))
)]
#[instrument(skip(state))]
pub async fn metrics(State(state): State<AppState>) -> Result<String, StatusCode> {
    match state.metrics.get_prometheus_metrics() {
        Ok(metrics) => Ok(metrics),
        Err(e) => {
            error!("Failed to get metrics: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
