use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::*;
use directory_models::{
    Activity, ActivityNode, Building, CreateOrganizationRequest, ErrorShape, Organization, Phone,
};

pub const DOCS_PATH: &str = "/api/docs";
pub const OPENAPI_PATH: &str = "/api/openapi.json";
pub const REDOC_PATH: &str = "/api/redoc";

struct ApiKeyAddon;

impl Modify for ApiKeyAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-Key"))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        get_orgs_by_building,
        get_orgs_by_activity,
        list_activities,
        get_orgs_in_radius,
        get_organization,
        search_orgs_by_activity_tree,
        search_orgs_by_name,
        create_organization,
        health_check,
        metrics,
    ),
    components(
        schemas(
            Organization,
            Building,
            Activity,
            ActivityNode,
            Phone,
            CreateOrganizationRequest,
            ErrorShape,
        )
    ),
    modifiers(&ApiKeyAddon),
    tags(
        (name = "organizations", description = "Organizations, buildings and activities"),
        (name = "search", description = "Organization search"),
        (name = "activities", description = "Activity hierarchy"),
        (name = "health", description = "Health and monitoring endpoints"),
    ),
    info(
        title = "Company Directory API",
        description = "Directory of organizations, the buildings they occupy and their activities",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

pub fn create_swagger_ui() -> SwaggerUi {
    SwaggerUi::new(DOCS_PATH).url(OPENAPI_PATH, ApiDoc::openapi())
}

pub fn create_redoc() -> Redoc<'static, 'static, utoipa::openapi::OpenApi> {
    Redoc::with_url(REDOC_PATH, ApiDoc::openapi())
}
