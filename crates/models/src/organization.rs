use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct Building {
    pub id: i64,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct Activity {
    pub id: i64,
    pub name: String,
}

/// Activity row including its place in the hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ActivityNode {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
}

impl From<ActivityNode> for Activity {
    fn from(node: ActivityNode) -> Self {
        Activity {
            id: node.id,
            name: node.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct Phone {
    pub number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub building_id: i64,
    pub phones: Vec<Phone>,
    pub activities: Vec<Activity>,
    pub building: Building,
}

// Request/Response types for API

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateOrganizationRequest {
    pub name: String,
    pub building_id: i64,
    #[serde(default)]
    pub phones: Vec<Phone>,
    #[serde(default)]
    pub activity_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NearbyQuery {
    /// Latitude of the centre point
    pub lat: f64,
    /// Longitude of the centre point
    pub lon: f64,
    /// Search radius in metres
    #[serde(default = "default_radius")]
    pub radius: f64,
}

pub const DEFAULT_RADIUS_M: f64 = 1000.0;

fn default_radius() -> f64 {
    DEFAULT_RADIUS_M
}

#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActivitySearchQuery {
    /// Name (or part of the name) of a top-level activity
    pub activity_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NameSearchQuery {
    /// Part of the organization name
    pub name: String,
}
