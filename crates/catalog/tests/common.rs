use directory_catalog::Catalog;
use directory_models::{CreateOrganizationRequest, Phone};
use sqlx::sqlite::SqlitePoolOptions;

/// Fresh in-memory catalog. A single connection keeps every query on the
/// same in-memory database.
#[allow(dead_code)]
pub async fn empty_catalog() -> Catalog {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    Catalog::new(pool).await.unwrap()
}

#[allow(dead_code)]
pub async fn seeded_catalog() -> Catalog {
    let catalog = empty_catalog().await;
    assert!(catalog.seed_if_empty().await.unwrap());
    catalog
}

#[allow(dead_code)]
pub fn create_request(name: &str, building_id: i64, activity_ids: Vec<i64>) -> CreateOrganizationRequest {
    CreateOrganizationRequest {
        name: name.to_string(),
        building_id,
        phones: vec![Phone {
            number: "8-800-000-00-00".to_string(),
        }],
        activity_ids,
    }
}

#[allow(dead_code)]
pub fn names(organizations: &[directory_models::Organization]) -> Vec<&str> {
    organizations.iter().map(|o| o.name.as_str()).collect()
}
