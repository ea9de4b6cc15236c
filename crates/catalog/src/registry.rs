use crate::activity_tree::{contains_ignore_case, ActivityTree, MAX_ACTIVITY_DEPTH};
use crate::geo::{geodesic_distance_m, GeoPoint};
use crate::migrations;
use crate::seed;
use directory_models::{
    Activity, ActivityNode, Building, CreateOrganizationRequest, DirectoryError, Organization,
    Phone,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

const ORGANIZATION_SELECT: &str = r#"
    SELECT o.id, o.name, o.building_id, b.address, b.latitude, b.longitude
    FROM organizations o
    JOIN buildings b ON b.id = o.building_id
"#;

const MAX_NAME_LEN: usize = 255;
const MAX_PHONE_LEN: usize = 50;

/// Organization row joined with its building, before phones and
/// activities are attached.
struct OrganizationRow {
    id: i64,
    name: String,
    building: Building,
}

pub struct Catalog {
    pool: SqlitePool,
}

impl Catalog {
    pub async fn new(pool: SqlitePool) -> Result<Self, DirectoryError> {
        // Run embedded migrations
        migrations::run_migrations(&pool)
            .await
            .map_err(|e| DirectoryError::DatabaseError {
                reason: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert the demo data set when the catalog has no buildings yet.
    pub async fn seed_if_empty(&self) -> Result<bool, DirectoryError> {
        seed::seed_if_empty(&self.pool).await
    }

    #[instrument(skip(self))]
    pub async fn organizations_in_building(
        &self,
        building_id: i64,
    ) -> Result<Vec<Organization>, DirectoryError> {
        let rows = sqlx::query(&format!(
            "{ORGANIZATION_SELECT} WHERE o.building_id = ? ORDER BY o.id"
        ))
        .bind(building_id)
        .fetch_all(&self.pool)
        .await?;

        self.hydrate(rows.iter().map(row_to_organization).collect::<Result<_, _>>()?)
            .await
    }

    /// Organizations tagged with exactly this activity; descendants are not
    /// included.
    #[instrument(skip(self))]
    pub async fn organizations_with_activity(
        &self,
        activity_id: i64,
    ) -> Result<Vec<Organization>, DirectoryError> {
        self.organizations_with_any_activity(&[activity_id]).await
    }

    #[instrument(skip(self))]
    pub async fn organizations_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_m: f64,
    ) -> Result<Vec<Organization>, DirectoryError> {
        let center = GeoPoint::new(latitude, longitude)?;
        if radius_m.is_nan() {
            return Err(DirectoryError::invalid("radius must be a number"));
        }
        if radius_m < 0.0 {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(&format!("{ORGANIZATION_SELECT} ORDER BY o.id"))
            .fetch_all(&self.pool)
            .await?;

        let mut within = Vec::new();
        for row in rows.iter() {
            let organization = row_to_organization(row)?;
            let location = GeoPoint {
                latitude: organization.building.latitude,
                longitude: organization.building.longitude,
            };
            if geodesic_distance_m(center, location) <= radius_m {
                within.push(organization);
            }
        }
        debug!("{} of {} organizations within {} m", within.len(), rows.len(), radius_m);

        self.hydrate(within).await
    }

    #[instrument(skip(self))]
    pub async fn get_organization(&self, id: i64) -> Result<Organization, DirectoryError> {
        let row = sqlx::query(&format!("{ORGANIZATION_SELECT} WHERE o.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DirectoryError::OrganizationNotFound {
                organization_id: id,
            })?;

        let mut organizations = self.hydrate(vec![row_to_organization(&row)?]).await?;
        organizations
            .pop()
            .ok_or_else(|| DirectoryError::InternalError {
                reason: format!("organization {id} vanished while loading"),
            })
    }

    /// Organizations practising the first top-level activity whose name
    /// contains `activity_name`, including nested activity kinds.
    #[instrument(skip(self))]
    pub async fn search_by_activity(
        &self,
        activity_name: &str,
    ) -> Result<Vec<Organization>, DirectoryError> {
        let activities = self.list_activities().await?;
        let tree = ActivityTree::from_activities(&activities);

        let Some(root) = tree.first_root_matching(activity_name) else {
            debug!("No root activity matches {:?}", activity_name);
            return Ok(Vec::new());
        };

        let ids = tree.subtree_ids(root.id, MAX_ACTIVITY_DEPTH);
        debug!("Activity {} expands to {:?}", root.name, ids);
        self.organizations_with_any_activity(&ids).await
    }

    #[instrument(skip(self))]
    pub async fn search_by_name(&self, fragment: &str) -> Result<Vec<Organization>, DirectoryError> {
        // SQLite's LIKE only folds ASCII case, so matching happens here.
        let rows = sqlx::query(&format!("{ORGANIZATION_SELECT} ORDER BY o.id"))
            .fetch_all(&self.pool)
            .await?;

        let mut matches = Vec::new();
        for row in rows.iter() {
            let organization = row_to_organization(row)?;
            if contains_ignore_case(&organization.name, fragment) {
                matches.push(organization);
            }
        }

        self.hydrate(matches).await
    }

    #[instrument(skip(self))]
    pub async fn create_organization(
        &self,
        request: CreateOrganizationRequest,
    ) -> Result<Organization, DirectoryError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(DirectoryError::invalid("name must not be empty"));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(DirectoryError::invalid(format!(
                "name must be at most {MAX_NAME_LEN} characters"
            )));
        }
        for phone in &request.phones {
            let number = phone.number.trim();
            if number.is_empty() || number.chars().count() > MAX_PHONE_LEN {
                return Err(DirectoryError::invalid(format!(
                    "phone number must be 1 to {MAX_PHONE_LEN} characters"
                )));
            }
        }

        let mut tx = self.pool.begin().await?;

        let building_exists = sqlx::query("SELECT 1 FROM buildings WHERE id = ?")
            .bind(request.building_id)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !building_exists {
            return Err(DirectoryError::BuildingNotFound {
                building_id: request.building_id,
            });
        }

        let organization_id = sqlx::query("INSERT INTO organizations (name, building_id) VALUES (?, ?)")
            .bind(name)
            .bind(request.building_id)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        for phone in &request.phones {
            sqlx::query("INSERT INTO phones (number, organization_id) VALUES (?, ?)")
                .bind(phone.number.trim())
                .bind(organization_id)
                .execute(&mut *tx)
                .await?;
        }

        // Unknown activity ids are skipped; repeated ids collapse to one link.
        let mut linked = 0;
        for activity_id in &request.activity_ids {
            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO organization_activity (organization_id, activity_id)
                SELECT ?, id FROM activities WHERE id = ?
                "#,
            )
            .bind(organization_id)
            .bind(activity_id)
            .execute(&mut *tx)
            .await?;
            linked += result.rows_affected();
        }

        tx.commit().await?;

        info!(
            organization_id,
            building_id = request.building_id,
            phones = request.phones.len(),
            activities = linked,
            "Created organization: {}",
            name
        );
        self.get_organization(organization_id).await
    }

    #[instrument(skip(self))]
    pub async fn list_activities(&self) -> Result<Vec<ActivityNode>, DirectoryError> {
        let rows = sqlx::query("SELECT id, name, parent_id FROM activities ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| -> Result<ActivityNode, DirectoryError> {
                Ok(ActivityNode {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    parent_id: row.try_get("parent_id")?,
                })
            })
            .collect()
    }

    async fn organizations_with_any_activity(
        &self,
        activity_ids: &[i64],
    ) -> Result<Vec<Organization>, DirectoryError> {
        if activity_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(ORGANIZATION_SELECT);
        query.push(
            " WHERE o.id IN (SELECT organization_id FROM organization_activity WHERE activity_id IN (",
        );
        push_id_list(&mut query, activity_ids);
        query.push(")) ORDER BY o.id");

        let rows = query.build().fetch_all(&self.pool).await?;
        self.hydrate(rows.iter().map(row_to_organization).collect::<Result<_, _>>()?)
            .await
    }

    /// Attach phones and activities to each organization row, one query
    /// per relation.
    async fn hydrate(
        &self,
        rows: Vec<OrganizationRow>,
    ) -> Result<Vec<Organization>, DirectoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT organization_id, number FROM phones WHERE organization_id IN (");
        push_id_list(&mut query, &ids);
        query.push(") ORDER BY id");

        let mut phones: HashMap<i64, Vec<Phone>> = HashMap::new();
        for row in query.build().fetch_all(&self.pool).await? {
            phones
                .entry(row.try_get("organization_id")?)
                .or_default()
                .push(Phone {
                    number: row.try_get("number")?,
                });
        }

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT oa.organization_id, a.id, a.name
            FROM activities a
            JOIN organization_activity oa ON oa.activity_id = a.id
            WHERE oa.organization_id IN ("#,
        );
        push_id_list(&mut query, &ids);
        query.push(") ORDER BY a.id");

        let mut activities: HashMap<i64, Vec<Activity>> = HashMap::new();
        for row in query.build().fetch_all(&self.pool).await? {
            activities
                .entry(row.try_get("organization_id")?)
                .or_default()
                .push(Activity {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                });
        }

        Ok(rows
            .into_iter()
            .map(|row| Organization {
                id: row.id,
                name: row.name,
                building_id: row.building.id,
                phones: phones.remove(&row.id).unwrap_or_default(),
                activities: activities.remove(&row.id).unwrap_or_default(),
                building: row.building,
            })
            .collect())
    }
}

fn push_id_list(query: &mut QueryBuilder<'_, Sqlite>, ids: &[i64]) {
    let mut list = query.separated(", ");
    for id in ids {
        list.push_bind(*id);
    }
}

fn row_to_organization(row: &SqliteRow) -> Result<OrganizationRow, DirectoryError> {
    Ok(OrganizationRow {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        building: Building {
            id: row.try_get("building_id")?,
            address: row.try_get("address")?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
        },
    })
}
