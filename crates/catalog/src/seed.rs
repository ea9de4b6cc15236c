use directory_models::DirectoryError;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::info;

struct SeedBuilding {
    address: &'static str,
    latitude: f64,
    longitude: f64,
}

/// `parent` indexes into `ACTIVITIES`.
struct SeedActivity {
    name: &'static str,
    parent: Option<usize>,
}

/// `building` indexes into `BUILDINGS`, `activities` into `ACTIVITIES`.
struct SeedOrganization {
    name: &'static str,
    building: usize,
    phones: &'static [&'static str],
    activities: &'static [usize],
}

const BUILDINGS: &[SeedBuilding] = &[
    SeedBuilding {
        address: "г. Москва, ул. Ленина 1, офис 3",
        latitude: 55.755826,
        longitude: 37.617300,
    },
    SeedBuilding {
        address: "г. Москва, ул. Гагарина 15",
        latitude: 55.752565,
        longitude: 37.621258,
    },
];

const ACTIVITIES: &[SeedActivity] = &[
    SeedActivity { name: "Еда", parent: None },
    SeedActivity { name: "Мясная продукция", parent: Some(0) },
    SeedActivity { name: "Молочная продукция", parent: Some(0) },
    SeedActivity { name: "Автомобили", parent: None },
    SeedActivity { name: "Грузовые", parent: Some(3) },
    SeedActivity { name: "Легковые", parent: Some(3) },
    SeedActivity { name: "Запчасти", parent: Some(5) },
    SeedActivity { name: "Аксессуары", parent: Some(5) },
];

const ORGANIZATIONS: &[SeedOrganization] = &[
    SeedOrganization {
        name: "ООО Рога и Копыта",
        building: 0,
        phones: &["2-222-222", "3-333-333"],
        activities: &[1, 2],
    },
    SeedOrganization {
        name: "АвтоМир",
        building: 1,
        phones: &["8-923-666-13-13"],
        activities: &[4, 6],
    },
];

pub(crate) async fn seed_if_empty(pool: &SqlitePool) -> Result<bool, DirectoryError> {
    let buildings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM buildings")
        .fetch_one(pool)
        .await?;
    if buildings > 0 {
        info!("Catalog already holds {} buildings, skipping seed", buildings);
        return Ok(false);
    }

    let mut tx = pool.begin().await?;
    insert_demo_data(&mut tx).await?;
    tx.commit().await?;

    info!(
        buildings = BUILDINGS.len(),
        activities = ACTIVITIES.len(),
        organizations = ORGANIZATIONS.len(),
        "Test data seeded successfully"
    );
    Ok(true)
}

async fn insert_demo_data(tx: &mut Transaction<'_, Sqlite>) -> Result<(), DirectoryError> {
    let mut building_ids = Vec::with_capacity(BUILDINGS.len());
    for building in BUILDINGS {
        let id = sqlx::query("INSERT INTO buildings (address, latitude, longitude) VALUES (?, ?, ?)")
            .bind(building.address)
            .bind(building.latitude)
            .bind(building.longitude)
            .execute(&mut **tx)
            .await?
            .last_insert_rowid();
        building_ids.push(id);
    }

    // Parents always precede their children in ACTIVITIES.
    let mut activity_ids: Vec<i64> = Vec::with_capacity(ACTIVITIES.len());
    for activity in ACTIVITIES {
        let parent_id = activity.parent.map(|index| activity_ids[index]);
        let id = sqlx::query("INSERT INTO activities (name, parent_id) VALUES (?, ?)")
            .bind(activity.name)
            .bind(parent_id)
            .execute(&mut **tx)
            .await?
            .last_insert_rowid();
        activity_ids.push(id);
    }

    for organization in ORGANIZATIONS {
        let organization_id =
            sqlx::query("INSERT INTO organizations (name, building_id) VALUES (?, ?)")
                .bind(organization.name)
                .bind(building_ids[organization.building])
                .execute(&mut **tx)
                .await?
                .last_insert_rowid();

        for number in organization.phones {
            sqlx::query("INSERT INTO phones (number, organization_id) VALUES (?, ?)")
                .bind(*number)
                .bind(organization_id)
                .execute(&mut **tx)
                .await?;
        }

        for index in organization.activities {
            sqlx::query(
                "INSERT INTO organization_activity (organization_id, activity_id) VALUES (?, ?)",
            )
            .bind(organization_id)
            .bind(activity_ids[*index])
            .execute(&mut **tx)
            .await?;
        }
    }

    Ok(())
}
