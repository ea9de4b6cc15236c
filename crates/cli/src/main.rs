use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use directory_models::{
    ActivityNode, CreateOrganizationRequest, ErrorShape, Organization, Phone,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "directory-cli")]
#[command(about = "CLI tool for the Company Directory API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, default_value = "http://localhost:8000")]
    endpoint: String,

    #[arg(long, env = "API_KEY", default_value = "SECRET_KEY123")]
    api_key: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show one organization
    Get {
        /// Organization ID
        id: i64,
    },
    /// Organizations in a building
    Building {
        /// Building ID
        id: i64,
    },
    /// Organizations directly tagged with an activity
    Activity {
        /// Activity ID
        id: i64,
    },
    /// List the activity hierarchy
    Activities,
    /// Organizations within a radius of a point
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Radius in meters
        #[arg(long, default_value = "1000")]
        radius: f64,
    },
    /// Search by activity, including nested kinds
    SearchActivity {
        /// Part of a top-level activity name
        name: String,
    },
    /// Search by part of the organization name
    SearchName {
        name: String,
    },
    /// Add an organization
    Create {
        /// Organization name
        name: String,
        /// Building ID
        building_id: i64,
        /// Phone number (repeatable)
        #[arg(long = "phone")]
        phones: Vec<String>,
        /// Activity ID (repeatable)
        #[arg(long = "activity")]
        activities: Vec<i64>,
    },
}

struct DirectoryClient {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl DirectoryClient {
    fn new(endpoint: &str, api_key: &str) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http
            .get(self.url(path))
            .header("X-API-Key", &self.api_key)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.http
            .post(self.url(path))
            .header("X-API-Key", &self.api_key)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await?;
        let detail = serde_json::from_str::<ErrorShape>(&text)
            .map(|shape| shape.detail)
            .unwrap_or(text);
        error!("Request failed with {}: {}", status, detail);
        bail!("{}: {}", status, detail)
    }
}

fn print_organization(organization: &Organization) {
    println!("🏢 {} (#{})", organization.name, organization.id);
    println!(
        "   Address: {} ({}, {})",
        organization.building.address, organization.building.latitude, organization.building.longitude
    );
    for phone in &organization.phones {
        println!("   Phone: {}", phone.number);
    }
    for activity in &organization.activities {
        println!("   Activity: {} (#{})", activity.name, activity.id);
    }
}

fn print_organizations(organizations: &[Organization]) {
    if organizations.is_empty() {
        println!("No organizations found");
        return;
    }
    for organization in organizations {
        print_organization(organization);
    }
}

fn print_activities(activities: &[ActivityNode]) {
    println!("📋 Activities:");
    for activity in activities {
        match activity.parent_id {
            Some(parent) => println!("   • {} (#{}, parent #{})", activity.name, activity.id, parent),
            None => println!("   • {} (#{})", activity.name, activity.id),
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let client = DirectoryClient::new(&cli.endpoint, &cli.api_key);

    match cli.command {
        Commands::Get { id } => {
            info!("Fetching organization {}", id);
            let organization: Organization = client.send(client.get(&format!("/organizations/{id}"))).await?;
            print_organization(&organization);
        }
        Commands::Building { id } => {
            let organizations: Vec<Organization> = client
                .send(client.get(&format!("/buildings/{id}/organizations")))
                .await?;
            print_organizations(&organizations);
        }
        Commands::Activity { id } => {
            let organizations: Vec<Organization> = client
                .send(client.get(&format!("/activities/{id}/organizations")))
                .await?;
            print_organizations(&organizations);
        }
        Commands::Activities => {
            let activities: Vec<ActivityNode> = client.send(client.get("/activities")).await?;
            print_activities(&activities);
        }
        Commands::Nearby { lat, lon, radius } => {
            let request = client
                .get("/organizations/nearby")
                .query(&[("lat", lat), ("lon", lon), ("radius", radius)]);
            let organizations: Vec<Organization> = client.send(request).await?;
            print_organizations(&organizations);
        }
        Commands::SearchActivity { name } => {
            let request = client
                .get("/organizations/search/activity")
                .query(&[("activity_name", name)]);
            let organizations: Vec<Organization> = client.send(request).await?;
            print_organizations(&organizations);
        }
        Commands::SearchName { name } => {
            let request = client
                .get("/organizations/search/name")
                .query(&[("name", name)]);
            let organizations: Vec<Organization> = client.send(request).await?;
            print_organizations(&organizations);
        }
        Commands::Create {
            name,
            building_id,
            phones,
            activities,
        } => {
            info!("Creating organization: {}", name);
            let request = CreateOrganizationRequest {
                name,
                building_id,
                phones: phones.into_iter().map(|number| Phone { number }).collect(),
                activity_ids: activities,
            };
            let organization: Organization =
                client.send(client.post("/organizations/").json(&request)).await?;
            println!("✅ Organization created successfully:");
            print_organization(&organization);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    run(Cli::parse()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create_with_repeated_flags() {
        let cli = Cli::try_parse_from([
            "directory-cli",
            "create",
            "Новая",
            "2",
            "--phone",
            "1-111",
            "--phone",
            "2-222",
            "--activity",
            "5",
        ])
        .unwrap();

        match cli.command {
            Commands::Create {
                name,
                building_id,
                phones,
                activities,
            } => {
                assert_eq!(name, "Новая");
                assert_eq!(building_id, 2);
                assert_eq!(phones, vec!["1-111", "2-222"]);
                assert_eq!(activities, vec![5]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_nearby_with_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "directory-cli",
            "--endpoint",
            "http://directory:8000/",
            "nearby",
            "--lat",
            "-33.9",
            "--lon",
            "151.2",
        ])
        .unwrap();

        assert_eq!(cli.endpoint, "http://directory:8000/");
        match cli.command {
            Commands::Nearby { lat, lon, radius } => {
                assert_eq!(lat, -33.9);
                assert_eq!(lon, 151.2);
                assert_eq!(radius, 1000.0);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn client_joins_endpoint_and_path() {
        let client = DirectoryClient::new("http://localhost:8000/", "key");
        assert_eq!(client.url("/activities"), "http://localhost:8000/activities");
    }
}
