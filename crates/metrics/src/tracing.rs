use directory_models::{Config, Organization};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub struct TracingService;

impl TracingService {
    /// Install the global subscriber. `RUST_LOG` controls the filter
    /// (default `info`); `DIRECTORY_LOG_JSON=1` switches to JSON lines.
    pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let json = std::env::var("DIRECTORY_LOG_JSON")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        if json {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .try_init()?;
        } else {
            tracing_subscriber::fmt().with_env_filter(filter).try_init()?;
        }

        Ok(())
    }

    pub fn log_config(config: &Config) {
        info!(
            bind = %config.server.bind,
            port = config.server.port,
            data_dir = %config.data.dir,
            db_url = %config.data.db_url,
            seed = config.seed.enabled,
            "Configuration loaded"
        );
    }

    pub fn log_organization_created(organization: &Organization) {
        info!(
            organization_id = organization.id,
            organization_name = %organization.name,
            building_id = organization.building_id,
            phones = organization.phones.len(),
            activities = organization.activities.len(),
            "Organization created"
        );
    }

    pub fn log_api_key_rejected(path: &str, reason: &str) {
        warn!(
            path = %path,
            reason = %reason,
            "Request rejected by API key check"
        );
    }
}
