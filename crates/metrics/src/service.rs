use directory_models::DirectoryError;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use tracing::{debug, instrument};

pub struct MetricsService {
    registry: Registry,
    requests_total: IntCounterVec,
    errors_total: IntCounterVec,
    api_key_rejections_total: IntCounterVec,
    organizations_created_total: IntCounter,
}

fn internal(e: impl std::fmt::Display) -> DirectoryError {
    DirectoryError::InternalError {
        reason: e.to_string(),
    }
}

impl MetricsService {
    pub fn new() -> Result<Self, DirectoryError> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new(
                "directory_requests_total",
                "Total number of directory API requests",
            ),
            &["endpoint"],
        )
        .map_err(internal)?;

        let errors_total = IntCounterVec::new(
            Opts::new(
                "directory_errors_total",
                "Total number of directory API errors",
            ),
            &["endpoint", "error_type"],
        )
        .map_err(internal)?;

        let api_key_rejections_total = IntCounterVec::new(
            Opts::new(
                "directory_api_key_rejections_total",
                "Requests rejected by API key check",
            ),
            &["reason"],
        )
        .map_err(internal)?;

        let organizations_created_total = IntCounter::new(
            "directory_organizations_created_total",
            "Total number of organizations created",
        )
        .map_err(internal)?;

        // Register metrics
        registry
            .register(Box::new(requests_total.clone()))
            .map_err(internal)?;
        registry
            .register(Box::new(errors_total.clone()))
            .map_err(internal)?;
        registry
            .register(Box::new(api_key_rejections_total.clone()))
            .map_err(internal)?;
        registry
            .register(Box::new(organizations_created_total.clone()))
            .map_err(internal)?;

        Ok(Self {
            registry,
            requests_total,
            errors_total,
            api_key_rejections_total,
            organizations_created_total,
        })
    }

    pub fn record_request(&self, endpoint: &str) {
        self.requests_total.with_label_values(&[endpoint]).inc();
    }

    #[instrument(skip(self))]
    pub fn record_error(&self, endpoint: &str, error_type: &str) {
        self.errors_total
            .with_label_values(&[endpoint, error_type])
            .inc();
        debug!("Recorded error for endpoint: {} - type: {}", endpoint, error_type);
    }

    pub fn record_api_key_rejection(&self, reason: &str) {
        self.api_key_rejections_total
            .with_label_values(&[reason])
            .inc();
    }

    #[instrument(skip(self))]
    pub fn record_organization_created(&self, organization_id: i64) {
        self.organizations_created_total.inc();
        debug!("Recorded organization creation: {}", organization_id);
    }

    pub fn get_prometheus_metrics(&self) -> Result<String, DirectoryError> {
        let metric_families = self.registry.gather();
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();

        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(internal)?;

        String::from_utf8(buffer).map_err(internal)
    }
}
