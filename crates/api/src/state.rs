use directory_catalog::Catalog;
use directory_metrics::MetricsService;
use directory_models::Config;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<Catalog>,
    pub metrics: Arc<MetricsService>,
}

impl AppState {
    pub fn new(config: Config, catalog: Arc<Catalog>, metrics: Arc<MetricsService>) -> Self {
        Self {
            config,
            catalog,
            metrics,
        }
    }
}
