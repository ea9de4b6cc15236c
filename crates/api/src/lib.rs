pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use handlers::*;
pub use middleware::*;
pub use routes::*;
pub use state::*;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::future::Future;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Full application: directory routes plus tracing, CORS and body limit.
pub fn build_app(state: AppState) -> Router {
    let body_size_limit = (state.config.server.max_request_body_size_kb * 1024) as usize;

    build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(DefaultBodyLimit::max(body_size_limit)),
    )
}

pub async fn start_server(
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let bind = state.config.server.bind.clone();
    let port = state.config.server.port;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(format!("{bind}:{port}")).await?;
    info!("Directory API listening on {}:{}", bind, port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
