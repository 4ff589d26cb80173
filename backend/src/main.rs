//! Backend entry-point: loads settings, restores the grievance store, and
//! serves the REST endpoints with OpenAPI docs in debug builds.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use grievance_backend::config::GrievanceSettings;
use grievance_backend::domain::GrievanceStore;
use grievance_backend::inbound::http::health::HealthState;
use grievance_backend::inbound::http::state::HttpState;
use grievance_backend::outbound::persistence::JsonSnapshotRepository;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = GrievanceSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let http_state = build_http_state(&settings).await;
    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(bind_addr)
        .with_cors_allow_origin(settings.cors_allow_origin())
        .with_test_data(settings.test_data_enabled);

    let server = create_server(health_state, http_state, config)?;
    info!(%bind_addr, "grievance API listening");
    server.await
}

async fn build_http_state(settings: &GrievanceSettings) -> web::Data<HttpState> {
    let data_file = settings.data_file();
    info!(path = %data_file.display(), "opening grievance snapshot");
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let repository = Arc::new(JsonSnapshotRepository::new(data_file));
    let store = GrievanceStore::open(repository, clock.clone()).await;
    web::Data::new(HttpState::from_store(Arc::new(store), clock))
}
