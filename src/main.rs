// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::application::dashboard_service::DashboardService;
use crate::application::model_storage::ModelStorage;
use crate::application::model_store::ModelStore;
use crate::infrastructure::config::{load_app_config, StorageBackend, StorageSettings};
use crate::infrastructure::file_storage::FileModelStorage;
use crate::infrastructure::memory_storage::MemoryModelStorage;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    add_cluster, add_workload, export_model, get_dashboard, get_model, health_check,
    import_model, move_workload, remove_cluster, remove_workload, rename_cluster,
    set_cluster_capacity, set_workload_field,
};

fn build_storage(settings: &StorageSettings) -> Arc<dyn ModelStorage> {
    match settings.backend {
        StorageBackend::File => {
            let storage = FileModelStorage::new(&settings.directory);
            tracing::info!("Persisting model under {}", storage.directory().display());
            Arc::new(storage)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, edits are lost on exit");
            Arc::new(MemoryModelStorage::new())
        }
    }
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/model", get(get_model))
        .route("/dashboard", get(get_dashboard))
        .route("/clusters", post(add_cluster))
        .route("/clusters/:cluster_id", delete(remove_cluster))
        .route("/clusters/:cluster_id/name", put(rename_cluster))
        .route("/clusters/:cluster_id/capacity", put(set_cluster_capacity))
        .route("/clusters/:cluster_id/workloads", post(add_workload))
        .route(
            "/clusters/:cluster_id/workloads/:workload_id",
            put(set_workload_field).delete(remove_workload),
        )
        .route("/moves", post(move_workload))
        .route("/export", get(export_model))
        .route("/import", post(import_model))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = load_app_config()?;

    // Restore the model (application layer) from the configured storage (infrastructure layer)
    let storage = build_storage(&config.storage);
    let model_store = ModelStore::restore(storage, config.storage.key.clone());
    let dashboard_service = DashboardService::new(config.view);

    let state = Arc::new(AppState::new(model_store, dashboard_service));

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;
    tracing::info!("Starting cluster-growth-modeler on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
