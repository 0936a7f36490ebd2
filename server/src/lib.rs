use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
};
use monitoring::{CallMonitor, monitoring_snapshot};
use owner_dao::{InMemoryOwnerDao, OwnerDao, OwnerRepository};
use owner_http::{OwnerHandlers, OwnerServices};
use sql_connection::{SqlConnect, SqlMigrator, connect_postgres_db};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

use crate::config::{ServerConfig, StorageKind};

pub mod config;
pub mod seed;

/// What the owner repository is backed by, reported by `/health`.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    Memory,
    Postgres(SqlConnect),
}

/// Builds the configured repository. For PostgreSQL this connects the
/// pool and applies pending migrations first.
pub async fn connect_storage(
    config: &ServerConfig,
) -> anyhow::Result<(OwnerRepository, StorageBackend)> {
    match config.storage {
        StorageKind::Memory => {
            info!("Using in-memory owner store");
            Ok((Arc::new(InMemoryOwnerDao::new()), StorageBackend::Memory))
        }
        StorageKind::Postgres => {
            let pool = connect_postgres_db(&config.postgres()).await?;
            SqlMigrator::new(pool.clone()).run_all_migrations().await?;
            info!("PostgreSQL pool initialized and migrated");

            let db = SqlConnect::new(pool);
            Ok((
                Arc::new(OwnerDao::new(db.clone())),
                StorageBackend::Postgres(db),
            ))
        }
    }
}

pub fn app(
    owners: OwnerRepository, backend: StorageBackend, monitor: CallMonitor,
) -> Router {
    let owner_routes = OwnerHandlers::routes(&monitor)
        .with_state(OwnerServices::new(owners));

    let monitoring_routes = Router::new()
        .route("/monitoring", get(monitoring_snapshot))
        .with_state(monitor);

    Router::new()
        .route("/health", get(health_check))
        .with_state(backend)
        .merge(owner_routes)
        .merge(monitoring_routes)
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/docs"))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        owner_http::create_owner,
        owner_http::find_owner,
        owner_http::find_all,
        owner_http::update_owner,
        monitoring::monitoring_snapshot
    ),
    components(
        schemas(
            owner_responses::OwnerResponse,
            owner_commands::CreateOwnerCommand,
            owner_commands::UpdateOwnerCommand,
            owner_commands::OwnerFields,
            monitoring::MonitorSnapshot,
            monitoring::CallStats,
            common_errors::ApiErrorResponse,
            common_errors::ApiErrorInfo,
            common_errors::FieldError,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "owners", description = "Owner management endpoints"),
        (name = "monitoring", description = "Monitored call statistics")
    ),
    info(
        title = "Pet Clinic Customers API",
        description = "Owner resource of the pet clinic customers service",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check successful with storage status", body = String)
    ),
    tag = "health"
)]
async fn health_check(
    State(backend): State<StorageBackend>,
) -> impl IntoResponse {
    let health_info = match backend {
        StorageBackend::Memory => "OK - In-memory owner store".to_string(),
        StorageBackend::Postgres(db) => {
            let (available, size) = db.get_pool_status();
            format!("OK - PostgreSQL pool: {available}/{size} available")
        }
    };

    (StatusCode::OK, health_info)
}
