use std::sync::Arc;

use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::auth::{repo::seaorm::SeaOrmAuthRepository, AuthConfig, AuthService};
use service::certificate::CertificateService;

use crate::errors::StartupError;
use crate::routes::{self, auth::ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Hostnames such as `localhost` are resolved by the listener.
async fn bind_listener(cfg: &AppConfig) -> Result<TcpListener, StartupError> {
    let (host, port) = (cfg.server.host.as_str(), cfg.server.port);
    TcpListener::bind((host, port))
        .await
        .map_err(|source| StartupError::Bind { addr: format!("{host}:{port}"), source })
}

/// Wire services over an already migrated database.
pub fn build_state(db: DatabaseConnection, cfg: &AppConfig) -> ServerState {
    let repo = Arc::new(SeaOrmAuthRepository { db: db.clone() });
    let auth = Arc::new(AuthService::new(repo, AuthConfig::from(&cfg.auth)));
    let certificates = Arc::new(CertificateService::new(db, &cfg.certificates));
    ServerState { auth, certificates }
}

/// Router with the default CORS policy.
pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    info!(event = "shutdown_signal", "draining connections");
}

/// Connect, migrate, build the app and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Database(format!("migrate: {e}")))?;
    info!(event = "migrated", "database schema up to date");

    let state = build_state(db, &cfg);
    let app = build_app(state);

    let listener = bind_listener(&cfg).await?;
    info!(addr = %listener.local_addr()?, "starting certhub server");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!(event = "stopped", "server stopped");
    Ok(())
}
