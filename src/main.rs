mod associations;
mod catalog;
mod config;
mod db;
mod entities;
mod error;
mod gate;
mod logger;
mod models;
mod queries;
mod repo;
mod routes;
mod store;
mod views;

use std::sync::Arc;

use crate::{
    catalog::Catalog,
    config::Config,
    logger::{Logger, TracingLogger},
    repo::SqlStore,
};

pub struct AppState {
    pub catalog: Catalog,
    pub logger: Arc<dyn Logger>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,movie_catalog=debug,sqlx=warn".to_string()),
        )
        .init();

    let logger: Arc<dyn Logger> = Arc::new(TracingLogger);

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => logger.fatal(&format!("reading config: {err:#}")),
    };

    let db = match db::connect_and_migrate(&config.database_url, config.db_max_connections).await {
        Ok(db) => db,
        Err(err) => logger.fatal(&format!("connecting to database: {err}")),
    };
    logger.info("connected to database");

    let catalog = Catalog::new(Arc::new(SqlStore::new(db)), logger.clone());
    let state = Arc::new(AppState { catalog, logger: logger.clone() });
    let app = routes::router(state, config.request_timeout);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    logger.info("http server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(%err, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::warn!(%err, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
