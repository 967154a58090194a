//! Server entry point: configuration, pool, DDL, routes.

use axum::Router;
use etudiants_api::{
    common_routes_with_ready, ensure_database_exists, ensure_etudiants_table, etudiant_routes,
    AppState, PgEtudiantStore, ServerConfig,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

const BODY_LIMIT_BYTES: usize = 1024 * 1024;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("etudiants_api=info".parse()?),
        )
        .init();

    let config = ServerConfig::from_env();
    ensure_database_exists(&config.database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    ensure_etudiants_table(&pool).await?;

    let state = AppState::new(Arc::new(PgEtudiantStore::new(pool.clone())));

    let app = Router::new()
        .merge(common_routes_with_ready(pool))
        .nest("/api/etudiants", etudiant_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES));

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
