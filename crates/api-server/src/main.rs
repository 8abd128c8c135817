//! User Account API server
//!
//! REST API for registration, authentication, bank accounts and withdrawals.

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use shared::{db, Config};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use api_server::background_tasks::BackgroundTaskRunner;
use api_server::middleware;
use api_server::routes;
use api_server::services::{ObjectStorage, PgUserService, S3Storage, TokenCodec, UserService};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    shared::init_tracing();

    tracing::info!("Starting User Account API...");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Create database connection pool
    let db_pool = db::create_pool(&config.database)
        .await
        .context("Failed to create database pool")?;

    // Check database health
    db::check_health(&db_pool)
        .await
        .context("Database health check failed")?;

    let codec = TokenCodec::from_config(&config.jwt).context("Invalid JWT configuration")?;
    let codec = web::Data::new(codec);

    let storage: Arc<dyn ObjectStorage> = Arc::new(S3Storage::from_config(&config.storage).await);
    let service: Arc<dyn UserService> = Arc::new(PgUserService::new(db_pool.clone(), storage));
    let service: web::Data<dyn UserService> = web::Data::from(service);

    let gateway = config.payment.credentials(config.app.env);
    if gateway.server_key.is_empty() {
        tracing::warn!(env = ?config.app.env, "Payment gateway keys are not configured");
    } else {
        tracing::info!(env = ?config.app.env, url = %gateway.base_url, "Payment gateway configured");
    }
    if !config.model.is_available() {
        tracing::warn!(
            path = %config.model.pre_trained_model.display(),
            "Pre-trained model artefact not found"
        );
    }

    let background = BackgroundTaskRunner::new(db_pool.clone()).start();

    let server_addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(app = %config.app.name, "Listening on {}", server_addr);

    let cors_origins = config.server.cors_allowed_origins.clone();
    let app_env = config.app.env;

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(middleware::cors(&cors_origins, app_env))
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(codec.clone())
            .app_data(service.clone())
            .configure(routes::configure)
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind to {}", server_addr))?
    .run()
    .await
    .context("Server error")?;

    background.cancel();
    tracing::info!("Server stopped");

    Ok(())
}
