//! Mydi Backend Service
//!
//! Main entry point for the Mydi ticketing backend. Serves the REST API,
//! uploaded profile pictures and the Instagram feed proxy.

use mydi_backend::config::AppConfig;
use mydi_backend::database::{create_pool, run_migrations};
use mydi_backend::error::{AppError, AppResult};
use mydi_backend::{router, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load environment variables first
    dotenv::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        AppError::Config(e)
    })?;

    // Initialize tracing/logging with config; JSON lines in production
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("mydi_backend={},sqlx=warn,tower_http=info", config.log_level).into()
    });
    if config.is_production() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("Mydi backend starting");
    info!("Environment: {}", config.environment);
    info!("Log level: {}", config.log_level);
    info!("HTTP port: {}", config.http_port);
    info!("Ticket price: {}", config.ticket_price);

    // =========================================================================
    // DATABASE SETUP
    // =========================================================================
    info!("Connecting to database...");

    let pool = create_pool(&config.database).await.map_err(|e| {
        error!("Failed to create database pool: {}", e);
        AppError::Database(e)
    })?;

    info!("Database connection pool created successfully");
    info!("Max connections: {}", config.database.max_connections);

    info!("Running database migrations...");
    run_migrations(&pool, Some(&config.migrations_dir)).await.map_err(|e| {
        error!("Database migration failed: {}", e);
        AppError::Database(e)
    })?;

    info!("Database migrations completed successfully");

    // =========================================================================
    // SERVICES
    // =========================================================================
    tokio::fs::create_dir_all(&config.uploads_dir).await.map_err(|e| {
        error!("Could not create uploads directory {}: {}", config.uploads_dir.display(), e);
        AppError::Io(e)
    })?;
    info!("Uploads directory: {}", config.uploads_dir.display());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let state = Arc::new(AppState::new(pool, config)?);
    info!("✓ Application state initialized");

    // =========================================================================
    // HTTP SERVER
    // =========================================================================
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        AppError::Message(format!("Failed to bind HTTP server on {}: {}", addr, e))
    })?;

    info!("✓ HTTP server listening on {}", addr);
    info!("Press Ctrl+C to shutdown gracefully");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Mydi backend shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received, shutting down gracefully...");
}
