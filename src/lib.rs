//! Mydi Backend Library
//!
//! REST backend of the Mydi nightlife ticketing app: events, drinks,
//! bookings with guests and pre-ordered drinks, QR tickets, bearer-token
//! accounts and the venue's Instagram feed.

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;

// Re-export commonly used types
pub use api::router;
pub use config::AppConfig;
pub use error::{AppError, AppResult};

use database::Database;
use repositories::*;
use services::{AuthService, BookingService, CatalogService, InstagramFeed, UploadService};
use std::sync::Arc;

/// Application state containing all repositories and services
pub struct AppState {
    pub config: AppConfig,
    pub database: Database,
    pub user_repo: Arc<UserRepository>,
    pub image_repo: Arc<ImageRepository>,
    pub message_repo: Arc<MessageRepository>,
    pub catalog: Arc<CatalogService>,
    pub bookings: Arc<BookingService>,
    pub auth: Arc<AuthService>,
    pub uploads: Arc<UploadService>,
    pub instagram: Arc<InstagramFeed>,
}

impl AppState {
    /// Create a new AppState with initialized repositories and services
    pub fn new(pool: sqlx::PgPool, config: AppConfig) -> AppResult<Self> {
        let database = Database::new(pool.clone());

        let user_repo = Arc::new(UserRepository::new(pool.clone()));
        let image_repo = Arc::new(ImageRepository::new(pool.clone()));
        let event_repo = Arc::new(EventRepository::new(pool.clone()));
        let product_repo = Arc::new(ProductRepository::new(pool.clone()));
        let status_repo = Arc::new(StatusRepository::new(pool.clone()));
        let booking_repo = Arc::new(BookingRepository::new(pool.clone()));
        let ticket_repo = Arc::new(TicketRepository::new(pool.clone()));
        let purchase_repo = Arc::new(PurchaseRepository::new(pool.clone()));
        let message_repo = Arc::new(MessageRepository::new(pool.clone()));
        let token_repo = Arc::new(AccessTokenRepository::new(pool.clone()));

        let catalog = Arc::new(CatalogService::new(
            event_repo.clone(),
            product_repo.clone(),
            image_repo.clone(),
        ));

        let bookings = Arc::new(BookingService::new(
            pool,
            booking_repo,
            ticket_repo,
            purchase_repo,
            user_repo.clone(),
            event_repo,
            product_repo,
            status_repo,
            catalog.clone(),
            config.ticket_price,
        ));

        let auth = Arc::new(AuthService::new(
            user_repo.clone(),
            token_repo,
            config.token_ttl(),
        ));

        let uploads = Arc::new(UploadService::new(
            config.uploads_dir.clone(),
            user_repo.clone(),
            image_repo.clone(),
        ));

        let instagram = Arc::new(InstagramFeed::new(config.instagram.clone())?);

        Ok(Self {
            config,
            database,
            user_repo,
            image_repo,
            message_repo,
            catalog,
            bookings,
            auth,
            uploads,
            instagram,
        })
    }
}
