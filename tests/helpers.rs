#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use mydi_backend::auth;
use mydi_backend::config::AppConfig;
use mydi_backend::models::*;
use mydi_backend::repositories::*;
use mydi_backend::AppState;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::path::PathBuf;
use std::sync::Arc;

/// Password given to every fixture user
pub const TEST_PASSWORD: &str = "dancefloor42";

/// Repositories over a test pool
pub struct TestDatabase {
    pub pool: PgPool,
    pub user_repo: Arc<UserRepository>,
    pub image_repo: Arc<ImageRepository>,
    pub event_repo: Arc<EventRepository>,
    pub product_repo: Arc<ProductRepository>,
    pub status_repo: Arc<StatusRepository>,
    pub booking_repo: Arc<BookingRepository>,
    pub ticket_repo: Arc<TicketRepository>,
    pub purchase_repo: Arc<PurchaseRepository>,
    pub message_repo: Arc<MessageRepository>,
    pub token_repo: Arc<AccessTokenRepository>,
}

impl TestDatabase {
    /// Create TestDatabase from an existing pool (useful with sqlx::test)
    pub async fn from_pool(pool: PgPool) -> Self {
        Self {
            pool: pool.clone(),
            user_repo: Arc::new(UserRepository::new(pool.clone())),
            image_repo: Arc::new(ImageRepository::new(pool.clone())),
            event_repo: Arc::new(EventRepository::new(pool.clone())),
            product_repo: Arc::new(ProductRepository::new(pool.clone())),
            status_repo: Arc::new(StatusRepository::new(pool.clone())),
            booking_repo: Arc::new(BookingRepository::new(pool.clone())),
            ticket_repo: Arc::new(TicketRepository::new(pool.clone())),
            purchase_repo: Arc::new(PurchaseRepository::new(pool.clone())),
            message_repo: Arc::new(MessageRepository::new(pool.clone())),
            token_repo: Arc::new(AccessTokenRepository::new(pool)),
        }
    }
}

/// Configuration pointing uploads at a per-test temporary directory
pub fn test_config() -> AppConfig {
    let uploads_dir: PathBuf = std::env::temp_dir().join(format!("mydi-uploads-{}", uuid::Uuid::new_v4()));
    AppConfig {
        uploads_dir,
        ..AppConfig::default()
    }
}

/// Full application state over a test pool
pub fn test_state(pool: PgPool) -> Arc<AppState> {
    Arc::new(AppState::new(pool, test_config()).expect("Failed to build app state"))
}

pub fn datetime(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, 0, 0))
        .expect("valid test datetime")
}

/// Helper function to create a test user with [`TEST_PASSWORD`]
pub async fn create_test_user(db: &TestDatabase, username: &str) -> User {
    db.user_repo
        .create(&NewUser {
            email: format!("{}@example.com", username),
            password_hash: auth::hash_password(TEST_PASSWORD).expect("hash"),
            username: username.to_string(),
            firstname: username.to_string(),
            lastname: "Tester".to_string(),
            birthdate: datetime(1998, 5, 17, 0),
        })
        .await
        .expect("Failed to create test user")
}

/// Helper function to create a test event with the given capacity
pub async fn create_test_event(db: &TestDatabase, name: &str, max_ticket: i32) -> Event {
    db.event_repo
        .create(&EventInput {
            start_datetime: datetime(2026, 12, 31, 23),
            end_datetime: datetime(2027, 1, 1, 6),
            name: name.to_string(),
            description: "Test night".to_string(),
            artist: "DJ Test".to_string(),
            max_ticket: Some(max_ticket),
        })
        .await
        .expect("Failed to create test event")
}

/// Helper function to create a test product
pub async fn create_test_product(db: &TestDatabase, name: &str, price: Decimal) -> Product {
    db.product_repo
        .create(&ProductInput {
            name: name.to_string(),
            description: format!("{} description", name),
            price,
            category: "cocktail".to_string(),
        })
        .await
        .expect("Failed to create test product")
}

/// Test data fixtures
pub struct TestFixtures {
    pub host: User,
    pub guest1: User,
    pub guest2: User,
    pub event: Event,
    pub mojito: Product,
    pub spritz: Product,
}

impl TestFixtures {
    /// Create test fixtures with sample data
    pub async fn create(db: &TestDatabase) -> Self {
        Self {
            host: create_test_user(db, "host").await,
            guest1: create_test_user(db, "guest1").await,
            guest2: create_test_user(db, "guest2").await,
            event: create_test_event(db, "Test Night", 10).await,
            mojito: create_test_product(db, "Mojito", Decimal::new(900, 2)).await,
            spritz: create_test_product(db, "Spritz", Decimal::new(750, 2)).await,
        }
    }
}
