pub mod access_token_repository;
pub mod booking_repository;
pub mod event_repository;
pub mod image_repository;
pub mod message_repository;
pub mod product_repository;
pub mod purchase_repository;
pub mod status_repository;
pub mod ticket_repository;
pub mod user_repository;

// Re-export all repositories for convenient access
pub use access_token_repository::AccessTokenRepository;
pub use booking_repository::BookingRepository;
pub use event_repository::EventRepository;
pub use image_repository::ImageRepository;
pub use message_repository::MessageRepository;
pub use product_repository::ProductRepository;
pub use purchase_repository::PurchaseRepository;
pub use status_repository::StatusRepository;
pub use ticket_repository::TicketRepository;
pub use user_repository::UserRepository;

use crate::error::RepositoryError;

/// Result type shared by all repositories
pub type RepoResult<T> = Result<T, RepositoryError>;
