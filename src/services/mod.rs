pub mod auth_service;
pub mod booking_service;
pub mod catalog_service;
pub mod instagram;
pub mod uploads;

pub use auth_service::{AuthService, AuthSession, LoginRequest, RegisterRequest};
pub use booking_service::{
    BookingCreated, BookingService, BookingWithEvent, CreateBookingRequest, PartyOrder,
    PurchaseLine, Quote, QuoteRequest, UserBookingTickets,
};
pub use catalog_service::CatalogService;
pub use instagram::{InstagramFeed, InstagramPost};
pub use uploads::UploadService;
