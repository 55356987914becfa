//! Domain models for the Mydi backend.
//!
//! Row types map one-to-one onto tables; the `*Details` / `*With*` types are
//! the nested JSON views returned by the API.

pub mod access_token;
pub mod booking;
pub mod event;
pub mod image;
pub mod message;
pub mod product;
pub mod purchase;
pub mod status;
pub mod ticket;
pub mod user;

// Re-export all models for convenient access
pub use access_token::AccessToken;
pub use booking::{Booking, BookingChanges, BookingDetails};
pub use event::{Event, EventChanges, EventInput, EventWithImages, DEFAULT_MAX_TICKET};
pub use image::{Image, LinkedImage};
pub use message::{Message, MessageWithUser};
pub use product::{Product, ProductChanges, ProductInput, ProductWithImages};
pub use purchase::{Purchase, PurchaseDetails};
pub use status::{Status, TicketStatus};
pub use ticket::{Ticket, TicketDetails, TicketPass};
pub use user::{NewUser, User, UserChanges, UserSummary, UserWithImage};
