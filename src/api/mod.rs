//! HTTP API.
//!
//! Every handler answers with the `{ success, data, message? }` envelope from
//! [`response`], or an [`AppError`](crate::error::AppError) rendered as
//! `{ success: false, message, error }`.

pub mod account;
pub mod bookings;
pub mod catalog;
pub mod extract;
pub mod health;
pub mod instagram;
pub mod messages;
pub mod response;
pub mod users;

use crate::services::uploads::{MAX_UPLOAD_BYTES, UPLOADS_ROUTE};
use crate::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Multipart framing on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the complete router
pub fn router(state: Arc<AppState>) -> Router {
    let uploads = ServeDir::new(state.uploads.uploads_dir());

    Router::new()
        .route("/", get(health::hello))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        // Accounts
        .route("/auth/register", post(account::register))
        .route("/auth/login", post(account::login))
        .route("/auth/logout", post(account::logout))
        .route("/auth/me", get(account::me))
        .route(
            "/profile/picture",
            put(account::update_profile_picture)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD)),
        )
        // Users
        .route("/users", get(users::find_by_email))
        .route("/users/:id", get(users::show).put(users::update))
        .route("/users/:id/bookings", get(users::bookings))
        .route(
            "/users/:id/bookings/:booking_id/tickets",
            get(users::booking_tickets),
        )
        // Catalog
        .route("/events", get(catalog::list_events).post(catalog::create_event))
        .route(
            "/events/:id",
            get(catalog::show_event)
                .put(catalog::update_event)
                .delete(catalog::delete_event),
        )
        .route("/products", get(catalog::list_products).post(catalog::create_product))
        .route(
            "/products/:id",
            get(catalog::show_product)
                .put(catalog::update_product)
                .delete(catalog::delete_product),
        )
        // Bookings
        .route("/bookings", get(bookings::list_bookings).post(bookings::create_booking))
        .route("/booking-quotes", post(bookings::quote_booking))
        .route(
            "/bookings/:id",
            get(bookings::show_booking)
                .put(bookings::update_booking)
                .delete(bookings::delete_booking),
        )
        .route("/tickets", get(bookings::list_tickets))
        .route("/tickets/:id", get(bookings::show_ticket))
        .route("/tickets/:id/pass", get(bookings::ticket_pass))
        .route("/tickets/:id/waiting", put(bookings::ticket_waiting))
        .route("/tickets/:id/used", put(bookings::ticket_used))
        .route("/tickets/:id/canceled", put(bookings::ticket_canceled))
        .route("/purchases/:id/waiting", put(bookings::purchase_waiting))
        .route("/purchases/:id/used", put(bookings::purchase_used))
        .route("/purchases/:id/canceled", put(bookings::purchase_canceled))
        // Messages
        .route("/messages", get(messages::list).post(messages::create))
        // Instagram
        .route("/instagram/latest", get(instagram::latest))
        .nest_service(UPLOADS_ROUTE, uploads)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
