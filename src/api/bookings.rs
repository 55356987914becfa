//! Bookings, tickets and drink purchases.

use super::extract::{parse_id, JsonBody};
use super::response::{created, done, ok, ApiJson};
use crate::error::AppResult;
use crate::models::{BookingChanges, BookingDetails, Purchase, TicketDetails, TicketPass, TicketStatus};
use crate::services::{BookingCreated, CreateBookingRequest, Quote, QuoteRequest};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use std::sync::Arc;

pub async fn list_bookings(State(state): State<Arc<AppState>>) -> AppResult<ApiJson<Vec<BookingDetails>>> {
    Ok(ok(state.bookings.list().await?))
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<CreateBookingRequest>,
) -> AppResult<(StatusCode, ApiJson<BookingCreated>)> {
    let booking = state.bookings.create(request).await?;
    Ok(created(booking, "Booking created"))
}

/// POST /booking-quotes
pub async fn quote_booking(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<QuoteRequest>,
) -> AppResult<ApiJson<Quote>> {
    Ok(ok(state.bookings.quote(&request).await?))
}

pub async fn show_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<ApiJson<BookingDetails>> {
    let id = parse_id(&id, "booking")?;
    Ok(ok(state.bookings.booking(id).await?))
}

pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(changes): JsonBody<BookingChanges>,
) -> AppResult<ApiJson<BookingDetails>> {
    let id = parse_id(&id, "booking")?;
    Ok(ok(state.bookings.update(id, changes).await?))
}

pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<ApiJson<Option<()>>> {
    let id = parse_id(&id, "booking")?;
    state.bookings.delete(id).await?;
    Ok(done("Booking deleted"))
}

pub async fn list_tickets(State(state): State<Arc<AppState>>) -> AppResult<ApiJson<Vec<TicketDetails>>> {
    Ok(ok(state.bookings.list_tickets().await?))
}

pub async fn show_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<ApiJson<TicketDetails>> {
    let id = parse_id(&id, "ticket")?;
    Ok(ok(state.bookings.ticket(id).await?))
}

/// GET /tickets/:id/pass
pub async fn ticket_pass(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<ApiJson<TicketPass>> {
    let id = parse_id(&id, "ticket")?;
    Ok(ok(state.bookings.ticket_pass(id).await?))
}

async fn set_ticket_status(state: &AppState, id: &str, status: TicketStatus) -> AppResult<ApiJson<TicketDetails>> {
    let id = parse_id(id, "ticket")?;
    Ok(ok(state.bookings.set_ticket_status(id, status).await?))
}

pub async fn ticket_waiting(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<ApiJson<TicketDetails>> {
    set_ticket_status(&state, &id, TicketStatus::Waiting).await
}

pub async fn ticket_used(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<ApiJson<TicketDetails>> {
    set_ticket_status(&state, &id, TicketStatus::Used).await
}

pub async fn ticket_canceled(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<ApiJson<TicketDetails>> {
    set_ticket_status(&state, &id, TicketStatus::Canceled).await
}

async fn set_purchase_status(state: &AppState, id: &str, status: TicketStatus) -> AppResult<ApiJson<Purchase>> {
    let id = parse_id(id, "purchase")?;
    Ok(ok(state.bookings.set_purchase_status(id, status).await?))
}

pub async fn purchase_waiting(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<ApiJson<Purchase>> {
    set_purchase_status(&state, &id, TicketStatus::Waiting).await
}

pub async fn purchase_used(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<ApiJson<Purchase>> {
    set_purchase_status(&state, &id, TicketStatus::Used).await
}

pub async fn purchase_canceled(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<ApiJson<Purchase>> {
    set_purchase_status(&state, &id, TicketStatus::Canceled).await
}
