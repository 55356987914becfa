use crate::error::{AppError, AppResult};
use crate::models::{
    Booking, BookingChanges, BookingDetails, EventWithImages, Product, Purchase, PurchaseDetails,
    Status, Ticket, TicketDetails, TicketPass, TicketStatus, User, UserSummary,
};
use crate::repositories::{
    BookingRepository, EventRepository, ProductRepository, PurchaseRepository, StatusRepository,
    TicketRepository, UserRepository,
};
use crate::services::CatalogService;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};

/// Most drinks a single person may pre-order in one booking
pub const MAX_DRINKS_PER_PERSON: u64 = 20;

fn one() -> u32 {
    1
}

/// A drink pre-order line: `quantity` units of one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseLine {
    pub product_id: i32,
    #[serde(default = "one")]
    pub quantity: u32,
}

/// Drinks pre-ordered by one person in a booking
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartyOrder {
    #[serde(default)]
    pub purchases: Vec<PurchaseLine>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    /// Defaults to the start of the event
    #[serde(default)]
    pub datetime: Option<NaiveDateTime>,
    pub user_id: i32,
    pub event_id: i32,
    #[serde(default)]
    pub guest_emails: Vec<String>,
    /// Drinks of the main user
    #[serde(default)]
    pub purchases: Vec<PurchaseLine>,
    /// `guest_purchases[i]` belongs to `guest_emails[i]`
    #[serde(default)]
    pub guest_purchases: Vec<PartyOrder>,
}

impl CreateBookingRequest {
    /// Purchase lines of every party, main user first then guests in order
    fn party_lines(&self) -> Vec<&[PurchaseLine]> {
        let mut parties: Vec<&[PurchaseLine]> = vec![self.purchases.as_slice()];
        for i in 0..self.guest_emails.len() {
            parties.push(
                self.guest_purchases
                    .get(i)
                    .map(|order| order.purchases.as_slice())
                    .unwrap_or(&[]),
            );
        }
        parties
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRequest {
    pub parties: Vec<PartyOrder>,
}

/// Price breakdown of a prospective booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub places: usize,
    pub ticket_price: Decimal,
    pub tickets_total: Decimal,
    pub drinks_total: Decimal,
    pub total: Decimal,
}

/// Outcome of a successful booking
#[derive(Debug, Clone, Serialize)]
pub struct BookingCreated {
    pub booking: BookingDetails,
    pub tickets_created: usize,
    pub guests_added: usize,
    pub purchases_created: usize,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingWithEvent {
    #[serde(flatten)]
    pub booking: Booking,
    pub event: Option<EventWithImages>,
}

/// What a user may see of one booking's tickets
#[derive(Debug, Clone, Serialize)]
pub struct UserBookingTickets {
    pub booking: BookingWithEvent,
    pub tickets: Vec<TicketDetails>,
    pub is_booking_owner: bool,
}

/// Price a booking: one ticket per party plus every pre-ordered drink.
///
/// Every product id referenced by `parties` must be present in `products`.
pub fn quote(
    ticket_price: Decimal,
    parties: &[&[PurchaseLine]],
    products: &[Product],
) -> AppResult<Quote> {
    if parties.is_empty() {
        return Err(AppError::Validation(
            "A booking needs at least one place".to_string(),
        ));
    }

    check_drink_limits(parties)?;

    let prices: HashMap<i32, Decimal> = products.iter().map(|p| (p.id, p.price)).collect();

    let mut drinks_total = Decimal::ZERO;
    for line in parties.iter().flat_map(|lines| lines.iter()) {
        let price = prices.get(&line.product_id).ok_or_else(|| {
            AppError::Validation(format!("Product {} does not exist", line.product_id))
        })?;
        drinks_total += *price * Decimal::from(line.quantity);
    }

    let tickets_total = ticket_price * Decimal::from(parties.len() as u64);

    Ok(Quote {
        places: parties.len(),
        ticket_price,
        tickets_total,
        drinks_total,
        total: tickets_total + drinks_total,
    })
}

/// Reject parties pre-ordering more than [`MAX_DRINKS_PER_PERSON`] drinks
pub fn check_drink_limits(parties: &[&[PurchaseLine]]) -> AppResult<()> {
    for (i, lines) in parties.iter().enumerate() {
        let drinks: u64 = lines.iter().map(|line| u64::from(line.quantity)).sum();
        if drinks > MAX_DRINKS_PER_PERSON {
            return Err(AppError::Validation(format!(
                "Party {} pre-orders {} drinks, at most {} allowed",
                i + 1,
                drinks,
                MAX_DRINKS_PER_PERSON
            )));
        }
    }
    Ok(())
}

fn product_ids(parties: &[&[PurchaseLine]]) -> Vec<i32> {
    let ids: HashSet<i32> = parties
        .iter()
        .flat_map(|lines| lines.iter().map(|line| line.product_id))
        .collect();
    let mut ids: Vec<i32> = ids.into_iter().collect();
    ids.sort_unstable();
    ids
}

/// Bookings, tickets and drink pre-orders
pub struct BookingService {
    pool: PgPool,
    booking_repo: Arc<BookingRepository>,
    ticket_repo: Arc<TicketRepository>,
    purchase_repo: Arc<PurchaseRepository>,
    user_repo: Arc<UserRepository>,
    event_repo: Arc<EventRepository>,
    product_repo: Arc<ProductRepository>,
    status_repo: Arc<StatusRepository>,
    catalog: Arc<CatalogService>,
    ticket_price: Decimal,
}

impl BookingService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        booking_repo: Arc<BookingRepository>,
        ticket_repo: Arc<TicketRepository>,
        purchase_repo: Arc<PurchaseRepository>,
        user_repo: Arc<UserRepository>,
        event_repo: Arc<EventRepository>,
        product_repo: Arc<ProductRepository>,
        status_repo: Arc<StatusRepository>,
        catalog: Arc<CatalogService>,
        ticket_price: Decimal,
    ) -> Self {
        Self {
            pool,
            booking_repo,
            ticket_repo,
            purchase_repo,
            user_repo,
            event_repo,
            product_repo,
            status_repo,
            catalog,
            ticket_price,
        }
    }

    pub fn ticket_price(&self) -> Decimal {
        self.ticket_price
    }

    /// Price a prospective booking against current product prices
    pub async fn quote(&self, request: &QuoteRequest) -> AppResult<Quote> {
        let parties: Vec<&[PurchaseLine]> = request
            .parties
            .iter()
            .map(|order| order.purchases.as_slice())
            .collect();

        let products = self.product_repo.find_by_ids(&product_ids(&parties)).await?;
        quote(self.ticket_price, &parties, &products)
    }

    /// Book an event for a main user and their guests.
    ///
    /// Everything happens in one transaction with the event row locked, so
    /// two concurrent bookings cannot both take the last places.
    pub async fn create(&self, request: CreateBookingRequest) -> AppResult<BookingCreated> {
        info!(
            "Creating booking: user={}, event={}, guests={}",
            request.user_id,
            request.event_id,
            request.guest_emails.len()
        );

        if request.guest_purchases.len() > request.guest_emails.len() {
            return Err(AppError::Validation(
                "guest_purchases has more entries than guest_emails".to_string(),
            ));
        }

        check_drink_limits(&request.party_lines())?;

        let mut tx = self.pool.begin().await?;

        let main_user = UserRepository::find_by_id_in(&mut *tx, request.user_id)
            .await?
            .ok_or_else(|| AppError::Validation("Main user does not exist".to_string()))?;

        let event = EventRepository::find_for_update(&mut *tx, request.event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", request.event_id)))?;

        if TicketRepository::user_has_ticket_for_event_in(&mut *tx, main_user.id, event.id).await? {
            return Err(AppError::Validation(
                "Main user already has a ticket for this event".to_string(),
            ));
        }

        let mut seen: HashSet<String> = HashSet::from([main_user.email.to_lowercase()]);
        let mut guests: Vec<User> = Vec::with_capacity(request.guest_emails.len());
        for raw in &request.guest_emails {
            let email = raw.trim();
            if email.is_empty() {
                return Err(AppError::Validation("Guest email must not be empty".to_string()));
            }
            if !seen.insert(email.to_lowercase()) {
                warn!("Booking lists {} more than once", email);
                return Err(AppError::Validation(format!(
                    "{} is listed more than once in the booking",
                    email
                )));
            }

            let guest = UserRepository::find_by_email_in(&mut *tx, email)
                .await?
                .ok_or_else(|| AppError::Validation(format!("No user with email {} exists", email)))?;

            if TicketRepository::user_has_ticket_for_event_in(&mut *tx, guest.id, event.id).await? {
                return Err(AppError::Validation(format!(
                    "{} already has a ticket for this event",
                    email
                )));
            }
            guests.push(guest);
        }

        let parties = request.party_lines();
        let products = ProductRepository::find_by_ids_in(&mut *tx, &product_ids(&parties)).await?;
        let priced = quote(self.ticket_price, &parties, &products)?;

        let issued = EventRepository::count_tickets_in(&mut *tx, event.id).await?;
        let remaining = event.remaining_capacity(issued);
        if (parties.len() as i64) > remaining {
            return Err(AppError::Validation(format!(
                "Not enough tickets left for {}: {} requested, {} remaining",
                event.name,
                parties.len(),
                remaining
            )));
        }

        let booking = BookingRepository::insert(
            &mut *tx,
            request.datetime.unwrap_or(event.start_datetime),
            main_user.id,
            event.id,
        )
        .await?;

        let holders = std::iter::once(&main_user).chain(guests.iter());
        for (holder, lines) in holders.zip(parties.iter()) {
            let ticket = TicketRepository::insert(&mut *tx, booking.id, holder.id).await?;
            for line in lines.iter() {
                PurchaseRepository::insert_units(&mut *tx, ticket.id, line.product_id, line.quantity).await?;
            }
        }

        tx.commit().await?;

        let details = self.booking(booking.id).await?;
        let purchases_created = details.purchase_count();

        info!(
            "Booking {} created: event={}, tickets={}, purchases={}, total={}",
            booking.id,
            event.id,
            parties.len(),
            purchases_created,
            priced.total
        );

        Ok(BookingCreated {
            booking: details,
            tickets_created: parties.len(),
            guests_added: guests.len(),
            purchases_created,
            total: priced.total,
        })
    }

    pub async fn list(&self) -> AppResult<Vec<BookingDetails>> {
        let bookings = self.booking_repo.list().await?;
        self.details(bookings).await
    }

    pub async fn booking(&self, id: i32) -> AppResult<BookingDetails> {
        let booking = self
            .booking_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))?;

        self.details(vec![booking])
            .await?
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))
    }

    /// Partial update of a booking.
    ///
    /// Moving a booking to another event moves its tickets too, so the target
    /// event is locked and must have room for every ticket, and no holder may
    /// already have a ticket there.
    pub async fn update(&self, id: i32, changes: BookingChanges) -> AppResult<BookingDetails> {
        let mut tx = self.pool.begin().await?;

        let current = BookingRepository::find_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))?;

        if let Some(user_id) = changes.user_id {
            if UserRepository::find_by_id_in(&mut *tx, user_id).await?.is_none() {
                return Err(AppError::Validation(format!("User {} does not exist", user_id)));
            }
        }

        if let Some(event_id) = changes.event_id.filter(|&e| e != current.event_id) {
            let event = EventRepository::find_for_update(&mut *tx, event_id)
                .await?
                .ok_or_else(|| AppError::Validation(format!("Event {} does not exist", event_id)))?;

            let tickets = TicketRepository::find_by_booking_in(&mut *tx, current.id).await?;

            let issued = EventRepository::count_tickets_in(&mut *tx, event.id).await?;
            let remaining = event.remaining_capacity(issued);
            if (tickets.len() as i64) > remaining {
                return Err(AppError::Validation(format!(
                    "Not enough tickets left for {}: {} needed, {} remaining",
                    event.name,
                    tickets.len(),
                    remaining
                )));
            }

            for ticket in &tickets {
                if TicketRepository::user_has_ticket_for_event_in(&mut *tx, ticket.user_id, event.id).await? {
                    warn!(
                        "Booking {} cannot move to event {}: user {} already holds a ticket",
                        current.id, event.id, ticket.user_id
                    );
                    return Err(AppError::Validation(format!(
                        "User {} already has a ticket for {}",
                        ticket.user_id, event.name
                    )));
                }
            }
        }

        let booking = BookingRepository::update_in(&mut *tx, id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))?;

        tx.commit().await?;
        info!("Updated booking {}", id);

        self.details(vec![booking])
            .await?
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))
    }

    /// Delete a booking along with its tickets and purchases
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        if !self.booking_repo.delete(id).await? {
            return Err(AppError::NotFound(format!("Booking {} not found", id)));
        }
        info!("Deleted booking {}", id);
        Ok(())
    }

    /// Load owner, event and tickets for each booking with one query per table
    pub async fn details(&self, bookings: Vec<Booking>) -> AppResult<Vec<BookingDetails>> {
        if bookings.is_empty() {
            return Ok(Vec::new());
        }

        let booking_ids: Vec<i32> = bookings.iter().map(|b| b.id).collect();
        let owner_ids: Vec<i32> = bookings.iter().map(|b| b.user_id).collect();
        let event_ids: Vec<i32> = bookings.iter().map(|b| b.event_id).collect();

        let owners = self.summaries(&owner_ids).await?;
        let events: HashMap<i32, _> = self
            .event_repo
            .find_by_ids(&event_ids)
            .await?
            .into_iter()
            .map(|e| (e.id, e))
            .collect();

        let tickets = self.ticket_repo.find_by_bookings(&booking_ids).await?;
        let mut tickets_by_booking: HashMap<i32, Vec<TicketDetails>> = HashMap::new();
        for ticket in self.ticket_details(tickets).await? {
            tickets_by_booking
                .entry(ticket.ticket.booking_id)
                .or_default()
                .push(ticket);
        }

        Ok(bookings
            .into_iter()
            .map(|booking| BookingDetails {
                user: owners.get(&booking.user_id).cloned(),
                event: events.get(&booking.event_id).cloned(),
                tickets: tickets_by_booking.remove(&booking.id).unwrap_or_default(),
                booking,
            })
            .collect())
    }

    /// Bookings made by a user, each with its event and gallery
    pub async fn bookings_for_user(&self, user_id: i32) -> AppResult<Vec<BookingWithEvent>> {
        if self.user_repo.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        let bookings = self.booking_repo.find_by_user(user_id).await?;
        self.with_events(bookings).await
    }

    /// Tickets of a booking as seen by `user_id`.
    ///
    /// The booking owner sees every ticket; anyone else only sees their own.
    pub async fn tickets_for_user(&self, user_id: i32, booking_id: i32) -> AppResult<UserBookingTickets> {
        let booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", booking_id)))?;

        let is_booking_owner = booking.user_id == user_id;

        let tickets: Vec<Ticket> = self
            .ticket_repo
            .find_by_bookings(&[booking.id])
            .await?
            .into_iter()
            .filter(|t| is_booking_owner || t.user_id == user_id)
            .collect();

        let tickets = self.ticket_details(tickets).await?;
        let booking = self
            .with_events(vec![booking])
            .await?
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", booking_id)))?;

        Ok(UserBookingTickets {
            booking,
            tickets,
            is_booking_owner,
        })
    }

    pub async fn list_tickets(&self) -> AppResult<Vec<TicketDetails>> {
        let tickets = self.ticket_repo.list().await?;
        self.ticket_details(tickets).await
    }

    pub async fn ticket(&self, id: i32) -> AppResult<TicketDetails> {
        let ticket = self.find_ticket(id).await?;
        self.ticket_details(vec![ticket])
            .await?
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("Ticket {} not found", id)))
    }

    /// QR payload shown at the door
    pub async fn ticket_pass(&self, id: i32) -> AppResult<TicketPass> {
        let ticket = self.find_ticket(id).await?;
        let booking = self
            .booking_repo
            .find_by_id(ticket.booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", ticket.booking_id)))?;

        let status = self
            .status_repo
            .list()
            .await?
            .into_iter()
            .find(|s| s.id == ticket.status_id)
            .and_then(|s| s.status_enum())
            .ok_or_else(|| AppError::Message(format!("Ticket {} has an unknown status", id)))?;

        Ok(TicketPass {
            ticket_id: ticket.id,
            booking_id: booking.id,
            event_id: booking.event_id,
            user_id: ticket.user_id,
            status,
        })
    }

    /// Move a ticket to `status`. The holder earns a fidelity point when the
    /// ticket becomes used; the row lock makes concurrent scans award it once.
    pub async fn set_ticket_status(&self, ticket_id: i32, status: TicketStatus) -> AppResult<TicketDetails> {
        let row = self.status_row(status).await?;

        let mut tx = self.pool.begin().await?;

        let current = TicketRepository::find_for_update(&mut *tx, ticket_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Ticket {} not found", ticket_id)))?;

        let ticket = TicketRepository::update_status_in(&mut *tx, ticket_id, row.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Ticket {} not found", ticket_id)))?;

        if status == TicketStatus::Used && current.status_id != row.id {
            UserRepository::add_fidelity_points_in(&mut *tx, ticket.user_id, 1).await?;
        }

        tx.commit().await?;

        info!("Ticket {} is now {}", ticket_id, status.as_str());

        self.ticket_details(vec![ticket])
            .await?
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("Ticket {} not found", ticket_id)))
    }

    pub async fn set_purchase_status(&self, purchase_id: i32, status: TicketStatus) -> AppResult<Purchase> {
        let row = self.status_row(status).await?;

        let purchase = self
            .purchase_repo
            .update_status(purchase_id, row.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Purchase {} not found", purchase_id)))?;

        info!("Purchase {} is now {}", purchase_id, status.as_str());
        Ok(purchase)
    }

    async fn find_ticket(&self, id: i32) -> AppResult<Ticket> {
        self.ticket_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Ticket {} not found", id)))
    }

    async fn status_row(&self, status: TicketStatus) -> AppResult<Status> {
        self.status_repo
            .find_by_name(status)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Status {} not found", status.as_str())))
    }

    async fn summaries(&self, ids: &[i32]) -> AppResult<HashMap<i32, UserSummary>> {
        Ok(self
            .user_repo
            .find_summaries(ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect())
    }

    async fn with_events(&self, bookings: Vec<Booking>) -> AppResult<Vec<BookingWithEvent>> {
        let event_ids: Vec<i32> = bookings.iter().map(|b| b.event_id).collect();
        let events = self.event_repo.find_by_ids(&event_ids).await?;
        let events: HashMap<i32, EventWithImages> = self
            .catalog
            .with_event_images(events)
            .await?
            .into_iter()
            .map(|e| (e.event.id, e))
            .collect();

        Ok(bookings
            .into_iter()
            .map(|booking| BookingWithEvent {
                event: events.get(&booking.event_id).cloned(),
                booking,
            })
            .collect())
    }

    /// Attach holder, status and drinks to tickets
    async fn ticket_details(&self, tickets: Vec<Ticket>) -> AppResult<Vec<TicketDetails>> {
        if tickets.is_empty() {
            return Ok(Vec::new());
        }

        let ticket_ids: Vec<i32> = tickets.iter().map(|t| t.id).collect();
        let holder_ids: Vec<i32> = tickets.iter().map(|t| t.user_id).collect();

        let holders = self.summaries(&holder_ids).await?;
        let statuses: HashMap<i32, Status> = self
            .status_repo
            .list()
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let purchases = self.purchase_repo.find_by_tickets(&ticket_ids).await?;
        let product_ids: Vec<i32> = purchases
            .iter()
            .map(|p| p.product_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let products: HashMap<i32, Product> = self
            .product_repo
            .find_by_ids(&product_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let mut purchases_by_ticket: HashMap<i32, Vec<PurchaseDetails>> = HashMap::new();
        for purchase in purchases {
            purchases_by_ticket
                .entry(purchase.ticket_id)
                .or_default()
                .push(PurchaseDetails {
                    product: products.get(&purchase.product_id).cloned(),
                    status: statuses.get(&purchase.status_id).cloned(),
                    purchase,
                });
        }

        Ok(tickets
            .into_iter()
            .map(|ticket| TicketDetails {
                user: holders.get(&ticket.user_id).cloned(),
                status: statuses.get(&ticket.status_id).cloned(),
                purchases: purchases_by_ticket.remove(&ticket.id).unwrap_or_default(),
                ticket,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn product(id: i32, price: Decimal) -> Product {
        let created_at = NaiveDate::from_ymd_opt(2025, 6, 23)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Product {
            id,
            name: format!("Drink {}", id),
            description: String::new(),
            price,
            category: "drink".to_string(),
            created_at,
            updated_at: None,
        }
    }

    fn line(product_id: i32, quantity: u32) -> PurchaseLine {
        PurchaseLine { product_id, quantity }
    }

    #[test]
    fn test_quote_tickets_only() {
        let parties: Vec<&[PurchaseLine]> = vec![&[], &[], &[]];
        let q = quote(Decimal::new(15, 0), &parties, &[]).unwrap();
        assert_eq!(q.places, 3);
        assert_eq!(q.tickets_total, Decimal::new(45, 0));
        assert_eq!(q.drinks_total, Decimal::ZERO);
        assert_eq!(q.total, Decimal::new(45, 0));
    }

    #[test]
    fn test_quote_with_drinks() {
        let products = vec![product(1, Decimal::new(850, 2)), product(2, Decimal::new(12, 0))];
        let main = vec![line(1, 2)];
        let guest = vec![line(2, 1), line(1, 1)];
        let parties: Vec<&[PurchaseLine]> = vec![&main, &guest];

        let q = quote(Decimal::new(15, 0), &parties, &products).unwrap();
        // 2 x 15 + 2 x 8.50 + 12 + 8.50
        assert_eq!(q.drinks_total, Decimal::new(3750, 2));
        assert_eq!(q.total, Decimal::new(6750, 2));
    }

    #[test]
    fn test_quote_zero_quantity_is_free() {
        let products = vec![product(1, Decimal::new(10, 0))];
        let main = vec![line(1, 0)];
        let parties: Vec<&[PurchaseLine]> = vec![&main];
        let q = quote(Decimal::new(15, 0), &parties, &products).unwrap();
        assert_eq!(q.total, Decimal::new(15, 0));
    }

    #[test]
    fn test_quote_rejects_unknown_product() {
        let main = vec![line(99, 1)];
        let parties: Vec<&[PurchaseLine]> = vec![&main];
        let err = quote(Decimal::new(15, 0), &parties, &[]).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_drink_cap_applies_per_party() {
        let products = vec![product(1, Decimal::new(10, 0))];
        let full = vec![line(1, 15), line(1, 5)];
        let over = vec![line(1, 4_000_000_000)];
        let split = vec![line(1, 11), line(1, 10)];

        let parties: Vec<&[PurchaseLine]> = vec![&full, &full];
        assert!(quote(Decimal::new(15, 0), &parties, &products).is_ok());

        for lines in [&over, &split] {
            let parties: Vec<&[PurchaseLine]> = vec![&full, lines];
            let err = quote(Decimal::new(15, 0), &parties, &products).unwrap_err();
            assert!(matches!(err, AppError::Validation(ref m) if m.starts_with("Party 2")));
        }
    }

    #[test]
    fn test_quote_rejects_empty_booking() {
        assert!(quote(Decimal::new(15, 0), &[], &[]).is_err());
    }

    #[test]
    fn test_party_lines_pairs_guests_with_their_orders() {
        let request: CreateBookingRequest = serde_json::from_value(serde_json::json!({
            "user_id": 1,
            "event_id": 2,
            "guest_emails": ["a@example.com", "b@example.com"],
            "purchases": [{ "product_id": 1 }],
            "guest_purchases": [{ "purchases": [{ "product_id": 2, "quantity": 3 }] }]
        }))
        .unwrap();

        let parties = request.party_lines();
        assert_eq!(parties.len(), 3);
        assert_eq!(parties[0], &[line(1, 1)][..]);
        assert_eq!(parties[1], &[line(2, 3)][..]);
        assert!(parties[2].is_empty());
        assert!(request.datetime.is_none());
    }

    #[test]
    fn test_product_ids_are_deduplicated() {
        let main = vec![line(3, 1), line(1, 2)];
        let guest = vec![line(3, 4)];
        let parties: Vec<&[PurchaseLine]> = vec![&main, &guest];
        assert_eq!(product_ids(&parties), vec![1, 3]);
    }
}
