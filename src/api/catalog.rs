//! Events and products.

use super::extract::{parse_id, JsonBody};
use super::response::{created, done, ok, ApiJson};
use crate::error::AppResult;
use crate::models::{EventChanges, EventInput, EventWithImages, ProductChanges, ProductInput, ProductWithImages};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use std::sync::Arc;

pub async fn list_events(State(state): State<Arc<AppState>>) -> AppResult<ApiJson<Vec<EventWithImages>>> {
    Ok(ok(state.catalog.list_events().await?))
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    JsonBody(input): JsonBody<EventInput>,
) -> AppResult<(StatusCode, ApiJson<EventWithImages>)> {
    let event = state.catalog.create_event(input).await?;
    Ok(created(event, "Event created"))
}

pub async fn show_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<ApiJson<EventWithImages>> {
    let id = parse_id(&id, "event")?;
    Ok(ok(state.catalog.event(id).await?))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(changes): JsonBody<EventChanges>,
) -> AppResult<ApiJson<EventWithImages>> {
    let id = parse_id(&id, "event")?;
    Ok(ok(state.catalog.update_event(id, changes).await?))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<ApiJson<Option<()>>> {
    let id = parse_id(&id, "event")?;
    state.catalog.delete_event(id).await?;
    Ok(done("Event deleted"))
}

pub async fn list_products(State(state): State<Arc<AppState>>) -> AppResult<ApiJson<Vec<ProductWithImages>>> {
    Ok(ok(state.catalog.list_products().await?))
}

pub async fn create_product(
    State(state): State<Arc<AppState>>,
    JsonBody(input): JsonBody<ProductInput>,
) -> AppResult<(StatusCode, ApiJson<ProductWithImages>)> {
    let product = state.catalog.create_product(input).await?;
    Ok(created(product, "Product created"))
}

pub async fn show_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<ApiJson<ProductWithImages>> {
    let id = parse_id(&id, "product")?;
    Ok(ok(state.catalog.product(id).await?))
}

pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(changes): JsonBody<ProductChanges>,
) -> AppResult<ApiJson<ProductWithImages>> {
    let id = parse_id(&id, "product")?;
    Ok(ok(state.catalog.update_product(id, changes).await?))
}

pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<ApiJson<Option<()>>> {
    let id = parse_id(&id, "product")?;
    state.catalog.delete_product(id).await?;
    Ok(done("Product deleted"))
}
