use crate::error::{AppError, AppResult};
use crate::models::event::validate_event;
use crate::models::{
    Event, EventChanges, EventInput, EventWithImages, Product, ProductChanges, ProductInput,
    ProductWithImages, DEFAULT_MAX_TICKET,
};
use crate::repositories::{EventRepository, ImageRepository, ProductRepository};
use std::sync::Arc;
use tracing::info;

/// Events and drinks, each served with their gallery images
pub struct CatalogService {
    event_repo: Arc<EventRepository>,
    product_repo: Arc<ProductRepository>,
    image_repo: Arc<ImageRepository>,
}

impl CatalogService {
    pub fn new(
        event_repo: Arc<EventRepository>,
        product_repo: Arc<ProductRepository>,
        image_repo: Arc<ImageRepository>,
    ) -> Self {
        Self {
            event_repo,
            product_repo,
            image_repo,
        }
    }

    // =========================================================================
    // Events
    // =========================================================================

    pub async fn list_events(&self) -> AppResult<Vec<EventWithImages>> {
        let events = self.event_repo.list().await?;
        self.with_event_images(events).await
    }

    pub async fn event(&self, id: i32) -> AppResult<EventWithImages> {
        let event = self
            .event_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))?;

        let mut events = self.with_event_images(vec![event]).await?;
        events
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))
    }

    /// Attach gallery images to each event, preserving order
    pub async fn with_event_images(&self, events: Vec<Event>) -> AppResult<Vec<EventWithImages>> {
        let ids: Vec<i32> = events.iter().map(|e| e.id).collect();
        let mut images = self.image_repo.find_for_events(&ids).await?;

        Ok(events
            .into_iter()
            .map(|event| EventWithImages {
                images: images.remove(&event.id).unwrap_or_default(),
                event,
            })
            .collect())
    }

    pub async fn create_event(&self, input: EventInput) -> AppResult<EventWithImages> {
        validate_event(
            input.start_datetime,
            input.end_datetime,
            &input.name,
            input.max_ticket.unwrap_or(DEFAULT_MAX_TICKET),
        )
        .map_err(AppError::Validation)?;

        let event = self.event_repo.create(&input).await?;
        info!("Created event {} ({})", event.id, event.name);

        Ok(EventWithImages {
            event,
            images: Vec::new(),
        })
    }

    pub async fn update_event(&self, id: i32, changes: EventChanges) -> AppResult<EventWithImages> {
        let current = self
            .event_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))?;

        let max_ticket = changes.max_ticket.unwrap_or(current.max_ticket);
        validate_event(
            changes.start_datetime.unwrap_or(current.start_datetime),
            changes.end_datetime.unwrap_or(current.end_datetime),
            changes.name.as_deref().unwrap_or(&current.name),
            max_ticket,
        )
        .map_err(AppError::Validation)?;

        if changes.max_ticket.is_some() {
            let issued = self.event_repo.count_tickets(id).await?;
            if i64::from(max_ticket) < issued {
                return Err(AppError::BusinessLogic(format!(
                    "Cannot lower max_ticket below the {} tickets already issued",
                    issued
                )));
            }
        }

        let event = self
            .event_repo
            .update(id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))?;

        let mut events = self.with_event_images(vec![event]).await?;
        events
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))
    }

    pub async fn delete_event(&self, id: i32) -> AppResult<()> {
        if !self.event_repo.delete(id).await? {
            return Err(AppError::NotFound(format!("Event {} not found", id)));
        }
        info!("Deleted event {}", id);
        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    pub async fn list_products(&self) -> AppResult<Vec<ProductWithImages>> {
        let products = self.product_repo.list().await?;
        self.with_product_images(products).await
    }

    pub async fn product(&self, id: i32) -> AppResult<ProductWithImages> {
        let product = self
            .product_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;

        let mut products = self.with_product_images(vec![product]).await?;
        products
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))
    }

    async fn with_product_images(&self, products: Vec<Product>) -> AppResult<Vec<ProductWithImages>> {
        let ids: Vec<i32> = products.iter().map(|p| p.id).collect();
        let mut images = self.image_repo.find_for_products(&ids).await?;

        Ok(products
            .into_iter()
            .map(|product| ProductWithImages {
                images: images.remove(&product.id).unwrap_or_default(),
                product,
            })
            .collect())
    }

    pub async fn create_product(&self, input: ProductInput) -> AppResult<ProductWithImages> {
        input.validate().map_err(AppError::Validation)?;

        let product = self.product_repo.create(&input).await?;
        info!("Created product {} ({})", product.id, product.name);

        Ok(ProductWithImages {
            product,
            images: Vec::new(),
        })
    }

    pub async fn update_product(&self, id: i32, changes: ProductChanges) -> AppResult<ProductWithImages> {
        if changes.name.as_deref().map_or(false, |n| n.trim().is_empty()) {
            return Err(AppError::Validation("Product name is required".to_string()));
        }
        if changes.price.map_or(false, |p| p.is_sign_negative()) {
            return Err(AppError::Validation("Product price must not be negative".to_string()));
        }

        let product = self
            .product_repo
            .update(id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;

        let mut products = self.with_product_images(vec![product]).await?;
        products
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))
    }

    pub async fn delete_product(&self, id: i32) -> AppResult<()> {
        if !self.product_repo.delete(id).await? {
            return Err(AppError::NotFound(format!("Product {} not found", id)));
        }
        info!("Deleted product {}", id);
        Ok(())
    }
}
