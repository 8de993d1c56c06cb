use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Cart, CartAdjustment, Quantity, SlotIndex};
use crate::database::{StoreError, UserStore};

#[derive(Debug, Error)]
pub enum CartError {
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Reads and mutates a single user's cart.
///
/// Every mutation is one atomic store call, so two requests for the same user
/// and slot both land even when they arrive together.
#[derive(Clone)]
pub struct CartService {
    store: Arc<dyn UserStore>,
}

impl CartService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Adds one unit of `slot`. A slot never seen before counts from zero.
    pub async fn add_item(&self, user_id: Uuid, slot: SlotIndex) -> Result<Quantity, CartError> {
        self.adjust(user_id, slot, CartAdjustment::Increment).await
    }

    /// Removes one unit of `slot` if any are present; an empty slot stays at zero.
    pub async fn remove_item(&self, user_id: Uuid, slot: SlotIndex) -> Result<Quantity, CartError> {
        self.adjust(user_id, slot, CartAdjustment::Decrement).await
    }

    pub async fn get_cart(&self, user_id: Uuid) -> Result<Cart, CartError> {
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(CartError::UserNotFound(user_id))?;

        tracing::debug!(%user_id, items = user.cart.total_items(), "cart read");
        Ok(user.cart)
    }

    async fn adjust(
        &self,
        user_id: Uuid,
        slot: SlotIndex,
        adjustment: CartAdjustment,
    ) -> Result<Quantity, CartError> {
        let quantity = self
            .store
            .adjust_cart(user_id, slot, adjustment)
            .await?
            .ok_or(CartError::UserNotFound(user_id))?;

        tracing::debug!(%user_id, slot, ?adjustment, quantity, "cart adjusted");
        Ok(quantity)
    }
}
