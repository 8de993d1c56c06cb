use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{CartAdjustment, Quantity, SlotIndex, UserRecord};

/// Errors from any user store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Document store holding one record per user, cart included.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Creates the record or fully overwrites an existing one with the same id.
    async fn save(&self, user: &UserRecord) -> Result<(), StoreError>;

    /// Atomically applies one adjustment to one slot of a user's cart.
    ///
    /// Returns the new quantity, or `None` when no such user exists. Concurrent
    /// adjustments for the same user never lose an update.
    async fn adjust_cart(
        &self,
        id: Uuid,
        slot: SlotIndex,
        adjustment: CartAdjustment,
    ) -> Result<Option<Quantity>, StoreError>;

    /// Cheap round trip used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
