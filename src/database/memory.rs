use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::database::models::{CartAdjustment, Quantity, SlotIndex, UserRecord};
use crate::database::store::{StoreError, UserStore};

/// Process-local user store.
///
/// Each record sits behind its own mutex, so cart adjustments for one user are
/// serialized while different users never contend.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, Arc<Mutex<UserRecord>>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn entry(&self, id: Uuid) -> Option<Arc<Mutex<UserRecord>>> {
        self.users.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        match self.entry(id).await {
            Some(entry) => Ok(Some(entry.lock().await.clone())),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().await;
        for entry in users.values() {
            let user = entry.lock().await;
            if user.email == email {
                return Ok(Some(user.clone()));
            }
        }
        Ok(None)
    }

    async fn save(&self, user: &UserRecord) -> Result<(), StoreError> {
        // Write lock held across the uniqueness check and the insert
        let mut users = self.users.write().await;

        for (id, entry) in users.iter() {
            if *id != user.id && entry.lock().await.email == user.email {
                return Err(StoreError::DuplicateEmail(user.email.clone()));
            }
        }

        match users.get(&user.id) {
            Some(existing) => *existing.lock().await = user.clone(),
            None => {
                users.insert(user.id, Arc::new(Mutex::new(user.clone())));
            }
        }
        Ok(())
    }

    async fn adjust_cart(
        &self,
        id: Uuid,
        slot: SlotIndex,
        adjustment: CartAdjustment,
    ) -> Result<Option<Quantity>, StoreError> {
        let Some(entry) = self.entry(id).await else {
            return Ok(None);
        };

        let mut user = entry.lock().await;
        Ok(Some(user.cart.apply(slot, adjustment)))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Cart;

    fn user(email: &str) -> UserRecord {
        UserRecord::new("Test".into(), email.into(), "x".into(), Cart::default())
    }

    #[tokio::test]
    async fn save_then_find_by_id_and_email() {
        let store = MemoryUserStore::new();
        let alice = user("alice@example.com");
        store.save(&alice).await.unwrap();

        let by_id = store.find_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "alice@example.com");

        let by_email = store.find_by_email("alice@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, alice.id);

        assert!(store.find_by_email("bob@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryUserStore::new();
        store.save(&user("dup@example.com")).await.unwrap();

        let err = store.save(&user("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn save_overwrites_existing_record() {
        let store = MemoryUserStore::new();
        let mut alice = user("alice@example.com");
        store.save(&alice).await.unwrap();

        alice.cart.apply(3, CartAdjustment::Increment);
        store.save(&alice).await.unwrap();

        let stored = store.find_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(stored.cart.quantity(3), 1);
    }

    #[tokio::test]
    async fn adjust_unknown_user_returns_none() {
        let store = MemoryUserStore::new();
        let result = store
            .adjust_cart(Uuid::new_v4(), 1, CartAdjustment::Increment)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn decrementing_an_absent_slot_leaves_cart_unchanged() {
        let store = MemoryUserStore::new();
        let mut alice = user("alice@example.com");
        alice.cart = Cart::seeded(3);
        store.save(&alice).await.unwrap();

        let result = store.adjust_cart(alice.id, 1000, CartAdjustment::Decrement).await.unwrap();
        assert_eq!(result, Some(0));

        let stored = store.find_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(stored.cart, Cart::seeded(3));
    }

    #[tokio::test]
    async fn concurrent_increments_are_not_lost() {
        let store = Arc::new(MemoryUserStore::new());
        let alice = user("alice@example.com");
        store.save(&alice).await.unwrap();

        let tasks: Vec<_> = (0..64)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .adjust_cart(alice.id, 9, CartAdjustment::Increment)
                        .await
                        .unwrap()
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let stored = store.find_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(stored.cart.quantity(9), 64);
    }
}
