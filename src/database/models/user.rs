use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, types::Json, FromRow, Row};
use uuid::Uuid;

/// Position of a catalog item inside a cart. Equal to the product id.
pub type SlotIndex = u32;

/// Number of units of one item held in a cart.
pub type Quantity = u32;

/// Direction of a single-unit cart mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAdjustment {
    Increment,
    Decrement,
}

impl CartAdjustment {
    pub fn delta(self) -> i64 {
        match self {
            CartAdjustment::Increment => 1,
            CartAdjustment::Decrement => -1,
        }
    }
}

/// Sparse slot -> quantity map. An absent slot holds zero.
///
/// Serializes as a JSON object keyed by the slot index as a string, which is
/// both the persisted `cart_data` document and the `/getcart` response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart(BTreeMap<SlotIndex, Quantity>);

impl Cart {
    /// A cart with slots `0..slots` present and zeroed.
    pub fn seeded(slots: u32) -> Self {
        Self((0..slots).map(|slot| (slot, 0)).collect())
    }

    pub fn quantity(&self, slot: SlotIndex) -> Quantity {
        self.0.get(&slot).copied().unwrap_or(0)
    }

    /// Applies one adjustment and returns the new quantity at `slot`.
    ///
    /// Decrementing an empty slot leaves it at zero, and decrementing a slot
    /// that is not present leaves the cart untouched.
    pub fn apply(&mut self, slot: SlotIndex, adjustment: CartAdjustment) -> Quantity {
        match adjustment {
            CartAdjustment::Increment => {
                let quantity = self.0.entry(slot).or_insert(0);
                *quantity = quantity.saturating_add(1);
                *quantity
            }
            CartAdjustment::Decrement => match self.0.get_mut(&slot) {
                Some(quantity) => {
                    *quantity = quantity.saturating_sub(1);
                    *quantity
                }
                None => 0,
            },
        }
    }

    pub fn total_items(&self) -> u64 {
        self.0.values().map(|q| u64::from(*q)).sum()
    }
}

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Salted digest; see `auth::password`.
    pub password: String,
    pub cart: Cart,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(name: String, email: String, password: String, cart: Cart) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password,
            cart,
            created_at: Utc::now(),
        }
    }
}

impl<'r> FromRow<'r, PgRow> for UserRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let Json(cart) = row.try_get::<Json<Cart>, _>("cart_data")?;

        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password: row.try_get("password")?,
            cart,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_slot_reads_as_zero() {
        assert_eq!(Cart::default().quantity(42), 0);
    }

    #[test]
    fn decrement_never_goes_negative() {
        let mut cart = Cart::default();
        assert_eq!(cart.apply(5, CartAdjustment::Decrement), 0);
        assert_eq!(cart.apply(5, CartAdjustment::Increment), 1);
        assert_eq!(cart.apply(5, CartAdjustment::Decrement), 0);
        assert_eq!(cart.apply(5, CartAdjustment::Decrement), 0);
    }

    #[test]
    fn decrementing_an_absent_slot_adds_no_key() {
        let mut cart = Cart::seeded(3);
        let before = cart.clone();

        assert_eq!(cart.apply(1000, CartAdjustment::Decrement), 0);

        assert_eq!(cart, before);
        assert_eq!(
            serde_json::to_value(&cart).unwrap(),
            serde_json::json!({ "0": 0, "1": 0, "2": 0 })
        );
    }

    #[test]
    fn seeded_cart_serializes_with_string_keys() {
        let mut cart = Cart::seeded(3);
        cart.apply(1, CartAdjustment::Increment);

        let value = serde_json::to_value(&cart).unwrap();
        assert_eq!(value, serde_json::json!({ "0": 0, "1": 1, "2": 0 }));

        let back: Cart = serde_json::from_value(value).unwrap();
        assert_eq!(back, cart);
    }

    #[test]
    fn total_items_sums_all_slots() {
        let mut cart = Cart::seeded(10);
        cart.apply(2, CartAdjustment::Increment);
        cart.apply(2, CartAdjustment::Increment);
        cart.apply(7, CartAdjustment::Increment);
        assert_eq!(cart.total_items(), 3);
    }
}
