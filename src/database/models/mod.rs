pub mod user;

pub use user::{Cart, CartAdjustment, Quantity, SlotIndex, UserRecord};
