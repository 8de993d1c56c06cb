pub mod account_service;
pub mod cart_service;

pub use account_service::{AccountError, AccountService, IssuedSession, SignupInput};
pub use cart_service::{CartError, CartService};
