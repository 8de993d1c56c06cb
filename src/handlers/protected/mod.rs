// handlers/protected/mod.rs - Protected handlers (auth-token required)
//
// Every route here sits behind `middleware::auth_token_middleware`, which puts
// an `AuthUser` extension on the request before the handler runs.
pub mod cart;

pub use cart::{add_to_cart_post, get_cart_post, remove_from_cart_post};
