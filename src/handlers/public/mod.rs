// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition (/signup, /login) and liveness (/, /health).
pub mod auth;
pub mod status;

pub use auth::{login_post, signup_post};
pub use status::{health_get, root_get};
