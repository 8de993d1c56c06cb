pub mod auth;

pub use auth::{auth_token_middleware, AuthUser, AUTH_TOKEN_HEADER};
