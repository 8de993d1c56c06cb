use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::TokenError;
use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the credential issued at signup/login
pub const AUTH_TOKEN_HEADER: &str = "auth-token";

/// Authenticated user context extracted from the credential
#[derive(Clone, Copy, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
}

/// Verifies the `auth-token` header and injects `AuthUser` into the request.
///
/// Rejected requests never reach the handler, so they cannot touch the store.
pub async fn auth_token_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_headers(&headers)?;

    let user_id = state.tokens.verify(token).map_err(|e| {
        tracing::debug!("Rejected auth token: {}", e);
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}

/// Extract the raw token from the `auth-token` header
fn extract_token_from_headers(headers: &HeaderMap) -> Result<&str, TokenError> {
    let value = headers.get(AUTH_TOKEN_HEADER).ok_or(TokenError::Missing)?;

    let token = value
        .to_str()
        .map_err(|_| TokenError::Invalid("header is not valid ASCII".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(TokenError::Missing);
    }
    Ok(token)
}
