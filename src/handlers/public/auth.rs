// handlers/public/auth.rs - POST /signup and POST /login

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::services::{IssuedSession, SignupInput};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

impl From<IssuedSession> for TokenResponse {
    fn from(session: IssuedSession) -> Self {
        Self {
            success: true,
            token: session.token,
        }
    }
}

/// POST /signup - create an account with an empty cart and receive a token
///
/// Expected Input:
/// ```json
/// { "username": "string", "email": "string", "password": "string" }
/// ```
///
/// Output: `{ "success": true, "token": "eyJhbGciOiJIUzI1NiI..." }`, or 400
/// `{ "success": false, "errors": "existing user found with this email" }`.
pub async fn signup_post(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::credentials_rejected(e.body_text()))?;

    let session = state
        .accounts
        .signup(SignupInput {
            username: payload.username,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok(Json(session.into()))
}

/// POST /login - exchange email and password for a token
///
/// Unknown email and wrong password produce the same 400 response.
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::credentials_rejected(e.body_text()))?;

    let session = state
        .accounts
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(session.into()))
}
