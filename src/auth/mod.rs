pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

/// Identity block embedded in every credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsUser {
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user: ClaimsUser,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    pub fn new(user_id: Uuid, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (expiry_hours > 0)
            .then(|| (now + Duration::hours(expiry_hours as i64)).timestamp());

        Self {
            user: ClaimsUser { id: user_id },
            iat: now.timestamp(),
            exp,
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("missing auth token")]
    Missing,

    #[error("invalid auth token: {0}")]
    Invalid(String),

    #[error("JWT secret not configured")]
    SecretNotConfigured,

    #[error("JWT generation error: {0}")]
    Generation(String),
}

/// Issues and verifies signed credentials.
///
/// Tokens are always signed with the current secret. Verification falls back
/// to each previous secret in order so keys can be rotated without logging
/// every user out.
#[derive(Clone)]
pub struct TokenService {
    current: String,
    previous: Vec<String>,
    expiry_hours: u64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("previous_keys", &self.previous.len())
            .field("expiry_hours", &self.expiry_hours)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn from_config(security: &SecurityConfig) -> Result<Self, TokenError> {
        if security.jwt_secret.is_empty() {
            return Err(TokenError::SecretNotConfigured);
        }

        Ok(Self {
            current: security.jwt_secret.clone(),
            previous: security
                .jwt_previous_secrets
                .iter()
                .filter(|s| !s.is_empty())
                .cloned()
                .collect(),
            expiry_hours: security.jwt_expiry_hours,
        })
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        let claims = Claims::new(user_id, self.expiry_hours);
        let encoding_key = EncodingKey::from_secret(self.current.as_bytes());

        encode(&Header::default(), &claims, &encoding_key)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::Missing);
        }

        let mut validation = Validation::default();
        // exp is optional; when present it is still enforced
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        let mut last_error = None;
        for secret in std::iter::once(&self.current).chain(self.previous.iter()) {
            let decoding_key = DecodingKey::from_secret(secret.as_bytes());
            match decode::<Claims>(token, &decoding_key, &validation) {
                Ok(data) => return Ok(data.claims.user.id),
                Err(e) => last_error = Some(e),
            }
        }

        Err(TokenError::Invalid(
            last_error.map(|e| e.to_string()).unwrap_or_default(),
        ))
    }
}
