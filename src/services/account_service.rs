use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{TokenError, TokenService};
use crate::database::models::{Cart, UserRecord};
use crate::database::{StoreError, UserStore};

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("existing user found with this email")]
    EmailTaken,

    #[error("please try with correct email/password")]
    InvalidCredentials,

    #[error("{0}")]
    Validation(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(_) => AccountError::EmailTaken,
            other => AccountError::Store(other),
        }
    }
}

/// Signup and login; both hand back a freshly issued credential.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn UserStore>,
    tokens: Arc<TokenService>,
    seed_slots: u32,
}

#[derive(Debug)]
pub struct SignupInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct IssuedSession {
    pub user_id: Uuid,
    pub token: String,
}

impl AccountService {
    pub fn new(store: Arc<dyn UserStore>, tokens: Arc<TokenService>, seed_slots: u32) -> Self {
        Self {
            store,
            tokens,
            seed_slots,
        }
    }

    pub async fn signup(&self, input: SignupInput) -> Result<IssuedSession, AccountError> {
        let email = normalize_email(&input.email);
        validate_email_format(&email).map_err(AccountError::Validation)?;
        if input.password.is_empty() {
            return Err(AccountError::Validation("Password cannot be empty".to_string()));
        }

        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AccountError::EmailTaken);
        }

        let password_hash = hash_password(&input.password)
            .map_err(|e| AccountError::PasswordHash(e.to_string()))?;
        let user = UserRecord::new(
            input.username.trim().to_string(),
            email,
            password_hash,
            Cart::seeded(self.seed_slots),
        );
        // A concurrent signup with the same email surfaces as DuplicateEmail here
        self.store.save(&user).await?;

        tracing::info!(user_id = %user.id, "user signed up");
        let token = self.tokens.issue(user.id)?;
        Ok(IssuedSession {
            user_id: user.id,
            token,
        })
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedSession, AccountError> {
        let email = normalize_email(email);
        let user = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !verify_password(password, &user.password) {
            tracing::warn!(user_id = %user.id, "login rejected: wrong password");
            return Err(AccountError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "user logged in");
        let token = self.tokens.issue(user.id)?;
        Ok(IssuedSession {
            user_id: user.id,
            token,
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Basic email validation for signup.
pub fn validate_email_format(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err("Email must contain @".to_string());
    };

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err("Email format is invalid".to_string());
    }

    if email.chars().any(char::is_whitespace) {
        return Err("Email cannot contain whitespace".to_string());
    }

    Ok(())
}
