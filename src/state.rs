use std::sync::Arc;

use anyhow::Context;

use crate::auth::TokenService;
use crate::config::{AppConfig, StoreBackend};
use crate::database::{DatabaseManager, MemoryUserStore, PgUserStore, UserStore};
use crate::services::{AccountService, CartService};

/// Shared handles passed to every handler and to the auth middleware
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub tokens: Arc<TokenService>,
    pub carts: CartService,
    pub accounts: AccountService,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, tokens: TokenService, config: &AppConfig) -> Self {
        let tokens = Arc::new(tokens);

        Self {
            carts: CartService::new(store.clone()),
            accounts: AccountService::new(store.clone(), tokens.clone(), config.cart.seed_slots),
            store,
            tokens,
        }
    }

    /// Build the configured store backend and token service.
    ///
    /// The Postgres backend is connected and its schema applied before this
    /// returns, so a bad `DATABASE_URL` fails startup rather than the first request.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let tokens = TokenService::from_config(&config.security)
            .context("JWT_SECRET must be set to a non-empty value")?;

        let store: Arc<dyn UserStore> = match config.database.backend {
            StoreBackend::Postgres => {
                let pool = DatabaseManager::connect(&config.database).await?;
                DatabaseManager::ensure_schema(&pool).await?;
                Arc::new(PgUserStore::new(pool))
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory user store; data is lost on restart");
                Arc::new(MemoryUserStore::new())
            }
        };

        Ok(Self::new(store, tokens, config))
    }
}
