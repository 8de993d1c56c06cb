use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{CartAdjustment, Quantity, SlotIndex, UserRecord};
use crate::database::store::{StoreError, UserStore};

const SELECT_USER_COLUMNS: &str = "SELECT id, name, email, password, cart_data, created_at FROM users";

const UPSERT_USER_SQL: &str = r#"
    INSERT INTO users (id, name, email, password, cart_data, created_at)
    VALUES ($1, $2, $3, $4, $5, $6)
    ON CONFLICT (id) DO UPDATE SET
        name = EXCLUDED.name,
        email = EXCLUDED.email,
        password = EXCLUDED.password,
        cart_data = EXCLUDED.cart_data
"#;

// Single statement: the row lock taken by UPDATE serializes concurrent
// adjustments for one user. Result is clamped to [0, u32::MAX]. Decrementing
// a slot the cart does not hold leaves the document as it was.
const ADJUST_CART_SQL: &str = r#"
    UPDATE users
    SET cart_data = CASE
        WHEN $3::bigint < 0 AND NOT (cart_data ? $2::text) THEN cart_data
        ELSE jsonb_set(
            cart_data,
            ARRAY[$2::text],
            to_jsonb(LEAST(GREATEST(COALESCE((cart_data ->> $2::text)::bigint, 0) + $3, 0), 4294967295))
        )
    END
    WHERE id = $1
    RETURNING COALESCE((cart_data ->> $2::text)::bigint, 0) AS quantity
"#;

/// User store backed by the `users` table, cart kept as a JSONB document
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(&format!("{SELECT_USER_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(&format!("{SELECT_USER_COLUMNS} WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn save(&self, user: &UserRecord) -> Result<(), StoreError> {
        let result = sqlx::query(UPSERT_USER_SQL)
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password)
            .bind(Json(&user.cart))
            .bind(user.created_at)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::DuplicateEmail(user.email.clone()))
            }
            Err(other) => Err(other.into()),
        }
    }

    async fn adjust_cart(
        &self,
        id: Uuid,
        slot: SlotIndex,
        adjustment: CartAdjustment,
    ) -> Result<Option<Quantity>, StoreError> {
        let quantity = sqlx::query_scalar::<_, i64>(ADJUST_CART_SQL)
            .bind(id)
            .bind(slot.to_string())
            .bind(adjustment.delta())
            .fetch_optional(&self.pool)
            .await?;

        Ok(quantity.map(|q| Quantity::try_from(q).unwrap_or(Quantity::MAX)))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
