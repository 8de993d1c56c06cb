// handlers/protected/cart.rs - cart endpoints for the authenticated user

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{de, Deserialize, Deserializer};

use crate::database::models::{Cart, SlotIndex};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CartItemRequest {
    #[serde(rename = "itemId", deserialize_with = "deserialize_item_id")]
    pub item_id: SlotIndex,
}

// Storefront clients send the id either as a number or as a numeric string
#[derive(Deserialize)]
#[serde(untagged)]
enum RawItemId {
    Number(SlotIndex),
    Text(String),
}

fn deserialize_item_id<'de, D>(deserializer: D) -> Result<SlotIndex, D::Error>
where
    D: Deserializer<'de>,
{
    match RawItemId::deserialize(deserializer) {
        Ok(RawItemId::Number(slot)) => Ok(slot),
        Ok(RawItemId::Text(text)) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("itemId must be a non-negative integer, got {text:?}"))),
        Err(_) => Err(de::Error::custom("itemId must be a non-negative integer")),
    }
}

fn parse_item(payload: Result<Json<CartItemRequest>, JsonRejection>) -> Result<SlotIndex, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    Ok(request.item_id)
}

/// POST /addtocart - `{ "itemId": n }` → `Added`
pub async fn add_to_cart_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<CartItemRequest>, JsonRejection>,
) -> Result<&'static str, ApiError> {
    let slot = parse_item(payload)?;
    state.carts.add_item(auth.user_id, slot).await?;
    Ok("Added")
}

/// POST /removefromcart - `{ "itemId": n }` → `Removed`
pub async fn remove_from_cart_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<CartItemRequest>, JsonRejection>,
) -> Result<&'static str, ApiError> {
    let slot = parse_item(payload)?;
    state.carts.remove_item(auth.user_id, slot).await?;
    Ok("Removed")
}

/// POST /getcart - full slot → quantity map, keys as strings
pub async fn get_cart_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Cart>, ApiError> {
    let cart = state.carts.get_cart(auth.user_id).await?;
    Ok(Json(cart))
}
