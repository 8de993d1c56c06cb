use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use crate::auth::TokenService;
use crate::config::{AppConfig, SecurityConfig};
use crate::database::{MemoryUserStore, UserStore};
use crate::middleware::AUTH_TOKEN_HEADER;
use crate::server::app;
use crate::state::AppState;

pub const TEST_SECRET: &str = "test-signing-key";
pub const TEST_PASSWORD: &str = "pw-123";

/// In-process router over an in-memory store, driven with `oneshot`
pub struct TestContext {
    app: Router,
    tokens: Arc<TokenService>,
}

impl TestContext {
    pub fn new(seed_slots: u32) -> Self {
        Self::with_store(Arc::new(MemoryUserStore::new()), seed_slots)
    }

    pub fn with_store(store: Arc<dyn UserStore>, seed_slots: u32) -> Self {
        let mut config = AppConfig::development();
        config.cart.seed_slots = seed_slots;
        config.security.jwt_secret = TEST_SECRET.to_string();

        let tokens = TokenService::from_config(&config.security).expect("test token service");
        let state = AppState::new(store, tokens, &config);

        Self {
            tokens: state.tokens.clone(),
            app: app(state, false),
        }
    }

    /// Sign up through the HTTP surface and return the issued token
    pub async fn signup(&self, email: &str) -> String {
        let (status, body) = self
            .post_json(
                "/signup",
                None,
                json!({ "username": "Tester", "email": email, "password": TEST_PASSWORD }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "signup failed: {body}");
        body["token"].as_str().expect("token in signup response").to_string()
    }

    /// Well-formed token signed with a key this server does not trust
    pub fn foreign_token(&self) -> String {
        let foreign = TokenService::from_config(&SecurityConfig {
            jwt_secret: "someone-elses-key".to_string(),
            jwt_previous_secrets: vec![],
            jwt_expiry_hours: 1,
        })
        .expect("foreign token service");
        foreign.issue(Uuid::new_v4()).expect("foreign token")
    }

    /// Valid signature, but no such user in the store
    pub fn token_for_unknown_user(&self) -> String {
        self.tokens.issue(Uuid::new_v4()).expect("token")
    }

    pub async fn get_cart(&self, token: &str) -> Value {
        let (status, body) = self.post_json("/getcart", Some(token), json!({})).await;
        assert_eq!(status, StatusCode::OK, "getcart failed: {body}");
        body
    }

    pub async fn post_json(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let (status, text) = self.post_text(path, token, body).await;
        let value = serde_json::from_str(&text)
            .unwrap_or_else(|e| panic!("non-JSON body from {path} ({status}): {text:?}: {e}"));
        (status, value)
    }

    pub async fn post_text(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, String) {
        let mut request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            request = request.header(AUTH_TOKEN_HEADER, token);
        }
        let request = request
            .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
            .expect("build request");

        self.send(request).await
    }

    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())
            .expect("build request");

        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.expect("infallible router");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }
}
