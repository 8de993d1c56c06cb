use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::handlers::{protected, public};
use crate::middleware::auth_token_middleware;
use crate::state::AppState;

pub fn app(state: AppState, request_logging: bool) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(public::root_get))
        .route("/health", get(public::health_get))
        .merge(auth_public_routes())
        // Protected
        .merge(cart_routes(state.clone()));

    let router = if request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(public::signup_post))
        .route("/login", post(public::login_post))
}

fn cart_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/addtocart", post(protected::add_to_cart_post))
        .route("/removefromcart", post(protected::remove_from_cart_post))
        .route("/getcart", post(protected::get_cart_post))
        .route_layer(middleware::from_fn_with_state(state, auth_token_middleware))
}

pub async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Vastra API in {:?} mode", config.environment);

    let state = AppState::from_config(config).await?;
    let app = app(state, config.server.enable_request_logging);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Vastra API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
