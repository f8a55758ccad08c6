use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use crate::state::AppState;
use crate::ws::handler as ws_handler;

/// GET /api/info — Public endpoint returning server name, version, and the
/// origin it accepts cross-origin calls from.
async fn server_info(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "allowed_origin": state.allowed_origin,
    }))
}

/// GET /api/presence — Current online/offline status for every display name
/// the server has seen.
async fn presence_snapshot(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    let entries: Vec<serde_json::Value> = state
        .engine
        .presence_snapshot()
        .into_iter()
        .map(|(username, status)| {
            serde_json::json!({
                "username": username,
                "status": status.as_str(),
            })
        })
        .collect();
    Json(serde_json::Value::Array(entries))
}

/// Build the full axum Router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    // CORS restricted to the single configured caller, GET/POST only.
    let cors = match state.allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST]),
        Err(e) => {
            tracing::warn!(
                allowed_origin = %state.allowed_origin,
                error = %e,
                "allowed_origin is not a valid header value, CORS will reject cross-origin calls"
            );
            CorsLayer::new().allow_methods([Method::GET, Method::POST])
        }
    };

    Router::new()
        .route("/ws", get(ws_handler::ws_upgrade))
        .route("/api/info", get(server_info))
        .route("/api/presence", get(presence_snapshot))
        .layer(cors)
        .with_state(state)
}
