use axum::{
    extract::{ws::WebSocketUpgrade, State},
    response::Response,
};

use crate::state::AppState;
use crate::ws::actor;

/// GET /ws
/// WebSocket upgrade endpoint. Allocates the session's connection id and
/// spawns an actor for the connection. Identity is claimed later via
/// `join_room`; there is nothing to authenticate here.
pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let conn_id = state.next_connection_id();
    tracing::info!(conn_id = %conn_id, "WebSocket connection accepted");
    ws.on_upgrade(move |socket| actor::run_connection(socket, state, conn_id))
}
