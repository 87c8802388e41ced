//! HTTP listener and top-level server wiring.
//!
//! This module:
//! - Listens on the configured address/port.
//! - Serves the demo page and the small JSON/health API.
//! - Accepts WebSocket upgrades on `/ws/<path>`, resolving the room
//!   from the final segment of the raw, undecoded path.
//! - Assigns each connection a `ConnectionId` and spawns its handler.
//!
//! The per-connection read/write loops live in the `client` module.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{ConnectInfo, OriginalUri, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use relay_core::ConnectionId;
use relay_protocol::room_from_path;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::client;
use crate::config::Config;
use crate::demo_page;
use crate::types::{RelayState, RoomStats};

/// Counter for assigning unique `ConnectionId`s.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

fn next_connection_id() -> ConnectionId {
    let id = NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed);
    ConnectionId(id)
}

/// Build the application router.
pub fn router(state: RelayState) -> Router {
    Router::new()
        .route("/", get(demo_page::index))
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/rooms", get(list_rooms))
        .route("/ws/*path", get(ws_handler))
        .with_state(state)
}

/// Run the relay server with the given configuration until Ctrl-C.
pub async fn run(config: Config) -> Result<()> {
    let addr = config.socket_addr_string();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, max_clients = config.max_clients, "listening");

    serve(listener, RelayState::new(config), shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: RelayState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(state).into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    OriginalUri(uri): OriginalUri,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    State(state): State<RelayState>,
) -> Response {
    // `Path` would hand over the decoded capture, merging `a%2Fb` into `b`.
    let path = uri.path();
    let room = match room_from_path(path) {
        Ok(room) => room,
        Err(e) => {
            warn!(%peer, path = %path, "rejecting connection: {}", e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    let current = state.registry.connection_count();
    if current >= state.config.max_clients {
        warn!(
            %peer,
            max_clients = state.config.max_clients,
            "rejecting connection: max_clients reached"
        );
        return (StatusCode::SERVICE_UNAVAILABLE, "too many clients").into_response();
    }

    let id = next_connection_id();
    info!(connection = %id, %peer, room = %room, "accepted connection");

    ws.on_upgrade(move |socket| async move {
        match client::run_client(id, socket, room, state).await {
            Ok(()) => info!(connection = %id, "client disconnected"),
            Err(e) => warn!(connection = %id, "client error: {:#}", e),
        }
    })
}

async fn list_rooms(State(state): State<RelayState>) -> Json<Vec<RoomStats>> {
    let rooms = state
        .registry
        .rooms()
        .into_iter()
        .map(|(room, members)| RoomStats {
            room: room.to_string(),
            members,
        })
        .collect();
    Json(rooms)
}
