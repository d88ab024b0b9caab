//! Inbound HTTP listener and routing.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::post;
use tracing::{info, warn};

use relaykit_protocols::{BindingError, ReadHandler, ReadResponse};

use crate::ListenConfig;

/// Fixed acknowledgement returned for every inbound request.
const ACK_BODY: &str = r#"{"errcode":0,"errmsg":"ok"}"#;

/// Shared state for the inbound route.
struct InboundState {
    handler: ReadHandler,
}

/// Derive the listen path from the configured url: the path component of an
/// absolute url, or the bare path itself with any query stripped.
pub(crate) fn inbound_path(raw: &str) -> String {
    let path = match url::Url::parse(raw) {
        Ok(url) => url.path().to_string(),
        Err(_) => raw.split(['?', '#']).next().unwrap_or("").to_string(),
    };
    if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    }
}

/// Create the router serving the inbound webhook route.
pub(crate) fn create_router(path: &str, handler: ReadHandler) -> Router {
    let state = Arc::new(InboundState { handler });
    Router::new().route(path, post(receive)).with_state(state)
}

/// Forward the request body to the registered handler and acknowledge.
///
/// The handler's returned payload is not relayed back to the caller, and a
/// handler error only produces a log line; the acknowledgement is fixed.
async fn receive(State(state): State<Arc<InboundState>>, body: Bytes) -> impl IntoResponse {
    let response = ReadResponse {
        data: body.to_vec(),
    };
    if let Err(error) = (state.handler)(response).await {
        warn!(%error, "inbound handler failed; acknowledging anyway");
    }
    ([(header::CONTENT_TYPE, "application/json")], ACK_BODY)
}

/// Bind the listener and serve until the host process stops.
///
/// The bound address is recorded in `local_addr` before serving so callers
/// can discover an ephemeral port.
pub(crate) async fn serve(
    listen: &ListenConfig,
    local_addr: &OnceLock<SocketAddr>,
    path: String,
    handler: ReadHandler,
) -> Result<(), BindingError> {
    let router = create_router(&path, handler);

    let listener = tokio::net::TcpListener::bind((listen.host.as_str(), listen.port))
        .await
        .map_err(|e| BindingError::ListenFailed(format!("failed to bind: {e}")))?;
    let addr = listener
        .local_addr()
        .map_err(|e| BindingError::ListenFailed(e.to_string()))?;
    let _ = local_addr.set(addr);

    info!(%addr, %path, "webhook listener started");

    axum::serve(listener, router)
        .await
        .map_err(|e| BindingError::ListenFailed(e.to_string()))
}
