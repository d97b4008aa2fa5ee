use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::{info, warn};

use ferry_streamer::{ChannelSink, FileStreamer, StreamError, TransferRequest};

/// Shared application state for all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub streamer: Arc<FileStreamer>,
    pub attachment: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/files/{name}", get(download_file))
        .route("/health", get(health))
        .with_state(state)
}

/// GET /files/{name} — throttled, range-aware download.
///
/// The transfer runs in its own task, writing into a [`ChannelSink`];
/// the handler waits for the response head, then hands the body channel
/// to axum as a stream. If the streamer fails before emitting a head,
/// the error is recovered from the task and mapped to a status code.
pub async fn download_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Result<Response, StatusCode> {
    // Serve only direct children of the storage root.
    if name.is_empty() || name == ".." || name.contains(['/', '\\']) {
        return Err(StatusCode::BAD_REQUEST);
    }
    let path = state.root.join(&name);

    let range = headers
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let (mut sink, head_rx, body_rx) = ChannelSink::new();
    let streamer = state.streamer.clone();
    let hook_name = name.clone();
    let req = TransferRequest {
        range,
        with_disposition: state.attachment,
        on_complete: Some(Box::new(move || {
            info!("download of {} ran to end-of-file", hook_name);
        })),
    };

    let task = tokio::spawn(async move {
        match streamer.send(&path, req, &mut sink).await {
            Ok(outcome) => {
                info!(
                    "{}: {} bytes sent ({:?})",
                    name, outcome.bytes_sent, outcome.state
                );
                Ok(outcome)
            }
            Err(e) => {
                warn!("{}: transfer failed: {}", name, e);
                Err(e)
            }
        }
    });

    match head_rx.await {
        Ok(head) => {
            let mut response = (head.status, Body::from_stream(body_rx)).into_response();
            response.headers_mut().extend(head.headers);
            Ok(response)
        }
        Err(_) => {
            // the streamer bailed before emitting a head; recover the error
            let status = match task.await {
                Ok(Err(StreamError::NotReadable { .. })) => StatusCode::NOT_FOUND,
                Ok(Err(StreamError::RangeNotSatisfiable { .. })) => {
                    StatusCode::RANGE_NOT_SATISFIABLE
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err(status)
        }
    }
}

/// GET /health — liveness check.
pub async fn health() -> &'static str {
    "ok"
}
