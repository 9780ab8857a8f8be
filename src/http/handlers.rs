use super::state::AppState;
use crate::relay::RelayMessage;
use crate::room::events::RecordAction;
use crate::storage::ObjectMetadata;
use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Json, Response},
};
use bytes::Bytes;
use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct NameChangeRequest {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct BroadcastRecordRequest {
    pub action: RecordAction,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /events
/// Open a persistent event stream. One `data: <json>` message per room
/// event; never closed server-side except on transport failure.
pub async fn subscribe_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.fanout.subscribe();
    info!(subscribers = state.fanout.subscriber_count(), "event stream opened");

    let stream = futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => match Event::default().json_data(&event) {
                    Ok(frame) => return Some((Ok(frame), rx)),
                    Err(e) => {
                        error!("Failed to serialize event: {}", e);
                    }
                },
                // This subscriber fell behind its bounded queue; resume
                // with the live events.
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// POST /broadcast-record
/// Ask the server to command the whole room to start or stop recording.
pub async fn broadcast_record(
    State(state): State<AppState>,
    Json(req): Json<BroadcastRecordRequest>,
) -> Response {
    let result = match req.action {
        RecordAction::Start => state.coordinator.request_start().await.map(|_| ()),
        RecordAction::Stop => state.coordinator.request_stop().await,
    };

    match result {
        Ok(()) => (StatusCode::OK, "OK").into_response(),
        Err(e) => {
            error!("Failed to broadcast record command: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to broadcast record command: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// POST /name-change
/// Upsert the participant registry and broadcast the full snapshot.
pub async fn change_name(
    State(state): State<AppState>,
    Json(req): Json<NameChangeRequest>,
) -> Response {
    let participants = state.registry.set_name(req.id, req.name).await;

    if let Err(e) = state
        .relay
        .publish(RelayMessage::NameChange { participants })
        .await
    {
        error!("Failed to publish name change: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to publish name change: {}", e),
            }),
        )
            .into_response();
    }

    (StatusCode::OK, "OK").into_response()
}

/// GET /files
/// Fresh catalog query on every call; no caching layer.
pub async fn list_files(State(state): State<AppState>) -> Response {
    match state.store.list().await {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(e) => {
            error!("Failed to list recordings: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to list recordings: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// POST /upload
/// Store one recording under its original filename, then notify every
/// subscriber that the catalog changed.
pub async fn upload_recording(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut file: Option<(String, String, Bytes)> = None;
    let mut start_timestamp: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("Malformed multipart payload: {}", e);
                return bad_request(format!("Malformed multipart payload: {}", e));
            }
        };

        if let Some(filename) = field.file_name().map(str::to_string) {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            match field.bytes().await {
                Ok(bytes) => file = Some((filename, content_type, bytes)),
                Err(e) => {
                    warn!("Failed to read uploaded file: {}", e);
                    return bad_request(format!("Failed to read uploaded file: {}", e));
                }
            }
        } else if field.name() == Some("startTimestamp") {
            match field.text().await {
                Ok(text) => start_timestamp = Some(text),
                Err(e) => {
                    warn!("Failed to read startTimestamp field: {}", e);
                    return bad_request(format!("Failed to read startTimestamp field: {}", e));
                }
            }
        }
    }

    let Some((filename, content_type, bytes)) = file else {
        return bad_request("No file uploaded".to_string());
    };

    let size = bytes.len();
    let metadata = ObjectMetadata {
        content_type: Some(content_type),
        start_timestamp,
    };

    if let Err(e) = state.store.put(&filename, bytes, metadata).await {
        error!("Failed to store recording {}: {}", filename, e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to store recording: {}", e),
            }),
        )
            .into_response();
    }

    info!(key = %filename, size, "recording stored");

    // Storage is already committed; the catalog notification is
    // best-effort.
    if let Err(e) = state.relay.publish(RelayMessage::FilesUpdated).await {
        warn!("Failed to publish files-updated: {}", e);
    }

    (StatusCode::OK, "OK").into_response()
}

/// GET /recordings/:key
/// Stream one stored object back with its original content type. A
/// missing key and a store failure both collapse to not-found.
pub async fn get_recording(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    match state.store.get(&key).await {
        Ok(Some(object)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, object.content_type)],
            object.bytes,
        )
            .into_response(),
        Ok(None) => not_found(&key),
        Err(e) => {
            warn!("Failed to read recording {}: {}", key, e);
            not_found(&key)
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

fn bad_request(error: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
}

fn not_found(key: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Recording {} not found", key),
        }),
    )
        .into_response()
}
