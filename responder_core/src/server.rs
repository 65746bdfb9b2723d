//! HTTP front end: `POST /api/chat`
//!
//! Request body: `{"message": "..."}`. Responses:
//! - 200 `{"reply": "..."}`
//! - 400 when the message is missing or blank
//! - 415 when the request is not JSON
//! - 500 when the responder hits an internal fault

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info, Level};

use crate::error::{ResponderError, Result};
use crate::responder::Responder;

/// Router serving the chat endpoint for `responder`.
pub fn create_app(responder: Arc<Responder>) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(responder)
}

/// Serve until Ctrl+C or SIGTERM.
pub async fn run_server(responder: Arc<Responder>, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ResponderError::Internal(format!("failed to bind {}: {}", addr, e)))?;

    info!("Listening on http://{}", addr);
    axum::serve(listener, create_app(responder).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ResponderError::Internal(format!("HTTP server failed: {}", e)))?;

    info!("Server shut down");
    Ok(())
}

async fn chat(State(responder): State<Arc<Responder>>, headers: HeaderMap, body: Bytes) -> Response {
    if !is_json(&headers) {
        return error_response(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Content-Type must be application/json",
        );
    }

    // Unparseable bodies count as an empty payload
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let message = payload
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim()
        .to_string();

    if message.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Field 'message' cannot be empty");
    }

    let reply = tokio::task::spawn_blocking(move || responder.get_response(&message)).await;
    match reply {
        Ok(Ok(reply)) => Json(json!({ "reply": reply })).into_response(),
        Ok(Err(e)) => {
            error!("Failed to generate reply: {}", e);
            internal_error()
        }
        Err(e) => {
            error!("Reply task panicked: {}", e);
            internal_error()
        }
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
        })
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn internal_error() -> Response {
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal error while generating reply",
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
