//! Error types for the gate.
//!
//! Access verdicts are not errors: denials become redirects in the gate.
//! These enums cover startup configuration, session resolution and the upstream proxy.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use uuid::Uuid;

/// Configuration-related errors, raised once at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required configuration: {var}")]
    Missing { var: &'static str },

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("failed to read access policy '{path}': {source}")]
    PolicyRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse access policy: {0}")]
    PolicyParse(#[from] serde_json::Error),

    #[error("redirect target '{target}' is not a public path; the gate would redirect in a loop")]
    UnreachableTarget { target: String },
}

/// Session resolution failures. The gate downgrades every one of these to
/// "no session"; they exist so the cause can be logged.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("invalid session token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("no profile for session subject {0}")]
    UnknownSubject(Uuid),

    #[error("profile lookup failed: {0}")]
    Repository(#[from] sqlx::Error),

    #[error("roles are read from profiles but no profile repository is configured")]
    ProfileSourceUnavailable,
}

/// Failures while forwarding an allowed request to the upstream renderer.
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),

    #[error("failed to read request body: {0}")]
    Body(#[from] axum::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("failed to build response: {0}")]
    Response(#[from] axum::http::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::error!("proxy error: {}", self);
        let status = match self {
            ProxyError::Body(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_GATEWAY,
        };
        (
            status,
            Json(serde_json::json!({ "error": status.canonical_reason() })),
        )
            .into_response()
    }
}
