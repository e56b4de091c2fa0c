use crate::AppState;
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints the access policy lists as public: reachable with no session at all.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Used for monitoring and load balancer checks. Returns "ok" immediately.
        .route("/health", get(|| async { "ok" }))
}
