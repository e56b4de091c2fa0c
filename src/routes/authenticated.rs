use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Endpoints under the policy's common authenticated paths (`/api/session`, `/api/access`):
/// any signed-in user with a recognized role reaches them.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /api/session
        // The caller's resolved identity: user id, role claim, expiry.
        .route("/api/session", get(handlers::get_session))
        // GET /api/access/check?path=...
        // The caller's verdict for another path. Verdict only, no rule details.
        .route("/api/access/check", get(handlers::check_access))
}
