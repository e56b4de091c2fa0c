use crate::{
    AppState,
    auth::Session,
    gate::{GateState, canonical_path},
    models::{AccessCheckQuery, AccessCheckResponse, SessionResponse},
};
use axum::{
    Json,
    extract::{Query, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

// --- Handlers ---

/// get_session
///
/// [Authenticated Route] Returns the identity the gate resolved for this request.
///
/// *Note*: The `Session` extractor reads what the gate attached; a request reaching this
/// handler without a session is rejected with 401.
#[utoipa::path(
    get,
    path = "/api/session",
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 401, description = "No session")
    )
)]
pub async fn get_session(session: Session) -> Json<SessionResponse> {
    Json(SessionResponse {
        user_id: session.user_id,
        role: session.role,
        expires_at: session.expires_at,
    })
}

/// check_access
///
/// [Authenticated Route] Evaluates the caller's own access to another path, so the
/// front-end can hide navigation the user cannot follow.
///
/// *Security*: Only the verdict is returned. The rule that produced it is never disclosed.
#[utoipa::path(
    get,
    path = "/api/access/check",
    params(AccessCheckQuery),
    responses(
        (status = 200, description = "Verdict for the caller", body = AccessCheckResponse),
        (status = 400, description = "Path is empty or not absolute"),
        (status = 401, description = "No session")
    )
)]
pub async fn check_access(
    session: Session,
    State(gate): State<GateState>,
    Query(query): Query<AccessCheckQuery>,
) -> Result<Json<AccessCheckResponse>, StatusCode> {
    // Only the path component is evaluated, in the same canonical form the gate uses.
    let raw = query.path.split(['?', '#']).next().unwrap_or_default();
    if !raw.starts_with('/') {
        return Err(StatusCode::BAD_REQUEST);
    }
    let path = canonical_path(raw);

    let verdict = gate.decider().decide(&session.principal(), &path);

    Ok(Json(AccessCheckResponse { path, verdict }))
}

/// fallback
///
/// Every allowed request no local route serves. With an upstream configured the request
/// is reverse-proxied to the page renderer; otherwise 404.
pub async fn fallback(State(state): State<AppState>, request: Request) -> Response {
    match &state.proxy {
        Some(proxy) => match proxy.forward(request).await {
            Ok(response) => response,
            Err(e) => e.into_response(),
        },
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Not Found" })),
        )
            .into_response(),
    }
}
