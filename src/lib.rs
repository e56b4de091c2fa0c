use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Route-authorization core: policy, rules, decider.
pub mod access;

// Gate, session verification and the services around them.
pub mod auth;
pub mod config;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod models;
pub mod proxy;
pub mod repository;

pub mod routes;
use routes::{authenticated, public};

// --- Public Re-exports ---

pub use access::{AccessDecider, AccessPolicy, AccessVerdict, PathRule, Principal, Role};
pub use config::AppConfig;
pub use gate::{GateState, RequestGate};
pub use repository::{PostgresRepository, RepositoryState};

use auth::JwtSessionVerifier;
use error::ConfigError;
use gate::RedirectTargets;
use proxy::UpstreamProxy;

/// ApiDoc
///
/// OpenAPI document for the gate's own endpoints, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::get_session, handlers::check_access),
    components(
        schemas(
            models::SessionResponse, models::AccessCheckResponse, models::User,
            access::AccessVerdict, access::Role,
        )
    ),
    tags(
        (name = "portal-gate", description = "Admissions portal access gate")
    )
)]
struct ApiDoc;

/// AppState
///
/// Implements the **Unified State Pattern**: the single, immutable container shared
/// across all requests.
#[derive(Clone)]
pub struct AppState {
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
    /// The request gate: access policy, decider and session verifier.
    pub gate: GateState,
    /// Page renderer receiving allowed requests no local route serves.
    pub proxy: Option<UpstreamProxy>,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for GateState {
    fn from_ref(app_state: &AppState) -> GateState {
        app_state.gate.clone()
    }
}

/// build_state
///
/// Assembles the application state from configuration: loads the access policy (built-in
/// or from `ACCESS_POLICY_FILE`), wires the session verifier to the optional profile
/// repository and sets up the upstream proxy.
pub fn build_state(config: AppConfig, repo: Option<RepositoryState>) -> Result<AppState, ConfigError> {
    let policy = match &config.policy_file {
        Some(path) => AccessPolicy::from_file(path)?,
        None => AccessPolicy::default(),
    };

    let verifier = Arc::new(JwtSessionVerifier::new(&config, repo));
    let gate = RequestGate::new(AccessDecider::new(policy), verifier, RedirectTargets::default())?;

    let proxy = config
        .upstream_url
        .as_deref()
        .map(UpstreamProxy::new)
        .transpose()
        .map_err(|e| ConfigError::Invalid {
            var: "UPSTREAM_URL",
            reason: e.to_string(),
        })?;

    Ok(AppState {
        config,
        gate: Arc::new(gate),
        proxy,
    })
}

/// create_router
///
/// Assembles the routing structure, puts every route behind the request gate and
/// applies the observability layers.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: Swagger UI and the OpenAPI document (public paths in the default policy).
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(authenticated::authenticated_routes())
        // Anything else the gate allows goes to the upstream renderer, or 404s.
        .fallback(handlers::fallback)
        // The gate wraps every route above, fallback included.
        .layer(middleware::from_fn_with_state(
            state.gate.clone(),
            gate::request_gate,
        ))
        .with_state(state);

    // 3. Observability and Correlation Layers (Applied outermost/first)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: a UUID for every incoming request.
                .layer(SetRequestIdLayer::new(
                    x_request_id.clone(),
                    MakeRequestUuid,
                ))
                // 3b. Request Tracing: a span around the whole request/response lifecycle.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: echoes x-request-id back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Custom span for `TraceLayer`: HTTP method, URI and the request id, so every log
/// line of a request (including the gate's verdict) is correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
