use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode, Uri, uri::PathAndQuery},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use crate::{
    access::{AccessDecider, AccessVerdict, Principal, paths},
    auth::{Session, SessionState},
    error::ConfigError,
};

/// File extensions served without gating: images, fonts, stylesheets, scripts,
/// documents and data files. Anything that must be access-controlled has to live
/// under a path without one of these extensions.
pub const STATIC_ASSET_EXTENSIONS: &[&str] = &[
    // images
    "png", "jpg", "jpeg", "gif", "svg", "ico", "webp", "avif", "bmp",
    // fonts
    "woff", "woff2", "ttf", "otf", "eot",
    // stylesheets and scripts
    "css", "js", "mjs", "map",
    // documents
    "pdf", "doc", "docx", "txt",
    // data
    "json", "xml", "webmanifest",
];

/// RedirectTargets
///
/// The fixed pages the gate redirects to. Home comes from the access policy.
#[derive(Debug, Clone)]
pub struct RedirectTargets {
    pub sign_in: String,
    pub register: String,
    pub unauthorized: String,
    pub callback_param: String,
}

impl Default for RedirectTargets {
    fn default() -> Self {
        Self {
            sign_in: paths::SIGN_IN.to_string(),
            register: paths::REGISTER.to_string(),
            unauthorized: paths::UNAUTHORIZED.to_string(),
            callback_param: paths::CALLBACK_PARAM.to_string(),
        }
    }
}

/// GateOutcome
///
/// What the gate decided for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    /// Static asset: forwarded without looking at the session.
    Bypass,
    /// Allowed: forwarded, carrying the resolved session if there is one.
    Forward(Option<Session>),
    /// Denied, or a signed-in user asking for the sign-in form.
    Redirect(String),
}

/// RequestGate
///
/// Orchestrates the authorization of a single request. Immutable after construction
/// and shared across all requests behind an `Arc`.
pub struct RequestGate {
    decider: AccessDecider,
    verifier: SessionState,
    targets: RedirectTargets,
}

/// GateState
///
/// The shared gate handle stored in the application state.
pub type GateState = Arc<RequestGate>;

impl RequestGate {
    /// new
    ///
    /// Refuses a policy under which the sign-in or unauthorized page is not public:
    /// every denial would redirect to another denial.
    pub fn new(
        decider: AccessDecider,
        verifier: SessionState,
        targets: RedirectTargets,
    ) -> Result<Self, ConfigError> {
        for target in [&targets.sign_in, &targets.unauthorized] {
            if !decider.policy().is_public(target) {
                return Err(ConfigError::UnreachableTarget {
                    target: target.clone(),
                });
            }
        }

        Ok(Self {
            decider,
            verifier,
            targets,
        })
    }

    pub fn decider(&self) -> &AccessDecider {
        &self.decider
    }

    /// evaluate
    ///
    /// Runs the gate once for a request:
    /// 1. resolve the path to its canonical form; every later step sees only that form
    /// 2. static assets bypass everything
    /// 3. resolve the session; any verifier failure counts as "no session"
    /// 4. a signed-in caller asking for sign-in or registration goes home
    /// 5. decide, then forward or redirect
    pub async fn evaluate(&self, uri: &Uri, headers: &HeaderMap) -> GateOutcome {
        let canonical = canonical_path(uri.path());
        let path = canonical.as_str();

        if is_static_asset(path) {
            return GateOutcome::Bypass;
        }

        let session = match self.verifier.verify(headers).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(path = %path, "session resolution failed, continuing unauthenticated: {}", e);
                None
            }
        };

        if session.is_some() && (path == self.targets.sign_in || path == self.targets.register) {
            return GateOutcome::Redirect(self.decider.policy().home.clone());
        }

        let principal = session
            .as_ref()
            .map(Session::principal)
            .unwrap_or(Principal::Anonymous);

        let verdict = self.decider.decide(&principal, path);
        tracing::debug!(path = %path, verdict = ?verdict, "access decision");

        match verdict {
            AccessVerdict::Allow => GateOutcome::Forward(session),
            AccessVerdict::DenyUnauthenticated => GateOutcome::Redirect(self.sign_in_location(path, uri.query())),
            AccessVerdict::DenyForbidden => GateOutcome::Redirect(self.targets.unauthorized.clone()),
        }
    }

    // Sign-in location carrying the requested path and query string as the callback.
    fn sign_in_location(&self, path: &str, query: Option<&str>) -> String {
        let callback = match query {
            Some(query) => format!("{}?{}", path, query),
            None => path.to_string(),
        };

        format!(
            "{}?{}={}",
            self.targets.sign_in,
            self.targets.callback_param,
            urlencoding::encode(&callback)
        )
    }
}

/// request_gate
///
/// The middleware wrapping every route. The request URI is first rewritten to its
/// canonical path, so handlers and the upstream proxy see exactly the path that was
/// decided on. On `Forward` the resolved session is inserted into the request
/// extensions, where the `Session` extractor finds it.
pub async fn request_gate(
    State(gate): State<GateState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(uri) = canonical_uri(request.uri()) else {
        tracing::warn!(uri = %request.uri(), "rejecting request with an unrepresentable path");
        return StatusCode::BAD_REQUEST.into_response();
    };
    *request.uri_mut() = uri;

    let outcome = gate.evaluate(request.uri(), request.headers()).await;

    match outcome {
        GateOutcome::Bypass => next.run(request).await,
        GateOutcome::Forward(session) => {
            if let Some(session) = session {
                request.extensions_mut().insert(session);
            }
            next.run(request).await
        }
        GateOutcome::Redirect(location) => Redirect::temporary(&location).into_response(),
    }
}

/// True when the last path segment carries an allowlisted extension (ASCII case-insensitive).
pub fn is_static_asset(path: &str) -> bool {
    let segment = path.rsplit('/').next().unwrap_or(path);
    match segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => STATIC_ASSET_EXTENSIONS
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext)),
        _ => false,
    }
}

/// canonical_path
///
/// Resolves a request path the way URL parsers do before it reaches any server:
/// `.` and `..` segments are removed (also when spelled `%2e`, in any case), `\` counts
/// as a separator, and empty segments are dropped. The result always starts with `/`
/// and has no trailing slash. `..` never climbs above the root.
pub fn canonical_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(['/', '\\']) {
        if segment.is_empty() || is_dot_segment(segment, 1) {
            continue;
        }
        if is_dot_segment(segment, 2) {
            segments.pop();
            continue;
        }
        segments.push(segment);
    }

    format!("/{}", segments.join("/"))
}

/// The same URI with its path replaced by [`canonical_path`]; the query is kept as is.
/// `None` only if the rebuilt URI is not valid.
pub fn canonical_uri(uri: &Uri) -> Option<Uri> {
    let path = canonical_path(uri.path());
    if path == uri.path() {
        return Some(uri.clone());
    }

    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path,
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query).ok()?);
    Uri::from_parts(parts).ok()
}

// A segment made of exactly `dots` dots, each written literally or as `%2e`.
fn is_dot_segment(segment: &str, dots: usize) -> bool {
    let mut rest = segment;
    for _ in 0..dots {
        rest = if let Some(tail) = rest.strip_prefix('.') {
            tail
        } else if rest.get(..3).is_some_and(|code| code.eq_ignore_ascii_case("%2e")) {
            &rest[3..]
        } else {
            return false;
        };
    }
    rest.is_empty()
}
