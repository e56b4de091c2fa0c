use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header, request::Parts},
};
use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    access::Principal,
    config::{AppConfig, Env, RoleSource},
    error::SessionError,
    repository::RepositoryState,
};

/// Header accepted in `Env::Local` only: resolves the session straight from a profile id.
pub const DEV_USER_HEADER: &str = "x-user-id";

/// Claims
///
/// The payload expected inside a session token (HS256 JWT).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the user's UUID, also the primary key of `public.profiles`.
    pub sub: Uuid,
    /// Expiration Time (exp): always validated.
    pub exp: usize,
    /// Issued At (iat).
    pub iat: usize,
    /// The authorization tag. Absent claims are kept as `None`, never defaulted to a role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Session
///
/// The resolved identity of a request. The gate attaches it to the request
/// extensions on `Allow`, where handlers pick it up as an extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: Uuid,
    /// The raw role claim; may be missing or unrecognized.
    pub role: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// The decider's view of this session. A missing or unknown role is `Unrecognized`.
    pub fn principal(&self) -> Principal {
        Principal::from_role_claim(self.role.as_deref())
    }
}

/// Session Extractor
///
/// Reads the session the gate attached to the request. Rejects with 401 when the route
/// was reached without one (e.g. a public path).
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

/// SessionVerifier
///
/// The gate's only external collaborator: turns request headers into a session.
/// `Ok(None)` means "no session presented"; `Err` means one was presented but could not
/// be verified. The gate treats both as unauthenticated.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    async fn verify(&self, headers: &HeaderMap) -> Result<Option<Session>, SessionError>;
}

/// SessionState
///
/// The shared verifier handle stored in the gate.
pub type SessionState = Arc<dyn SessionVerifier>;

/// JwtSessionVerifier
///
/// Verifies HS256 session tokens issued by the hosted auth platform.
///
/// The process:
/// 1. Local Bypass: in `Env::Local`, an `x-user-id` header naming an existing profile.
/// 2. Token Extraction: the session cookie, then `Authorization: Bearer`.
/// 3. Token Validation: signature and expiry.
/// 4. Role Resolution: from the `role` claim, or from the profile row (`RoleSource::Profile`).
pub struct JwtSessionVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    cookie_name: String,
    role_source: RoleSource,
    env: Env,
    repo: Option<RepositoryState>,
}

impl JwtSessionVerifier {
    pub fn new(config: &AppConfig, repo: Option<RepositoryState>) -> Self {
        let mut validation = Validation::default();
        // Ensure expiration time validation is always active.
        validation.validate_exp = true;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            cookie_name: config.session_cookie.clone(),
            role_source: config.role_source,
            env: config.env,
            repo,
        }
    }

    async fn local_bypass(&self, headers: &HeaderMap) -> Result<Option<Session>, SessionError> {
        let Some(repo) = &self.repo else {
            return Ok(None);
        };

        let user_id = headers
            .get(DEV_USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| Uuid::parse_str(raw).ok());

        let Some(user_id) = user_id else {
            return Ok(None);
        };

        Ok(repo.get_user(user_id).await?.map(|user| Session {
            user_id: user.id,
            role: Some(user.role),
            expires_at: None,
        }))
    }

    fn extract_token<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        cookie_value(headers, &self.cookie_name).or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(str::trim)
                .filter(|token| !token.is_empty())
        })
    }

    async fn resolve_role(&self, claims: &Claims) -> Result<Option<String>, SessionError> {
        match self.role_source {
            RoleSource::Claim => Ok(claims.role.clone()),
            RoleSource::Profile => {
                let repo = self
                    .repo
                    .as_ref()
                    .ok_or(SessionError::ProfileSourceUnavailable)?;
                // A deleted profile invalidates the session even though the token is still valid.
                let user = repo
                    .get_user(claims.sub)
                    .await?
                    .ok_or(SessionError::UnknownSubject(claims.sub))?;
                Ok(Some(user.role))
            }
        }
    }
}

#[async_trait]
impl SessionVerifier for JwtSessionVerifier {
    async fn verify(&self, headers: &HeaderMap) -> Result<Option<Session>, SessionError> {
        if self.env == Env::Local {
            // A failed bypass falls through to the standard token flow.
            match self.local_bypass(headers).await {
                Ok(Some(session)) => return Ok(Some(session)),
                Ok(None) => {}
                Err(e) => tracing::warn!("local session bypass failed: {}", e),
            }
        }

        let Some(token) = self.extract_token(headers) else {
            return Ok(None);
        };

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;
        let role = self.resolve_role(&claims).await?;

        Ok(Some(Session {
            user_id: claims.sub,
            role,
            expires_at: i64::try_from(claims.exp)
                .ok()
                .and_then(|exp| DateTime::from_timestamp(exp, 0)),
        }))
    }
}

// First non-empty value of the named cookie across all `Cookie` headers.
fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value)
}
