use std::{env, path::PathBuf};

use crate::error::ConfigError;

const LOCAL_JWT_SECRET: &str = "super-secure-test-secret-value-local";

/// AppConfig
///
/// Holds the gate's entire configuration state. Immutable once loaded and pulled
/// into handlers and middleware via `FromRef`.
#[derive(Clone)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and the local session bypass.
    pub env: Env,
    // Secret used to validate incoming session tokens (HS256).
    pub jwt_secret: String,
    // Postgres connection string; only needed when roles come from the profiles table.
    pub db_url: Option<String>,
    // Where the caller's role is read from.
    pub role_source: RoleSource,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Rendering application that receives allowed requests no local route serves.
    pub upstream_url: Option<String>,
    // Optional JSON document replacing the built-in access policy.
    pub policy_file: Option<PathBuf>,
    // Name of the cookie carrying the session token.
    pub session_cookie: String,
}

/// Env
///
/// Runtime context. `Local` enables pretty logs and the `x-user-id` development bypass;
/// `Production` demands explicit secrets. Only an explicit `APP_ENV=local` selects `Local`:
/// an unset variable means `Production`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// RoleSource
///
/// `Claim` trusts the token's `role` claim. `Profile` resolves the role from the
/// `profiles` table on every request, so a role change takes effect without re-issuing tokens.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RoleSource {
    Claim,
    Profile,
}

impl Default for AppConfig {
    /// default
    ///
    /// Safe, non-panicking values for test setup; no environment access.
    fn default() -> Self {
        Self {
            env: Env::Local,
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            db_url: None,
            role_source: RoleSource::Claim,
            bind_addr: "127.0.0.1:3000".to_string(),
            upstream_url: None,
            policy_file: None,
            session_cookie: "session-token".to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Startup entry point implementing the fail-fast principle.
    ///
    /// # Panics
    /// Panics if the configuration is incomplete or invalid for the current environment.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(config) => config,
            Err(e) => panic!("FATAL: {}", e),
        }
    }

    /// try_load
    ///
    /// Reads every parameter from environment variables.
    pub fn try_load() -> Result<Self, ConfigError> {
        let env = match optional("APP_ENV").as_deref() {
            None | Some("production") => Env::Production,
            Some("local") => Env::Local,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "APP_ENV",
                    reason: format!("expected 'local' or 'production', got '{}'", other),
                });
            }
        };

        // The production secret is mandatory; local development gets a fallback.
        let jwt_secret = match (env, optional("SESSION_JWT_SECRET")) {
            (_, Some(secret)) => secret,
            (Env::Production, None) => {
                return Err(ConfigError::Missing {
                    var: "SESSION_JWT_SECRET",
                });
            }
            (Env::Local, None) => LOCAL_JWT_SECRET.to_string(),
        };

        let role_source = match optional("ROLE_SOURCE").as_deref() {
            None | Some("claim") => RoleSource::Claim,
            Some("profile") => RoleSource::Profile,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "ROLE_SOURCE",
                    reason: format!("expected 'claim' or 'profile', got '{}'", other),
                });
            }
        };

        let db_url = optional("DATABASE_URL");
        if role_source == RoleSource::Profile && db_url.is_none() {
            return Err(ConfigError::Missing {
                var: "DATABASE_URL",
            });
        }

        Ok(Self {
            env,
            jwt_secret,
            db_url,
            role_source,
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            upstream_url: optional("UPSTREAM_URL"),
            policy_file: optional("ACCESS_POLICY_FILE").map(PathBuf::from),
            session_cookie: optional("SESSION_COOKIE")
                .unwrap_or_else(|| "session-token".to_string()),
        })
    }
}

// Unset and empty variables are treated alike.
fn optional(var: &str) -> Option<String> {
    env::var(var).ok().filter(|value| !value.trim().is_empty())
}
