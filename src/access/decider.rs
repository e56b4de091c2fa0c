use serde::{Deserialize, Serialize};
use std::sync::Arc;
use ts_rs::TS;
use utoipa::ToSchema;

use super::{
    policy::AccessPolicy,
    role::{Principal, Role},
};

/// AccessVerdict
///
/// The three-way outcome of an access decision. Produced per request, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AccessVerdict {
    Allow,
    /// No valid session.
    DenyUnauthenticated,
    /// Valid session, but the role may not reach the path.
    DenyForbidden,
}

/// AccessDecider
///
/// Pure decision function over an injected, read-only `AccessPolicy`.
/// Cloning is cheap (shared `Arc`), and concurrent requests may decide in parallel.
#[derive(Debug, Clone)]
pub struct AccessDecider {
    policy: Arc<AccessPolicy>,
}

impl AccessDecider {
    pub fn new(policy: AccessPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// decide
    ///
    /// Total over its inputs. `path` must already be normalized (no query string,
    /// no trailing slash except the root). Stages are evaluated in a fixed order and the
    /// first one that applies wins:
    ///
    /// 1. public path → `Allow`, whoever asks
    /// 2. no session → `DenyUnauthenticated`
    /// 3. unrecognized role → `DenyForbidden`
    /// 4. admin → `Allow`
    /// 5. role allow-set → `Allow`
    /// 6. common authenticated paths → `Allow`
    /// 7. home → `Allow`
    /// 8. otherwise `DenyForbidden`
    pub fn decide(&self, principal: &Principal, path: &str) -> AccessVerdict {
        if self.policy.is_public(path) {
            return AccessVerdict::Allow;
        }

        let role = match principal {
            Principal::Anonymous => return AccessVerdict::DenyUnauthenticated,
            Principal::Unrecognized(_) => return AccessVerdict::DenyForbidden,
            Principal::Role(role) => *role,
        };

        if role == Role::Admin {
            return AccessVerdict::Allow;
        }

        if self.policy.role_allows(role, path)
            || self.policy.is_common(path)
            || self.policy.is_home(path)
        {
            return AccessVerdict::Allow;
        }

        AccessVerdict::DenyForbidden
    }

    /// Convenience for callers holding the raw role claim: `None` means no session.
    pub fn decide_claim(&self, role_claim: Option<&str>, path: &str) -> AccessVerdict {
        let principal = match role_claim {
            None => Principal::Anonymous,
            Some(_) => Principal::from_role_claim(role_claim),
        };
        self.decide(&principal, path)
    }
}

impl Default for AccessDecider {
    fn default() -> Self {
        Self::new(AccessPolicy::default())
    }
}
