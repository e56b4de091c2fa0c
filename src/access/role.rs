use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use utoipa::ToSchema;

/// Role
///
/// The single authorization tag attached to an authenticated identity.
/// Assigned externally and delivered through the session's role claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Admin,
    Teacher,
    Student,
    Applicant,
    Public,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Teacher,
        Role::Student,
        Role::Applicant,
        Role::Public,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Applicant => "applicant",
            Role::Public => "public",
        }
    }

    /// Parses a role claim. Case-sensitive: `"Admin"` is not a role.
    pub fn try_parse(claim: &str) -> Option<Self> {
        match claim {
            "admin" => Some(Role::Admin),
            "teacher" => Some(Role::Teacher),
            "student" => Some(Role::Student),
            "applicant" => Some(Role::Applicant),
            "public" => Some(Role::Public),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Principal
///
/// Who is asking, as far as the access decision is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// No valid session.
    Anonymous,
    /// A valid session carrying a recognized role.
    Role(Role),
    /// A valid session whose role claim is missing or not a known role.
    /// Always denied; never interpreted as a grant.
    Unrecognized(String),
}

impl Principal {
    /// Builds the principal for a valid session from its (optional) role claim.
    pub fn from_role_claim(claim: Option<&str>) -> Self {
        match claim {
            Some(raw) => match Role::try_parse(raw) {
                Some(role) => Principal::Role(role),
                None => Principal::Unrecognized(raw.to_string()),
            },
            None => Principal::Unrecognized(String::new()),
        }
    }
}

impl From<Role> for Principal {
    fn from(role: Role) -> Self {
        Principal::Role(role)
    }
}
