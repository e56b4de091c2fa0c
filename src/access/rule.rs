use serde::{Deserialize, Serialize};

/// PathRule
///
/// A declarative match condition against the path component of a request.
/// Serialized externally tagged, e.g. `{"exact": "/signin"}` or `{"prefix": "/quiz"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathRule {
    /// Matches only the identical path.
    Exact(String),
    /// Matches the path itself and anything below it, on a `/` boundary.
    /// A trailing `/` on the rule is ignored.
    Prefix(String),
}

impl PathRule {
    pub fn exact(path: impl Into<String>) -> Self {
        PathRule::Exact(path.into())
    }

    pub fn prefix(path: impl Into<String>) -> Self {
        PathRule::Prefix(path.into())
    }

    /// matches
    ///
    /// Case-sensitive comparison against an already-normalized path.
    /// `Prefix("/admin")` matches `/admin` and `/admin/users` but never `/admin-tools`:
    /// the character following the rule must be `/` or the end of the path.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathRule::Exact(rule) => path == rule,
            PathRule::Prefix(rule) => {
                let base = rule.trim_end_matches('/');
                match path.strip_prefix(base) {
                    Some(rest) => rest.is_empty() || rest.starts_with('/'),
                    None => false,
                }
            }
        }
    }
}

/// Returns true if any rule in the set matches `path`. Order is irrelevant.
pub fn any_match(rules: &[PathRule], path: &str) -> bool {
    rules.iter().any(|rule| rule.matches(path))
}
