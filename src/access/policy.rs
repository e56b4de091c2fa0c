use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::Path};

use super::{
    paths,
    role::Role,
    rule::{PathRule, any_match},
};
use crate::error::ConfigError;

/// AccessPolicy
///
/// The complete, immutable route table consulted by the `AccessDecider`:
/// - `public`: reachable without any session.
/// - `common`: reachable by every authenticated, recognized role.
/// - `home`: the landing route every authenticated role may reach.
/// - `roles`: the role-specific allow-sets.
///
/// Built once at startup (either `AccessPolicy::default()` or a JSON file) and then
/// shared read-only behind an `Arc`. No rule depends on payload, time or external state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessPolicy {
    #[serde(default)]
    pub public: Vec<PathRule>,
    #[serde(default)]
    pub common: Vec<PathRule>,
    #[serde(default = "default_home")]
    pub home: String,
    #[serde(default)]
    pub roles: HashMap<Role, Vec<PathRule>>,
}

fn default_home() -> String {
    paths::HOME.to_string()
}

impl AccessPolicy {
    /// from_file
    ///
    /// Loads a policy document replacing the built-in table. Roles absent from the
    /// document get an empty allow-set; unknown role keys are a parse error.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::PolicyRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(ConfigError::PolicyParse)
    }

    pub fn is_public(&self, path: &str) -> bool {
        any_match(&self.public, path)
    }

    pub fn is_common(&self, path: &str) -> bool {
        any_match(&self.common, path)
    }

    pub fn is_home(&self, path: &str) -> bool {
        path == self.home
    }

    /// The role-specific allow-set. Roles without an entry allow nothing of their own.
    pub fn rules_for(&self, role: Role) -> &[PathRule] {
        self.roles.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn role_allows(&self, role: Role, path: &str) -> bool {
        any_match(self.rules_for(role), path)
    }
}

impl Default for AccessPolicy {
    /// default
    ///
    /// The portal's built-in route table. Admins are absent on purpose: the decider
    /// lets them through before any role-specific set is consulted.
    fn default() -> Self {
        use PathRule as R;

        let public = vec![
            R::exact(paths::SIGN_IN),
            R::exact(paths::REGISTER),
            R::exact(paths::FORGOT_PASSWORD),
            R::exact(paths::UNAUTHORIZED),
            R::exact(paths::HEALTH),
            R::prefix(paths::AUTH_API),
            R::prefix(paths::SWAGGER_UI),
            R::prefix(paths::API_DOCS),
        ];

        let common = vec![
            R::prefix(paths::PROFILE),
            R::exact(paths::SETTINGS),
            R::prefix(paths::NOTIFICATIONS),
            R::prefix(paths::SESSION_API),
            R::prefix(paths::ACCESS_API),
        ];

        let applicant = vec![
            R::prefix(paths::BIO_DATA),
            R::prefix(paths::DOCUMENTS),
            R::prefix(paths::PAYMENTS),
            R::prefix(paths::ADMISSION_LETTER),
            R::prefix(paths::ADMISSIONS),
        ];

        let student = vec![
            R::prefix(paths::STUDENT),
            R::prefix(paths::QUIZ),
            R::prefix(paths::ADMISSIONS),
            R::prefix(paths::LESSONS),
            R::prefix(paths::LESSON_ASSISTANT),
            R::prefix(paths::QURAN),
            R::prefix(paths::WORD_CLOUD),
        ];

        let teacher = vec![
            R::prefix(paths::TEACHER),
            R::prefix(paths::QUIZ_RESULTS),
            R::prefix(paths::QUIZ_MANAGE),
            R::prefix(paths::LESSONS),
            R::prefix(paths::LESSON_ASSISTANT),
            R::prefix(paths::QURAN),
            R::prefix(paths::WORD_CLOUD),
        ];

        let roles = HashMap::from([
            (Role::Applicant, applicant),
            (Role::Student, student),
            (Role::Teacher, teacher),
            (Role::Public, Vec::new()),
        ]);

        Self {
            public,
            common,
            home: paths::HOME.to_string(),
            roles,
        }
    }
}
