use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::access::AccessVerdict;

/// User
///
/// The identity record stored in the `public.profiles` table. Only read by the gate,
/// for the `profile` role source and the local development bypass.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    // Primary Key, also the Foreign Key to the external auth.users table.
    pub id: Uuid,
    pub email: String,
    // The RBAC field: 'admin', 'teacher', 'student', 'applicant' or 'public'.
    pub role: String,
}

/// SessionResponse
///
/// Body of `GET /api/session`: the resolved identity of the caller.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SessionResponse {
    pub user_id: Uuid,
    // The raw role claim, as delivered by the session (may be unrecognized).
    pub role: Option<String>,
    #[ts(type = "string | null")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// AccessCheckQuery
///
/// Query parameters for `GET /api/access/check`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct AccessCheckQuery {
    /// The path to evaluate for the calling session, e.g. `/quiz/results/42`.
    pub path: String,
}

/// AccessCheckResponse
///
/// Only the verdict is disclosed, never the rule that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AccessCheckResponse {
    pub path: String,
    pub verdict: AccessVerdict,
}
