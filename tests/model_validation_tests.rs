use chrono::{TimeZone, Utc};
use portal_gate::{
    AccessPolicy, AccessVerdict, PathRule, Role,
    models::{AccessCheckResponse, SessionResponse},
};
use serde_json::json;
use uuid::Uuid;

// --- Tests ---

#[test]
fn test_verdict_serializes_snake_case() {
    assert_eq!(json!(AccessVerdict::Allow), json!("allow"));
    assert_eq!(json!(AccessVerdict::DenyUnauthenticated), json!("deny_unauthenticated"));
    assert_eq!(json!(AccessVerdict::DenyForbidden), json!("deny_forbidden"));
}

#[test]
fn test_role_round_trips_through_claim_strings() {
    for role in Role::ALL {
        assert_eq!(Role::try_parse(role.as_str()), Some(role));
        assert_eq!(json!(role), json!(role.to_string()));
    }
    assert_eq!(Role::try_parse("Teacher"), None);
    assert_eq!(Role::try_parse(""), None);
}

#[test]
fn test_path_rule_json_shape() {
    let rules: Vec<PathRule> =
        serde_json::from_str(r#"[{"exact": "/signin"}, {"prefix": "/quiz"}]"#).unwrap();

    assert_eq!(rules, vec![PathRule::exact("/signin"), PathRule::prefix("/quiz")]);
}

#[test]
fn test_default_policy_survives_serialization() {
    let policy = AccessPolicy::default();
    let encoded = serde_json::to_string(&policy).unwrap();

    assert_eq!(AccessPolicy::from_json(&encoded).unwrap(), policy);
}

#[test]
fn test_empty_policy_document_uses_root_home() {
    let policy = AccessPolicy::from_json("{}").unwrap();

    assert!(policy.public.is_empty());
    assert_eq!(policy.home, "/");
    assert!(policy.rules_for(Role::Student).is_empty());
}

#[test]
fn test_session_response_json_serialization() {
    let response = SessionResponse {
        user_id: Uuid::from_u128(5),
        role: Some("student".to_string()),
        expires_at: Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()),
    };

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["user_id"], json!(Uuid::from_u128(5).to_string()));
    assert_eq!(value["role"], json!("student"));
    assert_eq!(value["expires_at"], json!("2030-01-01T00:00:00Z"));
}

#[test]
fn test_access_check_response_discloses_only_verdict() {
    let response = AccessCheckResponse {
        path: "/admin".to_string(),
        verdict: AccessVerdict::DenyForbidden,
    };

    let value = serde_json::to_value(&response).unwrap();
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["path", "verdict"]);
}
