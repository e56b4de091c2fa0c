//! Access Control Module Index
//!
//! The route-authorization core of the gate. Everything in here is pure data
//! and pure functions: the policy is built once at startup and only read afterwards.

/// Path literals shared by the default policy and the gate's redirect targets.
pub mod paths;

/// `Exact` / `Prefix` path rules.
pub mod rule;

/// The enumerated role tags and the decider's principal.
pub mod role;

/// The role → path-rule table plus the cross-role sets.
pub mod policy;

/// The three-way access decision.
pub mod decider;

pub use decider::{AccessDecider, AccessVerdict};
pub use policy::AccessPolicy;
pub use role::{Principal, Role};
pub use rule::PathRule;
