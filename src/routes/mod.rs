//! Router Module Index
//!
//! Every route sits behind the request gate (applied in `create_router`), which decides
//! access from the path alone. The split here only mirrors where each route sits in the
//! access policy.

/// Routes listed in the policy's public paths.
pub mod public;

/// Routes listed in the policy's common authenticated paths.
/// Handlers extract the `Session` the gate attached.
pub mod authenticated;
