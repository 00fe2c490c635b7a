//! Centralized authorization policy.
//!
//! Every entry point consults this module instead of re-implementing inline
//! role checks: [`AuthorizationPolicy`] decides whether an actor may perform
//! an action, [`roles`] encodes the role set and the role-change state
//! machine, and [`visibility`] scopes which inquiries a role may observe.

mod authorization;
pub mod roles;
pub mod visibility;

pub use authorization::{Action, AuthorizationPolicy, PolicyViolation};
pub use roles::{validate_transition, InvalidRoleRequest, Role};
pub use visibility::InquiryScope;

use crate::marketplace::accounts::domain::AccountId;

/// The authenticated account making a request, resolved from a verified
/// bearer token. Tokens carrying an unrecognized role string fail actor
/// resolution before any policy decision is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub account_id: AccountId,
    pub email: String,
    pub first_name: String,
    pub role: Role,
}
