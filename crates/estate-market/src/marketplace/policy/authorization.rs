use super::roles::Role;
use super::Actor;
use crate::marketplace::accounts::domain::{AccountId, AccountRecord};

/// Gated actions beyond the role-change rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListAccounts,
    ReviewSellerApplications,
    DecideListing,
    MutateListing { owner: AccountId },
}

/// Denial reasons surfaced to callers. `AlreadyApplied` maps to a conflict
/// response; every other variant is a permission failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyViolation {
    #[error("Permission denied. Only superadmin can change user roles.")]
    RoleChangeForbidden,
    #[error("Cannot change the role of a superadmin.")]
    SuperadminLocked,
    #[error("already applied")]
    AlreadyApplied,
    #[error("Permission denied.")]
    Forbidden,
}

/// Central decision point mapping (actor, action, target) to allow/deny.
///
/// Also carries the default role granted at registration, so the default is
/// an explicit configuration value rather than a model-level implicit.
#[derive(Debug, Clone)]
pub struct AuthorizationPolicy {
    default_role: Role,
}

impl Default for AuthorizationPolicy {
    fn default() -> Self {
        Self::new(Role::Buyer)
    }
}

impl AuthorizationPolicy {
    pub fn new(default_role: Role) -> Self {
        Self { default_role }
    }

    /// Role granted to newly registered accounts.
    pub fn default_role(&self) -> Role {
        self.default_role
    }

    /// Only a superadmin may initiate a role change.
    pub fn authorize_role_change(&self, actor: &Actor) -> Result<(), PolicyViolation> {
        if actor.role == Role::Superadmin {
            Ok(())
        } else {
            Err(PolicyViolation::RoleChangeForbidden)
        }
    }

    /// Checked regardless of actor: an account holding the superadmin role
    /// (or the superuser flag) never leaves it through the role-change
    /// operation, not even at a superadmin's request.
    pub fn guard_role_target(&self, target: &AccountRecord) -> Result<(), PolicyViolation> {
        if target.is_superuser || target.role == Role::Superadmin {
            Err(PolicyViolation::SuperadminLocked)
        } else {
            Ok(())
        }
    }

    /// Submission is open to any authenticated account that does not already
    /// hold a seller application, whatever the existing application's status.
    pub fn authorize_seller_application(
        &self,
        account: &AccountRecord,
    ) -> Result<(), PolicyViolation> {
        if account.seller_application.is_some() {
            Err(PolicyViolation::AlreadyApplied)
        } else {
            Ok(())
        }
    }

    pub fn authorize(&self, actor: &Actor, action: Action) -> Result<(), PolicyViolation> {
        let allowed = match action {
            Action::ListAccounts | Action::ReviewSellerApplications | Action::DecideListing => {
                actor.role.is_admin()
            }
            Action::MutateListing { owner } => {
                actor.role.is_admin() || actor.account_id == owner
            }
        };

        if allowed {
            Ok(())
        } else {
            Err(PolicyViolation::Forbidden)
        }
    }
}
