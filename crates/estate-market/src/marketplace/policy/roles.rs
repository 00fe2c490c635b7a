use serde::{Deserialize, Serialize};

/// Account roles governing permitted marketplace actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Superadmin,
    Admin,
    Seller,
    Buyer,
}

impl Role {
    /// Roles reachable through the role-change operation. `superadmin` is
    /// neither a source nor a target: once granted it is terminal.
    pub const ASSIGNABLE: [Role; 3] = [Role::Admin, Role::Seller, Role::Buyer];

    pub const fn label(self) -> &'static str {
        match self {
            Role::Superadmin => "superadmin",
            Role::Admin => "admin",
            Role::Seller => "seller",
            Role::Buyer => "buyer",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value.trim() {
            "superadmin" => Some(Role::Superadmin),
            "admin" => Some(Role::Admin),
            "seller" => Some(Role::Seller),
            "buyer" => Some(Role::Buyer),
            _ => None,
        }
    }

    pub const fn is_admin(self) -> bool {
        matches!(self, Role::Superadmin | Role::Admin)
    }
}

fn assignable_labels() -> String {
    Role::ASSIGNABLE
        .iter()
        .map(|role| role.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Requested role failed validation against the assignable set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid role provided. Valid roles are: {valid}")]
pub struct InvalidRoleRequest {
    pub valid: String,
}

/// Validates the requested target state of a role change.
///
/// The requested role must be a non-empty string drawn from the
/// non-superadmin set. Re-assigning the current role is accepted and simply
/// re-persists the same value.
pub fn validate_transition(requested: &str) -> Result<Role, InvalidRoleRequest> {
    match Role::parse(requested) {
        Some(role) if role != Role::Superadmin => Ok(role),
        _ => Err(InvalidRoleRequest {
            valid: assignable_labels(),
        }),
    }
}
