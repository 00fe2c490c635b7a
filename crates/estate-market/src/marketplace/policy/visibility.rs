use super::roles::Role;
use super::Actor;
use crate::marketplace::accounts::domain::AccountId;

/// Which inquiries a given actor may observe.
///
/// Selecting the scope is itself a policy decision, not a separate filter
/// step bolted onto the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InquiryScope {
    /// Every inquiry in the system (superadmin, admin).
    All,
    /// Inquiries on properties owned by this account (seller).
    PropertyOwner(AccountId),
    /// Inquiries this account submitted (buyer).
    Requester(AccountId),
}

impl InquiryScope {
    pub fn for_actor(actor: &Actor) -> Self {
        match actor.role {
            Role::Superadmin | Role::Admin => InquiryScope::All,
            Role::Seller => InquiryScope::PropertyOwner(actor.account_id),
            Role::Buyer => InquiryScope::Requester(actor.account_id),
        }
    }

    /// Pure predicate over an inquiry's (requester, property owner) pair.
    pub fn permits(&self, requester: AccountId, property_owner: AccountId) -> bool {
        match *self {
            InquiryScope::All => true,
            InquiryScope::PropertyOwner(owner) => property_owner == owner,
            InquiryScope::Requester(account) => requester == account,
        }
    }
}
