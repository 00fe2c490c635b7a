//! Account management: registration, token issuance, role changes, and the
//! seller-onboarding approval workflow.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AccountId, AccountRecord, AccountView, ApplicationEntry, ApplicationId, ApplicationStatus,
    NewAccount, SellerApplication, SellerApplicationForm,
};
pub use repository::AccountRepository;
pub use router::account_router;
pub use service::{AccountService, AccountServiceError, Credentials, Registration};
