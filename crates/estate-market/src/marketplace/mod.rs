//! Marketplace domain: accounts, listings, favorites, and inquiries, all
//! consulting the centralized [`policy`] module for authorization and
//! role/state transitions.

pub mod accounts;
pub mod favorites;
pub mod inquiries;
pub mod listings;
pub mod memory;
pub mod policy;

/// Error enumeration for persistence failures shared by every repository.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
