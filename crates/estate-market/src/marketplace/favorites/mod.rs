//! Buyer favorites: a unique `(account, property)` bookmark per pair.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{FavoriteId, FavoriteOutcome, FavoriteRecord};
pub use repository::FavoriteRepository;
pub use router::favorite_router;
pub use service::{FavoriteService, FavoriteServiceError};
