use super::domain::{ListingStatus, NewProperty, PropertyId, PropertyPatch, PropertyRecord};
use crate::marketplace::accounts::domain::AccountId;
use crate::marketplace::RepositoryError;

/// Storage abstraction over property listings.
///
/// `delete` cascades: the property's images go with it, along with any
/// favorites and inquiries that reference it.
pub trait PropertyRepository: Send + Sync {
    fn insert(&self, property: NewProperty) -> Result<PropertyRecord, RepositoryError>;
    fn fetch(&self, id: PropertyId) -> Result<Option<PropertyRecord>, RepositoryError>;
    /// All listings, newest first.
    fn list(&self) -> Result<Vec<PropertyRecord>, RepositoryError>;
    fn list_by_owner(&self, owner: AccountId) -> Result<Vec<PropertyRecord>, RepositoryError>;
    fn update(&self, id: PropertyId, patch: PropertyPatch)
        -> Result<PropertyRecord, RepositoryError>;
    /// Partial update persisting only the moderation status.
    fn update_status(&self, id: PropertyId, status: ListingStatus) -> Result<(), RepositoryError>;
    fn delete(&self, id: PropertyId) -> Result<(), RepositoryError>;
}

/// Outbound blob-storage hook: accepts image bytes, returns a durable
/// retrievable URL. Failure is opaque beyond the message.
pub trait ImageStore: Send + Sync {
    fn store(&self, file_name: &str, bytes: &[u8]) -> Result<String, ImageStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ImageStoreError {
    #[error("image storage unavailable: {0}")]
    Unavailable(String),
}
