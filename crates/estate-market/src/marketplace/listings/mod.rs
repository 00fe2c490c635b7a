//! Property listings: CRUD with image attachments and the moderation
//! (approval/publication) workflow.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ImageId, ImageUpload, ListingStatus, NewProperty, PropertyDraft, PropertyId, PropertyImage,
    PropertyPatch, PropertyRecord, Purpose,
};
pub use repository::{ImageStore, ImageStoreError, PropertyRepository};
pub use router::listing_router;
pub use service::{CreateListing, ListingService, ListingServiceError};
