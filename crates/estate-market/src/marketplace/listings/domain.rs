use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::accounts::domain::AccountId;

/// Identifier wrapper for property listings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PropertyId(pub u64);

/// Identifier wrapper for stored listing images.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ImageId(pub u64);

/// Why the property is on the market.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Purpose {
    #[default]
    #[serde(rename = "For Sale")]
    ForSale,
    #[serde(rename = "For Rent")]
    ForRent,
}

impl Purpose {
    pub const fn label(self) -> &'static str {
        match self {
            Purpose::ForSale => "For Sale",
            Purpose::ForRent => "For Rent",
        }
    }
}

/// Moderation status of a listing. Independent from [`is_published`]: a
/// property may be approved and still unpublished.
///
/// [`is_published`]: PropertyRecord::is_published
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ListingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ListingStatus::Pending => "Pending",
            ListingStatus::Approved => "Approved",
            ListingStatus::Rejected => "Rejected",
        }
    }
}

/// An uploaded listing image, stored as an opaque retrievable URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyImage {
    pub id: ImageId,
    pub url: String,
}

/// Stored property listing with its images.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyRecord {
    pub id: PropertyId,
    pub owner: AccountId,
    pub title: String,
    pub description: String,
    pub price: u64,
    pub location: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub space: u32,
    pub property_type: String,
    pub purpose: Purpose,
    pub status: ListingStatus,
    pub is_published: bool,
    pub images: Vec<PropertyImage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Structured listing payload; unsigned fields encode the non-negative
/// invariant on price, bedrooms, bathrooms, and space.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyDraft {
    pub title: String,
    pub description: String,
    pub price: u64,
    pub location: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub space: u32,
    #[serde(default)]
    pub property_type: String,
    #[serde(default)]
    pub purpose: Purpose,
}

/// Partial update of a listing's mutable fields. Moderation status is not
/// among them; it only moves through the approval operation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<u64>,
    pub location: Option<String>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub space: Option<u32>,
    pub property_type: Option<String>,
    pub purpose: Option<Purpose>,
    pub is_published: Option<bool>,
}

impl PropertyPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.location.is_none()
            && self.bedrooms.is_none()
            && self.bathrooms.is_none()
            && self.space.is_none()
            && self.property_type.is_none()
            && self.purpose.is_none()
            && self.is_published.is_none()
    }
}

/// Inline image payload accepted on listing creation.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageUpload {
    pub file_name: String,
    /// Base64-encoded image bytes.
    pub content: String,
}

/// Input for listing creation; the repository assigns ids and timestamps.
/// New listings always start Pending and unpublished.
#[derive(Debug, Clone)]
pub struct NewProperty {
    pub owner: AccountId,
    pub draft: PropertyDraft,
    pub image_urls: Vec<String>,
}
