use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::accounts::domain::AccountId;
use crate::marketplace::listings::domain::PropertyId;

/// Identifier wrapper for property inquiries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct InquiryId(pub u64);

/// A buyer's question about a property. Immutable after creation; there is
/// no update operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InquiryRecord {
    pub id: InquiryId,
    pub requester: AccountId,
    pub property: PropertyId,
    pub message: String,
    pub contact_number: String,
    pub created_at: DateTime<Utc>,
}

/// Input for inquiry creation; the repository assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewInquiry {
    pub requester: AccountId,
    pub property: PropertyId,
    pub message: String,
    pub contact_number: String,
}

/// An inquiry joined with the owner of the property it targets, so the
/// visibility scope can be applied without a second lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedInquiry {
    pub inquiry: InquiryRecord,
    pub property_owner: AccountId,
}
