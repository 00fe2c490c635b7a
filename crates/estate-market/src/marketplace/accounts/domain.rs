use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::policy::Role;

/// Identifier wrapper for registered accounts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct AccountId(pub u64);

/// Identifier wrapper for seller applications.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ApplicationId(pub u64);

/// Stored account aggregate. The seller application is held directly on the
/// account (one-to-one, at most one per account) so existence checks read a
/// field instead of probing the store.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountRecord {
    pub id: AccountId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_active: bool,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
    pub password_hash: String,
    pub seller_application: Option<SellerApplication>,
}

impl AccountRecord {
    pub fn view(&self) -> AccountView {
        AccountView {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role,
            is_active: self.is_active,
            is_superuser: self.is_superuser,
            date_joined: self.date_joined,
        }
    }
}

/// Input for account creation; the repository assigns id and join date.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_active: bool,
    pub is_superuser: bool,
    pub password_hash: String,
}

/// Account representation exposed over the API; never carries the hash.
#[derive(Debug, Clone, Serialize)]
pub struct AccountView {
    pub id: AccountId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_active: bool,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
}

/// Lifecycle states of a seller application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// Seller-onboarding application held on the applicant's account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellerApplication {
    pub id: ApplicationId,
    pub status: ApplicationStatus,
    pub message: String,
    pub company_name: Option<String>,
    pub company_address: Option<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Submission payload for a seller application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SellerApplicationForm {
    #[serde(default)]
    pub message: String,
    pub company_name: Option<String>,
    pub company_address: Option<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
}

/// A seller application joined with its applicant, for the review surface.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationEntry {
    pub account_id: AccountId,
    pub email: String,
    #[serde(flatten)]
    pub application: SellerApplication,
}
