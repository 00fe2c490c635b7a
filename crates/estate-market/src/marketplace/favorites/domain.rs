use serde::{Deserialize, Serialize};

use crate::marketplace::accounts::domain::AccountId;
use crate::marketplace::listings::domain::PropertyId;

/// Identifier wrapper for favorite rows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FavoriteId(pub u64);

/// A bookmarked property. The `(account, property)` pair is unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FavoriteRecord {
    pub id: FavoriteId,
    pub account: AccountId,
    pub property: PropertyId,
}

/// Outcome of an add: either a fresh row or the row that already existed.
/// Duplicate adds are idempotent successes, not conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteOutcome {
    Created(FavoriteRecord),
    Existing(FavoriteRecord),
}
