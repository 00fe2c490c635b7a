use super::domain::FavoriteRecord;
use crate::marketplace::accounts::domain::AccountId;
use crate::marketplace::listings::domain::PropertyId;
use crate::marketplace::RepositoryError;

/// Storage abstraction over the favorites join table. Implementations
/// enforce the unique `(account, property)` constraint on insert.
pub trait FavoriteRepository: Send + Sync {
    fn insert(
        &self,
        account: AccountId,
        property: PropertyId,
    ) -> Result<FavoriteRecord, RepositoryError>;
    fn find(
        &self,
        account: AccountId,
        property: PropertyId,
    ) -> Result<Option<FavoriteRecord>, RepositoryError>;
    fn remove(&self, account: AccountId, property: PropertyId) -> Result<(), RepositoryError>;
    fn list_by_account(&self, account: AccountId) -> Result<Vec<FavoriteRecord>, RepositoryError>;
}
