use super::domain::{
    AccountId, AccountRecord, ApplicationEntry, ApplicationId, ApplicationStatus, NewAccount,
    SellerApplication, SellerApplicationForm,
};
use crate::marketplace::policy::Role;
use crate::marketplace::RepositoryError;

/// Storage abstraction over accounts and the seller applications they hold.
///
/// Implementations enforce the unique-email constraint on insert and the
/// one-to-one account/application constraint on attach, reporting both as
/// [`RepositoryError::Conflict`].
pub trait AccountRepository: Send + Sync {
    fn insert(&self, account: NewAccount) -> Result<AccountRecord, RepositoryError>;
    fn fetch(&self, id: AccountId) -> Result<Option<AccountRecord>, RepositoryError>;
    fn fetch_by_email(&self, email: &str) -> Result<Option<AccountRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<AccountRecord>, RepositoryError>;
    /// Partial update persisting only the role field.
    fn update_role(&self, id: AccountId, role: Role) -> Result<(), RepositoryError>;
    fn attach_application(
        &self,
        id: AccountId,
        form: SellerApplicationForm,
    ) -> Result<SellerApplication, RepositoryError>;
    fn fetch_application(
        &self,
        id: ApplicationId,
    ) -> Result<Option<ApplicationEntry>, RepositoryError>;
    fn list_applications(&self) -> Result<Vec<ApplicationEntry>, RepositoryError>;
    fn update_application_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), RepositoryError>;
}
