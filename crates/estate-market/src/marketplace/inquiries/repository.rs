use super::domain::{InquiryRecord, NewInquiry, OwnedInquiry};
use crate::marketplace::RepositoryError;

/// Storage abstraction over inquiries. Listing returns each inquiry joined
/// with its property's owner so the caller can apply a visibility scope.
pub trait InquiryRepository: Send + Sync {
    fn insert(&self, inquiry: NewInquiry) -> Result<InquiryRecord, RepositoryError>;
    fn list(&self) -> Result<Vec<OwnedInquiry>, RepositoryError>;
}
