//! Property inquiries, listed under role-conditioned visibility scopes.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{InquiryId, InquiryRecord, NewInquiry, OwnedInquiry};
pub use repository::InquiryRepository;
pub use router::inquiry_router;
pub use service::{CreateInquiry, InquiryService, InquiryServiceError};
