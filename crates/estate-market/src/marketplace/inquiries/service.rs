use std::sync::Arc;

use axum::http::HeaderMap;
use serde::Deserialize;
use tracing::info;

use super::domain::{InquiryRecord, NewInquiry};
use super::repository::InquiryRepository;
use crate::auth::{AuthError, TokenIssuer};
use crate::marketplace::listings::domain::PropertyId;
use crate::marketplace::listings::repository::PropertyRepository;
use crate::marketplace::policy::{Actor, InquiryScope};
use crate::marketplace::RepositoryError;

/// Inquiry-creation payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInquiry {
    pub property: u64,
    pub message: String,
    pub contact_number: String,
}

/// Service over property inquiries.
pub struct InquiryService<I, P> {
    inquiries: Arc<I>,
    properties: Arc<P>,
    tokens: Arc<TokenIssuer>,
}

impl<I, P> InquiryService<I, P>
where
    I: InquiryRepository + 'static,
    P: PropertyRepository + 'static,
{
    pub fn new(inquiries: Arc<I>, properties: Arc<P>, tokens: Arc<TokenIssuer>) -> Self {
        Self {
            inquiries,
            properties,
            tokens,
        }
    }

    /// Resolve request headers to an authenticated actor.
    pub fn actor(&self, headers: &HeaderMap) -> Result<Actor, AuthError> {
        self.tokens.resolve_actor(headers)
    }

    pub fn create(
        &self,
        actor: &Actor,
        request: CreateInquiry,
    ) -> Result<InquiryRecord, InquiryServiceError> {
        if request.message.trim().is_empty() {
            return Err(InquiryServiceError::Validation(
                "message is required".to_string(),
            ));
        }
        if request.contact_number.trim().is_empty() {
            return Err(InquiryServiceError::Validation(
                "contact_number is required".to_string(),
            ));
        }

        let property = PropertyId(request.property);
        if self.properties.fetch(property)?.is_none() {
            return Err(InquiryServiceError::PropertyNotFound);
        }

        let inquiry = self.inquiries.insert(NewInquiry {
            requester: actor.account_id,
            property,
            message: request.message,
            contact_number: request.contact_number,
        })?;
        info!(
            inquiry_id = inquiry.id.0,
            property_id = property.0,
            "inquiry created"
        );
        Ok(inquiry)
    }

    /// Role-scoped listing: admins see everything, sellers the inquiries on
    /// their own properties, buyers their own submissions.
    pub fn list(&self, actor: &Actor) -> Result<Vec<InquiryRecord>, InquiryServiceError> {
        let scope = InquiryScope::for_actor(actor);
        let inquiries = self.inquiries.list()?;
        Ok(inquiries
            .into_iter()
            .filter(|owned| scope.permits(owned.inquiry.requester, owned.property_owner))
            .map(|owned| owned.inquiry)
            .collect())
    }
}

/// Error raised by the inquiry service.
#[derive(Debug, thiserror::Error)]
pub enum InquiryServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("Property not found.")]
    PropertyNotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
