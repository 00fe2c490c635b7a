use std::sync::Arc;

use axum::http::HeaderMap;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use tracing::info;

use super::domain::{
    ImageUpload, ListingStatus, NewProperty, PropertyDraft, PropertyId, PropertyPatch,
    PropertyRecord,
};
use super::repository::{ImageStore, ImageStoreError, PropertyRepository};
use crate::auth::{AuthError, TokenIssuer};
use crate::marketplace::policy::{Action, Actor, AuthorizationPolicy, PolicyViolation};
use crate::marketplace::RepositoryError;

/// Listing-creation payload: the structured draft arrives as raw JSON and is
/// validated field-by-field, with inline base64 images alongside.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateListing {
    pub property_data: serde_json::Value,
    #[serde(default)]
    pub images: Vec<ImageUpload>,
}

/// Service composing the property repository, the blob store, and the
/// authorization policy.
pub struct ListingService<P, S> {
    properties: Arc<P>,
    images: Arc<S>,
    policy: Arc<AuthorizationPolicy>,
    tokens: Arc<TokenIssuer>,
}

impl<P, S> ListingService<P, S>
where
    P: PropertyRepository + 'static,
    S: ImageStore + 'static,
{
    pub fn new(
        properties: Arc<P>,
        images: Arc<S>,
        policy: Arc<AuthorizationPolicy>,
        tokens: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            properties,
            images,
            policy,
            tokens,
        }
    }

    /// Resolve request headers to an authenticated actor.
    pub fn actor(&self, headers: &HeaderMap) -> Result<Actor, AuthError> {
        self.tokens.resolve_actor(headers)
    }

    /// Create a listing owned by the actor.
    ///
    /// Images upload one at a time before anything is persisted; if any
    /// upload fails the whole create fails and no property is stored.
    /// Already-uploaded blobs may be orphaned in the external store.
    pub fn create(
        &self,
        actor: &Actor,
        request: CreateListing,
    ) -> Result<PropertyRecord, ListingServiceError> {
        let draft: PropertyDraft = serde_json::from_value(request.property_data)
            .map_err(|err| ListingServiceError::Validation(format!("invalid property data: {err}")))?;
        validate_draft(&draft)?;

        let mut image_urls = Vec::with_capacity(request.images.len());
        for upload in &request.images {
            image_urls.push(self.upload_image(upload)?);
        }

        let property = self.properties.insert(NewProperty {
            owner: actor.account_id,
            draft,
            image_urls,
        })?;
        info!(
            property_id = property.id.0,
            owner = property.owner.0,
            images = property.images.len(),
            "listing created"
        );
        Ok(property)
    }

    fn upload_image(&self, upload: &ImageUpload) -> Result<String, ListingServiceError> {
        let bytes = BASE64.decode(upload.content.as_bytes()).map_err(|_| {
            ListingServiceError::Validation(format!(
                "image '{}' is not valid base64",
                upload.file_name
            ))
        })?;
        Ok(self.images.store(&upload.file_name, &bytes)?)
    }

    pub fn list(&self) -> Result<Vec<PropertyRecord>, ListingServiceError> {
        Ok(self.properties.list()?)
    }

    pub fn get(&self, id: PropertyId) -> Result<PropertyRecord, ListingServiceError> {
        self.properties
            .fetch(id)?
            .ok_or(ListingServiceError::NotFound)
    }

    pub fn mine(&self, actor: &Actor) -> Result<Vec<PropertyRecord>, ListingServiceError> {
        Ok(self.properties.list_by_owner(actor.account_id)?)
    }

    /// Partial update by the owner or an admin. Publication is gated on the
    /// approval axis: an unapproved property cannot be published.
    pub fn update(
        &self,
        actor: &Actor,
        id: PropertyId,
        patch: PropertyPatch,
    ) -> Result<PropertyRecord, ListingServiceError> {
        let property = self.get(id)?;
        self.policy.authorize(
            actor,
            Action::MutateListing {
                owner: property.owner,
            },
        )?;

        if patch.is_empty() {
            return Err(ListingServiceError::Validation(
                "at least one field must be provided".to_string(),
            ));
        }
        if matches!(&patch.title, Some(title) if title.trim().is_empty()) {
            return Err(ListingServiceError::Validation(
                "title must not be empty".to_string(),
            ));
        }
        if patch.is_published == Some(true) && property.status != ListingStatus::Approved {
            return Err(ListingServiceError::NotApproved);
        }

        Ok(self.properties.update(id, patch)?)
    }

    /// The explicit approval workflow: Pending → Approved | Rejected,
    /// admin/superadmin only.
    pub fn decide(
        &self,
        actor: &Actor,
        id: PropertyId,
        decision: ListingStatus,
    ) -> Result<ListingStatus, ListingServiceError> {
        if decision == ListingStatus::Pending {
            return Err(ListingServiceError::Validation(
                "decision must be 'Approved' or 'Rejected'".to_string(),
            ));
        }

        let property = self.get(id)?;
        self.policy.authorize(actor, Action::DecideListing)?;

        if property.status != ListingStatus::Pending {
            return Err(ListingServiceError::AlreadyDecided);
        }

        self.properties.update_status(id, decision)?;
        info!(
            property_id = id.0,
            status = decision.label(),
            "listing decided"
        );
        Ok(decision)
    }

    pub fn delete(&self, actor: &Actor, id: PropertyId) -> Result<(), ListingServiceError> {
        let property = self.get(id)?;
        self.policy.authorize(
            actor,
            Action::MutateListing {
                owner: property.owner,
            },
        )?;

        self.properties.delete(id)?;
        info!(property_id = id.0, "listing deleted");
        Ok(())
    }
}

fn validate_draft(draft: &PropertyDraft) -> Result<(), ListingServiceError> {
    for (field, value) in [
        ("title", &draft.title),
        ("description", &draft.description),
        ("location", &draft.location),
    ] {
        if value.trim().is_empty() {
            return Err(ListingServiceError::Validation(format!(
                "{field} is required"
            )));
        }
    }
    Ok(())
}

/// Error raised by the listing service.
#[derive(Debug, thiserror::Error)]
pub enum ListingServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("Property not found.")]
    NotFound,
    #[error("property has already been decided")]
    AlreadyDecided,
    #[error("property must be approved before it can be published")]
    NotApproved,
    #[error(transparent)]
    Policy(#[from] PolicyViolation),
    #[error(transparent)]
    Images(#[from] ImageStoreError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
