use std::sync::Arc;

use axum::http::HeaderMap;
use tracing::info;

use super::domain::{FavoriteOutcome, FavoriteRecord};
use super::repository::FavoriteRepository;
use crate::auth::{AuthError, TokenIssuer};
use crate::marketplace::listings::domain::PropertyId;
use crate::marketplace::listings::repository::PropertyRepository;
use crate::marketplace::policy::Actor;
use crate::marketplace::RepositoryError;

/// Service over an account's favorites. Every operation is scoped to the
/// acting account; no role gates apply.
pub struct FavoriteService<F, P> {
    favorites: Arc<F>,
    properties: Arc<P>,
    tokens: Arc<TokenIssuer>,
}

impl<F, P> FavoriteService<F, P>
where
    F: FavoriteRepository + 'static,
    P: PropertyRepository + 'static,
{
    pub fn new(favorites: Arc<F>, properties: Arc<P>, tokens: Arc<TokenIssuer>) -> Self {
        Self {
            favorites,
            properties,
            tokens,
        }
    }

    /// Resolve request headers to an authenticated actor.
    pub fn actor(&self, headers: &HeaderMap) -> Result<Actor, AuthError> {
        self.tokens.resolve_actor(headers)
    }

    pub fn list(&self, actor: &Actor) -> Result<Vec<FavoriteRecord>, FavoriteServiceError> {
        Ok(self.favorites.list_by_account(actor.account_id)?)
    }

    /// Bookmark a property. Adding an existing pair returns the stored row
    /// without creating a duplicate.
    pub fn add(
        &self,
        actor: &Actor,
        property: PropertyId,
    ) -> Result<FavoriteOutcome, FavoriteServiceError> {
        if self.properties.fetch(property)?.is_none() {
            return Err(FavoriteServiceError::PropertyNotFound);
        }

        if let Some(existing) = self.favorites.find(actor.account_id, property)? {
            return Ok(FavoriteOutcome::Existing(existing));
        }

        let favorite = self.favorites.insert(actor.account_id, property)?;
        info!(
            account_id = actor.account_id.0,
            property_id = property.0,
            "favorite added"
        );
        Ok(FavoriteOutcome::Created(favorite))
    }

    /// Remove a bookmark; removing a pair that was never stored is an error,
    /// never a silent success.
    pub fn remove(&self, actor: &Actor, property: PropertyId) -> Result<(), FavoriteServiceError> {
        match self.favorites.remove(actor.account_id, property) {
            Ok(()) => {
                info!(
                    account_id = actor.account_id.0,
                    property_id = property.0,
                    "favorite removed"
                );
                Ok(())
            }
            Err(RepositoryError::NotFound) => Err(FavoriteServiceError::FavoriteNotFound),
            Err(other) => Err(other.into()),
        }
    }
}

/// Error raised by the favorite service.
#[derive(Debug, thiserror::Error)]
pub enum FavoriteServiceError {
    #[error("Property not found.")]
    PropertyNotFound,
    #[error("Favorite not found")]
    FavoriteNotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
