use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::FavoriteOutcome;
use super::repository::FavoriteRepository;
use super::service::{FavoriteService, FavoriteServiceError};
use crate::marketplace::listings::domain::PropertyId;
use crate::marketplace::listings::repository::PropertyRepository;

/// Router builder for the favorites endpoints.
pub fn favorite_router<F, P>(service: Arc<FavoriteService<F, P>>) -> Router
where
    F: FavoriteRepository + 'static,
    P: PropertyRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/favorites",
            get(list_handler::<F, P>).post(add_handler::<F, P>),
        )
        .route(
            "/api/v1/favorites/:property_id",
            delete(remove_handler::<F, P>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddFavoriteRequest {
    pub(crate) property: u64,
}

pub(crate) async fn list_handler<F, P>(
    State(service): State<Arc<FavoriteService<F, P>>>,
    headers: HeaderMap,
) -> Response
where
    F: FavoriteRepository + 'static,
    P: PropertyRepository + 'static,
{
    let actor = match service.actor(&headers) {
        Ok(actor) => actor,
        Err(error) => return error.into_response(),
    };

    match service.list(&actor) {
        Ok(favorites) => (StatusCode::OK, axum::Json(favorites)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn add_handler<F, P>(
    State(service): State<Arc<FavoriteService<F, P>>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<AddFavoriteRequest>,
) -> Response
where
    F: FavoriteRepository + 'static,
    P: PropertyRepository + 'static,
{
    let actor = match service.actor(&headers) {
        Ok(actor) => actor,
        Err(error) => return error.into_response(),
    };

    match service.add(&actor, PropertyId(request.property)) {
        Ok(FavoriteOutcome::Created(favorite)) => {
            (StatusCode::CREATED, axum::Json(favorite)).into_response()
        }
        Ok(FavoriteOutcome::Existing(_)) => {
            let payload = json!({ "message": "Property is already in your favorites." });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn remove_handler<F, P>(
    State(service): State<Arc<FavoriteService<F, P>>>,
    Path(property_id): Path<u64>,
    headers: HeaderMap,
) -> Response
where
    F: FavoriteRepository + 'static,
    P: PropertyRepository + 'static,
{
    let actor = match service.actor(&headers) {
        Ok(actor) => actor,
        Err(error) => return error.into_response(),
    };

    match service.remove(&actor, PropertyId(property_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) fn error_response(error: FavoriteServiceError) -> Response {
    let status = match &error {
        FavoriteServiceError::PropertyNotFound | FavoriteServiceError::FavoriteNotFound => {
            StatusCode::NOT_FOUND
        }
        FavoriteServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = axum::Json(json!({ "error": error.to_string() }));
    (status, body).into_response()
}
