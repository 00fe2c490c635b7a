use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ListingStatus, PropertyId, PropertyPatch};
use super::repository::{ImageStore, PropertyRepository};
use super::service::{CreateListing, ListingService, ListingServiceError};
use crate::marketplace::RepositoryError;

/// Router builder exposing the listing CRUD and approval endpoints. Listing
/// and retrieval are public; everything else resolves an actor first.
pub fn listing_router<P, S>(service: Arc<ListingService<P, S>>) -> Router
where
    P: PropertyRepository + 'static,
    S: ImageStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/properties",
            get(list_handler::<P, S>).post(create_handler::<P, S>),
        )
        .route(
            "/api/v1/properties/:property_id",
            get(get_handler::<P, S>)
                .patch(update_handler::<P, S>)
                .delete(delete_handler::<P, S>),
        )
        .route(
            "/api/v1/properties/:property_id/approval",
            patch(decide_handler::<P, S>),
        )
        .route("/api/v1/my-properties", get(mine_handler::<P, S>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecideListingRequest {
    pub(crate) status: String,
}

pub(crate) async fn list_handler<P, S>(
    State(service): State<Arc<ListingService<P, S>>>,
) -> Response
where
    P: PropertyRepository + 'static,
    S: ImageStore + 'static,
{
    match service.list() {
        Ok(properties) => (StatusCode::OK, axum::Json(properties)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_handler<P, S>(
    State(service): State<Arc<ListingService<P, S>>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<CreateListing>,
) -> Response
where
    P: PropertyRepository + 'static,
    S: ImageStore + 'static,
{
    let actor = match service.actor(&headers) {
        Ok(actor) => actor,
        Err(error) => return error.into_response(),
    };

    match service.create(&actor, request) {
        Ok(property) => (StatusCode::CREATED, axum::Json(property)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<P, S>(
    State(service): State<Arc<ListingService<P, S>>>,
    Path(property_id): Path<u64>,
) -> Response
where
    P: PropertyRepository + 'static,
    S: ImageStore + 'static,
{
    match service.get(PropertyId(property_id)) {
        Ok(property) => (StatusCode::OK, axum::Json(property)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<P, S>(
    State(service): State<Arc<ListingService<P, S>>>,
    Path(property_id): Path<u64>,
    headers: HeaderMap,
    axum::Json(patch): axum::Json<PropertyPatch>,
) -> Response
where
    P: PropertyRepository + 'static,
    S: ImageStore + 'static,
{
    let actor = match service.actor(&headers) {
        Ok(actor) => actor,
        Err(error) => return error.into_response(),
    };

    match service.update(&actor, PropertyId(property_id), patch) {
        Ok(property) => (StatusCode::OK, axum::Json(property)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<P, S>(
    State(service): State<Arc<ListingService<P, S>>>,
    Path(property_id): Path<u64>,
    headers: HeaderMap,
) -> Response
where
    P: PropertyRepository + 'static,
    S: ImageStore + 'static,
{
    let actor = match service.actor(&headers) {
        Ok(actor) => actor,
        Err(error) => return error.into_response(),
    };

    match service.delete(&actor, PropertyId(property_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn decide_handler<P, S>(
    State(service): State<Arc<ListingService<P, S>>>,
    Path(property_id): Path<u64>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<DecideListingRequest>,
) -> Response
where
    P: PropertyRepository + 'static,
    S: ImageStore + 'static,
{
    let actor = match service.actor(&headers) {
        Ok(actor) => actor,
        Err(error) => return error.into_response(),
    };

    let decision = match request.status.trim() {
        "Approved" => ListingStatus::Approved,
        "Rejected" => ListingStatus::Rejected,
        _ => {
            let payload = json!({ "error": "status must be 'Approved' or 'Rejected'" });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    match service.decide(&actor, PropertyId(property_id), decision) {
        Ok(status) => {
            let payload = json!({
                "message": format!("Property {}.", status.label().to_lowercase()),
                "status": status.label(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn mine_handler<P, S>(
    State(service): State<Arc<ListingService<P, S>>>,
    headers: HeaderMap,
) -> Response
where
    P: PropertyRepository + 'static,
    S: ImageStore + 'static,
{
    let actor = match service.actor(&headers) {
        Ok(actor) => actor,
        Err(error) => return error.into_response(),
    };

    match service.mine(&actor) {
        Ok(properties) => (StatusCode::OK, axum::Json(properties)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) fn error_response(error: ListingServiceError) -> Response {
    let status = match &error {
        ListingServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ListingServiceError::NotFound => StatusCode::NOT_FOUND,
        ListingServiceError::AlreadyDecided | ListingServiceError::NotApproved => {
            StatusCode::CONFLICT
        }
        ListingServiceError::Policy(_) => StatusCode::FORBIDDEN,
        ListingServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ListingServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ListingServiceError::Images(_)
        | ListingServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let body = axum::Json(json!({ "error": error.to_string() }));
    (status, body).into_response()
}
