use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use super::repository::InquiryRepository;
use super::service::{CreateInquiry, InquiryService, InquiryServiceError};
use crate::marketplace::listings::repository::PropertyRepository;

/// Router builder for the inquiry endpoints.
pub fn inquiry_router<I, P>(service: Arc<InquiryService<I, P>>) -> Router
where
    I: InquiryRepository + 'static,
    P: PropertyRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/inquiries",
            get(list_handler::<I, P>).post(create_handler::<I, P>),
        )
        .with_state(service)
}

pub(crate) async fn create_handler<I, P>(
    State(service): State<Arc<InquiryService<I, P>>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<CreateInquiry>,
) -> Response
where
    I: InquiryRepository + 'static,
    P: PropertyRepository + 'static,
{
    let actor = match service.actor(&headers) {
        Ok(actor) => actor,
        Err(error) => return error.into_response(),
    };

    match service.create(&actor, request) {
        Ok(inquiry) => (StatusCode::CREATED, axum::Json(inquiry)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<I, P>(
    State(service): State<Arc<InquiryService<I, P>>>,
    headers: HeaderMap,
) -> Response
where
    I: InquiryRepository + 'static,
    P: PropertyRepository + 'static,
{
    let actor = match service.actor(&headers) {
        Ok(actor) => actor,
        Err(error) => return error.into_response(),
    };

    match service.list(&actor) {
        Ok(inquiries) => (StatusCode::OK, axum::Json(inquiries)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) fn error_response(error: InquiryServiceError) -> Response {
    let status = match &error {
        InquiryServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        InquiryServiceError::PropertyNotFound => StatusCode::NOT_FOUND,
        InquiryServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = axum::Json(json!({ "error": error.to_string() }));
    (status, body).into_response()
}
