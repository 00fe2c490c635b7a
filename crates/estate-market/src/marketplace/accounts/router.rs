use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{AccountId, ApplicationId, ApplicationStatus, SellerApplicationForm};
use super::repository::AccountRepository;
use super::service::{AccountService, AccountServiceError, Credentials, Registration};
use crate::marketplace::policy::PolicyViolation;
use crate::marketplace::RepositoryError;

/// Router builder exposing account registration, token issuance, role
/// changes, and the seller-onboarding endpoints.
pub fn account_router<R>(service: Arc<AccountService<R>>) -> Router
where
    R: AccountRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/accounts",
            get(list_handler::<R>).post(register_handler::<R>),
        )
        .route(
            "/api/v1/accounts/:account_id/role",
            patch(change_role_handler::<R>),
        )
        .route("/api/v1/auth/token", post(token_handler::<R>))
        .route(
            "/api/v1/seller-applications",
            get(list_applications_handler::<R>).post(apply_handler::<R>),
        )
        .route(
            "/api/v1/seller-applications/:application_id",
            patch(decide_application_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChangeRoleRequest {
    #[serde(default)]
    pub(crate) role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecideApplicationRequest {
    pub(crate) status: String,
}

pub(crate) async fn register_handler<R>(
    State(service): State<Arc<AccountService<R>>>,
    axum::Json(registration): axum::Json<Registration>,
) -> Response
where
    R: AccountRepository + 'static,
{
    match service.register(registration) {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<AccountService<R>>>,
    headers: HeaderMap,
) -> Response
where
    R: AccountRepository + 'static,
{
    let actor = match service.actor(&headers) {
        Ok(actor) => actor,
        Err(error) => return error.into_response(),
    };

    match service.list(&actor) {
        Ok(accounts) => (StatusCode::OK, axum::Json(accounts)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn token_handler<R>(
    State(service): State<Arc<AccountService<R>>>,
    axum::Json(credentials): axum::Json<Credentials>,
) -> Response
where
    R: AccountRepository + 'static,
{
    match service.login(credentials) {
        Ok(pair) => (StatusCode::OK, axum::Json(pair)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn change_role_handler<R>(
    State(service): State<Arc<AccountService<R>>>,
    Path(account_id): Path<u64>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<ChangeRoleRequest>,
) -> Response
where
    R: AccountRepository + 'static,
{
    let actor = match service.actor(&headers) {
        Ok(actor) => actor,
        Err(error) => return error.into_response(),
    };

    let requested = request.role.unwrap_or_default();
    match service.change_role(&actor, AccountId(account_id), &requested) {
        Ok(role) => {
            let payload = json!({
                "message": format!("User's role successfully updated to '{}'.", role.label()),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn apply_handler<R>(
    State(service): State<Arc<AccountService<R>>>,
    headers: HeaderMap,
    axum::Json(form): axum::Json<SellerApplicationForm>,
) -> Response
where
    R: AccountRepository + 'static,
{
    let actor = match service.actor(&headers) {
        Ok(actor) => actor,
        Err(error) => return error.into_response(),
    };

    match service.submit_application(&actor, form) {
        Ok(application) => (StatusCode::CREATED, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_applications_handler<R>(
    State(service): State<Arc<AccountService<R>>>,
    headers: HeaderMap,
) -> Response
where
    R: AccountRepository + 'static,
{
    let actor = match service.actor(&headers) {
        Ok(actor) => actor,
        Err(error) => return error.into_response(),
    };

    match service.list_applications(&actor) {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn decide_application_handler<R>(
    State(service): State<Arc<AccountService<R>>>,
    Path(application_id): Path<u64>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<DecideApplicationRequest>,
) -> Response
where
    R: AccountRepository + 'static,
{
    let actor = match service.actor(&headers) {
        Ok(actor) => actor,
        Err(error) => return error.into_response(),
    };

    let decision = match request.status.trim() {
        "approved" => ApplicationStatus::Approved,
        "rejected" => ApplicationStatus::Rejected,
        _ => {
            let payload = json!({ "error": "status must be 'approved' or 'rejected'" });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    match service.decide_application(&actor, ApplicationId(application_id), decision) {
        Ok(status) => {
            let payload = json!({
                "message": format!("Application {}.", status.label()),
                "status": status.label(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) fn error_response(error: AccountServiceError) -> Response {
    let status = match &error {
        AccountServiceError::Validation(_) | AccountServiceError::InvalidRole(_) => {
            StatusCode::BAD_REQUEST
        }
        AccountServiceError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AccountServiceError::Policy(PolicyViolation::AlreadyApplied) => StatusCode::CONFLICT,
        AccountServiceError::Policy(_) => StatusCode::FORBIDDEN,
        AccountServiceError::UserNotFound | AccountServiceError::ApplicationNotFound => {
            StatusCode::NOT_FOUND
        }
        AccountServiceError::ApplicationDecided | AccountServiceError::EmailTaken => {
            StatusCode::CONFLICT
        }
        AccountServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AccountServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AccountServiceError::Repository(RepositoryError::Unavailable(_))
        | AccountServiceError::Credential(_)
        | AccountServiceError::TokenIssuance => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = axum::Json(json!({ "error": error.to_string() }));
    (status, body).into_response()
}
