use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::marketplace::accounts::repository::AccountRepository;
use crate::marketplace::accounts::router;
use crate::marketplace::accounts::service::AccountService;
use crate::marketplace::policy::{AuthorizationPolicy, Role};

fn json_request(method: &str, uri: &str, headers: Option<&HeaderMap>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(headers) = headers {
        if let Some(authorization) = headers.get(header::AUTHORIZATION) {
            builder = builder.header(header::AUTHORIZATION, authorization);
        }
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn register_route_creates_accounts() {
    let (service, _) = build_service();
    let router = accounts_router(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/accounts",
            None,
            json!({
                "email": "casey@example.com",
                "password": TEST_PASSWORD,
                "first_name": "Casey",
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["email"], "casey@example.com");
    assert_eq!(payload["role"], "buyer");
    assert!(payload.get("password_hash").is_none());
}

#[tokio::test]
async fn token_route_exchanges_credentials() {
    let (service, store) = build_service();
    let account = seed_account(&store, "casey@example.com", Role::Buyer);
    let router = accounts_router(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/token",
            None,
            json!({ "email": account.email, "password": TEST_PASSWORD }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert!(payload.get("access").is_some());
    assert!(payload.get("refresh").is_some());

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/token",
            None,
            json!({ "email": "casey@example.com", "password": "wrong" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_route_requires_a_token() {
    let (service, _) = build_service();
    let router = accounts_router(service);

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/accounts")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn change_role_route_applies_the_policy() {
    let (service, store) = build_service();
    let issuer = token_issuer();
    let superadmin = seed_account(&store, "root@example.com", Role::Superadmin);
    let admin = seed_account(&store, "admin@example.com", Role::Admin);
    let target = seed_account(&store, "staff@example.com", Role::Admin);
    let router = accounts_router(service);

    let uri = format!("/api/v1/accounts/{}/role", target.id.0);
    let response = router
        .clone()
        .oneshot(json_request(
            "PATCH",
            &uri,
            Some(&bearer_headers(&issuer, &admin)),
            json!({ "role": "seller" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = router
        .oneshot(json_request(
            "PATCH",
            &uri,
            Some(&bearer_headers(&issuer, &superadmin)),
            json!({ "role": "seller" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["message"],
        "User's role successfully updated to 'seller'."
    );
}

#[tokio::test]
async fn missing_role_field_reads_as_invalid_role() {
    let (service, store) = build_service();
    let issuer = token_issuer();
    let superadmin = seed_account(&store, "root@example.com", Role::Superadmin);
    let target = seed_account(&store, "staff@example.com", Role::Buyer);
    let router = accounts_router(service);

    let response = router
        .oneshot(json_request(
            "PATCH",
            &format!("/api/v1/accounts/{}/role", target.id.0),
            Some(&bearer_headers(&issuer, &superadmin)),
            json!({}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["error"],
        "Invalid role provided. Valid roles are: admin, seller, buyer"
    );
}

#[tokio::test]
async fn apply_route_conflicts_on_second_submission() {
    let (service, store) = build_service();
    let issuer = token_issuer();
    let buyer = seed_account(&store, "buyer@example.com", Role::Buyer);
    let router = accounts_router(service);

    let body = json!({ "message": "We list family homes." });
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/seller-applications",
            Some(&bearer_headers(&issuer, &buyer)),
            body.clone(),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "pending");

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/seller-applications",
            Some(&bearer_headers(&issuer, &buyer)),
            body,
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "already applied");
}

#[tokio::test]
async fn register_handler_reports_unavailable_repositories() {
    let service = Arc::new(AccountService::new(
        Arc::new(UnavailableAccounts),
        Arc::new(AuthorizationPolicy::default()),
        token_issuer(),
    ));

    let response = router::register_handler::<UnavailableAccounts>(
        State(service),
        axum::Json(registration("casey@example.com")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn change_role_handler_accepts_direct_calls() {
    let (service, store) = build_service();
    let issuer = token_issuer();
    let superadmin = seed_account(&store, "root@example.com", Role::Superadmin);
    let target = seed_account(&store, "staff@example.com", Role::Buyer);

    let response = router::change_role_handler::<crate::marketplace::memory::InMemoryStore>(
        State(service),
        Path(target.id.0),
        bearer_headers(&issuer, &superadmin),
        axum::Json(router::ChangeRoleRequest {
            role: Some("admin".to_string()),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let stored = store.fetch(target.id).expect("fetch").expect("present");
    assert_eq!(stored.role, Role::Admin);
}
