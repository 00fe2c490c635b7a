//! Favorite toggling semantics: idempotent adds, strict removes.

mod common {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::Value;

    use estate_market::auth::{hash_password, TokenIssuer};
    use estate_market::config::AuthConfig;
    use estate_market::marketplace::accounts::{AccountRecord, AccountRepository, NewAccount};
    use estate_market::marketplace::favorites::{favorite_router, FavoriteService};
    use estate_market::marketplace::listings::{NewProperty, PropertyDraft, PropertyRepository};
    use estate_market::marketplace::memory::InMemoryStore;
    use estate_market::marketplace::policy::Role;

    pub(crate) fn build_app() -> (axum::Router, InMemoryStore, Arc<TokenIssuer>) {
        let store = InMemoryStore::default();
        let tokens = Arc::new(TokenIssuer::new(&AuthConfig {
            token_secret: "favorites-secret".to_string(),
            access_ttl_secs: 600,
        }));
        let service = Arc::new(FavoriteService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            tokens.clone(),
        ));
        (favorite_router(service), store, tokens)
    }

    pub(crate) fn seed_account(store: &InMemoryStore, email: &str, role: Role) -> AccountRecord {
        AccountRepository::insert(
            store,
            NewAccount {
                email: email.to_string(),
                first_name: "Seeded".to_string(),
                last_name: String::new(),
                role,
                is_active: true,
                is_superuser: false,
                password_hash: hash_password("hunter-42").expect("hashes"),
            },
        )
        .expect("seed account inserts")
    }

    pub(crate) fn seed_property(store: &InMemoryStore, owner: &AccountRecord) -> u64 {
        PropertyRepository::insert(
            store,
            NewProperty {
                owner: owner.id,
                draft: PropertyDraft {
                    title: "Studio by the park".to_string(),
                    description: "Compact and quiet".to_string(),
                    price: 90_000,
                    location: "Banani".to_string(),
                    bedrooms: 1,
                    bathrooms: 1,
                    space: 420,
                    property_type: String::new(),
                    purpose: Default::default(),
                },
                image_urls: Vec::new(),
            },
        )
        .expect("seed property inserts")
        .id
        .0
    }

    pub(crate) fn add_favorite(token: &str, property: u64) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/favorites")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(
                serde_json::json!({ "property": property }).to_string(),
            ))
            .expect("request builds")
    }

    pub(crate) fn remove_favorite(token: &str, property: u64) -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/v1/favorites/{property}"))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .expect("request builds")
    }

    pub(crate) fn list_favorites(token: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri("/api/v1/favorites")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .expect("request builds")
    }

    pub(crate) async fn read_json_body(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }
}

use axum::http::StatusCode;
use common::*;
use estate_market::marketplace::policy::Role;
use tower::ServiceExt;

#[tokio::test]
async fn adding_twice_stores_one_row_and_succeeds_both_times() {
    let (router, store, issuer) = build_app();
    let seller = seed_account(&store, "seller@example.com", Role::Seller);
    let buyer = seed_account(&store, "buyer@example.com", Role::Buyer);
    let property = seed_property(&store, &seller);
    let token = issuer.issue(&buyer).expect("token issues").access;

    let response = router
        .clone()
        .oneshot(add_favorite(&token, property))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .clone()
        .oneshot(add_favorite(&token, property))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], "Property is already in your favorites.");

    let response = router
        .oneshot(list_favorites(&token))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().expect("array").len(), 1);
}

#[tokio::test]
async fn favoriting_a_missing_property_is_not_found() {
    let (router, store, issuer) = build_app();
    let buyer = seed_account(&store, "buyer@example.com", Role::Buyer);
    let token = issuer.issue(&buyer).expect("token issues").access;

    let response = router
        .oneshot(add_favorite(&token, 9999))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "Property not found.");
}

#[tokio::test]
async fn removing_follows_adds_and_never_silently_succeeds() {
    let (router, store, issuer) = build_app();
    let seller = seed_account(&store, "seller@example.com", Role::Seller);
    let buyer = seed_account(&store, "buyer@example.com", Role::Buyer);
    let property = seed_property(&store, &seller);
    let token = issuer.issue(&buyer).expect("token issues").access;

    // Removing a pair that was never stored is an error.
    let response = router
        .clone()
        .oneshot(remove_favorite(&token, property))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    router
        .clone()
        .oneshot(add_favorite(&token, property))
        .await
        .expect("route executes");

    let response = router
        .clone()
        .oneshot(remove_favorite(&token, property))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router
        .oneshot(remove_favorite(&token, property))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn favorites_are_scoped_to_their_owner() {
    let (router, store, issuer) = build_app();
    let seller = seed_account(&store, "seller@example.com", Role::Seller);
    let first = seed_account(&store, "buyer1@example.com", Role::Buyer);
    let second = seed_account(&store, "buyer2@example.com", Role::Buyer);
    let property = seed_property(&store, &seller);

    let first_token = issuer.issue(&first).expect("token issues").access;
    let second_token = issuer.issue(&second).expect("token issues").access;

    router
        .clone()
        .oneshot(add_favorite(&first_token, property))
        .await
        .expect("route executes");

    let response = router
        .oneshot(list_favorites(&second_token))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().expect("array").len(), 0);
}
