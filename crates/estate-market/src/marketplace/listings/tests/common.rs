use std::sync::{Arc, Mutex};

use axum::http::{header, HeaderMap};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};

use crate::auth::{hash_password, TokenIssuer};
use crate::config::AuthConfig;
use crate::marketplace::accounts::domain::{AccountRecord, NewAccount};
use crate::marketplace::accounts::repository::AccountRepository;
use crate::marketplace::listings::repository::{ImageStore, ImageStoreError};
use crate::marketplace::listings::router::listing_router;
use crate::marketplace::listings::service::{CreateListing, ListingService};
use crate::marketplace::memory::InMemoryStore;
use crate::marketplace::policy::{Actor, AuthorizationPolicy, Role};

pub(super) fn token_issuer() -> Arc<TokenIssuer> {
    Arc::new(TokenIssuer::new(&AuthConfig {
        token_secret: "listings-test-secret".to_string(),
        access_ttl_secs: 600,
    }))
}

/// Blob-store fake recording every upload.
#[derive(Default)]
pub(super) struct MemoryImageStore {
    uploads: Mutex<Vec<String>>,
}

impl MemoryImageStore {
    pub(super) fn uploads(&self) -> Vec<String> {
        self.uploads.lock().expect("image mutex poisoned").clone()
    }
}

impl ImageStore for MemoryImageStore {
    fn store(&self, file_name: &str, _bytes: &[u8]) -> Result<String, ImageStoreError> {
        let mut uploads = self.uploads.lock().expect("image mutex poisoned");
        let url = format!(
            "https://img.estate-market.test/{}-{file_name}",
            uploads.len() + 1
        );
        uploads.push(url.clone());
        Ok(url)
    }
}

/// Blob-store fake that accepts the first upload and fails afterwards, for
/// exercising the all-or-nothing create path.
#[derive(Default)]
pub(super) struct FlakyImageStore {
    attempts: Mutex<u32>,
}

impl ImageStore for FlakyImageStore {
    fn store(&self, file_name: &str, _bytes: &[u8]) -> Result<String, ImageStoreError> {
        let mut attempts = self.attempts.lock().expect("image mutex poisoned");
        *attempts += 1;
        if *attempts > 1 {
            return Err(ImageStoreError::Unavailable("blob store offline".to_string()));
        }
        Ok(format!("https://img.estate-market.test/1-{file_name}"))
    }
}

pub(super) type TestListingService<S> = ListingService<InMemoryStore, S>;

pub(super) fn build_service() -> (
    Arc<TestListingService<MemoryImageStore>>,
    InMemoryStore,
    Arc<MemoryImageStore>,
) {
    let store = InMemoryStore::default();
    let images = Arc::new(MemoryImageStore::default());
    let service = Arc::new(ListingService::new(
        Arc::new(store.clone()),
        images.clone(),
        Arc::new(AuthorizationPolicy::default()),
        token_issuer(),
    ));
    (service, store, images)
}

pub(super) fn build_service_with_images<S>(
    images: Arc<S>,
) -> (Arc<TestListingService<S>>, InMemoryStore)
where
    S: ImageStore + 'static,
{
    let store = InMemoryStore::default();
    let service = Arc::new(ListingService::new(
        Arc::new(store.clone()),
        images,
        Arc::new(AuthorizationPolicy::default()),
        token_issuer(),
    ));
    (service, store)
}

pub(super) fn seed_account(store: &InMemoryStore, email: &str, role: Role) -> AccountRecord {
    store
        .insert(NewAccount {
            email: email.to_string(),
            first_name: "Seeded".to_string(),
            last_name: String::new(),
            role,
            is_active: true,
            is_superuser: role == Role::Superadmin,
            password_hash: hash_password("hunter-42").expect("hashes"),
        })
        .expect("seed account inserts")
}

pub(super) fn actor_for(account: &AccountRecord) -> Actor {
    Actor {
        account_id: account.id,
        email: account.email.clone(),
        first_name: account.first_name.clone(),
        role: account.role,
    }
}

pub(super) fn bearer_headers(issuer: &TokenIssuer, account: &AccountRecord) -> HeaderMap {
    let pair = issuer.issue(account).expect("token issues");
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        format!("Bearer {}", pair.access).parse().expect("header"),
    );
    headers
}

pub(super) fn draft_json() -> Value {
    json!({
        "title": "Two-bed flat in Dhanmondi",
        "description": "Bright corner unit with a balcony.",
        "price": 250_000,
        "location": "Dhanmondi, Dhaka",
        "bedrooms": 2,
        "bathrooms": 1,
        "space": 900,
        "property_type": "apartment",
        "purpose": "For Sale",
    })
}

pub(super) fn create_request(image_names: &[&str]) -> CreateListing {
    CreateListing {
        property_data: draft_json(),
        images: image_names
            .iter()
            .map(|name| crate::marketplace::listings::domain::ImageUpload {
                file_name: name.to_string(),
                content: BASE64.encode(format!("jpeg-bytes-of-{name}")),
            })
            .collect(),
    }
}

pub(super) fn listings_router<S>(service: Arc<TestListingService<S>>) -> axum::Router
where
    S: ImageStore + 'static,
{
    listing_router(service)
}

pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
