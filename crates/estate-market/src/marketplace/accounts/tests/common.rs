use std::sync::Arc;

use axum::http::{header, HeaderMap};
use serde_json::Value;

use crate::auth::{hash_password, TokenIssuer};
use crate::config::AuthConfig;
use crate::marketplace::accounts::domain::{
    AccountId, AccountRecord, ApplicationEntry, ApplicationId, ApplicationStatus, NewAccount,
    SellerApplication, SellerApplicationForm,
};
use crate::marketplace::accounts::repository::AccountRepository;
use crate::marketplace::accounts::router::account_router;
use crate::marketplace::accounts::service::{AccountService, Registration};
use crate::marketplace::memory::InMemoryStore;
use crate::marketplace::policy::{Actor, AuthorizationPolicy, Role};
use crate::marketplace::RepositoryError;

pub(super) const TEST_PASSWORD: &str = "hunter-42";

pub(super) fn token_issuer() -> Arc<TokenIssuer> {
    Arc::new(TokenIssuer::new(&AuthConfig {
        token_secret: "accounts-test-secret".to_string(),
        access_ttl_secs: 600,
    }))
}

pub(super) fn build_service() -> (Arc<AccountService<InMemoryStore>>, InMemoryStore) {
    build_service_with_policy(AuthorizationPolicy::default())
}

pub(super) fn build_service_with_policy(
    policy: AuthorizationPolicy,
) -> (Arc<AccountService<InMemoryStore>>, InMemoryStore) {
    let store = InMemoryStore::default();
    let service = Arc::new(AccountService::new(
        Arc::new(store.clone()),
        Arc::new(policy),
        token_issuer(),
    ));
    (service, store)
}

pub(super) fn registration(email: &str) -> Registration {
    Registration {
        email: email.to_string(),
        password: TEST_PASSWORD.to_string(),
        first_name: "Casey".to_string(),
        last_name: "Lee".to_string(),
    }
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
            password_hash: hash_password(TEST_PASSWORD).expect("hashes"),
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

pub(super) fn accounts_router(
    service: Arc<AccountService<InMemoryStore>>,
) -> axum::Router {
    account_router(service)
}

pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn pending_application(store: &InMemoryStore, account: AccountId) -> SellerApplication {
    store
        .attach_application(
            account,
            SellerApplicationForm {
                message: "We list family homes.".to_string(),
                company_name: Some("Lakeview Homes".to_string()),
                ..Default::default()
            },
        )
        .expect("application attaches")
}

pub(super) fn application_entry(
    store: &InMemoryStore,
    id: ApplicationId,
) -> Option<ApplicationEntry> {
    store.fetch_application(id).expect("fetch application")
}

pub(super) fn decide_directly(
    store: &InMemoryStore,
    id: ApplicationId,
    status: ApplicationStatus,
) {
    store
        .update_application_status(id, status)
        .expect("status updates");
}

/// Repository stub for exercising the internal-error paths.
pub(super) struct UnavailableAccounts;

impl AccountRepository for UnavailableAccounts {
    fn insert(&self, _account: NewAccount) -> Result<AccountRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: AccountId) -> Result<Option<AccountRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_by_email(&self, _email: &str) -> Result<Option<AccountRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<AccountRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_role(&self, _id: AccountId, _role: Role) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn attach_application(
        &self,
        _id: AccountId,
        _form: SellerApplicationForm,
    ) -> Result<SellerApplication, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_application(
        &self,
        _id: ApplicationId,
    ) -> Result<Option<ApplicationEntry>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_applications(&self) -> Result<Vec<ApplicationEntry>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_application_status(
        &self,
        _id: ApplicationId,
        _status: ApplicationStatus,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
