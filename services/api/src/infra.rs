use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use estate_market::auth::{hash_password, TokenIssuer};
use estate_market::config::AppConfig;
use estate_market::error::AppError;
use estate_market::marketplace::accounts::{AccountRepository, AccountService, NewAccount};
use estate_market::marketplace::favorites::FavoriteService;
use estate_market::marketplace::inquiries::InquiryService;
use estate_market::marketplace::listings::{ImageStore, ImageStoreError, ListingService};
use estate_market::marketplace::memory::InMemoryStore;
use estate_market::marketplace::policy::{AuthorizationPolicy, Role};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Blob-store stand-in handing out deterministic URLs. A production build
/// wires a real object-storage client behind the same trait.
#[derive(Default)]
pub(crate) struct InMemoryImageStore {
    uploads: Mutex<Vec<String>>,
}

impl ImageStore for InMemoryImageStore {
    fn store(&self, file_name: &str, _bytes: &[u8]) -> Result<String, ImageStoreError> {
        let mut uploads = self.uploads.lock().expect("image mutex poisoned");
        let url = format!(
            "https://img.estate-market.dev/{}/{file_name}",
            uploads.len() + 1
        );
        uploads.push(url.clone());
        Ok(url)
    }
}

/// The marketplace services wired against the in-memory store.
pub(crate) struct Services {
    pub(crate) accounts: Arc<AccountService<InMemoryStore>>,
    pub(crate) listings: Arc<ListingService<InMemoryStore, InMemoryImageStore>>,
    pub(crate) favorites: Arc<FavoriteService<InMemoryStore, InMemoryStore>>,
    pub(crate) inquiries: Arc<InquiryService<InMemoryStore, InMemoryStore>>,
}

pub(crate) fn build_services(config: &AppConfig) -> Result<Services, AppError> {
    let store = InMemoryStore::default();
    seed_superadmin(&store, config)?;

    let policy = Arc::new(AuthorizationPolicy::new(config.marketplace.default_role));
    let tokens = Arc::new(TokenIssuer::new(&config.auth));
    let repository = Arc::new(store);

    Ok(Services {
        accounts: Arc::new(AccountService::new(
            repository.clone(),
            policy.clone(),
            tokens.clone(),
        )),
        listings: Arc::new(ListingService::new(
            repository.clone(),
            Arc::new(InMemoryImageStore::default()),
            policy,
            tokens.clone(),
        )),
        favorites: Arc::new(FavoriteService::new(
            repository.clone(),
            repository.clone(),
            tokens.clone(),
        )),
        inquiries: Arc::new(InquiryService::new(
            repository.clone(),
            repository,
            tokens,
        )),
    })
}

fn seed_superadmin(store: &InMemoryStore, config: &AppConfig) -> Result<(), AppError> {
    let Some(seed) = &config.marketplace.superadmin else {
        return Ok(());
    };

    let password_hash =
        hash_password(&seed.password).map_err(|err| AppError::Runtime(err.to_string()))?;
    let account = store
        .insert(NewAccount {
            email: seed.email.clone(),
            first_name: "Superadmin".to_string(),
            last_name: String::new(),
            role: Role::Superadmin,
            is_active: true,
            is_superuser: true,
            password_hash,
        })
        .map_err(|err| AppError::Runtime(format!("failed to seed superadmin: {err}")))?;

    info!(account_id = account.id.0, "superadmin account seeded");
    Ok(())
}
