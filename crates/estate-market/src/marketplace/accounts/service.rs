use std::sync::Arc;

use axum::http::HeaderMap;
use serde::Deserialize;
use tracing::info;

use super::domain::{
    AccountId, AccountRecord, AccountView, ApplicationEntry, ApplicationId, ApplicationStatus,
    NewAccount, SellerApplication, SellerApplicationForm,
};
use super::repository::AccountRepository;
use crate::auth::{hash_password, verify_password, AuthError, PasswordError, TokenIssuer, TokenPair};
use crate::marketplace::policy::{
    validate_transition, Action, Actor, AuthorizationPolicy, InvalidRoleRequest, PolicyViolation,
    Role,
};
use crate::marketplace::RepositoryError;

const PASSWORD_MIN_CHARS: usize = 6;

/// Registration payload accepted from unauthenticated callers. The role is
/// never part of it; new accounts always start at the policy's default.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Login payload exchanged for a token pair.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Service composing the account repository, the authorization policy, and
/// the token provider.
pub struct AccountService<R> {
    repository: Arc<R>,
    policy: Arc<AuthorizationPolicy>,
    tokens: Arc<TokenIssuer>,
}

impl<R> AccountService<R>
where
    R: AccountRepository + 'static,
{
    pub fn new(repository: Arc<R>, policy: Arc<AuthorizationPolicy>, tokens: Arc<TokenIssuer>) -> Self {
        Self {
            repository,
            policy,
            tokens,
        }
    }

    /// Resolve request headers to an authenticated actor.
    pub fn actor(&self, headers: &HeaderMap) -> Result<Actor, AuthError> {
        self.tokens.resolve_actor(headers)
    }

    /// Register a new account at the policy's default role.
    pub fn register(&self, registration: Registration) -> Result<AccountView, AccountServiceError> {
        let email = normalize_email(&registration.email)?;
        if registration.password.chars().count() < PASSWORD_MIN_CHARS {
            return Err(AccountServiceError::Validation(format!(
                "password must be at least {PASSWORD_MIN_CHARS} characters"
            )));
        }

        let account = self.repository.insert(NewAccount {
            email,
            first_name: registration.first_name.trim().to_string(),
            last_name: registration.last_name.trim().to_string(),
            role: self.policy.default_role(),
            is_active: true,
            is_superuser: false,
            password_hash: hash_password(&registration.password)?,
        });

        match account {
            Ok(account) => {
                info!(account_id = account.id.0, "account registered");
                Ok(account.view())
            }
            Err(RepositoryError::Conflict) => Err(AccountServiceError::EmailTaken),
            Err(other) => Err(other.into()),
        }
    }

    /// Exchange credentials for an access/refresh token pair.
    pub fn login(&self, credentials: Credentials) -> Result<TokenPair, AccountServiceError> {
        let email = normalize_email(&credentials.email)?;
        let account = self
            .repository
            .fetch_by_email(&email)?
            .ok_or(AccountServiceError::InvalidCredentials)?;

        // Inactive accounts are indistinguishable from bad credentials.
        if !account.is_active || !verify_password(&credentials.password, &account.password_hash)? {
            return Err(AccountServiceError::InvalidCredentials);
        }

        self.tokens
            .issue(&account)
            .map_err(|_| AccountServiceError::TokenIssuance)
    }

    pub fn list(&self, actor: &Actor) -> Result<Vec<AccountView>, AccountServiceError> {
        self.policy.authorize(actor, Action::ListAccounts)?;
        let accounts = self.repository.list()?;
        Ok(accounts.iter().map(AccountRecord::view).collect())
    }

    /// Change another account's role.
    ///
    /// Check order is observable through the response codes: the actor gate
    /// runs before the target is even looked up, the requested role is
    /// validated next, and the superadmin lock is applied last.
    pub fn change_role(
        &self,
        actor: &Actor,
        target: AccountId,
        requested_role: &str,
    ) -> Result<Role, AccountServiceError> {
        self.policy.authorize_role_change(actor)?;

        let target = self
            .repository
            .fetch(target)?
            .ok_or(AccountServiceError::UserNotFound)?;

        let role = validate_transition(requested_role)?;
        self.policy.guard_role_target(&target)?;

        self.repository.update_role(target.id, role)?;
        info!(
            account_id = target.id.0,
            role = role.label(),
            "account role updated"
        );
        Ok(role)
    }

    /// Submit a seller application for the acting account.
    pub fn submit_application(
        &self,
        actor: &Actor,
        form: SellerApplicationForm,
    ) -> Result<SellerApplication, AccountServiceError> {
        let account = self
            .repository
            .fetch(actor.account_id)?
            .ok_or(AccountServiceError::UserNotFound)?;

        self.policy.authorize_seller_application(&account)?;

        let application = self.repository.attach_application(account.id, form)?;
        info!(
            account_id = account.id.0,
            application_id = application.id.0,
            "seller application submitted"
        );
        Ok(application)
    }

    pub fn list_applications(
        &self,
        actor: &Actor,
    ) -> Result<Vec<ApplicationEntry>, AccountServiceError> {
        self.policy
            .authorize(actor, Action::ReviewSellerApplications)?;
        Ok(self.repository.list_applications()?)
    }

    /// Decide a pending seller application. Approval also promotes the
    /// applicant to the seller role through the same partial-update path as
    /// the role-change operation.
    pub fn decide_application(
        &self,
        actor: &Actor,
        id: ApplicationId,
        decision: ApplicationStatus,
    ) -> Result<ApplicationStatus, AccountServiceError> {
        self.policy
            .authorize(actor, Action::ReviewSellerApplications)?;

        if decision == ApplicationStatus::Pending {
            return Err(AccountServiceError::Validation(
                "decision must be 'approved' or 'rejected'".to_string(),
            ));
        }

        let entry = self
            .repository
            .fetch_application(id)?
            .ok_or(AccountServiceError::ApplicationNotFound)?;

        if entry.application.status != ApplicationStatus::Pending {
            return Err(AccountServiceError::ApplicationDecided);
        }

        if decision == ApplicationStatus::Approved {
            let applicant = self
                .repository
                .fetch(entry.account_id)?
                .ok_or(AccountServiceError::UserNotFound)?;
            self.policy.guard_role_target(&applicant)?;
            self.repository.update_application_status(id, decision)?;
            self.repository.update_role(applicant.id, Role::Seller)?;
        } else {
            self.repository.update_application_status(id, decision)?;
        }

        info!(
            application_id = id.0,
            status = decision.label(),
            "seller application decided"
        );
        Ok(decision)
    }
}

fn normalize_email(raw: &str) -> Result<String, AccountServiceError> {
    let email = raw.trim().to_ascii_lowercase();
    if email.is_empty() {
        return Err(AccountServiceError::Validation(
            "email is required".to_string(),
        ));
    }
    // Structural check only; deliverability is the mail system's problem.
    let well_formed = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
        .unwrap_or(false);
    if !well_formed {
        return Err(AccountServiceError::Validation(
            "email must be a valid address".to_string(),
        ));
    }
    Ok(email)
}

/// Error raised by the account service.
#[derive(Debug, thiserror::Error)]
pub enum AccountServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("No active account found with the given credentials")]
    InvalidCredentials,
    #[error("token issuance failed")]
    TokenIssuance,
    #[error("User not found.")]
    UserNotFound,
    #[error("Application not found.")]
    ApplicationNotFound,
    #[error("application already decided")]
    ApplicationDecided,
    #[error("An account with this email already exists.")]
    EmailTaken,
    #[error(transparent)]
    InvalidRole(#[from] InvalidRoleRequest),
    #[error(transparent)]
    Policy(#[from] PolicyViolation),
    #[error(transparent)]
    Credential(#[from] PasswordError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
