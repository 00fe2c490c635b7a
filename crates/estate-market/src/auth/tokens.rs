use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::AuthConfig;
use crate::marketplace::accounts::domain::{AccountId, AccountRecord};
use crate::marketplace::policy::{Actor, Role};

const ISSUER: &str = "estate-market";

/// Authentication failures. `UnknownRole` is a forbidden signal rather than
/// an authentication failure: the token verified, but its role claim names
/// no role the marketplace knows.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Authentication credentials were not provided.")]
    MissingToken,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("token is not an access token")]
    WrongTokenType,
    #[error("Unauthorized")]
    UnknownRole,
    #[error("token signing failed")]
    Signing,
    #[error("system clock error")]
    Clock,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::UnknownRole => StatusCode::FORBIDDEN,
            AuthError::Signing | AuthError::Clock => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::WrongTokenType => {
                StatusCode::UNAUTHORIZED
            }
        };
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Signed claims carried by every token. The marketplace relies on exactly
/// `role`, `email`, and `first_name` beyond the registered claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: u64,
    pub iat: u64,
    pub exp: u64,
    pub iss: String,
    pub role: String,
    pub email: String,
    pub first_name: String,
    pub token_type: TokenType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Access/refresh pair returned by the token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Issues and verifies HS256 tokens for marketplace accounts.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_ttl_secs: u64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("algorithm", &self.algorithm)
            .field("access_ttl_secs", &self.access_ttl_secs)
            .finish()
    }
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.token_secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            access_ttl_secs: config.access_ttl_secs,
        }
    }

    /// Issue an access/refresh pair for an account. Refresh tokens live 24x
    /// longer than access tokens and cannot authenticate requests.
    pub fn issue(&self, account: &AccountRecord) -> Result<TokenPair, AuthError> {
        let now = unix_now()?;
        let access = self.sign(account, now, now + self.access_ttl_secs, TokenType::Access)?;
        let refresh = self.sign(
            account,
            now,
            now + self.access_ttl_secs * 24,
            TokenType::Refresh,
        )?;
        Ok(TokenPair { access, refresh })
    }

    fn sign(
        &self,
        account: &AccountRecord,
        iat: u64,
        exp: u64,
        token_type: TokenType,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            sub: account.id.0,
            iat,
            exp,
            iss: ISSUER.to_string(),
            role: account.role.label().to_string(),
            email: account.email.clone(),
            first_name: account.first_name.clone(),
            token_type,
        };
        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|_| AuthError::Signing)
    }

    /// Verify an access token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_issuer(&[ISSUER]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AuthError::InvalidToken)?;

        if data.claims.token_type != TokenType::Access {
            return Err(AuthError::WrongTokenType);
        }
        Ok(data.claims)
    }

    /// Resolve the request headers to an authenticated actor.
    pub fn resolve_actor(&self, headers: &HeaderMap) -> Result<Actor, AuthError> {
        let claims = self.verify(bearer_token(headers)?)?;
        let role = Role::parse(&claims.role).ok_or(AuthError::UnknownRole)?;
        Ok(Actor {
            account_id: AccountId(claims.sub),
            email: claims.email,
            first_name: claims.first_name,
            role,
        })
    }
}

/// Pull the bearer token out of an `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;
    let value = value.to_str().map_err(|_| AuthError::InvalidToken)?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidToken)
}

fn unix_now() -> Result<u64, AuthError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .map_err(|_| AuthError::Clock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&AuthConfig {
            token_secret: "unit-test-secret".to_string(),
            access_ttl_secs: 600,
        })
    }

    fn account(role: Role) -> AccountRecord {
        AccountRecord {
            id: AccountId(42),
            email: "casey@example.com".to_string(),
            first_name: "Casey".to_string(),
            last_name: "Lee".to_string(),
            role,
            is_active: true,
            is_superuser: false,
            date_joined: Utc::now(),
            password_hash: "$argon2id$test".to_string(),
            seller_application: None,
        }
    }

    fn headers_with(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            format!("Bearer {token}").parse().expect("header value"),
        );
        headers
    }

    #[test]
    fn access_token_resolves_to_actor() {
        let issuer = issuer();
        let pair = issuer.issue(&account(Role::Seller)).expect("issues");

        let actor = issuer
            .resolve_actor(&headers_with(&pair.access))
            .expect("resolves");
        assert_eq!(actor.account_id, AccountId(42));
        assert_eq!(actor.role, Role::Seller);
        assert_eq!(actor.email, "casey@example.com");
        assert_eq!(actor.first_name, "Casey");
    }

    #[test]
    fn refresh_token_cannot_authenticate_requests() {
        let issuer = issuer();
        let pair = issuer.issue(&account(Role::Buyer)).expect("issues");

        match issuer.resolve_actor(&headers_with(&pair.refresh)) {
            Err(AuthError::WrongTokenType) => {}
            other => panic!("expected wrong token type, got {other:?}"),
        }
    }

    #[test]
    fn missing_and_malformed_headers_are_rejected() {
        let issuer = issuer();
        match issuer.resolve_actor(&HeaderMap::new()) {
            Err(AuthError::MissingToken) => {}
            other => panic!("expected missing token, got {other:?}"),
        }

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Token abc".parse().expect("value"));
        match issuer.resolve_actor(&headers) {
            Err(AuthError::InvalidToken) => {}
            other => panic!("expected invalid token, got {other:?}"),
        }
    }

    #[test]
    fn tampered_tokens_fail_verification() {
        let issuer = issuer();
        let pair = issuer.issue(&account(Role::Admin)).expect("issues");
        let mut forged = pair.access.clone();
        forged.push('x');

        match issuer.verify(&forged) {
            Err(AuthError::InvalidToken) => {}
            other => panic!("expected invalid token, got {other:?}"),
        }
    }

    #[test]
    fn unknown_role_claims_are_forbidden_not_unauthenticated() {
        // A token minted before a role was retired should fail closed with a
        // forbidden signal, distinct from an expired or malformed token.
        let issuer = issuer();
        let now = unix_now().expect("clock");
        let claims = Claims {
            sub: 9,
            iat: now,
            exp: now + 600,
            iss: ISSUER.to_string(),
            role: "landlord".to_string(),
            email: "ghost@example.com".to_string(),
            first_name: String::new(),
            token_type: TokenType::Access,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .expect("signs");

        match issuer.resolve_actor(&headers_with(&token)) {
            Err(AuthError::UnknownRole) => {}
            other => panic!("expected unknown role, got {other:?}"),
        }
    }
}
