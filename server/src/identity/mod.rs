//! Identity & authorization
//!
//! Passwords are stored as bcrypt digests, successful logins hand out signed
//! JWTs, and every request turns its `x-token` header back into a [`Session`].

pub mod password;
pub mod session;
pub mod token;

use chrono::{DateTime, Utc};
use tracing::info;

pub use session::{Session, SessionResolver};
pub use token::{Claims, TokenKeys};

use crate::errors::{AppError, AppResult};
use crate::state::AuthConfig;
use crate::store::{Account, Store};

/// Verifies credentials against the [`Store`] and issues identity tokens
#[derive(Clone)]
pub struct Authenticator {
    store: Store,
    keys: TokenKeys,
    bcrypt_cost: u32,
}

impl Authenticator {
    pub fn new(store: Store, config: &AuthConfig) -> Self {
        Self {
            store,
            keys: TokenKeys::from_secret(&config.jwt_secret),
            bcrypt_cost: config.bcrypt_cost,
        }
    }

    /// A resolver that accepts the tokens this authenticator signs
    pub fn session_resolver(&self) -> SessionResolver {
        SessionResolver::new(self.keys.clone(), self.store.clone())
    }

    pub async fn hash(&self, plaintext: &str) -> AppResult<String> {
        Ok(password::hash(plaintext, self.bcrypt_cost).await?)
    }

    pub async fn verify(&self, plaintext: &str, digest: &str) -> bool {
        password::verify(plaintext, digest).await
    }

    pub fn issue_token(&self, account: &Account) -> AppResult<String> {
        self.issue_token_at(account, Utc::now())
    }

    pub fn issue_token_at(&self, account: &Account, issued_at: DateTime<Utc>) -> AppResult<String> {
        let claims = Claims::for_account(account, issued_at);
        Ok(self.keys.sign(&claims)?)
    }

    /// Hashes the password and registers a new account
    #[tracing::instrument(skip(self, name, plaintext), err(Display))]
    pub async fn sign_up(
        &self,
        name: Option<String>,
        email: &str,
        plaintext: &str,
    ) -> AppResult<Account> {
        // Cheap early exit; `Store::create` re-checks under the write lock.
        if self.store.find_by_email(email).await.is_some() {
            return Err(AppError::DuplicateEmail(email.to_string()));
        }

        let digest = self.hash(plaintext).await?;
        self.store.create(name, email, digest).await
    }

    #[tracing::instrument(skip(self, plaintext), err(Display))]
    pub async fn login(&self, email: &str, plaintext: &str) -> AppResult<String> {
        let account = self
            .store
            .find_by_email(email)
            .await
            .ok_or_else(|| AppError::AccountNotFound(email.to_string()))?;

        if !self.verify(plaintext, &account.password_digest).await {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.issue_token(&account)?;
        info!("Issued identity token for account {}", account.id);
        Ok(token)
    }
}
