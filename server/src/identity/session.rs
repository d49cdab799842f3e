use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::token::TokenKeys;
use crate::errors::{AppError, AppResult};
use crate::store::{AccountId, Store};

/// Outcome of resolving the token presented on one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Session {
    identity: Option<AccountId>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    pub(crate) fn bound_to(id: AccountId) -> Self {
        Self { identity: Some(id) }
    }

    pub fn identity(&self) -> Option<AccountId> {
        self.identity
    }

    /// The acting account, or [`AppError::Unauthenticated`] for anonymous sessions
    pub fn require_identity(&self) -> AppResult<AccountId> {
        self.identity.ok_or(AppError::Unauthenticated)
    }
}

/// Turns a presented token into a [`Session`]
#[derive(Clone)]
pub struct SessionResolver {
    keys: TokenKeys,
    store: Store,
}

impl SessionResolver {
    pub fn new(keys: TokenKeys, store: Store) -> Self {
        Self { keys, store }
    }

    pub async fn resolve(&self, presented: Option<&str>) -> AppResult<Session> {
        self.resolve_at(presented, Utc::now()).await
    }

    /// No token, or an empty one, gives an anonymous session. A token that is
    /// present but forged, malformed or expired fails the request, as does one
    /// whose account id no longer belongs to the email it was issued for.
    pub async fn resolve_at(
        &self,
        presented: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<Session> {
        let token = match presented.map(str::trim) {
            Some(token) if !token.is_empty() => token,
            _ => return Ok(Session::anonymous()),
        };

        let claims = self.keys.verify_signature(token).map_err(|e| {
            info!("Rejected identity token: {}", e);
            AppError::SessionExpiredOrInvalid
        })?;

        if claims.is_expired_at(now) {
            info!("Identity token for account {} is expired", claims.id);
            return Err(AppError::SessionExpiredOrInvalid);
        }

        let owner = self.store.find_account(claims.id).await;
        if owner.map_or(true, |account| account.email != claims.email) {
            info!(
                "Identity token for account {} does not match a stored account",
                claims.id
            );
            return Err(AppError::SessionExpiredOrInvalid);
        }

        debug!("Resolved session for account {}", claims.id);
        Ok(Session::bound_to(claims.id))
    }
}
