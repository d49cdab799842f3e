use std::env;

use color_eyre::eyre::{eyre, WrapErr as _};
use rand::RngCore as _;
use tracing::warn;

use crate::identity::{Authenticator, SessionResolver};
use crate::schema::{build_schema, AppSchema};
use crate::store::Store;

/// bcrypt cost used when `BCRYPT_COST` is not set
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Secrets and cost factors for the identity layer
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Vec<u8>,
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    pub fn from_env() -> color_eyre::Result<Self> {
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret.into_bytes(),
            _ => {
                warn!(
                    "JWT_SECRET not set, generating a random one. Tokens will not survive a restart."
                );
                generate_secret()
            }
        };

        let bcrypt_cost = match env::var("BCRYPT_COST") {
            Ok(cost) => cost
                .parse::<u32>()
                .wrap_err_with(|| format!("BCRYPT_COST must be an integer, got {:?}", cost))?,
            Err(_) => DEFAULT_BCRYPT_COST,
        };
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(eyre!("BCRYPT_COST must be between 4 and 31, got {}", bcrypt_cost));
        }

        Ok(Self {
            jwt_secret,
            bcrypt_cost,
        })
    }
}

/// 64 random bytes, enough for an HS256 key
pub fn generate_secret() -> Vec<u8> {
    let mut secret = vec![0u8; 64];
    rand::thread_rng().fill_bytes(&mut secret);
    secret
}

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub auth: Authenticator,
    pub sessions: SessionResolver,
    pub schema: AppSchema,
}

impl AppState {
    pub fn new(store: Store, config: &AuthConfig) -> Self {
        let auth = Authenticator::new(store.clone(), config);
        let sessions = auth.session_resolver();
        let schema = build_schema(store.clone(), auth.clone());

        Self {
            store,
            auth,
            sessions,
            schema,
        }
    }

    pub fn from_env() -> color_eyre::Result<Self> {
        let config = AuthConfig::from_env()?;
        Ok(Self::new(Store::new(), &config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_secrets_differ() {
        let first = generate_secret();
        let second = generate_secret();

        assert_eq!(first.len(), 64);
        assert_ne!(first, second);
    }
}
