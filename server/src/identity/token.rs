use chrono::{DateTime, Duration, SubsecRound as _, Utc};
use color_eyre::eyre::WrapErr as _;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::store::{Account, AccountId};

/// How long an identity token stays valid after issue
pub const TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;

/// JWT payload of an identity token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: AccountId,
    pub email: String,
    pub name: Option<String>,
    /// Issued-at, unix seconds
    pub iat: i64,
    /// Expiry, unix seconds. The token is rejected from this instant on.
    pub exp: i64,
}

impl Claims {
    /// Claims issued at `issued_at`, counted from the start of its second.
    /// JWT times are whole seconds, so the token lives exactly one TTL from `iat`.
    pub fn for_account(account: &Account, issued_at: DateTime<Utc>) -> Self {
        let issued_at = issued_at.trunc_subsecs(0).timestamp();
        Self {
            id: account.id,
            email: account.email.clone(),
            name: account.name.clone(),
            iat: issued_at,
            exp: issued_at + TOKEN_TTL_SECONDS,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// The process-wide HMAC secret, in both signing and verifying form
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    pub fn sign(&self, claims: &Claims) -> color_eyre::Result<String> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .wrap_err("Failed to sign identity token")
    }

    /// Checks the signature and decodes the claims.
    ///
    /// Expiry is left to the caller so it can be judged against an explicit clock.
    pub fn verify_signature(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation).map(|data| data.claims)
    }
}

/// [`TOKEN_TTL_SECONDS`] as a chrono duration
pub fn token_ttl() -> Duration {
    Duration::seconds(TOKEN_TTL_SECONDS)
}
