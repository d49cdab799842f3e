use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of an account, allocated by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub u64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Represents a registered account
#[derive(Clone, PartialEq)]
pub struct Account {
    pub id: AccountId,
    /// Unique across the store
    pub email: String,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    /// bcrypt digest, never the plaintext
    pub password_digest: String,
    /// Symmetric: if `b` is in `a.friend_ids` then `a` is in `b.friend_ids`
    pub friend_ids: BTreeSet<AccountId>,
}

impl Account {
    pub fn new(
        id: AccountId,
        name: Option<String>,
        email: String,
        password_digest: String,
    ) -> Self {
        Self {
            id,
            email,
            name,
            age: None,
            height_cm: None,
            weight_kg: None,
            password_digest,
            friend_ids: BTreeSet::new(),
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("age", &self.age)
            .field("friend_ids", &self.friend_ids)
            .finish_non_exhaustive()
    }
}

/// Partial profile change; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub age: Option<i32>,
}

impl ProfileUpdate {
    pub fn apply(self, account: &mut Account) {
        if let Some(name) = self.name {
            account.name = Some(name);
        }
        if let Some(age) = self.age {
            account.age = Some(age);
        }
    }
}
