use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AccountId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub author_id: AccountId,
    pub title: String,
    pub body: Option<String>,
    pub liked_by: BTreeSet<AccountId>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Adds `account` to the liked-by set, or removes it if already present.
    /// Returns whether the post is liked by `account` afterwards.
    pub fn toggle_like(&mut self, account: AccountId) -> bool {
        if self.liked_by.remove(&account) {
            false
        } else {
            self.liked_by.insert(account);
            true
        }
    }
}

/// Fields supplied by the author when creating a post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub body: Option<String>,
}
