//! In-memory account and post tables
//!
//! Both tables sit behind one lock so every mutation is a single exclusive
//! read-modify-write over the whole dataset.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::info;

use crate::errors::{AppError, AppResult, EntityKind};

pub mod account;
pub mod post;
pub mod seed;

pub use account::{Account, AccountId, ProfileUpdate};
pub use post::{NewPost, Post, PostId};

#[derive(Debug, Default)]
struct Tables {
    accounts: BTreeMap<AccountId, Account>,
    posts: BTreeMap<PostId, Post>,
    /// Highest post id ever handed out; deleted ids stay retired
    last_post_id: u64,
}

impl Tables {
    fn account_mut(&mut self, id: AccountId) -> AppResult<&mut Account> {
        self.accounts
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(EntityKind::Account, id))
    }

    fn next_account_id(&self) -> AccountId {
        AccountId(self.accounts.keys().next_back().map_or(1, |id| id.0 + 1))
    }

    fn next_post_id(&mut self) -> PostId {
        let highest = self.posts.keys().next_back().map_or(0, |id| id.0);
        self.last_post_id = self.last_post_id.max(highest) + 1;
        PostId(self.last_post_id)
    }
}

/// Shared handle to the tables; clones point at the same data
#[derive(Debug, Clone, Default)]
pub struct Store {
    tables: Arc<RwLock<Tables>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // Accounts

    pub async fn find_by_email(&self, email: &str) -> Option<Account> {
        let tables = self.tables.read().await;
        tables
            .accounts
            .values()
            .find(|account| account.email == email)
            .cloned()
    }

    pub async fn find_by_name(&self, name: &str) -> Option<Account> {
        let tables = self.tables.read().await;
        tables
            .accounts
            .values()
            .find(|account| account.name.as_deref() == Some(name))
            .cloned()
    }

    pub async fn find_account(&self, id: AccountId) -> Option<Account> {
        self.tables.read().await.accounts.get(&id).cloned()
    }

    pub async fn account(&self, id: AccountId) -> AppResult<Account> {
        self.find_account(id)
            .await
            .ok_or_else(|| AppError::not_found(EntityKind::Account, id))
    }

    /// All accounts, ordered by id
    pub async fn accounts(&self) -> Vec<Account> {
        self.tables.read().await.accounts.values().cloned().collect()
    }

    /// Accounts whose id is in `ids`, ordered by id. Unknown ids are skipped.
    pub async fn accounts_by_ids(&self, ids: &BTreeSet<AccountId>) -> Vec<Account> {
        let tables = self.tables.read().await;
        ids.iter()
            .filter_map(|id| tables.accounts.get(id).cloned())
            .collect()
    }

    /// Registers a new account under the next free id.
    ///
    /// Fails with [`AppError::DuplicateEmail`] if the email is already taken.
    #[tracing::instrument(skip(self, name, password_digest), err(Display))]
    pub async fn create(
        &self,
        name: Option<String>,
        email: &str,
        password_digest: String,
    ) -> AppResult<Account> {
        let mut tables = self.tables.write().await;

        if tables.accounts.values().any(|account| account.email == email) {
            return Err(AppError::DuplicateEmail(email.to_string()));
        }

        let id = tables.next_account_id();
        let account = Account::new(id, name, email.to_string(), password_digest);
        tables.accounts.insert(id, account.clone());

        info!("Created new account with ID: {}", id);
        Ok(account)
    }

    pub async fn update_profile(&self, id: AccountId, update: ProfileUpdate) -> AppResult<Account> {
        let mut tables = self.tables.write().await;
        let account = tables.account_mut(id)?;
        update.apply(account);

        info!("Updated profile of account {}", id);
        Ok(account.clone())
    }

    /// Makes `actor` and `friend_id` friends of each other and returns the actor.
    /// Repeating the call changes nothing; befriending oneself is a no-op.
    #[tracing::instrument(skip(self), err(Display))]
    pub async fn add_friend(&self, actor: AccountId, friend_id: AccountId) -> AppResult<Account> {
        let mut tables = self.tables.write().await;

        // Both sides must exist before either is touched.
        tables.account_mut(friend_id)?;
        tables.account_mut(actor)?;

        if actor != friend_id {
            tables.account_mut(friend_id)?.friend_ids.insert(actor);
            tables.account_mut(actor)?.friend_ids.insert(friend_id);
            info!("Accounts {} and {} are now friends", actor, friend_id);
        }

        Ok(tables.account_mut(actor)?.clone())
    }

    // Posts

    /// All posts, ordered by id
    pub async fn posts(&self) -> Vec<Post> {
        self.tables.read().await.posts.values().cloned().collect()
    }

    pub async fn find_post(&self, id: PostId) -> Option<Post> {
        self.tables.read().await.posts.get(&id).cloned()
    }

    pub async fn post(&self, id: PostId) -> AppResult<Post> {
        self.find_post(id)
            .await
            .ok_or_else(|| AppError::not_found(EntityKind::Post, id))
    }

    pub async fn posts_by(&self, author: AccountId) -> Vec<Post> {
        let tables = self.tables.read().await;
        tables
            .posts
            .values()
            .filter(|post| post.author_id == author)
            .cloned()
            .collect()
    }

    #[tracing::instrument(skip(self, new_post), err(Display))]
    pub async fn add_post(
        &self,
        author: AccountId,
        new_post: NewPost,
        created_at: DateTime<Utc>,
    ) -> AppResult<Post> {
        let mut tables = self.tables.write().await;
        tables.account_mut(author)?;

        let id = tables.next_post_id();
        let post = Post {
            id,
            author_id: author,
            title: new_post.title,
            body: new_post.body,
            liked_by: BTreeSet::new(),
            created_at,
        };
        tables.posts.insert(id, post.clone());

        info!("Account {} published post {}", author, id);
        Ok(post)
    }

    /// Removes a post on behalf of `actor`, who must be its author
    #[tracing::instrument(skip(self), err(Display))]
    pub async fn delete_post(&self, actor: AccountId, id: PostId) -> AppResult<Post> {
        let mut tables = self.tables.write().await;

        let post = tables
            .posts
            .get(&id)
            .ok_or_else(|| AppError::not_found(EntityKind::Post, id))?;
        if post.author_id != actor {
            return Err(AppError::ForbiddenNotAuthor);
        }

        let removed = tables
            .posts
            .remove(&id)
            .ok_or_else(|| AppError::not_found(EntityKind::Post, id))?;

        info!("Account {} deleted post {}", actor, id);
        Ok(removed)
    }

    #[tracing::instrument(skip(self), err(Display))]
    pub async fn toggle_like(&self, actor: AccountId, id: PostId) -> AppResult<Post> {
        let mut tables = self.tables.write().await;

        let post = tables
            .posts
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(EntityKind::Post, id))?;
        let liked = post.toggle_like(actor);

        info!(liked, "Account {} toggled like on post {}", actor, id);
        Ok(post.clone())
    }

    /// Inserts a fully formed post, keeping its id. Used for demo data.
    pub(crate) async fn insert_post(&self, post: Post) {
        self.tables.write().await.posts.insert(post.id, post);
    }

    /// Inserts a fully formed account, keeping its id. Used for demo data.
    pub(crate) async fn insert_account(&self, account: Account) {
        self.tables
            .write()
            .await
            .accounts
            .insert(account.id, account);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with(names: &[&str]) -> (Store, Vec<AccountId>) {
        let store = Store::new();
        let mut ids = vec![];
        for name in names {
            let account = store
                .create(
                    Some(name.to_string()),
                    &format!("{}@x.com", name.to_lowercase()),
                    "digest".to_string(),
                )
                .await
                .unwrap();
            ids.push(account.id);
        }
        (store, ids)
    }

    fn new_post(title: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            body: None,
        }
    }

    #[tokio::test]
    async fn test_create_allocates_increasing_ids() {
        let (store, ids) = store_with(&["A", "B", "C"]).await;
        assert_eq!(ids, vec![AccountId(1), AccountId(2), AccountId(3)]);

        let found = store.find_by_email("b@x.com").await.unwrap();
        assert_eq!(found.id, AccountId(2));
        assert!(store.find_by_email("nobody@x.com").await.is_none());
    }

    #[tokio::test]
    async fn test_create_after_seeded_gap_uses_max_plus_one() {
        let store = Store::new();
        store
            .insert_account(Account::new(
                AccountId(7),
                None,
                "seed@x.com".to_string(),
                "digest".to_string(),
            ))
            .await;

        let account = store
            .create(None, "new@x.com", "digest".to_string())
            .await
            .unwrap();
        assert_eq!(account.id, AccountId(8));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let (store, _) = store_with(&["A"]).await;

        let err = store
            .create(Some("Other".to_string()), "a@x.com", "digest".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DuplicateEmail(email) if email == "a@x.com"));
        assert_eq!(store.accounts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_add_friend_is_symmetric_and_idempotent() {
        let (store, ids) = store_with(&["A", "B"]).await;
        let (a, b) = (ids[0], ids[1]);

        store.add_friend(a, b).await.unwrap();
        let me = store.add_friend(a, b).await.unwrap();

        assert_eq!(me.friend_ids, BTreeSet::from([b]));
        let other = store.account(b).await.unwrap();
        assert_eq!(other.friend_ids, BTreeSet::from([a]));
    }

    #[tokio::test]
    async fn test_add_friend_unknown_account() {
        let (store, ids) = store_with(&["A"]).await;

        let err = store.add_friend(ids[0], AccountId(99)).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::EntityNotFound {
                kind: EntityKind::Account,
                ..
            }
        ));
        assert!(store.account(ids[0]).await.unwrap().friend_ids.is_empty());
    }

    #[tokio::test]
    async fn test_add_self_as_friend_is_noop() {
        let (store, ids) = store_with(&["A"]).await;

        let me = store.add_friend(ids[0], ids[0]).await.unwrap();
        assert!(me.friend_ids.is_empty());
    }

    #[tokio::test]
    async fn test_update_profile_keeps_absent_fields() {
        let (store, ids) = store_with(&["A"]).await;

        let updated = store
            .update_profile(
                ids[0],
                ProfileUpdate {
                    name: None,
                    age: Some(30),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name.as_deref(), Some("A"));
        assert_eq!(updated.age, Some(30));
    }

    #[tokio::test]
    async fn test_delete_post_requires_author() {
        let (store, ids) = store_with(&["A", "B"]).await;
        let (a, b) = (ids[0], ids[1]);
        let post = store
            .add_post(a, new_post("Hello"), Utc::now())
            .await
            .unwrap();

        let err = store.delete_post(b, post.id).await.unwrap_err();
        assert!(matches!(err, AppError::ForbiddenNotAuthor));
        assert!(store.find_post(post.id).await.is_some());

        let removed = store.delete_post(a, post.id).await.unwrap();
        assert_eq!(removed.id, post.id);
        assert!(store.find_post(post.id).await.is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_post() {
        let (store, ids) = store_with(&["A"]).await;

        let err = store.delete_post(ids[0], PostId(5)).await.unwrap_err();
        assert_eq!(err.to_string(), "Post 5 not found");
    }

    #[tokio::test]
    async fn test_post_ids_do_not_reuse_deleted_ids() {
        let (store, ids) = store_with(&["A"]).await;
        let first = store
            .add_post(ids[0], new_post("one"), Utc::now())
            .await
            .unwrap();
        let second = store
            .add_post(ids[0], new_post("two"), Utc::now())
            .await
            .unwrap();
        assert_eq!((first.id, second.id), (PostId(1), PostId(2)));

        store.delete_post(ids[0], second.id).await.unwrap();
        let third = store
            .add_post(ids[0], new_post("three"), Utc::now())
            .await
            .unwrap();
        assert_eq!(third.id, PostId(3));

        store.delete_post(ids[0], first.id).await.unwrap();
        store.delete_post(ids[0], third.id).await.unwrap();
        let fourth = store
            .add_post(ids[0], new_post("four"), Utc::now())
            .await
            .unwrap();
        assert_eq!(fourth.id, PostId(4));
    }

    #[tokio::test]
    async fn test_post_ids_continue_after_inserted_posts() {
        let (store, ids) = store_with(&["A"]).await;
        store
            .insert_post(Post {
                id: PostId(10),
                author_id: ids[0],
                title: "seeded".to_string(),
                body: None,
                liked_by: BTreeSet::new(),
                created_at: Utc::now(),
            })
            .await;

        let post = store
            .add_post(ids[0], new_post("next"), Utc::now())
            .await
            .unwrap();
        assert_eq!(post.id, PostId(11));
    }

    #[tokio::test]
    async fn test_toggle_like_twice_restores_state() {
        let (store, ids) = store_with(&["A", "B"]).await;
        let post = store
            .add_post(ids[0], new_post("Hello"), Utc::now())
            .await
            .unwrap();

        let liked = store.toggle_like(ids[1], post.id).await.unwrap();
        assert!(liked.liked_by.contains(&ids[1]));

        let unliked = store.toggle_like(ids[1], post.id).await.unwrap();
        assert_eq!(unliked.liked_by, post.liked_by);
    }

    #[tokio::test]
    async fn test_posts_by_author() {
        let (store, ids) = store_with(&["A", "B"]).await;
        store
            .add_post(ids[0], new_post("a1"), Utc::now())
            .await
            .unwrap();
        store
            .add_post(ids[1], new_post("b1"), Utc::now())
            .await
            .unwrap();
        store
            .add_post(ids[0], new_post("a2"), Utc::now())
            .await
            .unwrap();

        let titles: Vec<_> = store
            .posts_by(ids[0])
            .await
            .into_iter()
            .map(|post| post.title)
            .collect();
        assert_eq!(titles, vec!["a1", "a2"]);
    }
}
