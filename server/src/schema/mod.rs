//! GraphQL schema
//!
//! Resolvers find the [`Store`] and [`Authenticator`] in schema data and the
//! request's [`Session`] in request data.

use async_graphql::{extensions::Tracing, Context, EmptySubscription, Schema, ID};

use crate::errors::{AppError, AppResult, EntityKind, WithCode as _};
use crate::identity::{Authenticator, Session};
use crate::store::{AccountId, PostId, Store};

mod mutation;
mod query;
pub mod types;

pub use mutation::MutationRoot;
pub use query::QueryRoot;

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(store: Store, auth: Authenticator) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(store)
        .data(auth)
        .extension(Tracing)
        .finish()
}

/// The session attached to this request; anonymous when none was attached
pub(crate) fn session(ctx: &Context<'_>) -> Session {
    ctx.data_opt::<Session>().copied().unwrap_or_default()
}

/// The acting account for a privileged operation
pub(crate) fn acting_identity(ctx: &Context<'_>) -> async_graphql::Result<AccountId> {
    session(ctx).require_identity().with_code()
}

fn parse_id(id: &ID) -> Option<u64> {
    id.parse::<u64>().ok().filter(|id| *id > 0)
}

pub(crate) fn account_id(id: &ID) -> AppResult<AccountId> {
    parse_id(id)
        .map(AccountId)
        .ok_or_else(|| AppError::not_found(EntityKind::Account, id.as_str()))
}

pub(crate) fn post_id(id: &ID) -> AppResult<PostId> {
    parse_id(id)
        .map(PostId)
        .ok_or_else(|| AppError::not_found(EntityKind::Post, id.as_str()))
}
