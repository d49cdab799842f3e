use async_graphql::{Context, Object, Result, ID};

use super::types::{PostNode, UserNode};
use super::{acting_identity, post_id};
use crate::store::Store;

#[derive(Default)]
pub struct QueryRoot;

#[Object(name = "Query")]
impl QueryRoot {
    /// Hello World
    async fn hello(&self) -> &'static str {
        "world"
    }

    /// The signed-in user
    async fn me(&self, ctx: &Context<'_>) -> Result<Option<UserNode>> {
        let actor = acting_identity(ctx)?;
        let store = ctx.data::<Store>()?;
        Ok(store.find_account(actor).await.map(UserNode))
    }

    /// All users
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<UserNode>> {
        let store = ctx.data::<Store>()?;
        Ok(store.accounts().await.into_iter().map(UserNode).collect())
    }

    /// Look a user up by name
    async fn user(&self, ctx: &Context<'_>, name: String) -> Result<Option<UserNode>> {
        let store = ctx.data::<Store>()?;
        Ok(store.find_by_name(&name).await.map(UserNode))
    }

    /// All posts
    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<PostNode>> {
        let store = ctx.data::<Store>()?;
        Ok(store.posts().await.into_iter().map(PostNode).collect())
    }

    /// Look a post up by id
    async fn post(&self, ctx: &Context<'_>, id: ID) -> Result<Option<PostNode>> {
        let store = ctx.data::<Store>()?;
        let Ok(id) = post_id(&id) else {
            return Ok(None);
        };
        Ok(store.find_post(id).await.map(PostNode))
    }
}
