use async_graphql::{Context, Object, Result, ID};
use chrono::Utc;

use super::types::{AddPostInput, PostNode, Token, UpdateMyInfoInput, UserNode};
use super::{account_id, acting_identity};
use crate::errors::WithCode as _;
use crate::identity::Authenticator;
use crate::store::{NewPost, Store};

#[derive(Default)]
pub struct MutationRoot;

// Every privileged mutation resolves the acting identity before touching the store.
#[Object(name = "Mutation")]
impl MutationRoot {
    /// Update the signed-in user's profile
    async fn update_my_info(
        &self,
        ctx: &Context<'_>,
        input: UpdateMyInfoInput,
    ) -> Result<UserNode> {
        let actor = acting_identity(ctx)?;
        let store = ctx.data::<Store>()?;

        store
            .update_profile(actor, input.into())
            .await
            .map(UserNode)
            .with_code()
    }

    /// Befriend another user; both sides see each other as friends
    async fn add_friend(&self, ctx: &Context<'_>, user_id: ID) -> Result<UserNode> {
        let actor = acting_identity(ctx)?;
        let store = ctx.data::<Store>()?;
        let friend_id = account_id(&user_id).with_code()?;

        store
            .add_friend(actor, friend_id)
            .await
            .map(UserNode)
            .with_code()
    }

    /// Publish a post as the signed-in user
    async fn add_post(&self, ctx: &Context<'_>, input: AddPostInput) -> Result<PostNode> {
        let actor = acting_identity(ctx)?;
        let store = ctx.data::<Store>()?;
        let new_post = NewPost {
            title: input.title,
            body: input.body,
        };

        store
            .add_post(actor, new_post, Utc::now())
            .await
            .map(PostNode)
            .with_code()
    }

    /// Delete one of the signed-in user's posts
    async fn delete_post(&self, ctx: &Context<'_>, post_id: ID) -> Result<PostNode> {
        let actor = acting_identity(ctx)?;
        let store = ctx.data::<Store>()?;
        let id = super::post_id(&post_id).with_code()?;

        store.delete_post(actor, id).await.map(PostNode).with_code()
    }

    /// Like a post, or take the like back
    async fn like_post(&self, ctx: &Context<'_>, post_id: ID) -> Result<PostNode> {
        let actor = acting_identity(ctx)?;
        let store = ctx.data::<Store>()?;
        let id = super::post_id(&post_id).with_code()?;

        store.toggle_like(actor, id).await.map(PostNode).with_code()
    }

    /// Register a new account
    async fn sign_up(
        &self,
        ctx: &Context<'_>,
        name: Option<String>,
        email: String,
        #[graphql(secret)] password: String,
    ) -> Result<UserNode> {
        let auth = ctx.data::<Authenticator>()?;

        auth.sign_up(name, &email, &password)
            .await
            .map(UserNode)
            .with_code()
    }

    /// Exchange credentials for an identity token
    async fn login(
        &self,
        ctx: &Context<'_>,
        email: String,
        #[graphql(secret)] password: String,
    ) -> Result<Token> {
        let auth = ctx.data::<Authenticator>()?;

        auth.login(&email, &password)
            .await
            .map(|token| Token { token })
            .with_code()
    }
}
