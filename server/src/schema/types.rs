use async_graphql::{Context, InputObject, Object, Result, SimpleObject, ID};
use chrono::SecondsFormat;

use crate::store::{Account, Post, ProfileUpdate, Store};
use crate::units::{HeightUnit, WeightUnit};

/// A registered user
pub struct UserNode(pub Account);

#[Object(name = "User")]
impl UserNode {
    /// Identifier
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    /// Login email
    async fn email(&self) -> &str {
        &self.0.email
    }

    /// Name
    async fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    /// Age
    async fn age(&self) -> Option<i32> {
        self.0.age
    }

    /// Height, in centimetres unless another unit is asked for
    async fn height(
        &self,
        #[graphql(default_with = "Some(HeightUnit::Centimetre)")] unit: Option<HeightUnit>,
    ) -> Option<f64> {
        let unit = unit.unwrap_or_default();
        self.0.height_cm.map(|centimetres| unit.convert(centimetres))
    }

    /// Weight, in kilograms unless another unit is asked for
    async fn weight(
        &self,
        #[graphql(default_with = "Some(WeightUnit::Kilogram)")] unit: Option<WeightUnit>,
    ) -> Option<f64> {
        let unit = unit.unwrap_or_default();
        self.0.weight_kg.map(|kilograms| unit.convert(kilograms))
    }

    /// Friends
    async fn friends(&self, ctx: &Context<'_>) -> Result<Vec<UserNode>> {
        let store = ctx.data::<Store>()?;
        let friends = store.accounts_by_ids(&self.0.friend_ids).await;
        Ok(friends.into_iter().map(UserNode).collect())
    }

    /// Posts written by this user
    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<PostNode>> {
        let store = ctx.data::<Store>()?;
        let posts = store.posts_by(self.0.id).await;
        Ok(posts.into_iter().map(PostNode).collect())
    }
}

/// A post
pub struct PostNode(pub Post);

#[Object(name = "Post")]
impl PostNode {
    /// Identifier
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    /// Author
    async fn author(&self, ctx: &Context<'_>) -> Result<Option<UserNode>> {
        let store = ctx.data::<Store>()?;
        Ok(store.find_account(self.0.author_id).await.map(UserNode))
    }

    /// Title
    async fn title(&self) -> &str {
        &self.0.title
    }

    /// Body
    async fn body(&self) -> Option<&str> {
        self.0.body.as_deref()
    }

    /// Users who liked this post
    async fn like_givers(&self, ctx: &Context<'_>) -> Result<Vec<UserNode>> {
        let store = ctx.data::<Store>()?;
        let givers = store.accounts_by_ids(&self.0.liked_by).await;
        Ok(givers.into_iter().map(UserNode).collect())
    }

    /// Creation time (ISO 8601)
    async fn created_at(&self) -> String {
        self.0
            .created_at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// A signed identity token, sent back in the `x-token` header
#[derive(SimpleObject)]
pub struct Token {
    pub token: String,
}

#[derive(InputObject)]
pub struct UpdateMyInfoInput {
    pub name: Option<String>,
    pub age: Option<i32>,
}

impl From<UpdateMyInfoInput> for ProfileUpdate {
    fn from(input: UpdateMyInfoInput) -> Self {
        ProfileUpdate {
            name: input.name,
            age: input.age,
        }
    }
}

#[derive(InputObject)]
pub struct AddPostInput {
    pub title: String,
    pub body: Option<String>,
}
