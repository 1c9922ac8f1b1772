/// Post service - listing, creation and owner-only mutation
use crate::db::SharedStore;
use crate::error::{AppError, Result};
use crate::middleware::{authorize, Operation, UserId};
use crate::models::{Page, Post, PostChanges, PostFields};

pub struct PostService {
    store: SharedStore,
}

impl PostService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Posts in creation order; the whole table when `page` is `None`
    pub async fn list_posts(&self, page: Option<Page>) -> Result<Vec<Post>> {
        self.store.list_posts(page).await
    }

    pub async fn count_posts(&self) -> Result<i64> {
        self.store.count_posts().await
    }

    pub async fn get_post(&self, post_id: i64) -> Result<Post> {
        self.store
            .get_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("post not found".to_string()))
    }

    /// Create a post authored by `user`
    pub async fn create_post(&self, user: UserId, fields: PostFields) -> Result<Post> {
        self.ensure_group_exists(fields.group).await?;

        let post = self.store.create_post(user.0, &fields).await?;
        tracing::info!(post_id = post.id, user_id = %user.0, "post created");
        Ok(post)
    }

    /// Apply `changes` to a post owned by `user`
    pub async fn update_post(&self, user: UserId, post_id: i64, changes: PostChanges) -> Result<Post> {
        let post = self.get_post(post_id).await?;
        authorize(user, &post, Operation::Write)?;

        let fields = changes.apply_to(&post);
        self.ensure_group_exists(fields.group).await?;

        self.store
            .update_post(post_id, &fields)
            .await?
            .ok_or_else(|| AppError::NotFound("post not found".to_string()))
    }

    /// Delete a post owned by `user` together with its comments
    pub async fn delete_post(&self, user: UserId, post_id: i64) -> Result<()> {
        let post = self.get_post(post_id).await?;
        authorize(user, &post, Operation::Write)?;

        if !self.store.delete_post(post_id).await? {
            return Err(AppError::NotFound("post not found".to_string()));
        }

        tracing::info!(post_id, user_id = %user.0, "post deleted");
        Ok(())
    }

    async fn ensure_group_exists(&self, group: Option<i64>) -> Result<()> {
        let Some(group_id) = group else {
            return Ok(());
        };

        match self.store.get_group(group_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::ValidationError(format!(
                "group: Invalid pk \"{group_id}\" - object does not exist."
            ))),
        }
    }
}
