use super::{comment_repo, group_repo, post_repo, user_repo, EntityStore};
use crate::error::Result;
use crate::models::{Comment, Group, NewGroup, Page, Post, PostFields, User};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Postgres-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
        Ok(user_repo::create_user(&self.pool, username, password_hash).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(user_repo::find_by_username(&self.pool, username).await?)
    }

    async fn create_group(&self, group: &NewGroup) -> Result<Group> {
        Ok(group_repo::create_group(&self.pool, group).await?)
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        Ok(group_repo::list_groups(&self.pool).await?)
    }

    async fn get_group(&self, group_id: i64) -> Result<Option<Group>> {
        Ok(group_repo::get_group_by_id(&self.pool, group_id).await?)
    }

    async fn list_posts(&self, page: Option<Page>) -> Result<Vec<Post>> {
        Ok(post_repo::list_posts(&self.pool, page).await?)
    }

    async fn count_posts(&self) -> Result<i64> {
        Ok(post_repo::count_posts(&self.pool).await?)
    }

    async fn get_post(&self, post_id: i64) -> Result<Option<Post>> {
        Ok(post_repo::get_post_by_id(&self.pool, post_id).await?)
    }

    async fn create_post(&self, author_id: Uuid, fields: &PostFields) -> Result<Post> {
        Ok(post_repo::create_post(&self.pool, author_id, fields).await?)
    }

    async fn update_post(&self, post_id: i64, fields: &PostFields) -> Result<Option<Post>> {
        Ok(post_repo::update_post(&self.pool, post_id, fields).await?)
    }

    async fn delete_post(&self, post_id: i64) -> Result<bool> {
        Ok(post_repo::delete_post(&self.pool, post_id).await?)
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        Ok(comment_repo::get_comments_by_post(&self.pool, post_id).await?)
    }

    async fn get_comment(&self, comment_id: i64) -> Result<Option<Comment>> {
        Ok(comment_repo::get_comment_by_id(&self.pool, comment_id).await?)
    }

    async fn create_comment(&self, post_id: i64, author_id: Uuid, text: &str) -> Result<Comment> {
        Ok(comment_repo::create_comment(&self.pool, post_id, author_id, text).await?)
    }

    async fn update_comment(&self, comment_id: i64, text: &str) -> Result<Option<Comment>> {
        Ok(comment_repo::update_comment(&self.pool, comment_id, text).await?)
    }

    async fn delete_comment(&self, comment_id: i64) -> Result<bool> {
        Ok(comment_repo::delete_comment(&self.pool, comment_id).await?)
    }
}
