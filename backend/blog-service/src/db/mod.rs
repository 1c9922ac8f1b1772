/// Database access layer
///
/// `EntityStore` is the seam between the services and persistence:
/// - `pg`: Postgres implementation over the `*_repo` query modules
/// - `memory`: in-process implementation used by tests and local runs
use crate::error::Result;
use crate::models::{Comment, Group, NewGroup, Page, Post, PostFields, User};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub mod comment_repo;
pub mod group_repo;
pub mod memory;
pub mod pg;
pub mod post_repo;
pub mod user_repo;

pub use memory::InMemoryStore;
pub use pg::PgStore;

/// Store handle shared by services and handlers
pub type SharedStore = Arc<dyn EntityStore>;

/// Bundled schema migrations
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Persistence operations for users, groups, posts and comments.
///
/// Listings are ordered by ascending identifier, which is creation order.
/// Lookups return `Ok(None)` for missing rows; deciding whether that is a
/// 404 belongs to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Cheap round trip used by health checks
    async fn ping(&self) -> Result<()>;

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn create_group(&self, group: &NewGroup) -> Result<Group>;
    async fn list_groups(&self) -> Result<Vec<Group>>;
    async fn get_group(&self, group_id: i64) -> Result<Option<Group>>;

    async fn list_posts(&self, page: Option<Page>) -> Result<Vec<Post>>;
    async fn count_posts(&self) -> Result<i64>;
    async fn get_post(&self, post_id: i64) -> Result<Option<Post>>;
    async fn create_post(&self, author_id: Uuid, fields: &PostFields) -> Result<Post>;
    async fn update_post(&self, post_id: i64, fields: &PostFields) -> Result<Option<Post>>;
    /// Deletes the post together with its comments
    async fn delete_post(&self, post_id: i64) -> Result<bool>;

    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>>;
    async fn get_comment(&self, comment_id: i64) -> Result<Option<Comment>>;
    async fn create_comment(&self, post_id: i64, author_id: Uuid, text: &str) -> Result<Comment>;
    async fn update_comment(&self, comment_id: i64, text: &str) -> Result<Option<Comment>>;
    async fn delete_comment(&self, comment_id: i64) -> Result<bool>;
}
