/// Resolution of nested comment routes
///
/// A comment URL names its parent post. The post must exist before any
/// comment is looked up, and a comment filed under another post is treated
/// as absent.
use crate::db::SharedStore;
use crate::error::{AppError, Result};
use crate::models::{Comment, Post};

/// Keep `comment` only if it belongs to `post_id`.
pub fn scope_to_post(post_id: i64, comment: Option<Comment>) -> Result<Comment> {
    match comment {
        Some(comment) if comment.post == post_id => Ok(comment),
        _ => Err(AppError::NotFound("comment not found".to_string())),
    }
}

pub struct CommentResolver {
    store: SharedStore,
}

impl CommentResolver {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// The post addressed by the path, or `NotFound`
    pub async fn parent_post(&self, post_id: i64) -> Result<Post> {
        self.store
            .get_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("post not found".to_string()))
    }

    /// Comments of an existing post, oldest first
    pub async fn comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        self.parent_post(post_id).await?;
        self.store.list_comments(post_id).await
    }

    /// A single comment addressed as `/posts/{post_id}/comments/{comment_id}/`
    pub async fn comment(&self, post_id: i64, comment_id: i64) -> Result<Comment> {
        self.parent_post(post_id).await?;
        let comment = self.store.get_comment(comment_id).await?;
        scope_to_post(post_id, comment)
    }
}
