/// Comment service - comments always addressed through their parent post
use crate::db::SharedStore;
use crate::error::{AppError, Result};
use crate::middleware::{authorize, Operation, UserId};
use crate::models::Comment;
use crate::services::resolver::CommentResolver;

pub struct CommentService {
    store: SharedStore,
    resolver: CommentResolver,
}

impl CommentService {
    pub fn new(store: SharedStore) -> Self {
        Self {
            resolver: CommentResolver::new(store.clone()),
            store,
        }
    }

    pub async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        self.resolver.comments(post_id).await
    }

    pub async fn get_comment(&self, post_id: i64, comment_id: i64) -> Result<Comment> {
        self.resolver.comment(post_id, comment_id).await
    }

    /// Create a comment by `user` under the post named in the path
    pub async fn create_comment(&self, user: UserId, post_id: i64, text: &str) -> Result<Comment> {
        self.resolver.parent_post(post_id).await?;

        let comment = self.store.create_comment(post_id, user.0, text).await?;
        tracing::info!(
            post_id,
            comment_id = comment.id,
            user_id = %user.0,
            "comment created"
        );
        Ok(comment)
    }

    /// Update a comment owned by `user`; `None` keeps the current text
    pub async fn update_comment(
        &self,
        user: UserId,
        post_id: i64,
        comment_id: i64,
        text: Option<&str>,
    ) -> Result<Comment> {
        let comment = self.resolver.comment(post_id, comment_id).await?;
        authorize(user, &comment, Operation::Write)?;

        let Some(text) = text else {
            return Ok(comment);
        };

        self.store
            .update_comment(comment_id, text)
            .await?
            .ok_or_else(|| AppError::NotFound("comment not found".to_string()))
    }

    pub async fn delete_comment(&self, user: UserId, post_id: i64, comment_id: i64) -> Result<()> {
        let comment = self.resolver.comment(post_id, comment_id).await?;
        authorize(user, &comment, Operation::Write)?;

        if !self.store.delete_comment(comment_id).await? {
            return Err(AppError::NotFound("comment not found".to_string()));
        }

        tracing::info!(post_id, comment_id, user_id = %user.0, "comment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{EntityStore, InMemoryStore};
    use crate::models::PostFields;
    use std::sync::Arc;

    async fn setup() -> (CommentService, Arc<InMemoryStore>, UserId, i64) {
        let store = Arc::new(InMemoryStore::new());
        let author = store.create_user("leo", "hash").await.unwrap();
        let post = store
            .create_post(
                author.id,
                &PostFields {
                    text: "post".to_string(),
                    ..PostFields::default()
                },
            )
            .await
            .unwrap();

        (CommentService::new(store.clone()), store, UserId(author.id), post.id)
    }

    #[tokio::test]
    async fn test_comment_bound_to_path_post() {
        let (service, _, author, post_id) = setup().await;
        let comment = service.create_comment(author, post_id, "first").await.unwrap();

        assert_eq!(comment.post, post_id);
        assert_eq!(comment.author, "leo");
    }

    #[tokio::test]
    async fn test_stranger_cannot_edit_or_delete() {
        let (service, store, author, post_id) = setup().await;
        let stranger = UserId(store.create_user("fyodor", "hash").await.unwrap().id);
        let comment = service.create_comment(author, post_id, "mine").await.unwrap();

        let update = service
            .update_comment(stranger, post_id, comment.id, Some("hijacked"))
            .await;
        let delete = service.delete_comment(stranger, post_id, comment.id).await;

        assert!(matches!(update, Err(AppError::Forbidden(_))));
        assert!(matches!(delete, Err(AppError::Forbidden(_))));
        assert_eq!(
            service.get_comment(post_id, comment.id).await.unwrap().text,
            "mine"
        );
    }

    #[tokio::test]
    async fn test_owner_update_without_text_is_noop() {
        let (service, _, author, post_id) = setup().await;
        let comment = service.create_comment(author, post_id, "keep").await.unwrap();

        let updated = service
            .update_comment(author, post_id, comment.id, None)
            .await
            .unwrap();
        assert_eq!(updated.text, "keep");
    }
}
