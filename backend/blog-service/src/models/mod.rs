/// Data models for blog-service
///
/// Field order of the serialized structs is the wire order clients see.
/// Owner identifiers are kept for authorization and never serialized;
/// clients see the author's username instead.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A thematic community posts can be filed under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    /// Author's username
    pub author: String,
    #[serde(skip)]
    pub author_id: Uuid,
    pub image: Option<String>,
    pub group: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    /// Author's username
    pub author: String,
    #[serde(skip)]
    pub author_id: Uuid,
    /// Parent post, fixed at creation
    pub post: i64,
    pub text: String,
    pub created: DateTime<Utc>,
}

/// Client-writable post fields after validation
///
/// Carries no author: the store takes it from the authenticated identity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostFields {
    pub text: String,
    pub image: Option<String>,
    pub group: Option<i64>,
}

/// Partial post update; `None` leaves the stored value untouched
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostChanges {
    pub text: Option<String>,
    pub image: Option<Option<String>>,
    pub group: Option<Option<i64>>,
}

impl PostChanges {
    /// Changes that overwrite every writable field (PUT semantics).
    pub fn replace_all(fields: PostFields) -> Self {
        Self {
            text: Some(fields.text),
            image: Some(fields.image),
            group: Some(fields.group),
        }
    }

    /// Merge onto the stored post, yielding the full field set to persist.
    pub fn apply_to(self, post: &Post) -> PostFields {
        PostFields {
            text: self.text.unwrap_or_else(|| post.text.clone()),
            image: self.image.unwrap_or_else(|| post.image.clone()),
            group: self.group.unwrap_or(post.group),
        }
    }
}

/// Group definition used by the operator CLI
#[derive(Debug, Clone, PartialEq)]
pub struct NewGroup {
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// Limit/offset window over an ordered listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_post() -> Post {
        Post {
            id: 1,
            text: "original".to_string(),
            pub_date: Utc::now(),
            author: "leo".to_string(),
            author_id: Uuid::new_v4(),
            image: Some("posts/cat.jpg".to_string()),
            group: Some(3),
        }
    }

    #[test]
    fn test_partial_changes_keep_untouched_fields() {
        let changes = PostChanges {
            text: Some("edited".to_string()),
            ..PostChanges::default()
        };

        let fields = changes.apply_to(&stored_post());
        assert_eq!(fields.text, "edited");
        assert_eq!(fields.image.as_deref(), Some("posts/cat.jpg"));
        assert_eq!(fields.group, Some(3));
    }

    #[test]
    fn test_replace_all_clears_absent_fields() {
        let changes = PostChanges::replace_all(PostFields {
            text: "new".to_string(),
            image: None,
            group: None,
        });

        let fields = changes.apply_to(&stored_post());
        assert_eq!(fields.image, None);
        assert_eq!(fields.group, None);
    }

    #[test]
    fn test_post_wire_shape_hides_author_id() {
        let post = stored_post();
        let value = serde_json::to_value(&post).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();

        assert!(value.get("author_id").is_none());
        assert_eq!(value["author"], "leo");
        assert_eq!(keys.len(), 6);
    }
}
