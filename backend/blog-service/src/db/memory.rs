use super::EntityStore;
use crate::error::{AppError, Result};
use crate::models::{Comment, Group, NewGroup, Page, Post, PostFields, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

struct PostRow {
    text: String,
    pub_date: DateTime<Utc>,
    author_id: Uuid,
    image: Option<String>,
    group: Option<i64>,
}

struct CommentRow {
    author_id: Uuid,
    post: i64,
    text: String,
    created: DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<Uuid, User>,
    groups: BTreeMap<i64, Group>,
    posts: BTreeMap<i64, PostRow>,
    comments: BTreeMap<i64, CommentRow>,
    next_group_id: i64,
    next_post_id: i64,
    next_comment_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

fn missing_reference(what: &str, id: impl std::fmt::Display) -> AppError {
    AppError::DatabaseError(format!("foreign key violation: {what} {id} does not exist"))
}

impl Tables {
    fn username(&self, user_id: Uuid) -> Result<String> {
        self.users
            .get(&user_id)
            .map(|u| u.username.clone())
            .ok_or_else(|| missing_reference("user", user_id))
    }

    fn check_group(&self, group: Option<i64>) -> Result<()> {
        match group {
            Some(id) if !self.groups.contains_key(&id) => Err(missing_reference("group", id)),
            _ => Ok(()),
        }
    }

    fn post(&self, id: i64, row: &PostRow) -> Result<Post> {
        Ok(Post {
            id,
            text: row.text.clone(),
            pub_date: row.pub_date,
            author: self.username(row.author_id)?,
            author_id: row.author_id,
            image: row.image.clone(),
            group: row.group,
        })
    }

    fn comment(&self, id: i64, row: &CommentRow) -> Result<Comment> {
        Ok(Comment {
            id,
            author: self.username(row.author_id)?,
            author_id: row.author_id,
            post: row.post,
            text: row.text.clone(),
            created: row.created,
        })
    }
}

/// Store keeping every table in process memory
///
/// Enforces the same uniqueness and reference rules as the Postgres schema,
/// including the post to comment cascade. Used by the test suites.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
        let mut tables = self.lock();
        if tables.users.values().any(|u| u.username == username) {
            return Err(AppError::Conflict(format!(
                "username \"{username}\" already exists"
            )));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_group(&self, group: &NewGroup) -> Result<Group> {
        let mut tables = self.lock();
        if tables.groups.values().any(|g| g.slug == group.slug) {
            return Err(AppError::Conflict(format!(
                "slug \"{}\" already exists",
                group.slug
            )));
        }

        let id = next_id(&mut tables.next_group_id);
        let created = Group {
            id,
            title: group.title.clone(),
            slug: group.slug.clone(),
            description: group.description.clone(),
        };
        tables.groups.insert(id, created.clone());
        Ok(created)
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        Ok(self.lock().groups.values().cloned().collect())
    }

    async fn get_group(&self, group_id: i64) -> Result<Option<Group>> {
        Ok(self.lock().groups.get(&group_id).cloned())
    }

    async fn list_posts(&self, page: Option<Page>) -> Result<Vec<Post>> {
        let tables = self.lock();
        let (skip, take) = match page {
            Some(page) => (page.offset.max(0) as usize, page.limit.max(0) as usize),
            None => (0, usize::MAX),
        };

        tables
            .posts
            .iter()
            .skip(skip)
            .take(take)
            .map(|(id, row)| tables.post(*id, row))
            .collect()
    }

    async fn count_posts(&self) -> Result<i64> {
        Ok(self.lock().posts.len() as i64)
    }

    async fn get_post(&self, post_id: i64) -> Result<Option<Post>> {
        let tables = self.lock();
        tables
            .posts
            .get(&post_id)
            .map(|row| tables.post(post_id, row))
            .transpose()
    }

    async fn create_post(&self, author_id: Uuid, fields: &PostFields) -> Result<Post> {
        let mut tables = self.lock();
        tables.username(author_id)?;
        tables.check_group(fields.group)?;

        let id = next_id(&mut tables.next_post_id);
        let row = PostRow {
            text: fields.text.clone(),
            pub_date: Utc::now(),
            author_id,
            image: fields.image.clone(),
            group: fields.group,
        };
        let post = tables.post(id, &row)?;
        tables.posts.insert(id, row);
        Ok(post)
    }

    async fn update_post(&self, post_id: i64, fields: &PostFields) -> Result<Option<Post>> {
        let mut tables = self.lock();
        tables.check_group(fields.group)?;

        let Some(row) = tables.posts.get_mut(&post_id) else {
            return Ok(None);
        };
        row.text = fields.text.clone();
        row.image = fields.image.clone();
        row.group = fields.group;

        let tables = &*tables;
        tables
            .posts
            .get(&post_id)
            .map(|row| tables.post(post_id, row))
            .transpose()
    }

    async fn delete_post(&self, post_id: i64) -> Result<bool> {
        let mut tables = self.lock();
        if tables.posts.remove(&post_id).is_none() {
            return Ok(false);
        }
        tables.comments.retain(|_, c| c.post != post_id);
        Ok(true)
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        let tables = self.lock();
        tables
            .comments
            .iter()
            .filter(|(_, row)| row.post == post_id)
            .map(|(id, row)| tables.comment(*id, row))
            .collect()
    }

    async fn get_comment(&self, comment_id: i64) -> Result<Option<Comment>> {
        let tables = self.lock();
        tables
            .comments
            .get(&comment_id)
            .map(|row| tables.comment(comment_id, row))
            .transpose()
    }

    async fn create_comment(&self, post_id: i64, author_id: Uuid, text: &str) -> Result<Comment> {
        let mut tables = self.lock();
        tables.username(author_id)?;
        if !tables.posts.contains_key(&post_id) {
            return Err(missing_reference("post", post_id));
        }

        let id = next_id(&mut tables.next_comment_id);
        let row = CommentRow {
            author_id,
            post: post_id,
            text: text.to_string(),
            created: Utc::now(),
        };
        let comment = tables.comment(id, &row)?;
        tables.comments.insert(id, row);
        Ok(comment)
    }

    async fn update_comment(&self, comment_id: i64, text: &str) -> Result<Option<Comment>> {
        let mut tables = self.lock();
        let Some(row) = tables.comments.get_mut(&comment_id) else {
            return Ok(None);
        };
        row.text = text.to_string();

        let tables = &*tables;
        tables
            .comments
            .get(&comment_id)
            .map(|row| tables.comment(comment_id, row))
            .transpose()
    }

    async fn delete_comment(&self, comment_id: i64) -> Result<bool> {
        Ok(self.lock().comments.remove(&comment_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> (InMemoryStore, User) {
        let store = InMemoryStore::new();
        let user = store.create_user("leo", "hash").await.unwrap();
        (store, user)
    }

    fn fields(text: &str) -> PostFields {
        PostFields {
            text: text.to_string(),
            ..PostFields::default()
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let (store, _) = seeded().await;
        let err = store.create_user("leo", "other").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_post_ids_increase_and_list_in_order() {
        let (store, user) = seeded().await;
        let first = store.create_post(user.id, &fields("one")).await.unwrap();
        let second = store.create_post(user.id, &fields("two")).await.unwrap();

        assert!(second.id > first.id);
        let texts: Vec<String> = store
            .list_posts(None)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.text)
            .collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_page_window() {
        let (store, user) = seeded().await;
        for text in ["a", "b", "c"] {
            store.create_post(user.id, &fields(text)).await.unwrap();
        }

        let page = store
            .list_posts(Some(Page { limit: 1, offset: 1 }))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].text, "b");
        assert_eq!(store.count_posts().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_unknown_group_rejected() {
        let (store, user) = seeded().await;
        let mut post = fields("x");
        post.group = Some(42);

        let err = store.create_post(user.id, &post).await.unwrap_err();
        assert!(matches!(err, AppError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn test_delete_post_cascades_to_comments() {
        let (store, user) = seeded().await;
        let post = store.create_post(user.id, &fields("x")).await.unwrap();
        let comment = store.create_comment(post.id, user.id, "hi").await.unwrap();

        assert!(store.delete_post(post.id).await.unwrap());
        assert!(store.get_comment(comment.id).await.unwrap().is_none());
        assert!(!store.delete_post(post.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_comment_on_missing_post_rejected() {
        let (store, user) = seeded().await;
        assert!(store.create_comment(9, user.id, "hi").await.is_err());
    }
}
