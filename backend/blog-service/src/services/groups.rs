/// Group service - groups are read over the API and created by operators
use crate::db::SharedStore;
use crate::error::{AppError, Result};
use crate::models::{Group, NewGroup};

const MAX_TITLE_LENGTH: usize = 200;
const MAX_SLUG_LENGTH: usize = 50;

pub struct GroupService {
    store: SharedStore,
}

impl GroupService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn list_groups(&self) -> Result<Vec<Group>> {
        self.store.list_groups().await
    }

    pub async fn get_group(&self, group_id: i64) -> Result<Group> {
        self.store
            .get_group(group_id)
            .await?
            .ok_or_else(|| AppError::NotFound("group not found".to_string()))
    }

    pub async fn create_group(&self, group: NewGroup) -> Result<Group> {
        validate_new_group(&group)?;

        let created = self.store.create_group(&group).await?;
        tracing::info!(group_id = created.id, slug = %created.slug, "group created");
        Ok(created)
    }
}

/// Slugs are URL-safe: ASCII letters, digits, hyphens and underscores.
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_SLUG_LENGTH
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn validate_new_group(group: &NewGroup) -> Result<()> {
    let title = group.title.trim();
    if title.is_empty() || title.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::ValidationError(format!(
            "title must be between 1 and {MAX_TITLE_LENGTH} characters"
        )));
    }

    if !is_valid_slug(&group.slug) {
        return Err(AppError::ValidationError(format!(
            "slug must be 1-{MAX_SLUG_LENGTH} letters, numbers, underscores or hyphens"
        )));
    }

    Ok(())
}
