use crate::models::{Page, Post, PostFields};
use sqlx::PgPool;
use uuid::Uuid;

// Every post query projects the same columns, with the author's username
// joined in and `group_id` exposed as `group`.
const POST_COLUMNS: &str = r#"p.id, p.text, p.pub_date, u.username AS author, p.author_id,
       p.image, p.group_id AS "group""#;

/// List posts in creation order, optionally windowed
pub async fn list_posts(pool: &PgPool, page: Option<Page>) -> Result<Vec<Post>, sqlx::Error> {
    let (limit, offset) = match page {
        Some(page) => (Some(page.limit), page.offset),
        None => (None, 0),
    };

    // LIMIT NULL means no limit in Postgres
    let sql = format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM posts p
        JOIN users u ON u.id = p.author_id
        ORDER BY p.id ASC
        LIMIT $1 OFFSET $2
        "#
    );

    sqlx::query_as::<_, Post>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_posts(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
        .fetch_one(pool)
        .await
}

pub async fn get_post_by_id(pool: &PgPool, post_id: i64) -> Result<Option<Post>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM posts p
        JOIN users u ON u.id = p.author_id
        WHERE p.id = $1
        "#
    );

    sqlx::query_as::<_, Post>(&sql)
        .bind(post_id)
        .fetch_optional(pool)
        .await
}

pub async fn create_post(
    pool: &PgPool,
    author_id: Uuid,
    fields: &PostFields,
) -> Result<Post, sqlx::Error> {
    let sql = format!(
        r#"
        WITH p AS (
            INSERT INTO posts (text, author_id, image, group_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
        )
        SELECT {POST_COLUMNS}
        FROM p
        JOIN users u ON u.id = p.author_id
        "#
    );

    sqlx::query_as::<_, Post>(&sql)
        .bind(&fields.text)
        .bind(author_id)
        .bind(&fields.image)
        .bind(fields.group)
        .fetch_one(pool)
        .await
}

/// Overwrite the writable fields; author and pub_date are never touched
pub async fn update_post(
    pool: &PgPool,
    post_id: i64,
    fields: &PostFields,
) -> Result<Option<Post>, sqlx::Error> {
    let sql = format!(
        r#"
        WITH p AS (
            UPDATE posts
            SET text = $2, image = $3, group_id = $4
            WHERE id = $1
            RETURNING *
        )
        SELECT {POST_COLUMNS}
        FROM p
        JOIN users u ON u.id = p.author_id
        "#
    );

    sqlx::query_as::<_, Post>(&sql)
        .bind(post_id)
        .bind(&fields.text)
        .bind(&fields.image)
        .bind(fields.group)
        .fetch_optional(pool)
        .await
}

/// Hard delete; comments go with it through ON DELETE CASCADE
pub async fn delete_post(pool: &PgPool, post_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
