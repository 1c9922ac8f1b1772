use crate::models::Comment;
use sqlx::PgPool;
use uuid::Uuid;

const COMMENT_COLUMNS: &str =
    "c.id, u.username AS author, c.author_id, c.post_id AS post, c.text, c.created";

/// All comments of a post, oldest first
pub async fn get_comments_by_post(
    pool: &PgPool,
    post_id: i64,
) -> Result<Vec<Comment>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {COMMENT_COLUMNS}
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.post_id = $1
        ORDER BY c.id ASC
        "#
    );

    sqlx::query_as::<_, Comment>(&sql)
        .bind(post_id)
        .fetch_all(pool)
        .await
}

pub async fn get_comment_by_id(
    pool: &PgPool,
    comment_id: i64,
) -> Result<Option<Comment>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {COMMENT_COLUMNS}
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.id = $1
        "#
    );

    sqlx::query_as::<_, Comment>(&sql)
        .bind(comment_id)
        .fetch_optional(pool)
        .await
}

pub async fn create_comment(
    pool: &PgPool,
    post_id: i64,
    author_id: Uuid,
    text: &str,
) -> Result<Comment, sqlx::Error> {
    let sql = format!(
        r#"
        WITH c AS (
            INSERT INTO comments (post_id, author_id, text)
            VALUES ($1, $2, $3)
            RETURNING *
        )
        SELECT {COMMENT_COLUMNS}
        FROM c
        JOIN users u ON u.id = c.author_id
        "#
    );

    sqlx::query_as::<_, Comment>(&sql)
        .bind(post_id)
        .bind(author_id)
        .bind(text)
        .fetch_one(pool)
        .await
}

/// Update comment text; the parent post column is not writable here
pub async fn update_comment(
    pool: &PgPool,
    comment_id: i64,
    text: &str,
) -> Result<Option<Comment>, sqlx::Error> {
    let sql = format!(
        r#"
        WITH c AS (
            UPDATE comments
            SET text = $2
            WHERE id = $1
            RETURNING *
        )
        SELECT {COMMENT_COLUMNS}
        FROM c
        JOIN users u ON u.id = c.author_id
        "#
    );

    sqlx::query_as::<_, Comment>(&sql)
        .bind(comment_id)
        .bind(text)
        .fetch_optional(pool)
        .await
}

pub async fn delete_comment(pool: &PgPool, comment_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
