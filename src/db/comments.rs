use sqlx::SqlitePool;
use time::OffsetDateTime;

use super::Comment;

pub async fn create(db_pool: &SqlitePool, post_id: i64, author_id: i64, text: &str) -> Result<i64, sqlx::Error> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO comments (post_id,author_id,text,created) VALUES (?,?,?,?) RETURNING id",
    )
    .bind(post_id)
    .bind(author_id)
    .bind(text)
    .bind(OffsetDateTime::now_utc())
    .fetch_one(db_pool)
    .await?;
    Ok(id)
}

/// Comments on a post, oldest first.
pub async fn for_post(db_pool: &SqlitePool, post_id: i64) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as(
        "SELECT c.id, c.post_id, c.author_id, u.username AS author_username, c.text, c.created \
         FROM comments c JOIN users u ON u.id = c.author_id \
         WHERE c.post_id = ? ORDER BY julianday(c.created), c.id",
    )
    .bind(post_id)
    .fetch_all(db_pool)
    .await
}
