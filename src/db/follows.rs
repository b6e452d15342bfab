use sqlx::SqlitePool;

/// Subscribes `user_id` to `author_id`. Returns whether a new relation was
/// stored: following twice, or following yourself, stores nothing.
pub async fn follow(db_pool: &SqlitePool, user_id: i64, author_id: i64) -> Result<bool, sqlx::Error> {
    if user_id == author_id {
        return Ok(false);
    }

    let result = sqlx::query("INSERT OR IGNORE INTO follows (user_id,author_id) VALUES (?,?)")
        .bind(user_id)
        .bind(author_id)
        .execute(db_pool)
        .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn unfollow(db_pool: &SqlitePool, user_id: i64, author_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM follows WHERE user_id=? AND author_id=?")
        .bind(user_id)
        .bind(author_id)
        .execute(db_pool)
        .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn is_following(db_pool: &SqlitePool, user_id: i64, author_id: i64) -> Result<bool, sqlx::Error> {
    let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM follows WHERE user_id=? AND author_id=?")
        .bind(user_id)
        .bind(author_id)
        .fetch_optional(db_pool)
        .await?;
    Ok(found.is_some())
}
