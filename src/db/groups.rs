use sqlx::SqlitePool;

use super::{Group, unique_violation};

/// Returns `None` when the slug is taken.
pub async fn create_group(
    db_pool: &SqlitePool,
    title: &str,
    slug: &str,
    description: &str,
) -> Result<Option<Group>, sqlx::Error> {
    let inserted = sqlx::query_as::<_, Group>(
        "INSERT INTO post_groups (title,slug,description) VALUES (?,?,?) RETURNING id,title,slug,description",
    )
    .bind(title)
    .bind(slug)
    .bind(description)
    .fetch_one(db_pool)
    .await;

    unique_violation(inserted)
}

pub async fn get_by_slug(db_pool: &SqlitePool, slug: &str) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query_as("SELECT id,title,slug,description FROM post_groups WHERE slug=?")
        .bind(slug)
        .fetch_optional(db_pool)
        .await
}

pub async fn exists(db_pool: &SqlitePool, group_id: i64) -> Result<bool, sqlx::Error> {
    let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM post_groups WHERE id=?")
        .bind(group_id)
        .fetch_optional(db_pool)
        .await?;
    Ok(found.is_some())
}

/// Every group, for the post form's choice list.
pub async fn list_groups(db_pool: &SqlitePool) -> Result<Vec<Group>, sqlx::Error> {
    sqlx::query_as("SELECT id,title,slug,description FROM post_groups ORDER BY title, id")
        .fetch_all(db_pool)
        .await
}
