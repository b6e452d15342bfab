use sqlx::SqlitePool;
use time::OffsetDateTime;

use super::{User, unique_violation};

const USER_COLUMNS: &str = "id,username,first_name,last_name,date_joined";

#[derive(Debug, Default, Clone)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

/// Returns `None` when the username is taken.
pub async fn create_user(db_pool: &SqlitePool, user: &NewUser<'_>) -> Result<Option<User>, sqlx::Error> {
    let inserted = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (username,password_hash,first_name,last_name,date_joined) VALUES (?,?,?,?,?) RETURNING {USER_COLUMNS}"
    ))
    .bind(user.username)
    .bind(user.password_hash)
    .bind(user.first_name)
    .bind(user.last_name)
    .bind(OffsetDateTime::now_utc())
    .fetch_one(db_pool)
    .await;

    unique_violation(inserted)
}

pub async fn get_by_id(db_pool: &SqlitePool, user_id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id=?"))
        .bind(user_id)
        .fetch_optional(db_pool)
        .await
}

pub async fn get_by_username(db_pool: &SqlitePool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE username=?"))
        .bind(username)
        .fetch_optional(db_pool)
        .await
}

/// The stored hash for a login attempt, with the user it belongs to.
pub async fn credentials(db_pool: &SqlitePool, username: &str) -> Result<Option<(i64, String)>, sqlx::Error> {
    sqlx::query_as("SELECT id,password_hash FROM users WHERE username=?")
        .bind(username)
        .fetch_optional(db_pool)
        .await
}
