use axum::{debug_handler, extract::{Path, State}, response::Redirect};
use sqlx::SqlitePool;
use tracing::info;

use crate::{
    db::{follows, users, User},
    session::LoggedIn,
    urls, AppError, AppResult, AppState,
};

async fn author(db_pool: &SqlitePool, username: &str) -> AppResult<User> {
    users::get_by_username(db_pool, username).await?.ok_or(AppError::NotFound)
}

#[debug_handler(state = AppState)]
pub(crate) async fn profile_follow(
    Path(username): Path<String>,
    State(db_pool): State<SqlitePool>,
    LoggedIn(user): LoggedIn,
) -> AppResult<Redirect> {
    let author = author(&db_pool, &username).await?;

    if follows::follow(&db_pool, user.id, author.id).await? {
        info!("@{} follows @{}", user.username, author.username);
    }
    Ok(Redirect::to(&urls::profile(&author.username)))
}

#[debug_handler(state = AppState)]
pub(crate) async fn profile_unfollow(
    Path(username): Path<String>,
    State(db_pool): State<SqlitePool>,
    LoggedIn(user): LoggedIn,
) -> AppResult<Redirect> {
    let author = author(&db_pool, &username).await?;

    if follows::unfollow(&db_pool, user.id, author.id).await? {
        info!("@{} unfollowed @{}", user.username, author.username);
    }
    Ok(Redirect::to(&urls::profile(&author.username)))
}
