use axum::{debug_handler, extract::{Path, State}, response::Redirect, Form};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::{
    db::{comments, posts},
    forms::CommentFields,
    session::LoggedIn,
    urls, AppError, AppResult, AppState,
};

use super::parse_post_id;

/// Stores a comment and goes back to the post. An empty comment is dropped
/// without complaint.
#[debug_handler(state = AppState)]
pub(crate) async fn add_comment(
    Path(post_id): Path<String>,
    State(db_pool): State<SqlitePool>,
    LoggedIn(user): LoggedIn,
    Form(fields): Form<CommentFields>,
) -> AppResult<Redirect> {
    let post_id = parse_post_id(&post_id)?;
    let post = posts::get(&db_pool, post_id).await?.ok_or(AppError::NotFound)?;

    match fields.clean() {
        Ok(text) => {
            let comment_id = comments::create(&db_pool, post.id, user.id, &text).await?;
            info!("@{} commented on post #{} (comment #{comment_id})", user.username, post.id);
        }
        Err(errors) => debug!("dropped comment on post #{}: {errors:?}", post.id),
    }

    Ok(Redirect::to(&urls::post_detail(post.id)))
}
