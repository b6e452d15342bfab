mod comment;
mod detail;
mod edit;
mod form;
mod group;
mod index;
mod new;

use axum::{routing::{get, post}, Router};

use crate::{AppError, AppResult, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index::index))
        .route("/follow/", get(index::follow_index))
        .route("/group/{slug}/", get(group::group_posts))
        .route("/create/", get(new::post_create_page).post(new::post_create))
        .route("/posts/{post_id}/", get(detail::post_detail).post(comment::add_comment))
        .route("/posts/{post_id}/comment/", post(comment::add_comment))
        .route("/posts/{post_id}/edit/", get(edit::post_edit_page).post(edit::post_edit))
}

/// Post ids come in as raw path segments so that `/posts/abc/` is a 404
/// rather than a 400.
pub(crate) fn parse_post_id(raw: &str) -> AppResult<i64> {
    raw.parse().map_err(|_| AppError::NotFound)
}
