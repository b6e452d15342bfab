use axum::{debug_handler, extract::{Query, State}, response::Html};
use sqlx::SqlitePool;

use crate::{
    db::posts::{self, PostFilter},
    include_res,
    paginator::PageQuery,
    render,
    session::{LoggedIn, Viewer},
    AppResult, AppState,
};

#[debug_handler(state = AppState)]
pub(crate) async fn index(
    State(db_pool): State<SqlitePool>,
    Viewer(viewer): Viewer,
    Query(PageQuery { page }): Query<PageQuery>,
) -> AppResult<Html<String>> {
    let page = posts::page(&db_pool, PostFilter::All, page.as_deref()).await?;

    let body = include_res!(str, "/pages/posts/index.html")
        .replace("{posts}", &render::post_list(&page));
    Ok(render::page("Latest posts", viewer.as_ref(), &body))
}

/// Posts by the authors the user follows.
#[debug_handler(state = AppState)]
pub(crate) async fn follow_index(
    State(db_pool): State<SqlitePool>,
    LoggedIn(user): LoggedIn,
    Query(PageQuery { page }): Query<PageQuery>,
) -> AppResult<Html<String>> {
    let page = posts::page(&db_pool, PostFilter::FollowedBy(user.id), page.as_deref()).await?;

    let body = include_res!(str, "/pages/posts/follow.html")
        .replace("{posts}", &render::post_list(&page));
    Ok(render::page("Your feed", Some(&user), &body))
}
