use axum::{debug_handler, extract::{Path, Query, State}, response::Html};
use sqlx::SqlitePool;

use crate::{
    db::{groups, posts::{self, PostFilter}},
    include_res,
    paginator::PageQuery,
    render::{self, html_escape},
    session::Viewer,
    AppError, AppResult, AppState,
};

#[debug_handler(state = AppState)]
pub(crate) async fn group_posts(
    Path(slug): Path<String>,
    State(db_pool): State<SqlitePool>,
    Viewer(viewer): Viewer,
    Query(PageQuery { page }): Query<PageQuery>,
) -> AppResult<Html<String>> {
    let group = groups::get_by_slug(&db_pool, &slug).await?.ok_or(AppError::NotFound)?;
    let page = posts::page(&db_pool, PostFilter::Group(group.id), page.as_deref()).await?;

    let body = include_res!(str, "/pages/posts/group_list.html")
        .replace("{group_title}", &html_escape(&group.title))
        .replace("{group_description}", &html_escape(&group.description))
        .replace("{posts}", &render::post_list(&page));
    Ok(render::page(&group.title, viewer.as_ref(), &body))
}
