use axum::{debug_handler, extract::{Path, Query, State}, response::Html};
use sqlx::SqlitePool;

use crate::{
    db::{follows, posts::{self, PostFilter}, users},
    include_res,
    paginator::PageQuery,
    render::{self, html_escape},
    session::Viewer,
    urls, AppError, AppResult, AppState,
};

#[debug_handler(state = AppState)]
pub(crate) async fn profile(
    Path(username): Path<String>,
    State(db_pool): State<SqlitePool>,
    Viewer(viewer): Viewer,
    Query(PageQuery { page }): Query<PageQuery>,
) -> AppResult<Html<String>> {
    let author = users::get_by_username(&db_pool, &username).await?.ok_or(AppError::NotFound)?;
    let page = posts::page(&db_pool, PostFilter::Author(author.id), page.as_deref()).await?;

    // nobody follows themselves, and anonymous visitors follow nobody
    let follow_button = match &viewer {
        Some(user) if user.id != author.id => {
            if follows::is_following(&db_pool, user.id, author.id).await? {
                format!(
                    r#"<a class="button unfollow" href="{}">Unfollow</a>"#,
                    html_escape(&urls::profile_unfollow(&author.username))
                )
            } else {
                format!(
                    r#"<a class="button follow" href="{}">Follow</a>"#,
                    html_escape(&urls::profile_follow(&author.username))
                )
            }
        }
        _ => String::new(),
    };

    let body = include_res!(str, "/pages/posts/profile.html")
        .replace("{post_count}", &page.count.to_string())
        .replace("{follow_button}", &follow_button)
        .replace("{username}", &html_escape(&author.username))
        .replace("{author_name}", &html_escape(&author.display_name()))
        .replace("{posts}", &render::post_list(&page));

    Ok(render::page(&format!("Profile of {}", author.display_name()), viewer.as_ref(), &body))
}
