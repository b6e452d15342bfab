use axum::{debug_handler, extract::{Path, State}, response::Html};
use sqlx::SqlitePool;

use crate::{
    db::{comments, posts::{self, PostFilter}, Comment, Post, User},
    include_res,
    render::{self, html_escape},
    session::Viewer,
    urls, AppError, AppResult, AppState,
};

use super::parse_post_id;

#[debug_handler(state = AppState)]
pub(crate) async fn post_detail(
    Path(post_id): Path<String>,
    State(db_pool): State<SqlitePool>,
    Viewer(viewer): Viewer,
) -> AppResult<Html<String>> {
    let post_id = parse_post_id(&post_id)?;
    let post = posts::get(&db_pool, post_id).await?.ok_or(AppError::NotFound)?;
    let author_posts = posts::count(&db_pool, PostFilter::Author(post.author_id)).await?;
    let comments = comments::for_post(&db_pool, post.id).await?;

    let group_item = match (&post.group_slug, &post.group_title) {
        (Some(slug), Some(title)) => format!(
            r#"<li>Group: <a class="group-link" href="{}">{}</a></li>"#,
            html_escape(&urls::group(slug)),
            html_escape(title)
        ),
        _ => String::new(),
    };

    let edit_link = match &viewer {
        Some(user) if user.id == post.author_id => format!(
            r#"<a class="edit-link" href="{}">edit post</a>"#,
            urls::post_edit(post.id)
        ),
        _ => String::new(),
    };

    let body = include_res!(str, "/pages/posts/post_detail.html")
        .replace("{id}", &post.id.to_string())
        .replace("{pub_date}", &render::format_date(post.pub_date))
        .replace("{group_item}", &group_item)
        .replace("{author_url}", &html_escape(&urls::profile(&post.author_username)))
        .replace("{author}", &html_escape(&post.author_username))
        .replace("{author_posts}", &author_posts.to_string())
        .replace("{image}", &render::post_image(&post))
        .replace("{edit_link}", &edit_link)
        .replace("{comment_form}", &comment_form(viewer.as_ref(), &post))
        .replace("{comments}", &render_comments(&comments))
        .replace("{text}", &render::markdown(&post.text));

    Ok(render::page(&post.to_string(), viewer.as_ref(), &body))
}

fn comment_form(viewer: Option<&User>, post: &Post) -> String {
    match viewer {
        Some(_) => include_res!(str, "/pages/posts/comment_form.html")
            .replace("{action}", &urls::add_comment(post.id)),
        None => format!(
            r#"<p class="comment-login"><a href="{}">Log in</a> to leave a comment.</p>"#,
            html_escape(&urls::login_with_next(&urls::post_detail(post.id)))
        ),
    }
}

fn render_comments(comments: &[Comment]) -> String {
    let mut html = String::new();
    for comment in comments {
        html += &include_res!(str, "/pages/posts/comment_item.html")
            .replace("{id}", &comment.id.to_string())
            .replace("{author_url}", &html_escape(&urls::profile(&comment.author_username)))
            .replace("{author}", &html_escape(&comment.author_username))
            .replace("{created}", &render::format_date(comment.created))
            .replace("{text}", &html_escape(&comment.text));
    }
    html
}
