use std::sync::Arc;

use axum::{debug_handler, extract::{Path, State}, response::{IntoResponse, Redirect, Response}};
use sqlx::SqlitePool;
use tracing::info;

use crate::{
    db::{groups, posts, Post, User},
    forms::{FormErrors, PostSubmission},
    media,
    session::LoggedIn,
    urls, AppError, AppResult, AppState, Config,
};

use super::{form::{self, PostFormView}, parse_post_id};

/// The post behind `raw_id`, or where to send a user who may not edit it.
async fn editable_post(db_pool: &SqlitePool, raw_id: &str, user: &User) -> AppResult<Result<Post, Redirect>> {
    let post_id = parse_post_id(raw_id)?;
    let post = posts::get(db_pool, post_id).await?.ok_or(AppError::NotFound)?;

    if post.author_id != user.id {
        return Ok(Err(Redirect::to(&urls::post_detail(post.id))));
    }
    Ok(Ok(post))
}

#[debug_handler(state = AppState)]
pub(crate) async fn post_edit_page(
    Path(post_id): Path<String>,
    State(db_pool): State<SqlitePool>,
    LoggedIn(user): LoggedIn,
) -> AppResult<Response> {
    let post = match editable_post(&db_pool, &post_id, &user).await? {
        Ok(post) => post,
        Err(redirect) => return Ok(redirect.into_response()),
    };
    let groups = groups::list_groups(&db_pool).await?;
    let group = post.group_id.map(|id| id.to_string()).unwrap_or_default();

    Ok(form::render(&user, PostFormView {
        is_edit: true,
        action: urls::post_edit(post.id),
        text: &post.text,
        group: &group,
        groups: &groups,
        image: post.image.as_deref(),
        errors: &FormErrors::default(),
    })
    .into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn post_edit(
    Path(post_id): Path<String>,
    State(db_pool): State<SqlitePool>,
    State(config): State<Arc<Config>>,
    LoggedIn(user): LoggedIn,
    submission: PostSubmission,
) -> AppResult<Response> {
    let post = match editable_post(&db_pool, &post_id, &user).await? {
        Ok(post) => post,
        Err(redirect) => {
            info!("@{} may not edit post #{post_id}", user.username);
            return Ok(redirect.into_response());
        }
    };

    let clean = match submission.clean(&db_pool).await? {
        Ok(clean) => clean,
        Err(errors) => {
            let groups = groups::list_groups(&db_pool).await?;
            return Ok(form::render(&user, PostFormView {
                is_edit: true,
                action: urls::post_edit(post.id),
                text: &submission.fields.text,
                group: &submission.fields.group,
                groups: &groups,
                image: post.image.as_deref(),
                errors: &errors,
            })
            .into_response());
        }
    };

    let image = match &clean.image {
        Some((kind, bytes)) => Some(media::save_post_image(&config.media_root, *kind, bytes).await?),
        None => None,
    };
    if let Err(err) = posts::update(&db_pool, post.id, &clean.text, clean.group_id, image.as_deref()).await {
        if let Some(image) = &image {
            media::discard_post_image(&config.media_root, image).await;
        }
        return Err(err.into());
    }

    info!("@{} edited post #{}", user.username, post.id);
    Ok(Redirect::to(&urls::post_detail(post.id)).into_response())
}
