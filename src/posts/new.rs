use std::sync::Arc;

use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Redirect, Response}};
use sqlx::SqlitePool;
use tracing::info;

use crate::{
    db::{groups, posts::{self, NewPost}},
    forms::{FormErrors, PostSubmission},
    media,
    session::LoggedIn,
    urls, AppResult, AppState, Config,
};

use super::form::{self, PostFormView};

#[debug_handler(state = AppState)]
pub(crate) async fn post_create_page(
    State(db_pool): State<SqlitePool>,
    LoggedIn(user): LoggedIn,
) -> AppResult<Html<String>> {
    let groups = groups::list_groups(&db_pool).await?;

    Ok(form::render(&user, PostFormView {
        is_edit: false,
        action: urls::POST_CREATE.to_owned(),
        text: "",
        group: "",
        groups: &groups,
        image: None,
        errors: &FormErrors::default(),
    }))
}

#[debug_handler(state = AppState)]
pub(crate) async fn post_create(
    State(db_pool): State<SqlitePool>,
    State(config): State<Arc<Config>>,
    LoggedIn(user): LoggedIn,
    submission: PostSubmission,
) -> AppResult<Response> {
    let clean = match submission.clean(&db_pool).await? {
        Ok(clean) => clean,
        Err(errors) => {
            let groups = groups::list_groups(&db_pool).await?;
            return Ok(form::render(&user, PostFormView {
                is_edit: false,
                action: urls::POST_CREATE.to_owned(),
                text: &submission.fields.text,
                group: &submission.fields.group,
                groups: &groups,
                image: None,
                errors: &errors,
            })
            .into_response());
        }
    };

    let image = match &clean.image {
        Some((kind, bytes)) => Some(media::save_post_image(&config.media_root, *kind, bytes).await?),
        None => None,
    };

    let created = posts::create(&db_pool, &NewPost {
        text: &clean.text,
        author_id: user.id,
        group_id: clean.group_id,
        image: image.as_deref(),
    })
    .await;
    let post_id = match created {
        Ok(post_id) => post_id,
        Err(err) => {
            if let Some(image) = &image {
                media::discard_post_image(&config.media_root, image).await;
            }
            return Err(err.into());
        }
    };

    info!("@{} published post #{post_id}", user.username);
    Ok(Redirect::to(&urls::profile(&user.username)).into_response())
}
