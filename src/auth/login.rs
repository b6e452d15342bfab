use axum::{
    debug_handler,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;
use tracing::{info, warn};

use crate::{
    db::{users, User},
    forms::{FormErrors, LoginFields, BAD_CREDENTIALS, NON_FIELD},
    include_res,
    render::{self, html_escape},
    session::{self, Viewer},
    urls, AppResult, AppState,
};

use super::password;

#[derive(Deserialize)]
pub(crate) struct LoginQuery {
    pub(crate) next: Option<String>,
}

fn render_login(viewer: Option<&User>, fields: &LoginFields, errors: &FormErrors) -> Html<String> {
    let body = include_res!(str, "/pages/auth/login.html")
        .replace("{non_field_errors}", &errors.render(NON_FIELD))
        .replace("{username_errors}", &errors.render("username"))
        .replace("{password_errors}", &errors.render("password"))
        .replace("{signup_url}", urls::SIGNUP)
        .replace("{next}", &html_escape(fields.next.as_deref().unwrap_or_default()))
        .replace("{username}", &html_escape(&fields.username));
    render::page("Log in", viewer, &body)
}

#[debug_handler(state = AppState)]
pub(crate) async fn login_page(
    Viewer(viewer): Viewer,
    Query(LoginQuery { next }): Query<LoginQuery>,
) -> Html<String> {
    render_login(viewer.as_ref(), &LoginFields { next, ..Default::default() }, &FormErrors::default())
}

#[debug_handler(state = AppState)]
pub(crate) async fn login(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(fields): Form<LoginFields>,
) -> AppResult<Response> {
    if let Err(errors) = fields.clean() {
        return Ok(render_login(None, &fields, &errors).into_response());
    }

    let username = fields.username.trim();
    let user_id = match users::credentials(&db_pool, username).await? {
        Some((user_id, hash)) => {
            let attempt = fields.password.clone();
            let valid = tokio::task::spawn_blocking(move || password::verify_password(&attempt, &hash)).await?;
            valid.then_some(user_id)
        }
        None => None,
    };

    let Some(user_id) = user_id else {
        warn!("failed login for {username:?}");
        let mut errors = FormErrors::default();
        errors.add(NON_FIELD, BAD_CREDENTIALS);
        return Ok(render_login(None, &fields, &errors).into_response());
    };

    session::log_in(&session, user_id).await?;
    info!("@{username} logged in");

    let next = fields
        .next
        .as_deref()
        .filter(|next| urls::is_local_path(next))
        .unwrap_or(urls::INDEX);
    Ok(Redirect::to(next).into_response())
}
