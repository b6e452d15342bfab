use axum::{
    debug_handler,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use sqlx::SqlitePool;
use tower_sessions::Session;
use tracing::info;

use crate::{
    db::{users::{self, NewUser}, User},
    forms::{FormErrors, SignupFields, USERNAME_TAKEN},
    include_res,
    render::{self, html_escape},
    session::{self, Viewer},
    urls, AppResult, AppState,
};

use super::password;

fn render_signup(viewer: Option<&User>, fields: &SignupFields, errors: &FormErrors) -> Html<String> {
    let body = include_res!(str, "/pages/auth/signup.html")
        .replace("{first_name_errors}", &errors.render("first_name"))
        .replace("{last_name_errors}", &errors.render("last_name"))
        .replace("{username_errors}", &errors.render("username"))
        .replace("{password1_errors}", &errors.render("password1"))
        .replace("{password2_errors}", &errors.render("password2"))
        .replace("{login_url}", urls::LOGIN)
        .replace("{first_name}", &html_escape(&fields.first_name))
        .replace("{last_name}", &html_escape(&fields.last_name))
        .replace("{username}", &html_escape(&fields.username));
    render::page("Sign up", viewer, &body)
}

#[debug_handler(state = AppState)]
pub(crate) async fn signup_page(Viewer(viewer): Viewer) -> Html<String> {
    render_signup(viewer.as_ref(), &SignupFields::default(), &FormErrors::default())
}

#[debug_handler(state = AppState)]
pub(crate) async fn signup(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(fields): Form<SignupFields>,
) -> AppResult<Response> {
    let clean = match fields.clean() {
        Ok(clean) => clean,
        Err(errors) => return Ok(render_signup(None, &fields, &errors).into_response()),
    };

    let plain = clean.password1.clone();
    let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&plain)).await??;

    let created = users::create_user(&db_pool, &NewUser {
        username: &clean.username,
        password_hash: &password_hash,
        first_name: &clean.first_name,
        last_name: &clean.last_name,
    })
    .await?;

    let Some(user) = created else {
        let mut errors = FormErrors::default();
        errors.add("username", USERNAME_TAKEN);
        return Ok(render_signup(None, &fields, &errors).into_response());
    };

    session::log_in(&session, user.id).await?;
    info!("@{} signed up", user.username);
    Ok(Redirect::to(urls::INDEX).into_response())
}
