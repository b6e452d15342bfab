use axum::{debug_handler, response::Html};
use tower_sessions::Session;

use crate::{include_res, render, AppResult};

#[debug_handler]
pub(crate) async fn logout(session: Session) -> AppResult<Html<String>> {
    session.flush().await?;
    Ok(render::page("Logged out", None, include_res!(str, "/pages/auth/logged_out.html")))
}
