use axum::{debug_handler, response::Html, routing::get, Router};

use crate::{include_res, render, session::Viewer, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/author/", get(author))
        .route("/tech/", get(tech))
}

#[debug_handler(state = AppState)]
async fn author(Viewer(viewer): Viewer) -> Html<String> {
    render::page("About the author", viewer.as_ref(), include_res!(str, "/pages/about/author.html"))
}

#[debug_handler(state = AppState)]
async fn tech(Viewer(viewer): Viewer) -> Html<String> {
    render::page("Technologies", viewer.as_ref(), include_res!(str, "/pages/about/tech.html"))
}
