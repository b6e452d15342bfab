pub mod about;
pub mod appresult;
pub mod auth;
pub mod config;
pub mod db;
pub mod forms;
pub mod media;
pub mod paginator;
pub mod posts;
pub mod profiles;
pub mod render;
pub mod res;
pub mod session;
pub mod urls;

use std::sync::Arc;

use axum::{Router, extract::{DefaultBodyLimit, FromRef}, routing::get};
use sqlx::SqlitePool;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::SameSite};

pub use appresult::{AppError, AppResult};
pub use config::Config;

/// Largest accepted request body; post images travel in the body.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, config: Config) -> Self {
        Self { db_pool, config: Arc::new(config) }
    }
}

/// The whole site, ready to serve.
pub fn app(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(state.config.session_minutes)));

    Router::new()
        .merge(posts::router())
        .merge(profiles::router())
        .nest("/auth", auth::router())
        .nest("/about", about::router())
        .route("/static/style.css", get(res::stylesheet))
        .nest_service("/media", ServeDir::new(&state.config.media_root))
        .fallback(res::sorry)
        .with_state(state)
        .layer(session_layer)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
}
