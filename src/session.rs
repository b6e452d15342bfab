use anyhow::anyhow;
use axum::{
    extract::{FromRef, FromRequestParts, OriginalUri},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{AppError, AppResult, db::{self, User}, urls};

pub const USER_ID: &str = "user_id";

/// Starts an authenticated session for `user_id` under a fresh session id.
pub async fn log_in(session: &Session, user_id: i64) -> AppResult<()> {
    session.cycle_id().await?;
    session.insert(USER_ID, user_id).await?;
    Ok(())
}

/// The user behind the request, if anybody is logged in.
pub struct Viewer(pub Option<User>);

impl<S> FromRequestParts<S> for Viewer
where
    SqlitePool: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::Internal(anyhow!(msg)))?;

        let Some(user_id) = session.get::<i64>(USER_ID).await? else {
            return Ok(Viewer(None));
        };

        let db_pool = SqlitePool::from_ref(state);
        Ok(Viewer(db::users::get_by_id(&db_pool, user_id).await?))
    }
}

/// A logged-in user. Anonymous requests are sent to the login page with the
/// path they asked for as `next`.
pub struct LoggedIn(pub User);

impl<S> FromRequestParts<S> for LoggedIn
where
    SqlitePool: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Viewer(viewer) = Viewer::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        match viewer {
            Some(user) => Ok(LoggedIn(user)),
            None => {
                let uri = parts
                    .extensions
                    .get::<OriginalUri>()
                    .map(|OriginalUri(uri)| uri)
                    .unwrap_or(&parts.uri);
                let next = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or(urls::INDEX);
                Err(Redirect::to(&urls::login_with_next(next)).into_response())
            }
        }
    }
}
