#![allow(dead_code)]

use std::path::PathBuf;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use sqlx::SqlitePool;
use tower::ServiceExt;
use uuid::Uuid;
use yatube::{
    AppState, Config, app, auth,
    db::{self, Group, Post, User, groups, posts::{self, NewPost, PostFilter}, users::{self, NewUser}},
};

pub const PASSWORD: &str = "war-and-peace";

pub struct TestApp {
    pub router: Router,
    pub db_pool: SqlitePool,
    pub media_root: PathBuf,
    password_hash: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_pool = db::connect("sqlite::memory:").await.unwrap();
        let media_root = std::env::temp_dir().join(format!("yatube-test-{}", Uuid::now_v7().simple()));
        let config = Config {
            database_url: "sqlite::memory:".to_owned(),
            media_root: media_root.clone(),
            ..Config::default()
        };

        Self {
            router: app(AppState::new(db_pool.clone(), config)),
            db_pool,
            media_root,
            password_hash: auth::hash_password(PASSWORD).unwrap(),
        }
    }

    pub async fn user(&self, username: &str) -> User {
        users::create_user(&self.db_pool, &NewUser {
            username,
            password_hash: &self.password_hash,
            ..Default::default()
        })
        .await
        .unwrap()
        .unwrap()
    }

    pub async fn group(&self, title: &str, slug: &str) -> Group {
        groups::create_group(&self.db_pool, title, slug, "Test description")
            .await
            .unwrap()
            .unwrap()
    }

    pub async fn post(&self, author: &User, group: Option<&Group>, text: &str) -> Post {
        let id = posts::create(&self.db_pool, &NewPost {
            text,
            author_id: author.id,
            group_id: group.map(|group| group.id),
            image: None,
        })
        .await
        .unwrap();
        self.stored_post(id).await
    }

    pub async fn stored_post(&self, id: i64) -> Post {
        posts::get(&self.db_pool, id).await.unwrap().unwrap()
    }

    pub async fn post_count(&self) -> i64 {
        posts::count(&self.db_pool, PostFilter::All).await.unwrap()
    }

    pub async fn latest_post(&self) -> Post {
        posts::list(&self.db_pool, PostFilter::All, 1, 0).await.unwrap().remove(0)
    }

    /// How many uploaded files are on disk.
    pub fn media_files(&self) -> usize {
        std::fs::read_dir(self.media_root.join("posts"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    pub async fn request(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut request = Request::get(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.request(request.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)], cookie: Option<&str>) -> Response<Body> {
        let mut request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.request(request.body(Body::from(form(fields))).unwrap()).await
    }

    /// Logs `username` in and returns the session cookie to send along.
    pub async fn login(&self, username: &str) -> String {
        let response = self
            .post_form("/auth/login/", &[("username", username), ("password", PASSWORD)], None)
            .await;
        assert!(response.status().is_redirection(), "login of {username} failed");
        session_cookie(&response)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.media_root);
    }
}

pub fn form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(name, value)| format!("{name}={}", utf8_percent_encode(value, NON_ALPHANUMERIC)))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn session_cookie(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("a session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_owned()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("a redirect")
        .to_str()
        .unwrap()
}

pub async fn body(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// How many post cards a listing page shows.
pub fn post_cards(html: &str) -> usize {
    html.matches(r#"<article class="post""#).count()
}
