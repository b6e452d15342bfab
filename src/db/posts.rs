use sqlx::SqlitePool;
use time::OffsetDateTime;

use super::Post;
use crate::paginator::{Page, Paginator};

const POST_SELECT: &str = "SELECT p.id, p.text, p.pub_date, p.author_id, u.username AS author_username, \
    p.group_id, g.slug AS group_slug, g.title AS group_title, p.image \
    FROM posts p \
    JOIN users u ON u.id = p.author_id \
    LEFT JOIN post_groups g ON g.id = p.group_id";

/// Timestamps are RFC 3339 text with a variable number of fractional digits,
/// so they compare as times, not as strings.
const NEWEST_FIRST: &str = "ORDER BY julianday(p.pub_date) DESC, p.id DESC";

/// Which posts a listing page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Group(i64),
    Author(i64),
    /// Posts by every author the given user follows.
    FollowedBy(i64),
}

impl PostFilter {
    fn clause(&self) -> &'static str {
        match self {
            PostFilter::All => "",
            PostFilter::Group(_) => "WHERE p.group_id = ?",
            PostFilter::Author(_) => "WHERE p.author_id = ?",
            PostFilter::FollowedBy(_) => {
                "WHERE p.author_id IN (SELECT author_id FROM follows WHERE user_id = ?)"
            }
        }
    }

    fn param(&self) -> Option<i64> {
        match *self {
            PostFilter::All => None,
            PostFilter::Group(id) | PostFilter::Author(id) | PostFilter::FollowedBy(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewPost<'a> {
    pub text: &'a str,
    pub author_id: i64,
    pub group_id: Option<i64>,
    pub image: Option<&'a str>,
}

pub async fn count(db_pool: &SqlitePool, filter: PostFilter) -> Result<i64, sqlx::Error> {
    let sql = format!("SELECT COUNT(*) FROM posts p {}", filter.clause());
    let mut query = sqlx::query_as::<_, (i64,)>(&sql);
    if let Some(param) = filter.param() {
        query = query.bind(param);
    }
    let (count,) = query.fetch_one(db_pool).await?;
    Ok(count)
}

pub async fn list(
    db_pool: &SqlitePool,
    filter: PostFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<Post>, sqlx::Error> {
    let sql = format!("{POST_SELECT} {} {NEWEST_FIRST} LIMIT ? OFFSET ?", filter.clause());
    let mut query = sqlx::query_as::<_, Post>(&sql);
    if let Some(param) = filter.param() {
        query = query.bind(param);
    }
    query.bind(limit).bind(offset).fetch_all(db_pool).await
}

/// The requested page of a listing, newest posts first.
pub async fn page(
    db_pool: &SqlitePool,
    filter: PostFilter,
    requested: Option<&str>,
) -> Result<Page<Post>, sqlx::Error> {
    let total = count(db_pool, filter).await?;
    let window = Paginator::default().window(total, requested);
    let items = list(db_pool, filter, window.limit, window.offset).await?;
    Ok(Page::new(items, window, total))
}

pub async fn get(db_pool: &SqlitePool, post_id: i64) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as(&format!("{POST_SELECT} WHERE p.id = ?"))
        .bind(post_id)
        .fetch_optional(db_pool)
        .await
}

pub async fn create(db_pool: &SqlitePool, post: &NewPost<'_>) -> Result<i64, sqlx::Error> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO posts (text,pub_date,author_id,group_id,image) VALUES (?,?,?,?,?) RETURNING id",
    )
    .bind(post.text)
    .bind(OffsetDateTime::now_utc())
    .bind(post.author_id)
    .bind(post.group_id)
    .bind(post.image)
    .fetch_one(db_pool)
    .await?;
    Ok(id)
}

/// Updates text and group. The image is only replaced when a new one is given.
pub async fn update(
    db_pool: &SqlitePool,
    post_id: i64,
    text: &str,
    group_id: Option<i64>,
    image: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE posts SET text=?, group_id=?, image=COALESCE(?, image) WHERE id=?")
        .bind(text)
        .bind(group_id)
        .bind(image)
        .bind(post_id)
        .execute(db_pool)
        .await?;
    Ok(())
}
