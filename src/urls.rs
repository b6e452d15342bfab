//! Paths of the site's pages, percent-encoded so they are always valid
//! `Location` header values.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

pub const INDEX: &str = "/";
pub const FOLLOW_INDEX: &str = "/follow/";
pub const POST_CREATE: &str = "/create/";
pub const LOGIN: &str = "/auth/login/";
pub const SIGNUP: &str = "/auth/signup/";
pub const LOGOUT: &str = "/auth/logout/";

/// A single path segment: everything but the unreserved characters and the
/// ones usernames may contain.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'@')
    .remove(b'+');

/// Query value that keeps `/` readable, as in `?next=/create/`.
const NEXT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

pub fn group(slug: &str) -> String {
    format!("/group/{}/", utf8_percent_encode(slug, SEGMENT))
}

pub fn profile(username: &str) -> String {
    format!("/profile/{}/", utf8_percent_encode(username, SEGMENT))
}

pub fn profile_follow(username: &str) -> String {
    format!("/profile/{}/follow/", utf8_percent_encode(username, SEGMENT))
}

pub fn profile_unfollow(username: &str) -> String {
    format!("/profile/{}/unfollow/", utf8_percent_encode(username, SEGMENT))
}

pub fn post_detail(post_id: i64) -> String {
    format!("/posts/{post_id}/")
}

pub fn post_edit(post_id: i64) -> String {
    format!("/posts/{post_id}/edit/")
}

pub fn add_comment(post_id: i64) -> String {
    format!("/posts/{post_id}/comment/")
}

pub fn media(name: &str) -> String {
    let encoded: Vec<String> = name
        .split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect();
    format!("/media/{}", encoded.join("/"))
}

/// Login page that sends the user back to `next` afterwards.
pub fn login_with_next(next: &str) -> String {
    format!("{LOGIN}?next={}", utf8_percent_encode(next, NEXT))
}

/// Whether a `next` target is a path on this site. Anything else could send
/// a freshly logged-in user to another host.
pub fn is_local_path(next: &str) -> bool {
    next.starts_with('/')
        && !next.starts_with("//")
        && !next.contains('\\')
        && next.bytes().all(|b| b.is_ascii_graphic())
}
