//! HTML assembly: page resources from `res/pages` with `{placeholder}`
//! substitution.
//!
//! Anything a user typed goes through [`html_escape`] (or [`markdown`] for
//! post bodies) before substitution. Both also escape braces, so user text
//! can never introduce a placeholder that a later substitution would expand.

use std::borrow::Cow;

use axum::response::Html;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag};
use time::{OffsetDateTime, macros::format_description};

use crate::{db::{Post, User}, include_res, paginator::Page, urls};

pub fn html_escape(s: &str) -> Cow<'_, str> {
    if s.contains(['&', '<', '>', '"', '\'', '{', '}']) {
        let mut escaped = String::with_capacity(s.len() + 8);
        for c in s.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#x27;"),
                '{' => escaped.push_str("&#123;"),
                '}' => escaped.push_str("&#125;"),
                _ => escaped.push(c),
            }
        }
        Cow::Owned(escaped)
    } else {
        Cow::Borrowed(s)
    }
}

fn is_safe_url(url: &str) -> bool {
    let url = url.trim_start().to_ascii_lowercase();
    !["javascript:", "vbscript:", "data:"].iter().any(|scheme| url.starts_with(scheme))
}

/// Renders a post body. Raw HTML in the source is shown as text and script
/// links are neutralised.
pub fn markdown(text: &str) -> String {
    let parser = Parser::new_ext(text, Options::ENABLE_STRIKETHROUGH).map(|event| match event {
        Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
        Event::Start(Tag::Link { link_type, dest_url, title, id }) if !is_safe_url(&dest_url) => {
            Event::Start(Tag::Link { link_type, dest_url: CowStr::Borrowed("#"), title, id })
        }
        Event::Start(Tag::Image { link_type, dest_url, title, id }) if !is_safe_url(&dest_url) => {
            Event::Start(Tag::Image { link_type, dest_url: CowStr::Borrowed("#"), title, id })
        }
        _ => event,
    });

    let mut html_output = String::new();
    pulldown_cmark::html::push_html(&mut html_output, parser);
    html_output.replace('{', "&#123;").replace('}', "&#125;")
}

pub fn format_date(date: OffsetDateTime) -> String {
    let format = format_description!("[day].[month].[year] [hour]:[minute]");
    date.format(&format).unwrap_or_default()
}

/// Wraps page content in the site layout.
pub fn page(title: &str, viewer: Option<&User>, content: &str) -> Html<String> {
    let nav = match viewer {
        Some(user) => include_res!(str, "/pages/nav_user.html")
            .replace("{create_url}", urls::POST_CREATE)
            .replace("{feed_url}", urls::FOLLOW_INDEX)
            .replace("{logout_url}", urls::LOGOUT)
            .replace("{profile_url}", &html_escape(&urls::profile(&user.username)))
            .replace("{username}", &html_escape(&user.username)),
        None => include_res!(str, "/pages/nav_guest.html")
            .replace("{login_url}", urls::LOGIN)
            .replace("{signup_url}", urls::SIGNUP),
    };

    Html(
        include_res!(str, "/pages/base.html")
            .replace("{title}", &html_escape(title))
            .replace("{nav}", &nav)
            .replace("{content}", content),
    )
}

pub fn post_image(post: &Post) -> String {
    match &post.image {
        Some(image) => format!(
            r#"<img class="post-image" src="{}" alt="">"#,
            html_escape(&urls::media(image))
        ),
        None => String::new(),
    }
}

pub fn group_link(post: &Post) -> String {
    match (&post.group_slug, &post.group_title) {
        (Some(slug), Some(title)) => format!(
            r#"<a class="group-link" href="{}">all posts of the group &laquo;{}&raquo;</a>"#,
            html_escape(&urls::group(slug)),
            html_escape(title)
        ),
        _ => String::new(),
    }
}

pub fn post_card(post: &Post) -> String {
    include_res!(str, "/pages/posts/post_item.html")
        .replace("{id}", &post.id.to_string())
        .replace("{author_url}", &html_escape(&urls::profile(&post.author_username)))
        .replace("{author}", &html_escape(&post.author_username))
        .replace("{pub_date}", &format_date(post.pub_date))
        .replace("{detail_url}", &urls::post_detail(post.id))
        .replace("{image}", &post_image(post))
        .replace("{group_link}", &group_link(post))
        .replace("{text}", &markdown(&post.text))
}

/// Links to the neighbouring pages. Relative `?page=` links keep the current path.
pub fn paginator<T>(page: &Page<T>) -> String {
    if !page.has_other_pages() {
        return String::new();
    }

    let mut links = String::from(r#"<nav class="paginator">"#);
    if page.has_previous() {
        links += r#"<a href="?page=1">&laquo; first</a>"#;
        links += &format!(r#"<a href="?page={}">previous</a>"#, page.number - 1);
    }
    links += &format!(
        r#"<span class="current">Page {} of {}</span>"#,
        page.number, page.num_pages
    );
    if page.has_next() {
        links += &format!(r#"<a href="?page={}">next</a>"#, page.number + 1);
        links += &format!(r#"<a href="?page={}">last &raquo;</a>"#, page.num_pages);
    }
    links += "</nav>";
    links
}

pub fn post_list(page: &Page<Post>) -> String {
    if page.is_empty() {
        return r#"<p class="empty">No posts yet.</p>"#.to_owned();
    }

    let mut html = String::new();
    for post in page {
        html += &post_card(post);
    }
    html + &paginator(page)
}

pub fn field_errors(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }

    let mut html = String::from(r#"<ul class="errorlist">"#);
    for error in errors {
        html += &format!("<li>{}</li>", html_escape(error));
    }
    html + "</ul>"
}
