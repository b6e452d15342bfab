use std::fmt;

use time::OffsetDateTime;

/// Number of characters of a post or comment shown by its `Display` impl.
pub const PREVIEW_CHARS: usize = 15;

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub date_joined: OffsetDateTime,
}

impl User {
    /// First and last name when set, the username otherwise.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        match full.trim() {
            "" => self.username.clone(),
            name => name.to_owned(),
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.username)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Group {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// A post joined with the bits of its author and group every page shows.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub pub_date: OffsetDateTime,
    pub author_id: i64,
    pub author_username: String,
    pub group_id: Option<i64>,
    pub group_slug: Option<String>,
    pub group_title: Option<String>,
    pub image: Option<String>,
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&preview(&self.text))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub text: String,
    pub created: OffsetDateTime,
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&preview(&self.text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(text: &str) -> Post {
        Post {
            id: 1,
            text: text.to_owned(),
            pub_date: OffsetDateTime::UNIX_EPOCH,
            author_id: 1,
            author_username: "auth".to_owned(),
            group_id: None,
            group_slug: None,
            group_title: None,
            image: None,
        }
    }

    #[test]
    fn post_display_is_truncated() {
        assert_eq!(post("Test post").to_string(), "Test post");
        assert_eq!(
            post("Тестовый пост, который длиннее пятнадцати символов").to_string(),
            "Тестовый пост, "
        );
    }

    #[test]
    fn group_display_is_title() {
        let group = Group {
            id: 1,
            title: "Test group".to_owned(),
            slug: "test-slug".to_owned(),
            description: String::new(),
        };
        assert_eq!(group.to_string(), "Test group");
    }

    #[test]
    fn display_name_falls_back_to_username() {
        let mut user = User {
            id: 1,
            username: "leo".to_owned(),
            first_name: String::new(),
            last_name: String::new(),
            date_joined: OffsetDateTime::UNIX_EPOCH,
        };
        assert_eq!(user.display_name(), "leo");
        user.first_name = "Leo".to_owned();
        user.last_name = "Tolstoy".to_owned();
        assert_eq!(user.display_name(), "Leo Tolstoy");
    }
}
