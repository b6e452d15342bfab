//! Input validation for everything users submit.
//!
//! Validation never fails the request: problems are collected per field in
//! [`FormErrors`] and the form is shown again with them.

use std::{collections::BTreeMap, io::Cursor};

use axum::{
    Form,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use image::{ImageFormat, ImageReader};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::debug;
use validator::{Validate, ValidationErrors};

use crate::{AppError, AppResult, db::groups, render};

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";
pub const INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";
pub const USERNAME_TAKEN: &str = "A user with that username already exists.";
pub const BAD_USERNAME: &str =
    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";
pub const PASSWORD_MISMATCH: &str = "The two password fields didn't match.";
pub const BAD_CREDENTIALS: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

/// Key for errors that belong to the form as a whole.
pub const NON_FIELD: &str = "__all__";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_owned()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    pub fn render(&self, field: &str) -> String {
        render::field_errors(self.get(field))
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut form_errors = FormErrors::default();
        for (field, field_errors) in errors.field_errors() {
            let field: &str = field.as_ref();
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({}).", error.code));
                form_errors.add(field, message);
            }
        }
        form_errors
    }
}

/// Image formats accepted for post pictures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Gif,
    Png,
    Jpeg,
    Webp,
}

impl ImageKind {
    fn from_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Gif => Some(ImageKind::Gif),
            ImageFormat::Png => Some(ImageKind::Png),
            ImageFormat::Jpeg => Some(ImageKind::Jpeg),
            ImageFormat::WebP => Some(ImageKind::Webp),
            _ => None,
        }
    }

    /// Guesses the format from the content and decodes the whole picture.
    /// Anything that is not a readable GIF, PNG, JPEG or WEBP gives `None`.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format().ok()?;
        let kind = reader.format().and_then(Self::from_format)?;
        match reader.decode() {
            Ok(_) => Some(kind),
            Err(err) => {
                debug!("rejected {kind:?} upload: {err}");
                None
            }
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Gif => "gif",
            ImageKind::Png => "png",
            ImageKind::Jpeg => "jpg",
            ImageKind::Webp => "webp",
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct PostFields {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub text: String,
    /// Group id as submitted; empty means no group.
    #[serde(default)]
    pub group: String,
}

/// A post form submission, either url-encoded or multipart (with an image).
#[derive(Debug, Default, Clone)]
pub struct PostSubmission {
    pub fields: PostFields,
    /// Raw bytes of the picked file, if any.
    pub image: Option<Bytes>,
}

impl<S> FromRequest<S> for PostSubmission
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(fields) = Form::<PostFields>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
            return Ok(PostSubmission { fields, image: None });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        let mut submission = PostSubmission::default();
        while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
            let name = field.name().unwrap_or_default().to_owned();
            match name.as_str() {
                "text" => submission.fields.text = field.text().await.map_err(bad_multipart)?,
                "group" => submission.fields.group = field.text().await.map_err(bad_multipart)?,
                "image" => {
                    let bytes = field.bytes().await.map_err(bad_multipart)?;
                    // browsers send an empty part when no file was picked
                    if !bytes.is_empty() {
                        submission.image = Some(bytes);
                    }
                }
                _ => {}
            }
        }
        Ok(submission)
    }
}

fn bad_multipart(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(err.body_text())
}

/// A post submission that passed validation.
#[derive(Debug, Clone)]
pub struct CleanPost {
    pub text: String,
    pub group_id: Option<i64>,
    pub image: Option<(ImageKind, Bytes)>,
}

impl PostSubmission {
    /// Validates the submission. The outer error is a database failure, the
    /// inner one is what gets shown to the user.
    pub async fn clean(&self, db_pool: &SqlitePool) -> AppResult<Result<CleanPost, FormErrors>> {
        let fields = PostFields {
            text: self.fields.text.trim().to_owned(),
            group: self.fields.group.trim().to_owned(),
        };

        let mut errors = match fields.validate() {
            Ok(()) => FormErrors::default(),
            Err(validation) => validation.into(),
        };

        let group_id = if fields.group.is_empty() {
            None
        } else {
            let group_id = fields.group.parse::<i64>().ok();
            let known = match group_id {
                Some(id) => groups::exists(db_pool, id).await?,
                None => false,
            };
            if !known {
                errors.add("group", INVALID_CHOICE);
            }
            group_id.filter(|_| known)
        };

        let image = match self.image.clone() {
            None => None,
            Some(bytes) => {
                let decoded = bytes.clone();
                match tokio::task::spawn_blocking(move || ImageKind::detect(&decoded)).await? {
                    Some(kind) => Some((kind, bytes)),
                    None => {
                        errors.add("image", INVALID_IMAGE);
                        None
                    }
                }
            }
        };

        if !errors.is_empty() {
            return Ok(Err(errors));
        }
        Ok(Ok(CleanPost { text: fields.text, group_id, image }))
    }
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct CommentFields {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub text: String,
}

impl CommentFields {
    pub fn clean(&self) -> Result<String, FormErrors> {
        let fields = CommentFields { text: self.text.trim().to_owned() };
        fields.validate()?;
        Ok(fields.text)
    }
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct SignupFields {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 150, message = "Enter a username of at most 150 characters."))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 8, message = "This password is too short. It must contain at least 8 characters."))]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

fn valid_username(username: &str) -> bool {
    username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

impl SignupFields {
    /// Checks everything but username uniqueness, which the insert settles.
    pub fn clean(&self) -> Result<SignupFields, FormErrors> {
        let fields = SignupFields {
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            username: self.username.trim().to_owned(),
            password1: self.password1.clone(),
            password2: self.password2.clone(),
        };

        let mut errors = match fields.validate() {
            Ok(()) => FormErrors::default(),
            Err(validation) => validation.into(),
        };
        if !fields.username.is_empty() && !valid_username(&fields.username) {
            errors.add("username", BAD_USERNAME);
        }
        if fields.password1 != fields.password2 {
            errors.add("password2", PASSWORD_MISMATCH);
        }

        if errors.is_empty() { Ok(fields) } else { Err(errors) }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct LoginFields {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

impl LoginFields {
    pub fn clean(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        if self.username.trim().is_empty() {
            errors.add("username", REQUIRED);
        }
        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    const GIF: &[u8] = b"GIF89a\x01\x00\x01\x00\x80\x00\x00\x00\x00\x00\xff\xff\xff!\xf9\x04\x01\x00\x00\x00\x00,\x00\x00\x00\x00\x01\x00\x01\x00\x00\x02\x02D\x01\x00;";
    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR\x00\x00\x00\x01\x00\x00\x00\x01\x08\x00\x00\x00\x00\x3a\x7e\x9b\x55\x00\x00\x00\x0aIDAT\x78\x9c\x63\xf8\x0f\x00\x01\x01\x01\x00\xb1\x38\xf6\x14\x00\x00\x00\x00IEND\xae\x42\x60\x82";

    fn submission(text: &str, group: &str) -> PostSubmission {
        PostSubmission {
            fields: PostFields { text: text.to_owned(), group: group.to_owned() },
            image: None,
        }
    }

    #[test]
    fn detects_decodable_images() {
        assert_eq!(ImageKind::detect(GIF), Some(ImageKind::Gif));
        assert_eq!(ImageKind::detect(PNG), Some(ImageKind::Png));
        assert_eq!(ImageKind::detect(b"plain text"), None);
        assert_eq!(ImageKind::detect(b""), None);
    }

    #[test]
    fn magic_bytes_alone_are_not_enough() {
        assert_eq!(ImageKind::detect(b"GIF89a garbage, not a decodable image"), None);
        assert_eq!(ImageKind::detect(&PNG[..40]), None);
        assert_eq!(ImageKind::detect(&[0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10]), None);
        assert_eq!(ImageKind::detect(b"RIFF\0\0\0\0WEBPVP8 "), None);
    }

    #[tokio::test]
    async fn post_text_is_required() {
        let db_pool = test_pool().await;

        let errors = submission("   ", "").clean(&db_pool).await.unwrap().unwrap_err();
        assert_eq!(errors.get("text"), [REQUIRED]);
        assert!(!errors.has("group"));
    }

    #[tokio::test]
    async fn post_text_is_trimmed() {
        let db_pool = test_pool().await;

        let clean = submission("  hello  ", "").clean(&db_pool).await.unwrap().unwrap();
        assert_eq!(clean.text, "hello");
        assert_eq!(clean.group_id, None);
        assert!(clean.image.is_none());
    }

    #[tokio::test]
    async fn group_must_exist() {
        let db_pool = test_pool().await;
        let group = groups::create_group(&db_pool, "Test group", "test-slug", "").await.unwrap().unwrap();

        let clean = submission("hello", &group.id.to_string()).clean(&db_pool).await.unwrap().unwrap();
        assert_eq!(clean.group_id, Some(group.id));

        for bad in ["9999", "test-slug", "1.5"] {
            let errors = submission("hello", bad).clean(&db_pool).await.unwrap().unwrap_err();
            assert_eq!(errors.get("group"), [INVALID_CHOICE], "group {bad:?}");
        }
    }

    #[tokio::test]
    async fn image_must_be_an_image() {
        let db_pool = test_pool().await;

        let mut with_image = submission("hello", "");
        with_image.image = Some(Bytes::from_static(GIF));
        let clean = with_image.clean(&db_pool).await.unwrap().unwrap();
        assert_eq!(clean.image.map(|(kind, _)| kind), Some(ImageKind::Gif));

        let mut not_image = submission("hello", "");
        not_image.image = Some(Bytes::from_static(b"hello"));
        let errors = not_image.clean(&db_pool).await.unwrap().unwrap_err();
        assert_eq!(errors.get("image"), [INVALID_IMAGE]);
    }

    #[test]
    fn comment_text_is_required() {
        assert_eq!(CommentFields { text: " nice ".into() }.clean(), Ok("nice".to_owned()));
        let errors = CommentFields { text: "\n".into() }.clean().unwrap_err();
        assert_eq!(errors.get("text"), [REQUIRED]);
    }

    fn signup(username: &str, password1: &str, password2: &str) -> SignupFields {
        SignupFields {
            username: username.to_owned(),
            password1: password1.to_owned(),
            password2: password2.to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn signup_checks() {
        assert!(signup("leo", "war-and-peace", "war-and-peace").clean().is_ok());
        assert!(signup("лев.толстой@+_-", "war-and-peace", "war-and-peace").clean().is_ok());

        let errors = signup("", "short", "other").clean().unwrap_err();
        assert!(errors.has("username"));
        assert!(errors.has("password1"));
        assert_eq!(errors.get("password2"), [PASSWORD_MISMATCH]);

        let errors = signup("leo tolstoy", "war-and-peace", "war-and-peace").clean().unwrap_err();
        assert_eq!(errors.get("username"), [BAD_USERNAME]);
    }

    #[test]
    fn login_fields_required() {
        let errors = LoginFields::default().clean().unwrap_err();
        assert_eq!(errors.get("username"), [REQUIRED]);
        assert_eq!(errors.get("password"), [REQUIRED]);
    }
}
