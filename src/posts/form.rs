use axum::response::Html;

use crate::{
    db::{Group, User},
    forms::FormErrors,
    include_res,
    render::{self, html_escape},
    urls,
};

/// What the create/edit form shows.
pub(crate) struct PostFormView<'a> {
    pub is_edit: bool,
    pub action: String,
    pub text: &'a str,
    /// Selected group id as submitted, empty for none.
    pub group: &'a str,
    pub groups: &'a [Group],
    pub image: Option<&'a str>,
    pub errors: &'a FormErrors,
}

fn group_options(groups: &[Group], selected: &str) -> String {
    let mut html = String::from(r#"<option value="">---------</option>"#);
    for group in groups {
        let id = group.id.to_string();
        let mark = if id == selected { " selected" } else { "" };
        html += &format!(r#"<option value="{id}"{mark}>{}</option>"#, html_escape(&group.title));
    }
    html
}

pub(crate) fn render(viewer: &User, view: PostFormView<'_>) -> Html<String> {
    let (heading, submit) = if view.is_edit {
        ("Edit post", "Save")
    } else {
        ("New post", "Add")
    };

    let current_image = match view.image {
        Some(image) => format!(
            r#"<p class="current-image">Currently: <a href="{0}">{0}</a></p>"#,
            html_escape(&urls::media(image))
        ),
        None => String::new(),
    };

    let body = include_res!(str, "/pages/posts/create_post.html")
        .replace("{form_id}", if view.is_edit { "post-edit" } else { "post-create" })
        .replace("{heading}", heading)
        .replace("{submit}", submit)
        .replace("{action}", &html_escape(&view.action))
        .replace("{non_field_errors}", &view.errors.render(crate::forms::NON_FIELD))
        .replace("{text_errors}", &view.errors.render("text"))
        .replace("{group_errors}", &view.errors.render("group"))
        .replace("{image_errors}", &view.errors.render("image"))
        .replace("{current_image}", &current_image)
        .replace("{group_options}", &group_options(view.groups, view.group))
        .replace("{text}", &html_escape(view.text));

    render::page(heading, Some(viewer), &body)
}
