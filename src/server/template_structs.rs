//! Askama template structs for the web interface.
//!
//! Each struct corresponds to an HTML template in the templates/ directory.

use askama::Template;

/// Labeling page: one image plus a button per label.
#[derive(Template)]
#[template(path = "next_label.html")]
pub struct NextLabelTemplate<'a> {
    pub username: &'a str,
    pub filename: &'a str,
    pub image_url: &'a str,
    pub labels: &'a [String],
}

/// Shown once an annotator has labeled every image.
#[derive(Template)]
#[template(path = "complete.html")]
pub struct CompleteTemplate<'a> {
    pub username: &'a str,
}

/// Error page template.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub title: &'a str,
    pub message: &'a str,
}
