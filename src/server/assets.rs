//! Static asset constants (CSS and JavaScript).

/// Stylesheet for the labeling page.
pub const CSS: &str = include_str!("styles.css");

/// Submits the chosen label and loads the next image.
pub const JS: &str = include_str!("label.js");
