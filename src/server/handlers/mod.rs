//! HTTP request handlers for the web server.

mod api;
mod helpers;
mod images;
mod labeling;
mod next;
mod static_files;

// Re-export handlers for use by the router
pub use api::{api_labels, health};
pub use images::serve_image;
pub use labeling::submit_label;
pub use next::{api_next, next_label_page};
pub use static_files::{serve_css, serve_js};
