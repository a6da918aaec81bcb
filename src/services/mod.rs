//! Service layer for labeling business logic.
//!
//! Services sit between the repositories and the two front ends (CLI and
//! web server), so both share the same validation and selection rules.

pub mod catalog;
pub mod labeling;

use std::path::PathBuf;

use thiserror::Error;

use crate::repository::DieselError;

pub use catalog::{scan_images, CatalogService, SyncReport};
pub use labeling::{AnnotatorProgress, LabelingService};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] DieselError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image directory not found: {}", .0.display())]
    MissingImageDir(PathBuf),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
