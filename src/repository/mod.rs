//! Repository layer for database persistence.
//!
//! All database access uses Diesel ORM over SQLite via diesel-async's
//! `SyncConnectionWrapper`.

pub mod annotator;
pub mod context;
pub mod image;
pub mod label;
pub mod labeling;
pub mod migrations;
pub mod models;
pub mod pool;
pub mod upsert;
pub mod util;

pub use annotator::AnnotatorRepository;
pub use context::DbContext;
pub use image::ImageRepository;
pub use label::LabelRepository;
pub use labeling::LabelingRepository;
pub use pool::{DbPool, DieselError};

use chrono::{DateTime, Utc};

/// Bundled repository access for all database operations.
///
/// Constructed via [`crate::config::Settings::repositories()`].
#[derive(Clone)]
pub struct Repositories {
    pub annotators: AnnotatorRepository,
    pub images: ImageRepository,
    pub labels: LabelRepository,
    pub labelings: LabelingRepository,
    pool: DbPool,
}

impl Repositories {
    pub fn new(ctx: DbContext) -> Self {
        Self {
            annotators: ctx.annotators(),
            images: ctx.images(),
            labels: ctx.labels(),
            labelings: ctx.labelings(),
            pool: ctx.pool().clone(),
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Parse a datetime string from the database, defaulting to Unix epoch on error.
pub fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}
