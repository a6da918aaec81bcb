//! Image catalog repository.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use super::models::ImageRecord;
use super::pool::{DbPool, DieselError};
use super::upsert::{ensure_image, ensure_images};
use crate::models::Image;
use crate::schema::images;

/// Diesel-based image repository.
#[derive(Clone)]
pub struct ImageRepository {
    pool: DbPool,
}

impl ImageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get an image by filename, adding it to the catalog on first sight.
    pub async fn get_or_create(&self, filename: &str) -> Result<Image, DieselError> {
        let mut conn = self.pool.get().await?;
        let (record, created) = ensure_image(&mut conn, filename).await?;
        if created {
            debug!(filename, id = record.id, "added image to catalog");
        }
        Ok(record.into())
    }

    /// Get an image by filename.
    pub async fn get_by_filename(&self, filename: &str) -> Result<Option<Image>, DieselError> {
        let mut conn = self.pool.get().await?;

        images::table
            .filter(images::filename.eq(filename))
            .select(ImageRecord::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|opt| opt.map(Image::from))
    }

    /// Get the whole catalog in insertion order.
    pub async fn get_all(&self) -> Result<Vec<Image>, DieselError> {
        let mut conn = self.pool.get().await?;

        images::table
            .order(images::id.asc())
            .select(ImageRecord::as_select())
            .load(&mut conn)
            .await
            .map(|records| records.into_iter().map(Image::from).collect())
    }

    /// Get or create every entry of `filenames` in one transaction.
    ///
    /// Returns how many were newly created.
    pub async fn ensure_all(&self, filenames: &[String]) -> Result<usize, DieselError> {
        ensure_images(&self.pool, filenames).await
    }

    /// Count images in the catalog.
    pub async fn count(&self) -> Result<i64, DieselError> {
        let mut conn = self.pool.get().await?;

        use diesel::dsl::count_star;
        images::table.select(count_star()).first(&mut conn).await
    }
}
