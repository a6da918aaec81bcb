//! Labeling history repository.
//!
//! Labelings are append-only: this repository inserts and reads, it never
//! updates or deletes.

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use super::models::{LabelingRecord, NewLabeling};
use super::parse_datetime;
use super::pool::{DbPool, DieselError};
use super::upsert::{ensure_annotator, ensure_image, ensure_label};
use crate::models::{Labeling, LabelingEntry, LabelingRef};
use crate::schema::{annotators, images, labelings, labels};

/// Diesel-based labeling repository.
#[derive(Clone)]
pub struct LabelingRepository {
    pool: DbPool,
}

impl LabelingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Record that `annotator` gave `label` to `filename`.
    ///
    /// Annotator, image and label are created if unseen. Everything runs in
    /// one transaction, so a failed insert leaves no half-created rows.
    pub async fn record(
        &self,
        annotator: &str,
        filename: &str,
        label: &str,
    ) -> Result<Labeling, DieselError> {
        let mut conn = self.pool.get().await?;

        let record = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let (annotator_record, _) = ensure_annotator(conn, annotator).await?;
                    let (image_record, _) = ensure_image(conn, filename).await?;
                    let (label_record, _) = ensure_label(conn, label).await?;

                    let created_at = Utc::now().to_rfc3339();
                    diesel::insert_into(labelings::table)
                        .values(NewLabeling {
                            annotator_id: annotator_record.id,
                            image_id: image_record.id,
                            label_id: label_record.id,
                            created_at: &created_at,
                        })
                        .execute(conn)
                        .await?;

                    // The write lock is held until commit, so the newest
                    // matching row is the one just inserted.
                    labelings::table
                        .filter(labelings::annotator_id.eq(annotator_record.id))
                        .filter(labelings::image_id.eq(image_record.id))
                        .filter(labelings::label_id.eq(label_record.id))
                        .order(labelings::id.desc())
                        .select(LabelingRecord::as_select())
                        .first(conn)
                        .await
                }
                .scope_boxed()
            })
            .await?;

        debug!(
            annotator,
            filename,
            label,
            id = record.id,
            "recorded labeling"
        );
        Ok(record.into())
    }

    /// Get the (annotator, image) pairs of every labeling, oldest first.
    pub async fn history(&self) -> Result<Vec<LabelingRef>, DieselError> {
        let mut conn = self.pool.get().await?;

        let rows: Vec<(i32, i32)> = labelings::table
            .order(labelings::id.asc())
            .select((labelings::annotator_id, labelings::image_id))
            .load(&mut conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(annotator_id, image_id)| LabelingRef {
                annotator_id,
                image_id,
            })
            .collect())
    }

    /// Get every labeling made by one annotator, oldest first.
    pub async fn get_by_annotator(&self, annotator_id: i32) -> Result<Vec<Labeling>, DieselError> {
        let mut conn = self.pool.get().await?;

        labelings::table
            .filter(labelings::annotator_id.eq(annotator_id))
            .order(labelings::id.asc())
            .select(LabelingRecord::as_select())
            .load(&mut conn)
            .await
            .map(|records| records.into_iter().map(Labeling::from).collect())
    }

    /// Count how many times an annotator has labeled an image.
    pub async fn count_for(&self, annotator_id: i32, image_id: i32) -> Result<i64, DieselError> {
        let mut conn = self.pool.get().await?;

        use diesel::dsl::count_star;
        labelings::table
            .filter(labelings::annotator_id.eq(annotator_id))
            .filter(labelings::image_id.eq(image_id))
            .select(count_star())
            .first(&mut conn)
            .await
    }

    /// Count all labelings.
    pub async fn count(&self) -> Result<i64, DieselError> {
        let mut conn = self.pool.get().await?;

        use diesel::dsl::count_star;
        labelings::table.select(count_star()).first(&mut conn).await
    }

    /// Get every labeling resolved to annotator name, filename and label text.
    pub async fn entries(&self) -> Result<Vec<LabelingEntry>, DieselError> {
        let mut conn = self.pool.get().await?;

        let rows: Vec<(i32, String, String, String, String)> = labelings::table
            .inner_join(annotators::table)
            .inner_join(images::table)
            .inner_join(labels::table)
            .order(labelings::id.asc())
            .select((
                labelings::id,
                annotators::name,
                images::filename,
                labels::text,
                labelings::created_at,
            ))
            .load(&mut conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, annotator, filename, label, created_at)| LabelingEntry {
                    id,
                    annotator,
                    filename,
                    label,
                    created_at: parse_datetime(&created_at),
                },
            )
            .collect())
    }
}
