//! Label vocabulary repository.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use super::models::LabelRecord;
use super::pool::{DbPool, DieselError};
use super::upsert::{ensure_label, ensure_labels};
use crate::models::LabelType;
use crate::schema::labels;

/// Diesel-based label repository.
#[derive(Clone)]
pub struct LabelRepository {
    pool: DbPool,
}

impl LabelRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a label by text, adding it to the vocabulary on first sight.
    pub async fn get_or_create(&self, text: &str) -> Result<LabelType, DieselError> {
        let mut conn = self.pool.get().await?;
        let (record, created) = ensure_label(&mut conn, text).await?;
        if created {
            debug!(label = text, id = record.id, "added label to vocabulary");
        }
        Ok(record.into())
    }

    /// Get the whole vocabulary in insertion order.
    pub async fn get_all(&self) -> Result<Vec<LabelType>, DieselError> {
        let mut conn = self.pool.get().await?;

        labels::table
            .order(labels::id.asc())
            .select(LabelRecord::as_select())
            .load(&mut conn)
            .await
            .map(|records| records.into_iter().map(LabelType::from).collect())
    }

    /// Get or create every entry of `texts` in one transaction.
    ///
    /// Returns how many were newly created.
    pub async fn ensure_all(&self, texts: &[String]) -> Result<usize, DieselError> {
        ensure_labels(&self.pool, texts).await
    }

    /// Count labels in the vocabulary.
    pub async fn count(&self) -> Result<i64, DieselError> {
        let mut conn = self.pool.get().await?;

        use diesel::dsl::count_star;
        labels::table.select(count_star()).first(&mut conn).await
    }
}
