//! Annotator repository.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use super::models::AnnotatorRecord;
use super::pool::{DbPool, DieselError};
use super::upsert::ensure_annotator;
use crate::models::Annotator;
use crate::schema::annotators;

/// Diesel-based annotator repository.
#[derive(Clone)]
pub struct AnnotatorRepository {
    pool: DbPool,
}

impl AnnotatorRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get an annotator by name, creating it on first sight.
    pub async fn get_or_create(&self, name: &str) -> Result<Annotator, DieselError> {
        let mut conn = self.pool.get().await?;
        let (record, created) = ensure_annotator(&mut conn, name).await?;
        if created {
            debug!(annotator = name, id = record.id, "created annotator");
        }
        Ok(record.into())
    }

    /// Get an annotator by name without creating it.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Annotator>, DieselError> {
        let mut conn = self.pool.get().await?;

        annotators::table
            .filter(annotators::name.eq(name))
            .select(AnnotatorRecord::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|opt| opt.map(Annotator::from))
    }

    /// Get all annotators in creation order.
    pub async fn get_all(&self) -> Result<Vec<Annotator>, DieselError> {
        let mut conn = self.pool.get().await?;

        annotators::table
            .order(annotators::id.asc())
            .select(AnnotatorRecord::as_select())
            .load(&mut conn)
            .await
            .map(|records| records.into_iter().map(Annotator::from).collect())
    }

    /// Count annotators.
    pub async fn count(&self) -> Result<i64, DieselError> {
        let mut conn = self.pool.get().await?;

        use diesel::dsl::count_star;
        annotators::table
            .select(count_star())
            .first(&mut conn)
            .await
    }
}
