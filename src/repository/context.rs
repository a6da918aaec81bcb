//! Database context for managing connections and repository access.

use std::path::Path;

use diesel_async::SimpleAsyncConnection;

use super::annotator::AnnotatorRepository;
use super::image::ImageRepository;
use super::label::LabelRepository;
use super::labeling::LabelingRepository;
use super::pool::{DbPool, DieselError};
use super::util::{to_diesel_error, validate_database_url};

/// Database context that holds the connection pool and hands out repositories.
///
/// # Example
/// ```ignore
/// let ctx = DbContext::from_url("sqlite:/var/lib/imagelabel/imagelabel.db")?;
/// let catalog = ctx.images().get_all().await?;
/// ```
#[derive(Clone)]
pub struct DbContext {
    pool: DbPool,
}

impl DbContext {
    /// Create a context from a SQLite file path.
    pub fn from_sqlite_path(db_path: &Path) -> Self {
        Self {
            pool: DbPool::from_path(db_path),
        }
    }

    /// Create a context from a database URL (`sqlite:` URL or plain path).
    pub fn from_url(database_url: &str) -> Result<Self, DieselError> {
        validate_database_url(database_url).map_err(to_diesel_error)?;
        Ok(Self {
            pool: DbPool::new(database_url),
        })
    }

    /// Create a context with an existing pool.
    pub fn with_pool(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn annotators(&self) -> AnnotatorRepository {
        AnnotatorRepository::new(self.pool.clone())
    }

    pub fn images(&self) -> ImageRepository {
        ImageRepository::new(self.pool.clone())
    }

    pub fn labels(&self) -> LabelRepository {
        LabelRepository::new(self.pool.clone())
    }

    pub fn labelings(&self) -> LabelingRepository {
        LabelingRepository::new(self.pool.clone())
    }

    /// Open a connection and run a trivial statement.
    ///
    /// Used at startup to fail fast when the store is unreachable.
    pub async fn test_connection(&self) -> Result<(), DieselError> {
        let mut conn = self.pool.get().await?;
        conn.batch_execute("SELECT 1").await
    }
}
