//! Get-or-create by natural key.
//!
//! Each helper runs `INSERT ... ON CONFLICT DO NOTHING` against the UNIQUE
//! column and then reads the row back, so concurrent first-time creation of
//! the same key converges on one row instead of failing. They take a bare
//! connection so callers can compose them inside a transaction.

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use super::models::{
    AnnotatorRecord, ImageRecord, LabelRecord, NewAnnotator, NewImage, NewLabel,
};
use super::pool::{DbPool, DieselError, SqliteConn};
use crate::schema::{annotators, images, labels};

/// Generates a get-or-create function over a table's UNIQUE text column.
///
/// The generated function returns the row plus a flag that is true if the
/// row is new. The optional second name generates a batch variant that runs
/// every key through the first inside one transaction and returns how many
/// rows were created.
///
/// # Example
/// ```ignore
/// ensure_by_key!(
///     /// Get or create an image by filename.
///     ensure_image, ensure_images: images.filename => ImageRecord, NewImage
/// );
/// ```
macro_rules! ensure_by_key {
    (
        $(#[$meta:meta])*
        $one:ident $(, $many:ident)?: $table:ident.$column:ident => $record:ident, $new:ident
    ) => {
        $(#[$meta])*
        pub async fn $one(
            conn: &mut SqliteConn,
            key: &str,
        ) -> Result<($record, bool), DieselError> {
            let created_at = Utc::now().to_rfc3339();
            let inserted = diesel::insert_into($table::table)
                .values($new {
                    $column: key,
                    created_at: &created_at,
                })
                .on_conflict_do_nothing()
                .execute(conn)
                .await?;

            let record = $table::table
                .filter($table::$column.eq(key))
                .select($record::as_select())
                .first(conn)
                .await?;

            Ok((record, inserted > 0))
        }

        $(
            #[doc = concat!("Run `", stringify!($one), "` for every key in one transaction.")]
            ///
            /// Returns how many rows were newly created.
            pub async fn $many(pool: &DbPool, keys: &[String]) -> Result<usize, DieselError> {
                let mut conn = pool.get().await?;

                conn.transaction::<_, DieselError, _>(|conn| {
                    async move {
                        let mut created = 0;
                        for key in keys {
                            if $one(conn, key).await?.1 {
                                created += 1;
                            }
                        }
                        Ok(created)
                    }
                    .scope_boxed()
                })
                .await
            }
        )?
    };
}

ensure_by_key!(
    /// Get or create an annotator by name. The flag is true if the row is new.
    ensure_annotator: annotators.name => AnnotatorRecord, NewAnnotator
);

ensure_by_key!(
    /// Get or create an image by filename. The flag is true if the row is new.
    ensure_image, ensure_images: images.filename => ImageRecord, NewImage
);

ensure_by_key!(
    /// Get or create a label by text. The flag is true if the row is new.
    ensure_label, ensure_labels: labels.text => LabelRecord, NewLabel
);
