//! Labeling history models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded fact: this annotator gave this label to this image.
///
/// Labelings are append-only. The same annotator may label the same image
/// more than once and every row is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labeling {
    pub id: i32,
    pub annotator_id: i32,
    pub image_id: i32,
    pub label_id: i32,
    pub created_at: DateTime<Utc>,
}

/// The (annotator, image) pair of a labeling, all the selector needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelingRef {
    pub annotator_id: i32,
    pub image_id: i32,
}

/// A labeling resolved to natural keys, for export.
#[derive(Debug, Clone, Serialize)]
pub struct LabelingEntry {
    pub id: i32,
    pub annotator: String,
    pub filename: String,
    pub label: String,
    pub created_at: DateTime<Utc>,
}
