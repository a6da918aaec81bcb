//! Label vocabulary entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A label that can be assigned to an image. Identity is the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelType {
    pub id: i32,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
