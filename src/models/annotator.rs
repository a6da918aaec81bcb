//! Annotators (the people doing the labeling).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person labeling images. Identity is the name; there is no
/// authentication, so a name is all it takes to become an annotator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotator {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
