//! Image catalog entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An image that can be labeled.
///
/// Identity is the filename; `id` is the storage key assigned on first
/// sight and doubles as catalog insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: i32,
    pub filename: String,
    pub created_at: DateTime<Utc>,
}

impl Image {
    /// Path segment used to fetch this image from the server.
    pub fn url_path(&self) -> String {
        format!("/image/{}", urlencoding::encode(&self.filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_path_encodes_filename() {
        let image = Image {
            id: 1,
            filename: "cat photo#1.jpg".to_string(),
            created_at: Utc::now(),
        };
        assert_eq!(image.url_path(), "/image/cat%20photo%231.jpg");
    }
}
