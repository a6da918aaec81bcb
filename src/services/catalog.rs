//! Catalog sync: register image files and the label vocabulary.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use super::ServiceError;
use crate::repository::Repositories;

/// Counts from one catalog sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub images_found: usize,
    pub images_added: usize,
    pub labels_added: usize,
}

/// List image filenames in `dir`, sorted.
///
/// Only regular files directly inside `dir` whose extension matches one of
/// `extensions` (case-insensitive) are returned. Hidden files are skipped.
pub async fn scan_images(dir: &Path, extensions: &[String]) -> Result<Vec<String>, ServiceError> {
    if !tokio::fs::metadata(dir)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
    {
        return Err(ServiceError::MissingImageDir(dir.to_path_buf()));
    }

    let mut filenames = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            debug!("Skipping non UTF-8 filename in {}", dir.display());
            continue;
        };
        if name.starts_with('.') || !has_extension(&name, extensions) {
            continue;
        }
        // follows symlinks
        let is_file = tokio::fs::metadata(entry.path())
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if is_file {
            filenames.push(name);
        }
    }

    filenames.sort();
    Ok(filenames)
}

fn has_extension(name: &str, extensions: &[String]) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
}

/// Service for keeping the catalog in step with the image directory.
pub struct CatalogService {
    repos: Repositories,
}

impl CatalogService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Register every image in `image_dir` and every label in `labels`.
    ///
    /// Safe to run repeatedly; existing rows are left untouched.
    pub async fn sync(
        &self,
        image_dir: &Path,
        extensions: &[String],
        labels: &[String],
    ) -> Result<SyncReport, ServiceError> {
        let filenames = scan_images(image_dir, extensions).await?;
        let images_added = self.repos.images.ensure_all(&filenames).await?;
        let labels_added = self.sync_labels(labels).await?;

        info!(
            "Catalog sync: {} images found, {} new, {} new labels",
            filenames.len(),
            images_added,
            labels_added
        );

        Ok(SyncReport {
            images_found: filenames.len(),
            images_added,
            labels_added,
        })
    }

    /// Register the label vocabulary only.
    pub async fn sync_labels(&self, labels: &[String]) -> Result<usize, ServiceError> {
        let labels: Vec<String> = labels
            .iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        Ok(self.repos.labels.ensure_all(&labels).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{migrations, DbContext};
    use tempfile::tempdir;

    async fn setup() -> (CatalogService, Repositories, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("test.db").display());
        migrations::run_migrations(&url).await.unwrap();
        let repos = Repositories::new(DbContext::from_url(&url).unwrap());
        (CatalogService::new(repos.clone()), repos, dir)
    }

    fn jpg() -> Vec<String> {
        vec!["jpg".to_string()]
    }

    fn vocabulary() -> Vec<String> {
        vec!["funny".to_string(), "dull".to_string()]
    }

    #[tokio::test]
    async fn test_scan_filters_and_sorts() {
        let dir = tempdir().unwrap();
        for name in ["c.jpg", "a.JPG", "b.jpg", "notes.txt", ".hidden.jpg"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.jpg")).unwrap();

        let found = scan_images(dir.path(), &jpg()).await.unwrap();
        assert_eq!(found, vec!["a.JPG", "b.jpg", "c.jpg"]);

        let png = scan_images(dir.path(), &["png".to_string()]).await.unwrap();
        assert!(png.is_empty());
    }

    #[tokio::test]
    async fn test_scan_missing_dir() {
        let dir = tempdir().unwrap();
        let err = scan_images(&dir.path().join("nope"), &jpg())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::MissingImageDir(_)));
    }

    #[tokio::test]
    async fn test_sync_is_idempotent() {
        let (service, repos, dir) = setup().await;
        let images = dir.path().join("images");
        std::fs::create_dir(&images).unwrap();
        for name in ["a.jpg", "b.jpg", "c.jpg"] {
            std::fs::write(images.join(name), b"x").unwrap();
        }

        let first = service.sync(&images, &jpg(), &vocabulary()).await.unwrap();
        assert_eq!(
            first,
            SyncReport {
                images_found: 3,
                images_added: 3,
                labels_added: 2,
            }
        );

        let second = service.sync(&images, &jpg(), &vocabulary()).await.unwrap();
        assert_eq!(second.images_found, 3);
        assert_eq!(second.images_added, 0);
        assert_eq!(second.labels_added, 0);

        assert_eq!(repos.images.count().await.unwrap(), 3);
        assert_eq!(repos.labels.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_sync_keeps_images_removed_from_disk() {
        let (service, repos, dir) = setup().await;
        let images = dir.path().join("images");
        std::fs::create_dir(&images).unwrap();
        std::fs::write(images.join("a.jpg"), b"x").unwrap();
        service.sync(&images, &jpg(), &[]).await.unwrap();

        std::fs::remove_file(images.join("a.jpg")).unwrap();
        std::fs::write(images.join("b.jpg"), b"x").unwrap();
        let report = service.sync(&images, &jpg(), &[]).await.unwrap();

        assert_eq!(report.images_added, 1);
        assert_eq!(repos.images.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_sync_labels_skips_blank_entries() {
        let (service, repos, _dir) = setup().await;
        let labels = vec![" funny ".to_string(), "".to_string(), "dull".to_string()];

        assert_eq!(service.sync_labels(&labels).await.unwrap(), 2);
        let texts: Vec<String> = repos
            .labels
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.text)
            .collect();
        assert_eq!(texts, vec!["funny", "dull"]);
    }
}
