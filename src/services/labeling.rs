//! Labeling service: label submission and next-image assignment.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, info};

use super::ServiceError;
use crate::assignment::{select_next, Selection};
use crate::models::{Annotator, Labeling};
use crate::repository::Repositories;

/// How far one annotator has come through the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatorProgress {
    pub name: String,
    /// Distinct catalog images this annotator has labeled.
    pub images_labeled: usize,
    /// All labelings by this annotator, repeats included.
    pub labelings: usize,
    pub remaining: usize,
}

/// Service shared by the HTTP handlers and the CLI.
#[derive(Clone)]
pub struct LabelingService {
    repos: Repositories,
}

fn require(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::InvalidInput(format!("{} must not be blank", field)));
    }
    Ok(())
}

impl LabelingService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub fn repos(&self) -> &Repositories {
        &self.repos
    }

    /// Record a label for an image.
    ///
    /// Any label text is accepted, including text outside the configured
    /// vocabulary. Unknown annotators, images and labels are created.
    pub async fn submit_label(
        &self,
        username: &str,
        filename: &str,
        text: &str,
    ) -> Result<Labeling, ServiceError> {
        require("username", username)?;
        require("filename", filename)?;
        require("text", text)?;

        let labeling = self.repos.labelings.record(username, filename, text).await?;
        info!("{} labeled {} as '{}'", username, filename, text);
        Ok(labeling)
    }

    /// Pick the next image for `username`, creating the annotator if unseen.
    pub async fn next_for(&self, username: &str) -> Result<(Annotator, Selection), ServiceError> {
        require("username", username)?;

        let annotator = self.repos.annotators.get_or_create(username).await?;
        let catalog = self.repos.images.get_all().await?;
        let history = self.repos.labelings.history().await?;

        let selection = select_next(annotator.id, &catalog, &history);
        match &selection {
            Selection::Next(image) => debug!(
                annotator = %annotator.name,
                image = %image.filename,
                "selected next image"
            ),
            Selection::Exhausted => debug!(annotator = %annotator.name, "catalog exhausted"),
        }

        Ok((annotator, selection))
    }

    /// Per-annotator progress through the current catalog.
    pub async fn progress(&self) -> Result<Vec<AnnotatorProgress>, ServiceError> {
        let annotators = self.repos.annotators.get_all().await?;
        let catalog: HashSet<i32> = self
            .repos
            .images
            .get_all()
            .await?
            .into_iter()
            .map(|image| image.id)
            .collect();
        let history = self.repos.labelings.history().await?;

        let mut seen: HashMap<i32, HashSet<i32>> = HashMap::new();
        let mut totals: HashMap<i32, usize> = HashMap::new();
        for labeling in &history {
            *totals.entry(labeling.annotator_id).or_default() += 1;
            if catalog.contains(&labeling.image_id) {
                seen.entry(labeling.annotator_id)
                    .or_default()
                    .insert(labeling.image_id);
            }
        }

        Ok(annotators
            .into_iter()
            .map(|annotator| {
                let images_labeled = seen.get(&annotator.id).map_or(0, HashSet::len);
                AnnotatorProgress {
                    labelings: totals.get(&annotator.id).copied().unwrap_or(0),
                    remaining: catalog.len() - images_labeled,
                    images_labeled,
                    name: annotator.name,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{migrations, DbContext};
    use tempfile::tempdir;

    async fn setup(images: &[&str]) -> (LabelingService, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("test.db").display());
        migrations::run_migrations(&url).await.unwrap();
        let repos = Repositories::new(DbContext::from_url(&url).unwrap());

        let filenames: Vec<String> = images.iter().map(|s| s.to_string()).collect();
        repos.images.ensure_all(&filenames).await.unwrap();
        (LabelingService::new(repos), dir)
    }

    async fn next_filename(service: &LabelingService, user: &str) -> Option<String> {
        let (_, selection) = service.next_for(user).await.unwrap();
        selection.image().map(|image| image.filename.clone())
    }

    #[tokio::test]
    async fn test_next_prefers_least_labeled() {
        let (service, _dir) = setup(&["a.jpg", "b.jpg", "c.jpg"]).await;
        service.submit_label("alice", "a.jpg", "funny").await.unwrap();
        service.submit_label("bob", "a.jpg", "dull").await.unwrap();
        service.submit_label("bob", "b.jpg", "funny").await.unwrap();

        assert_eq!(next_filename(&service, "alice").await.as_deref(), Some("c.jpg"));
    }

    #[tokio::test]
    async fn test_next_exhausted_after_all_labeled() {
        let (service, _dir) = setup(&["a.jpg", "b.jpg", "c.jpg"]).await;
        for image in ["a.jpg", "b.jpg", "c.jpg"] {
            service.submit_label("alice", image, "funny").await.unwrap();
        }

        let (annotator, selection) = service.next_for("alice").await.unwrap();
        assert_eq!(annotator.name, "alice");
        assert!(selection.is_exhausted());
    }

    #[tokio::test]
    async fn test_next_creates_annotator() {
        let (service, _dir) = setup(&["a.jpg"]).await;
        assert!(service
            .repos()
            .annotators
            .get_by_name("erin")
            .await
            .unwrap()
            .is_none());

        assert_eq!(next_filename(&service, "erin").await.as_deref(), Some("a.jpg"));
        assert!(service
            .repos()
            .annotators
            .get_by_name("erin")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_submit_adds_unknown_image_to_catalog() {
        let (service, _dir) = setup(&["a.jpg"]).await;
        service.submit_label("alice", "z.jpg", "weird").await.unwrap();

        assert_eq!(service.repos().images.count().await.unwrap(), 2);
        assert!(service.repos().labels.get_or_create("weird").await.is_ok());
        // z.jpg is in the catalog and already labeled by alice
        assert_eq!(next_filename(&service, "alice").await.as_deref(), Some("a.jpg"));
        assert_eq!(next_filename(&service, "bob").await.as_deref(), Some("a.jpg"));
    }

    #[tokio::test]
    async fn test_submit_rejects_blank_fields() {
        let (service, _dir) = setup(&["a.jpg"]).await;
        for (user, file, text) in [("", "a.jpg", "funny"), ("alice", " ", "funny"), ("alice", "a.jpg", "")] {
            let err = service.submit_label(user, file, text).await.unwrap_err();
            assert!(matches!(err, ServiceError::InvalidInput(_)));
        }
        assert_eq!(service.repos().labelings.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_repeat_submission_appends() {
        let (service, _dir) = setup(&["a.jpg"]).await;
        let first = service.submit_label("alice", "a.jpg", "funny").await.unwrap();
        let second = service.submit_label("alice", "a.jpg", "funny").await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(
            service
                .repos()
                .labelings
                .count_for(first.annotator_id, first.image_id)
                .await
                .unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_progress() {
        let (service, _dir) = setup(&["a.jpg", "b.jpg", "c.jpg"]).await;
        service.submit_label("alice", "a.jpg", "funny").await.unwrap();
        service.submit_label("alice", "a.jpg", "dull").await.unwrap();
        service.submit_label("bob", "b.jpg", "dull").await.unwrap();
        service.next_for("carol").await.unwrap();

        let progress = service.progress().await.unwrap();
        assert_eq!(progress.len(), 3);
        assert_eq!(
            progress[0],
            AnnotatorProgress {
                name: "alice".to_string(),
                images_labeled: 1,
                labelings: 2,
                remaining: 2,
            }
        );
        assert_eq!(progress[2].name, "carol");
        assert_eq!(progress[2].remaining, 3);
    }
}
