//! Next-image assignment.
//!
//! For a given annotator, pick an image they have not labeled yet. Among
//! those, prefer the image with the fewest labelings from anyone, so label
//! coverage grows evenly across the catalog instead of piling up on whatever
//! the first annotators happened to see.

use std::collections::{HashMap, HashSet};

use crate::models::{Image, LabelingRef};

/// Outcome of a next-image selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The image to present next.
    Next(Image),
    /// The annotator has labeled every image in the catalog.
    Exhausted,
}

impl Selection {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Selection::Exhausted)
    }

    pub fn image(&self) -> Option<&Image> {
        match self {
            Selection::Next(image) => Some(image),
            Selection::Exhausted => None,
        }
    }
}

/// Select the next image for `annotator_id`.
///
/// Candidates are the catalog images with no labeling by this annotator.
/// The winner is the candidate with the lowest global labeling count; ties
/// go to the lowest image id, i.e. the image that entered the catalog first.
/// Labelings that point at images outside `catalog` are ignored.
pub fn select_next<'a, I>(annotator_id: i32, catalog: &[Image], history: I) -> Selection
where
    I: IntoIterator<Item = &'a LabelingRef>,
{
    let mut counts: HashMap<i32, usize> = HashMap::new();
    let mut labeled_by_annotator: HashSet<i32> = HashSet::new();

    for labeling in history {
        *counts.entry(labeling.image_id).or_default() += 1;
        if labeling.annotator_id == annotator_id {
            labeled_by_annotator.insert(labeling.image_id);
        }
    }

    catalog
        .iter()
        .filter(|image| !labeled_by_annotator.contains(&image.id))
        .min_by_key(|image| (counts.get(&image.id).copied().unwrap_or(0), image.id))
        .cloned()
        .map_or(Selection::Exhausted, Selection::Next)
}
