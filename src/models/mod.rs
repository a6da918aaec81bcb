//! Domain models for the labeling catalog and history.

mod annotator;
mod image;
mod label;
mod labeling;

pub use annotator::Annotator;
pub use image::Image;
pub use label::LabelType;
pub use labeling::{Labeling, LabelingEntry, LabelingRef};
