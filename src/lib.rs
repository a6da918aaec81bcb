//! imagelabel - image labeling server.
//!
//! Annotators are shown one image at a time and pick a label for it. Each
//! annotator is always served an image they have not labeled yet, preferring
//! images with the fewest labels overall so coverage grows evenly.

pub mod assignment;
pub mod config;
pub mod migrations;
pub mod models;
pub mod repository;
pub mod schema;
pub mod server;
pub mod services;
