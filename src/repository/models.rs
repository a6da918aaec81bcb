//! Diesel records for the labeling tables.
//!
//! Records mirror the table rows exactly (timestamps as RFC 3339 text);
//! the `From` impls turn them into domain models.

use diesel::prelude::*;

use super::parse_datetime;
use crate::models::{Annotator, Image, LabelType, Labeling};
use crate::schema;

/// Annotator record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::annotators)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AnnotatorRecord {
    pub id: i32,
    pub name: String,
    pub created_at: String,
}

/// New annotator for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::annotators)]
pub struct NewAnnotator<'a> {
    pub name: &'a str,
    pub created_at: &'a str,
}

/// Image record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::images)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ImageRecord {
    pub id: i32,
    pub filename: String,
    pub created_at: String,
}

/// New image for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::images)]
pub struct NewImage<'a> {
    pub filename: &'a str,
    pub created_at: &'a str,
}

/// Label record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::labels)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LabelRecord {
    pub id: i32,
    pub text: String,
    pub created_at: String,
}

/// New label for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::labels)]
pub struct NewLabel<'a> {
    pub text: &'a str,
    pub created_at: &'a str,
}

/// Labeling record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::labelings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LabelingRecord {
    pub id: i32,
    pub annotator_id: i32,
    pub image_id: i32,
    pub label_id: i32,
    pub created_at: String,
}

/// New labeling for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::labelings)]
pub struct NewLabeling<'a> {
    pub annotator_id: i32,
    pub image_id: i32,
    pub label_id: i32,
    pub created_at: &'a str,
}

impl From<AnnotatorRecord> for Annotator {
    fn from(record: AnnotatorRecord) -> Self {
        Annotator {
            id: record.id,
            name: record.name,
            created_at: parse_datetime(&record.created_at),
        }
    }
}

impl From<ImageRecord> for Image {
    fn from(record: ImageRecord) -> Self {
        Image {
            id: record.id,
            filename: record.filename,
            created_at: parse_datetime(&record.created_at),
        }
    }
}

impl From<LabelRecord> for LabelType {
    fn from(record: LabelRecord) -> Self {
        LabelType {
            id: record.id,
            text: record.text,
            created_at: parse_datetime(&record.created_at),
        }
    }
}

impl From<LabelingRecord> for Labeling {
    fn from(record: LabelingRecord) -> Self {
        Labeling {
            id: record.id,
            annotator_id: record.annotator_id,
            image_id: record.image_id,
            label_id: record.label_id,
            created_at: parse_datetime(&record.created_at),
        }
    }
}
