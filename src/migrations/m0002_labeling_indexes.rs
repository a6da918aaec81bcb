use cetane::prelude::*;

pub fn migration() -> Migration {
    Migration::new("0002_labeling_indexes")
        .depends_on(&["0001_initial_schema"])
        .operation(AddIndex::new(
            "labelings",
            Index::new("idx_labelings_image").column("image_id"),
        ))
        .operation(AddIndex::new(
            "labelings",
            Index::new("idx_labelings_annotator_image")
                .column("annotator_id")
                .column("image_id"),
        ))
}
