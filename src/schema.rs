// Kept in sync by hand with migrations/m0001_initial.rs.

diesel::table! {
    annotators (id) {
        id -> Integer,
        name -> Text,
        created_at -> Text,
    }
}

diesel::table! {
    images (id) {
        id -> Integer,
        filename -> Text,
        created_at -> Text,
    }
}

diesel::table! {
    labels (id) {
        id -> Integer,
        text -> Text,
        created_at -> Text,
    }
}

diesel::table! {
    labelings (id) {
        id -> Integer,
        annotator_id -> Integer,
        image_id -> Integer,
        label_id -> Integer,
        created_at -> Text,
    }
}

diesel::joinable!(labelings -> annotators (annotator_id));
diesel::joinable!(labelings -> images (image_id));
diesel::joinable!(labelings -> labels (label_id));

diesel::allow_tables_to_appear_in_same_query!(annotators, images, labels, labelings,);
