//! Migration Schema Tests
//!
//! Applies the cetane migrations to a fresh SQLite database through rusqlite
//! and checks the tables, constraints and indexes the labeling store relies on.

use std::collections::BTreeSet;

use cetane::backend::Sqlite;
use rusqlite::{Connection, Result as SqliteResult};

/// Apply every migration in dependency order.
fn apply_migrations(conn: &Connection) -> SqliteResult<()> {
    let registry = imagelabel::migrations::registry();
    let backend = Sqlite;

    let ordered_names = registry
        .resolve_order()
        .expect("Failed to resolve migration order");

    for name in ordered_names {
        let migration = registry
            .get(name)
            .expect("Migration not found after resolve");
        for stmt in migration.forward_sql(&backend) {
            if stmt.trim().is_empty() {
                continue;
            }
            conn.execute_batch(&stmt)?;
        }
    }
    Ok(())
}

fn migrated_connection() -> Connection {
    let conn = Connection::open_in_memory().expect("Failed to open DB");
    conn.execute_batch("PRAGMA foreign_keys = ON")
        .expect("Failed to enable foreign keys");
    apply_migrations(&conn).expect("Failed to apply migrations");
    conn
}

fn table_names(conn: &Connection) -> BTreeSet<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<SqliteResult<_>>()
        .unwrap()
}

fn index_names(conn: &Connection) -> BTreeSet<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type='index' AND name NOT LIKE 'sqlite_%'")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<SqliteResult<_>>()
        .unwrap()
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })
    .unwrap()
}

const NOW: &str = "2024-01-01T00:00:00+00:00";

#[test]
fn test_creates_all_tables() {
    let conn = migrated_connection();
    let tables = table_names(&conn);

    for expected in ["annotators", "images", "labels", "labelings"] {
        assert!(tables.contains(expected), "missing table {}", expected);
    }
}

#[test]
fn test_creates_labeling_indexes() {
    let conn = migrated_connection();
    let indexes = index_names(&conn);

    assert!(indexes.contains("idx_labelings_image"));
    assert!(indexes.contains("idx_labelings_annotator_image"));
}

#[test]
fn test_natural_keys_are_unique() {
    let conn = migrated_connection();

    conn.execute(
        "INSERT INTO images (filename, created_at) VALUES ('a.jpg', ?1)",
        [NOW],
    )
    .unwrap();
    assert!(conn
        .execute(
            "INSERT INTO images (filename, created_at) VALUES ('a.jpg', ?1)",
            [NOW],
        )
        .is_err());

    conn.execute(
        "INSERT INTO labels (text, created_at) VALUES ('funny', ?1)",
        [NOW],
    )
    .unwrap();
    assert!(conn
        .execute(
            "INSERT INTO labels (text, created_at) VALUES ('funny', ?1)",
            [NOW],
        )
        .is_err());

    conn.execute(
        "INSERT INTO annotators (name, created_at) VALUES ('alice', ?1)",
        [NOW],
    )
    .unwrap();
    let ignored = conn
        .execute(
            "INSERT INTO annotators (name, created_at) VALUES ('alice', ?1) ON CONFLICT DO NOTHING",
            [NOW],
        )
        .unwrap();
    assert_eq!(ignored, 0);
    assert_eq!(count(&conn, "annotators"), 1);
}

#[test]
fn test_labelings_allow_repeats_and_cascade() {
    let conn = migrated_connection();
    conn.execute_batch(&format!(
        "INSERT INTO annotators (name, created_at) VALUES ('alice', '{NOW}');
         INSERT INTO images (filename, created_at) VALUES ('a.jpg', '{NOW}');
         INSERT INTO labels (text, created_at) VALUES ('funny', '{NOW}');"
    ))
    .unwrap();

    for _ in 0..2 {
        conn.execute(
            "INSERT INTO labelings (annotator_id, image_id, label_id, created_at) VALUES (1, 1, 1, ?1)",
            [NOW],
        )
        .unwrap();
    }
    assert_eq!(count(&conn, "labelings"), 2);

    // dangling references are refused
    assert!(conn
        .execute(
            "INSERT INTO labelings (annotator_id, image_id, label_id, created_at) VALUES (1, 99, 1, ?1)",
            [NOW],
        )
        .is_err());

    conn.execute("DELETE FROM images WHERE id = 1", []).unwrap();
    assert_eq!(count(&conn, "labelings"), 0);
}

#[test]
fn test_postgres_sql_generation() {
    use cetane::backend::Postgres;

    let registry = imagelabel::migrations::registry();
    let backend = Postgres;

    for name in registry
        .resolve_order()
        .expect("Failed to resolve migration order")
    {
        let migration = registry.get(name).expect("Migration not found");
        assert!(
            !migration.forward_sql(&backend).is_empty(),
            "Migration {} generated no SQL",
            migration.name
        );
    }
}
