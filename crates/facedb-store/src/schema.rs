//! Database schema definitions

/// Name of the table holding one row per stored face.
pub const TABLE: &str = "known_faces";

/// Drop the table (if any) and recreate it empty.
pub const RESET_SCHEMA: &str = r#"
DROP TABLE IF EXISTS known_faces;
CREATE TABLE known_faces (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    encoding BLOB NOT NULL
);
"#;

pub const INSERT_FACE: &str = "INSERT INTO known_faces (name, encoding) VALUES (?1, ?2)";

pub const SELECT_ALL: &str = "SELECT id, name, encoding FROM known_faces ORDER BY id";

pub const SELECT_BY_NAME: &str =
    "SELECT id, name, encoding FROM known_faces WHERE name = ?1 ORDER BY id";

pub const COUNT_FACES: &str = "SELECT COUNT(*) FROM known_faces";

pub const TABLE_EXISTS: &str =
    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1";
