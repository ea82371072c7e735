//! facedb-store — SQLite persistence for known face encodings.
//!
//! One table, `known_faces`, holding a label and the raw encoding bytes of a
//! single face per row. Rows are only ever appended; the table as a whole can
//! be dropped and recreated.

pub mod schema;
pub mod store;

pub use store::{FaceStore, StoreError};
