//! facedb-core — Face encoding for the known-faces store.
//!
//! Decodes image files into grayscale frames, finds faces with SCRFD and
//! embeds them with ArcFace, both via ONNX Runtime. Embeddings have a fixed
//! little-endian byte form used for persistence.

pub mod alignment;
pub mod detector;
pub mod encoder;
pub mod frame;
pub mod recognizer;
pub mod types;

use std::path::PathBuf;

pub use detector::FaceDetector;
pub use encoder::{EncoderError, FaceEncoder, OnnxFaceEncoder};
pub use frame::{Frame, FrameError};
pub use recognizer::FaceRecognizer;
pub use types::{BoundingBox, Embedding, EmbeddingError, FaceRecord, RecordSummary};

/// File name of the SCRFD detection model inside the model directory.
pub const SCRFD_MODEL_FILE: &str = "det_10g.onnx";
/// File name of the ArcFace recognition model inside the model directory.
pub const ARCFACE_MODEL_FILE: &str = "w600k_r50.onnx";

/// `$XDG_DATA_HOME/facedb/models`, or `~/.local/share/facedb/models`.
pub fn default_model_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local/share")
        })
        .join("facedb")
        .join("models")
}
