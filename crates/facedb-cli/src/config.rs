use std::path::PathBuf;

/// Runtime configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
    /// Directory containing ONNX model files.
    pub model_dir: PathBuf,
    /// Minimum SCRFD score for a detection to count as a face.
    pub detection_threshold: f32,
    /// ONNX Runtime intra-op threads per model.
    pub inference_threads: usize,
}

impl Config {
    /// Load configuration from `FACEDB_*` environment variables with defaults.
    pub fn from_env() -> Self {
        let db_path = std::env::var("FACEDB_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("faces.db"));

        let model_dir = std::env::var("FACEDB_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| facedb_core::default_model_dir());

        Self {
            db_path,
            model_dir,
            detection_threshold: env_f32(
                "FACEDB_DETECTION_THRESHOLD",
                facedb_core::detector::SCRFD_DEFAULT_THRESHOLD,
            ),
            inference_threads: env_usize("FACEDB_INFERENCE_THREADS", 2).max(1),
        }
    }

    /// Path to the SCRFD detection model.
    pub fn scrfd_model_path(&self) -> String {
        self.model_dir
            .join(facedb_core::SCRFD_MODEL_FILE)
            .to_string_lossy()
            .into_owned()
    }

    /// Path to the ArcFace recognition model.
    pub fn arcface_model_path(&self) -> String {
        self.model_dir
            .join(facedb_core::ARCFACE_MODEL_FILE)
            .to_string_lossy()
            .into_owned()
    }
}

fn env_f32(key: &str, default: f32) -> f32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
