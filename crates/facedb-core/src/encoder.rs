//! The face-encoding capability consumed by ingestion.

use crate::detector::{DetectorError, FaceDetector};
use crate::frame::Frame;
use crate::recognizer::{FaceRecognizer, RecognizerError};
use crate::types::Embedding;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncoderError {
    #[error("detector error: {0}")]
    Detector(#[from] DetectorError),
    #[error("recognizer error: {0}")]
    Recognizer(#[from] RecognizerError),
}

/// Turns image pixels into one fixed-length embedding per detected face.
///
/// An empty result means no face was found; that is not an error. When several
/// faces are present the most relevant one comes first.
pub trait FaceEncoder {
    fn encode(&mut self, frame: &Frame) -> Result<Vec<Embedding>, EncoderError>;
}

/// SCRFD detection followed by ArcFace recognition.
pub struct OnnxFaceEncoder {
    detector: FaceDetector,
    recognizer: FaceRecognizer,
}

impl OnnxFaceEncoder {
    pub fn new(detector: FaceDetector, recognizer: FaceRecognizer) -> Self {
        Self {
            detector,
            recognizer,
        }
    }

    /// Load both models; fails fast if either file is missing.
    pub fn load(
        scrfd_path: &str,
        arcface_path: &str,
        detection_threshold: f32,
        intra_threads: usize,
    ) -> Result<Self, EncoderError> {
        let detector = FaceDetector::load(scrfd_path, detection_threshold, intra_threads)?;
        let recognizer = FaceRecognizer::load(arcface_path, intra_threads)?;
        Ok(Self::new(detector, recognizer))
    }
}

impl FaceEncoder for OnnxFaceEncoder {
    /// Faces are returned in descending detector confidence.
    fn encode(&mut self, frame: &Frame) -> Result<Vec<Embedding>, EncoderError> {
        let faces = self.detector.detect(frame)?;
        tracing::debug!(faces = faces.len(), width = frame.width, height = frame.height, "detected");

        faces
            .iter()
            .map(|face| self.recognizer.extract(frame, face).map_err(EncoderError::from))
            .collect()
    }
}
