use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Size in bytes of one serialized embedding element (`f32`, little-endian).
pub const ELEMENT_SIZE: usize = std::mem::size_of::<f32>();

/// Bounding box for a detected face, with optional facial landmarks.
#[derive(Debug, Clone)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub confidence: f32,
    /// Five-point facial landmarks: [left_eye, right_eye, nose, left_mouth, right_mouth].
    pub landmarks: Option<[(f32, f32); 5]>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EmbeddingError {
    #[error("encoding payload is empty")]
    Empty,
    #[error("encoding payload of {0} bytes is not a whole number of 4-byte elements")]
    Misaligned(usize),
}

/// Face embedding vector (512-dimensional for ArcFace).
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    pub values: Vec<f32>,
}

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn dim(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Canonical binary form: each element as 4 little-endian bytes, in order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.values.len() * ELEMENT_SIZE);
        for v in &self.values {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes
    }

    /// Inverse of [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EmbeddingError> {
        if bytes.is_empty() {
            return Err(EmbeddingError::Empty);
        }
        if bytes.len() % ELEMENT_SIZE != 0 {
            return Err(EmbeddingError::Misaligned(bytes.len()));
        }
        let values = bytes
            .chunks_exact(ELEMENT_SIZE)
            .map(|chunk| {
                let mut raw = [0u8; ELEMENT_SIZE];
                raw.copy_from_slice(chunk);
                f32::from_le_bytes(raw)
            })
            .collect();
        Ok(Self { values })
    }
}

/// One persisted face: a label plus the serialized encoding of a single face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceRecord {
    pub id: i64,
    pub name: String,
    pub encoding: Vec<u8>,
}

impl FaceRecord {
    /// Decode the stored payload back into an embedding.
    pub fn embedding(&self) -> Result<Embedding, EmbeddingError> {
        Embedding::from_bytes(&self.encoding)
    }

    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            id: self.id,
            name: self.name.clone(),
            bytes: self.encoding.len(),
            dim: self.embedding().ok().map(|e| e.dim()),
        }
    }
}

/// Listing view of a record: the payload is reduced to its size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSummary {
    pub id: i64,
    pub name: String,
    pub bytes: usize,
    /// `None` when the payload does not decode as an embedding.
    pub dim: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_bytes_is_little_endian() {
        let e = Embedding::new(vec![1.0, -2.5]);
        let bytes = e.to_bytes();
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[..4], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[4..], &(-2.5f32).to_le_bytes());
    }

    #[test]
    fn test_from_bytes_preserves_bits() {
        // NaN payloads and negative zero must survive untouched.
        let values = vec![f32::from_bits(0x7fc0_1234), -0.0, f32::MIN_POSITIVE, 3.25];
        let bytes = Embedding::new(values.clone()).to_bytes();
        let decoded = Embedding::from_bytes(&bytes).unwrap();
        let original_bits: Vec<u32> = values.iter().map(|v| v.to_bits()).collect();
        let decoded_bits: Vec<u32> = decoded.values.iter().map(|v| v.to_bits()).collect();
        assert_eq!(original_bits, decoded_bits);
        assert_eq!(decoded.to_bytes(), bytes);
    }

    #[test]
    fn test_from_bytes_rejects_empty() {
        assert_eq!(Embedding::from_bytes(&[]), Err(EmbeddingError::Empty));
    }

    #[test]
    fn test_from_bytes_rejects_partial_element() {
        assert_eq!(
            Embedding::from_bytes(&[0, 0, 0, 0, 1]),
            Err(EmbeddingError::Misaligned(5))
        );
    }

    #[test]
    fn test_arcface_sized_payload() {
        let e = Embedding::new(vec![0.5; 512]);
        assert_eq!(e.to_bytes().len(), 2048);
    }

    #[test]
    fn test_record_decodes_embedding() {
        let record = FaceRecord {
            id: 1,
            name: "Alice".into(),
            encoding: Embedding::new(vec![0.25, 0.75]).to_bytes(),
        };
        assert_eq!(record.embedding().unwrap().values, vec![0.25, 0.75]);
    }

    #[test]
    fn test_record_json_round_trip() {
        let record = FaceRecord {
            id: 7,
            name: "Alice".into(),
            encoding: Embedding::new(vec![1.5, -0.5]).to_bytes(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: FaceRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_summary_serializes_size_and_dim() {
        let record = FaceRecord {
            id: 3,
            name: "Bob".into(),
            encoding: Embedding::new(vec![0.0; 512]).to_bytes(),
        };
        let value = serde_json::to_value(record.summary()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "id": 3, "name": "Bob", "bytes": 2048, "dim": 512 })
        );
    }

    #[test]
    fn test_summary_of_undecodable_payload_has_no_dim() {
        let record = FaceRecord {
            id: 4,
            name: "Bob".into(),
            encoding: vec![1, 2, 3],
        };
        let summary = record.summary();
        assert_eq!(summary.bytes, 3);
        assert_eq!(summary.dim, None);
    }
}
