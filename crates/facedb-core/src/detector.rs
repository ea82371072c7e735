//! SCRFD face detector via ONNX Runtime.
//!
//! Runs the anchor-free SCRFD model over a letterboxed 640×640 input, decodes
//! the three stride levels, and suppresses overlapping boxes.

use crate::frame::Frame;
use crate::types::BoundingBox;
use ndarray::Array4;
use ort::session::Session;
use ort::value::TensorRef;
use std::path::Path;
use thiserror::Error;

const SCRFD_INPUT_SIZE: usize = 640;
const SCRFD_MEAN: f32 = 127.5;
const SCRFD_STD: f32 = 128.0;
pub const SCRFD_DEFAULT_THRESHOLD: f32 = 0.5;
const SCRFD_NMS_THRESHOLD: f32 = 0.4;
const SCRFD_STRIDES: [usize; 3] = [8, 16, 32];
const SCRFD_ANCHORS_PER_CELL: usize = 2;

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("model file not found: {0} (download det_10g.onnx from insightface)")]
    ModelNotFound(String),
    #[error("inference failed: {0}")]
    InferenceFailed(String),
    #[error("ort: {0}")]
    Ort(#[from] ort::Error),
}

/// Maps letterboxed model coordinates back onto the source frame.
#[derive(Debug, Clone, Copy)]
struct Letterbox {
    scale: f32,
    pad_x: f32,
    pad_y: f32,
}

impl Letterbox {
    fn fit(width: usize, height: usize, target: usize) -> Self {
        let scale = (target as f32 / width as f32).min(target as f32 / height as f32);
        let new_w = (width as f32 * scale).round();
        let new_h = (height as f32 * scale).round();
        // Whole-pixel pads: the tensor content starts exactly at (pad_x, pad_y).
        Self {
            scale,
            pad_x: ((target as f32 - new_w) / 2.0).floor(),
            pad_y: ((target as f32 - new_h) / 2.0).floor(),
        }
    }

    fn to_source(self, (x, y): (f32, f32)) -> (f32, f32) {
        ((x - self.pad_x) / self.scale, (y - self.pad_y) / self.scale)
    }
}

/// Output tensor positions for one stride level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StrideOutputs {
    score: usize,
    bbox: usize,
    kps: usize,
}

/// SCRFD-based face detector.
pub struct FaceDetector {
    session: Session,
    threshold: f32,
    outputs: [StrideOutputs; 3],
}

impl FaceDetector {
    /// Load the SCRFD ONNX model from the given path.
    pub fn load(model_path: &str, threshold: f32, intra_threads: usize) -> Result<Self, DetectorError> {
        if !Path::new(model_path).exists() {
            return Err(DetectorError::ModelNotFound(model_path.to_string()));
        }

        let session = Session::builder()?
            .with_intra_threads(intra_threads)?
            .commit_from_file(model_path)?;

        let names: Vec<String> = session.outputs().iter().map(|o| o.name().to_string()).collect();
        tracing::info!(path = model_path, outputs = ?names, "loaded SCRFD model");

        if names.len() < 9 {
            return Err(DetectorError::InferenceFailed(format!(
                "SCRFD needs 9 outputs (score/bbox/kps per stride), model has {}",
                names.len()
            )));
        }

        let outputs = output_layout(&names);
        tracing::debug!(?outputs, "SCRFD output layout");

        Ok(Self {
            session,
            threshold,
            outputs,
        })
    }

    /// Detect faces, returning boxes sorted by descending confidence.
    pub fn detect(&mut self, frame: &Frame) -> Result<Vec<BoundingBox>, DetectorError> {
        if frame.is_empty() {
            return Ok(Vec::new());
        }

        let (input, letterbox) = preprocess(frame);
        let outputs = self.session.run(ort::inputs![TensorRef::from_array_view(input.view())?])?;

        let mut candidates = Vec::new();
        for (slot, &stride) in SCRFD_STRIDES.iter().enumerate() {
            let layout = self.outputs[slot];
            let tensor = |idx: usize, what: &str| {
                outputs[idx]
                    .try_extract_tensor::<f32>()
                    .map(|(_, data)| data)
                    .map_err(|e| DetectorError::InferenceFailed(format!("{what} stride {stride}: {e}")))
            };
            let heads = StrideHeads {
                scores: tensor(layout.score, "scores")?,
                bboxes: tensor(layout.bbox, "bboxes")?,
                kps: tensor(layout.kps, "kps")?,
            };
            candidates.extend(heads.decode(stride, letterbox, self.threshold));
        }

        Ok(nms(candidates, SCRFD_NMS_THRESHOLD))
    }
}

/// Letterbox the frame into a normalized NCHW tensor (gray replicated to 3 channels).
fn preprocess(frame: &Frame) -> (Array4<f32>, Letterbox) {
    let size = SCRFD_INPUT_SIZE;
    let letterbox = Letterbox::fit(frame.width as usize, frame.height as usize, size);
    let content_w = (frame.width as f32 * letterbox.scale).round();
    let content_h = (frame.height as f32 * letterbox.scale).round();

    let mut tensor = Array4::<f32>::zeros((1, 3, size, size));
    for y in 0..size {
        let ry = y as f32 - letterbox.pad_y;
        for x in 0..size {
            let rx = x as f32 - letterbox.pad_x;
            let inside = rx >= 0.0 && ry >= 0.0 && rx < content_w && ry < content_h;
            // Padding uses the mean, which normalizes to 0.
            let pixel = if inside {
                frame.sample((rx + 0.5) / letterbox.scale - 0.5, (ry + 0.5) / letterbox.scale - 0.5)
                    .round()
            } else {
                SCRFD_MEAN
            };
            let v = (pixel - SCRFD_MEAN) / SCRFD_STD;
            for c in 0..3 {
                tensor[[0, c, y, x]] = v;
            }
        }
    }

    (tensor, letterbox)
}

/// Raw head outputs for one stride level.
struct StrideHeads<'a> {
    scores: &'a [f32],
    bboxes: &'a [f32],
    kps: &'a [f32],
}

impl StrideHeads<'_> {
    fn decode(&self, stride: usize, letterbox: Letterbox, threshold: f32) -> Vec<BoundingBox> {
        let grid_w = SCRFD_INPUT_SIZE / stride;
        let grid_h = SCRFD_INPUT_SIZE / stride;
        let anchors = grid_w * grid_h * SCRFD_ANCHORS_PER_CELL;
        let s = stride as f32;

        let mut found = Vec::new();
        for idx in 0..anchors {
            let score = self.scores.get(idx).copied().unwrap_or(0.0);
            if score <= threshold {
                continue;
            }
            let Some(dist) = self.bboxes.get(idx * 4..idx * 4 + 4) else {
                continue;
            };

            let cell = idx / SCRFD_ANCHORS_PER_CELL;
            let cx = (cell % grid_w) as f32 * s;
            let cy = (cell / grid_w) as f32 * s;

            let (x1, y1) = letterbox.to_source((cx - dist[0] * s, cy - dist[1] * s));
            let (x2, y2) = letterbox.to_source((cx + dist[2] * s, cy + dist[3] * s));

            let landmarks: Option<[(f32, f32); 5]> = self.kps.get(idx * 10..idx * 10 + 10).map(|k| {
                std::array::from_fn(|i| letterbox.to_source((cx + k[i * 2] * s, cy + k[i * 2 + 1] * s)))
            });

            found.push(BoundingBox {
                x: x1,
                y: y1,
                width: x2 - x1,
                height: y2 - y1,
                confidence: score,
                landmarks,
            });
        }
        found
    }
}

/// Find which output tensor carries each head.
///
/// Exports either name their outputs `score_8`, `bbox_16`, `kps_32`, ... or
/// use opaque numeric names; the latter follow the standard order
/// [scores 8/16/32, bboxes 8/16/32, kps 8/16/32].
fn output_layout(names: &[String]) -> [StrideOutputs; 3] {
    let find = |head: &str, stride: usize| {
        let wanted = format!("{head}_{stride}");
        names.iter().position(|n| *n == wanted)
    };

    let named: Option<Vec<StrideOutputs>> = SCRFD_STRIDES
        .iter()
        .map(|&stride| {
            Some(StrideOutputs {
                score: find("score", stride)?,
                bbox: find("bbox", stride)?,
                kps: find("kps", stride)?,
            })
        })
        .collect();

    match named {
        Some(layout) => [layout[0], layout[1], layout[2]],
        None => {
            tracing::info!(?names, "SCRFD output names not recognized, using positional layout");
            std::array::from_fn(|i| StrideOutputs {
                score: i,
                bbox: i + 3,
                kps: i + 6,
            })
        }
    }
}

/// Greedy non-maximum suppression; the result is sorted by confidence.
fn nms(mut boxes: Vec<BoundingBox>, iou_threshold: f32) -> Vec<BoundingBox> {
    boxes.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut kept: Vec<BoundingBox> = Vec::new();
    for candidate in boxes {
        if kept.iter().all(|k| iou(k, &candidate) <= iou_threshold) {
            kept.push(candidate);
        }
    }
    kept
}

fn iou(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let ix = ((a.x + a.width).min(b.x + b.width) - a.x.max(b.x)).max(0.0);
    let iy = ((a.y + a.height).min(b.y + b.height) - a.y.max(b.y)).max(0.0);
    let inter = ix * iy;
    let union = a.width * a.height + b.width * b.height - inter;
    if union > 0.0 {
        inter / union
    } else {
        0.0
    }
}
