//! Face alignment via 4-DOF similarity transform.
//!
//! Maps the five detected landmarks onto the InsightFace reference layout and
//! resamples the face into a 112×112 crop for the recognizer.

use crate::frame::Frame;

/// ArcFace reference landmarks for a 112×112 output.
pub(crate) const REFERENCE_LANDMARKS_112: [(f32, f32); 5] = [
    (38.2946, 51.6963), // left eye
    (73.5318, 51.5014), // right eye
    (56.0252, 71.7366), // nose
    (41.5493, 92.3655), // left mouth
    (70.7299, 92.2041), // right mouth
];

pub(crate) const ALIGNED_SIZE: usize = 112;

/// `q = [a -b; b a] * p + t`: uniform scale, rotation, translation.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Similarity {
    a: f32,
    b: f32,
    tx: f32,
    ty: f32,
}

impl Similarity {
    /// Least-squares fit from `src` to `dst` (closed form on centred points).
    fn estimate(src: &[(f32, f32); 5], dst: &[(f32, f32); 5]) -> Self {
        let n = src.len() as f32;
        let centroid = |pts: &[(f32, f32); 5]| {
            let (sx, sy) = pts.iter().fold((0.0, 0.0), |(ax, ay), &(x, y)| (ax + x, ay + y));
            (sx / n, sy / n)
        };
        let (smx, smy) = centroid(src);
        let (dmx, dmy) = centroid(dst);

        let mut dot = 0.0f32;
        let mut cross = 0.0f32;
        let mut norm = 0.0f32;
        for (&(sx, sy), &(dx, dy)) in src.iter().zip(dst.iter()) {
            let (px, py) = (sx - smx, sy - smy);
            let (qx, qy) = (dx - dmx, dy - dmy);
            dot += px * qx + py * qy;
            cross += px * qy - py * qx;
            norm += px * px + py * py;
        }

        // Degenerate landmarks (all coincident): translate only.
        let (a, b) = if norm > 1e-12 {
            (dot / norm, cross / norm)
        } else {
            (1.0, 0.0)
        };

        Self {
            a,
            b,
            tx: dmx - (a * smx - b * smy),
            ty: dmy - (b * smx + a * smy),
        }
    }

    #[cfg(test)]
    fn apply(&self, (x, y): (f32, f32)) -> (f32, f32) {
        (
            self.a * x - self.b * y + self.tx,
            self.b * x + self.a * y + self.ty,
        )
    }

    /// Map a destination point back to source space, or `None` if the
    /// transform collapses everything to a point.
    fn invert(&self, (x, y): (f32, f32)) -> Option<(f32, f32)> {
        let det = self.a * self.a + self.b * self.b;
        if det < 1e-12 {
            return None;
        }
        let (dx, dy) = (x - self.tx, y - self.ty);
        Some((
            (self.a * dx + self.b * dy) / det,
            (-self.b * dx + self.a * dy) / det,
        ))
    }
}

/// Align a detected face to a canonical 112×112 grayscale crop.
pub fn align_face(frame: &Frame, landmarks: &[(f32, f32); 5]) -> Vec<u8> {
    let transform = Similarity::estimate(landmarks, &REFERENCE_LANDMARKS_112);
    let mut out = vec![0u8; ALIGNED_SIZE * ALIGNED_SIZE];

    for oy in 0..ALIGNED_SIZE {
        for ox in 0..ALIGNED_SIZE {
            let Some((sx, sy)) = transform.invert((ox as f32, oy as f32)) else {
                continue;
            };
            let val = frame.sample_or_black(sx, sy);
            out[oy * ALIGNED_SIZE + ox] = val.round().clamp(0.0, 255.0) as u8;
        }
    }

    out
}
