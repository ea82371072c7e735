//! Grayscale frames decoded from image files, plus bilinear sampling.

use image::{GrayImage, ImageReader};
use std::path::Path;

/// An 8-bit grayscale image held in row-major order.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Luma pixel data (width * height bytes).
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("invalid frame buffer: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

impl Frame {
    /// Build a frame from raw luma bytes, checking the buffer size.
    #[cfg(test)]
    pub(crate) fn new(data: Vec<u8>, width: u32, height: u32) -> Result<Self, FrameError> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(FrameError::InvalidLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Load an image file and convert it to grayscale.
    ///
    /// The format is sniffed from the file content, so a PNG saved with a
    /// `.jpg` name still decodes.
    pub fn load(path: &Path) -> Result<Self, FrameError> {
        let display = path.display().to_string();
        let reader = ImageReader::open(path)
            .and_then(|r| r.with_guessed_format())
            .map_err(|source| FrameError::Io {
                path: display.clone(),
                source,
            })?;
        let image = reader.decode().map_err(|source| FrameError::Decode {
            path: display,
            source,
        })?;
        Ok(Self::from(image.to_luma8()))
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Bilinear sample at a sub-pixel position, clamped to the frame edges.
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let w = self.width as usize;
        let h = self.height as usize;
        let x = x.clamp(0.0, (w - 1) as f32);
        let y = y.clamp(0.0, (h - 1) as f32);

        let x0 = x.floor() as usize;
        let y0 = y.floor() as usize;
        let x1 = (x0 + 1).min(w - 1);
        let y1 = (y0 + 1).min(h - 1);
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;

        let at = |px: usize, py: usize| self.data[py * w + px] as f32;
        let top = at(x0, y0) * (1.0 - fx) + at(x1, y0) * fx;
        let bottom = at(x0, y1) * (1.0 - fx) + at(x1, y1) * fx;
        top * (1.0 - fy) + bottom * fy
    }

    /// Like [`sample`](Self::sample), but positions outside the frame read as black.
    pub fn sample_or_black(&self, x: f32, y: f32) -> f32 {
        let inside = x >= 0.0
            && y >= 0.0
            && x <= (self.width as f32 - 1.0)
            && y <= (self.height as f32 - 1.0);
        if inside {
            self.sample(x, y)
        } else {
            0.0
        }
    }
}

impl From<GrayImage> for Frame {
    fn from(image: GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            data: image.into_raw(),
            width,
            height,
        }
    }
}
