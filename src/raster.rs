//! Page raster and the ink mask derived from it.

use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{ScoreError, ScoreResult};

/// Default luminance threshold (0..255) below which a page pixel counts as printed ink.
pub const DEFAULT_INK_THRESHOLD: u8 = 32;

/// Row-major, tightly packed RGB8 page image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRaster {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PageRaster {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> ScoreResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(3))
            .ok_or_else(|| ScoreError::config("page raster size overflow"))?;
        if width == 0 || height == 0 || data.len() != expected {
            return Err(ScoreError::config(format!(
                "page raster must be non-empty with width*height*3 bytes, got {}x{} and {} bytes",
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Solid colour page, mostly useful for tests and previews.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> ScoreResult<Self> {
        let data = rgb.repeat(width as usize * height as usize);
        Self::new(width, height, data)
    }

    pub fn from_image(img: &image::DynamicImage) -> ScoreResult<Self> {
        let rgb = img.to_rgb8();
        let (w, h) = rgb.dimensions();
        Self::new(w, h, rgb.into_raw())
    }

    pub fn from_path(path: impl AsRef<Path>) -> ScoreResult<Self> {
        let path = path.as_ref();
        let img = image::open(path)
            .with_context(|| format!("decode page image '{}'", path.display()))?;
        Self::from_image(&img)
    }

    pub(crate) fn offset(&self, row: u32, col: u32) -> usize {
        (row as usize * self.width as usize + col as usize) * 3
    }

    pub fn pixel(&self, row: u32, col: u32) -> [u8; 3] {
        let i = self.offset(row, col);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Copy `height` rows starting at `top_row` (clamped to the page).
    pub fn crop_rows(&self, top_row: u32, height: u32) -> Vec<u8> {
        let top = top_row.min(self.height);
        let bottom = top.saturating_add(height).min(self.height);
        let stride = self.width as usize * 3;
        self.data[top as usize * stride..bottom as usize * stride].to_vec()
    }

    pub fn to_image(&self) -> ScoreResult<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| ScoreError::render("page raster does not match its dimensions"))
    }
}

/// `true` wherever the page already carries printed content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InkMask {
    pub width: u32,
    pub height: u32,
    bits: Vec<bool>,
}

impl InkMask {
    /// Ink where luminance `0.2125 R + 0.7154 G + 0.0721 B` falls below `threshold`.
    pub fn from_raster(raster: &PageRaster, threshold: u8) -> Self {
        let bits = raster
            .data
            .chunks_exact(3)
            .map(|px| {
                let y = 0.2125 * f64::from(px[0])
                    + 0.7154 * f64::from(px[1])
                    + 0.0721 * f64::from(px[2]);
                y < f64::from(threshold)
            })
            .collect();
        Self {
            width: raster.width,
            height: raster.height,
            bits,
        }
    }

    pub fn is_ink(&self, row: u32, col: u32) -> bool {
        self.bits[row as usize * self.width as usize + col as usize]
    }
}
