use crate::color::Rgb8;

/// Per-bar overlay buffers: straight RGB colour plus a separate opacity plane.
///
/// Both planes are row-major over the bar's highlight rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct BarCanvas {
    pub width: u32,
    pub height: u32,
    pub color: Vec<Rgb8>,
    pub opacity: Vec<f64>,
}

impl BarCanvas {
    /// A blank canvas: white, fully transparent.
    pub fn blank(width: u32, height: u32) -> Self {
        let n = width as usize * height as usize;
        Self {
            width,
            height,
            color: vec![Rgb8::WHITE; n],
            opacity: vec![0.0; n],
        }
    }

    pub fn reset(&mut self) {
        self.color.fill(Rgb8::WHITE);
        self.opacity.fill(0.0);
    }

    /// Overwrite every pixel with one colour and opacity.
    pub fn fill(&mut self, color: Rgb8, opacity: f64) {
        self.color.fill(color);
        self.opacity.fill(opacity);
    }

    pub fn index(&self, row: u32, col: u32) -> usize {
        row as usize * self.width as usize + col as usize
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity.iter().all(|&o| o <= 0.0)
    }
}
