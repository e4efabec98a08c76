use crate::animation::track::{InterpMode, Keyframes};
use crate::canvas::BarCanvas;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::ScoreResult;
use crate::foundation::math::{inside_disc, ratio_radius};

/// Clears the bar's four corners outside a rounded rectangle while its on/off schedule says so.
///
/// Anchors alternate on, off, on, ... starting with "on" at the first anchor; before the first
/// anchor the mask is off, after the last it keeps the last anchor's state.
#[derive(Clone, Debug)]
pub struct RoundedRectMask {
    anchors: Vec<FrameIndex>,
    active: Keyframes<bool>,
    corners: Vec<bool>,
    radius: u32,
}

impl RoundedRectMask {
    pub fn new(
        anchors: Vec<FrameIndex>,
        radius_ratio: f64,
        width: u32,
        height: u32,
    ) -> ScoreResult<Self> {
        // From `2 * (w + h)` on, every pixel lies outside both bands and all four corner discs.
        let cap = width.saturating_add(height).saturating_mul(2);
        let radius = ratio_radius(height, radius_ratio, cap, "rounded rectangle")?;
        let active = Keyframes::from_pairs(
            &anchors,
            (0..anchors.len()).map(|i| i % 2 == 0),
            InterpMode::Hold,
        )?
        .with_before(false);

        Ok(Self {
            corners: corner_mask(width, height, radius),
            anchors,
            active,
            radius,
        })
    }

    pub fn anchors(&self) -> &[FrameIndex] {
        &self.anchors
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn is_active(&self, frame: FrameIndex) -> bool {
        self.active.sample(frame)
    }

    /// `true` for pixels cut away by the rounded corners.
    pub fn corners(&self) -> &[bool] {
        &self.corners
    }

    pub fn apply(&self, canvas: &mut BarCanvas, frame: FrameIndex) {
        if !self.is_active(frame) {
            return;
        }
        for (op, &cut) in canvas.opacity.iter_mut().zip(&self.corners) {
            if cut {
                *op = 0.0;
            }
        }
    }
}

/// Corner pixels lying outside four quarter discs of radius `r` placed in the canvas corners.
fn corner_mask(width: u32, height: u32, r: u32) -> Vec<bool> {
    let (w, h, r) = (i64::from(width), i64::from(height), i64::from(r));
    if r == 0 {
        return vec![false; (w * h) as usize];
    }
    let centers = [(r - 1, r - 1), (h - r, r - 1), (h - r, w - r), (r - 1, w - r)];

    let mut out = Vec::with_capacity((w * h) as usize);
    for y in 0..h {
        let in_row_band = r - 1 <= y && y < h - r + 1;
        for x in 0..w {
            let in_col_band = r - 1 <= x && x < w - r + 1;
            let in_disc = centers
                .iter()
                .any(|&(cy, cx)| inside_disc(y - cy, x - cx, r));
            out.push(!(in_row_band || in_col_band || in_disc));
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/filters/rounded_rect.rs"]
mod tests;
