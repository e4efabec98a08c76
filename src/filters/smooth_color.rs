use crate::animation::track::{InterpMode, Keyframes};
use crate::canvas::BarCanvas;
use crate::color::{Hsluv, Rgb8};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ScoreError, ScoreResult};

/// Paints the whole bar with one colour and opacity, both keyframed on the filter's anchors.
///
/// Opacity blends linearly; colour blends in HSLuv. Outside the anchor range the first/last
/// keyframe value is held. Runs as an overwrite of whatever earlier filters produced.
#[derive(Clone, Debug)]
pub struct SmoothColorOpacity {
    anchors: Vec<FrameIndex>,
    color: Keyframes<Hsluv>,
    opacity: Keyframes<f64>,
}

impl SmoothColorOpacity {
    /// `colors[i]` and `opacities[i]` apply at `anchors[i]` (anchors already sorted).
    pub fn new(anchors: Vec<FrameIndex>, colors: &[Rgb8], opacities: &[f64]) -> ScoreResult<Self> {
        if colors.len() != anchors.len() || opacities.len() != anchors.len() {
            return Err(ScoreError::config(format!(
                "smooth color/opacity filter has {} anchors but {} colors and {} opacities",
                anchors.len(),
                colors.len(),
                opacities.len()
            )));
        }
        // Values outside [0, 1] are kept as given; the compositor clamps at blend time.
        if let Some(bad) = opacities.iter().find(|o| !o.is_finite()) {
            return Err(ScoreError::config(format!(
                "opacity keyframes must be finite, got {bad}"
            )));
        }

        let color = Keyframes::from_pairs(
            &anchors,
            colors.iter().map(|&c| Hsluv::from(c)),
            InterpMode::Linear,
        )?;
        let opacity = Keyframes::from_pairs(&anchors, opacities.to_vec(), InterpMode::Linear)?;
        Ok(Self {
            anchors,
            color,
            opacity,
        })
    }

    pub fn anchors(&self) -> &[FrameIndex] {
        &self.anchors
    }

    /// Colour and opacity at `frame`.
    pub fn sample(&self, frame: FrameIndex) -> (Rgb8, f64) {
        (
            Rgb8::from(self.color.sample(frame)),
            self.opacity.sample(frame),
        )
    }

    pub fn apply(&self, canvas: &mut BarCanvas, frame: FrameIndex) {
        let (color, opacity) = self.sample(frame);
        canvas.fill(color, opacity);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/smooth_color.rs"]
mod tests;
