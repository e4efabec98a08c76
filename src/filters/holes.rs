use crate::animation::track::{InterpMode, Keyframes};
use crate::canvas::BarCanvas;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ScoreError, ScoreResult};
use crate::foundation::math::{Rng64, inside_disc, ratio_radius};

/// Punches one circular hole per anchor interval into the bar's opacity.
///
/// With `n + 1` anchors there are `n` holes. Between anchor `i` and anchor `i + 1` the pixels of
/// hole `i` have their opacity multiplied by `multipliers[i]`; from the last anchor on (and before
/// the first) nothing happens. Hole centres are drawn once from the seed.
#[derive(Clone, Debug)]
pub struct RandomOpacityHoles {
    anchors: Vec<FrameIndex>,
    interval: Keyframes<i64>,
    multipliers: Vec<f64>,
    centers: Vec<(u32, u32)>,
    holes: Vec<Vec<usize>>,
    radius: u32,
}

impl RandomOpacityHoles {
    pub fn new(
        anchors: Vec<FrameIndex>,
        multipliers: Vec<f64>,
        radius_ratio: f64,
        seed: u64,
        width: u32,
        height: u32,
    ) -> ScoreResult<Self> {
        if anchors.len() < 2 {
            return Err(ScoreError::config(
                "random opacity holes need at least two beat anchors",
            ));
        }
        let n = anchors.len() - 1;
        if multipliers.len() != n {
            return Err(ScoreError::config(format!(
                "random opacity holes with {} anchors need {n} opacity multipliers, got {}",
                anchors.len(),
                multipliers.len()
            )));
        }
        if let Some(bad) = multipliers.iter().find(|m| !m.is_finite() || **m < 0.0) {
            return Err(ScoreError::config(format!(
                "hole opacity multipliers must be finite and >= 0, got {bad}"
            )));
        }
        // From `w + h` on, every hole covers the whole canvas.
        let cap = width.saturating_add(height);
        let radius = ratio_radius(height, radius_ratio, cap, "hole")?;

        // All rows are drawn before any column.
        let mut rng = Rng64::new(seed);
        let rows: Vec<u32> = (0..n).map(|_| scaled(&mut rng, height)).collect();
        let cols: Vec<u32> = (0..n).map(|_| scaled(&mut rng, width)).collect();
        let centers: Vec<(u32, u32)> = rows.into_iter().zip(cols).collect();
        let holes = centers
            .iter()
            .map(|&c| disc_pixels(c, radius, width, height))
            .collect();

        let interval = Keyframes::from_pairs(&anchors, 0..=n as i64, InterpMode::Hold)?
            .with_before(-1);

        Ok(Self {
            anchors,
            interval,
            multipliers,
            centers,
            holes,
            radius,
        })
    }

    pub fn anchors(&self) -> &[FrameIndex] {
        &self.anchors
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// `(row, col)` of each hole centre in bar-local pixels.
    pub fn hole_centers(&self) -> &[(u32, u32)] {
        &self.centers
    }

    /// Canvas indices covered by hole `i`.
    pub fn hole_pixels(&self, i: usize) -> &[usize] {
        self.holes.get(i).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Index of the hole open at `frame`, if any.
    pub fn open_hole(&self, frame: FrameIndex) -> Option<usize> {
        let i = self.interval.sample(frame);
        (0..self.holes.len() as i64)
            .contains(&i)
            .then_some(i as usize)
    }

    pub fn apply(&self, canvas: &mut BarCanvas, frame: FrameIndex) {
        let Some(i) = self.open_hole(frame) else {
            return;
        };
        let m = self.multipliers[i];
        for &px in &self.holes[i] {
            canvas.opacity[px] *= m;
        }
    }
}

fn scaled(rng: &mut Rng64, extent: u32) -> u32 {
    ((rng.next_f64_01() * f64::from(extent)) as u32).min(extent.saturating_sub(1))
}

fn disc_pixels((cy, cx): (u32, u32), r: u32, width: u32, height: u32) -> Vec<usize> {
    if r == 0 {
        return Vec::new();
    }
    let (cy, cx, r) = (i64::from(cy), i64::from(cx), i64::from(r));
    let rows = (cy - r).max(0)..=(cy + r).min(i64::from(height) - 1);
    let mut out = Vec::new();
    for y in rows {
        for x in (cx - r).max(0)..=(cx + r).min(i64::from(width) - 1) {
            if inside_disc(y - cy, x - cx, r) {
                out.push((y * i64::from(width) + x) as usize);
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/filters/holes.rs"]
mod tests;
