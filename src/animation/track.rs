use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ScoreError, ScoreResult};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

/// Step values (flags, indices) never blend; only [`InterpMode::Hold`] samples them.
impl Lerp for bool {
    fn lerp(a: &Self, _b: &Self, _t: f64) -> Self {
        *a
    }
}

impl Lerp for i64 {
    fn lerp(a: &Self, _b: &Self, _t: f64) -> Self {
        *a
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum InterpMode {
    /// Value changes exactly at each key and is held until the next one.
    Hold,
    /// Linear between bracketing keys, clamped to the boundary keys outside them.
    Linear,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe<T> {
    pub frame: FrameIndex,
    pub value: T,
}

/// A sampled keyframe track over integer frames.
///
/// Keys must be sorted by frame; equal frames are allowed and the later key wins.
#[derive(Clone, Debug)]
pub struct Keyframes<T> {
    keys: Vec<Keyframe<T>>,
    mode: InterpMode,
    before: Option<T>, // Hold only: value before the first key
}

impl<T> Keyframes<T>
where
    T: Lerp + Clone,
{
    pub fn new(keys: Vec<Keyframe<T>>, mode: InterpMode) -> ScoreResult<Self> {
        if keys.is_empty() {
            return Err(ScoreError::config("keyframe track needs at least one key"));
        }
        if !keys.windows(2).all(|w| w[0].frame <= w[1].frame) {
            return Err(ScoreError::config("keyframe keys must be sorted by frame"));
        }
        Ok(Self {
            keys,
            mode,
            before: None,
        })
    }

    /// Build a track from parallel frame and value lists.
    pub fn from_pairs(
        frames: &[FrameIndex],
        values: impl IntoIterator<Item = T>,
        mode: InterpMode,
    ) -> ScoreResult<Self> {
        let values: Vec<T> = values.into_iter().collect();
        if values.len() != frames.len() {
            return Err(ScoreError::config(format!(
                "expected {} keyframe values, got {}",
                frames.len(),
                values.len()
            )));
        }
        let keys = frames
            .iter()
            .zip(values)
            .map(|(&frame, value)| Keyframe { frame, value })
            .collect();
        Self::new(keys, mode)
    }

    /// Value returned by a hold track for frames before its first key.
    pub fn with_before(mut self, value: T) -> Self {
        self.before = Some(value);
        self
    }

    pub fn keys(&self) -> &[Keyframe<T>] {
        &self.keys
    }

    pub fn sample(&self, frame: FrameIndex) -> T {
        let idx = self.keys.partition_point(|k| k.frame <= frame);

        if idx == 0 {
            return match (self.mode, self.before.as_ref()) {
                (InterpMode::Hold, Some(before)) => before.clone(),
                _ => self.keys[0].value.clone(),
            };
        }
        if idx >= self.keys.len() {
            return self.keys[self.keys.len() - 1].value.clone();
        }

        let a = &self.keys[idx - 1];
        match self.mode {
            InterpMode::Hold => a.value.clone(),
            InterpMode::Linear => {
                let b = &self.keys[idx];
                // a.frame <= frame < b.frame, so the span is never zero here.
                let span = (b.frame.0 - a.frame.0) as f64;
                let t = (frame.0 - a.frame.0) as f64 / span;
                T::lerp(&a.value, &b.value, t)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/track.rs"]
mod tests;
