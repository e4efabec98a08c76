use crate::animation::track::{InterpMode, Keyframes};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ScoreError, ScoreResult};

/// Top row of the visible window as a function of frame.
///
/// Linear between `(frame, top_row)` anchors, held at the nearest anchor outside them, then
/// clamped to `[0, page_height - window_height]`.
#[derive(Clone, Debug)]
pub struct ViewportTracker {
    track: Keyframes<f64>,
    furthest_row: u32,
    window_height: u32,
}

impl ViewportTracker {
    pub fn new(
        anchors: &[(FrameIndex, u32)],
        page_height: u32,
        window_height: u32,
    ) -> ScoreResult<Self> {
        if anchors.is_empty() {
            return Err(ScoreError::config("viewport needs at least one anchor"));
        }
        if window_height == 0 {
            return Err(ScoreError::config("window height must be > 0"));
        }
        let mut anchors = anchors.to_vec();
        anchors.sort_by_key(|a| a.0);
        let frames: Vec<FrameIndex> = anchors.iter().map(|a| a.0).collect();
        let track = Keyframes::from_pairs(
            &frames,
            anchors.iter().map(|a| f64::from(a.1)),
            InterpMode::Linear,
        )?;
        Ok(Self {
            track,
            furthest_row: page_height.saturating_sub(window_height),
            window_height,
        })
    }

    pub fn window_height(&self) -> u32 {
        self.window_height
    }

    pub fn furthest_row(&self) -> u32 {
        self.furthest_row
    }

    /// Whether `frame` lies between the first and last anchor.
    pub fn in_domain(&self, frame: FrameIndex) -> bool {
        let keys = self.track.keys();
        match (keys.first(), keys.last()) {
            (Some(a), Some(b)) => a.frame <= frame && frame <= b.frame,
            _ => false,
        }
    }

    pub fn top_row(&self, frame: FrameIndex) -> u32 {
        let row = self.track.sample(frame).max(0.0) as u32;
        row.min(self.furthest_row)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/viewport.rs"]
mod tests;
