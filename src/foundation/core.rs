use crate::foundation::error::{ScoreError, ScoreResult};

/// Timeline frame index.
///
/// Signed: beat anchors are allowed to resolve before the first musical frame.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub i64);

/// Inclusive frame range `[start, end]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    pub start: FrameIndex,
    pub end: FrameIndex, // inclusive
}

impl FrameRange {
    pub fn new(start: FrameIndex, end: FrameIndex) -> ScoreResult<Self> {
        if start.0 > end.0 {
            return Err(ScoreError::range("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    pub fn len_frames(self) -> u64 {
        (self.end.0 - self.start.0) as u64 + 1
    }

    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 <= self.end.0
    }

    pub fn iter(self) -> impl Iterator<Item = FrameIndex> {
        (self.start.0..=self.end.0).map(FrameIndex)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> ScoreResult<Self> {
        if den == 0 {
            return Err(ScoreError::config("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ScoreError::config("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frames_to_secs(self, frames: i64) -> f64 {
        (frames as f64) * f64::from(self.den) / f64::from(self.num)
    }

    pub fn secs_to_frames_floor(self, secs: f64) -> i64 {
        (secs * self.as_f64()).floor() as i64
    }
}

/// Axis-aligned pixel rectangle with inclusive bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl PixelRect {
    pub fn new(top: u32, bottom: u32, left: u32, right: u32) -> ScoreResult<Self> {
        if top > bottom || left > right {
            return Err(ScoreError::geometry(format!(
                "degenerate rect rows {top}..={bottom}, cols {left}..={right}"
            )));
        }
        Ok(Self {
            top,
            bottom,
            left,
            right,
        })
    }

    pub fn height(self) -> u32 {
        self.bottom - self.top + 1
    }

    pub fn width(self) -> u32 {
        self.right - self.left + 1
    }

    pub fn contains(self, row: u32, col: u32) -> bool {
        self.top <= row && row <= self.bottom && self.left <= col && col <= self.right
    }

    pub fn intersects(self, other: PixelRect) -> bool {
        self.top <= other.bottom
            && other.top <= self.bottom
            && self.left <= other.right
            && other.left <= self.right
    }
}
