use std::path::PathBuf;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ScoreError, ScoreResult};

/// One output frame: the visible window of the composited page, RGB8 row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowFrame {
    pub width: u32,
    pub height: u32,
    /// Page row shown at the top of the window.
    pub top_row: u32,
    pub data: Vec<u8>,
}

impl WindowFrame {
    pub fn to_image(&self) -> ScoreResult<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| ScoreError::render("window frame does not match its dimensions"))
    }
}

/// Configuration provided to a [`FrameSink`] at the start of a range render.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    pub fps: Fps,
    /// Audio file muxed alongside the video, for sinks that support it.
    pub audio: Option<PathBuf>,
}

/// Sink contract for consuming rendered frames in timeline order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order within the
/// requested render range.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> ScoreResult<()>;
    /// Push one frame in strictly increasing timeline order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &WindowFrame) -> ScoreResult<()>;
    /// Called once after the last frame is pushed, including after a cancelled run.
    fn end(&mut self) -> ScoreResult<()>;
}

/// Rejects frames that are not strictly after the previous one.
pub(crate) fn check_order(last: &mut Option<FrameIndex>, idx: FrameIndex) -> ScoreResult<()> {
    if let Some(prev) = *last
        && idx <= prev
    {
        return Err(ScoreError::render(format!(
            "sink received out-of-order frame {} after {}",
            idx.0, prev.0
        )));
    }
    *last = Some(idx);
    Ok(())
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    ended: bool,
    /// Frames in timeline order.
    pub(crate) frames: Vec<(FrameIndex, WindowFrame)>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg.clone()
    }

    pub fn frames(&self) -> &[(FrameIndex, WindowFrame)] {
        &self.frames
    }

    /// Whether `end` has been called since the last `begin`.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ScoreResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.last_idx = None;
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &WindowFrame) -> ScoreResult<()> {
        check_order(&mut self.last_idx, idx)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> ScoreResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
