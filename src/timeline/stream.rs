use crate::foundation::core::FrameIndex;
use crate::foundation::error::ScoreResult;
use crate::raster::PageRaster;
use crate::timeline::builder::Timeline;
use crate::timeline::compositor::FrameCompositor;
use crate::timeline::overlay::BarOverlay;
use crate::timeline::window::ActiveBarWindow;

/// Borrowed view of the frame the stream is positioned on.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    pub frame: FrameIndex,
    /// Full composited page.
    pub page: &'a PageRaster,
    /// First page row of the visible window.
    pub top_row: u32,
}

impl FrameView<'_> {
    /// Rows `top_row..top_row + window_height` of the page, RGB8.
    pub fn window_rgb(&self, window_height: u32) -> Vec<u8> {
        self.page.crop_rows(self.top_row, window_height)
    }
}

/// Forward-only frame cursor over a [`Timeline`].
///
/// Frames must be requested in strictly increasing order; going back requires [`restart`], which
/// rebuilds all per-run state from the timeline.
///
/// [`restart`]: FrameStream::restart
#[derive(Debug)]
pub struct FrameStream<'a> {
    timeline: &'a Timeline,
    window: ActiveBarWindow,
    compositor: FrameCompositor,
    current: Option<FrameIndex>,
    top_row: u32,
    parallel_bars: bool,
    warned_viewport: bool,
}

impl<'a> FrameStream<'a> {
    pub fn new(timeline: &'a Timeline) -> Self {
        Self {
            timeline,
            window: active_window(timeline),
            compositor: FrameCompositor::new(timeline.page()),
            current: None,
            top_row: 0,
            parallel_bars: false,
            warned_viewport: false,
        }
    }

    /// Evaluate the bars of a frame on the current rayon pool.
    pub fn with_parallel_bars(mut self, on: bool) -> Self {
        self.parallel_bars = on;
        self
    }

    pub fn timeline(&self) -> &'a Timeline {
        self.timeline
    }

    pub fn current(&self) -> Option<FrameIndex> {
        self.current
    }

    /// Bar indices live on the current frame.
    pub fn active_bars(&self) -> &[usize] {
        self.window.active()
    }

    pub fn compositor(&self) -> &FrameCompositor {
        &self.compositor
    }

    pub fn raster(&self) -> &PageRaster {
        self.compositor.output()
    }

    pub fn top_row(&self) -> u32 {
        self.top_row
    }

    pub fn view(&self) -> Option<FrameView<'_>> {
        self.current.map(|frame| FrameView {
            frame,
            page: self.compositor.output(),
            top_row: self.top_row,
        })
    }

    /// Composite `frame`. Fails with a range error unless `frame` is after the current one.
    pub fn advance(&mut self, frame: FrameIndex) -> ScoreResult<FrameView<'_>> {
        let timeline = self.timeline;
        let active = self.window.advance(frame)?;
        let overlays = timeline.overlays();
        let bars: Vec<&BarOverlay> = active.iter().map(|&i| &overlays[i]).collect();
        self.compositor.composite(
            timeline.page(),
            timeline.ink(),
            frame,
            &bars,
            self.parallel_bars,
        );

        let viewport = timeline.viewport();
        if !viewport.in_domain(frame) && !self.warned_viewport {
            tracing::warn!(
                frame = frame.0,
                "frame outside the viewport anchors, holding the nearest anchor"
            );
            self.warned_viewport = true;
        }
        self.top_row = viewport.top_row(frame);
        self.current = Some(frame);

        Ok(FrameView {
            frame,
            page: self.compositor.output(),
            top_row: self.top_row,
        })
    }

    /// Advance to the next frame of the timeline range; `None` once past its end.
    pub fn step(&mut self) -> Option<ScoreResult<FrameView<'_>>> {
        let range = self.timeline.frame_range();
        let next = match self.current {
            None => range.start,
            Some(f) => FrameIndex(f.0 + 1),
        };
        if next > range.end {
            return None;
        }
        Some(self.advance(next))
    }

    /// Drop all per-run state so frames can be requested from the beginning again.
    pub fn restart(&mut self) {
        self.window = active_window(self.timeline);
        self.compositor = FrameCompositor::new(self.timeline.page());
        self.current = None;
        self.top_row = 0;
        self.warned_viewport = false;
    }
}

fn active_window(timeline: &Timeline) -> ActiveBarWindow {
    ActiveBarWindow::new(
        timeline
            .overlays()
            .iter()
            .map(|o| (o.actual_start(), o.actual_end()))
            .collect(),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/stream.rs"]
mod tests;
