use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::encode::sink::{FrameSink, SinkConfig, WindowFrame};
use crate::foundation::core::FrameRange;
use crate::foundation::error::{ScoreError, ScoreResult};
use crate::timeline::{FrameStream, Timeline};

/// Shared stop flag for long renders. Checked once per frame boundary.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Options controlling `RenderSession` range rendering behavior.
#[derive(Clone, Debug, Default)]
pub struct RenderSessionOpts {
    /// Run the filter chains of a frame's bars in parallel (rayon). Frames stay sequential.
    pub parallel_bars: bool,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
    pub cancel: Option<CancelToken>,
    /// Audio file handed to the sink for muxing.
    pub audio: Option<std::path::PathBuf>,
}

/// Range render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Total frames in the requested range.
    pub frames_total: u64,
    /// Frames composited and pushed to the sink.
    pub frames_rendered: u64,
    /// The run stopped early on its cancel token.
    pub cancelled: bool,
}

/// Drives a [`FrameStream`] over a range and hands each window to a sink.
pub struct RenderSession<'a> {
    timeline: &'a Timeline,
    opts: RenderSessionOpts,
}

impl<'a> RenderSession<'a> {
    pub fn new(timeline: &'a Timeline, opts: RenderSessionOpts) -> Self {
        Self { timeline, opts }
    }

    /// Render the timeline's whole frame range.
    pub fn render_all(&self, sink: &mut dyn FrameSink) -> ScoreResult<RenderStats> {
        self.render_range(self.timeline.frame_range(), sink)
    }

    /// Render `range` and stream the cropped windows into `sink` in frame order.
    ///
    /// A cancelled run still finalizes the sink; no partially composited frame is ever pushed.
    #[tracing::instrument(skip(self, sink), fields(start = range.start.0, end = range.end.0))]
    pub fn render_range(
        &self,
        range: FrameRange,
        sink: &mut dyn FrameSink,
    ) -> ScoreResult<RenderStats> {
        let full = self.timeline.frame_range();
        if !full.contains(range.start) || !full.contains(range.end) {
            return Err(ScoreError::range(format!(
                "render range {}..={} is outside the timeline {}..={}",
                range.start.0, range.end.0, full.start.0, full.end.0
            )));
        }

        let pool = if self.opts.parallel_bars {
            Some(build_thread_pool(self.opts.threads)?)
        } else {
            None
        };
        match pool {
            Some(pool) => pool.install(|| self.run(range, sink)),
            None => self.run(range, sink),
        }
    }

    fn run(&self, range: FrameRange, sink: &mut dyn FrameSink) -> ScoreResult<RenderStats> {
        let (width, height) = self.timeline.window_size();
        sink.begin(SinkConfig {
            width,
            height,
            fps: self.timeline.fps(),
            audio: self.opts.audio.clone(),
        })?;
        tracing::info!(frames = range.len_frames(), width, height, "render started");

        let mut stats = RenderStats {
            frames_total: range.len_frames(),
            ..RenderStats::default()
        };
        let mut stream = FrameStream::new(self.timeline).with_parallel_bars(self.opts.parallel_bars);
        for frame in range.iter() {
            if self.opts.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                tracing::warn!(frame = frame.0, "render cancelled");
                stats.cancelled = true;
                break;
            }

            let view = stream.advance(frame)?;
            let out = WindowFrame {
                width,
                height,
                top_row: view.top_row,
                data: view.window_rgb(height),
            };
            sink.push_frame(frame, &out)?;
            stats.frames_rendered += 1;
        }

        sink.end()?;
        tracing::info!(
            rendered = stats.frames_rendered,
            cancelled = stats.cancelled,
            "render finished"
        );
        Ok(stats)
    }
}

fn build_thread_pool(threads: Option<usize>) -> ScoreResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ScoreError::config(
            "render_range 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ScoreError::render(format!("failed to build rayon thread pool: {e}")))
}
