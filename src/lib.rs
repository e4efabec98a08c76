//! Scorelight turns a scanned sheet-music page into a "follow the bars" video.
//!
//! Each bar of the page gets a highlight driven by a chain of filters keyed to beat positions
//! inside the bar. Frames are produced strictly in order:
//!
//! 1. **Build**: page raster + [`PageLayout`] + bar timestamps + [`FilterDocument`] ->
//!    [`Timeline`] (via [`TimelineBuilder`]). All validation happens here.
//! 2. **Stream**: a [`FrameStream`] advances frame by frame, selecting live bars, running their
//!    filters and compositing them over the page.
//! 3. **Crop and encode**: [`RenderSession`] cuts the viewport window out of each composited page
//!    and pushes it into a [`FrameSink`] (PNG files, or the system `ffmpeg` binary).
//!
//! Output is a pure function of the inputs and the seed in [`TimelineOpts`].
#![forbid(unsafe_code)]

mod animation;
mod canvas;
mod color;
mod encode;
mod filters;
mod foundation;
mod layout;
mod project;
mod raster;
mod session;
mod timeline;

pub use animation::{InterpMode, Keyframe, Keyframes, Lerp};
pub use canvas::BarCanvas;
pub use color::{Hsluv, Rgb8, parse_hex};
pub use encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path};
pub use encode::png::PngSequenceSink;
pub use encode::sink::{FrameSink, InMemorySink, SinkConfig, WindowFrame};
pub use filters::spec::{HolesParams, RoundedRectParams, SmoothColorParams};
pub use filters::{
    BarFilterSpec, Filter, FilterContext, FilterDocument, FilterKind, FilterSpec, MusicalSpan,
    RandomOpacityHoles, RoundedRectMask, SmoothColorOpacity, resolve_anchors, resolve_beat,
};
pub use foundation::core::{Fps, FrameIndex, FrameRange, PixelRect};
pub use foundation::error::{ScoreError, ScoreResult};
pub use foundation::math::Rng64;
pub use layout::{Bar, BarRef, GroupBand, PageLayout, StaveGroup};
pub use project::{Project, read_timestamps};
pub use raster::{DEFAULT_INK_THRESHOLD, InkMask, PageRaster};
pub use session::render_session::{CancelToken, RenderSession, RenderSessionOpts, RenderStats};
pub use timeline::{
    ActiveBarWindow, BarOverlay, FrameCompositor, FrameStream, FrameView, Timeline,
    TimelineBuilder, TimelineOpts, ViewportTracker,
};
