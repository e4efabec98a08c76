//! Frame-by-frame evaluation of bar highlights over a score page.
//!
//! [`TimelineBuilder`] turns a page, its bar layout, bar timestamps and filter specs into an
//! immutable [`Timeline`]. A [`FrameStream`] then walks frames forward: the [`ActiveBarWindow`]
//! picks the live bars, each [`BarOverlay`] runs its filters, the [`FrameCompositor`] blends the
//! results onto the page and the [`ViewportTracker`] says which rows are on screen.

pub mod builder;
pub mod compositor;
pub mod overlay;
pub mod stream;
pub mod viewport;
pub mod window;

pub use builder::{Timeline, TimelineBuilder, TimelineOpts};
pub use compositor::FrameCompositor;
pub use overlay::BarOverlay;
pub use stream::{FrameStream, FrameView};
pub use viewport::ViewportTracker;
pub use window::ActiveBarWindow;
