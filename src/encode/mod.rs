//! Output sinks.
//!
//! Sinks consume cropped viewport frames in timeline order and are driven by
//! `RenderSession::render_range`.

/// `ffmpeg`-based video output.
pub mod ffmpeg;
/// Numbered PNG files.
pub mod png;
/// Frame sink trait and the in-memory sink.
pub mod sink;
