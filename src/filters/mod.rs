//! Per-bar, time-varying colour/opacity generators.
//!
//! Each filter resolves its beat anchors to frames once, at construction, and is read-only from
//! then on. A bar runs its filters in registration order over one [`BarCanvas`]:
//! [`SmoothColorOpacity`] overwrites, [`RoundedRectMask`] clears corners and
//! [`RandomOpacityHoles`] multiplies.

pub mod beat;
pub mod holes;
pub mod rounded_rect;
pub mod smooth_color;
pub mod spec;

pub use beat::{MusicalSpan, resolve_anchors, resolve_beat};
pub use holes::RandomOpacityHoles;
pub use rounded_rect::RoundedRectMask;
pub use smooth_color::SmoothColorOpacity;
pub use spec::{BarFilterSpec, FilterDocument, FilterKind, FilterSpec};

use crate::canvas::BarCanvas;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::ScoreResult;

#[derive(Clone, Debug)]
pub enum Filter {
    RoundedRect(RoundedRectMask),
    SmoothColor(SmoothColorOpacity),
    Holes(RandomOpacityHoles),
}

/// What a filter needs to know about the bar it is attached to.
#[derive(Clone, Copy, Debug)]
pub struct FilterContext {
    pub span: MusicalSpan,
    pub width: u32,
    pub height: u32,
    /// Hole seed used when the descriptor does not carry one.
    pub default_seed: u64,
}

impl Filter {
    pub fn from_spec(spec: &FilterSpec, ctx: FilterContext) -> ScoreResult<Self> {
        let kind = spec.kind()?;
        let anchors = resolve_anchors(&spec.beat_anchors, ctx.span)?;
        Ok(match kind {
            FilterKind::RoundedRectangleMask => {
                let p: spec::RoundedRectParams = spec.decode_params()?;
                Self::RoundedRect(RoundedRectMask::new(
                    anchors,
                    p.radius_ratio,
                    ctx.width,
                    ctx.height,
                )?)
            }
            FilterKind::SmoothColorOpacity => {
                let p: spec::SmoothColorParams = spec.decode_params()?;
                Self::SmoothColor(SmoothColorOpacity::new(
                    anchors,
                    &p.parsed_colors()?,
                    &p.opacities,
                )?)
            }
            FilterKind::RandomOpacityHoles => {
                let p: spec::HolesParams = spec.decode_params()?;
                Self::Holes(RandomOpacityHoles::new(
                    anchors,
                    p.opacities,
                    p.radius_ratio,
                    p.seed.unwrap_or(ctx.default_seed),
                    ctx.width,
                    ctx.height,
                )?)
            }
        })
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            Self::RoundedRect(_) => FilterKind::RoundedRectangleMask,
            Self::SmoothColor(_) => FilterKind::SmoothColorOpacity,
            Self::Holes(_) => FilterKind::RandomOpacityHoles,
        }
    }

    /// Sorted anchor frames.
    pub fn anchors(&self) -> &[FrameIndex] {
        match self {
            Self::RoundedRect(f) => f.anchors(),
            Self::SmoothColor(f) => f.anchors(),
            Self::Holes(f) => f.anchors(),
        }
    }

    pub fn apply(&self, canvas: &mut BarCanvas, frame: FrameIndex) {
        match self {
            Self::RoundedRect(f) => f.apply(canvas, frame),
            Self::SmoothColor(f) => f.apply(canvas, frame),
            Self::Holes(f) => f.apply(canvas, frame),
        }
    }
}
