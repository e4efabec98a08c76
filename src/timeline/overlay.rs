use smallvec::SmallVec;

use crate::canvas::BarCanvas;
use crate::filters::{Filter, MusicalSpan};
use crate::foundation::core::{FrameIndex, PixelRect};

/// One bar's highlight: where it is painted, when it plays and the filters that shape it.
///
/// The active interval starts as the bar's musical span and widens to cover every attached
/// filter's anchors, so a fade can begin before the bar is reached and linger after it.
#[derive(Clone, Debug)]
pub struct BarOverlay {
    index: usize,
    group: usize,
    region: PixelRect,
    span: MusicalSpan,
    filters: SmallVec<[Filter; 4]>,
    actual_start: FrameIndex,
    actual_end: FrameIndex,
}

impl BarOverlay {
    pub fn new(index: usize, group: usize, region: PixelRect, span: MusicalSpan) -> Self {
        Self {
            index,
            group,
            region,
            span,
            filters: SmallVec::new(),
            actual_start: span.start,
            actual_end: span.end,
        }
    }

    /// Append a filter to the chain and widen the active interval to its anchors.
    pub fn attach(&mut self, filter: Filter) {
        if let (Some(&first), Some(&last)) = (filter.anchors().first(), filter.anchors().last()) {
            self.actual_start = self.actual_start.min(first);
            self.actual_end = self.actual_end.max(last);
        }
        self.filters.push(filter);
    }

    /// Bar index in traversal order.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn group(&self) -> usize {
        self.group
    }

    pub fn region(&self) -> PixelRect {
        self.region
    }

    pub fn span(&self) -> MusicalSpan {
        self.span
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn actual_start(&self) -> FrameIndex {
        self.actual_start
    }

    pub fn actual_end(&self) -> FrameIndex {
        self.actual_end
    }

    /// Strictly inside the active interval. The boundary frames themselves render blank.
    pub fn is_visible(&self, frame: FrameIndex) -> bool {
        self.actual_start < frame && frame < self.actual_end
    }

    /// Render into a canvas sized to [`Self::region`], reusing its buffers.
    pub fn render_into(&self, frame: FrameIndex, canvas: &mut BarCanvas) {
        let (w, h) = (self.region.width(), self.region.height());
        if canvas.width != w || canvas.height != h {
            *canvas = BarCanvas::blank(w, h);
        } else {
            canvas.reset();
        }
        if !self.is_visible(frame) {
            return;
        }
        for filter in &self.filters {
            filter.apply(canvas, frame);
        }
    }

    pub fn render(&self, frame: FrameIndex) -> BarCanvas {
        let mut canvas = BarCanvas::blank(self.region.width(), self.region.height());
        self.render_into(frame, &mut canvas);
        canvas
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/overlay.rs"]
mod tests;
