use rayon::prelude::*;

use crate::canvas::BarCanvas;
use crate::color::Rgb8;
use crate::foundation::core::{FrameIndex, PixelRect};
use crate::raster::{InkMask, PageRaster};
use crate::timeline::overlay::BarOverlay;

/// Blends active bar overlays onto the page.
///
/// Each bar is composited "over" the *background* inside its own rectangle; nothing outside the
/// rectangles of the current frame's bars is touched, except that rectangles painted on the
/// previous frame are first restored to the background. The visible output therefore depends only
/// on the current frame.
#[derive(Debug)]
pub struct FrameCompositor {
    output: PageRaster,
    overlay_color: Vec<Rgb8>,
    overlay_opacity: Vec<f64>,
    dirty: Vec<PixelRect>,
    scratch: Vec<BarCanvas>,
}

impl FrameCompositor {
    pub fn new(page: &PageRaster) -> Self {
        let n = page.width as usize * page.height as usize;
        Self {
            output: page.clone(),
            overlay_color: vec![Rgb8::default(); n],
            overlay_opacity: vec![0.0; n],
            dirty: Vec::new(),
            scratch: Vec::new(),
        }
    }

    /// Composited page for the last frame.
    pub fn output(&self) -> &PageRaster {
        &self.output
    }

    /// Page-sized overlay colour written by the last frame's bars.
    pub fn overlay_color(&self) -> &[Rgb8] {
        &self.overlay_color
    }

    /// Page-sized overlay opacity (after ink masking) written by the last frame's bars.
    pub fn overlay_opacity(&self) -> &[f64] {
        &self.overlay_opacity
    }

    /// Rectangles written by the last frame.
    pub fn dirty(&self) -> &[PixelRect] {
        &self.dirty
    }

    /// Render `bars` at `frame` and blend them in order. With `parallel` the per-bar filter chains
    /// run on the rayon pool; blending always stays sequential.
    pub fn composite(
        &mut self,
        page: &PageRaster,
        ink: &InkMask,
        frame: FrameIndex,
        bars: &[&BarOverlay],
        parallel: bool,
    ) {
        self.restore_dirty(page);

        let mut scratch = std::mem::take(&mut self.scratch);
        if scratch.len() < bars.len() {
            scratch.resize_with(bars.len(), || BarCanvas::blank(0, 0));
        }
        let canvases = &mut scratch[..bars.len()];
        if parallel {
            canvases
                .par_iter_mut()
                .zip(bars.par_iter())
                .for_each(|(canvas, bar)| bar.render_into(frame, canvas));
        } else {
            for (canvas, bar) in canvases.iter_mut().zip(bars) {
                bar.render_into(frame, canvas);
            }
        }

        for (canvas, bar) in canvases.iter_mut().zip(bars) {
            self.blend(page, ink, bar.region(), canvas);
        }
        self.scratch = scratch;
    }

    /// Blend one canvas over the background inside `region`. Opacity is cleared on ink pixels and
    /// clamped to `[0, 1]`.
    pub fn blend(
        &mut self,
        page: &PageRaster,
        ink: &InkMask,
        region: PixelRect,
        canvas: &mut BarCanvas,
    ) {
        debug_assert_eq!(canvas.width, region.width());
        debug_assert_eq!(canvas.height, region.height());

        let page_w = page.width as usize;
        for y in 0..region.height() {
            let row = region.top + y;
            for x in 0..region.width() {
                let col = region.left + x;
                let ci = canvas.index(y, x);
                if ink.is_ink(row, col) {
                    canvas.opacity[ci] = 0.0;
                }
                let op = canvas.opacity[ci].clamp(0.0, 1.0);
                let c = canvas.color[ci].to_array();

                let pi = row as usize * page_w + col as usize;
                self.overlay_color[pi] = canvas.color[ci];
                self.overlay_opacity[pi] = op;

                let off = page.offset(row, col);
                for k in 0..3 {
                    let bg = f64::from(page.data[off + k]);
                    self.output.data[off + k] = (op * f64::from(c[k]) + (1.0 - op) * bg) as u8;
                }
            }
        }
        self.dirty.push(region);
    }

    /// Return every rectangle written by the previous frame to the background.
    fn restore_dirty(&mut self, page: &PageRaster) {
        let page_w = page.width as usize;
        for rect in self.dirty.drain(..) {
            for row in rect.top..=rect.bottom {
                let a = page.offset(row, rect.left);
                let b = page.offset(row, rect.right) + 3;
                self.output.data[a..b].copy_from_slice(&page.data[a..b]);

                let pa = row as usize * page_w + rect.left as usize;
                let pb = row as usize * page_w + rect.right as usize + 1;
                self.overlay_color[pa..pb].fill(Rgb8::default());
                self.overlay_opacity[pa..pb].fill(0.0);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/compositor.rs"]
mod tests;
