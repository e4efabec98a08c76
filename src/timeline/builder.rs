use crate::filters::{Filter, FilterContext, FilterDocument, MusicalSpan};
use crate::foundation::core::{Fps, FrameIndex, FrameRange};
use crate::foundation::error::{ScoreError, ScoreResult};
use crate::foundation::math::Fnv1a64;
use crate::layout::PageLayout;
use crate::raster::{DEFAULT_INK_THRESHOLD, InkMask, PageRaster};
use crate::timeline::overlay::BarOverlay;
use crate::timeline::viewport::ViewportTracker;

/// Knobs shared by every timeline built from the same inputs.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineOpts {
    pub fps: Fps,
    /// Height of the cropped output window in page rows.
    pub window_height: u32,
    /// Root seed for filters that draw random values without their own seed.
    pub seed: u64,
    /// Luminance below which a page pixel counts as ink.
    pub ink_threshold: u8,
}

impl Default for TimelineOpts {
    fn default() -> Self {
        Self {
            fps: Fps { num: 30, den: 1 },
            window_height: 720,
            seed: 0,
            ink_threshold: DEFAULT_INK_THRESHOLD,
        }
    }
}

/// Everything needed to render frames, fixed at build time.
#[derive(Debug)]
pub struct Timeline {
    page: PageRaster,
    ink: InkMask,
    layout: PageLayout,
    overlays: Vec<BarOverlay>,
    viewport: ViewportTracker,
    range: FrameRange,
    opts: TimelineOpts,
}

impl Timeline {
    pub fn page(&self) -> &PageRaster {
        &self.page
    }

    pub fn ink(&self) -> &InkMask {
        &self.ink
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// Bar overlays in traversal order.
    pub fn overlays(&self) -> &[BarOverlay] {
        &self.overlays
    }

    pub fn viewport(&self) -> &ViewportTracker {
        &self.viewport
    }

    pub fn opts(&self) -> TimelineOpts {
        self.opts
    }

    pub fn fps(&self) -> Fps {
        self.opts.fps
    }

    /// First frame at which any bar is active (never below 0) through the last.
    pub fn frame_range(&self) -> FrameRange {
        self.range
    }

    /// Width and height of the frames handed to sinks.
    pub fn window_size(&self) -> (u32, u32) {
        (
            self.page.width,
            self.viewport.window_height().min(self.page.height),
        )
    }
}

/// Assembles a [`Timeline`] from a page, its bar layout, bar start times and filter specs.
#[derive(Debug)]
pub struct TimelineBuilder {
    page: PageRaster,
    layout: PageLayout,
    timestamps: Vec<f64>,
    filters: Option<FilterDocument>,
    ink: Option<InkMask>,
    opts: TimelineOpts,
}

impl TimelineBuilder {
    pub fn new(page: PageRaster, layout: PageLayout) -> Self {
        Self {
            page,
            layout,
            timestamps: Vec::new(),
            filters: None,
            ink: None,
            opts: TimelineOpts::default(),
        }
    }

    /// Bar start times in seconds, one per bar plus the end of the last bar.
    pub fn timestamps(mut self, timestamps: Vec<f64>) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// One filter list per bar, in traversal order. Without it bars carry no filters.
    pub fn filters(mut self, doc: FilterDocument) -> Self {
        self.filters = Some(doc);
        self
    }

    /// Use a precomputed ink mask instead of thresholding the page.
    pub fn ink_mask(mut self, ink: InkMask) -> Self {
        self.ink = Some(ink);
        self
    }

    pub fn opts(mut self, opts: TimelineOpts) -> Self {
        self.opts = opts;
        self
    }

    #[tracing::instrument(skip(self), fields(bars = self.layout.bar_count()))]
    pub fn build(self) -> ScoreResult<Timeline> {
        let Self {
            page,
            layout,
            timestamps,
            filters,
            ink,
            opts,
        } = self;

        if page.width != layout.width || page.height != layout.height {
            return Err(ScoreError::geometry(format!(
                "page raster is {}x{} but layout describes {}x{}",
                page.width, page.height, layout.width, layout.height
            )));
        }
        layout.validate()?;
        let ink = match ink {
            Some(ink) if ink.width != page.width || ink.height != page.height => {
                return Err(ScoreError::geometry("ink mask does not match the page size"));
            }
            Some(ink) => ink,
            None => InkMask::from_raster(&page, opts.ink_threshold),
        };

        let n = layout.bar_count();
        if n == 0 {
            return Err(ScoreError::config("layout has no bars"));
        }
        if timestamps.len() != n + 1 {
            return Err(ScoreError::config(format!(
                "expected {} bar timestamps for {n} bars, got {}",
                n + 1,
                timestamps.len()
            )));
        }
        if let Some(t) = timestamps.iter().find(|t| !t.is_finite()) {
            return Err(ScoreError::config(format!("bar timestamp {t} is not finite")));
        }
        if let Some(i) = timestamps.windows(2).position(|w| w[1] <= w[0]) {
            return Err(ScoreError::config(format!(
                "bar timestamps must be strictly increasing (index {} -> {})",
                i,
                i + 1
            )));
        }
        let specs = filters.map(|d| d.bars).unwrap_or_else(|| vec![Default::default(); n]);
        if specs.len() != n {
            return Err(ScoreError::config(format!(
                "filter spec lists {} bars but the layout has {n}",
                specs.len()
            )));
        }

        let fps = opts.fps;
        let bands = layout.group_bands();
        let mut overlays = Vec::with_capacity(n);
        for (i, (bar_ref, spec)) in layout.bars().zip(&specs).enumerate() {
            let span = MusicalSpan::new(
                FrameIndex(fps.secs_to_frames_floor(timestamps[i])),
                FrameIndex(fps.secs_to_frames_floor(timestamps[i + 1]) - 1),
            )?;
            let region = layout.bar_region(bar_ref.group, bar_ref.bar, bands[bar_ref.group]);
            let mut overlay = BarOverlay::new(i, bar_ref.group, region, span);

            for (j, fspec) in spec.filters.iter().enumerate() {
                let ctx = FilterContext {
                    span,
                    width: region.width(),
                    height: region.height(),
                    default_seed: filter_seed(opts.seed, i, j),
                };
                let filter = Filter::from_spec(fspec, ctx).map_err(|e| match e {
                    ScoreError::Config(msg) => ScoreError::config(format!("bar {i}, filter {j}: {msg}")),
                    other => other,
                })?;
                overlay.attach(filter);
            }
            overlays.push(overlay);
        }

        let viewport = ViewportTracker::new(
            &viewport_anchors(&layout, &overlays),
            page.height,
            opts.window_height,
        )?;

        let start = overlays
            .iter()
            .map(|o| o.actual_start())
            .min()
            .map_or(0, |f| f.0.max(0));
        let end = overlays.iter().map(|o| o.actual_end()).max().map_or(0, |f| f.0);
        let range = FrameRange::new(FrameIndex(start), FrameIndex(end))
            .map_err(|_| ScoreError::config(format!("timeline ends before frame 0 (at {end})")))?;

        tracing::debug!(start, end, "timeline built");
        Ok(Timeline {
            page,
            ink,
            layout,
            overlays,
            viewport,
            range,
            opts,
        })
    }
}

/// Stable seed for filter `filter` of bar `bar`.
fn filter_seed(root: u64, bar: usize, filter: usize) -> u64 {
    let mut h = Fnv1a64::new(root);
    h.write_u64(bar as u64);
    h.write_u64(filter as u64);
    h.finish()
}

/// One anchor per group at the top of its band when its first bar starts, plus one holding the
/// last band when the last bar ends.
fn viewport_anchors(layout: &PageLayout, overlays: &[BarOverlay]) -> Vec<(FrameIndex, u32)> {
    let mut anchors: Vec<(FrameIndex, u32)> = (0..layout.groups().len())
        .filter_map(|gi| overlays.iter().find(|o| o.group() == gi))
        .map(|first| (first.span().start, first.region().top))
        .collect();
    if let (Some(&(_, top)), Some(last)) = (anchors.last(), overlays.last()) {
        anchors.push((last.span().end, top));
    }
    anchors
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/builder.rs"]
mod tests;
