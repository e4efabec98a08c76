//! Project documents: one JSON file naming every input of a render.
//!
//! ```json
//! {
//!   "page": "page1.png",
//!   "layout": "page1_layout.json",
//!   "timestamps": "page1_bars.json",
//!   "filters": "page1_filters.json",
//!   "audio": "take3.wav",
//!   "timeline": { "fps": { "num": 30, "den": 1 }, "windowHeight": 540, "seed": 7 }
//! }
//! ```
//!
//! Relative paths resolve against the project file's directory.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::filters::FilterDocument;
use crate::foundation::error::{ScoreError, ScoreResult};
use crate::layout::PageLayout;
use crate::raster::PageRaster;
use crate::timeline::{Timeline, TimelineBuilder, TimelineOpts};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Project {
    /// Page image (any format the `image` crate decodes).
    pub page: PathBuf,
    /// Bar layout JSON.
    pub layout: PathBuf,
    /// JSON array of bar start times in seconds (bars + 1 entries).
    pub timestamps: PathBuf,
    /// Filter-spec JSON. Without it bars are never highlighted.
    #[serde(default)]
    pub filters: Option<PathBuf>,
    #[serde(default)]
    pub audio: Option<PathBuf>,
    #[serde(default)]
    pub timeline: TimelineOpts,
}

impl Project {
    pub fn from_reader<R: std::io::Read>(r: R) -> ScoreResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ScoreError::config(format!("parse project JSON: {e}")))
    }

    /// Load a project and resolve its paths against the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> ScoreResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ScoreError::config(format!("open project JSON '{}': {e}", path.display()))
        })?;
        let project = Self::from_reader(BufReader::new(f))?;
        let root = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(project.resolved_against(root))
    }

    /// Prefix every relative path with `root`.
    pub fn resolved_against(mut self, root: &Path) -> Self {
        let fix = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = root.join(&*p);
            }
        };
        fix(&mut self.page);
        fix(&mut self.layout);
        fix(&mut self.timestamps);
        if let Some(p) = self.filters.as_mut() {
            fix(p);
        }
        if let Some(p) = self.audio.as_mut() {
            fix(p);
        }
        self
    }

    /// Read every input and build the timeline.
    #[tracing::instrument(skip(self), fields(page = %self.page.display()))]
    pub fn load_timeline(&self) -> ScoreResult<Timeline> {
        let page = PageRaster::from_path(&self.page)?;
        let layout = PageLayout::from_path(&self.layout)?;
        let timestamps = read_timestamps(&self.timestamps)?;

        let mut builder = TimelineBuilder::new(page, layout)
            .timestamps(timestamps)
            .opts(self.timeline);
        if let Some(filters) = self.filters.as_ref() {
            builder = builder.filters(FilterDocument::from_path(filters)?);
        }
        builder.build()
    }
}

/// Bar start times as a JSON array of seconds.
pub fn read_timestamps(path: &Path) -> ScoreResult<Vec<f64>> {
    let f = File::open(path).map_err(|e| {
        ScoreError::config(format!("open timestamps JSON '{}': {e}", path.display()))
    })?;
    serde_json::from_reader(BufReader::new(f)).map_err(|e| {
        ScoreError::config(format!("parse timestamps JSON '{}': {e}", path.display()))
    })
}
