use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::PixelRect;
use crate::foundation::error::{ScoreError, ScoreResult};

/// One measure's column bounds on the page.
///
/// The outer span covers the enclosing bar lines; the inner span is the space between them and is
/// what gets highlighted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", try_from = "BarDoc")]
pub struct Bar {
    pub inner_left: u32,
    pub inner_right: u32,
    pub outer_left: u32,
    pub outer_right: u32,
}

impl Bar {
    pub fn new(inner_left: u32, inner_right: u32, outer_left: u32, outer_right: u32) -> ScoreResult<Self> {
        let bar = Self {
            inner_left,
            inner_right,
            outer_left,
            outer_right,
        };
        bar.validate()?;
        Ok(bar)
    }

    pub fn validate(&self) -> ScoreResult<()> {
        if !(self.outer_left <= self.inner_left
            && self.inner_left <= self.inner_right
            && self.inner_right <= self.outer_right)
        {
            return Err(ScoreError::geometry(format!(
                "bar columns must satisfy outer_left <= inner_left <= inner_right <= outer_right, got {}/{}/{}/{}",
                self.outer_left, self.inner_left, self.inner_right, self.outer_right
            )));
        }
        Ok(())
    }

    fn inner_overlaps(&self, other: &Bar) -> bool {
        self.inner_left <= other.inner_right && other.inner_left <= self.inner_right
    }
}

/// A row band of staff lines with its bars ordered left to right.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StaveGroupDoc")]
pub struct StaveGroup {
    pub top_row: u32,
    pub bottom_row: u32,
    bars: Vec<Bar>,
}

impl StaveGroup {
    pub fn new(top_row: u32, bottom_row: u32) -> ScoreResult<Self> {
        if top_row > bottom_row {
            return Err(ScoreError::geometry(format!(
                "stave group top row {top_row} is below bottom row {bottom_row}"
            )));
        }
        Ok(Self {
            top_row,
            bottom_row,
            bars: Vec::new(),
        })
    }

    /// Insert a bar, keeping bars sorted by column. Rejects overlapping inner spans.
    pub fn add_bar(&mut self, bar: Bar) -> ScoreResult<()> {
        bar.validate()?;
        if let Some(existing) = self.bars.iter().find(|b| b.inner_overlaps(&bar)) {
            return Err(ScoreError::geometry(format!(
                "new bar ({}, {}) overlaps existing bar ({}, {})",
                bar.inner_left, bar.inner_right, existing.inner_left, existing.inner_right
            )));
        }
        let pos = self.bars.partition_point(|b| b.inner_left < bar.inner_left);
        self.bars.insert(pos, bar);
        Ok(())
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    fn rows_overlap(&self, other: &StaveGroup) -> bool {
        self.top_row <= other.bottom_row && other.top_row <= self.bottom_row
    }
}

/// Rows a stave group extends above and below its staff lines when highlighted or panned to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupBand {
    pub offset_top: u32,
    pub offset_bottom: u32,
}

/// A bar located in traversal order.
#[derive(Clone, Copy, Debug)]
pub struct BarRef<'a> {
    pub group: usize,
    pub index_in_group: usize,
    pub bar: &'a Bar,
}

/// Geometry of a whole page: its pixel size and stave groups ordered top to bottom.
///
/// Deserialization runs the same checked inserts as [`PageLayout::add_stave_group`] and
/// [`StaveGroup::add_bar`], so a decoded layout always satisfies the geometry invariants.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PageLayoutDoc")]
pub struct PageLayout {
    pub width: u32,
    pub height: u32,
    groups: Vec<StaveGroup>,
}

impl PageLayout {
    pub fn new(width: u32, height: u32) -> ScoreResult<Self> {
        if width == 0 || height == 0 {
            return Err(ScoreError::geometry("page width/height must be non-zero"));
        }
        Ok(Self {
            width,
            height,
            groups: Vec::new(),
        })
    }

    /// Parse a layout document from JSON and check every geometry invariant.
    ///
    /// Syntax errors are [`ScoreError::Config`]; overlapping or out-of-page geometry is
    /// [`ScoreError::Geometry`].
    pub fn from_reader<R: std::io::Read>(r: R) -> ScoreResult<Self> {
        let doc: PageLayoutDoc = serde_json::from_reader(r)
            .map_err(|e| ScoreError::config(format!("parse layout JSON: {e}")))?;
        Self::try_from(doc)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ScoreResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ScoreError::config(format!("open layout JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Insert a stave group, keeping groups sorted by top row. Rejects overlapping row bands and
    /// geometry that falls outside the page.
    pub fn add_stave_group(&mut self, group: StaveGroup) -> ScoreResult<()> {
        if group.bottom_row >= self.height {
            return Err(ScoreError::geometry(format!(
                "stave group bottom row {} is outside page height {}",
                group.bottom_row, self.height
            )));
        }
        if let Some(bar) = group.bars.iter().find(|b| b.outer_right >= self.width) {
            return Err(ScoreError::geometry(format!(
                "bar right column {} is outside page width {}",
                bar.outer_right, self.width
            )));
        }
        if let Some(existing) = self.groups.iter().find(|g| g.rows_overlap(&group)) {
            return Err(ScoreError::geometry(format!(
                "new stave group ({}, {}) overlaps existing stave group ({}, {})",
                group.top_row, group.bottom_row, existing.top_row, existing.bottom_row
            )));
        }
        let pos = self.groups.partition_point(|g| g.top_row < group.top_row);
        self.groups.insert(pos, group);
        Ok(())
    }

    pub fn groups(&self) -> &[StaveGroup] {
        &self.groups
    }

    pub fn bar_count(&self) -> usize {
        self.groups.iter().map(|g| g.bars.len()).sum()
    }

    /// Re-check every geometry invariant; `width` and `height` are public and may have been
    /// edited after the groups were inserted.
    pub fn validate(&self) -> ScoreResult<()> {
        let mut page = PageLayout::new(self.width, self.height)?;
        for g in &self.groups {
            let mut group = StaveGroup::new(g.top_row, g.bottom_row)?;
            for &bar in &g.bars {
                group.add_bar(bar)?;
            }
            page.add_stave_group(group)?;
        }
        Ok(())
    }

    /// Bars left to right within each group, groups top to bottom.
    pub fn bars(&self) -> impl Iterator<Item = BarRef<'_>> {
        self.groups.iter().enumerate().flat_map(|(gi, g)| {
            g.bars.iter().enumerate().map(move |(bi, bar)| BarRef {
                group: gi,
                index_in_group: bi,
                bar,
            })
        })
    }

    /// Per-group panning bands: half the row gap to each neighbour, or up to the page edge for a
    /// group with no neighbour on that side (capped by the opposite half-gap when one exists).
    pub fn group_bands(&self) -> Vec<GroupBand> {
        let n = self.groups.len();
        (0..n)
            .map(|i| {
                let g = &self.groups[i];
                let above = (i > 0).then(|| (g.top_row - self.groups[i - 1].bottom_row) / 2);
                let below = (i + 1 < n).then(|| (self.groups[i + 1].top_row - g.bottom_row) / 2);
                let to_top_edge = g.top_row;
                let to_bottom_edge = self.height - 1 - g.bottom_row;
                GroupBand {
                    offset_top: above
                        .unwrap_or_else(|| below.map_or(to_top_edge, |b| b.min(to_top_edge))),
                    offset_bottom: below.unwrap_or_else(|| {
                        above.map_or(to_bottom_edge, |a| a.min(to_bottom_edge))
                    }),
                }
            })
            .collect()
    }

    /// Highlight rectangle of a bar: its group's band rows by the bar's inner columns.
    pub fn bar_region(&self, group: usize, bar: &Bar, band: GroupBand) -> PixelRect {
        let g = &self.groups[group];
        PixelRect {
            top: g.top_row - band.offset_top,
            bottom: g.bottom_row + band.offset_bottom,
            left: bar.inner_left,
            right: bar.inner_right,
        }
    }
}

/// Wire shape of a [`Bar`]; also accepts the legacy `*_col` keys.
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct BarDoc {
    #[serde(alias = "inner_left_col")]
    inner_left: u32,
    #[serde(alias = "inner_right_col")]
    inner_right: u32,
    #[serde(alias = "outer_left_col")]
    outer_left: u32,
    #[serde(alias = "outer_right_col")]
    outer_right: u32,
}

impl TryFrom<BarDoc> for Bar {
    type Error = ScoreError;

    fn try_from(doc: BarDoc) -> ScoreResult<Self> {
        Bar::new(doc.inner_left, doc.inner_right, doc.outer_left, doc.outer_right)
    }
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct StaveGroupDoc {
    #[serde(alias = "top_lim_row")]
    top_row: u32,
    #[serde(alias = "bottom_lim_row")]
    bottom_row: u32,
    #[serde(default, alias = "bar_list")]
    bars: Vec<BarDoc>,
}

impl TryFrom<StaveGroupDoc> for StaveGroup {
    type Error = ScoreError;

    fn try_from(doc: StaveGroupDoc) -> ScoreResult<Self> {
        let mut group = StaveGroup::new(doc.top_row, doc.bottom_row)?;
        for bar in doc.bars {
            group.add_bar(Bar::try_from(bar)?)?;
        }
        Ok(group)
    }
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageLayoutDoc {
    #[serde(alias = "page_width")]
    width: u32,
    #[serde(alias = "page_height")]
    height: u32,
    #[serde(default, alias = "sg_list")]
    groups: Vec<StaveGroupDoc>,
}

impl TryFrom<PageLayoutDoc> for PageLayout {
    type Error = ScoreError;

    fn try_from(doc: PageLayoutDoc) -> ScoreResult<Self> {
        let mut page = PageLayout::new(doc.width, doc.height)?;
        for g in doc.groups {
            page.add_stave_group(StaveGroup::try_from(g)?)?;
        }
        Ok(page)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/page.rs"]
mod tests;
