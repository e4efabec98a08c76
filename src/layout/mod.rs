//! Page geometry: stave groups (row bands) owning column-disjoint bars.
//!
//! Geometry is produced upstream by staff/bar detection and is read-only once a timeline is built.
//! Bars refer back to their group by index only.

pub mod page;

pub use page::{Bar, BarRef, GroupBand, PageLayout, StaveGroup};
