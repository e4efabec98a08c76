//! Filter-spec documents: per-bar lists of filter descriptors as produced by the authoring tools.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::color::{Rgb8, parse_hex};
use crate::foundation::error::{ScoreError, ScoreResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterKind {
    RoundedRectangleMask,
    SmoothColorOpacity,
    RandomOpacityHoles,
}

impl FilterKind {
    pub fn parse(kind: &str) -> ScoreResult<Self> {
        match kind.trim() {
            "RoundedRectangleMask" | "RoundedRectangle" | "FilterOpacityRoundedRectangle" => {
                Ok(Self::RoundedRectangleMask)
            }
            "SmoothColorOpacity" | "FilterSmoothColorAndOpacity" => Ok(Self::SmoothColorOpacity),
            "RandomOpacityHoles" | "FilterRandomOpacityHoles" => Ok(Self::RandomOpacityHoles),
            "" => Err(ScoreError::config("filter kind must be non-empty")),
            other => Err(ScoreError::config(format!("unknown filter kind '{other}'"))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::RoundedRectangleMask => "RoundedRectangleMask",
            Self::SmoothColorOpacity => "SmoothColorOpacity",
            Self::RandomOpacityHoles => "RandomOpacityHoles",
        }
    }
}

/// One filter descriptor: `{ "kind": ..., "beatAnchors": [...], <kind-specific fields> }`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FilterSpec {
    #[serde(alias = "name")]
    pub kind: String,
    #[serde(rename = "beatAnchors", alias = "relative_beat_str_list")]
    pub beat_anchors: Vec<String>,
    #[serde(flatten)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

impl FilterSpec {
    pub fn new(kind: impl Into<String>, beat_anchors: &[&str]) -> Self {
        Self {
            kind: kind.into(),
            beat_anchors: beat_anchors.iter().map(|s| s.to_string()).collect(),
            params: serde_json::Map::new(),
        }
    }

    pub fn with_param(mut self, key: &str, value: serde_json::Value) -> Self {
        self.params.insert(key.to_string(), value);
        self
    }

    pub fn kind(&self) -> ScoreResult<FilterKind> {
        FilterKind::parse(&self.kind)
    }

    /// Decode the kind-specific fields, rejecting unknown ones.
    pub fn decode_params<P: serde::de::DeserializeOwned>(&self) -> ScoreResult<P> {
        serde_json::from_value(serde_json::Value::Object(self.params.clone())).map_err(|e| {
            ScoreError::config(format!("invalid parameters for filter '{}': {e}", self.kind))
        })
    }
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoundedRectParams {
    #[serde(rename = "radiusRatio", alias = "circle_radius_ratio")]
    pub radius_ratio: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmoothColorParams {
    #[serde(alias = "color_hex_str_list")]
    pub colors: Vec<String>,
    #[serde(alias = "opacity_list")]
    pub opacities: Vec<f64>,
}

impl SmoothColorParams {
    pub fn parsed_colors(&self) -> ScoreResult<Vec<Rgb8>> {
        self.colors.iter().map(|c| parse_hex(c)).collect()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HolesParams {
    #[serde(alias = "opacity_list")]
    pub opacities: Vec<f64>,
    #[serde(rename = "radiusRatio", alias = "hole_radius_ratio")]
    pub radius_ratio: f64,
    #[serde(default, alias = "random_seed")]
    pub seed: Option<u64>,
}

/// Filters attached to one bar, in application order.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BarFilterSpec {
    #[serde(default, alias = "filter_list")]
    pub filters: Vec<FilterSpec>,
}

/// The whole filter-spec document: one entry per bar in traversal order.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FilterDocument {
    pub bars: Vec<BarFilterSpec>,
}

impl FilterDocument {
    pub fn from_reader<R: std::io::Read>(r: R) -> ScoreResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ScoreError::config(format!("parse filter spec JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> ScoreResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ScoreError::config(format!("open filter spec JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/spec.rs"]
mod tests;
