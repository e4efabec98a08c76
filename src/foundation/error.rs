/// Convenience result type used across scorelight.
pub type ScoreResult<T> = Result<T, ScoreError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Every variant except [`ScoreError::Render`] aborts timeline construction before a single frame
/// is produced; once a [`crate::Timeline`] exists, per-frame evaluation does not fail.
#[derive(thiserror::Error, Debug)]
pub enum ScoreError {
    /// Malformed user input: beat strings, filter descriptors, timestamps, count mismatches.
    #[error("config error: {0}")]
    Config(String),

    /// Lookup outside a defined domain, or a non-monotonic request to a forward-only component.
    #[error("range error: {0}")]
    Range(String),

    /// Page geometry that violates the disjointness or bounds invariants.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Failures while handing frames to a sink or an external encoder.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScoreError {
    /// Build a [`ScoreError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`ScoreError::Range`] value.
    pub fn range(msg: impl Into<String>) -> Self {
        Self::Range(msg.into())
    }

    /// Build a [`ScoreError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`ScoreError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
