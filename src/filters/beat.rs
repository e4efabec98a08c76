use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ScoreError, ScoreResult};
use crate::foundation::math::round_half_even;

/// A bar's musical frame interval, both ends inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct MusicalSpan {
    pub start: FrameIndex,
    pub end: FrameIndex,
}

impl MusicalSpan {
    pub fn new(start: FrameIndex, end: FrameIndex) -> ScoreResult<Self> {
        if end < start {
            return Err(ScoreError::config(format!(
                "bar is shorter than one frame (musical frames {}..={})",
                start.0, end.0
            )));
        }
        Ok(Self { start, end })
    }

    pub fn total_frames(self) -> i64 {
        self.end.0 - self.start.0 + 1
    }
}

/// Resolve a `"num/den"` beat position to an absolute frame.
///
/// Beat `1/den` is the first frame of the bar; each step of `1/den` advances by `total/den`
/// frames. Positions past the bar's end (or before its start) are valid and resolve outside the
/// span.
pub fn resolve_beat(beat: &str, span: MusicalSpan) -> ScoreResult<FrameIndex> {
    let (num, den) = beat
        .split_once('/')
        .ok_or_else(|| ScoreError::config(format!("beat \"{beat}\" must look like num/den")))?;

    let parse = |part: &str| -> ScoreResult<f64> {
        let v: f64 = part.trim().parse().map_err(|_| {
            ScoreError::config(format!("beat \"{beat}\" has non-numeric part \"{part}\""))
        })?;
        if !v.is_finite() {
            return Err(ScoreError::config(format!("beat \"{beat}\" must be finite")));
        }
        Ok(v)
    };
    let num = parse(num)?;
    let den = parse(den)?;
    if den == 0.0 {
        return Err(ScoreError::config(format!(
            "beat \"{beat}\" has a zero denominator"
        )));
    }

    let relative = ((num - 1.0) / den) * span.total_frames() as f64;
    Ok(FrameIndex(round_half_even(span.start.0 as f64 + relative)))
}

/// Resolve every beat and sort ascending. Equal frames keep their input order.
pub fn resolve_anchors(beats: &[String], span: MusicalSpan) -> ScoreResult<Vec<FrameIndex>> {
    if beats.is_empty() {
        return Err(ScoreError::config("filter needs at least one beat anchor"));
    }
    let mut frames = beats
        .iter()
        .map(|b| resolve_beat(b, span))
        .collect::<ScoreResult<Vec<_>>>()?;
    frames.sort();
    Ok(frames)
}

#[cfg(test)]
#[path = "../../tests/unit/filters/beat.rs"]
mod tests;
