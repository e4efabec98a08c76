use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ScoreError, ScoreResult};

/// Tracks which bars are live while frames advance strictly forward.
///
/// Bars are scanned in order of their active start frame (stable on ties), so a filter that pulls
/// a bar's start before its predecessor's does not hide it from the forward pointer. The active
/// list is reported sorted by bar index.
#[derive(Clone, Debug)]
pub struct ActiveBarWindow {
    spans: Vec<(FrameIndex, FrameIndex)>,
    scan_order: Vec<usize>,
    next: usize,
    active: Vec<usize>,
    last: Option<FrameIndex>,
}

impl ActiveBarWindow {
    /// `spans[i]` is bar `i`'s inclusive `(actual_start, actual_end)`.
    pub fn new(spans: Vec<(FrameIndex, FrameIndex)>) -> Self {
        let mut scan_order: Vec<usize> = (0..spans.len()).collect();
        scan_order.sort_by_key(|&i| spans[i].0);
        Self {
            spans,
            scan_order,
            next: 0,
            active: Vec::new(),
            last: None,
        }
    }

    pub fn last_frame(&self) -> Option<FrameIndex> {
        self.last
    }

    pub fn active(&self) -> &[usize] {
        &self.active
    }

    /// Move to `frame` and return the bars whose interval contains it.
    pub fn advance(&mut self, frame: FrameIndex) -> ScoreResult<&[usize]> {
        if let Some(last) = self.last
            && frame <= last
        {
            return Err(ScoreError::range(format!(
                "active bar window is forward-only: frame {} requested after {}",
                frame.0, last.0
            )));
        }
        self.last = Some(frame);

        let mut entered = false;
        while let Some(&bar) = self.scan_order.get(self.next) {
            if self.spans[bar].0 > frame {
                break;
            }
            self.active.push(bar);
            self.next += 1;
            entered = true;
        }

        let before = self.active.len();
        let kept: Vec<usize> = self
            .active
            .iter()
            .copied()
            .filter(|&bar| self.spans[bar].1 >= frame)
            .collect();
        let left = before - kept.len();
        self.active = kept;
        if entered {
            self.active.sort_unstable();
        }
        if entered || left > 0 {
            tracing::debug!(frame = frame.0, active = ?self.active, left, "active bars changed");
        }

        Ok(&self.active)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/window.rs"]
mod tests;
