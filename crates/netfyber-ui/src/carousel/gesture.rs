//! Horizontal swipe tracking for touch and mouse drags.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// Dragged left past the threshold: show the next page.
    Forward,
    /// Dragged right past the threshold: show the previous page.
    Backward,
    SnapBack,
}

#[derive(Debug, Clone, Copy)]
pub struct SwipeTracker {
    threshold_px: f64,
    start_x: Option<f64>,
}

impl SwipeTracker {
    #[must_use]
    pub fn new(threshold_px: f64) -> Self {
        Self {
            threshold_px,
            start_x: None,
        }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.start_x.is_some()
    }

    pub fn begin(&mut self, x: f64) {
        self.start_x = Some(x);
    }

    /// Drag distance so far, or `None` when no drag is in progress.
    #[must_use]
    pub fn delta(&self, x: f64) -> Option<f64> {
        let start = self.start_x?;
        Some(x - start)
    }

    /// Ends the drag. Releasing without a prior `begin` snaps back.
    pub fn finish(&mut self, x: f64) -> SwipeOutcome {
        let Some(start) = self.start_x.take() else {
            return SwipeOutcome::SnapBack;
        };
        let travelled = start - x;
        if travelled > self.threshold_px {
            SwipeOutcome::Forward
        } else if travelled < -self.threshold_px {
            SwipeOutcome::Backward
        } else {
            SwipeOutcome::SnapBack
        }
    }

    /// Abandons the drag, e.g. when the pointer is cancelled.
    pub fn cancel(&mut self) {
        self.start_x = None;
    }
}
