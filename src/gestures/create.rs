// Drag-to-Create Detector
//
// Turns a double-click-and-drag gesture into a provisional event range.
// The second click of a double-click arms the detector; crossing the
// movement threshold starts the drag. The detector never persists -
// the caller opens its creation form with the final range.

use chrono::NaiveDate;
use egui::Pos2;

use super::CandidateRange;
use crate::geometry::{GridGeometry, TimePoint};

/// Maximum gap between two clicks to count as a double-click
pub const DOUBLE_CLICK_WINDOW_MS: u64 = 300;

/// Movement required before an armed gesture becomes a drag
pub const DRAG_THRESHOLD_PX: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreatePhase {
    Idle,
    /// Second click landed; waiting for the movement threshold
    Detecting,
    Dragging,
}

/// State machine for the drag-to-create gesture.
///
/// Timestamps are host-supplied milliseconds from any monotonic clock.
#[derive(Clone, Debug)]
pub struct DragCreateDetector {
    phase: CreatePhase,
    last_click_ms: Option<u64>,
    press_pos: Pos2,
    anchor: Option<(NaiveDate, TimePoint)>,
    last_emitted: Option<CandidateRange>,
}

impl DragCreateDetector {
    pub fn new() -> Self {
        Self {
            phase: CreatePhase::Idle,
            last_click_ms: None,
            press_pos: Pos2::ZERO,
            anchor: None,
            last_emitted: None,
        }
    }

    pub fn phase(&self) -> CreatePhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == CreatePhase::Dragging
    }

    /// Feed a pointer-down. The second press within the double-click
    /// window arms the gesture and captures the anchor cell.
    pub fn pointer_down(&mut self, pos: Pos2, now_ms: u64, grid: &GridGeometry) {
        if self.phase != CreatePhase::Idle {
            self.reset();
        }

        let is_double = self
            .last_click_ms
            .is_some_and(|last| now_ms.saturating_sub(last) <= DOUBLE_CLICK_WINDOW_MS);

        if is_double {
            self.phase = CreatePhase::Detecting;
            self.press_pos = pos;
            self.anchor = Some(grid.cell_at(pos));
            self.last_click_ms = None;
        } else {
            self.last_click_ms = Some(now_ms);
        }
    }

    /// Feed a pointer-move. Returns the candidate range when it changed
    /// since the last emission; duplicates are suppressed so the caller
    /// does not re-render for a pointer that stayed in the same cell.
    pub fn pointer_move(&mut self, pos: Pos2, grid: &GridGeometry) -> Option<CandidateRange> {
        match self.phase {
            CreatePhase::Idle => return None,
            CreatePhase::Detecting => {
                if (pos - self.press_pos).length() <= DRAG_THRESHOLD_PX {
                    return None;
                }
                self.phase = CreatePhase::Dragging;
                log::debug!("drag-to-create started at {:?}", self.anchor);
            }
            CreatePhase::Dragging => {}
        }

        let range = self.range_at(pos, grid)?;
        if self.last_emitted == Some(range) {
            return None;
        }
        self.last_emitted = Some(range);
        Some(range)
    }

    /// Feed a pointer-up. Returns the final range when a drag was in
    /// progress; a release before the movement threshold is a plain
    /// double-click and produces nothing.
    pub fn pointer_up(&mut self, pos: Pos2, grid: &GridGeometry) -> Option<CandidateRange> {
        let result = match self.phase {
            CreatePhase::Dragging => self.range_at(pos, grid),
            _ => None,
        };
        self.phase = CreatePhase::Idle;
        self.anchor = None;
        self.last_emitted = None;
        result
    }

    /// Abandon the gesture without emitting anything
    pub fn reset(&mut self) {
        self.phase = CreatePhase::Idle;
        self.last_click_ms = None;
        self.anchor = None;
        self.last_emitted = None;
    }

    fn range_at(&self, pos: Pos2, grid: &GridGeometry) -> Option<CandidateRange> {
        let anchor = self.anchor?;
        let cursor = grid.cell_at(pos);

        // The anchor stays fixed; when the cursor precedes it the range is
        // swapped and the floor extends backwards from the anchor instead.
        let cursor_first = (cursor.0, cursor.1) < (anchor.0, anchor.1);
        let same_day = cursor.0 == anchor.0;

        let mut range =
            CandidateRange::from_cells(anchor, cursor).with_min_duration(!cursor_first);
        if same_day {
            range = range.capped_to_day_end();
        }
        Some(range)
    }
}

impl Default for DragCreateDetector {
    fn default() -> Self {
        Self::new()
    }
}
