// Drag-to-Move Engine
//
// Repositions a whole event block. The pointer offset inside the block is
// captured at grab time; each move snaps the accumulated delta to the grid
// and derives a candidate start that preserves the original duration. The
// preview is a translate offset so the host can float the block without
// committing anything.

use chrono::{Duration, NaiveDateTime};
use egui::{Pos2, Vec2};

use super::CandidateRange;
use crate::geometry::GridGeometry;
use crate::models::event::Event;

/// Live preview for an in-flight move
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovePreview {
    /// Translate offset to apply to the event block
    pub offset: Vec2,
    /// Candidate span at the current pointer position
    pub range: CandidateRange,
}

/// What the release of a move gesture asks the caller to do
#[derive(Clone, Debug, PartialEq)]
pub enum MoveOutcome {
    /// The event landed back where it started
    Unchanged { event_id: i64 },
    /// Persist the new span through the mutation coordinator
    Commit { event_id: i64, range: CandidateRange },
}

/// Context for an active move operation
#[derive(Clone, Debug)]
pub struct MoveState {
    pub event_id: i64,
    pub original_start: NaiveDateTime,
    pub duration: Duration,
    /// Pointer offset inside the event block at grab time
    pub grab_offset: Vec2,
    press_pos: Pos2,
    press_day_index: usize,
    candidate: Option<CandidateRange>,
}

impl MoveState {
    /// Create a move context from an event. Events without an id cannot
    /// be moved.
    pub fn from_event(
        event: &Event,
        press_pos: Pos2,
        grab_offset: Vec2,
        grid: &GridGeometry,
    ) -> Option<Self> {
        let event_id = event.id?;
        Some(Self {
            event_id,
            original_start: event.start.naive_local(),
            duration: event.end - event.start,
            grab_offset,
            press_pos,
            press_day_index: grid.day_index_at_x(press_pos.x),
            candidate: None,
        })
    }
}

/// Owner of the move gesture
#[derive(Debug, Default)]
pub struct MoveEngine {
    state: Option<MoveState>,
}

impl MoveEngine {
    pub fn new() -> Self {
        Self { state: None }
    }

    /// Begin moving an event. `grab_offset` is the pointer position
    /// relative to the event block's top-left corner.
    pub fn begin(
        &mut self,
        event: &Event,
        press_pos: Pos2,
        grab_offset: Vec2,
        grid: &GridGeometry,
    ) -> bool {
        match MoveState::from_event(event, press_pos, grab_offset, grid) {
            Some(state) => {
                self.state = Some(state);
                true
            }
            None => false,
        }
    }

    pub fn active(&self) -> Option<&MoveState> {
        self.state.as_ref()
    }

    pub fn is_moving_event(&self, event_id: i64) -> bool {
        self.state.as_ref().is_some_and(|s| s.event_id == event_id)
    }

    /// Feed a pointer position; returns the preview when the snapped
    /// candidate changed.
    pub fn update(&mut self, pos: Pos2, grid: &GridGeometry) -> Option<MovePreview> {
        let state = self.state.as_mut()?;
        let range = Self::candidate_at(state, pos, grid);

        if state.candidate == Some(range) {
            return None;
        }
        state.candidate = Some(range);

        Some(MovePreview {
            offset: pos - state.press_pos,
            range,
        })
    }

    /// Finish the move. The release position is always processed, then
    /// the gesture state is consumed.
    pub fn finish(&mut self, pos: Pos2, grid: &GridGeometry) -> Option<MoveOutcome> {
        let state = self.state.take()?;
        let range = Self::candidate_at(&state, pos, grid);

        if range.start == state.original_start {
            Some(MoveOutcome::Unchanged {
                event_id: state.event_id,
            })
        } else {
            Some(MoveOutcome::Commit {
                event_id: state.event_id,
                range,
            })
        }
    }

    /// Abandon the move without emitting anything
    pub fn reset(&mut self) {
        self.state = None;
    }

    fn candidate_at(state: &MoveState, pos: Pos2, grid: &GridGeometry) -> CandidateRange {
        // Vertical delta snapped to the grid interval
        let snap = grid.snap_minutes.max(1) as f32;
        let delta_minutes =
            ((pos.y - state.press_pos.y) / grid.pixels_per_hour.max(f32::EPSILON)) * 60.0;
        let snapped_minutes = ((delta_minutes / snap).round() * snap) as i64;

        // Horizontal delta in whole day columns
        let day_delta = grid.day_index_at_x(pos.x) as i64 - state.press_day_index as i64;

        let new_start = state.original_start
            + Duration::minutes(snapped_minutes)
            + Duration::days(day_delta);
        CandidateRange::new(new_start, new_start + state.duration)
    }
}
