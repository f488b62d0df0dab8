//! Gesture state machines.
//!
//! Each gesture (create, resize, move) is an explicit state value owned by
//! the caller: created on a qualifying pointer-down, advanced on pointer
//! moves, consumed on pointer-up, and clearable at any point via `reset`.
//! The machines compute candidate time ranges only; persistence goes
//! through the coordinator.

pub mod coalesce;
pub mod create;
pub mod drag_move;
pub mod resize;

use chrono::{Duration, NaiveDate, NaiveDateTime, TimeZone};
use chrono::offset::Local;

use crate::geometry::TimePoint;
use crate::models::event::MIN_DURATION_MINUTES;
use crate::models::patch::EventPatch;
use crate::utils::date::day_end;

/// Candidate time range produced by an in-progress gesture.
///
/// Always normalized: `start <= end`. A gesture that would invert the
/// endpoints swaps them instead of failing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CandidateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl CandidateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }.normalized()
    }

    /// Build a normalized range from two grid cells
    pub fn from_cells(a: (NaiveDate, TimePoint), b: (NaiveDate, TimePoint)) -> Self {
        Self::new(
            a.0.and_time(a.1.to_naive_time()),
            b.0.and_time(b.1.to_naive_time()),
        )
    }

    /// Swap endpoints when inverted
    pub fn normalized(self) -> Self {
        if self.end < self.start {
            Self {
                start: self.end,
                end: self.start,
            }
        } else {
            self
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn is_multi_day(&self) -> bool {
        self.start.date() != self.end.date()
    }

    /// Number of calendar days touched, inclusive
    pub fn day_span(&self) -> i64 {
        (self.end.date() - self.start.date()).num_days() + 1
    }

    /// Enforce the minimum duration by pushing the non-anchored endpoint.
    /// `anchor_start` holds the start fixed and extends the end.
    pub fn with_min_duration(self, anchor_start: bool) -> Self {
        if self.duration_minutes() >= MIN_DURATION_MINUTES {
            return self;
        }
        let floor = Duration::minutes(MIN_DURATION_MINUTES);
        if anchor_start {
            Self {
                start: self.start,
                end: self.start + floor,
            }
        } else {
            Self {
                start: self.end - floor,
                end: self.end,
            }
        }
    }

    /// Cap the end so the range does not extend past the end of its start
    /// day. Used for same-day creation drags.
    pub fn capped_to_day_end(self) -> Self {
        let limit = day_end(self.start.date());
        if self.end > limit {
            Self {
                start: self.start,
                end: limit,
            }
        } else {
            self
        }
    }

    /// Convert into a persistence patch. `None` when either endpoint falls
    /// into a local-time gap (DST transition).
    pub fn to_patch(&self) -> Option<EventPatch> {
        let start = Local.from_local_datetime(&self.start).single()?;
        let end = Local.from_local_datetime(&self.end).single()?;
        Some(EventPatch::with_times(start, end))
    }
}
