// Event Resize Engine
//
// Extends an event's boundaries via handle-drag.
// - Top/Bottom handles: adjust start/end time (Day/Week views)
// - Left/Right handles: adjust start/end date (multi-day spans)
// - Corner handles: adjust both
// - Month view: day granularity via cell hit-testing; a vertical drag
//   across week rows becomes a weekly recurring series request.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Duration};
use egui::{Pos2, Rect, Vec2};

use super::CandidateRange;
use crate::geometry::cell::{CellCoordinate, CellLocator};
use crate::geometry::{GridGeometry, ViewMode};
use crate::models::event::Event;
use crate::utils::date::weeks_between;

/// Which edge or corner of the event is being resized
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeHandle {
    /// Top edge - adjusts start time
    Top,
    /// Bottom edge - adjusts end time
    Bottom,
    /// Left edge - adjusts start date (multi-day spans)
    Left,
    /// Right edge - adjusts end date (multi-day spans)
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeHandle {
    /// True if this handle moves the start timestamp's time of day
    pub fn adjusts_start_time(&self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }

    /// True if this handle moves the end timestamp's time of day
    pub fn adjusts_end_time(&self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }

    /// True if this handle moves the start date
    pub fn adjusts_start_date(&self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    /// True if this handle moves the end date
    pub fn adjusts_end_date(&self) -> bool {
        matches!(self, Self::Right | Self::TopRight | Self::BottomRight)
    }

    /// Returns true if this handle adjusts time (vertical drag)
    pub fn is_vertical(&self) -> bool {
        self.adjusts_start_time() || self.adjusts_end_time()
    }

    /// Returns true if this handle adjusts date (horizontal drag)
    pub fn is_horizontal(&self) -> bool {
        self.adjusts_start_date() || self.adjusts_end_date()
    }

    pub fn is_corner(&self) -> bool {
        self.is_vertical() && self.is_horizontal()
    }

    /// Returns the cursor icon for this handle
    pub fn cursor_icon(&self) -> egui::CursorIcon {
        match self {
            Self::Top | Self::Bottom => egui::CursorIcon::ResizeVertical,
            Self::Left | Self::Right => egui::CursorIcon::ResizeHorizontal,
            Self::TopLeft | Self::BottomRight => egui::CursorIcon::ResizeNwSe,
            Self::TopRight | Self::BottomLeft => egui::CursorIcon::ResizeNeSw,
        }
    }

    fn moves_start(&self) -> bool {
        self.adjusts_start_time() || self.adjusts_start_date()
    }
}

/// One synthesized occurrence of a weekly series
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeeklyInstance {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Ordered weekly instances produced by a vertical resize that crossed
/// week rows in month view. One instance per spanned row, all on the
/// original weekday at the original time of day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeeklyInstanceSet {
    instances: Vec<WeeklyInstance>,
}

impl WeeklyInstanceSet {
    /// Synthesize instances for every week row between the event's own
    /// row and the row the drag reached, in either direction.
    pub fn synthesize(event: &Event, origin_row: usize, target_row: usize) -> Self {
        Self::synthesize_naive(
            event.start.naive_local(),
            event.end.naive_local(),
            origin_row,
            target_row,
        )
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WeeklyInstance> {
        self.instances.iter()
    }

    pub fn instances(&self) -> &[WeeklyInstance] {
        &self.instances
    }
}

/// Live feedback emitted while a resize is in progress
#[derive(Clone, Debug, PartialEq)]
pub enum ResizePreview {
    /// Candidate span for an ordinary resize
    Range(CandidateRange),
    /// The drag crossed week rows in month view; previewing a series
    WeeklySeries(WeeklyInstanceSet),
}

/// What the release of a resize gesture asks the caller to do
#[derive(Clone, Debug, PartialEq)]
pub enum ResizeOutcome {
    /// Zero effective delta: clear preview state, nothing to persist
    Unchanged { event_id: i64 },
    /// Persist the new span through the mutation coordinator
    Commit { event_id: i64, range: CandidateRange },
    /// Create one event per instance instead of mutating the original
    WeeklySeries {
        event_id: i64,
        instances: WeeklyInstanceSet,
    },
}

/// Context for an active resize operation
#[derive(Clone, Debug)]
pub struct ResizeState {
    pub event_id: i64,
    pub handle: ResizeHandle,
    pub view: ViewMode,
    pub original_start: NaiveDateTime,
    pub original_end: NaiveDateTime,
    /// Month view: week row holding the event at gesture start
    origin_row: Option<usize>,
    /// Month view: last cell the cursor was seen over
    last_cell: Option<CellCoordinate>,
    candidate: Option<CandidateRange>,
    weekly: Option<WeeklyInstanceSet>,
}

impl ResizeState {
    /// Create a resize context from an event. Events without an id
    /// cannot be resized.
    pub fn from_event(event: &Event, handle: ResizeHandle, view: ViewMode) -> Option<Self> {
        let event_id = event.id?;
        Some(Self {
            event_id,
            handle,
            view,
            original_start: event.start.naive_local(),
            original_end: event.end.naive_local(),
            origin_row: None,
            last_cell: None,
            candidate: None,
            weekly: None,
        })
    }

    fn original_range(&self) -> CandidateRange {
        CandidateRange::new(self.original_start, self.original_end)
    }
}

/// Owner of the resize gesture. One per view component; state lives here
/// instead of in hidden module-level storage.
#[derive(Debug, Default)]
pub struct ResizeEngine {
    state: Option<ResizeState>,
}

impl ResizeEngine {
    pub fn new() -> Self {
        Self { state: None }
    }

    /// Begin a resize operation. Returns false when the event cannot be
    /// resized (no id).
    pub fn begin(&mut self, event: &Event, handle: ResizeHandle, view: ViewMode) -> bool {
        match ResizeState::from_event(event, handle, view) {
            Some(state) => {
                self.state = Some(state);
                true
            }
            None => false,
        }
    }

    /// Get the active resize context, if any
    pub fn active(&self) -> Option<&ResizeState> {
        self.state.as_ref()
    }

    /// Check if resizing a specific event
    pub fn is_resizing_event(&self, event_id: i64) -> bool {
        self.state.as_ref().is_some_and(|s| s.event_id == event_id)
    }

    /// Feed a pointer position. Returns a preview when the candidate
    /// changed; unchanged positions are suppressed.
    pub fn update(
        &mut self,
        pos: Pos2,
        grid: &GridGeometry,
        locator: Option<&dyn CellLocator>,
    ) -> Option<ResizePreview> {
        let state = self.state.as_mut()?;
        match state.view {
            ViewMode::Month => Self::update_month(state, pos, grid, locator),
            _ => Self::update_timed(state, pos, grid),
        }
    }

    /// Finish the resize. The release position is always processed, then
    /// the gesture state is consumed.
    pub fn finish(
        &mut self,
        pos: Pos2,
        grid: &GridGeometry,
        locator: Option<&dyn CellLocator>,
    ) -> Option<ResizeOutcome> {
        let _ = self.update(pos, grid, locator);
        let state = self.state.take()?;

        if let Some(instances) = state.weekly {
            return Some(ResizeOutcome::WeeklySeries {
                event_id: state.event_id,
                instances,
            });
        }

        match state.candidate {
            Some(range) if range != state.original_range() => Some(ResizeOutcome::Commit {
                event_id: state.event_id,
                range,
            }),
            _ => Some(ResizeOutcome::Unchanged {
                event_id: state.event_id,
            }),
        }
    }

    /// Cancel the resize operation
    pub fn reset(&mut self) {
        self.state = None;
    }

    fn update_timed(state: &mut ResizeState, pos: Pos2, grid: &GridGeometry) -> Option<ResizePreview> {
        let handle = state.handle;

        let start_date = if handle.adjusts_start_date() {
            grid.date_at_x(pos.x)
        } else {
            state.original_start.date()
        };
        let start_time = if handle.adjusts_start_time() {
            grid.time_at_y(pos.y).to_naive_time()
        } else {
            state.original_start.time()
        };

        let end_date = if handle.adjusts_end_date() {
            grid.date_at_x(pos.x)
        } else {
            state.original_end.date()
        };
        let end_time = if handle.adjusts_end_time() {
            grid.time_at_y(pos.y).to_naive_time()
        } else {
            state.original_end.time()
        };

        let range = CandidateRange::new(start_date.and_time(start_time), end_date.and_time(end_time))
            .with_min_duration(!handle.moves_start());

        Self::stage_range(state, range)
    }

    fn update_month(
        state: &mut ResizeState,
        pos: Pos2,
        grid: &GridGeometry,
        locator: Option<&dyn CellLocator>,
    ) -> Option<ResizePreview> {
        let locator = locator?;

        // Cursor outside the grid falls back to the last valid cell
        let cell = match locator.locate(pos) {
            Some(cell) => {
                state.last_cell = Some(cell);
                cell
            }
            None => state.last_cell?,
        };

        if state.handle.is_vertical() {
            if state.origin_row.is_none() {
                // Ask the locator first; fall back to Monday-week
                // arithmetic from the grid's first visible date
                state.origin_row = locator
                    .row_of_date(state.original_start.date())
                    .or_else(|| {
                        usize::try_from(weeks_between(
                            grid.first_date,
                            state.original_start.date(),
                        ))
                        .ok()
                    });
            }
            let origin_row = state.origin_row?;

            if cell.row == origin_row {
                // Back on the original row: no time axis here, so the
                // event reverts to its original span. A series preview
                // still on screen has to be cleared explicitly.
                if state.weekly.take().is_some() {
                    let range = state.original_range();
                    state.candidate = Some(range);
                    return Some(ResizePreview::Range(range));
                }
                return None;
            }

            let instances = WeeklyInstanceSet::synthesize_naive(
                state.original_start,
                state.original_end,
                origin_row,
                cell.row,
            );
            if state.weekly.as_ref() == Some(&instances) {
                return None;
            }
            log::debug!(
                "vertical resize crossed week rows {} -> {}: previewing {} weekly instances",
                origin_row,
                cell.row,
                instances.len()
            );
            state.weekly = Some(instances.clone());
            state.candidate = None;
            return Some(ResizePreview::WeeklySeries(instances));
        }

        // Horizontal month resize: day granularity, original times kept
        let handle = state.handle;
        let (start_dt, end_dt) = if handle.adjusts_end_date() {
            (
                state.original_start,
                cell.date.and_time(state.original_end.time()),
            )
        } else {
            (
                cell.date.and_time(state.original_start.time()),
                state.original_end,
            )
        };

        let range = CandidateRange::new(start_dt, end_dt).with_min_duration(!handle.moves_start());
        Self::stage_range(state, range)
    }

    fn stage_range(state: &mut ResizeState, range: CandidateRange) -> Option<ResizePreview> {
        state.weekly = None;
        if state.candidate == Some(range) {
            return None;
        }
        state.candidate = Some(range);
        Some(ResizePreview::Range(range))
    }
}

impl WeeklyInstanceSet {
    /// As `synthesize`, from naive timestamps
    pub(crate) fn synthesize_naive(
        start: NaiveDateTime,
        end: NaiveDateTime,
        origin_row: usize,
        target_row: usize,
    ) -> Self {
        let base_date = start.date();
        let (first, last) = if target_row >= origin_row {
            (origin_row, target_row)
        } else {
            (target_row, origin_row)
        };

        let instances = (first..=last)
            .map(|row| {
                let offset_weeks = row as i64 - origin_row as i64;
                WeeklyInstance {
                    date: base_date + Duration::weeks(offset_weeks),
                    start: start.time(),
                    end: end.time(),
                }
            })
            .collect();

        Self { instances }
    }
}

/// Size of the resize handle hit area
pub const HANDLE_SIZE: f32 = 8.0;

/// Calculate handle hit zones for an event block
pub struct HandleRects {
    pub top: Option<Rect>,
    pub bottom: Option<Rect>,
    pub left: Option<Rect>,
    pub right: Option<Rect>,
    pub corners: bool,
}

impl HandleRects {
    /// Handle zones for a timed event (top/bottom only)
    pub fn for_timed_event(event_rect: Rect) -> Self {
        let event_height = event_rect.height();

        // For small events (single slot), divide into top and bottom halves.
        // For larger events, use a fixed zone at the edges.
        let zone_height = if event_height < 50.0 {
            event_height / 2.0
        } else {
            20.0
        };

        Self {
            top: Some(Rect::from_min_size(
                Pos2::new(event_rect.left(), event_rect.top()),
                Vec2::new(event_rect.width(), zone_height),
            )),
            bottom: Some(Rect::from_min_size(
                Pos2::new(event_rect.left(), event_rect.bottom() - zone_height),
                Vec2::new(event_rect.width(), zone_height),
            )),
            left: None,
            right: None,
            corners: false,
        }
    }

    /// Handle zones for a multi-day event (all edges plus corners)
    pub fn for_multiday_event(event_rect: Rect) -> Self {
        let handle_height = event_rect.height().min(20.0);
        let handle_width = event_rect.width().min(30.0);

        Self {
            top: Some(Rect::from_center_size(
                Pos2::new(event_rect.center().x, event_rect.top()),
                Vec2::new(handle_width, HANDLE_SIZE),
            )),
            bottom: Some(Rect::from_center_size(
                Pos2::new(event_rect.center().x, event_rect.bottom()),
                Vec2::new(handle_width, HANDLE_SIZE),
            )),
            left: Some(Rect::from_center_size(
                Pos2::new(event_rect.left(), event_rect.center().y),
                Vec2::new(HANDLE_SIZE, handle_height),
            )),
            right: Some(Rect::from_center_size(
                Pos2::new(event_rect.right(), event_rect.center().y),
                Vec2::new(HANDLE_SIZE, handle_height),
            )),
            corners: true,
        }
    }

    /// Handle zones for ribbon events (left/right only)
    pub fn for_ribbon_event(event_rect: Rect) -> Self {
        let handle_height = event_rect.height().min(20.0);

        Self {
            top: None,
            bottom: None,
            left: Some(Rect::from_center_size(
                Pos2::new(event_rect.left(), event_rect.center().y),
                Vec2::new(HANDLE_SIZE, handle_height),
            )),
            right: Some(Rect::from_center_size(
                Pos2::new(event_rect.right(), event_rect.center().y),
                Vec2::new(HANDLE_SIZE, handle_height),
            )),
            corners: false,
        }
    }

    /// Check if a point hits any handle and return which one.
    /// Corner zones (edge overlaps) win over plain edges.
    pub fn hit_test(&self, pos: Pos2) -> Option<ResizeHandle> {
        let in_top = self.top.is_some_and(|r| r.contains(pos));
        let in_bottom = self.bottom.is_some_and(|r| r.contains(pos));
        let in_left = self.left.is_some_and(|r| r.contains(pos));
        let in_right = self.right.is_some_and(|r| r.contains(pos));

        if self.corners {
            match (in_top, in_bottom, in_left, in_right) {
                (true, _, true, _) => return Some(ResizeHandle::TopLeft),
                (true, _, _, true) => return Some(ResizeHandle::TopRight),
                (_, true, true, _) => return Some(ResizeHandle::BottomLeft),
                (_, true, _, true) => return Some(ResizeHandle::BottomRight),
                _ => {}
            }
        }

        if in_top {
            Some(ResizeHandle::Top)
        } else if in_bottom {
            Some(ResizeHandle::Bottom)
        } else if in_left {
            Some(ResizeHandle::Left)
        } else if in_right {
            Some(ResizeHandle::Right)
        } else {
            None
        }
    }
}
