//! Geometry to calendar-time conversion.
//!
//! Pure, stateless functions mapping pointer pixels onto the time grid.
//! Every operation clamps into range instead of failing, so a degenerate
//! pointer position never produces an error.

pub mod cell;

use chrono::{Duration, NaiveDate, NaiveTime};
use egui::Pos2;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Default snap interval for time slots, in minutes
pub const SNAP_INTERVAL_MINUTES: u32 = 15;

/// A snapped time-of-day position on the grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimePoint {
    pub hour: u32,
    pub minute: u32,
}

impl TimePoint {
    /// Build from minutes past midnight, clamped to the day
    pub fn from_minutes(minutes: u32) -> Self {
        let minutes = minutes.min(MINUTES_PER_DAY - 1);
        Self {
            hour: minutes / 60,
            minute: minutes % 60,
        }
    }

    pub fn minutes_from_midnight(&self) -> u32 {
        self.hour * 60 + self.minute
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

/// Which calendar view the grid is showing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
    Day,
    Week,
    WorkWeek,
    Month,
}

impl ViewMode {
    /// Number of day columns in this view
    pub fn day_columns(&self) -> usize {
        match self {
            ViewMode::Day => 1,
            ViewMode::Week | ViewMode::Month => 7,
            ViewMode::WorkWeek => 5,
        }
    }

    /// True when the view has a vertical time-of-day axis
    pub fn has_time_axis(&self) -> bool {
        !matches!(self, ViewMode::Month)
    }
}

/// Convert a vertical pixel offset to a snapped time of day.
///
/// Clamps to `[00:00, 24:00 - snap]` and rounds the minute to the nearest
/// multiple of `snap_minutes`.
pub fn pixel_y_to_time(
    y: f32,
    grid_top: f32,
    pixels_per_hour: f32,
    snap_minutes: u32,
) -> TimePoint {
    let snap = snap_minutes.clamp(1, MINUTES_PER_DAY);
    let raw_minutes = ((y - grid_top).max(0.0) / pixels_per_hour.max(f32::EPSILON)) * 60.0;
    let last_slot = (MINUTES_PER_DAY - snap) / snap;
    let slot = ((raw_minutes / snap as f32).round() as u32).min(last_slot);
    TimePoint::from_minutes(slot * snap)
}

/// Convert a horizontal pixel offset to a day-column index.
///
/// Clamps to `[0, max_index]` (0 for a single-day view, 6 for a week).
pub fn pixel_x_to_day_index(
    x: f32,
    grid_left: f32,
    time_column_width: f32,
    column_width: f32,
    max_index: usize,
) -> usize {
    if column_width <= 0.0 {
        return 0;
    }
    let offset = x - grid_left - time_column_width;
    if offset <= 0.0 {
        return 0;
    }
    ((offset / column_width) as usize).min(max_index)
}

/// Read-only description of the rendered grid, supplied by the view per frame
#[derive(Clone, Debug)]
pub struct GridGeometry {
    /// Top-left corner of the grid container
    pub origin: Pos2,
    /// Width of the time-label column to the left of the day columns
    pub time_label_width: f32,
    /// Width of one day column
    pub column_width: f32,
    /// Vertical scale of the time axis
    pub pixels_per_hour: f32,
    /// Snap interval for time slots, in minutes
    pub snap_minutes: u32,
    pub view: ViewMode,
    /// Leftmost visible day
    pub first_date: NaiveDate,
}

impl GridGeometry {
    pub fn new(origin: Pos2, view: ViewMode, first_date: NaiveDate) -> Self {
        Self {
            origin,
            time_label_width: 50.0,
            column_width: 120.0,
            pixels_per_hour: 80.0,
            snap_minutes: SNAP_INTERVAL_MINUTES,
            view,
            first_date,
        }
    }

    /// Snapped time of day under a vertical pixel position
    pub fn time_at_y(&self, y: f32) -> TimePoint {
        pixel_y_to_time(y, self.origin.y, self.pixels_per_hour, self.snap_minutes)
    }

    /// Day column index under a horizontal pixel position
    pub fn day_index_at_x(&self, x: f32) -> usize {
        pixel_x_to_day_index(
            x,
            self.origin.x,
            self.time_label_width,
            self.column_width,
            self.view.day_columns().saturating_sub(1),
        )
    }

    /// Calendar date under a horizontal pixel position
    pub fn date_at_x(&self, x: f32) -> NaiveDate {
        self.first_date + Duration::days(self.day_index_at_x(x) as i64)
    }

    /// Date and snapped time under a pointer position
    pub fn cell_at(&self, pos: Pos2) -> (NaiveDate, TimePoint) {
        (self.date_at_x(pos.x), self.time_at_y(pos.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0.0, 0, 0; "grid top is midnight")]
    #[test_case(240.0, 3, 0; "three hours down")]
    #[test_case(260.0, 3, 15; "snaps to nearest quarter")]
    #[test_case(-50.0, 0, 0; "above grid clamps to midnight")]
    #[test_case(1e6, 23, 45; "below grid clamps to last slot")]
    fn test_pixel_y_to_time(y: f32, hour: u32, minute: u32) {
        let time = pixel_y_to_time(y, 0.0, 80.0, 15);
        assert_eq!((time.hour, time.minute), (hour, minute));
    }

    #[test]
    fn test_pixel_y_to_time_respects_grid_top() {
        let time = pixel_y_to_time(300.0, 60.0, 80.0, 15);
        assert_eq!((time.hour, time.minute), (3, 0));
    }

    #[test]
    fn test_pixel_y_to_time_custom_snap() {
        let time = pixel_y_to_time(110.0, 0.0, 80.0, 30);
        // 82.5 minutes rounds to the nearest half hour
        assert_eq!((time.hour, time.minute), (1, 30));
    }

    #[test_case(0.0, 0; "left of columns clamps to first day")]
    #[test_case(55.0, 0; "first column")]
    #[test_case(175.0, 1; "second column")]
    #[test_case(5000.0, 6; "right of grid clamps to last day")]
    fn test_pixel_x_to_day_index(x: f32, expected: usize) {
        assert_eq!(pixel_x_to_day_index(x, 0.0, 50.0, 120.0, 6), expected);
    }

    #[test]
    fn test_pixel_x_to_day_index_single_day_view() {
        assert_eq!(pixel_x_to_day_index(900.0, 0.0, 50.0, 120.0, 0), 0);
    }

    #[test]
    fn test_time_point_from_minutes_clamps() {
        let time = TimePoint::from_minutes(5000);
        assert_eq!((time.hour, time.minute), (23, 59));
    }

    #[test]
    fn test_grid_geometry_cell_at() {
        let first = NaiveDate::from_ymd_opt(2025, 6, 9).unwrap();
        let grid = GridGeometry::new(Pos2::ZERO, ViewMode::Week, first);

        let (date, time) = grid.cell_at(Pos2::new(175.0, 240.0));
        assert_eq!(date, first + Duration::days(1));
        assert_eq!((time.hour, time.minute), (3, 0));
    }

    #[test]
    fn test_view_mode_columns() {
        assert_eq!(ViewMode::Day.day_columns(), 1);
        assert_eq!(ViewMode::Week.day_columns(), 7);
        assert_eq!(ViewMode::WorkWeek.day_columns(), 5);
        assert!(!ViewMode::Month.has_time_axis());
    }
}
