// Test fixtures - reusable test data
// Provides consistent grids, locators and events across test files
#![allow(dead_code)]

use calendar_gestures::geometry::cell::GridCellLocator;
use calendar_gestures::geometry::{GridGeometry, ViewMode};
use calendar_gestures::models::event::Event;
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use egui::{Pos2, Rect, Vec2};

/// Monday at the start of the fixture week
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 9).unwrap()
}

pub fn local(day: u32, hour: u32, minute: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2025, 6, day, hour, minute, 0).unwrap()
}

/// Week grid at the window origin: no time label column, 100px day
/// columns, 80px per hour, 15 minute snapping
pub fn week_grid() -> GridGeometry {
    let mut grid = GridGeometry::new(Pos2::ZERO, ViewMode::Week, monday());
    grid.time_label_width = 0.0;
    grid.column_width = 100.0;
    grid
}

/// Month grid over June 2025 (first cell Monday 2025-06-02)
pub fn month_grid() -> GridGeometry {
    GridGeometry::new(
        Pos2::ZERO,
        ViewMode::Month,
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
    )
}

/// Locator matching `month_grid`: 6 rows x 7 cols of 70px cells
pub fn month_locator() -> GridCellLocator {
    GridCellLocator::new(
        Rect::from_min_size(Pos2::ZERO, Vec2::new(490.0, 420.0)),
        6,
        7,
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
    )
}

/// One-hour meeting on Tuesday morning of the fixture week
pub fn tuesday_meeting(id: i64) -> Event {
    let mut event = Event::new("Design review", local(10, 9, 0), local(10, 10, 0)).unwrap();
    event.id = Some(id);
    event
}
