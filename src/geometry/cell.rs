//! Month-grid cell lookup.
//!
//! Month grids wrap across week rows, so pixel-X arithmetic alone cannot
//! resolve a day. Cell lookup is an injected capability so the engine stays
//! independent of how the host renders its cells.

use chrono::{Duration, NaiveDate};
use egui::{Pos2, Rect};

/// A cell in a month grid: week row, weekday column and the date it shows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellCoordinate {
    pub row: usize,
    pub col: usize,
    pub date: NaiveDate,
}

/// Capability to resolve the calendar cell under a pointer position.
///
/// Returns `None` when the position is outside the grid; callers fall back
/// to the last valid cell rather than failing the gesture.
pub trait CellLocator {
    fn locate(&self, pos: Pos2) -> Option<CellCoordinate>;

    /// Week row showing the given date, if visible. Locators that cannot
    /// answer this disable week-crossing detection.
    fn row_of_date(&self, _date: NaiveDate) -> Option<usize> {
        None
    }
}

/// Cell locator over a uniform rows-by-columns month grid
#[derive(Clone, Debug)]
pub struct GridCellLocator {
    pub bounds: Rect,
    pub rows: usize,
    pub cols: usize,
    /// Date shown in the top-left cell
    pub first_date: NaiveDate,
}

impl GridCellLocator {
    pub fn new(bounds: Rect, rows: usize, cols: usize, first_date: NaiveDate) -> Self {
        Self {
            bounds,
            rows,
            cols,
            first_date,
        }
    }
}

impl CellLocator for GridCellLocator {
    fn row_of_date(&self, date: NaiveDate) -> Option<usize> {
        let days = (date - self.first_date).num_days();
        if days < 0 {
            return None;
        }
        let row = days as usize / self.cols;
        (row < self.rows).then_some(row)
    }

    fn locate(&self, pos: Pos2) -> Option<CellCoordinate> {
        if self.rows == 0 || self.cols == 0 || !self.bounds.contains(pos) {
            return None;
        }

        let cell_width = self.bounds.width() / self.cols as f32;
        let cell_height = self.bounds.height() / self.rows as f32;

        let col = (((pos.x - self.bounds.left()) / cell_width) as usize).min(self.cols - 1);
        let row = (((pos.y - self.bounds.top()) / cell_height) as usize).min(self.rows - 1);

        let date = self.first_date + Duration::days((row * self.cols + col) as i64);
        Some(CellCoordinate { row, col, date })
    }
}
