//! Brick grid storage and geometry
//!
//! Cells are stored column-major in one flat buffer. Geometry (cell size,
//! pitch, offsets) is fixed when the grid is created for a session.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Contents of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty = 0,
    /// Cleared on hit, scores points
    Brick = 1,
    /// Blocks the ball, never cleared
    Wall = 2,
}

impl Cell {
    /// Decode the map service's cell code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Brick),
            2 => Some(Cell::Wall),
            _ => None,
        }
    }

    #[inline]
    pub fn is_occupied(self) -> bool {
        self != Cell::Empty
    }
}

/// Derived grid dimensions and cell geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub columns: usize,
    pub rows: usize,
    pub cell_width: f32,
    pub cell_height: f32,
    pub padding: f32,
    pub offset_left: f32,
    pub offset_top: f32,
}

/// Snap a count down to the nearest `6n + 1` (keeps symmetric patterns centered)
#[inline]
pub fn snap_six_plus_one(count: i64) -> i64 {
    if count < 1 {
        return count;
    }
    ((count - 1) / 6) * 6 + 1
}

/// Compute grid dimensions for a play field
///
/// Columns are the largest `6n + 1` that fits the field width at the target
/// cell size; rows fill `coverage` of the field height with square cells.
pub fn derive_dimensions(
    field_width: f32,
    field_height: f32,
    target_cell_size: f32,
    padding: f32,
    offset_left: f32,
    offset_top: f32,
    coverage: f32,
) -> Result<GridLayout, GridError> {
    if !(field_width.is_finite() && field_height.is_finite())
        || field_width <= 0.0
        || field_height <= 0.0
    {
        return Err(GridError::InvalidField {
            width: field_width,
            height: field_height,
        });
    }

    let pitch = target_cell_size + padding;
    let invalid_pitch = GridError::InvalidCellPitch {
        cell_size: target_cell_size,
        padding,
    };
    if !(pitch > 0.0 && padding >= 0.0 && pitch.is_finite()) {
        return Err(invalid_pitch);
    }

    let available_width = field_width - offset_left * 2.0;
    let target_columns = (available_width / pitch).floor();
    if !target_columns.is_finite() {
        return Err(invalid_pitch);
    }
    let columns = snap_six_plus_one(target_columns as i64);
    if columns <= 0 {
        return Err(GridError::NonPositiveDimensions {
            columns,
            rows: 0,
        });
    }

    let cell_width = (available_width - columns as f32 * padding) / columns as f32;
    let cell_height = cell_width;
    let rows = if cell_width > 0.0 {
        ((field_height * coverage) / (cell_height + padding)).floor()
    } else {
        0.0
    };
    if !rows.is_finite() {
        return Err(invalid_pitch);
    }
    let rows = rows as i64;
    if rows <= 0 {
        return Err(GridError::NonPositiveDimensions { columns, rows });
    }

    Ok(GridLayout {
        columns: columns as usize,
        rows: rows as usize,
        cell_width,
        cell_height,
        padding,
        offset_left,
        offset_top,
    })
}

impl GridLayout {
    /// Horizontal distance between neighbouring cell origins
    #[inline]
    pub fn pitch_x(&self) -> f32 {
        self.cell_width + self.padding
    }

    #[inline]
    pub fn pitch_y(&self) -> f32 {
        self.cell_height + self.padding
    }

    /// Top-left corner of a cell
    pub fn cell_origin(&self, column: usize, row: usize) -> Vec2 {
        Vec2::new(
            column as f32 * self.pitch_x() + self.offset_left,
            row as f32 * self.pitch_y() + self.offset_top,
        )
    }

    pub fn cell_center(&self, column: usize, row: usize) -> Vec2 {
        self.cell_origin(column, row) + Vec2::new(self.cell_width, self.cell_height) * 0.5
    }

    /// Lowest y covered by the grid
    pub fn bottom(&self) -> f32 {
        self.offset_top + self.rows as f32 * self.pitch_y()
    }

    /// Inclusive index range of cells whose pitch box intersects `[min, max]`
    ///
    /// O(1): maps the bounding box straight onto grid indices.
    pub fn candidate_range(
        &self,
        min: Vec2,
        max: Vec2,
    ) -> Option<(usize, usize, usize, usize)> {
        let to_index = |value: f32, offset: f32, pitch: f32| ((value - offset) / pitch).floor();

        let min_col = to_index(min.x, self.offset_left, self.pitch_x()).max(0.0);
        let max_col =
            to_index(max.x, self.offset_left, self.pitch_x()).min(self.columns as f32 - 1.0);
        let min_row = to_index(min.y, self.offset_top, self.pitch_y()).max(0.0);
        let max_row = to_index(max.y, self.offset_top, self.pitch_y()).min(self.rows as f32 - 1.0);

        if !(min_col <= max_col && min_row <= max_row) {
            return None;
        }
        Some((
            min_col as usize,
            max_col as usize,
            min_row as usize,
            max_row as usize,
        ))
    }
}

/// The grid of brick cells for one level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrickGrid {
    layout: GridLayout,
    cells: Vec<Cell>,
    /// Destructible cells left (kept in sync on every write)
    remaining: usize,
}

impl BrickGrid {
    /// Allocate an empty grid; rejects zero-sized layouts
    pub fn new(layout: GridLayout) -> Result<Self, GridError> {
        if layout.columns == 0 || layout.rows == 0 {
            return Err(GridError::NonPositiveDimensions {
                columns: layout.columns as i64,
                rows: layout.rows as i64,
            });
        }
        let len = layout
            .columns
            .checked_mul(layout.rows)
            .ok_or(GridError::TooLarge {
                columns: layout.columns,
                rows: layout.rows,
            })?;
        Ok(Self {
            layout,
            cells: vec![Cell::Empty; len],
            remaining: 0,
        })
    }

    #[inline]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.layout.columns
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.layout.rows
    }

    #[inline]
    fn index(&self, column: usize, row: usize) -> usize {
        column * self.layout.rows + row
    }

    /// Cell at (column, row); out-of-range reads as empty
    pub fn get(&self, column: usize, row: usize) -> Cell {
        if column >= self.layout.columns || row >= self.layout.rows {
            return Cell::Empty;
        }
        self.cells[self.index(column, row)]
    }

    /// Overwrite a cell; out-of-range writes are ignored
    pub fn set(&mut self, column: usize, row: usize, cell: Cell) {
        if column >= self.layout.columns || row >= self.layout.rows {
            return;
        }
        let idx = self.index(column, row);
        let old = std::mem::replace(&mut self.cells[idx], cell);
        if old == Cell::Brick {
            self.remaining -= 1;
        }
        if cell == Cell::Brick {
            self.remaining += 1;
        }
    }

    /// Clear a destructible cell. Returns false for walls and empty cells.
    pub fn destroy(&mut self, column: usize, row: usize) -> bool {
        if self.get(column, row) != Cell::Brick {
            return false;
        }
        self.set(column, row, Cell::Empty);
        true
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
        self.remaining = 0;
    }

    /// Destructible cells left
    #[inline]
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Full recount of destructible cells
    pub fn count_destructible(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Brick).count()
    }

    /// Cells of one column, top to bottom
    pub fn column(&self, column: usize) -> &[Cell] {
        let start = self.index(column, 0);
        &self.cells[start..start + self.layout.rows]
    }
}
