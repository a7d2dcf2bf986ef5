//! Level layouts
//!
//! Levels 0..=14 are built-in patterns, level 15 takes its layout from the
//! map service. Patterns with random detail draw from the session RNG so a
//! seed reproduces the same layout.

use rand::Rng;
use serde::Deserialize;

use super::grid::{BrickGrid, Cell};
use crate::consts::PROCEDURAL_LEVEL;
use crate::error::FetchError;

/// Layout pattern selected by level id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Tunnel,
    Pyramid,
    Chambers,
    Mosaic,
    Fortress,
    Galactic,
    Bastion,
    Coliseum,
    RoyalMaze,
    DarkMaze,
    Crypts,
    Crystal,
    Mines,
    Temple,
    Station,
    /// Supplied by the map service
    Procedural,
    /// A few full rows near the top
    Fallback,
}

impl Pattern {
    pub fn for_level(level: u32) -> Self {
        match level {
            0 => Pattern::Tunnel,
            1 => Pattern::Pyramid,
            2 => Pattern::Chambers,
            3 => Pattern::Mosaic,
            4 => Pattern::Fortress,
            5 => Pattern::Galactic,
            6 => Pattern::Bastion,
            7 => Pattern::Coliseum,
            8 => Pattern::RoyalMaze,
            9 => Pattern::DarkMaze,
            10 => Pattern::Crypts,
            11 => Pattern::Crystal,
            12 => Pattern::Mines,
            13 => Pattern::Temple,
            14 => Pattern::Station,
            PROCEDURAL_LEVEL => Pattern::Procedural,
            _ => Pattern::Fallback,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Tunnel => "tunnel",
            Pattern::Pyramid => "pyramid",
            Pattern::Chambers => "chambers",
            Pattern::Mosaic => "mosaic",
            Pattern::Fortress => "fortress",
            Pattern::Galactic => "galactic",
            Pattern::Bastion => "bastion",
            Pattern::Coliseum => "coliseum",
            Pattern::RoyalMaze => "royal_maze",
            Pattern::DarkMaze => "dark_maze",
            Pattern::Crypts => "crypts",
            Pattern::Crystal => "crystal",
            Pattern::Mines => "mines",
            Pattern::Temple => "temple",
            Pattern::Station => "station",
            Pattern::Procedural => "infinite",
            Pattern::Fallback => "fallback",
        }
    }
}

/// A validated layout received from the map service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalGrid {
    columns: usize,
    rows: usize,
    /// Row-major, as the service sends it
    cells: Vec<Cell>,
}

impl ExternalGrid {
    /// Validate raw `grid[row][column]` data against the requested size
    pub fn from_rows(
        rows: &[Vec<u8>],
        columns: usize,
        row_count: usize,
    ) -> Result<Self, FetchError> {
        let actual_columns = rows.first().map_or(0, |r| r.len());
        if rows.len() != row_count || rows.iter().any(|r| r.len() != columns) {
            return Err(FetchError::DimensionMismatch {
                expected: (columns, row_count),
                actual: (actual_columns, rows.len()),
            });
        }

        let mut cells = Vec::with_capacity(columns * row_count);
        for (row, values) in rows.iter().enumerate() {
            for (column, &value) in values.iter().enumerate() {
                let cell =
                    Cell::from_code(value).ok_or(FetchError::InvalidCell { column, row, value })?;
                cells.push(cell);
            }
        }

        Ok(Self {
            columns,
            rows: row_count,
            cells,
        })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn get(&self, column: usize, row: usize) -> Cell {
        self.cells[row * self.columns + column]
    }

    /// At least one destructible cell
    pub fn has_bricks(&self) -> bool {
        self.cells.contains(&Cell::Brick)
    }
}

#[derive(Deserialize)]
struct MapResponse {
    success: bool,
    data: Option<MapData>,
}

#[derive(Deserialize)]
struct MapData {
    grid: Vec<Vec<u8>>,
}

/// Parse the map service's JSON body (`{"success": true, "data": {"grid": [[..]]}}`)
pub fn parse_grid_response(body: &str) -> Result<Vec<Vec<u8>>, FetchError> {
    let response: MapResponse =
        serde_json::from_str(body).map_err(|err| FetchError::Malformed(err.to_string()))?;
    if !response.success {
        return Err(FetchError::Unavailable("service reported failure".to_string()));
    }
    response
        .data
        .map(|data| data.grid)
        .ok_or_else(|| FetchError::Malformed("missing grid".to_string()))
}

/// Fill `grid` with the layout for `level`
///
/// The grid is cleared first. The procedural level copies `external` when
/// given and uses the fallback rows otherwise.
pub fn generate_map<R: Rng>(
    grid: &mut BrickGrid,
    level: u32,
    external: Option<&ExternalGrid>,
    rng: &mut R,
) {
    grid.clear();
    let pattern = Pattern::for_level(level);
    let cols = grid.columns() as i64;
    let rows = grid.rows() as i64;

    let mut put = |c: i64, r: i64, cell: Cell| {
        if c >= 0 && r >= 0 {
            grid.set(c as usize, r as usize, cell);
        }
    };

    match pattern {
        Pattern::Tunnel => {
            let center = cols / 2;
            let barrier = rows - 5;
            for c in 0..cols {
                for r in 0..rows {
                    if (r == barrier || r == barrier - 1) && (c - center).abs() > 3 {
                        put(c, r, Cell::Wall);
                    } else if r < barrier - 3 && (r % 2 == 0 || c % 2 == 0) {
                        put(c, r, Cell::Brick);
                    }
                }
            }
        }
        Pattern::Pyramid => {
            let center = cols / 2;
            for c in 0..cols {
                let distance = (c - center).abs();
                let max_r = (rows as f32 - distance as f32 / 1.5).floor() as i64;
                for r in 0..max_r {
                    let edge = r == max_r - 1 || distance < 2;
                    let cell = if edge && rng.random_bool(0.3) {
                        Cell::Wall
                    } else {
                        Cell::Brick
                    };
                    put(c, r, cell);
                }
            }
        }
        Pattern::Chambers => {
            for c in 0..cols {
                for r in 0..rows {
                    if c % 10 == 0 || (r % 8 == 0 && c % 10 != 5) {
                        put(c, r, Cell::Wall);
                    } else if rng.random_bool(0.8) {
                        put(c, r, Cell::Brick);
                    }
                }
            }
        }
        Pattern::Mosaic => {
            let bottom = (rows as f32 * 0.7).floor() as i64;
            for c in 0..cols {
                for r in 2..bottom {
                    let cell = if (c + r) % 5 == 0 { Cell::Wall } else { Cell::Brick };
                    put(c, r, cell);
                }
            }
        }
        Pattern::Fortress => {
            let margin = 3;
            for c in margin..cols - margin {
                for r in 2..rows - 6 {
                    let rampart = c == margin || c == cols - margin - 1 || r == 2;
                    let cell = if rampart || (c + r) % 7 == 0 {
                        Cell::Wall
                    } else {
                        Cell::Brick
                    };
                    put(c, r, cell);
                }
            }
        }
        Pattern::Galactic => {
            for c in 0..cols {
                for r in 1..rows - 4 {
                    if rng.random_bool(0.92) {
                        let cell = if rng.random_bool(0.15) { Cell::Wall } else { Cell::Brick };
                        put(c, r, cell);
                    }
                }
            }
        }
        Pattern::Bastion => {
            let towers = [
                (cols as f32 * 0.2).floor() as i64,
                (cols as f32 * 0.5).floor() as i64,
                (cols as f32 * 0.8).floor() as i64,
            ];
            for c in 0..cols {
                for r in 2..8 {
                    if towers.iter().any(|&t| (c - t).abs() <= 1) {
                        put(c, r, Cell::Wall);
                    } else if r % 2 == 0 {
                        put(c, r, Cell::Brick);
                    }
                }
            }
        }
        Pattern::Coliseum => {
            for c in 0..cols {
                for r in 1..rows - 3 {
                    if (c == 5 || c == cols - 6) && (r == 2 || r == 6) {
                        put(c, r, Cell::Wall);
                    } else if (c == 0 || c == cols - 1) && r % 4 == 0 {
                        put(c, r, Cell::Wall);
                    } else if r < rows - 6 && (c < 4 || c > cols - 5 || r < 3) {
                        put(c, r, Cell::Brick);
                    }
                }
            }
        }
        Pattern::RoyalMaze => {
            for c in 0..cols {
                for r in 1..rows - 3 {
                    if c % 4 == 0 && r % 3 == 0 {
                        put(c, r, Cell::Wall);
                    } else if c % 4 != 0 && r % 3 != 0 {
                        put(c, r, Cell::Brick);
                    }
                }
            }
        }
        Pattern::DarkMaze => {
            for c in 0..cols {
                for r in 1..rows - 3 {
                    let wall = r % 3 == 0 && c % 8 != 3 && c % 8 != 4;
                    put(c, r, if wall { Cell::Wall } else { Cell::Brick });
                }
            }
        }
        Pattern::Crypts => {
            for c in 0..cols {
                for r in 1..rows - 5 {
                    let wall = (c % 5 == 0 && r % 6 != 0) || (c + r) % 7 == 0;
                    put(c, r, if wall { Cell::Wall } else { Cell::Brick });
                }
            }
        }
        Pattern::Crystal => {
            for c in 0..cols {
                for r in 1..rows - 4 {
                    put(c, r, if (c + r) % 4 == 0 { Cell::Wall } else { Cell::Brick });
                }
            }
        }
        Pattern::Mines => {
            for c in 0..cols {
                for r in 1..rows - 3 {
                    if (c as f32 * 0.5).sin() * (r as f32 * 0.5).cos() > 0.2 {
                        let cell = if rng.random_bool(0.2) { Cell::Wall } else { Cell::Brick };
                        put(c, r, cell);
                    }
                }
            }
        }
        Pattern::Temple => {
            let center_x = cols / 2;
            let center_y = rows / 3;
            for c in 0..cols {
                for r in 1..rows - 3 {
                    if c == center_x || r == center_y {
                        put(c, r, Cell::Wall);
                    } else if (c - center_x).abs() < 5 && (r - center_y).abs() < 5 {
                        put(c, r, Cell::Brick);
                    }
                }
            }
        }
        Pattern::Station => {
            for c in 0..cols {
                for r in 0..rows - 4 {
                    let wing = c == 1 || c == cols - 2;
                    let main_hull = r < 5 && c > 3 && c < cols - 4;
                    if wing {
                        put(c, r, if r % 3 == 0 { Cell::Wall } else { Cell::Brick });
                    } else if main_hull {
                        put(c, r, Cell::Brick);
                    } else if r == 6 && c % 4 == 0 {
                        put(c, r, Cell::Wall);
                    }
                }
            }
        }
        Pattern::Procedural => match external {
            Some(ext) => {
                let cols = ext.columns().min(cols as usize);
                let rows = ext.rows().min(rows as usize);
                for c in 0..cols {
                    for r in 0..rows {
                        put(c as i64, r as i64, ext.get(c, r));
                    }
                }
            }
            None => fill_fallback(&mut put, cols),
        },
        Pattern::Fallback => fill_fallback(&mut put, cols),
    }

    log::info!(
        "Level {} ({}): {}x{} grid, {} bricks",
        level,
        pattern.name(),
        grid.columns(),
        grid.rows(),
        grid.remaining()
    );
}

fn fill_fallback(put: &mut impl FnMut(i64, i64, Cell), cols: i64) {
    for c in 0..cols {
        for r in 1..4 {
            put(c, r, Cell::Brick);
        }
    }
}
