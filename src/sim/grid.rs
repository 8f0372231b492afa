//! Level grid
//!
//! A fixed `width x height` array of cells laid over the playfield. Obstacles
//! block the ship; loot cells are consumed when the ship enters them.

use serde::{Deserialize, Serialize};

/// Cell states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Obstacle,
    Loot,
}

impl Cell {
    /// Level text mapping: `#` obstacle, `@` loot, anything else empty
    pub fn from_char(c: char) -> Self {
        match c {
            '#' => Cell::Obstacle,
            '@' => Cell::Loot,
            _ => Cell::Empty,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Obstacle => '#',
            Cell::Loot => '@',
        }
    }
}

/// Level grid (row-major)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    /// Columns
    pub width: usize,
    /// Rows
    pub height: usize,
    /// Cell edge in pixels
    pub cell_size: f32,
    cells: Vec<Cell>,
}

impl Grid {
    /// All-empty grid
    pub fn new(width: usize, height: usize, cell_size: f32) -> Self {
        Self {
            width,
            height,
            cell_size,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// Grid filled from level text rows; characters past the grid are ignored
    pub fn from_rows<S: AsRef<str>>(width: usize, height: usize, cell_size: f32, rows: &[S]) -> Self {
        let mut grid = Self::new(width, height, cell_size);
        grid.load_rows(rows);
        grid
    }

    /// Overlay level text rows onto the grid
    pub fn load_rows<S: AsRef<str>>(&mut self, rows: &[S]) {
        for (row, line) in rows.iter().enumerate().take(self.height) {
            for (col, c) in line.as_ref().chars().enumerate().take(self.width) {
                match Cell::from_char(c) {
                    Cell::Obstacle => self.add_obstacle(row, col),
                    Cell::Loot => self.place_loot(row, col),
                    Cell::Empty => {}
                }
            }
        }
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.height && col < self.width).then(|| row * self.width + col)
    }

    /// Cell at `(row, col)`, `None` off-grid
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        self.index(row, col).map(|i| self.cells[i])
    }

    /// Mark a cell as an obstacle (ignored off-grid)
    pub fn add_obstacle(&mut self, row: usize, col: usize) {
        if let Some(i) = self.index(row, col) {
            self.cells[i] = Cell::Obstacle;
        }
    }

    /// Mark a cell as loot (ignored off-grid)
    pub fn place_loot(&mut self, row: usize, col: usize) {
        if let Some(i) = self.index(row, col) {
            self.cells[i] = Cell::Loot;
        }
    }

    /// `(row, col)` containing a pixel coordinate, `None` off-grid
    pub fn cell_at(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        let col = (x / self.cell_size).floor();
        let row = (y / self.cell_size).floor();
        if !(col >= 0.0 && row >= 0.0) {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        self.index(row, col).map(|_| (row, col))
    }

    /// Whether the pixel coordinate falls in an obstacle cell (false off-grid)
    pub fn is_obstacle(&self, x: f32, y: f32) -> bool {
        self.cell_at(x, y)
            .and_then(|(row, col)| self.cell(row, col))
            .is_some_and(|c| c == Cell::Obstacle)
    }

    /// Consume the loot under a pixel coordinate, returning its cell
    pub fn take_loot(&mut self, x: f32, y: f32) -> Option<(usize, usize)> {
        let (row, col) = self.cell_at(x, y)?;
        let i = self.index(row, col)?;
        if self.cells[i] != Cell::Loot {
            return None;
        }
        self.cells[i] = Cell::Empty;
        Some((row, col))
    }

    /// Loot cells remaining
    pub fn loot_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Loot).count()
    }

    /// Pixel center of a cell
    pub fn cell_center(&self, row: usize, col: usize) -> glam::Vec2 {
        glam::Vec2::new(
            (col as f32 + 0.5) * self.cell_size,
            (row as f32 + 0.5) * self.cell_size,
        )
    }

    /// Remaining loot cells as `(row, col)`
    pub fn loot_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Cell::Loot)
            .map(|(i, _)| (i / self.width, i % self.width))
    }

    /// Back to all-empty, same dimensions
    pub fn reset(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Text rendering, one string per row
    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width.max(1))
            .map(|row| row.iter().map(|c| c.as_char()).collect())
            .collect()
    }
}
