//! Grid module - the match-three board
//!
//! The grid is a `width x height` board where each cell is empty or holds a gem.
//! Uses a flat row-major vector so boards of any size up to `MAX_GRID` share
//! one code path. Coordinates: (x, y) where x grows right and y grows down;
//! gems fall towards larger y.

use serde::{Deserialize, Serialize};

use crate::types::{GemColor, Pos, Special, MAX_GRID};

/// A gem on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gem {
    pub color: GemColor,
    #[serde(default)]
    pub special: Special,
}

impl Gem {
    pub fn new(color: GemColor) -> Self {
        Self {
            color,
            special: Special::None,
        }
    }

    pub fn with_special(color: GemColor, special: Special) -> Self {
        Self { color, special }
    }

    /// Color used for matching; color bombs never match by color
    pub fn match_color(&self) -> Option<GemColor> {
        match self.special {
            Special::ColorBomb => None,
            _ => Some(self.color),
        }
    }
}

/// A board cell: `None` is empty
pub type Cell = Option<Gem>;

/// The match-three board with flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty board; dimensions are clamped to `1..=MAX_GRID`
    pub fn new(width: u8, height: u8) -> Self {
        let width = width.clamp(1, MAX_GRID);
        let height = height.clamp(1, MAX_GRID);
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    /// Parse a fixture: one string per row, one letter per cell
    ///
    /// Letters follow [`GemColor::letter`]; `.` is an empty cell. Rows shorter
    /// than the first row are padded with empty cells.
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_arcade_core::match3::Grid;
    /// use tui_arcade_core::types::{GemColor, Pos};
    ///
    /// let grid = Grid::from_rows(&["RGB", "R.B"]);
    /// assert_eq!(grid.width(), 3);
    /// assert_eq!(grid.color_at(Pos::new(2, 1)), Some(GemColor::Blue));
    /// assert_eq!(grid.color_at(Pos::new(1, 1)), None);
    /// ```
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len().min(MAX_GRID as usize) as u8;
        let width = rows
            .first()
            .map(|r| r.chars().count())
            .unwrap_or(1)
            .min(MAX_GRID as usize) as u8;
        let mut grid = Self::new(width, height);
        for (y, row) in rows.iter().enumerate().take(grid.height as usize) {
            for (x, ch) in row.chars().enumerate().take(grid.width as usize) {
                let cell = GemColor::from_str(&ch.to_string()).map(Gem::new);
                grid.set(x as i8, y as i8, cell);
            }
        }
        grid
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if x < 0 || y < 0 || x as u8 >= self.width || y as u8 >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    pub fn at(&self, pos: Pos) -> Option<Cell> {
        self.get(pos.x, pos.y)
    }

    /// Gem at `pos`, `None` when empty or out of bounds
    pub fn gem(&self, pos: Pos) -> Option<Gem> {
        self.at(pos).flatten()
    }

    /// Matching color at `pos` (see [`Gem::match_color`])
    pub fn color_at(&self, pos: Pos) -> Option<GemColor> {
        self.gem(pos).and_then(|g| g.match_color())
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    pub fn set_at(&mut self, pos: Pos, cell: Cell) -> bool {
        self.set(pos.x, pos.y, cell)
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.index(pos.x, pos.y).is_some()
    }

    /// Swap two cells; false if either is out of bounds
    pub fn swap(&mut self, a: Pos, b: Pos) -> bool {
        match (self.index(a.x, a.y), self.index(b.x, b.y)) {
            (Some(ia), Some(ib)) => {
                self.cells.swap(ia, ib);
                true
            }
            _ => false,
        }
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Every in-bounds position in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height as i8).flat_map(move |y| (0..self.width as i8).map(move |x| Pos::new(x, y)))
    }

    /// Number of gems of each palette color (color bombs excluded)
    pub fn color_counts(&self) -> [usize; GemColor::COUNT] {
        let mut counts = [0; GemColor::COUNT];
        for gem in self.cells.iter().flatten() {
            if let Some(color) = gem.match_color() {
                counts[color.index()] += 1;
            }
        }
        counts
    }

    /// Compact text rendering (one row per line)
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height as i8)
            .map(|y| {
                (0..self.width as i8)
                    .map(|x| match self.get(x, y).flatten() {
                        Some(g) if g.special == Special::ColorBomb => '*',
                        Some(g) => g.color.letter(),
                        None => '.',
                    })
                    .collect()
            })
            .collect()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }
}
