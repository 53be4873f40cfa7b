//! Bubble grid - hex-offset rows of colored bubbles
//!
//! Every other row is shifted half a tile to the right, so each bubble touches
//! up to six neighbours. Which rows are shifted is decided by `row_offset`,
//! which flips whenever a new row is pushed in from the top; that keeps every
//! existing bubble's neighbourhood unchanged as the rows move down.
//!
//! Geometry (in bubble radii): radius 1, tile width 2, row height √3.

use arrayvec::ArrayVec;

use crate::types::{GemColor, Pos, MAX_GRID};

/// Bubble radius in field units
pub const RADIUS: f32 = 1.0;

/// Horizontal distance between neighbouring centers in a row
pub const TILE_W: f32 = 2.0 * RADIUS;

/// Vertical distance between row centers (hexagonal packing)
pub const ROW_H: f32 = 1.732_050_8 * RADIUS;

const UNSHIFTED_NEIGHBORS: [(i8, i8); 6] = [(-1, -1), (0, -1), (-1, 0), (1, 0), (-1, 1), (0, 1)];
const SHIFTED_NEIGHBORS: [(i8, i8); 6] = [(0, -1), (1, -1), (-1, 0), (1, 0), (0, 1), (1, 1)];

/// A bubble cell: `None` is empty
pub type BubbleCell = Option<GemColor>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BubbleGrid {
    cols: u8,
    rows: u8,
    /// 0 or 1; row `y` is shifted when `(y + row_offset) % 2 == 1`
    row_offset: u8,
    cells: Vec<BubbleCell>,
}

impl BubbleGrid {
    pub fn new(cols: u8, rows: u8) -> Self {
        let cols = cols.clamp(2, MAX_GRID);
        let rows = rows.clamp(2, MAX_GRID);
        Self {
            cols,
            rows,
            row_offset: 0,
            cells: vec![None; cols as usize * rows as usize],
        }
    }

    /// Parse a fixture, one string per row (`.` = empty, color letters otherwise)
    ///
    /// Leading spaces are ignored so shifted rows can be indented for readability.
    pub fn from_rows(cols: u8, rows: &[&str]) -> Self {
        let mut grid = Self::new(cols, rows.len() as u8);
        for (y, row) in rows.iter().enumerate().take(grid.rows as usize) {
            for (x, ch) in row.trim_start().chars().enumerate().take(grid.cols as usize) {
                let cell = GemColor::from_str(&ch.to_string());
                grid.set(Pos::new(x as i8, y as i8), cell);
            }
        }
        grid
    }

    #[inline(always)]
    fn index(&self, pos: Pos) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x as u8 >= self.cols || pos.y as u8 >= self.rows {
            return None;
        }
        Some(pos.y as usize * self.cols as usize + pos.x as usize)
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn row_offset(&self) -> u8 {
        self.row_offset
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.index(pos).is_some()
    }

    /// Bubble at `pos`, `None` when empty or out of bounds
    pub fn get(&self, pos: Pos) -> BubbleCell {
        self.index(pos).and_then(|i| self.cells[i])
    }

    pub fn is_empty_at(&self, pos: Pos) -> bool {
        self.index(pos).is_some_and(|i| self.cells[i].is_none())
    }

    pub fn set(&mut self, pos: Pos, cell: BubbleCell) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    pub fn is_shifted(&self, y: i8) -> bool {
        (y as i16 + self.row_offset as i16).rem_euclid(2) == 1
    }

    /// In-bounds neighbours of `pos` (up to six)
    pub fn neighbors(&self, pos: Pos) -> ArrayVec<Pos, 6> {
        let offsets = if self.is_shifted(pos.y) {
            &SHIFTED_NEIGHBORS
        } else {
            &UNSHIFTED_NEIGHBORS
        };
        offsets
            .iter()
            .map(|&(dx, dy)| pos.offset(dx, dy))
            .filter(|p| self.contains(*p))
            .collect()
    }

    /// Every occupied position, row-major
    pub fn occupied(&self) -> impl Iterator<Item = Pos> + '_ {
        self.positions().filter(move |p| self.get(*p).is_some())
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.rows as i8).flat_map(move |y| (0..self.cols as i8).map(move |x| Pos::new(x, y)))
    }

    pub fn is_clear(&self) -> bool {
        self.cells.iter().all(|c| c.is_none())
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// True if any bubble sits in the last row
    pub fn bottom_reached(&self) -> bool {
        let y = self.rows as i8 - 1;
        (0..self.cols as i8).any(|x| self.get(Pos::new(x, y)).is_some())
    }

    /// Distinct colors on the board, in palette order
    pub fn colors_present(&self) -> ArrayVec<GemColor, { GemColor::COUNT }> {
        let mut seen = [false; GemColor::COUNT];
        for c in self.cells.iter().flatten() {
            seen[c.index()] = true;
        }
        GemColor::ALL
            .iter()
            .copied()
            .filter(|c| seen[c.index()])
            .collect()
    }

    /// Push every row down by one and place `row` at the top
    ///
    /// Bubbles in the last row fall off the board. Returns how many were lost.
    pub fn insert_row(&mut self, row: &[BubbleCell]) -> usize {
        let cols = self.cols as usize;
        let last = (self.rows as usize - 1) * cols;
        let lost = self.cells[last..].iter().filter(|c| c.is_some()).count();

        self.cells.copy_within(0..last, cols);
        for (x, cell) in self.cells[..cols].iter_mut().enumerate() {
            *cell = row.get(x).copied().flatten();
        }
        self.row_offset ^= 1;
        lost
    }

    /// Width of the playing field in field units
    pub fn field_width(&self) -> f32 {
        self.cols as f32 * TILE_W + RADIUS
    }

    /// Center of the cell at `pos` in field units
    pub fn cell_center(&self, pos: Pos) -> (f32, f32) {
        let shift = if self.is_shifted(pos.y) { RADIUS } else { 0.0 };
        (
            pos.x as f32 * TILE_W + RADIUS + shift,
            pos.y as f32 * ROW_H + RADIUS,
        )
    }

    /// Grid cell whose center is closest to `(px, py)`, clamped to the board
    pub fn nearest_cell(&self, px: f32, py: f32) -> Pos {
        let y = ((py - RADIUS) / ROW_H).round().clamp(0.0, self.rows as f32 - 1.0) as i8;
        let shift = if self.is_shifted(y) { RADIUS } else { 0.0 };
        let x = ((px - RADIUS - shift) / TILE_W)
            .round()
            .clamp(0.0, self.cols as f32 - 1.0) as i8;
        Pos::new(x, y)
    }

    /// Compact text rendering; shifted rows are indented by one space
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.rows as i8)
            .map(|y| {
                let mut s = String::new();
                if self.is_shifted(y) {
                    s.push(' ');
                }
                for x in 0..self.cols as i8 {
                    s.push(self.get(Pos::new(x, y)).map_or('.', |c| c.letter()));
                }
                s
            })
            .collect()
    }
}
