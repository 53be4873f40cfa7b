//! Pointer mapping from terminal cells to board positions.
//!
//! Views report where they drew a board and how many terminal cells one
//! board cell takes; mouse events are translated back through that layout.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::types::Pos;

/// Screen layout of one board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerMap {
    /// Terminal column of the board's left edge
    pub x: u16,
    /// Terminal row of the board's top edge
    pub y: u16,
    /// Terminal columns per board cell
    pub cell_w: u16,
    /// Terminal rows per board cell
    pub cell_h: u16,
    pub cols: u8,
    pub rows: u8,
    /// Rows for which `(row + shift_parity) % 2 == 1` are drawn half a cell
    /// to the right (hex bubble boards)
    pub shift_parity: Option<u8>,
}

impl PointerMap {
    pub fn new(x: u16, y: u16, cell_w: u16, cell_h: u16, cols: u8, rows: u8) -> Self {
        Self {
            x,
            y,
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            cols,
            rows,
            shift_parity: None,
        }
    }

    pub fn with_shifted_rows(mut self, row_offset: u8) -> Self {
        self.shift_parity = Some(row_offset % 2);
        self
    }

    fn row_shift(&self, row: u16) -> u16 {
        match self.shift_parity {
            Some(p) if (row + p as u16) % 2 == 1 => self.cell_w / 2,
            _ => 0,
        }
    }

    /// Board cell under a terminal cell, `None` outside the board
    pub fn to_cell(&self, column: u16, row: u16) -> Option<Pos> {
        let dy = row.checked_sub(self.y)?;
        let gy = dy / self.cell_h;
        if gy >= self.rows as u16 {
            return None;
        }
        let dx = column.checked_sub(self.x + self.row_shift(gy))?;
        let gx = dx / self.cell_w;
        if gx >= self.cols as u16 {
            return None;
        }
        Some(Pos::new(gx as i8, gy as i8))
    }

    /// Top-left terminal cell of a board cell
    pub fn to_screen(&self, pos: Pos) -> Option<(u16, u16)> {
        if pos.x < 0 || pos.y < 0 || pos.x as u8 >= self.cols || pos.y as u8 >= self.rows {
            return None;
        }
        let row = pos.y as u16;
        Some((
            self.x + self.row_shift(row) + pos.x as u16 * self.cell_w,
            self.y + row * self.cell_h,
        ))
    }

    /// Cell hit by a left click, ignoring every other mouse event
    pub fn click(&self, event: MouseEvent) -> Option<Pos> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => self.to_cell(event.column, event.row),
            _ => None,
        }
    }
}

/// Aim angle in degrees from a launcher cell towards a target cell
///
/// Terminal cells are about twice as tall as wide, so rows are weighted
/// double. 0 = right, 90 = straight up.
pub fn aim_angle(from: (u16, u16), to: (u16, u16)) -> f32 {
    let dx = to.0 as f32 - from.0 as f32;
    let dy = (from.1 as f32 - to.1 as f32) * 2.0;
    dy.atan2(dx).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn maps_cells_inside_the_board() {
        let map = PointerMap::new(10, 2, 3, 1, 8, 8);
        assert_eq!(map.to_cell(10, 2), Some(Pos::new(0, 0)));
        assert_eq!(map.to_cell(12, 2), Some(Pos::new(0, 0)));
        assert_eq!(map.to_cell(13, 5), Some(Pos::new(1, 3)));
        assert_eq!(map.to_cell(9, 2), None);
        assert_eq!(map.to_cell(34, 2), None);
        assert_eq!(map.to_cell(10, 10), None);
    }

    #[test]
    fn screen_and_cell_agree() {
        let map = PointerMap::new(4, 1, 2, 1, 8, 12).with_shifted_rows(0);
        for y in 0..12 {
            for x in 0..8 {
                let p = Pos::new(x, y);
                let (cx, cy) = map.to_screen(p).unwrap();
                assert_eq!(map.to_cell(cx, cy), Some(p));
            }
        }
    }

    #[test]
    fn shifted_rows_start_half_a_cell_later() {
        let map = PointerMap::new(0, 0, 4, 1, 4, 4).with_shifted_rows(0);
        assert_eq!(map.to_cell(0, 1), None);
        assert_eq!(map.to_cell(2, 1), Some(Pos::new(0, 1)));
        assert_eq!(map.to_cell(0, 0), Some(Pos::new(0, 0)));
    }

    #[test]
    fn only_left_clicks_count() {
        let map = PointerMap::new(0, 0, 1, 1, 4, 4);
        let mut event = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 2,
            row: 3,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(map.click(event), Some(Pos::new(2, 3)));
        event.kind = MouseEventKind::Moved;
        assert_eq!(map.click(event), None);
    }

    #[test]
    fn aim_angle_matches_screen_directions() {
        assert!((aim_angle((10, 10), (10, 0)) - 90.0).abs() < 1e-3);
        assert!(aim_angle((10, 10), (20, 9)) < 45.0);
        assert!(aim_angle((10, 10), (0, 9)) > 135.0);
    }
}
