//! Per-game views: pure functions from game state to a framebuffer.
//!
//! Every view clears the framebuffer, draws a bordered board centered in the
//! viewport with a side panel to its right, and returns the [`PointerMap`]
//! of the board it drew so mouse clicks can be mapped back to cells.

pub mod bubble;
pub mod futoshiki;
pub mod lights_out;
pub mod match3;
pub mod memory;
pub mod menu;
pub mod simon;
pub mod sudoku;
pub mod treasure;
pub mod wordle;

pub use bubble::BubbleView;
pub use futoshiki::FutoshikiView;
pub use lights_out::LightsOutView;
pub use match3::Match3View;
pub use memory::MemoryView;
pub use menu::MenuView;
pub use simon::SimonView;
pub use sudoku::SudokuView;
pub use treasure::TreasureView;
pub use wordle::WordleView;

use tui_arcade_input::PointerMap;

use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::Status;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

pub(crate) const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
pub(crate) const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);

pub(crate) const BORDER: CellStyle = CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG);
pub(crate) const EMPTY: CellStyle = CellStyle::new(Rgb::new(90, 90, 100), BOARD_BG).dim();
pub(crate) const LABEL: CellStyle = CellStyle::new(Rgb::new(220, 220, 220), SCREEN_BG).bold();
pub(crate) const VALUE: CellStyle = CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG);
pub(crate) const CURSOR_BG: Rgb = Rgb::new(70, 70, 95);

/// Placement of a bordered board of `cols x rows` cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BoardFrame {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
    pub cell_w: u16,
    pub cell_h: u16,
}

impl BoardFrame {
    /// Center a board horizontally and vertically in the viewport
    pub fn centered(viewport: Viewport, cols: u16, rows: u16, cell_w: u16, cell_h: u16) -> Self {
        let w = cols * cell_w + 2;
        let h = rows * cell_h + 2;
        Self {
            x: viewport.width.saturating_sub(w) / 2,
            y: viewport.height.saturating_sub(h) / 2,
            w,
            h,
            cell_w,
            cell_h,
        }
    }

    pub fn pointer_map(&self, cols: u8, rows: u8) -> PointerMap {
        PointerMap::new(self.x + 1, self.y + 1, self.cell_w, self.cell_h, cols, rows)
    }

    /// Top-left terminal cell of a board cell
    pub fn cell_origin(&self, cx: u16, cy: u16) -> (u16, u16) {
        (self.x + 1 + cx * self.cell_w, self.y + 1 + cy * self.cell_h)
    }

    pub fn fill_cell(&self, fb: &mut FrameBuffer, cx: u16, cy: u16, ch: char, style: CellStyle) {
        let (px, py) = self.cell_origin(cx, cy);
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    /// Fill a cell with a background and center a glyph in it
    pub fn glyph_cell(&self, fb: &mut FrameBuffer, cx: u16, cy: u16, ch: char, style: CellStyle) {
        let (px, py) = self.cell_origin(cx, cy);
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);
        fb.put_char(px + self.cell_w / 2, py + self.cell_h / 2, ch, style);
    }

    pub fn draw(&self, fb: &mut FrameBuffer) {
        fb.fill_rect(self.x + 1, self.y + 1, self.w - 2, self.h - 2, ' ', EMPTY);
        draw_border(fb, self.x, self.y, self.w, self.h, BORDER);
    }

    pub fn panel(&self, viewport: Viewport) -> Panel {
        Panel::new(self.x.saturating_add(self.w).saturating_add(2), self.y, viewport)
    }

    pub fn overlay(&self, fb: &mut FrameBuffer, text: &str) {
        let mid_y = self.y.saturating_add(self.h / 2);
        let text_w = text.chars().count() as u16;
        let x = self.x.saturating_add(self.w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), SCREEN_BG).bold();
        fb.put_str(x, mid_y, text, style);
    }
}

/// Side panel writer: label/value pairs stacked downwards
pub(crate) struct Panel {
    x: u16,
    y: u16,
    visible: bool,
    height: u16,
}

impl Panel {
    fn new(x: u16, y: u16, viewport: Viewport) -> Self {
        Self {
            x,
            y,
            visible: x < viewport.width && viewport.width - x >= 10,
            height: viewport.height,
        }
    }

    pub fn number(&mut self, fb: &mut FrameBuffer, label: &str, value: u32) {
        if self.visible && self.y + 1 < self.height {
            fb.put_str(self.x, self.y, label, LABEL);
            fb.put_u32(self.x, self.y + 1, value, VALUE);
        }
        self.y = self.y.saturating_add(3);
    }

    pub fn text(&mut self, fb: &mut FrameBuffer, label: &str, value: &str) {
        if self.visible && self.y + 1 < self.height {
            fb.put_str(self.x, self.y, label, LABEL);
            fb.put_str(self.x, self.y + 1, value, VALUE);
        }
        self.y = self.y.saturating_add(3);
    }

    pub fn line(&mut self, fb: &mut FrameBuffer, value: &str, style: CellStyle) {
        if self.visible && self.y < self.height {
            fb.put_str(self.x, self.y, value, style);
        }
        self.y = self.y.saturating_add(1);
    }
}

pub(crate) fn clear(fb: &mut FrameBuffer, viewport: Viewport) {
    fb.resize(viewport.width, viewport.height);
    fb.clear(CellStyle::new(VALUE.fg, SCREEN_BG).into_cell(' '));
}

pub(crate) fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

/// Overlay text for finished or paused rounds
pub(crate) fn status_banner(status: Status, paused: bool) -> Option<&'static str> {
    match status {
        Status::Won => Some("YOU WIN"),
        Status::Lost => Some("GAME OVER"),
        Status::Playing if paused => Some("PAUSED"),
        Status::Playing => None,
    }
}

/// Keys line shown under every panel
pub(crate) const FOOTER: &str = "r restart  esc menu";
