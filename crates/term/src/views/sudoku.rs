//! SudokuView: 9x9 grid with shaded boxes.

use tui_arcade_core::sudoku::{SudokuGame, SIZE};
use tui_arcade_input::PointerMap;

use super::{clear, status_banner, BoardFrame, Viewport, BOARD_BG, CURSOR_BG, FOOTER, VALUE};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::Pos;

const ALT_BOX_BG: Rgb = Rgb::new(42, 42, 56);
const GIVEN_FG: Rgb = Rgb::new(235, 235, 235);
const ENTRY_FG: Rgb = Rgb::new(110, 170, 255);
const CONFLICT_FG: Rgb = Rgb::new(240, 80, 80);

#[derive(Debug, Default)]
pub struct SudokuView;

impl SudokuView {
    fn frame(viewport: Viewport) -> BoardFrame {
        BoardFrame::centered(viewport, SIZE as u16, SIZE as u16, 3, 1)
    }

    pub fn layout(&self, viewport: Viewport) -> PointerMap {
        Self::frame(viewport).pointer_map(SIZE as u8, SIZE as u8)
    }

    pub fn render_into(&self, game: &SudokuGame, viewport: Viewport, fb: &mut FrameBuffer) -> PointerMap {
        clear(fb, viewport);
        let frame = Self::frame(viewport);
        frame.draw(fb);

        let conflicts = game.conflicts();
        for y in 0..SIZE as i8 {
            for x in 0..SIZE as i8 {
                let pos = Pos::new(x, y);
                let bg = if pos == game.cursor() {
                    CURSOR_BG
                } else if (x / 3 + y / 3) % 2 == 1 {
                    ALT_BOX_BG
                } else {
                    BOARD_BG
                };
                let digit = game.cells().get(pos).unwrap_or(0);
                let (ch, style) = if digit == 0 {
                    ('·', CellStyle::new(VALUE.fg, bg).dim())
                } else if game.is_given(pos) {
                    ((b'0' + digit) as char, CellStyle::new(GIVEN_FG, bg).bold())
                } else if conflicts.contains(&pos) {
                    ((b'0' + digit) as char, CellStyle::new(CONFLICT_FG, bg).bold())
                } else {
                    ((b'0' + digit) as char, CellStyle::new(ENTRY_FG, bg))
                };
                frame.glyph_cell(fb, x as u16, y as u16, ch, style);
            }
        }

        let mut panel = frame.panel(viewport);
        panel.text(fb, "LEVEL", game.difficulty().as_str());
        panel.number(fb, "MISTAKES", game.mistakes());
        panel.number(fb, "HINTS", game.hints());
        panel.line(fb, "1-9 enter  x erase", VALUE.dim());
        panel.line(fb, "? hint", VALUE.dim());
        panel.line(fb, FOOTER, VALUE.dim());

        if let Some(text) = status_banner(game.status(), false) {
            frame.overlay(fb, text);
        }
        frame.pointer_map(SIZE as u8, SIZE as u8)
    }

    pub fn render(&self, game: &SudokuGame, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(game, viewport, &mut fb);
        fb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_arcade_core::sudoku::{Difficulty, SudokuBoard};

    const PUZZLE: &str =
        "1..7...56..785.1.4..5..3.97.713....5.48.75...35.1.9.......3..8953....6.1.14962573";

    fn game() -> SudokuGame {
        let board = SudokuBoard::parse(PUZZLE).unwrap();
        SudokuGame::from_puzzle(board, Difficulty::Easy, 1).unwrap()
    }

    #[test]
    fn givens_are_drawn_bold() {
        let game = game();
        let view = SudokuView;
        let mut fb = FrameBuffer::new(60, 20);
        let map = view.render_into(&game, Viewport::new(60, 20), &mut fb);
        let (x, y) = map.to_screen(Pos::new(0, 0)).unwrap();
        let cell = fb.get(x + 1, y).unwrap();
        assert_eq!(cell.ch, '1');
        assert!(cell.style.bold);
        assert!(fb.contains_text("MISTAKES"));
        assert!(fb.contains_text("easy"));
    }

    #[test]
    fn conflicting_entry_is_red() {
        let mut game = game();
        // Row 0 already holds a 7 at x = 3.
        let _ = game.enter(Pos::new(1, 0), 7);
        let vp = Viewport::new(60, 20);
        let fb = SudokuView.render(&game, vp);
        let (x, y) = SudokuView.layout(vp).to_screen(Pos::new(1, 0)).unwrap();
        let cell = fb.get(x + 1, y).unwrap();
        assert_eq!(cell.ch, '7');
        assert_eq!(cell.style.fg, CONFLICT_FG);
    }
}
