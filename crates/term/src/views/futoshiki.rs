//! FutoshikiView: value grid with inequality signs between cells.
//!
//! Each board cell is 4x2 terminal cells: the value in the top-left
//! quarter, a horizontal sign to its right and a vertical sign below it.

use tui_arcade_core::futoshiki::{FutoshikiGame, Inequality};
use tui_arcade_input::PointerMap;

use super::{clear, status_banner, BoardFrame, Viewport, BOARD_BG, CURSOR_BG, FOOTER, VALUE};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::Pos;

const CELL_W: u16 = 4;
const CELL_H: u16 = 2;

const GIVEN_FG: Rgb = Rgb::new(235, 235, 235);
const ENTRY_FG: Rgb = Rgb::new(110, 170, 255);
const VIOLATION_FG: Rgb = Rgb::new(240, 80, 80);
const SIGN_FG: Rgb = Rgb::new(240, 200, 90);

#[derive(Debug, Default)]
pub struct FutoshikiView;

impl FutoshikiView {
    fn frame(game: &FutoshikiGame, viewport: Viewport) -> BoardFrame {
        let n = game.size() as u16;
        BoardFrame::centered(viewport, n, n, CELL_W, CELL_H)
    }

    pub fn layout(&self, game: &FutoshikiGame, viewport: Viewport) -> PointerMap {
        Self::frame(game, viewport).pointer_map(game.size(), game.size())
    }

    pub fn render_into(&self, game: &FutoshikiGame, viewport: Viewport, fb: &mut FrameBuffer) -> PointerMap {
        clear(fb, viewport);
        let frame = Self::frame(game, viewport);
        frame.draw(fb);

        let violations = game.violations();
        let n = game.size() as i8;
        for y in 0..n {
            for x in 0..n {
                let pos = Pos::new(x, y);
                let (px, py) = frame.cell_origin(x as u16, y as u16);
                let bg = if pos == game.cursor() { CURSOR_BG } else { BOARD_BG };
                let value = game.get(pos).unwrap_or(0);
                let style = if value == 0 {
                    CellStyle::new(VALUE.fg, bg).dim()
                } else if game.is_given(pos) {
                    CellStyle::new(GIVEN_FG, bg).bold()
                } else if violations.contains(&pos) {
                    CellStyle::new(VIOLATION_FG, bg).bold()
                } else {
                    CellStyle::new(ENTRY_FG, bg)
                };
                let ch = if value == 0 { '·' } else { (b'0' + value) as char };
                fb.put_char(px, py, ' ', style);
                fb.put_char(px + 1, py, ch, style);
                fb.put_char(px + 2, py, ' ', style);
            }
        }

        let sign_style = CellStyle::new(SIGN_FG, BOARD_BG).bold();
        for sign in &game.puzzle().signs {
            let sign = reading_order(*sign);
            let (px, py) = frame.cell_origin(sign.a.x as u16, sign.a.y as u16);
            if sign.a.y == sign.b.y {
                fb.put_char(px + 3, py, sign.symbol(), sign_style);
            } else {
                fb.put_char(px + 1, py + 1, sign.symbol(), sign_style);
            }
        }

        let mut panel = frame.panel(viewport);
        panel.number(fb, "SIZE", game.size() as u32);
        panel.number(fb, "ERRORS", violations.len() as u32);
        panel.line(fb, "digits enter  x erase", VALUE.dim());
        panel.line(fb, FOOTER, VALUE.dim());

        if let Some(text) = status_banner(game.status(), false) {
            frame.overlay(fb, text);
        }
        frame.pointer_map(game.size(), game.size())
    }

    pub fn render(&self, game: &FutoshikiGame, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(game, viewport, &mut fb);
        fb
    }
}

/// Same constraint with `a` left of or above `b`
fn reading_order(sign: Inequality) -> Inequality {
    if (sign.a.y, sign.a.x) <= (sign.b.y, sign.b.x) {
        sign
    } else {
        Inequality {
            a: sign.b,
            b: sign.a,
            less: !sign.less,
        }
    }
}
