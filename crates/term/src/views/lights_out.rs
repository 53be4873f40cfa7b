//! LightsOutView: lit and dark cells with the press counter.

use tui_arcade_core::lights_out::LightsOut;
use tui_arcade_input::PointerMap;

use super::{clear, status_banner, BoardFrame, Viewport, BOARD_BG, CURSOR_BG, FOOTER, VALUE};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::Pos;

const LIT: CellStyle = CellStyle::new(Rgb::new(250, 230, 120), Rgb::new(150, 130, 40));
const LIT_CURSOR: CellStyle = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(190, 170, 60));

#[derive(Debug, Default)]
pub struct LightsOutView;

impl LightsOutView {
    fn frame(game: &LightsOut, viewport: Viewport) -> BoardFrame {
        let n = game.size() as u16;
        BoardFrame::centered(viewport, n, n, 4, 2)
    }

    pub fn layout(&self, game: &LightsOut, viewport: Viewport) -> PointerMap {
        Self::frame(game, viewport).pointer_map(game.size(), game.size())
    }

    pub fn render_into(&self, game: &LightsOut, viewport: Viewport, fb: &mut FrameBuffer) -> PointerMap {
        clear(fb, viewport);
        let frame = Self::frame(game, viewport);
        frame.draw(fb);

        let n = game.size() as i8;
        for y in 0..n {
            for x in 0..n {
                let pos = Pos::new(x, y);
                let cursor = pos == game.cursor();
                let (ch, style) = match (game.is_lit(pos), cursor) {
                    (true, false) => ('█', LIT),
                    (true, true) => ('█', LIT_CURSOR),
                    (false, true) => ('+', CellStyle::new(VALUE.fg, CURSOR_BG)),
                    (false, false) => ('·', CellStyle::new(VALUE.fg, BOARD_BG).dim()),
                };
                let (px, py) = frame.cell_origin(x as u16, y as u16);
                // Leave a one-column, one-row gap so neighbours read as tiles.
                fb.fill_rect(px, py, 3, 1, ch, style);
            }
        }

        let mut panel = frame.panel(viewport);
        panel.number(fb, "LIT", game.lit() as u32);
        panel.number(fb, "MOVES", game.moves());
        panel.line(fb, "space press  ? hint", VALUE.dim());
        panel.line(fb, FOOTER, VALUE.dim());

        if let Some(text) = status_banner(game.status(), false) {
            frame.overlay(fb, text);
        }
        frame.pointer_map(game.size(), game.size())
    }

    pub fn render(&self, game: &LightsOut, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(game, viewport, &mut fb);
        fb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lit_cells_are_filled() {
        let game = LightsOut::from_rows(&["#..", "...", "..#"]);
        let view = LightsOutView;
        let mut fb = FrameBuffer::new(50, 16);
        let map = view.render_into(&game, Viewport::new(50, 16), &mut fb);

        let (x, y) = map.to_screen(Pos::new(2, 2)).unwrap();
        assert_eq!(fb.get(x, y).unwrap().ch, '█');
        let (x, y) = map.to_screen(Pos::new(1, 1)).unwrap();
        assert_eq!(fb.get(x, y).unwrap().ch, '·');
        assert!(fb.contains_text("LIT"));
    }
}
