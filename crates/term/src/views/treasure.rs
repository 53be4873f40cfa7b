//! TreasureView: dig site with distance hints.

use tui_arcade_core::treasure::{DigResult, TreasureGame};
use tui_arcade_input::PointerMap;

use super::{clear, status_banner, BoardFrame, Viewport, BOARD_BG, CURSOR_BG, FOOTER, VALUE};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::Pos;

const TREASURE_FG: Rgb = Rgb::new(250, 210, 60);
const DUG_BG: Rgb = Rgb::new(60, 45, 30);

#[derive(Debug, Default)]
pub struct TreasureView;

impl TreasureView {
    fn frame(game: &TreasureGame, viewport: Viewport) -> BoardFrame {
        let n = game.size() as u16;
        BoardFrame::centered(viewport, n, n, 3, 1)
    }

    pub fn layout(&self, game: &TreasureGame, viewport: Viewport) -> PointerMap {
        Self::frame(game, viewport).pointer_map(game.size(), game.size())
    }

    pub fn render_into(&self, game: &TreasureGame, viewport: Viewport, fb: &mut FrameBuffer) -> PointerMap {
        clear(fb, viewport);
        let frame = Self::frame(game, viewport);
        frame.draw(fb);

        let n = game.size() as i8;
        for y in 0..n {
            for x in 0..n {
                let pos = Pos::new(x, y);
                let cursor = pos == game.cursor();
                let (ch, style) = match game.cell(pos) {
                    Some(DigResult::Treasure) => ('$', CellStyle::new(TREASURE_FG, DUG_BG).bold()),
                    // Distances past 9 are shown as '+'.
                    Some(DigResult::Distance(d)) => {
                        let ch = char::from_digit(d, 10).unwrap_or('+');
                        (ch, CellStyle::new(VALUE.fg, DUG_BG))
                    }
                    None => ('░', CellStyle::new(Rgb::new(110, 90, 60), BOARD_BG).dim()),
                };
                let style = if cursor { CellStyle { bg: CURSOR_BG, ..style } } else { style };
                frame.glyph_cell(fb, x as u16, y as u16, ch, style);
            }
        }

        if let Some(spots) = game.revealed() {
            for spot in spots {
                if game.cell(*spot).is_none() {
                    let style = CellStyle::new(TREASURE_FG, BOARD_BG).dim();
                    frame.glyph_cell(fb, spot.x as u16, spot.y as u16, '$', style);
                }
            }
        }

        let mut panel = frame.panel(viewport);
        panel.number(fb, "FOUND", game.found() as u32);
        panel.number(fb, "HIDDEN", game.treasures() as u32);
        panel.number(fb, "DIGS LEFT", game.digs_left());
        panel.line(fb, "space dig", VALUE.dim());
        panel.line(fb, FOOTER, VALUE.dim());

        if let Some(text) = status_banner(game.status(), false) {
            frame.overlay(fb, text);
        }
        frame.pointer_map(game.size(), game.size())
    }

    pub fn render(&self, game: &TreasureGame, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(game, viewport, &mut fb);
        fb
    }
}
