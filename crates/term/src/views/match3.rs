//! Match3View: draws the gem board, cursor, selection and hint.

use tui_arcade_core::match3::{Gem, Match3Game};
use tui_arcade_input::PointerMap;

use super::{clear, status_banner, BoardFrame, Viewport, BOARD_BG, CURSOR_BG, FOOTER, VALUE};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::Special;

pub struct Match3View {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for Match3View {
    fn default() -> Self {
        // 3x1 gives every gem a centered glyph with padding.
        Self { cell_w: 3, cell_h: 1 }
    }
}

impl Match3View {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    fn frame(&self, game: &Match3Game, viewport: Viewport) -> BoardFrame {
        let grid = game.grid();
        BoardFrame::centered(
            viewport,
            grid.width() as u16,
            grid.height() as u16,
            self.cell_w,
            self.cell_h,
        )
    }

    pub fn layout(&self, game: &Match3Game, viewport: Viewport) -> PointerMap {
        let grid = game.grid();
        self.frame(game, viewport)
            .pointer_map(grid.width(), grid.height())
    }

    pub fn render_into(&self, game: &Match3Game, viewport: Viewport, fb: &mut FrameBuffer) -> PointerMap {
        clear(fb, viewport);
        let frame = self.frame(game, viewport);
        frame.draw(fb);

        let grid = game.grid();
        let hint = game.hint();
        for pos in grid.positions() {
            let (cx, cy) = (pos.x as u16, pos.y as u16);
            let mut bg = BOARD_BG;
            if Some(pos) == game.selected() {
                bg = Rgb::new(120, 120, 150);
            } else if pos == game.cursor() {
                bg = CURSOR_BG;
            } else if hint.map_or(false, |(a, b)| a == pos || b == pos) {
                bg = Rgb::new(60, 90, 60);
            }
            match grid.gem(pos) {
                Some(gem) => {
                    let style = CellStyle::new(Rgb::gem(gem.color), bg).bold();
                    frame.glyph_cell(fb, cx, cy, gem_glyph(gem), style);
                }
                None => frame.glyph_cell(fb, cx, cy, '·', CellStyle::new(VALUE.fg, bg).dim()),
            }
        }

        let mut panel = frame.panel(viewport);
        panel.number(fb, "SCORE", game.score());
        panel.number(fb, "TARGET", game.config().target);
        panel.number(fb, "MOVES", game.moves_left());
        if let Some(last) = game.last_resolution() {
            panel.number(fb, "CHAIN", last.chains());
            if last.reshuffled {
                panel.line(fb, "reshuffled", VALUE.dim());
            }
        }
        panel.line(fb, "? hint", VALUE.dim());
        panel.line(fb, FOOTER, VALUE.dim());

        if let Some(text) = status_banner(game.status(), game.paused()) {
            frame.overlay(fb, text);
        }
        frame.pointer_map(grid.width(), grid.height())
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, game: &Match3Game, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(game, viewport, &mut fb);
        fb
    }
}

fn gem_glyph(gem: Gem) -> char {
    match gem.special {
        Special::None => '●',
        Special::StripedRow => '═',
        Special::StripedColumn => '║',
        Special::Bomb => '◆',
        Special::ColorBomb => '✱',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Pos;
    use tui_arcade_core::match3::{Grid, Match3Config};

    fn fixture() -> Match3Game {
        let grid = Grid::from_rows(&["RGBY", "GBYR", "BYRG", "YRGB"]);
        let config = Match3Config {
            width: 4,
            height: 4,
            colors: 4,
            ..Match3Config::default()
        };
        Match3Game::from_grid(grid, config, 1)
    }

    #[test]
    fn draws_every_gem_and_the_panel() {
        let game = fixture();
        let fb = Match3View::default().render(&game, Viewport::new(60, 20));
        let gems = fb.cells().iter().filter(|c| c.ch == '●').count();
        assert_eq!(gems, 16);
        assert!(fb.contains_text("SCORE"));
        assert!(fb.contains_text("MOVES"));
    }

    #[test]
    fn layout_maps_clicks_to_gems() {
        let game = fixture();
        let view = Match3View::default();
        let mut fb = FrameBuffer::new(60, 20);
        let map = view.render_into(&game, Viewport::new(60, 20), &mut fb);
        assert_eq!(map, view.layout(&game, Viewport::new(60, 20)));

        let (x, y) = map.to_screen(Pos::new(2, 1)).unwrap();
        assert_eq!(map.to_cell(x + 1, y), Some(Pos::new(2, 1)));
        assert_eq!(fb.get(x + 1, y).unwrap().ch, '●');
    }
}
