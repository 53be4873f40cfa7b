//! BubbleView: hex bubble field, aim guide and launcher.
//!
//! One field unit maps to one terminal column, so a bubble takes two
//! columns and shifted rows start one column later. Rows are one terminal
//! row each; the launcher sits on the row below the last grid row.

use tui_arcade_core::bubble::{launcher, BubbleGame, RADIUS, ROW_H};
use tui_arcade_input::PointerMap;

use super::{clear, status_banner, BoardFrame, Viewport, BOARD_BG, FOOTER, VALUE};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::Pos;

const BUBBLE: char = '●';
const GUIDE: char = '·';

/// Sampling step along the aim guide in field units
const GUIDE_STEP: f32 = 0.5;

#[derive(Debug, Default)]
pub struct BubbleView;

impl BubbleView {
    pub fn new() -> Self {
        Self
    }

    fn frame(&self, game: &BubbleGame, viewport: Viewport) -> BoardFrame {
        let grid = game.grid();
        let mut frame = BoardFrame::centered(
            viewport,
            grid.cols() as u16 * 2 + 1,
            grid.rows() as u16 + 1,
            1,
            1,
        );
        frame.cell_w = 2;
        frame
    }

    pub fn layout(&self, game: &BubbleGame, viewport: Viewport) -> PointerMap {
        let grid = game.grid();
        self.frame(game, viewport)
            .pointer_map(grid.cols(), grid.rows())
            .with_shifted_rows(grid.row_offset())
    }

    /// Terminal cell of the launcher, the origin for pointer aiming
    pub fn launcher_cell(&self, game: &BubbleGame, viewport: Viewport) -> (u16, u16) {
        let frame = self.frame(game, viewport);
        let (lx, ly) = launcher(game.grid());
        to_screen(&frame, lx, ly)
    }

    pub fn render_into(&self, game: &BubbleGame, viewport: Viewport, fb: &mut FrameBuffer) -> PointerMap {
        clear(fb, viewport);
        let frame = self.frame(game, viewport);
        frame.draw(fb);
        let grid = game.grid();
        let map = self.layout(game, viewport);

        for pos in grid.occupied() {
            if let (Some(color), Some((x, y))) = (grid.get(pos), map.to_screen(pos)) {
                let style = CellStyle::new(Rgb::gem(color), BOARD_BG).bold();
                fb.put_char(x + 1, y, BUBBLE, style);
            }
        }

        // Danger line: the last grid row.
        let (_, last_y) = frame.cell_origin(0, grid.rows() as u16 - 1);
        let danger = CellStyle::new(Rgb::new(120, 60, 60), BOARD_BG).dim();
        for x in 0..frame.w - 2 {
            let px = frame.x + 1 + x;
            if fb.get(px, last_y).map_or(false, |c| c.ch == ' ') {
                fb.put_char(px, last_y, '_', danger);
            }
        }

        if game.playable() {
            self.draw_guide(game, &frame, fb);
        }

        let (lx, ly) = launcher(grid);
        let (sx, sy) = to_screen(&frame, lx, ly);
        fb.put_char(sx, sy, BUBBLE, CellStyle::new(Rgb::gem(game.current()), BOARD_BG).bold());

        let mut panel = frame.panel(viewport);
        panel.number(fb, "SCORE", game.score());
        panel.number(fb, "SHOTS", game.shots());
        panel.number(
            fb,
            "NEW ROW IN",
            game.config().misses_per_row.saturating_sub(game.misses()),
        );
        panel.text(fb, "NEXT", game.next().as_str());
        panel.number(fb, "AIM", game.aim().round() as u32);
        panel.line(fb, "←/→ aim  space fire", VALUE.dim());
        panel.line(fb, FOOTER, VALUE.dim());

        if let Some(text) = status_banner(game.status(), game.paused()) {
            frame.overlay(fb, text);
        }
        map
    }

    fn draw_guide(&self, game: &BubbleGame, frame: &BoardFrame, fb: &mut FrameBuffer) {
        let shot = game.preview();
        let style = CellStyle::new(Rgb::gem(game.current()), BOARD_BG).dim();
        for seg in shot.path.windows(2) {
            let (ax, ay) = seg[0];
            let (bx, by) = seg[1];
            let len = ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt();
            let steps = (len / GUIDE_STEP) as usize;
            for i in 1..steps {
                let t = i as f32 / steps as f32;
                let (x, y) = to_screen(frame, ax + (bx - ax) * t, ay + (by - ay) * t);
                if fb.get(x, y).map_or(false, |c| c.ch != BUBBLE) {
                    fb.put_char(x, y, GUIDE, style);
                }
            }
        }
        if let Some(landing) = shot.landing {
            let (x, y) = field_cell(game, frame, landing);
            fb.put_char(x, y, '○', style);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, game: &BubbleGame, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(game, viewport, &mut fb);
        fb
    }
}

/// Field coordinates to the terminal cell containing them
fn to_screen(frame: &BoardFrame, fx: f32, fy: f32) -> (u16, u16) {
    let col = fx.max(0.0) as u16;
    let row = ((fy - RADIUS) / ROW_H).round().max(0.0) as u16;
    (frame.x + 1 + col, frame.y + 1 + row)
}

fn field_cell(game: &BubbleGame, frame: &BoardFrame, pos: Pos) -> (u16, u16) {
    let (fx, fy) = game.grid().cell_center(pos);
    to_screen(frame, fx, fy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_arcade_core::bubble::{BubbleConfig, BubbleGrid};
    use tui_arcade_input::aim_angle;

    fn game() -> BubbleGame {
        let mut rows = vec!["RRGGBBYY", " GGBBYYR"];
        rows.resize(12, "........");
        BubbleGame::from_grid(BubbleGrid::from_rows(8, &rows), BubbleConfig::default(), 3)
    }

    #[test]
    fn bubbles_sit_inside_their_pointer_cells() {
        let game = game();
        let view = BubbleView::new();
        let vp = Viewport::new(60, 20);
        let mut fb = FrameBuffer::new(60, 20);
        let map = view.render_into(&game, vp, &mut fb);
        for pos in game.grid().occupied() {
            let (x, y) = map.to_screen(pos).unwrap();
            assert_eq!(fb.get(x + 1, y).unwrap().ch, BUBBLE);
            assert_eq!(map.to_cell(x + 1, y), Some(pos));
        }
        assert!(fb.contains_text("NEW ROW IN"));
    }

    #[test]
    fn launcher_sits_below_the_field_and_aims_up() {
        let game = game();
        let view = BubbleView::new();
        let vp = Viewport::new(60, 20);
        let (lx, ly) = view.launcher_cell(&game, vp);
        let map = view.layout(&game, vp);
        assert_eq!(ly, map.y + game.grid().rows() as u16);
        let angle = aim_angle((lx, ly), (lx, map.y));
        assert!((angle - 90.0).abs() < 1e-3);
    }

    #[test]
    fn guide_is_drawn_while_playing() {
        let game = game();
        let fb = BubbleView::new().render(&game, Viewport::new(60, 20));
        assert!(fb.cells().iter().any(|c| c.ch == GUIDE));
    }
}
