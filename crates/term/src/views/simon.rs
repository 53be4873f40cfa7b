//! SimonView: four pads in a diamond, lit during playback.

use tui_arcade_core::simon::{Pad, Phase, SimonGame};
use tui_arcade_input::PointerMap;

use super::{clear, status_banner, BoardFrame, Viewport, BOARD_BG, FOOTER, VALUE};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::Pos;

const PAD_W: u16 = 6;
const PAD_H: u16 = 3;

/// Diamond slot of each pad on a 3x3 layout
fn slot(pad: Pad) -> Pos {
    match pad {
        Pad::Green => Pos::new(1, 0),
        Pad::Red => Pos::new(2, 1),
        Pad::Blue => Pos::new(1, 2),
        Pad::Yellow => Pos::new(0, 1),
    }
}

/// Pad under a layout cell, for pointer input
pub fn pad_at(pos: Pos) -> Option<Pad> {
    Pad::ALL.into_iter().find(|&p| slot(p) == pos)
}

fn pad_rgb(pad: Pad, lit: bool) -> Rgb {
    match (pad, lit) {
        (Pad::Green, false) => Rgb::new(30, 100, 45),
        (Pad::Green, true) => Rgb::new(90, 240, 120),
        (Pad::Red, false) => Rgb::new(110, 35, 35),
        (Pad::Red, true) => Rgb::new(255, 90, 90),
        (Pad::Yellow, false) => Rgb::new(110, 100, 30),
        (Pad::Yellow, true) => Rgb::new(255, 235, 90),
        (Pad::Blue, false) => Rgb::new(35, 55, 120),
        (Pad::Blue, true) => Rgb::new(100, 160, 255),
    }
}

#[derive(Debug, Default)]
pub struct SimonView;

impl SimonView {
    fn frame(viewport: Viewport) -> BoardFrame {
        BoardFrame::centered(viewport, 3, 3, PAD_W, PAD_H)
    }

    pub fn layout(&self, viewport: Viewport) -> PointerMap {
        Self::frame(viewport).pointer_map(3, 3)
    }

    /// `lit` is the pad currently flashing (playback or a fresh press)
    pub fn render_into(
        &self,
        game: &SimonGame,
        lit: Option<Pad>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) -> PointerMap {
        clear(fb, viewport);
        let frame = Self::frame(viewport);
        frame.draw(fb);

        for (i, pad) in Pad::ALL.into_iter().enumerate() {
            let at = slot(pad);
            let (px, py) = frame.cell_origin(at.x as u16, at.y as u16);
            let bg = pad_rgb(pad, lit == Some(pad));
            let style = CellStyle::new(Rgb::new(255, 255, 255), bg).bold();
            fb.fill_rect(px, py, PAD_W, PAD_H, ' ', style);
            fb.put_u32(px + PAD_W / 2, py + PAD_H / 2, i as u32 + 1, style);
        }
        let (cx, cy) = frame.cell_origin(1, 1);
        fb.fill_rect(cx, cy, PAD_W, PAD_H, ' ', CellStyle::new(VALUE.fg, BOARD_BG));

        let mut panel = frame.panel(viewport);
        panel.number(fb, "ROUND", game.score() + 1);
        panel.number(fb, "BEST", game.best());
        let phase = match game.phase() {
            Phase::Showing { .. } => "watch",
            Phase::Awaiting { .. } => "your turn",
            Phase::GameOver => "space to retry",
        };
        panel.text(fb, "STATE", phase);
        panel.line(fb, "1-4 or arrows", VALUE.dim());
        panel.line(fb, FOOTER, VALUE.dim());

        if let Some(text) = status_banner(game.status(), false) {
            frame.overlay(fb, text);
        }
        frame.pointer_map(3, 3)
    }

    pub fn render(&self, game: &SimonGame, lit: Option<Pad>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(game, lit, viewport, &mut fb);
        fb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lit_pad_is_brighter() {
        let game = SimonGame::with_sequence(vec![Pad::Red], 1);
        let vp = Viewport::new(60, 16);
        let map = SimonView.layout(vp);
        let (x, y) = map.to_screen(slot(Pad::Red)).unwrap();

        let dark = SimonView.render(&game, None, vp);
        let lit = SimonView.render(&game, Some(Pad::Red), vp);
        assert_eq!(dark.get(x, y).unwrap().style.bg, pad_rgb(Pad::Red, false));
        assert_eq!(lit.get(x, y).unwrap().style.bg, pad_rgb(Pad::Red, true));
        assert!(lit.contains_text("watch"));
    }

    #[test]
    fn pointer_cells_map_to_pads() {
        assert_eq!(pad_at(Pos::new(1, 0)), Some(Pad::Green));
        assert_eq!(pad_at(Pos::new(0, 1)), Some(Pad::Yellow));
        assert_eq!(pad_at(Pos::new(1, 1)), None);
        assert_eq!(pad_at(Pos::new(0, 0)), None);
    }
}
