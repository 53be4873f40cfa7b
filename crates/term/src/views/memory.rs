//! MemoryView: card table, four cards per row.

use tui_arcade_core::memory::{CardState, MemoryGame, COLUMNS};
use tui_arcade_input::PointerMap;

use super::{clear, status_banner, BoardFrame, Viewport, BOARD_BG, CURSOR_BG, FOOTER, VALUE};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::GemColor;

const BACK: CellStyle = CellStyle::new(Rgb::new(90, 110, 170), Rgb::new(40, 50, 90));

#[derive(Debug, Default)]
pub struct MemoryView;

impl MemoryView {
    fn frame(game: &MemoryGame, viewport: Viewport) -> BoardFrame {
        BoardFrame::centered(viewport, COLUMNS as u16, game.rows() as u16, 5, 2)
    }

    pub fn layout(&self, game: &MemoryGame, viewport: Viewport) -> PointerMap {
        Self::frame(game, viewport).pointer_map(COLUMNS as u8, game.rows() as u8)
    }

    pub fn render_into(&self, game: &MemoryGame, viewport: Viewport, fb: &mut FrameBuffer) -> PointerMap {
        clear(fb, viewport);
        let frame = Self::frame(game, viewport);
        frame.draw(fb);

        for (i, card) in game.cards().iter().enumerate() {
            let (px, py) = frame.cell_origin((i % COLUMNS) as u16, (i / COLUMNS) as u16);
            let face = face_letter(card.face);
            let fg = Rgb::gem(GemColor::from_index(card.face as usize));
            let mut style = match card.state {
                CardState::Hidden => BACK,
                CardState::Revealed => CellStyle::new(fg, Rgb::new(230, 230, 230)).bold(),
                CardState::Matched => CellStyle::new(fg, BOARD_BG).dim(),
            };
            if i == game.cursor() {
                style.bg = CURSOR_BG;
            }
            fb.fill_rect(px, py, 4, 1, ' ', style);
            let ch = if card.state == CardState::Hidden { '?' } else { face };
            fb.put_char(px + 1, py, ch, style);
            fb.put_char(px + 2, py, ch, style);
        }

        let mut panel = frame.panel(viewport);
        panel.number(fb, "PAIRS", game.matched() as u32);
        panel.number(fb, "OF", game.pairs() as u32);
        panel.number(fb, "MOVES", game.moves());
        if game.has_pending_mismatch() {
            panel.line(fb, "no match", VALUE.bold());
        }
        panel.line(fb, "space flip", VALUE.dim());
        panel.line(fb, FOOTER, VALUE.dim());

        if let Some(text) = status_banner(game.status(), false) {
            frame.overlay(fb, text);
        }
        frame.pointer_map(COLUMNS as u8, game.rows() as u8)
    }

    pub fn render(&self, game: &MemoryGame, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(game, viewport, &mut fb);
        fb
    }
}

fn face_letter(face: u8) -> char {
    (b'A' + face % 26) as char
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Pos;

    #[test]
    fn hidden_cards_show_their_back() {
        let game = MemoryGame::from_faces(&[0, 1, 0, 1]);
        let fb = MemoryView.render(&game, Viewport::new(50, 12));
        assert_eq!(fb.cells().iter().filter(|c| c.ch == '?').count(), 8);
    }

    #[test]
    fn flipped_card_shows_its_face() {
        let mut game = MemoryGame::from_faces(&[0, 1, 0, 1, 2, 2]);
        game.flip(1);
        let view = MemoryView;
        let mut fb = FrameBuffer::new(50, 12);
        let map = view.render_into(&game, Viewport::new(50, 12), &mut fb);
        assert_eq!(map.rows, 2);
        let (x, y) = map.to_screen(Pos::new(1, 0)).unwrap();
        assert_eq!(fb.get(x + 1, y).unwrap().ch, 'B');
        assert_eq!(map.to_cell(x + 1, y), Some(Pos::new(1, 0)));
    }
}
