//! MenuView: numbered list of games.

use tui_arcade_input::PointerMap;

use super::{clear, BoardFrame, Viewport, BOARD_BG, CURSOR_BG, LABEL, VALUE};
use crate::fb::{CellStyle, FrameBuffer};
use crate::types::GameKind;

const ENTRY_W: u16 = 24;

#[derive(Debug, Default)]
pub struct MenuView;

impl MenuView {
    fn frame(viewport: Viewport) -> BoardFrame {
        BoardFrame::centered(viewport, 1, GameKind::ALL.len() as u16, ENTRY_W, 1)
    }

    pub fn layout(&self, viewport: Viewport) -> PointerMap {
        Self::frame(viewport).pointer_map(1, GameKind::ALL.len() as u8)
    }

    pub fn render_into(&self, selected: usize, viewport: Viewport, fb: &mut FrameBuffer) -> PointerMap {
        clear(fb, viewport);
        let frame = Self::frame(viewport);
        frame.draw(fb);

        let title = "TUI ARCADE";
        let tx = frame.x + frame.w.saturating_sub(title.len() as u16) / 2;
        fb.put_str(tx, frame.y.saturating_sub(2), title, LABEL);

        for (i, kind) in GameKind::ALL.iter().enumerate() {
            let (px, py) = frame.cell_origin(0, i as u16);
            let style = if i == selected {
                CellStyle::new(LABEL.fg, CURSOR_BG).bold()
            } else {
                CellStyle::new(VALUE.fg, BOARD_BG)
            };
            fb.fill_rect(px, py, ENTRY_W, 1, ' ', style);
            let x = fb.put_u32(px + 1, py, i as u32 + 1, style);
            fb.put_str(x + 2, py, kind.title(), style);
        }

        let help = "enter play  q quit";
        let hx = frame.x + frame.w.saturating_sub(help.len() as u16) / 2;
        fb.put_str(hx, frame.y + frame.h + 1, help, VALUE.dim());
        frame.pointer_map(1, GameKind::ALL.len() as u8)
    }

    pub fn render(&self, selected: usize, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(selected, viewport, &mut fb);
        fb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Pos;

    #[test]
    fn lists_every_game() {
        let fb = MenuView.render(0, Viewport::new(60, 20));
        for kind in GameKind::ALL {
            assert!(fb.contains_text(kind.title()), "{} missing", kind.title());
        }
        assert!(fb.contains_text("TUI ARCADE"));
    }

    #[test]
    fn rows_map_to_entries() {
        let vp = Viewport::new(60, 20);
        let map = MenuView.layout(vp);
        let (x, y) = map.to_screen(Pos::new(0, 4)).unwrap();
        assert_eq!(map.to_cell(x + 10, y), Some(Pos::new(0, 4)));

        let fb = MenuView.render(4, vp);
        assert!(fb.get(x, y).unwrap().style.bold);
    }
}
