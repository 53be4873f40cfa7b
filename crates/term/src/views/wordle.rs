//! WordleView: guess rows, typed buffer and the letter keyboard.

use tui_arcade_core::wordle::{LetterScore, WordleGame, MAX_ATTEMPTS, WORD_LEN};
use tui_arcade_input::PointerMap;

use super::{clear, status_banner, BoardFrame, Viewport, BOARD_BG, SCREEN_BG, VALUE};
use crate::fb::{CellStyle, FrameBuffer, Rgb};

const KEY_ROWS: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];
const TEXT: Rgb = Rgb::new(245, 245, 245);

fn score_bg(score: LetterScore) -> Rgb {
    match score {
        LetterScore::Correct => Rgb::new(70, 150, 70),
        LetterScore::Present => Rgb::new(190, 160, 50),
        LetterScore::Absent => Rgb::new(70, 70, 75),
    }
}

#[derive(Debug, Default)]
pub struct WordleView;

impl WordleView {
    fn frame(viewport: Viewport) -> BoardFrame {
        // Keep room for the keyboard below the board.
        let shrunk = Viewport::new(viewport.width, viewport.height.saturating_sub(4));
        BoardFrame::centered(shrunk, WORD_LEN as u16, MAX_ATTEMPTS as u16, 4, 1)
    }

    pub fn layout(&self, viewport: Viewport) -> PointerMap {
        Self::frame(viewport).pointer_map(WORD_LEN as u8, MAX_ATTEMPTS as u8)
    }

    pub fn render_into(&self, game: &WordleGame, viewport: Viewport, fb: &mut FrameBuffer) -> PointerMap {
        clear(fb, viewport);
        let frame = Self::frame(viewport);
        frame.draw(fb);

        for (row, guess) in game.guesses().iter().enumerate() {
            for (col, (ch, score)) in guess.word.chars().zip(guess.scores).enumerate() {
                let style = CellStyle::new(TEXT, score_bg(score)).bold();
                frame.glyph_cell(fb, col as u16, row as u16, ch.to_ascii_uppercase(), style);
            }
        }
        let typing_row = game.guesses().len();
        if !game.status().is_over() && typing_row < MAX_ATTEMPTS {
            for col in 0..WORD_LEN {
                let ch = game.buffer().chars().nth(col).map_or('_', |c| c.to_ascii_uppercase());
                let style = CellStyle::new(TEXT, BOARD_BG);
                frame.glyph_cell(fb, col as u16, typing_row as u16, ch, style);
            }
        }

        let key_y = frame.y + frame.h + 1;
        for (i, keys) in KEY_ROWS.iter().enumerate() {
            let width = keys.len() as u16 * 2;
            let mut x = viewport.width.saturating_sub(width) / 2 + i as u16;
            for key in keys.chars() {
                let bg = game.key_state(key).map_or(SCREEN_BG, score_bg);
                fb.put_char(x, key_y + i as u16, key.to_ascii_uppercase(), CellStyle::new(TEXT, bg));
                x += 2;
            }
        }

        let mut panel = frame.panel(viewport);
        panel.number(fb, "TRIES LEFT", game.attempts_left() as u32);
        if let Some(err) = game.last_error() {
            panel.line(fb, err.message(), VALUE.bold());
        }
        if let Some(secret) = game.secret() {
            panel.text(fb, "WORD", secret);
        }
        panel.line(fb, "type, enter submits", VALUE.dim());
        panel.line(fb, "ctrl-r restart  esc menu", VALUE.dim());

        if let Some(text) = status_banner(game.status(), false) {
            frame.overlay(fb, text);
        }
        frame.pointer_map(WORD_LEN as u8, MAX_ATTEMPTS as u8)
    }

    pub fn render(&self, game: &WordleGame, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(game, viewport, &mut fb);
        fb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tui_arcade_core::wordle::WordList;

    fn game() -> WordleGame {
        let words = Arc::new(WordList::new(["crane", "slate", "nacre", "trace"]));
        WordleGame::from_secret(words, "trace").unwrap()
    }

    #[test]
    fn scored_guess_and_buffer_are_drawn() {
        let mut game = game();
        game.guess("crane").unwrap();
        for c in "sla".chars() {
            game.type_letter(c);
        }
        let view = WordleView;
        let mut fb = FrameBuffer::new(70, 24);
        let map = view.render_into(&game, Viewport::new(70, 24), &mut fb);

        let (x, y) = map.to_screen(crate::types::Pos::new(0, 0)).unwrap();
        let c = fb.get(x + 2, y).unwrap();
        assert_eq!(c.ch, 'C');
        assert_eq!(c.style.bg, score_bg(LetterScore::Present));

        let (x, y) = map.to_screen(crate::types::Pos::new(2, 1)).unwrap();
        assert_eq!(fb.get(x + 2, y).unwrap().ch, 'A');
        assert!(fb.contains_text("TRIES LEFT"));
    }

    #[test]
    fn keyboard_marks_used_letters() {
        let mut game = game();
        game.guess("slate").unwrap();
        let fb = WordleView.render(&game, Viewport::new(70, 24));
        let s = fb
            .cells()
            .iter()
            .find(|c| c.ch == 'S' && c.style.bg == score_bg(LetterScore::Absent));
        assert!(s.is_some());
    }
}
