//! Number-entry rules shared by the grid puzzles

use std::fmt;

use crate::types::{Direction, Pos};

/// Why a digit could not be written into a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryError {
    OutOfBounds,
    Given,
    InvalidDigit,
    GameOver,
}

impl EntryError {
    pub fn code(self) -> &'static str {
        match self {
            EntryError::OutOfBounds => "out_of_bounds",
            EntryError::Given => "given",
            EntryError::InvalidDigit => "invalid_digit",
            EntryError::GameOver => "game_over",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            EntryError::OutOfBounds => "cell is outside the board",
            EntryError::Given => "given cells cannot be changed",
            EntryError::InvalidDigit => "digit is outside the puzzle range",
            EntryError::GameOver => "puzzle is already solved",
        }
    }
}

impl fmt::Display for EntryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for EntryError {}

/// Step a cursor one cell, staying inside a `width` x `height` board
pub fn move_cursor(cursor: Pos, dir: Direction, width: u8, height: u8) -> Pos {
    let next = cursor.step(dir);
    Pos::new(
        next.x.clamp(0, width as i8 - 1),
        next.y.clamp(0, height as i8 - 1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_stays_on_board() {
        let p = move_cursor(Pos::new(0, 0), Direction::Left, 9, 9);
        assert_eq!(p, Pos::new(0, 0));
        let p = move_cursor(Pos::new(8, 3), Direction::Right, 9, 9);
        assert_eq!(p, Pos::new(8, 3));
        let p = move_cursor(Pos::new(4, 4), Direction::Down, 9, 9);
        assert_eq!(p, Pos::new(4, 5));
    }

    #[test]
    fn errors_have_stable_codes() {
        assert_eq!(EntryError::Given.code(), "given");
        assert_eq!(EntryError::InvalidDigit.to_string(), EntryError::InvalidDigit.message());
    }
}
