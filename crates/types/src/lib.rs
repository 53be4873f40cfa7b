//! Core types module - shared data structures and constants
//!
//! This module defines the value types used by every game in the arcade.
//! All types are plain data with no I/O, usable from core logic, planners,
//! input mapping and terminal rendering alike.
//!
//! # Board Dimensions
//!
//! | Game | Width | Height |
//! |------|-------|--------|
//! | Match-three | 8 | 8 |
//! | Bubble shooter | 8 | 12 |
//! | Any grid | ≤ 20 | ≤ 20 |
//!
//! # Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `GEM_SCORE` | 10 | Points per cleared gem, multiplied by cascade chain |
//! | `SPECIAL_BONUS` | 50 | Points per special gem created |
//! | `POP_SCORE` | 10 | Points per bubble popped in a cluster |
//! | `DROP_SCORE` | 20 | Points per floating bubble dropped |
//!
//! # Examples
//!
//! ```
//! use tui_arcade_types::{Action, Direction, GemColor, Pos};
//!
//! let color = GemColor::from_str("blue").unwrap();
//! assert_eq!(color, GemColor::Blue);
//!
//! let a = Pos::new(2, 3);
//! assert!(a.is_adjacent(Pos::new(2, 4)));
//! assert!(!a.is_adjacent(Pos::new(3, 4)));
//!
//! assert_eq!(Action::from_str("moveUp"), Some(Action::Move(Direction::Up)));
//! ```

use serde::{Deserialize, Serialize};

/// Largest width or height any grid in the arcade may have
pub const MAX_GRID: u8 = 20;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Match-three board width in cells
pub const MATCH3_WIDTH: u8 = 8;

/// Match-three board height in cells
pub const MATCH3_HEIGHT: u8 = 8;

/// Number of gem colors used on a default match-three board
pub const MATCH3_COLORS: u8 = 6;

/// Minimum run length that counts as a match
pub const MIN_MATCH: usize = 3;

/// Moves available in a default match-three round
pub const MATCH3_MOVES: u32 = 30;

/// Score needed to win a default match-three round
pub const MATCH3_TARGET_SCORE: u32 = 5000;

/// Points per cleared gem (multiplied by the cascade chain index)
pub const GEM_SCORE: u32 = 10;

/// Points per special gem created by a match
pub const SPECIAL_BONUS: u32 = 50;

/// Bubble grid columns
pub const BUBBLE_COLS: u8 = 8;

/// Bubble grid rows; a bubble settling in the last row ends the game
pub const BUBBLE_ROWS: u8 = 12;

/// Rows filled with bubbles when a round starts
pub const BUBBLE_START_ROWS: u8 = 5;

/// Number of bubble colors used on a default board
pub const BUBBLE_COLORS: u8 = 5;

/// Minimum same-colored cluster size that pops
pub const MIN_CLUSTER: usize = 3;

/// Shots without a pop before a new row is pushed in from the top
pub const MISSES_PER_NEW_ROW: u32 = 5;

/// Points per popped bubble
pub const POP_SCORE: u32 = 10;

/// Points per dropped (floating) bubble
pub const DROP_SCORE: u32 = 20;

/// Smallest aim angle in degrees (0 = right, 90 = straight up)
pub const MIN_AIM_DEG: f32 = 8.0;

/// Largest aim angle in degrees
pub const MAX_AIM_DEG: f32 = 172.0;

/// Aim change per `AimLeft`/`AimRight` action
pub const AIM_STEP_DEG: f32 = 2.0;

/// Delay before a held key starts repeating
pub const DEFAULT_DAS_MS: u32 = 170;

/// Interval between repeats of a held key
pub const DEFAULT_ARR_MS: u32 = 50;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_constants_fit_max_grid() {
        assert!(MATCH3_WIDTH <= MAX_GRID);
        assert!(MATCH3_HEIGHT <= MAX_GRID);
        assert!(BUBBLE_COLS <= MAX_GRID);
        assert!(BUBBLE_ROWS <= MAX_GRID);
        assert!(BUBBLE_START_ROWS < BUBBLE_ROWS);
        assert!(MATCH3_COLORS as usize <= GemColor::ALL.len());
        assert!(BUBBLE_COLORS as usize <= GemColor::ALL.len());
    }

    #[test]
    fn aim_range_is_symmetric() {
        assert_eq!(MIN_AIM_DEG + MAX_AIM_DEG, 180.0);
    }

    #[test]
    fn action_string_roundtrip_for_named_actions() {
        for s in ["moveUp", "moveLeft", "select", "fire", "hint", "restart", "menu"] {
            let action = Action::from_str(s).unwrap();
            assert_eq!(action.as_str(), Some(s));
        }
        assert_eq!(Action::Digit(4).as_str(), None);
    }

    #[test]
    fn game_kind_parses_titles_case_insensitively() {
        assert_eq!(GameKind::from_str("SUDOKU"), Some(GameKind::Sudoku));
        assert_eq!(GameKind::from_str("lights-out"), Some(GameKind::LightsOut));
        assert_eq!(GameKind::from_str("tetris"), None);
    }
}

/// A grid coordinate
///
/// `x` grows to the right and `y` grows downwards. Signed so that neighbour
/// offsets can be applied before bounds checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub x: i8,
    pub y: i8,
}

impl Pos {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Offset by `(dx, dy)`
    pub fn offset(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Step one cell in `dir`
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        self.offset(dx, dy)
    }

    /// True for orthogonal neighbours only
    pub fn is_adjacent(self, other: Pos) -> bool {
        let dx = (self.x as i16 - other.x as i16).abs();
        let dy = (self.y as i16 - other.y as i16).abs();
        dx + dy == 1
    }

    /// Manhattan distance between two positions
    pub fn manhattan(self, other: Pos) -> u32 {
        ((self.x as i32 - other.x as i32).abs() + (self.y as i32 - other.y as i32).abs()) as u32
    }
}

/// Cardinal directions for cursor movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// `(dx, dy)` for one step in this direction
    pub fn delta(&self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Gem and bubble colors
///
/// Match-three boards and bubble boards draw from a prefix of [`GemColor::ALL`],
/// so a five-color board uses Red through Blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GemColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
}

impl GemColor {
    /// Palette size
    pub const COUNT: usize = 6;

    pub const ALL: [GemColor; Self::COUNT] = [
        GemColor::Red,
        GemColor::Orange,
        GemColor::Yellow,
        GemColor::Green,
        GemColor::Blue,
        GemColor::Purple,
    ];

    /// Parse a color from its name or its first letter (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_arcade_types::GemColor;
    ///
    /// assert_eq!(GemColor::from_str("r"), Some(GemColor::Red));
    /// assert_eq!(GemColor::from_str("Purple"), Some(GemColor::Purple));
    /// assert_eq!(GemColor::from_str("teal"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" | "r" => Some(GemColor::Red),
            "orange" | "o" => Some(GemColor::Orange),
            "yellow" | "y" => Some(GemColor::Yellow),
            "green" | "g" => Some(GemColor::Green),
            "blue" | "b" => Some(GemColor::Blue),
            "purple" | "p" => Some(GemColor::Purple),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GemColor::Red => "red",
            GemColor::Orange => "orange",
            GemColor::Yellow => "yellow",
            GemColor::Green => "green",
            GemColor::Blue => "blue",
            GemColor::Purple => "purple",
        }
    }

    /// Single uppercase letter used by fixtures and compact renderers
    pub fn letter(&self) -> char {
        match self {
            GemColor::Red => 'R',
            GemColor::Orange => 'O',
            GemColor::Yellow => 'Y',
            GemColor::Green => 'G',
            GemColor::Blue => 'B',
            GemColor::Purple => 'P',
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Color at `index`, wrapping around the palette
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

/// Special gem markers created by long or crossing matches
///
/// - **StripedRow**: clears its whole row when removed (from a horizontal 4-match)
/// - **StripedColumn**: clears its whole column when removed (from a vertical 4-match)
/// - **Bomb**: clears the surrounding 3x3 area (from an L/T/cross match)
/// - **ColorBomb**: clears every gem of one color (from a 5-match)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Special {
    #[default]
    None,
    StripedRow,
    StripedColumn,
    Bomb,
    ColorBomb,
}

impl Special {
    pub fn is_special(&self) -> bool {
        !matches!(self, Special::None)
    }
}

/// Input intents understood by the games
///
/// Each game ignores the actions it has no use for, so a single key map can
/// drive every board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move the cursor one cell
    Move(Direction),
    /// Pick the cell under the cursor (swap, flip, press, dig)
    Select,
    /// Drop the current selection
    Cancel,
    /// Rotate the launcher counter-clockwise
    AimLeft,
    /// Rotate the launcher clockwise
    AimRight,
    /// Launch the loaded bubble
    Fire,
    /// Enter a digit into the focused cell
    Digit(u8),
    /// Type a letter into the guess buffer
    Letter(char),
    /// Clear the focused cell or the last typed letter
    Erase,
    /// Submit the typed guess
    Submit,
    /// Ask for a hint
    Hint,
    /// Toggle pause
    Pause,
    /// Start a new round of the same game
    Restart,
    /// Leave the game and return to the menu
    Menu,
}

impl Action {
    /// Parse named actions (for scripted input)
    ///
    /// `Digit` and `Letter` carry data and are not parsed here.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveup" => Some(Action::Move(Direction::Up)),
            "movedown" => Some(Action::Move(Direction::Down)),
            "moveleft" => Some(Action::Move(Direction::Left)),
            "moveright" => Some(Action::Move(Direction::Right)),
            "select" => Some(Action::Select),
            "cancel" => Some(Action::Cancel),
            "aimleft" => Some(Action::AimLeft),
            "aimright" => Some(Action::AimRight),
            "fire" => Some(Action::Fire),
            "erase" => Some(Action::Erase),
            "submit" => Some(Action::Submit),
            "hint" => Some(Action::Hint),
            "pause" => Some(Action::Pause),
            "restart" => Some(Action::Restart),
            "menu" => Some(Action::Menu),
            _ => None,
        }
    }

    /// camelCase name for named actions
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Action::Move(Direction::Up) => Some("moveUp"),
            Action::Move(Direction::Down) => Some("moveDown"),
            Action::Move(Direction::Left) => Some("moveLeft"),
            Action::Move(Direction::Right) => Some("moveRight"),
            Action::Select => Some("select"),
            Action::Cancel => Some("cancel"),
            Action::AimLeft => Some("aimLeft"),
            Action::AimRight => Some("aimRight"),
            Action::Fire => Some("fire"),
            Action::Erase => Some("erase"),
            Action::Submit => Some("submit"),
            Action::Hint => Some("hint"),
            Action::Pause => Some("pause"),
            Action::Restart => Some("restart"),
            Action::Menu => Some("menu"),
            Action::Digit(_) | Action::Letter(_) => None,
        }
    }
}

/// Games available from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    Match3,
    Bubble,
    Sudoku,
    Futoshiki,
    LightsOut,
    Wordle,
    Memory,
    Simon,
    Treasure,
}

impl GameKind {
    pub const ALL: [GameKind; 9] = [
        GameKind::Match3,
        GameKind::Bubble,
        GameKind::Sudoku,
        GameKind::Futoshiki,
        GameKind::LightsOut,
        GameKind::Wordle,
        GameKind::Memory,
        GameKind::Simon,
        GameKind::Treasure,
    ];

    /// Menu title
    pub fn title(&self) -> &'static str {
        match self {
            GameKind::Match3 => "Match Three",
            GameKind::Bubble => "Bubble Shooter",
            GameKind::Sudoku => "Sudoku",
            GameKind::Futoshiki => "Futoshiki",
            GameKind::LightsOut => "Lights Out",
            GameKind::Wordle => "Wordle",
            GameKind::Memory => "Memory Match",
            GameKind::Simon => "Simon Says",
            GameKind::Treasure => "Treasure Hunt",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "match3" | "matchthree" => Some(GameKind::Match3),
            "bubble" | "bubbleshooter" => Some(GameKind::Bubble),
            "sudoku" => Some(GameKind::Sudoku),
            "futoshiki" => Some(GameKind::Futoshiki),
            "lightsout" => Some(GameKind::LightsOut),
            "wordle" => Some(GameKind::Wordle),
            "memory" | "memorymatch" => Some(GameKind::Memory),
            "simon" | "simonsays" => Some(GameKind::Simon),
            "treasure" | "treasurehunt" => Some(GameKind::Treasure),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Match3 => "match3",
            GameKind::Bubble => "bubble",
            GameKind::Sudoku => "sudoku",
            GameKind::Futoshiki => "futoshiki",
            GameKind::LightsOut => "lights-out",
            GameKind::Wordle => "wordle",
            GameKind::Memory => "memory",
            GameKind::Simon => "simon",
            GameKind::Treasure => "treasure",
        }
    }
}

/// Round status shared by every game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Playing,
    Won,
    Lost,
}

impl Status {
    pub fn is_over(&self) -> bool {
        !matches!(self, Status::Playing)
    }
}
