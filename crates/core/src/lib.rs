//! Core game logic module - pure, deterministic, and testable
//!
//! Every game in the arcade lives here as a plain state machine: no
//! terminal, no clock, no I/O beyond parsing bundled JSON. A game is built
//! from a seed, driven through `apply_action`, and read back through
//! getters or a serializable snapshot. The same seed always produces the
//! same boards, refills and puzzles.
//!
//! # Module Structure
//!
//! - [`match3`]: match-three grid, generator, match finder, cascade resolver
//! - [`bubble`]: hex bubble grid, cluster search, shot tracing, shooter rules
//! - [`sudoku`], [`futoshiki`]: number puzzles with unique-solution generators
//! - [`lights_out`]: press puzzle with a GF(2) solver
//! - [`wordle`]: five-letter guessing with duplicate-aware scoring
//! - [`memory`], [`simon`], [`treasure`]: small rule sets
//! - [`assets`]: bundled word list and sudoku bank
//! - [`rng`]: seeded LCG shared by every generator
//!
//! # Example
//!
//! ```
//! use tui_arcade_core::Match3Game;
//! use tui_arcade_types::{Action, Direction};
//!
//! let mut game = Match3Game::new(12345);
//! let (a, b) = game.valid_moves()[0];
//! assert!(game.try_swap(a, b).is_ok());
//! assert!(game.score() > 0);
//!
//! game.apply_action(Action::Move(Direction::Right));
//! ```

pub mod assets;
pub mod bubble;
pub mod entry;
pub mod futoshiki;
pub mod lights_out;
pub mod match3;
pub mod memory;
pub mod rng;
pub mod simon;
pub mod sudoku;
pub mod treasure;
pub mod wordle;

pub use tui_arcade_types as types;

// Re-export commonly used types for convenience
pub use assets::{bundled_sudoku, bundled_words, load_words, SudokuBank};
pub use bubble::{BubbleConfig, BubbleGame, BubbleGrid, BubbleSnapshot, ShotOutcome};
pub use entry::EntryError;
pub use futoshiki::{FutoshikiGame, FutoshikiPuzzle, Inequality};
pub use lights_out::LightsOut;
pub use match3::{Gem, Grid, Match3Config, Match3Game, Match3Snapshot, Resolution, SwapError};
pub use memory::{CardState, FlipOutcome, MemoryGame};
pub use rng::SimpleRng;
pub use simon::{Pad, Phase, PressOutcome, SimonGame};
pub use sudoku::{Difficulty, SudokuBoard, SudokuGame};
pub use treasure::{DigResult, TreasureGame};
pub use wordle::{score_guess, GuessError, LetterScore, WordList, WordleGame};
