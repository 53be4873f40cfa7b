//! Match-three engine
//!
//! - [`grid`]: flat board of optional gems
//! - [`generator`]: boards without initial matches but with at least one move
//! - [`matcher`]: run detection, L/T/cross merging, valid-move search
//! - [`resolver`]: clear, fire specials, gravity, refill, repeat until stable
//! - [`game`]: swap rules, score, move limit, cursor model

pub mod game;
pub mod generator;
pub mod grid;
pub mod matcher;
pub mod resolver;

pub use game::{Match3Config, Match3Game, Match3Snapshot, SwapError};
pub use generator::{ensure_playable, generate, shuffle};
pub use grid::{Cell, Gem, Grid};
pub use matcher::{
    find_matches, find_runs, has_any_match, has_match_at, is_valid_swap, valid_moves, MatchGroup,
    MatchShape, Run,
};
pub use resolver::{apply_gravity, most_common_color, refill, resolve, CascadeStep, Fall, Resolution};
