//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events to [`crate::types::Action`] per game, maps
//! mouse clicks to board cells, and repeats held cursor and aim keys with
//! DAS/ARR timing (including terminals without key-release events).

pub mod handler;
pub mod map;
pub mod pointer;

pub use tui_arcade_types as types;

pub use handler::{is_repeatable, RepeatHandler};
pub use map::{map_key, map_menu_key, should_quit};
pub use pointer::{aim_angle, PointerMap};
