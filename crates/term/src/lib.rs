//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. Views render
//! into a plain framebuffer which the renderer flushes to the terminal,
//! rewriting only the cells that changed since the last frame.
//!
//! Views are pure (no I/O) and return the [`tui_arcade_input::PointerMap`]
//! of the board they drew, so mouse clicks can be mapped back to cells.

pub mod fb;
pub mod renderer;
pub mod views;

pub use tui_arcade_core as core;
pub use tui_arcade_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use views::{
    BubbleView, FutoshikiView, LightsOutView, Match3View, MemoryView, MenuView, SimonView,
    SudokuView, TreasureView, Viewport, WordleView,
};
