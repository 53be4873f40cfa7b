//! TUI Arcade (workspace facade crate).
//!
//! Re-exports the member crates as `tui_arcade::{core,engine,input,term,types}`
//! and hosts the binary's configuration, logging bootstrap and game dispatch.

pub mod app;
pub mod config;
pub mod logging;

pub use tui_arcade_core as core;
pub use tui_arcade_engine as engine;
pub use tui_arcade_input as input;
pub use tui_arcade_term as term;
pub use tui_arcade_types as types;
