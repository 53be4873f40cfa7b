//! Bubble shooter engine
//!
//! - [`grid`]: hex-offset rows, neighbour tables, field geometry
//! - [`cluster`]: color clusters and floating-bubble detection
//! - [`shooter`]: projectile tracing with wall bounces and cell snapping
//! - [`game`]: firing rules, score, row pressure

pub mod cluster;
pub mod game;
pub mod grid;
pub mod shooter;

pub use cluster::{find_cluster, find_floating, remove};
pub use game::{BubbleConfig, BubbleGame, BubbleSnapshot, ShotOutcome};
pub use grid::{BubbleCell, BubbleGrid, RADIUS, ROW_H, TILE_W};
pub use shooter::{clamp_aim, launcher, trace, Shot};
