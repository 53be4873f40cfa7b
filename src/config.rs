//! Runtime configuration from `ARCADE_*` environment variables.
//!
//! Read once at startup. Invalid values fall back to defaults; the
//! problems are collected in `warnings` and logged once logging is up.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::core::sudoku::Difficulty;
use crate::types::GameKind;

pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base seed; each new round derives its own seed from it
    pub seed: u32,
    /// Skip the menu and start this game
    pub game: Option<GameKind>,
    /// Log file; nothing is logged without one
    pub log_file: Option<PathBuf>,
    /// `EnvFilter` directive string
    pub log_level: String,
    /// Word list JSON replacing the bundled one
    pub words: Option<PathBuf>,
    pub difficulty: Difficulty,
    pub warnings: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (tests pass a map)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut warnings = Vec::new();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let seed = match get("ARCADE_SEED") {
            Some(raw) => raw.parse::<u32>().unwrap_or_else(|_| {
                warnings.push(format!("ARCADE_SEED={raw:?} is not a u32, using the clock"));
                clock_seed()
            }),
            None => clock_seed(),
        };

        let game = get("ARCADE_GAME").and_then(|raw| {
            let kind = GameKind::from_str(&raw);
            if kind.is_none() {
                warnings.push(format!("ARCADE_GAME={raw:?} is not a known game, showing the menu"));
            }
            kind
        });

        let difficulty = match get("ARCADE_DIFFICULTY") {
            Some(raw) => Difficulty::from_str(&raw).unwrap_or_else(|| {
                warnings.push(format!("ARCADE_DIFFICULTY={raw:?} is not easy/medium/hard"));
                Difficulty::Easy
            }),
            None => Difficulty::Easy,
        };

        Self {
            seed,
            game,
            log_file: get("ARCADE_LOG").map(PathBuf::from),
            log_level: get("ARCADE_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            words: get("ARCADE_WORDS").map(PathBuf::from),
            difficulty,
            warnings,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}
