//! Planners on top of the core engines
//!
//! Both planners search by simulation: every candidate move is played on a
//! clone of the game (same RNG state, so refills and next bubbles match
//! what the real move would produce) and the outcomes are compared.

use std::fmt;

pub mod aim;
pub mod hint;

pub use aim::{best_aim, AimPlan, AIM_SEARCH_STEP_DEG};
pub use hint::{best_swap, Hint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    NotPlayable,
    NoMoves,
}

impl PlanError {
    pub fn code(self) -> &'static str {
        match self {
            PlanError::NotPlayable => "not_playable",
            PlanError::NoMoves => "no_moves",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PlanError::NotPlayable => "game is not playable",
            PlanError::NoMoves => "no move is available",
        }
    }
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for PlanError {}
