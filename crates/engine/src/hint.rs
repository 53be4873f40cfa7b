use tui_arcade_core::match3::Match3Game;
use tui_arcade_types::Pos;

use crate::PlanError;

/// Best swap found by simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hint {
    pub from: Pos,
    pub to: Pos,
    /// Score the swap earns including every cascade
    pub score: u32,
    pub cleared: usize,
}

/// Swap with the highest resolution score
///
/// Ties keep the earliest move in row-major order.
pub fn best_swap(game: &Match3Game) -> Result<Hint, PlanError> {
    if !game.playable() {
        return Err(PlanError::NotPlayable);
    }

    let mut best: Option<Hint> = None;
    for (from, to) in game.valid_moves() {
        let mut trial = game.clone();
        let Ok(resolution) = trial.try_swap(from, to) else {
            continue;
        };
        let hint = Hint {
            from,
            to,
            score: resolution.score,
            cleared: resolution.cleared(),
        };
        if best.map_or(true, |b| hint.score > b.score) {
            best = Some(hint);
        }
    }

    let hint = best.ok_or(PlanError::NoMoves)?;
    log::debug!(
        "best swap {:?} -> {:?} worth {}",
        hint.from,
        hint.to,
        hint.score
    );
    Ok(hint)
}
