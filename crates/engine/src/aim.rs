use tui_arcade_core::bubble::BubbleGame;
use tui_arcade_types::{Pos, MAX_AIM_DEG, MIN_AIM_DEG};

use crate::PlanError;

/// Angular resolution of the aim sweep
pub const AIM_SEARCH_STEP_DEG: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimPlan {
    pub angle: f32,
    pub landing: Pos,
    /// Popped plus dropped bubbles
    pub removed: usize,
    pub score: u32,
}

impl AimPlan {
    /// Ordering key: more removed first, then landing nearer the ceiling
    fn better_than(&self, other: &AimPlan) -> bool {
        (self.removed, std::cmp::Reverse(self.landing.y))
            > (other.removed, std::cmp::Reverse(other.landing.y))
    }
}

/// Sweep the aim range and keep the most productive shot
pub fn best_aim(game: &BubbleGame) -> Result<AimPlan, PlanError> {
    if !game.playable() {
        return Err(PlanError::NotPlayable);
    }

    let steps = ((MAX_AIM_DEG - MIN_AIM_DEG) / AIM_SEARCH_STEP_DEG) as usize;
    let mut best: Option<AimPlan> = None;
    for i in 0..=steps {
        let angle = MIN_AIM_DEG + i as f32 * AIM_SEARCH_STEP_DEG;
        let mut trial = game.clone();
        trial.set_aim(angle);
        let Some(outcome) = trial.fire() else {
            continue;
        };
        let plan = AimPlan {
            angle,
            landing: outcome.landing,
            removed: outcome.removed(),
            score: outcome.score,
        };
        if best.as_ref().map_or(true, |b| plan.better_than(b)) {
            best = Some(plan);
        }
    }

    let plan = best.ok_or(PlanError::NoMoves)?;
    log::debug!(
        "best aim {:.0} lands {:?}, removes {}",
        plan.angle,
        plan.landing,
        plan.removed
    );
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_arcade_core::bubble::{BubbleConfig, BubbleGrid};
    use tui_arcade_types::{Action, GemColor};

    fn game_from_rows(rows: &[&str], current: GemColor) -> BubbleGame {
        let mut all: Vec<&str> = rows.to_vec();
        all.resize(12, "........");
        let grid = BubbleGrid::from_rows(8, &all);
        let mut game = BubbleGame::from_grid(grid, BubbleConfig::default(), 1);
        game.load(current);
        game
    }

    #[test]
    fn finds_a_popping_shot() {
        let game = game_from_rows(&["...RR..."], GemColor::Red);
        let plan = best_aim(&game).unwrap();
        assert!(plan.removed >= 3);

        let mut replay = game.clone();
        replay.set_aim(plan.angle);
        let outcome = replay.fire().unwrap();
        assert_eq!(outcome.removed(), plan.removed);
    }

    #[test]
    fn without_a_match_prefers_high_landing() {
        let game = game_from_rows(&["BBBBBBBB"], GemColor::Red);
        let plan = best_aim(&game).unwrap();
        assert_eq!(plan.removed, 0);
        assert_eq!(plan.landing.y, 1);
    }

    #[test]
    fn paused_game_cannot_plan() {
        let mut game = game_from_rows(&["...RR..."], GemColor::Red);
        game.apply_action(Action::Pause);
        assert_eq!(best_aim(&game), Err(PlanError::NotPlayable));
    }
}
