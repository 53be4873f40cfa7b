//! Generator - fills boards that start without matches but with a move
//!
//! Cells are filled row-major. For each cell the colors that would complete a
//! run with the two cells to the left or the two cells above are excluded, so
//! the board never starts with a match. A board without any valid swap is
//! thrown away and regenerated.

use arrayvec::ArrayVec;

use crate::match3::grid::{Gem, Grid};
use crate::match3::matcher::{has_any_match, valid_moves};
use crate::rng::SimpleRng;
use crate::types::{GemColor, Pos};

/// Attempts before accepting a board without a valid move
const MAX_GENERATE_ATTEMPTS: usize = 64;

/// Attempts before giving up on a shuffle
const MAX_SHUFFLE_ATTEMPTS: usize = 128;

/// Generate a full board with no matches and at least one valid swap
///
/// `colors` selects a prefix of [`GemColor::ALL`] and is clamped to `3..=6`;
/// fewer than three colors cannot avoid matches on a full board.
pub fn generate(width: u8, height: u8, colors: u8, rng: &mut SimpleRng) -> Grid {
    let colors = colors.clamp(3, GemColor::COUNT as u8);
    let mut grid = Grid::new(width, height);

    for attempt in 0..MAX_GENERATE_ATTEMPTS {
        fill_without_matches(&mut grid, colors, rng);
        if !valid_moves(&grid).is_empty() {
            if attempt > 0 {
                log::debug!("match3 board accepted after {} regenerations", attempt);
            }
            return grid;
        }
    }

    log::warn!(
        "no playable {}x{} board after {} attempts",
        grid.width(),
        grid.height(),
        MAX_GENERATE_ATTEMPTS
    );
    grid
}

/// Fill every cell of `grid` so that no run exists
pub fn fill_without_matches(grid: &mut Grid, colors: u8, rng: &mut SimpleRng) {
    for y in 0..grid.height() as i8 {
        for x in 0..grid.width() as i8 {
            let color = pick_safe_color(grid, Pos::new(x, y), colors, rng);
            grid.set(x, y, Some(Gem::new(color)));
        }
    }
}

/// Random color that does not complete a run with the left or upper pair
pub fn pick_safe_color(grid: &Grid, pos: Pos, colors: u8, rng: &mut SimpleRng) -> GemColor {
    let blocked_left = pair_color(grid, pos.offset(-1, 0), pos.offset(-2, 0));
    let blocked_up = pair_color(grid, pos.offset(0, -1), pos.offset(0, -2));

    let mut choices: ArrayVec<GemColor, { GemColor::COUNT }> = ArrayVec::new();
    for &color in GemColor::ALL.iter().take(colors as usize) {
        if Some(color) != blocked_left && Some(color) != blocked_up {
            choices.push(color);
        }
    }

    match rng.pick(&choices) {
        Some(color) => color,
        None => rng.color(colors),
    }
}

fn pair_color(grid: &Grid, a: Pos, b: Pos) -> Option<GemColor> {
    match (grid.color_at(a), grid.color_at(b)) {
        (Some(ca), Some(cb)) if ca == cb => Some(ca),
        _ => None,
    }
}

/// Permute the gems already on the board until there is no match and at
/// least one valid swap
///
/// Returns false if no such arrangement was found; the board is then left
/// in its last shuffled state.
pub fn shuffle(grid: &mut Grid, rng: &mut SimpleRng) -> bool {
    for _ in 0..MAX_SHUFFLE_ATTEMPTS {
        rng.shuffle(grid.cells_mut());
        if !has_any_match(grid) && !valid_moves(grid).is_empty() {
            return true;
        }
    }
    false
}

/// Make `grid` stable and playable: no match on the board and at least one
/// valid swap
///
/// A stable board without moves is shuffled first. If no arrangement of its
/// gems works, the board is refilled from scratch. Returns false when no
/// playable board was found; the grid is then still match-free.
pub fn ensure_playable(grid: &mut Grid, colors: u8, rng: &mut SimpleRng) -> bool {
    if !has_any_match(grid) && !valid_moves(grid).is_empty() {
        return true;
    }
    if shuffle(grid, rng) {
        return true;
    }
    let colors = colors.clamp(3, GemColor::COUNT as u8);
    for _ in 0..MAX_GENERATE_ATTEMPTS {
        fill_without_matches(grid, colors, rng);
        if !valid_moves(grid).is_empty() {
            log::debug!("shuffle failed; board refilled");
            return true;
        }
    }
    log::warn!(
        "{}x{} board has no playable arrangement",
        grid.width(),
        grid.height()
    );
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::match3::matcher::find_runs;

    #[test]
    fn generated_boards_have_no_runs_and_a_move() {
        for seed in 1..40 {
            let mut rng = SimpleRng::new(seed);
            let grid = generate(8, 8, 6, &mut rng);
            assert!(grid.is_full());
            assert!(find_runs(&grid).is_empty(), "seed {seed} starts with a run");
            assert!(!valid_moves(&grid).is_empty(), "seed {seed} has no move");
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate(8, 8, 5, &mut SimpleRng::new(42));
        let b = generate(8, 8, 5, &mut SimpleRng::new(42));
        assert_eq!(a, b);
    }

    #[test]
    fn colors_are_limited_to_palette_prefix() {
        let grid = generate(10, 10, 4, &mut SimpleRng::new(9));
        for gem in grid.cells().iter().flatten() {
            assert!(gem.color.index() < 4);
        }
    }

    #[test]
    fn safe_color_avoids_completing_runs() {
        let grid = Grid::from_rows(&["RR.", "..."]);
        let mut rng = SimpleRng::new(1);
        for _ in 0..50 {
            assert_ne!(pick_safe_color(&grid, Pos::new(2, 0), 3, &mut rng), GemColor::Red);
        }
    }

    #[test]
    fn unshufflable_board_is_refilled_without_matches() {
        // Three reds can never be arranged without a run.
        let mut grid = Grid::from_rows(&["RRR"]);
        let mut rng = SimpleRng::new(6);
        assert!(!shuffle(&mut grid, &mut rng));
        assert!(!ensure_playable(&mut grid, 3, &mut rng));
        assert!(grid.is_full());
        assert!(find_runs(&grid).is_empty());
    }

    #[test]
    fn ensure_playable_repairs_a_board_with_runs() {
        let mut grid = Grid::from_rows(&["RRRGB", "GBYPO", "YPOBG", "BGRYP", "OYBGR"]);
        assert!(ensure_playable(&mut grid, 6, &mut SimpleRng::new(10)));
        assert!(find_runs(&grid).is_empty());
        assert!(!valid_moves(&grid).is_empty());
    }

    #[test]
    fn shuffle_keeps_the_multiset_of_gems() {
        let mut rng = SimpleRng::new(5);
        let mut grid = generate(6, 6, 5, &mut rng);
        let before = grid.color_counts();
        assert!(shuffle(&mut grid, &mut rng));
        assert_eq!(grid.color_counts(), before);
        assert!(!has_any_match(&grid));
    }
}
