//! Resolver - clears matches, fires specials, applies gravity and refills
//!
//! One call to [`resolve`] runs the whole cascade: find groups, clear them
//! (expanding through any special gems caught in the blast), spawn the
//! specials earned by long or crossing matches, let gems fall, refill from
//! the top and repeat until the board is stable. Each iteration is recorded
//! as a [`CascadeStep`] so front-ends can replay it.

use serde::Serialize;

use crate::match3::generator::ensure_playable;
use crate::match3::grid::{Gem, Grid};
use crate::match3::matcher::{find_matches, valid_moves, MatchGroup};
use crate::rng::SimpleRng;
use crate::types::{GemColor, Pos, Special, GEM_SCORE, SPECIAL_BONUS};

/// Upper bound on cascade iterations for a single move
const MAX_CASCADES: u32 = 64;

/// A gem moving down during gravity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Fall {
    pub from: Pos,
    pub to: Pos,
}

/// One iteration of the cascade loop
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CascadeStep {
    /// 1 for the direct result of the move, 2+ for cascades
    pub chain: u32,
    pub groups: Vec<MatchGroup>,
    /// Every cell emptied in this step, row-major
    pub cleared: Vec<Pos>,
    /// Specials fired by the blast (position and kind)
    pub activated: Vec<(Pos, Special)>,
    /// Specials created by this step's groups
    pub spawned: Vec<(Pos, Gem)>,
    pub falls: Vec<Fall>,
    pub refilled: Vec<Pos>,
    pub score: u32,
}

/// Result of resolving a move until the board is stable
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Resolution {
    pub steps: Vec<CascadeStep>,
    pub score: u32,
    /// The stable board had no valid move and was shuffled
    pub reshuffled: bool,
}

impl Resolution {
    pub fn cleared(&self) -> usize {
        self.steps.iter().map(|s| s.cleared.len()).sum()
    }

    pub fn chains(&self) -> u32 {
        self.steps.last().map(|s| s.chain).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Resolve all matches on `grid` until it is stable
///
/// `swapped` are the cells the player just swapped; a special earned by a
/// group containing one of them spawns there instead of the group middle.
pub fn resolve(grid: &mut Grid, swapped: &[Pos], colors: u8, rng: &mut SimpleRng) -> Resolution {
    let mut resolution = Resolution::default();
    cascade(grid, swapped, 1, colors, rng, &mut resolution);
    finish(grid, colors, rng, &mut resolution);
    resolution
}

/// Resolve a swap that involves a color bomb
///
/// Bomb with a gem clears every gem of that gem's color; two bombs clear the
/// whole board. The usual cascade follows.
pub fn resolve_color_bomb(
    grid: &mut Grid,
    bomb: Pos,
    other: Pos,
    colors: u8,
    rng: &mut SimpleRng,
) -> Resolution {
    let mut resolution = Resolution::default();
    let mut marked = Marks::new(grid);

    match grid.gem(other) {
        Some(g) if g.special == Special::ColorBomb => {
            for p in grid.positions() {
                marked.mark(grid, p);
            }
        }
        Some(g) => {
            marked.mark(grid, bomb);
            mark_color(grid, g.color, &mut marked);
        }
        None => marked.mark(grid, bomb),
    }
    // The detonating bomb itself must not fire a second time.
    marked.activated.push(bomb);

    let mut step = clear_marked(grid, marked, Vec::new(), Vec::new(), 1);
    settle(grid, colors, rng, &mut step);
    resolution.score += step.score;
    resolution.steps.push(step);

    cascade(grid, &[], 2, colors, rng, &mut resolution);
    finish(grid, colors, rng, &mut resolution);
    resolution
}

fn cascade(
    grid: &mut Grid,
    swapped: &[Pos],
    first_chain: u32,
    colors: u8,
    rng: &mut SimpleRng,
    resolution: &mut Resolution,
) {
    let mut chain = first_chain;
    while chain < first_chain + MAX_CASCADES {
        let groups = find_matches(grid);
        if groups.is_empty() {
            return;
        }

        let spawn_hint = if chain == first_chain { swapped } else { &[] };
        let mut step = clear_groups(grid, groups, spawn_hint, chain);
        settle(grid, colors, rng, &mut step);

        log::debug!(
            "cascade chain {}: cleared {} gems, spawned {} specials, +{}",
            chain,
            step.cleared.len(),
            step.spawned.len(),
            step.score
        );
        resolution.score += step.score;
        resolution.steps.push(step);
        chain += 1;
    }
    log::warn!("cascade stopped after {} iterations", MAX_CASCADES);
}

fn finish(grid: &mut Grid, colors: u8, rng: &mut SimpleRng, resolution: &mut Resolution) {
    if valid_moves(grid).is_empty() {
        log::warn!("no valid moves left; shuffling board");
        ensure_playable(grid, colors, rng);
        resolution.reshuffled = true;
    }
}

/// Clear the groups (plus blasts) and spawn earned specials
pub fn clear_groups(grid: &mut Grid, groups: Vec<MatchGroup>, swapped: &[Pos], chain: u32) -> CascadeStep {
    let mut marked = Marks::new(grid);
    let mut spawned = Vec::new();

    for group in &groups {
        for &p in &group.cells {
            marked.mark(grid, p);
        }
        let special = group.shape.special();
        if special.is_special() {
            let at = swapped
                .iter()
                .copied()
                .find(|p| group.contains(*p))
                .unwrap_or_else(|| group.middle());
            spawned.push((at, Gem::with_special(group.color, special)));
        }
    }

    clear_marked(grid, marked, groups, spawned, chain)
}

/// Cells flagged for removal plus the specials waiting to fire
struct Marks {
    width: usize,
    flags: Vec<bool>,
    pending: Vec<Pos>,
    activated: Vec<Pos>,
}

impl Marks {
    fn new(grid: &Grid) -> Self {
        Self {
            width: grid.width() as usize,
            flags: vec![false; grid.width() as usize * grid.height() as usize],
            pending: Vec::new(),
            activated: Vec::new(),
        }
    }

    fn idx(&self, p: Pos) -> usize {
        p.y as usize * self.width + p.x as usize
    }

    fn mark(&mut self, grid: &Grid, p: Pos) {
        let Some(gem) = grid.gem(p) else {
            return;
        };
        let i = self.idx(p);
        if self.flags[i] {
            return;
        }
        self.flags[i] = true;
        if gem.special.is_special() {
            self.pending.push(p);
        }
    }

    fn is_marked(&self, p: Pos) -> bool {
        self.flags[self.idx(p)]
    }
}

fn mark_color(grid: &Grid, color: GemColor, marked: &mut Marks) {
    for p in grid.positions() {
        if grid.color_at(p) == Some(color) {
            marked.mark(grid, p);
        }
    }
}

/// Most common color on the board; ties go to the earlier palette color
pub fn most_common_color(grid: &Grid) -> Option<GemColor> {
    let counts = grid.color_counts();
    let mut best: Option<(GemColor, usize)> = None;
    for color in GemColor::ALL {
        let n = counts[color.index()];
        if n > 0 && best.map_or(true, |(_, b)| n > b) {
            best = Some((color, n));
        }
    }
    best.map(|(c, _)| c)
}

/// Cells hit when the special at `p` fires
fn blast_area(grid: &Grid, p: Pos, special: Special) -> Vec<Pos> {
    match special {
        Special::None => Vec::new(),
        Special::StripedRow => (0..grid.width() as i8).map(|x| Pos::new(x, p.y)).collect(),
        Special::StripedColumn => (0..grid.height() as i8).map(|y| Pos::new(p.x, y)).collect(),
        Special::Bomb => {
            let mut area = Vec::with_capacity(9);
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let q = p.offset(dx, dy);
                    if grid.contains(q) {
                        area.push(q);
                    }
                }
            }
            area
        }
        Special::ColorBomb => match most_common_color(grid) {
            Some(color) => grid
                .positions()
                .filter(|q| grid.color_at(*q) == Some(color))
                .collect(),
            None => Vec::new(),
        },
    }
}

fn clear_marked(
    grid: &mut Grid,
    mut marked: Marks,
    groups: Vec<MatchGroup>,
    spawned: Vec<(Pos, Gem)>,
    chain: u32,
) -> CascadeStep {
    // Fire specials transitively.
    let mut activated = Vec::new();
    while let Some(p) = marked.pending.pop() {
        if marked.activated.contains(&p) {
            continue;
        }
        marked.activated.push(p);
        let Some(gem) = grid.gem(p) else {
            continue;
        };
        activated.push((p, gem.special));
        for q in blast_area(grid, p, gem.special) {
            marked.mark(grid, q);
        }
    }

    let cleared: Vec<Pos> = grid.positions().filter(|p| marked.is_marked(*p)).collect();
    for &p in &cleared {
        grid.set_at(p, None);
    }
    for &(p, gem) in &spawned {
        grid.set_at(p, Some(gem));
    }

    let score = cleared.len() as u32 * GEM_SCORE * chain + spawned.len() as u32 * SPECIAL_BONUS;
    CascadeStep {
        chain,
        groups,
        cleared,
        activated,
        spawned,
        falls: Vec::new(),
        refilled: Vec::new(),
        score,
    }
}

fn settle(grid: &mut Grid, colors: u8, rng: &mut SimpleRng, step: &mut CascadeStep) {
    step.falls = apply_gravity(grid);
    step.refilled = refill(grid, colors, rng);
}

/// Let gems fall to the bottom of each column, preserving their order
pub fn apply_gravity(grid: &mut Grid) -> Vec<Fall> {
    let mut falls = Vec::new();
    let h = grid.height() as i8;

    for x in 0..grid.width() as i8 {
        let mut write_y = h - 1;
        for read_y in (0..h).rev() {
            let Some(gem) = grid.gem(Pos::new(x, read_y)) else {
                continue;
            };
            if read_y != write_y {
                grid.set(x, write_y, Some(gem));
                grid.set(x, read_y, None);
                falls.push(Fall {
                    from: Pos::new(x, read_y),
                    to: Pos::new(x, write_y),
                });
            }
            write_y -= 1;
        }
    }
    falls
}

/// Fill empty cells with random plain gems; returns the filled cells
pub fn refill(grid: &mut Grid, colors: u8, rng: &mut SimpleRng) -> Vec<Pos> {
    let mut filled = Vec::new();
    for x in 0..grid.width() as i8 {
        for y in 0..grid.height() as i8 {
            if grid.at(Pos::new(x, y)) == Some(None) {
                grid.set(x, y, Some(Gem::new(rng.color(colors))));
                filled.push(Pos::new(x, y));
            }
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gravity_preserves_column_order() {
        let mut grid = Grid::from_rows(&["R", ".", "G", "."]);
        let falls = apply_gravity(&mut grid);
        assert_eq!(grid.to_rows(), vec![".", ".", "R", "G"]);
        assert_eq!(falls.len(), 2);
        assert_eq!(
            falls[0],
            Fall {
                from: Pos::new(0, 2),
                to: Pos::new(0, 3)
            }
        );
    }

    #[test]
    fn refill_fills_only_empty_cells() {
        let mut grid = Grid::from_rows(&["..", "RG"]);
        let filled = refill(&mut grid, 3, &mut SimpleRng::new(4));
        assert_eq!(filled, vec![Pos::new(0, 0), Pos::new(1, 0)]);
        assert!(grid.is_full());
        assert_eq!(grid.to_rows()[1], "RG");
    }

    fn column_with_row_stripe() -> Grid {
        let mut grid = Grid::from_rows(&["RGB", "RYP", "ROG"]);
        grid.set(0, 1, Some(Gem::with_special(GemColor::Red, Special::StripedRow)));
        grid
    }

    #[test]
    fn striped_row_clears_its_row() {
        let mut grid = column_with_row_stripe();
        let groups = find_matches(&grid);
        let step = clear_groups(&mut grid, groups, &[], 1);
        let expected = vec![
            Pos::new(0, 0),
            Pos::new(0, 1),
            Pos::new(1, 1),
            Pos::new(2, 1),
            Pos::new(0, 2),
        ];
        assert_eq!(step.cleared, expected);
        assert_eq!(step.activated, vec![(Pos::new(0, 1), Special::StripedRow)]);
    }

    #[test]
    fn specials_caught_in_a_blast_fire_too() {
        let mut grid = column_with_row_stripe();
        grid.set(2, 1, Some(Gem::with_special(GemColor::Purple, Special::Bomb)));
        let groups = find_matches(&grid);
        let step = clear_groups(&mut grid, groups, &[], 1);
        // The row stripe reaches the bomb, whose blast covers the rest.
        assert_eq!(step.cleared.len(), 9);
        assert_eq!(
            step.activated,
            vec![(Pos::new(0, 1), Special::StripedRow), (Pos::new(2, 1), Special::Bomb)]
        );
        assert_eq!(step.score, 9 * GEM_SCORE);
    }

    #[test]
    fn cascade_steps_score_with_the_chain_multiplier() {
        // Clearing the red column drops the blue into a row of blues.
        let mut grid = Grid::from_rows(&["BGY", "RYG", "RGY", "RBB"]);
        let res = resolve(&mut grid, &[], 4, &mut SimpleRng::new(12));
        assert!(res.steps.len() >= 2);
        assert_eq!(res.steps[0].score, 3 * GEM_SCORE);
        let second = &res.steps[1];
        assert_eq!(second.chain, 2);
        assert!(second.cleared.contains(&Pos::new(1, 3)));
        assert_eq!(
            second.score,
            second.cleared.len() as u32 * GEM_SCORE * 2
                + second.spawned.len() as u32 * SPECIAL_BONUS
        );
    }

    #[test]
    fn stuck_board_is_reshuffled_into_a_playable_one() {
        let mut grid = Grid::from_rows(&["ROYGB", "YGBRO", "BROYG", "OYGBR", "GBROY"]);
        assert!(valid_moves(&grid).is_empty());
        let mut res = Resolution::default();
        finish(&mut grid, 5, &mut SimpleRng::new(2), &mut res);
        assert!(res.reshuffled);
        assert!(grid.is_full());
        assert!(find_matches(&grid).is_empty());
        assert!(!valid_moves(&grid).is_empty());
    }

    #[test]
    fn striped_column_clears_its_column() {
        let mut grid = Grid::from_rows(&["RRRGB", "BGYPO"]);
        grid.set(4, 0, Some(Gem::with_special(GemColor::Blue, Special::StripedRow)));
        grid.set(0, 0, Some(Gem::with_special(GemColor::Red, Special::StripedColumn)));
        let groups = find_matches(&grid);
        let step = clear_groups(&mut grid, groups, &[], 1);
        // Column stripe at (0,0) fires, clearing (0,1) as well.
        assert!(step.cleared.contains(&Pos::new(0, 1)));
        assert!(!step.cleared.contains(&Pos::new(4, 0)));
        assert_eq!(step.activated, vec![(Pos::new(0, 0), Special::StripedColumn)]);
    }

    #[test]
    fn bomb_blast_is_three_by_three() {
        let grid = Grid::from_rows(&["RGBY", "GBYR", "BYRG", "YRGB"]);
        let area = blast_area(&grid, Pos::new(0, 0), Special::Bomb);
        assert_eq!(area.len(), 4);
        let area = blast_area(&grid, Pos::new(1, 1), Special::Bomb);
        assert_eq!(area.len(), 9);
    }

    #[test]
    fn special_spawns_at_swapped_cell() {
        let mut grid = Grid::from_rows(&["RRRR", "GBYP"]);
        let groups = find_matches(&grid);
        let step = clear_groups(&mut grid, groups, &[Pos::new(1, 0)], 1);
        assert_eq!(step.spawned.len(), 1);
        assert_eq!(step.spawned[0].0, Pos::new(1, 0));
        assert_eq!(
            grid.gem(Pos::new(1, 0)),
            Some(Gem::with_special(GemColor::Red, Special::StripedRow))
        );
        assert_eq!(step.score, 4 * GEM_SCORE + SPECIAL_BONUS);
    }

    #[test]
    fn resolve_leaves_a_stable_full_board() {
        let mut rng = SimpleRng::new(77);
        let mut grid = Grid::from_rows(&[
            "RGBYRG", "GBYRGB", "RRRYBO", "BYGROY", "YOBGRP", "OBYPGR",
        ]);
        let res = resolve(&mut grid, &[], 6, &mut rng);
        assert!(!res.is_empty());
        assert!(grid.is_full());
        assert!(find_matches(&grid).is_empty());
        assert_eq!(res.steps[0].chain, 1);
        assert_eq!(res.score, res.steps.iter().map(|s| s.score).sum::<u32>());
    }

    #[test]
    fn two_color_bombs_clear_everything() {
        let mut rng = SimpleRng::new(3);
        let mut grid = Grid::from_rows(&["RGB", "GBR", "BRG"]);
        grid.set(0, 0, Some(Gem::with_special(GemColor::Red, Special::ColorBomb)));
        grid.set(1, 0, Some(Gem::with_special(GemColor::Green, Special::ColorBomb)));
        let res = resolve_color_bomb(&mut grid, Pos::new(0, 0), Pos::new(1, 0), 3, &mut rng);
        assert_eq!(res.steps[0].cleared.len(), 9);
        assert!(grid.is_full());
    }

    #[test]
    fn color_bomb_clears_target_color() {
        let mut rng = SimpleRng::new(8);
        let mut grid = Grid::from_rows(&["RGBY", "GYRB", "BRYG"]);
        grid.set(0, 0, Some(Gem::with_special(GemColor::Red, Special::ColorBomb)));
        let res = resolve_color_bomb(&mut grid, Pos::new(0, 0), Pos::new(1, 0), 4, &mut rng);
        // Bomb + three greens.
        assert_eq!(res.steps[0].cleared.len(), 4);
        assert_eq!(res.steps[0].score, 4 * GEM_SCORE);
    }

    #[test]
    fn most_common_color_breaks_ties_by_palette_order() {
        let grid = Grid::from_rows(&["GGRR", "BB.."]);
        assert_eq!(most_common_color(&grid), Some(GemColor::Red));
        assert_eq!(most_common_color(&Grid::new(2, 2)), None);
    }
}
