//! Match finder - scans rows and columns for runs and merges them into groups
//!
//! A run is a maximal straight line of at least `MIN_MATCH` gems sharing a
//! color. Runs of the same color that share a cell merge into one group, which
//! is how L, T and cross shapes are detected.

use serde::Serialize;

use crate::match3::grid::Grid;
use crate::types::{GemColor, Pos, Special, MIN_MATCH};

/// A maximal straight run of equal colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Run {
    pub color: GemColor,
    pub start: Pos,
    pub len: usize,
    pub horizontal: bool,
}

impl Run {
    pub fn cells(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.len as i8).map(move |i| {
            if self.horizontal {
                self.start.offset(i, 0)
            } else {
                self.start.offset(0, i)
            }
        })
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.cells().any(|p| p == pos)
    }
}

/// Shape of a merged match group; decides which special gem it creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchShape {
    Line3,
    Line4 { horizontal: bool },
    Line5,
    /// Horizontal and vertical runs crossing (L, T or +)
    Cross,
}

impl MatchShape {
    /// Special gem spawned when a group of this shape clears
    pub fn special(&self) -> Special {
        match self {
            MatchShape::Line3 => Special::None,
            MatchShape::Line4 { horizontal: true } => Special::StripedRow,
            MatchShape::Line4 { horizontal: false } => Special::StripedColumn,
            MatchShape::Line5 => Special::ColorBomb,
            MatchShape::Cross => Special::Bomb,
        }
    }
}

/// A set of cells cleared together by one match
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchGroup {
    pub color: GemColor,
    pub shape: MatchShape,
    /// Deduplicated, sorted row-major
    pub cells: Vec<Pos>,
}

impl MatchGroup {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.cells.contains(&pos)
    }

    /// Cell where a special spawns when the swap did not land in this group
    pub fn middle(&self) -> Pos {
        self.cells[self.cells.len() / 2]
    }
}

/// Find every maximal run of at least `MIN_MATCH` equal colors
pub fn find_runs(grid: &Grid) -> Vec<Run> {
    let mut runs = Vec::new();
    let (w, h) = (grid.width() as i8, grid.height() as i8);

    for y in 0..h {
        scan_line(grid, Pos::new(0, y), w, true, &mut runs);
    }
    for x in 0..w {
        scan_line(grid, Pos::new(x, 0), h, false, &mut runs);
    }
    runs
}

fn scan_line(grid: &Grid, origin: Pos, len: i8, horizontal: bool, runs: &mut Vec<Run>) {
    let at = |i: i8| {
        if horizontal {
            origin.offset(i, 0)
        } else {
            origin.offset(0, i)
        }
    };

    let mut i = 0;
    while i < len {
        let Some(color) = grid.color_at(at(i)) else {
            i += 1;
            continue;
        };
        let start = i;
        while i < len && grid.color_at(at(i)) == Some(color) {
            i += 1;
        }
        let run_len = (i - start) as usize;
        if run_len >= MIN_MATCH {
            runs.push(Run {
                color,
                start: at(start),
                len: run_len,
                horizontal,
            });
        }
    }
}

/// Find all match groups, merging same-colored runs that share a cell
///
/// Groups are returned in row-major order of their first cell.
pub fn find_matches(grid: &Grid) -> Vec<MatchGroup> {
    let runs = find_runs(grid);
    if runs.is_empty() {
        return Vec::new();
    }

    // Union-find over runs.
    let mut parent: Vec<usize> = (0..runs.len()).collect();
    fn root(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for a in 0..runs.len() {
        for b in (a + 1)..runs.len() {
            if runs[a].color != runs[b].color || runs[a].horizontal == runs[b].horizontal {
                continue;
            }
            if runs[a].cells().any(|p| runs[b].contains(p)) {
                let (ra, rb) = (root(&mut parent, a), root(&mut parent, b));
                if ra != rb {
                    parent[rb] = ra;
                }
            }
        }
    }

    let mut groups: Vec<(usize, Vec<usize>)> = Vec::new();
    for i in 0..runs.len() {
        let r = root(&mut parent, i);
        match groups.iter_mut().find(|(root_idx, _)| *root_idx == r) {
            Some((_, members)) => members.push(i),
            None => groups.push((r, vec![i])),
        }
    }

    let mut out: Vec<MatchGroup> = groups
        .into_iter()
        .map(|(_, members)| {
            let mut cells: Vec<Pos> = members.iter().flat_map(|&m| runs[m].cells()).collect();
            cells.sort_by_key(|p| (p.y, p.x));
            cells.dedup();

            let longest = members.iter().map(|&m| runs[m].len).max().unwrap_or(0);
            let has_h = members.iter().any(|&m| runs[m].horizontal);
            let has_v = members.iter().any(|&m| !runs[m].horizontal);
            let shape = if longest >= 5 {
                MatchShape::Line5
            } else if has_h && has_v {
                MatchShape::Cross
            } else if longest == 4 {
                MatchShape::Line4 { horizontal: has_h }
            } else {
                MatchShape::Line3
            };

            MatchGroup {
                color: runs[members[0]].color,
                shape,
                cells,
            }
        })
        .collect();

    out.sort_by_key(|g| (g.cells[0].y, g.cells[0].x));
    out
}

/// Length of the equal-color line through `pos` in one axis
fn line_len(grid: &Grid, pos: Pos, dx: i8, dy: i8) -> usize {
    let Some(color) = grid.color_at(pos) else {
        return 0;
    };
    let mut len = 1;
    let mut p = pos.offset(dx, dy);
    while grid.color_at(p) == Some(color) {
        len += 1;
        p = p.offset(dx, dy);
    }
    let mut p = pos.offset(-dx, -dy);
    while grid.color_at(p) == Some(color) {
        len += 1;
        p = p.offset(-dx, -dy);
    }
    len
}

/// True if `pos` is part of a horizontal or vertical run
pub fn has_match_at(grid: &Grid, pos: Pos) -> bool {
    line_len(grid, pos, 1, 0) >= MIN_MATCH || line_len(grid, pos, 0, 1) >= MIN_MATCH
}

/// True if the board contains any run
pub fn has_any_match(grid: &Grid) -> bool {
    grid.positions().any(|p| has_match_at(grid, p))
}

/// True if swapping `a` and `b` would be accepted by the game
///
/// The cells must be adjacent and filled. A color bomb swapped with any gem
/// is always valid.
pub fn is_valid_swap(grid: &Grid, a: Pos, b: Pos) -> bool {
    if !a.is_adjacent(b) {
        return false;
    }
    let (Some(ga), Some(gb)) = (grid.gem(a), grid.gem(b)) else {
        return false;
    };
    if ga.special == Special::ColorBomb || gb.special == Special::ColorBomb {
        return true;
    }
    if ga.color == gb.color {
        return false;
    }

    let mut probe = grid.clone();
    probe.swap(a, b);
    has_match_at(&probe, a) || has_match_at(&probe, b)
}

/// Every swap that would produce a match, in row-major order of the first cell
pub fn valid_moves(grid: &Grid) -> Vec<(Pos, Pos)> {
    let mut moves = Vec::new();
    for p in grid.positions() {
        for q in [p.offset(1, 0), p.offset(0, 1)] {
            if grid.contains(q) && is_valid_swap(grid, p, q) {
                moves.push((p, q));
            }
        }
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_single_horizontal_run() {
        let grid = Grid::from_rows(&["RRRG", "GBYB", "BYGY"]);
        let runs = find_runs(&grid);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len, 3);
        assert!(runs[0].horizontal);
        assert_eq!(runs[0].start, Pos::new(0, 0));
    }

    #[test]
    fn empty_cells_break_runs() {
        let grid = Grid::from_rows(&["RR.RR"]);
        assert!(find_runs(&grid).is_empty());
    }

    #[test]
    fn l_shape_merges_into_cross() {
        let grid = Grid::from_rows(&["RGB", "RBG", "RRR"]);
        let groups = find_matches(&grid);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].shape, MatchShape::Cross);
        assert_eq!(groups[0].len(), 5);
        assert_eq!(groups[0].shape.special(), Special::Bomb);
    }

    #[test]
    fn four_and_five_lines() {
        let grid = Grid::from_rows(&["RRRRG", "BBBBB"]);
        let groups = find_matches(&grid);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].shape, MatchShape::Line4 { horizontal: true });
        assert_eq!(groups[1].shape, MatchShape::Line5);
    }

    #[test]
    fn vertical_four_creates_column_stripe() {
        let grid = Grid::from_rows(&["G", "G", "G", "G"]);
        let groups = find_matches(&grid);
        assert_eq!(groups[0].shape, MatchShape::Line4 { horizontal: false });
        assert_eq!(groups[0].shape.special(), Special::StripedColumn);
    }

    #[test]
    fn valid_moves_finds_the_only_swap() {
        let grid = Grid::from_rows(&["RRGR", "GBYB", "YPOP"]);
        let moves = valid_moves(&grid);
        assert_eq!(moves, vec![(Pos::new(2, 0), Pos::new(3, 0))]);
    }

    #[test]
    fn color_bomb_swap_is_always_valid() {
        let mut grid = Grid::from_rows(&["RG"]);
        grid.set(
            0,
            0,
            Some(crate::match3::Gem::with_special(GemColor::Red, Special::ColorBomb)),
        );
        assert!(is_valid_swap(&grid, Pos::new(0, 0), Pos::new(1, 0)));
    }
}
