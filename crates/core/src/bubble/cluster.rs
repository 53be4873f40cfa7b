//! Cluster detection over the hex neighbour graph
//!
//! Both searches are breadth-first walks from a seed set: a color cluster
//! starts at one bubble and follows equal colors, the anchored set starts at
//! every bubble in the top row and follows any color. Whatever the anchored
//! walk does not reach is floating and drops.

use std::collections::VecDeque;

use crate::bubble::grid::BubbleGrid;
use crate::types::Pos;

struct Visited {
    cols: usize,
    flags: Vec<bool>,
}

impl Visited {
    fn new(grid: &BubbleGrid) -> Self {
        Self {
            cols: grid.cols() as usize,
            flags: vec![false; grid.cols() as usize * grid.rows() as usize],
        }
    }

    /// Mark `p`; returns false if it was already marked
    fn insert(&mut self, p: Pos) -> bool {
        let i = p.y as usize * self.cols + p.x as usize;
        !std::mem::replace(&mut self.flags[i], true)
    }
}

/// Bubbles connected to `start`
///
/// With `match_color` only bubbles of the start color are followed. An
/// empty start cell yields an empty cluster. The result is sorted row-major.
pub fn find_cluster(grid: &BubbleGrid, start: Pos, match_color: bool) -> Vec<Pos> {
    let Some(color) = grid.get(start) else {
        return Vec::new();
    };

    let mut visited = Visited::new(grid);
    let mut queue = VecDeque::from([start]);
    visited.insert(start);
    let mut cluster = Vec::new();

    while let Some(p) = queue.pop_front() {
        cluster.push(p);
        for q in grid.neighbors(p) {
            let Some(c) = grid.get(q) else {
                continue;
            };
            if match_color && c != color {
                continue;
            }
            if visited.insert(q) {
                queue.push_back(q);
            }
        }
    }

    cluster.sort_by_key(|p| (p.y, p.x));
    cluster
}

/// Bubbles with no path to the top row, sorted row-major
pub fn find_floating(grid: &BubbleGrid) -> Vec<Pos> {
    let mut visited = Visited::new(grid);
    let mut queue = VecDeque::new();

    for x in 0..grid.cols() as i8 {
        let p = Pos::new(x, 0);
        if grid.get(p).is_some() && visited.insert(p) {
            queue.push_back(p);
        }
    }

    while let Some(p) = queue.pop_front() {
        for q in grid.neighbors(p) {
            if grid.get(q).is_some() && visited.insert(q) {
                queue.push_back(q);
            }
        }
    }

    grid.occupied()
        .filter(|p| {
            let i = p.y as usize * visited.cols + p.x as usize;
            !visited.flags[i]
        })
        .collect()
}

/// Empty every listed cell
pub fn remove(grid: &mut BubbleGrid, cells: &[Pos]) {
    for &p in cells {
        grid.set(p, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GemColor;

    #[test]
    fn color_cluster_follows_hex_neighbours() {
        // Row 1 is shifted: (0,1) touches (0,0) and (1,0).
        let grid = BubbleGrid::from_rows(4, &["RRGB", " RGBB", "GGGG"]);
        let cluster = find_cluster(&grid, Pos::new(0, 0), true);
        assert_eq!(cluster, vec![Pos::new(0, 0), Pos::new(1, 0), Pos::new(0, 1)]);
    }

    #[test]
    fn any_color_cluster_spans_everything_connected() {
        let grid = BubbleGrid::from_rows(4, &["RG..", " ....", "...B"]);
        assert_eq!(find_cluster(&grid, Pos::new(0, 0), false).len(), 2);
        assert_eq!(find_cluster(&grid, Pos::new(3, 2), false).len(), 1);
        assert!(find_cluster(&grid, Pos::new(2, 0), false).is_empty());
    }

    #[test]
    fn floating_bubbles_are_found() {
        let grid = BubbleGrid::from_rows(4, &["R...", " R...", "....", " ..BB"]);
        assert_eq!(find_floating(&grid), vec![Pos::new(2, 3), Pos::new(3, 3)]);
    }

    #[test]
    fn removing_a_bridge_detaches_the_rest() {
        let mut grid = BubbleGrid::from_rows(4, &["R...", " G...", "B...", "...."]);
        assert!(find_floating(&grid).is_empty());
        remove(&mut grid, &[Pos::new(0, 1)]);
        assert_eq!(find_floating(&grid), vec![Pos::new(0, 2)]);
        assert_eq!(grid.get(Pos::new(0, 0)), Some(GemColor::Red));
    }
}
