//! Shooter - projectile tracing and snapping to the grid
//!
//! The launcher sits one row below the board, centered. A shot travels in
//! small fixed steps, reflects off the side walls and stops when it touches
//! the ceiling or comes within two radii of a bubble. The stopping point is
//! then snapped to the nearest empty cell.

use serde::Serialize;

use crate::bubble::grid::{BubbleGrid, RADIUS, ROW_H};
use crate::types::{Pos, MAX_AIM_DEG, MIN_AIM_DEG};

/// Distance travelled per simulation step
const STEP: f32 = 0.25;

/// Safety bound on simulation steps
const MAX_STEPS: usize = 4096;

/// Traced path of one shot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shot {
    /// Launch point, every wall bounce, and the stopping point
    pub path: Vec<(f32, f32)>,
    /// Cell the bubble settles in; `None` when no empty cell is reachable
    pub landing: Option<Pos>,
}

/// Clamp an aim angle to the playable range
pub fn clamp_aim(deg: f32) -> f32 {
    deg.clamp(MIN_AIM_DEG, MAX_AIM_DEG)
}

/// Launch point in field units
pub fn launcher(grid: &BubbleGrid) -> (f32, f32) {
    (grid.field_width() / 2.0, grid.rows() as f32 * ROW_H + RADIUS)
}

/// Trace a shot fired at `angle_deg` (0 = right, 90 = up)
pub fn trace(grid: &BubbleGrid, angle_deg: f32) -> Shot {
    let rad = clamp_aim(angle_deg).to_radians();
    let (mut dx, dy) = (rad.cos(), -rad.sin());
    let (mut x, mut y) = launcher(grid);
    let left = RADIUS;
    let right = grid.field_width() - RADIUS;

    let mut path = vec![(x, y)];
    let mut hit: Option<Pos> = None;

    for _ in 0..MAX_STEPS {
        x += dx * STEP;
        y += dy * STEP;

        if x < left {
            x = 2.0 * left - x;
            dx = -dx;
            path.push((x, y));
        } else if x > right {
            x = 2.0 * right - x;
            dx = -dx;
            path.push((x, y));
        }

        if y <= RADIUS {
            y = RADIUS;
            break;
        }

        if let Some(p) = colliding_bubble(grid, x, y) {
            hit = Some(p);
            break;
        }
    }

    path.push((x, y));
    let landing = snap(grid, x, y, hit);
    Shot { path, landing }
}

/// First bubble whose center is closer than two radii to `(x, y)`
fn colliding_bubble(grid: &BubbleGrid, x: f32, y: f32) -> Option<Pos> {
    let reach = 2.0 * RADIUS;
    // Only rows near the projectile can collide.
    let row = ((y - RADIUS) / ROW_H).round() as i32;
    for ry in (row - 1).max(0)..=(row + 1).min(grid.rows() as i32 - 1) {
        for rx in 0..grid.cols() as i8 {
            let p = Pos::new(rx, ry as i8);
            if grid.get(p).is_none() {
                continue;
            }
            let (cx, cy) = grid.cell_center(p);
            if (cx - x).powi(2) + (cy - y).powi(2) < reach * reach {
                return Some(p);
            }
        }
    }
    None
}

/// Nearest empty cell to `(x, y)`; falls back to empty neighbours of the
/// nearest cell and of the bubble that was hit
fn snap(grid: &BubbleGrid, x: f32, y: f32, hit: Option<Pos>) -> Option<Pos> {
    let nearest = grid.nearest_cell(x, y);
    if grid.is_empty_at(nearest) {
        return Some(nearest);
    }

    let mut candidates: Vec<Pos> = grid.neighbors(nearest).into_iter().collect();
    if let Some(h) = hit {
        candidates.extend(grid.neighbors(h));
    }

    candidates
        .into_iter()
        .filter(|p| grid.is_empty_at(*p))
        .map(|p| {
            let (cx, cy) = grid.cell_center(p);
            (p, (cx - x).powi(2) + (cy - y).powi(2))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(p, _)| p)
}
