//! Bubble shooter game state
//!
//! Fires the loaded bubble, pops same-colored clusters of `MIN_CLUSTER` or
//! more, drops whatever no longer hangs from the ceiling and pushes a fresh
//! row in after every `MISSES_PER_NEW_ROW` shots that popped nothing.

use serde::Serialize;

use crate::bubble::cluster::{find_cluster, find_floating, remove};
use crate::bubble::grid::{BubbleCell, BubbleGrid};
use crate::bubble::shooter::{clamp_aim, trace, Shot};
use crate::rng::SimpleRng;
use crate::types::{
    Action, GemColor, Pos, Status, AIM_STEP_DEG, BUBBLE_COLORS, BUBBLE_COLS, BUBBLE_ROWS,
    BUBBLE_START_ROWS, DROP_SCORE, MIN_CLUSTER, MISSES_PER_NEW_ROW, POP_SCORE,
};

/// Board and round parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BubbleConfig {
    pub cols: u8,
    pub rows: u8,
    pub start_rows: u8,
    pub colors: u8,
    pub misses_per_row: u32,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            cols: BUBBLE_COLS,
            rows: BUBBLE_ROWS,
            start_rows: BUBBLE_START_ROWS,
            colors: BUBBLE_COLORS,
            misses_per_row: MISSES_PER_NEW_ROW,
        }
    }
}

/// What one shot did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotOutcome {
    pub color: GemColor,
    pub landing: Pos,
    pub path: Vec<(f32, f32)>,
    /// Same-colored cluster removed (empty on a miss)
    pub popped: Vec<Pos>,
    /// Floating bubbles dropped after the pop
    pub dropped: Vec<Pos>,
    pub score: u32,
    /// A new row was pushed in after this shot
    pub new_row: bool,
}

impl ShotOutcome {
    pub fn removed(&self) -> usize {
        self.popped.len() + self.dropped.len()
    }
}

/// Serializable view of a bubble round
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleSnapshot {
    pub cols: u8,
    pub rows: u8,
    pub row_offset: u8,
    pub cells: Vec<String>,
    pub aim: f32,
    pub current: GemColor,
    pub next: GemColor,
    pub score: u32,
    pub shots: u32,
    pub misses: u32,
    pub status: Status,
    pub paused: bool,
}

/// Complete bubble shooter state
#[derive(Debug, Clone)]
pub struct BubbleGame {
    grid: BubbleGrid,
    rng: SimpleRng,
    config: BubbleConfig,
    aim_deg: f32,
    current: GemColor,
    next: GemColor,
    score: u32,
    shots: u32,
    misses: u32,
    status: Status,
    last: Option<ShotOutcome>,
    paused: bool,
}

impl BubbleGame {
    pub fn new(seed: u32) -> Self {
        Self::with_config(BubbleConfig::default(), seed)
    }

    pub fn with_config(config: BubbleConfig, seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let grid = fill_rows(&config, &mut rng);
        Self::from_grid_with_rng(grid, config, rng)
    }

    /// Start from a prepared board (fixtures, replays)
    pub fn from_grid(grid: BubbleGrid, config: BubbleConfig, seed: u32) -> Self {
        let config = BubbleConfig {
            cols: grid.cols(),
            rows: grid.rows(),
            ..config
        };
        Self::from_grid_with_rng(grid, config, SimpleRng::new(seed))
    }

    fn from_grid_with_rng(grid: BubbleGrid, config: BubbleConfig, mut rng: SimpleRng) -> Self {
        let current = next_color(&grid, config.colors, &mut rng);
        let next = next_color(&grid, config.colors, &mut rng);
        log::info!(
            "bubble round: {}x{} board, {} bubbles, {} colors",
            config.cols,
            config.rows,
            grid.count(),
            config.colors
        );
        Self {
            grid,
            rng,
            config,
            aim_deg: 90.0,
            current,
            next,
            score: 0,
            shots: 0,
            misses: 0,
            status: Status::Playing,
            last: None,
            paused: false,
        }
    }

    pub fn grid(&self) -> &BubbleGrid {
        &self.grid
    }

    pub fn config(&self) -> BubbleConfig {
        self.config
    }

    pub fn aim(&self) -> f32 {
        self.aim_deg
    }

    pub fn set_aim(&mut self, deg: f32) {
        self.aim_deg = clamp_aim(deg);
    }

    /// Rotate the aim; positive turns left (counter-clockwise)
    pub fn aim_by(&mut self, delta: f32) -> bool {
        let before = self.aim_deg;
        self.set_aim(self.aim_deg + delta);
        self.aim_deg != before
    }

    pub fn current(&self) -> GemColor {
        self.current
    }

    pub fn next(&self) -> GemColor {
        self.next
    }

    /// Override the loaded bubble (fixtures, planners)
    pub fn load(&mut self, color: GemColor) {
        self.current = color;
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn shots(&self) -> u32 {
        self.shots
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn last_shot(&self) -> Option<&ShotOutcome> {
        self.last.as_ref()
    }

    pub fn playable(&self) -> bool {
        self.status == Status::Playing && !self.paused
    }

    /// Trace the current aim without firing (aim guide)
    pub fn preview(&self) -> Shot {
        trace(&self.grid, self.aim_deg)
    }

    /// Fire the loaded bubble along the current aim
    ///
    /// Returns `None` when the game is not playable or the shot found no
    /// empty cell to settle in.
    pub fn fire(&mut self) -> Option<ShotOutcome> {
        if !self.playable() {
            return None;
        }

        let shot = trace(&self.grid, self.aim_deg);
        let Some(landing) = shot.landing else {
            log::warn!("shot at {:.1} degrees found no empty cell", self.aim_deg);
            return None;
        };

        let color = self.current;
        self.grid.set(landing, Some(color));
        self.shots += 1;

        let cluster = find_cluster(&self.grid, landing, true);
        let (popped, dropped) = if cluster.len() >= MIN_CLUSTER {
            remove(&mut self.grid, &cluster);
            let floating = find_floating(&self.grid);
            remove(&mut self.grid, &floating);
            (cluster, floating)
        } else {
            (Vec::new(), Vec::new())
        };

        let score = popped.len() as u32 * POP_SCORE + dropped.len() as u32 * DROP_SCORE;
        self.score += score;

        let mut new_row = false;
        if popped.is_empty() {
            self.misses += 1;
            if self.misses >= self.config.misses_per_row {
                self.misses = 0;
                self.push_row();
                new_row = true;
            }
        }

        log::debug!(
            "shot {} at {:.1}: landed {:?}, popped {}, dropped {}, +{}",
            self.shots,
            self.aim_deg,
            landing,
            popped.len(),
            dropped.len(),
            score
        );

        self.current = self.next;
        self.next = next_color(&self.grid, self.config.colors, &mut self.rng);
        if !self.grid.colors_present().contains(&self.current) && !self.grid.is_clear() {
            self.current = next_color(&self.grid, self.config.colors, &mut self.rng);
        }
        self.update_status();

        let outcome = ShotOutcome {
            color,
            landing,
            path: shot.path,
            popped,
            dropped,
            score,
            new_row,
        };
        self.last = Some(outcome.clone());
        Some(outcome)
    }

    /// Push a random row in from the top
    pub fn push_row(&mut self) {
        let row: Vec<BubbleCell> = (0..self.config.cols)
            .map(|_| Some(self.rng.color(self.config.colors)))
            .collect();
        let lost = self.grid.insert_row(&row);
        if lost > 0 {
            log::info!("{} bubbles pushed past the bottom row", lost);
            self.status = Status::Lost;
        }
    }

    fn update_status(&mut self) {
        if self.status != Status::Playing {
            return;
        }
        if self.grid.is_clear() {
            self.status = Status::Won;
            log::info!("bubble board cleared after {} shots", self.shots);
        } else if self.grid.bottom_reached() {
            self.status = Status::Lost;
            log::info!("bubbles reached the bottom after {} shots", self.shots);
        }
    }

    pub fn restart(&mut self) {
        let config = self.config;
        let grid = fill_rows(&config, &mut self.rng);
        let rng = self.rng.clone();
        *self = Self::from_grid_with_rng(grid, config, rng);
    }

    pub fn snapshot(&self) -> BubbleSnapshot {
        BubbleSnapshot {
            cols: self.grid.cols(),
            rows: self.grid.rows(),
            row_offset: self.grid.row_offset(),
            cells: self.grid.to_rows(),
            aim: self.aim_deg,
            current: self.current,
            next: self.next,
            score: self.score,
            shots: self.shots,
            misses: self.misses,
            status: self.status,
            paused: self.paused,
        }
    }

    /// Apply one input action; returns true if anything changed
    pub fn apply_action(&mut self, action: Action) -> bool {
        match action {
            Action::Restart => {
                self.restart();
                true
            }
            Action::Pause => {
                if self.status == Status::Playing {
                    self.paused = !self.paused;
                    return true;
                }
                false
            }
            _ if !self.playable() => false,
            Action::AimLeft => self.aim_by(AIM_STEP_DEG),
            Action::AimRight => self.aim_by(-AIM_STEP_DEG),
            Action::Fire | Action::Select => self.fire().is_some(),
            _ => false,
        }
    }
}

/// Board with the configured number of random top rows
fn fill_rows(config: &BubbleConfig, rng: &mut SimpleRng) -> BubbleGrid {
    let mut grid = BubbleGrid::new(config.cols, config.rows);
    for y in 0..config.start_rows.min(config.rows.saturating_sub(1)) as i8 {
        for x in 0..config.cols as i8 {
            grid.set(Pos::new(x, y), Some(rng.color(config.colors)));
        }
    }
    grid
}

/// Next loaded color: one still on the board, or any palette color
fn next_color(grid: &BubbleGrid, colors: u8, rng: &mut SimpleRng) -> GemColor {
    let present = grid.colors_present();
    rng.pick(&present).unwrap_or_else(|| rng.color(colors))
}
