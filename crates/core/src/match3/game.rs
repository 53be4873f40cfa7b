//! Match-three game state - board, score, move limit and cursor
//!
//! Ties the generator, match finder and resolver together behind the swap
//! rules, and keeps the cursor/selection model the input layer drives.

use std::fmt;

use serde::Serialize;

use crate::match3::generator::{ensure_playable, generate};
use crate::match3::grid::{Cell, Grid};
use crate::match3::matcher::{has_match_at, valid_moves};
use crate::match3::resolver::{resolve, resolve_color_bomb, Resolution};
use crate::rng::SimpleRng;
use crate::types::{
    Action, Pos, Special, Status, MATCH3_COLORS, MATCH3_HEIGHT, MATCH3_MOVES, MATCH3_TARGET_SCORE,
    MATCH3_WIDTH,
};

/// Why a swap was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapError {
    OutOfBounds,
    NotAdjacent,
    EmptyCell,
    NoMatch,
    NotPlayable,
}

impl SwapError {
    pub fn code(self) -> &'static str {
        match self {
            SwapError::OutOfBounds => "out_of_bounds",
            SwapError::NotAdjacent => "not_adjacent",
            SwapError::EmptyCell => "empty_cell",
            SwapError::NoMatch => "no_match",
            SwapError::NotPlayable => "not_playable",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            SwapError::OutOfBounds => "swap target is outside the board",
            SwapError::NotAdjacent => "gems must be orthogonal neighbours",
            SwapError::EmptyCell => "cannot swap an empty cell",
            SwapError::NoMatch => "swap does not create a match",
            SwapError::NotPlayable => "game is not playable",
        }
    }
}

impl fmt::Display for SwapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for SwapError {}

/// Board and round parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match3Config {
    pub width: u8,
    pub height: u8,
    pub colors: u8,
    pub moves: u32,
    pub target: u32,
}

impl Default for Match3Config {
    fn default() -> Self {
        Self {
            width: MATCH3_WIDTH,
            height: MATCH3_HEIGHT,
            colors: MATCH3_COLORS,
            moves: MATCH3_MOVES,
            target: MATCH3_TARGET_SCORE,
        }
    }
}

/// Serializable view of the game for renderers and debug dumps
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match3Snapshot {
    pub width: u8,
    pub height: u8,
    pub cells: Vec<Cell>,
    pub score: u32,
    pub moves_left: u32,
    pub target: u32,
    pub status: Status,
    pub cursor: Pos,
    pub selected: Option<Pos>,
    pub hint: Option<(Pos, Pos)>,
    pub paused: bool,
}

/// Complete match-three game state
#[derive(Debug, Clone)]
pub struct Match3Game {
    grid: Grid,
    rng: SimpleRng,
    config: Match3Config,
    score: u32,
    moves_left: u32,
    status: Status,
    cursor: Pos,
    selected: Option<Pos>,
    hint: Option<(Pos, Pos)>,
    last: Option<Resolution>,
    paused: bool,
    round: u32,
}

impl Match3Game {
    /// New game on a default 8x8 board
    pub fn new(seed: u32) -> Self {
        Self::with_config(Match3Config::default(), seed)
    }

    /// New game; a config too small to ever offer a swap starts as lost
    pub fn with_config(config: Match3Config, seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let (grid, playable) = fresh_board(config, &mut rng);
        let mut game = Self::from_parts(grid, rng, config);
        if !playable {
            game.status = Status::Lost;
        }
        game
    }

    /// Start from a prepared board (fixtures, replays)
    pub fn from_grid(grid: Grid, config: Match3Config, seed: u32) -> Self {
        let config = Match3Config {
            width: grid.width(),
            height: grid.height(),
            ..config
        };
        Self::from_parts(grid, SimpleRng::new(seed), config)
    }

    fn from_parts(grid: Grid, rng: SimpleRng, config: Match3Config) -> Self {
        log::info!(
            "match3 round: {}x{} board, {} colors, {} moves, target {}",
            config.width,
            config.height,
            config.colors,
            config.moves,
            config.target
        );
        Self {
            grid,
            rng,
            config,
            score: 0,
            moves_left: config.moves,
            status: Status::Playing,
            cursor: Pos::new(0, 0),
            selected: None,
            hint: None,
            last: None,
            paused: false,
            round: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> Match3Config {
        self.config
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn cursor(&self) -> Pos {
        self.cursor
    }

    pub fn selected(&self) -> Option<Pos> {
        self.selected
    }

    pub fn hint(&self) -> Option<(Pos, Pos)> {
        self.hint
    }

    pub fn set_hint(&mut self, hint: Option<(Pos, Pos)>) {
        self.hint = hint;
    }

    pub fn last_resolution(&self) -> Option<&Resolution> {
        self.last.as_ref()
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn playable(&self) -> bool {
        self.status == Status::Playing && !self.paused
    }

    /// Every swap currently accepted
    pub fn valid_moves(&self) -> Vec<(Pos, Pos)> {
        valid_moves(&self.grid)
    }

    /// Swap two gems and resolve the resulting cascade
    ///
    /// A swap that creates no match is reverted and costs no move.
    pub fn try_swap(&mut self, a: Pos, b: Pos) -> Result<Resolution, SwapError> {
        if !self.playable() {
            return Err(SwapError::NotPlayable);
        }
        if !self.grid.contains(a) || !self.grid.contains(b) {
            return Err(SwapError::OutOfBounds);
        }
        if !a.is_adjacent(b) {
            return Err(SwapError::NotAdjacent);
        }
        let (Some(ga), Some(gb)) = (self.grid.gem(a), self.grid.gem(b)) else {
            return Err(SwapError::EmptyCell);
        };

        let colors = self.config.colors;
        let resolution = if ga.special == Special::ColorBomb {
            resolve_color_bomb(&mut self.grid, a, b, colors, &mut self.rng)
        } else if gb.special == Special::ColorBomb {
            resolve_color_bomb(&mut self.grid, b, a, colors, &mut self.rng)
        } else {
            if ga.color == gb.color {
                return Err(SwapError::NoMatch);
            }
            self.grid.swap(a, b);
            if !has_match_at(&self.grid, a) && !has_match_at(&self.grid, b) {
                self.grid.swap(a, b);
                return Err(SwapError::NoMatch);
            }
            resolve(&mut self.grid, &[a, b], colors, &mut self.rng)
        };

        self.moves_left = self.moves_left.saturating_sub(1);
        self.score += resolution.score;
        self.hint = None;
        self.update_status();
        self.last = Some(resolution.clone());
        Ok(resolution)
    }

    fn update_status(&mut self) {
        if self.score >= self.config.target {
            self.status = Status::Won;
            log::info!("match3 won with {} points", self.score);
        } else if self.moves_left == 0 {
            self.status = Status::Lost;
            log::info!("match3 lost at {} / {} points", self.score, self.config.target);
        } else if valid_moves(&self.grid).is_empty() {
            self.status = Status::Lost;
            log::info!("match3 lost: no move left on the board");
        }
    }

    /// Start a new round with a fresh board from the same RNG stream
    pub fn restart(&mut self) {
        let config = self.config;
        let (grid, playable) = fresh_board(config, &mut self.rng);
        self.grid = grid;
        self.score = 0;
        self.moves_left = config.moves;
        self.status = if playable { Status::Playing } else { Status::Lost };
        self.cursor = Pos::new(0, 0);
        self.selected = None;
        self.hint = None;
        self.last = None;
        self.paused = false;
        self.round += 1;
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
            Action::Move(dir) => {
                let next = self.cursor.step(dir);
                if self.grid.contains(next) {
                    self.cursor = next;
                    true
                } else {
                    false
                }
            }
            Action::Cancel => self.selected.take().is_some(),
            Action::Select => self.select(self.cursor),
            // First valid swap; the planner crate offers the best one and
            // front-ends with it installed call `set_hint` instead.
            Action::Hint => {
                self.hint = self.valid_moves().first().copied();
                self.hint.is_some()
            }
            _ => false,
        }
    }

    /// Select a cell, swapping with the current selection if adjacent
    pub fn select(&mut self, pos: Pos) -> bool {
        if !self.grid.contains(pos) || !self.playable() {
            return false;
        }
        self.cursor = pos;
        match self.selected {
            None => {
                self.selected = Some(pos);
            }
            Some(sel) if sel == pos => {
                self.selected = None;
            }
            Some(sel) if sel.is_adjacent(pos) => {
                self.selected = None;
                if let Err(err) = self.try_swap(sel, pos) {
                    log::debug!("swap {:?} -> {:?} refused: {}", sel, pos, err.code());
                }
            }
            Some(_) => {
                self.selected = Some(pos);
            }
        }
        true
    }

    pub fn snapshot(&self) -> Match3Snapshot {
        Match3Snapshot {
            width: self.grid.width(),
            height: self.grid.height(),
            cells: self.grid.cells().to_vec(),
            score: self.score,
            moves_left: self.moves_left,
            target: self.config.target,
            status: self.status,
            cursor: self.cursor,
            selected: self.selected,
            hint: self.hint,
            paused: self.paused,
        }
    }
}

/// Generated board, repaired when generation gave up; false if no
/// arrangement offers a swap
fn fresh_board(config: Match3Config, rng: &mut SimpleRng) -> (Grid, bool) {
    let mut grid = generate(config.width, config.height, config.colors, rng);
    let playable = ensure_playable(&mut grid, config.colors, rng);
    (grid, playable)
}
