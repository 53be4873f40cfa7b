//! Lights out - toggle a cell and its four neighbours until the board is dark
//!
//! Boards are scrambled by random presses from the dark state, so every
//! generated board is solvable. The solver treats the board as a linear
//! system over GF(2): one unknown per cell (pressed or not), one equation
//! per cell (its light must flip an odd number of times iff it is lit).

use crate::entry::move_cursor;
use crate::rng::SimpleRng;
use crate::types::{Action, Direction, Pos, Status};

pub const MIN_SIZE: u8 = 3;
pub const MAX_SIZE: u8 = 9;
pub const DEFAULT_SIZE: u8 = 5;

/// Null-space dimension above which the minimal search is skipped
const MAX_FREE_VARS: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightsOut {
    size: u8,
    lights: Vec<bool>,
    moves: u32,
    cursor: Pos,
    status: Status,
    rng: SimpleRng,
}

impl LightsOut {
    pub fn new(size: u8, seed: u32) -> Self {
        let mut game = Self::dark(size);
        game.rng = SimpleRng::new(seed);
        game.scramble();
        game
    }

    /// All lights off
    pub fn dark(size: u8) -> Self {
        let size = size.clamp(MIN_SIZE, MAX_SIZE);
        Self {
            size,
            lights: vec![false; size as usize * size as usize],
            moves: 0,
            cursor: Pos::new(0, 0),
            status: Status::Playing,
            rng: SimpleRng::default(),
        }
    }

    /// Board from rows of `#` (lit) and `.` (dark)
    pub fn from_rows(rows: &[&str]) -> Self {
        let mut game = Self::dark(rows.len() as u8);
        for (y, row) in rows.iter().enumerate().take(game.size as usize) {
            for (x, ch) in row.chars().enumerate().take(game.size as usize) {
                game.lights[y * game.size as usize + x] = ch == '#';
            }
        }
        game
    }

    fn scramble(&mut self) {
        let n = self.size as usize;
        loop {
            for i in 0..n * n {
                if self.rng.chance(1, 2) {
                    self.toggle_around(Pos::new((i % n) as i8, (i / n) as i8));
                }
            }
            if !self.is_dark() {
                break;
            }
        }
        self.moves = 0;
        self.status = Status::Playing;
        log::info!("lights out round: {0}x{0}, {1} lit", n, self.lit());
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        let n = self.size as i8;
        if pos.x < 0 || pos.y < 0 || pos.x >= n || pos.y >= n {
            return None;
        }
        Some(pos.y as usize * self.size as usize + pos.x as usize)
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn is_lit(&self, pos: Pos) -> bool {
        self.index(pos).is_some_and(|i| self.lights[i])
    }

    pub fn lit(&self) -> usize {
        self.lights.iter().filter(|&&l| l).count()
    }

    pub fn is_dark(&self) -> bool {
        self.lights.iter().all(|&l| !l)
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn cursor(&self) -> Pos {
        self.cursor
    }

    pub fn set_cursor(&mut self, pos: Pos) -> bool {
        if self.index(pos).is_none() {
            return false;
        }
        self.cursor = pos;
        true
    }

    pub fn status(&self) -> Status {
        self.status
    }

    fn toggle_around(&mut self, pos: Pos) {
        for p in std::iter::once(pos).chain(Direction::ALL.iter().map(|&d| pos.step(d))) {
            if let Some(i) = self.index(p) {
                self.lights[i] = !self.lights[i];
            }
        }
    }

    /// Press a cell; returns false when out of bounds or already solved
    pub fn press(&mut self, pos: Pos) -> bool {
        if self.status.is_over() || self.index(pos).is_none() {
            return false;
        }
        self.toggle_around(pos);
        self.moves += 1;
        if self.is_dark() {
            self.status = Status::Won;
            log::info!("lights out solved in {} moves", self.moves);
        }
        true
    }

    /// Fewest presses that turn every light off, row-major
    ///
    /// `None` if the board cannot be solved.
    pub fn solve(&self) -> Option<Vec<Pos>> {
        let n = self.size as usize;
        let cells = n * n;

        // Augmented matrix rows as bit vectors: columns 0..cells are presses,
        // column `cells` is the light state.
        let mut rows: Vec<Vec<bool>> = (0..cells)
            .map(|i| {
                let mut row = vec![false; cells + 1];
                let (x, y) = ((i % n) as i8, (i / n) as i8);
                let here = Pos::new(x, y);
                for p in std::iter::once(here).chain(Direction::ALL.iter().map(|&d| here.step(d))) {
                    if let Some(j) = self.index(p) {
                        row[j] = true;
                    }
                }
                row[cells] = self.lights[i];
                row
            })
            .collect();

        let mut pivots = Vec::new();
        let mut r = 0;
        for col in 0..cells {
            let Some(pr) = (r..cells).find(|&k| rows[k][col]) else {
                continue;
            };
            rows.swap(r, pr);
            for k in 0..cells {
                if k != r && rows[k][col] {
                    for c in 0..=cells {
                        let bit = rows[r][c];
                        rows[k][c] ^= bit;
                    }
                }
            }
            pivots.push(col);
            r += 1;
        }

        if rows[r..].iter().any(|row| row[cells]) {
            return None;
        }

        let free: Vec<usize> = (0..cells).filter(|c| !pivots.contains(c)).collect();
        let combos: u32 = if free.len() <= MAX_FREE_VARS {
            1 << free.len()
        } else {
            1
        };

        let mut best: Option<Vec<bool>> = None;
        for mask in 0..combos {
            let mut presses = vec![false; cells];
            for (bit, &c) in free.iter().enumerate() {
                presses[c] = mask & (1 << bit) != 0;
            }
            for (pr, &col) in pivots.iter().enumerate() {
                let mut v = rows[pr][cells];
                for &c in &free {
                    if rows[pr][c] && presses[c] {
                        v = !v;
                    }
                }
                presses[col] = v;
            }
            let weight = presses.iter().filter(|&&p| p).count();
            if best
                .as_ref()
                .map_or(true, |b| weight < b.iter().filter(|&&p| p).count())
            {
                best = Some(presses);
            }
        }

        best.map(|presses| {
            presses
                .iter()
                .enumerate()
                .filter(|(_, p)| **p)
                .map(|(i, _)| Pos::new((i % n) as i8, (i / n) as i8))
                .collect()
        })
    }

    pub fn restart(&mut self) {
        let rng = self.rng.clone();
        *self = Self::dark(self.size);
        self.rng = rng;
        self.scramble();
    }

    pub fn apply_action(&mut self, action: Action) -> bool {
        match action {
            Action::Restart => {
                self.restart();
                true
            }
            Action::Move(dir) => {
                let next = move_cursor(self.cursor, dir, self.size, self.size);
                let moved = next != self.cursor;
                self.cursor = next;
                moved
            }
            Action::Select => self.press(self.cursor),
            Action::Hint => match self.solve().and_then(|p| p.first().copied()) {
                Some(p) => {
                    self.cursor = p;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }
}
