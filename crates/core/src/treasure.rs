//! Treasure hunt - dig for hidden treasure with distance hints

use serde::Serialize;

use crate::entry::move_cursor;
use crate::rng::SimpleRng;
use crate::types::{Action, Pos, Status};

pub const DEFAULT_SIZE: u8 = 8;
pub const DEFAULT_TREASURES: usize = 3;
pub const DEFAULT_DIGS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DigResult {
    Treasure,
    /// Manhattan distance to the nearest treasure still buried
    Distance(u32),
}

#[derive(Debug, Clone)]
pub struct TreasureGame {
    size: u8,
    treasures: Vec<Pos>,
    found: Vec<Pos>,
    dug: Vec<Option<DigResult>>,
    digs_left: u32,
    digs: u32,
    cursor: Pos,
    status: Status,
    rng: SimpleRng,
}

impl TreasureGame {
    pub fn new(seed: u32) -> Self {
        Self::with_params(DEFAULT_SIZE, DEFAULT_TREASURES, DEFAULT_DIGS, seed)
    }

    pub fn with_params(size: u8, treasures: usize, digs: u32, seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let size = size.clamp(2, crate::types::MAX_GRID);
        let spots = bury(size, treasures, &mut rng);
        Self::from_treasures(size, spots, digs, rng)
    }

    /// Game with known treasure spots (tests, replays)
    ///
    /// Duplicate spots and spots off the board are dropped.
    pub fn with_treasures(size: u8, treasures: Vec<Pos>, digs: u32) -> Self {
        let size = size.clamp(2, crate::types::MAX_GRID);
        let n = size as i8;
        let mut spots: Vec<Pos> = Vec::with_capacity(treasures.len());
        for p in treasures {
            if p.x >= 0 && p.y >= 0 && p.x < n && p.y < n && !spots.contains(&p) {
                spots.push(p);
            }
        }
        Self::from_treasures(size, spots, digs, SimpleRng::default())
    }

    fn from_treasures(size: u8, treasures: Vec<Pos>, digs: u32, rng: SimpleRng) -> Self {
        log::info!(
            "treasure round: {0}x{0}, {1} treasures, {2} digs",
            size,
            treasures.len(),
            digs
        );
        Self {
            size,
            treasures,
            found: Vec::new(),
            dug: vec![None; size as usize * size as usize],
            digs_left: digs,
            digs,
            cursor: Pos::new(0, 0),
            status: Status::Playing,
            rng,
        }
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

    pub fn digs_left(&self) -> u32 {
        self.digs_left
    }

    pub fn found(&self) -> usize {
        self.found.len()
    }

    pub fn treasures(&self) -> usize {
        self.treasures.len()
    }

    /// What was dug at `pos`, `None` if untouched
    pub fn cell(&self, pos: Pos) -> Option<DigResult> {
        self.index(pos).and_then(|i| self.dug[i])
    }

    /// Treasure spots, shown once the round is over
    pub fn revealed(&self) -> Option<&[Pos]> {
        self.status.is_over().then_some(self.treasures.as_slice())
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

    /// Dig at `pos`; `None` when out of bounds, already dug, or over
    pub fn dig(&mut self, pos: Pos) -> Option<DigResult> {
        if self.status.is_over() || self.digs_left == 0 {
            return None;
        }
        let i = self.index(pos)?;
        if self.dug[i].is_some() {
            return None;
        }
        self.digs_left -= 1;

        let result = if self.treasures.contains(&pos) {
            self.found.push(pos);
            DigResult::Treasure
        } else {
            let nearest = self
                .treasures
                .iter()
                .filter(|t| !self.found.contains(*t))
                .map(|t| t.manhattan(pos))
                .min()
                .unwrap_or(0);
            DigResult::Distance(nearest)
        };
        self.dug[i] = Some(result);

        if self.found.len() == self.treasures.len() {
            self.status = Status::Won;
            log::info!("all treasure found with {} digs left", self.digs_left);
        } else if self.digs_left == 0 {
            self.status = Status::Lost;
            log::info!("out of digs, {} treasures left", self.treasures.len() - self.found.len());
        }
        Some(result)
    }

    pub fn restart(&mut self) {
        let spots = bury(self.size, self.treasures.len(), &mut self.rng);
        let rng = self.rng.clone();
        *self = Self::from_treasures(self.size, spots, self.digs, rng);
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
            Action::Select => self.dig(self.cursor).is_some(),
            _ => false,
        }
    }
}

/// Distinct random spots
fn bury(size: u8, count: usize, rng: &mut SimpleRng) -> Vec<Pos> {
    let n = size as usize;
    let mut cells: Vec<usize> = (0..n * n).collect();
    rng.shuffle(&mut cells);
    cells
        .into_iter()
        .take(count.clamp(1, n * n))
        .map(|i| Pos::new((i % n) as i8, (i / n) as i8))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn treasures_are_distinct() {
        let game = TreasureGame::with_params(4, 5, 10, 8);
        let mut spots = game.treasures.clone();
        spots.sort();
        spots.dedup();
        assert_eq!(spots.len(), 5);
    }

    #[test]
    fn dig_reports_distance_to_nearest_buried() {
        let mut game =
            TreasureGame::with_treasures(6, vec![Pos::new(1, 1), Pos::new(5, 5)], 10);
        assert_eq!(game.dig(Pos::new(3, 1)), Some(DigResult::Distance(2)));
        assert_eq!(game.dig(Pos::new(1, 1)), Some(DigResult::Treasure));
        // (1, 1) is found now, so the hint points at the other one.
        assert_eq!(game.dig(Pos::new(2, 2)), Some(DigResult::Distance(6)));
        assert_eq!(game.dig(Pos::new(2, 2)), None);
        assert_eq!(game.digs_left(), 7);
    }

    #[test]
    fn finding_everything_wins() {
        let mut game = TreasureGame::with_treasures(4, vec![Pos::new(0, 0)], 3);
        game.dig(Pos::new(0, 0));
        assert_eq!(game.status(), Status::Won);
        assert_eq!(game.revealed(), Some(&[Pos::new(0, 0)][..]));
    }

    #[test]
    fn repeated_and_off_board_spots_are_dropped() {
        let spots = vec![Pos::new(1, 1), Pos::new(1, 1), Pos::new(9, 0), Pos::new(-1, 2)];
        let mut game = TreasureGame::with_treasures(4, spots, 5);
        assert_eq!(game.treasures(), 1);
        assert_eq!(game.dig(Pos::new(1, 1)), Some(DigResult::Treasure));
        assert_eq!(game.status(), Status::Won);

        let game = TreasureGame::with_treasures(200, vec![Pos::new(0, 0)], 5);
        assert_eq!(game.size(), crate::types::MAX_GRID);
    }

    #[test]
    fn running_out_of_digs_loses() {
        let mut game = TreasureGame::with_treasures(4, vec![Pos::new(3, 3)], 2);
        assert!(game.revealed().is_none());
        game.dig(Pos::new(0, 0));
        game.dig(Pos::new(1, 0));
        assert_eq!(game.status(), Status::Lost);
        assert_eq!(game.dig(Pos::new(3, 3)), None);
    }
}
