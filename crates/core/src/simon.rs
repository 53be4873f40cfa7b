//! Simon says - repeat a growing sequence of pad presses
//!
//! The game alternates between showing the sequence (the front-end calls
//! [`SimonGame::advance_playback`] on its own timer) and waiting for the
//! player to repeat it. Each completed round appends one random pad.

use serde::Serialize;

use crate::rng::SimpleRng;
use crate::types::{Action, Direction, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pad {
    Green,
    Red,
    Yellow,
    Blue,
}

impl Pad {
    pub const ALL: [Pad; 4] = [Pad::Green, Pad::Red, Pad::Yellow, Pad::Blue];

    /// Pad for keys `1`-`4`
    pub fn from_digit(d: u8) -> Option<Self> {
        Self::ALL.get((d as usize).checked_sub(1)?).copied()
    }

    /// Pads sit in a diamond: green top, red right, blue bottom, yellow left
    pub fn from_direction(dir: Direction) -> Self {
        match dir {
            Direction::Up => Pad::Green,
            Direction::Right => Pad::Red,
            Direction::Down => Pad::Blue,
            Direction::Left => Pad::Yellow,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Pad::Green => "green",
            Pad::Red => "red",
            Pad::Yellow => "yellow",
            Pad::Blue => "blue",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum Phase {
    /// Playback: `step` is the next sequence entry to light up
    Showing { step: usize },
    /// Input: `step` is the next entry the player must press
    Awaiting { step: usize },
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    Ignored,
    Correct,
    RoundComplete,
    Wrong,
}

#[derive(Debug, Clone)]
pub struct SimonGame {
    sequence: Vec<Pad>,
    phase: Phase,
    score: u32,
    best: u32,
    rng: SimpleRng,
}

impl SimonGame {
    pub fn new(seed: u32) -> Self {
        let mut game = Self {
            sequence: Vec::new(),
            phase: Phase::Showing { step: 0 },
            score: 0,
            best: 0,
            rng: SimpleRng::new(seed),
        };
        game.extend();
        log::info!("simon round started");
        game
    }

    /// Game with a fixed opening sequence
    pub fn with_sequence(sequence: Vec<Pad>, seed: u32) -> Self {
        Self {
            sequence,
            phase: Phase::Showing { step: 0 },
            score: 0,
            best: 0,
            rng: SimpleRng::new(seed),
        }
    }

    fn extend(&mut self) {
        let pad = Pad::ALL[self.rng.next_index(Pad::ALL.len())];
        self.sequence.push(pad);
    }

    pub fn sequence(&self) -> &[Pad] {
        &self.sequence
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Completed rounds
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Best score this session
    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn status(&self) -> Status {
        if self.phase == Phase::GameOver {
            Status::Lost
        } else {
            Status::Playing
        }
    }

    /// Next pad to light during playback
    ///
    /// Returns `None` and switches to input once the whole sequence has
    /// been shown.
    pub fn advance_playback(&mut self) -> Option<Pad> {
        let Phase::Showing { step } = self.phase else {
            return None;
        };
        match self.sequence.get(step) {
            Some(&pad) => {
                self.phase = Phase::Showing { step: step + 1 };
                Some(pad)
            }
            None => {
                self.phase = Phase::Awaiting { step: 0 };
                None
            }
        }
    }

    pub fn press(&mut self, pad: Pad) -> PressOutcome {
        let Phase::Awaiting { step } = self.phase else {
            return PressOutcome::Ignored;
        };
        if self.sequence.get(step) != Some(&pad) {
            self.phase = Phase::GameOver;
            log::info!("simon over after {} rounds", self.score);
            return PressOutcome::Wrong;
        }
        if step + 1 < self.sequence.len() {
            self.phase = Phase::Awaiting { step: step + 1 };
            return PressOutcome::Correct;
        }

        self.score += 1;
        self.best = self.best.max(self.score);
        self.extend();
        self.phase = Phase::Showing { step: 0 };
        log::debug!("simon round {} complete", self.score);
        PressOutcome::RoundComplete
    }

    /// Start over with a fresh sequence; the best score is kept
    pub fn restart(&mut self) {
        self.sequence.clear();
        self.score = 0;
        self.phase = Phase::Showing { step: 0 };
        self.extend();
    }

    pub fn apply_action(&mut self, action: Action) -> bool {
        let pad = match action {
            Action::Restart => {
                self.restart();
                return true;
            }
            Action::Select if self.phase == Phase::GameOver => {
                self.restart();
                return true;
            }
            Action::Digit(d) => Pad::from_digit(d),
            Action::Move(dir) => Some(Pad::from_direction(dir)),
            _ => None,
        };
        pad.is_some_and(|p| self.press(p) != PressOutcome::Ignored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show_all(game: &mut SimonGame) -> Vec<Pad> {
        std::iter::from_fn(|| game.advance_playback()).collect()
    }

    #[test]
    fn playback_walks_the_sequence_then_waits() {
        let mut game = SimonGame::with_sequence(vec![Pad::Red, Pad::Blue], 1);
        assert_eq!(show_all(&mut game), vec![Pad::Red, Pad::Blue]);
        assert_eq!(game.phase(), Phase::Awaiting { step: 0 });
        assert_eq!(game.advance_playback(), None);
    }

    #[test]
    fn presses_ignored_during_playback() {
        let mut game = SimonGame::with_sequence(vec![Pad::Red], 1);
        assert_eq!(game.press(Pad::Red), PressOutcome::Ignored);
    }

    #[test]
    fn completing_a_round_extends_the_sequence() {
        let mut game = SimonGame::with_sequence(vec![Pad::Red, Pad::Blue], 1);
        show_all(&mut game);
        assert_eq!(game.press(Pad::Red), PressOutcome::Correct);
        assert_eq!(game.press(Pad::Blue), PressOutcome::RoundComplete);
        assert_eq!(game.sequence().len(), 3);
        assert_eq!(game.score(), 1);
        assert_eq!(game.phase(), Phase::Showing { step: 0 });
    }

    #[test]
    fn wrong_press_ends_game_and_keeps_best() {
        let mut game = SimonGame::with_sequence(vec![Pad::Green], 1);
        show_all(&mut game);
        game.press(Pad::Green);
        show_all(&mut game);
        let wrong = Pad::ALL
            .into_iter()
            .find(|&p| p != game.sequence()[0])
            .unwrap();
        assert_eq!(game.press(wrong), PressOutcome::Wrong);
        assert_eq!(game.status(), Status::Lost);

        game.apply_action(Action::Restart);
        assert_eq!(game.score(), 0);
        assert_eq!(game.best(), 1);
        assert_eq!(game.sequence().len(), 1);
    }

    #[test]
    fn digits_map_to_pads() {
        assert_eq!(Pad::from_digit(1), Some(Pad::Green));
        assert_eq!(Pad::from_digit(4), Some(Pad::Blue));
        assert_eq!(Pad::from_digit(0), None);
        assert_eq!(Pad::from_digit(5), None);
    }
}
