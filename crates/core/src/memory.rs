//! Memory match - flip two cards at a time and find every pair

use arrayvec::ArrayVec;
use serde::Serialize;

use crate::entry::move_cursor;
use crate::rng::SimpleRng;
use crate::types::{Action, Pos, Status};

pub const DEFAULT_PAIRS: usize = 8;
pub const MAX_PAIRS: usize = 18;
pub const COLUMNS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardState {
    Hidden,
    Revealed,
    Matched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Card {
    pub face: u8,
    pub state: CardState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipOutcome {
    /// Card out of range, already face up, or game over
    Ignored,
    First,
    Match,
    Mismatch,
}

#[derive(Debug, Clone)]
pub struct MemoryGame {
    cards: Vec<Card>,
    /// Face-up cards of the current turn
    pending: ArrayVec<usize, 2>,
    moves: u32,
    matched: usize,
    cursor: usize,
    status: Status,
    rng: SimpleRng,
}

impl MemoryGame {
    pub fn new(pairs: usize, seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let cards = deal(pairs, &mut rng);
        Self::from_cards(cards, rng)
    }

    /// Game with a fixed layout; faces must come in pairs
    pub fn from_faces(faces: &[u8]) -> Self {
        let cards = faces
            .iter()
            .map(|&face| Card {
                face,
                state: CardState::Hidden,
            })
            .collect();
        Self::from_cards(cards, SimpleRng::default())
    }

    fn from_cards(cards: Vec<Card>, rng: SimpleRng) -> Self {
        log::info!("memory round: {} pairs", cards.len() / 2);
        Self {
            cards,
            pending: ArrayVec::new(),
            moves: 0,
            matched: 0,
            cursor: 0,
            status: Status::Playing,
            rng,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn pairs(&self) -> usize {
        self.cards.len() / 2
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn matched(&self) -> usize {
        self.matched
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, index: usize) -> bool {
        if index >= self.cards.len() {
            return false;
        }
        self.cursor = index;
        true
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn rows(&self) -> usize {
        self.cards.len().div_ceil(COLUMNS)
    }

    /// Two mismatched cards are still face up
    pub fn has_pending_mismatch(&self) -> bool {
        self.pending.len() == 2
    }

    /// Hide a pending mismatch
    pub fn settle(&mut self) -> bool {
        if !self.has_pending_mismatch() {
            return false;
        }
        for i in self.pending.drain(..) {
            self.cards[i].state = CardState::Hidden;
        }
        true
    }

    pub fn flip(&mut self, index: usize) -> FlipOutcome {
        if self.status.is_over() {
            return FlipOutcome::Ignored;
        }
        self.settle();
        match self.cards.get(index) {
            Some(card) if card.state == CardState::Hidden => {}
            _ => return FlipOutcome::Ignored,
        }

        self.cards[index].state = CardState::Revealed;
        let Some(&first) = self.pending.first() else {
            self.pending.push(index);
            return FlipOutcome::First;
        };

        self.moves += 1;
        if self.cards[first].face == self.cards[index].face {
            self.cards[first].state = CardState::Matched;
            self.cards[index].state = CardState::Matched;
            self.pending.clear();
            self.matched += 1;
            if self.matched == self.pairs() {
                self.status = Status::Won;
                log::info!("memory cleared in {} moves", self.moves);
            }
            FlipOutcome::Match
        } else {
            self.pending.push(index);
            FlipOutcome::Mismatch
        }
    }

    pub fn restart(&mut self) {
        let pairs = self.pairs();
        let cards = deal(pairs, &mut self.rng);
        let rng = self.rng.clone();
        *self = Self::from_cards(cards, rng);
    }

    pub fn apply_action(&mut self, action: Action) -> bool {
        match action {
            Action::Restart => {
                self.restart();
                true
            }
            Action::Move(dir) => {
                let at = Pos::new((self.cursor % COLUMNS) as i8, (self.cursor / COLUMNS) as i8);
                let next = move_cursor(at, dir, COLUMNS as u8, self.rows() as u8);
                let index = next.y as usize * COLUMNS + next.x as usize;
                if index == self.cursor || index >= self.cards.len() {
                    return false;
                }
                self.cursor = index;
                true
            }
            Action::Select => self.flip(self.cursor) != FlipOutcome::Ignored,
            Action::Cancel => self.settle(),
            _ => false,
        }
    }
}

fn deal(pairs: usize, rng: &mut SimpleRng) -> Vec<Card> {
    let pairs = pairs.clamp(1, MAX_PAIRS);
    let mut cards: Vec<Card> = (0..pairs as u8)
        .flat_map(|face| {
            [Card {
                face,
                state: CardState::Hidden,
            }; 2]
        })
        .collect();
    rng.shuffle(&mut cards);
    cards
}
