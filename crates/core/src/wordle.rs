//! Wordle - guess a five-letter word in six attempts
//!
//! Guesses are checked against a local word list; there is no remote
//! dictionary.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::rng::SimpleRng;
use crate::types::{Action, Status};

pub const WORD_LEN: usize = 5;
pub const MAX_ATTEMPTS: usize = 6;

/// Per-letter feedback, ordered from worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterScore {
    Absent,
    Present,
    Correct,
}

impl LetterScore {
    pub fn symbol(self) -> char {
        match self {
            LetterScore::Absent => '.',
            LetterScore::Present => '?',
            LetterScore::Correct => '#',
        }
    }
}

/// Sorted, deduplicated lowercase five-letter words
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Keep only five-letter ASCII words, lowercased
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_ascii_lowercase())
            .filter(|w| w.len() == WORD_LEN && w.bytes().all(|b| b.is_ascii_lowercase()))
            .collect();
        words.sort_unstable();
        words.dedup();
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words
            .binary_search_by(|w| w.as_str().cmp(word))
            .is_ok()
    }

    pub fn pick(&self, rng: &mut SimpleRng) -> Option<&str> {
        self.words.get(rng.next_index(self.words.len())).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

/// Score a guess against the secret
///
/// Exact positions are marked first. Remaining guess letters are marked
/// present only while the secret still has unmatched copies of that
/// letter, so a doubled letter in the guess is not double-counted.
pub fn score_guess(secret: &str, guess: &str) -> [LetterScore; WORD_LEN] {
    let s = secret.as_bytes();
    let g = guess.as_bytes();
    let mut result = [LetterScore::Absent; WORD_LEN];
    let mut remaining = [0u8; 26];

    for i in 0..WORD_LEN {
        match (s.get(i), g.get(i)) {
            (Some(a), Some(b)) if a == b => result[i] = LetterScore::Correct,
            (Some(a), _) if a.is_ascii_lowercase() => remaining[(a - b'a') as usize] += 1,
            _ => {}
        }
    }

    for i in 0..WORD_LEN {
        if result[i] == LetterScore::Correct {
            continue;
        }
        let Some(&b) = g.get(i).filter(|b| b.is_ascii_lowercase()) else {
            continue;
        };
        let slot = &mut remaining[(b - b'a') as usize];
        if *slot > 0 {
            *slot -= 1;
            result[i] = LetterScore::Present;
        }
    }
    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessError {
    WrongLength,
    NotAlphabetic,
    NotInWordList,
    GameOver,
}

impl GuessError {
    pub fn code(self) -> &'static str {
        match self {
            GuessError::WrongLength => "wrong_length",
            GuessError::NotAlphabetic => "not_alphabetic",
            GuessError::NotInWordList => "not_in_word_list",
            GuessError::GameOver => "game_over",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            GuessError::WrongLength => "guess must be five letters",
            GuessError::NotAlphabetic => "guess may only contain letters",
            GuessError::NotInWordList => "not in word list",
            GuessError::GameOver => "round is over",
        }
    }
}

impl fmt::Display for GuessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for GuessError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Guess {
    pub word: String,
    pub scores: [LetterScore; WORD_LEN],
}

impl Guess {
    pub fn is_correct(&self) -> bool {
        self.scores.iter().all(|&s| s == LetterScore::Correct)
    }
}

#[derive(Debug, Clone)]
pub struct WordleGame {
    words: Arc<WordList>,
    secret: String,
    guesses: Vec<Guess>,
    buffer: String,
    keyboard: [Option<LetterScore>; 26],
    last_error: Option<GuessError>,
    status: Status,
    rng: SimpleRng,
}

impl WordleGame {
    /// New round with a random secret; `None` for an empty word list
    pub fn new(words: Arc<WordList>, seed: u32) -> Option<Self> {
        let mut rng = SimpleRng::new(seed);
        let secret = words.pick(&mut rng)?.to_string();
        Some(Self::with_secret(words, secret, rng))
    }

    fn with_secret(words: Arc<WordList>, secret: String, rng: SimpleRng) -> Self {
        log::info!("wordle round: {} words in list", words.len());
        Self {
            words,
            secret,
            guesses: Vec::with_capacity(MAX_ATTEMPTS),
            buffer: String::with_capacity(WORD_LEN),
            keyboard: [None; 26],
            last_error: None,
            status: Status::Playing,
            rng,
        }
    }

    /// Round with a fixed secret (tests, daily puzzles)
    pub fn from_secret(words: Arc<WordList>, secret: &str) -> Option<Self> {
        let secret = secret.to_ascii_lowercase();
        words
            .contains(&secret)
            .then(|| Self::with_secret(words, secret, SimpleRng::default()))
    }

    pub fn guesses(&self) -> &[Guess] {
        &self.guesses
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn attempts_left(&self) -> usize {
        MAX_ATTEMPTS - self.guesses.len()
    }

    pub fn last_error(&self) -> Option<GuessError> {
        self.last_error
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Revealed once the round is over
    pub fn secret(&self) -> Option<&str> {
        self.status.is_over().then_some(self.secret.as_str())
    }

    /// Best feedback seen so far for a letter
    pub fn key_state(&self, letter: char) -> Option<LetterScore> {
        let c = letter.to_ascii_lowercase();
        if !c.is_ascii_lowercase() {
            return None;
        }
        self.keyboard[(c as u8 - b'a') as usize]
    }

    pub fn guess(&mut self, word: &str) -> Result<[LetterScore; WORD_LEN], GuessError> {
        if self.status.is_over() {
            return Err(GuessError::GameOver);
        }
        let word = word.trim().to_ascii_lowercase();
        if word.chars().count() != WORD_LEN {
            return Err(GuessError::WrongLength);
        }
        if !word.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(GuessError::NotAlphabetic);
        }
        if !self.words.contains(&word) {
            return Err(GuessError::NotInWordList);
        }

        let scores = score_guess(&self.secret, &word);
        for (b, &s) in word.bytes().zip(scores.iter()) {
            let key = &mut self.keyboard[(b - b'a') as usize];
            *key = Some(key.map_or(s, |k| k.max(s)));
        }

        let guess = Guess { word, scores };
        if guess.is_correct() {
            self.status = Status::Won;
            log::info!("wordle solved in {} guesses", self.guesses.len() + 1);
        }
        self.guesses.push(guess);
        if self.status == Status::Playing && self.guesses.len() >= MAX_ATTEMPTS {
            self.status = Status::Lost;
            log::info!("wordle lost, secret was {}", self.secret);
        }
        Ok(scores)
    }

    /// Type a letter into the buffer; ignored when full
    pub fn type_letter(&mut self, letter: char) -> bool {
        if self.status.is_over() || !letter.is_ascii_alphabetic() || self.buffer.len() >= WORD_LEN
        {
            return false;
        }
        self.buffer.push(letter.to_ascii_lowercase());
        self.last_error = None;
        true
    }

    /// Submit the buffer; a rejected word stays in the buffer
    pub fn submit(&mut self) -> Result<[LetterScore; WORD_LEN], GuessError> {
        let word = self.buffer.clone();
        match self.guess(&word) {
            Ok(scores) => {
                self.buffer.clear();
                self.last_error = None;
                Ok(scores)
            }
            Err(err) => {
                self.last_error = Some(err);
                Err(err)
            }
        }
    }

    pub fn restart(&mut self) {
        let mut rng = self.rng.clone();
        let secret = match self.words.pick(&mut rng) {
            Some(w) => w.to_string(),
            None => return,
        };
        *self = Self::with_secret(Arc::clone(&self.words), secret, rng);
    }

    pub fn apply_action(&mut self, action: Action) -> bool {
        match action {
            Action::Restart => {
                self.restart();
                true
            }
            Action::Letter(c) => self.type_letter(c),
            Action::Erase => {
                let erased = self.buffer.pop().is_some();
                if erased {
                    self.last_error = None;
                }
                erased
            }
            Action::Submit | Action::Select => {
                if let Err(err) = self.submit() {
                    log::debug!("guess {:?} rejected: {}", self.buffer, err.code());
                }
                true
            }
            _ => false,
        }
    }
}
