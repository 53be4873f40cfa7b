//! Bundled data - word list and sudoku puzzle bank
//!
//! Both ship inside the binary as JSON. The word list can be replaced at
//! runtime by a file with the same shape.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::sudoku::Difficulty;
use crate::wordle::{WordList, WORD_LEN};

const WORDS_JSON: &str = include_str!("../assets/words.json");
const SUDOKU_JSON: &str = include_str!("../assets/sudoku.json");

#[derive(Debug, Deserialize)]
struct WordFile {
    words: Vec<String>,
}

/// Puzzles grouped by difficulty, 81 characters each (`.` = empty)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SudokuBank {
    #[serde(default)]
    pub easy: Vec<String>,
    #[serde(default)]
    pub medium: Vec<String>,
    #[serde(default)]
    pub hard: Vec<String>,
}

impl SudokuBank {
    pub fn puzzles(&self, difficulty: Difficulty) -> &[String] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    pub fn len(&self) -> usize {
        self.easy.len() + self.medium.len() + self.hard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parse a word list document: `{ "words": [...] }`
///
/// Words are lowercased; entries that are not five ASCII letters are
/// skipped. An empty result is an error.
pub fn parse_words(json: &str) -> Result<WordList> {
    let file: WordFile = serde_json::from_str(json).context("word list is not valid JSON")?;
    let total = file.words.len();
    let list = WordList::new(file.words);
    if list.is_empty() {
        bail!("word list has no {}-letter words", WORD_LEN);
    }
    if list.len() < total {
        log::warn!("skipped {} malformed words", total - list.len());
    }
    Ok(list)
}

pub fn bundled_words() -> Result<WordList> {
    parse_words(WORDS_JSON).context("bundled word list")
}

/// Load a word list from disk
pub fn load_words(path: &Path) -> Result<WordList> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read word list {}", path.display()))?;
    let list = parse_words(&json).with_context(|| format!("word list {}", path.display()))?;
    log::info!("loaded {} words from {}", list.len(), path.display());
    Ok(list)
}

pub fn parse_sudoku_bank(json: &str) -> Result<SudokuBank> {
    let bank: SudokuBank =
        serde_json::from_str(json).context("sudoku bank is not valid JSON")?;
    for (name, puzzles) in [("easy", &bank.easy), ("medium", &bank.medium), ("hard", &bank.hard)] {
        for (i, p) in puzzles.iter().enumerate() {
            if p.chars().count() != crate::sudoku::CELLS {
                bail!("{} puzzle {} has {} cells", name, i, p.chars().count());
            }
        }
    }
    Ok(bank)
}

pub fn bundled_sudoku() -> Result<SudokuBank> {
    parse_sudoku_bank(SUDOKU_JSON).context("bundled sudoku bank")
}
