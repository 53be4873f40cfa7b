//! Sudoku - 9x9 board, solver, unique-solution generator and game state
//!
//! Candidates are kept as 9-bit masks (bit `d` set = digit `d` allowed).
//! The solver always branches on the empty cell with the fewest
//! candidates, which keeps uniqueness checks fast enough to run once per
//! removed clue during generation.

use std::fmt;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::assets::SudokuBank;
use crate::entry::{move_cursor, EntryError};
use crate::rng::SimpleRng;
use crate::types::{Action, Pos, Status};

pub const SIZE: usize = 9;
pub const CELLS: usize = SIZE * SIZE;

const ALL_DIGITS: u16 = 0b11_1111_1110;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Clue count the generator aims for
    pub fn clues(self) -> usize {
        match self {
            Difficulty::Easy => 40,
            Difficulty::Medium => 32,
            Difficulty::Hard => 26,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// 9x9 digits, 0 = empty
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SudokuBoard {
    cells: [u8; CELLS],
}

impl Default for SudokuBoard {
    fn default() -> Self {
        Self { cells: [0; CELLS] }
    }
}

impl fmt::Debug for SudokuBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(SIZE) {
            for &v in row {
                let ch = if v == 0 { '.' } else { (b'0' + v) as char };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[inline(always)]
fn index(pos: Pos) -> Option<usize> {
    if pos.x < 0 || pos.y < 0 || pos.x as usize >= SIZE || pos.y as usize >= SIZE {
        return None;
    }
    Some(pos.y as usize * SIZE + pos.x as usize)
}

fn pos_of(i: usize) -> Pos {
    Pos::new((i % SIZE) as i8, (i / SIZE) as i8)
}

impl SudokuBoard {
    /// Parse 81 characters: `1`-`9` for digits, `.` or `0` for empty
    pub fn parse(s: &str) -> Option<Self> {
        let mut board = Self::default();
        let mut n = 0;
        for ch in s.chars().filter(|c| !c.is_whitespace()) {
            if n >= CELLS {
                return None;
            }
            board.cells[n] = match ch {
                '.' | '0' => 0,
                '1'..='9' => ch as u8 - b'0',
                _ => return None,
            };
            n += 1;
        }
        (n == CELLS).then_some(board)
    }

    pub fn to_line(&self) -> String {
        self.cells
            .iter()
            .map(|&v| if v == 0 { '.' } else { (b'0' + v) as char })
            .collect()
    }

    /// Digit at `pos` (0 = empty), `None` out of bounds
    pub fn get(&self, pos: Pos) -> Option<u8> {
        index(pos).map(|i| self.cells[i])
    }

    pub fn set(&mut self, pos: Pos, digit: u8) -> bool {
        match index(pos) {
            Some(i) if digit <= 9 => {
                self.cells[i] = digit;
                true
            }
            _ => false,
        }
    }

    pub fn clues(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&v| v != 0)
    }

    /// Digits still allowed at cell `i` as a bit mask
    fn candidates(&self, i: usize) -> u16 {
        let (r, c) = (i / SIZE, i % SIZE);
        let mut used = 0u16;
        for k in 0..SIZE {
            used |= 1 << self.cells[r * SIZE + k];
            used |= 1 << self.cells[k * SIZE + c];
        }
        let (br, bc) = (r / 3 * 3, c / 3 * 3);
        for dr in 0..3 {
            for dc in 0..3 {
                used |= 1 << self.cells[(br + dr) * SIZE + bc + dc];
            }
        }
        !used & ALL_DIGITS
    }

    /// Digits that may go at `pos` without breaking a row, column or box
    pub fn candidates_at(&self, pos: Pos) -> Vec<u8> {
        let Some(i) = index(pos) else {
            return Vec::new();
        };
        let mask = self.candidates(i);
        (1..=9).filter(|d| mask & (1 << d) != 0).collect()
    }

    /// Filled cells that share a row, column or box with an equal digit
    pub fn conflicts(&self) -> Vec<Pos> {
        let mut flagged = [false; CELLS];
        for i in 0..CELLS {
            let v = self.cells[i];
            if v == 0 {
                continue;
            }
            let (r, c) = (i / SIZE, i % SIZE);
            for j in (i + 1)..CELLS {
                if self.cells[j] != v {
                    continue;
                }
                let (r2, c2) = (j / SIZE, j % SIZE);
                if r == r2 || c == c2 || (r / 3 == r2 / 3 && c / 3 == c2 / 3) {
                    flagged[i] = true;
                    flagged[j] = true;
                }
            }
        }
        (0..CELLS).filter(|&i| flagged[i]).map(pos_of).collect()
    }

    pub fn solve(&self) -> Option<SudokuBoard> {
        if !self.conflicts().is_empty() {
            return None;
        }
        let mut work = *self;
        let mut found = 0;
        let mut first = None;
        work.search(1, &mut found, &mut first);
        first
    }

    /// Number of solutions, counting stops at `limit`
    pub fn count_solutions(&self, limit: usize) -> usize {
        if limit == 0 || !self.conflicts().is_empty() {
            return 0;
        }
        let mut work = *self;
        let mut found = 0;
        let mut first = None;
        work.search(limit, &mut found, &mut first);
        found
    }

    fn search(&mut self, limit: usize, found: &mut usize, first: &mut Option<SudokuBoard>) {
        let mut best: Option<(usize, u16)> = None;
        for i in 0..CELLS {
            if self.cells[i] != 0 {
                continue;
            }
            let mask = self.candidates(i);
            if mask == 0 {
                return;
            }
            if best.map_or(true, |(_, m)| mask.count_ones() < m.count_ones()) {
                best = Some((i, mask));
            }
        }

        let Some((i, mask)) = best else {
            *found += 1;
            first.get_or_insert(*self);
            return;
        };

        for d in 1..=9u8 {
            if mask & (1 << d) == 0 {
                continue;
            }
            self.cells[i] = d;
            self.search(limit, found, first);
            self.cells[i] = 0;
            if *found >= limit {
                return;
            }
        }
    }

    fn fill_random(&mut self, rng: &mut SimpleRng) -> bool {
        let Some(i) = self.cells.iter().position(|&v| v == 0) else {
            return true;
        };
        let mut digits = [1u8, 2, 3, 4, 5, 6, 7, 8, 9];
        rng.shuffle(&mut digits);
        let mask = self.candidates(i);
        for d in digits {
            if mask & (1 << d) == 0 {
                continue;
            }
            self.cells[i] = d;
            if self.fill_random(rng) {
                return true;
            }
        }
        self.cells[i] = 0;
        false
    }
}

/// Random puzzle with a unique solution; returns `(puzzle, solution)`
///
/// Clues are removed in random order as long as the solution stays
/// unique, stopping at the difficulty's clue target or when no clue can
/// be removed.
pub fn generate(difficulty: Difficulty, rng: &mut SimpleRng) -> (SudokuBoard, SudokuBoard) {
    let mut solution = SudokuBoard::default();
    solution.fill_random(rng);

    let mut puzzle = solution;
    let mut order: Vec<usize> = (0..CELLS).collect();
    rng.shuffle(&mut order);

    let target = difficulty.clues();
    let mut clues = CELLS;
    for i in order {
        if clues <= target {
            break;
        }
        let digit = puzzle.cells[i];
        puzzle.cells[i] = 0;
        if puzzle.count_solutions(2) == 1 {
            clues -= 1;
        } else {
            puzzle.cells[i] = digit;
        }
    }

    log::debug!(
        "sudoku generated: {} clues (target {})",
        clues,
        target
    );
    (puzzle, solution)
}

#[derive(Debug, Serialize, Deserialize)]
struct SudokuSave {
    difficulty: Difficulty,
    puzzle: String,
    solution: String,
    cells: String,
    mistakes: u32,
    hints: u32,
    cursor: Pos,
    rng: u32,
}

/// One sudoku round: givens, entries, mistakes and hints
#[derive(Debug, Clone)]
pub struct SudokuGame {
    puzzle: SudokuBoard,
    solution: SudokuBoard,
    cells: SudokuBoard,
    difficulty: Difficulty,
    mistakes: u32,
    hints: u32,
    cursor: Pos,
    status: Status,
    rng: SimpleRng,
}

impl SudokuGame {
    /// Freshly generated puzzle
    pub fn new(difficulty: Difficulty, seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let (puzzle, solution) = generate(difficulty, &mut rng);
        Self::from_parts(puzzle, solution, difficulty, rng)
    }

    /// Game for a given puzzle; `None` if it has no solution
    pub fn from_puzzle(puzzle: SudokuBoard, difficulty: Difficulty, seed: u32) -> Option<Self> {
        let solution = puzzle.solve()?;
        Some(Self::from_parts(puzzle, solution, difficulty, SimpleRng::new(seed)))
    }

    /// Random puzzle from the bank
    pub fn from_bank(bank: &SudokuBank, difficulty: Difficulty, seed: u32) -> Option<Self> {
        let mut rng = SimpleRng::new(seed);
        let puzzles = bank.puzzles(difficulty);
        let line = puzzles.get(rng.next_index(puzzles.len()))?;
        let puzzle = SudokuBoard::parse(line)?;
        let solution = puzzle.solve()?;
        Some(Self::from_parts(puzzle, solution, difficulty, rng))
    }

    fn from_parts(
        puzzle: SudokuBoard,
        solution: SudokuBoard,
        difficulty: Difficulty,
        rng: SimpleRng,
    ) -> Self {
        log::info!(
            "sudoku round: {} with {} clues",
            difficulty.as_str(),
            puzzle.clues()
        );
        Self {
            puzzle,
            solution,
            cells: puzzle,
            difficulty,
            mistakes: 0,
            hints: 0,
            cursor: Pos::new(0, 0),
            status: Status::Playing,
            rng,
        }
    }

    pub fn puzzle(&self) -> &SudokuBoard {
        &self.puzzle
    }

    pub fn cells(&self) -> &SudokuBoard {
        &self.cells
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    pub fn hints(&self) -> u32 {
        self.hints
    }

    pub fn cursor(&self) -> Pos {
        self.cursor
    }

    pub fn set_cursor(&mut self, pos: Pos) -> bool {
        if index(pos).is_none() {
            return false;
        }
        self.cursor = pos;
        true
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_given(&self, pos: Pos) -> bool {
        self.puzzle.get(pos).is_some_and(|v| v != 0)
    }

    pub fn is_complete(&self) -> bool {
        self.cells == self.solution
    }

    pub fn conflicts(&self) -> Vec<Pos> {
        self.cells.conflicts()
    }

    fn check_editable(&self, pos: Pos) -> Result<usize, EntryError> {
        if self.status.is_over() {
            return Err(EntryError::GameOver);
        }
        let i = index(pos).ok_or(EntryError::OutOfBounds)?;
        if self.puzzle.cells[i] != 0 {
            return Err(EntryError::Given);
        }
        Ok(i)
    }

    /// Write a digit; returns whether it matches the solution
    ///
    /// Wrong digits stay on the board and count as a mistake.
    pub fn enter(&mut self, pos: Pos, digit: u8) -> Result<bool, EntryError> {
        let i = self.check_editable(pos)?;
        if !(1..=9).contains(&digit) {
            return Err(EntryError::InvalidDigit);
        }
        self.cells.cells[i] = digit;
        let correct = self.solution.cells[i] == digit;
        if !correct {
            self.mistakes += 1;
            log::debug!("sudoku mistake {} at {:?}", self.mistakes, pos);
        }
        self.update_status();
        Ok(correct)
    }

    pub fn erase(&mut self, pos: Pos) -> Result<(), EntryError> {
        let i = self.check_editable(pos)?;
        self.cells.cells[i] = 0;
        Ok(())
    }

    /// Fill one cell with its solution digit
    ///
    /// Prefers the cursor cell; otherwise the first empty or wrong cell in
    /// row-major order.
    pub fn hint(&mut self) -> Option<Pos> {
        if self.status.is_over() {
            return None;
        }
        let wrong = |i: usize| self.cells.cells[i] != self.solution.cells[i];
        let i = index(self.cursor)
            .filter(|&i| wrong(i))
            .or_else(|| (0..CELLS).find(|&i| wrong(i)))?;
        self.cells.cells[i] = self.solution.cells[i];
        self.hints += 1;
        self.update_status();
        Some(pos_of(i))
    }

    fn update_status(&mut self) {
        if self.is_complete() {
            self.status = Status::Won;
            log::info!(
                "sudoku solved with {} mistakes and {} hints",
                self.mistakes,
                self.hints
            );
        }
    }

    /// New puzzle of the same difficulty
    pub fn restart(&mut self) {
        let (puzzle, solution) = generate(self.difficulty, &mut self.rng);
        let rng = self.rng.clone();
        *self = Self::from_parts(puzzle, solution, self.difficulty, rng);
    }

    pub fn apply_action(&mut self, action: Action) -> bool {
        match action {
            Action::Restart => {
                self.restart();
                true
            }
            Action::Move(dir) => {
                let next = move_cursor(self.cursor, dir, SIZE as u8, SIZE as u8);
                let moved = next != self.cursor;
                self.cursor = next;
                moved
            }
            Action::Digit(0) | Action::Erase => self.erase(self.cursor).is_ok(),
            Action::Digit(d) => self.enter(self.cursor, d).is_ok(),
            Action::Hint => self.hint().is_some(),
            _ => false,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&SudokuSave {
            difficulty: self.difficulty,
            puzzle: self.puzzle.to_line(),
            solution: self.solution.to_line(),
            cells: self.cells.to_line(),
            mistakes: self.mistakes,
            hints: self.hints,
            cursor: self.cursor,
            rng: self.rng.seed(),
        })
    }

    /// Restore a saved game, checking that entries agree with the givens
    pub fn from_json(json: &str) -> Result<Self> {
        let save: SudokuSave = serde_json::from_str(json).context("invalid sudoku save")?;
        let puzzle = SudokuBoard::parse(&save.puzzle).context("malformed puzzle in save")?;
        let solution = SudokuBoard::parse(&save.solution).context("malformed solution in save")?;
        let cells = SudokuBoard::parse(&save.cells).context("malformed cells in save")?;

        if !solution.is_full() || !solution.conflicts().is_empty() {
            bail!("saved solution is not a valid grid");
        }
        for i in 0..CELLS {
            let given = puzzle.cells[i];
            if given != 0 && (cells.cells[i] != given || solution.cells[i] != given) {
                bail!("save disagrees with given at {:?}", pos_of(i));
            }
        }

        let mut game = Self::from_parts(puzzle, solution, save.difficulty, SimpleRng::new(save.rng));
        game.cells = cells;
        game.mistakes = save.mistakes;
        game.hints = save.hints;
        game.set_cursor(save.cursor);
        game.update_status();
        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EASY: &str =
        "1..7...56..785.1.4..5..3.97.713....5.48.75...35.1.9.......3..8953....6.1.14962573";

    #[test]
    fn parse_and_format() {
        let board = SudokuBoard::parse(EASY).unwrap();
        assert_eq!(board.clues(), 40);
        assert_eq!(board.to_line(), EASY);
        assert_eq!(board.get(Pos::new(0, 0)), Some(1));
        assert_eq!(board.get(Pos::new(9, 0)), None);
        assert!(SudokuBoard::parse("123").is_none());
        assert!(SudokuBoard::parse(&EASY.replace('1', "x")).is_none());
    }

    #[test]
    fn solver_keeps_givens_and_is_unique() {
        let board = SudokuBoard::parse(EASY).unwrap();
        let solved = board.solve().unwrap();
        assert!(solved.is_full());
        assert!(solved.conflicts().is_empty());
        for i in 0..CELLS {
            if board.cells[i] != 0 {
                assert_eq!(board.cells[i], solved.cells[i]);
            }
        }
        assert_eq!(board.count_solutions(2), 1);
    }

    #[test]
    fn empty_board_has_many_solutions() {
        assert_eq!(SudokuBoard::default().count_solutions(3), 3);
    }

    #[test]
    fn conflicting_givens_have_no_solution() {
        let mut board = SudokuBoard::default();
        board.set(Pos::new(0, 0), 5);
        board.set(Pos::new(8, 0), 5);
        assert_eq!(board.conflicts(), vec![Pos::new(0, 0), Pos::new(8, 0)]);
        assert!(board.solve().is_none());
        assert_eq!(board.count_solutions(2), 0);
    }

    #[test]
    fn generated_puzzle_is_unique() {
        let mut rng = SimpleRng::new(11);
        let (puzzle, solution) = generate(Difficulty::Medium, &mut rng);
        assert!(puzzle.clues() >= Difficulty::Medium.clues());
        assert_eq!(puzzle.count_solutions(2), 1);
        assert_eq!(puzzle.solve(), Some(solution));
    }

    #[test]
    fn entries_track_mistakes_and_completion() {
        let puzzle = SudokuBoard::parse(EASY).unwrap();
        let mut game = SudokuGame::from_puzzle(puzzle, Difficulty::Easy, 1).unwrap();
        let solution = puzzle.solve().unwrap();

        assert_eq!(game.enter(Pos::new(0, 0), 2), Err(EntryError::Given));
        assert_eq!(game.enter(Pos::new(1, 0), 0), Err(EntryError::InvalidDigit));

        let right = solution.get(Pos::new(1, 0)).unwrap();
        let wrong = right % 9 + 1;
        assert_eq!(game.enter(Pos::new(1, 0), wrong), Ok(false));
        assert_eq!(game.mistakes(), 1);
        assert_eq!(game.enter(Pos::new(1, 0), right), Ok(true));

        for i in 0..CELLS {
            let p = pos_of(i);
            if !game.is_given(p) {
                game.enter(p, solution.cells[i]).unwrap();
            }
        }
        assert_eq!(game.status(), Status::Won);
        assert_eq!(game.enter(Pos::new(1, 0), right), Err(EntryError::GameOver));
    }

    #[test]
    fn hint_prefers_the_cursor_cell() {
        let puzzle = SudokuBoard::parse(EASY).unwrap();
        let mut game = SudokuGame::from_puzzle(puzzle, Difficulty::Easy, 1).unwrap();
        game.set_cursor(Pos::new(2, 0));
        assert_eq!(game.hint(), Some(Pos::new(2, 0)));
        game.set_cursor(Pos::new(0, 0));
        assert_eq!(game.hint(), Some(Pos::new(1, 0)));
        assert_eq!(game.hints(), 2);
    }

    #[test]
    fn save_and_restore() {
        let puzzle = SudokuBoard::parse(EASY).unwrap();
        let mut game = SudokuGame::from_puzzle(puzzle, Difficulty::Easy, 1).unwrap();
        game.enter(Pos::new(1, 0), 9).unwrap();
        game.apply_action(Action::Move(crate::types::Direction::Down));

        let json = game.to_json().unwrap();
        let restored = SudokuGame::from_json(&json).unwrap();
        assert_eq!(restored.cells(), game.cells());
        assert_eq!(restored.mistakes(), game.mistakes());
        assert_eq!(restored.cursor(), Pos::new(0, 1));
    }

    #[test]
    fn tampered_save_is_rejected() {
        let puzzle = SudokuBoard::parse(EASY).unwrap();
        let game = SudokuGame::from_puzzle(puzzle, Difficulty::Easy, 1).unwrap();
        let json = game.to_json().unwrap();
        let tampered = json.replacen("\"cells\":\"1", "\"cells\":\"2", 1);
        assert!(SudokuGame::from_json(&tampered).is_err());
        assert!(SudokuGame::from_json("{}").is_err());
    }
}
