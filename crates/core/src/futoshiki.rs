//! Futoshiki - Latin square with inequality signs between neighbours

use serde::{Deserialize, Serialize};

use crate::entry::{move_cursor, EntryError};
use crate::rng::SimpleRng;
use crate::types::{Action, Direction, Pos, Status};

pub const MIN_SIZE: u8 = 4;
pub const MAX_SIZE: u8 = 7;
pub const DEFAULT_SIZE: u8 = 5;

/// Chance (out of 12) that a neighbouring pair gets a sign
const SIGN_CHANCE: u32 = 4;

/// `a < b` or `a > b` between two orthogonally adjacent cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Inequality {
    pub a: Pos,
    pub b: Pos,
    /// True when the value at `a` must be smaller than the value at `b`
    pub less: bool,
}

impl Inequality {
    /// Whether two values satisfy the sign; empty cells always do
    pub fn holds(&self, va: u8, vb: u8) -> bool {
        if va == 0 || vb == 0 {
            return true;
        }
        if self.less {
            va < vb
        } else {
            va > vb
        }
    }

    /// Sign as drawn between `a` and `b`, reading left-to-right or top-to-bottom
    pub fn symbol(&self) -> char {
        let horizontal = self.a.y == self.b.y;
        match (horizontal, self.less) {
            (true, true) => '<',
            (true, false) => '>',
            (false, true) => '^',
            (false, false) => 'v',
        }
    }
}

/// Givens plus signs, values stored row-major (0 = empty)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FutoshikiPuzzle {
    pub size: u8,
    pub givens: Vec<u8>,
    pub signs: Vec<Inequality>,
}

impl FutoshikiPuzzle {
    fn index(&self, pos: Pos) -> Option<usize> {
        let n = self.size as i8;
        if pos.x < 0 || pos.y < 0 || pos.x >= n || pos.y >= n {
            return None;
        }
        Some(pos.y as usize * self.size as usize + pos.x as usize)
    }

    pub fn count_solutions(&self, limit: usize) -> usize {
        let mut cells = self.givens.clone();
        let mut found = 0;
        let mut first = None;
        if violations_in(self, &cells).is_empty() {
            search(self, &mut cells, limit, &mut found, &mut first);
        }
        found
    }

    pub fn solve(&self) -> Option<Vec<u8>> {
        let mut cells = self.givens.clone();
        let mut found = 0;
        let mut first = None;
        if violations_in(self, &cells).is_empty() {
            search(self, &mut cells, 1, &mut found, &mut first);
        }
        first
    }

    /// Sign between two cells, in either order
    pub fn sign_between(&self, a: Pos, b: Pos) -> Option<Inequality> {
        self.signs
            .iter()
            .copied()
            .find(|s| (s.a == a && s.b == b) || (s.a == b && s.b == a))
    }
}

fn allowed(puzzle: &FutoshikiPuzzle, cells: &[u8], i: usize, v: u8) -> bool {
    let n = puzzle.size as usize;
    let (r, c) = (i / n, i % n);
    for k in 0..n {
        if (k != c && cells[r * n + k] == v) || (k != r && cells[k * n + c] == v) {
            return false;
        }
    }
    let here = Pos::new(c as i8, r as i8);
    puzzle.signs.iter().all(|s| {
        if s.a == here {
            let other = cells[s.b.y as usize * n + s.b.x as usize];
            s.holds(v, other)
        } else if s.b == here {
            let other = cells[s.a.y as usize * n + s.a.x as usize];
            s.holds(other, v)
        } else {
            true
        }
    })
}

fn search(
    puzzle: &FutoshikiPuzzle,
    cells: &mut Vec<u8>,
    limit: usize,
    found: &mut usize,
    first: &mut Option<Vec<u8>>,
) {
    let n = puzzle.size;
    let mut best: Option<(usize, u8)> = None;
    for i in 0..cells.len() {
        if cells[i] != 0 {
            continue;
        }
        let count = (1..=n).filter(|&v| allowed(puzzle, cells, i, v)).count() as u8;
        if count == 0 {
            return;
        }
        if best.map_or(true, |(_, c)| count < c) {
            best = Some((i, count));
        }
    }

    let Some((i, _)) = best else {
        *found += 1;
        if first.is_none() {
            *first = Some(cells.clone());
        }
        return;
    };

    for v in 1..=n {
        if !allowed(puzzle, cells, i, v) {
            continue;
        }
        cells[i] = v;
        search(puzzle, cells, limit, found, first);
        cells[i] = 0;
        if *found >= limit {
            return;
        }
    }
}

/// Cells involved in a duplicate or a broken sign
fn violations_in(puzzle: &FutoshikiPuzzle, cells: &[u8]) -> Vec<Pos> {
    let n = puzzle.size as usize;
    let mut flagged = vec![false; n * n];
    for i in 0..n * n {
        if cells[i] == 0 {
            continue;
        }
        let (r, c) = (i / n, i % n);
        for j in (i + 1)..n * n {
            let (r2, c2) = (j / n, j % n);
            if cells[j] == cells[i] && (r == r2 || c == c2) {
                flagged[i] = true;
                flagged[j] = true;
            }
        }
    }
    for s in &puzzle.signs {
        let ia = s.a.y as usize * n + s.a.x as usize;
        let ib = s.b.y as usize * n + s.b.x as usize;
        if !s.holds(cells[ia], cells[ib]) {
            flagged[ia] = true;
            flagged[ib] = true;
        }
    }
    (0..n * n)
        .filter(|&i| flagged[i])
        .map(|i| Pos::new((i % n) as i8, (i / n) as i8))
        .collect()
}

/// Random Latin square: cyclic base with shuffled rows, columns and symbols
fn latin_square(n: usize, rng: &mut SimpleRng) -> Vec<u8> {
    let mut rows: Vec<usize> = (0..n).collect();
    let mut cols: Vec<usize> = (0..n).collect();
    let mut symbols: Vec<u8> = (1..=n as u8).collect();
    rng.shuffle(&mut rows);
    rng.shuffle(&mut cols);
    rng.shuffle(&mut symbols);

    let mut cells = vec![0; n * n];
    for r in 0..n {
        for c in 0..n {
            cells[r * n + c] = symbols[(rows[r] + cols[c]) % n];
        }
    }
    cells
}

/// Random puzzle with a unique solution; returns `(puzzle, solution)`
pub fn generate(size: u8, rng: &mut SimpleRng) -> (FutoshikiPuzzle, Vec<u8>) {
    let size = size.clamp(MIN_SIZE, MAX_SIZE);
    let n = size as usize;
    let solution = latin_square(n, rng);

    let mut signs = Vec::new();
    for y in 0..n {
        for x in 0..n {
            let a = Pos::new(x as i8, y as i8);
            for dir in [Direction::Right, Direction::Down] {
                let b = a.step(dir);
                if b.x as usize >= n || b.y as usize >= n || !rng.chance(SIGN_CHANCE, 12) {
                    continue;
                }
                let va = solution[y * n + x];
                let vb = solution[b.y as usize * n + b.x as usize];
                signs.push(Inequality { a, b, less: va < vb });
            }
        }
    }

    let mut puzzle = FutoshikiPuzzle {
        size,
        givens: solution.clone(),
        signs,
    };
    let mut order: Vec<usize> = (0..n * n).collect();
    rng.shuffle(&mut order);
    for i in order {
        let v = puzzle.givens[i];
        puzzle.givens[i] = 0;
        if puzzle.count_solutions(2) != 1 {
            puzzle.givens[i] = v;
        }
    }

    log::debug!(
        "futoshiki {}x{}: {} givens, {} signs",
        n,
        n,
        puzzle.givens.iter().filter(|&&v| v != 0).count(),
        puzzle.signs.len()
    );
    (puzzle, solution)
}

#[derive(Debug, Clone)]
pub struct FutoshikiGame {
    puzzle: FutoshikiPuzzle,
    solution: Vec<u8>,
    cells: Vec<u8>,
    cursor: Pos,
    status: Status,
    rng: SimpleRng,
}

impl FutoshikiGame {
    pub fn new(size: u8, seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let (puzzle, solution) = generate(size, &mut rng);
        Self::from_parts(puzzle, solution, rng)
    }

    /// Game for a prepared puzzle; `None` if it has no solution
    pub fn from_puzzle(puzzle: FutoshikiPuzzle, seed: u32) -> Option<Self> {
        let size = puzzle.size as usize;
        if !(MIN_SIZE..=MAX_SIZE).contains(&puzzle.size) || puzzle.givens.len() != size * size {
            return None;
        }
        if puzzle.givens.iter().any(|&v| v > puzzle.size) {
            return None;
        }
        let in_bounds = |p: Pos| puzzle.index(p).is_some();
        if !puzzle
            .signs
            .iter()
            .all(|s| in_bounds(s.a) && in_bounds(s.b) && s.a.is_adjacent(s.b))
        {
            return None;
        }
        let solution = puzzle.solve()?;
        Some(Self::from_parts(puzzle, solution, SimpleRng::new(seed)))
    }

    fn from_parts(puzzle: FutoshikiPuzzle, solution: Vec<u8>, rng: SimpleRng) -> Self {
        log::info!("futoshiki round: {0}x{0}", puzzle.size);
        Self {
            cells: puzzle.givens.clone(),
            puzzle,
            solution,
            cursor: Pos::new(0, 0),
            status: Status::Playing,
            rng,
        }
    }

    pub fn size(&self) -> u8 {
        self.puzzle.size
    }

    pub fn puzzle(&self) -> &FutoshikiPuzzle {
        &self.puzzle
    }

    /// Current value at `pos` (0 = empty)
    pub fn get(&self, pos: Pos) -> Option<u8> {
        self.puzzle.index(pos).map(|i| self.cells[i])
    }

    pub fn is_given(&self, pos: Pos) -> bool {
        self.puzzle.index(pos).is_some_and(|i| self.puzzle.givens[i] != 0)
    }

    pub fn cursor(&self) -> Pos {
        self.cursor
    }

    pub fn set_cursor(&mut self, pos: Pos) -> bool {
        if self.puzzle.index(pos).is_none() {
            return false;
        }
        self.cursor = pos;
        true
    }

    pub fn status(&self) -> Status {
        self.status
    }

    fn editable(&self, pos: Pos) -> Result<usize, EntryError> {
        if self.status.is_over() {
            return Err(EntryError::GameOver);
        }
        let i = self.puzzle.index(pos).ok_or(EntryError::OutOfBounds)?;
        if self.puzzle.givens[i] != 0 {
            return Err(EntryError::Given);
        }
        Ok(i)
    }

    pub fn enter(&mut self, pos: Pos, value: u8) -> Result<(), EntryError> {
        let i = self.editable(pos)?;
        if value == 0 || value > self.puzzle.size {
            return Err(EntryError::InvalidDigit);
        }
        self.cells[i] = value;
        if self.is_solved() {
            self.status = Status::Won;
            log::info!("futoshiki solved");
        }
        Ok(())
    }

    pub fn erase(&mut self, pos: Pos) -> Result<(), EntryError> {
        let i = self.editable(pos)?;
        self.cells[i] = 0;
        Ok(())
    }

    /// Cells in a duplicate or next to a broken sign
    pub fn violations(&self) -> Vec<Pos> {
        violations_in(&self.puzzle, &self.cells)
    }

    /// Every cell filled and no rule broken
    ///
    /// Any valid completion counts, not only the generator's solution.
    pub fn is_solved(&self) -> bool {
        self.cells.iter().all(|&v| v != 0) && self.violations().is_empty()
    }

    pub fn solution(&self) -> &[u8] {
        &self.solution
    }

    pub fn restart(&mut self) {
        let (puzzle, solution) = generate(self.puzzle.size, &mut self.rng);
        let rng = self.rng.clone();
        *self = Self::from_parts(puzzle, solution, rng);
    }

    pub fn apply_action(&mut self, action: Action) -> bool {
        match action {
            Action::Restart => {
                self.restart();
                true
            }
            Action::Move(dir) => {
                let n = self.puzzle.size;
                let next = move_cursor(self.cursor, dir, n, n);
                let moved = next != self.cursor;
                self.cursor = next;
                moved
            }
            Action::Digit(0) | Action::Erase => self.erase(self.cursor).is_ok(),
            Action::Digit(d) => self.enter(self.cursor, d).is_ok(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_puzzle() -> FutoshikiPuzzle {
        // Solution:
        // 1 2 3 4
        // 2 3 4 1
        // 3 4 1 2
        // 4 1 2 3
        FutoshikiPuzzle {
            size: 4,
            givens: vec![
                1, 0, 0, 4, //
                0, 3, 0, 0, //
                0, 0, 1, 0, //
                4, 0, 0, 3,
            ],
            signs: vec![
                Inequality { a: Pos::new(0, 1), b: Pos::new(1, 1), less: true },
                Inequality { a: Pos::new(1, 2), b: Pos::new(1, 3), less: false },
                Inequality { a: Pos::new(2, 0), b: Pos::new(2, 1), less: true },
            ],
        }
    }

    #[test]
    fn latin_square_has_unique_rows_and_columns() {
        let mut rng = SimpleRng::new(4);
        let n = 6;
        let sq = latin_square(n, &mut rng);
        for r in 0..n {
            let mut row: Vec<u8> = sq[r * n..r * n + n].to_vec();
            row.sort_unstable();
            assert_eq!(row, (1..=n as u8).collect::<Vec<_>>());
            let mut col: Vec<u8> = (0..n).map(|k| sq[k * n + r]).collect();
            col.sort_unstable();
            assert_eq!(col, (1..=n as u8).collect::<Vec<_>>());
        }
    }

    #[test]
    fn generated_puzzle_has_unique_solution() {
        let mut rng = SimpleRng::new(21);
        let (puzzle, solution) = generate(5, &mut rng);
        assert_eq!(puzzle.count_solutions(2), 1);
        assert_eq!(puzzle.solve(), Some(solution));
        for s in &puzzle.signs {
            assert!(s.a.is_adjacent(s.b));
        }
    }

    #[test]
    fn signs_restrict_values() {
        let s = Inequality { a: Pos::new(0, 0), b: Pos::new(1, 0), less: true };
        assert!(s.holds(1, 2));
        assert!(!s.holds(3, 2));
        assert!(s.holds(0, 2));
        assert_eq!(s.symbol(), '<');
    }

    #[test]
    fn violations_report_duplicates_and_signs() {
        let mut game = FutoshikiGame::from_puzzle(small_puzzle(), 1).unwrap();
        game.enter(Pos::new(1, 0), 4).unwrap();
        assert!(game.violations().contains(&Pos::new(1, 0)));
        assert!(game.violations().contains(&Pos::new(3, 0)));

        game.erase(Pos::new(1, 0)).unwrap();
        game.enter(Pos::new(0, 1), 4).unwrap();
        let v = game.violations();
        assert!(v.contains(&Pos::new(0, 1)));
        assert!(v.contains(&Pos::new(1, 1)));
    }

    #[test]
    fn filling_the_solution_wins() {
        let mut game = FutoshikiGame::from_puzzle(small_puzzle(), 1).unwrap();
        let solution = game.solution().to_vec();
        assert_eq!(game.enter(Pos::new(0, 0), 2), Err(EntryError::Given));
        assert_eq!(game.enter(Pos::new(1, 0), 5), Err(EntryError::InvalidDigit));
        for (i, &v) in solution.iter().enumerate() {
            let p = Pos::new((i % 4) as i8, (i / 4) as i8);
            if !game.is_given(p) {
                game.enter(p, v).unwrap();
            }
        }
        assert!(game.is_solved());
        assert_eq!(game.status(), Status::Won);
    }

    #[test]
    fn givens_above_the_board_size_are_rejected() {
        let mut puzzle = small_puzzle();
        puzzle.givens[5] = 9;
        assert!(FutoshikiGame::from_puzzle(puzzle, 1).is_none());
    }

    #[test]
    fn cursor_moves_within_board() {
        let mut game = FutoshikiGame::from_puzzle(small_puzzle(), 1).unwrap();
        assert!(!game.apply_action(Action::Move(Direction::Up)));
        assert!(game.apply_action(Action::Move(Direction::Right)));
        assert!(game.apply_action(Action::Digit(2)));
        assert_eq!(game.get(Pos::new(1, 0)), Some(2));
    }
}
