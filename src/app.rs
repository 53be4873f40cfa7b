//! App state machine: menu, active game, timers and pointer input.
//!
//! Free of terminal I/O: the binary feeds it crossterm events and elapsed
//! time and asks it to render into a framebuffer, so the whole flow can be
//! driven from tests.

use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::event::{KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};

use crate::config::Config;
use crate::core::assets::{bundled_sudoku, bundled_words, load_words, SudokuBank};
use crate::core::memory::{FlipOutcome, COLUMNS, DEFAULT_PAIRS};
use crate::core::simon::{Pad, PressOutcome};
use crate::core::sudoku::Difficulty;
use crate::core::{
    futoshiki, lights_out, BubbleGame, FutoshikiGame, LightsOut, Match3Game, MemoryGame,
    SimonGame, SudokuGame, TreasureGame, WordList, WordleGame,
};
use crate::engine::{best_aim, best_swap};
use crate::input::{aim_angle, map_key, map_menu_key, should_quit, PointerMap, RepeatHandler};
use crate::term::views::simon::pad_at;
use crate::term::{
    BubbleView, FrameBuffer, FutoshikiView, LightsOutView, Match3View, MemoryView, MenuView,
    SimonView, SudokuView, TreasureView, Viewport, WordleView,
};
use crate::types::{Action, Direction, GameKind, Pos, Status};

/// Time a pad stays lit (playback and presses)
pub const SIMON_FLASH_MS: u32 = 450;
/// Dark pause before each pad during playback
pub const SIMON_GAP_MS: u32 = 250;
/// Time a mismatched memory pair stays face up
pub const MEMORY_REVEAL_MS: u32 = 900;

/// Data every round draws from
#[derive(Debug, Clone)]
pub struct Assets {
    pub words: Arc<WordList>,
    pub sudoku: SudokuBank,
}

impl Assets {
    pub fn load(config: &Config) -> Result<Self> {
        let words = match &config.words {
            Some(path) => load_words(path)?,
            None => bundled_words()?,
        };
        Ok(Self {
            words: Arc::new(words),
            sudoku: bundled_sudoku()?,
        })
    }
}

#[derive(Debug, Clone)]
pub enum ActiveGame {
    Match3(Match3Game),
    Bubble(BubbleGame),
    Sudoku(SudokuGame),
    Futoshiki(FutoshikiGame),
    LightsOut(LightsOut),
    Wordle(WordleGame),
    Memory(MemoryGame),
    Simon(SimonGame),
    Treasure(TreasureGame),
}

impl ActiveGame {
    pub fn start(kind: GameKind, seed: u32, assets: &Assets, difficulty: Difficulty) -> Result<Self> {
        log::info!("starting {} with seed {}", kind.title(), seed);
        let game = match kind {
            GameKind::Match3 => ActiveGame::Match3(Match3Game::new(seed)),
            GameKind::Bubble => ActiveGame::Bubble(BubbleGame::new(seed)),
            GameKind::Sudoku => ActiveGame::Sudoku(
                SudokuGame::from_bank(&assets.sudoku, difficulty, seed).unwrap_or_else(|| {
                    log::warn!("no bank puzzle for {}, generating one", difficulty.as_str());
                    SudokuGame::new(difficulty, seed)
                }),
            ),
            GameKind::Futoshiki => {
                ActiveGame::Futoshiki(FutoshikiGame::new(futoshiki::DEFAULT_SIZE, seed))
            }
            GameKind::LightsOut => {
                ActiveGame::LightsOut(LightsOut::new(lights_out::DEFAULT_SIZE, seed))
            }
            GameKind::Wordle => ActiveGame::Wordle(
                WordleGame::new(Arc::clone(&assets.words), seed)
                    .context("word list has no usable words")?,
            ),
            GameKind::Memory => ActiveGame::Memory(MemoryGame::new(DEFAULT_PAIRS, seed)),
            GameKind::Simon => ActiveGame::Simon(SimonGame::new(seed)),
            GameKind::Treasure => ActiveGame::Treasure(TreasureGame::new(seed)),
        };
        Ok(game)
    }

    pub fn kind(&self) -> GameKind {
        match self {
            ActiveGame::Match3(_) => GameKind::Match3,
            ActiveGame::Bubble(_) => GameKind::Bubble,
            ActiveGame::Sudoku(_) => GameKind::Sudoku,
            ActiveGame::Futoshiki(_) => GameKind::Futoshiki,
            ActiveGame::LightsOut(_) => GameKind::LightsOut,
            ActiveGame::Wordle(_) => GameKind::Wordle,
            ActiveGame::Memory(_) => GameKind::Memory,
            ActiveGame::Simon(_) => GameKind::Simon,
            ActiveGame::Treasure(_) => GameKind::Treasure,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            ActiveGame::Match3(g) => g.status(),
            ActiveGame::Bubble(g) => g.status(),
            ActiveGame::Sudoku(g) => g.status(),
            ActiveGame::Futoshiki(g) => g.status(),
            ActiveGame::LightsOut(g) => g.status(),
            ActiveGame::Wordle(g) => g.status(),
            ActiveGame::Memory(g) => g.status(),
            ActiveGame::Simon(g) => g.status(),
            ActiveGame::Treasure(g) => g.status(),
        }
    }

    /// Apply an action; hints for the two engines come from the planners
    pub fn apply(&mut self, action: Action) -> bool {
        match self {
            ActiveGame::Match3(g) if action == Action::Hint => match best_swap(g) {
                Ok(hint) => {
                    g.set_hint(Some((hint.from, hint.to)));
                    true
                }
                Err(e) => {
                    log::debug!("no match3 hint: {e}");
                    false
                }
            },
            ActiveGame::Bubble(g) if action == Action::Hint => match best_aim(g) {
                Ok(plan) => {
                    g.set_aim(plan.angle);
                    true
                }
                Err(e) => {
                    log::debug!("no bubble hint: {e}");
                    false
                }
            },
            ActiveGame::Match3(g) => g.apply_action(action),
            ActiveGame::Bubble(g) => g.apply_action(action),
            ActiveGame::Sudoku(g) => g.apply_action(action),
            ActiveGame::Futoshiki(g) => g.apply_action(action),
            ActiveGame::LightsOut(g) => g.apply_action(action),
            ActiveGame::Wordle(g) => g.apply_action(action),
            ActiveGame::Memory(g) => g.apply_action(action),
            ActiveGame::Simon(g) => g.apply_action(action),
            ActiveGame::Treasure(g) => g.apply_action(action),
        }
    }

    /// Click on a board cell
    pub fn click(&mut self, pos: Pos) -> bool {
        match self {
            ActiveGame::Match3(g) => g.select(pos),
            ActiveGame::Sudoku(g) => g.set_cursor(pos),
            ActiveGame::Futoshiki(g) => g.set_cursor(pos),
            ActiveGame::LightsOut(g) => g.set_cursor(pos) && g.press(pos),
            ActiveGame::Treasure(g) => g.set_cursor(pos) && g.dig(pos).is_some(),
            ActiveGame::Memory(g) => {
                let index = pos.y as usize * COLUMNS + pos.x as usize;
                g.set_cursor(index) && g.flip(index) != FlipOutcome::Ignored
            }
            ActiveGame::Simon(g) => {
                pad_at(pos).is_some_and(|pad| g.press(pad) != PressOutcome::Ignored)
            }
            // Bubble clicks aim instead; Wordle has no board input.
            ActiveGame::Bubble(_) | ActiveGame::Wordle(_) => false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Screen {
    Menu { selected: usize },
    Playing(ActiveGame),
}

/// Countdowns driven by `tick`
#[derive(Debug, Clone, Copy, Default)]
struct Timers {
    /// Pad lit and the time it stays lit
    flash: Option<(Pad, u32)>,
    simon_gap_ms: u32,
    memory_reveal_ms: u32,
}

pub struct App {
    screen: Screen,
    assets: Assets,
    seed: u32,
    rounds: u32,
    difficulty: Difficulty,
    repeat: RepeatHandler,
    timers: Timers,
    map: Option<PointerMap>,
    viewport: Viewport,
    quit: bool,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let assets = Assets::load(config)?;
        Ok(Self::with_assets(config, assets))
    }

    pub fn with_assets(config: &Config, assets: Assets) -> Self {
        let mut app = Self {
            screen: Screen::Menu { selected: 0 },
            assets,
            seed: config.seed,
            rounds: 0,
            difficulty: config.difficulty,
            repeat: RepeatHandler::new(),
            timers: Timers::default(),
            map: None,
            viewport: Viewport::new(80, 24),
            quit: false,
        };
        if let Some(kind) = config.game {
            app.start(kind);
        }
        app
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn game(&self) -> Option<&ActiveGame> {
        match &self.screen {
            Screen::Playing(game) => Some(game),
            Screen::Menu { .. } => None,
        }
    }

    pub fn kind(&self) -> Option<GameKind> {
        self.game().map(ActiveGame::kind)
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Pad currently lit on the Simon board
    pub fn flash(&self) -> Option<Pad> {
        self.timers.flash.map(|(pad, _)| pad)
    }

    fn next_seed(&mut self) -> u32 {
        let seed = self.seed.wrapping_add(self.rounds.wrapping_mul(0x9E37_79B9));
        self.rounds = self.rounds.wrapping_add(1);
        seed
    }

    pub fn start(&mut self, kind: GameKind) -> bool {
        let seed = self.next_seed();
        match ActiveGame::start(kind, seed, &self.assets, self.difficulty) {
            Ok(game) => {
                self.screen = Screen::Playing(game);
                self.repeat.reset();
                self.timers = Timers::default();
                true
            }
            Err(e) => {
                log::error!("failed to start {}: {e:#}", kind.title());
                false
            }
        }
    }

    fn to_menu(&mut self) {
        let selected = self
            .kind()
            .and_then(|k| GameKind::ALL.iter().position(|&g| g == k))
            .unwrap_or(0);
        log::info!("back to menu");
        self.screen = Screen::Menu { selected };
        self.repeat.reset();
        self.timers = Timers::default();
    }

    fn menu_action(&mut self, action: Action) {
        let Screen::Menu { selected } = &mut self.screen else {
            return;
        };
        let len = GameKind::ALL.len();
        let choice = match action {
            Action::Move(Direction::Up) => {
                *selected = (*selected + len - 1) % len;
                None
            }
            Action::Move(Direction::Down) => {
                *selected = (*selected + 1) % len;
                None
            }
            Action::Digit(d) => (d as usize).checked_sub(1).filter(|&i| i < len),
            Action::Select => Some(*selected),
            _ => None,
        };
        if let Some(i) = choice {
            self.start(GameKind::ALL[i]);
        }
    }

    /// Apply a game action, lighting Simon pads that were pressed
    pub fn apply(&mut self, action: Action) -> bool {
        let Screen::Playing(game) = &mut self.screen else {
            return false;
        };
        let simon_pad = match (&*game, action) {
            (ActiveGame::Simon(_), Action::Digit(d)) => Pad::from_digit(d),
            (ActiveGame::Simon(_), Action::Move(dir)) => Some(Pad::from_direction(dir)),
            _ => None,
        };
        let changed = game.apply(action);
        if action == Action::Restart {
            self.timers = Timers::default();
        } else if let (true, Some(pad)) = (changed, simon_pad) {
            self.timers.flash = Some((pad, SIMON_FLASH_MS));
        }
        changed
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Terminal auto-repeat is ignored; DAS/ARR handles repeats internally.
        if key.kind == KeyEventKind::Repeat {
            return;
        }
        let kind = self.kind();
        if key.kind == KeyEventKind::Press && should_quit(kind, key) {
            self.quit = true;
            return;
        }
        let Some(kind) = kind else {
            if let Some(action) = map_menu_key(key) {
                self.menu_action(action);
            }
            return;
        };

        if key.kind == KeyEventKind::Release {
            let press = KeyEvent {
                kind: KeyEventKind::Press,
                ..key
            };
            if let Some(action) = map_key(kind, press) {
                self.repeat.release(action);
            }
            return;
        }

        let Some(action) = map_key(kind, key) else {
            return;
        };
        if action == Action::Menu {
            self.to_menu();
            return;
        }
        // Simon pads are discrete presses, never auto-repeated.
        if kind == GameKind::Simon {
            self.apply(action);
        } else if let Some(action) = self.repeat.press(action) {
            self.apply(action);
        }
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let Some(map) = self.map else {
            return;
        };
        let viewport = self.viewport;
        match &mut self.screen {
            Screen::Menu { selected } => {
                if let Some(pos) = map.click(event) {
                    *selected = pos.y as usize;
                    self.menu_action(Action::Select);
                }
            }
            Screen::Playing(ActiveGame::Bubble(g)) => {
                let from = BubbleView::new().launcher_cell(g, viewport);
                g.set_aim(aim_angle(from, (event.column, event.row)));
                g.apply_action(Action::Fire);
            }
            Screen::Playing(game) => {
                let Some(pos) = map.click(event) else {
                    return;
                };
                let pad = matches!(game, ActiveGame::Simon(_)).then(|| pad_at(pos)).flatten();
                if game.click(pos) {
                    if let Some(pad) = pad {
                        self.timers.flash = Some((pad, SIMON_FLASH_MS));
                    }
                }
            }
        }
    }

    /// Advance key repeat and game timers
    pub fn tick(&mut self, elapsed_ms: u32) {
        for action in self.repeat.update(elapsed_ms) {
            self.apply(action);
        }

        let Screen::Playing(game) = &mut self.screen else {
            return;
        };
        let timers = &mut self.timers;
        match game {
            ActiveGame::Simon(g) => {
                if let Some((pad, left)) = timers.flash {
                    if left <= elapsed_ms {
                        timers.flash = None;
                        timers.simon_gap_ms = 0;
                    } else {
                        timers.flash = Some((pad, left - elapsed_ms));
                    }
                    return;
                }
                if !matches!(g.phase(), crate::core::Phase::Showing { .. }) {
                    return;
                }
                timers.simon_gap_ms += elapsed_ms;
                if timers.simon_gap_ms >= SIMON_GAP_MS {
                    timers.simon_gap_ms = 0;
                    if let Some(pad) = g.advance_playback() {
                        timers.flash = Some((pad, SIMON_FLASH_MS));
                    }
                }
            }
            ActiveGame::Memory(g) if g.has_pending_mismatch() => {
                timers.memory_reveal_ms += elapsed_ms;
                if timers.memory_reveal_ms >= MEMORY_REVEAL_MS {
                    timers.memory_reveal_ms = 0;
                    g.settle();
                }
            }
            _ => {}
        }
    }

    /// Render the current screen and remember its pointer layout
    pub fn render_into(&mut self, viewport: Viewport, fb: &mut FrameBuffer) {
        self.viewport = viewport;
        let flash = self.flash();
        let map = match &self.screen {
            Screen::Menu { selected } => MenuView.render_into(*selected, viewport, fb),
            Screen::Playing(game) => match game {
                ActiveGame::Match3(g) => Match3View::default().render_into(g, viewport, fb),
                ActiveGame::Bubble(g) => BubbleView::new().render_into(g, viewport, fb),
                ActiveGame::Sudoku(g) => SudokuView.render_into(g, viewport, fb),
                ActiveGame::Futoshiki(g) => FutoshikiView.render_into(g, viewport, fb),
                ActiveGame::LightsOut(g) => LightsOutView.render_into(g, viewport, fb),
                ActiveGame::Wordle(g) => WordleView.render_into(g, viewport, fb),
                ActiveGame::Memory(g) => MemoryView.render_into(g, viewport, fb),
                ActiveGame::Simon(g) => SimonView.render_into(g, flash, viewport, fb),
                ActiveGame::Treasure(g) => TreasureView.render_into(g, viewport, fb),
            },
        };
        self.map = Some(map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn app() -> App {
        let config = Config {
            seed: 7,
            ..Config::default()
        };
        App::new(&config).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::from(code));
    }

    #[test]
    fn menu_digit_starts_a_game_and_esc_returns() {
        let mut app = app();
        assert!(app.game().is_none());
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.kind(), Some(GameKind::Bubble));

        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.screen(), Screen::Menu { selected: 1 }));
    }

    #[test]
    fn menu_wraps_and_selects() {
        let mut app = app();
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.kind(), Some(GameKind::Treasure));
    }

    #[test]
    fn q_quits_except_in_wordle() {
        let mut app = app();
        press(&mut app, KeyCode::Char('6'));
        assert_eq!(app.kind(), Some(GameKind::Wordle));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit());
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }

    #[test]
    fn simon_plays_back_then_flashes_presses() {
        let mut app = app();
        press(&mut app, KeyCode::Char('8'));
        let Some(ActiveGame::Simon(g)) = app.game() else {
            panic!("simon expected");
        };
        let first = g.sequence()[0];

        app.tick(SIMON_GAP_MS);
        assert_eq!(app.flash(), Some(first));
        app.tick(SIMON_FLASH_MS);
        assert_eq!(app.flash(), None);
        // Sequence exhausted: the next gap switches to input.
        app.tick(SIMON_GAP_MS);
        let Some(ActiveGame::Simon(g)) = app.game() else {
            panic!("simon expected");
        };
        assert_eq!(g.phase(), crate::core::Phase::Awaiting { step: 0 });

        let digit = Pad::ALL.iter().position(|&p| p == first).unwrap() as u8 + 1;
        assert!(app.apply(Action::Digit(digit)));
        assert_eq!(app.flash(), Some(first));
    }

    #[test]
    fn memory_mismatch_settles_after_reveal_time() {
        let mut app = app();
        press(&mut app, KeyCode::Char('7'));
        let Some(ActiveGame::Memory(g)) = app.game() else {
            panic!("memory expected");
        };
        let first = g.cards()[0].face;
        let other = g.cards().iter().position(|c| c.face != first).unwrap();

        let Screen::Playing(game) = &mut app.screen else {
            unreachable!()
        };
        let ActiveGame::Memory(g) = game else {
            unreachable!()
        };
        g.flip(0);
        g.flip(other);
        assert!(g.has_pending_mismatch());

        app.tick(MEMORY_REVEAL_MS - 1);
        app.tick(1);
        let Some(ActiveGame::Memory(g)) = app.game() else {
            panic!("memory expected");
        };
        assert!(!g.has_pending_mismatch());
    }

    #[test]
    fn hints_use_the_planners() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        assert!(app.apply(Action::Hint));
        let Some(ActiveGame::Match3(g)) = app.game() else {
            panic!("match3 expected");
        };
        assert!(g.hint().is_some());
    }

    #[test]
    fn clicks_follow_the_rendered_layout() {
        let mut app = app();
        press(&mut app, KeyCode::Char('9'));
        let mut fb = FrameBuffer::new(80, 24);
        app.render_into(Viewport::new(80, 24), &mut fb);
        let map = app.map.unwrap();
        let (x, y) = map.to_screen(Pos::new(2, 3)).unwrap();
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: x,
            row: y,
            modifiers: KeyModifiers::NONE,
        });
        let Some(ActiveGame::Treasure(g)) = app.game() else {
            panic!("treasure expected");
        };
        assert_eq!(g.cursor(), Pos::new(2, 3));
        assert!(g.cell(Pos::new(2, 3)).is_some());
    }

    #[test]
    fn configured_game_skips_the_menu() {
        let config = Config {
            seed: 3,
            game: Some(GameKind::Sudoku),
            ..Config::default()
        };
        let app = App::new(&config).unwrap();
        assert_eq!(app.kind(), Some(GameKind::Sudoku));
    }
}
