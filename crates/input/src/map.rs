//! Key mapping from terminal events to game actions.
//!
//! Every game shares the cursor keys (arrows, `hjkl`, `wasd`) and the
//! control keys (`r` restart, `p` pause, `?` hint, Esc menu). Wordle is the
//! exception: letters are input there, so only arrows, Enter, Backspace,
//! Esc and Ctrl-R have a meaning.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::types::{Action, Direction, GameKind};

fn direction_of(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Down => Some(Direction::Down),
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'k' | 'w' => Some(Direction::Up),
            'j' | 's' => Some(Direction::Down),
            'h' | 'a' => Some(Direction::Left),
            'l' | 'd' => Some(Direction::Right),
            _ => None,
        },
        _ => None,
    }
}

fn control_action(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Esc => Some(Action::Menu),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Restart),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Action::Pause),
        KeyCode::Char('?') => Some(Action::Hint),
        _ => None,
    }
}

/// Map keyboard input to a game action for the active game.
///
/// Release events are ignored; the repeat handler tracks those.
pub fn map_key(kind: GameKind, key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Restart),
            _ => None,
        };
    }

    match kind {
        GameKind::Wordle => map_wordle(key.code),
        GameKind::Bubble => map_bubble(key.code),
        GameKind::Sudoku | GameKind::Futoshiki => map_number_grid(key.code),
        GameKind::Simon => match key.code {
            KeyCode::Char(c @ '1'..='4') => Some(Action::Digit(c as u8 - b'0')),
            code => map_cursor_game(code),
        },
        GameKind::Match3
        | GameKind::LightsOut
        | GameKind::Memory
        | GameKind::Treasure => map_cursor_game(key.code),
    }
}

fn map_cursor_game(code: KeyCode) -> Option<Action> {
    if let Some(dir) = direction_of(code) {
        return Some(Action::Move(dir));
    }
    match code {
        KeyCode::Char(' ') | KeyCode::Enter => Some(Action::Select),
        KeyCode::Backspace | KeyCode::Char('x') | KeyCode::Char('X') => Some(Action::Cancel),
        code => control_action(code),
    }
}

fn map_bubble(code: KeyCode) -> Option<Action> {
    match direction_of(code) {
        Some(Direction::Left) => return Some(Action::AimLeft),
        Some(Direction::Right) => return Some(Action::AimRight),
        Some(Direction::Up) => return Some(Action::Fire),
        Some(Direction::Down) => return None,
        None => {}
    }
    match code {
        KeyCode::Char(' ') | KeyCode::Enter => Some(Action::Fire),
        code => control_action(code),
    }
}

fn map_number_grid(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char(c @ '0'..='9') => Some(Action::Digit(c as u8 - b'0')),
        KeyCode::Backspace | KeyCode::Delete | KeyCode::Char('x') | KeyCode::Char('X') => {
            Some(Action::Erase)
        }
        code => direction_of(code)
            .map(Action::Move)
            .or_else(|| control_action(code)),
    }
}

fn map_wordle(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char(c) if c.is_ascii_alphabetic() => Some(Action::Letter(c.to_ascii_lowercase())),
        KeyCode::Backspace => Some(Action::Erase),
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Esc => Some(Action::Menu),
        _ => None,
    }
}

/// Map keyboard input on the game menu.
pub fn map_menu_key(key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => Some(Action::Select),
        KeyCode::Char(c @ '1'..='9') => Some(Action::Digit(c as u8 - b'0')),
        code => direction_of(code).map(Action::Move),
    }
}

/// Check if key should quit the program.
///
/// `q` quits everywhere except while a Wordle guess is being typed; Ctrl-C
/// always quits.
pub fn should_quit(kind: Option<GameKind>, key: KeyEvent) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }
    kind != Some(GameKind::Wordle) && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn test_cursor_keys() {
        for kind in [GameKind::Match3, GameKind::Memory, GameKind::Treasure] {
            assert_eq!(map_key(kind, key(KeyCode::Left)), Some(Action::Move(Direction::Left)));
            assert_eq!(
                map_key(kind, key(KeyCode::Char('J'))),
                Some(Action::Move(Direction::Down))
            );
            assert_eq!(
                map_key(kind, key(KeyCode::Char('w'))),
                Some(Action::Move(Direction::Up))
            );
            assert_eq!(map_key(kind, key(KeyCode::Enter)), Some(Action::Select));
        }
    }

    #[test]
    fn test_bubble_keys() {
        assert_eq!(map_key(GameKind::Bubble, key(KeyCode::Left)), Some(Action::AimLeft));
        assert_eq!(map_key(GameKind::Bubble, key(KeyCode::Char('d'))), Some(Action::AimRight));
        assert_eq!(map_key(GameKind::Bubble, key(KeyCode::Char(' '))), Some(Action::Fire));
        assert_eq!(map_key(GameKind::Bubble, key(KeyCode::Up)), Some(Action::Fire));
        assert_eq!(map_key(GameKind::Bubble, key(KeyCode::Down)), None);
    }

    #[test]
    fn test_digit_keys() {
        assert_eq!(map_key(GameKind::Sudoku, key(KeyCode::Char('7'))), Some(Action::Digit(7)));
        assert_eq!(map_key(GameKind::Futoshiki, key(KeyCode::Backspace)), Some(Action::Erase));
        assert_eq!(map_key(GameKind::Simon, key(KeyCode::Char('3'))), Some(Action::Digit(3)));
        assert_eq!(map_key(GameKind::Simon, key(KeyCode::Char('5'))), None);
        assert_eq!(map_key(GameKind::Match3, key(KeyCode::Char('7'))), None);
    }

    #[test]
    fn test_wordle_takes_letters() {
        assert_eq!(
            map_key(GameKind::Wordle, key(KeyCode::Char('R'))),
            Some(Action::Letter('r'))
        );
        assert_eq!(map_key(GameKind::Wordle, key(KeyCode::Enter)), Some(Action::Submit));
        assert_eq!(
            map_key(GameKind::Wordle, KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Some(Action::Restart)
        );
        assert_eq!(map_key(GameKind::Wordle, key(KeyCode::Esc)), Some(Action::Menu));
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(map_key(GameKind::Match3, key(KeyCode::Char('r'))), Some(Action::Restart));
        assert_eq!(map_key(GameKind::Bubble, key(KeyCode::Char('p'))), Some(Action::Pause));
        assert_eq!(map_key(GameKind::LightsOut, key(KeyCode::Char('?'))), Some(Action::Hint));
        assert_eq!(map_key(GameKind::Sudoku, key(KeyCode::Esc)), Some(Action::Menu));
    }

    #[test]
    fn test_menu_keys() {
        assert_eq!(map_menu_key(key(KeyCode::Down)), Some(Action::Move(Direction::Down)));
        assert_eq!(map_menu_key(key(KeyCode::Char('2'))), Some(Action::Digit(2)));
        assert_eq!(map_menu_key(key(KeyCode::Enter)), Some(Action::Select));
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(None, key(KeyCode::Char('q'))));
        assert!(should_quit(Some(GameKind::Match3), key(KeyCode::Char('Q'))));
        assert!(!should_quit(Some(GameKind::Wordle), key(KeyCode::Char('q'))));
        assert!(should_quit(
            Some(GameKind::Wordle),
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
        ));
        assert!(!should_quit(None, key(KeyCode::Char('x'))));
    }
}
