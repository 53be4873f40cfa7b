//! DAS/ARR repeat handler for terminal environments.
//!
//! Holding a cursor or aim key repeats it: once after the DAS delay, then
//! every ARR interval. Terminals that never send key-release events are
//! covered by a timeout: a held action is released when no fresh press
//! arrived within `key_release_timeout_ms`.

use std::time::Instant;

use arrayvec::ArrayVec;

use crate::types::{Action, DEFAULT_ARR_MS, DEFAULT_DAS_MS};

// In terminals without key-release events, a short timeout prevents a single tap
// from turning into a sustained "held" state that triggers DAS/ARR repeats.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// Actions that auto-repeat while held
pub fn is_repeatable(action: Action) -> bool {
    matches!(action, Action::Move(_) | Action::AimLeft | Action::AimRight)
}

#[derive(Debug, Clone)]
pub struct RepeatHandler {
    held: Option<Action>,
    last_key_time: Instant,
    das_timer: u32,
    arr_accumulator: u32,
    das_delay: u32,
    arr_rate: u32,
    key_release_timeout_ms: u32,
}

impl RepeatHandler {
    pub fn new() -> Self {
        Self::with_config(DEFAULT_DAS_MS, DEFAULT_ARR_MS)
    }

    pub fn with_config(das_delay: u32, arr_rate: u32) -> Self {
        Self {
            held: None,
            last_key_time: Instant::now(),
            das_timer: 0,
            arr_accumulator: 0,
            das_delay,
            arr_rate: arr_rate.max(1),
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn held(&self) -> Option<Action> {
        self.held
    }

    /// Register a press; returns the action to apply now, if any
    ///
    /// Non-repeatable actions pass straight through. A repeat of the
    /// action already held (terminal key repeat) is swallowed, the handler
    /// produces its own repeats.
    pub fn press(&mut self, action: Action) -> Option<Action> {
        if !is_repeatable(action) {
            return Some(action);
        }
        self.last_key_time = Instant::now();
        if self.held == Some(action) {
            return None;
        }
        self.held = Some(action);
        self.das_timer = 0;
        self.arr_accumulator = 0;
        Some(action)
    }

    pub fn release(&mut self, action: Action) {
        if self.held == Some(action) {
            self.clear_held();
        }
    }

    fn clear_held(&mut self) {
        self.held = None;
        self.das_timer = 0;
        self.arr_accumulator = 0;
    }

    /// Advance timers; returns the repeats due in this tick
    pub fn update(&mut self, elapsed_ms: u32) -> ArrayVec<Action, 32> {
        let mut actions = ArrayVec::<Action, 32>::new();

        // Auto-release when terminal does not emit release events.
        let since_last_key = self.last_key_time.elapsed().as_millis() as u32;
        if since_last_key > self.key_release_timeout_ms {
            self.clear_held();
        }

        let Some(action) = self.held else {
            return actions;
        };

        let prev_das = self.das_timer;
        self.das_timer = self.das_timer.saturating_add(elapsed_ms);
        if self.das_timer >= self.das_delay {
            let excess = if prev_das < self.das_delay {
                self.das_timer - self.das_delay
            } else {
                elapsed_ms
            };
            self.arr_accumulator += excess;
            while self.arr_accumulator >= self.arr_rate {
                let _ = actions.try_push(action);
                self.arr_accumulator -= self.arr_rate;
            }
        }
        actions
    }

    pub fn reset(&mut self) {
        self.clear_held();
        self.last_key_time = Instant::now();
    }
}

impl Default for RepeatHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;
    use std::time::Duration;

    const LEFT: Action = Action::Move(Direction::Left);

    #[test]
    fn test_repeats_after_das_then_every_arr() {
        let mut rh = RepeatHandler::with_config(100, 25).with_key_release_timeout_ms(10_000);

        assert_eq!(rh.press(LEFT), Some(LEFT));

        // Before DAS expires: no repeats.
        assert!(rh.update(99).is_empty());
        // Exactly at DAS: still nothing accumulated.
        assert!(rh.update(1).is_empty());

        assert_eq!(rh.update(25).as_slice(), &[LEFT]);
        assert_eq!(rh.update(50).as_slice(), &[LEFT, LEFT]);
    }

    #[test]
    fn test_terminal_key_repeat_is_swallowed() {
        let mut rh = RepeatHandler::with_config(100, 25);
        assert_eq!(rh.press(Action::AimRight), Some(Action::AimRight));
        assert_eq!(rh.press(Action::AimRight), None);
        assert_eq!(rh.press(Action::AimLeft), Some(Action::AimLeft));
        assert_eq!(rh.held(), Some(Action::AimLeft));
    }

    #[test]
    fn test_non_repeatable_actions_pass_through() {
        let mut rh = RepeatHandler::new();
        assert_eq!(rh.press(Action::Select), Some(Action::Select));
        assert_eq!(rh.press(Action::Select), Some(Action::Select));
        assert_eq!(rh.held(), None);
    }

    #[test]
    fn test_auto_release_after_timeout() {
        let mut rh = RepeatHandler::with_config(100, 25).with_key_release_timeout_ms(50);
        rh.press(LEFT);

        // Simulate no key-release events by moving the last key time into the past.
        rh.last_key_time = Instant::now() - Duration::from_millis(51);

        assert!(rh.update(200).is_empty());
        assert_eq!(rh.held(), None);
    }

    #[test]
    fn test_release_and_reset_stop_repeats() {
        let mut rh = RepeatHandler::with_config(100, 25).with_key_release_timeout_ms(10_000);
        rh.press(LEFT);
        assert!(!rh.update(200).is_empty());
        rh.release(LEFT);
        assert!(rh.update(200).is_empty());

        rh.press(Action::AimLeft);
        rh.reset();
        assert!(rh.update(200).is_empty());
    }

    #[test]
    fn test_default_key_release_timeout_is_non_zero() {
        assert!(RepeatHandler::new().key_release_timeout_ms() > 0);
    }
}
