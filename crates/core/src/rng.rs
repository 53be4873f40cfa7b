//! RNG module - deterministic random source shared by every game
//!
//! All generators take a [`SimpleRng`] so a seed reproduces the same board,
//! cascade refills and puzzle layouts. Cloning the RNG clones the future,
//! which is what planner look-ahead relies on.

use tui_arcade_types::GemColor;

const LCG_MUL: u32 = 1_664_525;
const LCG_INC: u32 = 1_013_904_223;

/// 32-bit LCG, cheap to clone and stable across platforms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Seed 0 is remapped to 1.
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(LCG_MUL).wrapping_add(LCG_INC);
        self.state
    }

    /// Uniform value in `0..bound`, 0 when `bound` is 0
    ///
    /// Scales the whole word instead of taking a modulo: the low bits of a
    /// power-of-two LCG cycle quickly.
    pub fn next_range(&mut self, bound: u32) -> u32 {
        match bound {
            0 => 0,
            _ => ((u64::from(self.next_u32()) * u64::from(bound)) >> 32) as u32,
        }
    }

    pub fn next_index(&mut self, len: usize) -> usize {
        self.next_range(len as u32) as usize
    }

    /// Uniform float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// True with probability `numerator / denominator`
    pub fn chance(&mut self, numerator: u32, denominator: u32) -> bool {
        self.next_range(denominator) < numerator
    }

    /// In-place Fisher-Yates
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        let mut remaining = items.len();
        while remaining > 1 {
            let j = self.next_index(remaining);
            remaining -= 1;
            items.swap(remaining, j);
        }
    }

    pub fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        match items.len() {
            0 => None,
            n => Some(items[self.next_index(n)]),
        }
    }

    /// Random color from the first `colors` entries of the palette
    pub fn color(&mut self, colors: u8) -> GemColor {
        let n = (colors as usize).clamp(1, GemColor::ALL.len());
        GemColor::ALL[self.next_index(n)]
    }

    /// Internal state; `SimpleRng::new(state)` resumes the same stream
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
