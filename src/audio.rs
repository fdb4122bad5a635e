//! Sound effects on a single square-wave tone generator
//!
//! The buzzer is driven by a 16-bit timer in toggle-on-compare mode. Each
//! effect is one fixed frequency held until the next ball or game tick.

use serde::{Deserialize, Serialize};

use crate::platform::ToneOutput;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    Silence,
    /// Ball hits paddle
    PaddleHit,
    /// One brick broken this cycle
    BrickHit,
    /// Two or more bricks broken this cycle
    MultiBrickHit,
    /// Game over
    GameOver,
}

impl SoundEffect {
    pub fn frequency(self) -> f32 {
        match self {
            SoundEffect::Silence => 0.0,
            SoundEffect::PaddleHit => 110.0,
            SoundEffect::BrickHit => 220.0,
            SoundEffect::MultiBrickHit => 440.0,
            SoundEffect::GameOver => 55.0,
        }
    }

    /// Effect for one ball cycle. A paddle hit overrides brick hits.
    pub fn for_cycle(brick_hits: u8, paddle_hit: bool) -> Self {
        if paddle_hit {
            return SoundEffect::PaddleHit;
        }
        match brick_hits {
            0 => SoundEffect::Silence,
            1 => SoundEffect::BrickHit,
            _ => SoundEffect::MultiBrickHit,
        }
    }

    pub fn play<T: ToneOutput + ?Sized>(self, out: &mut T) {
        out.set_frequency(self.frequency());
    }
}

/// Timer clock feeding the buzzer
pub const CPU_HZ: f32 = 8_000_000.0;
/// Timer prescaler
pub const PRESCALER: f32 = 64.0;
/// Lowest frequency whose compare value fits in 16 bits
pub const MIN_FREQUENCY: f32 = 0.954;
/// Highest frequency with a non-negative compare value
pub const MAX_FREQUENCY: f32 = 31_250.0;

/// Compare register value for a frequency. The output toggles on every match,
/// so one period spans two matches. Out-of-range frequencies clamp.
pub fn compare_value(hz: f32) -> u16 {
    if hz < MIN_FREQUENCY {
        u16::MAX
    } else if hz > MAX_FREQUENCY {
        0
    } else {
        let counts = CPU_HZ / (2.0 * PRESCALER * hz);
        (counts as u16).saturating_sub(1)
    }
}

/// Tone generator model: keeps the current frequency and only reprograms the
/// timer when it changes, so a held tone plays without glitches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToneGenerator {
    frequency: f32,
    compare: u16,
    running: bool,
    /// Timer reprogram count
    reprograms: u32,
}

impl ToneGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn compare(&self) -> u16 {
        self.compare
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn reprograms(&self) -> u32 {
        self.reprograms
    }
}

impl ToneOutput for ToneGenerator {
    fn set_frequency(&mut self, hz: f32) {
        if hz == self.frequency {
            return;
        }
        self.running = hz != 0.0;
        self.compare = compare_value(hz);
        self.frequency = hz;
        self.reprograms += 1;
        log::trace!("tone {} Hz (compare {})", hz, self.compare);
    }
}
