//! Platform abstraction layer
//!
//! The game core talks to the board only through these traits:
//! - Joystick (analog) and the two buttons
//! - Tone generator
//! - LED matrix shift-register driver
//! - Serial score link to the display unit
//! - Periodic tick source
//!
//! `sim` provides a host implementation used by the native runner and tests.

pub mod sim;

use serde::{Deserialize, Serialize};

/// Sampled joystick position (10-bit ADC, refreshed in the background)
pub trait AnalogInput {
    fn read(&mut self) -> u16;
}

/// Momentary buttons as level reads. Boards with active-low lines invert
/// before reporting, so `true` always means pressed.
pub trait ButtonInput {
    /// Start / reset button
    fn start_pressed(&mut self) -> bool;
    /// Shoot button
    fn shoot_pressed(&mut self) -> bool;
}

/// Square-wave tone output. 0 Hz is silence.
pub trait ToneOutput {
    fn set_frequency(&mut self, hz: f32);
}

/// Shift-register LED matrix driver. `row_select` is the one-hot row line,
/// `data` is shifted out as-is (the matrix is active-low).
pub trait MatrixDriver {
    fn write_slice(&mut self, row_select: u8, data: u8);
}

/// Serial link to the score display. Senders must check `is_ready` in the
/// same tick and drop the byte otherwise.
pub trait ScoreLink {
    fn is_ready(&self) -> bool;
    fn send(&mut self, score: u8);
}

/// Periodic tick. Blocks until the next tick fires.
pub trait TickSource {
    fn wait_for_tick(&mut self);
}

/// Everything the scheduler needs from a board
pub trait Board: AnalogInput + ButtonInput + ToneOutput + MatrixDriver + ScoreLink + TickSource {}

impl<T> Board for T where
    T: AnalogInput + ButtonInput + ToneOutput + MatrixDriver + ScoreLink + TickSource
{
}

/// Input snapshot taken once per tick (deterministic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Inputs {
    /// Joystick reading (0-1023)
    pub joystick: u16,
    /// Start / reset button held
    pub start_button: bool,
    /// Shoot button held
    pub shoot_button: bool,
}

impl Inputs {
    pub fn sample<B: AnalogInput + ButtonInput>(board: &mut B) -> Self {
        Self {
            joystick: board.read(),
            start_button: board.start_pressed(),
            shoot_button: board.shoot_pressed(),
        }
    }
}

/// Send the score if the link is free, otherwise drop it
pub fn send_score<L: ScoreLink + ?Sized>(link: &mut L, score: u8) -> bool {
    if link.is_ready() {
        link.send(score);
        true
    } else {
        log::debug!("score link busy, dropped score {}", score);
        false
    }
}
