//! LED Breakout - a Breakout game for an 8x8 LED matrix
//!
//! Core modules:
//! - `sim`: Cooperative scheduler and the paddle, ball and game state machines
//! - `renderer`: Round-robin LED matrix slice renderer
//! - `platform`: Collaborator traits (joystick, buttons, tone, matrix, score link, tick)
//! - `audio`: Tone generator with clamped timer compare values
//! - `settings`: Tunable cadences and joystick calibration

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;
pub use sim::{Scheduler, SharedState};

/// Game configuration constants
pub mod consts {
    /// Ticks between paddle/game machine runs
    pub const DEFAULT_FAST_PERIOD: u16 = 100;
    /// Ticks between ball cycles at the first level
    pub const DEFAULT_BALL_PERIOD: u16 = 250;
    /// Ball period reduction per cleared level
    pub const DEFAULT_BALL_PERIOD_STEP: u16 = 50;
    /// Clearing the board at this period wins the game
    pub const DEFAULT_BALL_PERIOD_FLOOR: u16 = 150;

    /// Joystick reading at rest (10-bit ADC)
    pub const DEFAULT_JOYSTICK_CENTER: u16 = 512;
    /// Readings within this distance of center do not move the paddle
    pub const DEFAULT_JOYSTICK_DEAD_ZONE: u16 = 100;

    /// Brick rows (one-hot display rows)
    pub const ROW_LAYER_TOP: u8 = 0x01;
    pub const ROW_LAYER_MIDDLE: u8 = 0x02;
    pub const ROW_LAYER_BOTTOM: u8 = 0x04;
    /// Row just below the bricks where a freshly served ball picks a side
    pub const ROW_LAUNCH: u8 = 0x08;
    /// Row the ball is served from and bounces off the paddle at
    pub const ROW_ABOVE_PADDLE: u8 = 0x40;
    pub const ROW_PADDLE: u8 = 0x80;

    pub const COLUMN_LEFT_WALL: u8 = 0x01;
    pub const COLUMN_RIGHT_WALL: u8 = 0x80;
    /// Paddle positions at or left of this column launch the ball leftward
    pub const COLUMN_CENTER: u8 = 0x08;

    /// Three-wide paddle against the left wall
    pub const PADDLE_LEFTMOST: u8 = 0x07;
    /// Three-wide paddle against the right wall
    pub const PADDLE_RIGHTMOST: u8 = 0xE0;
    /// Middle block of a freshly placed paddle
    pub const PADDLE_HOME: u8 = 0x02;

    pub const FULL_LAYER: u8 = 0xFF;
}
