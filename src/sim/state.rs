//! Shared game state and one-hot helpers
//!
//! Every machine reads and writes one `SharedState`. There is no locking: the
//! scheduler owns the value and lends it to one machine at a time, in a fixed
//! order, so a write made by the paddle is visible to the ball in the same tick.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Horizontal ball direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Horizontal {
    Left,
    #[default]
    Middle,
    Right,
}

impl Horizontal {
    /// Column offset for one step in this direction
    pub fn step(self) -> i8 {
        match self {
            Horizontal::Left => -1,
            Horizontal::Middle => 0,
            Horizontal::Right => 1,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Horizontal::Left => Horizontal::Right,
            Horizontal::Middle => Horizontal::Middle,
            Horizontal::Right => Horizontal::Left,
        }
    }
}

/// Vertical ball direction. `Up` moves toward the bricks (row 0x01),
/// `Down` toward the paddle (row 0x80).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Vertical {
    Up,
    #[default]
    Down,
}

impl Vertical {
    pub fn reversed(self) -> Self {
        match self {
            Vertical::Up => Vertical::Down,
            Vertical::Down => Vertical::Up,
        }
    }
}

/// Linear column index (0-7) of a one-hot value, counted as the number of
/// right shifts needed to reach bit 0. Zero decodes as column 0.
#[inline]
pub fn column_index(one_hot: u8) -> i8 {
    if one_hot == 0 {
        0
    } else {
        one_hot.trailing_zeros() as i8
    }
}

/// True when at most one bit is set
#[inline]
pub fn is_one_hot_or_empty(value: u8) -> bool {
    value.count_ones() <= 1
}

/// Move a one-hot value one place toward bit 0
#[inline]
pub fn halve(one_hot: u8) -> u8 {
    one_hot >> 1
}

/// Move a one-hot value one place toward bit 7, staying put at the top bit
#[inline]
pub fn double(one_hot: u8) -> u8 {
    one_hot.checked_mul(2).unwrap_or(one_hot)
}

/// One of the three brick rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layer {
    /// Layer 1, row 0x01 (ceiling)
    Top,
    /// Layer 2, row 0x02
    Middle,
    /// Layer 3, row 0x04 (closest to the paddle)
    Bottom,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Top, Layer::Middle, Layer::Bottom];

    /// Display row this layer occupies
    pub fn row(self) -> u8 {
        match self {
            Layer::Top => ROW_LAYER_TOP,
            Layer::Middle => ROW_LAYER_MIDDLE,
            Layer::Bottom => ROW_LAYER_BOTTOM,
        }
    }

    /// Layer drawn on the given one-hot row, if any
    pub fn at_row(row: u8) -> Option<Layer> {
        match row {
            ROW_LAYER_TOP => Some(Layer::Top),
            ROW_LAYER_MIDDLE => Some(Layer::Middle),
            ROW_LAYER_BOTTOM => Some(Layer::Bottom),
            _ => None,
        }
    }

    fn slot(self) -> usize {
        match self {
            Layer::Top => 0,
            Layer::Middle => 1,
            Layer::Bottom => 2,
        }
    }
}

/// Brick presence bitmasks, one byte per layer. Bit n set means a brick at
/// column n. Bits are only ever cleared here, except by `fill`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bricks {
    layers: [u8; 3],
}

impl Bricks {
    pub fn from_masks(top: u8, middle: u8, bottom: u8) -> Self {
        Self {
            layers: [top, middle, bottom],
        }
    }

    pub fn mask(&self, layer: Layer) -> u8 {
        self.layers[layer.slot()]
    }

    /// Brick at a column index. Indices outside 0-7 are empty.
    pub fn has(&self, layer: Layer, index: i8) -> bool {
        (0..8).contains(&index) && self.mask(layer) & (1 << index) != 0
    }

    /// Remove the brick at a column index (no-op outside 0-7)
    pub fn clear(&mut self, layer: Layer, index: i8) {
        if (0..8).contains(&index) {
            self.layers[layer.slot()] &= !(1u8 << index);
        }
    }

    pub fn fill(&mut self) {
        self.layers = [FULL_LAYER; 3];
    }

    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(|&l| l == 0)
    }

    pub fn count(&self) -> u32 {
        self.layers.iter().map(|l| l.count_ones()).sum()
    }
}

/// The player's paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Paddle {
    /// One-hot column of the paddle's middle block (0 while idle)
    pub position: u8,
    /// Lit columns on the paddle row
    pub width_mask: u8,
}

impl Paddle {
    /// Shift one column right. Returns false when already against the wall.
    pub fn move_right(&mut self) -> bool {
        if self.width_mask < PADDLE_RIGHTMOST {
            self.width_mask <<= 1;
            self.position <<= 1;
            true
        } else {
            false
        }
    }

    /// Shift one column left. Returns false when already against the wall.
    pub fn move_left(&mut self) -> bool {
        if self.width_mask > PADDLE_LEFTMOST {
            self.width_mask >>= 1;
            self.position >>= 1;
            true
        } else {
            false
        }
    }
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ball {
    /// One-hot column (0 while hidden)
    pub x: u8,
    /// One-hot row (0 while hidden)
    pub y: u8,
    pub dir_x: Horizontal,
    pub dir_y: Vertical,
}

impl Ball {
    pub fn hide(&mut self) {
        self.x = 0;
        self.y = 0;
    }

    pub fn column(&self) -> i8 {
        column_index(self.x)
    }
}

/// Cross-machine flags.
///
/// | flag | raised by | read by |
/// |---|---|---|
/// | `start` | paddle (Wait) | paddle, ball, game |
/// | `reset` | paddle, ball, game (button sample) | all three |
/// | `shot` | ball (Setup) | ball, game |
/// | `lost` | ball (Cycle) | paddle, ball, game; cleared by game Reset |
/// | `victory` | game (Status) | paddle, ball, game; cleared by game Reset |
/// | `setup` | ball (Setup), game (level advance) | scheduler, ball |
/// | `ball_reset_pending` | paddle (Reset), game (Reset) | ball; cleared by ball Setup |
/// | `paddle_hit` | ball (Cycle) | ball (tone select) |
/// | `final_send` | game (Status) | game (Won) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Signals {
    pub start: bool,
    pub reset: bool,
    pub shot: bool,
    pub lost: bool,
    pub victory: bool,
    pub setup: bool,
    pub ball_reset_pending: bool,
    pub paddle_hit: bool,
    pub final_send: bool,
}

/// Complete shared game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedState {
    pub paddle: Paddle,
    pub ball: Ball,
    pub bricks: Bricks,
    /// Player score (wraps at 256, same as the display link byte)
    pub score: u8,
    /// Bricks hit during the most recent ball cycle
    pub brick_hits: u8,
    /// Ticks between ball cycles
    pub ball_speed_period: u16,
    pub signals: Signals,
}

impl SharedState {
    pub fn new(initial_ball_period: u16) -> Self {
        Self {
            paddle: Paddle::default(),
            ball: Ball::default(),
            bricks: Bricks::default(),
            score: 0,
            brick_hits: 0,
            ball_speed_period: initial_ball_period,
            signals: Signals::default(),
        }
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new(DEFAULT_BALL_PERIOD)
    }
}
