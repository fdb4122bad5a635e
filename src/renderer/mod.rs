//! LED matrix renderer
//!
//! The matrix is multiplexed: one row line is driven per tick and the column
//! byte for that row is shifted out to the shift-register driver. Cycling
//! through the five lit rows fast enough gives a steady picture.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::platform::MatrixDriver;
use crate::sim::SharedState;
use crate::sim::state::Layer;

/// Which slice of the picture is drawn this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Slice {
    #[default]
    Init,
    Paddle,
    Ball,
    Brick1,
    Brick2,
    Brick3,
}

impl Slice {
    pub fn next(self) -> Self {
        match self {
            Slice::Init => Slice::Paddle,
            Slice::Paddle => Slice::Ball,
            Slice::Ball => Slice::Brick1,
            Slice::Brick1 => Slice::Brick2,
            Slice::Brick2 => Slice::Brick3,
            Slice::Brick3 => Slice::Paddle,
        }
    }

    /// Row select line and lit columns for this slice
    pub fn contents(self, shared: &SharedState) -> Option<(u8, u8)> {
        match self {
            Slice::Init => None,
            Slice::Paddle => Some((ROW_PADDLE, shared.paddle.width_mask)),
            Slice::Ball => Some((shared.ball.y, shared.ball.x)),
            Slice::Brick1 => Some((Layer::Top.row(), shared.bricks.mask(Layer::Top))),
            Slice::Brick2 => Some((Layer::Middle.row(), shared.bricks.mask(Layer::Middle))),
            Slice::Brick3 => Some((Layer::Bottom.row(), shared.bricks.mask(Layer::Bottom))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderMachine {
    pub slice: Slice,
}

impl RenderMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to the next slice and shift it out. The matrix is active-low.
    pub fn tick<M: MatrixDriver + ?Sized>(&mut self, shared: &SharedState, matrix: &mut M) {
        self.slice = self.slice.next();
        if let Some((row, columns)) = self.slice.contents(shared) {
            matrix.write_slice(row, !columns);
        }
    }
}
