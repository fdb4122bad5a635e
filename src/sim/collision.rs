//! Ball movement and brick/paddle collision
//!
//! One call to `advance` is one ball cycle. The ball lives on an 8x8 grid with
//! one-hot row and column bytes, and collisions are resolved by probing the
//! brick bitmasks around it before the ball moves one cell diagonally.

use serde::{Deserialize, Serialize};

use super::state::{Ball, Bricks, Horizontal, Layer, Vertical, double, halve};
use crate::consts::*;

/// What happened during one ball cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CycleReport {
    /// Bricks removed this cycle (the launch brick always counts)
    pub brick_hits: u8,
    /// Ball bounced off the paddle
    pub paddle_hit: bool,
    /// Ball got past the paddle
    pub lost: bool,
    /// A chained double hit consumed the movement for this cycle
    pub movement_omitted: bool,
}

/// Advance the ball by one cycle
pub fn advance(ball: &mut Ball, bricks: &mut Bricks, paddle_position: u8) -> CycleReport {
    let mut report = CycleReport::default();
    let col = ball.column();

    // A served ball travels straight up until it meets the bottom layer,
    // then takes that brick and heads back down toward the paddle's far side.
    if ball.y == ROW_LAUNCH && ball.dir_x == Horizontal::Middle {
        ball.dir_x = if paddle_position <= COLUMN_CENTER {
            Horizontal::Left
        } else {
            Horizontal::Right
        };
        ball.dir_y = Vertical::Down;
        bricks.clear(Layer::Bottom, col);
        report.brick_hits += 1;
    }

    side_bounce(ball, bricks, col, &mut report);

    if ball.y == ROW_LAYER_TOP {
        ball.dir_y = Vertical::Down;
    }

    match (ball.y, ball.dir_y) {
        (ROW_LAYER_TOP, Vertical::Down) => {
            // Leaving the top row: only the diagonal cell below can be hit
            let target = col + ball.dir_x.step();
            if ball.dir_x != Horizontal::Middle && bricks.has(Layer::Middle, target) {
                ball.dir_x = ball.dir_x.reversed();
                bricks.clear(Layer::Middle, target);
                report.brick_hits += 1;
            }
        }
        (ROW_LAYER_MIDDLE, Vertical::Down) => {
            if let Some(Strike::Diagonal) = strike(ball, bricks, Layer::Bottom, col, &mut report) {
                // The rebound heads straight into the top layer: take that
                // brick as well and hold position for this cycle.
                let chained = col + ball.dir_x.step();
                if bricks.has(Layer::Top, chained) {
                    ball.dir_x = ball.dir_x.reversed();
                    ball.dir_y = Vertical::Down;
                    bricks.clear(Layer::Top, chained);
                    report.brick_hits += 1;
                    report.movement_omitted = true;
                }
            }
        }
        (ROW_LAYER_MIDDLE, Vertical::Up) => {
            strike(ball, bricks, Layer::Top, col, &mut report);
        }
        (ROW_LAYER_BOTTOM, Vertical::Up) => {
            strike(ball, bricks, Layer::Middle, col, &mut report);
        }
        (ROW_LAUNCH, Vertical::Up) => {
            strike(ball, bricks, Layer::Bottom, col, &mut report);
        }
        (ROW_ABOVE_PADDLE, Vertical::Down) => {
            paddle_bounce(ball, paddle_position, &mut report);
        }
        _ => {}
    }

    if !report.movement_omitted {
        step(ball);
    }

    log::trace!(
        "ball x={:#04x} y={:#04x} dir=({:?},{:?}) hits={}",
        ball.x,
        ball.y,
        ball.dir_x,
        ball.dir_y,
        report.brick_hits
    );

    report
}

/// Reverse off a wall, or off a brick directly beside the ball in its row
fn side_bounce(ball: &mut Ball, bricks: &mut Bricks, col: i8, report: &mut CycleReport) {
    match ball.dir_x {
        Horizontal::Left if ball.x == COLUMN_LEFT_WALL => ball.dir_x = Horizontal::Right,
        Horizontal::Right if ball.x == COLUMN_RIGHT_WALL => ball.dir_x = Horizontal::Left,
        Horizontal::Left | Horizontal::Right => {
            let Some(layer) = Layer::at_row(ball.y) else {
                return;
            };
            let target = col + ball.dir_x.step();
            if bricks.has(layer, target) {
                ball.dir_x = ball.dir_x.reversed();
                bricks.clear(layer, target);
                report.brick_hits += 1;
            }
        }
        Horizontal::Middle => {}
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strike {
    Straight,
    Diagonal,
}

/// Probe the layer the ball is about to enter: the cell straight ahead first,
/// then the diagonal cell in the direction of travel. A straight hit flips the
/// vertical direction, a diagonal hit flips both.
fn strike(
    ball: &mut Ball,
    bricks: &mut Bricks,
    layer: Layer,
    col: i8,
    report: &mut CycleReport,
) -> Option<Strike> {
    if bricks.has(layer, col) {
        ball.dir_y = ball.dir_y.reversed();
        bricks.clear(layer, col);
        report.brick_hits += 1;
        return Some(Strike::Straight);
    }

    let target = col + ball.dir_x.step();
    if ball.dir_x != Horizontal::Middle && bricks.has(layer, target) {
        ball.dir_x = ball.dir_x.reversed();
        ball.dir_y = ball.dir_y.reversed();
        bricks.clear(layer, target);
        report.brick_hits += 1;
        return Some(Strike::Diagonal);
    }

    None
}

/// Bounce off the three-wide paddle.
///
/// The ball is one row above the paddle and will land one column over, so
/// the catch window spans two columns either side of the paddle's middle. A
/// ball in the outermost column of that window lands on the paddle's edge
/// block and is deflected outward; if it was already heading outward it
/// misses.
fn paddle_bounce(ball: &mut Ball, paddle_position: u8, report: &mut CycleReport) {
    let x = u16::from(ball.x);
    let left_reach = u16::from(paddle_position) / 4;
    let right_reach = u16::from(paddle_position) * 4;

    if x == left_reach {
        if ball.dir_x == Horizontal::Left {
            report.lost = true;
        }
        ball.dir_x = Horizontal::Left;
    }
    if x == right_reach {
        if ball.dir_x == Horizontal::Right {
            report.lost = true;
        }
        ball.dir_x = Horizontal::Right;
    }

    if (left_reach..=right_reach).contains(&x) && !report.lost {
        ball.dir_y = Vertical::Up;
        report.paddle_hit = true;
    } else {
        report.lost = true;
    }
}

/// Move one cell. Horizontal movement stops at the walls; vertical movement
/// falls back to downward when the ball is already at the ceiling.
fn step(ball: &mut Ball) {
    match ball.dir_x {
        Horizontal::Left if ball.x > COLUMN_LEFT_WALL => ball.x = halve(ball.x),
        Horizontal::Right if ball.x < COLUMN_RIGHT_WALL => ball.x = double(ball.x),
        _ => {}
    }
    if ball.dir_y == Vertical::Up && ball.y > ROW_LAYER_TOP {
        ball.y = halve(ball.y);
    } else {
        ball.y = double(ball.y);
    }
}
