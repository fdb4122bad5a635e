//! Ball state machine
//!
//! Serves the ball from the paddle, runs one collision cycle per ball tick,
//! and turns the cycle's outcome into score, flags and a sound effect.

use serde::{Deserialize, Serialize};

use super::collision::{CycleReport, advance};
use super::state::{Horizontal, SharedState, Signals, Vertical};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::platform::{Inputs, ToneOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BallState {
    #[default]
    Init,
    /// Hidden until the game starts
    Wait,
    /// Resting above the paddle, waiting for the shoot button
    Setup,
    /// In flight
    Cycle,
    /// Past the paddle, waiting for a reset
    Out,
    /// Hidden while the reset button is held
    Reset,
}

/// Next ball state. Checks run in order and the last match wins, so victory
/// overrides a pending reset, which overrides a level restart, which
/// overrides a loss.
pub fn transition(state: BallState, signals: &Signals) -> BallState {
    match state {
        BallState::Init => BallState::Wait,
        BallState::Wait if signals.start => BallState::Setup,
        BallState::Wait => BallState::Wait,
        BallState::Setup if signals.reset => BallState::Reset,
        BallState::Setup if signals.shot => BallState::Cycle,
        BallState::Setup => BallState::Setup,
        BallState::Cycle if signals.victory => BallState::Wait,
        BallState::Cycle if signals.ball_reset_pending => BallState::Reset,
        BallState::Cycle if signals.setup => BallState::Setup,
        BallState::Cycle if signals.lost => BallState::Out,
        BallState::Cycle => BallState::Cycle,
        BallState::Out if signals.ball_reset_pending => BallState::Reset,
        BallState::Out => BallState::Out,
        BallState::Reset if !signals.reset => BallState::Setup,
        BallState::Reset => BallState::Reset,
    }
}

#[derive(Debug, Clone, Default)]
pub struct BallMachine {
    pub state: BallState,
    /// Outcome of the most recent cycle
    pub last_cycle: CycleReport,
}

impl BallMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick<T: ToneOutput + ?Sized>(
        &mut self,
        shared: &mut SharedState,
        inputs: &Inputs,
        tone: &mut T,
    ) {
        let next = transition(self.state, &shared.signals);
        if next != self.state {
            log::debug!("ball: {:?} -> {:?}", self.state, next);
        }
        self.state = next;

        match self.state {
            BallState::Init => {}
            BallState::Wait => shared.ball.hide(),
            BallState::Setup => serve(shared, inputs, tone),
            BallState::Cycle => self.cycle(shared, inputs, tone),
            BallState::Out => shared.signals.reset = inputs.start_button,
            BallState::Reset => {
                shared.signals.reset = inputs.start_button;
                shared.ball.hide();
            }
        }
    }

    fn cycle<T: ToneOutput + ?Sized>(
        &mut self,
        shared: &mut SharedState,
        inputs: &Inputs,
        tone: &mut T,
    ) {
        shared.signals.setup = false;
        shared.signals.paddle_hit = false;
        shared.signals.reset = inputs.start_button;

        let report = advance(&mut shared.ball, &mut shared.bricks, shared.paddle.position);
        self.last_cycle = report;

        shared.brick_hits = report.brick_hits;
        shared.signals.paddle_hit = report.paddle_hit;
        if report.lost {
            shared.signals.lost = true;
            log::info!("ball lost at column {}", shared.ball.column());
        }

        SoundEffect::for_cycle(report.brick_hits, report.paddle_hit).play(tone);

        if report.brick_hits > 0 {
            shared.score = shared.score.wrapping_add(report.brick_hits);
        }
    }
}

/// Rest the ball above the paddle's middle and watch the buttons
fn serve<T: ToneOutput + ?Sized>(shared: &mut SharedState, inputs: &Inputs, tone: &mut T) {
    shared.signals.setup = true;
    shared.signals.ball_reset_pending = false;
    shared.brick_hits = 0;
    SoundEffect::Silence.play(tone);

    shared.signals.reset = inputs.start_button;
    // The paddle is not placed until its own setup runs; hold the serve
    shared.signals.shot = inputs.shoot_button && shared.paddle.position != 0;
    if shared.signals.shot {
        shared.signals.setup = false;
    }

    shared.ball.dir_x = Horizontal::Middle;
    shared.ball.dir_y = Vertical::Up;
    shared.ball.x = shared.paddle.position;
    shared.ball.y = ROW_ABOVE_PADDLE;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::ToneGenerator;
    use crate::sim::state::{Bricks, Layer};

    fn idle() -> Inputs {
        Inputs {
            joystick: DEFAULT_JOYSTICK_CENTER,
            ..Default::default()
        }
    }

    fn in_flight() -> (BallMachine, SharedState, ToneGenerator) {
        let machine = BallMachine {
            state: BallState::Cycle,
            last_cycle: CycleReport::default(),
        };
        let mut shared = SharedState::default();
        shared.paddle.position = PADDLE_HOME;
        shared.paddle.width_mask = PADDLE_LEFTMOST;
        (machine, shared, ToneGenerator::new())
    }

    #[test]
    fn test_serve_follows_paddle() {
        let mut machine = BallMachine::new();
        let mut shared = SharedState::default();
        let mut tone = ToneGenerator::new();
        shared.signals.start = true;
        shared.paddle.position = 0x08;

        machine.tick(&mut shared, &idle(), &mut tone); // Wait
        machine.tick(&mut shared, &idle(), &mut tone); // Setup
        assert_eq!(machine.state, BallState::Setup);
        assert!(shared.signals.setup);
        assert_eq!((shared.ball.x, shared.ball.y), (0x08, ROW_ABOVE_PADDLE));
        assert_eq!(shared.ball.dir_x, Horizontal::Middle);
        assert_eq!(shared.ball.dir_y, Vertical::Up);
    }

    #[test]
    fn test_shoot_releases_setup() {
        let mut machine = BallMachine {
            state: BallState::Setup,
            last_cycle: CycleReport::default(),
        };
        let mut shared = SharedState::default();
        shared.paddle.position = PADDLE_HOME;
        let mut tone = ToneGenerator::new();
        let shoot = Inputs {
            shoot_button: true,
            ..idle()
        };
        machine.tick(&mut shared, &shoot, &mut tone);
        assert!(shared.signals.shot);
        assert!(!shared.signals.setup);
        machine.tick(&mut shared, &idle(), &mut tone);
        assert_eq!(machine.state, BallState::Cycle);
        assert_eq!((shared.ball.x, shared.ball.y), (PADDLE_HOME, 0x20));
    }

    #[test]
    fn test_shoot_ignored_before_paddle_placed() {
        let mut machine = BallMachine {
            state: BallState::Setup,
            last_cycle: CycleReport::default(),
        };
        let mut shared = SharedState::default();
        let mut tone = ToneGenerator::new();
        let shoot = Inputs {
            shoot_button: true,
            ..idle()
        };
        machine.tick(&mut shared, &shoot, &mut tone);
        assert!(!shared.signals.shot);
        assert!(shared.signals.setup);
        machine.tick(&mut shared, &shoot, &mut tone);
        assert_eq!(machine.state, BallState::Setup);

        shared.paddle.position = PADDLE_HOME;
        machine.tick(&mut shared, &shoot, &mut tone);
        assert!(shared.signals.shot);
        assert_eq!(shared.ball.x, PADDLE_HOME);
    }

    #[test]
    fn test_side_hit_scores_and_sounds() {
        let (mut machine, mut shared, mut tone) = in_flight();
        shared.ball.x = 0x04;
        shared.ball.y = ROW_LAYER_MIDDLE;
        shared.ball.dir_x = Horizontal::Left;
        shared.ball.dir_y = Vertical::Down;
        shared.bricks = Bricks::from_masks(0, 0x02, 0);

        machine.tick(&mut shared, &idle(), &mut tone);

        assert!(!shared.bricks.has(Layer::Middle, 1));
        assert_eq!(shared.ball.dir_x, Horizontal::Right);
        assert_eq!(shared.brick_hits, 1);
        assert_eq!(shared.score, 1);
        assert_eq!(tone.frequency(), 220.0);
    }

    #[test]
    fn test_paddle_hit_overrides_brick_tone() {
        let (mut machine, mut shared, mut tone) = in_flight();
        shared.ball.x = 0x04;
        shared.ball.y = ROW_ABOVE_PADDLE;
        shared.ball.dir_x = Horizontal::Left;
        shared.ball.dir_y = Vertical::Down;

        machine.tick(&mut shared, &idle(), &mut tone);

        assert!(shared.signals.paddle_hit);
        assert_eq!(shared.ball.dir_y, Vertical::Up);
        assert_eq!(tone.frequency(), 110.0);
    }

    #[test]
    fn test_miss_beyond_right_edge_loses() {
        let (mut machine, mut shared, mut tone) = in_flight();
        shared.paddle.position = 0x04;
        shared.ball.x = 0x10;
        shared.ball.y = ROW_ABOVE_PADDLE;
        shared.ball.dir_x = Horizontal::Right;
        shared.ball.dir_y = Vertical::Down;

        machine.tick(&mut shared, &idle(), &mut tone);
        assert!(shared.signals.lost);

        machine.tick(&mut shared, &idle(), &mut tone);
        assert_eq!(machine.state, BallState::Out);
    }

    #[test]
    fn test_transition_priority() {
        let signals = Signals {
            lost: true,
            setup: true,
            ball_reset_pending: true,
            victory: true,
            ..Default::default()
        };
        assert_eq!(transition(BallState::Cycle, &signals), BallState::Wait);
        let signals = Signals {
            lost: true,
            setup: true,
            ..Default::default()
        };
        assert_eq!(transition(BallState::Cycle, &signals), BallState::Setup);
        let signals = Signals {
            shot: true,
            reset: true,
            ..Default::default()
        };
        assert_eq!(transition(BallState::Setup, &signals), BallState::Reset);
    }

    #[test]
    fn test_reset_hides_ball_until_release() {
        let mut machine = BallMachine {
            state: BallState::Out,
            last_cycle: CycleReport::default(),
        };
        let mut shared = SharedState::default();
        let mut tone = ToneGenerator::new();
        shared.ball.x = 0x10;
        shared.ball.y = ROW_PADDLE;
        shared.signals.ball_reset_pending = true;
        let held = Inputs {
            start_button: true,
            ..idle()
        };
        machine.tick(&mut shared, &held, &mut tone);
        assert_eq!(machine.state, BallState::Reset);
        assert_eq!((shared.ball.x, shared.ball.y), (0, 0));

        machine.tick(&mut shared, &idle(), &mut tone);
        machine.tick(&mut shared, &idle(), &mut tone);
        assert_eq!(machine.state, BallState::Setup);
        assert!(!shared.signals.ball_reset_pending);
    }
}
