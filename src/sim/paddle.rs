//! Paddle state machine
//!
//! Converts the joystick reading into paddle moves and samples the start/reset
//! button on behalf of the other machines.

use serde::{Deserialize, Serialize};

use super::state::{SharedState, Signals};
use crate::Settings;
use crate::consts::*;
use crate::platform::Inputs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaddleState {
    #[default]
    Init,
    /// Paddle dark, waiting for the start button
    Wait,
    /// Paddle placed at its home column
    Setup,
    /// Following the joystick
    Control,
    /// Paddle dark while the reset button is held
    Reset,
}

/// Next paddle state. Later checks take priority: loss or victory beat reset.
pub fn transition(state: PaddleState, signals: &Signals) -> PaddleState {
    match state {
        PaddleState::Init => PaddleState::Wait,
        PaddleState::Wait if signals.start => PaddleState::Setup,
        PaddleState::Wait => PaddleState::Wait,
        PaddleState::Setup => PaddleState::Control,
        PaddleState::Control if signals.lost || signals.victory => PaddleState::Wait,
        PaddleState::Control if signals.reset => PaddleState::Reset,
        PaddleState::Control => PaddleState::Control,
        PaddleState::Reset if !signals.reset => PaddleState::Setup,
        PaddleState::Reset => PaddleState::Reset,
    }
}

/// Joystick deflection after the dead zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steer {
    Left,
    Hold,
    Right,
}

/// Joystick calibration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Joystick {
    pub center: u16,
    pub dead_zone: u16,
}

impl Joystick {
    pub fn steer(&self, reading: u16) -> Steer {
        let reading = u32::from(reading);
        let center = u32::from(self.center);
        let dead_zone = u32::from(self.dead_zone);
        if reading > center + dead_zone {
            Steer::Right
        } else if reading + dead_zone < center {
            Steer::Left
        } else {
            Steer::Hold
        }
    }
}

#[derive(Debug, Clone)]
pub struct PaddleMachine {
    pub state: PaddleState,
    joystick: Joystick,
}

impl PaddleMachine {
    pub fn new(settings: &Settings) -> Self {
        Self {
            state: PaddleState::Init,
            joystick: Joystick {
                center: settings.joystick_center,
                dead_zone: settings.joystick_dead_zone,
            },
        }
    }

    pub fn tick(&mut self, shared: &mut SharedState, inputs: &Inputs) {
        let next = transition(self.state, &shared.signals);
        if next != self.state {
            log::debug!("paddle: {:?} -> {:?}", self.state, next);
        }
        self.state = next;
        self.act(shared, inputs);
    }

    fn act(&self, shared: &mut SharedState, inputs: &Inputs) {
        match self.state {
            PaddleState::Init => {}
            PaddleState::Wait => {
                shared.signals.start = inputs.start_button;
                shared.paddle.width_mask = 0;
                shared.paddle.position = 0;
            }
            PaddleState::Setup => {
                shared.paddle.width_mask = PADDLE_LEFTMOST;
                shared.paddle.position = PADDLE_HOME;
            }
            PaddleState::Control => {
                shared.signals.reset = inputs.start_button;
                match self.joystick.steer(inputs.joystick) {
                    Steer::Right => {
                        shared.paddle.move_right();
                    }
                    Steer::Left => {
                        shared.paddle.move_left();
                    }
                    Steer::Hold => {}
                }
            }
            PaddleState::Reset => {
                shared.paddle.width_mask = 0;
                shared.signals.reset = inputs.start_button;
                if shared.signals.reset {
                    shared.signals.ball_reset_pending = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Paddle;
    use proptest::prelude::*;

    const CENTER: u16 = DEFAULT_JOYSTICK_CENTER;

    fn inputs(joystick: u16, start_button: bool) -> Inputs {
        Inputs {
            joystick,
            start_button,
            shoot_button: false,
        }
    }

    fn controlled() -> (PaddleMachine, SharedState) {
        let mut machine = PaddleMachine::new(&Settings::default());
        let mut shared = SharedState::default();
        machine.tick(&mut shared, &inputs(CENTER, false)); // Init -> Wait
        machine.tick(&mut shared, &inputs(CENTER, true)); // start sampled
        machine.tick(&mut shared, &inputs(CENTER, false)); // Setup
        machine.tick(&mut shared, &inputs(CENTER, false)); // Control
        assert_eq!(machine.state, PaddleState::Control);
        (machine, shared)
    }

    #[test]
    fn test_wait_samples_start_and_darkens() {
        let mut machine = PaddleMachine::new(&Settings::default());
        let mut shared = SharedState::default();
        shared.paddle.width_mask = 0x07;
        machine.tick(&mut shared, &inputs(CENTER, false));
        assert_eq!(machine.state, PaddleState::Wait);
        machine.tick(&mut shared, &inputs(CENTER, true));
        assert!(shared.signals.start);
        assert_eq!(shared.paddle.width_mask, 0);
    }

    #[test]
    fn test_setup_places_paddle_home() {
        let (_, shared) = controlled();
        assert_eq!(shared.paddle.width_mask, PADDLE_LEFTMOST);
        assert_eq!(shared.paddle.position, PADDLE_HOME);
    }

    #[test]
    fn test_joystick_moves_paddle() {
        let (mut machine, mut shared) = controlled();
        machine.tick(&mut shared, &inputs(900, false));
        assert_eq!(shared.paddle.position, 0x04);
        assert_eq!(shared.paddle.width_mask, 0x0E);
        // Within the dead zone
        machine.tick(&mut shared, &inputs(CENTER + 100, false));
        assert_eq!(shared.paddle.position, 0x04);
        machine.tick(&mut shared, &inputs(50, false));
        assert_eq!(shared.paddle.position, 0x02);
        machine.tick(&mut shared, &inputs(0, false));
        assert_eq!(shared.paddle.position, 0x02);
    }

    #[test]
    fn test_reset_button_holds_paddle_dark() {
        let (mut machine, mut shared) = controlled();
        machine.tick(&mut shared, &inputs(CENTER, true)); // reset sampled
        machine.tick(&mut shared, &inputs(CENTER, true));
        assert_eq!(machine.state, PaddleState::Reset);
        assert_eq!(shared.paddle.width_mask, 0);
        assert!(shared.signals.ball_reset_pending);

        machine.tick(&mut shared, &inputs(CENTER, false)); // release sampled
        machine.tick(&mut shared, &inputs(CENTER, false));
        assert_eq!(machine.state, PaddleState::Setup);
        assert_eq!(shared.paddle.width_mask, PADDLE_LEFTMOST);
    }

    #[test]
    fn test_loss_beats_reset() {
        let signals = Signals {
            reset: true,
            lost: true,
            ..Default::default()
        };
        assert_eq!(transition(PaddleState::Control, &signals), PaddleState::Wait);
    }

    #[test]
    fn test_steer_dead_zone_edges() {
        let joystick = Joystick {
            center: 512,
            dead_zone: 100,
        };
        assert_eq!(joystick.steer(612), Steer::Hold);
        assert_eq!(joystick.steer(613), Steer::Right);
        assert_eq!(joystick.steer(412), Steer::Hold);
        assert_eq!(joystick.steer(411), Steer::Left);
    }

    proptest! {
        #[test]
        fn prop_paddle_round_trip(start in 0u32..3, moves in 0usize..4) {
            let mut paddle = Paddle {
                position: PADDLE_HOME << start,
                width_mask: PADDLE_LEFTMOST << start,
            };
            let original = paddle;
            let moves = moves.min(5 - start as usize);
            for _ in 0..moves {
                prop_assert!(paddle.move_right());
            }
            for _ in 0..moves {
                prop_assert!(paddle.move_left());
            }
            prop_assert_eq!(paddle, original);
        }
    }

    #[test]
    fn test_three_right_three_left_round_trip() {
        let (mut machine, mut shared) = controlled();
        let original = shared.paddle;
        for _ in 0..3 {
            machine.tick(&mut shared, &inputs(1023, false));
        }
        assert_eq!(shared.paddle.position, 0x10);
        for _ in 0..3 {
            machine.tick(&mut shared, &inputs(0, false));
        }
        assert_eq!(shared.paddle, original);
    }
}
