//! Game state machine
//!
//! Owns level progression: refills the board, speeds the ball up after each
//! cleared board, detects win/loss, and reports the score to the display unit.

use serde::{Deserialize, Serialize};

use super::state::{SharedState, Signals};
use crate::Settings;
use crate::audio::SoundEffect;
use crate::platform::{Inputs, ScoreLink, ToneOutput, send_score};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Init,
    /// Waiting for the start button
    Wait,
    /// Board filled, waiting for the first shot
    Setup,
    /// Game running
    Status,
    /// Scores and flags cleared while the reset button is held
    Reset,
    /// Run ended, waiting for start
    Lost,
    /// Board cleared at top speed, waiting for start
    Won,
}

/// Next game phase. Later checks win: victory over loss over reset.
pub fn transition(phase: GamePhase, signals: &Signals) -> GamePhase {
    match phase {
        GamePhase::Init => GamePhase::Wait,
        GamePhase::Wait if signals.start => GamePhase::Setup,
        GamePhase::Wait => GamePhase::Wait,
        GamePhase::Setup if signals.shot => GamePhase::Status,
        GamePhase::Setup => GamePhase::Setup,
        GamePhase::Status if signals.victory => GamePhase::Won,
        GamePhase::Status if signals.lost => GamePhase::Lost,
        GamePhase::Status if signals.reset => GamePhase::Reset,
        GamePhase::Status => GamePhase::Status,
        GamePhase::Reset if !signals.reset => GamePhase::Setup,
        GamePhase::Reset => GamePhase::Reset,
        GamePhase::Lost | GamePhase::Won if signals.start => GamePhase::Reset,
        GamePhase::Lost => GamePhase::Lost,
        GamePhase::Won => GamePhase::Won,
    }
}

/// Ball speed progression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Levels {
    pub initial_period: u16,
    pub step: u16,
    pub floor: u16,
}

impl Levels {
    /// Faster period for the next level, or `None` once the floor is reached
    pub fn next_period(&self, period: u16) -> Option<u16> {
        (period > self.floor).then(|| period.saturating_sub(self.step))
    }
}

#[derive(Debug, Clone)]
pub struct GameMachine {
    pub phase: GamePhase,
    levels: Levels,
    /// Levels cleared since the last reset
    pub level: u32,
}

impl GameMachine {
    pub fn new(settings: &Settings) -> Self {
        Self {
            phase: GamePhase::Init,
            levels: Levels {
                initial_period: settings.initial_ball_period,
                step: settings.ball_period_step,
                floor: settings.ball_period_floor,
            },
            level: 0,
        }
    }

    pub fn tick<B: ToneOutput + ScoreLink + ?Sized>(
        &mut self,
        shared: &mut SharedState,
        inputs: &Inputs,
        board: &mut B,
    ) {
        let next = transition(self.phase, &shared.signals);
        if next != self.phase {
            log::debug!("game: {:?} -> {:?}", self.phase, next);
            match next {
                GamePhase::Lost => log::info!("game over, score {}", shared.score),
                GamePhase::Won => log::info!("victory, score {}", shared.score),
                _ => {}
            }
        }
        self.phase = next;

        match self.phase {
            GamePhase::Init | GamePhase::Wait => {}
            GamePhase::Setup => shared.bricks.fill(),
            GamePhase::Status => self.status(shared, inputs, board),
            GamePhase::Lost => SoundEffect::GameOver.play(board),
            GamePhase::Won => {
                SoundEffect::Silence.play(board);
                if shared.signals.final_send {
                    send_score(board, shared.score);
                }
                shared.signals.final_send = false;
            }
            GamePhase::Reset => {
                shared.signals.reset = inputs.start_button;
                if shared.signals.reset {
                    shared.signals.ball_reset_pending = true;
                }
                shared.signals.lost = false;
                shared.signals.victory = false;
                shared.score = 0;
                shared.ball_speed_period = self.levels.initial_period;
                self.level = 0;
                send_score(board, shared.score);
            }
        }
    }

    fn status<L: ScoreLink + ?Sized>(&mut self, shared: &mut SharedState, inputs: &Inputs, link: &mut L) {
        shared.signals.reset = inputs.start_button;

        if shared.bricks.is_empty() {
            match self.levels.next_period(shared.ball_speed_period) {
                Some(period) => {
                    shared.ball_speed_period = period;
                    shared.bricks.fill();
                    shared.signals.setup = true;
                    self.level += 1;
                    log::info!(
                        "level {} cleared, ball period now {} ticks",
                        self.level,
                        period
                    );
                    send_score(link, shared.score);
                }
                None => {
                    shared.signals.victory = true;
                    shared.signals.final_send = true;
                }
            }
        }

        if shared.brick_hits > 0 {
            send_score(link, shared.score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::sim::SimBoard;
    use crate::sim::state::{Bricks, Layer};

    fn in_status(period: u16) -> (GameMachine, SharedState, SimBoard) {
        let settings = Settings::default();
        let mut machine = GameMachine::new(&settings);
        machine.phase = GamePhase::Status;
        let mut shared = SharedState::new(settings.initial_ball_period);
        shared.ball_speed_period = period;
        (machine, shared, SimBoard::new())
    }

    #[test]
    fn test_level_advance() {
        let (mut machine, mut shared, mut board) = in_status(200);
        shared.score = 24;
        machine.tick(&mut shared, &Inputs::default(), &mut board);

        assert_eq!(shared.ball_speed_period, 150);
        for layer in Layer::ALL {
            assert_eq!(shared.bricks.mask(layer), 0xFF);
        }
        assert!(shared.signals.setup);
        assert!(!shared.signals.victory);
        assert_eq!(board.sent_scores(), &[24]);
    }

    #[test]
    fn test_victory_at_floor() {
        let (mut machine, mut shared, mut board) = in_status(150);
        machine.tick(&mut shared, &Inputs::default(), &mut board);

        assert!(shared.signals.victory);
        assert!(shared.signals.final_send);
        assert_eq!(shared.ball_speed_period, 150);
        assert!(shared.bricks.is_empty());

        // Won sends the final score once
        shared.score = 72;
        machine.tick(&mut shared, &Inputs::default(), &mut board);
        assert_eq!(machine.phase, GamePhase::Won);
        assert!(!shared.signals.final_send);
        machine.tick(&mut shared, &Inputs::default(), &mut board);
        assert_eq!(board.sent_scores(), &[72]);
    }

    #[test]
    fn test_brick_hit_sends_score_when_ready() {
        let (mut machine, mut shared, mut board) = in_status(250);
        shared.bricks = Bricks::from_masks(0xFF, 0, 0);
        shared.brick_hits = 1;
        shared.score = 5;
        board.set_link_busy_ticks(3);

        machine.tick(&mut shared, &Inputs::default(), &mut board);
        assert_eq!(board.sent_scores(), &[5]);

        // Link is busy after a send: the next update is dropped, not queued
        shared.score = 6;
        machine.tick(&mut shared, &Inputs::default(), &mut board);
        assert_eq!(board.sent_scores(), &[5]);
    }

    #[test]
    fn test_lost_plays_game_over_tone() {
        let (mut machine, mut shared, mut board) = in_status(250);
        shared.bricks.fill();
        shared.signals.lost = true;
        machine.tick(&mut shared, &Inputs::default(), &mut board);
        assert_eq!(machine.phase, GamePhase::Lost);
        assert_eq!(board.tone().frequency(), 55.0);

        shared.signals.start = true;
        machine.tick(&mut shared, &Inputs::default(), &mut board);
        assert_eq!(machine.phase, GamePhase::Reset);
    }

    #[test]
    fn test_reset_clears_score_and_speed() {
        let (mut machine, mut shared, mut board) = in_status(150);
        shared.bricks.fill();
        shared.score = 40;
        shared.signals.reset = true;
        let held = Inputs {
            start_button: true,
            ..Default::default()
        };
        machine.tick(&mut shared, &held, &mut board);
        assert_eq!(machine.phase, GamePhase::Reset);
        assert_eq!(shared.score, 0);
        assert_eq!(shared.ball_speed_period, 250);
        assert!(shared.signals.ball_reset_pending);
        assert_eq!(board.sent_scores(), &[0]);

        machine.tick(&mut shared, &Inputs::default(), &mut board);
        machine.tick(&mut shared, &Inputs::default(), &mut board);
        assert_eq!(machine.phase, GamePhase::Setup);
    }

    #[test]
    fn test_next_period() {
        let levels = Levels {
            initial_period: 250,
            step: 50,
            floor: 150,
        };
        assert_eq!(levels.next_period(250), Some(200));
        assert_eq!(levels.next_period(200), Some(150));
        assert_eq!(levels.next_period(150), None);
    }
}
