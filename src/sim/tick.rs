//! Fixed-period cooperative scheduler
//!
//! One loop drives every machine from a single periodic tick. Paddle and game
//! logic run on a fixed cadence; the ball runs on its own, variable cadence so
//! levels can speed it up without changing how often input is sampled.

use super::ball::BallMachine;
use super::game::GameMachine;
use super::paddle::PaddleMachine;
use super::state::SharedState;
use crate::Settings;
use crate::platform::{Board, Inputs};
use crate::renderer::RenderMachine;

/// Which machines ran during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Paddle and game ran
    pub fast_path: bool,
    /// Ball ran (on either path)
    pub ball: bool,
}

pub struct Scheduler<B: Board> {
    pub board: B,
    pub shared: SharedState,
    pub paddle: PaddleMachine,
    pub ball: BallMachine,
    pub game: GameMachine,
    pub renderer: RenderMachine,
    fast_period: u16,
    fast_counter: u16,
    slow_counter: u16,
    /// Ticks since start
    pub time_ticks: u64,
}

impl<B: Board> Scheduler<B> {
    pub fn new(board: B, settings: &Settings) -> Self {
        let settings = settings.sanitized();
        Self {
            board,
            shared: SharedState::new(settings.initial_ball_period),
            paddle: PaddleMachine::new(&settings),
            ball: BallMachine::new(),
            game: GameMachine::new(&settings),
            renderer: RenderMachine::new(),
            fast_period: settings.fast_period,
            fast_counter: 0,
            slow_counter: 0,
            time_ticks: 0,
        }
    }

    /// Run one tick and then block until the tick source fires again
    pub fn tick(&mut self) -> TickReport {
        let report = self.run_machines();
        self.board.wait_for_tick();
        self.advance_counters();
        report
    }

    /// Run one tick without waiting on the tick source
    pub fn step(&mut self) -> TickReport {
        let report = self.run_machines();
        self.advance_counters();
        report
    }

    /// Run `ticks` ticks, waiting on the tick source between each
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    fn run_machines(&mut self) -> TickReport {
        let mut report = TickReport::default();
        let inputs = Inputs::sample(&mut self.board);

        // Order matters: the ball reads the paddle position written this tick,
        // and the game reads the ball's brick hits from this tick.
        if self.fast_counter >= self.fast_period {
            self.paddle.tick(&mut self.shared, &inputs);
            if self.shared.signals.setup {
                self.ball.tick(&mut self.shared, &inputs, &mut self.board);
                report.ball = true;
            }
            self.game.tick(&mut self.shared, &inputs, &mut self.board);
            self.fast_counter = 0;
            report.fast_path = true;
        } else if self.slow_counter >= self.shared.ball_speed_period && !self.shared.signals.setup {
            self.ball.tick(&mut self.shared, &inputs, &mut self.board);
            self.slow_counter = 0;
            report.ball = true;
        }

        self.renderer.tick(&self.shared, &mut self.board);
        report
    }

    fn advance_counters(&mut self) {
        self.fast_counter = self.fast_counter.saturating_add(1);
        self.slow_counter = self.slow_counter.saturating_add(1);
        self.time_ticks += 1;
    }
}
