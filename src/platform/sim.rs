//! Host board and demo player
//!
//! `SimBoard` stands in for the real hardware: inputs are set directly, the
//! LED matrix is decoded into a frame buffer, and the score link records
//! every byte it accepts. `DemoPlayer` drives the inputs like a person would.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{AnalogInput, ButtonInput, MatrixDriver, ScoreLink, TickSource, ToneOutput};
use crate::audio::ToneGenerator;
use crate::consts::*;
use crate::sim::SharedState;
use crate::sim::ball::BallState;
use crate::sim::game::GamePhase;
use crate::sim::state::column_index;

/// Writes older than one full refresh no longer count as lit
const REFRESH_SLICES: u64 = 5;

/// Simulated board
#[derive(Debug, Clone)]
pub struct SimBoard {
    joystick: u16,
    start: bool,
    shoot: bool,
    tone: ToneGenerator,
    /// Lit columns per row (row index = bit position of the row select)
    rows: [u8; 8],
    /// Write count at which each row was last refreshed
    row_written: [Option<u64>; 8],
    matrix_writes: u64,
    sent: Vec<u8>,
    link_busy_ticks: u32,
    link_busy_remaining: u32,
    ticks: u64,
    /// Sleep this long per tick (None = run as fast as possible)
    tick_period: Option<Duration>,
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBoard {
    pub fn new() -> Self {
        Self {
            joystick: DEFAULT_JOYSTICK_CENTER,
            start: false,
            shoot: false,
            tone: ToneGenerator::new(),
            rows: [0; 8],
            row_written: [None; 8],
            matrix_writes: 0,
            sent: Vec::new(),
            link_busy_ticks: 0,
            link_busy_remaining: 0,
            ticks: 0,
            tick_period: None,
        }
    }

    /// Pace ticks in wall-clock time
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = Some(period);
        self
    }

    pub fn set_joystick(&mut self, reading: u16) {
        self.joystick = reading.min(1023);
    }

    pub fn set_start(&mut self, pressed: bool) {
        self.start = pressed;
    }

    pub fn set_shoot(&mut self, pressed: bool) {
        self.shoot = pressed;
    }

    /// Ticks the link stays busy after accepting a byte
    pub fn set_link_busy_ticks(&mut self, ticks: u32) {
        self.link_busy_ticks = ticks;
    }

    pub fn tone(&self) -> &ToneGenerator {
        &self.tone
    }

    pub fn sent_scores(&self) -> &[u8] {
        &self.sent
    }

    pub fn matrix_writes(&self) -> u64 {
        self.matrix_writes
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Currently lit columns of each row, top row first
    pub fn frame(&self) -> [u8; 8] {
        let mut frame = [0u8; 8];
        for (row, lit) in frame.iter_mut().enumerate() {
            if let Some(at) = self.row_written[row] {
                if self.matrix_writes - at < REFRESH_SLICES {
                    *lit = self.rows[row];
                }
            }
        }
        frame
    }

    /// Frame as text, column 0 on the left
    pub fn frame_ascii(&self) -> String {
        let mut out = String::with_capacity(8 * 9);
        for lit in self.frame() {
            for col in 0..8 {
                out.push(if lit & (1 << col) != 0 { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}

impl AnalogInput for SimBoard {
    fn read(&mut self) -> u16 {
        self.joystick
    }
}

impl ButtonInput for SimBoard {
    fn start_pressed(&mut self) -> bool {
        self.start
    }

    fn shoot_pressed(&mut self) -> bool {
        self.shoot
    }
}

impl ToneOutput for SimBoard {
    fn set_frequency(&mut self, hz: f32) {
        self.tone.set_frequency(hz);
    }
}

impl MatrixDriver for SimBoard {
    fn write_slice(&mut self, row_select: u8, data: u8) {
        self.matrix_writes += 1;
        // A hidden ball selects no row
        if row_select == 0 {
            return;
        }
        let row = column_index(row_select) as usize;
        self.rows[row] = !data;
        self.row_written[row] = Some(self.matrix_writes - 1);
    }
}

impl ScoreLink for SimBoard {
    fn is_ready(&self) -> bool {
        self.link_busy_remaining == 0
    }

    fn send(&mut self, score: u8) {
        self.sent.push(score);
        self.link_busy_remaining = self.link_busy_ticks;
        log::debug!("score link <- {}", score);
    }
}

impl TickSource for SimBoard {
    fn wait_for_tick(&mut self) {
        if let Some(period) = self.tick_period {
            std::thread::sleep(period);
        }
        self.ticks += 1;
        self.link_busy_remaining = self.link_busy_remaining.saturating_sub(1);
    }
}

/// Button taps must outlast one fast period so they get sampled, and end
/// within two so the start button is up again once the paddle reaches
/// Control and starts reading it as reset.
pub const TAP_TICKS: u32 = 150;

/// Seeded autoplayer for the native runner and soak tests
#[derive(Debug, Clone)]
pub struct DemoPlayer {
    rng: Pcg32,
    /// Chance per tick of a random joystick reading
    jitter: f64,
    start_hold: u32,
    shoot_hold: u32,
    cooldown: u32,
}

impl DemoPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            jitter: 0.05,
            start_hold: 0,
            shoot_hold: 0,
            cooldown: 0,
        }
    }

    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }

    /// Set the board inputs for the coming tick
    pub fn update(&mut self, board: &mut SimBoard, shared: &SharedState, game: GamePhase, ball: BallState) {
        self.start_hold = self.start_hold.saturating_sub(1);
        self.shoot_hold = self.shoot_hold.saturating_sub(1);
        self.cooldown = self.cooldown.saturating_sub(1);

        if self.cooldown == 0 {
            if matches!(game, GamePhase::Wait | GamePhase::Lost | GamePhase::Won) {
                log::debug!("demo: start ({:?})", game);
                self.start_hold = TAP_TICKS;
                self.cooldown = 4 * TAP_TICKS;
            } else if ball == BallState::Setup && game != GamePhase::Reset {
                log::debug!("demo: shoot");
                self.shoot_hold = TAP_TICKS;
                self.cooldown = 4 * TAP_TICKS;
            }
        }

        board.set_start(self.start_hold > 0);
        board.set_shoot(self.shoot_hold > 0);

        let reading = if self.rng.random_bool(self.jitter) {
            self.rng.random_range(0..=1023)
        } else {
            track(shared.paddle.position, shared.ball.x)
        };
        board.set_joystick(reading);
    }
}

/// Joystick reading that steers the paddle under the ball
fn track(paddle: u8, ball: u8) -> u16 {
    if ball == 0 || paddle == 0 || ball == paddle {
        DEFAULT_JOYSTICK_CENTER
    } else if ball > paddle {
        1023
    } else {
        0
    }
}
