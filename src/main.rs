//! LED Breakout entry point
//!
//! Runs the controller headless on the simulated board with the demo player
//! at the joystick.
//!
//! Usage: `led-breakout [settings.json] [ticks] [seed] [--realtime]`

use std::path::Path;
use std::time::Duration;

use led_breakout::platform::sim::{DemoPlayer, SimBoard};
use led_breakout::{Scheduler, Settings};

const DEFAULT_TICKS: u64 = 200_000;

fn main() {
    env_logger::init();
    log::info!("LED Breakout (native) starting...");

    let mut realtime = false;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--realtime" {
            realtime = true;
        } else {
            positional.push(arg);
        }
    }

    let settings = match positional.first() {
        Some(path) => Settings::load(Path::new(path)),
        None => Settings::default(),
    };
    let ticks = positional
        .get(1)
        .and_then(|t| t.parse().ok())
        .unwrap_or(DEFAULT_TICKS);
    let seed = positional.get(2).and_then(|s| s.parse().ok()).unwrap_or(12345);

    let mut board = SimBoard::new();
    board.set_link_busy_ticks(2);
    if realtime {
        board = board.with_tick_period(Duration::from_millis(settings.tick_period_ms));
    }

    let mut scheduler = Scheduler::new(board, &settings);
    let mut demo = DemoPlayer::new(seed);
    log::info!("Running {} ticks with seed {}", ticks, seed);

    let mut reported = 0;
    for _ in 0..ticks {
        demo.update(
            &mut scheduler.board,
            &scheduler.shared,
            scheduler.game.phase,
            scheduler.ball.state,
        );
        scheduler.tick();

        let sent = scheduler.board.sent_scores();
        for score in &sent[reported..] {
            log::info!("score -> display: {}", score);
        }
        reported = sent.len();
    }

    log::info!(
        "Finished after {} ticks: phase {:?}, score {}, level {}",
        scheduler.time_ticks,
        scheduler.game.phase,
        scheduler.shared.score,
        scheduler.game.level
    );
    println!("{}", scheduler.board.frame_ascii());
    match serde_json::to_string_pretty(&scheduler.shared) {
        Ok(json) => println!("{}", json),
        Err(e) => log::warn!("Cannot serialize final state: {}", e),
    }
}
