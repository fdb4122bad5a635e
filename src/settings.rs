//! Controller settings
//!
//! Cadences, level progression and joystick calibration. Persisted as JSON
//! next to the binary; every field falls back to its default when missing.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Controller settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Scheduling ===
    /// Ticks between paddle/game runs
    pub fast_period: u16,
    /// Wall-clock length of one tick
    pub tick_period_ms: u64,

    // === Levels ===
    /// Ticks between ball cycles on the first level
    pub initial_ball_period: u16,
    /// Period reduction per cleared board
    pub ball_period_step: u16,
    /// Clearing the board at or below this period wins
    pub ball_period_floor: u16,

    // === Joystick ===
    /// Reading at rest
    pub joystick_center: u16,
    /// Readings this close to center hold the paddle still
    pub joystick_dead_zone: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fast_period: DEFAULT_FAST_PERIOD,
            tick_period_ms: 1,

            initial_ball_period: DEFAULT_BALL_PERIOD,
            ball_period_step: DEFAULT_BALL_PERIOD_STEP,
            ball_period_floor: DEFAULT_BALL_PERIOD_FLOOR,

            joystick_center: DEFAULT_JOYSTICK_CENTER,
            joystick_dead_zone: DEFAULT_JOYSTICK_DEAD_ZONE,
        }
    }
}

impl Settings {
    /// Copy with out-of-range values pulled back into range
    pub fn sanitized(&self) -> Self {
        let mut s = *self;
        s.fast_period = s.fast_period.max(1);
        s.initial_ball_period = s.initial_ball_period.max(1);
        s.ball_period_step = s.ball_period_step.max(1);
        s.ball_period_floor = s.ball_period_floor.clamp(1, s.initial_ball_period);
        s.joystick_center = s.joystick_center.min(1023);
        if s != *self {
            log::warn!("Settings adjusted: {:?} -> {:?}", self, s);
        }
        s
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Cannot read {}: {}", path.display(), e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings as JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
