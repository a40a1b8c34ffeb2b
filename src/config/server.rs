//! Runtime configuration loaded from the environment.
//!
//! Every value has a default, so the server starts with no environment at all.
//! Values that fail to parse or fall outside the allowed range are ignored
//! with a warning.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use log::warn;

use crate::config::game::{
    ADMIN_NAME, DEFAULT_COLS, DEFAULT_ROUND_DURATION, DEFAULT_ROWS, MAX_COLS,
    MAX_ROUND_DURATION, MAX_ROWS, TICK_INTERVAL,
};
use crate::game::types::Settings;

/// Settings for the game coordinator.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Board size and round duration used until an admin changes them.
    pub initial_settings: Settings,
    /// Reserved name granting the admin capability.
    pub admin_name: String,
    /// Period of the countdown and round timers.
    pub tick_interval: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_settings: Settings {
                rows: DEFAULT_ROWS,
                cols: DEFAULT_COLS,
                duration: DEFAULT_ROUND_DURATION,
            },
            admin_name: ADMIN_NAME.to_string(),
            tick_interval: TICK_INTERVAL,
        }
    }
}

/// Settings for the HTTP listener and the game.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub game: GameConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            game: GameConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Build the configuration from `HOST`, `PORT`, `GRID_ROWS`, `GRID_COLS`,
    /// `ROUND_DURATION` and `ADMIN_NAME`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("HOST") {
            config.host = v;
        }
        if let Some(v) = parse_var(&lookup, "PORT") {
            config.port = v;
        }
        if let Some(v) = parse_bounded(&lookup, "GRID_ROWS", MAX_ROWS) {
            config.game.initial_settings.rows = v;
        }
        if let Some(v) = parse_bounded(&lookup, "GRID_COLS", MAX_COLS) {
            config.game.initial_settings.cols = v;
        }
        if let Some(v) = parse_bounded(&lookup, "ROUND_DURATION", MAX_ROUND_DURATION) {
            config.game.initial_settings.duration = v;
        }
        if let Some(v) = lookup("ADMIN_NAME") {
            config.game.admin_name = v;
        }

        config
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("[Config] Ignoring {}={:?}: not a valid number", key, raw);
            None
        }
    }
}

/// Same limits as an admin settings change: `1..=max`.
fn parse_bounded<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, max: T) -> Option<T>
where
    T: FromStr + PartialOrd + Display + From<u8>,
{
    let v = parse_var::<T>(lookup, key)?;
    if v < T::from(1) || v > max {
        warn!("[Config] Ignoring {}={}: must be between 1 and {}", key, v, max);
        return None;
    }
    Some(v)
}
