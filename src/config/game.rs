//! Game configuration constants.
//!
//! This module defines the default gameplay parameters such as board size,
//! round duration, countdown length and the reserved admin name.

use std::time::Duration;

/// Default number of rows in the game grid.
pub const DEFAULT_ROWS: usize = 10;

/// Default number of columns in the game grid.
pub const DEFAULT_COLS: usize = 20;

/// Default duration of a round, in seconds.
pub const DEFAULT_ROUND_DURATION: u32 = 120;

/// First value emitted by the pre-round countdown.
pub const COUNTDOWN_START: u32 = 3;

/// Period of both the countdown and the round timer.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// A selection clears only when its cells add up to exactly this value.
pub const TARGET_SUM: u32 = 10;

/// Display names are truncated to this many characters.
pub const MAX_NAME_LEN: usize = 15;

/// Players named exactly this get the admin capability.
pub const ADMIN_NAME: &str = "yiuyiu";

/// Accepted bounds for admin settings updates.
pub const MAX_ROWS: usize = 50;
pub const MAX_COLS: usize = 50;
pub const MAX_ROUND_DURATION: u32 = 3600;
