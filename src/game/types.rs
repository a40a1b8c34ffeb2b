use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Connection-scoped player identity.
pub type PlayerId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Every player clears their own copy of the round grid.
    Normal,
    /// All players clear one shared grid.
    Capture,
}

impl GameMode {
    pub fn toggled(self) -> Self {
        match self {
            GameMode::Normal => GameMode::Capture,
            GameMode::Capture => GameMode::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Waiting,
    Starting,
    Playing,
}

/// Board size and round length, applied at the next round start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub rows: usize,
    pub cols: usize,
    /// Round duration in seconds.
    pub duration: u32,
}

/// Partial settings update sent by an admin. Absent fields keep their value.
///
/// Browser form inputs arrive as strings, so each field accepts either a JSON
/// number or a string; anything else is kept as `Invalid` and rejected later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SettingsPatch {
    #[serde(default, deserialize_with = "lenient_int")]
    pub rows: Option<RawInt>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub cols: Option<RawInt>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub duration: Option<RawInt>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawInt {
    Value(i64),
    Invalid,
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<RawInt>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        serde_json::Value::Number(n) => n.as_i64().map_or(RawInt::Invalid, RawInt::Value),
        serde_json::Value::String(s) => s.trim().parse().map_or(RawInt::Invalid, RawInt::Value),
        _ => RawInt::Invalid,
    }))
}

/// Inclusive rectangle submitted by a player. Corners may come in any order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub r1: i64,
    pub c1: i64,
    pub r2: i64,
    pub c2: i64,
}

/// Selection with ordered corners, known to lie inside a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub r1: usize,
    pub c1: usize,
    pub r2: usize,
    pub c2: usize,
}

impl Selection {
    /// Order the corners and check them against a `rows x cols` board.
    pub fn normalize(&self, rows: usize, cols: usize) -> Option<Area> {
        let in_rows = |v: i64| v >= 0 && (v as u64) < rows as u64;
        let in_cols = |v: i64| v >= 0 && (v as u64) < cols as u64;
        if !(in_rows(self.r1) && in_rows(self.r2) && in_cols(self.c1) && in_cols(self.c2)) {
            return None;
        }
        Some(Area {
            r1: self.r1.min(self.r2) as usize,
            c1: self.c1.min(self.c2) as usize,
            r2: self.r1.max(self.r2) as usize,
            c2: self.c1.max(self.c2) as usize,
        })
    }
}

/// Lobby view of a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    pub is_ready: bool,
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
}
