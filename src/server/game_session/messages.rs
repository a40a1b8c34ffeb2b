use std::collections::BTreeMap;

use actix::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game::grid::Grid;
use crate::game::types::{
    Area, GameMode, LeaderboardEntry, Phase, PlayerId, PlayerSummary, Selection, Settings,
    SettingsPatch,
};

/// Message: a connected player sent an action.
#[derive(Message)]
#[rtype(result = "()")]
pub struct ProcessClientMessage {
    pub msg: ClientAction,
    pub player_id: PlayerId,
}

// Client -> server
#[derive(Deserialize, Clone, Debug)]
#[serde(tag = "action", content = "data", rename_all = "kebab-case")]
pub enum ClientAction {
    Rename(String),
    ToggleReady,
    SetReady(bool),
    Start,
    Select(Selection),
    ToggleMode,
    UpdateSettings(SettingsPatch),
    Kick(PlayerId),
    Reset,
    Ping,
}

/// Full snapshot sent once to every new connection.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InitState {
    /// The board this player plays on. Empty outside a round.
    pub grid: Grid,
    pub mode: GameMode,
    pub phase: Phase,
    pub timer: u32,
    pub my_id: PlayerId,
    pub players: Vec<PlayerSummary>,
    pub settings: Settings,
}

// Server -> client
#[derive(Message, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[rtype(result = "()")]
#[serde(tag = "action", content = "data", rename_all = "kebab-case")]
pub enum ServerMessage {
    InitState(InitState),
    PlayerListUpdate(Vec<PlayerSummary>),
    GridUpdate {
        grid: Grid,
    },
    ScoreUpdate(BTreeMap<PlayerId, u32>),
    TimerUpdate(u32),
    Countdown(u32),
    GameStart {
        grid: Grid,
        timer: u32,
    },
    GameOver(Vec<LeaderboardEntry>),
    SettingsUpdate(Settings),
    ModeUpdate(GameMode),
    BlockCleared {
        #[serde(rename = "playerName")]
        player_name: String,
        area: Area,
    },
    /// Number of rectangles on the shared board that still sum to the target.
    RectangleCount(usize),
    /// Sent right before the server closes a kicked connection.
    Kicked {
        reason: String,
    },
}
