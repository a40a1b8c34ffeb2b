//! Authoritative session state.
//!
//! `GameState` owns the phase machine (waiting -> starting -> playing ->
//! waiting), the player registry and the round grids. Every operation either
//! returns the messages to fan out, or a `Rejection` meaning nothing changed.
//! Timers live outside; operations tell the owner what to do with its single
//! timer handle through `TimerCommand`.

use std::collections::BTreeMap;

use log::{debug, info};

use crate::config::game::{COUNTDOWN_START, MAX_COLS, MAX_ROUND_DURATION, MAX_ROWS, TARGET_SUM};
use crate::config::server::GameConfig;
use crate::game::entities::PlayerRegistry;
use crate::game::grid::Grid;
use crate::game::rejection::Rejection;
use crate::game::systems::evaluate_selection;
use crate::game::types::{
    GameMode, LeaderboardEntry, Phase, PlayerId, RawInt, Selection, Settings, SettingsPatch,
};
use crate::server::game_session::messages::{InitState, ServerMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    All,
    Player(PlayerId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub to: Audience,
    pub msg: ServerMessage,
}

/// What the owner must do with the repeating tick timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimerCommand {
    #[default]
    Keep,
    /// Cancel any running timer and install a fresh one.
    Restart,
    Stop,
}

#[derive(Debug, Default, PartialEq)]
pub struct Effects {
    pub outbound: Vec<Outbound>,
    pub timer: TimerCommand,
}

impl Effects {
    fn broadcast(&mut self, msg: ServerMessage) {
        self.outbound.push(Outbound { to: Audience::All, msg });
    }

    fn send_to(&mut self, id: PlayerId, msg: ServerMessage) {
        self.outbound.push(Outbound { to: Audience::Player(id), msg });
    }

    fn extend(&mut self, other: Effects) {
        self.outbound.extend(other.outbound);
        if other.timer != TimerCommand::Keep {
            self.timer = other.timer;
        }
    }
}

pub type ActionResult = Result<Effects, Rejection>;

pub struct GameState {
    pub mode: GameMode,
    pub phase: Phase,
    /// Seconds left in the current round.
    pub timer: u32,
    /// Next countdown value while starting.
    pub countdown: u32,
    /// Applied at the next round start.
    pub settings: Settings,
    pub players: PlayerRegistry,
    /// Board every player started the current round with.
    round_grid: Grid,
    /// The single board of a capture round.
    shared_grid: Grid,
}

impl GameState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            mode: GameMode::Normal,
            phase: Phase::Waiting,
            timer: config.initial_settings.duration,
            countdown: 0,
            settings: config.initial_settings,
            players: PlayerRegistry::new(config.admin_name.clone()),
            round_grid: Grid::default(),
            shared_grid: Grid::default(),
        }
    }

    /// Register a new connection and greet it with a full snapshot.
    ///
    /// Players joining mid-round get the round's starting board in normal mode,
    /// or play the shared board in capture mode.
    pub fn connect(&mut self, id: PlayerId, name: Option<&str>) -> Effects {
        let in_round = self.phase == Phase::Playing;
        let private_grid = (in_round && self.mode == GameMode::Normal).then(|| self.round_grid.clone());

        let player = self.players.register(id);
        if let Some(grid) = private_grid {
            player.grid = grid;
        }
        if let Some(name) = name {
            self.players.rename(id, name);
        }
        info!("[GameSession] Player {} connected ({} online)", id, self.players.len());

        let mut effects = Effects::default();
        effects.send_to(id, ServerMessage::InitState(self.snapshot_for(id)));
        effects.broadcast(self.score_update());
        effects.broadcast(self.player_list_update());
        effects
    }

    pub fn disconnect(&mut self, id: PlayerId) -> ActionResult {
        self.players.remove(id).ok_or(Rejection::UnknownPlayer(id))?;
        info!("[GameSession] Player {} disconnected ({} online)", id, self.players.len());

        let mut effects = Effects::default();
        effects.broadcast(self.score_update());
        effects.broadcast(self.player_list_update());
        Ok(effects)
    }

    pub fn rename(&mut self, id: PlayerId, name: &str) -> ActionResult {
        let player = self.players.rename(id, name).ok_or(Rejection::UnknownPlayer(id))?;
        if player.is_admin {
            info!("[GameSession] Player {} claimed the admin name", id);
        }
        let mut effects = Effects::default();
        effects.broadcast(self.player_list_update());
        Ok(effects)
    }

    pub fn toggle_ready(&mut self, id: PlayerId) -> ActionResult {
        self.require_phase(Phase::Waiting)?;
        self.players.toggle_ready(id).ok_or(Rejection::UnknownPlayer(id))?;
        let mut effects = Effects::default();
        effects.broadcast(self.player_list_update());
        Ok(effects)
    }

    pub fn set_ready(&mut self, id: PlayerId, ready: bool) -> ActionResult {
        self.require_phase(Phase::Waiting)?;
        self.players.set_ready(id, ready).ok_or(Rejection::UnknownPlayer(id))?;
        let mut effects = Effects::default();
        effects.broadcast(self.player_list_update());
        Ok(effects)
    }

    /// Begin the countdown if every connected player is ready.
    pub fn request_start(&mut self, id: PlayerId) -> ActionResult {
        self.players.get(id).ok_or(Rejection::UnknownPlayer(id))?;
        self.require_phase(Phase::Waiting)?;
        if !self.players.all_ready() {
            return Err(Rejection::NotAllReady);
        }

        self.phase = Phase::Starting;
        self.countdown = COUNTDOWN_START;
        info!("[GameSession] Countdown started by {}", id);

        let mut effects = Effects {
            timer: TimerCommand::Restart,
            ..Effects::default()
        };
        effects.broadcast(ServerMessage::Countdown(self.countdown));
        Ok(effects)
    }

    /// Advance the countdown or the round timer by one tick.
    pub fn tick(&mut self) -> Effects {
        match self.phase {
            Phase::Waiting => Effects {
                timer: TimerCommand::Stop,
                ..Effects::default()
            },
            Phase::Starting => {
                self.countdown = self.countdown.saturating_sub(1);
                if self.countdown > 0 {
                    let mut effects = Effects::default();
                    effects.broadcast(ServerMessage::Countdown(self.countdown));
                    effects
                } else {
                    self.start_round()
                }
            }
            Phase::Playing => {
                let mut effects = Effects::default();
                if self.timer > 0 {
                    self.timer -= 1;
                    effects.broadcast(ServerMessage::TimerUpdate(self.timer));
                }
                if self.timer == 0 {
                    effects.extend(self.end_round());
                }
                effects
            }
        }
    }

    /// Start a round on a freshly generated board sized from the current settings.
    pub fn start_round(&mut self) -> Effects {
        let grid = Grid::generate(self.settings.rows, self.settings.cols);
        self.begin_round(grid)
    }

    /// Start a round on `grid`: reset scores and hand out boards for the current mode.
    pub fn begin_round(&mut self, grid: Grid) -> Effects {
        self.phase = Phase::Playing;
        self.countdown = 0;
        self.timer = self.settings.duration;

        match self.mode {
            GameMode::Capture => {
                self.shared_grid = grid.clone();
                for player in self.players.iter_mut() {
                    player.score = 0;
                    player.grid = Grid::default();
                }
            }
            GameMode::Normal => {
                self.shared_grid = Grid::default();
                for player in self.players.iter_mut() {
                    player.score = 0;
                    player.grid = grid.clone();
                }
            }
        }
        self.round_grid = grid;
        info!(
            "[GameSession] Round started: mode={:?} board={}x{} duration={}s players={}",
            self.mode,
            self.round_grid.rows(),
            self.round_grid.cols(),
            self.timer,
            self.players.len()
        );

        let mut effects = Effects {
            timer: TimerCommand::Restart,
            ..Effects::default()
        };
        effects.broadcast(ServerMessage::GameStart {
            grid: self.round_grid.clone(),
            timer: self.timer,
        });
        effects.broadcast(self.score_update());
        if self.mode == GameMode::Capture {
            effects.broadcast(self.rectangle_count());
        }
        effects
    }

    fn end_round(&mut self) -> Effects {
        self.phase = Phase::Waiting;
        let leaderboard = self.leaderboard();
        for player in self.players.iter_mut() {
            player.is_ready = false;
        }
        info!(
            "[GameSession] Round over, winner: {}",
            leaderboard.first().map_or("nobody", |e| e.name.as_str())
        );

        let mut effects = Effects {
            timer: TimerCommand::Stop,
            ..Effects::default()
        };
        effects.broadcast(ServerMessage::GameOver(leaderboard));
        effects.broadcast(self.player_list_update());
        effects
    }

    /// Players by score, highest first. Ties keep registration order.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .players
            .list()
            .iter()
            .map(|p| LeaderboardEntry {
                id: p.id,
                name: p.name.clone(),
                score: p.score,
            })
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries
    }

    /// Evaluate a rectangle selected by `id` and clear it if it sums to the target.
    pub fn select(&mut self, id: PlayerId, selection: &Selection) -> ActionResult {
        self.require_phase(Phase::Playing)?;
        if self.timer == 0 {
            return Err(Rejection::TimerExpired);
        }

        let mut effects = Effects::default();
        match self.mode {
            GameMode::Capture => {
                let player = self.players.get_mut(id).ok_or(Rejection::UnknownPlayer(id))?;
                if self.shared_grid.is_empty() {
                    return Err(Rejection::NoGrid);
                }
                let (area, cleared) = evaluate_selection(&mut self.shared_grid, selection)?;
                player.score += cleared;
                let player_name = player.name.clone();
                debug!("[GameSession] {} cleared {} cells on the shared board", id, cleared);

                effects.broadcast(ServerMessage::GridUpdate {
                    grid: self.shared_grid.clone(),
                });
                effects.broadcast(ServerMessage::BlockCleared { player_name, area });
                effects.broadcast(self.rectangle_count());
            }
            GameMode::Normal => {
                let player = self.players.get_mut(id).ok_or(Rejection::UnknownPlayer(id))?;
                if player.grid.is_empty() {
                    return Err(Rejection::NoGrid);
                }
                let (_, cleared) = evaluate_selection(&mut player.grid, selection)?;
                player.score += cleared;
                debug!("[GameSession] {} cleared {} cells", id, cleared);

                effects.send_to(id, ServerMessage::GridUpdate {
                    grid: player.grid.clone(),
                });
            }
        }
        effects.broadcast(self.score_update());
        Ok(effects)
    }

    pub fn toggle_mode(&mut self, id: PlayerId) -> ActionResult {
        self.require_admin(id)?;
        self.require_phase(Phase::Waiting)?;
        self.mode = self.mode.toggled();
        info!("[GameSession] Mode switched to {:?}", self.mode);

        let mut effects = Effects::default();
        effects.broadcast(ServerMessage::ModeUpdate(self.mode));
        Ok(effects)
    }

    /// Apply an admin settings patch. Either every present field is valid and
    /// applied, or nothing changes.
    pub fn update_settings(&mut self, id: PlayerId, patch: &SettingsPatch) -> ActionResult {
        self.require_admin(id)?;
        self.require_phase(Phase::Waiting)?;

        let rows = bounded(patch.rows, MAX_ROWS as i64, "rows")?;
        let cols = bounded(patch.cols, MAX_COLS as i64, "cols")?;
        let duration = bounded(patch.duration, MAX_ROUND_DURATION as i64, "duration")?;

        if let Some(rows) = rows {
            self.settings.rows = rows as usize;
        }
        if let Some(cols) = cols {
            self.settings.cols = cols as usize;
        }
        if let Some(duration) = duration {
            self.settings.duration = duration as u32;
        }
        info!("[GameSession] Settings updated: {:?}", self.settings);

        let mut effects = Effects::default();
        effects.broadcast(ServerMessage::SettingsUpdate(self.settings));
        Ok(effects)
    }

    /// Remove `target` from the game. The owner must close its connection.
    pub fn kick(&mut self, id: PlayerId, target: PlayerId) -> ActionResult {
        self.require_admin(id)?;
        if id == target {
            return Err(Rejection::SelfKick);
        }
        self.players.get(target).ok_or(Rejection::UnknownPlayer(target))?;
        info!("[GameSession] Player {} kicked by {}", target, id);

        let mut effects = Effects::default();
        effects.send_to(target, ServerMessage::Kicked {
            reason: "You have been removed from the game by the admin.".to_string(),
        });
        effects.extend(self.disconnect(target)?);
        Ok(effects)
    }

    /// Start a new round right away, whatever the current phase.
    pub fn force_reset(&mut self, id: PlayerId) -> ActionResult {
        self.require_admin(id)?;
        info!("[GameSession] Round reset by {}", id);
        Ok(self.start_round())
    }

    pub fn snapshot_for(&self, id: PlayerId) -> InitState {
        let grid = match (self.mode, self.phase) {
            (GameMode::Capture, Phase::Playing) => self.shared_grid.clone(),
            _ => self.players.get(id).map(|p| p.grid.clone()).unwrap_or_default(),
        };
        InitState {
            grid,
            mode: self.mode,
            phase: self.phase,
            timer: self.timer,
            my_id: id,
            players: self.players.summaries(),
            settings: self.settings,
        }
    }

    pub fn scores(&self) -> BTreeMap<PlayerId, u32> {
        self.players.list().iter().map(|p| (p.id, p.score)).collect()
    }

    fn score_update(&self) -> ServerMessage {
        ServerMessage::ScoreUpdate(self.scores())
    }

    fn player_list_update(&self) -> ServerMessage {
        ServerMessage::PlayerListUpdate(self.players.summaries())
    }

    fn rectangle_count(&self) -> ServerMessage {
        ServerMessage::RectangleCount(self.shared_grid.count_rectangles_summing_to(TARGET_SUM))
    }

    fn require_phase(&self, phase: Phase) -> Result<(), Rejection> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(Rejection::WrongPhase(self.phase))
        }
    }

    fn require_admin(&self, id: PlayerId) -> Result<(), Rejection> {
        let player = self.players.get(id).ok_or(Rejection::UnknownPlayer(id))?;
        if player.is_admin {
            Ok(())
        } else {
            Err(Rejection::NotPrivileged)
        }
    }
}

fn bounded(value: Option<RawInt>, max: i64, field: &'static str) -> Result<Option<i64>, Rejection> {
    match value {
        None => Ok(None),
        Some(RawInt::Value(v)) if (1..=max).contains(&v) => Ok(Some(v)),
        Some(_) => Err(Rejection::InvalidSetting(field)),
    }
}
