//! Game session coordinator actor.
//!
//! Owns the single shared `GameState`, the outbound address of every
//! connection, and the one repeating timer that drives both the countdown and
//! the round clock. Actions arrive through the mailbox and run to completion
//! one at a time.

use actix::prelude::*;
use std::collections::HashMap;
use std::time::Duration;
use log::{debug, info};

use crate::config::server::GameConfig;
use crate::game::state::{Audience, Effects, GameState, TimerCommand};
use crate::game::types::PlayerId;
use crate::server::game_session::messages::{ClientAction, ProcessClientMessage, ServerMessage};

pub struct GameSession {
    pub state: GameState,
    sessions: HashMap<PlayerId, Recipient<ServerMessage>>,
    ticker: Option<SpawnHandle>,
    tick_interval: Duration,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Self {
        Self {
            state: GameState::new(&config),
            sessions: HashMap::new(),
            ticker: None,
            tick_interval: config.tick_interval,
        }
    }

    /// Deliver outbound messages and update the timer as requested.
    fn apply(&mut self, effects: Effects, ctx: &mut Context<Self>) {
        for out in effects.outbound {
            match out.to {
                Audience::All => {
                    for addr in self.sessions.values() {
                        addr.do_send(out.msg.clone());
                    }
                }
                Audience::Player(id) => {
                    if let Some(addr) = self.sessions.get(&id) {
                        addr.do_send(out.msg);
                    }
                }
            }
        }

        match effects.timer {
            TimerCommand::Keep => {}
            TimerCommand::Restart => self.restart_ticker(ctx),
            TimerCommand::Stop => self.stop_ticker(ctx),
        }
    }

    /// Replace the running timer, if any, with a fresh one.
    fn restart_ticker(&mut self, ctx: &mut Context<Self>) {
        self.stop_ticker(ctx);
        let handle = ctx.run_interval(self.tick_interval, |act, ctx| {
            let effects = act.state.tick();
            act.apply(effects, ctx);
        });
        self.ticker = Some(handle);
    }

    fn stop_ticker(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.ticker.take() {
            ctx.cancel_future(handle);
        }
    }
}

impl Actor for GameSession {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!(
            "[GameSession] Coordinator started: settings={:?}",
            self.state.settings
        );
    }
}

/// Message: a connection opened.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Join {
    pub player_id: PlayerId,
    /// Initial display name requested in the handshake.
    pub name: Option<String>,
    pub addr: Recipient<ServerMessage>,
}

/// Message: a connection closed.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Leave {
    pub player_id: PlayerId,
}

impl Handler<Join> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: Join, ctx: &mut Context<Self>) -> Self::Result {
        self.sessions.insert(msg.player_id, msg.addr);
        let effects = self.state.connect(msg.player_id, msg.name.as_deref());
        self.apply(effects, ctx);
    }
}

impl Handler<Leave> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: Leave, ctx: &mut Context<Self>) -> Self::Result {
        self.sessions.remove(&msg.player_id);
        match self.state.disconnect(msg.player_id) {
            Ok(effects) => self.apply(effects, ctx),
            // Already gone, e.g. kicked.
            Err(rejection) => debug!("[GameSession] Leave ignored: {}", rejection),
        }
    }
}

impl Handler<ProcessClientMessage> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: ProcessClientMessage, ctx: &mut Context<Self>) -> Self::Result {
        let id = msg.player_id;
        let result = match msg.msg {
            ClientAction::Rename(name) => self.state.rename(id, &name),
            ClientAction::ToggleReady => self.state.toggle_ready(id),
            ClientAction::SetReady(ready) => self.state.set_ready(id, ready),
            ClientAction::Start => self.state.request_start(id),
            ClientAction::Select(selection) => self.state.select(id, &selection),
            ClientAction::ToggleMode => self.state.toggle_mode(id),
            ClientAction::UpdateSettings(patch) => self.state.update_settings(id, &patch),
            ClientAction::Kick(target) => match self.state.kick(id, target) {
                Ok(mut effects) => {
                    // The target hears only its own notice, never the broadcasts that follow.
                    let (notice, rest) = effects
                        .outbound
                        .into_iter()
                        .partition::<Vec<_>, _>(|out| out.to == Audience::Player(target));
                    effects.outbound = rest;
                    if let Some(addr) = self.sessions.remove(&target) {
                        for out in notice {
                            addr.do_send(out.msg);
                        }
                    }
                    self.apply(effects, ctx);
                    return;
                }
                Err(rejection) => Err(rejection),
            },
            ClientAction::Reset => self.state.force_reset(id),
            ClientAction::Ping => return,
        };

        match result {
            Ok(effects) => self.apply(effects, ctx),
            Err(rejection) => debug!("[GameSession] Ignored action from {}: {}", id, rejection),
        }
    }
}
