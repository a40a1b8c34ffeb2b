// src/server/state.rs

//! Application state for the backend server.
//!
//! Holds the address of the game session coordinator, shared between
//! HTTP/WebSocket handlers and the actor system.

use actix::Addr;
use crate::server::game_session::server::GameSession;

/// Shared application state, injected into HTTP/WebSocket handlers.
pub struct AppState {
    /// Address of the single game session coordinator.
    pub game_session: Addr<GameSession>,
}

impl AppState {
    pub fn new(game_session: Addr<GameSession>) -> Self {
        AppState { game_session }
    }
}
