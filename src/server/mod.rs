// src/server/mod.rs

//! Server layer root module.
//!
//! This module organizes the backend server components, including:
//! - Application state management
//! - HTTP/WebSocket routing
//! - Game session coordination (lobby, countdown, rounds, player actions)
//! - Per-connection flood protection

pub mod state;
pub mod router;
pub mod game_session;
pub mod anti_spam;

#[cfg(test)]
mod tests;
