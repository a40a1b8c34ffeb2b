//! HTTP and WebSocket routing configuration.

use actix_web::web;
use crate::server::game_session::session::ws_game;

/// Configure the application's routes.
///
/// Players connect to `/ws`; each connection is handled by its own actor.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/ws")
            .to(ws_game)
    );
}
