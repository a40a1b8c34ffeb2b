//! Main entry point for the backend server.
//!
//! Initializes logging and configuration, starts the game session coordinator,
//! and launches the HTTP server with the player WebSocket endpoint.

use actix::Actor;
use actix_web::{web, App, HttpServer};
use log::info;

use config::server::ServerConfig;
use server::game_session::server::GameSession;

pub mod config;
mod server;
mod game;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger from environment variable (default to info level).
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env();

    // Start the GameSession actor (the single authority over the shared game).
    let game_session = GameSession::new(config.game.clone()).start();

    // Shared application state for HTTP/WebSocket handlers.
    let state = web::Data::new(server::state::AppState::new(game_session));

    info!("Listening on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(
                actix_web::middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Headers", "*"))
            )
            .app_data(state.clone())
            .configure(crate::server::router::config)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
