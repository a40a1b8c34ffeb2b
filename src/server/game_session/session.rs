/// WebSocket session handler for one player connection.
///
/// This actor registers the player with the game session coordinator, relays
/// parsed client actions to it, and serializes every server message back to
/// the client.
use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{debug, error};
use uuid::Uuid;

use super::messages::{ClientAction, ProcessClientMessage, ServerMessage};
use super::server::{GameSession, Join, Leave};
use crate::game::types::PlayerId;
use crate::server::anti_spam::AntiSpamState;

pub struct GameSessionActor {
    pub player_id: PlayerId,
    /// Handshake name, handed to the coordinator on start.
    pub name: Option<String>,
    pub session_addr: Addr<GameSession>,
    anti_spam: AntiSpamState,
}

impl GameSessionActor {
    pub fn new(player_id: PlayerId, name: Option<String>, session_addr: Addr<GameSession>) -> Self {
        Self {
            player_id,
            name,
            session_addr,
            anti_spam: AntiSpamState::new(),
        }
    }
}

impl Actor for GameSessionActor {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.session_addr.do_send(Join {
            player_id: self.player_id,
            name: self.name.take(),
            addr: ctx.address().recipient(),
        });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.session_addr.do_send(Leave {
            player_id: self.player_id,
        });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for GameSessionActor {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => {
                if self.anti_spam.record_request(&self.player_id.to_string()) {
                    return;
                }
                match serde_json::from_str::<ClientAction>(&text) {
                    Ok(action) => self.session_addr.do_send(ProcessClientMessage {
                        msg: action,
                        player_id: self.player_id,
                    }),
                    // Malformed frames are dropped without a reply.
                    Err(e) => debug!("[GameSessionActor] Invalid frame from {}: {}", self.player_id, e),
                }
            }
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Err(e) => {
                debug!("[GameSessionActor] Protocol error for {}: {}", self.player_id, e);
                ctx.stop();
            }
            _ => (),
        }
    }
}

impl Handler<ServerMessage> for GameSessionActor {
    type Result = ();

    fn handle(&mut self, msg: ServerMessage, ctx: &mut Self::Context) {
        match serde_json::to_string(&msg) {
            Ok(text) => ctx.text(text),
            Err(e) => error!("[GameSessionActor] Failed to serialize ServerMessage: {}", e),
        }
        if let ServerMessage::Kicked { .. } = msg {
            ctx.close(Some(ws::CloseReason {
                code: ws::CloseCode::Policy,
                description: Some("Kicked".into()),
            }));
            ctx.stop();
        }
    }
}

/// Pull the optional, URL-encoded `name` parameter out of a query string.
pub fn name_from_query(query: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|kv| kv.split_once('='))
        .find(|(key, _)| *key == "name")
        .and_then(|(_, value)| urlencoding::decode(&value.replace('+', " ")).ok().map(|v| v.into_owned()))
        .filter(|name| !name.is_empty())
}

/// WebSocket endpoint for players.
///
/// Every connection gets a fresh player id. The optional `name` query
/// parameter sets the initial display name.
pub async fn ws_game(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<crate::server::state::AppState>,
) -> Result<HttpResponse, Error> {
    let player_id = Uuid::new_v4();
    let name = name_from_query(req.query_string());

    ws::start(
        GameSessionActor::new(player_id, name, data.game_session.clone()),
        &req,
        stream,
    )
}
