use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix::prelude::*;
use serde_json::json;
use uuid::Uuid;

use crate::config::server::GameConfig;
use crate::game::grid::Grid;
use crate::game::types::{Area, GameMode, Phase, Settings};
use crate::server::game_session::messages::{ClientAction, ProcessClientMessage, ServerMessage};
use crate::server::game_session::server::{GameSession, Join, Leave};
use crate::server::game_session::session::name_from_query;

type Inbox = Arc<Mutex<Vec<ServerMessage>>>;

/// Stands in for a websocket connection and records what it is sent.
struct Collector {
    inbox: Inbox,
}

impl Actor for Collector {
    type Context = Context<Self>;
}

impl Handler<ServerMessage> for Collector {
    type Result = ();

    fn handle(&mut self, msg: ServerMessage, _: &mut Context<Self>) {
        self.inbox.lock().unwrap().push(msg);
    }
}

fn fast_config() -> GameConfig {
    GameConfig {
        initial_settings: Settings { rows: 4, cols: 5, duration: 2 },
        tick_interval: Duration::from_millis(10),
        ..GameConfig::default()
    }
}

fn join(session: &Addr<GameSession>, name: &str) -> (Uuid, Inbox) {
    let inbox: Inbox = Arc::new(Mutex::new(Vec::new()));
    let addr = Collector { inbox: inbox.clone() }.start();
    let player_id = Uuid::new_v4();
    session.do_send(Join {
        player_id,
        name: Some(name.to_string()),
        addr: addr.recipient(),
    });
    (player_id, inbox)
}

fn act(session: &Addr<GameSession>, player_id: Uuid, msg: ClientAction) {
    session.do_send(ProcessClientMessage { msg, player_id });
}

async fn wait_for(inbox: &Inbox, pred: impl Fn(&[ServerMessage]) -> bool) -> bool {
    for _ in 0..300 {
        let done = pred(&inbox.lock().unwrap());
        if done {
            return true;
        }
        actix_rt::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[test]
fn client_actions_parse_from_tagged_json() {
    let select: ClientAction =
        serde_json::from_str(r#"{"action":"select","data":{"r1":2,"c1":3,"r2":0,"c2":1}}"#).unwrap();
    assert!(matches!(select, ClientAction::Select(s) if s.r1 == 2 && s.c2 == 1));

    let ready: ClientAction = serde_json::from_str(r#"{"action":"toggle-ready"}"#).unwrap();
    assert!(matches!(ready, ClientAction::ToggleReady));

    let settings: ClientAction =
        serde_json::from_str(r#"{"action":"update-settings","data":{"rows":"12","duration":90}}"#).unwrap();
    assert!(matches!(settings, ClientAction::UpdateSettings(p) if p.cols.is_none() && p.rows.is_some()));

    assert!(serde_json::from_str::<ClientAction>(r#"{"action":"fly"}"#).is_err());
}

#[test]
fn server_messages_use_the_wire_names() {
    let cleared = ServerMessage::BlockCleared {
        player_name: "ann".into(),
        area: Area { r1: 0, c1: 1, r2: 2, c2: 3 },
    };
    assert_eq!(
        serde_json::to_value(&cleared).unwrap(),
        json!({"action": "block-cleared", "data": {"playerName": "ann", "area": {"r1": 0, "c1": 1, "r2": 2, "c2": 3}}})
    );

    let grid = ServerMessage::GridUpdate { grid: Grid::from_rows(vec![vec![0, 9]]) };
    assert_eq!(
        serde_json::to_value(&grid).unwrap(),
        json!({"action": "grid-update", "data": {"grid": [[0, 9]]}})
    );

    assert_eq!(
        serde_json::to_value(ServerMessage::ModeUpdate(GameMode::Capture)).unwrap(),
        json!({"action": "mode-update", "data": "capture"})
    );
}

#[test]
fn handshake_name_is_url_decoded() {
    assert_eq!(name_from_query("name=Ann%20B"), Some("Ann B".to_string()));
    assert_eq!(name_from_query("foo=1&name=yiu+yiu"), Some("yiu yiu".to_string()));
    assert_eq!(name_from_query("name="), None);
    assert_eq!(name_from_query(""), None);
}

#[actix_rt::test]
async fn join_greets_with_snapshot_and_announces_player() {
    let session = GameSession::new(fast_config()).start();
    let (alice, alice_inbox) = join(&session, "alice");

    assert!(wait_for(&alice_inbox, |msgs| msgs.len() >= 3).await);
    let msgs = alice_inbox.lock().unwrap().clone();
    match &msgs[0] {
        ServerMessage::InitState(init) => {
            assert_eq!(init.my_id, alice);
            assert_eq!(init.phase, Phase::Waiting);
            assert_eq!(init.players[0].name, "alice");
        }
        other => panic!("expected init-state first, got {:?}", other),
    }

    let (_, _bob_inbox) = join(&session, "bob");
    assert!(wait_for(&alice_inbox, |msgs| msgs.iter().any(
        |m| matches!(m, ServerMessage::PlayerListUpdate(list) if list.len() == 2)
    )).await);
}

#[actix_rt::test]
async fn full_round_runs_on_the_session_timer() {
    let session = GameSession::new(fast_config()).start();
    let (alice, inbox) = join(&session, "alice");
    act(&session, alice, ClientAction::ToggleReady);
    act(&session, alice, ClientAction::Start);

    assert!(wait_for(&inbox, |msgs| msgs.iter().any(|m| matches!(m, ServerMessage::GameOver(_)))).await);
    let msgs = inbox.lock().unwrap().clone();

    let countdown: Vec<u32> = msgs
        .iter()
        .filter_map(|m| match m {
            ServerMessage::Countdown(n) => Some(*n),
            _ => None,
        })
        .collect();
    assert_eq!(countdown, vec![3, 2, 1]);

    let start = msgs.iter().position(|m| matches!(m, ServerMessage::GameStart { .. })).unwrap();
    match &msgs[start] {
        ServerMessage::GameStart { grid, timer } => {
            assert_eq!((grid.rows(), grid.cols()), (4, 5));
            assert_eq!(*timer, 2);
        }
        _ => unreachable!(),
    }

    // One timer only: each value appears exactly once.
    let timer: Vec<u32> = msgs[start..]
        .iter()
        .filter_map(|m| match m {
            ServerMessage::TimerUpdate(n) => Some(*n),
            _ => None,
        })
        .collect();
    assert_eq!(timer, vec![1, 0]);

    match msgs.last() {
        Some(ServerMessage::PlayerListUpdate(list)) => assert!(list.iter().all(|p| !p.is_ready)),
        other => panic!("expected a player list after game-over, got {:?}", other),
    }

    // Nothing more arrives once the round is over.
    let settled = inbox.lock().unwrap().len();
    actix_rt::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(inbox.lock().unwrap().len(), settled);
}

#[actix_rt::test]
async fn admin_kick_notifies_target_and_updates_everyone() {
    let session = GameSession::new(fast_config()).start();
    let (admin, admin_inbox) = join(&session, "yiuyiu");
    let (bob, bob_inbox) = join(&session, "bob");

    // Bob is not privileged.
    act(&session, bob, ClientAction::Kick(admin));
    act(&session, admin, ClientAction::Kick(bob));

    assert!(wait_for(&bob_inbox, |msgs| msgs.iter().any(|m| matches!(m, ServerMessage::Kicked { .. }))).await);
    assert!(wait_for(&admin_inbox, |msgs| matches!(
        msgs.last(),
        Some(ServerMessage::PlayerListUpdate(list)) if list.len() == 1 && list[0].id == admin
    )).await);

    actix_rt::time::sleep(Duration::from_millis(30)).await;
    assert!(matches!(bob_inbox.lock().unwrap().last(), Some(ServerMessage::Kicked { .. })));

    // The closing socket's leave is a no-op.
    let settled = admin_inbox.lock().unwrap().len();
    session.do_send(Leave { player_id: bob });
    actix_rt::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(admin_inbox.lock().unwrap().len(), settled);
}

#[actix_rt::test]
async fn forced_reset_replaces_the_countdown_timer() {
    let mut config = fast_config();
    config.tick_interval = Duration::from_millis(20);
    config.initial_settings.duration = 3;
    let session = GameSession::new(config).start();
    let (admin, inbox) = join(&session, "yiuyiu");

    act(&session, admin, ClientAction::ToggleReady);
    act(&session, admin, ClientAction::Start);
    act(&session, admin, ClientAction::Reset);

    assert!(wait_for(&inbox, |msgs| msgs.iter().any(|m| matches!(m, ServerMessage::GameOver(_)))).await);
    let msgs = inbox.lock().unwrap().clone();

    let starts = msgs.iter().filter(|m| matches!(m, ServerMessage::GameStart { .. })).count();
    assert_eq!(starts, 1);
    let timer: Vec<u32> = msgs
        .iter()
        .filter_map(|m| match m {
            ServerMessage::TimerUpdate(n) => Some(*n),
            _ => None,
        })
        .collect();
    assert_eq!(timer, vec![2, 1, 0]);
}
