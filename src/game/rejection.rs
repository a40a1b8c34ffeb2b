//! Reasons an inbound action was ignored.
//!
//! Rejections never reach clients. They exist so that "no state change, no
//! broadcast" is an explicit, testable result.

use thiserror::Error;

use crate::game::types::{Phase, PlayerId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("action not allowed while {0:?}")]
    WrongPhase(Phase),
    #[error("round timer already expired")]
    TimerExpired,
    #[error("not every connected player is ready")]
    NotAllReady,
    #[error("player has no grid this round")]
    NoGrid,
    #[error("selection is outside the board")]
    OutOfBounds,
    #[error("selection sums to {0}")]
    SumMismatch(u32),
    #[error("selection only covers cleared cells")]
    NothingCleared,
    #[error("admin capability required")]
    NotPrivileged,
    #[error("invalid value for setting `{0}`")]
    InvalidSetting(&'static str),
    #[error("admins cannot kick themselves")]
    SelfKick,
}
