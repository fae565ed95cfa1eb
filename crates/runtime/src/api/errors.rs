//! Unified error types surfaced by the runtime API.
//!
//! Rule failures during a battle never reach this type: they become warning
//! entries in the battle log and a basic-attack fallback. Only setup mistakes
//! and misuse of a finished battle are reported here.
use thiserror::Error;
use waltz_core::{RosterError, Side};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{side} decision provider not set")]
    ProviderNotSet { side: Side },

    #[error("battle requires a roster to be configured before building")]
    MissingRoster,

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error("the battle is already over")]
    BattleOver,
}
