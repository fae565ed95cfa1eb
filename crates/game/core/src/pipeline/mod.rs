//! Effect and damage resolution.
//!
//! - [`cast`]: gate checks, EP deduction, and per-target tag application
//! - [`resolve_damage`]: contact damage with negation, dodge, shield and
//!   lifesteal mitigation
//! - [`strike`]: crit-rolling basic attack with crit-dodge and shield
//!
//! Every entry point takes the [`Roster`](crate::state::Roster) and the
//! [`BattleLog`](crate::log::BattleLog) explicitly.
mod cast;
mod context;
mod damage;
mod effects;

pub use cast::{CastError, CastReport, cast};
pub use context::EffectContext;
pub use damage::{DamageOutcome, StrikeOutcome, resolve_damage, strike};
pub use effects::{
    DEFAULT_DOT, DEFAULT_REGEN, DEFAULT_REVIVE_HP, DEFAULT_SHIELD_HP, DEFAULT_SHIELD_TURNS,
};

/// Dodge chance used when a dodge entry carries none.
pub const DEFAULT_DODGE_CHANCE: f64 = 0.25;

/// Contact-damage share healed per lifesteal entry when it carries none.
pub const DEFAULT_LIFESTEAL_RATIO: f64 = 0.3;
