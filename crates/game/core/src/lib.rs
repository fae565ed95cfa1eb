//! Deterministic battle rules shared by the runtime and offline tools.
//!
//! `waltz-core` defines the canonical combat rules (combatants, status ledger,
//! echoes, targeting, effect and damage pipelines, turn order) and exposes
//! pure APIs. Nothing in this crate performs I/O: every state-changing step
//! appends to an explicit [`BattleLog`], and randomness arrives through the
//! [`RandomSource`] trait.
pub mod config;
pub mod echo;
pub mod engine;
pub mod error;
pub mod log;
pub mod pipeline;
pub mod rng;
pub mod state;
pub mod targeting;

#[cfg(test)]
mod testing;

pub use config::{AttackPipeline, BattleConfig};
pub use echo::{EchoCatalog, EffectTag, Echo, StatModifiers, TargetClass};
pub use engine::{Decision, turn_order};
pub use error::{ErrorSeverity, GameError};
pub use log::{BattleLog, LogEntry, LogLevel};
pub use pipeline::{
    CastError, CastReport, DamageOutcome, EffectContext, StrikeOutcome, cast, resolve_damage,
    strike,
};
pub use rng::{PcgRng, RandomSource};
pub use state::{
    BaseStats, ChampionTemplate, Combatant, CombatantId, House, HouseBonus, Magnitude, Roster,
    RosterError, Side, Squad, StatusEffect, StatusKind, StatusLedger, TraitFlags, Traits,
};
pub use targeting::{legal_enemy_targets, living, validate_target};
