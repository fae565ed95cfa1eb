//! Battle orchestration on top of the `waltz-core` rules.
//!
//! This crate wires together the decision provider abstraction, random
//! sources and the round controller. Consumers build a [`Battle`] from a
//! drafted roster, an echo catalog and one provider per squad, then either
//! [`run`](Battle::run) it to completion or step it round by round.
//!
//! Modules are organized by responsibility:
//! - [`battle`] hosts the round controller and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`providers`] holds the computer-controlled decision providers
pub mod api;
pub mod battle;
pub mod providers;
pub mod random;

pub use api::{
    BasicAttackProvider, DecisionProvider, DecisionView, Result, RuntimeError, ScriptedProvider,
};
pub use battle::{Battle, BattleBuilder, BattleOutcome, BattlePhase};
pub use providers::RandomAiProvider;
pub use random::StdRandom;
