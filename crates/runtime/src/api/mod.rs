//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! the battle controller can stay focused on sequencing rounds.

pub mod errors;
pub mod providers;

pub use errors::{Result, RuntimeError};
pub use providers::{BasicAttackProvider, DecisionProvider, DecisionView, ScriptedProvider};
