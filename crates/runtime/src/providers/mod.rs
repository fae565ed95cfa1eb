//! Decision provider implementations for computer-controlled squads.

pub mod random_ai;

pub use random_ai::RandomAiProvider;
