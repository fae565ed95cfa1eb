//! Battle state: combatants, houses, status ledgers, and the roster arena.
//!
//! Rule code mutates combatants only through the roster, addressing them by
//! [`CombatantId`]. Each combatant exclusively owns its [`StatusLedger`].
mod combatant;
mod house;
mod roster;
mod status;

pub use combatant::{BaseStats, ChampionTemplate, Combatant, CombatantId, Side};
pub use house::{House, HouseBonus, TraitFlags, Traits};
pub use roster::{Roster, RosterError, Squad};
pub use status::{Magnitude, StatusEffect, StatusKind, StatusLedger};
