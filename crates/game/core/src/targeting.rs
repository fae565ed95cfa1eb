//! Target legality.
//!
//! Enemy-facing selection honors taunt and cloak. Echo targets are checked
//! against the echo's [`TargetClass`] before any resource is spent.

use crate::echo::{Echo, TargetClass};
use crate::pipeline::CastError;
use crate::state::{CombatantId, Roster, StatusKind};

/// Living members of `ids`, in order.
pub fn living(roster: &Roster, ids: &[CombatantId]) -> Vec<CombatantId> {
    ids.iter()
        .copied()
        .filter(|&id| roster.get(id).is_some_and(|c| c.is_alive()))
        .collect()
}

/// Enemies a basic attack or enemy-targeted echo may select.
///
/// Only living enemies qualify. If any of them taunts, exactly the taunting
/// subset is legal regardless of cloak; otherwise cloaked enemies are hidden.
pub fn legal_enemy_targets(roster: &Roster, enemies: &[CombatantId]) -> Vec<CombatantId> {
    let alive = living(roster, enemies);
    let has = |id: &CombatantId, kind| roster[*id].status.has(kind);

    let taunting: Vec<CombatantId> = alive
        .iter()
        .copied()
        .filter(|id| has(id, StatusKind::Taunt))
        .collect();
    if !taunting.is_empty() {
        return taunting;
    }

    alive
        .into_iter()
        .filter(|id| !has(id, StatusKind::Cloak))
        .collect()
}

/// Checks `candidate` against the echo's target class.
///
/// Area classes ignore the candidate and only require a qualifying member on
/// the respective side.
pub fn validate_target(
    echo: &Echo,
    actor: CombatantId,
    candidate: Option<CombatantId>,
    roster: &Roster,
) -> Result<(), CastError> {
    let allies = roster.allies_of(actor);
    let enemies = roster.enemies_of(actor);
    let revives = echo.revives();
    let alive = |id: CombatantId| roster.get(id).is_some_and(|c| c.is_alive());

    let legal = match &echo.target {
        TargetClass::SelfOnly => candidate == Some(actor),
        TargetClass::Ally => {
            candidate.is_some_and(|id| allies.contains(&id) && (alive(id) || revives))
        }
        TargetClass::Enemy => candidate.is_some_and(|id| enemies.contains(&id) && alive(id)),
        TargetClass::AoeAlly => allies.iter().any(|&id| alive(id) || revives),
        TargetClass::AoeEnemy => enemies.iter().any(|&id| alive(id)),
        TargetClass::Unrecognized(class) => {
            return Err(CastError::UnknownTargetClass {
                title: echo.title.clone(),
                class: class.clone(),
            });
        }
    };

    if legal {
        Ok(())
    } else {
        Err(CastError::InvalidTarget {
            title: echo.title.clone(),
        })
    }
}
