//! Echo casting.
//!
//! Gate checks run before any mutation, in this order: EP, silence, target
//! legality. A failed gate logs a warning and leaves every combatant
//! untouched; only then is EP deducted and the echo dispatched.

use crate::echo::{Echo, TargetClass};
use crate::error::{ErrorSeverity, GameError};
use crate::log::BattleLog;
use crate::state::{CombatantId, Roster, StatusKind};
use crate::targeting::validate_target;

use super::context::EffectContext;
use super::effects::{TargetResult, apply_echo};

/// Reasons a cast is refused before it costs anything.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CastError {
    #[error("{caster} does not have enough EP to cast '{title}' ({ep}/{cost})")]
    InsufficientEp {
        caster: String,
        title: String,
        ep: i32,
        cost: u32,
    },

    #[error("{caster} is silenced and cannot cast '{title}'")]
    Silenced { caster: String, title: String },

    #[error("'{title}' failed to find a valid target")]
    InvalidTarget { title: String },

    #[error("unknown target type '{class}' for echo '{title}'")]
    UnknownTargetClass { title: String, class: String },

    #[error("combatant {0} is not part of this battle")]
    UnknownCombatant(CombatantId),
}

impl GameError for CastError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InsufficientEp { .. } | Self::Silenced { .. } => ErrorSeverity::Recoverable,
            Self::InvalidTarget { .. }
            | Self::UnknownTargetClass { .. }
            | Self::UnknownCombatant(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientEp { .. } => "CAST_INSUFFICIENT_EP",
            Self::Silenced { .. } => "CAST_SILENCED",
            Self::InvalidTarget { .. } => "CAST_INVALID_TARGET",
            Self::UnknownTargetClass { .. } => "CAST_UNKNOWN_TARGET_CLASS",
            Self::UnknownCombatant(_) => "CAST_UNKNOWN_COMBATANT",
        }
    }
}

/// What a successful cast did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CastReport {
    /// Targets the echo's tags were applied to.
    pub affected: Vec<CombatantId>,
    pub revived: Vec<CombatantId>,
    /// Dead targets the echo could not touch.
    pub skipped: Vec<CombatantId>,
    pub ep_spent: i32,
}

/// Casts `echo` from `caster` at `target`.
///
/// Area echoes ignore `target` and hit every qualifying member of the
/// respective side.
pub fn cast(
    roster: &mut Roster,
    echo: &Echo,
    caster: CombatantId,
    target: Option<CombatantId>,
    log: &mut BattleLog,
) -> Result<CastReport, CastError> {
    if let Err(error) = check_gates(roster, echo, caster, target) {
        log.warn(error.to_string());
        return Err(error);
    }

    let recipients = recipients(roster, echo, caster, target);
    let target_name = match (&echo.target, target.and_then(|id| roster.get(id))) {
        (class, _) if class.is_aoe() => "the battlefield".to_string(),
        (TargetClass::SelfOnly, _) => roster[caster].name.clone(),
        (_, Some(combatant)) => combatant.name.clone(),
        (_, None) => "the battlefield".to_string(),
    };

    let cost = echo.cost();
    let user = &mut roster[caster];
    user.ep -= cost;
    log.info(format!("{} cast '{}' on {}.", user.name, echo.title, target_name));

    let mut report = CastReport {
        ep_spent: cost,
        ..CastReport::default()
    };
    for recipient in recipients {
        let mut ctx = EffectContext::new(roster, log, echo, caster, recipient);
        match apply_echo(&mut ctx) {
            TargetResult::Applied => report.affected.push(recipient),
            TargetResult::Revived => report.revived.push(recipient),
            TargetResult::Skipped => report.skipped.push(recipient),
        }
    }
    Ok(report)
}

fn check_gates(
    roster: &Roster,
    echo: &Echo,
    caster: CombatantId,
    target: Option<CombatantId>,
) -> Result<(), CastError> {
    let user = roster
        .get(caster)
        .ok_or(CastError::UnknownCombatant(caster))?;

    if !echo.affordable_by(user) {
        return Err(CastError::InsufficientEp {
            caster: user.name.clone(),
            title: echo.title.clone(),
            ep: user.ep,
            cost: echo.ep_cost,
        });
    }
    if user.status.has(StatusKind::Silence) {
        return Err(CastError::Silenced {
            caster: user.name.clone(),
            title: echo.title.clone(),
        });
    }
    validate_target(echo, caster, target, roster)
}

/// Targets resolved for dispatch, in squad order for area echoes.
fn recipients(
    roster: &Roster,
    echo: &Echo,
    caster: CombatantId,
    target: Option<CombatantId>,
) -> Vec<CombatantId> {
    let alive = |id: &CombatantId| roster[*id].is_alive();
    match echo.target {
        TargetClass::SelfOnly => vec![caster],
        TargetClass::Ally | TargetClass::Enemy => target.into_iter().collect(),
        TargetClass::AoeAlly => roster
            .allies_of(caster)
            .iter()
            .copied()
            .filter(|id| alive(id) || echo.revives())
            .collect(),
        TargetClass::AoeEnemy => roster
            .enemies_of(caster)
            .iter()
            .copied()
            .filter(alive)
            .collect(),
        TargetClass::Unrecognized(_) => Vec::new(),
    }
}
