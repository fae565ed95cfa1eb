//! Effect execution context.

use crate::echo::{Echo, StatModifiers};
use crate::log::BattleLog;
use crate::state::{Combatant, CombatantId, Magnitude, Roster, StatusKind};

/// Context for applying one echo to one resolved target.
///
/// Created once per target and reused for every tag the echo declares, so
/// later tags can read what earlier ones accumulated.
pub struct EffectContext<'a> {
    pub roster: &'a mut Roster,
    pub log: &'a mut BattleLog,
    pub echo: &'a Echo,

    /// The combatant casting the echo.
    pub caster: CombatantId,

    /// The current target. Equal to `caster` for self-targeted echoes.
    pub target: CombatantId,

    /// Damage dealt to this target by the cast so far.
    pub accumulated_damage: i32,
}

impl<'a> EffectContext<'a> {
    pub fn new(
        roster: &'a mut Roster,
        log: &'a mut BattleLog,
        echo: &'a Echo,
        caster: CombatantId,
        target: CombatantId,
    ) -> Self {
        Self {
            roster,
            log,
            echo,
            caster,
            target,
            accumulated_damage: 0,
        }
    }

    pub fn caster(&self) -> &Combatant {
        &self.roster[self.caster]
    }

    pub fn target(&self) -> &Combatant {
        &self.roster[self.target]
    }

    pub fn caster_mut(&mut self) -> &mut Combatant {
        &mut self.roster[self.caster]
    }

    pub fn target_mut(&mut self) -> &mut Combatant {
        &mut self.roster[self.target]
    }

    pub fn title(&self) -> &'a str {
        &self.echo.title
    }

    pub fn modifiers(&self) -> &'a StatModifiers {
        &self.echo.modifiers
    }

    /// Adds a status to the target, attributed to the echo being cast.
    pub fn add_status(&mut self, kind: StatusKind, duration: u32, magnitude: Option<Magnitude>) {
        let source = self.title();
        self.target_mut().status.add(kind, duration, magnitude, source);
    }
}
