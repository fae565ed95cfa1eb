//! Synchronous abstraction for sourcing combatant intent.
//!
//! Runtime users plug in [`DecisionProvider`] implementations so a battle can
//! run with human input, scripted fixtures, or AI policies. The round
//! controller owns legality: whatever a provider answers is re-validated
//! before anything is applied.
use std::collections::VecDeque;

use waltz_core::{
    Combatant, CombatantId, Decision, Echo, EchoCatalog, Roster, TargetClass, legal_enemy_targets,
    living,
};

/// Read-only snapshot handed to a provider when a combatant acts.
#[derive(Clone, Copy, Debug)]
pub struct DecisionView<'a> {
    pub actor: &'a Combatant,
    pub roster: &'a Roster,
    pub echoes: &'a EchoCatalog,
    pub round: u32,
}

impl<'a> DecisionView<'a> {
    pub fn new(
        actor: &'a Combatant,
        roster: &'a Roster,
        echoes: &'a EchoCatalog,
        round: u32,
    ) -> Self {
        Self {
            actor,
            roster,
            echoes,
            round,
        }
    }

    pub fn actor_id(&self) -> CombatantId {
        self.actor.id
    }

    /// The actor's squad, the actor and fallen members included.
    pub fn allies(&self) -> impl Iterator<Item = &'a Combatant> + 'a {
        self.roster.members(self.actor.side)
    }

    pub fn enemies(&self) -> impl Iterator<Item = &'a Combatant> + 'a {
        self.roster.members(self.actor.side.opponent())
    }

    /// Echoes the actor knows, in menu order.
    pub fn known_echoes(&self) -> Vec<&'a Echo> {
        self.echoes.known_by(self.actor).collect()
    }

    /// Known echoes the actor has the EP for right now.
    pub fn affordable_echoes(&self) -> Vec<&'a Echo> {
        self.echoes
            .known_by(self.actor)
            .filter(|echo| echo.affordable_by(self.actor))
            .collect()
    }

    /// Enemies a basic attack may hit, honoring taunt and cloak.
    pub fn attack_targets(&self) -> Vec<CombatantId> {
        legal_enemy_targets(self.roster, self.roster.enemies_of(self.actor.id))
    }

    /// Explicit targets worth offering for `echo`.
    ///
    /// Self echoes offer the actor, ally echoes the living allies (the fallen
    /// ones for revive echoes), enemy echoes the living enemies. Area echoes
    /// and unrecognized classes offer nothing.
    pub fn echo_targets(&self, echo: &Echo) -> Vec<CombatantId> {
        let id = self.actor.id;
        match &echo.target {
            TargetClass::SelfOnly => vec![id],
            TargetClass::Ally if echo.revives() => self
                .roster
                .allies_of(id)
                .iter()
                .copied()
                .filter(|&ally| !self.roster[ally].is_alive())
                .collect(),
            TargetClass::Ally => living(self.roster, self.roster.allies_of(id)),
            TargetClass::Enemy => living(self.roster, self.roster.enemies_of(id)),
            TargetClass::AoeAlly | TargetClass::AoeEnemy | TargetClass::Unrecognized(_) => {
                Vec::new()
            }
        }
    }
}

/// Trait for choosing a combatant's action on its turn.
///
/// Different implementations can handle:
/// - Player input (from a terminal)
/// - AI decisions
/// - Scripted decisions for tests
pub trait DecisionProvider {
    /// Picks an echo to cast or a basic attack for `view.actor`.
    fn decide(&mut self, view: &DecisionView<'_>) -> Decision;

    /// Target for the basic attack that replaces a failed cast.
    ///
    /// `legal` is never empty. Returning `None` or an id outside `legal` lets
    /// the controller pick uniformly at random.
    fn fallback_target(
        &mut self,
        _view: &DecisionView<'_>,
        _legal: &[CombatantId],
    ) -> Option<CombatantId> {
        None
    }
}

impl<P: DecisionProvider + ?Sized> DecisionProvider for Box<P> {
    fn decide(&mut self, view: &DecisionView<'_>) -> Decision {
        (**self).decide(view)
    }

    fn fallback_target(
        &mut self,
        view: &DecisionView<'_>,
        legal: &[CombatantId],
    ) -> Option<CombatantId> {
        (**self).fallback_target(view, legal)
    }
}

/// A provider that always basic-attacks a random legal enemy.
/// Useful for testing or as a fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicAttackProvider;

impl DecisionProvider for BasicAttackProvider {
    fn decide(&mut self, _view: &DecisionView<'_>) -> Decision {
        Decision::Attack { target: None }
    }
}

/// Replays a fixed queue of decisions.
///
/// Once the queue runs dry every turn attacks the first legal enemy.
#[derive(Debug, Clone, Default)]
pub struct ScriptedProvider {
    queue: VecDeque<Decision>,
}

impl ScriptedProvider {
    pub fn new(decisions: impl IntoIterator<Item = Decision>) -> Self {
        Self {
            queue: decisions.into_iter().collect(),
        }
    }

    pub fn push(&mut self, decision: Decision) {
        self.queue.push_back(decision);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl DecisionProvider for ScriptedProvider {
    fn decide(&mut self, view: &DecisionView<'_>) -> Decision {
        self.queue.pop_front().unwrap_or_else(|| Decision::Attack {
            target: view.attack_targets().first().copied(),
        })
    }

    fn fallback_target(
        &mut self,
        _view: &DecisionView<'_>,
        legal: &[CombatantId],
    ) -> Option<CombatantId> {
        legal.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use waltz_core::{
        BaseStats, BattleConfig, ChampionTemplate, EffectTag, House, Magnitude, StatModifiers,
        StatusKind,
    };

    use super::*;

    fn fighter(name: &str) -> Combatant {
        let template = ChampionTemplate {
            name: name.into(),
            grand_title: String::new(),
            house: House::Ivory,
            stats: BaseStats {
                hp: 50,
                atk: 20,
                def: 10,
                spd: 10,
            },
            echoes: Vec::new(),
        };
        Combatant::new(&template, None, &BattleConfig::default())
    }

    #[test]
    fn attack_targets_honor_taunt_and_cloak_but_echo_targets_do_not() {
        let mut roster = Roster::new(
            vec![fighter("Ana")],
            vec![fighter("Bo"), fighter("Cy"), fighter("Di")],
        )
        .unwrap();
        let [bo, cy, di] = ["Bo", "Cy", "Di"].map(|name| roster.find_by_name(name).unwrap());
        roster[cy].status.add(StatusKind::Cloak, 1, None, "Veil");
        let lance = Echo {
            title: "Lance".into(),
            tags: vec![EffectTag::Burst],
            target: TargetClass::Enemy,
            modifiers: StatModifiers::default(),
            ep_cost: 0,
        };
        let catalog = EchoCatalog::new();

        let actor = &roster[roster.find_by_name("Ana").unwrap()];
        let view = DecisionView::new(actor, &roster, &catalog, 1);
        assert_eq!(view.attack_targets(), vec![bo, di]);
        assert_eq!(view.echo_targets(&lance), vec![bo, cy, di]);

        roster[di]
            .status
            .add(StatusKind::Taunt, 2, Some(Magnitude::Name("Di".into())), "Dare");
        let actor = &roster[roster.find_by_name("Ana").unwrap()];
        let view = DecisionView::new(actor, &roster, &catalog, 1);
        assert_eq!(view.attack_targets(), vec![di]);
        assert_eq!(view.echo_targets(&lance), vec![bo, cy, di]);
    }
}
