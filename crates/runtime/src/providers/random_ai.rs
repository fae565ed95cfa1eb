//! Uniform-random AI decision provider.

use waltz_core::{Decision, RandomSource, TargetClass};

use crate::api::{DecisionProvider, DecisionView};
use crate::random::StdRandom;

/// Casts a uniformly random affordable echo, or attacks when none is.
///
/// Targets are drawn uniformly from what [`DecisionView::echo_targets`]
/// offers; self echoes target the actor and area echoes carry no target.
/// When an echo has nothing to aim at the decision still names it, and the
/// controller turns the refused cast into a basic attack.
#[derive(Debug, Clone)]
pub struct RandomAiProvider<R = StdRandom> {
    rng: R,
}

impl<R: RandomSource> RandomAiProvider<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomAiProvider<StdRandom> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRandom::seeded(seed))
    }
}

impl<R: RandomSource> DecisionProvider for RandomAiProvider<R> {
    fn decide(&mut self, view: &DecisionView<'_>) -> Decision {
        let affordable = view.affordable_echoes();
        let Some(echo) = self.rng.pick_index(affordable.len()).map(|i| affordable[i]) else {
            let targets = view.attack_targets();
            let target = self.rng.pick_index(targets.len()).map(|i| targets[i]);
            return Decision::Attack { target };
        };

        let target = match &echo.target {
            TargetClass::SelfOnly => Some(view.actor_id()),
            class if class.is_aoe() => None,
            _ => {
                let targets = view.echo_targets(echo);
                self.rng.pick_index(targets.len()).map(|i| targets[i])
            }
        };
        tracing::debug!(
            actor = %view.actor.name,
            echo = %echo.title,
            ?target,
            "ai picked echo"
        );
        Decision::cast(echo.title.clone(), target)
    }
}

#[cfg(test)]
mod tests {
    use waltz_core::{
        BaseStats, BattleConfig, ChampionTemplate, Combatant, CombatantId, Echo, EchoCatalog,
        EffectTag, House, PcgRng, Roster, StatModifiers,
    };

    use super::*;

    fn fighter(name: &str, echoes: &[&str]) -> Combatant {
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
            echoes: echoes.iter().map(|t| t.to_string()).collect(),
        };
        Combatant::new(&template, None, &BattleConfig::default())
    }

    fn echo(title: &str, tag: EffectTag, target: TargetClass, ep_cost: u32) -> Echo {
        Echo {
            title: title.into(),
            tags: vec![tag],
            target,
            modifiers: StatModifiers::default(),
            ep_cost,
        }
    }

    fn catalog() -> EchoCatalog {
        [
            echo("Mend", EffectTag::Heal, TargetClass::Ally, 20),
            echo("Rise", EffectTag::Revive, TargetClass::Ally, 20),
            echo("Quake", EffectTag::AoeDamage, TargetClass::AoeEnemy, 20),
            echo("Ward", EffectTag::Shield, TargetClass::SelfOnly, 20),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn attacks_when_nothing_is_affordable() {
        let catalog = catalog();
        let roster =
            Roster::new(vec![fighter("Ana", &["Mend"])], vec![fighter("Bo", &[])]).unwrap();
        let view = DecisionView::new(&roster[CombatantId(0)], &roster, &catalog, 1);
        let mut ai = RandomAiProvider::new(PcgRng::new(1));

        assert_eq!(
            ai.decide(&view),
            Decision::Attack {
                target: Some(CombatantId(1))
            }
        );
    }

    #[test]
    fn targets_follow_the_target_class() {
        let catalog = catalog();
        let mut ana = fighter("Ana", &["Ward"]);
        ana.ep = 100;
        let roster = Roster::new(vec![ana], vec![fighter("Bo", &[])]).unwrap();
        let view = DecisionView::new(&roster[CombatantId(0)], &roster, &catalog, 1);
        let mut ai = RandomAiProvider::new(PcgRng::new(9));

        assert_eq!(
            ai.decide(&view),
            Decision::cast("Ward", Some(CombatantId(0)))
        );

        let mut ana = fighter("Ana", &["Quake"]);
        ana.ep = 100;
        let roster = Roster::new(vec![ana], vec![fighter("Bo", &[])]).unwrap();
        let view = DecisionView::new(&roster[CombatantId(0)], &roster, &catalog, 1);
        assert_eq!(ai.decide(&view), Decision::cast("Quake", None));
    }

    #[test]
    fn revive_echo_aims_at_fallen_allies_only() {
        let catalog = catalog();
        let mut ana = fighter("Ana", &["Rise"]);
        ana.ep = 100;
        let mut cy = fighter("Cy", &[]);
        cy.hp = 0;
        let roster = Roster::new(vec![ana, fighter("Di", &[]), cy], vec![fighter("Bo", &[])])
            .unwrap();
        let view = DecisionView::new(&roster[CombatantId(0)], &roster, &catalog, 1);
        let mut ai = RandomAiProvider::seeded(5);

        for _ in 0..8 {
            assert_eq!(
                ai.decide(&view),
                Decision::cast("Rise", Some(CombatantId(2)))
            );
        }
    }
}
