//! Damage resolution for the attack action.
//!
//! Two pipelines coexist and are never merged:
//!
//! - [`resolve_damage`] (contact damage): negation, dodge rolls, a minimum
//!   of one, shield absorption, then attacker lifesteal.
//! - [`strike`]: crit roll with ATK-vs-DEF variance, low-HP bonus, crit-dodge,
//!   shield absorption, then EP on hit and on knockout.

use crate::log::BattleLog;
use crate::rng::RandomSource;
use crate::state::{Combatant, CombatantId, Magnitude, Roster, StatusKind};

use super::{DEFAULT_DODGE_CHANCE, DEFAULT_LIFESTEAL_RATIO};

/// Minimum pre-crit strike damage.
const STRIKE_FLOOR: i32 = 5;
/// Strike variance, inclusive on both ends.
const STRIKE_VARIANCE: i32 = 5;

/// Result of routing damage through the contact pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target was already down; nothing happened.
    TargetDown,
    /// A damage negation was consumed.
    Negated,
    Dodged,
    Dealt {
        /// HP removed from the target after shield absorption.
        damage: i32,
        absorbed: i32,
        shield_broken: bool,
        /// HP the attacker regained through lifesteal.
        healed: i32,
    },
}

/// Result of one strike.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrikeOutcome {
    /// `max(5, atk - def + variance)` before crit and bonuses.
    pub base: i32,
    /// HP removed from the target after shield absorption.
    pub damage: i32,
    pub critical: bool,
    pub crit_dodged: bool,
    pub absorbed: i32,
    pub shield_broken: bool,
    pub knocked_out: bool,
    pub ep_gained: i32,
}

struct Absorption {
    absorbed: i32,
    broken: bool,
}

/// Lets the first shield entry soak up to its remaining value.
///
/// Later shield entries stay inert until the first one breaks.
fn absorb_with_shield(target: &mut Combatant, damage: i32, log: &mut BattleLog) -> Absorption {
    let Some(shield) = target.status.first_mut(StatusKind::Shield) else {
        return Absorption {
            absorbed: 0,
            broken: false,
        };
    };

    let value = match shield.magnitude {
        Some(Magnitude::Amount(value)) => value.max(0),
        _ => 0,
    };
    let absorbed = damage.min(value);
    let left = value - absorbed;
    shield.magnitude = Some(Magnitude::Amount(left));

    if absorbed > 0 {
        log.info(format!(
            "{}'s shield absorbs {} damage.",
            target.name, absorbed
        ));
    }
    let broken = left <= 0;
    if broken {
        target.status.remove_first(StatusKind::Shield);
        log.info(format!("{}'s shield breaks!", target.name));
    }
    Absorption { absorbed, broken }
}

/// Routes `base` contact damage from `attacker` to `target`.
pub fn resolve_damage<R: RandomSource + ?Sized>(
    roster: &mut Roster,
    attacker: CombatantId,
    target: CombatantId,
    base: i32,
    source: Option<&str>,
    rng: &mut R,
    log: &mut BattleLog,
) -> DamageOutcome {
    let source = source.unwrap_or("basic attack");
    let attacker_name = match roster.get(attacker) {
        Some(combatant) => combatant.name.clone(),
        None => return DamageOutcome::TargetDown,
    };
    let Some(defender) = roster.get_mut(target) else {
        return DamageOutcome::TargetDown;
    };
    if !defender.is_alive() {
        return DamageOutcome::TargetDown;
    }

    if defender.status.has(StatusKind::DamageNegation) {
        defender.status.remove(StatusKind::DamageNegation);
        log.info(format!(
            "{} negates damage from '{}'!",
            defender.name, source
        ));
        return DamageOutcome::Negated;
    }

    let dodged = defender
        .status
        .get(StatusKind::Dodge)
        .any(|effect| rng.chance(effect.chance_or(DEFAULT_DODGE_CHANCE)));
    if dodged {
        log.info(format!(
            "{} dodges the attack from {}!",
            defender.name, attacker_name
        ));
        return DamageOutcome::Dodged;
    }

    let incoming = base.max(1);
    let Absorption { absorbed, broken } = absorb_with_shield(defender, incoming, log);
    let damage = incoming - absorbed;
    defender.take_damage(damage);
    let defender_name = defender.name.clone();
    log.info(format!(
        "{attacker_name} deals {damage} damage to {defender_name} via '{source}'."
    ));

    let mut healed = 0;
    if let Some(attacker) = roster.get_mut(attacker) {
        let ratios: Vec<f64> = attacker
            .status
            .get(StatusKind::Lifesteal)
            .map(|effect| effect.chance_or(DEFAULT_LIFESTEAL_RATIO))
            .collect();
        for ratio in ratios {
            let amount = (f64::from(damage) * ratio).floor() as i32;
            healed += attacker.heal(amount);
            log.info(format!(
                "{} steals {} HP from {}.",
                attacker.name, amount, defender_name
            ));
        }
    }

    DamageOutcome::Dealt {
        damage,
        absorbed,
        shield_broken: broken,
        healed,
    }
}

/// Resolves one crit-rolling strike from `attacker` to `target`.
///
/// Returns `None` when either combatant is missing or the target is down.
pub fn strike<R: RandomSource + ?Sized>(
    roster: &mut Roster,
    attacker: CombatantId,
    target: CombatantId,
    rng: &mut R,
    log: &mut BattleLog,
) -> Option<StrikeOutcome> {
    let (striker, defender) = roster.pair_mut(attacker, target)?;
    if !defender.is_alive() {
        return None;
    }

    let critical = rng.chance(striker.crit_chance);
    let variance = rng.range_inclusive(-STRIKE_VARIANCE, STRIKE_VARIANCE);
    let base = (striker.atk - defender.def + variance).max(STRIKE_FLOOR);
    let multiplier = if critical { striker.crit_multiplier } else { 1.0 };
    let mut damage = (f64::from(base) * multiplier).floor() as i32;

    if striker.is_low_hp() {
        damage += striker.traits.atk_if_low_hp;
    }

    let crit_dodged = critical && defender.traits.crit_dodge();
    if crit_dodged {
        damage = base;
        log.info(format!("{} dodged the critical hit!", defender.name));
    }

    let Absorption { absorbed, broken } = absorb_with_shield(defender, damage.max(0), log);
    let damage = damage.max(0) - absorbed;
    defender.take_damage(damage);
    let knocked_out = !defender.is_alive();

    let mut ep_gained = striker.gain_ep(striker.traits.ep_on_hit);
    if knocked_out {
        ep_gained += striker.gain_ep(striker.traits.ep_on_ko_received);
    }

    let mut message = format!(
        "{} attacked {} for {} damage.",
        striker.name, defender.name, damage
    );
    if critical {
        message.push_str(" (CRITICAL HIT!)");
    }
    if knocked_out {
        message.push_str(&format!(" {} is KO'd!", defender.name));
    }
    log.info(message);

    Some(StrikeOutcome {
        base,
        damage,
        critical,
        crit_dodged,
        absorbed,
        shield_broken: broken,
        knocked_out,
        ep_gained,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::PcgRng;
    use crate::testing::roster;

    const ANA: CombatantId = CombatantId(0);
    const CY: CombatantId = CombatantId(1);

    /// Replays fixed `next_u32` values.
    struct Scripted(Vec<u32>);

    impl RandomSource for Scripted {
        fn next_u32(&mut self) -> u32 {
            if self.0.is_empty() { 0 } else { self.0.remove(0) }
        }
    }

    /// `next_f64` close to 0: every chance roll succeeds.
    fn always() -> Scripted {
        Scripted(vec![0; 16])
    }

    /// `next_f64` close to 1: every chance roll fails.
    fn never() -> Scripted {
        Scripted(vec![u32::MAX; 16])
    }

    fn shielded(value: i32) -> Roster {
        let mut roster = roster(&["Ana"], &["Cy"]);
        roster[CY]
            .status
            .add(StatusKind::Shield, 2, Some(Magnitude::Amount(value)), "Ward");
        roster
    }

    #[test]
    fn shield_absorbs_then_breaks() {
        let mut roster = shielded(30);
        let mut log = BattleLog::new();

        let first = resolve_damage(&mut roster, ANA, CY, 20, None, &mut never(), &mut log);
        assert_eq!(
            first,
            DamageOutcome::Dealt { damage: 0, absorbed: 20, shield_broken: false, healed: 0 }
        );
        assert_eq!(roster[CY].hp, 100);
        let shield = roster[CY].status.get(StatusKind::Shield).next().cloned();
        assert_eq!(shield.and_then(|e| e.magnitude), Some(Magnitude::Amount(10)));

        let second = resolve_damage(&mut roster, ANA, CY, 15, None, &mut never(), &mut log);
        assert_eq!(
            second,
            DamageOutcome::Dealt { damage: 5, absorbed: 10, shield_broken: true, healed: 0 }
        );
        assert_eq!(roster[CY].hp, 95);
        assert!(!roster[CY].status.has(StatusKind::Shield));
        assert!(log.contains("Cy's shield breaks!"));
    }

    #[test]
    fn second_shield_waits_for_the_first() {
        let mut roster = shielded(10);
        roster[CY]
            .status
            .add(StatusKind::Shield, 2, Some(Magnitude::Amount(50)), "Aegis");
        let mut log = BattleLog::new();

        resolve_damage(&mut roster, ANA, CY, 25, None, &mut never(), &mut log);

        // First shield soaks 10, second one never touched during that hit.
        assert_eq!(roster[CY].hp, 85);
        let left = roster[CY].status.get(StatusKind::Shield).next().cloned();
        assert_eq!(left.map(|e| e.source), Some("Aegis".to_string()));
    }

    #[test]
    fn negation_is_consumed_before_anything_else() {
        let mut roster = shielded(30);
        roster[CY].status.add(StatusKind::DamageNegation, 1, None, "Null");
        let mut log = BattleLog::new();

        let outcome = resolve_damage(
            &mut roster,
            ANA,
            CY,
            50,
            Some("Hex"),
            &mut always(),
            &mut log,
        );

        assert_eq!(outcome, DamageOutcome::Negated);
        assert!(!roster[CY].status.has(StatusKind::DamageNegation));
        assert!(log.contains("Cy negates damage from 'Hex'!"));
        assert_eq!(roster[CY].hp, 100);
    }

    #[test]
    fn dodge_rolls_use_entry_chance() {
        let mut roster = roster(&["Ana"], &["Cy"]);
        roster[CY]
            .status
            .add(StatusKind::Dodge, 2, Some(Magnitude::Chance(0.5)), "Step");
        let mut log = BattleLog::new();

        let dodged = resolve_damage(&mut roster, ANA, CY, 20, None, &mut always(), &mut log);
        assert_eq!(dodged, DamageOutcome::Dodged);

        let hit = resolve_damage(&mut roster, ANA, CY, 20, None, &mut never(), &mut log);
        assert!(matches!(hit, DamageOutcome::Dealt { damage: 20, .. }));
    }

    #[test]
    fn damage_is_at_least_one_and_dead_targets_are_ignored() {
        let mut roster = roster(&["Ana"], &["Cy"]);
        let mut log = BattleLog::new();

        let outcome = resolve_damage(&mut roster, ANA, CY, -7, None, &mut never(), &mut log);
        assert!(matches!(outcome, DamageOutcome::Dealt { damage: 1, .. }));

        roster[CY].hp = 0;
        let outcome = resolve_damage(&mut roster, ANA, CY, 50, None, &mut never(), &mut log);
        assert_eq!(outcome, DamageOutcome::TargetDown);
        assert_eq!(roster[CY].hp, 0);
    }

    #[test]
    fn attacker_lifesteal_entries_heal() {
        let mut roster = roster(&["Ana"], &["Cy"]);
        roster[ANA].hp = 50;
        roster[ANA].status.add(StatusKind::Lifesteal, 2, None, "Leech");
        let mut log = BattleLog::new();

        let outcome = resolve_damage(&mut roster, ANA, CY, 40, None, &mut never(), &mut log);

        assert!(matches!(outcome, DamageOutcome::Dealt { healed: 12, .. }));
        assert_eq!(roster[ANA].hp, 62);
    }

    #[test]
    fn strike_without_crit_uses_atk_minus_def_with_variance() {
        let mut roster = roster(&["Ana"], &["Cy"]);
        roster[ANA].atk = 40;
        let mut log = BattleLog::new();
        // crit roll fails, variance 0 (offset 5 of 11)
        let mut rng = Scripted(vec![u32::MAX, 5]);

        let outcome = strike(&mut roster, ANA, CY, &mut rng, &mut log).expect("strike");

        assert!(!outcome.critical);
        assert_eq!(outcome.base, 30);
        assert_eq!(outcome.damage, 30);
        assert_eq!(roster[CY].hp, 70);
        assert!(log.contains("Ana attacked Cy for 30 damage."));
    }

    #[test]
    fn strike_floor_and_crit_dodge() {
        let mut roster = roster(&["Ana"], &["Cy"]);
        roster[CY].def = 100;
        roster[CY].traits.flags |= crate::state::TraitFlags::CRIT_DODGE;
        let mut log = BattleLog::new();
        // crit roll succeeds, variance -5
        let mut rng = Scripted(vec![0, 0]);

        let outcome = strike(&mut roster, ANA, CY, &mut rng, &mut log).expect("strike");

        assert!(outcome.critical);
        assert!(outcome.crit_dodged);
        assert_eq!(outcome.damage, 5);
        assert!(log.contains("Cy dodged the critical hit!"));
    }

    #[test]
    fn strike_shield_absorbs_before_hp() {
        let mut roster = shielded(30);
        roster[ANA].atk = 40;
        let mut log = BattleLog::new();
        let mut rng = Scripted(vec![u32::MAX, 5]);

        let outcome = strike(&mut roster, ANA, CY, &mut rng, &mut log).expect("strike");

        assert_eq!(outcome.absorbed, 30);
        assert_eq!(outcome.damage, 0);
        assert!(outcome.shield_broken);
        assert_eq!(roster[CY].hp, 100);
    }

    #[test]
    fn strike_knockout_grants_ep() {
        let mut roster = roster(&["Ana"], &["Cy"]);
        roster[ANA].atk = 200;
        roster[ANA].ep = 95;
        roster[ANA].traits.ep_on_hit = 3;
        roster[ANA].traits.ep_on_ko_received = 10;
        let mut log = BattleLog::new();

        let outcome =
            strike(&mut roster, ANA, CY, &mut PcgRng::new(3), &mut log).expect("strike");

        assert!(outcome.knocked_out);
        assert_eq!(roster[ANA].ep, 100);
        assert_eq!(outcome.ep_gained, 5);
        assert!(log.contains("Cy is KO'd!"));
        assert!(strike(&mut roster, ANA, CY, &mut PcgRng::new(3), &mut log).is_none());
    }

    #[test]
    fn low_hp_bonus_applies_to_strikes() {
        let mut roster = roster(&["Ana"], &["Cy"]);
        roster[ANA].atk = 40;
        roster[ANA].hp = 20;
        roster[ANA].traits.atk_if_low_hp = 7;
        let mut log = BattleLog::new();
        let mut rng = Scripted(vec![u32::MAX, 5]);

        let outcome = strike(&mut roster, ANA, CY, &mut rng, &mut log).expect("strike");
        assert_eq!(outcome.damage, 37);
    }
}
