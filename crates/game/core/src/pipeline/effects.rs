//! Effect tag handlers.
//!
//! Every [`EffectTag`] maps to one handler through [`handler`]. Handlers read
//! amounts from the echo's [`StatModifiers`] and the current stats at the
//! moment they run, and append one log entry each.
//!
//! ## Defaults
//!
//! Amounts with a non-zero default (revive, regen, dot, shield, dodge) fall
//! back to it only when the echo leaves the value out; an explicit value is
//! used as written. Plain deltas (heal, stat buffs, slow, EP) read a missing
//! value as zero.

use crate::echo::{EffectTag, StatModifiers};
use crate::state::{Magnitude, StatusKind};

use super::context::EffectContext;
use super::DEFAULT_DODGE_CHANCE;

pub const DEFAULT_REVIVE_HP: i32 = 25;
pub const DEFAULT_REGEN: i32 = 10;
pub const DEFAULT_DOT: i32 = 5;
pub const DEFAULT_SHIELD_HP: i32 = 30;
pub const DEFAULT_SHIELD_TURNS: u32 = 2;

/// Share of the running damage total returned to the caster by `lifesteal`.
const CAST_LIFESTEAL_RATIO: (i32, i32) = (3, 10);

pub(super) type EffectHandler = fn(&mut EffectContext<'_>);

/// What happened to one resolved target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum TargetResult {
    Applied,
    Revived,
    Skipped,
}

/// Applies the echo to `ctx.target`, tags in declared order.
///
/// A dead target is only touched by a revive, which ends the cast for that
/// target.
pub(super) fn apply_echo(ctx: &mut EffectContext<'_>) -> TargetResult {
    let echo = ctx.echo;

    if !ctx.target().is_alive() {
        if !echo.revives() {
            let message = format!(
                "Cannot apply '{}' to {}: target is not alive.",
                echo.title,
                ctx.target().name
            );
            ctx.log.warn(message);
            return TargetResult::Skipped;
        }

        let amount = StatModifiers::amount_or(echo.modifiers.hp, DEFAULT_REVIVE_HP);
        if amount <= 0 {
            let message = format!(
                "'{}' fails to revive {}: no HP restored.",
                echo.title,
                ctx.target().name
            );
            ctx.log.warn(message);
            return TargetResult::Skipped;
        }

        let target = ctx.target_mut();
        target.hp = amount.min(target.max_hp);
        let restored = target.hp;
        let message = format!(
            "{} revives {} with {} HP using '{}'!",
            ctx.caster().name,
            ctx.target().name,
            restored,
            echo.title
        );
        ctx.log.info(message);
        return TargetResult::Revived;
    }

    for &tag in &echo.tags {
        handler(tag)(ctx);
    }
    TargetResult::Applied
}

/// Handler table: effect tag to the function that applies it.
pub(super) fn handler(tag: EffectTag) -> EffectHandler {
    match tag {
        EffectTag::Heal => heal,
        EffectTag::Regen => regen,
        EffectTag::Revive => revive_living,
        EffectTag::EpGain => ep_gain,
        EffectTag::Lifesteal => lifesteal,
        EffectTag::BonusDamage => bonus_damage,
        EffectTag::AoeDamage => aoe_damage,
        EffectTag::Burst => burst,
        EffectTag::Burn => burn,
        EffectTag::Dot => dot,
        EffectTag::DefBuff => def_buff,
        EffectTag::AtkBuff => atk_buff,
        EffectTag::SpdBuff => spd_buff,
        EffectTag::Slow => slow,
        EffectTag::Stun => stun,
        EffectTag::Freeze => freeze,
        EffectTag::Silence => silence,
        EffectTag::Debuff => debuff,
        EffectTag::Taunt => taunt,
        EffectTag::Shield => shield,
        EffectTag::Cloak => cloak,
        EffectTag::Dodge => dodge,
        EffectTag::Reflect => reflect,
        EffectTag::DamageNegation => damage_negation,
        EffectTag::AllyProtection => ally_protection,
        EffectTag::StatusImmunity => status_immunity,
        EffectTag::DefIgnore => def_ignore,
        EffectTag::BuffRemoval => buff_removal,
        EffectTag::DebuffRemoval => debuff_removal,
    }
}

/// `floor(0.75 * atk)`, never negative.
fn three_quarters(atk: i32) -> i32 {
    (f64::from(atk) * 0.75).floor().max(0.0) as i32
}

fn names(ctx: &EffectContext<'_>) -> (String, String) {
    (ctx.caster().name.clone(), ctx.target().name.clone())
}

// ============================================================================
// Restoration
// ============================================================================

fn heal(ctx: &mut EffectContext<'_>) {
    let amount = StatModifiers::delta(ctx.modifiers().hp);
    let healed = ctx.target_mut().heal(amount);
    let (caster, target) = names(ctx);
    ctx.log.info(format!(
        "{caster} heals {target} for {healed} HP with '{}'.",
        ctx.title()
    ));
}

fn regen(ctx: &mut EffectContext<'_>) {
    let amount = StatModifiers::amount_or(ctx.modifiers().hp, DEFAULT_REGEN);
    ctx.add_status(StatusKind::Regen, 3, Some(Magnitude::Amount(amount)));
    let (_, target) = names(ctx);
    ctx.log.info(format!(
        "{target} gains regeneration for 3 turns via '{}'.",
        ctx.title()
    ));
}

/// Revive on a living target has nothing to do.
fn revive_living(_: &mut EffectContext<'_>) {}

fn ep_gain(ctx: &mut EffectContext<'_>) {
    let amount = StatModifiers::delta(ctx.modifiers().ep);
    ctx.caster_mut().gain_ep(amount);
    let (caster, _) = names(ctx);
    ctx.log
        .info(format!("{caster} gains {amount} EP from '{}'.", ctx.title()));
}

fn lifesteal(ctx: &mut EffectContext<'_>) {
    if ctx.accumulated_damage <= 0 {
        return;
    }
    let (numerator, denominator) = CAST_LIFESTEAL_RATIO;
    let amount = ctx.accumulated_damage * numerator / denominator;
    ctx.caster_mut().heal(amount);
    let (caster, target) = names(ctx);
    ctx.log.info(format!(
        "{caster} steals {amount} HP from {target} via '{}'.",
        ctx.title()
    ));
}

// ============================================================================
// Damage
// ============================================================================

fn bonus_damage(ctx: &mut EffectContext<'_>) {
    let bonus = StatModifiers::delta(ctx.modifiers().atk);
    let caster = ctx.caster();
    let missing_hp_bonus = (caster.max_hp - caster.hp) / 3;
    let raw = caster.atk + bonus + missing_hp_bonus - ctx.target().def;
    let damage = raw.max(1);

    ctx.target_mut().take_damage(damage);
    ctx.accumulated_damage += damage;
    let (caster, target) = names(ctx);
    ctx.log.info(format!(
        "{caster} deals {damage} bonus damage to {target} with '{}'.",
        ctx.title()
    ));
}

fn aoe_damage(ctx: &mut EffectContext<'_>) {
    let damage = three_quarters(ctx.caster().atk);
    ctx.target_mut().take_damage(damage);
    let (caster, target) = names(ctx);
    ctx.log.info(format!(
        "{caster} deals {damage} AOE damage to {target} with '{}'.",
        ctx.title()
    ));
}

fn burst(ctx: &mut EffectContext<'_>) {
    let damage = three_quarters(ctx.caster().atk);
    // Direct subtraction, floored so HP never goes negative.
    let target = ctx.target_mut();
    target.hp = (target.hp - damage).max(0);
    let (_, target) = names(ctx);
    ctx.log.info(format!(
        "Burst from '{}' deals {damage} bonus damage to {target}!",
        ctx.title()
    ));
}

fn burn(ctx: &mut EffectContext<'_>) {
    let (_, target) = names(ctx);
    ctx.log.info(format!(
        "{target} is afflicted with burn from '{}'.",
        ctx.title()
    ));
}

fn dot(ctx: &mut EffectContext<'_>) {
    let amount = StatModifiers::amount_or(ctx.modifiers().atk, DEFAULT_DOT);
    ctx.add_status(StatusKind::Dot, 3, Some(Magnitude::Amount(amount)));
    let (_, target) = names(ctx);
    ctx.log.info(format!(
        "{target} suffers {amount} DOT for 3 turns via '{}'.",
        ctx.title()
    ));
}

// ============================================================================
// Stat Deltas
// ============================================================================

fn def_buff(ctx: &mut EffectContext<'_>) {
    let amount = StatModifiers::delta(ctx.modifiers().def);
    let target = ctx.target_mut();
    let old = target.def;
    target.def += amount;
    let new = target.def;
    let (_, name) = names(ctx);
    ctx.log.info(format!(
        "{name}'s DEF increased by {amount} (from {old} to {new}) via '{}'.",
        ctx.title()
    ));
}

fn atk_buff(ctx: &mut EffectContext<'_>) {
    let amount = StatModifiers::delta(ctx.modifiers().atk);
    let target = ctx.target_mut();
    let old = target.atk;
    target.atk += amount;
    let new = target.atk;
    let (_, name) = names(ctx);
    ctx.log.info(format!(
        "{name}'s ATK increased by {amount} (from {old} to {new}) via '{}'.",
        ctx.title()
    ));
}

fn spd_buff(ctx: &mut EffectContext<'_>) {
    let amount = StatModifiers::delta(ctx.modifiers().spd);
    let target = ctx.target_mut();
    let old = target.spd;
    target.spd += amount;
    let new = target.spd;
    let (_, name) = names(ctx);
    ctx.log.info(format!(
        "{name}'s SPD increased by {amount} (from {old} to {new}) via '{}'.",
        ctx.title()
    ));
}

fn slow(ctx: &mut EffectContext<'_>) {
    let amount = StatModifiers::delta(ctx.modifiers().spd);
    let target = ctx.target_mut();
    target.spd = (target.spd - amount).max(1);
    let (_, name) = names(ctx);
    ctx.log.info(format!(
        "{name}'s SPD is reduced by {amount} via '{}'.",
        ctx.title()
    ));
}

// ============================================================================
// Control
// ============================================================================

fn stun(ctx: &mut EffectContext<'_>) {
    ctx.add_status(StatusKind::Stun, 1, None);
    let (_, target) = names(ctx);
    ctx.log.info(format!(
        "{target} is stunned by '{}' and loses their next turn.",
        ctx.title()
    ));
}

fn freeze(ctx: &mut EffectContext<'_>) {
    ctx.add_status(StatusKind::Freeze, 1, None);
    let (_, target) = names(ctx);
    ctx.log.info(format!(
        "{target} is frozen by '{}' and cannot act next turn.",
        ctx.title()
    ));
}

fn silence(ctx: &mut EffectContext<'_>) {
    ctx.add_status(StatusKind::Silence, 2, None);
    let (_, target) = names(ctx);
    ctx.log.info(format!(
        "{target} is silenced by '{}' and cannot cast echoes.",
        ctx.title()
    ));
}

fn debuff(ctx: &mut EffectContext<'_>) {
    ctx.add_status(StatusKind::Debuff, 2, None);
    let (_, target) = names(ctx);
    ctx.log.info(format!(
        "{target} is afflicted with a debuff via '{}'.",
        ctx.title()
    ));
}

fn taunt(ctx: &mut EffectContext<'_>) {
    let (caster, target) = names(ctx);
    ctx.add_status(StatusKind::Taunt, 2, Some(Magnitude::Name(caster.clone())));
    ctx.log.info(format!(
        "{target} is forced to target {caster} due to '{}'.",
        ctx.title()
    ));
}

// ============================================================================
// Protection
// ============================================================================

fn shield(ctx: &mut EffectContext<'_>) {
    let amount = StatModifiers::amount_or(ctx.modifiers().hp, DEFAULT_SHIELD_HP);
    // Statuses expire at zero, so a shield lasts at least one turn.
    let turns = ctx.modifiers().duration_or(DEFAULT_SHIELD_TURNS).max(1);
    ctx.add_status(StatusKind::Shield, turns, Some(Magnitude::Amount(amount)));
    let (_, target) = names(ctx);
    ctx.log.info(format!(
        "{target} gains a shield of {amount} HP for {turns} turns via '{}'.",
        ctx.title()
    ));
}

fn cloak(ctx: &mut EffectContext<'_>) {
    ctx.add_status(StatusKind::Cloak, 1, None);
    let (_, target) = names(ctx);
    ctx.log.info(format!(
        "{target} becomes cloaked via '{}' and cannot be targeted.",
        ctx.title()
    ));
}

fn dodge(ctx: &mut EffectContext<'_>) {
    let chance = ctx.modifiers().dodge_or(DEFAULT_DODGE_CHANCE);
    ctx.add_status(StatusKind::Dodge, 2, Some(Magnitude::Chance(chance)));
    let (_, target) = names(ctx);
    ctx.log.info(format!(
        "{target} gains {}% dodge chance via '{}'.",
        (chance * 100.0) as i32,
        ctx.title()
    ));
}

fn reflect(ctx: &mut EffectContext<'_>) {
    ctx.add_status(StatusKind::Reflect, 1, None);
    let (_, target) = names(ctx);
    ctx.log
        .info(format!("{target} gains reflect from '{}'.", ctx.title()));
}

fn damage_negation(ctx: &mut EffectContext<'_>) {
    ctx.add_status(StatusKind::DamageNegation, 1, None);
    let (_, target) = names(ctx);
    ctx.log.info(format!(
        "{target} will negate incoming damage via '{}'.",
        ctx.title()
    ));
}

fn ally_protection(ctx: &mut EffectContext<'_>) {
    let (_, target) = names(ctx);
    ctx.add_status(
        StatusKind::AllyProtection,
        2,
        Some(Magnitude::Name(target.clone())),
    );
    ctx.log.info(format!(
        "{target} protects their allies via '{}'.",
        ctx.title()
    ));
}

fn status_immunity(ctx: &mut EffectContext<'_>) {
    ctx.add_status(StatusKind::StatusImmunity, 2, None);
    let (_, target) = names(ctx);
    ctx.log.info(format!(
        "{target} is immune to status effects for 2 turns via '{}'.",
        ctx.title()
    ));
}

fn def_ignore(ctx: &mut EffectContext<'_>) {
    ctx.add_status(StatusKind::DefIgnore, 1, None);
    let (caster, _) = names(ctx);
    ctx.log.info(format!(
        "{caster}'s attack ignores DEF via '{}'.",
        ctx.title()
    ));
}

// ============================================================================
// Cleansing
// ============================================================================

fn removed_list(removed: &[StatusKind]) -> String {
    if removed.is_empty() {
        return "none".to_string();
    }
    removed
        .iter()
        .map(|kind| kind.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn buff_removal(ctx: &mut EffectContext<'_>) {
    let removed = ctx.target_mut().status.remove_all_buffs();
    let (_, target) = names(ctx);
    ctx.log.info(format!(
        "{target}'s buffs removed by '{}': {}.",
        ctx.title(),
        removed_list(&removed)
    ));
}

fn debuff_removal(ctx: &mut EffectContext<'_>) {
    let removed = ctx.target_mut().status.remove_all_debuffs();
    let (_, target) = names(ctx);
    ctx.log.info(format!(
        "{target}'s debuffs cleansed by '{}': {}.",
        ctx.title(),
        removed_list(&removed)
    ));
}
