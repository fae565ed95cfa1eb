//! Status ledger for combatants.
//!
//! Status effects are timed conditions that heal, hurt, restrict, or flag a
//! combatant for other rules to consult (targeting, damage mitigation, cast
//! gating).
//!
//! # Turn-based Duration
//!
//! Effects store `remaining` turns. Each time the owner's turn is processed
//! every effect fires once, then loses one turn; effects reaching zero are
//! removed in the same pass. The ledger never merges entries: two effects of
//! the same kind simply coexist.

use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::log::BattleLog;
use crate::pipeline::{DEFAULT_DODGE_CHANCE, DEFAULT_DOT, DEFAULT_REGEN};
use crate::state::Combatant;

/// Types of status effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatusKind {
    // ========================================================================
    // Ticking (act on the owner every processed turn)
    // ========================================================================
    /// Heals the owner each turn.
    Regen,
    /// Damages the owner each turn.
    Dot,
    /// Owner loses its next action.
    Stun,
    /// Owner loses its next action.
    Freeze,

    // ========================================================================
    // Buffs (passive flags consulted by other rules)
    // ========================================================================
    Reflect,
    /// Chance to avoid contact damage entirely.
    Dodge,
    StatusImmunity,
    /// Absorbs contact damage up to its magnitude.
    Shield,
    /// Hidden from enemy target selection unless someone taunts.
    Cloak,
    /// Forces enemy target selection onto the owner.
    Taunt,
    DamageNegation,
    AllyProtection,
    /// Heals the owner for a share of contact damage dealt.
    Lifesteal,
    DefIgnore,

    // ========================================================================
    // Debuffs
    // ========================================================================
    /// Owner cannot cast echoes.
    Silence,
    Slow,
    Debuff,
}

impl StatusKind {
    /// Kinds removed by buff-removal effects.
    pub const BUFFS: [StatusKind; 7] = [
        StatusKind::Regen,
        StatusKind::Cloak,
        StatusKind::StatusImmunity,
        StatusKind::Dodge,
        StatusKind::Reflect,
        StatusKind::DamageNegation,
        StatusKind::AllyProtection,
    ];

    /// Kinds removed by debuff-removal effects.
    pub const DEBUFFS: [StatusKind; 6] = [
        StatusKind::Dot,
        StatusKind::Stun,
        StatusKind::Freeze,
        StatusKind::Silence,
        StatusKind::Debuff,
        StatusKind::Slow,
    ];

    pub fn as_str(self) -> &'static str {
        self.into()
    }

    pub fn is_buff(self) -> bool {
        Self::BUFFS.contains(&self)
    }

    pub fn is_debuff(self) -> bool {
        Self::DEBUFFS.contains(&self)
    }
}

impl core::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload carried by a status effect.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Magnitude {
    /// HP healed, dealt, or absorbed.
    Amount(i32),
    /// Probability or ratio in `[0, 1]`.
    Chance(f64),
    /// The combatant the effect refers to (taunter, protector).
    Name(String),
}

/// A single status effect with remaining duration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Turns left before expiry.
    pub remaining: u32,
    pub magnitude: Option<Magnitude>,
    /// Title of the echo that applied the effect.
    pub source: String,
}

impl StatusEffect {
    /// Integer magnitude, or `default` when the effect carries none.
    ///
    /// A zero-strength regen or DOT ticks for `default`.
    pub fn amount_or(&self, default: i32) -> i32 {
        match self.magnitude {
            Some(Magnitude::Amount(value)) if value != 0 => value,
            _ => default,
        }
    }

    pub fn chance_or(&self, default: f64) -> f64 {
        match self.magnitude {
            Some(Magnitude::Chance(value)) => value,
            _ => default,
        }
    }
}

/// Active status effects on a combatant, in application order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusLedger {
    effects: Vec<StatusEffect>,
}

impl StatusLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new effect. Existing effects of the same kind are untouched.
    pub fn add(
        &mut self,
        kind: StatusKind,
        duration: u32,
        magnitude: Option<Magnitude>,
        source: impl Into<String>,
    ) {
        self.effects.push(StatusEffect {
            kind,
            remaining: duration,
            magnitude,
            source: source.into(),
        });
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// All entries of `kind`, in ledger order.
    pub fn get(&self, kind: StatusKind) -> impl Iterator<Item = &StatusEffect> + '_ {
        self.effects.iter().filter(move |e| e.kind == kind)
    }

    /// The first entry of `kind`, the only one consulted for shields.
    pub fn first_mut(&mut self, kind: StatusKind) -> Option<&mut StatusEffect> {
        self.effects.iter_mut().find(|e| e.kind == kind)
    }

    /// Drops every entry of `kind`. Returns how many were removed.
    pub fn remove(&mut self, kind: StatusKind) -> usize {
        let before = self.effects.len();
        self.effects.retain(|e| e.kind != kind);
        before - self.effects.len()
    }

    /// Drops only the first entry of `kind`, exposing the next one.
    pub fn remove_first(&mut self, kind: StatusKind) -> Option<StatusEffect> {
        let index = self.effects.iter().position(|e| e.kind == kind)?;
        Some(self.effects.remove(index))
    }

    /// Removes every buff and returns the removed kinds in ledger order.
    pub fn remove_all_buffs(&mut self) -> Vec<StatusKind> {
        self.remove_matching(StatusKind::is_buff)
    }

    /// Removes every debuff and returns the removed kinds in ledger order.
    pub fn remove_all_debuffs(&mut self) -> Vec<StatusKind> {
        self.remove_matching(StatusKind::is_debuff)
    }

    fn remove_matching(&mut self, predicate: impl Fn(StatusKind) -> bool) -> Vec<StatusKind> {
        let removed = self
            .effects
            .iter()
            .filter(|e| predicate(e.kind))
            .map(|e| e.kind)
            .collect();
        self.effects.retain(|e| !predicate(e.kind));
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

/// Runs one processed turn of `owner`'s ledger.
///
/// Works on a snapshot of the entries taken before any of them fire, so an
/// expiry never disturbs the iteration. After this returns, no entry with zero
/// remaining turns is observable.
pub(crate) fn process_turn(owner: &mut Combatant, log: &mut BattleLog) {
    let mut effects = core::mem::take(&mut owner.status.effects);

    for effect in &mut effects {
        fire(owner, effect, log);
        effect.remaining = effect.remaining.saturating_sub(1);
    }

    effects.retain(|effect| {
        if effect.remaining == 0 {
            log.info(format!(
                "'{}' from '{}' expired for {}.",
                effect.kind, effect.source, owner.name
            ));
            false
        } else {
            true
        }
    });

    // Anything added while firing (nothing today) lands after the snapshot.
    effects.append(&mut owner.status.effects);
    owner.status.effects = effects;
}

fn fire(owner: &mut Combatant, effect: &StatusEffect, log: &mut BattleLog) {
    let name = &owner.name;
    match effect.kind {
        StatusKind::Regen => {
            let healed = owner.heal(effect.amount_or(DEFAULT_REGEN));
            log.info(format!(
                "{} regenerates {} HP from '{}'.",
                owner.name, healed, effect.source
            ));
        }
        StatusKind::Dot => {
            let amount = effect.amount_or(DEFAULT_DOT);
            owner.take_damage(amount);
            log.info(format!(
                "{} takes {} DOT from '{}'.",
                owner.name, amount, effect.source
            ));
        }
        StatusKind::Stun => {
            owner.skip_turn = true;
            log.info(format!("{name} is stunned and cannot act this turn."));
        }
        StatusKind::Freeze => {
            owner.skip_turn = true;
            log.info(format!("{name} is frozen and skips this turn."));
        }
        StatusKind::Reflect => {
            log.info(format!(
                "{name} is ready to reflect damage via '{}'.",
                effect.source
            ));
        }
        StatusKind::Dodge => {
            let percent = (effect.chance_or(DEFAULT_DODGE_CHANCE) * 100.0) as i32;
            log.info(format!(
                "{name} may dodge attacks this turn (chance: {percent}%)."
            ));
        }
        StatusKind::StatusImmunity => {
            log.info(format!("{name} is immune to new status effects."));
        }
        _ => {}
    }
}
