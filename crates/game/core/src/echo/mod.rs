//! Echo descriptors and the echo catalog.
//!
//! Echoes are immutable once loaded. Combatants refer to them by title and the
//! engine borrows them from the [`EchoCatalog`] for the duration of a cast.

use std::collections::HashMap;

use crate::state::Combatant;

/// Semantic effect tags an echo can carry.
///
/// Tags are applied in the order the echo declares them.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EffectTag {
    // ========================================================================
    // Restoration
    // ========================================================================
    Heal,
    Regen,
    /// Brings a dead target back and ends the cast for that target.
    Revive,
    EpGain,
    Lifesteal,

    // ========================================================================
    // Damage
    // ========================================================================
    /// ATK-based hit that grows with the caster's missing HP.
    BonusDamage,
    AoeDamage,
    /// Raw hit that bypasses the clamped damage helper.
    Burst,
    /// Logged only.
    Burn,
    Dot,

    // ========================================================================
    // Stat Deltas
    // ========================================================================
    DefBuff,
    AtkBuff,
    SpdBuff,
    Slow,

    // ========================================================================
    // Control
    // ========================================================================
    Stun,
    Freeze,
    Silence,
    Debuff,
    Taunt,

    // ========================================================================
    // Protection
    // ========================================================================
    Shield,
    Cloak,
    Dodge,
    Reflect,
    DamageNegation,
    AllyProtection,
    StatusImmunity,
    DefIgnore,

    // ========================================================================
    // Cleansing
    // ========================================================================
    BuffRemoval,
    DebuffRemoval,
}

/// Legal-target shape of an echo.
#[derive(Clone, Debug, PartialEq, Eq, Hash, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum TargetClass {
    #[strum(serialize = "self")]
    SelfOnly,
    Ally,
    Enemy,
    AoeAlly,
    AoeEnemy,
    /// Catalog value outside the known vocabulary. Never legal.
    #[strum(default)]
    Unrecognized(String),
}

impl TargetClass {
    /// Parses a catalog value; unknown strings become [`TargetClass::Unrecognized`].
    pub fn parse(raw: &str) -> Self {
        raw.parse()
            .unwrap_or_else(|_| TargetClass::Unrecognized(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            TargetClass::SelfOnly => "self",
            TargetClass::Ally => "ally",
            TargetClass::Enemy => "enemy",
            TargetClass::AoeAlly => "aoe_ally",
            TargetClass::AoeEnemy => "aoe_enemy",
            TargetClass::Unrecognized(raw) => raw,
        }
    }

    pub fn is_aoe(&self) -> bool {
        matches!(self, TargetClass::AoeAlly | TargetClass::AoeEnemy)
    }

    /// Whether a cast of this class needs an explicit target.
    pub fn needs_target(&self) -> bool {
        matches!(self, TargetClass::Ally | TargetClass::Enemy)
    }
}

impl core::fmt::Display for TargetClass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named deltas consumed by an echo's tags.
///
/// What each field means depends on the tag reading it: `hp` is a heal amount
/// for `heal`, a revive amount for `revive` and a shield value for `shield`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatModifiers {
    pub atk: Option<i32>,
    pub def: Option<i32>,
    pub spd: Option<i32>,
    pub hp: Option<i32>,
    pub ep: Option<i32>,
    pub dodge: Option<f64>,
    pub duration: Option<u32>,
}

impl StatModifiers {
    /// Plain delta: absent reads as zero.
    pub fn delta(value: Option<i32>) -> i32 {
        value.unwrap_or(0)
    }

    /// Amount with a non-zero default: only an absent value reads as `default`.
    pub fn amount_or(value: Option<i32>, default: i32) -> i32 {
        value.unwrap_or(default)
    }

    pub fn dodge_or(&self, default: f64) -> f64 {
        self.dodge.unwrap_or(default)
    }

    pub fn duration_or(&self, default: u32) -> u32 {
        self.duration.unwrap_or(default)
    }
}

/// Immutable ability descriptor.
#[derive(Clone, Debug, PartialEq)]
pub struct Echo {
    pub title: String,
    pub tags: Vec<EffectTag>,
    pub target: TargetClass,
    pub modifiers: StatModifiers,
    pub ep_cost: u32,
}

impl Echo {
    pub fn has_tag(&self, tag: EffectTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn revives(&self) -> bool {
        self.has_tag(EffectTag::Revive)
    }

    pub fn cost(&self) -> i32 {
        i32::try_from(self.ep_cost).unwrap_or(i32::MAX)
    }

    pub fn affordable_by(&self, caster: &Combatant) -> bool {
        caster.ep >= self.cost()
    }

    /// Tag list joined for menus and validation reports.
    pub fn tag_list(&self) -> String {
        self.tags
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join(", ")
    }
}

/// Echo lookup keyed by title.
#[derive(Clone, Debug, Default)]
pub struct EchoCatalog {
    echoes: HashMap<String, Echo>,
}

impl EchoCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an echo, returning the one previously stored under its title.
    pub fn insert(&mut self, echo: Echo) -> Option<Echo> {
        self.echoes.insert(echo.title.clone(), echo)
    }

    pub fn get(&self, title: &str) -> Option<&Echo> {
        self.echoes.get(title)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.echoes.contains_key(title)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Echo> {
        self.echoes.values()
    }

    /// Echoes the combatant knows, in the combatant's own order.
    pub fn known_by<'a>(
        &'a self,
        combatant: &'a Combatant,
    ) -> impl Iterator<Item = &'a Echo> + 'a {
        combatant.echoes.iter().filter_map(|title| self.get(title))
    }

    pub fn len(&self) -> usize {
        self.echoes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.echoes.is_empty()
    }
}

impl FromIterator<Echo> for EchoCatalog {
    fn from_iter<I: IntoIterator<Item = Echo>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for echo in iter {
            catalog.insert(echo);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{combatant, echo};

    #[test]
    fn tags_parse_from_catalog_names() {
        assert_eq!("bonus_damage".parse::<EffectTag>().ok(), Some(EffectTag::BonusDamage));
        assert_eq!("status_immunity".parse::<EffectTag>().ok(), Some(EffectTag::StatusImmunity));
        assert!("teleport".parse::<EffectTag>().is_err());
        assert_eq!(EffectTag::DebuffRemoval.as_ref(), "debuff_removal");
    }

    #[test]
    fn target_classes_parse_and_keep_unknown_values() {
        assert_eq!(TargetClass::parse("self"), TargetClass::SelfOnly);
        assert_eq!(TargetClass::parse("aoe_enemy"), TargetClass::AoeEnemy);
        assert_eq!(
            TargetClass::parse("ally_aoe"),
            TargetClass::Unrecognized("ally_aoe".into())
        );
        assert_eq!(TargetClass::parse("ally_aoe").to_string(), "ally_aoe");
    }

    #[test]
    fn only_absent_amounts_take_defaults() {
        assert_eq!(StatModifiers::amount_or(Some(0), 25), 0);
        assert_eq!(StatModifiers::amount_or(None, 25), 25);
        assert_eq!(StatModifiers::amount_or(Some(40), 25), 40);
        assert_eq!(StatModifiers::delta(None), 0);
        assert_eq!(StatModifiers::default().duration_or(2), 2);

        let explicit = StatModifiers {
            dodge: Some(0.0),
            duration: Some(0),
            ..StatModifiers::default()
        };
        assert_eq!(explicit.dodge_or(0.25), 0.0);
        assert_eq!(explicit.duration_or(2), 0);
    }

    #[test]
    fn catalog_resolves_known_echoes_in_order() {
        let catalog: EchoCatalog = [
            echo("Alpha", &[EffectTag::Heal], TargetClass::Ally, 10),
            echo("Beta", &[EffectTag::Stun], TargetClass::Enemy, 50),
        ]
        .into_iter()
        .collect();

        let mut caster = combatant("Ana", 100);
        caster.echoes = vec!["Beta".into(), "Missing".into(), "Alpha".into()];
        caster.ep = 20;

        let known: Vec<&str> = catalog.known_by(&caster).map(|e| e.title.as_str()).collect();
        assert_eq!(known, ["Beta", "Alpha"]);
        assert!(!catalog.get("Beta").is_some_and(|e| e.affordable_by(&caster)));
        assert!(catalog.get("Alpha").is_some_and(|e| e.affordable_by(&caster)));
    }
}
