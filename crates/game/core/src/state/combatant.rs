use crate::config::BattleConfig;
use crate::log::BattleLog;

use super::house::{House, HouseBonus, Traits};
use super::status::{self, StatusLedger};

/// Index of a combatant inside its [`Roster`](super::Roster).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u16);

impl CombatantId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for CombatantId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Dreamers,
    Fixers,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Dreamers, Side::Fixers];

    pub fn opponent(self) -> Self {
        match self {
            Side::Dreamers => Side::Fixers,
            Side::Fixers => Side::Dreamers,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Dreamers => "Dreamers",
            Side::Fixers => "Fixers",
        }
    }
}

impl core::fmt::Display for Side {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog stats before the flat HP bonus and house passives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseStats {
    pub hp: i32,
    pub atk: i32,
    pub def: i32,
    pub spd: i32,
}

/// Static champion definition a combatant is drafted from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChampionTemplate {
    pub name: String,
    pub grand_title: String,
    pub house: House,
    pub stats: BaseStats,
    /// Echo titles, in menu order.
    pub echoes: Vec<String>,
}

/// Mutable battle entity.
///
/// `hp` stays within `[0, max_hp]` and `ep` within `[0, EP_MAX]` as long as
/// callers go through [`heal`](Self::heal), [`take_damage`](Self::take_damage)
/// and [`gain_ep`](Self::gain_ep).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: CombatantId,
    pub side: Side,
    pub name: String,
    pub grand_title: String,
    pub house: House,

    pub max_hp: i32,
    pub hp: i32,
    pub ep: i32,
    pub atk: i32,
    pub def: i32,
    pub spd: i32,
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    /// EP regained at every round end.
    pub ep_per_turn: i32,

    pub traits: Traits,
    /// House flavor line shown next to the combatant.
    pub trait_description: String,

    /// Set by stun or freeze processing; consumed by the round controller.
    pub skip_turn: bool,
    pub status: StatusLedger,
    pub echoes: Vec<String>,
}

impl Combatant {
    /// Drafts a combatant from its template and applies the house bundle once.
    ///
    /// `id` and `side` are placeholders until the combatant joins a roster.
    pub fn new(
        template: &ChampionTemplate,
        bonus: Option<&HouseBonus>,
        config: &BattleConfig,
    ) -> Self {
        let max_hp = template.stats.hp + config.hp_bonus;
        let mut combatant = Self {
            id: CombatantId(0),
            side: Side::Dreamers,
            name: template.name.clone(),
            grand_title: template.grand_title.clone(),
            house: template.house,
            max_hp,
            hp: max_hp,
            ep: 0,
            atk: template.stats.atk,
            def: template.stats.def,
            spd: template.stats.spd,
            crit_chance: config.default_crit_chance,
            crit_multiplier: config.default_crit_multiplier,
            ep_per_turn: config.base_ep_per_turn,
            traits: Traits::default(),
            trait_description: String::new(),
            skip_turn: false,
            status: StatusLedger::new(),
            echoes: template.echoes.clone(),
        };

        if let Some(bonus) = bonus {
            combatant.apply_house_bonus(bonus);
        }
        combatant
    }

    fn apply_house_bonus(&mut self, bonus: &HouseBonus) {
        self.atk += bonus.atk;
        self.def += bonus.def;
        self.spd += bonus.spd;
        self.gain_ep(bonus.ep);
        self.hp = (self.hp + bonus.hp).clamp(0, self.max_hp);
        self.crit_chance += f64::from(bonus.crit) / 100.0;
        self.ep_per_turn += bonus.ep_per_turn;
        self.traits = bonus.traits();
        self.trait_description = bonus.description.clone();
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Below 30% of max HP.
    pub fn is_low_hp(&self) -> bool {
        f64::from(self.hp) < f64::from(self.max_hp) * 0.3
    }

    pub fn knows(&self, title: &str) -> bool {
        self.echoes.iter().any(|known| known == title)
    }

    /// Heals up to `max_hp`. Returns the HP actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount).clamp(0, self.max_hp);
        self.hp - before
    }

    /// Removes HP, floored at zero. Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp - amount).clamp(0, self.max_hp);
        before - self.hp
    }

    /// Adds EP clamped to `[0, EP_MAX]`. Returns the EP actually gained.
    pub fn gain_ep(&mut self, amount: i32) -> i32 {
        let before = self.ep;
        self.ep = (self.ep + amount).clamp(0, BattleConfig::EP_MAX);
        self.ep - before
    }

    /// Runs this combatant's status ledger for one processed turn.
    pub fn process_status(&mut self, log: &mut BattleLog) {
        status::process_turn(self, log);
    }

    /// One-line summary: `HP:x/y | EP:z | ATK:a | DEF:d | SPD:s`.
    pub fn stat_line(&self) -> String {
        format!(
            "HP:{}/{} | EP:{} | ATK:{} | DEF:{} | SPD:{}",
            self.hp, self.max_hp, self.ep, self.atk, self.def, self.spd
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> ChampionTemplate {
        ChampionTemplate {
            name: "Eduardo Carlos".into(),
            grand_title: "Golden Aegis Keeper".into(),
            house: House::Scarlet,
            stats: BaseStats {
                hp: 145,
                atk: 30,
                def: 48,
                spd: 28,
            },
            echoes: vec!["Pyreborn Testament".into()],
        }
    }

    #[test]
    fn creation_applies_hp_bonus_and_defaults() {
        let combatant = Combatant::new(&template(), None, &BattleConfig::default());

        assert_eq!(combatant.max_hp, 195);
        assert_eq!(combatant.hp, 195);
        assert_eq!(combatant.ep, 0);
        assert_eq!(combatant.ep_per_turn, 25);
        assert!((combatant.crit_chance - 0.10).abs() < f64::EPSILON);
        assert!(combatant.traits.flags.is_empty());
        assert!(combatant.knows("Pyreborn Testament"));
    }

    #[test]
    fn house_bonus_applies_once_with_clamps() {
        let bonus = HouseBonus {
            atk: 5,
            def: -2,
            ep: 150,
            hp: 40,
            crit: 4,
            ep_per_turn: 5,
            crit_dodge: true,
            ..HouseBonus::default()
        };
        let combatant = Combatant::new(&template(), Some(&bonus), &BattleConfig::default());

        assert_eq!(combatant.atk, 35);
        assert_eq!(combatant.def, 46);
        assert_eq!(combatant.ep, BattleConfig::EP_MAX);
        assert_eq!(combatant.hp, combatant.max_hp);
        assert!((combatant.crit_chance - 0.14).abs() < 1e-9);
        assert_eq!(combatant.ep_per_turn, 30);
        assert!(combatant.traits.crit_dodge());
    }

    #[test]
    fn hp_and_ep_stay_in_bounds() {
        let mut combatant = Combatant::new(&template(), None, &BattleConfig::default());

        assert_eq!(combatant.take_damage(500), 195);
        assert_eq!(combatant.hp, 0);
        assert!(!combatant.is_alive());
        assert_eq!(combatant.heal(500), 195);
        assert_eq!(combatant.gain_ep(130), 100);
        assert_eq!(combatant.gain_ep(-130), -100);
        assert_eq!(combatant.ep, 0);
    }

    #[test]
    fn low_hp_threshold_is_thirty_percent() {
        let mut combatant = Combatant::new(&template(), None, &BattleConfig::default());
        combatant.max_hp = 100;
        combatant.hp = 30;
        assert!(!combatant.is_low_hp());
        combatant.hp = 29;
        assert!(combatant.is_low_hp());
    }
}
