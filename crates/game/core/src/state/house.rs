//! Houses and their passive bundles.

use bitflags::bitflags;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// A combatant's allegiance.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter,
    IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum House {
    Scarlet,
    Alizarin,
    Violet,
    Purpur,
    Orelian,
    Iridion,
    Rosarium,
    Olive,
    Onyx,
    Ivory,
}

/// Passive bundle a house grants once at combatant creation.
///
/// Absent fields mean "not granted" and resolve to zero or false.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HouseBonus {
    pub house: Option<House>,
    pub atk: i32,
    pub def: i32,
    pub spd: i32,
    pub ep: i32,
    pub hp: i32,
    /// Added crit chance in percentage points.
    pub crit: i32,
    pub hp_regen: i32,
    pub ep_per_turn: i32,
    pub atk_if_low_hp: i32,
    pub ep_on_hit: i32,
    pub ep_on_ko_received: i32,
    pub crit_dodge: bool,
    pub immune_turn_delay: bool,
    pub random_buff: bool,
    pub description: String,
}

impl HouseBonus {
    pub fn flags(&self) -> TraitFlags {
        let mut flags = TraitFlags::empty();
        flags.set(TraitFlags::CRIT_DODGE, self.crit_dodge);
        flags.set(TraitFlags::IMMUNE_TURN_DELAY, self.immune_turn_delay);
        flags.set(TraitFlags::RANDOM_BUFF, self.random_buff);
        flags
    }

    pub fn traits(&self) -> Traits {
        Traits {
            flags: self.flags(),
            atk_if_low_hp: self.atk_if_low_hp,
            ep_on_hit: self.ep_on_hit,
            ep_on_ko_received: self.ep_on_ko_received,
            hp_regen: self.hp_regen,
        }
    }
}

bitflags! {
    /// Boolean passives granted by a house.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TraitFlags: u8 {
        /// Incoming crits deal base damage.
        const CRIT_DODGE        = 1 << 0;
        /// Stun and freeze never cost this combatant its action.
        const IMMUNE_TURN_DELAY = 1 << 1;
        const RANDOM_BUFF       = 1 << 2;
    }
}

/// Passive traits resolved once from the house bonus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Traits {
    pub flags: TraitFlags,
    /// Flat strike bonus while below 30% HP.
    pub atk_if_low_hp: i32,
    /// EP gained for every strike landed.
    pub ep_on_hit: i32,
    /// EP gained when a strike knocks the target out.
    pub ep_on_ko_received: i32,
    /// House data only; no battle phase heals by it.
    pub hp_regen: i32,
}

impl Traits {
    pub fn crit_dodge(&self) -> bool {
        self.flags.contains(TraitFlags::CRIT_DODGE)
    }

    pub fn immune_turn_delay(&self) -> bool {
        self.flags.contains(TraitFlags::IMMUNE_TURN_DELAY)
    }
}
