//! Fixtures shared by unit tests.

use crate::config::BattleConfig;
use crate::echo::{EffectTag, Echo, StatModifiers, TargetClass};
use crate::state::{BaseStats, ChampionTemplate, Combatant, House, Roster};

/// Plain combatant with `max_hp` HP, 20 ATK, 10 DEF, 10 SPD and no house bonus.
pub fn combatant(name: &str, max_hp: i32) -> Combatant {
    let template = ChampionTemplate {
        name: name.to_string(),
        grand_title: String::new(),
        house: House::Scarlet,
        stats: BaseStats {
            hp: max_hp - BattleConfig::DEFAULT_HP_BONUS,
            atk: 20,
            def: 10,
            spd: 10,
        },
        echoes: Vec::new(),
    };
    Combatant::new(&template, None, &BattleConfig::default())
}

pub fn roster(dreamers: &[&str], fixers: &[&str]) -> Roster {
    let build = |names: &[&str]| names.iter().map(|name| combatant(name, 100)).collect();
    Roster::new(build(dreamers), build(fixers)).expect("fixture roster")
}

pub fn echo(title: &str, tags: &[EffectTag], target: TargetClass, cost: u32) -> Echo {
    Echo {
        title: title.to_string(),
        tags: tags.to_vec(),
        target,
        modifiers: StatModifiers::default(),
        ep_cost: cost,
    }
}
