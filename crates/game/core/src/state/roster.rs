use core::ops::{Index, IndexMut};

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::error::{ErrorSeverity, GameError};

use super::combatant::{Combatant, CombatantId, Side};

/// Squad membership list, bounded by the squad size limit.
pub type Squad = ArrayVec<CombatantId, { BattleConfig::MAX_SQUAD_SIZE }>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("the {0} squad has no combatants")]
    EmptySquad(Side),

    #[error("the {side} squad has {len} combatants (at most {max})")]
    SquadTooLarge { side: Side, len: usize, max: usize },
}

impl GameError for RosterError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptySquad(_) => "ROSTER_EMPTY_SQUAD",
            Self::SquadTooLarge { .. } => "ROSTER_SQUAD_TOO_LARGE",
        }
    }
}

/// Arena owning every combatant of a battle.
///
/// Combatants are addressed by [`CombatantId`], assigned in squad order with
/// the Dreamers first. Squads never change membership during a battle; dead
/// combatants stay in place so they can be revived.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster {
    combatants: Vec<Combatant>,
    dreamers: Squad,
    fixers: Squad,
}

impl Roster {
    pub fn new(dreamers: Vec<Combatant>, fixers: Vec<Combatant>) -> Result<Self, RosterError> {
        let mut roster = Self {
            combatants: Vec::with_capacity(dreamers.len() + fixers.len()),
            dreamers: Squad::new(),
            fixers: Squad::new(),
        };
        roster.enlist(Side::Dreamers, dreamers)?;
        roster.enlist(Side::Fixers, fixers)?;
        Ok(roster)
    }

    fn enlist(&mut self, side: Side, members: Vec<Combatant>) -> Result<(), RosterError> {
        if members.is_empty() {
            return Err(RosterError::EmptySquad(side));
        }
        if members.len() > BattleConfig::MAX_SQUAD_SIZE {
            return Err(RosterError::SquadTooLarge {
                side,
                len: members.len(),
                max: BattleConfig::MAX_SQUAD_SIZE,
            });
        }

        for mut combatant in members {
            let id = CombatantId(self.combatants.len() as u16);
            combatant.id = id;
            combatant.side = side;
            self.combatants.push(combatant);
            match side {
                Side::Dreamers => self.dreamers.push(id),
                Side::Fixers => self.fixers.push(id),
            }
        }
        Ok(())
    }

    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.get(id.index())
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.get_mut(id.index())
    }

    /// Two distinct combatants borrowed mutably at once.
    pub fn pair_mut(
        &mut self,
        first: CombatantId,
        second: CombatantId,
    ) -> Option<(&mut Combatant, &mut Combatant)> {
        let (a, b) = (first.index(), second.index());
        if a == b || a >= self.combatants.len() || b >= self.combatants.len() {
            return None;
        }
        if a < b {
            let (left, right) = self.combatants.split_at_mut(b);
            Some((&mut left[a], &mut right[0]))
        } else {
            let (left, right) = self.combatants.split_at_mut(a);
            Some((&mut right[0], &mut left[b]))
        }
    }

    pub fn squad(&self, side: Side) -> &[CombatantId] {
        match side {
            Side::Dreamers => &self.dreamers,
            Side::Fixers => &self.fixers,
        }
    }

    /// The actor's own squad, the actor included.
    pub fn allies_of(&self, id: CombatantId) -> &[CombatantId] {
        match self.get(id) {
            Some(combatant) => self.squad(combatant.side),
            None => &[],
        }
    }

    pub fn enemies_of(&self, id: CombatantId) -> &[CombatantId] {
        match self.get(id) {
            Some(combatant) => self.squad(combatant.side.opponent()),
            None => &[],
        }
    }

    pub fn members(&self, side: Side) -> impl Iterator<Item = &Combatant> + '_ {
        self.squad(side).iter().map(|id| &self.combatants[id.index()])
    }

    pub fn side_alive(&self, side: Side) -> bool {
        self.members(side).any(Combatant::is_alive)
    }

    /// The surviving side once the other is wiped out.
    pub fn winner(&self) -> Option<Side> {
        match (self.side_alive(Side::Dreamers), self.side_alive(Side::Fixers)) {
            (true, false) => Some(Side::Dreamers),
            (false, true) => Some(Side::Fixers),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.combatants.iter_mut()
    }

    pub fn find_by_name(&self, name: &str) -> Option<CombatantId> {
        self.combatants
            .iter()
            .find(|combatant| combatant.name == name)
            .map(|combatant| combatant.id)
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }
}

impl Index<CombatantId> for Roster {
    type Output = Combatant;

    fn index(&self, id: CombatantId) -> &Self::Output {
        &self.combatants[id.index()]
    }
}

impl IndexMut<CombatantId> for Roster {
    fn index_mut(&mut self, id: CombatantId) -> &mut Self::Output {
        &mut self.combatants[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{combatant, roster};

    #[test]
    fn ids_follow_squad_order_dreamers_first() {
        let roster = roster(&["Ana", "Bo"], &["Cy"]);

        assert_eq!(roster.squad(Side::Dreamers), &[CombatantId(0), CombatantId(1)]);
        assert_eq!(roster.squad(Side::Fixers), &[CombatantId(2)]);
        assert_eq!(roster[CombatantId(2)].side, Side::Fixers);
        assert_eq!(roster.find_by_name("Bo"), Some(CombatantId(1)));
        assert_eq!(roster.allies_of(CombatantId(0)).len(), 2);
        assert_eq!(roster.enemies_of(CombatantId(0)), &[CombatantId(2)]);
    }

    #[test]
    fn squads_must_be_non_empty_and_bounded() {
        let err = Roster::new(Vec::new(), vec![combatant("Cy", 100)]);
        assert_eq!(err, Err(RosterError::EmptySquad(Side::Dreamers)));

        let six = (0..6).map(|i| combatant(&format!("D{i}"), 100)).collect();
        let err = Roster::new(six, vec![combatant("Cy", 100)]);
        assert!(matches!(
            err,
            Err(RosterError::SquadTooLarge { side: Side::Dreamers, len: 6, .. })
        ));
    }

    #[test]
    fn winner_appears_when_one_side_falls() {
        let mut roster = roster(&["Ana"], &["Cy", "Di"]);
        assert_eq!(roster.winner(), None);

        roster[CombatantId(0)].hp = 0;
        assert_eq!(roster.winner(), Some(Side::Fixers));
    }

    #[test]
    fn pair_mut_rejects_same_id() {
        let mut roster = roster(&["Ana"], &["Cy"]);
        assert!(roster.pair_mut(CombatantId(0), CombatantId(0)).is_none());

        let (cy, ana) = roster.pair_mut(CombatantId(1), CombatantId(0)).expect("pair");
        assert_eq!((cy.name.as_str(), ana.name.as_str()), ("Cy", "Ana"));
    }
}
