//! Squad drafting from catalog templates.

use waltz_core::{BattleConfig, Combatant, RandomSource, Roster, RosterError, Side};

use crate::catalog::Catalog;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("no champion named '{0}' in the catalog")]
    UnknownChampion(String),

    #[error("'{0}' has already been drafted")]
    AlreadyPicked(String),

    #[error("the {0} squad is already full")]
    SquadFull(Side),

    #[error(transparent)]
    Roster(#[from] RosterError),
}

/// Collects champion picks for both squads and drafts them into a [`Roster`].
///
/// A champion can be drafted once per battle, on either side.
#[derive(Clone, Debug)]
pub struct RosterBuilder<'a> {
    catalog: &'a Catalog,
    config: BattleConfig,
    dreamers: Vec<String>,
    fixers: Vec<String>,
}

impl<'a> RosterBuilder<'a> {
    pub fn new(catalog: &'a Catalog, config: BattleConfig) -> Self {
        Self {
            catalog,
            config,
            dreamers: Vec::new(),
            fixers: Vec::new(),
        }
    }

    pub fn picks(&self, side: Side) -> &[String] {
        match side {
            Side::Dreamers => &self.dreamers,
            Side::Fixers => &self.fixers,
        }
    }

    pub fn is_picked(&self, name: &str) -> bool {
        self.dreamers.iter().chain(&self.fixers).any(|n| n == name)
    }

    /// Drafts a named champion onto `side`.
    pub fn add(&mut self, side: Side, name: &str) -> Result<&mut Self, DraftError> {
        if self.catalog.champion(name).is_none() {
            return Err(DraftError::UnknownChampion(name.to_string()));
        }
        if self.is_picked(name) {
            return Err(DraftError::AlreadyPicked(name.to_string()));
        }
        let squad = self.squad_mut(side);
        if squad.len() >= BattleConfig::MAX_SQUAD_SIZE {
            return Err(DraftError::SquadFull(side));
        }
        squad.push(name.to_string());
        Ok(self)
    }

    /// Fills `side` with up to `count` random champions nobody has drafted yet.
    ///
    /// Stops early when the squad is full or the catalog runs out of
    /// undrafted champions.
    pub fn random_squad<R: RandomSource + ?Sized>(
        &mut self,
        side: Side,
        count: usize,
        rng: &mut R,
    ) -> &mut Self {
        for _ in 0..count {
            if self.picks(side).len() >= BattleConfig::MAX_SQUAD_SIZE {
                break;
            }
            let pool: Vec<&str> = self
                .catalog
                .champions
                .iter()
                .map(|c| c.name.as_str())
                .filter(|name| !self.is_picked(name))
                .collect();
            let Some(index) = rng.pick_index(pool.len()) else {
                break;
            };
            let name = pool[index].to_string();
            self.squad_mut(side).push(name);
        }
        self
    }

    /// Turns the picks into combatants with their house bundle applied.
    pub fn build(&self) -> Result<Roster, DraftError> {
        let dreamers = self.draft(&self.dreamers)?;
        let fixers = self.draft(&self.fixers)?;
        Ok(Roster::new(dreamers, fixers)?)
    }

    fn draft(&self, names: &[String]) -> Result<Vec<Combatant>, DraftError> {
        names
            .iter()
            .map(|name| {
                let template = self
                    .catalog
                    .champion(name)
                    .ok_or_else(|| DraftError::UnknownChampion(name.clone()))?;
                let bonus = self.catalog.house_bonus(template.house);
                Ok(Combatant::new(template, bonus, &self.config))
            })
            .collect()
    }

    fn squad_mut(&mut self, side: Side) -> &mut Vec<String> {
        match side {
            Side::Dreamers => &mut self.dreamers,
            Side::Fixers => &mut self.fixers,
        }
    }
}
