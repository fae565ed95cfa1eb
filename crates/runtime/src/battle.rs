//! Round controller.
//!
//! A [`Battle`] owns the roster, the battle log and one decision provider per
//! squad, and drives RoundStart → TurnSequence → RoundEnd until one squad has
//! no living members. Rule failures never abort a battle: a refused cast is
//! logged and the turn becomes a basic attack.

use serde::Serialize;
use waltz_core::{
    AttackPipeline, BattleConfig, BattleLog, Combatant, CombatantId, Decision, EchoCatalog,
    GameError, RandomSource, Roster, Side, TargetClass, cast, legal_enemy_targets,
    resolve_damage, strike, turn_order,
};

use crate::api::{DecisionProvider, DecisionView, Result, RuntimeError};
use crate::random::StdRandom;

/// Where a battle stands between calls to [`Battle::play_round`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BattlePhase {
    RoundStart,
    TurnSequence,
    RoundEnd,
    BattleOver,
}

/// Final report of a finished battle.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BattleOutcome {
    /// `None` when the round limit ended the battle, or both squads fell at once.
    pub winner: Option<Side>,
    pub rounds: u32,
    pub log: BattleLog,
    pub roster: Roster,
}

impl BattleOutcome {
    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }
}

/// A battle in progress.
pub struct Battle<'a> {
    config: BattleConfig,
    roster: Roster,
    echoes: &'a EchoCatalog,
    dreamers: Box<dyn DecisionProvider + 'a>,
    fixers: Box<dyn DecisionProvider + 'a>,
    rng: Box<dyn RandomSource + 'a>,
    log: BattleLog,
    round: u32,
    phase: BattlePhase,
    winner: Option<Side>,
}

impl<'a> Battle<'a> {
    /// Create a new battle builder over `echoes`.
    pub fn builder(echoes: &'a EchoCatalog) -> BattleBuilder<'a> {
        BattleBuilder::new(echoes)
    }

    /// Everything logged so far, for incremental readers.
    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Rounds started so far.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.phase == BattlePhase::BattleOver
    }

    /// Plays rounds until the battle is over.
    pub fn run(mut self) -> BattleOutcome {
        while !self.is_over() {
            if self.play_round().is_err() {
                break;
            }
        }
        self.into_outcome()
    }

    /// Plays one full round and reports the phase the battle rests in.
    ///
    /// Returns [`BattlePhase::RoundStart`] when another round is due and
    /// [`BattlePhase::BattleOver`] once a squad is wiped out or the round
    /// limit is reached.
    pub fn play_round(&mut self) -> Result<BattlePhase> {
        if self.is_over() {
            return Err(RuntimeError::BattleOver);
        }
        if self.check_over() || self.round_limit_reached() {
            return Ok(self.phase);
        }

        self.round += 1;
        self.log.set_round(self.round);
        tracing::info!(round = self.round, "round start");

        self.phase = BattlePhase::TurnSequence;
        for id in turn_order(&self.roster) {
            self.take_turn(id);
            if self.check_over() {
                return Ok(self.phase);
            }
        }

        self.phase = BattlePhase::RoundEnd;
        self.end_round();
        if self.check_over() || self.round_limit_reached() {
            return Ok(self.phase);
        }

        self.phase = BattlePhase::RoundStart;
        Ok(self.phase)
    }

    pub fn into_outcome(self) -> BattleOutcome {
        BattleOutcome {
            winner: self.winner,
            rounds: self.round,
            log: self.log,
            roster: self.roster,
        }
    }

    fn take_turn(&mut self, id: CombatantId) {
        let Some(actor) = self.roster.get_mut(id) else {
            return;
        };
        if !actor.is_alive() {
            return;
        }

        actor.process_status(&mut self.log);
        if !self.roster[id].is_alive() || !self.both_squads_standing() {
            return;
        }
        if self.skips_turn(id) {
            return;
        }

        let side = self.roster[id].side;
        let view = DecisionView::new(&self.roster[id], &self.roster, self.echoes, self.round);
        let provider = match side {
            Side::Dreamers => &mut self.dreamers,
            Side::Fixers => &mut self.fixers,
        };
        let decision = provider.decide(&view);
        tracing::debug!(actor = %self.roster[id].name, ?decision, "decision");

        match decision {
            Decision::Cast { echo, target } => {
                if !self.try_cast(id, &echo, target) {
                    let preferred = self.fallback_target(id, side);
                    self.basic_attack(id, preferred);
                }
            }
            Decision::Attack { target } => self.basic_attack(id, target),
        }
    }

    /// Consumes a pending stun or freeze. Returns true when the turn is lost.
    fn skips_turn(&mut self, id: CombatantId) -> bool {
        let honor = self.config.honor_skip_turn;
        let actor = &mut self.roster[id];
        if !actor.skip_turn {
            return false;
        }
        actor.skip_turn = false;
        if !honor {
            return false;
        }

        if actor.traits.immune_turn_delay() {
            self.log.info(format!("{} shrugs off the turn delay!", actor.name));
            return false;
        }
        self.log.info(format!("{}'s turn is skipped.", actor.name));
        tracing::debug!(actor = %actor.name, "turn skipped");
        true
    }

    /// Attempts the chosen cast. Returns false when it was refused.
    fn try_cast(&mut self, id: CombatantId, title: &str, target: Option<CombatantId>) -> bool {
        let echoes = self.echoes;
        let actor = &self.roster[id];
        let Some(echo) = echoes.get(title).filter(|_| actor.knows(title)) else {
            self.log.warn(format!(
                "{} does not know an echo called '{}'.",
                actor.name, title
            ));
            tracing::warn!(
                actor = %actor.name,
                echo = title,
                "unknown echo; falling back to basic attack"
            );
            return false;
        };

        let target = match &echo.target {
            TargetClass::SelfOnly => target.or(Some(id)),
            class if class.is_aoe() => None,
            _ => target,
        };

        match cast(&mut self.roster, echo, id, target, &mut self.log) {
            Ok(report) => {
                tracing::debug!(
                    echo = title,
                    affected = report.affected.len(),
                    revived = report.revived.len(),
                    ep_spent = report.ep_spent,
                    "cast resolved"
                );
                true
            }
            Err(error) => {
                tracing::warn!(
                    code = error.error_code(),
                    %error,
                    "cast refused; falling back to basic attack"
                );
                false
            }
        }
    }

    fn fallback_target(&mut self, id: CombatantId, side: Side) -> Option<CombatantId> {
        let legal = legal_enemy_targets(&self.roster, self.roster.enemies_of(id));
        if legal.is_empty() {
            return None;
        }
        let view = DecisionView::new(&self.roster[id], &self.roster, self.echoes, self.round);
        let provider = match side {
            Side::Dreamers => &mut self.dreamers,
            Side::Fixers => &mut self.fixers,
        };
        provider.fallback_target(&view, &legal)
    }

    /// Basic attack on `preferred` if legal, else on a random legal enemy.
    fn basic_attack(&mut self, id: CombatantId, preferred: Option<CombatantId>) {
        let legal = legal_enemy_targets(&self.roster, self.roster.enemies_of(id));
        let target = match preferred.filter(|target| legal.contains(target)) {
            Some(target) => target,
            None => match self.rng.pick_index(legal.len()) {
                Some(index) => legal[index],
                None => {
                    let name = &self.roster[id].name;
                    self.log.warn(format!("{name} finds no enemy to attack."));
                    tracing::debug!(actor = %name, "no legal attack target");
                    return;
                }
            },
        };

        match self.config.attack_pipeline {
            AttackPipeline::Contact => {
                let base = self.roster[id].atk;
                let outcome = resolve_damage(
                    &mut self.roster,
                    id,
                    target,
                    base,
                    None,
                    &mut *self.rng,
                    &mut self.log,
                );
                tracing::debug!(?outcome, "basic attack");
            }
            AttackPipeline::Strike => {
                let outcome = strike(&mut self.roster, id, target, &mut *self.rng, &mut self.log);
                tracing::debug!(?outcome, "basic attack");
            }
        }
    }

    fn end_round(&mut self) {
        for combatant in self.roster.iter_mut().filter(|c| c.is_alive()) {
            let ep_per_turn = combatant.ep_per_turn;
            combatant.gain_ep(ep_per_turn);
        }
        tracing::info!(round = self.round, "round end");
    }

    fn both_squads_standing(&self) -> bool {
        Side::ALL.iter().all(|&side| self.roster.side_alive(side))
    }

    /// Ends the battle once a squad has no living members.
    fn check_over(&mut self) -> bool {
        if self.both_squads_standing() {
            return false;
        }
        self.finish(self.roster.winner());
        true
    }

    fn round_limit_reached(&mut self) -> bool {
        let reached = self
            .config
            .round_limit
            .is_some_and(|limit| self.round >= limit);
        if reached {
            self.finish(None);
        }
        reached
    }

    fn finish(&mut self, winner: Option<Side>) {
        self.phase = BattlePhase::BattleOver;
        self.winner = winner;
        match winner {
            Some(side) => {
                self.log.info(format!("{side} win the Timeline Rupture!"));
                tracing::info!(winner = %side, rounds = self.round, "battle over");
            }
            None => {
                self.log.info(format!(
                    "The waltz ends in a draw after {} rounds.",
                    self.round
                ));
                tracing::info!(rounds = self.round, "battle drawn");
            }
        }
    }
}

/// Builder for [`Battle`] with flexible configuration.
pub struct BattleBuilder<'a> {
    config: BattleConfig,
    echoes: &'a EchoCatalog,
    roster: Option<Roster>,
    squads: Option<(Vec<Combatant>, Vec<Combatant>)>,
    dreamers: Option<Box<dyn DecisionProvider + 'a>>,
    fixers: Option<Box<dyn DecisionProvider + 'a>>,
    rng: Option<Box<dyn RandomSource + 'a>>,
}

impl<'a> BattleBuilder<'a> {
    fn new(echoes: &'a EchoCatalog) -> Self {
        Self {
            config: BattleConfig::default(),
            echoes,
            roster: None,
            squads: None,
            dreamers: None,
            fixers: None,
            rng: None,
        }
    }

    /// Override battle configuration
    pub fn config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide an already drafted roster
    pub fn roster(mut self, roster: Roster) -> Self {
        self.roster = Some(roster);
        self.squads = None;
        self
    }

    /// Provide both squads; they are enlisted when the battle is built
    pub fn squads(mut self, dreamers: Vec<Combatant>, fixers: Vec<Combatant>) -> Self {
        self.squads = Some((dreamers, fixers));
        self.roster = None;
        self
    }

    /// Set the provider deciding for `side`
    pub fn provider(mut self, side: Side, provider: impl DecisionProvider + 'a) -> Self {
        let provider: Box<dyn DecisionProvider + 'a> = Box::new(provider);
        match side {
            Side::Dreamers => self.dreamers = Some(provider),
            Side::Fixers => self.fixers = Some(provider),
        }
        self
    }

    pub fn dreamers(self, provider: impl DecisionProvider + 'a) -> Self {
        self.provider(Side::Dreamers, provider)
    }

    pub fn fixers(self, provider: impl DecisionProvider + 'a) -> Self {
        self.provider(Side::Fixers, provider)
    }

    /// Set the random source for rolls and fallback targets.
    ///
    /// Defaults to an entropy-seeded [`StdRandom`].
    pub fn rng(mut self, rng: impl RandomSource + 'a) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    pub fn seed(self, seed: u64) -> Self {
        self.rng(StdRandom::seeded(seed))
    }

    pub fn build(self) -> Result<Battle<'a>> {
        let mut roster = match (self.roster, self.squads) {
            (Some(roster), _) => roster,
            (None, Some((dreamers, fixers))) => Roster::new(dreamers, fixers)?,
            (None, None) => return Err(RuntimeError::MissingRoster),
        };
        let dreamers = self.dreamers.ok_or(RuntimeError::ProviderNotSet {
            side: Side::Dreamers,
        })?;
        let fixers = self.fixers.ok_or(RuntimeError::ProviderNotSet {
            side: Side::Fixers,
        })?;
        let rng: Box<dyn RandomSource + 'a> = match self.rng {
            Some(rng) => rng,
            None => Box::new(StdRandom::from_entropy()),
        };

        if self.config.fill_ep_on_start {
            for combatant in roster.iter_mut() {
                combatant.ep = BattleConfig::EP_MAX;
            }
            tracing::debug!("every combatant starts at full EP");
        }

        Ok(Battle {
            config: self.config,
            roster,
            echoes: self.echoes,
            dreamers,
            fixers,
            rng,
            log: BattleLog::new(),
            round: 0,
            phase: BattlePhase::RoundStart,
            winner: None,
        })
    }
}
