/// Which damage pipeline the round controller uses for the attack action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AttackPipeline {
    /// Contact damage at the attacker's raw ATK, mitigated by negation,
    /// dodge, shield and lifesteal.
    #[default]
    Contact,
    /// Crit-rolling strike: ATK minus DEF with variance, crit-dodge and
    /// shield absorption, EP on hit and on KO.
    Strike,
}

/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// EP regenerated at round end before house bonuses.
    pub base_ep_per_turn: i32,

    /// Flat HP added to every champion template's HP stat.
    pub hp_bonus: i32,

    pub default_crit_chance: f64,
    pub default_crit_multiplier: f64,

    /// Pre-fill every combatant's EP to [`BattleConfig::EP_MAX`] before the
    /// first round.
    pub fill_ep_on_start: bool,

    /// Stunned or frozen combatants lose their action for the turn.
    pub honor_skip_turn: bool,

    pub attack_pipeline: AttackPipeline,

    /// Ends the battle as a draw once this many rounds have been played.
    pub round_limit: Option<u32>,
}

impl BattleConfig {
    // ===== compile-time constants =====
    pub const EP_MAX: i32 = 100;
    pub const MAX_SQUAD_SIZE: usize = 5;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BASE_EP_PER_TURN: i32 = 25;
    pub const DEFAULT_HP_BONUS: i32 = 50;
    pub const DEFAULT_CRIT_CHANCE: f64 = 0.10;
    pub const DEFAULT_CRIT_MULTIPLIER: f64 = 2.0;

    pub fn new() -> Self {
        Self {
            base_ep_per_turn: Self::DEFAULT_BASE_EP_PER_TURN,
            hp_bonus: Self::DEFAULT_HP_BONUS,
            default_crit_chance: Self::DEFAULT_CRIT_CHANCE,
            default_crit_multiplier: Self::DEFAULT_CRIT_MULTIPLIER,
            fill_ep_on_start: false,
            honor_skip_turn: true,
            attack_pipeline: AttackPipeline::Contact,
            round_limit: None,
        }
    }

    pub fn with_round_limit(mut self, round_limit: u32) -> Self {
        self.round_limit = Some(round_limit);
        self
    }

    pub fn with_attack_pipeline(mut self, attack_pipeline: AttackPipeline) -> Self {
        self.attack_pipeline = attack_pipeline;
        self
    }

    pub fn with_full_ep(mut self) -> Self {
        self.fill_ep_on_start = true;
        self
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
