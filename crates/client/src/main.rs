//! Dreamer Waltz client binary.
//!
//! Composition root for a single battle:
//! 1. Configuration from `.env`, environment variables and flags
//! 2. Catalog and battle rules from the embedded data or a data directory
//! 3. Squad draft from named picks, topped up with random champions
//! 4. One decision provider per squad according to the battle mode
//! 5. The battle itself, printed round by round or as JSON at the end
//!
//! # Examples
//!
//! ```bash
//! # Watch two random squads fight
//! cargo run -p waltz-client -- --seed 7
//!
//! # Command the Dreamers yourself against the AI
//! cargo run -p waltz-client -- --mode player-vs-ai --dreamer "Eduardo Carlos"
//!
//! # Check a custom catalog
//! cargo run -p waltz-client -- --data-dir ./data --validate
//! ```
mod config;
mod stdin;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use waltz_content::{Catalog, CatalogLoader, ConfigLoader, RosterBuilder};
use waltz_core::{AttackPipeline, BattleConfig, Roster, Side};
use waltz_runtime::{Battle, BattleOutcome, DecisionProvider, RandomAiProvider, StdRandom};

use config::ClientConfig;
use stdin::StdinProvider;

/// Who controls each squad.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// You control the Dreamers, the AI controls the Fixers
    PlayerVsAi,
    /// You control both squads
    PlayerVsPlayer,
    /// Watch the simulation
    AiVsAi,
}

impl Mode {
    fn human(self, side: Side) -> bool {
        match self {
            Mode::PlayerVsAi => side == Side::Dreamers,
            Mode::PlayerVsPlayer => true,
            Mode::AiVsAi => false,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Mode::PlayerVsAi => "Player vs AI",
            Mode::PlayerVsPlayer => "Player vs Player",
            Mode::AiVsAi => "AI vs AI",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Pipeline {
    Contact,
    Strike,
}

impl From<Pipeline> for AttackPipeline {
    fn from(value: Pipeline) -> Self {
        match value {
            Pipeline::Contact => AttackPipeline::Contact,
            Pipeline::Strike => AttackPipeline::Strike,
        }
    }
}

/// 5v5 Dreamer Waltz: Timeline Rupture
#[derive(Parser, Debug)]
#[command(name = "waltz", about = "5v5 Dreamer Waltz battles", version)]
struct Cli {
    /// Battle mode
    #[arg(short, long, value_enum, default_value_t = Mode::AiVsAi)]
    mode: Mode,

    /// Seed for drafting, AI and dice (overrides WALTZ_SEED)
    #[arg(long)]
    seed: Option<u64>,

    /// Champion to draft for the Dreamers (repeatable)
    #[arg(long = "dreamer", value_name = "NAME")]
    dreamers: Vec<String>,

    /// Champion to draft for the Fixers (repeatable)
    #[arg(long = "fixer", value_name = "NAME")]
    fixers: Vec<String>,

    /// Directory with battle.toml and the RON catalogs (overrides WALTZ_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Battle rules file (default: <data-dir>/battle.toml, else embedded)
    #[arg(long, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Start every champion with full EP
    #[arg(long)]
    fill_ep: bool,

    /// Call the battle a draw after this many rounds
    #[arg(long)]
    round_limit: Option<u32>,

    /// Damage pipeline for basic attacks
    #[arg(long, value_enum)]
    pipeline: Option<Pipeline>,

    /// Print the outcome as JSON instead of the running log
    #[arg(long, conflicts_with = "validate")]
    json: bool,

    /// Check the catalog for inconsistencies and exit
    #[arg(long)]
    validate: bool,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // 1. Merge environment and flags
    let mut client = ClientConfig::from_env();
    if cli.seed.is_some() {
        client.seed = cli.seed;
    }
    if cli.fill_ep {
        client.fill_ep = true;
    }
    if cli.round_limit.is_some() {
        client.round_limit = cli.round_limit;
    }
    if cli.data_dir.is_some() {
        client.data_dir = cli.data_dir.clone();
    }
    tracing::debug!(?client, "client configuration");

    // 2. Load content
    let catalog = load_catalog(client.data_dir.as_deref())?;
    if cli.validate {
        return report_issues(&catalog);
    }

    let mut rules = load_rules(cli.rules.as_deref(), client.data_dir.as_deref())?;
    client.apply(&mut rules);
    if let Some(pipeline) = cli.pipeline {
        rules.attack_pipeline = pipeline.into();
    }

    // 3. Draft
    let mut seeds = SeedPlan::new(client.seed);
    let roster = draft(&catalog, &rules, &cli, &mut seeds)?;

    // 4. Providers
    let dreamers = provider_for(cli.mode, Side::Dreamers, &mut seeds);
    let fixers = provider_for(cli.mode, Side::Fixers, &mut seeds);

    let mut battle = Battle::builder(&catalog.echoes)
        .config(rules)
        .roster(roster)
        .dreamers(dreamers)
        .fixers(fixers)
        .rng(seeds.next())
        .build()?;

    // 5. Fight
    if cli.json {
        let outcome = battle.run();
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!("Mode selected: {}", cli.mode.label());
    print_teams(battle.roster());

    let mut printed = 0;
    while !battle.is_over() {
        battle.play_round()?;
        for entry in battle.log().since(printed) {
            println!("{entry}");
        }
        printed = battle.log().entries().len();
    }

    let outcome = battle.into_outcome();
    print_summary(&outcome);
    Ok(())
}

/// Hands out the seeds for every random source, or entropy when unseeded.
struct SeedPlan {
    next: Option<u64>,
}

impl SeedPlan {
    fn new(seed: Option<u64>) -> Self {
        Self { next: seed }
    }

    fn next(&mut self) -> StdRandom {
        match self.next {
            Some(seed) => {
                self.next = Some(seed.wrapping_add(1));
                StdRandom::seeded(seed)
            }
            None => StdRandom::from_entropy(),
        }
    }
}

fn load_catalog(data_dir: Option<&Path>) -> Result<Catalog> {
    let catalog = match data_dir {
        Some(dir) => CatalogLoader::load_dir(dir)
            .with_context(|| format!("loading catalog from {}", dir.display()))?,
        None => CatalogLoader::load_embedded()?,
    };
    tracing::info!(
        champions = catalog.champions.len(),
        echoes = catalog.echoes.len(),
        "catalog loaded"
    );
    Ok(catalog)
}

fn load_rules(rules: Option<&Path>, data_dir: Option<&Path>) -> Result<BattleConfig> {
    let from_dir = data_dir
        .map(|dir| dir.join("battle.toml"))
        .filter(|path| path.exists());

    match rules.map(Path::to_path_buf).or(from_dir) {
        Some(path) => ConfigLoader::load(&path)
            .with_context(|| format!("loading battle rules from {}", path.display())),
        None => ConfigLoader::load_embedded(),
    }
}

fn report_issues(catalog: &Catalog) -> Result<()> {
    let issues = catalog.validate();
    for issue in &issues {
        println!("{issue}");
    }

    if issues.is_empty() {
        println!(
            "Catalog OK: {} champions, {} echoes.",
            catalog.champions.len(),
            catalog.echoes.len()
        );
        Ok(())
    } else {
        anyhow::bail!("{} catalog issue(s) found", issues.len())
    }
}

fn draft(
    catalog: &Catalog,
    rules: &BattleConfig,
    cli: &Cli,
    seeds: &mut SeedPlan,
) -> Result<Roster> {
    let mut builder = RosterBuilder::new(catalog, rules.clone());
    for name in &cli.dreamers {
        builder.add(Side::Dreamers, name)?;
    }
    for name in &cli.fixers {
        builder.add(Side::Fixers, name)?;
    }

    let mut rng = seeds.next();
    for side in Side::ALL {
        let missing = BattleConfig::MAX_SQUAD_SIZE.saturating_sub(builder.picks(side).len());
        builder.random_squad(side, missing, &mut rng);
    }

    Ok(builder.build()?)
}

fn provider_for<'a>(
    mode: Mode,
    side: Side,
    seeds: &mut SeedPlan,
) -> Box<dyn DecisionProvider + 'a> {
    if mode.human(side) {
        Box::new(StdinProvider::terminal(seeds.next()))
    } else {
        Box::new(RandomAiProvider::new(seeds.next()))
    }
}

fn print_teams(roster: &Roster) {
    for side in Side::ALL {
        println!();
        println!("Team {side}:");
        println!("{}", "=".repeat(50));
        for member in roster.members(side) {
            println!("{} - {} ({})", member.name, member.grand_title, member.house);
            println!("   {}", member.stat_line());
        }
    }
    println!();
}

fn print_summary(outcome: &BattleOutcome) {
    print_teams(&outcome.roster);
    match outcome.winner {
        Some(side) => println!("{side} win after {} rounds.", outcome.rounds),
        None => println!("Draw after {} rounds.", outcome.rounds),
    }
}
