//! House, champion and echo catalog loader.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use waltz_core::{ChampionTemplate, Echo, EffectTag, House, HouseBonus, StatModifiers, TargetClass};

use crate::catalog::Catalog;
use crate::loaders::{LoadResult, read_file};

const EMBEDDED_HOUSES: &str = include_str!("../../data/houses.ron");
const EMBEDDED_CHAMPIONS: &str = include_str!("../../data/champions.ron");
const EMBEDDED_ECHOES: &str = include_str!("../../data/echoes.ron");

/// Echo entry as written in `echoes.ron`.
///
/// Tags and target stay strings in the file; an unknown tag fails the load,
/// an unknown target class is kept and only fails when cast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EchoSpec {
    pub title: String,
    pub tags: Vec<String>,
    #[serde(default = "default_target")]
    pub target: String,
    #[serde(default)]
    pub modifiers: StatModifiers,
    #[serde(default)]
    pub ep_cost: u32,
}

fn default_target() -> String {
    "enemy".to_string()
}

impl EchoSpec {
    pub fn into_echo(self) -> LoadResult<Echo> {
        let tags = self
            .tags
            .iter()
            .map(|tag| {
                EffectTag::from_str(tag).map_err(|_| {
                    anyhow::anyhow!("Unknown effect tag '{}' in echo '{}'", tag, self.title)
                })
            })
            .collect::<LoadResult<Vec<_>>>()?;

        Ok(Echo {
            target: TargetClass::parse(&self.target),
            title: self.title,
            tags,
            modifiers: self.modifiers,
            ep_cost: self.ep_cost,
        })
    }
}

/// Loader for the battle catalog from RON files.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── battle.toml
/// ├── houses.ron
/// ├── champions.ron
/// └── echoes.ron
/// ```
pub struct CatalogLoader;

impl CatalogLoader {
    /// The catalog bundled with this crate.
    pub fn load_embedded() -> LoadResult<Catalog> {
        Self::parse(EMBEDDED_HOUSES, EMBEDDED_CHAMPIONS, EMBEDDED_ECHOES)
    }

    /// Load `houses.ron`, `champions.ron` and `echoes.ron` from `data_dir`.
    pub fn load_dir(data_dir: &Path) -> LoadResult<Catalog> {
        let houses = read_file(&data_dir.join("houses.ron"))?;
        let champions = read_file(&data_dir.join("champions.ron"))?;
        let echoes = read_file(&data_dir.join("echoes.ron"))?;
        Self::parse(&houses, &champions, &echoes)
    }

    pub fn parse(houses: &str, champions: &str, echoes: &str) -> LoadResult<Catalog> {
        let houses = Self::parse_houses(houses)?;
        let champions: Vec<ChampionTemplate> = ron::from_str(champions)
            .map_err(|e| anyhow::anyhow!("Failed to parse champions RON: {}", e))?;
        let echoes = Self::parse_echoes(echoes)?;

        Ok(Catalog::new(houses, champions, echoes))
    }

    pub fn parse_houses(content: &str) -> LoadResult<HashMap<House, HouseBonus>> {
        let bonuses: Vec<HouseBonus> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse houses RON: {}", e))?;

        let mut houses = HashMap::with_capacity(bonuses.len());
        for (index, bonus) in bonuses.into_iter().enumerate() {
            let house = bonus
                .house
                .ok_or_else(|| anyhow::anyhow!("House entry #{} is missing `house`", index))?;
            if houses.insert(house, bonus).is_some() {
                anyhow::bail!("House {} is defined more than once", house);
            }
        }
        Ok(houses)
    }

    pub fn parse_echoes(content: &str) -> LoadResult<Vec<Echo>> {
        let specs: Vec<EchoSpec> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse echoes RON: {}", e))?;

        specs.into_iter().map(EchoSpec::into_echo).collect()
    }
}
