//! In-memory catalog of houses, champions and echoes.

use std::collections::{HashMap, HashSet};

use waltz_core::{ChampionTemplate, Echo, EchoCatalog, House, HouseBonus, TargetClass};

/// Most tags a single echo may declare.
pub const MAX_ECHO_TAGS: usize = 2;

/// Static content a battle is set up from.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub houses: HashMap<House, HouseBonus>,
    pub champions: Vec<ChampionTemplate>,
    pub echoes: EchoCatalog,
    duplicate_echoes: Vec<String>,
}

/// A consistency problem found by [`Catalog::validate`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogIssue {
    #[error("{champion} has no echoes assigned")]
    NoEchoes { champion: String },

    #[error("{champion} lists missing echo '{title}'")]
    MissingEcho { champion: String, title: String },

    #[error("echo '{title}' has unknown target type '{class}'")]
    UnknownTargetClass { title: String, class: String },

    #[error("echo '{title}' declares {count} tags (expected 1 to {MAX_ECHO_TAGS})")]
    TagCount { title: String, count: usize },

    #[error("echo '{0}' is defined more than once")]
    DuplicateEcho(String),

    #[error("champion '{0}' is defined more than once")]
    DuplicateChampion(String),

    #[error("house {0} has champions but no passive bundle")]
    MissingHouse(House),
}

impl Catalog {
    /// Assembles a catalog. Later echoes with an already-seen title replace the
    /// earlier one and are reported by [`validate`](Self::validate).
    pub fn new(
        houses: HashMap<House, HouseBonus>,
        champions: Vec<ChampionTemplate>,
        echoes: impl IntoIterator<Item = Echo>,
    ) -> Self {
        let mut catalog = EchoCatalog::new();
        let mut duplicate_echoes = Vec::new();
        for echo in echoes {
            if let Some(previous) = catalog.insert(echo) {
                duplicate_echoes.push(previous.title);
            }
        }

        Self {
            houses,
            champions,
            echoes: catalog,
            duplicate_echoes,
        }
    }

    pub fn champion(&self, name: &str) -> Option<&ChampionTemplate> {
        self.champions.iter().find(|c| c.name == name)
    }

    pub fn house_bonus(&self, house: House) -> Option<&HouseBonus> {
        self.houses.get(&house)
    }

    /// Champions of `house`, in catalog order.
    pub fn champions_of(&self, house: House) -> impl Iterator<Item = &ChampionTemplate> + '_ {
        self.champions.iter().filter(move |c| c.house == house)
    }

    /// Houses that have at least one champion, in declaration order.
    pub fn populated_houses(&self) -> Vec<House> {
        use strum::IntoEnumIterator;
        House::iter()
            .filter(|house| self.champions_of(*house).next().is_some())
            .collect()
    }

    /// Cross-checks champions against echoes and houses.
    ///
    /// Problems never stop a battle: missing echoes are dropped from the
    /// combatant's menu and unknown target classes fail at cast time.
    pub fn validate(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for champion in &self.champions {
            if !seen.insert(champion.name.as_str()) {
                issues.push(CatalogIssue::DuplicateChampion(champion.name.clone()));
            }
            if champion.echoes.is_empty() {
                issues.push(CatalogIssue::NoEchoes {
                    champion: champion.name.clone(),
                });
            }
            for title in &champion.echoes {
                if !self.echoes.contains(title) {
                    issues.push(CatalogIssue::MissingEcho {
                        champion: champion.name.clone(),
                        title: title.clone(),
                    });
                }
            }
        }

        let mut echoes: Vec<&Echo> = self.echoes.iter().collect();
        echoes.sort_by(|a, b| a.title.cmp(&b.title));
        for echo in echoes {
            if let TargetClass::Unrecognized(class) = &echo.target {
                issues.push(CatalogIssue::UnknownTargetClass {
                    title: echo.title.clone(),
                    class: class.clone(),
                });
            }
            if echo.tags.is_empty() || echo.tags.len() > MAX_ECHO_TAGS {
                issues.push(CatalogIssue::TagCount {
                    title: echo.title.clone(),
                    count: echo.tags.len(),
                });
            }
        }

        issues.extend(
            self.duplicate_echoes
                .iter()
                .cloned()
                .map(CatalogIssue::DuplicateEcho),
        );

        for house in self.populated_houses() {
            if !self.houses.contains_key(&house) {
                issues.push(CatalogIssue::MissingHouse(house));
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waltz_core::{BaseStats, EffectTag, StatModifiers};

    fn champion(name: &str, echoes: &[&str]) -> ChampionTemplate {
        ChampionTemplate {
            name: name.into(),
            grand_title: String::new(),
            house: House::Violet,
            stats: BaseStats::default(),
            echoes: echoes.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn echo(title: &str, target: TargetClass, tags: Vec<EffectTag>) -> Echo {
        Echo {
            title: title.into(),
            tags,
            target,
            modifiers: StatModifiers::default(),
            ep_cost: 0,
        }
    }

    #[test]
    fn validate_reports_every_problem() {
        let houses = HashMap::new();
        let champions = vec![
            champion("Ana", &["Bloom", "Ghost"]),
            champion("Bo", &[]),
            champion("Ana", &["Bloom"]),
        ];
        let echoes = vec![
            echo("Bloom", TargetClass::Ally, vec![EffectTag::Heal]),
            echo("Bloom", TargetClass::Ally, vec![EffectTag::Regen]),
            echo("Swirl", TargetClass::parse("ally_aoe"), vec![EffectTag::Heal]),
            echo("Blank", TargetClass::Enemy, Vec::new()),
        ];

        let issues = Catalog::new(houses, champions, echoes).validate();

        assert!(issues.contains(&CatalogIssue::MissingEcho {
            champion: "Ana".into(),
            title: "Ghost".into()
        }));
        assert!(issues.contains(&CatalogIssue::NoEchoes { champion: "Bo".into() }));
        assert!(issues.contains(&CatalogIssue::DuplicateChampion("Ana".into())));
        assert!(issues.contains(&CatalogIssue::DuplicateEcho("Bloom".into())));
        assert!(issues.contains(&CatalogIssue::UnknownTargetClass {
            title: "Swirl".into(),
            class: "ally_aoe".into()
        }));
        assert!(issues.contains(&CatalogIssue::TagCount { title: "Blank".into(), count: 0 }));
        assert!(issues.contains(&CatalogIssue::MissingHouse(House::Violet)));
    }

    #[test]
    fn lookups_by_name_and_house() {
        let catalog = Catalog::new(
            HashMap::new(),
            vec![champion("Ana", &[]), champion("Bo", &[])],
            Vec::new(),
        );

        assert!(catalog.champion("Bo").is_some());
        assert!(catalog.champion("Zed").is_none());
        assert_eq!(catalog.champions_of(House::Violet).count(), 2);
        assert_eq!(catalog.populated_houses(), vec![House::Violet]);
    }
}
