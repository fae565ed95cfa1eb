//! Terminal decision provider.
//!
//! Presents numbered menus for the acting champion and reads the answer one
//! line at a time. Anything unreadable falls back to a random legal choice so
//! a stray keystroke never stalls the battle.
use std::io::{self, BufRead, Write};

use waltz_core::{Combatant, CombatantId, Decision, Echo, RandomSource, TargetClass};
use waltz_runtime::{DecisionProvider, DecisionView, StdRandom};

/// Line-oriented input.
///
/// Implemented for the process stdin (locked per read, so several providers
/// can share it) and for in-memory cursors.
pub trait LineInput {
    /// Reads one line into `buf`; `Ok(0)` means end of input.
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize>;
}

impl LineInput for io::Stdin {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        io::Stdin::read_line(self, buf)
    }
}

impl<T: AsRef<[u8]>> LineInput for io::Cursor<T> {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        BufRead::read_line(self, buf)
    }
}

/// Human-controlled [`DecisionProvider`].
pub struct StdinProvider<I = io::Stdin, W = io::Stdout> {
    input: I,
    output: W,
    rng: StdRandom,
}

impl StdinProvider {
    /// Provider reading the process stdin and writing menus to stdout.
    pub fn terminal(rng: StdRandom) -> Self {
        Self::new(io::stdin(), io::stdout(), rng)
    }
}

impl<I: LineInput, W: Write> StdinProvider<I, W> {
    pub fn new(input: I, output: W, rng: StdRandom) -> Self {
        Self {
            input,
            output,
            rng,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn say(&mut self, line: impl AsRef<str>) {
        // A closed stdout only loses the menu; the answer is still read.
        let _ = writeln!(self.output, "{}", line.as_ref());
    }

    fn ask(&mut self, prompt: &str) -> Option<usize> {
        let _ = write!(self.output, "{prompt}");
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => line.trim().parse().ok(),
        }
    }

    fn random_of(&mut self, candidates: &[CombatantId]) -> Option<CombatantId> {
        let index = self.rng.pick_index(candidates.len())?;
        Some(candidates[index])
    }

    /// Numbered target menu; invalid answers pick a random candidate.
    fn choose_target(
        &mut self,
        view: &DecisionView<'_>,
        candidates: &[CombatantId],
    ) -> Option<CombatantId> {
        if candidates.is_empty() {
            return None;
        }

        self.say("Choose a target:");
        for (number, &id) in candidates.iter().enumerate() {
            let line = target_line(number + 1, &view.roster[id]);
            self.say(line);
        }

        match self.ask("Target number: ") {
            Some(choice) if (1..=candidates.len()).contains(&choice) => {
                Some(candidates[choice - 1])
            }
            _ => {
                self.say("Invalid input. Target randomly selected.");
                self.random_of(candidates)
            }
        }
    }

    /// Echo menu over every known echo; `None` means basic attack.
    fn choose_echo<'e>(&mut self, actor: &Combatant, known: &[&'e Echo]) -> Option<&'e Echo> {
        self.say("Cast an Echo?");
        for (number, echo) in known.iter().enumerate() {
            let line = echo_line(number + 1, echo, actor);
            self.say(line);
        }
        self.say("[0] Basic attack");

        match self.ask("Select Echo or 0 to attack: ") {
            Some(0) => None,
            Some(choice) if choice <= known.len() => Some(known[choice - 1]),
            _ => {
                self.say("Invalid input. Skipping Echo.");
                None
            }
        }
    }
}

impl<I: LineInput, W: Write> DecisionProvider for StdinProvider<I, W> {
    fn decide(&mut self, view: &DecisionView<'_>) -> Decision {
        let actor = view.actor;
        self.say("");
        self.say(format!("{}'s turn! {}", actor.name, actor.stat_line()));

        // The echo menu only appears when at least one echo is affordable.
        let known = view.known_echoes();
        let echo = if view.affordable_echoes().is_empty() {
            None
        } else {
            self.choose_echo(actor, &known)
        };

        match echo {
            Some(echo) => {
                let target = match &echo.target {
                    TargetClass::SelfOnly => Some(actor.id),
                    // Taunt and cloak narrow the menu exactly as for a basic attack.
                    TargetClass::Enemy => {
                        let candidates = view.attack_targets();
                        self.choose_target(view, &candidates)
                    }
                    TargetClass::Ally => {
                        let candidates = view.echo_targets(echo);
                        self.choose_target(view, &candidates)
                    }
                    TargetClass::AoeAlly
                    | TargetClass::AoeEnemy
                    | TargetClass::Unrecognized(_) => None,
                };
                Decision::cast(echo.title.clone(), target)
            }
            None => {
                let candidates = view.attack_targets();
                Decision::Attack {
                    target: self.choose_target(view, &candidates),
                }
            }
        }
    }

    fn fallback_target(
        &mut self,
        view: &DecisionView<'_>,
        legal: &[CombatantId],
    ) -> Option<CombatantId> {
        self.say("Cannot cast that Echo right now. Attacking instead.");
        self.choose_target(view, legal)
    }
}

fn echo_line(number: usize, echo: &Echo, actor: &Combatant) -> String {
    let mark = if echo.affordable_by(actor) { "ok" } else { "--" };
    format!(
        "[{number}] {} ({} EP) {mark} [Target: {}]",
        echo.title, echo.ep_cost, echo.target
    )
}

fn target_line(number: usize, combatant: &Combatant) -> String {
    if combatant.is_alive() {
        format!("[{number}] {} ({} HP)", combatant.name, combatant.hp)
    } else {
        format!("[{number}] {} (KO'd)", combatant.name)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use waltz_core::{
        BaseStats, BattleConfig, ChampionTemplate, EchoCatalog, EffectTag, House, Magnitude,
        Roster, Side, StatModifiers, StatusKind,
    };

    use super::*;

    fn fighter(name: &str, house: House, echoes: &[&str]) -> Combatant {
        let template = ChampionTemplate {
            name: name.into(),
            grand_title: String::new(),
            house,
            stats: BaseStats {
                hp: 100,
                atk: 30,
                def: 10,
                spd: 20,
            },
            echoes: echoes.iter().map(|e| e.to_string()).collect(),
        };
        Combatant::new(&template, None, &BattleConfig::default())
    }

    fn catalog() -> EchoCatalog {
        let mut catalog = EchoCatalog::new();
        catalog.insert(Echo {
            title: "Ember Lance".into(),
            tags: vec![EffectTag::Burst],
            target: TargetClass::Enemy,
            modifiers: StatModifiers::default(),
            ep_cost: 40,
        });
        catalog.insert(Echo {
            title: "Grand Finale".into(),
            tags: vec![EffectTag::AoeDamage],
            target: TargetClass::AoeEnemy,
            modifiers: StatModifiers::default(),
            ep_cost: 95,
        });
        catalog
    }

    fn roster(ep: i32) -> Roster {
        let mut ana = fighter("Ana", House::Scarlet, &["Ember Lance", "Grand Finale"]);
        ana.ep = ep;
        Roster::new(
            vec![ana],
            vec![
                fighter("Bo", House::Onyx, &[]),
                fighter("Cy", House::Onyx, &[]),
            ],
        )
        .unwrap()
    }

    fn decide(roster: &Roster, catalog: &EchoCatalog, input: &str) -> (Decision, String) {
        let actor = &roster[roster.find_by_name("Ana").unwrap()];
        let view = DecisionView::new(actor, roster, catalog, 1);
        let mut provider =
            StdinProvider::new(Cursor::new(input.to_string()), Vec::new(), StdRandom::seeded(3));

        let decision = provider.decide(&view);
        let output = String::from_utf8(provider.into_output()).unwrap();
        (decision, output)
    }

    #[test]
    fn picks_echo_and_target_by_number() {
        let roster = roster(50);
        let catalog = catalog();

        let (decision, output) = decide(&roster, &catalog, "1\n2\n");

        let cy = roster.find_by_name("Cy").unwrap();
        assert_eq!(decision, Decision::cast("Ember Lance", Some(cy)));
        assert!(output.contains("[1] Ember Lance (40 EP) ok [Target: enemy]"));
        assert!(output.contains("[2] Grand Finale (95 EP) -- [Target: aoe_enemy]"));
        assert!(output.contains("[2] Cy (150 HP)"));
    }

    #[test]
    fn enemy_echo_menu_follows_taunt_over_cloak() {
        let mut roster = roster(50);
        let bo = roster.find_by_name("Bo").unwrap();
        let cy = roster.find_by_name("Cy").unwrap();
        roster[bo]
            .status
            .add(StatusKind::Taunt, 2, Some(Magnitude::Name("Bo".into())), "Dare");
        roster[cy].status.add(StatusKind::Cloak, 1, None, "Veil");
        let catalog = catalog();

        let (decision, output) = decide(&roster, &catalog, "1\n1\n");

        assert_eq!(decision, Decision::cast("Ember Lance", Some(bo)));
        assert!(output.contains("[1] Bo (150 HP)"));
        assert!(!output.contains("Cy (150 HP)"));
    }

    #[test]
    fn enemy_echo_menu_hides_cloaked_enemies() {
        let mut roster = roster(50);
        let bo = roster.find_by_name("Bo").unwrap();
        let cy = roster.find_by_name("Cy").unwrap();
        roster[bo].status.add(StatusKind::Cloak, 1, None, "Veil");
        let catalog = catalog();

        let (decision, output) = decide(&roster, &catalog, "1\n1\n");

        assert_eq!(decision, Decision::cast("Ember Lance", Some(cy)));
        assert!(output.contains("[1] Cy (150 HP)"));
        assert!(!output.contains("Bo (150 HP)"));
    }

    #[test]
    fn area_echo_needs_no_target_prompt() {
        let roster = roster(100);
        let catalog = catalog();

        let (decision, output) = decide(&roster, &catalog, "2\n");

        assert_eq!(decision, Decision::cast("Grand Finale", None));
        assert!(!output.contains("Choose a target"));
    }

    #[test]
    fn zero_attacks_the_chosen_enemy() {
        let roster = roster(50);
        let catalog = catalog();

        let (decision, _) = decide(&roster, &catalog, "0\n1\n");

        let bo = roster.find_by_name("Bo").unwrap();
        assert_eq!(decision, Decision::attack(bo));
    }

    #[test]
    fn no_affordable_echo_skips_the_echo_menu() {
        let roster = roster(10);
        let catalog = catalog();

        let (decision, output) = decide(&roster, &catalog, "2\n");

        let cy = roster.find_by_name("Cy").unwrap();
        assert_eq!(decision, Decision::attack(cy));
        assert!(!output.contains("Cast an Echo?"));
    }

    #[test]
    fn garbage_input_falls_back_to_a_random_enemy() {
        let roster = roster(50);
        let catalog = catalog();

        let (decision, output) = decide(&roster, &catalog, "lance\nbo\n");

        assert!(output.contains("Invalid input. Skipping Echo."));
        assert!(output.contains("Invalid input. Target randomly selected."));
        let Decision::Attack { target: Some(target) } = decision else {
            panic!("expected an attack with a target, got {decision:?}");
        };
        assert_eq!(roster[target].side, Side::Fixers);
    }

    #[test]
    fn end_of_input_still_produces_a_decision() {
        let roster = roster(50);
        let catalog = catalog();

        let (decision, _) = decide(&roster, &catalog, "");

        assert!(matches!(decision, Decision::Attack { target: Some(_) }));
    }

    #[test]
    fn fallback_target_prompts_over_legal_targets() {
        let roster = roster(0);
        let catalog = catalog();
        let actor = &roster[roster.find_by_name("Ana").unwrap()];
        let view = DecisionView::new(actor, &roster, &catalog, 1);
        let bo = roster.find_by_name("Bo").unwrap();
        let mut provider =
            StdinProvider::new(Cursor::new("1\n"), Vec::new(), StdRandom::seeded(3));

        assert_eq!(provider.fallback_target(&view, &[bo]), Some(bo));
    }
}
