use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use log::info;
use rand::Rng;

use tarocchi::game::{Game, GameResult, Seat};
use tarocchi::rules::Rules;
use tarocchi::strategy::{RandomStrategy, Strategy};

/// What to simulate, read from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub names: Vec<String>,
    pub seed: u64,
    pub rules: Option<PathBuf>,
    pub json: bool,
}

impl Options {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let players = match matches.value_of("players") {
            Some(text) => Some(
                text.parse::<usize>()
                    .with_context(|| format!("invalid player count: {}", text))?,
            ),
            None => None,
        };

        let names: Vec<String> = match matches.values_of("names") {
            Some(values) => values.map(|n| n.trim().to_owned()).collect(),
            None => (0..players.unwrap_or(3))
                .map(|i| format!("BOT-{}", i))
                .collect(),
        };
        if let Some(count) = players {
            if count != names.len() {
                bail!("{} players but {} names", count, names.len());
            }
        }

        let seed = match matches.value_of("seed") {
            Some(text) => text
                .parse::<u64>()
                .with_context(|| format!("invalid seed: {}", text))?,
            None => rand::thread_rng().gen(),
        };

        Ok(Options {
            names,
            seed,
            rules: matches.value_of("rules").map(PathBuf::from),
            json: matches.is_present("json"),
        })
    }
}

pub fn load_rules(path: Option<&PathBuf>) -> Result<Rules> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read rules file {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse rules file {}", path.display()))
        }
        None => Ok(Rules::default()),
    }
}

/// Spreads a number into a 32 bytes seed, `salt` telling apart the users of a same number.
pub fn seed_bytes(seed: u64, salt: u8) -> [u8; 32] {
    let mut bytes = [salt; 32];
    bytes[..8].copy_from_slice(&seed.to_le_bytes());
    bytes
}

/// Plays one game between random bots.
pub fn simulate(options: &Options, rules: Rules) -> Result<(Game, GameResult)> {
    let seats = options
        .names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let strategy: Box<dyn Strategy> =
                Box::new(RandomStrategy::seeded(seed_bytes(options.seed, i as u8 + 1)));
            Seat::new(name.clone(), strategy)
        })
        .collect();

    let mut game = Game::new_seeded(seats, rules, seed_bytes(options.seed, 0))?;
    info!("game #{} with {} players", options.seed, options.names.len());
    let result = game.run()?;
    Ok((game, result))
}

/// Writes the game as text, or the result as JSON.
pub fn report(options: &Options, game: &Game, result: &GameResult) -> Result<String> {
    if options.json {
        return Ok(serde_json::to_string_pretty(result)?);
    }

    let mut text = format!("Seed: {}\n{}", options.seed, game);
    for (player, delta) in game.players().iter().zip(&result.deltas) {
        text += &format!("{}: {:+}\n", player, delta);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_app;

    fn options(args: &[&str]) -> Result<Options> {
        let mut argv = vec!["tarocchi_bot"];
        argv.extend_from_slice(args);
        let matches = build_app().get_matches_from_safe(argv)?;
        Options::from_matches(&matches)
    }

    #[test]
    fn test_options() {
        let opts = options(&["--players", "4", "--seed", "12"]).unwrap();
        assert_eq!(opts.names, vec!["BOT-0", "BOT-1", "BOT-2", "BOT-3"]);
        assert_eq!(opts.seed, 12);
        assert!(!opts.json);

        let opts = options(&["--names", "ann,bob,cid", "--json"]).unwrap();
        assert_eq!(opts.names, vec!["ann", "bob", "cid"]);
        assert!(opts.json);

        assert!(options(&["--players", "4", "--names", "ann,bob"]).is_err());
        assert!(options(&["--seed", "many"]).is_err());
    }

    #[test]
    fn test_seed_bytes() {
        assert_ne!(seed_bytes(1, 0), seed_bytes(1, 1));
        assert_ne!(seed_bytes(1, 0), seed_bytes(2, 0));
        assert_eq!(seed_bytes(3, 9)[31], 9);
    }

    #[test]
    fn test_simulate() {
        for count in 3..=5 {
            let players = count.to_string();
            let opts = options(&["--players", players.as_str(), "--seed", "5"]).unwrap();
            let (game, result) = simulate(&opts, Rules::default()).unwrap();
            assert_eq!(result.deltas.iter().sum::<i32>(), 0);

            let text = report(&opts, &game, &result).unwrap();
            assert!(text.starts_with("Seed: 5\n"));
            assert!(text.contains("BOT-0: "));

            let (_, again) = simulate(&opts, Rules::default()).unwrap();
            assert_eq!(again, result);
        }
    }

    #[test]
    fn test_json_report() {
        let opts = options(&["--seed", "8", "--json"]).unwrap();
        let (game, result) = simulate(&opts, Rules::default()).unwrap();
        let json = report(&opts, &game, &result).unwrap();
        let parsed: GameResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_too_many_players() {
        let opts = options(&["--players", "6"]).unwrap();
        assert!(simulate(&opts, Rules::default()).is_err());
    }

    #[test]
    fn test_missing_rules_file() {
        assert_eq!(load_rules(None).unwrap(), Rules::default());
        let missing = PathBuf::from("/nonexistent/rules.json");
        assert!(load_rules(Some(&missing)).is_err());
    }
}
