use std::process;

use clap::{App, Arg};
use log::error;

mod simulator;

pub fn build_app() -> App<'static, 'static> {
    App::new("Tarocchi Bot")
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about("Plays a game of tarocchi between random bots")
        .arg(
            Arg::with_name("players")
                .short("p")
                .long("players")
                .value_name("COUNT")
                .help("Number of players, from 3 to 5 (default: 3)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("names")
                .short("n")
                .long("names")
                .value_name("NAMES")
                .help("Comma separated player names")
                .takes_value(true)
                .use_delimiter(true),
        )
        .arg(
            Arg::with_name("seed")
                .short("s")
                .long("seed")
                .value_name("SEED")
                .help("Seed of the deal and of the bots")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("rules")
                .short("r")
                .long("rules")
                .value_name("FILE")
                .help("JSON file overriding the default rules")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("json")
                .short("j")
                .long("json")
                .help("Print the result as JSON"),
        )
}

fn run() -> anyhow::Result<()> {
    let matches = build_app().get_matches();
    let options = simulator::Options::from_matches(&matches)?;
    let rules = simulator::load_rules(options.rules.as_ref())?;
    let (game, result) = simulator::simulate(&options, rules)?;
    println!("{}", simulator::report(&options, &game, &result)?);
    Ok(())
}

pub fn main() {
    env_logger::init();

    if let Err(e) = run() {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
