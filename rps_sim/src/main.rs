//! Rock-paper-scissors tournament simulator.
//!
//! Builds contestants and a tournament from the command line and
//! environment, runs it, and prints the ranking and statistics.

mod config;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use anyhow::Error;
use ctrlc::set_handler;
use log::{debug, info};
use pico_args::Arguments;
use rps_tournament::{RandomPicker, Tournament, TournamentSummary};

use config::{SimConfig, SimOverrides};

const HELP: &str = "\
Run a rock-paper-scissors elimination tournament

USAGE:
  rps_sim [OPTIONS]

OPTIONS:
  --players    NAMES       Comma-separated names, 2 or 3  [default: env RPS_PLAYERS or Joe,Joan,Bob]
  --balance    COINS       Starting balance per player    [default: env RPS_STARTING_BALANCE or 500]
  --bet        COINS       Bet per round                  [default: env RPS_BET or 20]
  --rounds     N           Rounds to play                 [default: env RPS_ROUND_LIMIT or until one is left]
  --draw-tax   COINS       Tax on drawn rounds            [default: env RPS_DRAW_TAX or 10]
  --draw-rate  N           Consecutive draws before tax   [default: env RPS_DRAW_TAX_RATE or 0]
  --max-rounds N           Hard cap on rounds             [default: env RPS_MAX_ROUNDS or none]
  --settlement MODE        pooled or direct               [default: env RPS_SETTLEMENT or pooled]
  --seed       N           Seed for reproducible hands    [default: env RPS_SEED or random]

FLAGS:
  --json                   Print the summary as JSON
  -h, --help               Print help information

ENVIRONMENT:
  RUST_LOG                 Log level (e.g., debug to see every round)
  (Variables may also be set in a .env file)
";

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let json = pargs.contains("--json");
    let overrides = SimOverrides {
        players: pargs.opt_value_from_str("--players")?,
        starting_balance: pargs.opt_value_from_str("--balance")?,
        bet: pargs.opt_value_from_str("--bet")?,
        round_limit: pargs.opt_value_from_str("--rounds")?,
        draw_tax: pargs.opt_value_from_str("--draw-tax")?,
        draw_tax_rate: pargs.opt_value_from_str("--draw-rate")?,
        max_rounds: pargs.opt_value_from_str("--max-rounds")?,
        settlement: pargs.opt_value_from_str("--settlement")?,
        seed: pargs.opt_value_from_str("--seed")?,
    };

    env_logger::builder().format_target(false).init();

    let config = SimConfig::from_env(overrides)?;
    config.validate()?;
    debug!("{config:?}");

    // Ctrl-C stops the run at the next round.
    let cancel = Arc::new(AtomicBool::new(false));
    let handler_flag = cancel.clone();
    set_handler(move || handler_flag.store(true, Ordering::Relaxed))?;

    let picker = match config.seed {
        Some(seed) => RandomPicker::from_seed(seed),
        None => RandomPicker::new(),
    };
    let mut tournament = Tournament::with_config(config.tournament_config())
        .with_picker(picker)
        .with_cancel_flag(cancel);
    tournament.register_all(config.contestants())?;

    info!("Starting tournament for {}", config.players.join(", "));
    let summary = tournament
        .run()
        .map_err(|e| anyhow::anyhow!("Failed to start tournament: {}", e))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn print_summary(summary: &TournamentSummary) {
    let round_limit = summary
        .round_limit
        .map_or_else(|| "unspecified".to_string(), |limit| limit.to_string());

    println!("Players: {}", summary.ranking.len());
    println!("Bet per round: {} ({})", summary.bet, summary.settlement);
    println!("Draw tax: {}", summary.draw_tax);
    println!("Round limit: {round_limit}");
    println!("Rounds played: {}", summary.rounds_played);
    println!("Of which drawn: {}", summary.total_draws);
    if let Some(reason) = summary.finish_reason {
        println!("Finished: {reason}");
    }

    println!();
    println!("Hands shown:");
    for (hand, count) in &summary.hand_frequency {
        println!("  {hand:<8} => {count}");
    }

    println!();
    for entry in &summary.ranking {
        let contestant = &entry.contestant;
        println!("#{} {}", entry.rank, contestant.label());
        println!("  id:            {}", contestant.id);
        println!("  rounds played: {}", contestant.total_rounds());
        println!("  rounds won:    {}", contestant.wins());
        println!("  final coins:   {}", contestant.balance());
        println!("  peak coins:    {}", contestant.peak_balance());
    }
}
