//! ludo-sim - run headless bot-vs-bot Ludo batches.
//!
//! ```text
//! ludo-sim --games 500 --seats hard,medium,easy,random --seed 7
//! ```

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;

use rust_ludo::config::ServiceConfig;
use rust_ludo::core::Seat;
use rust_ludo::sim::{SeatPolicy, SimulationConfig, Simulator};
use rust_ludo::telemetry::init_tracing;

#[derive(Debug, Parser)]
#[command(name = "ludo-sim", about = "Simulate Ludo games between bots")]
struct Args {
    /// Number of games to play
    #[arg(short, long, default_value_t = 100)]
    games: usize,

    /// Comma-separated seat policies: easy, medium, hard or random
    #[arg(long, value_delimiter = ',', default_value = "hard,medium,easy,random")]
    seats: Vec<SeatPolicy>,

    /// First game seed; game N uses seed + N
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Abandon a game after this many rolls
    #[arg(long, default_value_t = 10_000)]
    max_rolls: u32,

    /// Log filter, overrides ludo.toml
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = ServiceConfig::load();
    init_tracing(args.log_level.as_deref().unwrap_or(&config.logging.level));

    if !(2..=4).contains(&args.seats.len()) {
        bail!("need 2-4 seats, got {}", args.seats.len());
    }

    let sim_config = SimulationConfig::new()
        .with_seats(args.seats.clone())
        .with_max_rolls(args.max_rolls)
        .with_seed_offset(args.seed);
    info!(games = args.games, seats = ?args.seats, seed = args.seed, "starting simulation");

    let report = Simulator::new(sim_config).run_batch(args.games)?;

    println!("games:        {}", report.games);
    println!("unfinished:   {}", report.unfinished);
    println!("mean rolls:   {:.1}", report.mean_rolls());
    println!("captures:     {}", report.total_captures);
    for (i, policy) in args.seats.iter().enumerate() {
        let seat = Seat::new(i as u8);
        println!(
            "{seat} ({policy:>6}): {:>5} wins  {:>5.1}%",
            report.wins[seat],
            report.win_rate(seat) * 100.0
        );
    }

    Ok(())
}
