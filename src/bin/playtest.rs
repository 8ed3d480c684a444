//! Automated playtester - seeded autoplay with a JSON report
//!
//! A simple player builds whatever it can afford on random tiles, lays a
//! few roads and parks spare money in banks. Wall-clock time is simulated:
//! one deposit day passes per game day so deposits mature during the run.

use std::path::PathBuf;

use city_sim::city::{BuildingKind, Category, FacilityType};
use city_sim::core::config::EconomyConfig;
use city_sim::core::types::{BuildingId, Rotation, TileCoord};
use city_sim::core::ManualClock;
use city_sim::{CityError, GameMode, World};
use clap::Parser;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Headless playtest - autoplay a city and report the economy
#[derive(Parser, Debug)]
#[command(name = "playtest")]
#[command(about = "Autoplay a seeded city and print a JSON report")]
struct Args {
    /// Number of days to simulate
    #[arg(long, default_value_t = 120)]
    days: u32,

    /// Build attempts per day
    #[arg(long, default_value_t = 3)]
    builds_per_day: u32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Economy config (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Play in creative mode
    #[arg(long)]
    creative: bool,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// JSON output structure
#[derive(Serialize, Default)]
struct PlaytestReport {
    seed: u64,
    days: u32,
    final_balance: Option<u64>,
    population: u64,
    buildings: usize,
    builds_attempted: u32,
    builds_placed: u32,
    rejected_funds: u32,
    rejected_placement: u32,
    roads: u32,
    total_income: u64,
    best_day_income: u64,
    deposits_opened: u32,
    deposits_paid: u64,
    electricity_deficit_percent: f64,
    happiness_deficit_percent: f64,
    safety_deficit_percent: f64,
}

fn main() -> city_sim::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "city_sim=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let config = match &args.config {
        Some(path) => EconomyConfig::load_from_toml(path)?,
        None => EconomyConfig::default(),
    };
    let day_ms = config.deposit_day_ms;
    let clock = ManualClock::new(0);
    let mut world = World::with_clock(config, clock.clone());
    world.new_game(if args.creative {
        GameMode::Creative
    } else {
        GameMode::Standard
    });

    let kinds = BuildingKind::all();
    let size = world.grid().size();
    let mut report = PlaytestReport {
        seed,
        days: args.days,
        ..Default::default()
    };
    let mut banks: Vec<BuildingId> = Vec::new();

    for _ in 0..args.days {
        // A road segment now and then
        if rng.gen_bool(0.3) {
            let tile = TileCoord::new(rng.gen_range(0..size), rng.gen_range(0..size));
            if let Ok(true) = world.place_road(tile) {
                report.roads += 1;
            }
        }

        for _ in 0..args.builds_per_day {
            let affordable: Vec<BuildingKind> =
                kinds.iter().copied().filter(|k| world.can_build(*k)).collect();
            let Some(kind) = pick_kind(&mut rng, &affordable) else {
                break;
            };
            let anchor = TileCoord::new(rng.gen_range(0..size), rng.gen_range(0..size));
            let rotation = Rotation::from_degrees(90 * rng.gen_range(0..4)).unwrap_or_default();

            report.builds_attempted += 1;
            match world.try_build_at(kind, anchor, rotation) {
                Ok(id) => {
                    report.builds_placed += 1;
                    if kind == BuildingKind::Facilities(FacilityType::Bank) {
                        banks.push(id);
                    }
                }
                Err(CityError::InsufficientFunds { .. }) => report.rejected_funds += 1,
                Err(_) => report.rejected_placement += 1,
            }
        }

        // Park a share of spare money in a free bank
        if let (Some(balance), Some(bank)) = (world.balance().amount(), banks.choose(&mut rng)) {
            if balance > 2_000 && world.deposit(*bank).is_none() {
                if world.open_deposit(*bank, balance / 4).is_ok() {
                    report.deposits_opened += 1;
                }
            }
        }

        let day = world.on_day_complete();
        report.total_income += day.income;
        report.best_day_income = report.best_day_income.max(day.income);

        clock.advance(day_ms);
        for (_, payout) in world.poll_timers() {
            report.deposits_paid += payout;
        }
    }

    let snap = world.snapshot();
    report.final_balance = world.balance().amount();
    report.population = snap.population;
    report.buildings = world.building_count();
    report.electricity_deficit_percent = snap.electricity_deficit_percent;
    report.happiness_deficit_percent = snap.happiness_deficit_percent;
    report.safety_deficit_percent = snap.safety_deficit_percent;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("=== City Sim Playtest (seed {}) ===", report.seed);
        println!("Days:        {}", report.days);
        println!(
            "Builds:      {} placed / {} attempted ({} unaffordable, {} blocked)",
            report.builds_placed,
            report.builds_attempted,
            report.rejected_funds,
            report.rejected_placement
        );
        println!("Roads:       {}", report.roads);
        println!("Population:  {}", report.population);
        println!(
            "Income:      {} total, best day {}",
            report.total_income, report.best_day_income
        );
        println!(
            "Deposits:    {} opened, {} paid out",
            report.deposits_opened, report.deposits_paid
        );
        println!("Balance:     {}", world.balance());
        println!(
            "Deficits:    electricity {:.1}%, happiness {:.1}%, safety {:.1}%",
            report.electricity_deficit_percent,
            report.happiness_deficit_percent,
            report.safety_deficit_percent
        );
    }

    Ok(())
}

/// Houses first, then whatever the city lacks
fn pick_kind(rng: &mut ChaCha8Rng, affordable: &[BuildingKind]) -> Option<BuildingKind> {
    if affordable.is_empty() {
        return None;
    }
    let houses: Vec<BuildingKind> = affordable
        .iter()
        .copied()
        .filter(|k| k.category() == Category::House)
        .collect();
    if !houses.is_empty() && rng.gen_bool(0.5) {
        return houses.choose(rng).copied();
    }
    affordable.choose(rng).copied()
}
