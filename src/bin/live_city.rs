//! Live city - real-time day/night driver
//!
//! Runs the world inside a tokio task. One interval drives the day/night
//! cycle, a second one polls deposit timers every second, and Ctrl-C stops
//! the run.

use std::path::PathBuf;
use std::time::Duration;

use city_sim::city::{BuildingKind, EnergyType, HouseType, StoreType};
use city_sim::core::config::EconomyConfig;
use city_sim::core::types::{Rotation, TileCoord};
use city_sim::core::DayCycle;
use city_sim::simulation::CityEvent;
use city_sim::{GameMode, World};
use clap::Parser;
use tokio::time::{interval, MissedTickBehavior};

/// Real-time city driver
#[derive(Parser, Debug)]
#[command(name = "live_city")]
#[command(about = "Run the city in real time with a day/night cycle")]
struct Args {
    /// Milliseconds per day/night tick
    #[arg(long, default_value_t = 200)]
    tick_ms: u64,

    /// Ticks per day phase
    #[arg(long, default_value_t = 5)]
    phase_ticks: u64,

    /// Stop after this many days (runs until Ctrl-C when omitted)
    #[arg(long)]
    days: Option<u32>,

    /// Economy config (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start in creative mode
    #[arg(long)]
    creative: bool,

    /// Skip the starter layout
    #[arg(long)]
    empty: bool,
}

#[tokio::main]
async fn main() -> city_sim::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => EconomyConfig::load_from_toml(path)?,
        None => EconomyConfig::default(),
    };

    let mut world = World::with_config(config);
    world.subscribe(Box::new(|event| match event {
        CityEvent::DayCompleted { day, income, population, skipped: false } => {
            tracing::info!("Day {}: +{} income, population {}", day, income, population);
        }
        CityEvent::DepositMatured { bank, payout } => {
            tracing::info!("Deposit at {} paid {}", bank.short(), payout);
        }
        _ => {}
    }));
    world.new_game(if args.creative {
        GameMode::Creative
    } else {
        GameMode::Standard
    });
    if !args.empty {
        build_starter_city(&mut world);
    }

    tracing::info!(
        "Starting live city: {} ms per tick, {} ticks per day",
        args.tick_ms,
        args.phase_ticks * 4
    );

    let driver = tokio::spawn(run(world, args));
    let world = driver
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    let snap = world.snapshot();
    println!(
        "Stopped on day {}: balance {}, population {}, {} buildings",
        snap.day,
        world.balance(),
        snap.population,
        world.building_count()
    );
    Ok(())
}

/// Own the world and drive it until the day limit or Ctrl-C
async fn run(mut world: World, args: Args) -> World {
    let mut cycle = DayCycle::new(args.phase_ticks);
    let mut ticks = interval(Duration::from_millis(args.tick_ms.max(1)));
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut timers = interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            _ = ticks.tick() => {
                if cycle.advance() {
                    world.on_day_complete();
                    if args.days.is_some_and(|limit| world.day() >= limit) {
                        break;
                    }
                }
            }
            _ = timers.tick() => {
                world.poll_timers();
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }
    world
}

/// A few houses around a store, powered by wind
fn build_starter_city(world: &mut World) {
    let layout = [
        (BuildingKind::Energy(EnergyType::Wind), TileCoord::new(10, 10)),
        (BuildingKind::Energy(EnergyType::Wind), TileCoord::new(11, 10)),
        (BuildingKind::Store(StoreType::Bakery), TileCoord::new(12, 12)),
        (BuildingKind::House(HouseType::American), TileCoord::new(11, 12)),
        (BuildingKind::House(HouseType::American), TileCoord::new(13, 12)),
        (BuildingKind::House(HouseType::TwoStory), TileCoord::new(12, 13)),
    ];
    for tile in (8..17).map(|x| TileCoord::new(x, 14)) {
        let _ = world.place_road(tile);
    }
    for (kind, anchor) in layout {
        if let Err(e) = world.try_build_at(kind, anchor, Rotation::Deg0) {
            tracing::warn!("Starter {} not built: {}", kind, e);
        }
    }
}
