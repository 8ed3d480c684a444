//! City Sim - Entry Point
//!
//! Interactive REPL over the rule engine: place buildings and roads on the
//! grid, run day/night cycles and inspect the economy.

use std::io::{self, Write};
use std::path::PathBuf;

use city_sim::city::{BuildingKind, Category};
use city_sim::core::config::EconomyConfig;
use city_sim::core::error::Result;
use city_sim::core::types::{BuildingId, Rotation, TileCoord};
use city_sim::core::DayCycle;
use city_sim::{BuildingInfo, GameMode, World};

use clap::Parser;

/// Interactive city economy simulator
#[derive(Parser, Debug)]
#[command(name = "city-sim")]
#[command(about = "Build a city on a tile grid and watch its economy evolve")]
struct Args {
    /// Economy config (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start in creative mode (unlimited money, no income)
    #[arg(long)]
    creative: bool,

    /// Load a save file at startup
    #[arg(long)]
    load: Option<PathBuf>,

    /// Ticks per day phase of the day/night cycle
    #[arg(long, default_value_t = 5)]
    phase_ticks: u64,
}

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "city_sim=debug".into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EconomyConfig::load_from_toml(path)?,
        None => EconomyConfig::default(),
    };

    let mut world = World::with_config(config);
    let mode = if args.creative {
        GameMode::Creative
    } else {
        GameMode::Standard
    };
    world.new_game(mode);

    if let Some(path) = &args.load {
        world.load_from_path(path)?;
    }

    let mut cycle = DayCycle::new(args.phase_ticks);

    println!("\n=== CITY SIM ===");
    println!("Grid {0}x{0}, starting balance {1}", world.grid().size(), world.balance());
    print_help();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let words: Vec<&str> = input.split_whitespace().collect();
        let Some((&command, rest)) = words.split_first() else {
            continue;
        };

        match command {
            "quit" | "q" => break,
            "help" | "h" => print_help(),
            "status" | "s" => display_status(&world),
            "prices" | "p" => display_prices(&world),
            "list" | "l" => display_buildings(&world),
            "build" | "b" => handle_build(&mut world, rest),
            "road" => match parse_tile(rest) {
                Some(tile) => match world.place_road(tile) {
                    Ok(true) => println!("Road laid at {}", tile),
                    Ok(false) => println!("Already a road at {}", tile),
                    Err(e) => println!("{}", e),
                },
                None => println!("Usage: road <x> <z>"),
            },
            "unroad" => match parse_tile(rest) {
                Some(tile) => {
                    if world.remove_road(tile) {
                        println!("Road removed at {}", tile);
                    } else {
                        println!("No road at {}", tile);
                    }
                }
                None => println!("Usage: unroad <x> <z>"),
            },
            "remove" | "rm" => match rest.first().and_then(|p| resolve_id(&world, p)) {
                Some(id) => {
                    if let Some(kind) = world.remove(id) {
                        println!("Demolished {} {}", kind, id.short());
                    }
                }
                None => println!("Usage: remove <id prefix>"),
            },
            "info" | "i" => match rest.first().and_then(|p| resolve_id(&world, p)) {
                Some(id) => display_info(&world, id),
                None => println!("Usage: info <id prefix>"),
            },
            "day" | "d" => {
                let days = rest.first().and_then(|n| n.parse::<u32>().ok()).unwrap_or(1);
                for _ in 0..days {
                    run_cycle(&mut world, &mut cycle);
                }
            }
            "deposit" => {
                let bank = rest.first().and_then(|p| resolve_id(&world, p));
                let amount = rest.get(1).and_then(|a| a.parse::<u64>().ok());
                match (bank, amount) {
                    (Some(bank), Some(amount)) => match world.open_deposit(bank, amount) {
                        Ok(deposit) => println!(
                            "Deposited {}; {} will be paid out in {} days",
                            deposit.principal,
                            deposit.maturity_value,
                            world.config().deposit_term_days
                        ),
                        Err(e) => println!("Deposit failed: {}", e),
                    },
                    _ => println!("Usage: deposit <bank id prefix> <amount>"),
                }
            }
            "poll" => {
                let payouts = world.poll_timers();
                if payouts.is_empty() {
                    println!("No deposits matured");
                }
                for (bank, payout) in payouts {
                    println!("Deposit at {} paid {}", bank.short(), payout);
                }
            }
            "save" => match rest.first() {
                Some(path) => match world.save_to_path(&PathBuf::from(path)) {
                    Ok(()) => println!("Saved to {}", path),
                    Err(e) => println!("Save failed: {}", e),
                },
                None => println!("Usage: save <path>"),
            },
            "load" => match rest.first() {
                Some(path) => match world.load_from_path(&PathBuf::from(path)) {
                    Ok(save) => println!("Loaded {} (version {})", path, save.version),
                    Err(e) => println!("Load failed: {}", e),
                },
                None => println!("Usage: load <path>"),
            },
            "new" => {
                let mode = if rest.first() == Some(&"creative") {
                    GameMode::Creative
                } else {
                    GameMode::Standard
                };
                world.new_game(mode);
                cycle = DayCycle::new(args.phase_ticks);
                println!("New game ({:?})", mode);
            }
            _ => println!("Unknown command. Type 'help' for a list."),
        }
    }

    println!(
        "\nGoodbye! Final state: day {}, balance {}, population {}.",
        world.day(),
        world.balance(),
        world.metrics().population()
    );
    Ok(())
}

fn print_help() {
    println!();
    println!("Commands:");
    println!("  build <category> <type> <x> <z> [deg] - Place a building (b)");
    println!("  road <x> <z> / unroad <x> <z>        - Lay or remove a road");
    println!("  remove <id>                          - Demolish a building (rm)");
    println!("  info <id>                            - Building details (i)");
    println!("  list                                 - List buildings (l)");
    println!("  day [n]                              - Run n day/night cycles (d)");
    println!("  deposit <bank id> <amount>           - Open a bank deposit");
    println!("  poll                                 - Pay out matured deposits");
    println!("  status                               - City statistics (s)");
    println!("  prices                               - Price list (p)");
    println!("  save <path> / load <path>            - Persist the city");
    println!("  new [creative]                       - Start over");
    println!("  quit                                 - Exit (q)");
    println!();
}

fn parse_tile(words: &[&str]) -> Option<TileCoord> {
    let x = words.first()?.parse().ok()?;
    let z = words.get(1)?.parse().ok()?;
    Some(TileCoord::new(x, z))
}

/// Find a building by the start of its id
fn resolve_id(world: &World, prefix: &str) -> Option<BuildingId> {
    let matches: Vec<BuildingId> = world
        .building_ids()
        .into_iter()
        .filter(|id| id.short().starts_with(prefix))
        .collect();
    match matches.as_slice() {
        [id] => Some(*id),
        [] => {
            println!("No building matches '{}'", prefix);
            None
        }
        _ => {
            println!("'{}' is ambiguous ({} matches)", prefix, matches.len());
            None
        }
    }
}

fn handle_build(world: &mut World, words: &[&str]) {
    if words.len() < 4 {
        println!("Usage: build <category> <type> <x> <z> [deg]");
        return;
    }
    let Some(kind) = BuildingKind::parse(words[0], words[1]) else {
        println!("Unknown building {}/{}", words[0], words[1]);
        return;
    };
    let Some(anchor) = parse_tile(&words[2..]) else {
        println!("Invalid tile");
        return;
    };
    let degrees = words.get(4).and_then(|d| d.parse::<i32>().ok()).unwrap_or(0);
    let Some(rotation) = Rotation::from_degrees(degrees) else {
        println!("Rotation must be a multiple of 90");
        return;
    };

    match world.try_build_at(kind, anchor, rotation) {
        Ok(id) => println!("Built {} [{}], balance {}", kind, id.short(), world.balance()),
        Err(e) => println!("Cannot build {}: {}", kind, e),
    }
}

/// Advance the day/night cycle until one day completes
fn run_cycle(world: &mut World, cycle: &mut DayCycle) {
    loop {
        if cycle.advance() {
            let report = world.on_day_complete();
            if report.skipped {
                println!("Day {} complete (creative mode)", report.day);
            } else {
                println!(
                    "Day {} complete: +{} income, population {}, balance {}",
                    report.day,
                    report.income,
                    report.population,
                    world.balance()
                );
            }
            for (bank, payout) in world.poll_timers() {
                println!("Deposit at {} paid {}", bank.short(), payout);
            }
            return;
        }
    }
}

fn display_status(world: &World) {
    let snap = world.snapshot();
    println!();
    println!("--- Day {} | Balance {} ---", snap.day, world.balance());
    println!("  Population:  {}", snap.population);
    println!(
        "  Electricity: {} produced / {} consumed ({:.1}% deficit)",
        snap.electricity_produced, snap.electricity_consumed, snap.electricity_deficit_percent
    );
    println!(
        "  Happiness:   {} / {} needed ({:.1}% deficit)",
        snap.happiness, snap.happiness_needed, snap.happiness_deficit_percent
    );
    println!(
        "  Safety:      {} / {} needed ({:.1}% deficit)",
        snap.safety, snap.safety_needed, snap.safety_deficit_percent
    );
    println!("  Buildings:   {}", world.building_count());
    println!();
}

fn display_prices(world: &World) {
    for category in Category::ALL {
        println!("{}:", category);
        for kind in BuildingKind::all().into_iter().filter(|k| k.category() == category) {
            let (w, d) = kind.size();
            println!("  {:<18} {:>6}  ({}x{})", kind.type_name(), world.price(kind), w, d);
        }
    }
}

fn display_buildings(world: &World) {
    for id in world.building_ids() {
        if let Some(kind) = world.building_kind(id) {
            println!("  [{}] {}", id.short(), kind);
        }
    }
}

fn display_info(world: &World, id: BuildingId) {
    match world.building_info(id) {
        Some(BuildingInfo::House(info)) => {
            println!(
                "House ({}): {} residents (+{} bonus) of {}",
                info.house_type.name(),
                info.civilians,
                info.bonus_civilians,
                info.max_capacity
            );
            println!(
                "  Earns {}/day ({} base + {} factory bonus), uses {} kWh",
                info.total_money_earned,
                info.base_money_per_day,
                info.bonus_money,
                info.electricity_consumption
            );
            println!(
                "  Store bonus {}%, factory bonus {}%",
                info.store_bonus_percent, info.factory_bonus_percent
            );
        }
        Some(BuildingInfo::Energy(record)) => {
            println!("Power plant ({}): {} kWh", record.energy_type.name(), record.production);
        }
        Some(BuildingInfo::Entertainment(record)) => {
            println!(
                "Entertainment ({}): {} happiness",
                record.entertainment_type.name(),
                record.happiness
            );
        }
        Some(BuildingInfo::Store(info)) | Some(BuildingInfo::Factory(info)) => {
            println!(
                "{}: radius {}, +{}% to {} houses",
                info.subtype, info.radius, info.bonus_percent, info.covered_houses
            );
        }
        Some(BuildingInfo::Facility { record, deposit }) => {
            println!("Facility ({})", record.facility_type.name());
            if let Some(deposit) = deposit {
                println!(
                    "  Deposit {} -> {} in {} days",
                    deposit.principal, deposit.maturity_value, deposit.days_remaining
                );
            }
        }
        None => println!("No info for {}", id.short()),
    }
}
