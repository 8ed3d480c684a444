//! Integration tests for bank deposits
//!
//! Deposits mature on wall-clock time, so every test drives a shared
//! `ManualClock` instead of waiting.

use city_sim::city::{Balance, BuildingKind, FacilityType, HouseType};
use city_sim::core::config::EconomyConfig;
use city_sim::core::types::{BuildingId, TileCoord};
use city_sim::core::ManualClock;
use city_sim::simulation::CityEvent;
use city_sim::{BuildingInfo, CityError, Placement, World};

const START_MS: u64 = 1_000_000;

fn world_with_bank() -> (World, ManualClock, BuildingId) {
    let clock = ManualClock::new(START_MS);
    let mut world = World::with_clock(EconomyConfig::default(), clock.clone());
    let bank = world
        .try_build(
            BuildingKind::Facilities(FacilityType::Bank),
            &Placement::new(vec![TileCoord::new(0, 0)]),
        )
        .unwrap();
    (world, clock, bank)
}

// ============================================================================
// Maturity
// ============================================================================

#[test]
fn test_deposit_pays_130_after_term() {
    let (mut world, clock, bank) = world_with_bank();
    assert_eq!(world.balance(), Balance::Finite(500));

    let deposit = world.open_deposit(bank, 100).unwrap();
    assert_eq!(deposit.maturity_value, 130);
    assert_eq!(world.balance(), Balance::Finite(400));

    let term = world.config().deposit_term_ms();
    clock.advance(term - 1);
    assert!(world.poll_timers().is_empty());
    assert_eq!(world.balance(), Balance::Finite(400));

    clock.advance(1);
    assert_eq!(world.poll_timers(), vec![(bank, 130)]);
    assert_eq!(world.balance(), Balance::Finite(530));
    assert!(world.deposit(bank).is_none());
    assert!(matches!(
        world.events().last(),
        Some(CityEvent::DepositMatured { payout: 130, .. })
    ));

    // Paid once only
    clock.advance(term);
    assert!(world.poll_timers().is_empty());
    assert_eq!(world.balance(), Balance::Finite(530));
}

#[test]
fn test_days_remaining_counts_down() {
    let (mut world, clock, bank) = world_with_bank();
    world.open_deposit(bank, 200).unwrap();
    let day_ms = world.config().deposit_day_ms;

    assert_eq!(world.deposit(bank).map(|d| d.days_remaining), Some(30));

    clock.advance(day_ms / 2);
    assert_eq!(world.deposit(bank).map(|d| d.days_remaining), Some(30));

    clock.advance(day_ms * 10);
    assert_eq!(world.deposit(bank).map(|d| d.days_remaining), Some(20));

    match world.building_info(bank) {
        Some(BuildingInfo::Facility { deposit: Some(view), .. }) => {
            assert_eq!(view.principal, 200);
            assert_eq!(view.maturity_value, 260);
            assert_eq!(view.days_remaining, 20);
        }
        other => panic!("expected bank info with a deposit, got {:?}", other),
    }
}

#[test]
fn test_game_days_do_not_mature_deposits() {
    let (mut world, _clock, bank) = world_with_bank();
    world.open_deposit(bank, 100).unwrap();

    for _ in 0..40 {
        world.on_day_complete();
    }
    assert!(world.poll_timers().is_empty());
    assert_eq!(world.pending_timers(), 1);
}

// ============================================================================
// Rejections
// ============================================================================

#[test]
fn test_unaffordable_deposit_records_nothing() {
    let (mut world, _clock, bank) = world_with_bank();

    let result = world.open_deposit(bank, 501);
    assert!(matches!(
        result,
        Err(CityError::InsufficientFunds { price: 501, balance: 500 })
    ));
    assert!(world.deposit(bank).is_none());
    assert_eq!(world.pending_timers(), 0);
    assert_eq!(world.balance(), Balance::Finite(500));
}

#[test]
fn test_one_deposit_per_bank() {
    let (mut world, _clock, bank) = world_with_bank();
    world.open_deposit(bank, 100).unwrap();

    let result = world.open_deposit(bank, 50);
    assert!(matches!(result, Err(CityError::DepositActive(id)) if id == bank));
    assert_eq!(world.balance(), Balance::Finite(400));
}

#[test]
fn test_deposit_needs_a_bank() {
    let (mut world, _clock, _bank) = world_with_bank();
    let house = world
        .try_build(
            BuildingKind::House(HouseType::American),
            &Placement::new(vec![TileCoord::new(5, 5)]),
        )
        .unwrap();

    assert!(matches!(world.open_deposit(house, 10), Err(CityError::UnknownBuilding(_))));
    assert!(matches!(
        world.open_deposit(BuildingId::new(), 10),
        Err(CityError::UnknownBuilding(_))
    ));

    let school = world
        .try_build(
            BuildingKind::Facilities(FacilityType::School),
            &Placement::new(vec![TileCoord::new(8, 8)]),
        )
        .unwrap();
    assert!(matches!(world.open_deposit(school, 10), Err(CityError::NotABank(_))));
}

#[test]
fn test_zero_deposit_rejected() {
    let (mut world, _clock, bank) = world_with_bank();
    assert!(matches!(world.open_deposit(bank, 0), Err(CityError::InvalidDeposit(0))));
}

#[test]
fn test_oversized_deposit_rejected_before_payment() {
    let (mut world, _clock, bank) = world_with_bank();
    world.load_json(r#"{"money": 1000000000000000000}"#).unwrap();
    let balance = Balance::Finite(1_000_000_000_000_000_000);
    assert_eq!(world.balance(), balance);

    // Affordable, but the maturity value does not fit in Money
    let principal = 700_000_000_000_000_000;
    let result = world.open_deposit(bank, principal);
    assert!(matches!(result, Err(CityError::InvalidDeposit(p)) if p == principal));
    assert_eq!(world.balance(), balance);
    assert!(world.deposit(bank).is_none());
    assert_eq!(world.pending_timers(), 0);

    // A smaller deposit from the same balance still works
    let deposit = world.open_deposit(bank, 1_000_000_000_000_000).unwrap();
    assert_eq!(deposit.maturity_value, 1_300_000_000_000_000);
}

#[test]
fn test_odd_interest_rounds_half_up() {
    let (mut world, clock, bank) = world_with_bank();
    let deposit = world.open_deposit(bank, 5).unwrap();
    assert_eq!(deposit.maturity_value, 7);

    clock.advance(world.config().deposit_term_ms());
    assert_eq!(world.poll_timers(), vec![(bank, 7)]);
    assert_eq!(world.balance(), Balance::Finite(502));
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_deposit_outlives_its_bank() {
    let (mut world, clock, bank) = world_with_bank();
    world.open_deposit(bank, 100).unwrap();

    world.remove(bank);
    assert!(world.building_info(bank).is_none());
    assert!(world.deposit(bank).is_some());

    clock.advance(world.config().deposit_term_ms());
    assert_eq!(world.poll_timers(), vec![(bank, 130)]);
    assert_eq!(world.balance(), Balance::Finite(530));
}

#[test]
fn test_reopen_after_maturity() {
    let (mut world, clock, bank) = world_with_bank();
    world.open_deposit(bank, 100).unwrap();
    clock.advance(world.config().deposit_term_ms());
    world.poll_timers();

    let second = world.open_deposit(bank, 300).unwrap();
    assert_eq!(second.opened_at_ms, START_MS + world.config().deposit_term_ms());
    assert_eq!(world.balance(), Balance::Finite(230));
}
