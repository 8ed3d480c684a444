//! World - owns the whole city state
//!
//! Every mutation of the simulation goes through `&mut World`, so builds,
//! removals, daily ticks and timer payouts never interleave.

pub mod placement;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::city::{
    Balance, BuildingKind, CityMetrics, CoverageInfo, Deposit, DepositView, EnergyLedger,
    EnergyRecord, EntertainmentLedger, EntertainmentRecord, FacilitiesLedger, FacilityRecord,
    FactoryLedger, HouseInfo, HousingLedger, MetricsSnapshot, StoreLedger, Treasury,
};
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::EconomyConfig;
use crate::core::error::{CityError, Result};
use crate::core::types::{BuildingId, Money};
use crate::simulation::events::{CityEvent, EventLog, Subscriber};
use crate::simulation::scheduler::Scheduler;
use crate::simulation::tick::{run_daily_tick, DayReport};
use crate::spatial::grid::TileGrid;

pub use placement::Placement;

/// How a new game treats money
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Standard,
    /// Unlimited money, no income, saving disabled
    Creative,
}

/// Per-building view for info panels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BuildingInfo {
    House(HouseInfo),
    Energy(EnergyRecord),
    Entertainment(EntertainmentRecord),
    Store(CoverageInfo),
    Factory(CoverageInfo),
    Facility {
        record: FacilityRecord,
        deposit: Option<DepositView>,
    },
}

/// Timer payload for a maturing deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DepositTimer {
    pub bank: BuildingId,
}

/// The simulated city
pub struct World {
    pub(crate) config: EconomyConfig,
    pub(crate) treasury: Treasury,
    pub(crate) metrics: CityMetrics,
    pub(crate) housing: HousingLedger,
    pub(crate) energy: EnergyLedger,
    pub(crate) entertainment: EntertainmentLedger,
    pub(crate) stores: StoreLedger,
    pub(crate) factories: FactoryLedger,
    pub(crate) facilities: FacilitiesLedger,
    pub(crate) grid: TileGrid,
    /// Kind of every standing building
    pub(crate) registry: AHashMap<BuildingId, BuildingKind>,
    clock: Box<dyn Clock>,
    timers: Scheduler<DepositTimer>,
    events: EventLog,
    subscribers: Vec<Subscriber>,
}

impl World {
    pub fn new() -> Self {
        Self::with_config(EconomyConfig::default())
    }

    pub fn with_config(config: EconomyConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    /// Build a world reading wall-clock time from `clock`
    pub fn with_clock(config: EconomyConfig, clock: impl Clock + 'static) -> Self {
        Self {
            treasury: Treasury::new(config.starting_money),
            metrics: CityMetrics::new(),
            housing: HousingLedger::new(),
            energy: EnergyLedger::new(),
            entertainment: EntertainmentLedger::new(),
            stores: StoreLedger::new(),
            factories: FactoryLedger::new(),
            facilities: FacilitiesLedger::new(),
            grid: TileGrid::new(config.grid_size),
            registry: AHashMap::new(),
            clock: Box::new(clock),
            timers: Scheduler::new(),
            events: EventLog::new(),
            subscribers: Vec::new(),
            config,
        }
    }

    /// Start over: fresh treasury, empty map, day 0, no pending deposits
    pub fn new_game(&mut self, mode: GameMode) {
        let creative = mode == GameMode::Creative;
        self.treasury.reset(Some(creative));
        self.metrics.reset();
        self.housing.clear();
        self.energy.clear();
        self.entertainment.clear();
        self.stores.clear();
        self.factories.clear();
        self.facilities.clear();
        self.grid.clear();
        self.registry.clear();
        self.timers.cancel_all();
        self.events.clear();

        tracing::info!("New game started ({:?})", mode);
        self.emit(CityEvent::GameReset { creative });
    }

    /// Register a callback for every future event
    pub fn subscribe(&mut self, subscriber: Subscriber) {
        self.subscribers.push(subscriber);
    }

    pub(crate) fn emit(&mut self, event: CityEvent) {
        for subscriber in self.subscribers.iter_mut() {
            subscriber(&event);
        }
        self.events.add_event(event, self.metrics.day());
    }

    pub fn config(&self) -> &EconomyConfig {
        &self.config
    }

    pub fn treasury(&self) -> &Treasury {
        &self.treasury
    }

    pub fn balance(&self) -> Balance {
        self.treasury.balance()
    }

    pub fn metrics(&self) -> &CityMetrics {
        &self.metrics
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn housing(&self) -> &HousingLedger {
        &self.housing
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn day(&self) -> u32 {
        self.metrics.day()
    }

    pub fn building_kind(&self, id: BuildingId) -> Option<BuildingKind> {
        self.registry.get(&id).copied()
    }

    /// Ids of all standing buildings, sorted
    pub fn building_ids(&self) -> Vec<BuildingId> {
        let mut ids: Vec<BuildingId> = self.registry.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn building_count(&self) -> usize {
        self.registry.len()
    }

    pub fn building_info(&self, id: BuildingId) -> Option<BuildingInfo> {
        let info = match self.building_kind(id)? {
            BuildingKind::House(_) => BuildingInfo::House(self.housing.info(id, &self.config)?),
            BuildingKind::Energy(_) => BuildingInfo::Energy(self.energy.info(id)?),
            BuildingKind::Entertainment(_) => {
                BuildingInfo::Entertainment(self.entertainment.info(id)?)
            }
            BuildingKind::Store(_) => {
                BuildingInfo::Store(self.stores.info(id, &self.grid, &self.housing)?)
            }
            BuildingKind::Factory(_) => {
                BuildingInfo::Factory(self.factories.info(id, &self.grid, &self.housing)?)
            }
            BuildingKind::Facilities(_) => BuildingInfo::Facility {
                record: self.facilities.info(id)?,
                deposit: self.deposit(id),
            },
        };
        Some(info)
    }

    /// Run the daily update; called by the day/night driver once per cycle
    pub fn on_day_complete(&mut self) -> DayReport {
        let report = run_daily_tick(self);
        self.emit(CityEvent::DayCompleted {
            day: report.day,
            income: report.income,
            population: report.population,
            skipped: report.skipped,
        });
        report
    }

    /// Lock `principal` in a bank for the deposit term
    ///
    /// Nothing is recorded unless the treasury pays the principal.
    pub fn open_deposit(&mut self, bank: BuildingId, principal: Money) -> Result<Deposit> {
        let maturity_value = self.facilities.validate_deposit(bank, principal, &self.config)?;
        if !self.treasury.try_spend(principal) {
            return Err(CityError::InsufficientFunds {
                price: principal,
                balance: self.treasury.raw_balance(),
            });
        }

        let now = self.clock.now_ms();
        let deposit = self
            .facilities
            .start_deposit(bank, principal, maturity_value, now, &self.config);
        self.timers.schedule(deposit.matures_at_ms, DepositTimer { bank });

        tracing::info!(
            "Deposit of {} opened at bank {}, pays {}",
            principal,
            bank.short(),
            deposit.maturity_value
        );
        self.emit(CityEvent::DepositOpened {
            bank,
            principal,
            maturity_value: deposit.maturity_value,
        });
        Ok(deposit)
    }

    pub fn deposit(&self, bank: BuildingId) -> Option<DepositView> {
        self.facilities.deposit(bank, self.clock.now_ms(), &self.config)
    }

    /// Fire every matured timer; returns `(bank, payout)` per matured deposit
    pub fn poll_timers(&mut self) -> Vec<(BuildingId, Money)> {
        let now = self.clock.now_ms();
        let mut payouts = Vec::new();
        for DepositTimer { bank } in self.timers.take_due(now) {
            let Some(deposit) = self.facilities.complete_deposit(bank) else {
                continue;
            };
            self.treasury.add(deposit.maturity_value);
            tracing::info!("Deposit at bank {} matured: +{}", bank.short(), deposit.maturity_value);
            self.emit(CityEvent::DepositMatured {
                bank,
                payout: deposit.maturity_value,
            });
            payouts.push((bank, deposit.maturity_value));
        }
        payouts
    }

    /// Number of timers still waiting to fire
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("day", &self.metrics.day())
            .field("balance", &self.treasury.balance())
            .field("buildings", &self.registry.len())
            .field("pending_timers", &self.timers.pending())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::building::{FacilityType, HouseType};
    use crate::core::clock::ManualClock;
    use crate::core::types::TileCoord;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_new_world_defaults() {
        let world = World::new();
        assert_eq!(world.balance(), Balance::Finite(1000));
        assert_eq!(world.day(), 0);
        assert_eq!(world.building_count(), 0);
        assert_eq!(world.grid().size(), 25);
    }

    #[test]
    fn test_subscribers_receive_events() {
        let mut world = World::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        world.subscribe(Box::new(move |event| {
            sink.lock().unwrap().push(event.clone());
        }));

        world
            .try_build(
                BuildingKind::House(HouseType::American),
                &Placement::new(vec![TileCoord::new(1, 1)]),
            )
            .unwrap();
        world.on_day_complete();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(matches!(seen[0], CityEvent::BuildingPlaced { price: 100, .. }));
        assert!(matches!(seen[1], CityEvent::DayCompleted { day: 1, .. }));
        assert_eq!(world.events().len(), 2);
    }

    #[test]
    fn test_new_game_cancels_deposits() {
        let clock = ManualClock::new(0);
        let mut world = World::with_clock(EconomyConfig::default(), clock.clone());
        let bank = world
            .try_build(
                BuildingKind::Facilities(FacilityType::Bank),
                &Placement::new(vec![TileCoord::new(0, 0)]),
            )
            .unwrap();
        world.open_deposit(bank, 200).unwrap();
        assert_eq!(world.pending_timers(), 1);

        world.new_game(GameMode::Standard);
        assert_eq!(world.pending_timers(), 0);
        assert_eq!(world.balance(), Balance::Finite(1000));

        clock.advance(world.config().deposit_term_ms());
        assert!(world.poll_timers().is_empty());
        assert_eq!(world.balance(), Balance::Finite(1000));
    }

    #[test]
    fn test_building_info_dispatch() {
        let mut world = World::new();
        let house = world
            .try_build(
                BuildingKind::House(HouseType::TwoStory),
                &Placement::new(vec![TileCoord::new(3, 3)]),
            )
            .unwrap();

        match world.building_info(house) {
            Some(BuildingInfo::House(info)) => assert_eq!(info.max_capacity, 15),
            other => panic!("unexpected info: {:?}", other),
        }
        assert!(world.building_info(BuildingId::new()).is_none());
    }
}
