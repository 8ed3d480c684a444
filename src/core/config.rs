//! Economy configuration with documented constants
//!
//! All tuning numbers of the rule engine live here. Defaults reproduce the
//! shipped game balance; a TOML file can override any subset of them.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::city::building::{BuildingKind, Category};
use crate::core::error::{CityError, Result};
use crate::core::types::{Day, Money};

/// Per-type numbers keyed by the type name (`"modern"`, `"wind"`, ...)
pub type Table = BTreeMap<String, u64>;

/// Price tables, one per category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceTables {
    pub house: Table,
    pub energy: Table,
    pub entertainment: Table,
    pub store: Table,
    pub facilities: Table,
    pub factory: Table,
}

impl PriceTables {
    pub fn for_category(&self, category: Category) -> &Table {
        match category {
            Category::House => &self.house,
            Category::Energy => &self.energy,
            Category::Entertainment => &self.entertainment,
            Category::Store => &self.store,
            Category::Facilities => &self.facilities,
            Category::Factory => &self.factory,
        }
    }
}

impl Default for PriceTables {
    fn default() -> Self {
        Self {
            house: table(&[("american", 100), ("two_story", 300), ("modern", 700)]),
            energy: table(&[("nuclear", 1000), ("thermal", 200), ("wind", 10)]),
            entertainment: table(&[("small_park", 10), ("stadium", 500)]),
            store: table(&[("convenience_store", 200), ("bakery", 100)]),
            facilities: table(&[
                ("bank", 500),
                ("fire_station", 100),
                ("hospital", 100),
                ("police_station", 100),
                ("school", 100),
            ]),
            factory: table(&[("small_factory", 100), ("big_factory", 300), ("industry", 900)]),
        }
    }
}

/// Configuration for the economic rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    // === MAP ===
    /// Side length of the square tile grid
    pub grid_size: i32,

    // === TREASURY ===
    /// Balance of a fresh game
    pub starting_money: Money,

    // === HOUSING ===
    /// Residents moving into a freshly built house
    ///
    /// A house gains one resident per day after that until it reaches
    /// its capacity, so a Modern house (capacity 50) fills in 48 days.
    pub starting_civilians: u32,

    /// Electricity drawn by each resident (kWh per day)
    pub electricity_per_civilian: u64,

    /// Income generated by each resident per day
    pub money_per_civilian: Money,

    /// Happiness each resident demands once the grace period is over
    pub happiness_per_civilian: u64,

    /// Days before happiness and safety requirements apply
    ///
    /// During the grace period both requirements report 0 and never
    /// reduce income.
    pub grace_period_days: Day,

    // === SAFETY ===
    /// Safety points granted by each non-bank facility
    pub safety_per_facility: u64,

    /// Residents covered by one safety unit
    pub residents_per_safety_unit: u64,

    /// Safety points required per started block of residents
    pub safety_per_unit: u64,

    // === COVERAGE ===
    /// Resident bonus (percent) a store grants every covered house
    pub store_bonus_percent: u32,

    /// Income bonus (percent) a factory grants every covered house
    pub factory_bonus_percent: u32,

    // === BANK ===
    /// Interest paid on a matured deposit (30 means 1.3x the principal)
    pub deposit_interest_percent: u64,

    /// Term of a deposit in days
    pub deposit_term_days: u64,

    /// Length of a deposit day in wall-clock milliseconds
    ///
    /// Deposits mature in real time, not in game days.
    pub deposit_day_ms: u64,

    // === TABLES ===
    pub prices: PriceTables,

    /// Maximum residents per house type
    pub house_capacity: Table,

    /// Electricity produced per energy type
    pub energy_production: Table,

    /// Happiness provided per entertainment type
    pub entertainment_happiness: Table,

    /// Coverage radius (Chebyshev tiles) per store type
    pub store_radius: Table,

    /// Coverage radius (Chebyshev tiles) per factory type
    pub factory_radius: Table,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            grid_size: 25,
            starting_money: 1000,

            starting_civilians: 2,
            electricity_per_civilian: 5000,
            money_per_civilian: 5,
            happiness_per_civilian: 10,
            grace_period_days: 30,

            safety_per_facility: 25,
            residents_per_safety_unit: 500,
            safety_per_unit: 100,

            store_bonus_percent: 20,
            factory_bonus_percent: 50,

            deposit_interest_percent: 30,
            deposit_term_days: 30,
            deposit_day_ms: 24 * 60 * 60 * 1000,

            prices: PriceTables::default(),
            house_capacity: table(&[("american", 6), ("two_story", 15), ("modern", 50)]),
            energy_production: table(&[
                ("nuclear", 100_000_000),
                ("thermal", 1_000_000),
                ("wind", 50_000),
            ]),
            entertainment_happiness: table(&[("small_park", 100), ("stadium", 10_000)]),
            store_radius: table(&[("convenience_store", 3), ("bakery", 1)]),
            factory_radius: table(&[("small_factory", 1), ("big_factory", 3), ("industry", 7)]),
        }
    }
}

impl EconomyConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse a TOML string; missing keys keep their defaults
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: EconomyConfig = toml::from_str(content)?;
        config.validate().map_err(CityError::Config)?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.grid_size <= 0 {
            return Err(format!("grid_size ({}) must be positive", self.grid_size));
        }

        if self.starting_civilians == 0 {
            return Err("starting_civilians must be at least 1".into());
        }

        for (name, capacity) in &self.house_capacity {
            if *capacity < self.starting_civilians as u64 {
                return Err(format!(
                    "house_capacity.{} ({}) is below starting_civilians ({})",
                    name, capacity, self.starting_civilians
                ));
            }
        }

        for (name, radius) in self.store_radius.iter().chain(self.factory_radius.iter()) {
            if *radius == 0 {
                return Err(format!("coverage radius for {} must be at least 1", name));
            }
        }

        if self.residents_per_safety_unit == 0 {
            return Err("residents_per_safety_unit must be positive".into());
        }

        if self.deposit_term_days == 0 || self.deposit_day_ms == 0 {
            return Err("deposit term must be positive".into());
        }
        if self.deposit_term_days.checked_mul(self.deposit_day_ms).is_none() {
            return Err("deposit term overflows milliseconds".into());
        }

        Ok(())
    }

    /// Construction price; types missing from the table are free
    pub fn price(&self, kind: BuildingKind) -> Money {
        lookup(self.prices.for_category(kind.category()), kind, "price")
    }

    pub fn house_capacity(&self, kind: BuildingKind) -> u32 {
        lookup(&self.house_capacity, kind, "house capacity")
            .max(self.starting_civilians as u64) as u32
    }

    pub fn energy_production(&self, kind: BuildingKind) -> u64 {
        lookup(&self.energy_production, kind, "energy production")
    }

    pub fn entertainment_happiness(&self, kind: BuildingKind) -> u64 {
        lookup(&self.entertainment_happiness, kind, "entertainment happiness")
    }

    /// Coverage radius for stores and factories, never below 1
    pub fn coverage_radius(&self, kind: BuildingKind) -> u32 {
        let table = match kind.category() {
            Category::Factory => &self.factory_radius,
            _ => &self.store_radius,
        };
        lookup(table, kind, "coverage radius").max(1) as u32
    }

    /// Value a deposit pays back at maturity, interest rounded half up.
    /// `None` when the value does not fit in `Money`.
    pub fn deposit_maturity(&self, principal: Money) -> Option<Money> {
        let interest = principal
            .checked_mul(self.deposit_interest_percent)?
            .checked_add(50)?
            / 100;
        principal.checked_add(interest)
    }

    /// Deposit term in wall-clock milliseconds, saturating
    pub fn deposit_term_ms(&self) -> u64 {
        self.deposit_term_days.saturating_mul(self.deposit_day_ms)
    }
}

fn table(entries: &[(&str, u64)]) -> Table {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn lookup(table: &Table, kind: BuildingKind, what: &str) -> u64 {
    match table.get(kind.type_name()) {
        Some(value) => *value,
        None => {
            tracing::warn!("No {} configured for {}, using 0", what, kind);
            0
        }
    }
}
