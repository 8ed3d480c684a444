//! Housing ledger - residents, growth and per-house income
//!
//! A new house starts with `starting_civilians` residents and gains one per
//! day until it is full. Store and factory bonuses are stored as additive
//! percentages on each house.

use std::collections::hash_map::Entry;

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::city::building::{BuildingKind, HouseType};
use crate::city::metrics::CityMetrics;
use crate::core::config::EconomyConfig;
use crate::core::types::{BuildingId, Money, TileCoord};

/// Which house bonus a coverage provider feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusKind {
    /// Extra residents (stores)
    Store,
    /// Extra income (factories)
    Factory,
}

impl BonusKind {
    pub fn percent(&self, config: &EconomyConfig) -> u32 {
        match self {
            BonusKind::Store => config.store_bonus_percent,
            BonusKind::Factory => config.factory_bonus_percent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseRecord {
    pub house_type: HouseType,
    pub civilians: u32,
    pub max_capacity: u32,
    pub tiles: AHashSet<TileCoord>,
    pub days_since_build: u32,
    pub factory_bonus_percent: u32,
    pub store_bonus_percent: u32,
}

/// Derived per-house figures shown in the info panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HouseInfo {
    pub house_type: HouseType,
    pub civilians: u32,
    pub max_capacity: u32,
    pub days_since_build: u32,
    pub bonus_civilians: u64,
    pub total_civilians: u64,
    pub base_money_per_day: Money,
    pub bonus_money: Money,
    pub total_money_earned: Money,
    pub electricity_consumption: u64,
    pub store_bonus_percent: u32,
    pub factory_bonus_percent: u32,
}

impl HouseRecord {
    /// Resident count implied by the house's age
    fn target_civilians(&self, config: &EconomyConfig) -> u32 {
        config
            .starting_civilians
            .saturating_add(self.days_since_build)
            .min(self.max_capacity)
    }

    pub fn info(&self, config: &EconomyConfig) -> HouseInfo {
        let base = self.civilians as u64;
        let bonus_civilians = base * self.store_bonus_percent as u64 / 100;
        let total_civilians = base + bonus_civilians;

        let base_money_per_day = total_civilians * config.money_per_civilian;
        let bonus_money = base_money_per_day * self.factory_bonus_percent as u64 / 100;

        HouseInfo {
            house_type: self.house_type,
            civilians: self.civilians,
            max_capacity: self.max_capacity,
            days_since_build: self.days_since_build,
            bonus_civilians,
            total_civilians,
            base_money_per_day,
            bonus_money,
            total_money_earned: base_money_per_day + bonus_money,
            electricity_consumption: total_civilians * config.electricity_per_civilian,
            store_bonus_percent: self.store_bonus_percent,
            factory_bonus_percent: self.factory_bonus_percent,
        }
    }

    /// Whether any of the house's tiles lies in `tiles`
    pub fn intersects(&self, tiles: &AHashSet<TileCoord>) -> bool {
        self.tiles.iter().any(|t| tiles.contains(t))
    }
}

/// All houses of the city
#[derive(Debug, Clone, Default)]
pub struct HousingLedger {
    houses: AHashMap<BuildingId, HouseRecord>,
}

impl HousingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new house and charge its first residents to the metrics
    pub fn initialize(
        &mut self,
        id: BuildingId,
        house_type: HouseType,
        tiles: impl IntoIterator<Item = TileCoord>,
        config: &EconomyConfig,
        metrics: &mut CityMetrics,
    ) -> &HouseRecord {
        let slot = match self.houses.entry(id) {
            Entry::Occupied(existing) => {
                tracing::warn!("House {} is already registered", id.short());
                return existing.into_mut();
            }
            Entry::Vacant(slot) => slot,
        };

        let civilians = config.starting_civilians;
        let record = HouseRecord {
            house_type,
            civilians,
            max_capacity: config.house_capacity(BuildingKind::House(house_type)),
            tiles: tiles.into_iter().collect(),
            days_since_build: 0,
            factory_bonus_percent: 0,
            store_bonus_percent: 0,
        };

        metrics.add_population(civilians as u64);
        metrics.add_electricity_consumed(civilians as u64 * config.electricity_per_civilian);

        tracing::debug!(
            "House {} ({}) moved in {} residents",
            id.short(),
            house_type.name(),
            civilians
        );

        slot.insert(record)
    }

    /// Remove a house and its residents; absent ids are ignored
    pub fn remove(
        &mut self,
        id: BuildingId,
        config: &EconomyConfig,
        metrics: &mut CityMetrics,
    ) -> Option<HouseRecord> {
        let record = self.houses.remove(&id)?;
        let civilians = record.civilians as u64;
        metrics.remove_population(civilians);
        metrics.remove_electricity_consumed(civilians * config.electricity_per_civilian);
        Some(record)
    }

    /// Age every house by one day and move in new residents
    pub fn age_one_day(&mut self, config: &EconomyConfig, metrics: &mut CityMetrics) {
        for record in self.houses.values_mut() {
            record.days_since_build = record.days_since_build.saturating_add(1);
            let target = record.target_civilians(config);
            if target > record.civilians {
                let diff = (target - record.civilians) as u64;
                record.civilians = target;
                metrics.add_population(diff);
                metrics.add_electricity_consumed(diff * config.electricity_per_civilian);
            }
        }
    }

    pub fn add_bonus(&mut self, id: BuildingId, kind: BonusKind, percent: u32) {
        if let Some(record) = self.houses.get_mut(&id) {
            let slot = match kind {
                BonusKind::Store => &mut record.store_bonus_percent,
                BonusKind::Factory => &mut record.factory_bonus_percent,
            };
            *slot = slot.saturating_add(percent);
        }
    }

    /// Withdraw a bonus, floored at zero
    pub fn remove_bonus(&mut self, id: BuildingId, kind: BonusKind, percent: u32) {
        if let Some(record) = self.houses.get_mut(&id) {
            let slot = match kind {
                BonusKind::Store => &mut record.store_bonus_percent,
                BonusKind::Factory => &mut record.factory_bonus_percent,
            };
            *slot = slot.saturating_sub(percent);
        }
    }

    pub fn get(&self, id: BuildingId) -> Option<&HouseRecord> {
        self.houses.get(&id)
    }

    pub fn contains(&self, id: BuildingId) -> bool {
        self.houses.contains_key(&id)
    }

    pub fn info(&self, id: BuildingId, config: &EconomyConfig) -> Option<HouseInfo> {
        self.houses.get(&id).map(|r| r.info(config))
    }

    pub fn ids(&self) -> Vec<BuildingId> {
        let mut ids: Vec<BuildingId> = self.houses.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BuildingId, &HouseRecord)> {
        self.houses.iter()
    }

    /// Sum of residents including store bonuses
    pub fn total_civilians(&self) -> u64 {
        self.houses
            .values()
            .map(|r| {
                let base = r.civilians as u64;
                base + base * r.store_bonus_percent as u64 / 100
            })
            .sum()
    }

    pub fn len(&self) -> usize {
        self.houses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.houses.is_empty()
    }

    pub fn clear(&mut self) {
        self.houses.clear();
    }
}
