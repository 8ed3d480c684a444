//! Energy ledger - power plants and city-wide production

use std::collections::hash_map::Entry;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::city::building::{BuildingKind, EnergyType};
use crate::city::metrics::CityMetrics;
use crate::core::config::EconomyConfig;
use crate::core::types::BuildingId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyRecord {
    pub energy_type: EnergyType,
    /// Electricity added to the city while the plant stands
    pub production: u64,
}

#[derive(Debug, Clone, Default)]
pub struct EnergyLedger {
    plants: AHashMap<BuildingId, EnergyRecord>,
}

impl EnergyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initialize(
        &mut self,
        id: BuildingId,
        energy_type: EnergyType,
        config: &EconomyConfig,
        metrics: &mut CityMetrics,
    ) -> &EnergyRecord {
        match self.plants.entry(id) {
            Entry::Occupied(existing) => {
                tracing::warn!("Power plant {} is already registered", id.short());
                existing.into_mut()
            }
            Entry::Vacant(slot) => {
                let production = config.energy_production(BuildingKind::Energy(energy_type));
                metrics.add_electricity_produced(production);
                slot.insert(EnergyRecord {
                    energy_type,
                    production,
                })
            }
        }
    }

    pub fn remove(&mut self, id: BuildingId, metrics: &mut CityMetrics) -> Option<EnergyRecord> {
        let record = self.plants.remove(&id)?;
        metrics.remove_electricity_produced(record.production);
        Some(record)
    }

    pub fn info(&self, id: BuildingId) -> Option<EnergyRecord> {
        self.plants.get(&id).copied()
    }

    pub fn contains(&self, id: BuildingId) -> bool {
        self.plants.contains_key(&id)
    }

    pub fn ids(&self) -> Vec<BuildingId> {
        let mut ids: Vec<BuildingId> = self.plants.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn total_production(&self) -> u64 {
        self.plants.values().map(|r| r.production).sum()
    }

    pub fn len(&self) -> usize {
        self.plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }

    pub fn clear(&mut self) {
        self.plants.clear();
    }
}
