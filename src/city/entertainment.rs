//! Entertainment ledger - parks and stadiums supplying happiness

use std::collections::hash_map::Entry;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::city::building::{BuildingKind, EntertainmentType};
use crate::city::metrics::CityMetrics;
use crate::core::config::EconomyConfig;
use crate::core::types::BuildingId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntertainmentRecord {
    pub entertainment_type: EntertainmentType,
    pub happiness: u64,
}

#[derive(Debug, Clone, Default)]
pub struct EntertainmentLedger {
    venues: AHashMap<BuildingId, EntertainmentRecord>,
}

impl EntertainmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initialize(
        &mut self,
        id: BuildingId,
        entertainment_type: EntertainmentType,
        config: &EconomyConfig,
        metrics: &mut CityMetrics,
    ) -> &EntertainmentRecord {
        match self.venues.entry(id) {
            Entry::Occupied(existing) => {
                tracing::warn!("Venue {} is already registered", id.short());
                existing.into_mut()
            }
            Entry::Vacant(slot) => {
                let kind = BuildingKind::Entertainment(entertainment_type);
                let happiness = config.entertainment_happiness(kind);
                metrics.add_happiness(happiness);
                slot.insert(EntertainmentRecord {
                    entertainment_type,
                    happiness,
                })
            }
        }
    }

    pub fn remove(
        &mut self,
        id: BuildingId,
        metrics: &mut CityMetrics,
    ) -> Option<EntertainmentRecord> {
        let record = self.venues.remove(&id)?;
        metrics.remove_happiness(record.happiness);
        Some(record)
    }

    pub fn info(&self, id: BuildingId) -> Option<EntertainmentRecord> {
        self.venues.get(&id).copied()
    }

    pub fn contains(&self, id: BuildingId) -> bool {
        self.venues.contains_key(&id)
    }

    pub fn ids(&self) -> Vec<BuildingId> {
        let mut ids: Vec<BuildingId> = self.venues.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    pub fn clear(&mut self) {
        self.venues.clear();
    }
}
