//! Coverage engine - disk queries and bonus propagation
//!
//! Stores and factories cover every tile within a Chebyshev radius of their
//! center. Each house touching the covered area receives the provider's bonus,
//! and loses it again when the provider is removed.

use std::collections::hash_map::Entry;
use std::fmt::Debug;

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::city::building::BuildingKind;
use crate::city::housing::{BonusKind, HousingLedger};
use crate::core::config::EconomyConfig;
use crate::core::types::{BuildingId, TileCoord};
use crate::spatial::grid::TileMap;

/// Tiles within `radius` of `center`, restricted to existing non-road tiles
pub fn query<M: TileMap + ?Sized>(map: &M, center: TileCoord, radius: u32) -> AHashSet<TileCoord> {
    let r = radius as i32;
    let mut tiles = AHashSet::new();
    for dz in -r..=r {
        for dx in -r..=r {
            let tile = center.offset(dx, dz);
            if map.contains(tile) && !map.is_road(tile) {
                tiles.insert(tile);
            }
        }
    }
    tiles
}

/// Houses with at least one tile inside `tiles`
pub fn houses_covered(housing: &HousingLedger, tiles: &AHashSet<TileCoord>) -> Vec<BuildingId> {
    let mut ids: Vec<BuildingId> = housing
        .iter()
        .filter(|(_, record)| record.intersects(tiles))
        .map(|(id, _)| *id)
        .collect();
    ids.sort();
    ids
}

/// Subtype of a coverage provider
pub trait CoverageKind: Copy + Debug + PartialEq {
    /// Which house bonus the provider feeds
    const BONUS: BonusKind;

    fn building_kind(self) -> BuildingKind;

    fn name(self) -> &'static str {
        self.building_kind().type_name()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageRecord<T> {
    pub subtype: T,
    pub radius: u32,
    pub center: TileCoord,
    pub bonus_percent: u32,
}

/// Info panel view of a store or factory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageInfo {
    pub subtype: String,
    pub radius: u32,
    pub bonus_percent: u32,
    pub covered_houses: usize,
}

/// Ledger for buildings that grant bonuses to nearby houses
#[derive(Debug, Clone)]
pub struct CoverageLedger<T: CoverageKind> {
    records: AHashMap<BuildingId, CoverageRecord<T>>,
}

impl<T: CoverageKind> Default for CoverageLedger<T> {
    fn default() -> Self {
        Self {
            records: AHashMap::new(),
        }
    }
}

impl<T: CoverageKind> CoverageLedger<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider and grant its bonus to every house it covers
    pub fn initialize<M: TileMap + ?Sized>(
        &mut self,
        id: BuildingId,
        subtype: T,
        center: TileCoord,
        config: &EconomyConfig,
        map: &M,
        housing: &mut HousingLedger,
    ) -> &CoverageRecord<T> {
        let slot = match self.records.entry(id) {
            Entry::Occupied(existing) => {
                tracing::warn!("{} {} is already registered", subtype.name(), id.short());
                return existing.into_mut();
            }
            Entry::Vacant(slot) => slot,
        };

        let record = CoverageRecord {
            subtype,
            radius: config.coverage_radius(subtype.building_kind()),
            center,
            bonus_percent: T::BONUS.percent(config),
        };

        let covered = houses_covered(housing, &query(map, center, record.radius));
        for house in &covered {
            housing.add_bonus(*house, T::BONUS, record.bonus_percent);
        }
        tracing::debug!(
            "{} {} covers {} houses (radius {})",
            subtype.name(),
            id.short(),
            covered.len(),
            record.radius
        );

        slot.insert(record)
    }

    /// Remove a provider and withdraw its bonus from the houses it covers now
    pub fn remove<M: TileMap + ?Sized>(
        &mut self,
        id: BuildingId,
        map: &M,
        housing: &mut HousingLedger,
    ) -> Option<CoverageRecord<T>> {
        let record = self.records.remove(&id)?;
        for house in houses_covered(housing, &query(map, record.center, record.radius)) {
            housing.remove_bonus(house, T::BONUS, record.bonus_percent);
        }
        Some(record)
    }

    /// Grant a newly built house the bonus of every provider covering it
    pub fn apply_to_house<M: TileMap + ?Sized>(
        &self,
        house: BuildingId,
        map: &M,
        housing: &mut HousingLedger,
    ) {
        let Some(record) = housing.get(house) else {
            return;
        };
        let total: u32 = self
            .records
            .values()
            .filter(|r| record.intersects(&query(map, r.center, r.radius)))
            .map(|r| r.bonus_percent)
            .sum();
        if total > 0 {
            housing.add_bonus(house, T::BONUS, total);
        }
    }

    pub fn get(&self, id: BuildingId) -> Option<&CoverageRecord<T>> {
        self.records.get(&id)
    }

    pub fn info<M: TileMap + ?Sized>(
        &self,
        id: BuildingId,
        map: &M,
        housing: &HousingLedger,
    ) -> Option<CoverageInfo> {
        let record = self.records.get(&id)?;
        let covered = houses_covered(housing, &query(map, record.center, record.radius));
        Some(CoverageInfo {
            subtype: record.subtype.name().to_string(),
            radius: record.radius,
            bonus_percent: record.bonus_percent,
            covered_houses: covered.len(),
        })
    }

    pub fn contains(&self, id: BuildingId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn ids(&self) -> Vec<BuildingId> {
        let mut ids: Vec<BuildingId> = self.records.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
