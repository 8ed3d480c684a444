//! Placement gateway - the host's entry point for building and demolishing
//!
//! A build is checked in a fixed order: tile legality, price, payment.
//! Nothing changes unless all three pass.

use serde::{Deserialize, Serialize};

use crate::city::building::BuildingKind;
use crate::core::error::{CityError, Result};
use crate::core::types::{BuildingId, Money, Rotation, TileCoord};
use crate::simulation::events::CityEvent;
use crate::simulation::requirements::refresh_requirements;
use crate::spatial::footprint::footprint;
use crate::world::World;

/// Tiles a building will occupy, plus the tile its coverage is measured from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub tiles: Vec<TileCoord>,
    /// Defaults to the first tile
    #[serde(default)]
    pub center: Option<TileCoord>,
}

impl Placement {
    pub fn new(tiles: Vec<TileCoord>) -> Self {
        Self { tiles, center: None }
    }

    pub fn with_center(mut self, center: TileCoord) -> Self {
        self.center = Some(center);
        self
    }

    pub fn center(&self) -> Option<TileCoord> {
        self.center.or_else(|| self.tiles.first().copied())
    }
}

impl World {
    /// Construction price of a kind
    pub fn price(&self, kind: BuildingKind) -> Money {
        self.config.price(kind)
    }

    /// Whether the treasury could pay for `kind` right now
    pub fn can_build(&self, kind: BuildingKind) -> bool {
        self.treasury.can_afford(self.price(kind))
    }

    /// Build on the footprint anchored at `anchor`
    pub fn try_build_at(
        &mut self,
        kind: BuildingKind,
        anchor: TileCoord,
        rotation: Rotation,
    ) -> Result<BuildingId> {
        let tiles = footprint(&self.grid, kind, anchor, rotation);
        self.try_build(kind, &Placement::new(tiles).with_center(anchor))
    }

    /// Approve and construct a building
    pub fn try_build(&mut self, kind: BuildingKind, placement: &Placement) -> Result<BuildingId> {
        if let Err(err) = self.grid.check_placement(&placement.tiles) {
            return Err(self.reject(kind, err));
        }

        let price = self.price(kind);
        if !self.treasury.try_spend(price) {
            let err = CityError::InsufficientFunds {
                price,
                balance: self.treasury.raw_balance(),
            };
            return Err(self.reject(kind, err));
        }

        let id = BuildingId::new();
        self.grid.occupy(&placement.tiles, id);
        self.registry.insert(id, kind);
        let center = placement.center().unwrap_or_default();

        match kind {
            BuildingKind::House(house_type) => {
                self.housing.initialize(
                    id,
                    house_type,
                    placement.tiles.iter().copied(),
                    &self.config,
                    &mut self.metrics,
                );
                self.stores.apply_to_house(id, &self.grid, &mut self.housing);
                self.factories.apply_to_house(id, &self.grid, &mut self.housing);
            }
            BuildingKind::Energy(energy_type) => {
                self.energy.initialize(id, energy_type, &self.config, &mut self.metrics);
            }
            BuildingKind::Entertainment(entertainment_type) => {
                self.entertainment
                    .initialize(id, entertainment_type, &self.config, &mut self.metrics);
            }
            BuildingKind::Store(store_type) => {
                self.stores.initialize(
                    id,
                    store_type,
                    center,
                    &self.config,
                    &self.grid,
                    &mut self.housing,
                );
            }
            BuildingKind::Factory(factory_type) => {
                self.factories.initialize(
                    id,
                    factory_type,
                    center,
                    &self.config,
                    &self.grid,
                    &mut self.housing,
                );
            }
            BuildingKind::Facilities(facility_type) => {
                self.facilities.initialize(id, facility_type, &self.config, &mut self.metrics);
            }
        }
        refresh_requirements(&self.config, &mut self.metrics, &self.housing);

        tracing::debug!("Built {} {} for {} at {}", kind, id.short(), price, center);
        self.emit(CityEvent::BuildingPlaced { id, kind, price });
        Ok(id)
    }

    fn reject(&mut self, kind: BuildingKind, err: CityError) -> CityError {
        tracing::debug!("Rejected {}: {}", kind, err);
        self.emit(CityEvent::BuildRejected {
            kind,
            reason: err.to_string(),
        });
        err
    }

    /// Demolish a building without refund; unknown ids are ignored
    pub fn remove(&mut self, id: BuildingId) -> Option<BuildingKind> {
        let kind = self.registry.remove(&id)?;
        self.grid.release(id);

        match kind {
            BuildingKind::House(_) => {
                self.housing.remove(id, &self.config, &mut self.metrics);
            }
            BuildingKind::Energy(_) => {
                self.energy.remove(id, &mut self.metrics);
            }
            BuildingKind::Entertainment(_) => {
                self.entertainment.remove(id, &mut self.metrics);
            }
            BuildingKind::Store(_) => {
                self.stores.remove(id, &self.grid, &mut self.housing);
            }
            BuildingKind::Factory(_) => {
                self.factories.remove(id, &self.grid, &mut self.housing);
            }
            BuildingKind::Facilities(_) => {
                self.facilities.remove(id, &self.config, &mut self.metrics);
            }
        }
        refresh_requirements(&self.config, &mut self.metrics, &self.housing);

        tracing::debug!("Removed {} {}", kind, id.short());
        self.emit(CityEvent::BuildingRemoved { id, kind });
        Some(kind)
    }

    /// Lay a road tile; roads are free
    pub fn place_road(&mut self, tile: TileCoord) -> Result<bool> {
        self.grid.place_road(tile)
    }

    pub fn remove_road(&mut self, tile: TileCoord) -> bool {
        self.grid.remove_road(tile)
    }
}
