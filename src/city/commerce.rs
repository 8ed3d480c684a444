//! Commerce - stores raise the resident count of nearby houses

use crate::city::building::{BuildingKind, StoreType};
use crate::city::coverage::{CoverageKind, CoverageLedger};
use crate::city::housing::BonusKind;

impl CoverageKind for StoreType {
    const BONUS: BonusKind = BonusKind::Store;

    fn building_kind(self) -> BuildingKind {
        BuildingKind::Store(self)
    }
}

pub type StoreLedger = CoverageLedger<StoreType>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::building::HouseType;
    use crate::city::housing::HousingLedger;
    use crate::city::metrics::CityMetrics;
    use crate::core::config::EconomyConfig;
    use crate::core::types::{BuildingId, TileCoord};
    use crate::spatial::grid::TileGrid;

    struct Fixture {
        grid: TileGrid,
        config: EconomyConfig,
        metrics: CityMetrics,
        housing: HousingLedger,
        stores: StoreLedger,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                grid: TileGrid::new(25),
                config: EconomyConfig::default(),
                metrics: CityMetrics::new(),
                housing: HousingLedger::new(),
                stores: StoreLedger::new(),
            }
        }

        fn house(&mut self, house_type: HouseType, tiles: &[TileCoord]) -> BuildingId {
            let id = BuildingId::new();
            self.housing.initialize(
                id,
                house_type,
                tiles.iter().copied(),
                &self.config,
                &mut self.metrics,
            );
            id
        }

        fn store(&mut self, id: BuildingId, store_type: StoreType, center: TileCoord) {
            self.stores
                .initialize(id, store_type, center, &self.config, &self.grid, &mut self.housing);
        }

        fn store_bonus(&self, house: BuildingId) -> u32 {
            self.housing.get(house).map_or(0, |h| h.store_bonus_percent)
        }
    }

    #[test]
    fn test_store_bonus_stacks_and_unstacks() {
        let mut f = Fixture::new();
        let house = f.house(HouseType::American, &[TileCoord::new(5, 5)]);

        let a = BuildingId::new();
        let b = BuildingId::new();
        f.store(a, StoreType::ConvenienceStore, TileCoord::new(7, 5));
        f.store(b, StoreType::Bakery, TileCoord::new(6, 6));
        assert_eq!(f.store_bonus(house), 40);

        f.stores.remove(a, &f.grid, &mut f.housing);
        assert_eq!(f.store_bonus(house), 20);
        assert_eq!(f.stores.ids(), vec![b]);
    }

    #[test]
    fn test_bakery_radius_is_one() {
        let mut f = Fixture::new();
        let near = f.house(HouseType::American, &[TileCoord::new(4, 4)]);
        let far = f.house(HouseType::American, &[TileCoord::new(5, 7)]);

        let bakery = BuildingId::new();
        f.store(bakery, StoreType::Bakery, TileCoord::new(5, 5));

        assert_eq!(f.store_bonus(near), 20);
        assert_eq!(f.store_bonus(far), 0);

        let info = f.stores.info(bakery, &f.grid, &f.housing).unwrap();
        assert_eq!(info.subtype, "bakery");
        assert_eq!(info.radius, 1);
        assert_eq!(info.bonus_percent, 20);
        assert_eq!(info.covered_houses, 1);
    }

    #[test]
    fn test_late_house_picks_up_existing_coverage() {
        let mut f = Fixture::new();
        let store = BuildingId::new();
        f.store(store, StoreType::ConvenienceStore, TileCoord::new(10, 10));

        let house = f.house(HouseType::TwoStory, &[TileCoord::new(12, 12)]);
        f.stores.apply_to_house(house, &f.grid, &mut f.housing);
        assert_eq!(f.store_bonus(house), 20);

        f.stores.remove(store, &f.grid, &mut f.housing);
        assert_eq!(f.store_bonus(house), 0);
    }

    #[test]
    fn test_multi_tile_house_counted_once() {
        let mut f = Fixture::new();
        let tiles = [TileCoord::new(3, 3), TileCoord::new(4, 3), TileCoord::new(5, 3)];
        let house = f.house(HouseType::Modern, &tiles);

        f.store(BuildingId::new(), StoreType::ConvenienceStore, TileCoord::new(4, 4));
        assert_eq!(f.store_bonus(house), 20);
    }

    #[test]
    fn test_duplicate_store_does_not_stack() {
        let mut f = Fixture::new();
        let house = f.house(HouseType::American, &[TileCoord::new(5, 5)]);

        let store = BuildingId::new();
        f.store(store, StoreType::Bakery, TileCoord::new(5, 6));
        f.store(store, StoreType::ConvenienceStore, TileCoord::new(5, 6));
        assert_eq!(f.store_bonus(house), 20);
        assert_eq!(f.stores.get(store).unwrap().subtype, StoreType::Bakery);

        f.stores.remove(store, &f.grid, &mut f.housing);
        assert_eq!(f.store_bonus(house), 0);
    }
}
