//! City layer - buildings, treasury, metrics and the category ledgers

pub mod building;
pub mod commerce;
pub mod coverage;
pub mod energy;
pub mod entertainment;
pub mod facilities;
pub mod factory;
pub mod housing;
pub mod metrics;
pub mod treasury;

pub use building::{
    BuildingKind, Category, EnergyType, EntertainmentType, FacilityType, FactoryType, HouseType,
    StoreType,
};
pub use commerce::StoreLedger;
pub use coverage::{CoverageInfo, CoverageLedger, CoverageRecord};
pub use energy::{EnergyLedger, EnergyRecord};
pub use entertainment::{EntertainmentLedger, EntertainmentRecord};
pub use facilities::{Deposit, DepositView, FacilitiesLedger, FacilityRecord};
pub use factory::FactoryLedger;
pub use housing::{BonusKind, HouseInfo, HouseRecord, HousingLedger};
pub use metrics::{deficit_percent, CityMetrics, MetricsSnapshot};
pub use treasury::{Balance, Treasury};
