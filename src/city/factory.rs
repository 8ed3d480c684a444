//! Factories - raise the income of nearby houses

use crate::city::building::{BuildingKind, FactoryType};
use crate::city::coverage::{CoverageKind, CoverageLedger};
use crate::city::housing::BonusKind;

impl CoverageKind for FactoryType {
    const BONUS: BonusKind = BonusKind::Factory;

    fn building_kind(self) -> BuildingKind {
        BuildingKind::Factory(self)
    }
}

pub type FactoryLedger = CoverageLedger<FactoryType>;
