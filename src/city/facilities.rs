//! Civic facilities - safety coverage and bank deposits
//!
//! Every non-bank facility adds a flat amount of safety. Banks take
//! deposits that mature in wall-clock time; a deposit keeps running even
//! after its bank has been demolished.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::city::building::FacilityType;
use crate::city::metrics::CityMetrics;
use crate::core::config::EconomyConfig;
use crate::core::error::{CityError, Result};
use crate::core::types::{BuildingId, Money};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub facility_type: FacilityType,
}

/// A running bank deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub principal: Money,
    pub maturity_value: Money,
    pub opened_at_ms: u64,
    pub matures_at_ms: u64,
}

/// Deposit as shown in the bank panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositView {
    pub bank: BuildingId,
    pub principal: Money,
    pub maturity_value: Money,
    pub days_remaining: u64,
}

impl Deposit {
    /// Whole deposit days left, counting down from the full term
    pub fn days_remaining(&self, now_ms: u64, config: &EconomyConfig) -> u64 {
        let elapsed_days = now_ms.saturating_sub(self.opened_at_ms) / config.deposit_day_ms;
        config.deposit_term_days.saturating_sub(elapsed_days)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FacilitiesLedger {
    facilities: AHashMap<BuildingId, FacilityRecord>,
    deposits: AHashMap<BuildingId, Deposit>,
}

impl FacilitiesLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initialize(
        &mut self,
        id: BuildingId,
        facility_type: FacilityType,
        config: &EconomyConfig,
        metrics: &mut CityMetrics,
    ) -> &FacilityRecord {
        if self.facilities.contains_key(&id) {
            tracing::warn!("Facility {} is already registered", id.short());
        } else {
            self.facilities.insert(id, FacilityRecord { facility_type });
            if facility_type.provides_safety() {
                self.refresh_safety(config, metrics);
            }
        }
        &self.facilities[&id]
    }

    /// Remove a facility; any running deposit of a bank is kept
    pub fn remove(
        &mut self,
        id: BuildingId,
        config: &EconomyConfig,
        metrics: &mut CityMetrics,
    ) -> Option<FacilityRecord> {
        let record = self.facilities.remove(&id)?;
        if record.facility_type.provides_safety() {
            self.refresh_safety(config, metrics);
        }
        Some(record)
    }

    /// Number of facilities counting toward safety
    pub fn safety_facility_count(&self) -> usize {
        self.facilities
            .values()
            .filter(|r| r.facility_type.provides_safety())
            .count()
    }

    fn refresh_safety(&self, config: &EconomyConfig, metrics: &mut CityMetrics) {
        let safety = self.safety_facility_count() as u64 * config.safety_per_facility;
        metrics.set_safety(safety);
    }

    /// Check that `bank` can accept a deposit of `principal`; returns the
    /// value it will mature to
    pub fn validate_deposit(
        &self,
        bank: BuildingId,
        principal: Money,
        config: &EconomyConfig,
    ) -> Result<Money> {
        match self.facilities.get(&bank) {
            None => return Err(CityError::UnknownBuilding(bank)),
            Some(record) if record.facility_type != FacilityType::Bank => {
                return Err(CityError::NotABank(bank))
            }
            Some(_) => {}
        }
        if principal == 0 {
            return Err(CityError::InvalidDeposit(principal));
        }
        if self.deposits.contains_key(&bank) {
            return Err(CityError::DepositActive(bank));
        }
        config
            .deposit_maturity(principal)
            .ok_or(CityError::InvalidDeposit(principal))
    }

    /// Record a paid deposit; the caller has already taken the money
    pub fn start_deposit(
        &mut self,
        bank: BuildingId,
        principal: Money,
        maturity_value: Money,
        now_ms: u64,
        config: &EconomyConfig,
    ) -> Deposit {
        let deposit = Deposit {
            principal,
            maturity_value,
            opened_at_ms: now_ms,
            matures_at_ms: now_ms.saturating_add(config.deposit_term_ms()),
        };
        self.deposits.insert(bank, deposit);
        deposit
    }

    /// Clear a matured deposit and hand it back for payout
    pub fn complete_deposit(&mut self, bank: BuildingId) -> Option<Deposit> {
        self.deposits.remove(&bank)
    }

    pub fn deposit(
        &self,
        bank: BuildingId,
        now_ms: u64,
        config: &EconomyConfig,
    ) -> Option<DepositView> {
        self.deposits.get(&bank).map(|d| DepositView {
            bank,
            principal: d.principal,
            maturity_value: d.maturity_value,
            days_remaining: d.days_remaining(now_ms, config),
        })
    }

    pub fn deposit_count(&self) -> usize {
        self.deposits.len()
    }

    pub fn info(&self, id: BuildingId) -> Option<FacilityRecord> {
        self.facilities.get(&id).copied()
    }

    pub fn contains(&self, id: BuildingId) -> bool {
        self.facilities.contains_key(&id)
    }

    pub fn ids(&self) -> Vec<BuildingId> {
        let mut ids: Vec<BuildingId> = self.facilities.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    /// Drop all facilities and deposits
    pub fn clear(&mut self) {
        self.facilities.clear();
        self.deposits.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: u64 = 86_400_000;

    #[test]
    fn test_safety_tracks_non_bank_count() {
        let mut ledger = FacilitiesLedger::new();
        let config = EconomyConfig::default();
        let mut metrics = CityMetrics::new();

        let police = BuildingId::new();
        let school = BuildingId::new();
        let bank = BuildingId::new();
        ledger.initialize(police, FacilityType::PoliceStation, &config, &mut metrics);
        ledger.initialize(school, FacilityType::School, &config, &mut metrics);
        ledger.initialize(bank, FacilityType::Bank, &config, &mut metrics);
        assert_eq!(metrics.safety(), 50);
        assert_eq!(ledger.safety_facility_count(), 2);

        ledger.remove(police, &config, &mut metrics);
        assert_eq!(metrics.safety(), 25);

        ledger.remove(bank, &config, &mut metrics);
        assert_eq!(metrics.safety(), 25);
        assert_eq!(ledger.ids(), vec![school]);
    }

    #[test]
    fn test_duplicate_initialize_is_ignored() {
        let mut ledger = FacilitiesLedger::new();
        let config = EconomyConfig::default();
        let mut metrics = CityMetrics::new();

        let id = BuildingId::new();
        ledger.initialize(id, FacilityType::PoliceStation, &config, &mut metrics);
        let record = ledger.initialize(id, FacilityType::Bank, &config, &mut metrics);
        assert_eq!(record.facility_type, FacilityType::PoliceStation);
        assert_eq!(metrics.safety(), 25);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_deposit_validation() {
        let mut ledger = FacilitiesLedger::new();
        let config = EconomyConfig::default();
        let mut metrics = CityMetrics::new();

        let bank = BuildingId::new();
        let hospital = BuildingId::new();
        ledger.initialize(bank, FacilityType::Bank, &config, &mut metrics);
        ledger.initialize(hospital, FacilityType::Hospital, &config, &mut metrics);

        assert!(matches!(
            ledger.validate_deposit(BuildingId::new(), 100, &config),
            Err(CityError::UnknownBuilding(_))
        ));
        assert!(matches!(
            ledger.validate_deposit(hospital, 100, &config),
            Err(CityError::NotABank(_))
        ));
        assert!(matches!(
            ledger.validate_deposit(bank, 0, &config),
            Err(CityError::InvalidDeposit(0))
        ));
        assert!(matches!(
            ledger.validate_deposit(bank, u64::MAX, &config),
            Err(CityError::InvalidDeposit(u64::MAX))
        ));
        assert_eq!(ledger.validate_deposit(bank, 100, &config).unwrap(), 130);

        ledger.start_deposit(bank, 100, 130, 0, &config);
        assert!(matches!(
            ledger.validate_deposit(bank, 100, &config),
            Err(CityError::DepositActive(_))
        ));
    }

    #[test]
    fn test_deposit_countdown() {
        let mut ledger = FacilitiesLedger::new();
        let config = EconomyConfig::default();
        let mut metrics = CityMetrics::new();
        let bank = BuildingId::new();
        ledger.initialize(bank, FacilityType::Bank, &config, &mut metrics);

        let deposit = ledger.start_deposit(bank, 100, 130, 1_000, &config);
        assert_eq!(deposit.maturity_value, 130);
        assert_eq!(deposit.matures_at_ms, 1_000 + 30 * DAY);

        assert_eq!(ledger.deposit(bank, 1_000, &config).unwrap().days_remaining, 30);
        assert_eq!(ledger.deposit(bank, 1_000 + DAY - 1, &config).unwrap().days_remaining, 30);
        assert_eq!(ledger.deposit(bank, 1_000 + 10 * DAY, &config).unwrap().days_remaining, 20);
        assert_eq!(ledger.deposit(bank, 1_000 + 40 * DAY, &config).unwrap().days_remaining, 0);
    }

    #[test]
    fn test_deposit_survives_bank_removal() {
        let mut ledger = FacilitiesLedger::new();
        let config = EconomyConfig::default();
        let mut metrics = CityMetrics::new();
        let bank = BuildingId::new();
        ledger.initialize(bank, FacilityType::Bank, &config, &mut metrics);
        ledger.start_deposit(bank, 500, 650, 0, &config);

        ledger.remove(bank, &config, &mut metrics);
        assert!(!ledger.contains(bank));
        assert_eq!(ledger.deposit_count(), 1);

        let paid = ledger.complete_deposit(bank).unwrap();
        assert_eq!(paid.maturity_value, 650);
        assert!(ledger.deposit(bank, 0, &config).is_none());
    }
}
