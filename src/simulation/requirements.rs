//! Happiness and safety demand, gated by the grace period

use crate::city::housing::HousingLedger;
use crate::city::metrics::CityMetrics;
use crate::core::config::EconomyConfig;
use crate::core::types::Day;

/// Whether the requirements are still waived on `day`
pub fn in_grace_period(config: &EconomyConfig, day: Day) -> bool {
    day < config.grace_period_days
}

/// Safety demanded by a population: one unit per started block of residents
pub fn safety_needed(config: &EconomyConfig, population: u64) -> u64 {
    population.div_ceil(config.residents_per_safety_unit) * config.safety_per_unit
}

/// Recompute `happiness_needed` and `safety_needed` from the current city
pub fn refresh_requirements(
    config: &EconomyConfig,
    metrics: &mut CityMetrics,
    housing: &HousingLedger,
) {
    if in_grace_period(config, metrics.day()) {
        metrics.set_happiness_needed(0);
        metrics.set_safety_needed(0);
        return;
    }

    metrics.set_happiness_needed(housing.total_civilians() * config.happiness_per_civilian);
    metrics.set_safety_needed(safety_needed(config, metrics.population()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::building::HouseType;
    use crate::core::types::{BuildingId, TileCoord};

    #[test]
    fn test_safety_needed_rounds_up() {
        let config = EconomyConfig::default();
        assert_eq!(safety_needed(&config, 0), 0);
        assert_eq!(safety_needed(&config, 1), 100);
        assert_eq!(safety_needed(&config, 500), 100);
        assert_eq!(safety_needed(&config, 501), 200);
    }

    #[test]
    fn test_grace_period_zeroes_requirements() {
        let config = EconomyConfig::default();
        let mut metrics = CityMetrics::new();
        let mut housing = HousingLedger::new();
        let tiles = [TileCoord::new(0, 0)];
        housing.initialize(BuildingId::new(), HouseType::American, tiles, &config, &mut metrics);
        metrics.set_happiness_needed(999);

        metrics.set_day(29);
        refresh_requirements(&config, &mut metrics, &housing);
        assert_eq!(metrics.happiness_needed(), 0);
        assert_eq!(metrics.safety_needed(), 0);

        metrics.set_day(30);
        refresh_requirements(&config, &mut metrics, &housing);
        assert_eq!(metrics.happiness_needed(), 20);
        assert_eq!(metrics.safety_needed(), 100);
    }
}
