//! City-wide aggregate counters
//!
//! Every remover floors at zero. The three deficit percentages are what
//! turns under-provisioned energy, entertainment and safety into lost income.

use serde::{Deserialize, Serialize};

use crate::core::types::Day;

/// Aggregate statistics of the whole city
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CityMetrics {
    electricity_produced: u64,
    electricity_consumed: u64,
    population: u64,
    happiness: u64,
    happiness_needed: u64,
    safety: u64,
    safety_needed: u64,
    day: Day,
}

/// Read-only copy handed to UI layers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub electricity_produced: u64,
    pub electricity_consumed: u64,
    pub population: u64,
    pub happiness: u64,
    pub happiness_needed: u64,
    pub safety: u64,
    pub safety_needed: u64,
    pub day: Day,
    pub electricity_deficit_percent: f64,
    pub happiness_deficit_percent: f64,
    pub safety_deficit_percent: f64,
}

/// Percentage of `demand` left unmet by `supply`
pub fn deficit_percent(supply: u64, demand: u64) -> f64 {
    if demand == 0 || supply >= demand {
        return 0.0;
    }
    (demand - supply) as f64 / demand as f64 * 100.0
}

impl CityMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // --- electricity produced ---
    pub fn electricity_produced(&self) -> u64 {
        self.electricity_produced
    }
    pub fn set_electricity_produced(&mut self, amount: u64) {
        self.electricity_produced = amount;
    }
    pub fn add_electricity_produced(&mut self, amount: u64) {
        self.electricity_produced = self.electricity_produced.saturating_add(amount);
    }
    pub fn remove_electricity_produced(&mut self, amount: u64) {
        self.electricity_produced = self.electricity_produced.saturating_sub(amount);
    }

    // --- electricity consumed ---
    pub fn electricity_consumed(&self) -> u64 {
        self.electricity_consumed
    }
    pub fn set_electricity_consumed(&mut self, amount: u64) {
        self.electricity_consumed = amount;
    }
    pub fn add_electricity_consumed(&mut self, amount: u64) {
        self.electricity_consumed = self.electricity_consumed.saturating_add(amount);
    }
    pub fn remove_electricity_consumed(&mut self, amount: u64) {
        self.electricity_consumed = self.electricity_consumed.saturating_sub(amount);
    }

    // --- population ---
    pub fn population(&self) -> u64 {
        self.population
    }
    pub fn set_population(&mut self, amount: u64) {
        self.population = amount;
    }
    pub fn add_population(&mut self, amount: u64) {
        self.population = self.population.saturating_add(amount);
    }
    pub fn remove_population(&mut self, amount: u64) {
        self.population = self.population.saturating_sub(amount);
    }

    // --- happiness ---
    pub fn happiness(&self) -> u64 {
        self.happiness
    }
    pub fn set_happiness(&mut self, amount: u64) {
        self.happiness = amount;
    }
    pub fn add_happiness(&mut self, amount: u64) {
        self.happiness = self.happiness.saturating_add(amount);
    }
    pub fn remove_happiness(&mut self, amount: u64) {
        self.happiness = self.happiness.saturating_sub(amount);
    }

    // --- happiness needed ---
    pub fn happiness_needed(&self) -> u64 {
        self.happiness_needed
    }
    pub fn set_happiness_needed(&mut self, amount: u64) {
        self.happiness_needed = amount;
    }
    pub fn add_happiness_needed(&mut self, amount: u64) {
        self.happiness_needed = self.happiness_needed.saturating_add(amount);
    }
    pub fn remove_happiness_needed(&mut self, amount: u64) {
        self.happiness_needed = self.happiness_needed.saturating_sub(amount);
    }

    // --- safety ---
    pub fn safety(&self) -> u64 {
        self.safety
    }
    pub fn set_safety(&mut self, amount: u64) {
        self.safety = amount;
    }
    pub fn add_safety(&mut self, amount: u64) {
        self.safety = self.safety.saturating_add(amount);
    }
    pub fn remove_safety(&mut self, amount: u64) {
        self.safety = self.safety.saturating_sub(amount);
    }

    // --- safety needed ---
    pub fn safety_needed(&self) -> u64 {
        self.safety_needed
    }
    pub fn set_safety_needed(&mut self, amount: u64) {
        self.safety_needed = amount;
    }
    pub fn add_safety_needed(&mut self, amount: u64) {
        self.safety_needed = self.safety_needed.saturating_add(amount);
    }
    pub fn remove_safety_needed(&mut self, amount: u64) {
        self.safety_needed = self.safety_needed.saturating_sub(amount);
    }

    // --- day ---
    pub fn day(&self) -> Day {
        self.day
    }
    pub fn set_day(&mut self, day: Day) {
        self.day = day;
    }

    pub fn electricity_deficit_percent(&self) -> f64 {
        deficit_percent(self.electricity_produced, self.electricity_consumed)
    }

    pub fn happiness_deficit_percent(&self) -> f64 {
        deficit_percent(self.happiness, self.happiness_needed)
    }

    pub fn safety_deficit_percent(&self) -> f64 {
        deficit_percent(self.safety, self.safety_needed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            electricity_produced: self.electricity_produced,
            electricity_consumed: self.electricity_consumed,
            population: self.population,
            happiness: self.happiness,
            happiness_needed: self.happiness_needed,
            safety: self.safety,
            safety_needed: self.safety_needed,
            day: self.day,
            electricity_deficit_percent: self.electricity_deficit_percent(),
            happiness_deficit_percent: self.happiness_deficit_percent(),
            safety_deficit_percent: self.safety_deficit_percent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removers_floor_at_zero() {
        let mut metrics = CityMetrics::new();
        metrics.add_population(5);
        metrics.remove_population(8);
        assert_eq!(metrics.population(), 0);

        metrics.add_happiness(100);
        metrics.remove_happiness(30);
        assert_eq!(metrics.happiness(), 70);
        metrics.remove_happiness(1000);
        assert_eq!(metrics.happiness(), 0);

        metrics.remove_electricity_consumed(1);
        metrics.remove_safety_needed(1);
        assert_eq!(metrics.electricity_consumed(), 0);
        assert_eq!(metrics.safety_needed(), 0);
    }

    #[test]
    fn test_deficit_percent() {
        assert_eq!(deficit_percent(0, 0), 0.0);
        assert_eq!(deficit_percent(100, 0), 0.0);
        assert_eq!(deficit_percent(100, 100), 0.0);
        assert_eq!(deficit_percent(150, 100), 0.0);
        assert!((deficit_percent(60, 100) - 40.0).abs() < 1e-9);
        assert!((deficit_percent(0, 100) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_electricity_deficit() {
        let mut metrics = CityMetrics::new();
        metrics.add_electricity_consumed(100);
        metrics.add_electricity_produced(60);
        assert!((metrics.electricity_deficit_percent() - 40.0).abs() < 1e-9);

        metrics.add_electricity_produced(40);
        assert_eq!(metrics.electricity_deficit_percent(), 0.0);
    }

    #[test]
    fn test_happiness_and_safety_deficits() {
        let mut metrics = CityMetrics::new();
        metrics.set_happiness_needed(200);
        metrics.set_happiness(50);
        metrics.set_safety_needed(100);
        metrics.set_safety(25);

        assert!((metrics.happiness_deficit_percent() - 75.0).abs() < 1e-9);
        assert!((metrics.safety_deficit_percent() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_and_reset() {
        let mut metrics = CityMetrics::new();
        metrics.add_population(12);
        metrics.set_day(4);
        metrics.add_electricity_consumed(10);

        let snap = metrics.snapshot();
        assert_eq!(snap.population, 12);
        assert_eq!(snap.day, 4);
        assert!((snap.electricity_deficit_percent - 100.0).abs() < 1e-9);

        metrics.reset();
        assert_eq!(metrics, CityMetrics::default());
    }
}
