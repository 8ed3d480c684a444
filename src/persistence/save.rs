//! Flat JSON save files
//!
//! A save holds the treasury balance and the aggregate city counters only;
//! individual buildings are not persisted. Loading accepts the older
//! `safeness`/`safenessNeeded` keys and fills missing fields with defaults.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::error::{CityError, Result};
use crate::core::types::{Day, Money};
use crate::world::World;

pub const SAVE_VERSION: &str = "1.0";

const DEFAULT_MONEY: Money = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveGame {
    #[serde(default = "default_money", deserialize_with = "lenient_money")]
    pub money: Money,
    #[serde(default, deserialize_with = "lenient")]
    pub electricity_production: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub electricity_consumption: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub population: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub happiness: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub happiness_needed: u64,
    #[serde(default, alias = "safeness", deserialize_with = "lenient")]
    pub safety: u64,
    #[serde(default, alias = "safenessNeeded", deserialize_with = "lenient")]
    pub safety_needed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<Day>,
    #[serde(default, deserialize_with = "lenient")]
    pub timestamp: u64,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_money() -> Money {
    DEFAULT_MONEY
}

fn default_version() -> String {
    SAVE_VERSION.to_string()
}

/// Accept integers, fractional numbers (rounded, floored at zero) and null
fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(value.map(|n| match n.as_u64() {
        Some(v) => v,
        None => n.as_f64().map(|f| f.max(0.0).round() as u64).unwrap_or(0),
    }))
}

fn lenient<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?.unwrap_or(0))
}

fn lenient_money<'de, D>(deserializer: D) -> std::result::Result<Money, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?.unwrap_or(DEFAULT_MONEY))
}

impl SaveGame {
    /// Capture the current city
    pub fn capture(world: &World) -> Self {
        let metrics = world.metrics();
        Self {
            money: world.treasury().raw_balance(),
            electricity_production: metrics.electricity_produced(),
            electricity_consumption: metrics.electricity_consumed(),
            population: metrics.population(),
            happiness: metrics.happiness(),
            happiness_needed: metrics.happiness_needed(),
            safety: metrics.safety(),
            safety_needed: metrics.safety_needed(),
            day: Some(metrics.day()),
            timestamp: world.now_ms(),
            version: SAVE_VERSION.to_string(),
        }
    }

    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CityError::InvalidSave(e.to_string()))
    }
}

impl World {
    /// Serialize the city; refused in creative mode
    pub fn save_json(&self) -> Result<String> {
        if self.treasury.is_creative() {
            tracing::warn!("Save refused: creative mode");
            return Err(CityError::CreativeModeSave);
        }
        let save = SaveGame::capture(self);
        Ok(serde_json::to_string_pretty(&save)?)
    }

    /// Restore balance and counters from a save
    ///
    /// The world is left untouched when the JSON cannot be parsed.
    pub fn load_json(&mut self, json: &str) -> Result<SaveGame> {
        let save = SaveGame::parse(json)?;
        if save.version != SAVE_VERSION {
            tracing::warn!("Loading save version {} (expected {})", save.version, SAVE_VERSION);
        }

        self.treasury.set_balance(save.money);
        self.metrics.set_electricity_produced(save.electricity_production);
        self.metrics.set_electricity_consumed(save.electricity_consumption);
        self.metrics.set_population(save.population);
        self.metrics.set_happiness(save.happiness);
        self.metrics.set_happiness_needed(save.happiness_needed);
        self.metrics.set_safety(save.safety);
        self.metrics.set_safety_needed(save.safety_needed);
        if let Some(day) = save.day {
            self.metrics.set_day(day);
        }

        tracing::info!("Loaded save: day {}, money {}", self.metrics.day(), save.money);
        Ok(save)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let json = self.save_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_path(&mut self, path: &Path) -> Result<SaveGame> {
        let json = std::fs::read_to_string(path)?;
        self.load_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let save = SaveGame::parse("{}").unwrap();
        assert_eq!(save.money, 1000);
        assert_eq!(save.population, 0);
        assert_eq!(save.day, None);
        assert_eq!(save.version, "1.0");
    }

    #[test]
    fn test_zero_money_is_kept() {
        let save = SaveGame::parse(r#"{"money": 0}"#).unwrap();
        assert_eq!(save.money, 0);
    }

    #[test]
    fn test_legacy_safety_keys() {
        let save = SaveGame::parse(r#"{"safeness": 75, "safenessNeeded": 200}"#).unwrap();
        assert_eq!(save.safety, 75);
        assert_eq!(save.safety_needed, 200);
    }

    #[test]
    fn test_fractional_and_null_values() {
        let json = r#"{"money": 1234.6, "population": null, "happiness": -3}"#;
        let save = SaveGame::parse(json).unwrap();
        assert_eq!(save.money, 1235);
        assert_eq!(save.population, 0);
        assert_eq!(save.happiness, 0);

        let save = SaveGame::parse(r#"{"money": null}"#).unwrap();
        assert_eq!(save.money, 1000);
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(SaveGame::parse("{money"), Err(CityError::InvalidSave(_))));
        assert!(matches!(SaveGame::parse("42"), Err(CityError::InvalidSave(_))));
        assert!(matches!(
            SaveGame::parse(r#"{"money": "lots"}"#),
            Err(CityError::InvalidSave(_))
        ));
    }

    #[test]
    fn test_saved_keys() {
        let world = World::new();
        let json = world.save_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        for key in [
            "money",
            "electricityProduction",
            "electricityConsumption",
            "population",
            "happiness",
            "happinessNeeded",
            "safety",
            "safetyNeeded",
            "day",
            "timestamp",
            "version",
        ] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
    }
}
