//! Daily tick - orchestrates the economic update
//!
//! Runs once per completed day/night cycle:
//! advance day -> age houses -> recompute requirements -> pay income
//!
//! In creative mode only the day counter moves.

use serde::{Deserialize, Serialize};

use crate::city::housing::HouseInfo;
use crate::city::metrics::CityMetrics;
use crate::core::types::{Day, Money};
use crate::simulation::requirements::{in_grace_period, refresh_requirements};
use crate::world::World;

/// Outcome of one daily tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayReport {
    pub day: Day,
    /// Money credited to the treasury
    pub income: Money,
    pub population: u64,
    /// True when the economic steps were skipped (creative mode)
    pub skipped: bool,
}

/// Income of one house after the city's deficits are applied
///
/// The electricity deficit always applies; happiness and safety deficits
/// only once the grace period is over.
pub fn house_income(info: &HouseInfo, metrics: &CityMetrics, grace: bool) -> f64 {
    let mut income = info.total_money_earned as f64;

    let electricity = metrics.electricity_deficit_percent();
    if electricity > 0.0 {
        income *= 1.0 - electricity / 100.0;
    }

    if !grace {
        let happiness = metrics.happiness_deficit_percent();
        if happiness > 0.0 {
            income *= 1.0 - happiness / 100.0;
        }
        let safety = metrics.safety_deficit_percent();
        if safety > 0.0 {
            income *= 1.0 - safety / 100.0;
        }
    }

    income.max(0.0)
}

/// Advance the city by one day
pub fn run_daily_tick(world: &mut World) -> DayReport {
    let day = world.metrics.day().saturating_add(1);
    world.metrics.set_day(day);

    if world.treasury.is_creative() {
        tracing::debug!("Day {} complete (creative mode, economy skipped)", day);
        return DayReport {
            day,
            income: 0,
            population: world.metrics.population(),
            skipped: true,
        };
    }

    world.housing.age_one_day(&world.config, &mut world.metrics);
    refresh_requirements(&world.config, &mut world.metrics, &world.housing);

    let grace = in_grace_period(&world.config, day);
    let total: f64 = world
        .housing
        .iter()
        .map(|(_, record)| house_income(&record.info(&world.config), &world.metrics, grace))
        .sum();

    let income = if total > 0.0 { total.round() as Money } else { 0 };
    if income > 0 {
        world.treasury.add(income);
    }

    tracing::debug!(
        "Day {} complete: income {}, population {}, balance {}",
        day,
        income,
        world.metrics.population(),
        world.treasury.balance()
    );

    DayReport {
        day,
        income,
        population: world.metrics.population(),
        skipped: false,
    }
}
