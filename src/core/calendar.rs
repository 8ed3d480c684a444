//! Day/night cycle used by drivers to produce day-complete signals
//!
//! The rule engine only needs to know when a day ends. Drivers (the REPL,
//! the real-time runner) advance a `DayCycle` and call
//! `World::on_day_complete` each time it wraps.

use serde::{Deserialize, Serialize};

/// Phases of one in-game day, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayPhase {
    Sunrise,
    Day,
    Sunset,
    Night,
}

impl DayPhase {
    pub fn from_index(index: u64) -> Self {
        match index % 4 {
            0 => DayPhase::Sunrise,
            1 => DayPhase::Day,
            2 => DayPhase::Sunset,
            _ => DayPhase::Night,
        }
    }
}

/// Tracks progress through the day/night cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayCycle {
    tick: u64,
    ticks_per_phase: u64,
    completed_days: u64,
}

impl DayCycle {
    pub fn new(ticks_per_phase: u64) -> Self {
        Self {
            tick: 0,
            ticks_per_phase: ticks_per_phase.max(1),
            completed_days: 0,
        }
    }

    /// Advance one tick; returns true when the night just ended
    pub fn advance(&mut self) -> bool {
        self.tick += 1;
        if self.tick % self.ticks_per_day() == 0 {
            self.completed_days += 1;
            true
        } else {
            false
        }
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn current_phase(&self) -> DayPhase {
        let tick_in_day = self.tick % self.ticks_per_day();
        DayPhase::from_index(tick_in_day / self.ticks_per_phase)
    }

    pub fn completed_days(&self) -> u64 {
        self.completed_days
    }

    pub fn ticks_per_day(&self) -> u64 {
        self.ticks_per_phase * 4
    }
}

impl Default for DayCycle {
    fn default() -> Self {
        Self::new(5)
    }
}
