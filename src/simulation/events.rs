//! City events and the event log

use serde::{Deserialize, Serialize};

use crate::city::building::BuildingKind;
use crate::core::types::{BuildingId, Day, Money};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CityEvent {
    BuildingPlaced {
        id: BuildingId,
        kind: BuildingKind,
        price: Money,
    },
    BuildRejected {
        kind: BuildingKind,
        reason: String,
    },
    BuildingRemoved {
        id: BuildingId,
        kind: BuildingKind,
    },
    DayCompleted {
        day: Day,
        income: Money,
        population: u64,
        skipped: bool,
    },
    DepositOpened {
        bank: BuildingId,
        principal: Money,
        maturity_value: Money,
    },
    DepositMatured {
        bank: BuildingId,
        payout: Money,
    },
    GameReset {
        creative: bool,
    },
}

/// A logged event stamped with the day it happened on
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub id: u32,
    pub day: Day,
    pub event: CityEvent,
}

/// Callback invoked for every event
pub type Subscriber = Box<dyn FnMut(&CityEvent) + Send>;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventLog {
    pub events: Vec<LoggedEvent>,
    next_event_id: u32,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event(&mut self, event: CityEvent, day: Day) -> u32 {
        let id = self.next_event_id;
        self.next_event_id += 1;
        self.events.push(LoggedEvent { id, day, event });
        id
    }

    pub fn events_for_day(&self, day: Day) -> impl Iterator<Item = &LoggedEvent> {
        self.events.iter().filter(move |e| e.day == day)
    }

    pub fn last(&self) -> Option<&CityEvent> {
        self.events.last().map(|e| &e.event)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop every logged event; ids keep counting up
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
