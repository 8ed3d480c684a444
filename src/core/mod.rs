pub mod calendar;
pub mod clock;
pub mod config;
pub mod error;
pub mod types;

pub use calendar::{DayCycle, DayPhase};
pub use clock::{Clock, ManualClock, SystemClock};
