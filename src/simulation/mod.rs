pub mod events;
pub mod requirements;
pub mod scheduler;
pub mod tick;

pub use events::{CityEvent, EventLog, LoggedEvent, Subscriber};
pub use requirements::{in_grace_period, refresh_requirements, safety_needed};
pub use scheduler::{CancellationToken, Scheduler};
pub use tick::{house_income, run_daily_tick, DayReport};
