//! cadence-core: habit recurrence and natural-language task metadata.
//!
//! Two pure, independent engines over a small task model:
//! - [`habit`]: next-due computation and streak bookkeeping for recurring tasks
//! - [`nlp`]: best-effort extraction of dates, times, priority and friends
//!   from a typed task title
//!
//! Neither does I/O. Callers own persistence and pass "now" in explicitly
//! where it matters.

pub mod error;
pub mod habit;
pub mod nlp;
pub mod task;
pub mod time;

pub use error::HabitError;
pub use habit::{
    apply_habit_completion, calculate_next_due_date, clear_habit, interval_days_for, make_habit,
    validate_habit,
};
pub use nlp::{parse_natural_language, parse_time_of_day, ParsedTaskData};
pub use task::{Frequency, HabitSettings, Priority, Task};
pub use time::{format_date_for_input, next_weekday, parse_local_datetime_to_utc};
