//! Habit scheduler: next-due computation and streak bookkeeping.
//!
//! Pure functions over `Task` values. Nothing here fails: a task that is not
//! a habit, or is flagged as one without settings, passes through untouched.
//!
//! The next due date is always advanced from the task's *scheduled* due date
//! (the anchor), not from the moment the completion was logged, so early or
//! late completions never drift the schedule.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, trace};

use crate::error::HabitError;
use crate::task::{Frequency, HabitSettings, Task};
use crate::time::{
    add_calendar_days, add_calendar_months, add_calendar_weeks, calendar_days_between,
    calendar_months_between, is_same_calendar_day,
};

/// Approximate cycle length in days, used for streak windows only.
///
/// Monthly reports 30 but due dates and monthly streaks both use real
/// calendar months.
pub fn interval_days_for(settings: Option<&HabitSettings>) -> u32 {
    let Some(settings) = settings else {
        return 1;
    };
    match settings.frequency {
        Frequency::Daily => 1,
        Frequency::Weekly => 7,
        Frequency::Monthly => 30,
        Frequency::Custom => settings.interval_days.unwrap_or(1).max(1),
    }
}

/// When the habit is next due after a completion at `completion` (now if `None`).
///
/// Non-habit tasks get their current `due_date` back unchanged.
pub fn calculate_next_due_date(
    task: &Task,
    completion: Option<DateTime<Utc>>,
    tz: Tz,
) -> Option<DateTime<Utc>> {
    let Some(settings) = task.active_habit() else {
        return task.due_date;
    };

    let anchor = task
        .due_date
        .unwrap_or_else(|| completion.unwrap_or_else(Utc::now));

    Some(advance_one_cycle(anchor, settings, tz))
}

fn advance_one_cycle(anchor: DateTime<Utc>, settings: &HabitSettings, tz: Tz) -> DateTime<Utc> {
    match settings.frequency {
        Frequency::Daily => add_calendar_days(anchor, 1, tz),
        Frequency::Weekly => add_calendar_weeks(anchor, 1, tz),
        Frequency::Monthly => add_calendar_months(anchor, 1, tz),
        Frequency::Custom => {
            add_calendar_days(anchor, u64::from(interval_days_for(Some(settings))), tz)
        }
    }
}

/// Whether `completion` lands exactly one cycle after `previous`.
fn is_on_cadence(
    settings: &HabitSettings,
    previous: DateTime<Utc>,
    completion: DateTime<Utc>,
    tz: Tz,
) -> bool {
    let interval = i64::from(interval_days_for(Some(settings)));
    match settings.frequency {
        Frequency::Daily | Frequency::Custom => {
            calendar_days_between(previous, completion, tz) == interval
        }
        Frequency::Weekly => (1..=interval).contains(&calendar_days_between(previous, completion, tz)),
        Frequency::Monthly => calendar_months_between(previous, completion, tz) == 1,
    }
}

/// Log one completion of a habit and roll its due date forward one cycle.
///
/// - first completion ever: streak 1
/// - same calendar day as the last completion: streak unchanged, total still +1
/// - exactly one cycle after the last completion: streak +1
/// - anything else: streak restarts at 1
///
/// `completed`/`completed_at` are left to the caller.
pub fn apply_habit_completion(task: &Task, completion: Option<DateTime<Utc>>, tz: Tz) -> Task {
    let Some(settings) = task.active_habit() else {
        debug!(task_id = %task.id, "not an active habit, completion ignored");
        return task.clone();
    };

    let completion = completion.unwrap_or_else(Utc::now);
    let mut updated = settings.clone();

    updated.streak = match settings.last_completion {
        None => 1,
        Some(previous) if is_same_calendar_day(previous, completion, tz) => {
            trace!(task_id = %task.id, "repeat completion on the same day, streak held");
            settings.streak
        }
        Some(previous) if is_on_cadence(settings, previous, completion, tz) => {
            settings.streak.saturating_add(1)
        }
        Some(_) => 1,
    };
    updated.best_streak = settings.best_streak.max(updated.streak);
    updated.total_completions = settings.total_completions.saturating_add(1);
    updated.last_completion = Some(completion);

    let due_date = calculate_next_due_date(task, Some(completion), tz);

    debug!(
        task_id = %task.id,
        streak = updated.streak,
        best_streak = updated.best_streak,
        total = updated.total_completions,
        "habit completion applied"
    );

    Task {
        due_date,
        habit_settings: Some(updated),
        ..task.clone()
    }
}

/// Turn a task into a habit on the given cadence.
///
/// Counters already on the task survive a cadence change.
pub fn make_habit(task: &Task, frequency: Frequency, interval_days: Option<u32>) -> Task {
    let interval_days = match frequency {
        Frequency::Custom => Some(interval_days.unwrap_or(1).max(1)),
        _ => None,
    };
    let settings = match &task.habit_settings {
        Some(existing) => HabitSettings {
            frequency,
            interval_days,
            ..existing.clone()
        },
        None => HabitSettings::new(frequency, interval_days),
    };
    Task {
        is_habit: true,
        habit_settings: Some(settings),
        ..task.clone()
    }
}

pub fn clear_habit(task: &Task) -> Task {
    Task {
        is_habit: false,
        habit_settings: None,
        ..task.clone()
    }
}

/// Check the invariants callers are responsible for before storing a task.
pub fn validate_habit(task: &Task) -> Result<(), HabitError> {
    let settings = match (task.is_habit, &task.habit_settings) {
        (false, None) => return Ok(()),
        (false, Some(_)) => return Err(HabitError::UnexpectedSettings(task.id.clone())),
        (true, None) => return Err(HabitError::MissingSettings(task.id.clone())),
        (true, Some(s)) => s,
    };

    if settings.frequency == Frequency::Custom && settings.interval_days.unwrap_or(0) < 1 {
        return Err(HabitError::MissingInterval(task.id.clone()));
    }
    if settings.best_streak < settings.streak {
        return Err(HabitError::BestStreakBelowStreak {
            id: task.id.clone(),
            streak: settings.streak,
            best_streak: settings.best_streak,
        });
    }
    Ok(())
}
