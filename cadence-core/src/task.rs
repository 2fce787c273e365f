//! Task model shared by the habit scheduler and the natural-language extractor.
//!
//! Field names serialise camelCase so a task round-trips through the
//! application's JSON documents unchanged. Storage is someone else's problem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Recurrence cadence of a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    /// Every `interval_days` days.
    Custom,
}

impl Frequency {
    /// Human label, e.g. "Weekly" or "Every 3 days".
    pub fn label(&self, interval_days: Option<u32>) -> String {
        match self {
            Frequency::Daily => "Daily".to_string(),
            Frequency::Weekly => "Weekly".to_string(),
            Frequency::Monthly => "Monthly".to_string(),
            Frequency::Custom => match interval_days.unwrap_or(1).max(1) {
                1 => "Every day".to_string(),
                n => format!("Every {n} days"),
            },
        }
    }
}

/// Streak bookkeeping for a habit task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitSettings {
    pub frequency: Frequency,

    /// Only meaningful for `Frequency::Custom`; must be >= 1 there.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_days: Option<u32>,

    #[serde(default)]
    pub streak: u32,

    /// Always >= `streak` after a completion is applied.
    #[serde(default)]
    pub best_streak: u32,

    #[serde(default)]
    pub total_completions: u32,

    #[serde(default)]
    pub last_completion: Option<DateTime<Utc>>,
}

impl HabitSettings {
    pub fn new(frequency: Frequency, interval_days: Option<u32>) -> Self {
        Self {
            frequency,
            interval_days,
            streak: 0,
            best_streak: 0,
            total_completions: 0,
            last_completion: None,
        }
    }

    pub fn label(&self) -> String {
        self.frequency.label(self.interval_days)
    }
}

/// Core task type.
///
/// Only the fields the core reads or writes are modelled; everything else
/// the application stores alongside a task is opaque to us.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,

    /// Plain deadline, or for a habit the date the current cycle is due.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub priority: Option<Priority>,

    /// Free-form, e.g. "30 minutes".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default)]
    pub is_habit: bool,

    /// Present iff `is_habit`. Not enforced by the type; see `validate_habit`.
    #[serde(default)]
    pub habit_settings: Option<HabitSettings>,

    #[serde(default)]
    pub completed: bool,

    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            due_date: None,
            priority: None,
            estimated_duration: None,
            location: None,
            is_habit: false,
            habit_settings: None,
            completed: false,
            completed_at: None,
        }
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_habit(mut self, settings: HabitSettings) -> Self {
        self.is_habit = true;
        self.habit_settings = Some(settings);
        self
    }

    /// Settings of a task that is flagged as a habit and actually carries them.
    pub fn active_habit(&self) -> Option<&HabitSettings> {
        if self.is_habit {
            self.habit_settings.as_ref()
        } else {
            None
        }
    }
}
