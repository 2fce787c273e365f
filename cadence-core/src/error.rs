use thiserror::Error;

/// Data-model invariant violations on a habit task.
///
/// The scheduler tolerates all of these; `validate_habit` exists for callers
/// that want to reject bad documents before they are stored.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HabitError {
    #[error("task {0} is flagged as a habit but has no habit settings")]
    MissingSettings(String),

    #[error("task {0} carries habit settings but is not flagged as a habit")]
    UnexpectedSettings(String),

    #[error("task {0} uses a custom cadence without an interval of at least one day")]
    MissingInterval(String),

    #[error("task {id}: best streak {best_streak} is below current streak {streak}")]
    BestStreakBelowStreak {
        id: String,
        streak: u32,
        best_streak: u32,
    },
}
