//! Tracker error types
//!
//! The state manager itself never fails. These errors come from parsing
//! user input at the presentation boundary (window names, symptom names,
//! ratings, dates, months).

use thiserror::Error;

/// Errors raised while turning raw input into tracker values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// Rating outside the 0-10 slider range
    #[error("Rating out of range: {0} (expected 0-10)")]
    RatingOutOfRange(i64),

    /// Rating text that is not an integer
    #[error("Invalid rating: {0}")]
    InvalidRating(String),

    /// Date text that is not an ISO calendar date
    #[error("Invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    /// Unknown chart window name
    #[error("Unknown chart window: {0}")]
    UnknownWindow(String),

    /// Unknown symptom name
    #[error("Unknown symptom: {0}")]
    UnknownSymptom(String),

    /// Unknown chart series name
    #[error("Unknown series: {0}")]
    UnknownSeries(String),

    /// Unknown week start day
    #[error("Unknown week start: {0}")]
    UnknownWeekStart(String),

    /// Unknown duplicate-date policy
    #[error("Unknown duplicate policy: {0}")]
    UnknownDuplicatePolicy(String),

    /// Month outside 1-12
    #[error("Invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
}

/// Result type alias for tracker input parsing
pub type TrackerResult<T> = Result<T, TrackerError>;
