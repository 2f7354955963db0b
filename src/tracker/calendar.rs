//! Calendar derivation
//!
//! Builds the fixed 6x7 month grid. The grid starts on the configured week
//! start day on or before the 1st, so leading and trailing cells spill into
//! the neighbouring months and are flagged as outside the displayed month.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use super::error::TrackerError;
use super::types::DailyRecord;
use super::view::DisplayMonth;

/// Rows in the month grid
pub const GRID_ROWS: usize = 6;
/// Columns in the month grid
pub const GRID_COLUMNS: usize = 7;
/// Total cells in the month grid
pub const GRID_CELLS: usize = GRID_ROWS * GRID_COLUMNS;

/// First column of the calendar grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// Column index of a date's weekday
    pub fn column(&self, date: NaiveDate) -> u32 {
        match self {
            WeekStart::Sunday => date.weekday().num_days_from_sunday(),
            WeekStart::Monday => date.weekday().num_days_from_monday(),
        }
    }

    /// Weekday header labels in column order
    pub fn weekday_labels(&self) -> [&'static str; 7] {
        match self {
            WeekStart::Sunday => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
            WeekStart::Monday => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
        }
    }
}

impl std::fmt::Display for WeekStart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeekStart::Sunday => write!(f, "sunday"),
            WeekStart::Monday => write!(f, "monday"),
        }
    }
}

impl FromStr for WeekStart {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sunday" | "sun" => Ok(WeekStart::Sunday),
            "monday" | "mon" => Ok(WeekStart::Monday),
            _ => Err(TrackerError::UnknownWeekStart(s.to_string())),
        }
    }
}

/// One day-slot in the month grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// Whether the date belongs to the displayed month
    pub in_month: bool,
    /// First record for this date, if any
    pub record: Option<DailyRecord>,
}

impl CalendarCell {
    pub fn day(&self) -> u32 {
        self.date.day()
    }

    /// Badge text for the average, e.g. "5" or "3.8"
    pub fn average_label(&self) -> Option<String> {
        self.record.as_ref().map(|r| format_average(r.average))
    }

    /// Badge hue in degrees: 0 at average 0, 360 at average 10
    pub fn hue(&self) -> Option<f64> {
        self.record.as_ref().map(|r| average_hue(r.average))
    }

    pub fn has_stool(&self) -> bool {
        self.record.as_ref().is_some_and(|r| r.rating.stool)
    }

    pub fn has_period(&self) -> bool {
        self.record.as_ref().is_some_and(|r| r.rating.period)
    }

    /// Hover text: the diary, or a placeholder
    pub fn tooltip(&self) -> &str {
        match &self.record {
            Some(record) if record.diary.is_empty() => "No diary",
            Some(record) => &record.diary,
            None => "No data",
        }
    }
}

/// Hue for an average badge
pub fn average_hue(average: f64) -> f64 {
    average * 36.0
}

/// Render an average without a trailing ".0"
pub fn format_average(average: f64) -> String {
    if average.fract() == 0.0 {
        format!("{:.0}", average)
    } else {
        format!("{:.1}", average)
    }
}

/// First date shown in the grid for a month
pub fn grid_start(month: DisplayMonth, week_start: WeekStart) -> NaiveDate {
    let first = month.first_day();
    let offset = week_start.column(first) as u64;
    first.checked_sub_days(Days::new(offset)).unwrap_or(first)
}

/// Build the 42 cells for a month
///
/// Records are matched by exact date; with duplicate dates the first record
/// in slice order wins.
pub fn derive_cells(
    month: DisplayMonth,
    week_start: WeekStart,
    records: &[DailyRecord],
) -> Vec<CalendarCell> {
    let mut by_date: HashMap<NaiveDate, &DailyRecord> = HashMap::with_capacity(records.len());
    for record in records {
        by_date.entry(record.date).or_insert(record);
    }

    let start = grid_start(month, week_start);
    (0..GRID_CELLS as u64)
        .map(|i| {
            let date = start.checked_add_days(Days::new(i)).unwrap_or(start);
            CalendarCell {
                date,
                in_month: month.contains(date),
                record: by_date.get(&date).map(|r| (*r).clone()),
            }
        })
        .collect()
}
