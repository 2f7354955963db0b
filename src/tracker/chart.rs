//! Chart derivation
//!
//! Filters the record set down to the active trailing window and splits it
//! into one line per visible series. Hidden series are left out of the view
//! entirely; the underlying records are never altered by visibility.
//!
//! A record dated `d` is plotted when `d` at midnight UTC is at or after
//! `now - N days`. That comparison only changes when the threshold crosses a
//! midnight, so the window collapses to a first-included date (the cutoff),
//! which also serves as the memoization key.

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use serde::Serialize;

use super::types::DailyRecord;
use super::view::{ChartWindow, Series, SeriesVisibility};

/// Fixed Y-axis domain for all series
pub const Y_DOMAIN: (f64, f64) = (0.0, 10.0);

/// Start instant of the window: `now - N days`
pub fn window_threshold(window: ChartWindow, now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(window.days())
}

/// Earliest record date inside the window
pub fn window_cutoff(window: ChartWindow, now: DateTime<Utc>) -> NaiveDate {
    let threshold = window_threshold(window, now);
    let day = threshold.date_naive();
    let time = threshold.time();
    if time.num_seconds_from_midnight() == 0 && time.nanosecond() == 0 {
        day
    } else {
        day.succ_opt().unwrap_or(day)
    }
}

/// Records on or after `cutoff`, in their existing order
pub fn filter_from(records: &[DailyRecord], cutoff: NaiveDate) -> Vec<DailyRecord> {
    records
        .iter()
        .filter(|record| record.date >= cutoff)
        .cloned()
        .collect()
}

/// One plotted value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// One plotted line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLine {
    #[serde(serialize_with = "serialize_series")]
    pub series: Series,
    pub points: Vec<ChartPoint>,
}

fn serialize_series<S: serde::Serializer>(series: &Series, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(series.as_str())
}

/// Everything the chart renderer needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub window: ChartWindow,
    /// First date included in the window
    pub cutoff: NaiveDate,
    /// Filtered records in date order
    pub records: Vec<DailyRecord>,
    /// Lines for visible series only
    pub lines: Vec<ChartLine>,
    /// Value axis, identical for every series
    pub y_domain: (f64, f64),
}

impl ChartView {
    pub fn build(
        window: ChartWindow,
        cutoff: NaiveDate,
        records: Vec<DailyRecord>,
        visibility: &SeriesVisibility,
    ) -> Self {
        let lines = visibility
            .visible()
            .into_iter()
            .map(|series| ChartLine {
                series,
                points: records
                    .iter()
                    .map(|record| ChartPoint {
                        date: record.date,
                        value: record.series_value(series),
                    })
                    .collect(),
            })
            .collect();

        Self {
            window,
            cutoff,
            records,
            lines,
            y_domain: Y_DOMAIN,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn line(&self, series: Series) -> Option<&ChartLine> {
        self.lines.iter().find(|line| line.series == series)
    }
}

/// Memoized window filter, keyed on record revision, window and cutoff
#[derive(Debug, Clone, Default)]
pub struct SeriesMemo {
    entry: Option<MemoEntry>,
}

#[derive(Debug, Clone)]
struct MemoEntry {
    revision: u64,
    window: ChartWindow,
    cutoff: NaiveDate,
    records: Vec<DailyRecord>,
}

impl SeriesMemo {
    /// Return the cached series, recomputing when any key input changed
    pub fn get_or_compute(
        &mut self,
        revision: u64,
        window: ChartWindow,
        cutoff: NaiveDate,
        records: &[DailyRecord],
    ) -> Vec<DailyRecord> {
        match &self.entry {
            Some(entry)
                if entry.revision == revision
                    && entry.window == window
                    && entry.cutoff == cutoff =>
            {
                tracing::trace!(revision, %window, %cutoff, "chart series memo hit");
                entry.records.clone()
            }
            _ => {
                let filtered = filter_from(records, cutoff);
                tracing::debug!(
                    revision,
                    %window,
                    %cutoff,
                    points = filtered.len(),
                    "chart series recomputed"
                );
                self.entry = Some(MemoEntry {
                    revision,
                    window,
                    cutoff,
                    records: filtered.clone(),
                });
                filtered
            }
        }
    }
}
