//! Tracker state manager
//!
//! Owns the record set, the draft and the view state, and derives the chart
//! and calendar views from them. Every mutation goes through a method here;
//! presentation code only reads.
//!
//! # Record ordering
//!
//! Records stay sorted ascending by date. Submissions for an existing date
//! either land after the existing ones (`DuplicatePolicy::Append`) or
//! overwrite the first of them (`DuplicatePolicy::Replace`).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::str::FromStr;

use super::calendar::{derive_cells, CalendarCell, WeekStart};
use super::chart::{window_cutoff, ChartView, SeriesMemo};
use super::draft::{Draft, DraftUpdate};
use super::error::TrackerError;
use super::types::DailyRecord;
use super::view::{ChartWindow, DisplayMonth, Series, SeriesVisibility};

/// What to do when a submission's date already has a record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep every submission; the calendar shows the earliest
    #[default]
    Append,
    /// Overwrite the existing record for that date
    Replace,
}

impl std::fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuplicatePolicy::Append => write!(f, "append"),
            DuplicatePolicy::Replace => write!(f, "replace"),
        }
    }
}

impl FromStr for DuplicatePolicy {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "append" => Ok(DuplicatePolicy::Append),
            "replace" | "overwrite" => Ok(DuplicatePolicy::Replace),
            _ => Err(TrackerError::UnknownDuplicatePolicy(s.to_string())),
        }
    }
}

/// Behaviour knobs for a tracker session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerOptions {
    pub default_window: ChartWindow,
    pub duplicate_policy: DuplicatePolicy,
    pub week_start: WeekStart,
}

/// Chart and calendar view state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub window: ChartWindow,
    pub visibility: SeriesVisibility,
    pub month: DisplayMonth,
}

/// Complete session state as a plain value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerState {
    pub records: Vec<DailyRecord>,
    pub draft: Draft,
    pub view: ViewState,
}

impl TrackerState {
    /// Fresh state for a session starting on `today`
    pub fn new(today: NaiveDate, window: ChartWindow) -> Self {
        Self {
            records: Vec::new(),
            draft: Draft::new(today),
            view: ViewState {
                window,
                visibility: SeriesVisibility::default(),
                month: DisplayMonth::containing(today),
            },
        }
    }
}

/// The symptom tracker state manager
#[derive(Debug)]
pub struct Tracker {
    state: TrackerState,
    options: TrackerOptions,
    /// Bumped on every record-set change; keys the chart memo
    revision: u64,
    memo: RefCell<SeriesMemo>,
}

impl Tracker {
    /// Create a tracker for a session starting today (UTC)
    pub fn new(options: TrackerOptions) -> Self {
        Self::starting_on(options, today())
    }

    /// Create a tracker for a session starting on a given date
    pub fn starting_on(options: TrackerOptions, today: NaiveDate) -> Self {
        Self::from_state(options, TrackerState::new(today, options.default_window))
    }

    /// Resume from an existing state value
    ///
    /// Stored averages are recomputed from the ratings and records are
    /// stable-sorted by date before the state is taken over.
    pub fn from_state(options: TrackerOptions, mut state: TrackerState) -> Self {
        for record in &mut state.records {
            let average = record.rating.average();
            if record.average != average {
                tracing::warn!(
                    date = %record.date,
                    stored = record.average,
                    computed = average,
                    "stored average does not match ratings"
                );
                record.average = average;
            }
        }
        if !state.records.windows(2).all(|pair| pair[0].date <= pair[1].date) {
            tracing::warn!("records out of date order, sorting");
            state.records.sort_by_key(|record| record.date);
        }

        tracing::debug!(
            records = state.records.len(),
            window = %state.view.window,
            month = %state.view.month,
            policy = %options.duplicate_policy,
            "tracker created"
        );
        Self {
            state,
            options,
            revision: 0,
            memo: RefCell::new(SeriesMemo::default()),
        }
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.state.records
    }

    pub fn draft(&self) -> &Draft {
        &self.state.draft
    }

    pub fn view(&self) -> &ViewState {
        &self.state.view
    }

    // ---- Draft ----

    /// Apply one input event to the draft
    pub fn update_draft_field(&mut self, update: DraftUpdate) {
        tracing::debug!(?update, "draft updated");
        self.state.draft.apply(update);
    }

    /// Submit the draft, resetting it to an empty entry dated today (UTC)
    pub fn submit_entry(&mut self) -> &DailyRecord {
        self.submit_entry_on(today())
    }

    /// Submit the draft, resetting it to an empty entry dated `today`
    pub fn submit_entry_on(&mut self, today: NaiveDate) -> &DailyRecord {
        let record = self.state.draft.take_record(today);
        let index = self.insert_record(record);
        self.revision += 1;

        let stored = &self.state.records[index];
        tracing::info!(
            date = %stored.date,
            average = stored.average,
            total = self.state.records.len(),
            "entry submitted"
        );
        stored
    }

    fn insert_record(&mut self, record: DailyRecord) -> usize {
        let records = &mut self.state.records;

        if self.options.duplicate_policy == DuplicatePolicy::Replace {
            if let Some(index) = records.iter().position(|r| r.date == record.date) {
                tracing::debug!(date = %record.date, "replacing existing record");
                records[index] = record;
                return index;
            }
        }

        // After any existing records for the same date
        let index = records.partition_point(|r| r.date <= record.date);
        records.insert(index, record);
        index
    }

    // ---- Chart ----

    pub fn set_chart_window(&mut self, window: ChartWindow) {
        tracing::debug!(from = %self.state.view.window, to = %window, "chart window changed");
        self.state.view.window = window;
    }

    /// Flip one series' visibility, returning the new value
    pub fn toggle_series_visibility(&mut self, series: Series) -> bool {
        let visible = self.state.view.visibility.toggle(series);
        tracing::debug!(%series, visible, "series visibility toggled");
        visible
    }

    /// Records inside the active window, measured from now
    pub fn derive_chart_series(&self) -> Vec<DailyRecord> {
        self.derive_chart_series_at(Utc::now())
    }

    /// Records inside the active window, measured from `now`
    pub fn derive_chart_series_at(&self, now: DateTime<Utc>) -> Vec<DailyRecord> {
        let window = self.state.view.window;
        let cutoff = window_cutoff(window, now);
        self.memo
            .borrow_mut()
            .get_or_compute(self.revision, window, cutoff, &self.state.records)
    }

    /// Chart view measured from now
    pub fn chart_view(&self) -> ChartView {
        self.chart_view_at(Utc::now())
    }

    /// Chart view measured from `now`: filtered records plus visible lines
    pub fn chart_view_at(&self, now: DateTime<Utc>) -> ChartView {
        let window = self.state.view.window;
        let records = self.derive_chart_series_at(now);
        ChartView::build(
            window,
            window_cutoff(window, now),
            records,
            &self.state.view.visibility,
        )
    }

    // ---- Calendar ----

    /// Shift the displayed month by `delta` months
    pub fn navigate_month(&mut self, delta: i32) {
        let month = self.state.view.month.shift(delta);
        tracing::debug!(from = %self.state.view.month, to = %month, "calendar month changed");
        self.state.view.month = month;
    }

    /// Jump straight to a month
    pub fn set_month(&mut self, month: DisplayMonth) {
        self.state.view.month = month;
    }

    /// The 42 cells of the displayed month
    pub fn derive_calendar_cells(&self) -> Vec<CalendarCell> {
        derive_cells(
            self.state.view.month,
            self.options.week_start,
            &self.state.records,
        )
    }

    pub fn weekday_labels(&self) -> [&'static str; 7] {
        self.options.week_start.weekday_labels()
    }
}

/// Today's date in UTC
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
