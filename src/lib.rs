//! # Symptom Tracker
//!
//! Daily symptom tracking: record four 0-10 symptom ratings, two yes/no
//! markers and a short diary note per day, then look at the trend on a
//! time-series chart or browse a month calendar.
//!
//! ## Features
//!
//! - **Typed entries**: ratings cannot leave the 0-10 range
//! - **Daily average**: mean of the four ratings, one decimal place
//! - **Chart view**: trailing 1 week / 2 weeks / 1 month / 1 year windows
//!   with per-series visibility
//! - **Calendar view**: fixed 42-cell month grid with per-day summaries
//!
//! All state is in memory and lives for one session.
//!
//! ## Modules
//!
//! - [`tracker`]: State manager and derived views
//! - [`config`]: TOML and environment configuration
//! - [`shell`]: Line-oriented terminal front end
//!
//! ## Quick Start
//!
//! ```rust
//! use symptom_tracker::tracker::*;
//!
//! let mut tracker = Tracker::new(TrackerOptions::default());
//!
//! tracker.update_draft_field(DraftUpdate::Rating(Symptom::Pain, Rating::clamped(6)));
//! tracker.update_draft_field(DraftUpdate::Diary("long walk".into()));
//! tracker.submit_entry();
//!
//! tracker.set_chart_window(ChartWindow::OneWeek);
//! let chart = tracker.chart_view();
//! println!("{} points on the chart", chart.records.len());
//! ```

pub mod config;
pub mod shell;
pub mod tracker;

// Re-export top-level types for convenience
pub use tracker::{
    CalendarCell, ChartView, ChartWindow, DailyRecord, DisplayMonth, Draft, DraftUpdate,
    DuplicatePolicy, Rating, Series, SeriesVisibility, Symptom, SymptomRating, Tracker,
    TrackerError, TrackerOptions, TrackerResult, TrackerState, WeekStart,
};

pub use config::{Config, ConfigError, LoggingConfig, TrackerConfig};

pub use shell::{Command, Session};
