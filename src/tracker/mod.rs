//! Symptom Tracker core
//!
//! This module provides the in-memory tracker state and its derived views:
//!
//! - **types**: Core data structures (Rating, SymptomRating, DailyRecord)
//! - **draft**: The in-progress entry and its input events
//! - **view**: Chart window, series visibility, displayed month
//! - **chart**: Window filtering and per-series lines
//! - **calendar**: The 42-cell month grid
//! - **manager**: The state manager orchestrating all of the above
//! - **error**: Input parsing errors
//!
//! # Architecture
//!
//! ```text
//! Input event → Tracker::update_draft_field → Draft
//! Submit      → Draft → DailyRecord → sorted record set
//! Render      → record set + view state → ChartView / [CalendarCell; 42]
//! ```
//!
//! # Example
//!
//! ```rust
//! use symptom_tracker::tracker::{DraftUpdate, Rating, Symptom, Tracker, TrackerOptions};
//!
//! let mut tracker = Tracker::new(TrackerOptions::default());
//! tracker.update_draft_field(DraftUpdate::Rating(Symptom::Fatigue, Rating::clamped(4)));
//! tracker.update_draft_field(DraftUpdate::Rating(Symptom::Heart, Rating::clamped(8)));
//!
//! let record = tracker.submit_entry();
//! assert_eq!(record.average, 3.0);
//!
//! assert_eq!(tracker.derive_calendar_cells().len(), 42);
//! ```

pub mod calendar;
pub mod chart;
pub mod draft;
pub mod error;
pub mod manager;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use calendar::{derive_cells, CalendarCell, WeekStart, GRID_CELLS};
pub use chart::{window_cutoff, ChartLine, ChartPoint, ChartView, Y_DOMAIN};
pub use draft::{Draft, DraftUpdate};
pub use error::{TrackerError, TrackerResult};
pub use manager::{DuplicatePolicy, Tracker, TrackerOptions, TrackerState, ViewState};
pub use types::{parse_date, DailyRecord, Rating, Symptom, SymptomRating};
pub use view::{ChartWindow, DisplayMonth, Series, SeriesVisibility};
