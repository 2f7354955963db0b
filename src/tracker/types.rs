//! Core data types for the symptom tracker
//!
//! This module defines the values the state manager works with:
//! - `Rating`: a 0-10 symptom score
//! - `Symptom`: which of the four rated symptoms
//! - `SymptomRating`: one day's raw input
//! - `DailyRecord`: a submitted, dated entry with its computed average

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::{TrackerError, TrackerResult};
use super::view::Series;

/// ISO calendar date format used for record keys
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO "YYYY-MM-DD" date
pub fn parse_date(s: &str) -> TrackerResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| TrackerError::InvalidDate(s.to_string()))
}

/// A symptom score in the inclusive range 0-10
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: Rating = Rating(0);
    pub const MAX: Rating = Rating(10);

    /// Create a rating, rejecting values above 10
    pub fn new(value: u8) -> TrackerResult<Self> {
        if value > Self::MAX.0 {
            return Err(TrackerError::RatingOutOfRange(value as i64));
        }
        Ok(Self(value))
    }

    /// Create a rating the way a slider does: saturate at the ends
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = TrackerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl FromStr for Rating {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| TrackerError::InvalidRating(s.to_string()))?;
        if !(0..=10).contains(&value) {
            return Err(TrackerError::RatingOutOfRange(value));
        }
        Ok(Self(value as u8))
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// The four rated symptoms
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Symptom {
    Fatigue,
    Pain,
    Headache,
    Heart,
}

impl Symptom {
    /// All symptoms in display order
    pub fn all() -> &'static [Symptom] {
        &[
            Symptom::Fatigue,
            Symptom::Pain,
            Symptom::Headache,
            Symptom::Heart,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Symptom::Fatigue => "fatigue",
            Symptom::Pain => "pain",
            Symptom::Headache => "headache",
            Symptom::Heart => "heart",
        }
    }
}

impl std::fmt::Display for Symptom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Symptom {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fatigue" => Ok(Symptom::Fatigue),
            "pain" => Ok(Symptom::Pain),
            "headache" => Ok(Symptom::Headache),
            "heart" => Ok(Symptom::Heart),
            _ => Err(TrackerError::UnknownSymptom(s.to_string())),
        }
    }
}

/// One day's raw symptom input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomRating {
    pub fatigue: Rating,
    pub pain: Rating,
    pub headache: Rating,
    pub heart: Rating,
    /// Bowel movement recorded
    pub stool: bool,
    /// Menstrual period recorded
    pub period: bool,
}

impl SymptomRating {
    /// Builder: set a symptom rating
    pub fn with(mut self, symptom: Symptom, rating: Rating) -> Self {
        self.set(symptom, rating);
        self
    }

    /// Builder: set the stool flag
    pub fn stool(mut self, stool: bool) -> Self {
        self.stool = stool;
        self
    }

    /// Builder: set the period flag
    pub fn period(mut self, period: bool) -> Self {
        self.period = period;
        self
    }

    pub fn get(&self, symptom: Symptom) -> Rating {
        match symptom {
            Symptom::Fatigue => self.fatigue,
            Symptom::Pain => self.pain,
            Symptom::Headache => self.headache,
            Symptom::Heart => self.heart,
        }
    }

    pub fn set(&mut self, symptom: Symptom, rating: Rating) {
        match symptom {
            Symptom::Fatigue => self.fatigue = rating,
            Symptom::Pain => self.pain = rating,
            Symptom::Headache => self.headache = rating,
            Symptom::Heart => self.heart = rating,
        }
    }

    /// Mean of the four ratings, rounded to one decimal place
    ///
    /// Halves round up, so 1.25 becomes 1.3.
    pub fn average(&self) -> f64 {
        let sum: u32 = Symptom::all()
            .iter()
            .map(|s| self.get(*s).value() as u32)
            .sum();
        let mean = sum as f64 / Symptom::all().len() as f64;
        (mean * 10.0).round() / 10.0
    }
}

/// A submitted, dated symptom entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Calendar date, serialized as "YYYY-MM-DD"
    pub date: NaiveDate,
    #[serde(flatten)]
    pub rating: SymptomRating,
    /// Mean of the four ratings, one decimal place
    pub average: f64,
    /// Free-text note, may be empty
    #[serde(default)]
    pub diary: String,
}

impl DailyRecord {
    /// Build a record, computing its average from the rating
    pub fn new(date: NaiveDate, rating: SymptomRating, diary: impl Into<String>) -> Self {
        Self {
            date,
            average: rating.average(),
            rating,
            diary: diary.into(),
        }
    }

    /// Value plotted for a chart series
    pub fn series_value(&self, series: Series) -> f64 {
        match series {
            Series::Symptom(symptom) => self.rating.get(symptom).value() as f64,
            Series::Average => self.average,
        }
    }
}
