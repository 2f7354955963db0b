//! View state: chart window, series visibility, displayed month
//!
//! These are plain values replaced wholesale by the state manager. None of
//! them has a transition graph; the window and the month are independent.

use chrono::{Datelike, NaiveDate};
use clap::builder::PossibleValue;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::{TrackerError, TrackerResult};
use super::types::Symptom;

/// Trailing time span shown on the chart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum ChartWindow {
    #[serde(rename = "1week")]
    #[value(name = "1week", aliases = ["1w", "7d"])]
    OneWeek,
    #[default]
    #[serde(rename = "2weeks")]
    #[value(name = "2weeks", aliases = ["2w", "14d"])]
    TwoWeeks,
    #[serde(rename = "1month")]
    #[value(name = "1month", aliases = ["1m", "30d"])]
    OneMonth,
    #[serde(rename = "1year")]
    #[value(name = "1year", aliases = ["1y", "365d"])]
    OneYear,
}

impl ChartWindow {
    pub fn all() -> &'static [ChartWindow] {
        &[
            ChartWindow::OneWeek,
            ChartWindow::TwoWeeks,
            ChartWindow::OneMonth,
            ChartWindow::OneYear,
        ]
    }

    /// Length of the window in days
    pub fn days(&self) -> i64 {
        match self {
            ChartWindow::OneWeek => 7,
            ChartWindow::TwoWeeks => 14,
            ChartWindow::OneMonth => 30,
            ChartWindow::OneYear => 365,
        }
    }

    /// Identifier used in config files and commands
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartWindow::OneWeek => "1week",
            ChartWindow::TwoWeeks => "2weeks",
            ChartWindow::OneMonth => "1month",
            ChartWindow::OneYear => "1year",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ChartWindow::OneWeek => "1 week",
            ChartWindow::TwoWeeks => "2 weeks",
            ChartWindow::OneMonth => "1 month",
            ChartWindow::OneYear => "1 year",
        }
    }
}

impl std::fmt::Display for ChartWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ChartWindow {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1week" | "1w" | "7d" => Ok(ChartWindow::OneWeek),
            "2weeks" | "2w" | "14d" => Ok(ChartWindow::TwoWeeks),
            "1month" | "1m" | "30d" => Ok(ChartWindow::OneMonth),
            "1year" | "1y" | "365d" => Ok(ChartWindow::OneYear),
            _ => Err(TrackerError::UnknownWindow(s.to_string())),
        }
    }
}

/// One plotted chart line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Series {
    Symptom(Symptom),
    Average,
}

impl Series {
    /// All series in legend order
    pub fn all() -> [Series; 5] {
        [
            Series::Symptom(Symptom::Fatigue),
            Series::Symptom(Symptom::Pain),
            Series::Symptom(Symptom::Headache),
            Series::Symptom(Symptom::Heart),
            Series::Average,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Series::Symptom(symptom) => symptom.as_str(),
            Series::Average => "average",
        }
    }
}

impl std::fmt::Display for Series {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Series {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("average") {
            return Ok(Series::Average);
        }
        s.parse::<Symptom>()
            .map(Series::Symptom)
            .map_err(|_| TrackerError::UnknownSeries(s.to_string()))
    }
}

impl ValueEnum for Series {
    fn value_variants<'a>() -> &'a [Self] {
        &[
            Series::Symptom(Symptom::Fatigue),
            Series::Symptom(Symptom::Pain),
            Series::Symptom(Symptom::Headache),
            Series::Symptom(Symptom::Heart),
            Series::Average,
        ]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(PossibleValue::new(self.as_str()))
    }
}

impl From<Symptom> for Series {
    fn from(symptom: Symptom) -> Self {
        Series::Symptom(symptom)
    }
}

/// Per-series line visibility on the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesVisibility {
    pub fatigue: bool,
    pub pain: bool,
    pub headache: bool,
    pub heart: bool,
    pub average: bool,
}

impl Default for SeriesVisibility {
    fn default() -> Self {
        Self {
            fatigue: true,
            pain: true,
            headache: true,
            heart: true,
            average: true,
        }
    }
}

impl SeriesVisibility {
    fn flag_mut(&mut self, series: Series) -> &mut bool {
        match series {
            Series::Symptom(Symptom::Fatigue) => &mut self.fatigue,
            Series::Symptom(Symptom::Pain) => &mut self.pain,
            Series::Symptom(Symptom::Headache) => &mut self.headache,
            Series::Symptom(Symptom::Heart) => &mut self.heart,
            Series::Average => &mut self.average,
        }
    }

    pub fn is_visible(&self, series: Series) -> bool {
        match series {
            Series::Symptom(Symptom::Fatigue) => self.fatigue,
            Series::Symptom(Symptom::Pain) => self.pain,
            Series::Symptom(Symptom::Headache) => self.headache,
            Series::Symptom(Symptom::Heart) => self.heart,
            Series::Average => self.average,
        }
    }

    pub fn set(&mut self, series: Series, visible: bool) {
        *self.flag_mut(series) = visible;
    }

    /// Flip one flag, returning the new value
    pub fn toggle(&mut self, series: Series) -> bool {
        let flag = self.flag_mut(series);
        *flag = !*flag;
        *flag
    }

    /// Visible series in legend order
    pub fn visible(&self) -> Vec<Series> {
        Series::all()
            .into_iter()
            .filter(|s| self.is_visible(*s))
            .collect()
    }
}

// One year of margin on each side keeps the padded calendar grid inside
// chrono's representable range.
fn min_year() -> i32 {
    NaiveDate::MIN.year() + 1
}

fn max_year() -> i32 {
    NaiveDate::MAX.year() - 1
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// The calendar month currently displayed (year + month, 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "MonthFields")]
pub struct DisplayMonth {
    year: i32,
    month: u32,
}

/// Unchecked wire form of a `DisplayMonth`
#[derive(Deserialize)]
struct MonthFields {
    year: i32,
    month: u32,
}

impl TryFrom<MonthFields> for DisplayMonth {
    type Error = TrackerError;

    fn try_from(fields: MonthFields) -> Result<Self, Self::Error> {
        DisplayMonth::new(fields.year, fields.month)
    }
}

impl DisplayMonth {
    /// Create a month, rejecting months outside 1-12 and years chrono
    /// cannot represent
    pub fn new(year: i32, month: u32) -> TrackerResult<Self> {
        if !(1..=12).contains(&month) || !(min_year()..=max_year()).contains(&year) {
            return Err(TrackerError::InvalidMonth { year, month });
        }
        Ok(Self { year, month })
    }

    /// The month containing a date
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
        .shift(0)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Shift by `delta` months, wrapping year boundaries
    ///
    /// Saturates at the edges of chrono's calendar range.
    pub fn shift(&self, delta: i32) -> Self {
        let lowest = min_year() as i64 * 12;
        let highest = max_year() as i64 * 12 + 11;
        let index = (self.year as i64 * 12 + (self.month as i64 - 1) + delta as i64)
            .clamp(lowest, highest);
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// First day of the month
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Number of days in the month
    pub fn days_in_month(&self) -> u32 {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|next| (next - self.first_day()).num_days() as u32)
            .unwrap_or(31)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Title such as "March 2024"
    pub fn title(&self) -> String {
        let name = MONTH_NAMES
            .get(self.month.wrapping_sub(1) as usize)
            .unwrap_or(&"Unknown");
        format!("{} {}", name, self.year)
    }
}

impl std::fmt::Display for DisplayMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(year: i32, month: u32) -> DisplayMonth {
        DisplayMonth::new(year, month).unwrap()
    }

    #[test]
    fn test_window_days() {
        let days: Vec<i64> = ChartWindow::all().iter().map(|w| w.days()).collect();
        assert_eq!(days, vec![7, 14, 30, 365]);
        assert_eq!(ChartWindow::default(), ChartWindow::TwoWeeks);
    }

    #[test]
    fn test_window_parsing() {
        assert_eq!("1week".parse::<ChartWindow>().unwrap(), ChartWindow::OneWeek);
        assert_eq!("1Y".parse::<ChartWindow>().unwrap(), ChartWindow::OneYear);
        assert!(matches!(
            "3weeks".parse::<ChartWindow>(),
            Err(TrackerError::UnknownWindow(_))
        ));

        let json = serde_json::to_string(&ChartWindow::OneMonth).unwrap();
        assert_eq!(json, "\"1month\"");
    }

    #[test]
    fn test_series_parsing() {
        assert_eq!("average".parse::<Series>().unwrap(), Series::Average);
        assert_eq!(
            "pain".parse::<Series>().unwrap(),
            Series::Symptom(Symptom::Pain)
        );
        assert!(matches!(
            "stool".parse::<Series>(),
            Err(TrackerError::UnknownSeries(_))
        ));
    }

    #[test]
    fn test_series_value_names() {
        let names: Vec<String> = Series::value_variants()
            .iter()
            .filter_map(|s| s.to_possible_value())
            .map(|v| v.get_name().to_string())
            .collect();
        assert_eq!(names, vec!["fatigue", "pain", "headache", "heart", "average"]);
        assert_eq!(
            <Series as ValueEnum>::from_str("Average", true).unwrap(),
            Series::Average
        );
        assert_eq!(
            <ChartWindow as ValueEnum>::from_str("7d", false).unwrap(),
            ChartWindow::OneWeek
        );
    }

    #[test]
    fn test_visibility_toggle_twice_restores() {
        for series in Series::all() {
            let mut visibility = SeriesVisibility::default();
            let original = visibility;

            assert!(!visibility.toggle(series));
            assert!(!visibility.is_visible(series));
            assert_ne!(visibility, original);

            assert!(visibility.toggle(series));
            assert_eq!(visibility, original);
        }
    }

    #[test]
    fn test_visibility_flags_are_independent() {
        let mut visibility = SeriesVisibility::default();
        visibility.set(Series::Symptom(Symptom::Heart), false);

        assert_eq!(visibility.visible().len(), 4);
        assert!(!visibility.visible().contains(&Series::Symptom(Symptom::Heart)));
        assert!(visibility.is_visible(Series::Average));
    }

    #[test]
    fn test_month_navigation() {
        assert_eq!(month(2024, 3).shift(-1), month(2024, 2));
        assert_eq!(month(2024, 1).shift(-1), month(2023, 12));
        assert_eq!(month(2023, 12).shift(1), month(2024, 1));
        assert_eq!(month(2024, 5).shift(-17), month(2022, 12));
        assert_eq!(month(2024, 5).shift(0), month(2024, 5));
    }

    #[test]
    fn test_month_validation() {
        assert!(DisplayMonth::new(2024, 0).is_err());
        assert!(DisplayMonth::new(2024, 13).is_err());
        assert!(DisplayMonth::new(i32::MAX, 1).is_err());
    }

    #[test]
    fn test_month_deserialization_validates() {
        let restored: DisplayMonth =
            serde_json::from_str(r#"{"year":2024,"month":3}"#).unwrap();
        assert_eq!(restored, month(2024, 3));

        assert!(serde_json::from_str::<DisplayMonth>(r#"{"year":2024,"month":13}"#).is_err());
        assert!(serde_json::from_str::<DisplayMonth>(r#"{"year":2024,"month":0}"#).is_err());
    }

    #[test]
    fn test_month_shift_saturates() {
        let far = month(2024, 1).shift(i32::MAX);
        assert_eq!(far.year(), NaiveDate::MAX.year() - 1);
        assert_eq!(far.month(), 12);
        assert_eq!(far.first_day().day(), 1);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(month(2024, 2).days_in_month(), 29);
        assert_eq!(month(2023, 2).days_in_month(), 28);
        assert_eq!(month(2024, 12).days_in_month(), 31);
        assert_eq!(month(2024, 4).days_in_month(), 30);
    }

    #[test]
    fn test_month_title() {
        assert_eq!(month(2024, 3).title(), "March 2024");
        assert_eq!(month(2024, 3).to_string(), "2024-03");
    }
}
