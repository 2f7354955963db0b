//! Entry draft
//!
//! The in-progress, not-yet-submitted entry. Input controls write into it
//! through `DraftUpdate`; submission turns it into a `DailyRecord`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::types::{DailyRecord, Rating, Symptom, SymptomRating};

/// A single input event against the draft
#[derive(Debug, Clone, PartialEq)]
pub enum DraftUpdate {
    /// Slider moved for one symptom
    Rating(Symptom, Rating),
    /// Stool checkbox
    Stool(bool),
    /// Period checkbox
    Period(bool),
    /// Diary text replaced
    Diary(String),
    /// Date picker changed
    Date(NaiveDate),
}

/// The editable entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub rating: SymptomRating,
    pub diary: String,
    pub date: NaiveDate,
}

impl Draft {
    /// Empty draft dated `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            rating: SymptomRating::default(),
            diary: String::new(),
            date: today,
        }
    }

    pub fn apply(&mut self, update: DraftUpdate) {
        match update {
            DraftUpdate::Rating(symptom, rating) => self.rating.set(symptom, rating),
            DraftUpdate::Stool(value) => self.rating.stool = value,
            DraftUpdate::Period(value) => self.rating.period = value,
            DraftUpdate::Diary(text) => self.diary = text,
            DraftUpdate::Date(date) => self.date = date,
        }
    }

    /// Turn the draft into a record, leaving an empty draft dated `today`
    pub fn take_record(&mut self, today: NaiveDate) -> DailyRecord {
        let draft = std::mem::replace(self, Draft::new(today));
        DailyRecord::new(draft.date, draft.rating, draft.diary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        crate::tracker::types::parse_date(s).unwrap()
    }

    #[test]
    fn test_apply_updates() {
        let mut draft = Draft::new(date("2024-03-15"));

        draft.apply(DraftUpdate::Rating(Symptom::Pain, Rating::new(7).unwrap()));
        draft.apply(DraftUpdate::Period(true));
        draft.apply(DraftUpdate::Diary("cramps".to_string()));
        draft.apply(DraftUpdate::Date(date("2024-03-14")));

        assert_eq!(draft.rating.pain.value(), 7);
        assert_eq!(draft.rating.fatigue, Rating::MIN);
        assert!(draft.rating.period);
        assert!(!draft.rating.stool);
        assert_eq!(draft.diary, "cramps");
        assert_eq!(draft.date, date("2024-03-14"));
    }

    #[test]
    fn test_take_record_resets() {
        let mut draft = Draft::new(date("2024-03-10"));
        draft.apply(DraftUpdate::Rating(Symptom::Fatigue, Rating::new(4).unwrap()));
        draft.apply(DraftUpdate::Stool(true));
        draft.apply(DraftUpdate::Diary("ok".to_string()));

        let record = draft.take_record(date("2024-03-15"));

        assert_eq!(record.date, date("2024-03-10"));
        assert_eq!(record.average, 1.0);
        assert!(record.rating.stool);
        assert_eq!(record.diary, "ok");
        assert_eq!(draft, Draft::new(date("2024-03-15")));
    }
}
