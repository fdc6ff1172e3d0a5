//! Date bucketing rules shared by the weekly and demographic reports.
//!
//! Both rules are pure functions of a single date so they can be tested
//! without a record store.

use chrono::{Datelike, NaiveDate};

/// Seven-day segment of a calendar month, counted from the first of the month.
/// The fifth bucket takes whatever is left after day 28.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WeekOfMonth {
    Week1,
    Week2,
    Week3,
    Week4,
    Week5,
}

impl WeekOfMonth {
    /// Bucket a date relative to the start of its own month
    pub fn of(date: NaiveDate) -> Self {
        match date.day0() / 7 {
            0 => WeekOfMonth::Week1,
            1 => WeekOfMonth::Week2,
            2 => WeekOfMonth::Week3,
            3 => WeekOfMonth::Week4,
            _ => WeekOfMonth::Week5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeekOfMonth::Week1 => "Week 1",
            WeekOfMonth::Week2 => "Week 2",
            WeekOfMonth::Week3 => "Week 3",
            WeekOfMonth::Week4 => "Week 4",
            WeekOfMonth::Week5 => "Week 5",
        }
    }
}

/// Fixed demographic brackets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgeBracket {
    From18To29,
    From30To39,
    From40To49,
    From50To59,
    From60To69,
    From70To79,
    From80,
}

impl AgeBracket {
    /// `None` for anyone under 18 (including birth dates in the future)
    pub fn for_age(age: i32) -> Option<Self> {
        match age {
            18..=29 => Some(AgeBracket::From18To29),
            30..=39 => Some(AgeBracket::From30To39),
            40..=49 => Some(AgeBracket::From40To49),
            50..=59 => Some(AgeBracket::From50To59),
            60..=69 => Some(AgeBracket::From60To69),
            70..=79 => Some(AgeBracket::From70To79),
            age if age >= 80 => Some(AgeBracket::From80),
            _ => None,
        }
    }
}

/// Completed years between `date_of_birth` and `today`.
///
/// Negative when the birth date lies in the future. A 29 February birthday
/// is not reached until 1 March in common years.
pub fn age_in_years(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let years = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years - 1
    } else {
        years
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_boundaries() {
        // day offsets 0, 6, 7, 13, 14, 20, 21, 27, 28
        assert_eq!(WeekOfMonth::of(date(2024, 3, 1)), WeekOfMonth::Week1);
        assert_eq!(WeekOfMonth::of(date(2024, 3, 7)), WeekOfMonth::Week1);
        assert_eq!(WeekOfMonth::of(date(2024, 3, 8)), WeekOfMonth::Week2);
        assert_eq!(WeekOfMonth::of(date(2024, 3, 14)), WeekOfMonth::Week2);
        assert_eq!(WeekOfMonth::of(date(2024, 3, 15)), WeekOfMonth::Week3);
        assert_eq!(WeekOfMonth::of(date(2024, 3, 21)), WeekOfMonth::Week3);
        assert_eq!(WeekOfMonth::of(date(2024, 3, 22)), WeekOfMonth::Week4);
        assert_eq!(WeekOfMonth::of(date(2024, 3, 28)), WeekOfMonth::Week4);
        assert_eq!(WeekOfMonth::of(date(2024, 3, 29)), WeekOfMonth::Week5);
        assert_eq!(WeekOfMonth::of(date(2024, 3, 31)), WeekOfMonth::Week5);
    }

    #[test]
    fn test_week_bucket_ignores_month_length() {
        assert_eq!(WeekOfMonth::of(date(2023, 2, 28)), WeekOfMonth::Week4);
        assert_eq!(WeekOfMonth::of(date(2024, 2, 29)), WeekOfMonth::Week5);
        assert_eq!(WeekOfMonth::of(date(2024, 4, 30)), WeekOfMonth::Week5);
    }

    #[test]
    fn test_week_labels_sort_in_week_order() {
        let mut labels: Vec<&str> = [
            WeekOfMonth::Week5,
            WeekOfMonth::Week1,
            WeekOfMonth::Week3,
            WeekOfMonth::Week2,
            WeekOfMonth::Week4,
        ]
        .iter()
        .map(WeekOfMonth::label)
        .collect();
        labels.sort();
        assert_eq!(labels, vec!["Week 1", "Week 2", "Week 3", "Week 4", "Week 5"]);
    }

    #[test]
    fn test_age_in_years() {
        let today = date(2024, 6, 15);
        assert_eq!(age_in_years(date(2000, 6, 15), today), 24);
        assert_eq!(age_in_years(date(2000, 6, 16), today), 23);
        assert_eq!(age_in_years(date(2000, 5, 31), today), 24);
        assert_eq!(age_in_years(date(2025, 1, 1), today), -1);
    }

    #[test]
    fn test_leap_day_birthday() {
        assert_eq!(age_in_years(date(2000, 2, 29), date(2023, 2, 28)), 22);
        assert_eq!(age_in_years(date(2000, 2, 29), date(2023, 3, 1)), 23);
        assert_eq!(age_in_years(date(2000, 2, 29), date(2024, 2, 29)), 24);
    }

    #[test]
    fn test_age_brackets() {
        assert_eq!(AgeBracket::for_age(17), None);
        assert_eq!(AgeBracket::for_age(-1), None);
        assert_eq!(AgeBracket::for_age(18), Some(AgeBracket::From18To29));
        assert_eq!(AgeBracket::for_age(29), Some(AgeBracket::From18To29));
        assert_eq!(AgeBracket::for_age(30), Some(AgeBracket::From30To39));
        assert_eq!(AgeBracket::for_age(59), Some(AgeBracket::From50To59));
        assert_eq!(AgeBracket::for_age(79), Some(AgeBracket::From70To79));
        assert_eq!(AgeBracket::for_age(80), Some(AgeBracket::From80));
        assert_eq!(AgeBracket::for_age(104), Some(AgeBracket::From80));
    }
}
