//! Calendar intervals for normalized timex values

use caevo_domain::{Relation, Timex, TimexType};
use chrono::{Days, Duration, Months, NaiveDate, NaiveDateTime, Weekday};
use std::cmp::Ordering;

/// A half-open span of calendar time `[start, end)`
///
/// # Examples
///
/// ```
/// use caevo_domain::Relation;
/// use caevo_sieve::TimeInterval;
///
/// let year = TimeInterval::parse("1998", None).unwrap();
/// let day = TimeInterval::parse("1998-01-08", None).unwrap();
/// assert_eq!(year.relation_to(&day), Some(Relation::Includes));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    /// First instant covered
    pub start: NaiveDateTime,
    /// First instant after the span
    pub end: NaiveDateTime,
}

impl TimeInterval {
    /// Build an interval, `None` unless `start < end`
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// The whole of one calendar day
    pub fn day(date: NaiveDate) -> Option<Self> {
        let next = date.checked_add_days(Days::new(1))?;
        Self::new(date.and_hms_opt(0, 0, 0)?, next.and_hms_opt(0, 0, 0)?)
    }

    /// Interval of a normalized value
    ///
    /// Understands `YYYY`, `YYYY-MM`, `YYYY-Qn`, `YYYY-Www`, `YYYY-MM-DD` and
    /// `YYYY-MM-DDTHH[:MM[:SS]]`. `PRESENT_REF` resolves to the creation day
    /// when one is given. Anything else (durations, sets, decades, fuzzy
    /// references) has no interval.
    pub fn parse(value: &str, dct: Option<NaiveDate>) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("PRESENT_REF") {
            return dct.and_then(Self::day);
        }

        let (date_part, time_part) = match value.split_once('T') {
            Some((date, time)) => (date, Some(time)),
            None => (value, None),
        };
        let fields: Vec<&str> = date_part.split('-').collect();
        let year = parse_digits(fields.first()?, 4)? as i32;

        match (fields.as_slice(), time_part) {
            ([_], None) => {
                let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
                span_months(start, 12)
            }
            ([_, second], None) if second.starts_with('Q') => {
                let quarter = parse_digits(&second[1..], 1)?;
                if !(1..=4).contains(&quarter) {
                    return None;
                }
                let start = NaiveDate::from_ymd_opt(year, (quarter - 1) * 3 + 1, 1)?;
                span_months(start, 3)
            }
            ([_, second], None) if second.starts_with('W') => {
                let week = parse_digits(&second[1..], 2)?;
                let start = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)?;
                let end = start.checked_add_days(Days::new(7))?;
                Self::new(start.and_hms_opt(0, 0, 0)?, end.and_hms_opt(0, 0, 0)?)
            }
            ([_, month], None) => {
                let start = NaiveDate::from_ymd_opt(year, parse_digits(month, 2)?, 1)?;
                span_months(start, 1)
            }
            ([_, month, day], time) => {
                let date = NaiveDate::from_ymd_opt(year, parse_digits(month, 2)?, parse_digits(day, 2)?)?;
                match time {
                    None => Self::day(date),
                    Some(time) => parse_time(date, time),
                }
            }
            _ => None,
        }
    }

    /// Interval of a timex, `None` for durations and sets
    pub fn of_timex(timex: &Timex, dct: Option<NaiveDate>) -> Option<Self> {
        match timex.timex_type {
            TimexType::Duration | TimexType::Set => None,
            TimexType::Date | TimexType::Time => Self::parse(&timex.value, dct),
        }
    }

    /// Relation from `self` to `other` by endpoint comparison
    ///
    /// Partial overlaps give VAGUE. Shared start or end points with unequal
    /// spans give nothing.
    pub fn relation_to(&self, other: &TimeInterval) -> Option<Relation> {
        let start_start = self.start.cmp(&other.start);
        let start_end = self.start.cmp(&other.end);
        let end_start = self.end.cmp(&other.start);
        let end_end = self.end.cmp(&other.end);

        use Ordering::{Equal, Greater, Less};
        match (start_start, end_end) {
            (Equal, Equal) => Some(Relation::Simultaneous),
            _ if end_start != Greater => Some(Relation::Before),
            _ if start_end != Less => Some(Relation::After),
            (Less, Greater) => Some(Relation::Includes),
            (Greater, Less) => Some(Relation::IsIncluded),
            (Greater, Greater) | (Less, Less) => Some(Relation::Vague),
            _ => None,
        }
    }
}

/// The calendar day of a creation time value such as `1998-01-08T03:00`
pub fn creation_day(value: &str) -> Option<NaiveDate> {
    let day = value.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn span_months(start: NaiveDate, months: u32) -> Option<TimeInterval> {
    let end = start.checked_add_months(Months::new(months))?;
    TimeInterval::new(start.and_hms_opt(0, 0, 0)?, end.and_hms_opt(0, 0, 0)?)
}

fn parse_time(date: NaiveDate, time: &str) -> Option<TimeInterval> {
    let fields: Vec<&str> = time.split(':').collect();
    let hour = parse_digits(fields.first()?, 2)?;
    let (start, length) = match fields.as_slice() {
        [_] => (date.and_hms_opt(hour, 0, 0)?, Duration::hours(1)),
        [_, minute] => (date.and_hms_opt(hour, parse_digits(minute, 2)?, 0)?, Duration::minutes(1)),
        [_, minute, second] => (
            date.and_hms_opt(hour, parse_digits(minute, 2)?, parse_digits(second, 2)?)?,
            Duration::seconds(1),
        ),
        _ => return None,
    };
    TimeInterval::new(start, start.checked_add_signed(length)?)
}

fn parse_digits(text: &str, width: usize) -> Option<u32> {
    if text.len() != width || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn value() -> impl Strategy<Value = String> {
        prop_oneof![
            (1990i32..2000).prop_map(|y| format!("{y}")),
            (1990i32..2000, 1u32..13).prop_map(|(y, m)| format!("{y}-{m:02}")),
            (1990i32..2000, 1u32..13, 1u32..29).prop_map(|(y, m, d)| format!("{y}-{m:02}-{d:02}")),
            (1990i32..2000, 1u32..5).prop_map(|(y, q)| format!("{y}-Q{q}")),
        ]
    }

    proptest! {
        /// Property: swapping the intervals inverts the relation
        #[test]
        fn test_relation_inverts(a in value(), b in value()) {
            let x = TimeInterval::parse(&a, None).unwrap();
            let y = TimeInterval::parse(&b, None).unwrap();
            prop_assert_eq!(x.relation_to(&y).map(|r| r.invert()), y.relation_to(&x));
        }
    }
}
