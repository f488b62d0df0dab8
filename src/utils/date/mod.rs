// Date utility functions

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

/// Last representable moment of the given day
pub fn day_end(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 59)
        .unwrap_or(NaiveDateTime::MIN)
}

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Whole weeks between the Monday-based weeks of the two dates
pub fn weeks_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (week_start(to) - week_start(from)).num_days() / 7
}
