//! Calendar-date arithmetic shared by every view.
//!
//! All functions work on plain calendar dates; there is no timezone
//! handling anywhere in this module.

use crate::infrastructure::error::TrackerError;
use chrono::{Datelike, Duration, NaiveDate};

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Sunday of the week containing `date`.
pub fn week_end(date: NaiveDate) -> NaiveDate {
    week_start(date) + Duration::days(6)
}

/// The 7 consecutive dates of the week containing `date`, Monday first.
pub fn week_dates(date: NaiveDate) -> [NaiveDate; 7] {
    let start = week_start(date);
    std::array::from_fn(|offset| start + Duration::days(offset as i64))
}

/// The canonical weekly-collection key for the week containing `date`.
///
/// Weekly records are keyed by their Monday; this is the only supported
/// way to derive that key.
pub fn week_key(date: NaiveDate) -> String {
    format_date_key(week_start(date))
}

/// Month layout as rows of 7 cells, Monday..Sunday.
///
/// Cells before the 1st and after the last day of the month are `None`.
/// Returns `None` for an invalid year/month combination.
pub fn month_grid(year: i32, month: u32) -> Option<Vec<[Option<NaiveDate>; 7]>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let days_in_month = (next_month - first).num_days();

    let mut rows = Vec::new();
    let mut row: [Option<NaiveDate>; 7] = [None; 7];
    let mut column = first.weekday().num_days_from_monday() as usize;
    for day in 0..days_in_month {
        row[column] = Some(first + Duration::days(day));
        column += 1;
        if column == 7 {
            rows.push(row);
            row = [None; 7];
            column = 0;
        }
    }
    if column > 0 {
        rows.push(row);
    }
    Some(rows)
}

/// The `n` dates ending at `end`, newest first.
///
/// Callers that want chronological order reverse the result.
pub fn last_n_days(n: usize, end: NaiveDate) -> Vec<NaiveDate> {
    (0..n)
        .map(|offset| end - Duration::days(offset as i64))
        .collect()
}

/// The Monday dates of the `n` weeks ending at `week_start(end)`, newest first.
pub fn last_n_weeks(n: usize, end: NaiveDate) -> Vec<NaiveDate> {
    let start = week_start(end);
    (0..n)
        .map(|offset| start - Duration::weeks(offset as i64))
        .collect()
}

/// Strict ISO `YYYY-MM-DD` parse of a persisted date key.
pub fn parse_date_key(key: &str) -> Result<NaiveDate, TrackerError> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT)
        .map_err(|_| TrackerError::InvalidDateKey(key.to_string()))
}

pub fn format_date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}
