//! Pure queries over loaded collections, used by the display layer.
//!
//! Everything takes `today` explicitly so views stay deterministic and
//! testable; nothing here touches a clock or the stores.

use crate::domain::dates::{format_date_key, parse_date_key, week_dates, week_key, week_start};
use crate::domain::models::{DailyCollection, DailyRecord, WeeklyCollection, WeeklyRecord};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Daily views look back this far and show the newest 7 entries.
pub const DAILY_WINDOW_DAYS: i64 = 60;
pub const DAILY_HISTORY_LIMIT: usize = 7;

/// Weekly views look back half a year; trends show 8 weeks, the
/// dashboard history 4.
pub const WEEKLY_WINDOW_DAYS: i64 = 180;
pub const WEEKLY_TREND_LIMIT: usize = 8;
pub const WEEKLY_HISTORY_LIMIT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyMetric {
    Weight,
    Calories,
    Mood,
}

impl DailyMetric {
    fn value(self, record: &DailyRecord) -> Option<f64> {
        match self {
            Self::Weight => record.weight,
            Self::Calories => record.calories.map(|calories| calories as f64),
            Self::Mood => record.mood.map(f64::from),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeeklyMetric {
    Waist,
    Arm,
}

impl WeeklyMetric {
    fn value(self, record: &WeeklyRecord) -> Option<f64> {
        match self {
            Self::Waist => record.waist,
            Self::Arm => record.arm,
        }
    }
}

/// One point of a trend chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Parses the collection's keys, drops unparsable and out-of-window
/// entries, and returns the newest `limit` dates in ascending order.
pub fn recent_dates<R>(
    collection: &BTreeMap<String, R>,
    today: NaiveDate,
    within_days: i64,
    limit: usize,
) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = collection
        .keys()
        .filter_map(|key| parse_date_key(key).ok())
        .filter(|date| (today - *date).num_days() <= within_days)
        .collect();
    dates.sort_unstable();
    let skip = dates.len().saturating_sub(limit);
    dates.split_off(skip)
}

/// Number of activities completed on one day. Complex activities count
/// through their done flag; measurements never affect the count.
pub fn daily_completion_count(record: &DailyRecord) -> usize {
    record.activities().filter(|(_, value)| value.is_done()).count()
}

pub fn weekly_completion_count(record: &WeeklyRecord) -> usize {
    record.activities().filter(|(_, done)| *done).count()
}

/// Trend series for one daily metric: ascending dates, absent values
/// omitted.
pub fn daily_trend(
    collection: &DailyCollection,
    metric: DailyMetric,
    today: NaiveDate,
    within_days: i64,
    limit: usize,
) -> Vec<TrendPoint> {
    trend_series(collection, today, within_days, limit, |record| {
        metric.value(record)
    })
}

pub fn weekly_trend(
    collection: &WeeklyCollection,
    metric: WeeklyMetric,
    today: NaiveDate,
    within_days: i64,
    limit: usize,
) -> Vec<TrendPoint> {
    trend_series(collection, today, within_days, limit, |record| {
        metric.value(record)
    })
}

fn trend_series<R>(
    collection: &BTreeMap<String, R>,
    today: NaiveDate,
    within_days: i64,
    limit: usize,
    value_of: impl Fn(&R) -> Option<f64>,
) -> Vec<TrendPoint> {
    recent_dates(collection, today, within_days, limit)
        .into_iter()
        .filter_map(|date| {
            let record = collection.get(&format_date_key(date))?;
            let value = value_of(record)?;
            Some(TrendPoint { date, value })
        })
        .collect()
}

/// Week-over-week change of a measurement. Only meaningful when both
/// weeks recorded a positive value; otherwise no comparison is produced.
pub fn diff_from_previous_week(
    collection: &WeeklyCollection,
    week: NaiveDate,
    metric: WeeklyMetric,
) -> Option<f64> {
    let current_start = week_start(week);
    let previous_start = current_start - Duration::weeks(1);

    let current = collection
        .get(&week_key(current_start))
        .and_then(|record| metric.value(record))
        .filter(|value| *value > 0.0)?;
    let previous = collection
        .get(&week_key(previous_start))
        .and_then(|record| metric.value(record))
        .filter(|value| *value > 0.0)?;
    Some(current - previous)
}

/// Days of the given week that have a daily entry.
pub fn days_tracked(collection: &DailyCollection, week: NaiveDate) -> usize {
    week_dates(week)
        .iter()
        .filter(|date| collection.contains_key(&format_date_key(**date)))
        .count()
}

/// Mean completion count over the tracked days of the week, `None` when
/// no day of the week has an entry.
pub fn average_daily_completions(collection: &DailyCollection, week: NaiveDate) -> Option<f64> {
    let counts: Vec<usize> = week_dates(week)
        .iter()
        .filter_map(|date| collection.get(&format_date_key(*date)))
        .map(daily_completion_count)
        .collect();
    if counts.is_empty() {
        return None;
    }
    Some(counts.iter().sum::<usize>() as f64 / counts.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::DailyActivity;
    use crate::domain::models::ActivityValue;

    fn date(value: &str) -> NaiveDate {
        parse_date_key(value).expect("valid date")
    }

    fn record_with_weight(weight: Option<f64>) -> DailyRecord {
        let mut record = DailyRecord::default();
        record.weight = weight;
        record
    }

    fn record_with_waist(waist: Option<f64>) -> WeeklyRecord {
        let mut record = WeeklyRecord::default();
        record.waist = waist;
        record
    }

    #[test]
    fn recent_dates_windows_sorts_and_limits() {
        let mut collection = DailyCollection::new();
        for day in 1..=10 {
            collection.insert(format!("2024-01-{day:02}"), DailyRecord::default());
        }
        collection.insert("garbage".to_string(), DailyRecord::default());
        collection.insert("2023-01-01".to_string(), DailyRecord::default());

        let dates = recent_dates(&collection, date("2024-01-10"), 60, 7);
        let expected: Vec<NaiveDate> = (4..=10)
            .map(|day| date(&format!("2024-01-{day:02}")))
            .collect();
        assert_eq!(dates, expected);
    }

    #[test]
    fn daily_completion_counts_flags_not_measurements() {
        let mut record = DailyRecord::default();
        record
            .set_activity(DailyActivity::Jung, ActivityValue::Boolean(true))
            .expect("set jung");
        record
            .set_activity(DailyActivity::English, ActivityValue::Boolean(false))
            .expect("set english");
        record
            .set_activity(
                DailyActivity::Exercise,
                ActivityValue::Complex {
                    done: true,
                    amount: Some(30),
                },
            )
            .expect("set exercise");

        assert_eq!(daily_completion_count(&record), 2);
    }

    #[test]
    fn weekly_completion_counts_set_flags() {
        use crate::domain::catalog::WeeklyActivity;
        let mut record = WeeklyRecord::default();
        record.set_activity(WeeklyActivity::Housework, true);
        record.set_activity(WeeklyActivity::EatingOut, false);
        assert_eq!(weekly_completion_count(&record), 1);
    }

    #[test]
    fn trend_omits_absent_values_and_ascends() {
        let collection = DailyCollection::from([
            ("2024-03-08".to_string(), record_with_weight(Some(61.0))),
            ("2024-03-09".to_string(), record_with_weight(None)),
            ("2024-03-10".to_string(), record_with_weight(Some(60.4))),
        ]);

        let series = daily_trend(
            &collection,
            DailyMetric::Weight,
            date("2024-03-10"),
            DAILY_WINDOW_DAYS,
            DAILY_HISTORY_LIMIT,
        );
        assert_eq!(
            series,
            vec![
                TrendPoint {
                    date: date("2024-03-08"),
                    value: 61.0,
                },
                TrendPoint {
                    date: date("2024-03-10"),
                    value: 60.4,
                },
            ]
        );
    }

    #[test]
    fn trend_respects_the_limit_window() {
        let mut collection = DailyCollection::new();
        for day in 1..=10 {
            collection.insert(
                format!("2024-01-{day:02}"),
                record_with_weight(Some(60.0 + day as f64 / 10.0)),
            );
        }

        let series = daily_trend(
            &collection,
            DailyMetric::Weight,
            date("2024-01-10"),
            DAILY_WINDOW_DAYS,
            DAILY_HISTORY_LIMIT,
        );
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, date("2024-01-04"));
        assert_eq!(series[6].date, date("2024-01-10"));
    }

    #[test]
    fn weekly_diff_requires_both_positive_values() {
        let week = date("2024-03-11");
        let previous = date("2024-03-04");
        let mut collection = WeeklyCollection::from([
            (week_key(week), record_with_waist(Some(71.0))),
            (week_key(previous), record_with_waist(Some(72.5))),
        ]);

        let diff = diff_from_previous_week(&collection, week, WeeklyMetric::Waist)
            .expect("both weeks present");
        assert!((diff - (-1.5)).abs() < 1e-9);

        // A zero on either side means the measurement was never taken.
        collection
            .get_mut(&week_key(previous))
            .expect("previous week")
            .waist = Some(0.0);
        assert_eq!(
            diff_from_previous_week(&collection, week, WeeklyMetric::Waist),
            None
        );

        collection.remove(&week_key(previous));
        assert_eq!(
            diff_from_previous_week(&collection, week, WeeklyMetric::Waist),
            None
        );
    }

    #[test]
    fn weekly_diff_accepts_any_day_of_the_week() {
        let mut current_record = WeeklyRecord::default();
        current_record.arm = Some(28.0);
        let mut previous_record = WeeklyRecord::default();
        previous_record.arm = Some(28.5);
        let collection = WeeklyCollection::from([
            ("2024-03-11".to_string(), current_record),
            ("2024-03-04".to_string(), previous_record),
        ]);

        // Thursday of the target week resolves to the same Monday key.
        let diff = diff_from_previous_week(&collection, date("2024-03-14"), WeeklyMetric::Arm)
            .expect("resolved via week start");
        assert!((diff - (-0.5)).abs() < 1e-9);
    }

    #[test]
    fn days_tracked_and_average_over_one_week() {
        let mut monday_record = DailyRecord::default();
        monday_record
            .set_activity(DailyActivity::Drawing, ActivityValue::Boolean(true))
            .expect("set drawing");
        monday_record
            .set_activity(DailyActivity::Friends, ActivityValue::Boolean(true))
            .expect("set friends");
        let mut wednesday_record = DailyRecord::default();
        wednesday_record
            .set_activity(DailyActivity::Writing, ActivityValue::Boolean(true))
            .expect("set writing");

        let collection = DailyCollection::from([
            ("2024-03-11".to_string(), monday_record),
            ("2024-03-13".to_string(), wednesday_record),
            // Outside the week under inspection.
            ("2024-03-04".to_string(), DailyRecord::default()),
        ]);

        let week = date("2024-03-12");
        assert_eq!(days_tracked(&collection, week), 2);
        let average = average_daily_completions(&collection, week).expect("tracked days");
        assert!((average - 1.5).abs() < 1e-9);

        let empty_week = date("2024-06-03");
        assert_eq!(days_tracked(&collection, empty_week), 0);
        assert_eq!(average_daily_completions(&collection, empty_week), None);
    }
}
