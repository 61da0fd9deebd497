//! Persisted record models and their wire format.
//!
//! Documents on disk and in the gist are flat JSON objects per date:
//! metrics and notes under fixed keys, activity flags under their catalog
//! id, and complex measurements under `exercise_time` /
//! `thesis_wordcount`. The typed records bridge to that format through
//! raw mirror structs; catalog validation happens during the conversion,
//! so a type-mismatched known key fails deserialization of the document.

use crate::domain::catalog::{ActivityKind, DailyActivity, WeeklyActivity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// All records of one kind, keyed by ISO date string.
///
/// Keys are kept as strings on purpose: an unparsable key survives a
/// load and is skipped during aggregation instead of poisoning the
/// whole document.
pub type DailyCollection = BTreeMap<String, DailyRecord>;
pub type WeeklyCollection = BTreeMap<String, WeeklyRecord>;

/// Recorded value of one activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityValue {
    Boolean(bool),
    Complex { done: bool, amount: Option<u32> },
}

impl ActivityValue {
    /// Whether the activity counts as completed. Measurements never
    /// affect this.
    pub fn is_done(&self) -> bool {
        match self {
            Self::Boolean(done) => *done,
            Self::Complex { done, .. } => *done,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDailyRecord", into = "RawDailyRecord")]
pub struct DailyRecord {
    pub weight: Option<f64>,
    pub calories: Option<i64>,
    pub mood: Option<u8>,
    pub notes: String,
    activities: BTreeMap<DailyActivity, ActivityValue>,
}

impl DailyRecord {
    pub fn activity(&self, activity: DailyActivity) -> Option<&ActivityValue> {
        self.activities.get(&activity)
    }

    /// Record an activity value, rejecting a shape the catalog does not
    /// allow for this activity.
    pub fn set_activity(
        &mut self,
        activity: DailyActivity,
        value: ActivityValue,
    ) -> Result<(), String> {
        let shape_matches = matches!(
            (activity.kind(), &value),
            (ActivityKind::Boolean, ActivityValue::Boolean(_))
                | (ActivityKind::Complex { .. }, ActivityValue::Complex { .. })
        );
        if !shape_matches {
            return Err(format!(
                "activity '{}' does not accept this value shape",
                activity.id()
            ));
        }
        self.activities.insert(activity, value);
        Ok(())
    }

    pub fn activities(&self) -> impl Iterator<Item = (DailyActivity, &ActivityValue)> {
        self.activities
            .iter()
            .map(|(activity, value)| (*activity, value))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWeeklyRecord", into = "RawWeeklyRecord")]
pub struct WeeklyRecord {
    pub waist: Option<f64>,
    pub arm: Option<f64>,
    pub notes: String,
    activities: BTreeMap<WeeklyActivity, bool>,
}

impl WeeklyRecord {
    pub fn activity(&self, activity: WeeklyActivity) -> Option<bool> {
        self.activities.get(&activity).copied()
    }

    pub fn set_activity(&mut self, activity: WeeklyActivity, done: bool) {
        self.activities.insert(activity, done);
    }

    pub fn activities(&self) -> impl Iterator<Item = (WeeklyActivity, bool)> {
        self.activities
            .iter()
            .map(|(activity, done)| (*activity, *done))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawDailyRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    calories: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mood: Option<u8>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    notes: String,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_json::Value>,
}

impl TryFrom<RawDailyRecord> for DailyRecord {
    type Error = String;

    fn try_from(raw: RawDailyRecord) -> Result<Self, Self::Error> {
        if let Some(mood) = raw.mood {
            if !(1..=5).contains(&mood) {
                return Err(format!("mood {mood} is outside the 1..=5 scale"));
            }
        }

        let mut activities = BTreeMap::new();
        for activity in DailyActivity::ALL {
            let flag = read_flag(&raw.extra, activity.id())?;
            match activity.kind() {
                ActivityKind::Boolean => {
                    if let Some(done) = flag {
                        activities.insert(activity, ActivityValue::Boolean(done));
                    }
                }
                ActivityKind::Complex { .. } => {
                    let Some(key) = activity.measurement_key() else {
                        continue;
                    };
                    let amount = read_amount(&raw.extra, key)?;
                    if flag.is_some() || amount.is_some() {
                        activities.insert(
                            activity,
                            ActivityValue::Complex {
                                done: flag.unwrap_or(false),
                                amount,
                            },
                        );
                    }
                }
            }
        }
        // Keys outside the catalog are dropped here; the catalog is closed.

        Ok(Self {
            weight: raw.weight,
            calories: raw.calories,
            mood: raw.mood,
            notes: raw.notes,
            activities,
        })
    }
}

impl From<DailyRecord> for RawDailyRecord {
    fn from(record: DailyRecord) -> Self {
        let mut extra = BTreeMap::new();
        for (activity, value) in &record.activities {
            match value {
                ActivityValue::Boolean(done) => {
                    extra.insert(activity.id().to_string(), serde_json::Value::from(*done));
                }
                ActivityValue::Complex { done, amount } => {
                    extra.insert(activity.id().to_string(), serde_json::Value::from(*done));
                    if let (Some(amount), Some(key)) = (amount, activity.measurement_key()) {
                        extra.insert(key.to_string(), serde_json::Value::from(*amount));
                    }
                }
            }
        }

        Self {
            weight: record.weight,
            calories: record.calories,
            mood: record.mood,
            notes: record.notes,
            extra,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawWeeklyRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    waist: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    arm: Option<f64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    notes: String,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_json::Value>,
}

impl TryFrom<RawWeeklyRecord> for WeeklyRecord {
    type Error = String;

    fn try_from(raw: RawWeeklyRecord) -> Result<Self, Self::Error> {
        let mut activities = BTreeMap::new();
        for activity in WeeklyActivity::ALL {
            if let Some(done) = read_flag(&raw.extra, activity.id())? {
                activities.insert(activity, done);
            }
        }

        Ok(Self {
            waist: raw.waist,
            arm: raw.arm,
            notes: raw.notes,
            activities,
        })
    }
}

impl From<WeeklyRecord> for RawWeeklyRecord {
    fn from(record: WeeklyRecord) -> Self {
        let extra = record
            .activities
            .iter()
            .map(|(activity, done)| (activity.id().to_string(), serde_json::Value::from(*done)))
            .collect();

        Self {
            waist: record.waist,
            arm: record.arm,
            notes: record.notes,
            extra,
        }
    }
}

fn read_flag(
    extra: &BTreeMap<String, serde_json::Value>,
    key: &str,
) -> Result<Option<bool>, String> {
    match extra.get(key) {
        None => Ok(None),
        Some(serde_json::Value::Bool(done)) => Ok(Some(*done)),
        Some(other) => Err(format!("activity '{key}' must be a boolean, got {other}")),
    }
}

fn read_amount(
    extra: &BTreeMap<String, serde_json::Value>,
    key: &str,
) -> Result<Option<u32>, String> {
    match extra.get(key) {
        None => Ok(None),
        Some(value) => match value.as_u64().and_then(|amount| u32::try_from(amount).ok()) {
            Some(amount) => Ok(Some(amount)),
            None => Err(format!(
                "'{key}' must be a non-negative integer, got {value}"
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_daily_record() -> DailyRecord {
        let mut record = DailyRecord {
            weight: Some(60.5),
            calories: Some(1800),
            mood: Some(4),
            notes: "slept well".to_string(),
            ..DailyRecord::default()
        };
        record
            .set_activity(DailyActivity::Jung, ActivityValue::Boolean(true))
            .expect("boolean activity");
        record
            .set_activity(DailyActivity::English, ActivityValue::Boolean(false))
            .expect("boolean activity");
        record
            .set_activity(
                DailyActivity::Exercise,
                ActivityValue::Complex {
                    done: true,
                    amount: Some(30),
                },
            )
            .expect("complex activity");
        record
    }

    fn sample_weekly_record() -> WeeklyRecord {
        let mut record = WeeklyRecord {
            waist: Some(72.0),
            arm: Some(28.5),
            notes: "steady".to_string(),
            ..WeeklyRecord::default()
        };
        record.set_activity(WeeklyActivity::Housework, true);
        record.set_activity(WeeklyActivity::EatingOut, false);
        record
    }

    #[test]
    fn daily_record_serializes_to_flat_wire_format() {
        let json = serde_json::to_value(sample_daily_record()).expect("serialize daily");
        assert_eq!(json["weight"], 60.5);
        assert_eq!(json["calories"], 1800);
        assert_eq!(json["mood"], 4);
        assert_eq!(json["notes"], "slept well");
        assert_eq!(json["jung"], true);
        assert_eq!(json["english"], false);
        assert_eq!(json["exercise"], true);
        assert_eq!(json["exercise_time"], 30);
    }

    #[test]
    fn daily_record_round_trips() {
        let record = sample_daily_record();
        let round_trip: DailyRecord =
            serde_json::from_str(&serde_json::to_string(&record).expect("serialize"))
                .expect("deserialize");
        assert_eq!(round_trip, record);
    }

    #[test]
    fn weekly_record_round_trips() {
        let record = sample_weekly_record();
        let round_trip: WeeklyRecord =
            serde_json::from_str(&serde_json::to_string(&record).expect("serialize"))
                .expect("deserialize");
        assert_eq!(round_trip, record);
    }

    #[test]
    fn absent_fields_deserialize_as_not_recorded() {
        let record: DailyRecord = serde_json::from_str("{}").expect("empty record");
        assert_eq!(record.weight, None);
        assert_eq!(record.calories, None);
        assert_eq!(record.mood, None);
        assert_eq!(record.notes, "");
        assert_eq!(record.activities().count(), 0);
    }

    #[test]
    fn measurement_without_flag_still_loads_as_not_done() {
        let record: DailyRecord =
            serde_json::from_str(r#"{"exercise_time": 45}"#).expect("measurement only");
        assert_eq!(
            record.activity(DailyActivity::Exercise),
            Some(&ActivityValue::Complex {
                done: false,
                amount: Some(45),
            })
        );
    }

    #[test]
    fn mood_outside_scale_is_rejected() {
        assert!(serde_json::from_str::<DailyRecord>(r#"{"mood": 9}"#).is_err());
        assert!(serde_json::from_str::<DailyRecord>(r#"{"mood": 0}"#).is_err());
    }

    #[test]
    fn mistyped_activity_values_are_rejected() {
        assert!(serde_json::from_str::<DailyRecord>(r#"{"jung": "yes"}"#).is_err());
        assert!(serde_json::from_str::<DailyRecord>(r#"{"exercise_time": -5}"#).is_err());
        assert!(serde_json::from_str::<WeeklyRecord>(r#"{"housework": 1}"#).is_err());
    }

    #[test]
    fn unknown_keys_are_dropped_on_load() {
        let record: DailyRecord =
            serde_json::from_str(r#"{"pattern_tracking": "x", "jung": true}"#)
                .expect("unknown key ignored");
        assert_eq!(
            record.activity(DailyActivity::Jung),
            Some(&ActivityValue::Boolean(true))
        );
        let json = serde_json::to_value(record).expect("serialize");
        assert!(json.get("pattern_tracking").is_none());
    }

    #[test]
    fn set_activity_rejects_wrong_shape() {
        let mut record = DailyRecord::default();
        assert!(
            record
                .set_activity(
                    DailyActivity::Jung,
                    ActivityValue::Complex {
                        done: true,
                        amount: None,
                    },
                )
                .is_err()
        );
        assert!(
            record
                .set_activity(DailyActivity::Exercise, ActivityValue::Boolean(true))
                .is_err()
        );
    }
}
