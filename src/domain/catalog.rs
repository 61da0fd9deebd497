//! Static catalog of trackable activities and the mood scale.
//!
//! The catalog is read-only configuration: it defines which activity keys
//! are legal inside a record and what value shape each key carries.

/// How an activity's value is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    /// A plain done/not-done flag.
    Boolean,
    /// A done flag plus a numeric measurement.
    Complex { measurement: Measurement },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measurement {
    Minutes,
    Words,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Study,
    Life,
    Entertainment,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Self::Study => "学习安排",
            Self::Life => "生活",
            Self::Entertainment => "娱乐",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DailyActivity {
    Jung,
    English,
    Metaphysics,
    Thesis,
    GoingOut,
    BowelMovement,
    DogWalking,
    Exercise,
    Drawing,
    Writing,
    WatchingShows,
    CasualReading,
    Friends,
    Doi,
}

impl DailyActivity {
    pub const ALL: [DailyActivity; 14] = [
        Self::Jung,
        Self::English,
        Self::Metaphysics,
        Self::Thesis,
        Self::GoingOut,
        Self::BowelMovement,
        Self::DogWalking,
        Self::Exercise,
        Self::Drawing,
        Self::Writing,
        Self::WatchingShows,
        Self::CasualReading,
        Self::Friends,
        Self::Doi,
    ];

    /// Stable identifier used as the wire key in persisted documents.
    pub fn id(self) -> &'static str {
        match self {
            Self::Jung => "jung",
            Self::English => "english",
            Self::Metaphysics => "metaphysics",
            Self::Thesis => "thesis",
            Self::GoingOut => "going_out",
            Self::BowelMovement => "bowel_movement",
            Self::DogWalking => "dog_walking",
            Self::Exercise => "exercise",
            Self::Drawing => "drawing",
            Self::Writing => "writing",
            Self::WatchingShows => "watching_shows",
            Self::CasualReading => "casual_reading",
            Self::Friends => "friends",
            Self::Doi => "doi",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Jung => "荣格",
            Self::English => "英语",
            Self::Metaphysics => "玄学",
            Self::Thesis => "论文",
            Self::GoingOut => "出门",
            Self::BowelMovement => "poo",
            Self::DogWalking => "遛狗",
            Self::Exercise => "健身",
            Self::Drawing => "画画",
            Self::Writing => "写作",
            Self::WatchingShows => "看剧",
            Self::CasualReading => "闲书",
            Self::Friends => "朋友",
            Self::Doi => "DOI",
        }
    }

    pub fn category(self) -> Category {
        match self {
            Self::Jung | Self::English | Self::Metaphysics | Self::Thesis => Category::Study,
            Self::GoingOut | Self::BowelMovement | Self::DogWalking | Self::Exercise => {
                Category::Life
            }
            Self::Drawing
            | Self::Writing
            | Self::WatchingShows
            | Self::CasualReading
            | Self::Friends
            | Self::Doi => Category::Entertainment,
        }
    }

    pub fn kind(self) -> ActivityKind {
        match self {
            Self::Exercise => ActivityKind::Complex {
                measurement: Measurement::Minutes,
            },
            Self::Thesis => ActivityKind::Complex {
                measurement: Measurement::Words,
            },
            _ => ActivityKind::Boolean,
        }
    }

    /// Wire key of the numeric sub-measurement, for complex activities only.
    pub fn measurement_key(self) -> Option<&'static str> {
        match self {
            Self::Exercise => Some("exercise_time"),
            Self::Thesis => Some("thesis_wordcount"),
            _ => None,
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|activity| activity.id() == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WeeklyActivity {
    Housework,
    EatingOut,
}

impl WeeklyActivity {
    pub const ALL: [WeeklyActivity; 2] = [Self::Housework, Self::EatingOut];

    pub fn id(self) -> &'static str {
        match self {
            Self::Housework => "housework",
            Self::EatingOut => "eating_out",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Housework => "做家务",
            Self::EatingOut => "外出就餐",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|activity| activity.id() == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodLevel {
    pub value: u8,
    pub label: &'static str,
}

pub const MOOD_SCALE: [MoodLevel; 5] = [
    MoodLevel {
        value: 1,
        label: "很差",
    },
    MoodLevel {
        value: 2,
        label: "差",
    },
    MoodLevel {
        value: 3,
        label: "一般",
    },
    MoodLevel {
        value: 4,
        label: "好",
    },
    MoodLevel {
        value: 5,
        label: "很好",
    },
];

/// Display label for a mood value, `None` outside the 1..=5 scale.
pub fn mood_label(value: u8) -> Option<&'static str> {
    MOOD_SCALE
        .iter()
        .find(|level| level.value == value)
        .map(|level| level.label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_ids_are_unique_and_reversible() {
        for activity in DailyActivity::ALL {
            assert_eq!(DailyActivity::from_id(activity.id()), Some(activity));
        }
        assert_eq!(DailyActivity::from_id("no_such_activity"), None);
    }

    #[test]
    fn complex_activities_carry_measurement_keys() {
        assert_eq!(
            DailyActivity::Exercise.measurement_key(),
            Some("exercise_time")
        );
        assert_eq!(
            DailyActivity::Thesis.measurement_key(),
            Some("thesis_wordcount")
        );
        for activity in DailyActivity::ALL {
            match activity.kind() {
                ActivityKind::Complex { .. } => {
                    assert!(activity.measurement_key().is_some());
                }
                ActivityKind::Boolean => assert_eq!(activity.measurement_key(), None),
            }
        }
    }

    #[test]
    fn mood_label_matches_scale() {
        assert_eq!(mood_label(1), Some("很差"));
        assert_eq!(mood_label(3), Some("一般"));
        assert_eq!(mood_label(5), Some("很好"));
        assert_eq!(mood_label(0), None);
        assert_eq!(mood_label(9), None);
    }

    #[test]
    fn weekly_ids_are_reversible() {
        for activity in WeeklyActivity::ALL {
            assert_eq!(WeeklyActivity::from_id(activity.id()), Some(activity));
        }
    }
}
