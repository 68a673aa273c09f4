use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::models::time::{Minute, Period, Time};

/// The days of a timesheet week, in the order the week is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Saturday,
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Saturday,
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn policy(self) -> &'static DayPolicy {
        &DAY_POLICIES[self.index()]
    }

    /// Localized label used as the storage key and column header.
    pub fn label(self) -> &'static str {
        self.policy().label
    }

    pub fn from_label(label: &str) -> Option<Weekday> {
        Weekday::ALL.into_iter().find(|day| day.label() == label)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Weekday {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Weekday {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Weekday::from_label(&label)
            .ok_or_else(|| D::Error::custom(format!("Unknown day label '{}'", label)))
    }
}

/// Hours past `threshold_hours` on the day count `multiplier` times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overtime {
    pub threshold_hours: f64,
    pub multiplier: f64,
}

impl Overtime {
    pub fn credited_hours(&self, worked: f64) -> f64 {
        if worked > self.threshold_hours {
            self.threshold_hours + (worked - self.threshold_hours) * self.multiplier
        } else {
            worked
        }
    }
}

/// Components pre-filled into a blank time field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeDefaults {
    pub minute: Option<Minute>,
    pub period: Option<Period>,
}

impl TimeDefaults {
    pub fn to_time(self) -> Time {
        Time::new(None, self.minute, self.period)
    }
}

/// Business rules attached to one day of the week.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayPolicy {
    pub label: &'static str,
    pub overtime: Option<Overtime>,
    pub start_defaults: TimeDefaults,
    pub end_defaults: TimeDefaults,
}

const STANDARD_OVERTIME: Overtime = Overtime {
    threshold_hours: 8.0,
    multiplier: 2.0,
};

const ON_THE_HOUR: TimeDefaults = TimeDefaults {
    minute: Some(Minute::Zero),
    period: None,
};

const fn regular_day(label: &'static str) -> DayPolicy {
    DayPolicy {
        label,
        overtime: None,
        start_defaults: ON_THE_HOUR,
        end_defaults: ON_THE_HOUR,
    }
}

/// Indexed by `Weekday::index`.
pub const DAY_POLICIES: [DayPolicy; 7] = [
    regular_day("السبت"),
    regular_day("الأحد"),
    regular_day("الاثنين"),
    regular_day("الثلاثاء"),
    regular_day("الأربعاء"),
    DayPolicy {
        overtime: Some(STANDARD_OVERTIME),
        ..regular_day("الخميس")
    },
    // Rest day: shifts start in the morning and close on the half hour.
    DayPolicy {
        label: "الجمعة",
        overtime: None,
        start_defaults: TimeDefaults {
            minute: Some(Minute::Zero),
            period: Some(Period::Am),
        },
        end_defaults: TimeDefaults {
            minute: Some(Minute::Thirty),
            period: None,
        },
    },
];

/// One value per weekday, serialized as an object keyed by day label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayMap<T>([T; 7]);

impl<T> DayMap<T> {
    pub fn from_fn(mut f: impl FnMut(Weekday) -> T) -> Self {
        DayMap(Weekday::ALL.map(&mut f))
    }

    pub fn get(&self, day: Weekday) -> &T {
        &self.0[day.index()]
    }

    pub fn get_mut(&mut self, day: Weekday) -> &mut T {
        &mut self.0[day.index()]
    }

    /// Iterates in week order, Saturday first.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &T)> {
        Weekday::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }
}

impl<T: Serialize> Serialize for DayMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Weekday::ALL.len()))?;
        for (day, value) in self.iter() {
            map.serialize_entry(day.label(), value)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de> + Default> Deserialize<'de> for DayMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<Weekday, T>::deserialize(deserializer)?;
        let mut map = DayMap::from_fn(|_| T::default());
        for (day, value) in entries {
            *map.get_mut(day) = value;
        }
        Ok(map)
    }
}

/// One day's shift boundaries. A missing side behaves like a blank time.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkDay {
    pub start: Option<Time>,
    pub end: Option<Time>,
}

impl WorkDay {
    pub fn new(start: impl Into<Time>, end: impl Into<Time>) -> Self {
        WorkDay {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }

    /// The pre-filled, still incomplete record a new week starts with.
    pub fn with_defaults(day: Weekday) -> Self {
        let policy = day.policy();
        WorkDay {
            start: Some(policy.start_defaults.to_time()),
            end: Some(policy.end_defaults.to_time()),
        }
    }
}

/// A week of shifts, always holding all seven days.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(transparent)]
pub struct WorkWeek {
    days: DayMap<WorkDay>,
}

impl WorkWeek {
    /// A week with every field unset, including the pre-filled ones.
    pub fn empty() -> Self {
        WorkWeek {
            days: DayMap::default(),
        }
    }

    pub fn day(&self, day: Weekday) -> &WorkDay {
        self.days.get(day)
    }

    pub fn day_mut(&mut self, day: Weekday) -> &mut WorkDay {
        self.days.get_mut(day)
    }

    pub fn set_day(&mut self, day: Weekday, work_day: WorkDay) {
        *self.days.get_mut(day) = work_day;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &WorkDay)> {
        self.days.iter()
    }
}

impl Default for WorkWeek {
    fn default() -> Self {
        WorkWeek {
            days: DayMap::from_fn(WorkDay::with_defaults),
        }
    }
}
