use serde::{Deserialize, Serialize};
use std::fmt;

/// Hour on a 12-hour clock face, always within `1..=12`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct Hour(u8);

impl Hour {
    pub fn new(hour: u8) -> Option<Self> {
        (1..=12).contains(&hour).then_some(Hour(hour))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Hour {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Hour::new(value).ok_or_else(|| format!("Hour {} is outside 1..=12", value))
    }
}

impl From<Hour> for u8 {
    fn from(hour: Hour) -> Self {
        hour.0
    }
}

/// Quarter-hour minute marks a shift can start or end on.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub enum Minute {
    Zero,
    Fifteen,
    Thirty,
    FortyFive,
}

impl Minute {
    pub fn get(self) -> u8 {
        match self {
            Minute::Zero => 0,
            Minute::Fifteen => 15,
            Minute::Thirty => 30,
            Minute::FortyFive => 45,
        }
    }
}

impl TryFrom<u8> for Minute {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Minute::Zero),
            15 => Ok(Minute::Fifteen),
            30 => Ok(Minute::Thirty),
            45 => Ok(Minute::FortyFive),
            other => Err(format!("Minute {} is not one of 0, 15, 30, 45", other)),
        }
    }
}

impl From<Minute> for u8 {
    fn from(minute: Minute) -> Self {
        minute.get()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

/// A clock reading as the user enters it, one component at a time.
///
/// Any field may still be unset while the user is typing; such a time is a
/// placeholder and never contributes hours.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Time {
    pub hour: Option<Hour>,
    pub minute: Option<Minute>,
    pub period: Option<Period>,
}

impl Time {
    pub fn new(hour: Option<Hour>, minute: Option<Minute>, period: Option<Period>) -> Self {
        Time {
            hour,
            minute,
            period,
        }
    }

    /// Returns the fully specified form, or `None` while any field is unset.
    pub fn complete(&self) -> Option<CompleteTime> {
        Some(CompleteTime {
            hour: self.hour?,
            minute: self.minute?,
            period: self.period?,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.complete().is_some()
    }
}

/// A time with every component set. Only these can be placed on the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompleteTime {
    pub hour: Hour,
    pub minute: Minute,
    pub period: Period,
}

impl CompleteTime {
    /// Builds a clock reading from a literal hour.
    ///
    /// # Panics
    ///
    /// Panics if `hour` is outside `1..=12`; in a const context this fails the build.
    pub(crate) const fn at(hour: u8, minute: Minute, period: Period) -> Self {
        assert!(hour >= 1 && hour <= 12, "hour outside 1..=12");
        CompleteTime {
            hour: Hour(hour),
            minute,
            period,
        }
    }

    pub fn new(hour: Hour, minute: Minute, period: Period) -> Self {
        CompleteTime {
            hour,
            minute,
            period,
        }
    }
}

impl From<CompleteTime> for Time {
    fn from(time: CompleteTime) -> Self {
        Time::new(Some(time.hour), Some(time.minute), Some(time.period))
    }
}

impl fmt::Display for CompleteTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let period = match self.period {
            Period::Am => "AM",
            Period::Pm => "PM",
        };
        write!(f, "{}:{:02} {}", self.hour.get(), self.minute.get(), period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_rejects_values_off_the_clock_face() {
        assert!(Hour::new(0).is_none());
        assert!(Hour::new(13).is_none());
        assert_eq!(Hour::new(12).map(Hour::get), Some(12));
    }

    #[test]
    fn time_is_complete_only_with_all_fields() {
        let hour = Hour::new(9);
        let partial = Time::new(hour, Some(Minute::Zero), None);
        assert!(!partial.is_complete());

        let full = Time::new(hour, Some(Minute::Zero), Some(Period::Am));
        assert!(full.is_complete());
        assert!(!Time::default().is_complete());
    }

    #[test]
    fn time_reads_the_stored_json_shape() {
        let time: Time =
            serde_json::from_str(r#"{"hour":7,"minute":30,"period":"PM"}"#).unwrap();
        assert_eq!(time.complete().unwrap().to_string(), "7:30 PM");

        let unset: Time =
            serde_json::from_str(r#"{"hour":null,"minute":0,"period":null}"#).unwrap();
        assert_eq!(unset.minute, Some(Minute::Zero));
        assert!(unset.hour.is_none());
    }

    #[test]
    fn time_rejects_minutes_between_quarter_marks() {
        let parsed = serde_json::from_str::<Time>(r#"{"hour":7,"minute":10,"period":"PM"}"#);
        assert!(parsed.is_err());
    }
}
