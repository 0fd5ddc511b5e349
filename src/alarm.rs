use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AlarmError;

/// formats accepted for a date-and-time without an offset (what a `datetime-local` input gives)
const LOCAL_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlarmId(Uuid);

impl AlarmId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AlarmId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AlarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// the time of day a daily alarm goes off at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTime {
    hour: u32,
    minute: u32,
    second: u32,
}

impl DailyTime {
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Result<Self, AlarmError> {
        NaiveTime::from_hms_opt(hour, minute, second)
            .map(|_| Self {
                hour,
                minute,
                second,
            })
            .ok_or_else(|| AlarmError::InvalidDailyTime(format!("{hour}:{minute}:{second}")))
    }

    /// Parses `HH:MM` or `HH:MM:SS`.
    ///
    /// Lenient about padding and whitespace around each part, missing seconds mean `:00`.
    pub fn parse(input: &str) -> Result<Self, AlarmError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AlarmError::MissingTime);
        }
        let invalid = || AlarmError::InvalidDailyTime(input.to_string());
        let parts = input
            .split(':')
            .map(|part| part.trim().parse::<u32>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        let (hour, minute, second) = match parts[..] {
            [hour, minute] => (hour, minute, 0),
            [hour, minute, second] => (hour, minute, second),
            _ => return Err(invalid()),
        };
        Self::from_hms(hour, minute, second).map_err(|_| invalid())
    }

    #[must_use]
    pub const fn hour(&self) -> u32 {
        self.hour
    }

    #[must_use]
    pub const fn minute(&self) -> u32 {
        self.minute
    }

    #[must_use]
    pub const fn second(&self) -> u32 {
        self.second
    }

    /// whole-second match against a wall clock reading
    #[must_use]
    pub fn matches(&self, time: &impl Timelike) -> bool {
        time.hour() == self.hour && time.minute() == self.minute && time.second() == self.second
    }

    #[must_use]
    pub fn as_naive_time(&self) -> NaiveTime {
        // fields are validated on construction
        NaiveTime::from_hms_opt(self.hour, self.minute, self.second).unwrap_or_default()
    }
}

impl fmt::Display for DailyTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.second == 0 {
            write!(f, "{:02}:{:02}", self.hour, self.minute)
        } else {
            write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlarmKind {
    /// a single point in time
    Absolute,
    #[default]
    Daily,
}

impl AlarmKind {
    pub fn parse_target(self, input: &str) -> Result<Target, AlarmError> {
        match self {
            Self::Absolute => parse_timestamp(input).map(Target::Absolute),
            Self::Daily => DailyTime::parse(input).map(Target::Daily),
        }
    }
}

impl fmt::Display for AlarmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Absolute => "Specific Date",
            Self::Daily => "Daily Time",
        })
    }
}

/// Parses an RFC 3339 timestamp, or a zone-less date and time in the local time zone.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, AlarmError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AlarmError::MissingTime);
    }
    if let Ok(time) = DateTime::parse_from_rfc3339(input) {
        return Ok(time.with_timezone(&Utc));
    }
    LOCAL_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|time| time.with_timezone(&Utc))
        .ok_or_else(|| AlarmError::InvalidTimestamp(input.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Absolute(DateTime<Utc>),
    Daily(DailyTime),
}

impl Target {
    #[must_use]
    pub const fn kind(&self) -> AlarmKind {
        match self {
            Self::Absolute(_) => AlarmKind::Absolute,
            Self::Daily(_) => AlarmKind::Daily,
        }
    }
}

/// represents an alarm
/// either a fixed point in time or a time of day, with an optional webhook and label
///
/// `triggered` only ever goes from false to true
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredAlarm", into = "StoredAlarm")]
pub struct Alarm {
    pub id: AlarmId,
    pub target: Target,
    pub webhook_url: Option<String>,
    pub label: Option<String>,
    triggered: bool,
}

impl Alarm {
    #[must_use]
    pub fn new(target: Target, webhook_url: Option<String>, label: Option<String>) -> Self {
        Self {
            id: AlarmId::new(),
            target,
            webhook_url,
            label,
            triggered: false,
        }
    }

    #[must_use]
    pub const fn is_triggered(&self) -> bool {
        self.triggered
    }

    pub(crate) fn mark_triggered(&mut self) {
        self.triggered = true;
    }

    /// name shown in the alarm list
    #[must_use]
    pub fn display_name(&self) -> &str {
        match (&self.label, &self.webhook_url) {
            (Some(label), _) => label,
            (None, Some(_)) => "Webhook",
            (None, None) => "Alarm",
        }
    }

    /// text of the effect shown when the alarm fires
    #[must_use]
    pub fn fire_message(&self) -> &str {
        match (&self.label, &self.webhook_url) {
            (Some(label), _) => label,
            (None, Some(_)) => "Webhook Sent",
            (None, None) => "Alarm!",
        }
    }
}

/// the flat form alarms are persisted in
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredAlarm {
    id: AlarmId,
    kind: AlarmKind,
    target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    webhook_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default)]
    triggered: bool,
}

impl From<Alarm> for StoredAlarm {
    fn from(alarm: Alarm) -> Self {
        let target = match alarm.target {
            Target::Absolute(time) => time.to_rfc3339_opts(SecondsFormat::Millis, true),
            Target::Daily(time) => time.to_string(),
        };
        Self {
            id: alarm.id,
            kind: alarm.target.kind(),
            target,
            webhook_url: alarm.webhook_url,
            label: alarm.label,
            triggered: alarm.triggered,
        }
    }
}

impl TryFrom<StoredAlarm> for Alarm {
    type Error = AlarmError;

    fn try_from(stored: StoredAlarm) -> Result<Self, Self::Error> {
        Ok(Self {
            id: stored.id,
            target: stored.kind.parse_target(&stored.target)?,
            webhook_url: stored.webhook_url,
            label: stored.label,
            triggered: stored.triggered,
        })
    }
}
