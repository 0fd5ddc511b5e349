//! Deciding which alarms fire for a sample, and which alarm comes next.
//!
//! Both are pure functions of a wall clock sample and the alarm set, the time zone of the sample
//! is the one daily alarms are matched in.

use chrono::{DateTime, Days, Duration, NaiveDateTime, TimeZone, Utc};

use crate::alarm::{Alarm, Target};

/// result of running the alarms against one sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// the alarm set with newly fired alarms marked triggered
    pub alarms: Vec<Alarm>,
    /// alarms that fired on this sample, in list order
    pub fired: Vec<Alarm>,
}

impl Evaluation {
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.fired.is_empty()
    }
}

/// whether an untriggered alarm's condition holds at `sample`
pub fn is_due<Tz: TimeZone>(alarm: &Alarm, sample: &DateTime<Tz>) -> bool {
    if alarm.is_triggered() {
        return false;
    }
    match alarm.target {
        Target::Absolute(at) => sample.with_timezone(&Utc) >= at,
        // daily alarms are never re-armed, so this fires once in total
        Target::Daily(time) => time.matches(sample),
    }
}

#[must_use]
pub fn evaluate<Tz: TimeZone>(sample: &DateTime<Tz>, alarms: &[Alarm]) -> Evaluation {
    let mut fired = Vec::new();
    let alarms = alarms
        .iter()
        .cloned()
        .map(|mut alarm| {
            if is_due(&alarm, sample) {
                alarm.mark_triggered();
                fired.push(alarm.clone());
            }
            alarm
        })
        .collect();
    Evaluation { alarms, fired }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection<'a> {
    pub alarm: &'a Alarm,
    pub at: DateTime<Utc>,
}

/// next time `alarm` would go off at or after `now`
pub fn project<Tz: TimeZone>(alarm: &Alarm, now: &DateTime<Tz>) -> Option<DateTime<Utc>> {
    match alarm.target {
        Target::Absolute(at) => Some(at),
        Target::Daily(time) => {
            let tz = now.timezone();
            let today = now.date_naive().and_time(time.as_naive_time());
            let candidate = resolve_local(&tz, today)?;
            let next = if candidate >= *now {
                candidate
            } else {
                resolve_local(&tz, today.checked_add_days(Days::new(1))?)?
            };
            Some(next.with_timezone(&Utc))
        }
    }
}

/// a local time skipped by a DST jump is pushed forward an hour
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
}

/// The untriggered alarm that goes off soonest, ties go to the earlier alarm in the list.
pub fn next_alarm<'a, Tz: TimeZone>(
    now: &DateTime<Tz>,
    alarms: &'a [Alarm],
) -> Option<Projection<'a>> {
    alarms
        .iter()
        .filter(|alarm| !alarm.is_triggered())
        .filter_map(|alarm| project(alarm, now).map(|at| Projection { alarm, at }))
        .min_by_key(|projection| projection.at)
}
