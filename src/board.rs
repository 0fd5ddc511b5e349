use chrono::{DateTime, TimeZone};
use log::{debug, error, info, warn};

use crate::{
    alarm::{Alarm, AlarmId},
    schedule::{self, Projection},
    store::AlarmStore,
};

/// the alarm set being shown and edited, kept in sync with its store
#[derive(Debug)]
pub struct AlarmBoard<S> {
    alarms: Vec<Alarm>,
    store: S,
}

impl<S: AlarmStore> AlarmBoard<S> {
    /// Reads the saved alarms, anything unreadable means starting with no alarms.
    pub fn load(store: S) -> Self {
        let alarms = match store.load() {
            Ok(Some(alarms)) => alarms,
            Ok(None) => {
                debug!("no saved alarms");
                Vec::new()
            }
            Err(e) => {
                warn!("couldn't load saved alarms, starting with none: {e}");
                Vec::new()
            }
        };
        info!("loaded {} alarm(s)", alarms.len());
        Self { alarms, store }
    }

    #[must_use]
    pub fn alarms(&self) -> &[Alarm] {
        &self.alarms
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    pub fn add(&mut self, alarm: Alarm) {
        info!("adding alarm {} ({})", alarm.id, alarm.display_name());
        self.alarms.push(alarm);
        self.persist();
    }

    pub fn remove(&mut self, id: AlarmId) -> Option<Alarm> {
        let index = self.alarms.iter().position(|alarm| alarm.id == id)?;
        let removed = self.alarms.remove(index);
        info!("removed alarm {id}");
        self.persist();
        Some(removed)
    }

    /// Runs the alarms against `sample`, returning the ones that just fired.
    pub fn tick<Tz: TimeZone>(&mut self, sample: &DateTime<Tz>) -> Vec<Alarm> {
        let evaluation = schedule::evaluate(sample, &self.alarms);
        if evaluation.changed() {
            self.alarms = evaluation.alarms;
            self.persist();
        }
        evaluation.fired
    }

    #[must_use]
    pub fn next<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<Projection<'_>> {
        schedule::next_alarm(now, &self.alarms)
    }

    // the in memory set stays authoritative if the write fails
    fn persist(&self) {
        if let Err(e) = self.store.save(&self.alarms) {
            error!("couldn't save alarms: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::{
        alarm::{DailyTime, Target},
        store::MemoryStore,
    };

    fn daily(time: &str) -> Alarm {
        Alarm::new(Target::Daily(DailyTime::parse(time).unwrap()), None, None)
    }

    #[test]
    fn nothing_saved_is_empty() {
        let board = AlarmBoard::load(MemoryStore::new());
        assert!(board.alarms().is_empty());
    }

    #[test]
    fn corrupt_storage_is_empty() {
        let board = AlarmBoard::load(MemoryStore::with_blob("[{\"id\": 4}"));
        assert!(board.alarms().is_empty());
    }

    #[test]
    fn saved_alarms_are_loaded() {
        let store = MemoryStore::new();
        let alarm = daily("09:15");
        store.save(std::slice::from_ref(&alarm)).unwrap();
        let board = AlarmBoard::load(store);
        assert_eq!(board.alarms(), [alarm]);
    }

    #[test]
    fn every_change_is_saved() {
        let mut board = AlarmBoard::load(MemoryStore::new());
        let alarm = daily("09:15");
        let id = alarm.id;
        board.add(alarm);
        let saved: Vec<Alarm> = serde_json::from_str(&board.store().blob().unwrap()).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id, id);
    }

    #[test]
    fn remove_deletes_from_storage_and_projection() {
        let now = Utc::now();
        let mut board = AlarmBoard::load(MemoryStore::new());
        let soon = Alarm::new(Target::Absolute(now + Duration::minutes(1)), None, None);
        let later = Alarm::new(Target::Absolute(now + Duration::hours(2)), None, None);
        let (soon_id, later_id) = (soon.id, later.id);
        board.add(soon);
        board.add(later);
        assert_eq!(board.next(&now).unwrap().alarm.id, soon_id);

        assert!(board.remove(soon_id).is_some());
        assert_eq!(board.next(&now).unwrap().alarm.id, later_id);
        let saved: Vec<Alarm> = serde_json::from_str(&board.store().blob().unwrap()).unwrap();
        assert!(saved.iter().all(|alarm| alarm.id != soon_id));

        assert!(board.remove(later_id).is_some());
        assert!(board.next(&now).is_none());
        assert_eq!(board.store().blob().as_deref(), Some("[]"));
    }

    #[test]
    fn removing_unknown_id_changes_nothing() {
        let mut board = AlarmBoard::load(MemoryStore::new());
        assert!(board.remove(AlarmId::new()).is_none());
        assert!(board.store().blob().is_none());
    }

    #[test]
    fn tick_saves_only_when_something_fired() {
        let now = Utc::now();
        let store = MemoryStore::new();
        let alarm = Alarm::new(Target::Absolute(now + Duration::seconds(5)), None, None);
        store.save(std::slice::from_ref(&alarm)).unwrap();
        let before = store.blob();
        let mut board = AlarmBoard::load(store);

        assert!(board.tick(&now).is_empty());
        assert_eq!(board.store().blob(), before);

        let fired = board.tick(&(now + Duration::seconds(5)));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].id, alarm.id);
        let saved: Vec<Alarm> = serde_json::from_str(&board.store().blob().unwrap()).unwrap();
        assert!(saved[0].is_triggered());

        assert!(board.tick(&(now + Duration::seconds(6))).is_empty());
    }
}
