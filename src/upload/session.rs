//! In-memory list of upload records for one session.

use super::types::{RecordId, RecordStatus, SessionStats, UploadRecord};

pub const SUCCESS_MESSAGE: &str = "File uploaded successfully";

/// Result of applying one simulated tick to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Advanced(u8),
    /// The record just reached 100 and became `Success`.
    Completed,
    /// Paused, finished or otherwise not eligible for ticking.
    Skipped,
    /// No record with this id is tracked.
    Unknown,
}

#[derive(Debug, Default)]
pub struct SessionTracker {
    records: Vec<UploadRecord>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, mut record: UploadRecord) -> RecordId {
        while self.get(record.id).is_some() {
            record.id = RecordId::new();
        }
        let id = record.id;
        self.records.push(record);
        id
    }

    pub fn records(&self) -> &[UploadRecord] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&UploadRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    fn get_mut(&mut self, id: RecordId) -> Option<&mut UploadRecord> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn advance(&mut self, id: RecordId, increment: u8) -> TickOutcome {
        let Some(record) = self.get_mut(id) else {
            return TickOutcome::Unknown;
        };
        if record.status != RecordStatus::Uploading || record.is_paused {
            return TickOutcome::Skipped;
        }

        let next = record.progress.saturating_add(increment).min(100);
        record.progress = next;
        if next >= 100 {
            record.status = RecordStatus::Success;
            record.message = Some(SUCCESS_MESSAGE.to_string());
            TickOutcome::Completed
        } else {
            TickOutcome::Advanced(next)
        }
    }

    pub fn pause(&mut self, id: RecordId) -> bool {
        match self.get_mut(id) {
            Some(record) if record.status == RecordStatus::Uploading => {
                record.is_paused = true;
                record.status = RecordStatus::Paused;
                true
            }
            _ => false,
        }
    }

    pub fn resume(&mut self, id: RecordId) -> bool {
        match self.get_mut(id) {
            Some(record) if record.status == RecordStatus::Paused => {
                record.is_paused = false;
                record.status = RecordStatus::Uploading;
                true
            }
            _ => false,
        }
    }

    /// Restart an uploading or failed record from zero.
    pub fn retry(&mut self, id: RecordId) -> bool {
        match self.get_mut(id) {
            Some(record)
                if matches!(record.status, RecordStatus::Uploading | RecordStatus::Error) =>
            {
                record.status = RecordStatus::Uploading;
                record.progress = 0;
                record.message = None;
                record.is_paused = false;
                true
            }
            _ => false,
        }
    }

    pub fn mark_error(&mut self, id: RecordId, message: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(record) if record.status != RecordStatus::Success => {
                record.status = RecordStatus::Error;
                record.message = Some(message.into());
                record.is_paused = false;
                true
            }
            _ => false,
        }
    }

    pub fn set_content(&mut self, id: RecordId, content: String) -> bool {
        match self.get_mut(id) {
            Some(record) => {
                record.content = Some(content);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: RecordId) -> Option<UploadRecord> {
        let index = self.records.iter().position(|r| r.id == id)?;
        Some(self.records.remove(index))
    }

    /// Drop every record, returning the ids that were tracked.
    pub fn clear(&mut self) -> Vec<RecordId> {
        self.records.drain(..).map(|r| r.id).collect()
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            total: self.records.len(),
            succeeded: self
                .records
                .iter()
                .filter(|r| r.status == RecordStatus::Success)
                .count(),
            errored: self
                .records
                .iter()
                .filter(|r| r.status == RecordStatus::Error)
                .count(),
            in_flight: self
                .records
                .iter()
                .filter(|r| r.status.is_in_flight())
                .count(),
        }
    }

    /// Mean progress over all records, as a rounded percentage.
    pub fn aggregate_progress(&self) -> u8 {
        if self.records.is_empty() {
            return 0;
        }
        let sum: u64 = self.records.iter().map(|r| u64::from(r.progress)).sum();
        let max = self.records.len() as u64 * 100;
        ((sum as f64 / max as f64) * 100.0).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_with(names: &[(&str, u64)]) -> (SessionTracker, Vec<RecordId>) {
        let mut tracker = SessionTracker::new();
        let ids = names
            .iter()
            .map(|(n, s)| tracker.register(UploadRecord::new(n.to_string(), *s)))
            .collect();
        (tracker, ids)
    }

    #[test]
    fn ticks_increase_progress_until_success() {
        let (mut tracker, ids) = tracker_with(&[("nota.zip", 1000)]);
        let id = ids[0];

        let mut last = 0;
        for _ in 0..9 {
            match tracker.advance(id, 10) {
                TickOutcome::Advanced(p) => {
                    assert!(p > last);
                    last = p;
                }
                other => panic!("unexpected outcome {:?}", other),
            }
        }
        assert_eq!(tracker.advance(id, 10), TickOutcome::Completed);

        let record = tracker.get(id).unwrap();
        assert_eq!(record.progress, 100);
        assert_eq!(record.status, RecordStatus::Success);
        assert_eq!(record.message.as_deref(), Some(SUCCESS_MESSAGE));

        assert_eq!(tracker.advance(id, 10), TickOutcome::Skipped);
        assert_eq!(tracker.get(id).unwrap().progress, 100);
    }

    #[test]
    fn tick_from_ninety_completes() {
        let (mut tracker, ids) = tracker_with(&[("nota.zip", 1000)]);
        for _ in 0..9 {
            tracker.advance(ids[0], 10);
        }
        assert_eq!(tracker.get(ids[0]).unwrap().progress, 90);
        assert_eq!(tracker.advance(ids[0], 10), TickOutcome::Completed);
        assert_eq!(tracker.get(ids[0]).unwrap().status, RecordStatus::Success);
    }

    #[test]
    fn overshoot_is_clamped() {
        let (mut tracker, ids) = tracker_with(&[("nota.zip", 1000)]);
        tracker.advance(ids[0], 70);
        assert_eq!(tracker.advance(ids[0], 70), TickOutcome::Completed);
        assert_eq!(tracker.get(ids[0]).unwrap().progress, 100);
    }

    #[test]
    fn pause_freezes_and_resume_continues() {
        let (mut tracker, ids) = tracker_with(&[("nota.zip", 1000)]);
        let id = ids[0];
        tracker.advance(id, 10);
        tracker.advance(id, 10);
        assert!(tracker.pause(id));

        for _ in 0..5 {
            assert_eq!(tracker.advance(id, 10), TickOutcome::Skipped);
        }
        assert_eq!(tracker.get(id).unwrap().progress, 20);
        assert_eq!(tracker.get(id).unwrap().status, RecordStatus::Paused);

        assert!(tracker.resume(id));
        assert_eq!(tracker.advance(id, 10), TickOutcome::Advanced(30));
    }

    #[test]
    fn retry_resets_failed_record() {
        let (mut tracker, ids) = tracker_with(&[("nota.zip", 1000)]);
        let id = ids[0];
        tracker.advance(id, 40);
        assert!(tracker.mark_error(id, "Error sending file"));
        assert!(tracker.retry(id));

        let record = tracker.get(id).unwrap();
        assert_eq!(record.status, RecordStatus::Uploading);
        assert_eq!(record.progress, 0);
        assert!(record.message.is_none());
    }

    #[test]
    fn retry_is_noop_for_paused_and_success() {
        let (mut tracker, ids) = tracker_with(&[("a.zip", 1), ("b.zip", 2)]);
        tracker.pause(ids[0]);
        tracker.advance(ids[1], 100);
        assert!(!tracker.retry(ids[0]));
        assert!(!tracker.retry(ids[1]));
        assert!(!tracker.mark_error(ids[1], "late"));
    }

    #[test]
    fn removed_record_is_gone_from_stats_and_ticks() {
        let (mut tracker, ids) = tracker_with(&[("a.zip", 1), ("b.zip", 2)]);
        tracker.advance(ids[1], 100);
        assert!(tracker.remove(ids[1]).is_some());

        assert_eq!(
            tracker.stats(),
            SessionStats {
                total: 1,
                succeeded: 0,
                errored: 0,
                in_flight: 1,
            }
        );
        assert_eq!(tracker.advance(ids[1], 10), TickOutcome::Unknown);
    }

    #[test]
    fn aggregate_progress_is_mean_percentage() {
        let (mut tracker, ids) = tracker_with(&[("a.zip", 1), ("b.zip", 2), ("c.zip", 3)]);
        assert_eq!(tracker.aggregate_progress(), 0);
        tracker.advance(ids[0], 100);
        tracker.advance(ids[1], 50);
        // (100 + 50 + 0) / 300 = 50%
        assert_eq!(tracker.aggregate_progress(), 50);
        tracker.advance(ids[2], 10);
        assert_eq!(tracker.aggregate_progress(), 53);
    }

    #[test]
    fn clear_returns_all_ids() {
        let (mut tracker, ids) = tracker_with(&[("a.zip", 1), ("b.zip", 2)]);
        let cleared = tracker.clear();
        assert_eq!(cleared, ids);
        assert!(tracker.is_empty());
        assert_eq!(tracker.aggregate_progress(), 0);
    }
}
