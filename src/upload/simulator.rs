//! Per-record progress timers.
//!
//! Each tracked record gets its own periodic task that emits
//! [`PipelineEvent::Tick`] on a fixed cadence. The timers know nothing about
//! the ingest request; whoever drains the channel applies the tick to the
//! session. Timers must be cancelled when their record goes away.
//!
//! Every start gets a fresh generation number carried by its ticks, so ticks
//! queued by a timer that has since been cancelled or restarted can be told
//! apart from live ones.

use super::types::{PipelineEvent, RecordId};
use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub struct ProgressSimulator {
    runtime: Handle,
    interval: Duration,
    sender: Sender<PipelineEvent>,
    timers: HashMap<RecordId, Timer>,
    next_generation: u64,
}

struct Timer {
    generation: u64,
    handle: JoinHandle<()>,
}

impl ProgressSimulator {
    pub fn new(runtime: Handle, interval: Duration, sender: Sender<PipelineEvent>) -> Self {
        Self {
            runtime,
            interval,
            sender,
            timers: HashMap::new(),
            next_generation: 0,
        }
    }

    /// Start ticking for `id`. A no-op if a live timer already exists.
    pub fn start(&mut self, id: RecordId) {
        if self.is_running(id) {
            return;
        }

        let generation = self.next_generation;
        self.next_generation += 1;
        let sender = self.sender.clone();
        let period = self.interval;
        let handle = self.runtime.spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if sender.send(PipelineEvent::Tick { id, generation }).is_err() {
                    break;
                }
            }
        });
        tracing::debug!(record = %id, generation, "progress timer started");
        self.timers.insert(id, Timer { generation, handle });
    }

    pub fn cancel(&mut self, id: RecordId) -> bool {
        match self.timers.remove(&id) {
            Some(timer) => {
                timer.handle.abort();
                tracing::debug!(record = %id, "progress timer cancelled");
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.handle.abort();
        }
    }

    pub fn is_running(&self, id: RecordId) -> bool {
        self.timers
            .get(&id)
            .map(|t| !t.handle.is_finished())
            .unwrap_or(false)
    }

    /// Whether a tick stamped with `generation` came from the timer that is
    /// currently registered for `id`.
    pub fn is_current(&self, id: RecordId, generation: u64) -> bool {
        self.timers
            .get(&id)
            .map(|t| t.generation == generation)
            .unwrap_or(false)
    }

    pub fn active_timers(&self) -> usize {
        self.timers.values().filter(|t| !t.handle.is_finished()).count()
    }
}

impl Drop for ProgressSimulator {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::{channel, Receiver};

    fn drain(rx: &Receiver<PipelineEvent>) -> Vec<PipelineEvent> {
        rx.try_iter().collect()
    }

    fn ticked(events: &[PipelineEvent]) -> Vec<RecordId> {
        events
            .iter()
            .filter_map(|e| match e {
                PipelineEvent::Tick { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }

    // With paused time, sleeping lets the runtime step through every timer
    // deadline in order before the test resumes.
    async fn advance(by: Duration) {
        tokio::time::sleep(by).await;
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn emits_one_tick_per_interval() {
        let (tx, rx) = channel();
        let mut sim = ProgressSimulator::new(Handle::current(), Duration::from_millis(300), tx);
        let id = RecordId::new();
        sim.start(id);
        tokio::task::yield_now().await;

        advance(Duration::from_millis(299)).await;
        assert!(drain(&rx).is_empty());

        advance(Duration::from_millis(2)).await;
        assert_eq!(ticked(&drain(&rx)), vec![id]);

        advance(Duration::from_millis(300)).await;
        assert_eq!(ticked(&drain(&rx)), vec![id]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_stops_ticking() {
        let (tx, rx) = channel();
        let mut sim = ProgressSimulator::new(Handle::current(), Duration::from_millis(300), tx);
        let keep = RecordId::new();
        let gone = RecordId::new();
        sim.start(keep);
        sim.start(gone);
        tokio::task::yield_now().await;

        assert!(sim.cancel(gone));
        assert!(!sim.cancel(gone));
        advance(Duration::from_millis(950)).await;

        assert_eq!(ticked(&drain(&rx)), vec![keep; 3]);
        assert_eq!(sim.active_timers(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn start_twice_keeps_single_timer() {
        let (tx, rx) = channel();
        let mut sim = ProgressSimulator::new(Handle::current(), Duration::from_millis(100), tx);
        let id = RecordId::new();
        sim.start(id);
        sim.start(id);
        tokio::task::yield_now().await;

        advance(Duration::from_millis(150)).await;
        assert_eq!(drain(&rx).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_invalidates_queued_ticks() {
        let (tx, rx) = channel();
        let mut sim = ProgressSimulator::new(Handle::current(), Duration::from_millis(100), tx);
        let id = RecordId::new();
        sim.start(id);
        tokio::task::yield_now().await;
        advance(Duration::from_millis(150)).await;

        sim.cancel(id);
        sim.start(id);
        let stale = drain(&rx);
        assert_eq!(stale.len(), 1);
        let PipelineEvent::Tick { generation, .. } = stale[0] else {
            panic!("expected a tick, got {:?}", stale[0]);
        };
        assert!(!sim.is_current(id, generation));

        advance(Duration::from_millis(120)).await;
        let fresh = drain(&rx);
        assert_eq!(fresh.len(), 1);
        let PipelineEvent::Tick { generation, .. } = fresh[0] else {
            panic!("expected a tick, got {:?}", fresh[0]);
        };
        assert!(sim.is_current(id, generation));

        sim.cancel(id);
        assert!(!sim.is_current(id, generation));
    }
}
