//! Restart-safe session stopwatch.
//!
//! Two states, Stopped and Running. While running, the persisted
//! snapshot keeps the base accumulated *before* the current run together
//! with the run's start timestamp; the live value is always recomputed
//! as `base + (now - start)`. That is what makes the timer restart-safe:
//! a process that dies mid-run loses nothing, because the next load
//! resumes from the same start timestamp and wall-clock time spent down
//! is counted.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::Clock;
use crate::store::SnapshotStore;

/// Snapshot key for the timer state.
pub const TIMER_KEY: &str = "timer";

/// Persisted timer state.
///
/// Invariant: `start_ts` is present iff `is_running`. While running,
/// `elapsed_ms` holds the pre-run base, not the live value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimerSnapshot {
    pub is_running: bool,
    pub start_ts: Option<i64>,
    pub elapsed_ms: i64,
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self {
            is_running: false,
            start_ts: None,
            elapsed_ms: 0,
        }
    }
}

/// The stopwatch state machine over a persisted snapshot.
#[derive(Debug)]
pub struct TimerService {
    store: SnapshotStore,
    state: TimerSnapshot,
}

impl TimerService {
    /// Rehydrate from the persisted snapshot. A snapshot that claims to
    /// be running without a start timestamp is treated as stopped, with
    /// its accumulated total preserved.
    #[must_use]
    pub fn load(store: SnapshotStore) -> Self {
        let mut state: TimerSnapshot = store.load(TIMER_KEY);
        if state.is_running && state.start_ts.is_none() {
            debug!("running snapshot without start timestamp; resuming stopped");
            state.is_running = false;
        }
        Self { store, state }
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.state.is_running
    }

    /// Live elapsed milliseconds, including the current run.
    #[must_use]
    pub fn elapsed_ms(&self, clock: &dyn Clock) -> i64 {
        match self.state.start_ts {
            Some(start) if self.state.is_running => {
                self.state.elapsed_ms + (clock.now_millis() - start).max(0)
            }
            _ => self.state.elapsed_ms,
        }
    }

    /// Begin a run. No-op while already running.
    pub fn start(&mut self, clock: &dyn Clock) {
        if self.state.is_running {
            debug!("timer already running; start ignored");
            return;
        }
        self.state.start_ts = Some(clock.now_millis());
        self.state.is_running = true;
        self.persist();
    }

    /// Stop the current run, folding its delta into the accumulated
    /// total. No-op while stopped.
    pub fn pause(&mut self, clock: &dyn Clock) {
        if !self.state.is_running {
            debug!("timer not running; pause ignored");
            return;
        }
        if let Some(start) = self.state.start_ts.take() {
            self.state.elapsed_ms += (clock.now_millis() - start).max(0);
        }
        self.state.is_running = false;
        self.persist();
    }

    /// Periodic checkpoint while running. Persists the pre-run base (so
    /// a later load resumes from `start_ts`) and returns the live
    /// elapsed value for display. No-op while stopped.
    pub fn tick(&mut self, clock: &dyn Clock) -> i64 {
        if self.state.is_running {
            self.persist();
        }
        self.elapsed_ms(clock)
    }

    /// The current in-memory state.
    #[must_use]
    pub const fn snapshot(&self) -> TimerSnapshot {
        self.state
    }

    fn persist(&self) {
        self.store.save(TIMER_KEY, &self.state);
    }
}

/// Format milliseconds as zero-padded `HH:MM:SS`.
#[must_use]
pub fn format_hms(elapsed_ms: i64) -> String {
    let total_sec = (elapsed_ms / 1000).max(0);
    let hours = total_sec / 3600;
    let minutes = (total_sec % 3600) / 60;
    let seconds = total_sec % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::{TIMER_KEY, TimerService, TimerSnapshot, format_hms};
    use crate::clock::ManualClock;
    use crate::store::SnapshotStore;
    use tempfile::TempDir;

    fn timer(dir: &TempDir) -> TimerService {
        TimerService::load(SnapshotStore::new(dir.path()))
    }

    #[test]
    fn starts_stopped_at_zero() {
        let dir = TempDir::new().expect("temp dir");
        let clock = ManualClock::new(1_000);
        let timer = timer(&dir);

        assert!(!timer.is_running());
        assert_eq!(timer.elapsed_ms(&clock), 0);
    }

    #[test]
    fn start_then_pause_accumulates() {
        let dir = TempDir::new().expect("temp dir");
        let clock = ManualClock::new(10_000);
        let mut timer = timer(&dir);

        timer.start(&clock);
        clock.advance(2_000);
        timer.pause(&clock);
        assert_eq!(timer.elapsed_ms(&clock), 2_000);

        timer.start(&clock);
        clock.advance(1_000);
        timer.pause(&clock);
        assert_eq!(timer.elapsed_ms(&clock), 3_000);
    }

    #[test]
    fn double_start_and_double_pause_are_no_ops() {
        let dir = TempDir::new().expect("temp dir");
        let clock = ManualClock::new(0);
        let mut timer = timer(&dir);

        timer.start(&clock);
        clock.advance(500);
        // Must not reset the running start timestamp.
        timer.start(&clock);
        clock.advance(500);
        timer.pause(&clock);
        assert_eq!(timer.elapsed_ms(&clock), 1_000);

        timer.pause(&clock);
        assert_eq!(timer.elapsed_ms(&clock), 1_000);
        assert!(!timer.is_running());
    }

    #[test]
    fn elapsed_grows_while_running() {
        let dir = TempDir::new().expect("temp dir");
        let clock = ManualClock::new(0);
        let mut timer = timer(&dir);

        timer.start(&clock);
        clock.advance(1_500);
        assert_eq!(timer.elapsed_ms(&clock), 1_500);
        clock.advance(500);
        assert_eq!(timer.elapsed_ms(&clock), 2_000);
        assert!(timer.is_running());
    }

    #[test]
    fn tick_persists_the_pre_run_base() {
        let dir = TempDir::new().expect("temp dir");
        let store = SnapshotStore::new(dir.path());
        let clock = ManualClock::new(5_000);
        let mut timer = TimerService::load(store.clone());

        timer.start(&clock);
        clock.advance(3_000);
        let live = timer.tick(&clock);
        assert_eq!(live, 3_000);

        let persisted: TimerSnapshot = store
            .try_load(TIMER_KEY)
            .expect("snapshot readable")
            .expect("snapshot present");
        assert!(persisted.is_running);
        assert_eq!(persisted.start_ts, Some(5_000));
        // The stored elapsed is the base before this run, not the live value.
        assert_eq!(persisted.elapsed_ms, 0);
    }

    #[test]
    fn restart_recovery_counts_downtime() {
        let dir = TempDir::new().expect("temp dir");
        let store = SnapshotStore::new(dir.path());
        store.save(
            TIMER_KEY,
            &TimerSnapshot {
                is_running: true,
                start_ts: Some(100_000),
                elapsed_ms: 0,
            },
        );

        let clock = ManualClock::new(105_000);
        let timer = TimerService::load(store);
        assert!(timer.is_running());
        assert!(timer.elapsed_ms(&clock) >= 5_000);
    }

    #[test]
    fn restart_recovery_keeps_stopped_total_exact() {
        let dir = TempDir::new().expect("temp dir");
        let store = SnapshotStore::new(dir.path());
        store.save(
            TIMER_KEY,
            &TimerSnapshot {
                is_running: false,
                start_ts: None,
                elapsed_ms: 42_000,
            },
        );

        let clock = ManualClock::new(999_999_999);
        let timer = TimerService::load(store);
        assert!(!timer.is_running());
        assert_eq!(timer.elapsed_ms(&clock), 42_000);
    }

    #[test]
    fn running_snapshot_without_start_resumes_stopped() {
        let dir = TempDir::new().expect("temp dir");
        let store = SnapshotStore::new(dir.path());
        store.save(
            TIMER_KEY,
            &TimerSnapshot {
                is_running: true,
                start_ts: None,
                elapsed_ms: 7_000,
            },
        );

        let clock = ManualClock::new(0);
        let timer = TimerService::load(store);
        assert!(!timer.is_running());
        assert_eq!(timer.elapsed_ms(&clock), 7_000);
    }

    #[test]
    fn snapshot_json_matches_the_wire_format() {
        let snapshot = TimerSnapshot {
            is_running: true,
            start_ts: Some(1_700_000_000_000),
            elapsed_ms: 1_234,
        };
        let json = serde_json::to_value(snapshot).expect("serialize snapshot");
        assert_eq!(json["isRunning"], true);
        assert_eq!(json["startTs"], 1_700_000_000_000_i64);
        assert_eq!(json["elapsedMs"], 1_234);

        let stopped = TimerSnapshot::default();
        let json = serde_json::to_value(stopped).expect("serialize default");
        assert!(json["startTs"].is_null());
    }

    #[test]
    fn formats_zero_padded_hms() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(999), "00:00:00");
        assert_eq!(format_hms(61_000), "00:01:01");
        assert_eq!(format_hms(3_661_000), "01:01:01");
        assert_eq!(format_hms(36_000_000), "10:00:00");
        assert_eq!(format_hms(-5), "00:00:00");
    }
}
