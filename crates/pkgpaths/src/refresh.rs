//! Background refresh of an [`IndexStore`].
//!
//! One worker thread rebuilds the index on a fixed schedule and whenever a
//! manual trigger arrives. Triggers received while a rebuild is running
//! coalesce into a single follow-up rebuild. Scheduled and manual rebuilds are
//! both plain [`IndexStore::rebuild`] calls.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::error::{PkgPathsError, Result};
use crate::index::IndexStore;

/// Default time between scheduled rebuilds.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(45 * 60);

/// Why the worker woke up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshDecision {
    Scheduled,
    Triggered,
    Shutdown,
}

#[derive(Debug, Default)]
struct SignalState {
    pending: bool,
    shutdown: bool,
}

/// Wakes the refresh worker.
#[derive(Debug, Default)]
pub struct RefreshSignal {
    state: Mutex<SignalState>,
    condvar: Condvar,
}

impl RefreshSignal {
    /// Requests a rebuild as soon as the worker is idle.
    pub fn trigger(&self) {
        self.state.lock().pending = true;
        self.condvar.notify_one();
    }

    /// Asks the worker to exit after its current rebuild.
    pub fn shutdown(&self) {
        self.state.lock().shutdown = true;
        self.condvar.notify_one();
    }

    /// Blocks until a trigger, shutdown, or `deadline`.
    pub fn wait_until(&self, deadline: Instant) -> RefreshDecision {
        let mut state = self.state.lock();
        loop {
            if state.shutdown {
                return RefreshDecision::Shutdown;
            }
            if state.pending {
                state.pending = false;
                return RefreshDecision::Triggered;
            }
            if self.condvar.wait_until(&mut state, deadline).timed_out() {
                return if state.shutdown {
                    RefreshDecision::Shutdown
                } else {
                    RefreshDecision::Scheduled
                };
            }
        }
    }
}

/// Handle to a running refresh worker. Dropping it stops the worker.
#[derive(Debug)]
pub struct RefresherHandle {
    signal: Arc<RefreshSignal>,
    join_handle: Option<JoinHandle<()>>,
}

impl RefresherHandle {
    /// Requests an on-demand rebuild without waiting for it.
    pub fn trigger(&self) {
        self.signal.trigger();
    }

    /// Stops the worker and waits for any in-flight rebuild to finish.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.signal.shutdown();
        if let Some(handle) = self.join_handle.take() {
            if handle.join().is_err() {
                log::warn!("index refresh worker panicked");
            }
        }
    }
}

impl Drop for RefresherHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawns the refresh worker for `store`.
///
/// The first scheduled rebuild happens one `interval` after spawning; callers
/// build the initial index themselves.
pub fn spawn_refresher(store: Arc<IndexStore>, interval: Duration) -> Result<RefresherHandle> {
    if interval.is_zero() {
        return Err(PkgPathsError::InvalidInput(
            "refresh interval must be greater than zero".to_string(),
        ));
    }

    let signal = Arc::new(RefreshSignal::default());
    let signal_for_thread = signal.clone();
    let join_handle = thread::Builder::new()
        .name("pkgpaths-refresh".to_string())
        .spawn(move || run_refresher(&store, &signal_for_thread, interval))?;

    Ok(RefresherHandle {
        signal,
        join_handle: Some(join_handle),
    })
}

fn run_refresher(store: &IndexStore, signal: &RefreshSignal, interval: Duration) {
    // Scheduled rebuilds keep a fixed cadence; manual ones do not shift it.
    let mut next_tick = Instant::now() + interval;
    loop {
        match signal.wait_until(next_tick) {
            RefreshDecision::Shutdown => break,
            RefreshDecision::Triggered => {
                log::debug!("index rebuild requested");
                store.rebuild();
            }
            RefreshDecision::Scheduled => {
                log::debug!("scheduled index rebuild");
                store.rebuild();
                next_tick += interval;
                let now = Instant::now();
                if next_tick <= now {
                    next_tick = now + interval;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn wait_for_rebuilds(store: &IndexStore, count: u64) -> bool {
        let deadline = Instant::now() + Duration::from_secs(10);
        while Instant::now() < deadline {
            if store.status().rebuild_count >= count {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        false
    }

    fn store_for(temp: &TempDir) -> Arc<IndexStore> {
        let store = Arc::new(IndexStore::default());
        store.set_roots([temp.path()]).unwrap();
        store
    }

    #[test]
    fn signal_reports_trigger_then_shutdown() {
        let signal = RefreshSignal::default();
        let far = Instant::now() + Duration::from_secs(60);

        signal.trigger();
        signal.trigger();
        assert_eq!(signal.wait_until(far), RefreshDecision::Triggered);

        signal.shutdown();
        assert_eq!(signal.wait_until(far), RefreshDecision::Shutdown);
    }

    #[test]
    fn signal_times_out_as_scheduled() {
        let signal = RefreshSignal::default();
        let soon = Instant::now() + Duration::from_millis(20);
        assert_eq!(signal.wait_until(soon), RefreshDecision::Scheduled);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let store = Arc::new(IndexStore::default());
        let error = spawn_refresher(store, Duration::ZERO).expect_err("zero interval");
        assert!(matches!(error, PkgPathsError::InvalidInput(_)));
    }

    #[test]
    fn manual_trigger_rebuilds() {
        let temp = TempDir::new().unwrap();
        let store = store_for(&temp);
        let handle = spawn_refresher(store.clone(), Duration::from_secs(3600)).unwrap();

        fs::create_dir(temp.path().join("fmt")).unwrap();
        File::create(temp.path().join("fmt/print.go")).unwrap();
        handle.trigger();

        assert!(wait_for_rebuilds(&store, 1));
        assert_eq!(store.query("fmt", crate::QueryKind::Imports), vec!["fmt"]);
        handle.shutdown();
    }

    #[test]
    fn interval_rebuilds_repeatedly() {
        let temp = TempDir::new().unwrap();
        let store = store_for(&temp);
        let handle = spawn_refresher(store.clone(), Duration::from_millis(20)).unwrap();

        assert!(wait_for_rebuilds(&store, 3));
        drop(handle);

        let settled = store.status().rebuild_count;
        thread::sleep(Duration::from_millis(100));
        assert_eq!(store.status().rebuild_count, settled);
    }
}
