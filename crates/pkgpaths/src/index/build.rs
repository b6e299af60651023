//! Rebuild state and bookkeeping.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Index build state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[repr(u8)]
pub enum IndexBuildState {
    Idle = 0,
    Building = 1,
    Ready = 2,
}

impl IndexBuildState {
    /// Loads the state from an atomic.
    pub fn load(atomic: &AtomicU8) -> Self {
        match atomic.load(Ordering::Relaxed) {
            1 => Self::Building,
            2 => Self::Ready,
            _ => Self::Idle,
        }
    }

    /// Returns the state as a string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Building => "building",
            Self::Ready => "ready",
        }
    }
}

/// Counters describing completed rebuilds.
#[derive(Debug, Default)]
pub struct RebuildProgress {
    pub rebuild_count: AtomicU64,
    pub finished_at: AtomicU64,
    pub elapsed_ms: AtomicU64,
}

impl RebuildProgress {
    /// Records a finished rebuild.
    pub fn record(&self, finished_at: u64, elapsed_ms: u64) {
        self.finished_at.store(finished_at, Ordering::Relaxed);
        self.elapsed_ms.store(elapsed_ms, Ordering::Relaxed);
        self.rebuild_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Takes a snapshot of the progress values.
    pub fn snapshot(&self) -> ProgressSnapshot {
        let rebuild_count = self.rebuild_count.load(Ordering::Relaxed);
        let finished = rebuild_count > 0;
        ProgressSnapshot {
            rebuild_count,
            finished_at: zero_to_none(self.finished_at.load(Ordering::Relaxed)),
            elapsed_ms: finished.then(|| self.elapsed_ms.load(Ordering::Relaxed)),
        }
    }
}

/// A snapshot of rebuild progress values.
#[derive(Debug, Clone)]
pub struct ProgressSnapshot {
    pub rebuild_count: u64,
    pub finished_at: Option<u64>,
    pub elapsed_ms: Option<u64>,
}

/// Returns the current Unix timestamp in seconds.
pub fn unix_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_secs())
        .unwrap_or(0)
}

/// Converts 0 to None for optional timestamps.
pub fn zero_to_none(value: u64) -> Option<u64> {
    if value == 0 {
        None
    } else {
        Some(value)
    }
}
