//! Statistics tracking for the trackers
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters, updated lock-free from any world thread.
#[derive(Debug, Default)]
pub struct TrackerStats {
    inserted: AtomicU64,
    merged: AtomicU64,
    evicted: AtomicU64,
    swept: AtomicU64,
    sweeps: AtomicU64,
    discarded_ghosts: AtomicU64,
    filtered: AtomicU64,
    mutation_failures: AtomicU64,
}

impl TrackerStats {
    pub fn record_inserted(&self) {
        self.inserted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_merged(&self) {
        self.merged.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_evicted(&self) {
        self.evicted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sweep(&self, removed: usize) {
        self.sweeps.fetch_add(1, Ordering::Relaxed);
        self.swept.fetch_add(removed as u64, Ordering::Relaxed);
    }

    pub fn record_discarded_ghost(&self) {
        self.discarded_ghosts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_filtered(&self) {
        self.filtered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_mutation_failure(&self) {
        self.mutation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, tracked: usize) -> TrackerStatsSnapshot {
        TrackerStatsSnapshot {
            tracked,
            inserted: self.inserted.load(Ordering::Relaxed),
            merged: self.merged.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
            swept: self.swept.load(Ordering::Relaxed),
            sweeps: self.sweeps.load(Ordering::Relaxed),
            discarded_ghosts: self.discarded_ghosts.load(Ordering::Relaxed),
            filtered: self.filtered.load(Ordering::Relaxed),
            mutation_failures: self.mutation_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of a tracker's counters for monitoring
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerStatsSnapshot {
    /// Objects currently indexed
    pub tracked: usize,
    /// Objects indexed as new since start
    pub inserted: u64,
    /// Incoming objects fully absorbed by a merge
    pub merged: u64,
    /// Objects discarded by a capacity limit
    pub evicted: u64,
    /// Stale references removed by verification sweeps
    pub swept: u64,
    /// Verification sweeps run
    pub sweeps: u64,
    /// Zero-value orbs discarded on entry
    pub discarded_ghosts: u64,
    /// Objects rejected by the allow/deny filter
    pub filtered: u64,
    /// Host mutations that failed
    pub mutation_failures: u64,
}
