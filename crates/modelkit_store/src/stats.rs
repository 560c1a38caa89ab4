//! Store statistics.
//!
//! # Usage
//!
//! ```rust,ignore
//! let store = MemoryStore::open(StoreConfig::default())?;
//!
//! // Perform operations...
//!
//! let stats = store.stats();
//! println!("Scans: {}", stats.scans);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Operation counters for a store.
///
/// All counters are atomic and monotonically increasing.
#[derive(Debug, Default)]
pub struct StoreStats {
    /// Documents decoded from storage.
    reads: AtomicU64,
    /// Documents inserted or updated.
    writes: AtomicU64,
    /// Documents deleted.
    deletes: AtomicU64,
    /// Full collection scans.
    scans: AtomicU64,
    /// Lookups served by the id map or a unique index.
    index_lookups: AtomicU64,
    /// Writes rejected by a unique index.
    duplicate_rejections: AtomicU64,
    /// Encoded bytes written.
    bytes_written: AtomicU64,
    /// Encoded bytes decoded.
    bytes_read: AtomicU64,
}

impl StoreStats {
    /// Creates a new stats instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a document decoded from storage.
    pub(crate) fn record_read(&self, bytes: u64) {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Records a document written.
    pub(crate) fn record_write(&self, bytes: u64) {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Records deleted documents.
    pub(crate) fn record_deletes(&self, count: u64) {
        self.deletes.fetch_add(count, Ordering::Relaxed);
    }

    /// Records a full scan.
    pub(crate) fn record_scan(&self) {
        self.scans.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an index lookup.
    pub(crate) fn record_index_lookup(&self) {
        self.index_lookups.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a write rejected for a duplicate key.
    pub(crate) fn record_duplicate(&self) {
        self.duplicate_rejections.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a snapshot of all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            scans: self.scans.load(Ordering::Relaxed),
            index_lookups: self.index_lookups.load(Ordering::Relaxed),
            duplicate_rejections: self.duplicate_rejections.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of store statistics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Documents decoded from storage.
    pub reads: u64,
    /// Documents inserted or updated.
    pub writes: u64,
    /// Documents deleted.
    pub deletes: u64,
    /// Full collection scans.
    pub scans: u64,
    /// Lookups served by the id map or a unique index.
    pub index_lookups: u64,
    /// Writes rejected by a unique index.
    pub duplicate_rejections: u64,
    /// Encoded bytes written.
    pub bytes_written: u64,
    /// Encoded bytes decoded.
    pub bytes_read: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stats_are_zero() {
        assert_eq!(StoreStats::new().snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn record_operations() {
        let stats = StoreStats::new();

        stats.record_read(100);
        stats.record_read(50);
        stats.record_write(200);
        stats.record_deletes(3);
        stats.record_scan();
        stats.record_duplicate();

        let snap = stats.snapshot();
        assert_eq!(snap.reads, 2);
        assert_eq!(snap.bytes_read, 150);
        assert_eq!(snap.writes, 1);
        assert_eq!(snap.bytes_written, 200);
        assert_eq!(snap.deletes, 3);
        assert_eq!(snap.scans, 1);
        assert_eq!(snap.duplicate_rejections, 1);
    }

    #[test]
    fn concurrent_updates() {
        use std::sync::Arc;
        use std::thread;

        let stats = Arc::new(StoreStats::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let s = Arc::clone(&stats);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    s.record_index_lookup();
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(stats.snapshot().index_lookups, 1000);
    }
}
