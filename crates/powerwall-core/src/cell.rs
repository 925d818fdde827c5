//! Single-slot, last-write-wins pose exchange.
//!
//! A writer (usually a tracking client running on its own thread) publishes
//! poses into a [`PoseCell`]; the per-frame update reads whatever was written
//! last. There is no queue: intermediate writes between two reads are lost.
//! Readers tell new data from old by the write sequence, never by the value.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::pose::Pose;

/// Shared cell holding the most recently published pose.
///
/// Defaults to plain [`Pose`]s; the tracking board stores timestamped
/// [`TrackedPose`](crate::pose::TrackedPose)s in the same kind of slot.
#[derive(Debug)]
pub struct PoseCell<T = Pose> {
    latest: Mutex<Option<T>>,
    sequence: AtomicU64,
}

impl<T> Default for PoseCell<T> {
    fn default() -> Self {
        Self {
            latest: Mutex::new(None),
            sequence: AtomicU64::new(0),
        }
    }
}

impl<T: Clone> PoseCell<T> {
    /// Creates an empty cell.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cell already holding `pose`.
    #[must_use]
    pub fn with_pose(pose: T) -> Self {
        let cell = Self::new();
        cell.publish(pose);
        cell
    }

    /// Replaces the stored pose and bumps the write sequence.
    pub fn publish(&self, pose: T) {
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        *latest = Some(pose);
        // Bumped under the lock so `snapshot` sees value and sequence together.
        self.sequence.fetch_add(1, Ordering::Release);
    }

    /// Returns the latest pose, or `None` if nothing was published yet.
    ///
    /// The pose stays in the cell; repeated reads return the same value until
    /// the next write.
    #[must_use]
    pub fn latest(&self) -> Option<T> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the latest pose together with the sequence of the write that
    /// stored it.
    #[must_use]
    pub fn snapshot(&self) -> Option<(u64, T)> {
        let latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        let pose = latest.clone()?;
        Some((self.sequence.load(Ordering::Acquire), pose))
    }

    /// Number of writes so far. Increments on every [`publish`](Self::publish).
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::Acquire)
    }

    /// Empties the cell and returns what it held. The sequence is left
    /// untouched, so a later write is never mistaken for an old one.
    pub fn clear(&self) -> Option<T> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Returns true if the cell holds a pose.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
