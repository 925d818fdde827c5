use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::cell::PoseCell;
use crate::error::{PowerwallError, Result};
use crate::options::TrackingOptions;
use crate::pose::{BodyId, TrackedPose};
use crate::registry::CollaboratorRegistry;

use super::{PoseUpdate, TrackingClient, TrackingInputAdapter, TrackingSource};

/// Reads poses for one body from an external tracking client.
///
/// Does no networking itself. An update is reported only when the body's
/// write sequence changed since the last one returned; timestamps are
/// carried along but never compared.
pub struct ExternalTracking {
    client: Arc<dyn TrackingClient>,
    body: BodyId,
    last_sequence: Option<u64>,
    last_timestamp: Option<f64>,
}

impl ExternalTracking {
    /// Creates an adapter reading `body` from `client`.
    pub fn new(client: Arc<dyn TrackingClient>, body: BodyId) -> Self {
        Self {
            client,
            body,
            last_sequence: None,
            last_timestamp: None,
        }
    }

    /// Looks up the configured data stream and checks it speaks the
    /// configured source.
    ///
    /// Returns `Ok(None)` when no external source is selected.
    pub fn resolve(
        registry: &CollaboratorRegistry,
        options: &TrackingOptions,
    ) -> Result<Option<Self>> {
        if !options.source.is_external() {
            return Ok(None);
        }
        let client = registry.require(&options.stream_name)?;
        if client.source() != options.source {
            return Err(PowerwallError::UnsupportedSource {
                requested: options.source,
                available: client.source(),
            });
        }
        Ok(Some(Self::new(client, options.body_id())))
    }

    /// The body this adapter follows.
    #[must_use]
    pub fn body(&self) -> &BodyId {
        &self.body
    }
}

impl std::fmt::Debug for ExternalTracking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExternalTracking")
            .field("source", &self.client.source())
            .field("body", &self.body)
            .field("last_sequence", &self.last_sequence)
            .finish_non_exhaustive()
    }
}

impl TrackingInputAdapter for ExternalTracking {
    fn source(&self) -> TrackingSource {
        self.client.source()
    }

    fn poll(&mut self) -> Option<PoseUpdate> {
        let (sequence, tracked) = self.client.latest_pose(&self.body)?;
        if self.last_sequence == Some(sequence) {
            return None;
        }
        if let Some(last) = self.last_timestamp {
            if tracked.timestamp < last {
                log::debug!(
                    "{}: tracking clock went back ({last} -> {})",
                    self.body,
                    tracked.timestamp
                );
            }
        }
        self.last_sequence = Some(sequence);
        self.last_timestamp = Some(tracked.timestamp);
        Some(PoseUpdate::Absolute(tracked.pose))
    }
}

/// In-process tracking client: one last-write-wins [`PoseCell`] per body.
///
/// The ingestion side calls [`publish`](Self::publish) from its own thread;
/// readers get whatever was written last, tagged with that body's write
/// sequence.
#[derive(Debug)]
pub struct PoseBoard {
    source: TrackingSource,
    bodies: Mutex<HashMap<BodyId, Arc<PoseCell<TrackedPose>>>>,
    writes: AtomicU64,
}

impl PoseBoard {
    /// Creates an empty board speaking `source`.
    #[must_use]
    pub fn new(source: TrackingSource) -> Self {
        Self {
            source,
            bodies: Mutex::new(HashMap::new()),
            writes: AtomicU64::new(0),
        }
    }

    fn cell(&self, body: &BodyId) -> Option<Arc<PoseCell<TrackedPose>>> {
        self.bodies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(body)
            .cloned()
    }

    /// Stores `pose`, replacing whatever was stored for its body.
    pub fn publish(&self, pose: TrackedPose) {
        let cell = Arc::clone(
            self.bodies
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(pose.body.clone())
                .or_default(),
        );
        cell.publish(pose);
        self.writes.fetch_add(1, Ordering::Release);
    }

    /// Forgets the pose of `body`, e.g. when it leaves the tracking volume.
    ///
    /// The body's write sequence survives, so a pose published after it
    /// comes back is still reported as new.
    pub fn remove(&self, body: &BodyId) -> Option<TrackedPose> {
        self.cell(body)?.clear()
    }

    /// Total number of writes so far, across all bodies.
    #[must_use]
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Acquire)
    }

    /// Number of bodies with a stored pose.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|cell| cell.is_set())
            .count()
    }

    /// Returns true if no body has a stored pose.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TrackingClient for PoseBoard {
    fn source(&self) -> TrackingSource {
        self.source
    }

    fn latest_pose(&self, body: &BodyId) -> Option<(u64, TrackedPose)> {
        self.cell(body)?.snapshot()
    }
}
