//! Registry of external collaborators, looked up by name.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{PowerwallError, Result};
use crate::tracking::TrackingClient;

/// Named tracking clients the host makes available once they exist.
///
/// Replaces scene-wide lookup by object name: the host registers each data
/// stream under a name and hands the registry to
/// [`CameraStateMachine::bind_tracking`](crate::CameraStateMachine::bind_tracking).
#[derive(Default)]
pub struct CollaboratorRegistry {
    clients: HashMap<String, Arc<dyn TrackingClient>>,
}

impl CollaboratorRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tracking client under `name`.
    ///
    /// Returns an error if the name is taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        client: Arc<dyn TrackingClient>,
    ) -> Result<()> {
        let name = name.into();
        if self.clients.contains_key(&name) {
            return Err(PowerwallError::CollaboratorExists(name));
        }
        log::debug!("registered {:?} tracking client '{name}'", client.source());
        self.clients.insert(name, client);
        Ok(())
    }

    /// Gets a tracking client by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn TrackingClient>> {
        self.clients.get(name).cloned()
    }

    /// Gets a tracking client by name, or [`PowerwallError::MissingCollaborator`].
    pub fn require(&self, name: &str) -> Result<Arc<dyn TrackingClient>> {
        self.get(name)
            .ok_or_else(|| PowerwallError::MissingCollaborator(name.to_string()))
    }

    /// Checks if a client with the given name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.clients.contains_key(name)
    }

    /// Removes a client by name.
    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn TrackingClient>> {
        self.clients.remove(name)
    }

    /// Removes all clients.
    pub fn clear(&mut self) {
        self.clients.clear();
    }

    /// Returns the number of registered clients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Returns true if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
