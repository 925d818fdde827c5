//! Output surfaces (physical displays) the rig renders to.

/// The host's display API, reduced to what the rig needs.
pub trait DisplayBackend {
    /// Number of connected output surfaces.
    fn surface_count(&self) -> usize;

    /// Activates the surface at `index`. Surface 0 is always active.
    fn activate_surface(&mut self, index: usize);
}

/// Activates every secondary surface (index 1 and up) and returns the
/// detected surface count.
pub fn activate_secondary_surfaces(backend: &mut dyn DisplayBackend) -> usize {
    let count = backend.surface_count();
    log::info!("displays connected: {count}");
    for index in 1..count {
        backend.activate_surface(index);
    }
    count
}

/// A display backend without real displays.
///
/// Records which surfaces were activated. Useful for tests and for hosts
/// running without a display server.
#[derive(Debug, Clone)]
pub struct HeadlessDisplays {
    active: Vec<bool>,
}

impl HeadlessDisplays {
    /// Creates a backend reporting `count` surfaces; only surface 0 starts active.
    #[must_use]
    pub fn new(count: usize) -> Self {
        let mut active = vec![false; count];
        if let Some(primary) = active.first_mut() {
            *primary = true;
        }
        Self { active }
    }

    /// Returns whether the surface at `index` has been activated.
    #[must_use]
    pub fn is_active(&self, index: usize) -> bool {
        self.active.get(index).copied().unwrap_or(false)
    }

    /// Number of active surfaces.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|a| **a).count()
    }
}

impl DisplayBackend for HeadlessDisplays {
    fn surface_count(&self) -> usize {
        self.active.len()
    }

    fn activate_surface(&mut self, index: usize) {
        if let Some(slot) = self.active.get_mut(index) {
            *slot = true;
        } else {
            log::warn!("cannot activate display {index}: only {} connected", self.active.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_secondary_surfaces() {
        let mut displays = HeadlessDisplays::new(3);
        assert_eq!(displays.active_count(), 1);
        assert_eq!(activate_secondary_surfaces(&mut displays), 3);
        assert!(displays.is_active(0));
        assert!(displays.is_active(1));
        assert!(displays.is_active(2));
    }

    #[test]
    fn test_no_displays() {
        let mut displays = HeadlessDisplays::new(0);
        assert_eq!(activate_secondary_surfaces(&mut displays), 0);
        assert_eq!(displays.active_count(), 0);
        assert!(!displays.is_active(0));
    }
}
