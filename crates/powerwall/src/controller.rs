//! Rig setup and per-frame control.
//!
//! [`StereoCameraController`] is what a host holds on to: it detects the
//! output surfaces, builds the rig, starts under manual control and switches
//! to external tracking once [`bind`](StereoCameraController::bind) is called
//! with the available collaborators.
//!
//! # Example
//!
//! ```
//! use powerwall::*;
//!
//! let mut displays = HeadlessDisplays::new(2);
//! let mut controller =
//!     StereoCameraController::new(PowerwallConfig::default(), &mut displays, None);
//!
//! // Later, once the host knows which tracking streams exist:
//! let registry = CollaboratorRegistry::new();
//! assert_eq!(controller.bind(&registry), TrackingSource::None);
//!
//! controller.handle_input(InputEvent::KeyPressed(ControlKey::Forward));
//! controller.update(1.0 / 60.0);
//! assert_eq!(controller.current_mode(), CameraMode::Free);
//! ```

use std::path::Path;

use powerwall_core::{
    activate_secondary_surfaces, CameraMode, CameraObserver, CameraStateMachine,
    CollaboratorRegistry, DisplayBackend, DisplayRig, FollowTarget, InputEvent, ManualInput,
    PowerwallConfig, Result, TrackingSource,
};

/// Owns the rig and its state machine for one stereo display setup.
#[derive(Debug)]
pub struct StereoCameraController {
    config: PowerwallConfig,
    machine: CameraStateMachine,
}

impl StereoCameraController {
    /// Detects surfaces on `displays`, activates the secondary ones and builds
    /// the rig under manual control.
    ///
    /// If the configured rig does not fit the detected surfaces, a single
    /// viewpoint is used instead.
    pub fn new(
        config: PowerwallConfig,
        displays: &mut dyn DisplayBackend,
        observer: Option<Box<dyn CameraObserver>>,
    ) -> Self {
        let surfaces = activate_secondary_surfaces(displays);
        let rig = build_rig(&config, surfaces);

        let machine = CameraStateMachine::new(
            rig,
            Box::new(ManualInput::new(config.controls)),
            config.camera,
            observer,
        );
        log::info!(
            "stereo camera ready: {} viewpoint(s) on {} display(s), {} mode",
            machine.rig().len(),
            machine.rig().surface_count(),
            machine.mode().name()
        );
        Self { config, machine }
    }

    /// Loads the configuration from a JSON file, then behaves like [`new`](Self::new).
    pub fn from_config_path(
        path: impl AsRef<Path>,
        displays: &mut dyn DisplayBackend,
        observer: Option<Box<dyn CameraObserver>>,
    ) -> Result<Self> {
        let config = PowerwallConfig::from_path(path)?;
        Ok(Self::new(config, displays, observer))
    }

    /// Switches to the configured tracking source.
    ///
    /// Returns the error if the data stream is missing or speaks a different
    /// source; manual control stays in effect in that case.
    pub fn try_bind(&mut self, registry: &CollaboratorRegistry) -> Result<TrackingSource> {
        self.machine.bind_tracking(registry, &self.config.tracking)
    }

    /// Like [`try_bind`](Self::try_bind), but logs failures and returns the
    /// source actually in effect.
    pub fn bind(&mut self, registry: &CollaboratorRegistry) -> TrackingSource {
        match self.try_bind(registry) {
            Ok(source) => source,
            Err(e) => {
                log::warn!("{e}; keeping manual control");
                self.machine.tracking_source()
            }
        }
    }

    /// Moves to the next camera mode and returns it.
    pub fn toggle(&mut self) -> CameraMode {
        self.machine.advance()
    }

    /// Enters Free mode.
    pub fn set_free(&mut self) {
        self.machine.force_free();
    }

    /// Enters Cinematic mode.
    pub fn set_cinematic(&mut self) {
        self.machine.force_cinematic();
    }

    /// Rebinds the follow target when the host's active agent changes.
    pub fn on_agent_changed(&mut self, agent: FollowTarget) {
        self.machine.set_follow_target(Some(agent));
    }

    /// Follows the rig's home pose.
    pub fn reset(&mut self) {
        self.machine.reset();
    }

    /// The current camera mode.
    #[must_use]
    pub fn current_mode(&self) -> CameraMode {
        self.machine.mode()
    }

    /// Forwards a host input event.
    pub fn handle_input(&mut self, event: InputEvent) {
        self.machine.handle_input(event);
    }

    /// Advances one frame.
    pub fn update(&mut self, dt: f32) {
        self.machine.update(dt);
    }

    /// The rig.
    #[must_use]
    pub fn rig(&self) -> &DisplayRig {
        self.machine.rig()
    }

    /// The state machine driving the rig.
    #[must_use]
    pub fn state_machine(&self) -> &CameraStateMachine {
        &self.machine
    }

    /// Mutable access to the state machine.
    pub fn state_machine_mut(&mut self) -> &mut CameraStateMachine {
        &mut self.machine
    }

    /// The configuration this controller was built from.
    #[must_use]
    pub fn config(&self) -> &PowerwallConfig {
        &self.config
    }
}

fn build_rig(config: &PowerwallConfig, surfaces: usize) -> DisplayRig {
    let mut rig = DisplayRig::new(surfaces);
    let requested = config.rig.requested_viewpoints();
    let mut eye_separation = config.rig.eye_separation;
    if !eye_separation.is_finite() || eye_separation < 0.0 {
        log::warn!("invalid eye separation {eye_separation}, using 0");
        eye_separation = 0.0;
    }

    if let Err(e) = rig.configure(requested, eye_separation) {
        log::warn!("{e}; falling back to a single viewpoint");
        // Cannot fail: one viewpoint always fits and the separation is valid.
        let _ = rig.configure(1, eye_separation);
    }
    rig.bind_surfaces();
    rig
}

#[cfg(test)]
mod tests {
    use powerwall_core::{HeadlessDisplays, RigOptions};

    use super::*;

    #[test]
    fn test_build_rig_degrades_to_mono() {
        let config = PowerwallConfig::default();
        let rig = build_rig(&config, 1);
        assert_eq!(rig.len(), 1);
        assert_eq!(rig.viewpoint(0).unwrap().name(), "center");
    }

    #[test]
    fn test_build_rig_bad_separation() {
        let config = PowerwallConfig {
            rig: RigOptions {
                eye_separation: -3.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let rig = build_rig(&config, 2);
        assert_eq!(rig.len(), 2);
        assert!(rig.eye_separation().abs() < f32::EPSILON);
    }

    #[test]
    fn test_new_activates_secondary_displays() {
        let mut displays = HeadlessDisplays::new(3);
        let controller =
            StereoCameraController::new(PowerwallConfig::default(), &mut displays, None);
        assert_eq!(displays.active_count(), 3);
        assert_eq!(controller.rig().viewpoint(0).unwrap().surface(), 1);
        assert_eq!(controller.rig().viewpoint(1).unwrap().surface(), 2);
    }
}
