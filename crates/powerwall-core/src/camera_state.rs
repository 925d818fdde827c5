//! Camera modes and the state machine that moves the rig.
//!
//! The machine cycles Free → Follow → Cinematic → Free. Each mode computes
//! the rig pose from a different source:
//!
//! - **Free**: the tracking input adapter (manual control or external tracking)
//! - **Follow**: a bound target entity, offset in the target's frame
//! - **Cinematic**: an orbit around a focus point captured on entry
//!
//! Every transition is reported to an optional observer (typically the UI).

use std::sync::Arc;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::cell::PoseCell;
use crate::error::Result;
use crate::input::InputEvent;
use crate::options::{CameraOptions, TrackingOptions};
use crate::pose::Pose;
use crate::registry::CollaboratorRegistry;
use crate::rig::DisplayRig;
use crate::tracking::{ExternalTracking, PoseUpdate, TrackingInputAdapter, TrackingSource};

/// Camera mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CameraMode {
    /// Driven by manual input or external tracking.
    #[default]
    Free,
    /// Chases a target entity.
    Follow,
    /// Orbits a focus point.
    Cinematic,
}

impl CameraMode {
    /// All modes in cycle order.
    pub const ALL: [CameraMode; 3] = [CameraMode::Free, CameraMode::Follow, CameraMode::Cinematic];

    /// The mode after this one in the cycle.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            CameraMode::Free => CameraMode::Follow,
            CameraMode::Follow => CameraMode::Cinematic,
            CameraMode::Cinematic => CameraMode::Free,
        }
    }

    /// Returns display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            CameraMode::Free => "Free",
            CameraMode::Follow => "Follow",
            CameraMode::Cinematic => "Cinematic",
        }
    }
}

/// Receives camera mode changes.
pub trait CameraObserver {
    /// Called after every transition with the new mode.
    fn on_camera_state_changed(&mut self, mode: CameraMode);
}

impl<F> CameraObserver for F
where
    F: FnMut(CameraMode),
{
    fn on_camera_state_changed(&mut self, mode: CameraMode) {
        self(mode);
    }
}

/// A followable entity: the host publishes its pose every tick.
pub type FollowTarget = Arc<PoseCell>;

#[derive(Debug, Clone, Copy)]
struct Orbit {
    focus: Vec3,
    angle_degrees: f32,
}

/// Drives a [`DisplayRig`] through the camera modes.
pub struct CameraStateMachine {
    rig: DisplayRig,
    mode: CameraMode,
    adapter: Box<dyn TrackingInputAdapter>,
    observer: Option<Box<dyn CameraObserver>>,
    options: CameraOptions,
    home: Pose,
    follow_target: Option<FollowTarget>,
    active_follow: Option<FollowTarget>,
    orbit: Option<Orbit>,
}

impl CameraStateMachine {
    /// Creates a state machine in `options.initial_mode`.
    ///
    /// The rig's current pose becomes the home pose used by [`reset`](Self::reset).
    /// The initial mode is activated without notifying the observer.
    pub fn new(
        rig: DisplayRig,
        adapter: Box<dyn TrackingInputAdapter>,
        options: CameraOptions,
        observer: Option<Box<dyn CameraObserver>>,
    ) -> Self {
        let mut machine = Self {
            home: rig.pose(),
            rig,
            mode: options.initial_mode,
            adapter,
            observer,
            options,
            follow_target: None,
            active_follow: None,
            orbit: None,
        };
        machine.activate();
        machine
    }

    /// The current mode.
    #[must_use]
    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// The rig being driven.
    #[must_use]
    pub fn rig(&self) -> &DisplayRig {
        &self.rig
    }

    /// Mutable access to the rig.
    pub fn rig_mut(&mut self) -> &mut DisplayRig {
        &mut self.rig
    }

    /// Consumes the machine and returns its rig.
    #[must_use]
    pub fn into_rig(self) -> DisplayRig {
        self.rig
    }

    /// Camera tunables.
    #[must_use]
    pub fn options(&self) -> &CameraOptions {
        &self.options
    }

    /// Source of the current input adapter.
    #[must_use]
    pub fn tracking_source(&self) -> TrackingSource {
        self.adapter.source()
    }

    /// Moves to the next mode in the cycle and returns it.
    pub fn advance(&mut self) -> CameraMode {
        self.transition(self.mode.next());
        self.mode
    }

    /// Enters Free mode directly.
    pub fn force_free(&mut self) {
        self.transition(CameraMode::Free);
    }

    /// Enters Follow mode directly.
    pub fn force_follow(&mut self) {
        self.transition(CameraMode::Follow);
    }

    /// Enters Cinematic mode directly.
    pub fn force_cinematic(&mut self) {
        self.transition(CameraMode::Cinematic);
    }

    /// Binds the entity Follow mode chases.
    ///
    /// Takes effect immediately in Follow mode; otherwise the next time
    /// Follow is entered.
    pub fn set_follow_target(&mut self, target: Option<FollowTarget>) {
        self.follow_target = target;
        if self.mode == CameraMode::Follow {
            self.active_follow.clone_from(&self.follow_target);
        }
    }

    /// The bound follow target, if any.
    #[must_use]
    pub fn follow_target(&self) -> Option<&FollowTarget> {
        self.follow_target.as_ref()
    }

    /// Follows the home pose the machine was created with.
    pub fn reset(&mut self) {
        self.set_follow_target(Some(Arc::new(PoseCell::with_pose(self.home))));
        self.force_follow();
    }

    /// Replaces the input adapter.
    pub fn set_adapter(&mut self, adapter: Box<dyn TrackingInputAdapter>) {
        log::info!(
            "camera input: {:?} -> {:?}",
            self.adapter.source(),
            adapter.source()
        );
        self.adapter = adapter;
    }

    /// Looks up the configured data stream and, if it matches, switches to
    /// external tracking. On error the current adapter is kept.
    pub fn bind_tracking(
        &mut self,
        registry: &CollaboratorRegistry,
        options: &TrackingOptions,
    ) -> Result<TrackingSource> {
        if let Some(external) = ExternalTracking::resolve(registry, options)? {
            self.set_adapter(Box::new(external));
        }
        Ok(self.adapter.source())
    }

    /// Forwards an input event to the adapter.
    pub fn handle_input(&mut self, event: InputEvent) {
        self.adapter.handle_input(event);
    }

    /// Advances one frame of `dt` seconds.
    ///
    /// The adapter is polled exactly once per call, in every mode, so
    /// external poses do not pile up while another mode is active.
    pub fn update(&mut self, dt: f32) {
        let update = self.adapter.poll();
        match self.mode {
            CameraMode::Free => match update {
                Some(PoseUpdate::Relative(delta)) => self.rig.pose_mut().apply_delta(&delta),
                Some(PoseUpdate::Absolute(pose)) => self.rig.set_pose(pose),
                None => {}
            },
            CameraMode::Follow => {
                if let Some(target) = self.active_follow.as_ref().and_then(|t| t.latest()) {
                    self.rig.set_pose(Pose::new(
                        target.transform_point(self.options.follow_offset),
                        target.orientation,
                    ));
                }
            }
            CameraMode::Cinematic => {
                if let Some(mut orbit) = self.orbit {
                    orbit.angle_degrees =
                        (orbit.angle_degrees + self.options.orbit_speed_degrees * dt) % 360.0;
                    self.orbit = Some(orbit);
                    let pose = self.orbit_pose(orbit);
                    self.rig.set_pose(pose);
                }
            }
        }
    }

    fn transition(&mut self, mode: CameraMode) {
        log::debug!("camera state {} -> {}", self.mode.name(), mode.name());
        self.mode = mode;
        self.activate();
        if let Some(observer) = self.observer.as_mut() {
            observer.on_camera_state_changed(mode);
        }
    }

    fn activate(&mut self) {
        match self.mode {
            CameraMode::Free => {
                self.active_follow = None;
                self.orbit = None;
            }
            CameraMode::Follow => {
                self.orbit = None;
                self.active_follow.clone_from(&self.follow_target);
                if self.active_follow.is_none() {
                    log::warn!("follow mode entered without a target, holding current pose");
                }
            }
            CameraMode::Cinematic => {
                self.active_follow = None;
                let pose = self.rig.pose();
                let mut forward = pose.forward();
                forward.y = 0.0;
                let forward = forward.try_normalize().unwrap_or(Vec3::Z);
                let focus = pose.position + forward * self.options.orbit_radius;
                // Start the orbit on the side the rig is on, looking at the focus.
                let angle = (-forward.x).atan2(-forward.z).to_degrees();
                let orbit = Orbit {
                    focus,
                    angle_degrees: angle,
                };
                self.orbit = Some(orbit);
                let pose = self.orbit_pose(orbit);
                self.rig.set_pose(pose);
            }
        }
    }

    fn orbit_pose(&self, orbit: Orbit) -> Pose {
        let angle = orbit.angle_degrees.to_radians();
        let radius = self.options.orbit_radius;
        let position = orbit.focus
            + Vec3::new(
                radius * angle.sin(),
                self.options.orbit_height,
                radius * angle.cos(),
            );
        Pose::new(
            position,
            Quat::from_rotation_y(angle + std::f32::consts::PI),
        )
    }
}

impl std::fmt::Debug for CameraStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraStateMachine")
            .field("mode", &self.mode)
            .field("source", &self.adapter.source())
            .field("rig", &self.rig)
            .field("has_observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use proptest::prelude::*;

    use super::*;
    use crate::input::ControlKey;
    use crate::options::ControlOptions;
    use crate::tracking::{ManualInput, PoseBoard};

    fn machine() -> CameraStateMachine {
        let mut rig = DisplayRig::new(2);
        rig.configure(2, 0.2).unwrap();
        CameraStateMachine::new(
            rig,
            Box::new(ManualInput::new(ControlOptions::default())),
            CameraOptions::default(),
            None,
        )
    }

    fn observed() -> (CameraStateMachine, Rc<RefCell<Vec<CameraMode>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let machine = CameraStateMachine::new(
            DisplayRig::new(1),
            Box::new(ManualInput::default()),
            CameraOptions::default(),
            Some(Box::new(move |mode: CameraMode| sink.borrow_mut().push(mode))),
        );
        (machine, seen)
    }

    #[test]
    fn test_cycle_order() {
        let mut machine = machine();
        assert_eq!(machine.mode(), CameraMode::Free);
        assert_eq!(machine.advance(), CameraMode::Follow);
        assert_eq!(machine.advance(), CameraMode::Cinematic);
        assert_eq!(machine.advance(), CameraMode::Free);
    }

    #[test]
    fn test_observer_notified_on_every_transition() {
        let (mut machine, seen) = observed();
        assert!(seen.borrow().is_empty());
        machine.advance();
        machine.force_cinematic();
        machine.force_free();
        machine.force_free();
        assert_eq!(
            *seen.borrow(),
            vec![
                CameraMode::Follow,
                CameraMode::Cinematic,
                CameraMode::Free,
                CameraMode::Free
            ]
        );
    }

    #[test]
    fn test_no_observer_is_fine() {
        let mut machine = machine();
        machine.force_cinematic();
        machine.update(0.016);
        assert_eq!(machine.mode(), CameraMode::Cinematic);
    }

    #[test]
    fn test_free_mode_applies_manual_delta() {
        let mut machine = machine();
        machine.handle_input(InputEvent::KeyPressed(ControlKey::Forward));
        machine.update(0.016);
        machine.update(0.016);
        assert!(machine
            .rig()
            .pose()
            .position
            .abs_diff_eq(Vec3::new(0.0, 0.0, 0.04), 1e-6));
    }

    #[test]
    fn test_manual_input_ignored_outside_free() {
        let mut machine = machine();
        machine.force_follow();
        machine.handle_input(InputEvent::KeyPressed(ControlKey::Right));
        machine.update(0.016);
        assert_eq!(machine.rig().pose(), Pose::IDENTITY);
    }

    #[test]
    fn test_follow_target_only_applies_in_follow() {
        let mut machine = machine();
        let target = Arc::new(PoseCell::with_pose(Pose::from_position(Vec3::new(10.0, 0.0, 0.0))));
        machine.set_follow_target(Some(target.clone()));
        machine.update(0.016);
        assert_eq!(machine.rig().pose(), Pose::IDENTITY);

        machine.advance();
        machine.update(0.016);
        let expected = Vec3::new(10.0, 0.0, 0.0) + CameraOptions::default().follow_offset;
        assert!(machine.rig().pose().position.abs_diff_eq(expected, 1e-5));

        // Target moves; rig follows on the next tick.
        target.publish(Pose::from_position(Vec3::new(20.0, 0.0, 0.0)));
        machine.update(0.016);
        let expected = Vec3::new(20.0, 0.0, 0.0) + CameraOptions::default().follow_offset;
        assert!(machine.rig().pose().position.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_follow_offset_in_target_frame() {
        let mut machine = machine();
        let target = Pose::new(Vec3::ZERO, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        machine.set_follow_target(Some(Arc::new(PoseCell::with_pose(target))));
        machine.force_follow();
        machine.update(0.016);
        // Offset (0, 2, -5) rotated 90 degrees about Y is (-5, 2, 0).
        assert!(machine
            .rig()
            .pose()
            .position
            .abs_diff_eq(Vec3::new(-5.0, 2.0, 0.0), 1e-5));
    }

    #[test]
    fn test_rebinding_in_follow_is_immediate() {
        let mut machine = machine();
        machine.force_follow();
        machine.update(0.016);
        assert_eq!(machine.rig().pose(), Pose::IDENTITY);
        let target = Arc::new(PoseCell::with_pose(Pose::from_position(Vec3::Y)));
        machine.set_follow_target(Some(target));
        machine.update(0.016);
        assert!((machine.rig().pose().position.y - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_cinematic_orbits_focus() {
        let mut machine = machine();
        machine.force_cinematic();
        let options = CameraOptions::default();
        let focus = Vec3::new(0.0, 0.0, options.orbit_radius);

        // Entry keeps the rig on its side of the focus, raised by the orbit height.
        let start = machine.rig().pose();
        assert!(start.position.abs_diff_eq(Vec3::new(0.0, options.orbit_height, 0.0), 1e-4));
        assert!(start.forward().abs_diff_eq(Vec3::Z, 1e-4));

        machine.update(1.0);
        let pose = machine.rig().pose();
        let horizontal = Vec3::new(pose.position.x - focus.x, 0.0, pose.position.z - focus.z);
        assert!((horizontal.length() - options.orbit_radius).abs() < 1e-3);
        assert!(!pose.position.abs_diff_eq(start.position, 1e-3));
        // Still looking at the focus.
        let to_focus = (-horizontal).normalize();
        assert!(pose.forward().abs_diff_eq(to_focus, 1e-3));
    }

    #[test]
    fn test_cinematic_full_turns_stay_on_orbit() {
        let mut machine = machine();
        machine.force_cinematic();
        let options = CameraOptions::default();
        let focus = Vec3::new(0.0, 0.0, options.orbit_radius);
        let start = machine.rig().pose();

        // 10 degrees per second for 72 seconds: two full turns.
        for _ in 0..72 {
            machine.update(1.0);
            let pose = machine.rig().pose();
            let horizontal = Vec3::new(pose.position.x - focus.x, 0.0, pose.position.z - focus.z);
            assert!((horizontal.length() - options.orbit_radius).abs() < 1e-3);
            assert!((pose.position.y - options.orbit_height).abs() < 1e-4);
        }
        assert!(machine.rig().pose().position.abs_diff_eq(start.position, 1e-2));
    }

    #[test]
    fn test_reset_follows_home() {
        let mut machine = machine();
        machine.handle_input(InputEvent::KeyPressed(ControlKey::Up));
        machine.update(0.016);
        machine.handle_input(InputEvent::ReleaseAll);
        machine.reset();
        assert_eq!(machine.mode(), CameraMode::Follow);
        machine.update(0.016);
        assert!(machine
            .rig()
            .pose()
            .position
            .abs_diff_eq(CameraOptions::default().follow_offset, 1e-5));
    }

    #[test]
    fn test_external_tracking_in_free_mode() {
        let board = Arc::new(PoseBoard::new(TrackingSource::Vicon));
        let mut registry = CollaboratorRegistry::new();
        registry.register("TrackingDataStream", board.clone()).unwrap();
        let options = TrackingOptions {
            source: TrackingSource::Vicon,
            ..Default::default()
        };

        let mut machine = machine();
        assert_eq!(machine.bind_tracking(&registry, &options).unwrap(), TrackingSource::Vicon);

        machine.update(0.016);
        assert_eq!(machine.rig().pose(), Pose::IDENTITY);

        let head = Pose::from_position(Vec3::new(0.3, 1.7, -0.4));
        board.publish(crate::pose::TrackedPose::new("Object", 0.5, head));
        machine.update(0.016);
        assert_eq!(machine.rig().pose(), head);
    }

    #[test]
    fn test_failed_bind_keeps_manual() {
        let registry = CollaboratorRegistry::new();
        let options = TrackingOptions {
            source: TrackingSource::DTrack,
            ..Default::default()
        };
        let mut machine = machine();
        assert!(machine.bind_tracking(&registry, &options).is_err());
        assert_eq!(machine.tracking_source(), TrackingSource::None);
    }

    fn any_mode() -> impl Strategy<Value = CameraMode> {
        prop_oneof![
            Just(CameraMode::Free),
            Just(CameraMode::Follow),
            Just(CameraMode::Cinematic),
        ]
    }

    proptest! {
        #[test]
        fn prop_three_advances_return_to_start(start in any_mode()) {
            let options = CameraOptions { initial_mode: start, ..Default::default() };
            let mut machine = CameraStateMachine::new(
                DisplayRig::new(1),
                Box::new(ManualInput::default()),
                options,
                None,
            );
            machine.advance();
            machine.advance();
            machine.advance();
            prop_assert_eq!(machine.mode(), start);
        }

        #[test]
        fn prop_mode_next_visits_all(start in any_mode()) {
            let visited = [start, start.next(), start.next().next()];
            for mode in CameraMode::ALL {
                prop_assert!(visited.contains(&mode));
            }
        }
    }
}
