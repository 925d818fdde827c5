//! powerwall-rs: a multi-display stereo camera rig with pluggable motion tracking.
//!
//! The rig renders one or two viewpoints onto the connected displays and is
//! moved either manually (keyboard/gamepad) or by an external motion-capture
//! stream. A camera state machine switches between free control, following
//! an entity and a cinematic orbit.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use powerwall::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let config = PowerwallConfig::from_json_str(r#"{ "tracking": { "source": "Vicon" } }"#)?;
//!     let mut displays = HeadlessDisplays::new(2);
//!     let mut controller = StereoCameraController::new(config, &mut displays, None);
//!
//!     // The tracking client publishes into the board from its own thread.
//!     let board = Arc::new(PoseBoard::new(TrackingSource::Vicon));
//!     let mut registry = CollaboratorRegistry::new();
//!     registry.register("TrackingDataStream", board.clone())?;
//!     assert_eq!(controller.bind(&registry), TrackingSource::Vicon);
//!
//!     board.publish(TrackedPose::new("Object", 0.0, Pose::from_position(Vec3::Y)));
//!     controller.update(1.0 / 60.0);
//!     assert_eq!(controller.rig().pose().position, Vec3::Y);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`DisplayRig`]: viewpoints, eye separation and display mapping
//! - [`CameraStateMachine`]: Free → Follow → Cinematic cycle
//! - [`TrackingInputAdapter`]: [`ManualInput`] or [`ExternalTracking`]
//! - [`StereoCameraController`]: wires the above together for a host

mod controller;
mod init;

pub use controller::StereoCameraController;
pub use init::init_logging;

// Re-export core types
pub use powerwall_core::{
    activate_secondary_surfaces, surface_policy, BodyConfig, BodyId, CameraMode, CameraObserver,
    CameraOptions, CameraStateMachine, CollaboratorRegistry, ControlKey, ControlOptions,
    DisplayBackend, DisplayRig, ExternalTracking, FollowTarget, GamepadAxis, GamepadButton,
    HeadlessDisplays, InputEvent, InputState, ManualInput, PoseBoard, PoseCell, PoseDelta,
    PoseUpdate, PowerwallConfig, PowerwallError, Result, RigOptions, TrackedPose, TrackingClient,
    TrackingInputAdapter, TrackingOptions, TrackingSource, Viewpoint,
};
pub use powerwall_core::{Mat4, Pose, Quat, Vec3};
