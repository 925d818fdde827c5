//! Core abstractions for powerwall-rs.
//!
//! This crate provides the building blocks of a multi-display stereo camera rig:
//! - [`DisplayRig`] owning viewpoints bound to output surfaces
//! - [`CameraStateMachine`] cycling the rig through Free, Follow and Cinematic modes
//! - [`TrackingInputAdapter`] implementations for manual control and external tracking
//! - Configuration, collaborator registry and error types
//!
//! Everything is single-threaded and tick-driven, except tracking clients,
//! which publish poses from their own threads into last-write-wins cells.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Option structs legitimately have several boolean toggles
#![allow(clippy::struct_excessive_bools)]

pub mod camera_state;
pub mod cell;
pub mod display;
pub mod error;
pub mod input;
pub mod options;
pub mod pose;
pub mod registry;
pub mod rig;
pub mod tracking;

pub use camera_state::{CameraMode, CameraObserver, CameraStateMachine, FollowTarget};
pub use cell::PoseCell;
pub use display::{activate_secondary_surfaces, DisplayBackend, HeadlessDisplays};
pub use error::{PowerwallError, Result};
pub use input::{ControlKey, GamepadAxis, GamepadButton, InputEvent, InputState};
pub use options::{
    BodyConfig, CameraOptions, ControlOptions, PowerwallConfig, RigOptions, TrackingOptions,
};
pub use pose::{BodyId, Pose, PoseDelta, TrackedPose};
pub use registry::CollaboratorRegistry;
pub use rig::{surface_policy, DisplayRig, Viewpoint};
pub use tracking::{
    ExternalTracking, ManualInput, PoseBoard, PoseUpdate, TrackingClient, TrackingInputAdapter,
    TrackingSource,
};

// Re-export glam types for convenience
pub use glam::{Mat4, Quat, Vec3};
