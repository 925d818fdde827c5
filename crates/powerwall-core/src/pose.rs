//! Poses, pose deltas and externally tracked bodies.

use std::fmt;

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A rigid pose: position plus orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Position in the parent space.
    pub position: Vec3,
    /// Orientation as a unit quaternion.
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    /// The identity pose.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    /// Creates a pose from position and orientation.
    #[must_use]
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Creates an unrotated pose at the given position.
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Converts this pose to a Mat4.
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position)
    }

    /// Returns the pose of `local` expressed in this pose's parent space.
    #[must_use]
    pub fn compose(&self, local: &Pose) -> Pose {
        Pose {
            position: self.position + self.orientation * local.position,
            orientation: (self.orientation * local.orientation).normalize(),
        }
    }

    /// Transforms a point from local space into the parent space.
    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.orientation * point
    }

    /// Returns the forward direction (+Z in local space).
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::Z
    }

    /// Returns the yaw about +Y in degrees.
    #[must_use]
    pub fn yaw_degrees(&self) -> f32 {
        let (yaw, _, _) = self.orientation.to_euler(glam::EulerRot::YXZ);
        yaw.to_degrees()
    }

    /// Rotates about the world up axis.
    pub fn rotate_yaw_degrees(&mut self, degrees: f32) {
        let delta = Quat::from_rotation_y(degrees.to_radians());
        self.orientation = (self.orientation * delta).normalize();
    }

    /// Moves by `offset` expressed in this pose's local frame.
    pub fn translate_local(&mut self, offset: Vec3) {
        self.position += self.orientation * offset;
    }

    /// Applies an incremental delta: yaw first, then the heading-relative move.
    pub fn apply_delta(&mut self, delta: &PoseDelta) {
        if delta.yaw_degrees != 0.0 {
            self.rotate_yaw_degrees(delta.yaw_degrees);
        }
        self.translate_local(delta.translation);
    }

    /// Returns true if both poses are equal within `epsilon`.
    #[must_use]
    pub fn abs_diff_eq(&self, other: &Pose, epsilon: f32) -> bool {
        self.position.abs_diff_eq(other.position, epsilon)
            && self.orientation.abs_diff_eq(other.orientation, epsilon)
    }
}

/// An incremental pose change, expressed in the rig's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoseDelta {
    /// Heading-relative translation.
    pub translation: Vec3,
    /// Rotation about the up axis in degrees.
    pub yaw_degrees: f32,
}

impl PoseDelta {
    /// The zero delta.
    pub const ZERO: Self = Self {
        translation: Vec3::ZERO,
        yaw_degrees: 0.0,
    };

    /// Returns true if this delta does not move the rig.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.translation == Vec3::ZERO && self.yaw_degrees == 0.0
    }
}

/// Identifier of a physically tracked body.
///
/// Name-keyed sources (Vicon-style) use [`BodyId::Name`], id-keyed sources
/// (DTrack-style) use [`BodyId::Index`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyId {
    /// Body addressed by subject name.
    Name(String),
    /// Body addressed by numeric id.
    Index(u32),
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyId::Name(name) => write!(f, "{name}"),
            BodyId::Index(id) => write!(f, "#{id}"),
        }
    }
}

impl From<&str> for BodyId {
    fn from(name: &str) -> Self {
        BodyId::Name(name.to_string())
    }
}

impl From<u32> for BodyId {
    fn from(id: u32) -> Self {
        BodyId::Index(id)
    }
}

/// A timestamped pose reported for one tracked body.
///
/// Only valid for the tick it was read in; consumers do not retain it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedPose {
    /// The body this pose belongs to.
    pub body: BodyId,
    /// Capture time in seconds, monotonic per body.
    pub timestamp: f64,
    /// The reported pose.
    pub pose: Pose,
}

impl TrackedPose {
    /// Creates a tracked pose.
    pub fn new(body: impl Into<BodyId>, timestamp: f64, pose: Pose) -> Self {
        Self {
            body: body.into(),
            timestamp,
            pose,
        }
    }
}
