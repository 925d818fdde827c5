//! Configuration options for powerwall.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera_state::CameraMode;
use crate::error::{PowerwallError, Result};
use crate::pose::BodyId;
use crate::tracking::TrackingSource;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerwallConfig {
    /// Rig layout.
    pub rig: RigOptions,
    /// Manual control step sizes and enabled devices.
    pub controls: ControlOptions,
    /// Tracking source selection.
    pub tracking: TrackingOptions,
    /// Camera state machine tunables.
    pub camera: CameraOptions,
}

impl PowerwallConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serializes this configuration to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let sep = self.rig.eye_separation;
        if !sep.is_finite() || sep < 0.0 {
            return Err(PowerwallError::Config(format!(
                "rig.eye_separation must be finite and >= 0, got {sep}"
            )));
        }
        if self.rig.viewpoint_count == Some(0) {
            return Err(PowerwallError::Config(
                "rig.viewpoint_count must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("controls.speed", self.controls.speed),
            ("controls.rotation_speed", self.controls.rotation_speed),
            ("camera.orbit_radius", self.camera.orbit_radius),
            ("camera.orbit_height", self.camera.orbit_height),
            ("camera.orbit_speed_degrees", self.camera.orbit_speed_degrees),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PowerwallError::Config(format!(
                    "{name} must be finite and >= 0, got {value}"
                )));
            }
        }
        if !self.camera.follow_offset.is_finite() {
            return Err(PowerwallError::Config(format!(
                "camera.follow_offset must be finite, got {}",
                self.camera.follow_offset
            )));
        }
        if self.tracking.source != TrackingSource::None && self.tracking.port == 0 {
            return Err(PowerwallError::Config("tracking.port must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Rig layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigOptions {
    /// Stereo (two viewpoints) or mono (one viewpoint).
    pub stereo: bool,
    /// Explicit viewpoint count, overriding `stereo`.
    pub viewpoint_count: Option<usize>,
    /// Distance between neighbouring viewpoints.
    pub eye_separation: f32,
}

impl Default for RigOptions {
    fn default() -> Self {
        Self {
            stereo: true,
            viewpoint_count: None,
            eye_separation: 0.2,
        }
    }
}

impl RigOptions {
    /// Number of viewpoints this configuration asks for.
    #[must_use]
    pub fn requested_viewpoints(&self) -> usize {
        self.viewpoint_count
            .unwrap_or(if self.stereo { 2 } else { 1 })
    }
}

/// Manual control settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlOptions {
    /// Translation per tick while a movement key is held.
    pub speed: f32,
    /// Yaw in degrees per tick while a turn key is held.
    pub rotation_speed: f32,
    /// Whether keyboard input moves the rig.
    pub keyboard: bool,
    /// Whether gamepad input moves the rig.
    pub gamepad: bool,
}

impl Default for ControlOptions {
    fn default() -> Self {
        Self {
            speed: 0.02,
            rotation_speed: 1.0,
            keyboard: true,
            gamepad: true,
        }
    }
}

/// Tracking source selection and data stream endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingOptions {
    /// Which source drives the rig in Free mode.
    pub source: TrackingSource,
    /// Name under which the data stream collaborator is registered.
    pub stream_name: String,
    /// Host the data stream connects to (name-keyed sources only).
    pub host: String,
    /// Port the data stream connects to or listens on.
    pub port: u16,
    /// Which tracked body drives the rig.
    pub body: BodyConfig,
}

impl Default for TrackingOptions {
    fn default() -> Self {
        Self {
            source: TrackingSource::None,
            stream_name: "TrackingDataStream".to_string(),
            host: "localhost".to_string(),
            port: 801,
            body: BodyConfig::default(),
        }
    }
}

impl TrackingOptions {
    /// Endpoint string handed to the tracking client.
    ///
    /// Id-keyed sources only listen on a port, so they get `None`.
    #[must_use]
    pub fn endpoint(&self) -> Option<String> {
        match self.source {
            TrackingSource::Vicon => Some(format!("{}:{}", self.host, self.port)),
            TrackingSource::DTrack | TrackingSource::None => None,
        }
    }

    /// The body id for the configured source.
    #[must_use]
    pub fn body_id(&self) -> BodyId {
        self.source.body_id(&self.body)
    }
}

/// Identifies the tracked body under both addressing schemes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    /// Subject name used by name-keyed sources.
    pub name: String,
    /// Numeric id used by id-keyed sources.
    pub id: u32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            name: "Object".to_string(),
            id: 0,
        }
    }
}

/// Camera state machine tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraOptions {
    /// Mode the state machine starts in.
    pub initial_mode: CameraMode,
    /// Offset from the follow target, in the target's frame.
    pub follow_offset: Vec3,
    /// Distance from the rig to the orbit focus when Cinematic is entered.
    pub orbit_radius: f32,
    /// Height of the orbit above the focus.
    pub orbit_height: f32,
    /// Orbit angular speed in degrees per second.
    pub orbit_speed_degrees: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            initial_mode: CameraMode::Free,
            follow_offset: Vec3::new(0.0, 2.0, -5.0),
            orbit_radius: 5.0,
            orbit_height: 2.0,
            orbit_speed_degrees: 10.0,
        }
    }
}
