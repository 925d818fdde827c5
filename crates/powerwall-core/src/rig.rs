//! Multi-display stereo camera rig.
//!
//! A [`DisplayRig`] owns an ordered set of [`Viewpoint`]s placed symmetrically
//! along the rig's local X axis, `eye_separation` apart, and maps each of
//! them to an output surface.

use glam::Vec3;

use crate::error::{PowerwallError, Result};
use crate::pose::Pose;

/// One logical camera of the rig.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewpoint {
    name: String,
    local_pose: Pose,
    surface: usize,
    active: bool,
}

impl Viewpoint {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local_pose: Pose::IDENTITY,
            surface: 0,
            active: true,
        }
    }

    /// Returns the name of this viewpoint.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pose relative to the rig origin.
    #[must_use]
    pub fn local_pose(&self) -> Pose {
        self.local_pose
    }

    /// Index of the output surface this viewpoint renders to.
    #[must_use]
    pub fn surface(&self) -> usize {
        self.surface
    }

    /// Returns whether this viewpoint renders at all.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Surfaces used by the rig for a given surface count, in viewpoint order.
///
/// With three surfaces the first one is left unused and the viewpoints go to
/// surfaces 1 and 2. This differs from the two-surface case; it is kept as is
/// because existing installations rely on it.
#[must_use]
pub fn surface_policy(surface_count: usize) -> Vec<usize> {
    match surface_count {
        0 | 1 => vec![0],
        2 => vec![0, 1],
        3 => vec![1, 2],
        n => (0..n).collect(),
    }
}

fn default_names(count: usize) -> Vec<String> {
    match count {
        1 => vec!["center".to_string()],
        2 => vec!["left".to_string(), "right".to_string()],
        n => (0..n).map(|i| format!("viewpoint {i}")).collect(),
    }
}

/// A set of viewpoints bound to output surfaces.
#[derive(Debug, Clone)]
pub struct DisplayRig {
    pose: Pose,
    viewpoints: Vec<Viewpoint>,
    eye_separation: f32,
    surface_count: usize,
}

impl DisplayRig {
    /// Creates a single-viewpoint rig for `surface_count` detected surfaces.
    ///
    /// A surface count of zero is treated as one.
    #[must_use]
    pub fn new(surface_count: usize) -> Self {
        Self {
            pose: Pose::IDENTITY,
            viewpoints: vec![Viewpoint::new("center")],
            eye_separation: 0.0,
            surface_count: surface_count.max(1),
        }
    }

    /// Replaces the viewpoints with `viewpoint_count` new ones and places them
    /// `eye_separation` apart.
    ///
    /// Fails if the count is zero or exceeds the detected surfaces, or if the
    /// separation is negative or not finite. On failure the rig is unchanged.
    pub fn configure(&mut self, viewpoint_count: usize, eye_separation: f32) -> Result<()> {
        if viewpoint_count == 0 {
            return Err(PowerwallError::Config("a rig needs at least one viewpoint".to_string()));
        }
        if viewpoint_count > self.surface_count {
            return Err(PowerwallError::TooManyViewpoints {
                requested: viewpoint_count,
                available: self.surface_count,
            });
        }
        validate_eye_separation(eye_separation)?;

        self.viewpoints = default_names(viewpoint_count)
            .into_iter()
            .map(Viewpoint::new)
            .collect();
        self.set_eye_separation(eye_separation)?;
        log::debug!(
            "rig configured: {viewpoint_count} viewpoints, eye separation {eye_separation}"
        );
        Ok(())
    }

    /// Repositions the viewpoints symmetrically about the rig origin.
    ///
    /// Viewpoint `i` of `n` sits at `x = (i - (n - 1) / 2) * d`, so a stereo
    /// pair ends up at `-d/2` and `+d/2`.
    pub fn set_eye_separation(&mut self, eye_separation: f32) -> Result<()> {
        validate_eye_separation(eye_separation)?;
        self.eye_separation = eye_separation;

        #[allow(clippy::cast_precision_loss)]
        let center = (self.viewpoints.len() as f32 - 1.0) * 0.5;
        for (i, viewpoint) in self.viewpoints.iter_mut().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let x = (i as f32 - center) * eye_separation;
            viewpoint.local_pose = Pose::from_position(Vec3::new(x, 0.0, 0.0));
        }
        Ok(())
    }

    /// Maps viewpoints to surfaces according to [`surface_policy`].
    ///
    /// Viewpoints left over once the policy runs out of surfaces are
    /// deactivated.
    pub fn bind_surfaces(&mut self) -> &[Viewpoint] {
        let surfaces = surface_policy(self.surface_count);
        for (i, viewpoint) in self.viewpoints.iter_mut().enumerate() {
            if let Some(&surface) = surfaces.get(i) {
                viewpoint.surface = surface;
                viewpoint.active = true;
                log::debug!("viewpoint '{}' -> display {surface}", viewpoint.name);
            } else {
                viewpoint.surface = 0;
                viewpoint.active = false;
                log::debug!("viewpoint '{}' has no display", viewpoint.name);
            }
        }
        &self.viewpoints
    }

    /// Number of detected output surfaces.
    #[must_use]
    pub fn surface_count(&self) -> usize {
        self.surface_count
    }

    /// Current eye separation.
    #[must_use]
    pub fn eye_separation(&self) -> f32 {
        self.eye_separation
    }

    /// All viewpoints in order.
    #[must_use]
    pub fn viewpoints(&self) -> &[Viewpoint] {
        &self.viewpoints
    }

    /// Gets a viewpoint by index.
    #[must_use]
    pub fn viewpoint(&self, index: usize) -> Option<&Viewpoint> {
        self.viewpoints.get(index)
    }

    /// Gets a viewpoint by name.
    #[must_use]
    pub fn viewpoint_by_name(&self, name: &str) -> Option<&Viewpoint> {
        self.viewpoints.iter().find(|v| v.name == name)
    }

    /// Returns the number of viewpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.viewpoints.len()
    }

    /// Always false: a rig has at least one viewpoint.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.viewpoints.is_empty()
    }

    /// Pose of the rig origin in world space.
    #[must_use]
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Sets the pose of the rig origin.
    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    /// Mutable access to the rig origin.
    pub fn pose_mut(&mut self) -> &mut Pose {
        &mut self.pose
    }

    /// World-space pose of the viewpoint at `index`.
    #[must_use]
    pub fn world_pose(&self, index: usize) -> Option<Pose> {
        self.viewpoints
            .get(index)
            .map(|v| self.pose.compose(&v.local_pose))
    }

    /// Iterates over active viewpoints with their world-space poses.
    pub fn active_views(&self) -> impl Iterator<Item = (&Viewpoint, Pose)> + '_ {
        self.viewpoints
            .iter()
            .filter(|v| v.active)
            .map(|v| (v, self.pose.compose(&v.local_pose)))
    }
}

fn validate_eye_separation(eye_separation: f32) -> Result<()> {
    if eye_separation.is_finite() && eye_separation >= 0.0 {
        Ok(())
    } else {
        Err(PowerwallError::Config(format!(
            "eye separation must be finite and >= 0, got {eye_separation}"
        )))
    }
}
