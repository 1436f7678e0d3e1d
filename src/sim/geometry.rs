//! Level geometry queries: ground ray casts and navigation
//!
//! The real level (meshes, nav mesh) lives outside the simulation. The sim
//! only needs a downward ray cast and a "move toward P" capability.

use glam::Vec3;

/// Geometry and navigation services the simulation consumes
pub trait LevelGeometry {
    /// Cast a ray straight down from `origin`; return the first ground hit within
    /// `max_distance`
    fn ground_below(&self, origin: Vec3, max_distance: f32) -> Option<Vec3>;

    /// Move from `from` toward `to` by at most `max_step`
    ///
    /// Default is a straight line on the ground plane, snapped to the ground
    /// under the new point when there is any.
    fn navigate(&self, from: Vec3, to: Vec3, max_step: f32) -> Vec3 {
        let mut delta = to - from;
        delta.y = 0.0;
        let dist = delta.length();
        let mut next = if dist <= max_step {
            Vec3::new(to.x, from.y, to.z)
        } else {
            from + delta / dist * max_step
        };
        if let Some(hit) = self.ground_below(next + Vec3::Y * 2.0, 4.0) {
            next.y = hit.y;
        }
        next
    }
}

/// Infinite flat ground, or a flat disk when `extent` is set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatGround {
    pub height: f32,
    /// Ground only exists within this horizontal distance of the origin
    pub extent: Option<f32>,
}

impl FlatGround {
    pub fn new(height: f32) -> Self {
        Self {
            height,
            extent: None,
        }
    }

    pub fn disk(height: f32, radius: f32) -> Self {
        Self {
            height,
            extent: Some(radius),
        }
    }
}

impl LevelGeometry for FlatGround {
    fn ground_below(&self, origin: Vec3, max_distance: f32) -> Option<Vec3> {
        if let Some(extent) = self.extent {
            if crate::horizontal(origin).length() > extent {
                return None;
            }
        }
        let drop = origin.y - self.height;
        if (0.0..=max_distance).contains(&drop) {
            Some(Vec3::new(origin.x, self.height, origin.z))
        } else {
            None
        }
    }
}

/// Distance along `dir` (unit length) at which a ray from `origin` enters a
/// sphere, if it does within `max_distance`
pub fn ray_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32, max_distance: f32) -> Option<f32> {
    let to_center = center - origin;
    let along = to_center.dot(dir);
    let closest_sq = to_center.length_squared() - along * along;
    let radius_sq = radius * radius;
    if closest_sq > radius_sq {
        return None;
    }
    let half_chord = (radius_sq - closest_sq).sqrt();
    let mut t = along - half_chord;
    if t < 0.0 {
        // Origin inside the sphere
        t = along + half_chord;
    }
    (t >= 0.0 && t <= max_distance).then_some(t)
}
