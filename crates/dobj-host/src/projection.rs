//! World-to-screen projection.
//!
//! The host exposes projection as a fallible mapping: points behind the
//! camera or outside the view frustum have no screen position. The overlay
//! treats a failed projection as "not visible this frame".
//!
//! [`PerspectiveCamera`] is a right-handed, y-up pinhole camera that produces
//! screen coordinates with the origin at the top-left of the viewport.

use glam::{Mat4, Quat};
use serde::{Deserialize, Serialize};

use crate::math::{Vec2, Vec3};

// ---------------------------------------------------------------------------
// WorldToScreen
// ---------------------------------------------------------------------------

/// Projects world positions to screen positions.
pub trait WorldToScreen {
    /// Screen position of `world`, or `None` if it cannot be shown.
    fn world_to_screen(&self, world: Vec3) -> Option<Vec2>;
}

impl<F> WorldToScreen for F
where
    F: Fn(Vec3) -> Option<Vec2>,
{
    fn world_to_screen(&self, world: Vec3) -> Option<Vec2> {
        self(world)
    }
}

// ---------------------------------------------------------------------------
// PerspectiveCamera
// ---------------------------------------------------------------------------

/// A perspective camera bound to a viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Viewport size in screen units.
    pub viewport: Vec2,
}

impl PerspectiveCamera {
    /// Camera at `eye` looking at `target` with a 60 degree vertical field
    /// of view and a 0.1..1000 depth range.
    pub fn looking_at(eye: Vec3, target: Vec3, viewport: Vec2) -> Self {
        Self {
            eye,
            target,
            up: Vec3::UP,
            fov_y: 60f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            viewport,
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.viewport.y <= 0.0 {
            return 1.0;
        }
        self.viewport.x / self.viewport.y
    }

    /// Combined view-projection matrix, or `None` when the camera is
    /// degenerate (eye on target, or up parallel to the view).
    pub fn view_projection(&self) -> Option<Mat4> {
        let eye = glam::Vec3::from(self.eye);
        let target = glam::Vec3::from(self.target);
        let up = glam::Vec3::from(self.up);
        let forward = (target - eye).try_normalize()?;
        forward.cross(up).try_normalize()?;

        let view = Mat4::look_at_rh(eye, target, up);
        let proj = Mat4::perspective_rh(self.fov_y, self.aspect(), self.near, self.far);
        Some(proj * view)
    }

    /// Orbit the eye around the target by `yaw` radians about the up axis.
    pub fn orbit(&mut self, yaw: f32) {
        let offset = glam::Vec3::from(self.eye - self.target);
        self.eye = self.target + Vec3::from(Quat::from_rotation_y(yaw) * offset);
    }
}

impl WorldToScreen for PerspectiveCamera {
    fn world_to_screen(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_projection()? * glam::Vec3::from(world).extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        // perspective_rh maps near..far onto 0..1.
        if !(0.0..=1.0).contains(&ndc.z) || ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 {
            return None;
        }

        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::looking_at(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec2::new(800.0, 600.0),
        )
    }

    #[test]
    fn point_on_axis_projects_to_center() {
        let p = camera().world_to_screen(Vec3::new(0.0, 0.0, 10.0)).unwrap();
        assert_eq!(p, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn point_behind_camera_fails() {
        assert!(camera().world_to_screen(Vec3::new(0.0, 0.0, -5.0)).is_none());
    }

    #[test]
    fn point_beyond_far_plane_fails() {
        assert!(camera().world_to_screen(Vec3::new(0.0, 0.0, 5000.0)).is_none());
    }

    #[test]
    fn point_outside_frustum_fails() {
        // 60 degree fov: at depth 1 the half-height is ~0.577.
        assert!(camera().world_to_screen(Vec3::new(0.0, 5.0, 1.0)).is_none());
    }

    #[test]
    fn higher_points_are_nearer_the_top() {
        let cam = camera();
        let low = cam.world_to_screen(Vec3::new(0.0, -1.0, 10.0)).unwrap();
        let high = cam.world_to_screen(Vec3::new(0.0, 1.0, 10.0)).unwrap();
        assert!(high.y < low.y);
    }

    #[test]
    fn degenerate_camera_projects_nothing() {
        let cam = PerspectiveCamera::looking_at(Vec3::ZERO, Vec3::ZERO, Vec2::new(800.0, 600.0));
        assert!(cam.world_to_screen(Vec3::new(0.0, 0.0, 1.0)).is_none());
    }

    #[test]
    fn up_parallel_to_view_projects_nothing() {
        let cam = PerspectiveCamera::looking_at(
            Vec3::ZERO,
            Vec3::new(0.0, 10.0, 0.0),
            Vec2::new(800.0, 600.0),
        );
        assert!(cam.view_projection().is_none());
        assert!(cam.world_to_screen(Vec3::new(0.0, 5.0, 0.0)).is_none());
    }

    #[test]
    fn closures_are_projectors() {
        let fixed = |_: Vec3| Some(Vec2::new(1.0, 2.0));
        assert_eq!(fixed.world_to_screen(Vec3::ZERO), Some(Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn orbit_preserves_distance() {
        let mut cam = PerspectiveCamera::looking_at(
            Vec3::new(0.0, 5.0, -20.0),
            Vec3::ZERO,
            Vec2::new(800.0, 600.0),
        );
        let before = (cam.eye - cam.target).length();
        cam.orbit(1.0);
        let after = (cam.eye - cam.target).length();
        assert!((before - after).abs() < 1e-4);
    }
}
