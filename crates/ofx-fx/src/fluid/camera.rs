#![forbid(unsafe_code)]

//! Perspective camera that follows the pointer.

use glam::{Mat4, Vec2, Vec3, Vec4};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CameraParams {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance from the origin along +Z.
    pub distance: f32,
    /// Camera offset per unit of normalized pointer offset.
    pub pointer_gain: f32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            distance: 5.0,
            pointer_gain: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    target: Vec3,
    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,
    pointer_gain: f32,
}

impl Camera {
    pub fn new(params: &CameraParams, aspect: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, params.distance),
            target: Vec3::ZERO,
            fov_y: params.fov_degrees.to_radians(),
            aspect,
            near: params.near,
            far: params.far,
            pointer_gain: params.pointer_gain,
        }
    }

    /// Slide in the XY plane after the pointer (screen-down is world-down)
    /// and aim back at the origin. Z is unchanged.
    pub fn follow_pointer(&mut self, pointer: Vec2) {
        self.position.x = pointer.x * self.pointer_gain;
        self.position.y = -pointer.y * self.pointer_gain;
        self.look_at(Vec3::ZERO);
    }

    #[inline]
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    #[inline]
    pub fn near(&self) -> f32 {
        self.near
    }

    /// Unit viewing direction.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    #[inline]
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far)
    }

    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Clip-space position of a world point.
    #[inline]
    pub fn to_clip(&self, world: Vec3) -> Vec4 {
        self.view_projection() * world.extend(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_z_axis() {
        let cam = Camera::new(&CameraParams::default(), 2.0);
        assert_eq!(cam.position(), Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(cam.forward(), Vec3::NEG_Z);
    }

    #[test]
    fn pointer_moves_camera() {
        let mut cam = Camera::new(&CameraParams::default(), 1.0);
        cam.follow_pointer(Vec2::new(1.0, -1.0));
        assert_eq!(cam.position(), Vec3::new(0.5, 0.5, 5.0));
        assert_eq!(cam.target(), Vec3::ZERO);
    }

    #[test]
    fn origin_projects_to_center() {
        let mut cam = Camera::new(&CameraParams::default(), 1.5);
        cam.follow_pointer(Vec2::new(-0.7, 0.3));
        let clip = cam.to_clip(Vec3::ZERO);
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
    }

    #[test]
    fn rejects_bad_aspect() {
        let mut cam = Camera::new(&CameraParams::default(), 1.0);
        cam.set_aspect(0.0);
        cam.set_aspect(f32::NAN);
        assert_eq!(cam.aspect(), 1.0);
        cam.set_aspect(1.25);
        assert_eq!(cam.aspect(), 1.25);
    }
}
