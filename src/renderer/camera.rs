//! Fixed perspective camera looking down at the cube row

use glam::{Mat4, Vec3};

use crate::consts::{CAMERA_FOV_DEG, CAMERA_PITCH_DEG, CAMERA_POSITION};

const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Downward tilt in degrees
    pub pitch_deg: f32,
    /// Vertical field of view in degrees
    pub fov_deg: f32,
    /// Width over height
    pub aspect: f32,
}

impl Camera {
    /// The game's camera for a viewport of `width` x `height`
    pub fn standard(width: u32, height: u32) -> Self {
        Self {
            position: Vec3::from_array(CAMERA_POSITION),
            pitch_deg: CAMERA_PITCH_DEG,
            fov_deg: CAMERA_FOV_DEG,
            aspect: aspect_ratio(width, height),
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = aspect_ratio(width, height);
    }

    /// Unit view direction
    pub fn forward(&self) -> Vec3 {
        let pitch = self.pitch_deg.to_radians();
        Vec3::new(0.0, -pitch.sin(), -pitch.cos())
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }

    /// Projection with depth mapped to 0..1
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_deg.to_radians(), self.aspect, Z_NEAR, Z_FAR)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Normalized device coordinates of a world point
    pub fn project(&self, point: Vec3) -> Vec3 {
        let clip = self.view_proj() * point.extend(1.0);
        clip.truncate() / clip.w
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}
