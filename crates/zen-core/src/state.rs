//! Host-side state types shared with the frontends.
//!
//! These types intentionally avoid referencing platform-specific APIs and
//! are suitable for use on both native and web targets.

use crate::constants::CAMERA_DISTANCE;
use glam::{Mat4, Vec2, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Fixed scene camera: offset along +Z, looking at the origin.
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, CAMERA_DISTANCE),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: 75.0_f32.to_radians(),
            znear: 0.1,
            zfar: 1000.0,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}

/// Per-frame input context owned by the host render loop and passed to the
/// field each frame: accumulated elapsed time, the flow-speed multiplier,
/// and the smoothed pointer in normalized [-1, 1] coordinates.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput {
    pub elapsed_sec: f32,
    pub speed: f32,
    pub pointer: Vec2,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            elapsed_sec: 0.0,
            speed: 1.0,
            pointer: Vec2::ZERO,
        }
    }
}
