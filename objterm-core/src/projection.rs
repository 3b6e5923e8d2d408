/// Camera and projection utilities
///
/// The renderer only ever sees the combined `view_proj` matrix; this module
/// is the caller-side helper that builds it.
use crate::transform::{Mat4, Transform, Vec3};

/// Rotation applied to the model, in radians
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Orbit {
    /// Rotation about the Y axis
    pub yaw: f64,
    /// Rotation about the X axis
    pub pitch: f64,
}

impl Orbit {
    pub fn new(yaw: f64, pitch: f64) -> Self {
        Self { yaw, pitch }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, d_yaw: f64, d_pitch: f64) {
        self.yaw += d_yaw;
        self.pitch += d_pitch;
    }

    /// `rotation_y(yaw) * rotation_x(pitch)`
    pub fn matrix(&self) -> Mat4 {
        Transform::rotation_y(self.yaw) * Transform::rotation_x(self.pitch)
    }
}

/// Camera on the +Z axis looking at `target`
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub distance: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    pub fn new(aspect: f64) -> Self {
        Self {
            distance: 3.0,
            min_distance: 0.2,
            max_distance: 50.0,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: 45.0,
            aspect,
            near: 0.1,
            far: 100.0,
        }
    }

    pub fn eye(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.distance)
    }

    /// Move towards the target, dividing the distance by `factor`
    pub fn zoom_in(&mut self, factor: f64) {
        self.distance = (self.distance / factor).max(self.min_distance);
    }

    /// Move away from the target, multiplying the distance by `factor`
    pub fn zoom_out(&mut self, factor: f64) {
        self.distance = (self.distance * factor).min(self.max_distance);
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Mat4 {
        Transform::look_at(&self.eye(), &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Transform::perspective(self.fov, self.aspect, self.near, self.far)
    }

    /// `projection * view * model`, ready for `Renderer::view_proj`
    pub fn view_proj(&self, model: &Mat4) -> Mat4 {
        Transform::mvp(model, &self.view_matrix(), &self.projection_matrix())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1.5)
    }
}
