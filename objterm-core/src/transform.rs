/// Vector helpers and 4x4 transform builders
///
/// Matrices are nalgebra's column-major `Matrix4<f64>`, so `a * b` applies `b`
/// first. None of these functions can fail: degenerate input yields zero
/// vectors or clamped denominators instead of errors.
use nalgebra::{Matrix4, Vector3};

pub type Vec3 = Vector3<f64>;
pub type Mat4 = Matrix4<f64>;

/// Lengths at or below this are treated as zero
pub const NORMALIZE_EPSILON: f64 = 1e-10;

/// Smallest |w| allowed in the homogeneous divide
pub const MIN_W: f64 = 1e-10;

pub trait VectorExt {
    /// Unit vector in the same direction, or the zero vector when too short
    fn normalized_or_zero(&self) -> Vec3;
}

impl VectorExt for Vec3 {
    fn normalized_or_zero(&self) -> Vec3 {
        self.try_normalize(NORMALIZE_EPSILON).unwrap_or_else(Vec3::zeros)
    }
}

/// Apply `m` to `p` including the perspective divide.
pub fn transform_point(m: &Mat4, p: &Vec3) -> Vec3 {
    let mut w = m[(3, 0)] * p.x + m[(3, 1)] * p.y + m[(3, 2)] * p.z + m[(3, 3)];
    if w.abs() < MIN_W {
        w = MIN_W;
    }
    Vec3::new(
        (m[(0, 0)] * p.x + m[(0, 1)] * p.y + m[(0, 2)] * p.z + m[(0, 3)]) / w,
        (m[(1, 0)] * p.x + m[(1, 1)] * p.y + m[(1, 2)] * p.z + m[(1, 3)]) / w,
        (m[(2, 0)] * p.x + m[(2, 1)] * p.y + m[(2, 2)] * p.z + m[(2, 3)]) / w,
    )
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    pub fn identity() -> Mat4 {
        Mat4::identity()
    }

    /// Right-handed perspective projection mapping the view frustum to [-1, 1]^3.
    ///
    /// `fov_degrees` is the vertical field of view.
    pub fn perspective(fov_degrees: f64, aspect: f64, near: f64, far: f64) -> Mat4 {
        let tan_half_fov = (fov_degrees.to_radians() * 0.5).tan();
        let mut m = Mat4::zeros();
        m[(0, 0)] = 1.0 / (aspect * tan_half_fov);
        m[(1, 1)] = 1.0 / tan_half_fov;
        m[(2, 2)] = -(far + near) / (far - near);
        m[(3, 2)] = -1.0;
        m[(2, 3)] = -(2.0 * far * near) / (far - near);
        m
    }

    /// View matrix looking from `eye` towards `target`.
    ///
    /// An `up` parallel to the view direction collapses the basis to zero rows.
    pub fn look_at(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4 {
        let f = (target - eye).normalized_or_zero();
        let r = f.cross(up).normalized_or_zero();
        let u = r.cross(&f);

        #[rustfmt::skip]
        let view = Mat4::new(
             r.x,  r.y,  r.z, -r.dot(eye),
             u.x,  u.y,  u.z, -u.dot(eye),
            -f.x, -f.y, -f.z,  f.dot(eye),
             0.0,  0.0,  0.0,  1.0,
        );
        view
    }

    /// Create a uniform scale matrix
    pub fn scale(s: f64) -> Mat4 {
        Mat4::new_nonuniform_scaling(&Vec3::new(s, s, s))
    }

    /// Create a translation matrix
    pub fn translation(t: &Vec3) -> Mat4 {
        Mat4::new_translation(t)
    }

    pub fn rotation_x(radians: f64) -> Mat4 {
        Mat4::new_rotation(Vec3::new(radians, 0.0, 0.0))
    }

    pub fn rotation_y(radians: f64) -> Mat4 {
        Mat4::new_rotation(Vec3::new(0.0, radians, 0.0))
    }

    /// Create a model-view-projection matrix
    pub fn mvp(model: &Mat4, view: &Mat4, projection: &Mat4) -> Mat4 {
        projection * view * model
    }
}
