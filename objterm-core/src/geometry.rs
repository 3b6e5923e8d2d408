/// Indexed mesh model consumed by the renderer
use crate::texture::Texture;
use crate::transform::{Mat4, Transform, Vec3, VectorExt};

/// A texture coordinate pair. Not clamped; the sampler wraps it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TexCoord {
    pub u: f64,
    pub v: f64,
}

impl TexCoord {
    pub fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }
}

/// A triangle face referencing mesh attributes by index.
///
/// Position indices are always present. Normal and texture-coordinate indices
/// are optional per corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [usize; 3],
    pub normals: [Option<usize>; 3],
    pub tex_coords: [Option<usize>; 3],
}

impl Triangle {
    pub fn new(v0: usize, v1: usize, v2: usize) -> Self {
        Self {
            vertices: [v0, v1, v2],
            normals: [None; 3],
            tex_coords: [None; 3],
        }
    }

    pub fn with_tex_coords(mut self, t0: usize, t1: usize, t2: usize) -> Self {
        self.tex_coords = [Some(t0), Some(t1), Some(t2)];
        self
    }

    pub fn with_normals(mut self, n0: usize, n1: usize, n2: usize) -> Self {
        self.normals = [Some(n0), Some(n1), Some(n2)];
        self
    }

    /// Resolve the three corner positions. Indices must be in range.
    pub fn positions(&self, mesh: &Mesh) -> [Vec3; 3] {
        let [a, b, c] = self.vertices;
        [mesh.positions[a], mesh.positions[b], mesh.positions[c]]
    }

    /// Corner texture coordinates when every corner has one in range.
    pub fn uvs(&self, mesh: &Mesh) -> Option<[TexCoord; 3]> {
        let [a, b, c] = self.tex_coords;
        let lookup = |i: Option<usize>| i.and_then(|i| mesh.tex_coords.get(i).copied());
        Some([lookup(a)?, lookup(b)?, lookup(c)?])
    }

    /// Calculate the face normal from the triangle's object-space positions
    pub fn face_normal(&self, mesh: &Mesh) -> Vec3 {
        let [p0, p1, p2] = self.positions(mesh);
        face_normal(&p0, &p1, &p2)
    }
}

/// Geometric normal of a counter-clockwise triangle; zero when degenerate.
pub fn face_normal(p0: &Vec3, p1: &Vec3, p2: &Vec3) -> Vec3 {
    (p1 - p0).cross(&(p2 - p0)).normalized_or_zero()
}

/// A 3D mesh: attribute arenas plus triangles indexing into them
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<TexCoord>,
    pub triangles: Vec<Triangle>,
    pub texture: Texture,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_position(&mut self, x: f64, y: f64, z: f64) -> usize {
        self.positions.push(Vec3::new(x, y, z));
        self.positions.len() - 1
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn is_textured(&self) -> bool {
        self.texture.is_loaded()
    }

    /// Axis-aligned bounds of all positions, `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        }))
    }

    /// Model transform that centers the mesh on the origin and scales its
    /// largest extent to 2 units.
    pub fn fit_transform(&self) -> Mat4 {
        let Some((min, max)) = self.bounds() else {
            return Transform::identity();
        };
        let center = (min + max) * 0.5;
        let mut size = (max - min).max();
        if size < 1e-6 {
            size = 1.0;
        }
        Transform::scale(2.0 / size) * Transform::translation(&-center)
    }

    /// Create a simple cube mesh for testing
    pub fn cube(size: f64) -> Self {
        let h = size / 2.0;
        let mut mesh = Self::new();

        for &(x, y, z) in &[
            (-h, -h, -h),
            (h, -h, -h),
            (h, h, -h),
            (-h, h, -h),
            (-h, -h, h),
            (h, -h, h),
            (h, h, h),
            (-h, h, h),
        ] {
            mesh.add_position(x, y, z);
        }

        // Counter-clockwise when viewed from outside
        let quads: [[usize; 4]; 6] = [
            [4, 5, 6, 7], // front (+z)
            [1, 0, 3, 2], // back (-z)
            [7, 6, 2, 3], // top (+y)
            [0, 1, 5, 4], // bottom (-y)
            [5, 1, 2, 6], // right (+x)
            [0, 4, 7, 3], // left (-x)
        ];
        for [a, b, c, d] in quads {
            mesh.add_triangle(Triangle::new(a, b, c));
            mesh.add_triangle(Triangle::new(a, c, d));
        }

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::transform_point;

    #[test]
    fn test_cube_normals_point_outward() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.positions.len(), 8);
        assert_eq!(cube.triangles.len(), 12);
        for tri in &cube.triangles {
            let [p0, p1, p2] = tri.positions(&cube);
            let centroid = (p0 + p1 + p2) / 3.0;
            let normal = tri.face_normal(&cube);
            assert!((normal.norm() - 1.0).abs() < 1e-9);
            assert!(normal.dot(&centroid) > 0.0);
        }
    }

    #[test]
    fn test_degenerate_face_normal_is_zero() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(1.0, 1.0, 1.0);
        let c = Vec3::new(2.0, 2.0, 2.0);
        assert_eq!(face_normal(&a, &b, &c), Vec3::zeros());
    }

    #[test]
    fn test_uvs_require_all_corners() {
        let mut mesh = Mesh::cube(1.0);
        mesh.tex_coords = vec![TexCoord::new(0.0, 0.0), TexCoord::new(1.0, 0.0)];

        let tri = Triangle::new(0, 1, 2).with_tex_coords(0, 1, 1);
        assert!(tri.uvs(&mesh).is_some());

        let mut partial = tri;
        partial.tex_coords[2] = None;
        assert!(partial.uvs(&mesh).is_none());

        let out_of_range = Triangle::new(0, 1, 2).with_tex_coords(0, 1, 5);
        assert!(out_of_range.uvs(&mesh).is_none());
    }

    #[test]
    fn test_bounds_and_fit_transform() {
        let mut mesh = Mesh::new();
        assert!(mesh.bounds().is_none());
        mesh.add_position(2.0, 0.0, 0.0);
        mesh.add_position(6.0, 1.0, -1.0);

        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Vec3::new(2.0, 0.0, -1.0));
        assert_eq!(max, Vec3::new(6.0, 1.0, 0.0));

        let fit = mesh.fit_transform();
        let a = transform_point(&fit, &mesh.positions[0]);
        let b = transform_point(&fit, &mesh.positions[1]);
        assert!((a.x + 1.0).abs() < 1e-9);
        assert!((b.x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_transform_single_point() {
        let mut mesh = Mesh::new();
        mesh.add_position(3.0, 3.0, 3.0);
        let p = transform_point(&mesh.fit_transform(), &mesh.positions[0]);
        assert!(p.norm() < 1e-9);
    }
}
