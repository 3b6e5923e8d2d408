/// Depth-buffered triangle rasterizer with flat shading
use log::trace;

use crate::geometry::{face_normal, Mesh, TexCoord, Triangle};
use crate::texture::{Rgb, Texture};
use crate::transform::{transform_point, Mat4, Vec3, VectorExt};

/// Depth of a pixel no triangle has touched
pub const BACKGROUND_DEPTH: f64 = f64::MAX;

/// Unlit share of the shade value
pub const AMBIENT: f64 = 0.3;

/// Barycentric denominators below this mark a degenerate triangle
const DEGENERATE_AREA: f64 = 1e-10;

/// One framebuffer cell.
///
/// `intensity` is always the flat shade of the covering triangle; `color` is
/// only set when the mesh carried a texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pixel {
    pub depth: f64,
    pub intensity: f64,
    pub color: Option<Rgb>,
}

impl Pixel {
    pub const BACKGROUND: Pixel = Pixel {
        depth: BACKGROUND_DEPTH,
        intensity: 0.0,
        color: None,
    };

    pub fn has_color(&self) -> bool {
        self.color.is_some()
    }

    pub fn is_background(&self) -> bool {
        self.depth == BACKGROUND_DEPTH
    }
}

impl Default for Pixel {
    fn default() -> Self {
        Self::BACKGROUND
    }
}

/// Counters for the most recent frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub triangles: usize,
    pub culled: usize,
    pub drawn_pixels: usize,
}

/// Software renderer owning the framebuffer and depth buffer
pub struct Renderer {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
    depth_buffer: Vec<f64>,
    light_dir: Vec3,
    stats: RenderStats,
    /// Object space to clip space, `projection * view * model`
    pub view_proj: Mat4,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_light(width, height, Vec3::new(0.5, 0.5, 1.0))
    }

    /// Renderer with a fixed light direction; normalized here.
    pub fn with_light(width: usize, height: usize, light_dir: Vec3) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            pixels: vec![Pixel::BACKGROUND; size],
            depth_buffer: vec![BACKGROUND_DEPTH; size],
            light_dir: light_dir.normalized_or_zero(),
            stats: RenderStats::default(),
            view_proj: Mat4::identity(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn light_direction(&self) -> Vec3 {
        self.light_dir
    }

    /// Row-major framebuffer of the last frame
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<&Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x)
    }

    pub fn depth_buffer(&self) -> &[f64] {
        &self.depth_buffer
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.pixels.fill(Pixel::BACKGROUND);
        self.depth_buffer.fill(BACKGROUND_DEPTH);
        self.stats = RenderStats::default();
    }

    /// Clear both buffers and rasterize every triangle in order.
    pub fn render(&mut self, mesh: &Mesh) {
        self.clear();

        let texture = mesh.is_textured().then_some(&mesh.texture);
        for triangle in &mesh.triangles {
            self.render_triangle(mesh, triangle, texture);
        }

        trace!(
            "rendered {} triangles ({} culled), {} pixel writes",
            self.stats.triangles,
            self.stats.culled,
            self.stats.drawn_pixels
        );
    }

    fn render_triangle(&mut self, mesh: &Mesh, triangle: &Triangle, texture: Option<&Texture>) {
        self.stats.triangles += 1;
        let [p0, p1, p2] = triangle.positions(mesh);

        // Project to normalized device coordinates
        let s0 = transform_point(&self.view_proj, &p0);
        let s1 = transform_point(&self.view_proj, &p1);
        let s2 = transform_point(&self.view_proj, &p2);

        // Back-face culling on the projected winding
        let area = (s1.x - s0.x) * (s2.y - s0.y) - (s2.x - s0.x) * (s1.y - s0.y);
        if area <= 0.0 {
            self.stats.culled += 1;
            return;
        }

        // Flat shading from the object-space face normal; vertex normals are not used
        let normal = face_normal(&p0, &p1, &p2);
        let shade = AMBIENT + (1.0 - AMBIENT) * normal.dot(&self.light_dir).clamp(0.0, 1.0);

        let uvs = texture.map(|_| triangle.uvs(mesh).unwrap_or([TexCoord::default(); 3]));

        self.rasterize_triangle([s0, s1, s2], shade, texture.zip(uvs));
    }

    fn rasterize_triangle(
        &mut self,
        coords: [Vec3; 3],
        shade: f64,
        texturing: Option<(&Texture, [TexCoord; 3])>,
    ) {
        let [v0, v1, v2] = coords;
        let (w, h) = (self.width as f64, self.height as f64);

        // Bounding box in pixels; device y points up, rows point down
        let min_x = ((v0.x.min(v1.x).min(v2.x) + 1.0) * 0.5 * w).floor() as i64;
        let max_x = ((v0.x.max(v1.x).max(v2.x) + 1.0) * 0.5 * w).ceil() as i64;
        let min_y = ((1.0 - v0.y.max(v1.y).max(v2.y)) * 0.5 * h).floor() as i64;
        let max_y = ((1.0 - v0.y.min(v1.y).min(v2.y)) * 0.5 * h).ceil() as i64;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i64 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                // Pixel center back in device coordinates
                let px = (x as f64 + 0.5) / w * 2.0 - 1.0;
                let py = 1.0 - (y as f64 + 0.5) / h * 2.0;

                let Some((w0, w1, w2)) = barycentric(
                    (v0.x, v0.y),
                    (v1.x, v1.y),
                    (v2.x, v2.y),
                    (px, py),
                ) else {
                    // zero-area: nothing is covered
                    return;
                };
                if !covers(w0, w1, w2) {
                    continue;
                }

                let depth = w0 * v0.z + w1 * v1.z + w2 * v2.z;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    let color = texturing.map(|(texture, [t0, t1, t2])| {
                        let u = w0 * t0.u + w1 * t1.u + w2 * t2.u;
                        let v = w0 * t0.v + w1 * t1.v + w2 * t2.v;
                        texture.sample(u, v).scaled(shade)
                    });
                    self.pixels[idx] = Pixel {
                        depth,
                        intensity: shade,
                        color,
                    };
                    self.stats.drawn_pixels += 1;
                }
            }
        }
    }
}

/// Inside test on barycentric weights; NaN weights never cover a pixel.
fn covers(w0: f64, w1: f64, w2: f64) -> bool {
    w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0
}

/// Calculate barycentric coordinates for a point in a triangle.
///
/// `None` for a degenerate triangle. The point is inside iff all three
/// weights are non-negative.
pub fn barycentric(
    v0: (f64, f64),
    v1: (f64, f64),
    v2: (f64, f64),
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denom = (v1.0 - v0.0) * (v2.1 - v0.1) - (v2.0 - v0.0) * (v1.1 - v0.1);

    if denom.abs() < DEGENERATE_AREA {
        return None;
    }

    let w1 = ((p.0 - v0.0) * (v2.1 - v0.1) - (v2.0 - v0.0) * (p.1 - v0.1)) / denom;
    let w2 = ((v1.0 - v0.0) * (p.1 - v0.1) - (p.0 - v0.0) * (v1.1 - v0.1)) / denom;
    let w0 = 1.0 - w1 - w2;

    Some((w0, w1, w2))
}
