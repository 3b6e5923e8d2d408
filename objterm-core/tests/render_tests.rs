use objterm_core::{
    transform_point, Camera, Mat4, Mesh, Orbit, Pixel, Renderer, TexCoord, Texture, Triangle,
    Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Two triangles spanning `[-s, s]^2` in the z = `z` plane, facing +z
fn quad(s: f64, z: f64) -> Mesh {
    let mut mesh = Mesh::new();
    mesh.add_position(-s, -s, z);
    mesh.add_position(s, -s, z);
    mesh.add_position(s, s, z);
    mesh.add_position(-s, s, z);
    mesh.add_triangle(Triangle::new(0, 1, 2));
    mesh.add_triangle(Triangle::new(0, 2, 3));
    mesh
}

fn pixel_center(renderer: &Renderer, x: usize, y: usize) -> (f64, f64) {
    let w = renderer.width() as f64;
    let h = renderer.height() as f64;
    (
        (x as f64 + 0.5) / w * 2.0 - 1.0,
        1.0 - (y as f64 + 0.5) / h * 2.0,
    )
}

fn edge(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> f64 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}

#[test]
fn test_facing_quad_fills_viewport_at_full_intensity() {
    // 8x6 keeps every pixel center off the shared diagonal
    let mesh = quad(2.0, 0.25);
    let mut renderer = Renderer::with_light(8, 6, Vec3::new(0.0, 0.0, 1.0));
    renderer.render(&mesh);

    for pixel in renderer.pixels() {
        assert!(!pixel.is_background());
        assert!(!pixel.has_color());
        assert!((pixel.intensity - 1.0).abs() < 1e-12);
        assert!((pixel.depth - 0.25).abs() < 1e-12);
    }
}

#[test]
fn test_facing_quad_through_camera() {
    let mesh = quad(10.0, 0.0);
    // aspect 1.5 keeps pixel centers off the projected diagonal
    let camera = Camera::default();
    let mut renderer = Renderer::with_light(8, 6, Vec3::new(0.0, 0.0, 1.0));
    renderer.view_proj = camera.view_proj(&Mat4::identity());
    renderer.render(&mesh);

    let depth = renderer.pixels()[0].depth;
    assert!(depth > -1.0 && depth < 1.0);
    for pixel in renderer.pixels() {
        assert!((pixel.intensity - 1.0).abs() < 1e-9);
        assert!((pixel.depth - depth).abs() < 1e-9);
    }
}

#[test]
fn test_reversed_quad_is_fully_culled() {
    let mut mesh = quad(2.0, 0.0);
    for tri in &mut mesh.triangles {
        tri.vertices.swap(1, 2);
    }
    let mut renderer = Renderer::new(8, 6);
    renderer.render(&mesh);

    assert!(renderer.pixels().iter().all(Pixel::is_background));
    assert_eq!(renderer.stats().culled, 2);
    assert_eq!(renderer.stats().drawn_pixels, 0);
}

#[test]
fn test_render_clears_previous_frame() {
    let mut renderer = Renderer::new(8, 6);
    renderer.render(&quad(2.0, 0.0));
    assert!(renderer.pixels().iter().all(|p| !p.is_background()));

    renderer.render(&Mesh::new());
    assert!(renderer.pixels().iter().all(Pixel::is_background));
    assert!(renderer
        .depth_buffer()
        .iter()
        .all(|&d| d == objterm_core::BACKGROUND_DEPTH));
}

#[test]
fn test_rendering_is_deterministic() {
    let mesh = Mesh::cube(1.5);
    let camera = Camera::default();
    let model = Orbit::new(0.6, 0.4).matrix() * mesh.fit_transform();

    let mut renderer = Renderer::new(60, 30);
    renderer.view_proj = camera.view_proj(&model);
    renderer.render(&mesh);
    let first = renderer.pixels().to_vec();
    let first_depth = renderer.depth_buffer().to_vec();
    assert!(first.iter().any(|p| !p.is_background()));

    renderer.clear();
    renderer.render(&mesh);
    assert_eq!(renderer.pixels(), first.as_slice());
    assert_eq!(renderer.depth_buffer(), first_depth.as_slice());
}

#[test]
fn test_cube_shows_only_front_faces() {
    let mesh = Mesh::cube(1.0);
    let mut renderer = Renderer::new(40, 40);
    renderer.view_proj = Camera::new(1.0).view_proj(&mesh.fit_transform());
    renderer.render(&mesh);

    // head-on view: only the +z face survives culling
    let stats = renderer.stats();
    assert_eq!(stats.triangles, 12);
    assert!(stats.culled >= 6);
    let center = renderer.pixel(20, 20).unwrap();
    assert!(!center.is_background());
}

#[test]
fn test_coverage_matches_triangle_hull() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let mut pts = [(0.0, 0.0); 3];
        for p in &mut pts {
            *p = (rng.gen_range(-0.95..0.95), rng.gen_range(-0.95..0.95));
        }
        let area = edge(pts[0], pts[1], pts[2]);
        if area.abs() < 1e-3 {
            continue;
        }
        if area < 0.0 {
            pts.swap(1, 2);
        }

        let mut mesh = Mesh::new();
        for (x, y) in pts {
            mesh.add_position(x, y, 0.0);
        }
        mesh.add_triangle(Triangle::new(0, 1, 2));

        let mut renderer = Renderer::new(32, 24);
        renderer.render(&mesh);

        for y in 0..24 {
            for x in 0..32 {
                let p = pixel_center(&renderer, x, y);
                let e = [
                    edge(pts[0], pts[1], p),
                    edge(pts[1], pts[2], p),
                    edge(pts[2], pts[0], p),
                ];
                // skip centers sitting on an edge
                if e.iter().any(|v| v.abs() < 1e-9) {
                    continue;
                }
                let inside = e.iter().all(|&v| v > 0.0);
                let covered = !renderer.pixel(x, y).unwrap().is_background();
                assert_eq!(inside, covered, "pixel ({x}, {y}) of {pts:?}");
            }
        }
    }
}

#[test]
fn test_depth_is_minimum_over_covering_triangles() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut mesh = Mesh::new();
    let mut corners = Vec::new();
    for t in 0..8 {
        let mut pts = [(0.0, 0.0, 0.0); 3];
        for p in &mut pts {
            *p = (
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-0.9..0.9),
            );
        }
        if edge((pts[0].0, pts[0].1), (pts[1].0, pts[1].1), (pts[2].0, pts[2].1)) < 0.0 {
            pts.swap(1, 2);
        }
        for (x, y, z) in pts {
            mesh.add_position(x, y, z);
        }
        mesh.add_triangle(Triangle::new(t * 3, t * 3 + 1, t * 3 + 2));
        corners.push(pts);
    }

    let mut renderer = Renderer::new(24, 24);
    renderer.render(&mesh);

    for y in 0..24 {
        for x in 0..24 {
            let p = pixel_center(&renderer, x, y);
            let mut nearest: Option<f64> = None;
            let mut ambiguous = false;
            for pts in &corners {
                let [a, b, c] = pts.map(|(u, v, _)| (u, v));
                let area = edge(a, b, c);
                if area.abs() < 1e-10 {
                    continue;
                }
                let w0 = edge(b, c, p) / area;
                let w1 = edge(c, a, p) / area;
                let w2 = edge(a, b, p) / area;
                if [w0, w1, w2].iter().any(|w| w.abs() < 1e-9) {
                    ambiguous = true;
                }
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }
                let z = w0 * pts[0].2 + w1 * pts[1].2 + w2 * pts[2].2;
                nearest = Some(nearest.map_or(z, |n| n.min(z)));
            }
            if ambiguous {
                continue;
            }
            let pixel = renderer.pixel(x, y).unwrap();
            match nearest {
                Some(z) => assert!((pixel.depth - z).abs() < 1e-9, "({x}, {y})"),
                None => assert!(pixel.is_background(), "({x}, {y})"),
            }
        }
    }
}

#[test]
fn test_shade_is_bounded() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..20 {
        let light = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let mut mesh = Mesh::new();
        mesh.add_position(-1.0, -1.0, rng.gen_range(-0.9..0.9));
        mesh.add_position(1.0, -1.0, rng.gen_range(-0.9..0.9));
        mesh.add_position(-1.0, 1.0, rng.gen_range(-0.9..0.9));
        mesh.add_triangle(Triangle::new(0, 1, 2));

        let mut renderer = Renderer::with_light(8, 8, light);
        renderer.render(&mesh);
        for pixel in renderer.pixels().iter().filter(|p| !p.is_background()) {
            assert!(pixel.intensity >= 0.3 - 1e-12);
            assert!(pixel.intensity <= 1.0 + 1e-12);
        }
    }
}

#[test]
fn test_textured_cube_writes_colors() {
    let mut mesh = Mesh::cube(1.0);
    mesh.texture = Texture::from_rgb(1, 1, vec![255, 255, 255]);
    mesh.tex_coords = vec![TexCoord::new(0.5, 0.5)];
    for tri in &mut mesh.triangles {
        *tri = tri.with_tex_coords(0, 0, 0);
    }

    let mut renderer = Renderer::new(30, 20);
    renderer.view_proj = Camera::default().view_proj(&(Orbit::new(0.5, 0.3).matrix()));
    renderer.render(&mesh);

    let drawn: Vec<_> = renderer
        .pixels()
        .iter()
        .filter(|p| !p.is_background())
        .collect();
    assert!(!drawn.is_empty());
    for pixel in drawn {
        let color = pixel.color.unwrap();
        // white texel times the flat shade
        assert!((color.r - pixel.intensity).abs() < 1e-12);
        assert!((color.g - pixel.intensity).abs() < 1e-12);
    }
}

#[test]
fn test_camera_inside_mesh_completes() {
    // no near-plane clipping: corners behind the eye flip through the divide
    let mesh = Mesh::cube(2.0);
    let camera = Camera {
        distance: 0.5,
        ..Camera::default()
    };
    let mut renderer = Renderer::new(16, 8);
    renderer.view_proj = camera.view_proj(&Mat4::identity());
    renderer.render(&mesh);

    let behind = transform_point(&renderer.view_proj, &Vec3::new(1.0, 1.0, 1.0));
    assert!(behind.z > 1.0 || behind.z < -1.0);
    assert_eq!(renderer.stats().triangles, 12);
}
