//! End-to-end tests of the render pipeline: coverage, depth ordering,
//! culling, near-plane clipping and interpolation invariants.
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use softraster::raster::{affine_weights, perspective_correct_weights};
use softraster::transform::{orthographic, perspective_fov, translation};
use softraster::{
    ClipMode, Matrix4, Mesh, Point2D, Point3D, Point4D, Renderer, TriangleToRasterize, Vertex,
    project_vertex,
};

const RED: Point3D = Point3D::new(1.0, 0.0, 0.0);
const BLUE: Point3D = Point3D::new(0.0, 0.0, 1.0);

fn vertex(x: f32, y: f32, z: f32, color: Point3D) -> Vertex {
    Vertex::new(Point4D::point(x, y, z), color, Point2D::default())
}

fn full_screen_quad(color: Point3D) -> Mesh {
    Mesh::from_triangles(
        vec![
            vertex(-1.0, -1.0, 0.0, color),
            vertex(1.0, -1.0, 0.0, color),
            vertex(1.0, 1.0, 0.0, color),
            vertex(-1.0, 1.0, 0.0, color),
        ],
        vec![[0, 1, 2], [0, 2, 3]],
    )
    .unwrap()
}

#[test]
fn full_screen_quad_covers_every_pixel() {
    let mut renderer = Renderer::new(100, 100).unwrap();
    let (color, depth) = renderer.render(&full_screen_quad(RED), &Matrix4::identity()).unwrap();

    for y in 0..100 {
        for x in 0..100 {
            assert_eq!(color.get_pixel(x, y), Some([0, 0, 255, 255]), "pixel ({x}, {y})");
            assert_eq!(depth.get(x, y), Some(0.0), "depth at ({x}, {y})");
        }
    }
    let stats = renderer.last_stats();
    assert_eq!(stats.rasterized, 2);
    assert_eq!(stats.frustum_rejected + stats.culled, 0);
}

#[test]
fn full_screen_quad_survives_backface_culling() {
    let mut renderer = Renderer::new(40, 30).unwrap();
    renderer.set_backface_culling(true);
    let (color, _) = renderer.render(&full_screen_quad(RED), &Matrix4::identity()).unwrap();
    assert_eq!(color.covered_pixels(), 40 * 30);
}

/// Two overlapping triangles: red at z = -0.5 (near), blue at z = 0.5 (far).
fn overlapping_pair(red_first: bool) -> Mesh {
    let near = [vertex(-0.8, -0.8, -0.5, RED), vertex(0.6, -0.8, -0.5, RED), vertex(-0.1, 0.7, -0.5, RED)];
    let far = [vertex(-0.6, -0.6, 0.5, BLUE), vertex(0.9, -0.5, 0.5, BLUE), vertex(0.2, 0.9, 0.5, BLUE)];
    let vertices = if red_first { [near, far].concat() } else { [far, near].concat() };
    Mesh::from_triangles(vertices, vec![[0, 1, 2], [3, 4, 5]]).unwrap()
}

#[test]
fn depth_test_is_order_independent() {
    let mut renderer = Renderer::new(64, 64).unwrap();
    let (color_a, depth_a) = renderer.render(&overlapping_pair(true), &Matrix4::identity()).unwrap();
    let (color_b, depth_b) = renderer.render(&overlapping_pair(false), &Matrix4::identity()).unwrap();
    assert_eq!(color_a, color_b);
    assert_eq!(depth_a, depth_b);

    // Somewhere both triangles overlap, the near one wins.
    let center = color_a.get_pixel(28, 34).unwrap();
    assert_eq!(center, [0, 0, 255, 255]);
    assert!((depth_a.get(28, 34).unwrap() - -0.5).abs() < 1e-6);

    // Where only the far triangle is present it shows through.
    let far_only = color_a.get_pixel(56, 46).unwrap();
    assert_eq!(far_only, [255, 0, 0, 255]);
    assert!((depth_a.get(56, 46).unwrap() - 0.5).abs() < 1e-6);
}

#[test]
fn shuffled_triangle_order_gives_identical_buffers() {
    // A stack of quads at distinct depths, each a different color.
    let mut vertices = Vec::new();
    let mut triangles = Vec::new();
    for layer in 0..6 {
        let z = -0.8 + 0.3 * layer as f32;
        let offset = 0.1 * layer as f32;
        let color = Point3D::new(layer as f32 / 5.0, 1.0 - layer as f32 / 5.0, 0.25);
        let base = vertices.len();
        vertices.push(vertex(-0.9 + offset, -0.9 + offset, z, color));
        vertices.push(vertex(0.5 + offset, -0.9 + offset, z, color));
        vertices.push(vertex(0.5 + offset, 0.5 + offset, z, color));
        vertices.push(vertex(-0.9 + offset, 0.5 + offset, z, color));
        triangles.push([base, base + 1, base + 2]);
        triangles.push([base, base + 2, base + 3]);
    }
    let mvp = Matrix4::identity();
    let mut renderer = Renderer::new(80, 60).unwrap();
    let reference = renderer
        .render(&Mesh::from_triangles(vertices.clone(), triangles.clone()).unwrap(), &mvp)
        .unwrap();

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..5 {
        triangles.shuffle(&mut rng);
        let mesh = Mesh::from_triangles(vertices.clone(), triangles.clone()).unwrap();
        let result = renderer.render(&mesh, &mvp).unwrap();
        assert_eq!(result.0, reference.0);
        assert_eq!(result.1, reference.1);
    }
}

#[test]
fn backface_culling_toggle() {
    // Clockwise on screen.
    let mesh = Mesh::from_triangles(
        vec![vertex(-0.5, -0.5, 0.0, RED), vertex(0.0, 0.5, 0.0, RED), vertex(0.5, -0.5, 0.0, RED)],
        vec![[0, 1, 2]],
    )
    .unwrap();
    let mut renderer = Renderer::new(50, 50).unwrap();

    renderer.set_backface_culling(true);
    let (culled, _) = renderer.render(&mesh, &Matrix4::identity()).unwrap();
    assert_eq!(culled.covered_pixels(), 0);
    assert_eq!(renderer.last_stats().culled, 1);

    renderer.set_backface_culling(false);
    let (drawn, _) = renderer.render(&mesh, &Matrix4::identity()).unwrap();
    let footprint: Vec<Point2D> = mesh
        .vertices()
        .iter()
        .map(|v| {
            let s = project_vertex(v.position, &Matrix4::identity(), 50, 50);
            Point2D::new(s.x, s.y)
        })
        .collect();
    let covered = drawn.covered_pixels();
    let expected = reference_fill(&footprint, 50, 50);
    assert!(expected > 250);
    assert!(covered.abs_diff(expected) <= 2, "covered {covered}, reference {expected}");
}

#[test]
fn offscreen_geometry_is_clamped_to_the_viewport() {
    // Extends far past every side plane without crossing the near plane.
    let mesh = Mesh::from_triangles(
        vec![vertex(-50.0, -50.0, 0.0, RED), vertex(80.0, -40.0, 0.0, RED), vertex(0.0, 90.0, 0.0, RED)],
        vec![[0, 1, 2]],
    )
    .unwrap();
    for mode in [ClipMode::NearPlane, ClipMode::Frustum] {
        let mut renderer = Renderer::new(32, 24).unwrap();
        renderer.set_clip_mode(mode);
        let (color, _) = renderer.render(&mesh, &Matrix4::identity()).unwrap();
        assert_eq!(color.covered_pixels(), 32 * 24, "{mode:?}");
    }
}

#[test]
fn sliver_in_the_last_column_and_row_is_drawn() {
    // Only x in [99.2, 100] of a 100 px wide viewport is on screen.
    let right = Mesh::from_triangles(
        vec![vertex(0.984, 1.0, 0.0, RED), vertex(3.0, 1.0, 0.0, RED), vertex(0.984, -1.0, 0.0, RED)],
        vec![[0, 1, 2]],
    )
    .unwrap();
    // Only y in [99.2, 100] of a 100 px tall viewport is on screen.
    let bottom = Mesh::from_triangles(
        vec![vertex(1.0, -0.984, 0.0, RED), vertex(1.0, -3.0, 0.0, RED), vertex(-1.0, -0.984, 0.0, RED)],
        vec![[0, 1, 2]],
    )
    .unwrap();

    for mode in [ClipMode::NearPlane, ClipMode::Frustum] {
        let mut renderer = Renderer::new(100, 100).unwrap();
        renderer.set_clip_mode(mode);

        let (color, _) = renderer.render(&right, &Matrix4::identity()).unwrap();
        let column = (0..100).filter(|&y| color.get_pixel(99, y) == Some([0, 0, 255, 255])).count();
        assert_eq!(column, 100, "{mode:?}");
        assert_eq!(color.covered_pixels(), 100, "{mode:?}");
        assert_eq!(renderer.last_stats().culled, 0);

        let (color, _) = renderer.render(&bottom, &Matrix4::identity()).unwrap();
        let row = (0..100).filter(|&x| color.get_pixel(x, 99) == Some([0, 0, 255, 255])).count();
        assert_eq!(row, 100, "{mode:?}");
        assert_eq!(color.covered_pixels(), 100, "{mode:?}");
    }
}

#[test]
fn triangle_behind_the_camera_is_rejected() {
    let mvp = perspective_fov(60.0, 1.0, 1.0, 100.0);
    let mesh = Mesh::from_triangles(
        vec![vertex(-1.0, -1.0, 3.0, RED), vertex(1.0, -1.0, 3.0, RED), vertex(0.0, 1.0, 3.0, RED)],
        vec![[0, 1, 2]],
    )
    .unwrap();
    let mut renderer = Renderer::new(40, 40).unwrap();
    let (color, _) = renderer.render(&mesh, &mvp).unwrap();
    assert_eq!(color.covered_pixels(), 0);
    assert_eq!(renderer.last_stats().frustum_rejected, 1);
}

/// Pixel centers inside or on a convex polygon given in screen space.
fn reference_fill(polygon: &[Point2D], width: u32, height: u32) -> usize {
    let mut count = 0;
    for y in 0..height {
        for x in 0..width {
            let p = Point2D::new(x as f32 + 0.5, y as f32 + 0.5);
            let sides: Vec<f32> = (0..polygon.len())
                .map(|i| {
                    let a = polygon[i];
                    let b = polygon[(i + 1) % polygon.len()];
                    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
                })
                .collect();
            if sides.iter().all(|s| *s >= 0.0) || sides.iter().all(|s| *s <= 0.0) {
                count += 1;
            }
        }
    }
    count
}

#[test]
fn near_plane_clip_produces_gap_free_quad() {
    let (width, height) = (100, 100);
    let mvp = perspective_fov(60.0, 1.0, 1.0, 100.0);
    // Two corners in front of the camera, one behind it (w < 0 after projection).
    let mesh = Mesh::from_triangles(
        vec![vertex(-1.0, -1.0, -3.0, RED), vertex(1.0, -1.0, -3.0, RED), vertex(0.0, 1.0, 1.0, RED)],
        vec![[0, 1, 2]],
    )
    .unwrap();
    assert!((mvp * mesh.vertices()[2].position).w < 0.0);

    let mut renderer = Renderer::new(width, height).unwrap();
    let (_, depth) = renderer.render(&mesh, &mvp).unwrap();
    let stats = renderer.last_stats();
    assert_eq!(stats.clipped, 1);
    assert_eq!(stats.setup, 2);
    assert_eq!(stats.rasterized, 2);

    // The visible part ends where the edges to the hidden corner meet the
    // near plane (view z = -1), halfway along each edge.
    let polygon: Vec<Point2D> = [
        Point4D::point(-1.0, -1.0, -3.0),
        Point4D::point(1.0, -1.0, -3.0),
        Point4D::point(0.5, 0.0, -1.0),
        Point4D::point(-0.5, 0.0, -1.0),
    ]
    .iter()
    .map(|p| {
        let s = project_vertex(*p, &mvp, width, height);
        Point2D::new(s.x, s.y)
    })
    .collect();
    let expected = reference_fill(&polygon, width, height);
    let covered = depth.depth.iter().filter(|d| d.is_finite()).count();
    assert!(expected > 1000);
    assert!(covered.abs_diff(expected) <= 2, "covered {covered}, reference {expected}");
}

#[test]
fn barycentric_weights_partition_unity() {
    let mvp = perspective_fov(50.0, 4.0 / 3.0, 0.5, 20.0) * translation(0.2, -0.1, -4.0);
    let clip = [
        Point4D::point(-1.5, -1.0, 0.5),
        Point4D::point(1.2, -0.8, -1.5),
        Point4D::point(0.1, 1.3, 0.0),
    ]
    .map(|p| Vertex::new(mvp * p, RED, Point2D::new(p.x, p.y)));
    let tri = TriangleToRasterize::setup(&clip[0], &clip[1], &clip[2], 160, 120, false).unwrap();

    let bounds = tri.bounds();
    let mut inside = 0;
    for y in bounds.min_y..=bounds.max_y {
        for x in bounds.min_x..=bounds.max_x {
            let weights = affine_weights(&tri, x as f64 + 0.5, y as f64 + 0.5);
            if weights.iter().any(|w| *w < 0.0) {
                continue;
            }
            inside += 1;
            assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-4);
            let corrected = perspective_correct_weights(weights, tri.one_over_w());
            assert!((corrected.iter().sum::<f64>() - 1.0).abs() < 1e-4);
            assert!(corrected.iter().all(|w| *w >= 0.0));
        }
    }
    assert!(inside > 100);
}

#[test]
fn origin_projects_to_viewport_center() {
    let aspect = 640.0 / 480.0;
    let mvp = orthographic(-aspect, aspect, -1.0, 1.0, 0.1, 100.0);
    let p = project_vertex(Point4D::point(0.0, 0.0, 0.0), &mvp, 640, 480);
    assert!((p.x - 320.0).abs() <= 0.5);
    assert!((p.y - 240.0).abs() <= 0.5);

    // (aspect, 1) is the top-right corner of the ortho volume
    let corner = project_vertex(Point4D::point(aspect, 1.0, -1.0), &mvp, 640, 480);
    assert!((corner.x - 640.0).abs() <= 0.5);
    assert!(corner.y.abs() <= 0.5);
}

#[test]
fn projected_depth_matches_rendered_depth() {
    let mvp = perspective_fov(45.0, 1.0, 0.5, 50.0) * translation(0.0, 0.0, -3.0);
    let mesh = full_screen_quad(RED);
    let mut renderer = Renderer::new(64, 64).unwrap();
    let (_, depth) = renderer.render(&mesh, &mvp).unwrap();

    let p = project_vertex(Point4D::point(0.0, 0.0, 0.0), &mvp, 64, 64);
    let rendered = depth.get(p.x as u32, p.y as u32).unwrap();
    assert!((rendered - p.z as f64).abs() < 1e-4, "rendered {rendered}, projected {}", p.z);
}
