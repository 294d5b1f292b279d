use std::f32::consts::{FRAC_PI_2, PI};

use crate::{geometry, Camera, Error, Geometry, Graph, Mat3, Mat4, NodeId, Transform, Vec3};

const EPS: f32 = 1e-4;

fn sample() -> Mat4 {
    Mat4::translation(3.0, -2.0, 7.5)
        .y_rotate(0.7)
        .x_rotate(-0.3)
        .scale(2.0, 0.5, 1.5)
}

#[test]
fn test_identity_multiply() {
    let m = sample();
    assert_eq!(Mat4::IDENTITY.multiply(&m), m);
    assert_eq!(m.multiply(&Mat4::IDENTITY), m);
}

#[test]
fn test_multiply_associative() {
    let a = sample();
    let b = Mat4::perspective(1.0, 1.5, 1.0, 100.0).unwrap();
    let c = Mat4::axis_rotation(Vec3::new(1.0, 2.0, 3.0), 1.1);

    assert!(((a * b) * c).approx_eq(&(a * (b * c)), EPS));
}

#[test]
fn test_translations_compose_additively() {
    let a = Mat4::translation(1.0, 2.0, 3.0);
    let b = Mat4::translation(-4.0, 0.5, 10.0);
    assert_eq!(a * b, Mat4::translation(-3.0, 2.5, 13.0));
    assert_eq!(a.translate(-4.0, 0.5, 10.0), Mat4::translation(-3.0, 2.5, 13.0));
}

#[test]
fn test_combinators_match_multiply() {
    let m = sample();
    assert!(m
        .translate(1.0, 2.0, 3.0)
        .approx_eq(&(m * Mat4::translation(1.0, 2.0, 3.0)), EPS));
    assert!(m
        .z_rotate(0.4)
        .approx_eq(&(m * Mat4::z_rotation(0.4)), EPS));
    assert!(m
        .scale(2.0, 3.0, 4.0)
        .approx_eq(&(m * Mat4::scaling(2.0, 3.0, 4.0)), EPS));
}

#[test]
fn test_column_major_layout() {
    let m = Mat4::translation(5.0, 6.0, 7.0);
    assert_eq!(&m.as_slice()[12..15], &[5.0, 6.0, 7.0]);
    assert_eq!(m.at(0, 3), 5.0);
    assert_eq!(m.transpose().at(3, 0), 5.0);
}

#[test]
fn test_inverse_roundtrip() {
    let m = sample();
    let inv = m.inverse().unwrap();

    assert!((m * inv).approx_eq(&Mat4::IDENTITY, EPS));
    assert!(inv.inverse().unwrap().approx_eq(&m, EPS));
}

#[test]
fn test_inverse_singular() {
    let flat = Mat4::scaling(1.0, 0.0, 1.0);
    assert_eq!(flat.determinant(), 0.0);
    assert_eq!(flat.inverse(), Err(Error::Singular));
    assert_eq!(Mat3::scaling(0.0, 1.0).inverse(), Err(Error::Singular));
}

#[test]
fn test_inverse_small_scale() {
    let tiny = Mat4::scaling(0.004, 0.004, 0.004);
    assert!(tiny.determinant().abs() < f32::EPSILON);

    let inv = tiny.inverse().unwrap();
    assert!((tiny * inv).approx_eq(&Mat4::IDENTITY, EPS));
    assert!((inv.at(0, 0) - 250.0).abs() < 1e-2);

    let normal = Mat4::scaling(0.003, 0.003, 0.003).normal_matrix().unwrap();
    assert!((normal.0[0] - 1.0 / 0.003).abs() < 1e-1);

    let inv = Mat3::scaling(0.001, 0.001).inverse().unwrap();
    assert!((inv.0[0] - 1000.0).abs() < 1e-1);
}

#[test]
fn test_determinant() {
    assert!((Mat4::scaling(2.0, 3.0, 4.0).determinant() - 24.0).abs() < EPS);
    assert!((Mat4::y_rotation(1.3).determinant() - 1.0).abs() < EPS);
    assert!((sample().determinant() - 1.5).abs() < EPS);
}

#[test]
fn test_rotations() {
    let p = Mat4::z_rotation(FRAC_PI_2).transform_point(Vec3::X);
    assert!(p.approx_eq(Vec3::Y, EPS));

    let p = Mat4::x_rotation(FRAC_PI_2).transform_point(Vec3::Y);
    assert!(p.approx_eq(Vec3::Z, EPS));

    let p = Mat4::y_rotation(FRAC_PI_2).transform_point(Vec3::Z);
    assert!(p.approx_eq(Vec3::X, EPS));

    assert!(Mat4::axis_rotation(Vec3::new(0.0, 0.0, 3.0), 0.9)
        .approx_eq(&Mat4::z_rotation(0.9), EPS));
    assert!(Mat4::axis_rotation(Vec3::X, -0.2).approx_eq(&Mat4::x_rotation(-0.2), EPS));
    assert_eq!(Mat4::axis_rotation(Vec3::ZERO, 1.0), Mat4::IDENTITY);
}

#[test]
fn test_transform_point_and_direction() {
    let m = Mat4::translation(1.0, 1.0, 1.0).scale(2.0, 2.0, 2.0);
    assert_eq!(m.transform_point(Vec3::ONE), Vec3::same(3.0));
    assert_eq!(m.transform_direction(Vec3::ONE), Vec3::same(2.0));
    assert_eq!(m * Vec3::ZERO, Vec3::ONE);
}

#[test]
fn test_transform_normal() {
    // Stretching x flattens a 45 degree surface, tipping its normal toward y.
    let m = Mat4::scaling(2.0, 1.0, 1.0);
    let n = m.transform_normal(Vec3::new(1.0, 1.0, 0.0)).unwrap();
    assert!(n.approx_eq(Vec3::new(0.5, 1.0, 0.0), EPS));

    // Mat3::scaling leaves the third axis at 1, matching the block here.
    assert!(m
        .normal_matrix()
        .unwrap()
        .approx_eq(&Mat3::scaling(0.5, 1.0), EPS));
}

#[test]
fn test_orthographic_maps_corners() {
    let m = Mat4::orthographic(0.0, 400.0, 300.0, 0.0, -1.0, 1.0);
    assert!(m
        .transform_point(Vec3::ZERO)
        .approx_eq(Vec3::new(-1.0, 1.0, 0.0), EPS));
    assert!(m
        .transform_point(Vec3::new(400.0, 300.0, 0.0))
        .approx_eq(Vec3::new(1.0, -1.0, 0.0), EPS));
}

#[test]
fn test_projection_maps_pixels() {
    let m = Mat4::projection(400.0, 300.0, 400.0);
    assert!(m
        .transform_point(Vec3::new(400.0, 300.0, 0.0))
        .approx_eq(Vec3::new(1.0, -1.0, 0.0), EPS));

    let (x, y) = Mat3::projection(200.0, 100.0).transform_point((100.0, 50.0));
    assert!(x.abs() < EPS && y.abs() < EPS);
}

#[test]
fn test_perspective_depth_range() {
    let m = Mat4::perspective(PI / 3.0, 1.0, 1.0, 100.0).unwrap();
    let near = m.transform_point(Vec3::new(0.0, 0.0, -1.0));
    let far = m.transform_point(Vec3::new(0.0, 0.0, -100.0));
    assert!((near.z + 1.0).abs() < EPS);
    assert!((far.z - 1.0).abs() < EPS);

    assert!(Mat4::perspective(1.0, 0.0, 1.0, 10.0).is_err());
    assert!(Mat4::perspective(1.0, 1.0, 5.0, 5.0).is_err());
}

#[test]
fn test_frustum_matches_perspective() {
    let fov = 1.2f32;
    let aspect = 1.6;
    let (near, far) = (0.5, 50.0);
    let top = near * (fov / 2.0).tan();
    let right = top * aspect;

    let frustum = Mat4::frustum(-right, right, -top, top, near, far).unwrap();
    let perspective = Mat4::perspective(fov, aspect, near, far).unwrap();
    assert!(frustum.approx_eq(&perspective, EPS));
    assert!(Mat4::frustum(1.0, 1.0, 0.0, 1.0, 1.0, 2.0).is_err());
}

#[test]
fn test_look_at_and_view_are_inverse() {
    let eye = Vec3::new(4.0, 3.0, 10.0);
    let target = Vec3::new(0.0, 1.0, 0.0);

    let camera = Mat4::look_at(eye, target, Vec3::Y).unwrap();
    let view = Mat4::view(eye, target, Vec3::Y).unwrap();

    assert!((view * camera).approx_eq(&Mat4::IDENTITY, EPS));
    assert!(camera.inverse().unwrap().approx_eq(&view, EPS));

    // The target sits straight ahead, down -Z in view space.
    let p = view.transform_point(target);
    assert!(p.x.abs() < EPS && p.y.abs() < EPS && p.z < 0.0);
}

#[test]
fn test_look_at_degenerate() {
    assert!(matches!(
        Mat4::look_at(Vec3::ONE, Vec3::ONE, Vec3::Y),
        Err(Error::Degenerate(_))
    ));
    assert!(matches!(
        Mat4::view(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, Vec3::Y),
        Err(Error::Degenerate(_))
    ));
}

#[test]
fn test_mat3_2d_transforms() {
    let m = Mat3::translation(10.0, 20.0).rotate(FRAC_PI_2).scale(2.0, 2.0);
    let (x, y) = m.transform_point((1.0, 0.0));
    assert!((x - 10.0).abs() < EPS && (y - 22.0).abs() < EPS);

    let inv = m.inverse().unwrap();
    assert!((m * inv).approx_eq(&Mat3::IDENTITY, EPS));
    assert!((m.determinant() - 4.0).abs() < EPS);
}

#[test]
fn test_vector_ops() {
    assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
    assert_eq!(Vec3::new(3.0, 4.0, 0.0).length(), 5.0);
    assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
    assert!(Vec3::new(0.0, 0.0, 9.0).normalize().approx_eq(Vec3::Z, EPS));
    assert_eq!(Vec3::ZERO.lerp(Vec3::same(2.0), 0.5), Vec3::ONE);
    assert_eq!(Vec3::from([1.0, 2.0, 3.0]).arr(), [1.0, 2.0, 3.0]);
}

#[test]
fn test_transform_matrix() {
    let t = Transform::new()
        .at(Vec3::new(1.0, 2.0, 3.0))
        .rotated(Vec3::new(0.0, FRAC_PI_2, 0.0))
        .scaled(Vec3::same(2.0));

    // Scale, then rotate Z onto X, then translate.
    let p = t.matrix().transform_point(Vec3::Z);
    assert!(p.approx_eq(Vec3::new(3.0, 2.0, 3.0), EPS));
    assert_eq!(Transform::default().matrix(), Mat4::IDENTITY);

    let mut t = Transform::IDENTITY;
    t.translate_by(Vec3::X);
    t.translate_by(Vec3::X);
    assert_eq!(t.position, Vec3::new(2.0, 0.0, 0.0));
}

#[test]
fn test_camera_orbit_keeps_distance() {
    let mut camera = Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
    camera.orbit(FRAC_PI_2, 0.0);
    assert!(camera.position.approx_eq(Vec3::new(10.0, 0.0, 0.0), EPS));

    camera.orbit(0.0, PI);
    assert!((camera.distance() - 10.0).abs() < EPS);
    // Pitch stops short of straight up.
    assert!(camera.position.y < 10.0);
    assert!(camera.view_matrix().is_ok());
}

#[test]
fn test_camera_zoom_clamps() {
    let mut camera = Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
    camera.zoom(0.5);
    assert!((camera.distance() - 5.0).abs() < EPS);

    camera.zoom(0.0001);
    assert!((camera.distance() - Camera::MIN_DISTANCE).abs() < EPS);

    camera.zoom(1e9);
    assert!((camera.distance() - Camera::MAX_DISTANCE).abs() < 1.0);
}

#[test]
fn test_camera_pan_moves_target() {
    let mut camera = Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
    camera.pan(2.0, 1.0);
    assert!(camera.target.approx_eq(Vec3::new(2.0, 1.0, 0.0), EPS));
    assert!(camera.position.approx_eq(Vec3::new(2.0, 1.0, 10.0), EPS));
}

#[test]
fn test_camera_view_projection() {
    let camera = Camera::default();
    let vp = camera.view_projection(1.0).unwrap();
    let p = vp.transform_point(camera.target);
    assert!(p.x.abs() < EPS && p.y.abs() < EPS);
    assert!(p.z > -1.0 && p.z < 1.0);
}

fn at(graph: &Graph, id: NodeId) -> Vec3 {
    graph.world(id).unwrap().transform_point(Vec3::ZERO)
}

#[test]
fn test_graph_world_matrices() {
    let mut graph = Graph::new();
    let sun = graph.add(Transform::new().scaled(Vec3::same(5.0)));
    let orbit = graph.add(Transform::new().at(Vec3::new(100.0, 0.0, 0.0)));
    let earth = graph.add_child(orbit, Transform::new().scaled(Vec3::same(2.0))).unwrap();
    let moon = graph
        .add_child(orbit, Transform::new().at(Vec3::new(0.0, 0.0, 30.0)))
        .unwrap();

    graph.update_world_matrices();

    assert_eq!(at(&graph, sun), Vec3::ZERO);
    assert_eq!(at(&graph, earth), Vec3::new(100.0, 0.0, 0.0));
    assert_eq!(at(&graph, moon), Vec3::new(100.0, 0.0, 30.0));

    // Rotating the orbit node carries both children.
    graph.get_mut(orbit).unwrap().local.rotation.y = FRAC_PI_2;
    graph.update_world_matrices();
    assert!(at(&graph, moon).approx_eq(Vec3::new(130.0, 0.0, 0.0), EPS));
    assert_eq!(graph.roots(), vec![sun, orbit]);
}

#[test]
fn test_graph_rejects_cycles() {
    let mut graph = Graph::new();
    let a = graph.add(Transform::IDENTITY);
    let b = graph.add_child(a, Transform::IDENTITY).unwrap();
    let c = graph.add_child(b, Transform::IDENTITY).unwrap();

    assert_eq!(graph.set_parent(a, Some(c)), Err(Error::Cycle));
    assert_eq!(graph.set_parent(a, Some(a)), Err(Error::Cycle));

    graph.set_parent(c, None).unwrap();
    assert!(graph.get(b).unwrap().children().is_empty());
    assert_eq!(graph.get(c).unwrap().parent(), None);
}

#[test]
fn test_graph_unknown_node() {
    let mut graph = Graph::new();
    let a = graph.add(Transform::IDENTITY);
    let mut other = Graph::new();
    other.add(Transform::IDENTITY);
    let stray = other.add(Transform::IDENTITY);

    assert_eq!(graph.set_parent(stray, Some(a)).err(), Some(Error::UnknownNode));
    assert!(graph.add_child(stray, Transform::IDENTITY).is_err());
    assert_eq!(graph.len(), 1);
}

#[test]
fn test_geometry_counts() {
    assert_eq!(Geometry::triangle().vertex_count(), 3);
    assert_eq!(Geometry::f_2d().vertex_count(), 18);

    let f = Geometry::f_3d();
    assert_eq!(f.vertex_count(), 3 * 36);
    assert_eq!(f.normals.len(), f.positions.len());
    assert_eq!(f.colours.len(), f.positions.len());

    let cube = Geometry::cube(2.0);
    assert_eq!(cube.vertex_count(), 36);
    assert_eq!(cube.positions.len(), 24 * 3);
    assert!(cube.indices.unwrap().iter().all(|&i| i < 24));
}

#[test]
fn test_f_3d_winding_matches_normals() {
    let f = Geometry::f_3d();
    let computed = geometry::flat_normals(&f.positions);
    for (a, b) in computed.iter().zip(f.normals.iter()) {
        assert!((a - b).abs() < EPS);
    }
}

#[test]
fn test_sphere() {
    let sphere = Geometry::sphere(3.0, 8, 12).unwrap();
    let vertices = sphere.positions.len() / 3;
    assert_eq!(vertices, 9 * 13);
    assert_eq!(sphere.vertex_count(), 8 * 12 * 6);

    for (p, n) in sphere
        .positions
        .chunks_exact(3)
        .zip(sphere.normals.chunks_exact(3))
    {
        let p = Vec3::new(p[0], p[1], p[2]);
        let n = Vec3::new(n[0], n[1], n[2]);
        assert!((p.length() - 3.0).abs() < EPS);
        assert!((n.length() - 1.0).abs() < EPS);
    }

    assert!(Geometry::sphere(1.0, 1, 12).is_err());
    assert!(Geometry::sphere(1.0, 300, 300).is_err());
}

#[test]
fn test_plane_faces_up() {
    let plane = Geometry::plane(4.0, 2.0);
    let indices = plane.indices.as_ref().unwrap();
    let p = |i: u16| {
        let i = i as usize * 3;
        Vec3::new(plane.positions[i], plane.positions[i + 1], plane.positions[i + 2])
    };
    for tri in indices.chunks_exact(3) {
        let n = (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0]));
        assert!(n.y > 0.0);
    }
}
