use math::{Camera, Vec3};

use super::control::{wheel_factor, OrbitControl};
use super::directional::DirectionalOptions;
use super::look_at::ring_positions;
use super::perspective::PerspectiveOptions;
use super::point_light::PointLightOptions;
use super::points::{points, PointsOptions};
use super::solar_system::{SolarOptions, SolarSystem, EARTH_ORBIT_RADIUS, MOON_ORBIT_RADIUS};
use super::transform_2d::Transform2dOptions;
use super::{is_3d, is_known, merge_options, to_json, DEFAULT, NAMES};
use crate::bridge::event::{
    CanvasPoint, Input, InputEvent, Key, KeyboardAction, MouseAction, MouseButton,
};

const EPS: f32 = 1e-3;

fn mouse(x: i32, y: i32, action: MouseAction) -> InputEvent {
    InputEvent::new(Input::Mouse(
        CanvasPoint::new(x, y),
        action,
        MouseButton::Left,
    ))
}

fn key(key: Key) -> InputEvent {
    InputEvent::new(Input::Keyboard(KeyboardAction::Down, key))
}

#[test]
fn test_lesson_names() {
    assert!(is_known(DEFAULT));
    assert!(is_known("solar_system"));
    assert!(!is_known("teapot"));

    for (i, name) in NAMES.iter().enumerate() {
        assert!(!NAMES[i + 1..].contains(name), "{name} listed twice");
    }
}

#[test]
fn test_depth_state() {
    for name in ["points", "triangle", "transform_2d"] {
        assert!(!is_3d(name), "{name}");
    }
    for name in &NAMES[3..] {
        assert!(is_3d(name), "{name}");
    }
    assert!(!is_3d("teapot"));
}

#[test]
fn test_merge_options_partial() {
    let current = PointsOptions::default();
    let merged = merge_options(&current, r#"{"point_size": 20}"#).unwrap();
    assert_eq!(merged.point_size, 20.0);
    assert_eq!(merged.count, current.count);
}

#[test]
fn test_merge_options_rejects() {
    let current = PointsOptions::default();
    assert!(merge_options(&current, r#"{"size": 20}"#).is_err());
    assert!(merge_options(&current, "[1, 2]").is_err());
    assert!(merge_options(&current, "{point_size: 1").is_err());
    assert!(merge_options(&current, r#"{"point_size": "big"}"#).is_err());
}

#[test]
fn test_merge_options_rejects_overflow() {
    let current = PerspectiveOptions::default();
    assert!(merge_options(&current, r#"{"speed": 1e39}"#).is_err());
    assert!(merge_options(&current, r#"{"rotation": [0, -1e40, 0]}"#).is_err());

    // Later updates still apply to the untouched options.
    let merged = merge_options(&current, r#"{"spin": false}"#).unwrap();
    assert!(!merged.spin);
    assert_eq!(merged.speed, current.speed);
}

#[test]
fn test_options_json() {
    let options = Transform2dOptions::default();
    let json = to_json(&options);
    assert_eq!(merge_options(&options, &json).unwrap(), options);
    assert!(json.contains("\"translation\""));
}

#[test]
fn test_points() {
    let geometry = points();
    assert_eq!(geometry.vertex_count(), 5);
    assert_eq!(geometry.colours.len(), 15);

    let options = PointsOptions {
        point_size: 0.0,
        count: 40,
    }
    .clamped();
    assert_eq!(options.point_size, 1.0);
    assert_eq!(options.count, 5);

    let current = PointsOptions::default();
    let options = merge_options(&current, r#"{"count": 300}"#).unwrap().clamped();
    assert_eq!(options.count, 5);
    let options = merge_options(&current, r#"{"count": -1}"#).unwrap().clamped();
    assert_eq!(options.count, 0);
}

#[test]
fn test_transform_2d_matrix() {
    let mut options = Transform2dOptions {
        translation: [60.0, 40.0],
        ..Default::default()
    };

    // The centre of the F lands on the translation, whatever the angle.
    for angle in [0.0, 90.0, 210.0] {
        options.angle = angle;
        let (x, y) = options.matrix(200.0, 200.0).transform_point((50.0, 75.0));
        assert!((x + 0.4).abs() < EPS, "{angle}: {x}");
        assert!((y - 0.6).abs() < EPS, "{angle}: {y}");
    }
}

#[test]
fn test_transform_2d_keys() {
    let mut options = Transform2dOptions::default();
    let [x, y] = options.translation;

    options.apply_key(Key::Up);
    options.apply_key(Key::Right);
    assert_eq!(options.translation, [x + 10.0, y - 10.0]);

    options.apply_key(Key::Minus);
    assert_eq!(options.angle, 355.0);
    options.apply_key(Key::Plus);
    options.apply_key(Key::Plus);
    assert_eq!(options.angle, 5.0);
}

#[test]
fn test_perspective_options() {
    let mut options = PerspectiveOptions {
        rotation: [0.0, 350.0, 0.0],
        speed: 20.0,
        ..Default::default()
    };
    options.advance(1.0);
    assert!((options.rotation[1] - 10.0).abs() < EPS);

    options.spin = false;
    options.advance(1.0);
    assert!((options.rotation[1] - 10.0).abs() < EPS);

    assert!(options.matrix(1.5).is_ok());
    options.fov_degrees = 0.0;
    assert!(options.matrix(1.5).is_err());
}

#[test]
fn test_ring_positions() {
    let ring = ring_positions(4, 10.0);
    assert_eq!(ring.len(), 4);
    assert!(ring[0].approx_eq(Vec3::new(10.0, 0.0, 0.0), EPS));
    assert!(ring[1].approx_eq(Vec3::new(0.0, 0.0, 10.0), EPS));
    for p in &ring {
        assert!((p.length() - 10.0).abs() < EPS);
    }

    assert!(ring_positions(0, 10.0).is_empty());
}

#[test]
fn test_light_options() {
    let options = DirectionalOptions {
        light_direction: [0.0, 0.0, 2.0],
        ..Default::default()
    };
    assert!(options.light().unwrap().approx_eq(Vec3::Z, EPS));

    let options = DirectionalOptions {
        light_direction: [0.0; 3],
        ..Default::default()
    };
    assert!(options.light().is_err());

    let options = PointLightOptions {
        shininess: 0.0,
        ambient: 2.0,
        ..Default::default()
    }
    .clamped();
    assert_eq!(options.shininess, PointLightOptions::MIN_SHININESS);
    assert_eq!(options.ambient, 1.0);
}

#[test]
fn test_orbit_drag() {
    let camera = Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
    let mut control = OrbitControl::new(camera);

    // Moving without a button held does nothing.
    assert!(!control.handle(&mouse(50, 0, MouseAction::Move)));

    assert!(control.handle(&mouse(0, 0, MouseAction::Down)));
    assert!(control.is_dragging());
    assert!(control.handle(&mouse(50, 0, MouseAction::Move)));
    assert!(control.handle(&mouse(50, 0, MouseAction::Up)));
    assert!(!control.is_dragging());

    assert!(!control.camera.position.approx_eq(camera.position, EPS));
    assert!((control.camera.distance() - 10.0).abs() < EPS);
}

#[test]
fn test_orbit_zoom_and_reset() {
    let camera = Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
    let mut control = OrbitControl::new(camera);

    control.handle(&mouse(0, 0, MouseAction::Wheel(100.0)));
    assert!(control.camera.distance() > 10.0);

    control.handle(&key(Key::Plus));
    control.handle(&key(Key::Plus));
    control.handle(&key(Key::Left));
    assert!(control.camera.distance() < 11.0);

    assert!(control.handle(&key(Key::R)));
    assert_eq!(control.camera, camera);

    assert!(!control.handle(&key(Key::Space)));
}

#[test]
fn test_wheel_factor() {
    assert_eq!(wheel_factor(0.0), 1.0);
    assert!(wheel_factor(100.0) > 1.0);
    assert!(wheel_factor(-100.0) < 1.0);
    assert_eq!(wheel_factor(1e6), 2.0);
}

#[test]
fn test_solar_system_distances() {
    let mut system = SolarSystem::new().unwrap();
    assert!(system
        .position(system.earth)
        .unwrap()
        .approx_eq(Vec3::new(EARTH_ORBIT_RADIUS, 0.0, 0.0), EPS));

    for _ in 0..10 {
        system.advance(0.37).unwrap();

        let sun = system.position(system.sun).unwrap();
        let earth = system.position(system.earth).unwrap();
        let moon = system.position(system.moon).unwrap();
        assert!((sun.distance(earth) - EARTH_ORBIT_RADIUS).abs() < EPS);
        assert!((earth.distance(moon) - MOON_ORBIT_RADIUS).abs() < EPS);
        assert!(earth.y.abs() < EPS && moon.y.abs() < EPS);
    }

    assert!(!system
        .position(system.earth)
        .unwrap()
        .approx_eq(Vec3::new(EARTH_ORBIT_RADIUS, 0.0, 0.0), EPS));
}

#[test]
fn test_solar_system_pause() {
    let mut system = SolarSystem::new().unwrap();
    assert!(system.handle_key(Key::Space));
    assert!(system.options.paused);

    let before = system.position(system.moon).unwrap();
    system.advance(1.0).unwrap();
    assert_eq!(system.position(system.moon).unwrap(), before);

    assert!(system.handle_key(Key::Plus));
    assert!(system.options.speed > 1.0);
    assert!(!system.handle_key(Key::W));
}

#[test]
fn test_solar_system_speed_recovers_from_zero() {
    let mut system = SolarSystem::new().unwrap();
    system.options = SolarOptions {
        speed: -3.0,
        ..Default::default()
    }
    .clamped();
    assert_eq!(system.options.speed, 0.0);

    system.handle_key(Key::Plus);
    assert!(system.options.speed > 0.0);
    system.handle_key(Key::Plus);
    assert!(system.options.speed > 0.05);
}
