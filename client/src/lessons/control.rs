use math::{radians, Camera};

use crate::bridge::event::{CanvasPoint, Input, InputEvent, Key, MouseAction, MouseButton};

/// Mouse and keyboard control of a camera orbiting its target. Dragging
/// with the left button orbits, the wheel zooms, arrows or WASD orbit in
/// steps, plus and minus zoom and R puts the camera back where it started.
pub struct OrbitControl {
    pub camera: Camera,
    home: Camera,
    drag: Option<CanvasPoint>,
}

impl OrbitControl {
    // Radians per pixel dragged.
    const DRAG_SPEED: f32 = 0.01;
    const KEY_STEP_DEGREES: f32 = 5.0;
    const ZOOM_STEP: f32 = 1.1;

    pub fn new(camera: Camera) -> Self {
        OrbitControl {
            camera,
            home: camera,
            drag: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn reset(&mut self) {
        self.camera = self.home;
        self.drag = None;
    }

    /// Returns true if the event was used.
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        match event.input {
            Input::Mouse(at, action, button) => self.handle_mouse(at, action, button),
            Input::Keyboard(..) => match event.key_down() {
                Some(key) => self.handle_key(key),
                None => false,
            },
        }
    }

    fn handle_mouse(&mut self, at: CanvasPoint, action: MouseAction, button: MouseButton) -> bool {
        match action {
            MouseAction::Down if button == MouseButton::Left => {
                self.drag = Some(at);
                true
            }
            MouseAction::Move => match self.drag {
                Some(from) => {
                    // Dragging right swings the camera left around the target.
                    self.camera.orbit(
                        -(at.x - from.x) * Self::DRAG_SPEED,
                        (at.y - from.y) * Self::DRAG_SPEED,
                    );
                    self.drag = Some(at);
                    true
                }
                None => false,
            },
            MouseAction::Up | MouseAction::Leave => self.drag.take().is_some(),
            MouseAction::Wheel(delta) => {
                self.camera.zoom(wheel_factor(delta));
                true
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, key: Key) -> bool {
        let step = radians(Self::KEY_STEP_DEGREES);
        if let Some((dx, dy)) = key.direction() {
            self.camera.orbit(dx * step, dy * step);
            return true;
        }

        match key {
            Key::Plus => self.camera.zoom(1.0 / Self::ZOOM_STEP),
            Key::Minus => self.camera.zoom(Self::ZOOM_STEP),
            Key::R => self.reset(),
            _ => return false,
        }
        true
    }
}

/// Distance scale for a wheel movement. Scrolling down (positive) moves
/// away from the target.
pub fn wheel_factor(delta: f32) -> f32 {
    (1.0 + delta * 0.001).clamp(0.5, 2.0)
}
