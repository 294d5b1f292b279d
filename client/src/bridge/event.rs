use wasm_bindgen::JsCast;

/// Position relative to the top left of the canvas, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasPoint {
    pub x: f32,
    pub y: f32,
}

impl CanvasPoint {
    pub fn new(x: i32, y: i32) -> Self {
        CanvasPoint {
            x: x as f32,
            y: y as f32,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MouseAction {
    Down,
    Up,
    Leave,
    Move,
    Wheel(f32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Unknown,
}

impl MouseButton {
    fn from(button: i16) -> Self {
        // Reference:
        // https://developer.mozilla.org/en-US/docs/Web/API/MouseEvent/button
        match button {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            _ => MouseButton::Unknown,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyboardAction {
    Down,
    Up,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Key {
    Down,
    Left,
    Minus,
    Plus,
    Right,
    Space,
    Up,
    A,
    D,
    R,
    S,
    W,
    Unknown,
}

impl Key {
    fn from(key: &str) -> Self {
        match key {
            "ArrowDown" => Self::Down,
            "ArrowLeft" => Self::Left,
            "ArrowRight" => Self::Right,
            "ArrowUp" => Self::Up,
            "-" | "_" => Self::Minus,
            "+" | "=" => Self::Plus,
            " " => Self::Space,
            "a" | "A" => Self::A,
            "d" | "D" => Self::D,
            "r" | "R" => Self::R,
            "s" | "S" => Self::S,
            "w" | "W" => Self::W,
            _ => Self::Unknown,
        }
    }

    /// Direction of an arrow or WASD key as (x, y), y up.
    pub fn direction(&self) -> Option<(f32, f32)> {
        match self {
            Key::Left | Key::A => Some((-1.0, 0.0)),
            Key::Right | Key::D => Some((1.0, 0.0)),
            Key::Up | Key::W => Some((0.0, 1.0)),
            Key::Down | Key::S => Some((0.0, -1.0)),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Input {
    Mouse(CanvasPoint, MouseAction, MouseButton),
    Keyboard(KeyboardAction, Key),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputEvent {
    pub input: Input,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl InputEvent {
    pub fn new(input: Input) -> Self {
        InputEvent {
            input,
            shift: false,
            ctrl: false,
            alt: false,
        }
    }

    pub fn from_web_sys(event: &web_sys::UiEvent) -> Option<InputEvent> {
        match event.type_().as_str() {
            "keydown" | "keyup" => {
                Self::from_keyboard(event.unchecked_ref::<web_sys::KeyboardEvent>())
            }
            "mousedown" | "mouseleave" | "mousemove" | "mouseup" | "wheel" => {
                Self::from_mouse(event.unchecked_ref::<web_sys::MouseEvent>())
            }
            _ => None,
        }
    }

    fn from_mouse(event: &web_sys::MouseEvent) -> Option<InputEvent> {
        let action = match event.type_().as_str() {
            "mousedown" => MouseAction::Down,
            "mouseleave" => MouseAction::Leave,
            "mousemove" => MouseAction::Move,
            "mouseup" => MouseAction::Up,
            "wheel" => {
                let event = event.unchecked_ref::<web_sys::WheelEvent>();
                MouseAction::Wheel(event.delta_y() as f32)
            }
            _ => return None,
        };

        Some(InputEvent {
            input: Input::Mouse(
                CanvasPoint::new(event.offset_x(), event.offset_y()),
                action,
                MouseButton::from(event.button()),
            ),
            shift: event.shift_key(),
            ctrl: event.ctrl_key(),
            alt: event.alt_key(),
        })
    }

    fn from_keyboard(event: &web_sys::KeyboardEvent) -> Option<InputEvent> {
        let action = match event.type_().as_str() {
            "keydown" => KeyboardAction::Down,
            "keyup" => KeyboardAction::Up,
            _ => return None,
        };

        Some(InputEvent {
            input: Input::Keyboard(action, Key::from(&event.key())),
            shift: event.shift_key(),
            ctrl: event.ctrl_key(),
            alt: event.alt_key(),
        })
    }

    /// The key, if this is a key press.
    pub fn key_down(&self) -> Option<Key> {
        match self.input {
            Input::Keyboard(KeyboardAction::Down, key) => Some(key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::from("ArrowLeft"), Key::Left);
        assert_eq!(Key::from("W"), Key::W);
        assert_eq!(Key::from("="), Key::Plus);
        assert_eq!(Key::from(" "), Key::Space);
        assert_eq!(Key::from("F13"), Key::Unknown);
    }

    #[test]
    fn test_key_direction() {
        assert_eq!(Key::A.direction(), Key::Left.direction());
        assert_eq!(Key::W.direction(), Some((0.0, 1.0)));
        assert_eq!(Key::Space.direction(), None);
    }

    #[test]
    fn test_mouse_button() {
        assert_eq!(MouseButton::from(0), MouseButton::Left);
        assert_eq!(MouseButton::from(2), MouseButton::Right);
        assert_eq!(MouseButton::from(4), MouseButton::Unknown);
    }

    #[test]
    fn test_key_down() {
        let down = InputEvent::new(Input::Keyboard(KeyboardAction::Down, Key::R));
        let up = InputEvent::new(Input::Keyboard(KeyboardAction::Up, Key::R));
        assert_eq!(down.key_down(), Some(Key::R));
        assert_eq!(up.key_down(), None);
    }
}
