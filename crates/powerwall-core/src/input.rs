//! Discrete and analog input events for manual rig control.

use std::collections::HashSet;

/// Keyboard keys that move the rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKey {
    /// W: forward (+Z).
    Forward,
    /// S: backward (-Z).
    Backward,
    /// A: left (-X).
    Left,
    /// D: right (+X).
    Right,
    /// R: up (+Y).
    Up,
    /// F: down (-Y).
    Down,
    /// E: turn right.
    YawRight,
    /// Q: turn left.
    YawLeft,
}

impl ControlKey {
    /// Maps a character to its control key, case-insensitively.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'w' => Some(ControlKey::Forward),
            's' => Some(ControlKey::Backward),
            'a' => Some(ControlKey::Left),
            'd' => Some(ControlKey::Right),
            'r' => Some(ControlKey::Up),
            'f' => Some(ControlKey::Down),
            'e' => Some(ControlKey::YawRight),
            'q' => Some(ControlKey::YawLeft),
            _ => None,
        }
    }
}

/// Gamepad buttons that move the rig vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadButton {
    /// Left shoulder (button 4): up.
    LeftShoulder,
    /// Right shoulder (button 5): down.
    RightShoulder,
}

/// Gamepad axes, each in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadAxis {
    /// Left stick horizontal: strafe.
    LeftStickX,
    /// Left stick vertical, positive down: forward/backward.
    LeftStickY,
    /// Right stick horizontal: turn.
    RightStickX,
}

/// An input event delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A key went down.
    KeyPressed(ControlKey),
    /// A key went up.
    KeyReleased(ControlKey),
    /// A gamepad button went down.
    ButtonPressed(GamepadButton),
    /// A gamepad button went up.
    ButtonReleased(GamepadButton),
    /// A gamepad axis moved.
    AxisMoved(GamepadAxis, f32),
    /// Focus was lost; everything is released.
    ReleaseAll,
}

/// What is currently held down.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    keys: HashSet<ControlKey>,
    buttons: HashSet<GamepadButton>,
    left_stick: (f32, f32),
    right_stick_x: f32,
}

impl InputState {
    /// Creates an empty input state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event.
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyPressed(key) => {
                self.keys.insert(key);
            }
            InputEvent::KeyReleased(key) => {
                self.keys.remove(&key);
            }
            InputEvent::ButtonPressed(button) => {
                self.buttons.insert(button);
            }
            InputEvent::ButtonReleased(button) => {
                self.buttons.remove(&button);
            }
            InputEvent::AxisMoved(axis, value) => {
                let value = if value.is_finite() {
                    value.clamp(-1.0, 1.0)
                } else {
                    0.0
                };
                match axis {
                    GamepadAxis::LeftStickX => self.left_stick.0 = value,
                    GamepadAxis::LeftStickY => self.left_stick.1 = value,
                    GamepadAxis::RightStickX => self.right_stick_x = value,
                }
            }
            InputEvent::ReleaseAll => *self = Self::default(),
        }
    }

    /// Returns whether `key` is held.
    #[must_use]
    pub fn is_held(&self, key: ControlKey) -> bool {
        self.keys.contains(&key)
    }

    /// Returns whether `button` is held.
    #[must_use]
    pub fn is_button_held(&self, button: GamepadButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Current value of a gamepad axis.
    #[must_use]
    pub fn axis(&self, axis: GamepadAxis) -> f32 {
        match axis {
            GamepadAxis::LeftStickX => self.left_stick.0,
            GamepadAxis::LeftStickY => self.left_stick.1,
            GamepadAxis::RightStickX => self.right_stick_x,
        }
    }

    /// Returns true if no key or button is held and all axes are centered.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.keys.is_empty()
            && self.buttons.is_empty()
            && self.left_stick == (0.0, 0.0)
            && self.right_stick_x == 0.0
    }
}
