use glam::Vec3;

use crate::input::{ControlKey, GamepadAxis, GamepadButton, InputEvent, InputState};
use crate::options::ControlOptions;
use crate::pose::PoseDelta;

use super::{PoseUpdate, TrackingInputAdapter, TrackingSource};

/// Keyboard and gamepad control.
///
/// Every tick, held keys contribute fixed steps (`speed` per axis,
/// `rotation_speed` degrees of yaw) and gamepad axes contribute
/// proportionally.
#[derive(Debug, Clone, Default)]
pub struct ManualInput {
    options: ControlOptions,
    state: InputState,
}

impl ManualInput {
    /// Creates a manual adapter with the given step sizes.
    #[must_use]
    pub fn new(options: ControlOptions) -> Self {
        Self {
            options,
            state: InputState::new(),
        }
    }

    /// Current step sizes.
    #[must_use]
    pub fn options(&self) -> &ControlOptions {
        &self.options
    }

    /// What is currently held.
    #[must_use]
    pub fn state(&self) -> &InputState {
        &self.state
    }

    /// Delta for one tick given what is held right now.
    #[must_use]
    pub fn delta(&self) -> PoseDelta {
        let mut delta = PoseDelta::ZERO;
        if self.options.keyboard {
            self.add_keyboard(&mut delta);
        }
        if self.options.gamepad {
            self.add_gamepad(&mut delta);
        }
        delta
    }

    fn add_keyboard(&self, delta: &mut PoseDelta) {
        let speed = self.options.speed;
        let steps = [
            (ControlKey::Forward, Vec3::new(0.0, 0.0, speed)),
            (ControlKey::Left, Vec3::new(-speed, 0.0, 0.0)),
            (ControlKey::Backward, Vec3::new(0.0, 0.0, -speed)),
            (ControlKey::Right, Vec3::new(speed, 0.0, 0.0)),
            (ControlKey::Up, Vec3::new(0.0, speed, 0.0)),
            (ControlKey::Down, Vec3::new(0.0, -speed, 0.0)),
        ];
        for (key, step) in steps {
            if self.state.is_held(key) {
                delta.translation += step;
            }
        }
        if self.state.is_held(ControlKey::YawRight) {
            delta.yaw_degrees += self.options.rotation_speed;
        }
        if self.state.is_held(ControlKey::YawLeft) {
            delta.yaw_degrees -= self.options.rotation_speed;
        }
    }

    fn add_gamepad(&self, delta: &mut PoseDelta) {
        let speed = self.options.speed;
        delta.translation += Vec3::new(
            self.state.axis(GamepadAxis::LeftStickX) * speed,
            0.0,
            -self.state.axis(GamepadAxis::LeftStickY) * speed,
        );
        delta.yaw_degrees +=
            self.state.axis(GamepadAxis::RightStickX) * self.options.rotation_speed;

        if self.state.is_button_held(GamepadButton::LeftShoulder) {
            delta.translation.y += speed;
        }
        if self.state.is_button_held(GamepadButton::RightShoulder) {
            delta.translation.y -= speed;
        }
    }
}

impl TrackingInputAdapter for ManualInput {
    fn source(&self) -> TrackingSource {
        TrackingSource::None
    }

    fn poll(&mut self) -> Option<PoseUpdate> {
        let delta = self.delta();
        if delta.is_zero() {
            None
        } else {
            Some(PoseUpdate::Relative(delta))
        }
    }

    fn handle_input(&mut self, event: InputEvent) {
        self.state.handle(event);
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn pressed(keys: &[ControlKey]) -> ManualInput {
        let mut input = ManualInput::new(ControlOptions::default());
        for key in keys {
            input.handle_input(InputEvent::KeyPressed(*key));
        }
        input
    }

    #[test]
    fn test_no_keys_zero_delta() {
        let mut input = ManualInput::new(ControlOptions::default());
        assert_eq!(input.delta(), PoseDelta::ZERO);
        assert!(input.poll().is_none());
    }

    #[test]
    fn test_forward_step() {
        let mut input = pressed(&[ControlKey::Forward]);
        let Some(PoseUpdate::Relative(delta)) = input.poll() else {
            panic!("expected a relative update");
        };
        assert!(delta.translation.abs_diff_eq(Vec3::new(0.0, 0.0, 0.02), 1e-7));
        assert!(delta.yaw_degrees.abs() < f32::EPSILON);
    }

    #[test]
    fn test_all_six_directions() {
        let input = pressed(&[ControlKey::Right, ControlKey::Up, ControlKey::Backward]);
        assert!(input
            .delta()
            .translation
            .abs_diff_eq(Vec3::new(0.02, 0.02, -0.02), 1e-7));

        let input = pressed(&[ControlKey::Left, ControlKey::Down]);
        assert!(input
            .delta()
            .translation
            .abs_diff_eq(Vec3::new(-0.02, -0.02, 0.0), 1e-7));
    }

    #[test]
    fn test_yaw_keys() {
        let input = pressed(&[ControlKey::YawRight]);
        assert!((input.delta().yaw_degrees - 1.0).abs() < f32::EPSILON);
        let input = pressed(&[ControlKey::YawLeft]);
        assert!((input.delta().yaw_degrees + 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut input = pressed(&[
            ControlKey::Forward,
            ControlKey::Backward,
            ControlKey::YawLeft,
            ControlKey::YawRight,
        ]);
        assert!(input.poll().is_none());
    }

    #[test]
    fn test_gamepad() {
        let mut input = ManualInput::new(ControlOptions::default());
        input.handle_input(InputEvent::AxisMoved(GamepadAxis::LeftStickY, -1.0));
        input.handle_input(InputEvent::AxisMoved(GamepadAxis::RightStickX, 0.5));
        input.handle_input(InputEvent::ButtonPressed(GamepadButton::LeftShoulder));
        let delta = input.delta();
        assert!(delta
            .translation
            .abs_diff_eq(Vec3::new(0.0, 0.02, 0.02), 1e-7));
        assert!((delta.yaw_degrees - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_disabled_devices() {
        let options = ControlOptions {
            keyboard: false,
            gamepad: false,
            ..Default::default()
        };
        let mut input = ManualInput::new(options);
        input.handle_input(InputEvent::KeyPressed(ControlKey::Forward));
        input.handle_input(InputEvent::ButtonPressed(GamepadButton::RightShoulder));
        assert!(input.poll().is_none());
    }

    fn any_key() -> impl Strategy<Value = ControlKey> {
        prop_oneof![
            Just(ControlKey::Forward),
            Just(ControlKey::Backward),
            Just(ControlKey::Left),
            Just(ControlKey::Right),
            Just(ControlKey::Up),
            Just(ControlKey::Down),
            Just(ControlKey::YawRight),
            Just(ControlKey::YawLeft),
        ]
    }

    proptest! {
        #[test]
        fn prop_released_keys_give_zero_delta(keys in proptest::collection::vec(any_key(), 0..16)) {
            let mut input = ManualInput::new(ControlOptions::default());
            for key in &keys {
                input.handle_input(InputEvent::KeyPressed(*key));
            }
            for key in &keys {
                input.handle_input(InputEvent::KeyReleased(*key));
            }
            prop_assert_eq!(input.delta(), PoseDelta::ZERO);
        }
    }
}
