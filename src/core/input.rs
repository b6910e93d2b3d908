//! Input system for handling keyboard and mouse input
//!
//! Continuous keys (movement, exposure) are polled every frame from the set of
//! held keys. Toggle keys fire once per physical press and are returned to the
//! caller as an [`InputAction`].

use std::collections::HashSet;

use tracing::{debug, warn};
use winit::event::{ElementState, MouseScrollDelta};
use winit::keyboard::KeyCode;
use winit::window::{CursorGrabMode, Window};

use crate::component::CameraMovement;
use crate::core::state::ProgramState;

/// Exposure change per second while Q/E is held
pub const EXPOSURE_RATE: f32 = 0.5;

/// Scroll pixels that count as one wheel line
const PIXELS_PER_LINE: f32 = 20.0;

/// One-shot actions produced by key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    ToggleOverlay,
    ToggleShadows,
    ToggleBloom,
    Quit,
}

/// Movement bound to a held key
pub fn movement_for_key(key: KeyCode) -> Option<CameraMovement> {
    match key {
        KeyCode::KeyW => Some(CameraMovement::Forward),
        KeyCode::KeyS => Some(CameraMovement::Backward),
        KeyCode::KeyA => Some(CameraMovement::Left),
        KeyCode::KeyD => Some(CameraMovement::Right),
        KeyCode::KeyT => Some(CameraMovement::Up),
        KeyCode::KeyG => Some(CameraMovement::Down),
        KeyCode::KeyF => Some(CameraMovement::TurnLeft),
        KeyCode::KeyH => Some(CameraMovement::TurnRight),
        _ => None,
    }
}

/// One-shot action bound to a key press
pub fn action_for_key(key: KeyCode) -> Option<InputAction> {
    match key {
        KeyCode::F1 => Some(InputAction::ToggleOverlay),
        KeyCode::Space => Some(InputAction::ToggleShadows),
        KeyCode::KeyB => Some(InputAction::ToggleBloom),
        KeyCode::Escape => Some(InputAction::Quit),
        _ => None,
    }
}

/// InputSystem keeps keyboard and mouse state between events
/// and applies it to the program state once per frame
#[derive(Debug, Default)]
pub struct InputSystem {
    pressed_keys: HashSet<KeyCode>,

    // Accumulated since the last update, y up
    mouse_delta: (f32, f32),
    scroll_delta: f32,

    cursor_locked: bool,
}

impl InputSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process keyboard input event
    ///
    /// Returns the bound action on the first press of a toggle key.
    /// Auto-repeat and releases never produce actions.
    pub fn on_keyboard_input(
        &mut self,
        keycode: KeyCode,
        state: ElementState,
        repeat: bool,
    ) -> Option<InputAction> {
        match state {
            ElementState::Pressed => {
                let newly_pressed = self.pressed_keys.insert(keycode);
                if newly_pressed && !repeat {
                    return action_for_key(keycode);
                }
                None
            }
            ElementState::Released => {
                self.pressed_keys.remove(&keycode);
                None
            }
        }
    }

    /// Process raw mouse motion (device delta, y down)
    pub fn on_mouse_motion(&mut self, delta: (f64, f64)) {
        self.mouse_delta.0 += delta.0 as f32;
        // Screen y grows downwards, pitch grows upwards
        self.mouse_delta.1 -= delta.1 as f32;
    }

    /// Process mouse wheel
    pub fn on_mouse_wheel(&mut self, delta: MouseScrollDelta) {
        self.scroll_delta += match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
        };
    }

    /// Apply held keys and accumulated mouse input, called every frame
    pub fn update(&mut self, state: &mut ProgramState, delta_time: f32) {
        for key in &self.pressed_keys {
            if let Some(movement) = movement_for_key(*key) {
                state.camera.process_keyboard(movement, delta_time);
            }
        }

        if self.is_key_pressed(KeyCode::KeyQ) {
            state.adjust_exposure(-EXPOSURE_RATE * delta_time);
        }
        if self.is_key_pressed(KeyCode::KeyE) {
            state.adjust_exposure(EXPOSURE_RATE * delta_time);
        }

        if state.camera_mouse_update_enabled {
            let (dx, dy) = self.mouse_delta;
            if dx.abs() > 0.0 || dy.abs() > 0.0 {
                state.camera.process_mouse_movement(dx, dy, true);
            }
        }

        if self.scroll_delta != 0.0 {
            state.camera.process_mouse_scroll(self.scroll_delta);
        }

        self.mouse_delta = (0.0, 0.0);
        self.scroll_delta = 0.0;
    }

    /// Lock and hide cursor for mouse look
    pub fn lock_cursor(&mut self, window: &Window) {
        if self.cursor_locked {
            return;
        }

        window.set_cursor_visible(false);

        // Confined is more widely supported than Locked
        if let Err(e) = window.set_cursor_grab(CursorGrabMode::Confined) {
            if let Err(e2) = window.set_cursor_grab(CursorGrabMode::Locked) {
                warn!(
                    "Failed to grab cursor (Confined: {}, Locked: {}). Cursor will remain free but mouse look still works.",
                    e, e2
                );
            } else {
                debug!("Cursor grabbed with Locked mode");
                self.cursor_locked = true;
            }
        } else {
            debug!("Cursor grabbed with Confined mode");
            self.cursor_locked = true;
        }
    }

    /// Unlock and show cursor
    pub fn unlock_cursor(&mut self, window: &Window) {
        window.set_cursor_visible(true);
        if !self.cursor_locked {
            return;
        }

        if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
            warn!("Failed to release cursor grab: {}", e);
        } else {
            debug!("Cursor grab released");
        }

        self.cursor_locked = false;
    }

    /// Drop held keys and pending motion (window lost focus)
    pub fn reset(&mut self) {
        self.pressed_keys.clear();
        self.mouse_delta = (0.0, 0.0);
        self.scroll_delta = 0.0;
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    pub fn is_cursor_locked(&self) -> bool {
        self.cursor_locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::InputSettings;
    use crate::core::scene::SceneConfig;
    use crate::math::Vector3;

    fn state() -> ProgramState {
        ProgramState::new(&SceneConfig::default(), &InputSettings::default())
    }

    #[test]
    fn test_toggle_fires_once_per_press() {
        let mut input = InputSystem::new();
        assert_eq!(
            input.on_keyboard_input(KeyCode::F1, ElementState::Pressed, false),
            Some(InputAction::ToggleOverlay)
        );
        assert_eq!(input.on_keyboard_input(KeyCode::F1, ElementState::Pressed, true), None);
        assert_eq!(input.on_keyboard_input(KeyCode::F1, ElementState::Released, false), None);
        assert_eq!(
            input.on_keyboard_input(KeyCode::F1, ElementState::Pressed, false),
            Some(InputAction::ToggleOverlay)
        );
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(action_for_key(KeyCode::Space), Some(InputAction::ToggleShadows));
        assert_eq!(action_for_key(KeyCode::KeyB), Some(InputAction::ToggleBloom));
        assert_eq!(action_for_key(KeyCode::Escape), Some(InputAction::Quit));
        assert_eq!(movement_for_key(KeyCode::KeyT), Some(CameraMovement::Up));
        assert_eq!(movement_for_key(KeyCode::KeyH), Some(CameraMovement::TurnRight));
        assert_eq!(movement_for_key(KeyCode::KeyQ), None);
    }

    #[test]
    fn test_held_key_moves_camera() {
        let mut input = InputSystem::new();
        let mut s = state();
        let speed = s.camera.movement_speed;

        input.on_keyboard_input(KeyCode::KeyW, ElementState::Pressed, false);
        input.update(&mut s, 1.0);
        assert!((s.camera.position() - Vector3::new(0.0, 0.0, 3.0 - speed)).norm() < 1e-5);

        input.on_keyboard_input(KeyCode::KeyW, ElementState::Released, false);
        input.update(&mut s, 1.0);
        assert!((s.camera.position().z - (3.0 - speed)).abs() < 1e-5);
    }

    #[test]
    fn test_exposure_keys() {
        let mut input = InputSystem::new();
        let mut s = state();
        let start = s.exposure;

        input.on_keyboard_input(KeyCode::KeyE, ElementState::Pressed, false);
        input.update(&mut s, 2.0);
        assert!((s.exposure - (start + 2.0 * EXPOSURE_RATE)).abs() < 1e-5);
    }

    #[test]
    fn test_mouse_look_respects_state_flag() {
        let mut input = InputSystem::new();
        let mut s = state();
        let yaw = s.camera.yaw();

        s.camera_mouse_update_enabled = false;
        input.on_mouse_motion((100.0, 0.0));
        input.update(&mut s, 0.016);
        assert_eq!(s.camera.yaw(), yaw);

        s.camera_mouse_update_enabled = true;
        input.on_mouse_motion((10.0, -10.0));
        input.update(&mut s, 0.016);
        assert!(s.camera.yaw() > yaw);
        // 鼠标上移抬头
        assert!(s.camera.pitch() > 0.0);
    }

    #[test]
    fn test_scroll_zooms_and_resets() {
        let mut input = InputSystem::new();
        let mut s = state();
        input.on_mouse_wheel(MouseScrollDelta::LineDelta(0.0, 5.0));
        input.update(&mut s, 0.016);
        assert_eq!(s.camera.zoom(), 40.0);
        input.update(&mut s, 0.016);
        assert_eq!(s.camera.zoom(), 40.0);
    }

    #[test]
    fn test_reset_clears_keys() {
        let mut input = InputSystem::new();
        input.on_keyboard_input(KeyCode::KeyA, ElementState::Pressed, false);
        input.reset();
        assert!(!input.is_key_pressed(KeyCode::KeyA));
    }
}
