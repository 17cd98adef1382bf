//! Handle keyboard input events.

use hashbrown::HashMap;
pub use winit::keyboard::KeyCode;
use winit::{
    event::{ElementState, WindowEvent},
    keyboard::PhysicalKey,
};

/// Any button state.
#[derive(Debug, Default, Clone, Copy)]
struct ButtonState {
    /// Whether the button is being held down this frame.
    is_down: bool,
    /// Whether the button was being held down the previous frame.
    was_down_previous_frame: bool,
}

impl ButtonState {
    /// Create a new state.
    const fn new(is_down: bool) -> Self {
        let was_down_previous_frame = false;

        Self {
            is_down,
            was_down_previous_frame,
        }
    }

    /// Handle the state if the button is currently pressed.
    fn handle_event(&mut self, pressed: bool) {
        self.is_down = pressed;
    }

    /// Handle the state changes using the frame to respond to changes.
    fn update(&mut self) {
        self.was_down_previous_frame = self.is_down;
    }

    /// Whether the button is being pressed now.
    const fn held(&self) -> bool {
        self.is_down
    }

    /// Whether the button goes from released to pressed.
    const fn pressed(&self) -> bool {
        !self.was_down_previous_frame && self.is_down
    }

    /// Whether the button goes from pressed to released.
    const fn released(&self) -> bool {
        self.was_down_previous_frame && !self.is_down
    }
}

/// Manager for handling keyboard events.
///
/// Pressed and released states are relative to the previous call of [`Input::update`].
#[derive(Debug, Default)]
pub struct Input {
    /// All keyboard buttons seen so far.
    keys: HashMap<KeyCode, ButtonState>,
}

impl Input {
    /// Setup the input.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a winit window event.
    ///
    /// Events unrelated to the keyboard are ignored.
    #[inline]
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    self.handle_key(keycode, event.state == ElementState::Pressed);
                }
            }
            // Releasing a key while another window has focus is never reported
            WindowEvent::Focused(false) => self.release_all(),
            _ => (),
        }
    }

    /// Set the state of a single key.
    #[inline]
    pub fn handle_key(&mut self, keycode: KeyCode, is_down: bool) {
        if let Some(state) = self.keys.get_mut(&keycode) {
            // Key already registered, update the state
            state.handle_event(is_down);
        } else {
            // Key not found, register it
            self.keys.insert(keycode, ButtonState::new(is_down));
        }
    }

    /// Mark every key as released.
    #[inline]
    pub fn release_all(&mut self) {
        self.keys
            .values_mut()
            .for_each(|state| state.handle_event(false));
    }

    /// Update all registered keys.
    ///
    /// Must be called once per frame after all input has been consumed.
    #[inline]
    pub fn update(&mut self) {
        self.keys.values_mut().for_each(ButtonState::update);
    }

    /// Check the key pressed state for a keyboard button.
    #[inline]
    #[must_use]
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys.get(&key).is_some_and(ButtonState::pressed)
    }

    /// Check the key released state for a keyboard button.
    #[inline]
    #[must_use]
    pub fn key_released(&self, key: KeyCode) -> bool {
        self.keys.get(&key).is_some_and(ButtonState::released)
    }

    /// Check the key held state for a keyboard button.
    #[inline]
    #[must_use]
    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys.get(&key).is_some_and(ButtonState::held)
    }

    /// Whether the fullscreen hotkey is pressed this frame.
    ///
    /// Either `F11`, or `Enter` while any `Alt` key is held.
    #[inline]
    #[must_use]
    pub fn fullscreen_toggle_requested(&self) -> bool {
        let alt_held = self.key_held(KeyCode::AltLeft) || self.key_held(KeyCode::AltRight);

        self.key_pressed(KeyCode::F11) || (alt_held && self.key_pressed(KeyCode::Enter))
    }
}

#[cfg(test)]
mod tests {
    use super::{Input, KeyCode};

    #[test]
    fn pressed_only_on_first_frame() {
        let mut input = Input::new();

        input.handle_key(KeyCode::Space, true);
        assert!(input.key_pressed(KeyCode::Space));
        assert!(input.key_held(KeyCode::Space));

        input.update();
        assert!(!input.key_pressed(KeyCode::Space));
        assert!(input.key_held(KeyCode::Space));

        input.handle_key(KeyCode::Space, false);
        assert!(input.key_released(KeyCode::Space));

        input.update();
        assert!(!input.key_released(KeyCode::Space));
    }

    #[test]
    fn unknown_keys_are_up() {
        let input = Input::new();

        assert!(!input.key_pressed(KeyCode::KeyA));
        assert!(!input.key_held(KeyCode::KeyA));
        assert!(!input.key_released(KeyCode::KeyA));
    }

    #[test]
    fn fullscreen_hotkeys() {
        let mut input = Input::new();
        input.handle_key(KeyCode::F11, true);
        assert!(input.fullscreen_toggle_requested());

        let mut input = Input::new();
        input.handle_key(KeyCode::AltRight, true);
        input.update();
        input.handle_key(KeyCode::Enter, true);
        assert!(input.fullscreen_toggle_requested());

        // Holding the combination doesn't repeat the toggle
        input.update();
        assert!(!input.fullscreen_toggle_requested());
    }

    #[test]
    fn enter_without_alt_is_ignored() {
        let mut input = Input::new();
        input.handle_key(KeyCode::Enter, true);

        assert!(!input.fullscreen_toggle_requested());
    }

    #[test]
    fn release_all_clears_held_keys() {
        let mut input = Input::new();
        input.handle_key(KeyCode::AltLeft, true);
        input.update();

        input.release_all();
        input.handle_key(KeyCode::Enter, true);
        assert!(!input.key_held(KeyCode::AltLeft));
        assert!(!input.fullscreen_toggle_requested());
    }
}
