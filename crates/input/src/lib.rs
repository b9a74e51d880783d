//! Keyboard input mapped onto the driving game's logical controls.
//!
//! Gameplay never looks at physical keys. It asks a [`ControlSource`] whether
//! a [`Control`] is held or was just pressed; [`InputState`] answers from
//! winit keyboard events through a set of [`KeyBindings`], and [`ControlSet`]
//! answers from a script (autopilot, tests).

use std::collections::{HashMap, HashSet};

/// Logical controls the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    SteerLeft,
    SteerRight,
    Accelerate,
    Brake,
    Reset,
    ToggleMute,
    ToggleCamera,
}

impl Control {
    pub const ALL: [Control; 7] = [
        Control::SteerLeft,
        Control::SteerRight,
        Control::Accelerate,
        Control::Brake,
        Control::Reset,
        Control::ToggleMute,
        Control::ToggleCamera,
    ];
}

/// Read-only view of the current control state for one frame.
pub trait ControlSource {
    /// Control is currently held down.
    fn is_held(&self, control: Control) -> bool;

    /// Control went down this frame (edge, not level).
    fn was_pressed(&self, control: Control) -> bool;
}

/// Which physical keys drive which control.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<Control, Vec<KeyCode>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = HashMap::new();
        bindings.insert(Control::SteerLeft, vec![KeyCode::KeyA, KeyCode::ArrowLeft]);
        bindings.insert(Control::SteerRight, vec![KeyCode::KeyD, KeyCode::ArrowRight]);
        bindings.insert(Control::Accelerate, vec![KeyCode::KeyW, KeyCode::ArrowUp]);
        bindings.insert(Control::Brake, vec![KeyCode::KeyS, KeyCode::ArrowDown]);
        bindings.insert(Control::Reset, vec![KeyCode::KeyR]);
        bindings.insert(Control::ToggleMute, vec![KeyCode::KeyM]);
        bindings.insert(Control::ToggleCamera, vec![KeyCode::KeyC]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Keys bound to a control.
    pub fn keys(&self, control: Control) -> &[KeyCode] {
        self.bindings.get(&control).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace the keys bound to a control.
    pub fn rebind(&mut self, control: Control, keys: Vec<KeyCode>) {
        log::debug!("Rebinding {:?} to {:?}", control, keys);
        self.bindings.insert(control, keys);
    }
}

/// Manages keyboard state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,
    /// Keys released this frame.
    keys_released: HashSet<KeyCode>,
    bindings: KeyBindings,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bindings(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            ..Self::default()
        }
    }

    /// Clear per-frame state. Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                // Key repeat delivers Pressed again while held; only the first counts.
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
                self.keys_released.insert(key);
            }
        }
    }

    /// Drop all held keys (window lost focus).
    pub fn release_all(&mut self) {
        self.keys_released.extend(self.keys_held.drain());
    }

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key was released this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }
}

impl ControlSource for InputState {
    fn is_held(&self, control: Control) -> bool {
        self.bindings.keys(control).iter().any(|k| self.is_key_held(*k))
    }

    fn was_pressed(&self, control: Control) -> bool {
        self.bindings.keys(control).iter().any(|k| self.is_key_pressed(*k))
    }
}

/// Scripted control state, driven directly by code instead of a keyboard.
#[derive(Debug, Clone, Default)]
pub struct ControlSet {
    held: HashSet<Control>,
    pressed: HashSet<Control>,
}

impl ControlSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: control held for the frame.
    pub fn holding(mut self, control: Control) -> Self {
        self.hold(control);
        self
    }

    /// Builder: control tapped this frame.
    pub fn tapping(mut self, control: Control) -> Self {
        self.tap(control);
        self
    }

    pub fn hold(&mut self, control: Control) {
        self.held.insert(control);
    }

    pub fn release(&mut self, control: Control) {
        self.held.remove(&control);
    }

    /// Press-and-hold for one frame; clears on the next `begin_frame`.
    pub fn tap(&mut self, control: Control) {
        self.pressed.insert(control);
        self.held.insert(control);
    }

    /// Clear per-frame presses (taps also release).
    pub fn begin_frame(&mut self) {
        for control in self.pressed.drain() {
            self.held.remove(&control);
        }
    }
}

impl ControlSource for ControlSet {
    fn is_held(&self, control: Control) -> bool {
        self.held.contains(&control)
    }

    fn was_pressed(&self, control: Control) -> bool {
        self.pressed.contains(&control)
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_and_letter_keys_drive_same_control() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::ArrowUp, ElementState::Pressed);
        assert!(input.is_held(Control::Accelerate));
        input.process_keyboard(KeyCode::ArrowUp, ElementState::Released);
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        assert!(input.is_held(Control::Accelerate));
        assert!(!input.is_held(Control::Brake));
    }

    #[test]
    fn key_repeat_is_not_a_new_press() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyM, ElementState::Pressed);
        assert!(input.was_pressed(Control::ToggleMute));
        input.begin_frame();
        input.process_keyboard(KeyCode::KeyM, ElementState::Pressed);
        assert!(!input.was_pressed(Control::ToggleMute));
        assert!(input.is_held(Control::ToggleMute));
    }

    #[test]
    fn rebinding_replaces_keys() {
        let mut bindings = KeyBindings::default();
        bindings.rebind(Control::Reset, vec![KeyCode::Backspace]);
        let mut input = InputState::with_bindings(bindings);
        input.process_keyboard(KeyCode::KeyR, ElementState::Pressed);
        assert!(!input.is_held(Control::Reset));
        input.process_keyboard(KeyCode::Backspace, ElementState::Pressed);
        assert!(input.is_held(Control::Reset));
    }

    #[test]
    fn control_set_taps_last_one_frame() {
        let mut controls = ControlSet::new().holding(Control::Accelerate).tapping(Control::ToggleCamera);
        assert!(controls.was_pressed(Control::ToggleCamera));
        controls.begin_frame();
        assert!(!controls.was_pressed(Control::ToggleCamera));
        assert!(!controls.is_held(Control::ToggleCamera));
        assert!(controls.is_held(Control::Accelerate));
    }
}
