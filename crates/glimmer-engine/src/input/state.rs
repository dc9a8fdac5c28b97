use std::collections::HashSet;

use crate::coords::Vec2;

use super::types::{InputEvent, Key, MouseButton};

/// Current input state for a window plus this frame's transitions.
#[derive(Debug, Default)]
pub struct InputState {
    /// Pointer position in physical window pixels, if inside the window.
    pub pointer_pos: Option<Vec2>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,

    /// Keys that went down since the last [`end_frame`](Self::end_frame).
    /// Auto-repeat does not count.
    pub keys_pressed: HashSet<Key>,
    pub buttons_pressed: HashSet<MouseButton>,
}

impl InputState {
    pub fn apply_event(&mut self, ev: InputEvent) {
        match ev {
            InputEvent::PointerMoved { x, y } => self.pointer_pos = Some(Vec2::new(x, y)),
            InputEvent::PointerLeft => self.pointer_pos = None,
            InputEvent::Button { button, pressed: true } => {
                if self.buttons_down.insert(button) {
                    self.buttons_pressed.insert(button);
                }
            }
            InputEvent::Button { button, pressed: false } => {
                self.buttons_down.remove(&button);
            }
            InputEvent::Key { key, pressed: true, repeat } => {
                if self.keys_down.insert(key) && !repeat {
                    self.keys_pressed.insert(key);
                }
            }
            InputEvent::Key { key, pressed: false, .. } => {
                self.keys_down.remove(&key);
            }
            InputEvent::Focused(false) => {
                // Avoid stuck keys when focus changes mid-press.
                self.keys_down.clear();
                self.buttons_down.clear();
            }
            InputEvent::Focused(true) => {}
        }
    }

    #[inline]
    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Clears per-frame transitions. Called by the runtime after each frame.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.buttons_pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_reported_once_per_frame() {
        let mut s = InputState::default();
        s.apply_event(InputEvent::Key { key: Key::Space, pressed: true, repeat: false });
        assert!(s.key_pressed(Key::Space));
        s.end_frame();
        s.apply_event(InputEvent::Key { key: Key::Space, pressed: true, repeat: true });
        assert!(!s.key_pressed(Key::Space));
        assert!(s.keys_down.contains(&Key::Space));
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut s = InputState::default();
        s.apply_event(InputEvent::Button { button: MouseButton::Left, pressed: true });
        s.apply_event(InputEvent::Focused(false));
        assert!(s.buttons_down.is_empty());
    }

    #[test]
    fn pointer_leaving_clears_position() {
        let mut s = InputState::default();
        s.apply_event(InputEvent::PointerMoved { x: 3.0, y: 4.0 });
        assert_eq!(s.pointer_pos, Some(Vec2::new(3.0, 4.0)));
        s.apply_event(InputEvent::PointerLeft);
        assert_eq!(s.pointer_pos, None);
    }
}
