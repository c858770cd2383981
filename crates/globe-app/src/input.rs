//! Frame-coherent pointer state for orbit control.
//!
//! [`PointerState`] accumulates winit pointer events between redraws. The
//! window handler drains it once per frame: drag deltas only count while the
//! left button is held, and wheel input is summed in notches.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Pixels of a touchpad scroll that count as one wheel notch.
const PIXELS_PER_NOTCH: f64 = 40.0;

/// Pointer input collected since the last frame.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    position: Option<Vec2>,
    dragging: bool,
    drag: Vec2,
    scroll: f32,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a `CursorMoved` event, in logical pixels.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let new_pos = Vec2::new(x as f32, y as f32);
        if self.dragging
            && let Some(previous) = self.position
        {
            self.drag += new_pos - previous;
        }
        self.position = Some(new_pos);
    }

    /// Process a `MouseInput` event. Only the left button drives rotation.
    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            self.dragging = state == ElementState::Pressed;
        }
    }

    /// Process a `MouseWheel` event. Positive is scrolling up, toward the globe.
    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        match delta {
            MouseScrollDelta::LineDelta(_x, y) => {
                self.scroll += y;
            }
            MouseScrollDelta::PixelDelta(pos) => {
                self.scroll += (pos.y / PIXELS_PER_NOTCH) as f32;
            }
        }
    }

    /// The cursor left the window; a held drag ends there.
    pub fn on_cursor_left(&mut self) {
        self.position = None;
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Drag movement since the last clear, in logical pixels.
    pub fn drag(&self) -> Vec2 {
        self.drag
    }

    /// Wheel notches since the last clear.
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Clears per-frame transients; held button state is kept.
    pub fn clear_transients(&mut self) {
        self.drag = Vec2::ZERO;
        self.scroll = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn test_motion_without_button_is_not_a_drag() {
        let mut pointer = PointerState::new();
        pointer.on_cursor_moved(10.0, 10.0);
        pointer.on_cursor_moved(50.0, 30.0);
        assert_eq!(pointer.drag(), Vec2::ZERO);
    }

    #[test]
    fn test_drag_accumulates_while_held() {
        let mut pointer = PointerState::new();
        pointer.on_cursor_moved(100.0, 100.0);
        pointer.on_button(MouseButton::Left, ElementState::Pressed);
        pointer.on_cursor_moved(110.0, 95.0);
        pointer.on_cursor_moved(130.0, 90.0);
        assert_eq!(pointer.drag(), Vec2::new(30.0, -10.0));

        pointer.on_button(MouseButton::Left, ElementState::Released);
        pointer.on_cursor_moved(200.0, 200.0);
        assert_eq!(pointer.drag(), Vec2::new(30.0, -10.0));
    }

    #[test]
    fn test_right_button_does_not_drag() {
        let mut pointer = PointerState::new();
        pointer.on_cursor_moved(0.0, 0.0);
        pointer.on_button(MouseButton::Right, ElementState::Pressed);
        pointer.on_cursor_moved(10.0, 0.0);
        assert!(!pointer.is_dragging());
        assert_eq!(pointer.drag(), Vec2::ZERO);
    }

    #[test]
    fn test_scroll_lines_and_pixels() {
        let mut pointer = PointerState::new();
        pointer.on_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        pointer.on_scroll(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -80.0)));
        assert_eq!(pointer.scroll(), -1.0);
    }

    #[test]
    fn test_clear_keeps_button_state() {
        let mut pointer = PointerState::new();
        pointer.on_cursor_moved(0.0, 0.0);
        pointer.on_button(MouseButton::Left, ElementState::Pressed);
        pointer.on_cursor_moved(5.0, 5.0);
        pointer.on_scroll(MouseScrollDelta::LineDelta(0.0, 2.0));

        pointer.clear_transients();
        assert_eq!(pointer.drag(), Vec2::ZERO);
        assert_eq!(pointer.scroll(), 0.0);
        assert!(pointer.is_dragging());
    }

    #[test]
    fn test_leaving_window_ends_drag() {
        let mut pointer = PointerState::new();
        pointer.on_cursor_moved(0.0, 0.0);
        pointer.on_button(MouseButton::Left, ElementState::Pressed);
        pointer.on_cursor_left();
        assert!(!pointer.is_dragging());
        // Re-entering does not jump from the stale position.
        pointer.on_button(MouseButton::Left, ElementState::Pressed);
        pointer.on_cursor_moved(300.0, 300.0);
        assert_eq!(pointer.drag(), Vec2::ZERO);
    }
}
