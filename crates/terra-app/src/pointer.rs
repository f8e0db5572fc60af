//! Pointer input for the orbit controls.
//!
//! [`PointerState`] collects mouse, wheel and touch events between frames and
//! hands the accumulated drag and scroll to the controls once per frame.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase};

/// Pixels of trackpad scroll treated as one wheel line.
const PIXELS_PER_LINE: f64 = 40.0;

#[derive(Debug, Clone, Default)]
pub struct PointerState {
    position: Option<Vec2>,
    dragging: bool,
    active_touch: Option<(u64, Vec2)>,
    drag: Vec2,
    scroll: f32,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let position = Vec2::new(x as f32, y as f32);
        if self.dragging
            && let Some(previous) = self.position
        {
            self.drag += position - previous;
        }
        self.position = Some(position);
    }

    /// Only the primary button orbits.
    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            self.dragging = state == ElementState::Pressed;
        }
    }

    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        self.scroll += match delta {
            MouseScrollDelta::LineDelta(_x, y) => y,
            MouseScrollDelta::PixelDelta(position) => (position.y / PIXELS_PER_LINE) as f32,
        };
    }

    /// The cursor position becomes unknown; the next move starts fresh.
    pub fn on_cursor_left(&mut self) {
        self.position = None;
    }

    /// Single-finger drag. Further fingers are ignored while one is down.
    pub fn on_touch(&mut self, id: u64, phase: TouchPhase, x: f64, y: f64) {
        let position = Vec2::new(x as f32, y as f32);
        match phase {
            TouchPhase::Started => {
                if self.active_touch.is_none() {
                    self.active_touch = Some((id, position));
                }
            }
            TouchPhase::Moved => {
                if let Some((active, previous)) = self.active_touch
                    && active == id
                {
                    self.drag += position - previous;
                    self.active_touch = Some((id, position));
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                if matches!(self.active_touch, Some((active, _)) if active == id) {
                    self.active_touch = None;
                }
            }
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging || self.active_touch.is_some()
    }

    /// Drag accumulated since the last call, in physical pixels.
    pub fn take_drag(&mut self) -> Vec2 {
        std::mem::take(&mut self.drag)
    }

    /// Wheel lines accumulated since the last call; positive is away from the user.
    pub fn take_scroll(&mut self) -> f32 {
        std::mem::take(&mut self.scroll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn test_moves_without_button_do_not_drag() {
        let mut pointer = PointerState::new();
        pointer.on_cursor_moved(10.0, 10.0);
        pointer.on_cursor_moved(50.0, 30.0);
        assert_eq!(pointer.take_drag(), Vec2::ZERO);
    }

    #[test]
    fn test_left_drag_accumulates_until_taken() {
        let mut pointer = PointerState::new();
        pointer.on_cursor_moved(10.0, 10.0);
        pointer.on_button(MouseButton::Left, ElementState::Pressed);
        pointer.on_cursor_moved(20.0, 15.0);
        pointer.on_cursor_moved(30.0, 5.0);
        assert!(pointer.is_dragging());
        assert_eq!(pointer.take_drag(), Vec2::new(20.0, -5.0));
        assert_eq!(pointer.take_drag(), Vec2::ZERO);

        pointer.on_button(MouseButton::Left, ElementState::Released);
        pointer.on_cursor_moved(100.0, 100.0);
        assert_eq!(pointer.take_drag(), Vec2::ZERO);
        assert!(!pointer.is_dragging());
    }

    #[test]
    fn test_right_button_does_not_orbit() {
        let mut pointer = PointerState::new();
        pointer.on_cursor_moved(0.0, 0.0);
        pointer.on_button(MouseButton::Right, ElementState::Pressed);
        pointer.on_cursor_moved(40.0, 0.0);
        assert_eq!(pointer.take_drag(), Vec2::ZERO);
    }

    #[test]
    fn test_re_entering_cursor_does_not_jump() {
        let mut pointer = PointerState::new();
        pointer.on_cursor_moved(0.0, 0.0);
        pointer.on_button(MouseButton::Left, ElementState::Pressed);
        pointer.on_cursor_left();
        pointer.on_cursor_moved(500.0, 500.0);
        pointer.on_cursor_moved(505.0, 500.0);
        assert_eq!(pointer.take_drag(), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_scroll_lines_and_pixels() {
        let mut pointer = PointerState::new();
        pointer.on_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        pointer.on_scroll(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 80.0)));
        assert_eq!(pointer.take_scroll(), 3.0);
        assert_eq!(pointer.take_scroll(), 0.0);
    }

    #[test]
    fn test_single_touch_drag() {
        let mut pointer = PointerState::new();
        pointer.on_touch(1, TouchPhase::Started, 100.0, 100.0);
        pointer.on_touch(2, TouchPhase::Started, 300.0, 300.0);
        pointer.on_touch(1, TouchPhase::Moved, 110.0, 95.0);
        pointer.on_touch(2, TouchPhase::Moved, 400.0, 400.0);
        assert_eq!(pointer.take_drag(), Vec2::new(10.0, -5.0));

        pointer.on_touch(1, TouchPhase::Ended, 110.0, 95.0);
        assert!(!pointer.is_dragging());
    }
}
