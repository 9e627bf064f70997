//! Input Handling
//!
//! Mouse state for camera control. Only buttons and pointer motion matter to
//! the scene; everything else the window delivers is ignored.

use bitflags::bitflags;
use glam::Vec2;

/// Input event types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Mouse button pressed
    MousePressed(MouseButton),
    /// Mouse button released
    MouseReleased(MouseButton),
    /// Pointer moved to a position in physical pixels
    MouseMoved { x: f32, y: f32 },
    /// Pointer left the window
    MouseLeft,
}

impl InputEvent {
    /// Map a `winit` window event onto an input event, if it is one
    pub fn from_winit(event: &winit::event::WindowEvent) -> Option<Self> {
        use winit::event::{ElementState, WindowEvent};

        match event {
            WindowEvent::CursorMoved { position, .. } => Some(InputEvent::MouseMoved {
                x: position.x as f32,
                y: position.y as f32,
            }),
            WindowEvent::CursorLeft { .. } => Some(InputEvent::MouseLeft),
            WindowEvent::MouseInput { state, button, .. } => {
                let button = MouseButton::from_winit(*button)?;
                Some(match state {
                    ElementState::Pressed => InputEvent::MousePressed(button),
                    ElementState::Released => InputEvent::MouseReleased(button),
                })
            }
            _ => None,
        }
    }
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Convert a `winit` button; extra buttons are not tracked
    pub fn from_winit(button: winit::event::MouseButton) -> Option<Self> {
        match button {
            winit::event::MouseButton::Left => Some(MouseButton::Left),
            winit::event::MouseButton::Right => Some(MouseButton::Right),
            winit::event::MouseButton::Middle => Some(MouseButton::Middle),
            _ => None,
        }
    }

    fn flag(self) -> MouseButtons {
        match self {
            MouseButton::Left => MouseButtons::LEFT,
            MouseButton::Right => MouseButtons::RIGHT,
            MouseButton::Middle => MouseButtons::MIDDLE,
        }
    }
}

bitflags! {
    /// Set of held mouse buttons
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MouseButtons: u8 {
        const LEFT = 0b001;
        const RIGHT = 0b010;
        const MIDDLE = 0b100;
    }
}

/// Mouse state accumulated over one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseState {
    /// Buttons currently held
    buttons: MouseButtons,
    /// Last known pointer position
    position: Option<Vec2>,
    /// Pointer motion since the last `end_frame`
    delta: Vec2,
}

impl MouseState {
    /// Create a new mouse state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a mouse button is held
    pub fn is_pressed(&self, button: MouseButton) -> bool {
        self.buttons.contains(button.flag())
    }

    /// Held buttons
    pub fn buttons(&self) -> MouseButtons {
        self.buttons
    }

    /// Last known pointer position
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    /// Pointer motion accumulated this frame
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// Handle an input event
    pub fn handle_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::MousePressed(button) => self.buttons |= button.flag(),
            InputEvent::MouseReleased(button) => self.buttons -= button.flag(),
            InputEvent::MouseMoved { x, y } => {
                let new_pos = Vec2::new(x, y);
                // The first sample after entering the window has no motion
                if let Some(previous) = self.position {
                    self.delta += new_pos - previous;
                }
                self.position = Some(new_pos);
            }
            InputEvent::MouseLeft => self.position = None,
        }
    }

    /// Inject a pointer motion directly, for scripted drags
    pub fn push_delta(&mut self, delta: Vec2) {
        self.delta += delta;
    }

    /// Clear per-frame state (call at the end of each frame)
    pub fn end_frame(&mut self) {
        self.delta = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons() {
        let mut mouse = MouseState::new();
        mouse.handle_event(&InputEvent::MousePressed(MouseButton::Left));
        mouse.handle_event(&InputEvent::MousePressed(MouseButton::Right));
        assert_eq!(mouse.buttons(), MouseButtons::LEFT | MouseButtons::RIGHT);

        mouse.handle_event(&InputEvent::MouseReleased(MouseButton::Left));
        assert!(!mouse.is_pressed(MouseButton::Left));
        assert!(mouse.is_pressed(MouseButton::Right));
    }

    #[test]
    fn test_motion_accumulates_until_end_frame() {
        let mut mouse = MouseState::new();
        mouse.handle_event(&InputEvent::MouseMoved { x: 100.0, y: 200.0 });
        assert_eq!(mouse.delta(), Vec2::ZERO);

        mouse.handle_event(&InputEvent::MouseMoved { x: 110.0, y: 205.0 });
        mouse.handle_event(&InputEvent::MouseMoved { x: 115.0, y: 215.0 });
        assert_eq!(mouse.delta(), Vec2::new(15.0, 15.0));

        mouse.end_frame();
        assert_eq!(mouse.delta(), Vec2::ZERO);
        assert_eq!(mouse.position(), Some(Vec2::new(115.0, 215.0)));
    }

    #[test]
    fn test_reentering_window_does_not_jump() {
        let mut mouse = MouseState::new();
        mouse.handle_event(&InputEvent::MouseMoved { x: 10.0, y: 10.0 });
        mouse.handle_event(&InputEvent::MouseLeft);
        mouse.handle_event(&InputEvent::MouseMoved { x: 500.0, y: 400.0 });
        assert_eq!(mouse.delta(), Vec2::ZERO);
    }

    #[test]
    fn test_winit_button_mapping() {
        use winit::event::MouseButton as WinitButton;
        assert_eq!(MouseButton::from_winit(WinitButton::Left), Some(MouseButton::Left));
        assert_eq!(MouseButton::from_winit(WinitButton::Right), Some(MouseButton::Right));
        assert_eq!(MouseButton::from_winit(WinitButton::Back), None);
    }

    #[test]
    fn test_winit_events_drive_mouse_state() {
        use winit::dpi::PhysicalPosition;
        use winit::event::{DeviceId, ElementState, WindowEvent};

        // Only used as an opaque, comparable id
        let device_id = unsafe { DeviceId::dummy() };
        let moved = |x: f64, y: f64| WindowEvent::CursorMoved {
            device_id,
            position: PhysicalPosition::new(x, y),
        };
        let press = WindowEvent::MouseInput {
            device_id,
            state: ElementState::Pressed,
            button: winit::event::MouseButton::Left,
        };
        let extra = WindowEvent::MouseInput {
            device_id,
            state: ElementState::Pressed,
            button: winit::event::MouseButton::Other(7),
        };

        assert_eq!(
            InputEvent::from_winit(&press),
            Some(InputEvent::MousePressed(MouseButton::Left))
        );
        assert_eq!(InputEvent::from_winit(&extra), None);
        assert_eq!(
            InputEvent::from_winit(&WindowEvent::CursorLeft { device_id }),
            Some(InputEvent::MouseLeft)
        );
        assert_eq!(InputEvent::from_winit(&WindowEvent::Focused(true)), None);

        let mut mouse = MouseState::new();
        for event in [press, moved(10.0, 20.0), moved(13.0, 16.0)] {
            if let Some(input) = InputEvent::from_winit(&event) {
                mouse.handle_event(&input);
            }
        }
        assert!(mouse.is_pressed(MouseButton::Left));
        assert_eq!(mouse.delta(), Vec2::new(3.0, -4.0));
    }
}
