//! Input state management for pointer and keyboard events.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Key name that deletes the focused shape.
pub const DELETE_KEY: &str = "Delete";

/// Pointer travel (screen pixels) below which a press/release is a click.
pub const CLICK_SLOP: f64 = 3.0;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
}

/// Keyboard event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(String),
    Released(String),
}

/// Tracks the primary button between events to tell clicks from drags.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Where the primary button went down.
    press_origin: Option<Point>,
    /// The pointer has left the click slop since the press.
    moved_beyond_slop: bool,
    /// Whether the last primary release ended a click.
    last_release_was_click: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a pointer event.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        match *event {
            PointerEvent::Down { position, button } => {
                if button == MouseButton::Left {
                    self.press_origin = Some(position);
                    self.moved_beyond_slop = false;
                    self.last_release_was_click = false;
                }
            }
            PointerEvent::Up { position, button } => {
                if button == MouseButton::Left {
                    self.track_slop(position);
                    self.last_release_was_click =
                        self.press_origin.is_some() && !self.moved_beyond_slop;
                    self.press_origin = None;
                }
            }
            PointerEvent::Move { position } => self.track_slop(position),
        }
    }

    fn track_slop(&mut self, position: Point) {
        if let Some(origin) = self.press_origin {
            if (position - origin).hypot() > CLICK_SLOP {
                self.moved_beyond_slop = true;
            }
        }
    }

    /// Whether the most recent primary release stayed within the click slop.
    pub fn is_click(&self) -> bool {
        self.last_release_was_click
    }
}
