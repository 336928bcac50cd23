//! Input events for widgets.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Input event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Mouse moved to position
    MouseMove {
        /// New position
        position: Point,
    },
    /// Mouse button pressed
    MouseDown {
        /// Position of click
        position: Point,
        /// Button pressed
        button: MouseButton,
    },
    /// Mouse button released
    MouseUp {
        /// Position of release
        position: Point,
        /// Button released
        button: MouseButton,
    },
    /// Mouse wheel scrolled
    Scroll {
        /// Horizontal scroll delta
        delta_x: f32,
        /// Vertical scroll delta
        delta_y: f32,
    },
    /// Key pressed
    KeyDown {
        /// Key pressed
        key: Key,
    },
    /// Key released
    KeyUp {
        /// Key released
        key: Key,
    },
    /// Text input received
    TextInput {
        /// Input text
        text: String,
    },
    /// Widget gained focus
    FocusIn,
    /// Widget lost focus
    FocusOut,
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button (wheel click)
    Middle,
}

/// Keyboard keys the widgets react to.
///
/// Printable characters arrive as [`Event::TextInput`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Home
    Home,
    /// End
    End,
    /// Enter / Return
    Enter,
    /// Space bar
    Space,
    /// Backspace
    Backspace,
    /// Delete
    Delete,
    /// Tab
    Tab,
    /// Escape
    Escape,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event = Event::MouseDown {
            position: Point::new(1.0, 2.0),
            button: MouseButton::Left,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"MouseDown":{"position":{"x":1.0,"y":2.0},"button":"Left"}}"#
        );
    }

    #[test]
    fn test_text_input_event_from_json() {
        let event: Event = serde_json::from_str(r#"{"TextInput":{"text":"ab"}}"#).unwrap();
        assert_eq!(
            event,
            Event::TextInput {
                text: "ab".to_string()
            }
        );
    }

    #[test]
    fn test_unit_event_from_json() {
        let event: Event = serde_json::from_str(r#""FocusOut""#).unwrap();
        assert_eq!(event, Event::FocusOut);
    }
}
