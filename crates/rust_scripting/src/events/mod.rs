//! Window and input events delivered to scripts
//!
//! Events are immutable one-shot records built by the engine. The host
//! feeds each one to the input state and then to every script's `on_event`.

use std::fmt;

use crate::input::{KeyCode, MouseButton};

/// Event type identification; values match the engine's
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum EventType {
    /// No event
    None = 0,
    /// Window close requested
    WindowClose = 1,
    /// Window resized
    WindowResize = 2,
    /// Window gained or lost focus
    WindowFocused = 3,
    /// Key went down or repeated
    KeyPressed = 4,
    /// Key went up
    KeyReleased = 5,
    /// Character typed
    KeyTyped = 6,
    /// Mouse button went down
    MouseButtonPressed = 7,
    /// Mouse button went up
    MouseButtonReleased = 8,
    /// Cursor moved
    MouseMoved = 9,
    /// Wheel scrolled
    MouseScrolled = 10,
}

bitflags::bitflags! {
    /// Coarse event classification used for filtering
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EventCategory: u32 {
        /// Window and application events
        const APPLICATION = 1 << 0;
        /// Any input device
        const INPUT = 1 << 1;
        /// Keyboard
        const KEYBOARD = 1 << 2;
        /// Mouse motion and wheel
        const MOUSE = 1 << 3;
        /// Mouse buttons
        const MOUSE_BUTTON = 1 << 4;
    }
}

/// A window or input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Window close requested
    WindowClose,
    /// Window resized
    WindowResize {
        /// New width in pixels
        width: u32,
        /// New height in pixels
        height: u32,
    },
    /// Window gained or lost focus
    WindowFocused {
        /// Whether the window is focused now
        focused: bool,
    },
    /// Key went down; `repeat_count` counts auto-repeats
    KeyPressed {
        /// Key
        key: KeyCode,
        /// Auto-repeats so far
        repeat_count: u32,
    },
    /// Key went up
    KeyReleased {
        /// Key
        key: KeyCode,
    },
    /// Character typed
    KeyTyped {
        /// Key
        key: KeyCode,
    },
    /// Mouse button went down
    MouseButtonPressed {
        /// Button
        button: MouseButton,
    },
    /// Mouse button went up
    MouseButtonReleased {
        /// Button
        button: MouseButton,
    },
    /// Cursor moved to window coordinates
    MouseMoved {
        /// Cursor X
        x: f32,
        /// Cursor Y
        y: f32,
    },
    /// Wheel scrolled
    MouseScrolled {
        /// Horizontal offset
        x_offset: f32,
        /// Vertical offset
        y_offset: f32,
    },
}

impl Event {
    /// Concrete event type
    pub fn event_type(&self) -> EventType {
        match self {
            Self::WindowClose => EventType::WindowClose,
            Self::WindowResize { .. } => EventType::WindowResize,
            Self::WindowFocused { .. } => EventType::WindowFocused,
            Self::KeyPressed { .. } => EventType::KeyPressed,
            Self::KeyReleased { .. } => EventType::KeyReleased,
            Self::KeyTyped { .. } => EventType::KeyTyped,
            Self::MouseButtonPressed { .. } => EventType::MouseButtonPressed,
            Self::MouseButtonReleased { .. } => EventType::MouseButtonReleased,
            Self::MouseMoved { .. } => EventType::MouseMoved,
            Self::MouseScrolled { .. } => EventType::MouseScrolled,
        }
    }

    /// Categories the event belongs to
    pub fn category_flags(&self) -> EventCategory {
        match self.event_type() {
            EventType::None => EventCategory::empty(),
            EventType::WindowClose | EventType::WindowResize | EventType::WindowFocused => {
                EventCategory::APPLICATION
            }
            EventType::KeyPressed | EventType::KeyReleased | EventType::KeyTyped => {
                EventCategory::INPUT | EventCategory::KEYBOARD
            }
            EventType::MouseButtonPressed | EventType::MouseButtonReleased => {
                EventCategory::INPUT | EventCategory::MOUSE | EventCategory::MOUSE_BUTTON
            }
            EventType::MouseMoved | EventType::MouseScrolled => EventCategory::INPUT | EventCategory::MOUSE,
        }
    }

    /// Whether every flag of `category` is set on this event
    pub fn is_in_category(&self, category: EventCategory) -> bool {
        self.category_flags().contains(category)
    }

    /// Event name, e.g. `KeyPressedEvent`
    pub fn name(&self) -> &'static str {
        match self.event_type() {
            EventType::None => "None",
            EventType::WindowClose => "WindowCloseEvent",
            EventType::WindowResize => "WindowResizeEvent",
            EventType::WindowFocused => "WindowFocusedEvent",
            EventType::KeyPressed => "KeyPressedEvent",
            EventType::KeyReleased => "KeyReleasedEvent",
            EventType::KeyTyped => "KeyTypedEvent",
            EventType::MouseButtonPressed => "MouseButtonPressedEvent",
            EventType::MouseButtonReleased => "MouseButtonReleasedEvent",
            EventType::MouseMoved => "MouseMovedEvent",
            EventType::MouseScrolled => "MouseScrolledEvent",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name();
        match *self {
            Self::WindowClose => write!(f, "{name}"),
            Self::WindowResize { width, height } => write!(f, "{name}: {width}, {height}"),
            Self::WindowFocused { focused } => write!(f, "{name}: {focused}"),
            Self::KeyPressed { key, repeat_count } => write!(f, "{name}: {key} ({repeat_count} repeats)"),
            Self::KeyReleased { key } | Self::KeyTyped { key } => write!(f, "{name}: {key}"),
            Self::MouseButtonPressed { button } | Self::MouseButtonReleased { button } => {
                write!(f, "{name}: {button}")
            }
            Self::MouseMoved { x, y } => write!(f, "{name}: {x}, {y}"),
            Self::MouseScrolled { x_offset, y_offset } => write!(f, "{name}: {x_offset}, {y_offset}"),
        }
    }
}
