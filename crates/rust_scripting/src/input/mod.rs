//! Keyboard and mouse state
//!
//! [`InputState`] is fed by the events the host dispatches, so scripts can
//! poll keys and buttons between events. Codes use the GLFW numbering the
//! engine reports.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::foundation::guid::Guid;
use crate::foundation::math::Vector2;

/// Keyboard key code (GLFW values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyCode(pub u16);

#[allow(missing_docs)]
impl KeyCode {
    pub const SPACE: Self = Self(32);
    pub const APOSTROPHE: Self = Self(39);
    pub const COMMA: Self = Self(44);
    pub const MINUS: Self = Self(45);
    pub const PERIOD: Self = Self(46);
    pub const SLASH: Self = Self(47);
    pub const D0: Self = Self(48);
    pub const D1: Self = Self(49);
    pub const D2: Self = Self(50);
    pub const D3: Self = Self(51);
    pub const D4: Self = Self(52);
    pub const D5: Self = Self(53);
    pub const D6: Self = Self(54);
    pub const D7: Self = Self(55);
    pub const D8: Self = Self(56);
    pub const D9: Self = Self(57);
    pub const SEMICOLON: Self = Self(59);
    pub const EQUAL: Self = Self(61);
    pub const A: Self = Self(65);
    pub const B: Self = Self(66);
    pub const C: Self = Self(67);
    pub const D: Self = Self(68);
    pub const E: Self = Self(69);
    pub const F: Self = Self(70);
    pub const G: Self = Self(71);
    pub const H: Self = Self(72);
    pub const I: Self = Self(73);
    pub const J: Self = Self(74);
    pub const K: Self = Self(75);
    pub const L: Self = Self(76);
    pub const M: Self = Self(77);
    pub const N: Self = Self(78);
    pub const O: Self = Self(79);
    pub const P: Self = Self(80);
    pub const Q: Self = Self(81);
    pub const R: Self = Self(82);
    pub const S: Self = Self(83);
    pub const T: Self = Self(84);
    pub const U: Self = Self(85);
    pub const V: Self = Self(86);
    pub const W: Self = Self(87);
    pub const X: Self = Self(88);
    pub const Y: Self = Self(89);
    pub const Z: Self = Self(90);
    pub const LEFT_BRACKET: Self = Self(91);
    pub const BACKSLASH: Self = Self(92);
    pub const RIGHT_BRACKET: Self = Self(93);
    pub const GRAVE_ACCENT: Self = Self(96);

    pub const ESCAPE: Self = Self(256);
    pub const ENTER: Self = Self(257);
    pub const TAB: Self = Self(258);
    pub const BACKSPACE: Self = Self(259);
    pub const INSERT: Self = Self(260);
    pub const DELETE: Self = Self(261);
    pub const RIGHT: Self = Self(262);
    pub const LEFT: Self = Self(263);
    pub const DOWN: Self = Self(264);
    pub const UP: Self = Self(265);
    pub const PAGE_UP: Self = Self(266);
    pub const PAGE_DOWN: Self = Self(267);
    pub const HOME: Self = Self(268);
    pub const END: Self = Self(269);
    pub const CAPS_LOCK: Self = Self(280);
    pub const SCROLL_LOCK: Self = Self(281);
    pub const NUM_LOCK: Self = Self(282);
    pub const PRINT_SCREEN: Self = Self(283);
    pub const PAUSE: Self = Self(284);
    pub const F1: Self = Self(290);
    pub const F2: Self = Self(291);
    pub const F3: Self = Self(292);
    pub const F4: Self = Self(293);
    pub const F5: Self = Self(294);
    pub const F6: Self = Self(295);
    pub const F7: Self = Self(296);
    pub const F8: Self = Self(297);
    pub const F9: Self = Self(298);
    pub const F10: Self = Self(299);
    pub const F11: Self = Self(300);
    pub const F12: Self = Self(301);

    pub const KP_0: Self = Self(320);
    pub const KP_1: Self = Self(321);
    pub const KP_2: Self = Self(322);
    pub const KP_3: Self = Self(323);
    pub const KP_4: Self = Self(324);
    pub const KP_5: Self = Self(325);
    pub const KP_6: Self = Self(326);
    pub const KP_7: Self = Self(327);
    pub const KP_8: Self = Self(328);
    pub const KP_9: Self = Self(329);
    pub const KP_DECIMAL: Self = Self(330);
    pub const KP_DIVIDE: Self = Self(331);
    pub const KP_MULTIPLY: Self = Self(332);
    pub const KP_SUBTRACT: Self = Self(333);
    pub const KP_ADD: Self = Self(334);
    pub const KP_ENTER: Self = Self(335);
    pub const KP_EQUAL: Self = Self(336);

    pub const LEFT_SHIFT: Self = Self(340);
    pub const LEFT_CONTROL: Self = Self(341);
    pub const LEFT_ALT: Self = Self(342);
    pub const LEFT_SUPER: Self = Self(343);
    pub const RIGHT_SHIFT: Self = Self(344);
    pub const RIGHT_CONTROL: Self = Self(345);
    pub const RIGHT_ALT: Self = Self(346);
    pub const RIGHT_SUPER: Self = Self(347);
    pub const MENU: Self = Self(348);
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mouse button index, 0 through 7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MouseButton(pub u8);

#[allow(missing_docs)]
impl MouseButton {
    pub const BUTTON_0: Self = Self(0);
    pub const BUTTON_1: Self = Self(1);
    pub const BUTTON_2: Self = Self(2);
    pub const BUTTON_3: Self = Self(3);
    pub const BUTTON_4: Self = Self(4);
    pub const BUTTON_5: Self = Self(5);
    pub const BUTTON_6: Self = Self(6);
    pub const BUTTON_7: Self = Self(7);

    pub const LEFT: Self = Self::BUTTON_0;
    pub const RIGHT: Self = Self::BUTTON_1;
    pub const MIDDLE: Self = Self::BUTTON_2;
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cursor visibility
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum CursorMode {
    /// Visible cursor
    #[default]
    Normal = 0,
    /// Hidden cursor
    Hidden = 1,
}

/// Polled keyboard and mouse state
#[derive(Debug, Default)]
pub struct InputState {
    keys: HashSet<KeyCode>,
    buttons: HashSet<MouseButton>,
    mouse_position: Vector2,
    cursor_mode: CursorMode,
    hovered_entity: Option<Guid>,
}

impl InputState {
    /// Create an empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an event
    pub fn on_event(&mut self, event: &Event) {
        match *event {
            Event::KeyPressed { key, .. } => {
                self.keys.insert(key);
            }
            Event::KeyReleased { key } => {
                self.keys.remove(&key);
            }
            Event::MouseButtonPressed { button } => {
                self.buttons.insert(button);
            }
            Event::MouseButtonReleased { button } => {
                self.buttons.remove(&button);
            }
            Event::MouseMoved { x, y } => self.mouse_position = Vector2::new(x, y),
            Event::WindowFocused { focused: false } => {
                self.keys.clear();
                self.buttons.clear();
            }
            _ => {}
        }
    }

    /// Whether the key is held
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    /// Whether the mouse button is held
    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Cursor position in window coordinates
    pub fn mouse_position(&self) -> Vector2 {
        self.mouse_position
    }

    /// Cursor visibility
    pub fn cursor_mode(&self) -> CursorMode {
        self.cursor_mode
    }

    /// Change cursor visibility
    pub fn set_cursor_mode(&mut self, mode: CursorMode) {
        self.cursor_mode = mode;
    }

    /// Entity under the cursor, as reported by the engine's picking pass
    pub fn hovered_entity(&self) -> Option<Guid> {
        self.hovered_entity
    }

    /// Record the entity under the cursor
    pub fn set_hovered_entity(&mut self, entity: Option<Guid>) {
        self.hovered_entity = entity;
    }
}
