//! Input events as the toolbox sees them.
//!
//! The windowing backend converts its native events into [`ToolboxEvent`]s;
//! dialog handling and `WaitNextEvent` callers only ever see this form.

use serde::{Deserialize, Serialize};

use crate::handle::PlatformWindowId;
use quickport_render::Point;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EventKind {
    /// Nothing happened before the wait timed out.
    #[default]
    Null,
    /// A window gained focus.
    Activate,
    /// A window needs redrawing.
    Update,
    KeyDown,
    /// The primary pointer button went down.
    PointerDown,
    /// Committed text from the keyboard or an input method.
    TextInput,
}

/// A raw key code.
///
/// Character keys use their character value; function keys use the
/// `NSFunctionKey` range (`0xF704` is F1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const NONE: Self = Self(0);
    pub const BACKSPACE: Self = Self(0x08);
    pub const TAB: Self = Self(0x09);
    pub const RETURN: Self = Self(0x0D);
    pub const ESCAPE: Self = Self(0x1B);
    pub const DELETE: Self = Self(0x7F);
    pub const F1: Self = Self(0xF704);
    pub const F12: Self = Self(0xF70F);

    /// Function key `n` (1-based). Returns `None` outside F1..=F35.
    pub fn function(n: u32) -> Option<Self> {
        (1..=35).contains(&n).then(|| Self(Self::F1.0 + n - 1))
    }

    /// The key code for a character key.
    pub fn from_char(ch: char) -> Self {
        Self(u32::from(ch))
    }
}

/// One inbound event.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ToolboxEvent {
    pub kind: EventKind,
    /// Pointer position in the originating window's content coordinates.
    pub position: Point,
    pub key: KeyCode,
    /// The native window the event came from, if any.
    pub window: Option<PlatformWindowId>,
    /// Committed text for [`EventKind::TextInput`].
    pub text: String,
}

impl ToolboxEvent {
    /// The event `WaitNextEvent` yields on timeout.
    pub fn null() -> Self {
        Self::default()
    }

    pub fn key_down(window: PlatformWindowId, key: KeyCode, position: Point) -> Self {
        Self {
            kind: EventKind::KeyDown,
            position,
            key,
            window: Some(window),
            text: String::new(),
        }
    }

    pub fn pointer_down(window: PlatformWindowId, position: Point) -> Self {
        Self {
            kind: EventKind::PointerDown,
            position,
            window: Some(window),
            ..Self::default()
        }
    }

    pub fn text_input(window: PlatformWindowId, text: impl Into<String>) -> Self {
        Self {
            kind: EventKind::TextInput,
            window: Some(window),
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn activate(window: PlatformWindowId) -> Self {
        Self {
            kind: EventKind::Activate,
            window: Some(window),
            ..Self::default()
        }
    }

    pub fn update(window: PlatformWindowId) -> Self {
        Self {
            kind: EventKind::Update,
            window: Some(window),
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.kind == EventKind::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_keys() {
        assert_eq!(KeyCode::function(1), Some(KeyCode::F1));
        assert_eq!(KeyCode::function(12), Some(KeyCode::F12));
        assert_eq!(KeyCode::function(0), None);
        assert_eq!(KeyCode::function(36), None);
    }

    #[test]
    fn test_constructors() {
        let id = PlatformWindowId(7);
        let ev = ToolboxEvent::text_input(id, "5");
        assert_eq!(ev.kind, EventKind::TextInput);
        assert_eq!(ev.window, Some(id));
        assert_eq!(ev.text, "5");

        let ev = ToolboxEvent::key_down(id, KeyCode::BACKSPACE, Point::new(1, 2));
        assert_eq!(ev.key, KeyCode::BACKSPACE);
        assert_eq!(ev.position, Point::new(1, 2));

        assert!(ToolboxEvent::null().is_null());
        assert!(ToolboxEvent::null().window.is_none());
    }
}
