//! Window kinds.
//!
//! The window definition procedure id (`procID`) stored in a `WIND` or
//! `DLOG` template selects the window's frame. On a modern desktop that
//! boils down to a few native window attributes.

use serde::{Deserialize, Serialize};

/// The frame style a template asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WindowKind {
    /// `documentProc`: title bar, grow box.
    #[default]
    Document,
    /// `dBoxProc`: modal dialog frame.
    DialogBox,
    /// `plainDBox`: no frame at all. Shown as a borderless utility window.
    PlainDialogBox,
    /// `altDBoxProc`: modal frame with a drop shadow.
    AltDialogBox,
    /// `noGrowDocProc`: title bar, fixed size.
    NoGrowDocument,
    /// `movableDBoxProc`: modal dialog with a title bar.
    MovableDialogBox,
    /// `zoomDocProc`: title bar, grow box and zoom box.
    ZoomDocument,
    /// `rDocProc`: rounded-corner document window.
    RoundDocument,
}

impl WindowKind {
    /// Map a `procID`. Unknown ids fall back to [`WindowKind::Document`].
    pub fn from_proc_id(proc_id: i16) -> Self {
        match proc_id {
            0 => Self::Document,
            1 => Self::DialogBox,
            2 => Self::PlainDialogBox,
            3 => Self::AltDialogBox,
            4 => Self::NoGrowDocument,
            5 => Self::MovableDialogBox,
            8 => Self::ZoomDocument,
            16 => Self::RoundDocument,
            other => {
                tracing::debug!(target: "quickport::window", proc_id = other, "unknown procID, using document frame");
                Self::Document
            }
        }
    }

    pub fn proc_id(self) -> i16 {
        match self {
            Self::Document => 0,
            Self::DialogBox => 1,
            Self::PlainDialogBox => 2,
            Self::AltDialogBox => 3,
            Self::NoGrowDocument => 4,
            Self::MovableDialogBox => 5,
            Self::ZoomDocument => 8,
            Self::RoundDocument => 16,
        }
    }

    /// Whether the native window gets a title bar and border.
    pub fn has_decorations(self) -> bool {
        !matches!(self, Self::PlainDialogBox)
    }

    /// Whether the native window is a utility (tool) window.
    pub fn is_utility(self) -> bool {
        matches!(self, Self::PlainDialogBox)
    }

    /// Whether the user may resize the window.
    pub fn is_resizable(self) -> bool {
        matches!(self, Self::Document | Self::ZoomDocument)
    }
}
