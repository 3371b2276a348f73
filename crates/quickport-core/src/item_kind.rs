//! The closed set of dialog item variants.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Dialog item variant, as stored in an item list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialogItemKind {
    Button,
    CheckBox,
    RadioButton,
    /// A control described by its own resource.
    Control,
    StaticText,
    EditText,
    Icon,
    Picture,
    /// Application-drawn item; the toolbox draws nothing for it.
    UserItem,
}

/// Flag OR-ed into an item type code when the item is disabled.
pub const ITEM_DISABLE: i16 = 128;

impl DialogItemKind {
    /// The `itemType` code `GetDialogItem` reports for an enabled item.
    pub fn type_code(self) -> i16 {
        match self {
            Self::UserItem => 0,
            Self::Button => 4,
            Self::CheckBox => 5,
            Self::RadioButton => 6,
            Self::Control => 7,
            Self::StaticText => 8,
            Self::EditText => 16,
            Self::Icon => 32,
            Self::Picture => 64,
        }
    }

    /// Parse a type code, ignoring the disable flag.
    pub fn from_type_code(code: i16) -> Option<Self> {
        match code & !ITEM_DISABLE {
            0 => Some(Self::UserItem),
            4 => Some(Self::Button),
            5 => Some(Self::CheckBox),
            6 => Some(Self::RadioButton),
            7 => Some(Self::Control),
            8 => Some(Self::StaticText),
            16 => Some(Self::EditText),
            32 => Some(Self::Icon),
            64 => Some(Self::Picture),
            _ => None,
        }
    }

    /// Static and editable text. These composite after every other item.
    #[inline]
    pub fn is_text(self) -> bool {
        matches!(self, Self::StaticText | Self::EditText)
    }

    /// Items whose content is a string, and so are subject to `^0`..`^3`
    /// parameter substitution.
    #[inline]
    pub fn has_text(self) -> bool {
        matches!(
            self,
            Self::Button | Self::CheckBox | Self::RadioButton | Self::StaticText | Self::EditText
        )
    }
}

impl fmt::Display for DialogItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Button => "button",
            Self::CheckBox => "checkbox",
            Self::RadioButton => "radio",
            Self::Control => "control",
            Self::StaticText => "static text",
            Self::EditText => "edit text",
            Self::Icon => "icon",
            Self::Picture => "picture",
            Self::UserItem => "user item",
        };
        f.write_str(name)
    }
}
