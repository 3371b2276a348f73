//! Opaque identifiers for windows and dialog items.
//!
//! Two kinds of identifier live here:
//!
//! - [`WindowHandle`] and [`ItemHandle`] are what toolbox callers hold. They
//!   come from a single monotonically increasing [`HandleAllocator`] and are
//!   never reused, so a handle kept across a window's disposal can only ever
//!   fail lookup; it never resolves to some newer object.
//! - [`WindowKey`] is the generation-checked slotmap key the registry stores
//!   windows under. It stays internal to the registry.
//!
//! [`PlatformWindowId`] is the windowing backend's own id, used to route
//! inbound events back to a window.

use std::fmt;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::error::{ToolboxError, ToolboxResult};

new_key_type! {
    /// Arena key for a registered window.
    ///
    /// Keys carry a generation, so a key for a destroyed window never
    /// resolves again even after its slot is reused.
    pub struct WindowKey;
}

/// Caller-facing window identifier (`WindowPtr` / `DialogPtr`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowHandle(u32);

/// Caller-facing dialog item identifier (the item `Handle`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemHandle(u32);

impl WindowHandle {
    /// The raw handle value.
    #[inline]
    pub fn as_raw(self) -> u32 {
        self.0
    }

    /// Rebuild a handle from a raw value, e.g. one passed back by a caller.
    /// Whether it refers to a live window is only known to the registry.
    #[inline]
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

impl ItemHandle {
    #[inline]
    pub fn as_raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

impl fmt::Display for ItemHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Identifier the windowing backend assigns to a native window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformWindowId(pub u64);

impl fmt::Display for PlatformWindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "platform#{}", self.0)
    }
}

/// Hands out window and item handles from one shared counter.
///
/// Window and item handles never collide with each other either, which
/// keeps log lines unambiguous.
#[derive(Debug)]
pub struct HandleAllocator {
    next: u32,
}

impl Default for HandleAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl HandleAllocator {
    /// Start at 1; zero is never handed out so it can act as a null handle
    /// at the caller boundary.
    pub fn new() -> Self {
        Self { next: 1 }
    }

    fn bump(&mut self) -> ToolboxResult<u32> {
        let value = self.next;
        self.next = value.checked_add(1).ok_or(ToolboxError::HandlesExhausted)?;
        Ok(value)
    }

    /// Allocate a fresh window handle.
    ///
    /// # Errors
    ///
    /// Returns [`ToolboxError::HandlesExhausted`] once the counter would wrap.
    pub fn allocate_window(&mut self) -> ToolboxResult<WindowHandle> {
        self.bump().map(WindowHandle)
    }

    /// Allocate a fresh item handle.
    pub fn allocate_item(&mut self) -> ToolboxResult<ItemHandle> {
        self.bump().map(ItemHandle)
    }

    /// The value the next allocation will return.
    #[inline]
    pub fn peek(&self) -> u32 {
        self.next
    }
}
