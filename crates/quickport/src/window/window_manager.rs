//! Window registry.
//!
//! The `WindowManager` owns every toolbox window and resolves the three kinds
//! of identifier callers and events carry:
//!
//! - [`WindowHandle`]s from toolbox calls
//! - [`ItemHandle`]s from item-level calls such as `GetDialogItemText`
//! - [`PlatformWindowId`]s on inbound events
//!
//! Windows live in a generation-checked slotmap. The public handles map onto
//! arena keys, so a handle kept past its window's disposal fails lookup
//! instead of aliasing whatever reuses the slot.

use std::collections::HashMap;

use quickport_core::logging::targets;
use quickport_core::{
    HandleAllocator, ItemHandle, ItemTemplate, PlatformWindowId, ToolboxError, ToolboxResult,
    WindowHandle, WindowKey, WindowTemplate,
};
use quickport_render::GraphicsPort;
use slotmap::SlotMap;
use tracing::{debug, error, info};

use super::managed_window::Window;
use super::native_window::Platform;
use crate::dialog::{DialogItem, RenderEnv};

/// Where an item lives: its window and its 0-based position there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ItemSlot {
    window: WindowKey,
    index: usize,
}

/// Registry of all toolbox windows and their items.
#[derive(Debug, Default)]
pub struct WindowManager {
    windows: SlotMap<WindowKey, Window>,
    by_handle: HashMap<WindowHandle, WindowKey>,
    by_platform: HashMap<PlatformWindowId, WindowKey>,
    /// Every item of every registered window.
    items: HashMap<ItemHandle, ItemSlot>,
    handles: HandleAllocator,
    /// Window whose port is current.
    active_port: Option<WindowHandle>,
}

impl WindowManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create, initialize and register a window.
    ///
    /// `items` is `None` for a plain window and the decoded item list for a
    /// dialog. Visible windows get one background-only render pass.
    ///
    /// # Errors
    ///
    /// Fails if the native window or its canvas cannot be created. Nothing is
    /// registered in that case.
    pub fn create_window(
        &mut self,
        template: &WindowTemplate,
        items: Option<&[ItemTemplate]>,
        default_port: &GraphicsPort,
        platform: &mut dyn Platform,
        env: &mut RenderEnv<'_>,
    ) -> ToolboxResult<WindowHandle> {
        if let Some(templates) = items {
            i16::try_from(templates.len()).map_err(|_| ToolboxError::TooManyItems(templates.len()))?;
        }

        let handle = self.handles.allocate_window()?;
        let items = match items {
            Some(templates) => {
                let mut built = Vec::with_capacity(templates.len());
                for (index, template) in templates.iter().enumerate() {
                    let item_no = i16::try_from(index + 1).map_err(|_| ToolboxError::TooManyItems(templates.len()))?;
                    built.push(DialogItem::new(self.handles.allocate_item()?, item_no, template));
                }
                Some(built)
            }
            None => None,
        };

        let mut window = Window::new(handle, template, items, default_port);
        window.init(platform)?;
        if template.visible {
            if let Err(err) = window.show(env) {
                error!(target: targets::WINDOW, window = %handle, %err, "initial render failed");
            }
        }

        let platform_id = window.platform_id();
        let item_handles: Vec<ItemHandle> = window.items().iter().map(DialogItem::handle).collect();
        let key = self.windows.insert(window);
        self.by_handle.insert(handle, key);
        if let Some(id) = platform_id {
            self.by_platform.insert(id, key);
        }
        for (index, item) in item_handles.into_iter().enumerate() {
            self.items.insert(item, ItemSlot { window: key, index });
        }

        info!(target: targets::WINDOW, window = %handle, ?platform_id, "window registered");
        Ok(handle)
    }

    /// Unregister and release a window and all of its items.
    ///
    /// Items leave the registry before the window does. If the window's port
    /// was current, the active port resets to the default port.
    pub fn destroy_window(&mut self, handle: WindowHandle) -> ToolboxResult<()> {
        let key = *self
            .by_handle
            .get(&handle)
            .ok_or(ToolboxError::WindowNotFound(handle))?;

        if let Some(window) = self.windows.get(key) {
            for item in window.items() {
                self.items.remove(&item.handle());
            }
            if let Some(id) = window.platform_id() {
                self.by_platform.remove(&id);
            }
        }
        self.by_handle.remove(&handle);
        let released = self.windows.remove(key);

        if self.active_port == Some(handle) {
            self.active_port = None;
            debug!(target: targets::WINDOW, window = %handle, "active port reset to default");
        }
        info!(target: targets::WINDOW, window = %handle, released = released.is_some(), "window destroyed");
        Ok(())
    }

    pub fn contains(&self, handle: WindowHandle) -> bool {
        self.by_handle.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn window(&self, handle: WindowHandle) -> ToolboxResult<&Window> {
        self.by_handle
            .get(&handle)
            .and_then(|key| self.windows.get(*key))
            .ok_or(ToolboxError::WindowNotFound(handle))
    }

    pub fn window_mut(&mut self, handle: WindowHandle) -> ToolboxResult<&mut Window> {
        self.by_handle
            .get(&handle)
            .and_then(|key| self.windows.get_mut(*key))
            .ok_or(ToolboxError::WindowNotFound(handle))
    }

    /// The window an inbound event came from.
    pub fn window_for_platform_id(&self, id: PlatformWindowId) -> ToolboxResult<&Window> {
        self.by_platform
            .get(&id)
            .and_then(|key| self.windows.get(*key))
            .ok_or(ToolboxError::PlatformWindowNotFound(id))
    }

    pub fn window_for_platform_id_mut(&mut self, id: PlatformWindowId) -> ToolboxResult<&mut Window> {
        self.by_platform
            .get(&id)
            .and_then(|key| self.windows.get_mut(*key))
            .ok_or(ToolboxError::PlatformWindowNotFound(id))
    }

    /// Resolve an item handle.
    pub fn dialog_item(&self, handle: ItemHandle) -> ToolboxResult<&DialogItem> {
        let slot = self.items.get(&handle).ok_or(ToolboxError::ItemNotFound(handle))?;
        self.windows
            .get(slot.window)
            .and_then(|window| window.item(slot.index))
            .ok_or(ToolboxError::ItemNotFound(handle))
    }

    pub fn dialog_item_mut(&mut self, handle: ItemHandle) -> ToolboxResult<&mut DialogItem> {
        let slot = *self.items.get(&handle).ok_or(ToolboxError::ItemNotFound(handle))?;
        self.windows
            .get_mut(slot.window)
            .and_then(|window| window.item_mut(slot.index))
            .ok_or(ToolboxError::ItemNotFound(handle))
    }

    /// The window owning an item.
    pub fn item_owner_mut(&mut self, handle: ItemHandle) -> ToolboxResult<&mut Window> {
        let slot = *self.items.get(&handle).ok_or(ToolboxError::ItemNotFound(handle))?;
        self.windows
            .get_mut(slot.window)
            .ok_or(ToolboxError::ItemNotFound(handle))
    }

    /// Item `item_no` (1-based) of a dialog.
    pub fn dialog_item_at(&self, window: WindowHandle, item_no: i16) -> ToolboxResult<&DialogItem> {
        let win = self.window(window)?;
        if !win.is_dialog() {
            return Err(ToolboxError::NotADialog(window));
        }
        usize::try_from(item_no)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| win.item(index))
            .ok_or(ToolboxError::ItemIndexOutOfRange {
                window,
                item_no,
                count: win.item_count(),
            })
    }

    /// Every window, in no particular order.
    pub fn windows_mut(&mut self) -> impl Iterator<Item = &mut Window> {
        self.windows.values_mut()
    }

    pub fn active_port(&self) -> Option<WindowHandle> {
        self.active_port
    }

    /// Make a window's port current, or the default port with `None`.
    pub fn set_active_port(&mut self, handle: Option<WindowHandle>) -> ToolboxResult<()> {
        if let Some(handle) = handle {
            if !self.contains(handle) {
                return Err(ToolboxError::WindowNotFound(handle));
            }
        }
        self.active_port = handle;
        Ok(())
    }

    /// The window whose port is current, if any.
    pub fn active_window_mut(&mut self) -> Option<&mut Window> {
        let handle = self.active_port?;
        self.window_mut(handle).ok()
    }
}
