//! A toolbox window: native window, canvas, port and dialog items.

use quickport_core::logging::targets;
use quickport_core::{
    DialogItemKind, ItemHandle, PlatformWindowId, ToolboxError, ToolboxResult, WindowHandle,
    WindowTemplate,
};
use quickport_render::{Canvas, GraphicsPort, Point, Rect, RenderError, Size};
use tracing::{debug, error, info, trace, warn};

use super::native_window::{NativeWindow, NativeWindowParts, Platform};
use super::window_config::WindowConfig;
use super::window_type::WindowKind;
use crate::dialog::{DialogItem, RenderEnv};

/// One toolbox window.
///
/// A window is created from a template, [`init`](Self::init)ialized against a
/// [`Platform`], and from then on composes frames into its onscreen canvas.
/// Dialogs additionally own their items; plain windows have none.
pub struct Window {
    handle: WindowHandle,
    /// Creation options from the template. Its bounds are the initial ones.
    config: WindowConfig,
    /// Content bounds in global coordinates.
    bounds: Rect,
    visible: bool,
    ref_con: i32,
    port: GraphicsPort,
    canvas: Option<Canvas>,
    native: Option<Box<dyn NativeWindow>>,
    items: Option<Vec<DialogItem>>,
    /// Focused edit text item. Always one of `items`.
    focused: Option<ItemHandle>,
}

impl Window {
    /// Build an uninitialized window. `items` is `None` for plain windows.
    pub fn new(
        handle: WindowHandle,
        template: &WindowTemplate,
        items: Option<Vec<DialogItem>>,
        default_port: &GraphicsPort,
    ) -> Self {
        let mut port = GraphicsPort::new(Rect::from_size(template.bounds.size()));
        port.inherit_from(default_port);
        Self {
            handle,
            config: WindowConfig::from_template(template),
            bounds: template.bounds,
            visible: false,
            ref_con: template.ref_con,
            port,
            canvas: None,
            native: None,
            items,
            focused: None,
        }
    }

    /// Create the native window and canvas, bind the items and pick the
    /// initial focus.
    ///
    /// # Errors
    ///
    /// Fails if the platform cannot create the window or the canvas cannot
    /// be allocated.
    pub fn init(&mut self, platform: &mut dyn Platform) -> ToolboxResult<()> {
        let config = self.config.clone().with_bounds(self.bounds);
        let NativeWindowParts { window, target } = platform.create_window(&config)?;

        let mut canvas = Canvas::new_onscreen(self.bounds.size(), target);
        canvas.init()?;
        self.canvas = Some(canvas);
        self.native = Some(window);

        let handle = self.handle;
        if let Some(items) = &mut self.items {
            for item in items.iter_mut() {
                if let Err(err) = item.bind(handle) {
                    error!(
                        target: targets::DIALOG,
                        window = %handle,
                        item = %item.handle(),
                        %err,
                        "failed to allocate dialog item cache"
                    );
                }
            }
        }

        let first_edit = self.items().iter().find(|item| item.kind() == DialogItemKind::EditText);
        if let Some(item) = first_edit.map(DialogItem::handle) {
            self.set_focused_item(item);
        }

        info!(
            target: targets::WINDOW,
            window = %self.handle,
            platform_id = ?self.platform_id(),
            title = %self.config.title(),
            items = self.item_count(),
            "window initialized"
        );
        Ok(())
    }

    #[inline]
    pub fn handle(&self) -> WindowHandle {
        self.handle
    }

    pub fn platform_id(&self) -> Option<PlatformWindowId> {
        self.native.as_ref().map(|native| native.id())
    }

    pub fn title(&self) -> &str {
        self.config.title()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.config.set_title(title);
        if let Some(native) = &mut self.native {
            native.set_title(self.config.title());
        }
    }

    #[inline]
    pub fn kind(&self) -> WindowKind {
        self.config.kind()
    }

    /// Content bounds in global coordinates.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn has_close_button(&self) -> bool {
        self.config.has_close_button()
    }

    #[inline]
    pub fn ref_con(&self) -> i32 {
        self.ref_con
    }

    pub fn port(&self) -> &GraphicsPort {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut GraphicsPort {
        &mut self.port
    }

    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    /// The onscreen canvas, for direct drawing into the window.
    pub fn canvas_mut(&mut self) -> ToolboxResult<&mut Canvas> {
        Ok(self.canvas.as_mut().ok_or(RenderError::NotInitialized)?)
    }

    /// Whether the window was created as a dialog.
    #[inline]
    pub fn is_dialog(&self) -> bool {
        self.items.is_some()
    }

    /// The window's items in declared order. Empty for plain windows.
    pub fn items(&self) -> &[DialogItem] {
        self.items.as_deref().unwrap_or(&[])
    }

    pub fn item_count(&self) -> usize {
        self.items().len()
    }

    /// Item by 0-based position.
    pub fn item(&self, index: usize) -> Option<&DialogItem> {
        self.items().get(index)
    }

    pub(crate) fn item_mut(&mut self, index: usize) -> Option<&mut DialogItem> {
        self.items.as_mut()?.get_mut(index)
    }

    pub fn item_by_handle(&self, handle: ItemHandle) -> Option<&DialogItem> {
        self.items().iter().find(|item| item.handle() == handle)
    }

    fn item_by_handle_mut(&mut self, handle: ItemHandle) -> Option<&mut DialogItem> {
        self.items.as_mut()?.iter_mut().find(|item| item.handle() == handle)
    }

    pub fn focused_item(&self) -> Option<ItemHandle> {
        self.focused
    }

    /// Compose a frame and present it. Hidden windows are skipped.
    ///
    /// The background (pattern or back color) is drawn first, then every
    /// non-text item, then every text item, each group in declared order.
    pub fn render(&mut self, env: &mut RenderEnv<'_>, render_items: bool) -> ToolboxResult<()> {
        if !self.visible {
            trace!(target: targets::WINDOW, window = %self.handle, "skipping render of hidden window");
            return Ok(());
        }
        let Window {
            items,
            canvas,
            port,
            ..
        } = self;
        let canvas = canvas.as_mut().ok_or(RenderError::NotInitialized)?;

        canvas.clear_window()?;
        match &port.back_pattern {
            Some(pattern) => canvas.draw_background(pattern)?,
            None => canvas.fill_rect(port.port_rect, port.back_color)?,
        }

        if render_items {
            if let Some(items) = items {
                for item in items.iter_mut().filter(|item| !item.kind().is_text()) {
                    item.render(env, port, canvas);
                }
                for item in items.iter_mut().filter(|item| item.kind().is_text()) {
                    item.render(env, port, canvas);
                }
            }
        }

        canvas.sync()?;
        Ok(())
    }

    /// Present whatever has been drawn directly into the canvas.
    pub fn sync(&mut self) -> ToolboxResult<()> {
        self.canvas_mut()?.sync()?;
        Ok(())
    }

    /// Make the window visible. The first pass draws only the background so
    /// stale item content never flashes on screen.
    pub fn show(&mut self, env: &mut RenderEnv<'_>) -> ToolboxResult<()> {
        self.visible = true;
        let rendered = self.render(env, false);
        if let Some(native) = &mut self.native {
            native.set_visible(true);
        }
        debug!(target: targets::WINDOW, window = %self.handle, "window shown");
        rendered
    }

    pub fn hide(&mut self) {
        self.visible = false;
        if let Some(native) = &mut self.native {
            native.set_visible(false);
        }
        debug!(target: targets::WINDOW, window = %self.handle, "window hidden");
    }

    /// Move the content area's top-left corner to global `(h, v)`.
    pub fn move_to(&mut self, h: i32, v: i32) {
        self.bounds = self.bounds.moved_to(Point::new(h, v));
        if let Some(native) = &mut self.native {
            native.set_position(h, v);
        }
        debug!(target: targets::WINDOW, window = %self.handle, h, v, "window moved");
    }

    /// Resize the content area, keeping the top-left corner.
    ///
    /// An empty size is ignored. If the canvas cannot be reallocated the
    /// window keeps its previous size.
    pub fn resize(&mut self, width: u32, height: u32) -> ToolboxResult<()> {
        let size = Size::new(width, height);
        if size.is_empty() {
            warn!(target: targets::WINDOW, window = %self.handle, width, height, "ignoring resize to an empty size");
            return Ok(());
        }
        if let Some(canvas) = &mut self.canvas {
            canvas.resize(size)?;
        }
        self.bounds = Rect::from_origin_size(self.bounds.top_left(), size);
        self.port.port_rect = Rect::from_size(size);
        if let Some(native) = &mut self.native {
            native.request_inner_size(size);
        }
        debug!(target: targets::WINDOW, window = %self.handle, width, height, "window resized");
        Ok(())
    }

    /// Append committed text to `item` and redraw.
    pub fn handle_text_input(
        &mut self,
        env: &mut RenderEnv<'_>,
        text: &str,
        item: ItemHandle,
    ) -> ToolboxResult<()> {
        self.item_by_handle_mut(item)
            .ok_or(ToolboxError::ItemNotFound(item))?
            .append_text(text);
        self.render(env, true)
    }

    /// Remove the last character of `item` and redraw.
    pub fn delete_char(&mut self, env: &mut RenderEnv<'_>, item: ItemHandle) -> ToolboxResult<()> {
        self.item_by_handle_mut(item)
            .ok_or(ToolboxError::ItemNotFound(item))?
            .delete_char();
        self.render(env, true)
    }

    /// The first item in declared order containing `point`, optionally
    /// skipping disabled items.
    pub fn dialog_item_for_position(&self, point: Point, enabled_only: bool) -> Option<&DialogItem> {
        self.items()
            .iter()
            .find(|item| item.contains(point) && (!enabled_only || item.is_enabled()))
    }

    /// Every item containing `point`, enabled or not.
    pub fn dialog_items_at(&self, point: Point) -> impl Iterator<Item = &DialogItem> {
        self.items().iter().filter(move |item| item.contains(point))
    }

    /// Give `item` the text focus. Only edit text items of this window can
    /// take focus; anything else is ignored and `false` returned.
    pub fn set_focused_item(&mut self, item: ItemHandle) -> bool {
        let Some(area) = self
            .item_by_handle(item)
            .filter(|it| it.kind() == DialogItemKind::EditText)
            .map(DialogItem::bounds)
        else {
            debug!(target: targets::DIALOG, window = %self.handle, %item, "focus request ignored");
            return false;
        };
        if self.focused == Some(item) {
            return true;
        }
        self.focused = Some(item);
        if let Some(native) = &mut self.native {
            native.end_text_input();
            native.begin_text_input(area);
        }
        debug!(target: targets::DIALOG, window = %self.handle, %item, "focus moved");
        true
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        if self.focused.is_some() {
            if let Some(native) = &mut self.native {
                native.end_text_input();
            }
        }
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("handle", &self.handle)
            .field("title", &self.config.title())
            .field("kind", &self.config.kind())
            .field("bounds", &self.bounds)
            .field("visible", &self.visible)
            .field("items", &self.items)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::ParamText;
    use crate::platform::HeadlessPlatform;
    use quickport_core::{HandleAllocator, ItemTemplate, ResourceTable};
    use quickport_render::{BoxGlyphRasterizer, FontTable, PixelPattern, RgbColor};

    struct Env {
        resources: ResourceTable,
        raster: BoxGlyphRasterizer,
        fonts: FontTable,
        params: ParamText,
    }

    impl Env {
        fn new() -> Self {
            Self {
                resources: ResourceTable::new(),
                raster: BoxGlyphRasterizer::new(),
                fonts: FontTable::new("", 12),
                params: ParamText::new(),
            }
        }

        fn get(&mut self) -> RenderEnv<'_> {
            RenderEnv {
                resources: &self.resources,
                raster: &mut self.raster,
                fonts: &self.fonts,
                params: &self.params,
            }
        }
    }

    fn dialog(templates: &[ItemTemplate], platform: &mut HeadlessPlatform) -> Window {
        let mut alloc = HandleAllocator::new();
        let handle = alloc.allocate_window().unwrap();
        let items = templates
            .iter()
            .enumerate()
            .map(|(i, t)| DialogItem::new(alloc.allocate_item().unwrap(), i as i16 + 1, t))
            .collect();
        let template = WindowTemplate::new(Rect::new(40, 40, 140, 240), "Test");
        let mut window = Window::new(handle, &template, Some(items), &GraphicsPort::default());
        window.init(platform).unwrap();
        window
    }

    #[test]
    fn test_init_focuses_first_edit_text() {
        let mut platform = HeadlessPlatform::new();
        let window = dialog(
            &[
                ItemTemplate::new(DialogItemKind::StaticText, Rect::new(0, 0, 10, 50)).with_text("Name"),
                ItemTemplate::new(DialogItemKind::EditText, Rect::new(10, 0, 20, 50)),
                ItemTemplate::new(DialogItemKind::EditText, Rect::new(20, 0, 30, 50)),
            ],
            &mut platform,
        );
        assert_eq!(window.focused_item(), Some(window.items()[1].handle()));
        for item in window.items() {
            assert_eq!(item.owner(), Some(window.handle()));
        }

        let state = platform.window_state(window.platform_id().unwrap()).unwrap();
        assert_eq!(state.text_input, Some(Rect::new(10, 0, 20, 50)));
    }

    #[test]
    fn test_focus_rejects_non_edit_and_foreign_items() {
        let mut platform = HeadlessPlatform::new();
        let mut window = dialog(
            &[ItemTemplate::new(DialogItemKind::Button, Rect::new(0, 0, 10, 50))],
            &mut platform,
        );
        assert_eq!(window.focused_item(), None);
        let button = window.items()[0].handle();
        assert!(!window.set_focused_item(button));
        assert!(!window.set_focused_item(ItemHandle::from_raw(999)));
        assert_eq!(window.focused_item(), None);
    }

    #[test]
    fn test_hit_test_skips_disabled_when_asked() {
        let mut platform = HeadlessPlatform::new();
        let window = dialog(
            &[
                ItemTemplate::new(DialogItemKind::Button, Rect::new(0, 0, 40, 40)).disabled(),
                ItemTemplate::new(DialogItemKind::Button, Rect::new(20, 20, 60, 60)),
            ],
            &mut platform,
        );
        let point = Point::new(30, 30);
        assert_eq!(window.dialog_item_for_position(point, true).unwrap().item_no(), 2);
        assert_eq!(window.dialog_item_for_position(point, false).unwrap().item_no(), 1);
        assert_eq!(window.dialog_items_at(point).count(), 2);
        assert!(window.dialog_item_for_position(Point::new(90, 90), false).is_none());
    }

    #[test]
    fn test_hidden_window_does_not_render() {
        let mut platform = HeadlessPlatform::new();
        let mut env = Env::new();
        let mut window = dialog(
            &[ItemTemplate::new(DialogItemKind::StaticText, Rect::new(0, 0, 10, 50)).with_text("x")],
            &mut platform,
        );
        let probe = platform.frame_probe(window.platform_id().unwrap()).unwrap();

        window.render(&mut env.get(), true).unwrap();
        assert_eq!(probe.present_count(), 0);
        assert!(window.items()[0].is_dirty());

        window.show(&mut env.get()).unwrap();
        assert_eq!(probe.present_count(), 1);
        // The show pass leaves items alone.
        assert!(window.items()[0].is_dirty());

        window.render(&mut env.get(), true).unwrap();
        assert!(!window.items()[0].is_dirty());
    }

    #[test]
    fn test_background_pattern() {
        let mut platform = HeadlessPlatform::new();
        let mut env = Env::new();
        let mut window = dialog(&[], &mut platform);
        window.port_mut().back_pattern = Some(PixelPattern::solid(RgbColor::CYAN));
        window.show(&mut env.get()).unwrap();
        let probe = platform.frame_probe(window.platform_id().unwrap()).unwrap();
        assert_eq!(probe.last_frame().unwrap().get_pixel(5, 5).0, [0, 255, 255, 255]);
    }

    #[test]
    fn test_move_and_resize() {
        let mut platform = HeadlessPlatform::new();
        let mut window = dialog(&[], &mut platform);
        window.move_to(100, 200);
        assert_eq!(window.bounds(), Rect::new(200, 100, 300, 300));

        window.resize(50, 30).unwrap();
        assert_eq!(window.bounds(), Rect::new(200, 100, 230, 150));
        assert_eq!(window.canvas().unwrap().size(), Size::new(50, 30));
        assert_eq!(window.port().port_rect, Rect::new(0, 0, 30, 50));

        let state = platform.window_state(window.platform_id().unwrap()).unwrap();
        assert_eq!(state.position, Point::new(100, 200));
        assert_eq!(state.size, Size::new(50, 30));
    }

    #[test]
    fn test_template_options_reach_the_native_window() {
        let mut platform = HeadlessPlatform::new();
        let mut alloc = HandleAllocator::new();
        let mut template = WindowTemplate::new(Rect::new(10, 20, 60, 120), "Alert").with_proc_id(2);
        template.go_away = true;
        let mut window = Window::new(alloc.allocate_window().unwrap(), &template, None, &GraphicsPort::default());
        window.init(&mut platform).unwrap();

        assert_eq!(window.kind(), WindowKind::PlainDialogBox);
        assert!(window.has_close_button());
        let id = window.platform_id().unwrap();
        assert_eq!(platform.window_state(id).unwrap().title, "Alert");

        window.set_title("Warning");
        assert_eq!(window.title(), "Warning");
        assert_eq!(platform.window_state(id).unwrap().title, "Warning");
    }

    #[test]
    fn test_empty_resize_is_ignored() {
        let mut platform = HeadlessPlatform::new();
        let mut env = Env::new();
        let mut window = dialog(
            &[ItemTemplate::new(DialogItemKind::StaticText, Rect::new(0, 0, 10, 50)).with_text("x")],
            &mut platform,
        );
        window.show(&mut env.get()).unwrap();
        let before = window.bounds();

        window.resize(0, 50).unwrap();
        window.resize(50, 0).unwrap();
        assert_eq!(window.bounds(), before);
        assert_eq!(window.canvas().unwrap().size(), before.size());
        assert!(window.canvas().unwrap().is_initialized());
        window.render(&mut env.get(), true).unwrap();
    }

    #[test]
    fn test_text_input_and_delete() {
        let mut platform = HeadlessPlatform::new();
        let mut env = Env::new();
        let mut window = dialog(
            &[ItemTemplate::new(DialogItemKind::EditText, Rect::new(0, 0, 20, 80))],
            &mut platform,
        );
        window.show(&mut env.get()).unwrap();
        let item = window.focused_item().unwrap();

        window.handle_text_input(&mut env.get(), "ab", item).unwrap();
        assert_eq!(window.item_by_handle(item).unwrap().text(), "ab");
        assert!(!window.item_by_handle(item).unwrap().is_dirty());

        window.delete_char(&mut env.get(), item).unwrap();
        assert_eq!(window.item_by_handle(item).unwrap().text(), "a");
    }
}
