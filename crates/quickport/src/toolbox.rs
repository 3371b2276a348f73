//! The toolbox-shaped call surface.
//!
//! [`Toolbox`] owns the window registry, the platform backend, the resource
//! source and the text rasterizer, and exposes them through calls named
//! after their toolbox counterparts (`GetNewDialog` is
//! [`get_new_dialog`](Toolbox::get_new_dialog), `DialogSelect` is
//! [`dialog_select`](Toolbox::dialog_select), and so on).
//!
//! Drawing calls such as [`line_to`](Toolbox::line_to) act on the active
//! port. The active port is a single slot: either a window's port, selected
//! with [`set_port`](Toolbox::set_port), or the default port new windows
//! inherit their drawing settings from.
//!
//! Failures are logged and returned. Nothing here panics on bad handles.

use std::time::Duration;

use quickport_core::logging::targets;
use quickport_core::{
    ItemHandle, ItemTemplate, ResourceSource, ToolboxConfig, ToolboxError, ToolboxEvent,
    ToolboxResult, WindowHandle, WindowTemplate,
};
use quickport_render::{
    CosmicTextRasterizer, FontTable, GraphicsPort, Point, Rect, RgbColor, Size, TextFace,
    TextRasterizer, TextStyle,
};
use tracing::{debug, error, info, warn};

use crate::dialog::{self, DialogOutcome, ParamText, RenderEnv};
use crate::window::{Platform, Window, WindowManager};

/// What `GetDialogItem` reports for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogItemInfo {
    /// `itemType`, including the disable flag.
    pub type_code: i16,
    pub handle: ItemHandle,
    /// Bounds in the dialog's content coordinates.
    pub bounds: Rect,
}

/// One toolbox instance: every window, the active port and the collaborators
/// they draw with.
pub struct Toolbox<P: Platform> {
    config: ToolboxConfig,
    platform: P,
    resources: Box<dyn ResourceSource>,
    raster: Box<dyn TextRasterizer>,
    fonts: FontTable,
    windows: WindowManager,
    default_port: GraphicsPort,
    params: ParamText,
}

impl<P: Platform> Toolbox<P> {
    /// Build a toolbox around `platform`. The font table comes from the
    /// configuration.
    pub fn new(
        config: ToolboxConfig,
        platform: P,
        resources: impl ResourceSource + 'static,
        raster: impl TextRasterizer + 'static,
    ) -> Self {
        let mut fonts = FontTable::new(config.default_font.family.clone(), config.default_font.size);
        for mapping in &config.fonts {
            fonts.insert(mapping.id, mapping.family.clone());
        }
        let mut default_port = GraphicsPort::default();
        default_port.text_size = config.default_font.size;

        Self {
            config,
            platform,
            resources: Box::new(resources),
            raster: Box::new(raster),
            fonts,
            windows: WindowManager::new(),
            default_port,
            params: ParamText::new(),
        }
    }

    /// Build a toolbox that shapes text with the system fonts, plus any font
    /// files the configuration names.
    pub fn with_system_fonts(
        config: ToolboxConfig,
        platform: P,
        resources: impl ResourceSource + 'static,
    ) -> Self {
        let mut raster = CosmicTextRasterizer::new();
        for mapping in &config.fonts {
            let Some(path) = &mapping.path else {
                continue;
            };
            match raster.load_font_file(path) {
                Ok(()) => debug!(target: targets::CANVAS, id = mapping.id, path = %path.display(), "font loaded"),
                Err(err) => warn!(target: targets::CANVAS, id = mapping.id, %err, "failed to load font"),
            }
        }
        Self::new(config, platform, resources, raster)
    }

    pub fn config(&self) -> &ToolboxConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn windows(&self) -> &WindowManager {
        &self.windows
    }

    pub fn fonts(&self) -> &FontTable {
        &self.fonts
    }

    pub fn params(&self) -> &ParamText {
        &self.params
    }

    /// The registry, the render collaborators and the platform, borrowed
    /// side by side.
    fn split(&mut self) -> (&mut WindowManager, RenderEnv<'_>, &mut P) {
        let env = RenderEnv {
            resources: self.resources.as_ref(),
            raster: self.raster.as_mut(),
            fonts: &self.fonts,
            params: &self.params,
        };
        (&mut self.windows, env, &mut self.platform)
    }

    /// Run `op` against the active port's window.
    fn with_active_window<T>(
        &mut self,
        call: &'static str,
        op: impl FnOnce(&mut Window, &mut RenderEnv<'_>) -> ToolboxResult<T>,
    ) -> ToolboxResult<T> {
        let (windows, mut env, _) = self.split();
        let result = match windows.active_window_mut() {
            Some(window) => op(window, &mut env),
            None => Err(ToolboxError::NoActivePort),
        };
        if let Err(err) = &result {
            warn!(target: targets::WINDOW, call, %err, "drawing call had no effect");
        }
        result
    }

    fn create(&mut self, template: &WindowTemplate, items: Option<&[ItemTemplate]>) -> ToolboxResult<WindowHandle> {
        let default_port = self.default_port.clone();
        let (windows, mut env, platform) = self.split();
        windows
            .create_window(template, items, &default_port, platform, &mut env)
            .inspect_err(|err| {
                error!(target: targets::WINDOW, title = %template.title, %err, "window creation failed");
            })
    }

    // ------------------------------------------------------------------
    // Windows
    // ------------------------------------------------------------------

    /// `GetNewWindow`: create a plain window from a `WIND` template.
    pub fn get_new_window(&mut self, template_id: i16) -> ToolboxResult<WindowHandle> {
        let template = self.resources.window_template(template_id).inspect_err(|err| {
            error!(target: targets::RESOURCES, template_id, %err, "GetNewWindow failed");
        })?;
        self.create(&template, None)
    }

    /// `GetNewDialog`: create a dialog from a `DLOG` template and its item
    /// list.
    pub fn get_new_dialog(&mut self, dialog_id: i16) -> ToolboxResult<WindowHandle> {
        let template = self.resources.dialog_template(dialog_id).inspect_err(|err| {
            error!(target: targets::RESOURCES, dialog_id, %err, "GetNewDialog failed");
        })?;
        let items = match template.item_list {
            Some(list_id) => self.resources.item_list(list_id).inspect_err(|err| {
                error!(target: targets::RESOURCES, dialog_id, list_id, %err, "GetNewDialog failed");
            })?,
            None => Vec::new(),
        };
        self.create(&template, Some(&items))
    }

    /// `DisposeWindow` / `DisposeDialog`.
    ///
    /// # Errors
    ///
    /// Disposing an unknown or already disposed window is a caller bug and
    /// returns [`ToolboxError::WindowNotFound`].
    pub fn dispose_window(&mut self, window: WindowHandle) -> ToolboxResult<()> {
        self.windows.destroy_window(window).inspect_err(|err| {
            error!(target: targets::WINDOW, %window, %err, "DisposeWindow on a window that does not exist");
        })
    }

    /// `MoveWindow`: place the content area's top-left corner at global
    /// `(h, v)`.
    pub fn move_window(&mut self, window: WindowHandle, h: i32, v: i32) -> ToolboxResult<()> {
        self.windows.window_mut(window)?.move_to(h, v);
        Ok(())
    }

    /// `SizeWindow`. Visible windows are redrawn at the new size.
    pub fn size_window(&mut self, window: WindowHandle, width: u32, height: u32) -> ToolboxResult<()> {
        let (windows, mut env, _) = self.split();
        let win = windows.window_mut(window)?;
        win.resize(width, height)?;
        win.render(&mut env, true)
    }

    /// `ShowWindow`.
    pub fn show_window(&mut self, window: WindowHandle) -> ToolboxResult<()> {
        let (windows, mut env, _) = self.split();
        windows.window_mut(window)?.show(&mut env)
    }

    /// `HideWindow`.
    pub fn hide_window(&mut self, window: WindowHandle) -> ToolboxResult<()> {
        self.windows.window_mut(window)?.hide();
        Ok(())
    }

    /// `DrawDialog`: redraw the background and every item, then present.
    pub fn draw_dialog(&mut self, window: WindowHandle) -> ToolboxResult<()> {
        let (windows, mut env, _) = self.split();
        windows.window_mut(window)?.render(&mut env, true)
    }

    // ------------------------------------------------------------------
    // Dialog items
    // ------------------------------------------------------------------

    /// `GetDialogItem`: type code, handle and bounds of item `item_no`
    /// (1-based).
    pub fn get_dialog_item(&self, window: WindowHandle, item_no: i16) -> ToolboxResult<DialogItemInfo> {
        let item = self.windows.dialog_item_at(window, item_no).inspect_err(|err| {
            error!(target: targets::DIALOG, %window, item_no, %err, "GetDialogItem failed");
        })?;
        Ok(DialogItemInfo {
            type_code: item.type_code(),
            handle: item.handle(),
            bounds: item.bounds(),
        })
    }

    /// `GetDialogItemText`.
    pub fn get_dialog_item_text(&self, item: ItemHandle) -> ToolboxResult<String> {
        Ok(self.windows.dialog_item(item)?.text().to_owned())
    }

    /// `SetDialogItemText`. The owning window is redrawn if it is visible.
    pub fn set_dialog_item_text(&mut self, item: ItemHandle, text: &str) -> ToolboxResult<()> {
        let (windows, mut env, _) = self.split();
        windows.dialog_item_mut(item)?.set_text(text);
        let window = windows.item_owner_mut(item)?;
        if window.is_visible() {
            window.render(&mut env, true)?;
        }
        Ok(())
    }

    /// `ParamText`: set the `^0`..`^3` substitutions. Every text-bearing
    /// item redraws on its next render.
    pub fn param_text<S: AsRef<str>>(&mut self, params: [S; 4]) {
        self.params.set(params);
        for window in self.windows.windows_mut() {
            for index in 0..window.item_count() {
                if let Some(item) = window.item_mut(index).filter(|item| item.kind().has_text()) {
                    item.mark_dirty();
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// `WaitNextEvent`: the next platform event, or a null event once
    /// `timeout` passes.
    pub fn wait_next_event(&mut self, timeout: Duration) -> ToolboxEvent {
        self.platform.poll_event(timeout).unwrap_or_else(ToolboxEvent::null)
    }

    /// `IsDialogEvent`.
    pub fn is_dialog_event(&self, event: &ToolboxEvent) -> bool {
        dialog::is_dialog_event(&self.windows, event)
    }

    /// `DialogSelect`.
    pub fn dialog_select(&mut self, event: &ToolboxEvent) -> DialogOutcome {
        let Self {
            config,
            windows,
            resources,
            raster,
            fonts,
            params,
            ..
        } = self;
        let mut env = RenderEnv {
            resources: resources.as_ref(),
            raster: raster.as_mut(),
            fonts,
            params,
        };
        dialog::dialog_select(windows, &mut env, config, event)
    }

    // ------------------------------------------------------------------
    // Ports
    // ------------------------------------------------------------------

    /// `SetPort`: make a window's port current, or the default port with
    /// `None`.
    pub fn set_port(&mut self, window: Option<WindowHandle>) -> ToolboxResult<()> {
        self.windows.set_active_port(window)
    }

    /// `GetPort`: `None` while the default port is current.
    pub fn get_port(&self) -> Option<WindowHandle> {
        self.windows.active_port()
    }

    /// The current port's drawing state.
    pub fn port(&self) -> &GraphicsPort {
        self.windows
            .active_port()
            .and_then(|handle| self.windows.window(handle).ok())
            .map_or(&self.default_port, Window::port)
    }

    pub fn port_mut(&mut self) -> &mut GraphicsPort {
        match self.windows.active_window_mut() {
            Some(window) => window.port_mut(),
            None => &mut self.default_port,
        }
    }

    /// `ForeColor` with a classic color constant.
    pub fn fore_color(&mut self, constant: i32) -> bool {
        self.port_mut().set_fore_color_constant(constant)
    }

    /// `BackColor` with a classic color constant.
    pub fn back_color(&mut self, constant: i32) -> bool {
        self.port_mut().set_back_color_constant(constant)
    }

    pub fn rgb_fore_color(&mut self, color: RgbColor) {
        self.port_mut().fore_color = color;
    }

    pub fn rgb_back_color(&mut self, color: RgbColor) {
        self.port_mut().back_color = color;
    }

    pub fn text_font(&mut self, font_id: i16) {
        self.port_mut().text_font = font_id;
    }

    pub fn text_size(&mut self, size: u16) {
        self.port_mut().text_size = size;
    }

    pub fn text_face(&mut self, face: TextFace) {
        self.port_mut().text_face = face;
    }

    /// `BackPixPat`: tile a `ppat` behind the current port's window.
    pub fn back_pix_pat(&mut self, pattern_id: i16) -> ToolboxResult<()> {
        let pattern = self.resources.pixel_pattern(pattern_id).inspect_err(|err| {
            error!(target: targets::RESOURCES, pattern_id, %err, "BackPixPat failed");
        })?;
        self.port_mut().back_pattern = Some(pattern);
        Ok(())
    }

    /// `PenPixPat`: lines take the pattern's first pixel as their color.
    pub fn pen_pix_pat(&mut self, pattern_id: i16) -> ToolboxResult<()> {
        let pattern = self.resources.pixel_pattern(pattern_id).inspect_err(|err| {
            error!(target: targets::RESOURCES, pattern_id, %err, "PenPixPat failed");
        })?;
        self.port_mut().pen_pattern = Some(pattern);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Drawing into the current port
    // ------------------------------------------------------------------

    /// `MoveTo`: set the pen location.
    pub fn move_to(&mut self, h: i32, v: i32) {
        self.port_mut().pen_location = Point::new(h, v);
    }

    /// `LineTo`: draw from the pen to `(h, v)` and leave the pen there.
    pub fn line_to(&mut self, h: i32, v: i32) -> ToolboxResult<()> {
        self.with_active_window("LineTo", |window, _| {
            let from = window.port().pen_location;
            let to = Point::new(h, v);
            let color = window.port().pen_color();
            window.canvas_mut()?.draw_line(from, to, color)?;
            window.port_mut().pen_location = to;
            window.sync()
        })
    }

    /// `DrawPicture`: draw a `PICT` scaled into `dest`.
    pub fn draw_picture(&mut self, picture_id: i16, dest: Rect) -> ToolboxResult<()> {
        self.with_active_window("DrawPicture", |window, env| {
            let picture = env.resources.picture(picture_id)?;
            window.canvas_mut()?.draw_rgba_picture(&picture, dest)?;
            window.sync()
        })
    }

    /// `PlotCIcon`: draw a `cicn` scaled into `dest`.
    pub fn plot_icon(&mut self, icon_id: i16, dest: Rect) -> ToolboxResult<()> {
        self.with_active_window("PlotCIcon", |window, env| {
            let icon = env.resources.color_icon(icon_id)?;
            window.canvas_mut()?.draw_rgba_picture(&icon, dest)?;
            window.sync()
        })
    }

    /// `DrawString`: draw `text` at the pen and advance the pen past it.
    pub fn draw_string(&mut self, text: &str) -> ToolboxResult<()> {
        self.with_active_window("DrawString", |window, env| {
            let style = TextStyle::from_port(window.port(), env.fonts);
            let pen = window.port().pen_location;
            let width = window.canvas_mut()?.draw_text_at(env.raster, &style, text, pen)?;
            window.port_mut().pen_location = pen.offset(i32::try_from(width).unwrap_or(i32::MAX), 0);
            window.sync()
        })
    }

    /// `StringWidth` in the current port's font.
    pub fn string_width(&mut self, text: &str) -> u32 {
        let font = self.fonts.resolve(self.port());
        self.raster.measure(text, &font)
    }

    // ------------------------------------------------------------------
    // Display
    // ------------------------------------------------------------------

    /// `GetPrimaryDisplayProperties`: the primary display's size. Falls back
    /// to the configured size, then to `(0, 0)`.
    pub fn primary_display_size(&mut self) -> Size {
        if let Some(size) = self.platform.primary_display_size() {
            return size;
        }
        if let Some((width, height)) = self.config.display_fallback {
            info!(target: targets::PLATFORM, width, height, "using configured display size");
            return Size::new(width, height);
        }
        error!(target: targets::PLATFORM, "primary display size unavailable");
        Size::ZERO
    }
}

impl<P: Platform + std::fmt::Debug> std::fmt::Debug for Toolbox<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolbox")
            .field("platform", &self.platform)
            .field("windows", &self.windows)
            .field("active_port", &self.windows.active_port())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeadlessPlatform;
    use quickport_core::{DialogItemKind, ResourceTable};
    use quickport_render::{BoxGlyphRasterizer, Picture, PixelPattern};

    fn toolbox(resources: ResourceTable) -> Toolbox<HeadlessPlatform> {
        Toolbox::new(
            ToolboxConfig::default(),
            HeadlessPlatform::new(),
            resources,
            BoxGlyphRasterizer::new(),
        )
    }

    fn resources() -> ResourceTable {
        ResourceTable::new()
            .with_window(128, WindowTemplate::new(Rect::new(0, 0, 60, 80), "Plain"))
            .with_dialog(
                200,
                WindowTemplate::new(Rect::new(0, 0, 100, 200), "Dialog").with_item_list(200),
            )
            .with_item_list(
                200,
                vec![
                    ItemTemplate::new(DialogItemKind::Button, Rect::new(60, 120, 80, 180)).with_text("OK"),
                    ItemTemplate::new(DialogItemKind::StaticText, Rect::new(10, 10, 30, 190))
                        .with_text("Hello ^0")
                        .disabled(),
                    ItemTemplate::new(DialogItemKind::EditText, Rect::new(35, 10, 55, 190)),
                ],
            )
            .with_picture(300, Picture::solid(4, 4, RgbColor::RED))
            .with_pixel_pattern(400, PixelPattern::solid(RgbColor::GREEN))
    }

    #[test]
    fn test_get_dialog_item() {
        let mut tb = toolbox(resources());
        let dialog = tb.get_new_dialog(200).unwrap();

        let info = tb.get_dialog_item(dialog, 2).unwrap();
        assert_eq!(info.type_code, 8 | 128);
        assert_eq!(info.bounds, Rect::new(10, 10, 30, 190));
        assert_eq!(tb.get_dialog_item_text(info.handle).unwrap(), "Hello ^0");

        let err = tb.get_dialog_item(dialog, 5).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_set_dialog_item_text_redraws() {
        let mut tb = toolbox(resources());
        let dialog = tb.get_new_dialog(200).unwrap();
        let item = tb.get_dialog_item(dialog, 3).unwrap().handle;

        tb.set_dialog_item_text(item, "abc").unwrap();
        assert_eq!(tb.get_dialog_item_text(item).unwrap(), "abc");
        assert!(!tb.windows().dialog_item(item).unwrap().is_dirty());
    }

    #[test]
    fn test_param_text_invalidates_text_items() {
        let mut tb = toolbox(resources());
        let dialog = tb.get_new_dialog(200).unwrap();
        tb.draw_dialog(dialog).unwrap();

        tb.param_text(["World", "", "", ""]);
        let window = tb.windows().window(dialog).unwrap();
        assert!(window.items()[0].is_dirty());
        assert!(window.items()[1].is_dirty());
        assert!(window.items()[2].is_dirty());
        assert_eq!(tb.params().get(0), Some("World"));
    }

    #[test]
    fn test_missing_resources_fail_cleanly() {
        let mut tb = toolbox(resources());
        assert!(matches!(tb.get_new_dialog(999), Err(ToolboxError::Resource(_))));
        assert!(matches!(tb.get_new_window(999), Err(ToolboxError::Resource(_))));
        assert!(tb.windows().is_empty());
    }

    #[test]
    fn test_dispose_twice_is_an_error() {
        let mut tb = toolbox(resources());
        let window = tb.get_new_window(128).unwrap();
        tb.dispose_window(window).unwrap();
        assert!(matches!(tb.dispose_window(window), Err(ToolboxError::WindowNotFound(_))));
    }

    #[test]
    fn test_line_to_uses_pen_and_moves_it() {
        let mut tb = toolbox(resources());
        let window = tb.get_new_window(128).unwrap();
        tb.set_port(Some(window)).unwrap();
        tb.rgb_fore_color(RgbColor::BLUE);
        tb.move_to(0, 5);
        tb.line_to(10, 5).unwrap();
        assert_eq!(tb.port().pen_location, Point::new(10, 5));

        let canvas = tb.windows().window(window).unwrap().canvas().unwrap();
        assert_eq!(canvas.pixel(Point::new(5, 5)).unwrap().0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_pen_pattern_colors_lines() {
        let mut tb = toolbox(resources());
        let window = tb.get_new_window(128).unwrap();
        tb.set_port(Some(window)).unwrap();
        tb.pen_pix_pat(400).unwrap();
        tb.move_to(0, 2);
        tb.line_to(20, 2).unwrap();
        let canvas = tb.windows().window(window).unwrap().canvas().unwrap();
        assert_eq!(canvas.pixel(Point::new(10, 2)).unwrap().0, [0, 255, 0, 255]);
    }

    #[test]
    fn test_drawing_without_a_window_port() {
        let mut tb = toolbox(resources());
        assert!(matches!(
            tb.draw_picture(300, Rect::new(0, 0, 4, 4)),
            Err(ToolboxError::NoActivePort)
        ));
        tb.move_to(3, 4);
        assert_eq!(tb.port().pen_location, Point::new(3, 4));
    }

    #[test]
    fn test_draw_string_advances_pen() {
        let mut tb = toolbox(resources());
        let window = tb.get_new_window(128).unwrap();
        tb.set_port(Some(window)).unwrap();
        tb.move_to(2, 2);
        let width = tb.string_width("abc");
        assert!(width > 0);
        tb.draw_string("abc").unwrap();
        assert_eq!(tb.port().pen_location, Point::new(2 + width as i32, 2));
    }

    #[test]
    fn test_dispose_resets_port_to_default() {
        let mut tb = toolbox(resources());
        let window = tb.get_new_window(128).unwrap();
        tb.set_port(Some(window)).unwrap();
        tb.text_size(18);
        assert_eq!(tb.port().text_size, 18);
        tb.dispose_window(window).unwrap();
        assert_eq!(tb.get_port(), None);
        assert_eq!(tb.port().text_size, 12);
    }

    #[test]
    fn test_primary_display_size_fallbacks() {
        let mut tb = toolbox(resources());
        assert_eq!(tb.primary_display_size(), Size::ZERO);

        let config = ToolboxConfig {
            display_fallback: Some((800, 600)),
            ..ToolboxConfig::default()
        };
        let mut tb = Toolbox::new(config, HeadlessPlatform::new(), resources(), BoxGlyphRasterizer::new());
        assert_eq!(tb.primary_display_size(), Size::new(800, 600));

        let platform = HeadlessPlatform::new().with_display_size(Size::new(1920, 1080));
        let mut tb = Toolbox::new(ToolboxConfig::default(), platform, resources(), BoxGlyphRasterizer::new());
        assert_eq!(tb.primary_display_size(), Size::new(1920, 1080));
    }

    #[test]
    fn test_wait_next_event_times_out_to_null() {
        let mut tb = toolbox(resources());
        let event = tb.wait_next_event(Duration::from_millis(1));
        assert!(event.is_null());
        assert!(!tb.is_dialog_event(&event));
    }
}
