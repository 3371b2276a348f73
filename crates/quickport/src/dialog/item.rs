//! A single dialog item and its render cache.

use quickport_core::logging::targets;
use quickport_core::{
    DialogItemKind, ITEM_DISABLE, ItemHandle, ItemTemplate, ToolboxResult, WindowHandle,
};
use quickport_render::{Canvas, GraphicsPort, Point, Rect, RenderResult, Size, TextStyle};
use tracing::{error, trace, warn};

use super::RenderEnv;

/// Side of the check box / radio button square, in pixels.
const CHECK_BOX_SIZE: i32 = 12;
/// Gap between the check box square and its label.
const CHECK_BOX_GAP: i32 = 4;

/// One dialog item.
///
/// The item keeps its last rendering in a private offscreen canvas. Any
/// change that affects its appearance sets the dirty flag, and the next
/// [`render`](Self::render) redraws the cache before compositing it.
pub struct DialogItem {
    handle: ItemHandle,
    item_no: i16,
    kind: DialogItemKind,
    bounds: Rect,
    resource_id: i16,
    enabled: bool,
    text: String,
    dirty: bool,
    /// Owning window. Lookup only; never dereferenced directly.
    owner: Option<WindowHandle>,
    cache: Canvas,
    redraw_count: u64,
}

impl DialogItem {
    /// Create an item from its template. `item_no` is the 1-based position
    /// in the window's item list.
    pub fn new(handle: ItemHandle, item_no: i16, template: &ItemTemplate) -> Self {
        Self {
            handle,
            item_no,
            kind: template.kind,
            bounds: template.bounds,
            resource_id: template.resource_id,
            enabled: template.enabled,
            text: template.text.clone(),
            dirty: true,
            owner: None,
            cache: Canvas::new_offscreen(template.bounds.size()),
            redraw_count: 0,
        }
    }

    /// Attach the item to its window and allocate its cache.
    pub(crate) fn bind(&mut self, owner: WindowHandle) -> RenderResult<()> {
        self.owner = Some(owner);
        self.dirty = true;
        self.cache.init()
    }

    #[inline]
    pub fn handle(&self) -> ItemHandle {
        self.handle
    }

    #[inline]
    pub fn item_no(&self) -> i16 {
        self.item_no
    }

    #[inline]
    pub fn kind(&self) -> DialogItemKind {
        self.kind
    }

    /// Bounds relative to the window's content area.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[inline]
    pub fn resource_id(&self) -> i16 {
        self.resource_id
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn owner(&self) -> Option<WindowHandle> {
        self.owner
    }

    /// How many times the cache has been redrawn.
    #[inline]
    pub fn redraw_count(&self) -> u64 {
        self.redraw_count
    }

    /// The cached rendering.
    pub fn cache(&self) -> &Canvas {
        &self.cache
    }

    /// The `itemType` code, with the disable flag set for disabled items.
    pub fn type_code(&self) -> i16 {
        let code = self.kind.type_code();
        if self.enabled { code } else { code | ITEM_DISABLE }
    }

    pub fn contains(&self, point: Point) -> bool {
        self.bounds.contains(point)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            self.dirty = true;
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.dirty = true;
    }

    pub fn append_text(&mut self, text: &str) {
        self.text.push_str(text);
        self.dirty = true;
    }

    /// Remove the last character. Empty text is left alone.
    pub fn delete_char(&mut self) {
        if self.text.pop().is_some() {
            self.dirty = true;
        }
    }

    /// Redraw the cache. Failures are logged; the item is clean afterwards
    /// either way so a broken item is not retried every frame.
    pub fn update(&mut self, env: &mut RenderEnv<'_>, port: &GraphicsPort) {
        self.redraw_count += 1;
        if let Err(err) = self.redraw(env, port) {
            error!(
                target: targets::DIALOG,
                item = %self.handle,
                kind = %self.kind,
                resource_id = self.resource_id,
                %err,
                "failed to redraw dialog item"
            );
        }
        self.dirty = false;
    }

    /// Composite the cache onto `target` at the item's bounds, redrawing it
    /// first if dirty.
    pub fn render(&mut self, env: &mut RenderEnv<'_>, port: &GraphicsPort, target: &mut Canvas) {
        if self.dirty {
            self.update(env, port);
        }
        if let Err(err) = self.cache.render(target, Some(self.bounds)) {
            warn!(target: targets::DIALOG, item = %self.handle, %err, "failed to composite dialog item");
        }
    }

    fn redraw(&mut self, env: &mut RenderEnv<'_>, port: &GraphicsPort) -> ToolboxResult<()> {
        self.cache.clear()?;
        let local = Rect::from_size(self.bounds.size());
        let style = TextStyle::from_port(port, env.fonts);

        match self.kind {
            DialogItemKind::Picture => {
                let picture = env.resources.picture(self.resource_id)?;
                self.cache.draw_rgba_picture(&picture, local)?;
            }
            DialogItemKind::Icon => {
                let icon = env.resources.color_icon(self.resource_id)?;
                self.cache.draw_rgba_picture(&icon, local)?;
            }
            DialogItemKind::StaticText | DialogItemKind::EditText => {
                let text = env.params.expand(&self.text);
                self.cache.draw_text(env.raster, &style, &text, local)?;
            }
            DialogItemKind::Button => {
                self.cache.draw_rect(local, port.fore_color)?;
                let text = env.params.expand(&self.text);
                let width = self.cache.measure_text(env.raster, &style.font, &text) as i32;
                let line = style.font.line_height() as i32;
                // Centre the label.
                let origin = Point::new(
                    (local.width() as i32 - width).max(0) / 2,
                    (local.height() as i32 - line).max(0) / 2,
                );
                let label = Rect::from_origin_size(origin, Size::new(width.max(0) as u32, line as u32))
                    .intersect(&local.inset(1, 1));
                if let Some(label) = label {
                    self.cache.draw_text(env.raster, &style, &text, label)?;
                }
            }
            DialogItemKind::CheckBox | DialogItemKind::RadioButton => {
                let side = CHECK_BOX_SIZE.min(local.height() as i32);
                let top = (local.height() as i32 - side) / 2;
                let square = Rect::new(top, 0, top + side, side);
                self.cache.draw_rect(square, port.fore_color)?;
                let text = env.params.expand(&self.text);
                let label = Rect::new(0, side + CHECK_BOX_GAP, local.bottom, local.right);
                self.cache.draw_text(env.raster, &style, &text, label)?;
            }
            DialogItemKind::Control => {
                self.cache.draw_rect(local, port.fore_color)?;
            }
            DialogItemKind::UserItem => {
                trace!(target: targets::DIALOG, item = %self.handle, "user item left to the application");
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for DialogItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogItem")
            .field("handle", &self.handle)
            .field("item_no", &self.item_no)
            .field("kind", &self.kind)
            .field("bounds", &self.bounds)
            .field("enabled", &self.enabled)
            .field("text", &self.text)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}
