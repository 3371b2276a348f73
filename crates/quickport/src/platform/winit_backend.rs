//! winit + softbuffer windowing backend.
//!
//! The toolbox drives its own loop through `WaitNextEvent`, so the winit
//! event loop is pumped on demand rather than handed control. Windows can
//! only be created from inside a winit callback: `create_window` parks the
//! attributes and pumps until `resumed` or `about_to_wait` builds the window.
//!
//! Positions and sizes are physical pixels throughout.

use std::collections::{HashMap, HashSet, VecDeque};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use quickport_core::logging::targets;
use quickport_core::{KeyCode, PlatformWindowId, ToolboxError, ToolboxEvent, ToolboxResult};
use quickport_render::{Point, PresentTarget, Rect, RenderError, RenderResult, RgbaImage, Size};
use softbuffer::{Context, Surface};
use tracing::{debug, error, trace, warn};
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize, Position};
use winit::event::{ElementState, Ime, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop, OwnedDisplayHandle};
use winit::keyboard::{Key, NamedKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window as WinitWindow, WindowAttributes, WindowButtons, WindowId, WindowLevel};

use crate::window::{NativeWindow, NativeWindowParts, Platform, WindowConfig};

/// How many times `create_window` pumps before giving up.
const CREATE_PUMP_ATTEMPTS: usize = 8;
const CREATE_PUMP_STEP: Duration = Duration::from_millis(16);

fn platform_id(id: WindowId) -> PlatformWindowId {
    PlatformWindowId(u64::from(id))
}

/// winit attributes for a toolbox window. Always hidden; the toolbox shows
/// the window after its first frame.
fn window_attributes(config: &WindowConfig) -> WindowAttributes {
    let kind = config.kind();
    let size = config.size();
    let origin = config.position();
    let mut buttons = WindowButtons::all();
    if !config.has_close_button() {
        buttons = buttons.difference(WindowButtons::CLOSE);
    }
    if !kind.is_resizable() {
        buttons = buttons.difference(WindowButtons::MAXIMIZE);
    }
    // Utility windows float above documents.
    let level = if kind.is_utility() {
        WindowLevel::AlwaysOnTop
    } else {
        WindowLevel::Normal
    };

    WinitWindow::default_attributes()
        .with_title(config.title())
        .with_inner_size(PhysicalSize::new(size.width.max(1), size.height.max(1)))
        .with_position(Position::Physical(PhysicalPosition::new(origin.h, origin.v)))
        .with_resizable(kind.is_resizable())
        .with_decorations(kind.has_decorations())
        .with_enabled_buttons(buttons)
        .with_window_level(level)
        .with_visible(false)
}

fn map_key(key: &Key) -> KeyCode {
    match key {
        Key::Named(named) => match named {
            NamedKey::Backspace => KeyCode::BACKSPACE,
            NamedKey::Tab => KeyCode::TAB,
            NamedKey::Enter => KeyCode::RETURN,
            NamedKey::Escape => KeyCode::ESCAPE,
            NamedKey::Delete => KeyCode::DELETE,
            NamedKey::F1 => KeyCode::F1,
            NamedKey::F2 => KeyCode::function(2).unwrap_or(KeyCode::NONE),
            NamedKey::F3 => KeyCode::function(3).unwrap_or(KeyCode::NONE),
            NamedKey::F4 => KeyCode::function(4).unwrap_or(KeyCode::NONE),
            NamedKey::F5 => KeyCode::function(5).unwrap_or(KeyCode::NONE),
            NamedKey::F6 => KeyCode::function(6).unwrap_or(KeyCode::NONE),
            NamedKey::F7 => KeyCode::function(7).unwrap_or(KeyCode::NONE),
            NamedKey::F8 => KeyCode::function(8).unwrap_or(KeyCode::NONE),
            NamedKey::F9 => KeyCode::function(9).unwrap_or(KeyCode::NONE),
            NamedKey::F10 => KeyCode::function(10).unwrap_or(KeyCode::NONE),
            NamedKey::F11 => KeyCode::function(11).unwrap_or(KeyCode::NONE),
            NamedKey::F12 => KeyCode::F12,
            NamedKey::Space => KeyCode::from_char(' '),
            _ => KeyCode::NONE,
        },
        Key::Character(text) => text.chars().next().map_or(KeyCode::NONE, KeyCode::from_char),
        _ => KeyCode::NONE,
    }
}

/// The part of the platform winit calls back into.
#[derive(Default)]
struct LoopState {
    pending: Option<WindowAttributes>,
    created: Option<Result<Arc<WinitWindow>, String>>,
    display_size: Option<Size>,
    events: VecDeque<ToolboxEvent>,
    cursors: HashMap<WindowId, Point>,
    /// Windows with an input method session; their text arrives as commits.
    ime_enabled: HashSet<WindowId>,
}

impl LoopState {
    fn create_pending(&mut self, event_loop: &ActiveEventLoop) {
        if self.display_size.is_none() {
            self.display_size = event_loop.primary_monitor().map(|monitor| {
                let size = monitor.size();
                Size::new(size.width, size.height)
            });
        }
        let Some(attrs) = self.pending.take() else {
            return;
        };
        self.created = Some(
            event_loop
                .create_window(attrs)
                .map(Arc::new)
                .map_err(|err| err.to_string()),
        );
    }

    fn cursor(&self, id: WindowId) -> Point {
        self.cursors.get(&id).copied().unwrap_or_default()
    }
}

impl ApplicationHandler for LoopState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.create_pending(event_loop);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.create_pending(event_loop);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let id = platform_id(window_id);
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursors.insert(
                    window_id,
                    Point::new(position.x as i32, position.y as i32),
                );
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                let position = self.cursor(window_id);
                self.events.push_back(ToolboxEvent::pointer_down(id, position));
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                let key = map_key(&event.logical_key);
                if key != KeyCode::NONE {
                    let position = self.cursor(window_id);
                    self.events.push_back(ToolboxEvent::key_down(id, key, position));
                }
                if !self.ime_enabled.contains(&window_id) {
                    if let Some(text) = event.text.filter(|text| !text.chars().any(char::is_control)) {
                        self.events.push_back(ToolboxEvent::text_input(id, text.as_str()));
                    }
                }
            }
            WindowEvent::Ime(Ime::Enabled) => {
                self.ime_enabled.insert(window_id);
            }
            WindowEvent::Ime(Ime::Disabled) => {
                self.ime_enabled.remove(&window_id);
            }
            WindowEvent::Ime(Ime::Commit(text)) => {
                self.events.push_back(ToolboxEvent::text_input(id, text));
            }
            WindowEvent::Focused(true) => {
                self.events.push_back(ToolboxEvent::activate(id));
            }
            WindowEvent::RedrawRequested => {
                self.events.push_back(ToolboxEvent::update(id));
            }
            WindowEvent::Destroyed => {
                self.cursors.remove(&window_id);
                self.ime_enabled.remove(&window_id);
            }
            other => {
                trace!(target: targets::PLATFORM, ?id, event = ?other, "ignored window event");
            }
        }
    }
}

/// A [`Platform`] backed by a winit event loop.
pub struct WinitPlatform {
    event_loop: EventLoop<()>,
    context: Option<Context<OwnedDisplayHandle>>,
    state: LoopState,
    exited: bool,
}

impl WinitPlatform {
    /// Open the display connection.
    ///
    /// # Errors
    ///
    /// Fails if winit cannot create an event loop, for example when no
    /// display is available or one already exists on this thread.
    pub fn new() -> ToolboxResult<Self> {
        let event_loop =
            EventLoop::new().map_err(|err| ToolboxError::WindowCreation(err.to_string()))?;
        Ok(Self {
            event_loop,
            context: None,
            state: LoopState::default(),
            exited: false,
        })
    }

    fn pump(&mut self, timeout: Duration) {
        if self.exited {
            return;
        }
        if let PumpStatus::Exit(code) = self.event_loop.pump_app_events(Some(timeout), &mut self.state) {
            warn!(target: targets::PLATFORM, code, "event loop exited");
            self.exited = true;
        }
    }

    fn context(&mut self) -> ToolboxResult<&Context<OwnedDisplayHandle>> {
        if self.context.is_none() {
            let context = Context::new(self.event_loop.owned_display_handle())
                .map_err(|err| ToolboxError::WindowCreation(err.to_string()))?;
            self.context = Some(context);
        }
        self.context
            .as_ref()
            .ok_or_else(|| ToolboxError::WindowCreation("softbuffer context unavailable".into()))
    }
}

impl Platform for WinitPlatform {
    fn create_window(&mut self, config: &WindowConfig) -> ToolboxResult<NativeWindowParts> {
        self.state.pending = Some(window_attributes(config));
        self.state.created = None;
        for _ in 0..CREATE_PUMP_ATTEMPTS {
            self.pump(CREATE_PUMP_STEP);
            if self.state.created.is_some() || self.exited {
                break;
            }
        }
        self.state.pending = None;

        let window = match self.state.created.take() {
            Some(Ok(window)) => window,
            Some(Err(reason)) => return Err(ToolboxError::WindowCreation(reason)),
            None => {
                return Err(ToolboxError::WindowCreation(
                    "event loop never reached a point where windows can be created".into(),
                ));
            }
        };

        let surface = Surface::new(self.context()?, Arc::clone(&window))
            .map_err(|err| ToolboxError::WindowCreation(err.to_string()))?;
        let id = platform_id(window.id());
        debug!(target: targets::PLATFORM, ?id, title = config.title(), "native window created");

        Ok(NativeWindowParts {
            window: Box::new(WinitNativeWindow {
                id,
                window: Arc::clone(&window),
            }),
            target: Box::new(SoftbufferTarget {
                window,
                surface,
                frame: Vec::new(),
            }),
        })
    }

    fn primary_display_size(&mut self) -> Option<Size> {
        if self.state.display_size.is_none() {
            self.pump(Duration::ZERO);
        }
        self.state.display_size
    }

    fn poll_event(&mut self, timeout: Duration) -> Option<ToolboxEvent> {
        if self.state.events.is_empty() {
            self.pump(timeout);
        }
        self.state.events.pop_front()
    }
}

impl std::fmt::Debug for WinitPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WinitPlatform")
            .field("queued_events", &self.state.events.len())
            .field("display_size", &self.state.display_size)
            .field("exited", &self.exited)
            .finish_non_exhaustive()
    }
}

struct WinitNativeWindow {
    id: PlatformWindowId,
    window: Arc<WinitWindow>,
}

impl NativeWindow for WinitNativeWindow {
    fn id(&self) -> PlatformWindowId {
        self.id
    }

    fn set_visible(&mut self, visible: bool) {
        self.window.set_visible(visible);
    }

    fn set_position(&mut self, h: i32, v: i32) {
        self.window.set_outer_position(PhysicalPosition::new(h, v));
    }

    fn request_inner_size(&mut self, size: Size) {
        // The granted size arrives later as a resize event; the canvas keeps
        // the requested size either way.
        let _ = self
            .window
            .request_inner_size(PhysicalSize::new(size.width, size.height));
    }

    fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    fn begin_text_input(&mut self, area: Rect) {
        self.window.set_ime_allowed(true);
        self.window.set_ime_cursor_area(
            PhysicalPosition::new(area.left, area.top),
            PhysicalSize::new(area.width(), area.height()),
        );
    }

    fn end_text_input(&mut self) {
        self.window.set_ime_allowed(false);
    }
}

/// Presents canvas frames into a native window through softbuffer.
struct SoftbufferTarget {
    window: Arc<WinitWindow>,
    surface: Surface<OwnedDisplayHandle, Arc<WinitWindow>>,
    /// Frame converted to softbuffer's `0RGB` layout.
    frame: Vec<u32>,
}

impl SoftbufferTarget {
    fn resize_surface(&mut self, width: u32, height: u32) -> RenderResult<()> {
        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return Err(RenderError::InvalidDimensions { width, height });
        };
        self.surface
            .resize(w, h)
            .map_err(|err| RenderError::Present(err.to_string()))
    }
}

impl PresentTarget for SoftbufferTarget {
    fn configure(&mut self, size: Size) -> RenderResult<()> {
        self.resize_surface(size.width, size.height)
    }

    fn present(&mut self, frame: &RgbaImage) -> RenderResult<()> {
        let (width, height) = frame.dimensions();
        self.resize_surface(width, height)?;

        self.frame.clear();
        self.frame.extend(frame.pixels().map(|px| {
            let [r, g, b, _] = px.0;
            (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
        }));

        let mut buffer = self
            .surface
            .buffer_mut()
            .map_err(|err| RenderError::Present(err.to_string()))?;
        if buffer.len() != self.frame.len() {
            error!(
                target: targets::PLATFORM,
                buffer = buffer.len(),
                frame = self.frame.len(),
                "surface size does not match frame"
            );
            return Err(RenderError::Present("surface size mismatch".into()));
        }
        buffer.copy_from_slice(&self.frame);
        self.window.pre_present_notify();
        buffer
            .present()
            .map_err(|err| RenderError::Present(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowKind;

    #[test]
    fn test_map_named_keys() {
        assert_eq!(map_key(&Key::Named(NamedKey::Backspace)), KeyCode::BACKSPACE);
        assert_eq!(map_key(&Key::Named(NamedKey::F12)), KeyCode::F12);
        assert_eq!(map_key(&Key::Named(NamedKey::F2)), KeyCode::function(2).unwrap());
        assert_eq!(map_key(&Key::Named(NamedKey::ArrowUp)), KeyCode::NONE);
    }

    #[test]
    fn test_map_character_keys() {
        assert_eq!(map_key(&Key::Character("5".into())), KeyCode::from_char('5'));
    }

    #[test]
    fn test_attributes_follow_config() {
        let config = WindowConfig::new("Prefs").with_bounds(Rect::new(40, 30, 240, 330));
        let attrs = window_attributes(&config);
        assert_eq!(attrs.title, "Prefs");
        assert!(!attrs.visible);
        assert_eq!(
            attrs.position,
            Some(Position::Physical(PhysicalPosition::new(30, 40)))
        );
        assert_eq!(config.position(), Point::new(30, 40));
    }

    #[test]
    fn test_plain_dialog_is_a_floating_borderless_window() {
        let config = WindowConfig::new("Alert").with_kind(WindowKind::PlainDialogBox);
        let attrs = window_attributes(&config);
        assert!(!attrs.decorations);
        assert!(!attrs.resizable);
        assert_eq!(attrs.window_level, WindowLevel::AlwaysOnTop);

        let attrs = window_attributes(&WindowConfig::new("Doc"));
        assert_eq!(attrs.window_level, WindowLevel::Normal);
        assert!(attrs.resizable);
    }
}
