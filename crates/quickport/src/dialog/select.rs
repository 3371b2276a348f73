//! `IsDialogEvent` / `DialogSelect`.
//!
//! Each inbound event is classified on its own; the only state consulted is
//! the target window's focus. Branches are tried in this order and the first
//! one that applies decides the outcome:
//!
//! 1. The diagnostic key logs every item under the pointer, then evaluation
//!    continues.
//! 2. Backspace deletes from the focused item.
//! 3. Committed text is appended to the focused item.
//! 4. A pointer press hits the first enabled item under it; edit text items
//!    take focus.
//! 5. Anything else is unhandled.
//!
//! Events for unknown windows or for windows without items are unhandled,
//! never errors.

use quickport_core::logging::targets;
use quickport_core::{DialogItemKind, EventKind, KeyCode, ToolboxConfig, ToolboxEvent, WindowHandle};
use tracing::{debug, info, trace, warn};

use super::RenderEnv;
use crate::window::{Window, WindowManager};

/// Result of one `DialogSelect` step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    /// The event is not for dialog handling; keep waiting.
    Unhandled,
    /// The event changed dialog state without hitting an item.
    Consumed { window: WindowHandle },
    /// An enabled item was clicked.
    ItemHit { window: WindowHandle, item_no: i16 },
}

impl DialogOutcome {
    /// The toolbox's boolean result.
    pub fn is_handled(&self) -> bool {
        !matches!(self, Self::Unhandled)
    }

    /// `(dialog, itemHit)` for an item hit.
    pub fn item_hit(&self) -> Option<(WindowHandle, i16)> {
        match *self {
            Self::ItemHit { window, item_no } => Some((window, item_no)),
            _ => None,
        }
    }
}

/// Whether `event` belongs to a dialog window.
pub fn is_dialog_event(windows: &WindowManager, event: &ToolboxEvent) -> bool {
    if event.is_null() {
        return false;
    }
    event
        .window
        .and_then(|id| windows.window_for_platform_id(id).ok())
        .is_some_and(Window::is_dialog)
}

/// Run one step of dialog event handling.
pub fn dialog_select(
    windows: &mut WindowManager,
    env: &mut RenderEnv<'_>,
    config: &ToolboxConfig,
    event: &ToolboxEvent,
) -> DialogOutcome {
    let Some(platform_id) = event.window else {
        trace!(target: targets::DIALOG, kind = ?event.kind, "event without a window");
        return DialogOutcome::Unhandled;
    };
    let window = match windows.window_for_platform_id_mut(platform_id) {
        Ok(window) => window,
        Err(err) => {
            debug!(target: targets::DIALOG, %err, "event for unknown window");
            return DialogOutcome::Unhandled;
        }
    };
    if !window.is_dialog() {
        debug!(target: targets::DIALOG, window = %window.handle(), "event for a window without items");
        return DialogOutcome::Unhandled;
    }
    let handle = window.handle();

    if event.kind == EventKind::KeyDown && config.is_debug_key(event.key) {
        dump_items_at(window, event);
    }

    match event.kind {
        EventKind::KeyDown if event.key == KeyCode::BACKSPACE => {
            let Some(item) = window.focused_item() else {
                return DialogOutcome::Unhandled;
            };
            if let Err(err) = window.delete_char(env, item) {
                warn!(target: targets::DIALOG, window = %handle, %item, %err, "backspace failed");
            }
            DialogOutcome::Consumed { window: handle }
        }
        EventKind::TextInput => {
            let Some(item) = window.focused_item() else {
                debug!(target: targets::DIALOG, window = %handle, "text input with no focused item");
                return DialogOutcome::Unhandled;
            };
            if let Err(err) = window.handle_text_input(env, &event.text, item) {
                warn!(target: targets::DIALOG, window = %handle, %item, %err, "text input failed");
            }
            DialogOutcome::Consumed { window: handle }
        }
        EventKind::PointerDown => {
            let Some((item, item_no, kind)) = window
                .dialog_item_for_position(event.position, true)
                .map(|it| (it.handle(), it.item_no(), it.kind()))
            else {
                return DialogOutcome::Unhandled;
            };
            if kind == DialogItemKind::EditText {
                window.set_focused_item(item);
            }
            debug!(target: targets::DIALOG, window = %handle, item_no, "item hit");
            DialogOutcome::ItemHit {
                window: handle,
                item_no,
            }
        }
        other => {
            trace!(target: targets::DIALOG, window = %handle, kind = ?other, "event left to the caller");
            DialogOutcome::Unhandled
        }
    }
}

fn dump_items_at(window: &Window, event: &ToolboxEvent) {
    info!(
        target: targets::DIAGNOSTICS,
        window = %window.handle(),
        h = event.position.h,
        v = event.position.v,
        "dialog items under pointer"
    );
    for item in window.dialog_items_at(event.position) {
        info!(
            target: targets::DIAGNOSTICS,
            item_no = item.item_no(),
            handle = %item.handle(),
            kind = %item.kind(),
            enabled = item.is_enabled(),
            bounds = ?item.bounds(),
            text = item.text(),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::dialog::ParamText;
    use crate::platform::HeadlessPlatform;
    use quickport_core::{ItemTemplate, PlatformWindowId, ResourceTable, WindowTemplate};
    use quickport_render::{BoxGlyphRasterizer, FontTable, GraphicsPort, Point, Rect};

    struct Fixture {
        windows: WindowManager,
        platform: HeadlessPlatform,
        resources: ResourceTable,
        raster: BoxGlyphRasterizer,
        fonts: FontTable,
        params: ParamText,
        config: ToolboxConfig,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                windows: WindowManager::new(),
                platform: HeadlessPlatform::new(),
                resources: ResourceTable::new(),
                raster: BoxGlyphRasterizer::new(),
                fonts: FontTable::new("", 12),
                params: ParamText::new(),
                config: ToolboxConfig::default(),
            }
        }

        fn create(&mut self, items: Option<&[ItemTemplate]>) -> (WindowHandle, PlatformWindowId) {
            let mut env = RenderEnv {
                resources: &self.resources,
                raster: &mut self.raster,
                fonts: &self.fonts,
                params: &self.params,
            };
            let template = WindowTemplate::new(Rect::new(0, 0, 100, 200), "dlg");
            let handle = self
                .windows
                .create_window(&template, items, &GraphicsPort::default(), &mut self.platform, &mut env)
                .unwrap();
            let id = self.windows.window(handle).unwrap().platform_id().unwrap();
            (handle, id)
        }

        fn select(&mut self, event: &ToolboxEvent) -> DialogOutcome {
            let mut env = RenderEnv {
                resources: &self.resources,
                raster: &mut self.raster,
                fonts: &self.fonts,
                params: &self.params,
            };
            dialog_select(&mut self.windows, &mut env, &self.config, event)
        }
    }

    #[test]
    fn test_backspace_without_focus_is_unhandled() {
        let mut fx = Fixture::new();
        let items = [ItemTemplate::new(DialogItemKind::StaticText, Rect::new(0, 0, 20, 50)).with_text("Hi")];
        let (handle, id) = fx.create(Some(&items));

        let outcome = fx.select(&ToolboxEvent::key_down(id, KeyCode::BACKSPACE, Point::ZERO));
        assert_eq!(outcome, DialogOutcome::Unhandled);
        assert_eq!(fx.windows.window(handle).unwrap().items()[0].text(), "Hi");
    }

    #[test]
    fn test_backspace_with_focus_deletes() {
        let mut fx = Fixture::new();
        let items = [ItemTemplate::new(DialogItemKind::EditText, Rect::new(0, 0, 20, 50)).with_text("42")];
        let (handle, id) = fx.create(Some(&items));

        let outcome = fx.select(&ToolboxEvent::key_down(id, KeyCode::BACKSPACE, Point::ZERO));
        assert_eq!(outcome, DialogOutcome::Consumed { window: handle });
        assert!(outcome.item_hit().is_none());
        assert_eq!(fx.windows.window(handle).unwrap().items()[0].text(), "4");
    }

    #[test]
    fn test_text_input_goes_to_focused_item() {
        let mut fx = Fixture::new();
        let items = [
            ItemTemplate::new(DialogItemKind::StaticText, Rect::new(0, 0, 20, 50)).with_text("OK"),
            ItemTemplate::new(DialogItemKind::EditText, Rect::new(30, 0, 50, 50)),
        ];
        let (handle, id) = fx.create(Some(&items));

        let outcome = fx.select(&ToolboxEvent::text_input(id, "5"));
        assert!(outcome.is_handled());
        let window = fx.windows.window(handle).unwrap();
        assert_eq!(window.items()[1].text(), "5");
        assert!(!window.items()[1].is_dirty());
        assert_eq!(window.items()[0].text(), "OK");
    }

    #[test]
    fn test_text_input_without_focus_is_unhandled() {
        let mut fx = Fixture::new();
        let items = [ItemTemplate::new(DialogItemKind::Button, Rect::new(0, 0, 20, 50))];
        let (_, id) = fx.create(Some(&items));
        assert_eq!(fx.select(&ToolboxEvent::text_input(id, "x")), DialogOutcome::Unhandled);
    }

    #[test]
    fn test_pointer_hits_enabled_item_and_moves_focus() {
        let mut fx = Fixture::new();
        let items = [
            ItemTemplate::new(DialogItemKind::EditText, Rect::new(0, 0, 20, 100)),
            ItemTemplate::new(DialogItemKind::Button, Rect::new(30, 0, 70, 100)).disabled(),
            ItemTemplate::new(DialogItemKind::Button, Rect::new(50, 0, 90, 100)),
            ItemTemplate::new(DialogItemKind::EditText, Rect::new(95, 0, 100, 100)),
        ];
        let (handle, id) = fx.create(Some(&items));

        let outcome = fx.select(&ToolboxEvent::pointer_down(id, Point::new(10, 60)));
        assert_eq!(outcome.item_hit(), Some((handle, 3)));

        let outcome = fx.select(&ToolboxEvent::pointer_down(id, Point::new(10, 40)));
        assert_eq!(outcome, DialogOutcome::Unhandled);

        let outcome = fx.select(&ToolboxEvent::pointer_down(id, Point::new(10, 97)));
        assert_eq!(outcome.item_hit(), Some((handle, 4)));
        let window = fx.windows.window(handle).unwrap();
        assert_eq!(window.focused_item(), Some(window.items()[3].handle()));
    }

    #[test]
    fn test_unknown_and_plain_windows_are_unhandled() {
        let mut fx = Fixture::new();
        let (_, plain) = fx.create(None);
        let stray = PlatformWindowId(4242);

        assert_eq!(fx.select(&ToolboxEvent::text_input(stray, "x")), DialogOutcome::Unhandled);
        assert_eq!(fx.select(&ToolboxEvent::text_input(plain, "x")), DialogOutcome::Unhandled);
        assert_eq!(fx.select(&ToolboxEvent::null()), DialogOutcome::Unhandled);
        assert!(!is_dialog_event(&fx.windows, &ToolboxEvent::text_input(plain, "x")));
    }

    #[test]
    fn test_activate_and_update_are_unhandled() {
        let mut fx = Fixture::new();
        let items = [ItemTemplate::new(DialogItemKind::EditText, Rect::new(0, 0, 20, 50))];
        let (_, id) = fx.create(Some(&items));
        assert!(is_dialog_event(&fx.windows, &ToolboxEvent::activate(id)));
        assert_eq!(fx.select(&ToolboxEvent::activate(id)), DialogOutcome::Unhandled);
        assert_eq!(fx.select(&ToolboxEvent::update(id)), DialogOutcome::Unhandled);
        assert!(!is_dialog_event(&fx.windows, &ToolboxEvent::null()));
    }

    /// Collects formatted log output for one test.
    #[derive(Clone, Default)]
    struct LogCapture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogCapture {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    #[test]
    fn test_debug_key_does_not_change_state() {
        let mut fx = Fixture::new();
        let items = [ItemTemplate::new(DialogItemKind::EditText, Rect::new(0, 0, 20, 50)).with_text("a")];
        let (handle, id) = fx.create(Some(&items));

        let capture = LogCapture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let outcome = tracing::subscriber::with_default(subscriber, || {
            fx.select(&ToolboxEvent::key_down(id, KeyCode::F12, Point::new(5, 5)))
        });

        assert_eq!(outcome, DialogOutcome::Unhandled);
        assert_eq!(fx.windows.window(handle).unwrap().items()[0].text(), "a");
        let logged = capture.contents();
        assert!(logged.contains("dialog items under pointer"), "{logged}");
        assert!(logged.contains("item_no=1"), "{logged}");
    }

    #[test]
    fn test_disabled_debug_key_logs_nothing() {
        let mut fx = Fixture::new();
        fx.config.debug_key = None;
        let items = [ItemTemplate::new(DialogItemKind::EditText, Rect::new(0, 0, 20, 50))];
        let (_, id) = fx.create(Some(&items));

        let capture = LogCapture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            fx.select(&ToolboxEvent::key_down(id, KeyCode::F12, Point::new(5, 5)))
        });
        assert!(!capture.contents().contains("dialog items under pointer"));
    }
}
