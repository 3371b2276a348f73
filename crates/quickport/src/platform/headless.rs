//! In-memory windowing backend.
//!
//! Native windows are plain records; frames go to a [`HeadlessTarget`] whose
//! probe the platform keeps, and input comes from a queue the caller fills.
//! Used by the test suite and by hosts that render without a display.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use quickport_core::logging::targets;
use quickport_core::{PlatformWindowId, ToolboxError, ToolboxEvent, ToolboxResult};
use quickport_render::{FrameProbe, HeadlessTarget, Point, Rect, Size};
use tracing::{debug, trace};

use crate::window::{NativeWindow, NativeWindowParts, Platform, WindowConfig};

/// Everything the toolbox has asked of a headless native window.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeWindowState {
    pub title: String,
    pub visible: bool,
    /// Content origin in global coordinates.
    pub position: Point,
    pub size: Size,
    /// Area of the active text input session, if one is open.
    pub text_input: Option<Rect>,
    /// Set once the toolbox drops the window.
    pub closed: bool,
}

struct HeadlessWindow {
    id: PlatformWindowId,
    state: Arc<Mutex<NativeWindowState>>,
}

impl NativeWindow for HeadlessWindow {
    fn id(&self) -> PlatformWindowId {
        self.id
    }

    fn set_visible(&mut self, visible: bool) {
        self.state.lock().visible = visible;
    }

    fn set_position(&mut self, h: i32, v: i32) {
        self.state.lock().position = Point::new(h, v);
    }

    fn request_inner_size(&mut self, size: Size) {
        self.state.lock().size = size;
    }

    fn set_title(&mut self, title: &str) {
        self.state.lock().title = title.to_owned();
    }

    fn begin_text_input(&mut self, area: Rect) {
        self.state.lock().text_input = Some(area);
    }

    fn end_text_input(&mut self) {
        self.state.lock().text_input = None;
    }
}

impl Drop for HeadlessWindow {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        state.visible = false;
        state.closed = true;
    }
}

struct WindowRecord {
    state: Arc<Mutex<NativeWindowState>>,
    probe: FrameProbe,
}

/// A [`Platform`] with no display behind it.
#[derive(Default)]
pub struct HeadlessPlatform {
    next_id: u64,
    windows: HashMap<PlatformWindowId, WindowRecord>,
    events: VecDeque<ToolboxEvent>,
    display_size: Option<Size>,
    fail_next: bool,
}

impl HeadlessPlatform {
    /// A platform that reports no display.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `size` as the primary display size.
    pub fn with_display_size(mut self, size: Size) -> Self {
        self.display_size = Some(size);
        self
    }

    /// Queue an input event for [`poll_event`](Platform::poll_event).
    pub fn push_event(&mut self, event: ToolboxEvent) {
        self.events.push_back(event);
    }

    /// Number of events still queued.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Make the next `create_window` call fail.
    pub fn fail_next_window(&mut self) {
        self.fail_next = true;
    }

    /// Snapshot of a native window's state. Closed windows stay queryable.
    pub fn window_state(&self, id: PlatformWindowId) -> Option<NativeWindowState> {
        self.windows.get(&id).map(|record| record.state.lock().clone())
    }

    /// The probe for frames presented to a window.
    pub fn frame_probe(&self, id: PlatformWindowId) -> Option<FrameProbe> {
        self.windows.get(&id).map(|record| record.probe.clone())
    }

    /// Ids of every window created so far, in creation order.
    pub fn window_ids(&self) -> Vec<PlatformWindowId> {
        let mut ids: Vec<_> = self.windows.keys().copied().collect();
        ids.sort_unstable_by_key(|id| id.0);
        ids
    }
}

impl Platform for HeadlessPlatform {
    fn create_window(&mut self, config: &WindowConfig) -> ToolboxResult<NativeWindowParts> {
        if std::mem::take(&mut self.fail_next) {
            return Err(ToolboxError::WindowCreation(format!(
                "headless platform refused window {:?}",
                config.title()
            )));
        }

        self.next_id += 1;
        let id = PlatformWindowId(self.next_id);
        let state = Arc::new(Mutex::new(NativeWindowState {
            title: config.title().to_owned(),
            visible: false,
            position: config.position(),
            size: config.size(),
            text_input: None,
            closed: false,
        }));
        let (target, probe) = HeadlessTarget::new();
        self.windows.insert(
            id,
            WindowRecord {
                state: Arc::clone(&state),
                probe,
            },
        );
        debug!(target: targets::PLATFORM, ?id, title = config.title(), "headless window created");

        Ok(NativeWindowParts {
            window: Box::new(HeadlessWindow { id, state }),
            target: Box::new(target),
        })
    }

    fn primary_display_size(&mut self) -> Option<Size> {
        self.display_size
    }

    fn poll_event(&mut self, timeout: Duration) -> Option<ToolboxEvent> {
        let event = self.events.pop_front();
        if event.is_none() {
            trace!(target: targets::PLATFORM, ?timeout, "no queued events");
        }
        event
    }
}

impl std::fmt::Debug for HeadlessPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessPlatform")
            .field("windows", &self.windows.len())
            .field("events", &self.events.len())
            .field("display_size", &self.display_size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_state_tracks_calls() {
        let mut platform = HeadlessPlatform::new();
        let config = WindowConfig::new("Hello").with_bounds(Rect::new(10, 20, 110, 220));
        let NativeWindowParts { mut window, .. } = platform.create_window(&config).unwrap();
        let id = window.id();

        let state = platform.window_state(id).unwrap();
        assert_eq!(state.position, Point::new(20, 10));
        assert_eq!(state.size, Size::new(200, 100));
        assert!(!state.visible);

        window.set_visible(true);
        window.set_title("Bye");
        window.begin_text_input(Rect::new(0, 0, 10, 10));
        let state = platform.window_state(id).unwrap();
        assert!(state.visible);
        assert_eq!(state.title, "Bye");
        assert!(state.text_input.is_some());

        drop(window);
        assert!(platform.window_state(id).unwrap().closed);
    }

    #[test]
    fn test_events_come_out_in_order() {
        let mut platform = HeadlessPlatform::new();
        platform.push_event(ToolboxEvent::activate(PlatformWindowId(1)));
        platform.push_event(ToolboxEvent::text_input(PlatformWindowId(1), "a"));
        assert_eq!(platform.pending_events(), 2);

        let timeout = Duration::from_millis(1);
        assert!(platform.poll_event(timeout).unwrap().text.is_empty());
        assert_eq!(platform.poll_event(timeout).unwrap().text, "a");
        assert!(platform.poll_event(timeout).is_none());
    }

    #[test]
    fn test_fail_next_window_is_one_shot() {
        let mut platform = HeadlessPlatform::new();
        platform.fail_next_window();
        assert!(platform.create_window(&WindowConfig::new("a")).is_err());
        assert!(platform.create_window(&WindowConfig::new("b")).is_ok());
        assert_eq!(platform.window_ids(), vec![PlatformWindowId(1)]);
    }
}
