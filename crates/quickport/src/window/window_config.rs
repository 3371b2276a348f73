//! Native window creation options.

use quickport_core::WindowTemplate;
use quickport_render::{Point, Rect, Size};

use super::window_type::WindowKind;

/// What a [`Platform`](super::Platform) needs to create a native window.
///
/// Native windows are always created hidden; the toolbox shows them once the
/// first frame is ready.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    title: String,
    kind: WindowKind,
    /// Content bounds in global coordinates.
    bounds: Rect,
    go_away: bool,
}

impl WindowConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind: WindowKind::Document,
            bounds: Rect::ZERO,
            go_away: false,
        }
    }

    /// Options for a window described by a template.
    pub fn from_template(template: &WindowTemplate) -> Self {
        Self::new(template.title.clone())
            .with_kind(WindowKind::from_proc_id(template.proc_id))
            .with_bounds(template.bounds)
            .with_go_away(template.go_away)
    }

    pub fn with_kind(mut self, kind: WindowKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_go_away(mut self, go_away: bool) -> Self {
        self.go_away = go_away;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Top-left corner of the content area in global coordinates.
    pub fn position(&self) -> Point {
        self.bounds.top_left()
    }

    pub fn size(&self) -> Size {
        self.bounds.size()
    }

    /// Whether the window has a close box.
    pub fn has_close_button(&self) -> bool {
        self.go_away
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_template() {
        let mut template = WindowTemplate::new(Rect::new(50, 20, 250, 420), "Prefs").with_proc_id(5);
        template.go_away = true;
        let config = WindowConfig::from_template(&template);
        assert_eq!(config.title(), "Prefs");
        assert_eq!(config.kind(), WindowKind::MovableDialogBox);
        assert_eq!(config.position(), Point::new(20, 50));
        assert_eq!(config.size(), Size::new(400, 200));
        assert!(config.has_close_button());
    }
}
