//! Presentation targets for onscreen canvases.
//!
//! An onscreen [`Canvas`](crate::Canvas) hands finished frames to a
//! [`PresentTarget`]. The windowing backend supplies one per native window;
//! [`HeadlessTarget`] keeps frames in memory so tests and headless runs can
//! inspect what would have been shown.

use std::sync::Arc;

use image::RgbaImage;
use parking_lot::Mutex;
use tracing::trace;

use crate::error::RenderResult;
use crate::types::Size;

/// Something that can show a finished RGBA frame.
pub trait PresentTarget {
    /// Prepare for frames of `size`. Called on canvas init and resize.
    fn configure(&mut self, size: Size) -> RenderResult<()>;

    /// Show `frame`.
    fn present(&mut self, frame: &RgbaImage) -> RenderResult<()>;
}

#[derive(Debug, Default)]
struct FrameLog {
    size: Size,
    presents: usize,
    last: Option<RgbaImage>,
}

/// A target that records presented frames in memory.
#[derive(Debug)]
pub struct HeadlessTarget {
    log: Arc<Mutex<FrameLog>>,
}

impl HeadlessTarget {
    /// Create a target and the probe that observes it.
    pub fn new() -> (Self, FrameProbe) {
        let log = Arc::new(Mutex::new(FrameLog::default()));
        (
            Self {
                log: Arc::clone(&log),
            },
            FrameProbe { log },
        )
    }
}

impl PresentTarget for HeadlessTarget {
    fn configure(&mut self, size: Size) -> RenderResult<()> {
        self.log.lock().size = size;
        Ok(())
    }

    fn present(&mut self, frame: &RgbaImage) -> RenderResult<()> {
        let mut log = self.log.lock();
        log.presents += 1;
        log.last = Some(frame.clone());
        trace!(target: "quickport::canvas", presents = log.presents, "headless present");
        Ok(())
    }
}

/// Read side of a [`HeadlessTarget`].
#[derive(Debug, Clone)]
pub struct FrameProbe {
    log: Arc<Mutex<FrameLog>>,
}

impl FrameProbe {
    /// Number of frames presented so far.
    pub fn present_count(&self) -> usize {
        self.log.lock().presents
    }

    /// The size the target was last configured for.
    pub fn configured_size(&self) -> Size {
        self.log.lock().size
    }

    /// A copy of the most recent frame.
    pub fn last_frame(&self) -> Option<RgbaImage> {
        self.log.lock().last.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_observes_target() {
        let (mut target, probe) = HeadlessTarget::new();
        target.configure(Size::new(3, 2)).unwrap();
        assert_eq!(probe.configured_size(), Size::new(3, 2));
        assert!(probe.last_frame().is_none());

        target.present(&RgbaImage::new(3, 2)).unwrap();
        assert_eq!(probe.present_count(), 1);
        assert_eq!(probe.last_frame().unwrap().dimensions(), (3, 2));
    }
}
