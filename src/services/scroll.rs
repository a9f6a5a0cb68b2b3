//! Per-document scroll memory and the frame-rate write guard.
//!
//! Offsets live only for the lifetime of the process; the active document's
//! offset is additionally mirrored into the session record by the caller of
//! [`ScrollTracker::flush_frame`]. The scroll percentage is published through
//! a watch channel so a progress indicator can observe it.

use rustc_hash::FxHashMap;
use tokio::sync::watch;

use crate::dom::{ScrollAlign, ScrollBehavior, Viewport};

/// One coalesced scroll observation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollSample {
    pub doc_id: String,
    pub pos: f64,
    pub container_height: f64,
}

pub struct ScrollTracker {
    positions: FxHashMap<String, f64>,
    percent_tx: watch::Sender<u32>,
    pending: Option<ScrollSample>,
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollTracker {
    pub fn new() -> Self {
        let (percent_tx, _) = watch::channel(0);
        Self {
            positions: FxHashMap::default(),
            percent_tx,
            pending: None,
        }
    }

    /// Record an offset and publish the scroll percentage.
    pub fn set_position(&mut self, doc_id: &str, pos: f64, container_height: f64) {
        self.positions.insert(doc_id.to_string(), pos);
        let percent = if container_height > 0.0 {
            (pos / container_height * 100.0).round() as u32
        } else {
            0
        };
        self.percent_tx.send_replace(percent);
    }

    /// Last recorded offset; 0 for unknown documents.
    pub fn get_position(&self, doc_id: &str) -> f64 {
        self.positions.get(doc_id).copied().unwrap_or(0.0)
    }

    pub fn percent(&self) -> u32 {
        *self.percent_tx.borrow()
    }

    pub fn subscribe_percent(&self) -> watch::Receiver<u32> {
        self.percent_tx.subscribe()
    }

    /// Queue a scroll observation. Within one display frame the last sample
    /// wins; returns true when this call scheduled the frame flush (the
    /// pending-flag guard).
    pub fn on_scroll(&mut self, doc_id: &str, pos: f64, container_height: f64) -> bool {
        let scheduled = self.pending.is_none();
        self.pending = Some(ScrollSample {
            doc_id: doc_id.to_string(),
            pos,
            container_height,
        });
        scheduled
    }

    /// Commit the pending sample, at most one write per frame. The returned
    /// sample is what the caller mirrors into session state.
    pub fn flush_frame(&mut self) -> Option<ScrollSample> {
        let sample = self.pending.take()?;
        self.set_position(&sample.doc_id, sample.pos, sample.container_height);
        Some(sample)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Scroll the viewport so `element_id` is at the top (or centered in) its
/// visible height. No-op when the element is absent from the current content
/// or was never measured: in-flight calls from a previous render must land
/// harmlessly on unrelated DOM.
pub fn scroll_to_element(
    viewport: &mut Viewport,
    element_id: &str,
    behavior: ScrollBehavior,
    align: ScrollAlign,
) {
    if viewport.content().element_by_id(element_id).is_none() {
        return;
    }
    let Some(bounds) = viewport.element_box(element_id) else {
        return;
    };

    let mut target = bounds.top;
    if align == ScrollAlign::Center {
        target = bounds.top - viewport.client_height() / 2.0 + bounds.height / 2.0;
    }
    viewport.scroll_to(target, behavior);
}
