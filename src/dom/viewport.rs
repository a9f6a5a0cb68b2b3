//! Viewport: the owner of the currently rendered fragment plus the layout
//! numbers scroll restoration depends on.
//!
//! There is no layout engine here; the embedding host measures the rendered
//! content and feeds the numbers back via [`Viewport::set_measurements`] and
//! [`Viewport::set_element_box`]. Scroll math then mirrors what the browser
//! version computed from `getBoundingClientRect` and `scrollTop`.

use rustc_hash::FxHashMap;

use super::Fragment;

/// Host-measured box of one element, relative to the top of the content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementBox {
    pub top: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Auto,
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollAlign {
    #[default]
    Top,
    Center,
}

#[derive(Debug, Default)]
pub struct Viewport {
    content: Fragment,
    scroll_top: f64,
    /// Last offset asked for via [`Viewport::scroll_to`], unclamped. Kept so
    /// an offset requested before the host measured the fresh content is not
    /// clamped away for good.
    requested_scroll: f64,
    client_height: f64,
    scroll_height: f64,
    element_boxes: FxHashMap<String, ElementBox>,
    last_behavior: ScrollBehavior,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wholesale content replacement; prior element measurements are stale
    /// and dropped with it.
    pub fn set_content(&mut self, fragment: Fragment) {
        self.content = fragment;
        self.element_boxes.clear();
    }

    pub fn clear(&mut self) {
        self.set_content(Fragment::new());
    }

    pub fn content(&self) -> &Fragment {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut Fragment {
        &mut self.content
    }

    pub fn set_measurements(&mut self, scroll_height: f64, client_height: f64) {
        self.scroll_height = scroll_height.max(0.0);
        self.client_height = client_height.max(0.0);
        // Scroll restoration runs right after rendering, before the host had
        // a chance to measure; re-clamp so the requested offset lands once
        // the content has a height.
        self.scroll_top = self.requested_scroll.clamp(0.0, self.max_scroll());
    }

    pub fn set_element_box(&mut self, id: impl Into<String>, bounds: ElementBox) {
        self.element_boxes.insert(id.into(), bounds);
    }

    pub fn element_box(&self, id: &str) -> Option<ElementBox> {
        self.element_boxes.get(id).copied()
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn client_height(&self) -> f64 {
        self.client_height
    }

    pub fn scroll_height(&self) -> f64 {
        self.scroll_height
    }

    pub fn max_scroll(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    pub fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.requested_scroll = top.max(0.0);
        self.scroll_top = self.requested_scroll.min(self.max_scroll());
        self.last_behavior = behavior;
    }

    pub fn last_scroll_behavior(&self) -> ScrollBehavior {
        self.last_behavior
    }

    /// Layout flush: read a layout-dependent property so every measurement
    /// taken afterwards reflects the freshly installed content.
    pub fn force_layout(&self) -> f64 {
        self.scroll_height
    }
}
