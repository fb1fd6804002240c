//! Scroll parallax.
//!
//! Each item drifts vertically by `speed × (distance of its centre from the
//! viewport centre)`. Scroll notifications are coalesced: only the first one
//! before a frame asks the host for a frame.

use onview_core::{Document, ElementId, Environment, Rect};

use crate::config::ParallaxConfig;
use crate::dom::px2;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParallaxItem {
    pub element: ElementId,
    pub speed: f64,
}

#[derive(Debug)]
pub struct Parallax {
    items: Vec<ParallaxItem>,
    ticking: bool,
}

impl Parallax {
    /// Collect the children of the first `container_class` element under
    /// `root`, pairing them with the configured speeds by position.
    ///
    /// Returns `None` on narrow viewports, with reduced motion, or when
    /// nothing would move. Call [`Parallax::frame`] once after attaching to
    /// set the initial offsets.
    pub fn attach(
        doc: &Document,
        root: ElementId,
        cfg: &ParallaxConfig,
        env: &Environment,
    ) -> Option<Self> {
        if env.viewport_width <= cfg.max_disabled_width || env.reduced_motion {
            log::debug!(
                "parallax disabled (width {}, reduced motion {})",
                env.viewport_width,
                env.reduced_motion
            );
            return None;
        }
        let container = doc.first_with_class(root, &cfg.container_class)?;
        let items: Vec<ParallaxItem> = doc
            .children(container)
            .iter()
            .zip(cfg.speeds.iter())
            .map(|(element, speed)| ParallaxItem {
                element: *element,
                speed: *speed,
            })
            .collect();
        if items.is_empty() {
            return None;
        }
        Some(Self {
            items,
            ticking: false,
        })
    }

    pub fn items(&self) -> &[ParallaxItem] {
        &self.items
    }

    /// Note a scroll. Returns true when the host should schedule a frame.
    pub fn on_scroll(&mut self) -> bool {
        if self.ticking {
            return false;
        }
        self.ticking = true;
        true
    }

    /// Reposition every item overlapping `viewport` (page coordinates).
    ///
    /// Items without a rect or out of view keep their last transform.
    /// Returns the number of items written.
    pub fn frame(
        &mut self,
        doc: &mut Document,
        viewport: &Rect,
        rect_of: impl Fn(ElementId) -> Option<Rect>,
    ) -> usize {
        let mut written = 0;
        for item in &self.items {
            let Some(rect) = rect_of(item.element) else {
                continue;
            };
            if !(viewport.bottom() > rect.top() && viewport.top() < rect.bottom()) {
                continue;
            }
            let centre_offset =
                (rect.top() - viewport.top() + rect.height / 2.0) - viewport.height / 2.0;
            let shift = centre_offset * item.speed;
            doc.set_style(item.element, "transform", &format!("translateY({}px)", px2(shift)));
            written += 1;
        }
        self.ticking = false;
        written
    }
}
