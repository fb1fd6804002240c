//! History timeline: a progress line that eases toward the scroll position
//! and items that light up once half visible.

use onview_core::{CoreEvent, Document, ElementId, Engine, Rect, WatcherId};

use crate::config::TimelineConfig;
use crate::error::FlourishError;

pub const CONTAINER_CLASS: &str = "history-timeline";
pub const LINE_CLASS: &str = "history-timeline__line--progress";
pub const ITEM_CLASS: &str = "timeline-item";
pub const VISIBLE_CLASS: &str = "is-visible";
/// Name of the engine watcher the items subscribe to.
pub const WATCHER_NAME: &str = "timeline";

#[derive(Debug)]
pub struct Timeline {
    container: ElementId,
    line: ElementId,
    watcher: Option<WatcherId>,
    cfg: TimelineConfig,
    target: f64,
    current: f64,
}

impl Timeline {
    /// Find the first timeline under `root` and subscribe its items.
    ///
    /// `Ok(None)` when the page has no timeline.
    pub fn attach(
        doc: &mut Document,
        engine: &mut Engine,
        root: ElementId,
        cfg: TimelineConfig,
    ) -> Result<Option<Self>, FlourishError> {
        let Some(container) = doc.first_with_class(root, CONTAINER_CLASS) else {
            return Ok(None);
        };
        let line = doc
            .first_with_class(container, LINE_CLASS)
            .ok_or(FlourishError::MissingPart {
                element: container,
                class: LINE_CLASS,
            })?;

        let mut watcher = None;
        for item in doc.select(container, |d, id| d.has_class(id, ITEM_CLASS)) {
            watcher = Some(engine.watch(doc, WATCHER_NAME, cfg.item_threshold, "0px", item)?);
        }
        Ok(Some(Self {
            container,
            line,
            watcher,
            cfg,
            target: 0.0,
            current: 0.0,
        }))
    }

    pub fn current_height(&self) -> f64 {
        self.current
    }

    pub fn target_height(&self) -> f64 {
        self.target
    }

    /// True once the line has reached its target; no frames are needed.
    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    /// Recompute the target from the container's rect in viewport
    /// coordinates: everything scrolled past the bottom edge, clamped to the
    /// container height. Returns true when the line has to move.
    pub fn on_scroll(&mut self, container_rect: &Rect, viewport_height: f64) -> bool {
        let max = container_rect.height.max(0.0);
        self.target = (viewport_height - container_rect.top()).clamp(0.0, max);
        !self.is_settled()
    }

    /// Ease the line one frame toward the target. Returns true once settled.
    pub fn frame(&mut self, doc: &mut Document) -> bool {
        self.current += (self.target - self.current) * self.cfg.lerp;
        if (self.target - self.current).abs() < self.cfg.snap_px {
            self.current = self.target;
        }
        doc.set_style(self.line, "height", &format!("{}px", self.current));
        self.is_settled()
    }

    /// Mark items reported visible by the engine. Items stay marked, so they
    /// are unsubscribed right away.
    pub fn handle_events(
        &self,
        doc: &mut Document,
        engine: &mut Engine,
        events: &[CoreEvent],
    ) -> Result<usize, FlourishError> {
        let Some(own) = self.watcher else {
            return Ok(0);
        };
        let mut marked = 0;
        for event in events {
            if let CoreEvent::Watched {
                watcher,
                element,
                is_intersecting: true,
                ..
            } = event
            {
                if *watcher != own {
                    continue;
                }
                doc.add_class(*element, VISIBLE_CLASS);
                engine.unwatch(doc, own, *element)?;
                marked += 1;
            }
        }
        Ok(marked)
    }
}
