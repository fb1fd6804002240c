//! Testimonial slider.
//!
//! Slides sit side by side in a track that is shifted by whole widths. The
//! active slide and its pagination dot carry `is-active`. Autoplay advances on
//! accumulated [`Slider::tick`] time. Manual navigation and hovering stop it;
//! the pointer leaving the wrapper starts it again.

use onview_core::{Document, ElementId};

use crate::config::SliderConfig;
use crate::dom::{all_with_class, closest, closest_of, closest_with_class};
use crate::error::FlourishError;

pub const SLIDER_CLASS: &str = "testimonial-slider";
pub const TRACK_CLASS: &str = "slider__track";
pub const WRAPPER_CLASS: &str = "testimonial-slider-wrapper";
pub const NEXT_CLASS: &str = "slider__arrow--next";
pub const PREV_CLASS: &str = "slider__arrow--prev";
pub const PAGINATION_CLASS: &str = "slider-pagination";
pub const ACTIVE_CLASS: &str = "is-active";

#[derive(Debug)]
pub struct Slider {
    track: ElementId,
    wrapper: Option<ElementId>,
    slides: Vec<ElementId>,
    dots: Vec<ElementId>,
    next_button: Option<ElementId>,
    prev_button: Option<ElementId>,
    cfg: SliderConfig,
    current: usize,
    autoplay: bool,
    elapsed_ms: f64,
    /// Time left before the track transition is restored after a resize.
    resnap_left_ms: Option<f64>,
}

impl Slider {
    /// Attach every slider under `root`. Broken markup is logged and skipped.
    pub fn attach_all(doc: &mut Document, root: ElementId, cfg: &SliderConfig) -> Vec<Slider> {
        all_with_class(doc, root, SLIDER_CLASS)
            .into_iter()
            .filter_map(|el| match Slider::attach(doc, el, cfg.clone()) {
                Ok(slider) => Some(slider),
                Err(err) => {
                    log::warn!("skipping slider: {err}");
                    None
                }
            })
            .collect()
    }

    /// Wire up one `.testimonial-slider`, show the first slide and start autoplay.
    pub fn attach(
        doc: &mut Document,
        slider: ElementId,
        cfg: SliderConfig,
    ) -> Result<Self, FlourishError> {
        let track = doc
            .first_with_class(slider, TRACK_CLASS)
            .ok_or(FlourishError::MissingPart {
                element: slider,
                class: TRACK_CLASS,
            })?;
        let slides = doc.children(track).to_vec();
        if slides.is_empty() {
            return Err(FlourishError::NoSlides(slider));
        }

        let wrapper = closest_with_class(doc, slider, WRAPPER_CLASS);
        let find = |class: &str| wrapper.and_then(|w| doc.first_with_class(w, class));
        let next_button = find(NEXT_CLASS);
        let prev_button = find(PREV_CLASS);
        // Pagination lives next to the wrapper, not inside it.
        let dots = wrapper
            .and_then(|w| doc.parent(w))
            .and_then(|p| doc.first_with_class(p, PAGINATION_CLASS))
            .map(|nav| doc.children(nav).to_vec())
            .unwrap_or_default();

        let mut this = Self {
            track,
            wrapper,
            slides,
            dots,
            next_button,
            prev_button,
            cfg,
            current: 0,
            autoplay: false,
            elapsed_ms: 0.0,
            resnap_left_ms: None,
        };
        doc.set_style(track, "transition", &this.cfg.transition);
        this.move_to(doc, 0);
        this.start_autoplay();
        Ok(this)
    }

    /// Hover target: the `.testimonial-slider-wrapper` around the slider.
    pub fn wrapper(&self) -> Option<ElementId> {
        self.wrapper
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn is_autoplaying(&self) -> bool {
        self.autoplay
    }

    /// Whether arrow buttons were found; without both, arrows are inert.
    pub fn has_arrows(&self) -> bool {
        self.next_button.is_some() && self.prev_button.is_some()
    }

    /// Show slide `index`. Out-of-range targets are ignored.
    pub fn move_to(&mut self, doc: &mut Document, index: usize) -> bool {
        if index >= self.slides.len() {
            return false;
        }
        let shift = index * 100;
        doc.set_style(self.track, "transform", &format!("translateX(-{shift}%)"));

        doc.remove_class(self.slides[self.current], ACTIVE_CLASS);
        doc.add_class(self.slides[index], ACTIVE_CLASS);
        if let Some(dot) = self.dots.get(self.current) {
            doc.remove_class(*dot, ACTIVE_CLASS);
        }
        if let Some(dot) = self.dots.get(index) {
            doc.add_class(*dot, ACTIVE_CLASS);
        }
        self.current = index;
        true
    }

    pub fn next(&mut self, doc: &mut Document) {
        if !self.has_arrows() {
            return;
        }
        let next = (self.current + 1) % self.slides.len();
        self.move_to(doc, next);
        self.stop_autoplay();
    }

    pub fn prev(&mut self, doc: &mut Document) {
        if !self.has_arrows() {
            return;
        }
        let len = self.slides.len();
        let prev = (self.current + len - 1) % len;
        self.move_to(doc, prev);
        self.stop_autoplay();
    }

    /// Handle a click on a dot or anything inside one. Returns false when
    /// `target` is not within the pagination dots.
    pub fn click_dot(&mut self, doc: &mut Document, target: ElementId) -> bool {
        let Some(index) = closest_of(doc, target, &self.dots)
            .and_then(|dot| self.dots.iter().position(|d| *d == dot))
        else {
            return false;
        };
        self.move_to(doc, index);
        self.stop_autoplay();
        true
    }

    /// Dispatch a click by element: arrows, then dots. Clicks on children of
    /// an arrow (icons, labels) count as clicks on the arrow.
    pub fn click(&mut self, doc: &mut Document, target: ElementId) -> bool {
        let arrow = closest(doc, target, |id| {
            Some(id) == self.next_button || Some(id) == self.prev_button
        });
        match arrow {
            Some(a) if Some(a) == self.next_button => {
                self.next(doc);
                true
            }
            Some(_) => {
                self.prev(doc);
                true
            }
            None => self.click_dot(doc, target),
        }
    }

    pub fn hover_enter(&mut self) {
        self.stop_autoplay();
    }

    pub fn hover_leave(&mut self) {
        self.start_autoplay();
    }

    pub fn start_autoplay(&mut self) {
        self.autoplay = true;
        self.elapsed_ms = 0.0;
    }

    pub fn stop_autoplay(&mut self) {
        self.autoplay = false;
    }

    /// Re-snap the current slide without animating.
    pub fn resize(&mut self, doc: &mut Document) {
        doc.set_style(self.track, "transition", "none");
        self.move_to(doc, self.current);
        self.resnap_left_ms = Some(self.cfg.resnap_ms);
    }

    /// Advance timers by `dt_ms`. Returns true if autoplay changed the slide.
    pub fn tick(&mut self, doc: &mut Document, dt_ms: f64) -> bool {
        if let Some(left) = self.resnap_left_ms {
            let left = left - dt_ms;
            if left <= 0.0 {
                doc.set_style(self.track, "transition", &self.cfg.transition);
                self.resnap_left_ms = None;
            } else {
                self.resnap_left_ms = Some(left);
            }
        }

        if !self.autoplay || self.cfg.autoplay_interval_ms <= 0.0 {
            return false;
        }
        self.elapsed_ms += dt_ms;
        let mut moved = false;
        while self.elapsed_ms >= self.cfg.autoplay_interval_ms {
            self.elapsed_ms -= self.cfg.autoplay_interval_ms;
            let next = (self.current + 1) % self.slides.len();
            moved |= self.move_to(doc, next);
        }
        moved
    }
}
