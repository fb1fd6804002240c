//! Engine: owns the watcher registry and every side table, and exposes the
//! three host-driven entry points.
//!
//! - `scan`: configure new `data-ani` elements, refresh staggering, register counters
//! - `intersect` / `evaluate_viewport`: deliver visibility batches
//! - `frame`: step running counters on the animation clock
//!
//! Each entry point clears and returns the engine's [`Outputs`].

use crate::config::Config;
use crate::configure::{configure, names, RevealConfig};
use crate::counter::{CounterAnimator, CounterState};
use crate::document::Document;
use crate::error::{OnviewError, Result};
use crate::geometry::Rect;
use crate::ids::{ElementId, WatcherId};
use crate::outputs::{Change, CoreEvent, Outputs};
use crate::reveal::{RevealController, RevealState};
use crate::stagger::StaggerPropagator;
use crate::watcher::{IntersectionEntry, WatcherKey, WatcherRegistry, WatcherRole};

#[derive(Debug)]
pub struct Engine {
    cfg: Config,

    // Systems
    watchers: WatcherRegistry,
    stagger: StaggerPropagator,
    reveals: RevealController,
    counters: CounterAnimator,

    // Per-call outputs
    outputs: Outputs,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Engine {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            watchers: WatcherRegistry::new(),
            stagger: StaggerPropagator::new(),
            reveals: RevealController::new(),
            counters: CounterAnimator::new(),
            outputs: Outputs::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Update viewport size or capabilities, e.g. after a resize. Affects
    /// elements configured from now on.
    pub fn set_environment(&mut self, env: crate::config::Environment) {
        self.cfg.environment = env;
    }

    #[inline]
    pub fn watchers(&self) -> &WatcherRegistry {
        &self.watchers
    }

    pub fn reveal_state(&self, element: ElementId) -> RevealState {
        self.reveals.state(element)
    }

    pub fn counter_state(&self, element: ElementId) -> Option<CounterState> {
        self.counters.state(element)
    }

    pub fn base_delay(&self, element: ElementId) -> Option<f64> {
        self.stagger.base_delay(element)
    }

    /// True while any counter still needs frames.
    #[inline]
    pub fn has_pending_frames(&self) -> bool {
        self.counters.running() > 0
    }

    /// (Re-)scan `root` (the whole document when `None`) for new elements.
    ///
    /// Already initialized elements are skipped, so repeated scans are
    /// idempotent; stagger offsets are recomputed from frozen bases.
    pub fn scan(&mut self, doc: &mut Document, root: Option<ElementId>) -> &Outputs {
        self.outputs.clear();
        let root = root.unwrap_or_else(|| doc.root());

        let fresh = doc.select(root, |d, id| {
            d.has_attribute(id, names::ANI) && !d.has_class(id, names::INIT_CLASS)
        });
        log::debug!("scan {:?}: {} new animated elements", root, fresh.len());
        for element in fresh {
            self.configure_element(doc, element);
        }

        self.stagger.apply(doc, root, self.cfg.reveal.delay_ms);

        self.counters.scan(
            doc,
            root,
            &self.cfg.counter,
            &self.cfg.environment,
            &mut self.watchers,
            &mut self.outputs.events,
        );

        self.flush(doc)
    }

    fn configure_element(&mut self, doc: &mut Document, element: ElementId) {
        let env = &self.cfg.environment;
        let Some(config) = configure(doc, element, &self.cfg.reveal, env, &mut self.stagger) else {
            return;
        };

        // Without observer support or with reduced motion the element is
        // shown right away and never subscribed.
        if env.skip_motion() {
            doc.add_class(element, names::INVIEW_CLASS);
            self.outputs.push_event(CoreEvent::RevealedImmediately { element });
            return;
        }
        self.subscribe(doc, element, &config);
    }

    fn subscribe(&mut self, doc: &mut Document, element: ElementId, config: &RevealConfig) {
        let (watcher, created) = self.watchers.get_or_create(config.watcher_key());
        if created {
            doc.record(Change::WatcherCreated {
                watcher,
                threshold: config.threshold,
                root_margin: config.root_margin.clone(),
            });
        }
        if let Ok(true) = self.watchers.observe(watcher, element) {
            doc.record(Change::Observe { watcher, element });
        }
        self.reveals.track(element, config.once);
    }

    /// Subscribe `element` to the shared watcher `(name, threshold, root_margin)`.
    ///
    /// Batches for named watchers are not interpreted by the engine; they come
    /// back as [`CoreEvent::Watched`]. The subscription is journaled on `doc`
    /// and handed out with the next outputs.
    pub fn watch(
        &mut self,
        doc: &mut Document,
        name: &str,
        threshold: f64,
        root_margin: &str,
        element: ElementId,
    ) -> Result<WatcherId> {
        if !doc.contains(element) {
            return Err(OnviewError::UnknownElement(element));
        }
        let key = WatcherKey::new(WatcherRole::Named(name.to_string()), threshold, root_margin);
        let (watcher, created) = self.watchers.get_or_create(key);
        if created {
            doc.record(Change::WatcherCreated {
                watcher,
                threshold,
                root_margin: root_margin.to_string(),
            });
        }
        if self.watchers.observe(watcher, element)? {
            doc.record(Change::Observe { watcher, element });
        }
        Ok(watcher)
    }

    /// Drop a subscription made with [`Engine::watch`].
    pub fn unwatch(
        &mut self,
        doc: &mut Document,
        watcher: WatcherId,
        element: ElementId,
    ) -> Result<()> {
        if self.watchers.unobserve(watcher, element)? {
            doc.record(Change::Unobserve { watcher, element });
        }
        Ok(())
    }

    /// Deliver one intersection batch for `watcher`.
    ///
    /// Entries for elements the watcher does not observe are ignored.
    pub fn intersect(
        &mut self,
        doc: &mut Document,
        watcher: WatcherId,
        entries: &[IntersectionEntry],
    ) -> Result<&Outputs> {
        self.outputs.clear();
        self.dispatch(doc, watcher, entries)?;
        Ok(self.flush(doc))
    }

    fn dispatch(
        &mut self,
        doc: &mut Document,
        watcher: WatcherId,
        entries: &[IntersectionEntry],
    ) -> Result<()> {
        let entries = self.watchers.filter_entries(watcher, entries)?;
        let role = self
            .watchers
            .get(watcher)
            .map(|w| w.key.role.clone())
            .ok_or(OnviewError::UnknownWatcher(watcher))?;

        match role {
            WatcherRole::Reveal => self.reveals.handle(
                doc,
                &mut self.watchers,
                watcher,
                &entries,
                &mut self.outputs.events,
            ),
            WatcherRole::Counter => self.counters.handle(
                doc,
                &mut self.watchers,
                watcher,
                &entries,
                &self.cfg.counter,
                &self.cfg.environment,
                &mut self.outputs.events,
            ),
            WatcherRole::Named(name) => {
                self.outputs
                    .events
                    .extend(entries.iter().map(|entry| CoreEvent::Watched {
                        watcher,
                        name: name.clone(),
                        element: entry.target,
                        is_intersecting: entry.is_intersecting,
                        ratio: entry.ratio,
                    }));
            }
        }
        Ok(())
    }

    /// Compute visibility for every watcher against `viewport` and dispatch
    /// the resulting batches, watcher by watcher.
    pub fn evaluate_viewport(
        &mut self,
        doc: &mut Document,
        viewport: Rect,
        rect_of: impl Fn(ElementId) -> Option<Rect>,
    ) -> &Outputs {
        self.outputs.clear();
        let batches: Vec<(WatcherId, Vec<IntersectionEntry>)> = self
            .watchers
            .iter_mut()
            .map(|w| (w.id, w.evaluate(&viewport, &rect_of)))
            .filter(|(_, entries)| !entries.is_empty())
            .collect();
        for (watcher, entries) in batches {
            // Ids come straight from the registry.
            if let Err(err) = self.dispatch(doc, watcher, &entries) {
                log::warn!("dropping batch for {:?}: {}", watcher, err);
            }
        }
        self.flush(doc)
    }

    /// Advance running counters to `timestamp_ms` (frame clock, milliseconds).
    pub fn frame(&mut self, doc: &mut Document, timestamp_ms: f64) -> &Outputs {
        self.outputs.clear();
        self.counters.frame(doc, timestamp_ms, &mut self.outputs.events);
        self.flush(doc)
    }

    fn flush(&mut self, doc: &mut Document) -> &Outputs {
        self.outputs.extend_changes(doc.drain_changes());
        &self.outputs
    }
}
