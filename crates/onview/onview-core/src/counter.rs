//! Counter animator.
//!
//! A counter element is pending until its dedicated one-shot watcher reports
//! it visible, then either jumps straight to its target (reduced motion, zero
//! duration) or runs a [`CounterTask`] that is stepped once per frame until
//! its duration has elapsed. `Counted` and `Error` are terminal.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::config::{CounterDefaults, Environment};
use crate::document::Document;
use crate::easing::Easing;
use crate::error::CounterError;
use crate::format::NumberFormat;
use crate::ids::{ElementId, WatcherId};
use crate::outputs::{Change, CoreEvent};
use crate::parse::{decimal_places, parse_float_prefix, parse_int_prefix, parse_leading_number};
use crate::watcher::{IntersectionEntry, WatcherKey, WatcherRegistry, WatcherRole};

pub mod names {
    pub const TARGET: &str = "data-target-number";
    pub const DURATION: &str = "data-count-duration";
    pub const EASING: &str = "data-count-easing";
    pub const FORMAT: &str = "data-count-format";
    pub const PREFIX: &str = "data-prefix";
    pub const SUFFIX: &str = "data-suffix";
    pub const COUNTED: &str = "data-counted";
    pub const ERROR: &str = "data-count-error";
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CounterState {
    Pending,
    Running,
    Counted,
    Error,
}

/// Everything needed to render a counter, read from its attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct CounterSpec {
    pub target: f64,
    pub decimals: u32,
    pub duration_ms: f64,
    pub easing: Easing,
    pub format: NumberFormat,
    pub prefix: String,
    pub suffix: String,
}

impl CounterSpec {
    pub fn read(
        doc: &Document,
        element: ElementId,
        defaults: &CounterDefaults,
    ) -> Result<Self, CounterError> {
        let raw = doc.attribute(element, names::TARGET);
        let target = raw
            .and_then(parse_float_prefix)
            .filter(|t| t.is_finite())
            .ok_or_else(|| CounterError::InvalidTarget {
                raw: raw.map(str::to_string),
            })?;

        let duration_ms = match doc.attribute(element, names::DURATION).and_then(parse_int_prefix) {
            Some(ms) if ms >= 0 => ms as f64,
            _ => defaults.duration_ms,
        };

        Ok(Self {
            target,
            decimals: raw.map(decimal_places).unwrap_or(0),
            duration_ms,
            easing: Easing::from_name(doc.attribute(element, names::EASING), defaults.easing),
            format: NumberFormat::from_name(doc.attribute(element, names::FORMAT), defaults.format),
            prefix: doc.attribute(element, names::PREFIX).unwrap_or("").to_string(),
            suffix: doc.attribute(element, names::SUFFIX).unwrap_or("").to_string(),
        })
    }

    /// Prefix, formatted value and suffix.
    pub fn render(&self, value: f64) -> String {
        format!(
            "{}{}{}",
            self.prefix,
            self.format.format(value, self.decimals),
            self.suffix
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    Pending,
    Complete,
}

/// One in-flight interpolation. Time starts at the first frame it sees.
#[derive(Clone, Debug)]
pub struct CounterTask {
    pub element: ElementId,
    from: f64,
    spec: CounterSpec,
    started_at: Option<f64>,
}

impl CounterTask {
    pub fn new(element: ElementId, from: f64, spec: CounterSpec) -> Self {
        Self {
            element,
            from,
            spec,
            started_at: None,
        }
    }

    /// Render the frame at `timestamp_ms`; completion writes the exact target.
    pub fn step(&mut self, doc: &mut Document, timestamp_ms: f64) -> FrameStatus {
        let start = *self.started_at.get_or_insert(timestamp_ms);
        let elapsed = (timestamp_ms - start).max(0.0);
        let progress = if self.spec.duration_ms > 0.0 {
            (elapsed / self.spec.duration_ms).min(1.0)
        } else {
            1.0
        };

        if progress >= 1.0 {
            finish(doc, self.element, &self.spec);
            return FrameStatus::Complete;
        }
        let eased = self.spec.easing.apply(progress);
        let current = self.from + (self.spec.target - self.from) * eased;
        doc.set_text(self.element, &self.spec.render(current));
        FrameStatus::Pending
    }
}

fn finish(doc: &mut Document, element: ElementId, spec: &CounterSpec) {
    doc.set_text(element, &spec.render(spec.target));
    doc.set_attribute(element, names::COUNTED, "true");
}

/// Side table of counter states plus the running frame tasks.
#[derive(Debug, Default)]
pub struct CounterAnimator {
    states: HashMap<ElementId, CounterState>,
    tasks: Vec<CounterTask>,
}

impl CounterAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, element: ElementId) -> Option<CounterState> {
        self.states.get(&element).copied()
    }

    /// Number of counters still waiting for frames.
    #[inline]
    pub fn running(&self) -> usize {
        self.tasks.len()
    }

    /// Register every new counter below `root`.
    ///
    /// Invalid targets are flagged and skipped. Without observer support or
    /// with reduced motion, counters are finished on the spot.
    #[allow(clippy::too_many_arguments)]
    pub fn scan(
        &mut self,
        doc: &mut Document,
        root: ElementId,
        defaults: &CounterDefaults,
        env: &Environment,
        watchers: &mut WatcherRegistry,
        events: &mut Vec<CoreEvent>,
    ) {
        let class = defaults.class_name.as_str();
        let candidates = doc.select(root, |d, id| d.has_class(id, class));

        for element in candidates {
            if self.states.contains_key(&element)
                || doc.has_attribute(element, names::COUNTED)
                || doc.has_attribute(element, names::ERROR)
            {
                continue;
            }
            if let Err(err) = CounterSpec::read(doc, element, defaults) {
                self.flag_error(doc, element, &err, events);
                continue;
            }

            if env.skip_motion() {
                self.start(doc, element, defaults, env, events);
                continue;
            }

            let key = WatcherKey::new(
                WatcherRole::Counter,
                defaults.threshold,
                defaults.root_margin.clone(),
            );
            let (watcher, created) = watchers.get_or_create(key);
            if created {
                doc.record(Change::WatcherCreated {
                    watcher,
                    threshold: defaults.threshold,
                    root_margin: defaults.root_margin.clone(),
                });
            }
            if let Ok(true) = watchers.observe(watcher, element) {
                doc.record(Change::Observe { watcher, element });
            }
            self.states.insert(element, CounterState::Pending);
        }
    }

    /// Start every counter in `entries` that became visible.
    #[allow(clippy::too_many_arguments)]
    pub fn handle(
        &mut self,
        doc: &mut Document,
        watchers: &mut WatcherRegistry,
        watcher: WatcherId,
        entries: &[IntersectionEntry],
        defaults: &CounterDefaults,
        env: &Environment,
        events: &mut Vec<CoreEvent>,
    ) {
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            if let Ok(true) = watchers.unobserve(watcher, entry.target) {
                doc.record(Change::Unobserve {
                    watcher,
                    element: entry.target,
                });
            }
            self.start(doc, entry.target, defaults, env, events);
        }
    }

    /// Begin counting `element`. Already running or terminal counters are left alone.
    pub fn start(
        &mut self,
        doc: &mut Document,
        element: ElementId,
        defaults: &CounterDefaults,
        env: &Environment,
        events: &mut Vec<CoreEvent>,
    ) {
        match self.states.get(&element) {
            Some(CounterState::Running | CounterState::Counted | CounterState::Error) => return,
            _ if doc.attribute(element, names::COUNTED) == Some("true") => return,
            _ => {}
        }

        let spec = match CounterSpec::read(doc, element, defaults) {
            Ok(spec) => spec,
            Err(err) => {
                self.flag_error(doc, element, &err, events);
                return;
            }
        };
        let from = parse_leading_number(doc.text(element)).unwrap_or(0.0);

        if env.skip_motion() || spec.duration_ms == 0.0 {
            finish(doc, element, &spec);
            self.states.insert(element, CounterState::Counted);
            events.push(CoreEvent::CounterFinished {
                element,
                text: doc.text(element).to_string(),
            });
            return;
        }

        log::debug!(
            "counter {:?}: {} -> {} over {}ms",
            element,
            from,
            spec.target,
            spec.duration_ms
        );
        events.push(CoreEvent::CounterStarted {
            element,
            from,
            to: spec.target,
        });
        self.states.insert(element, CounterState::Running);
        self.tasks.push(CounterTask::new(element, from, spec));
    }

    /// Step every running task once; finished tasks are dropped.
    pub fn frame(&mut self, doc: &mut Document, timestamp_ms: f64, events: &mut Vec<CoreEvent>) {
        let states = &mut self.states;
        self.tasks.retain_mut(|task| match task.step(doc, timestamp_ms) {
            FrameStatus::Pending => true,
            FrameStatus::Complete => {
                states.insert(task.element, CounterState::Counted);
                events.push(CoreEvent::CounterFinished {
                    element: task.element,
                    text: doc.text(task.element).to_string(),
                });
                false
            }
        });
    }

    fn flag_error(
        &mut self,
        doc: &mut Document,
        element: ElementId,
        err: &CounterError,
        events: &mut Vec<CoreEvent>,
    ) {
        log::error!("counter {:?}: {}", element, err);
        doc.set_attribute(element, names::ERROR, "true");
        self.states.insert(element, CounterState::Error);
        events.push(CoreEvent::CounterError {
            element,
            message: err.to_string(),
        });
    }
}
