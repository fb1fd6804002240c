//! Output contracts from the core engine.
//!
//! Outputs carry the host mutations performed during one call (class, style,
//! attribute and text writes plus watcher subscriptions) and a separate list
//! of semantic events. Adapters replay the changes onto the real page.

use serde::{Deserialize, Serialize};

use crate::ids::{ElementId, WatcherId};

/// One mutation the host has to mirror.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op")]
pub enum Change {
    AddClass {
        element: ElementId,
        class: String,
    },
    RemoveClass {
        element: ElementId,
        class: String,
    },
    /// Inline style write; custom properties keep their `--` prefix.
    SetStyle {
        element: ElementId,
        property: String,
        value: String,
    },
    SetAttribute {
        element: ElementId,
        name: String,
        value: String,
    },
    SetText {
        element: ElementId,
        text: String,
    },
    WatcherCreated {
        watcher: WatcherId,
        threshold: f64,
        root_margin: String,
    },
    Observe {
        watcher: WatcherId,
        element: ElementId,
    },
    Unobserve {
        watcher: WatcherId,
        element: ElementId,
    },
}

/// Discrete semantic signals emitted while processing.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind")]
#[non_exhaustive]
pub enum CoreEvent {
    Revealed {
        element: ElementId,
    },
    Hidden {
        element: ElementId,
    },
    /// Revealed during configuration because motion is skipped.
    RevealedImmediately {
        element: ElementId,
    },
    CounterStarted {
        element: ElementId,
        from: f64,
        to: f64,
    },
    CounterFinished {
        element: ElementId,
        text: String,
    },
    CounterError {
        element: ElementId,
        message: String,
    },
    /// Visibility change on a named watcher registered with `Engine::watch`.
    Watched {
        watcher: WatcherId,
        name: String,
        element: ElementId,
        is_intersecting: bool,
        ratio: f64,
    },
}

/// Outputs returned by the engine entry points.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<Change>,
    #[serde(default)]
    pub events: Vec<CoreEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_event(&mut self, event: CoreEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn extend_changes(&mut self, changes: impl IntoIterator<Item = Change>) {
        self.changes.extend(changes);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }
}
