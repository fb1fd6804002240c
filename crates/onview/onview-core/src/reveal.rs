//! Reveal controller: the per-element visibility state machine.
//!
//! ```text
//! NotObserved -> Hidden <-> Visible      (replay)
//! NotObserved -> Hidden  -> Revealed     (one-shot, terminal)
//! ```

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::configure::names;
use crate::document::Document;
use crate::ids::{ElementId, WatcherId};
use crate::outputs::{Change, CoreEvent};
use crate::watcher::{IntersectionEntry, WatcherRegistry};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealState {
    /// Never subscribed (includes the immediate-reveal fallback).
    NotObserved,
    Hidden,
    Visible,
    /// One-shot element after its first entry; no longer observed.
    Revealed,
}

#[derive(Debug, Clone, Copy)]
struct Tracked {
    once: bool,
    state: RevealState,
}

#[derive(Debug, Default)]
pub struct RevealController {
    tracked: HashMap<ElementId, Tracked>,
}

impl RevealController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an element that was just subscribed to a reveal watcher.
    pub fn track(&mut self, element: ElementId, once: bool) {
        self.tracked.entry(element).or_insert(Tracked {
            once,
            state: RevealState::Hidden,
        });
    }

    pub fn state(&self, element: ElementId) -> RevealState {
        self.tracked
            .get(&element)
            .map(|t| t.state)
            .unwrap_or(RevealState::NotObserved)
    }

    /// Apply one intersection batch delivered to `watcher`.
    ///
    /// Entries must already be filtered to the watcher's subscribers.
    pub fn handle(
        &mut self,
        doc: &mut Document,
        watchers: &mut WatcherRegistry,
        watcher: WatcherId,
        entries: &[IntersectionEntry],
        events: &mut Vec<CoreEvent>,
    ) {
        for entry in entries {
            let element = entry.target;
            let Some(tracked) = self.tracked.get_mut(&element) else {
                continue;
            };
            // Terminal: a batch may still carry entries queued before the
            // unsubscribe.
            if tracked.state == RevealState::Revealed {
                continue;
            }

            if entry.is_intersecting {
                doc.add_class(element, names::INVIEW_CLASS);
                let was_shown = tracked.state == RevealState::Visible;
                if tracked.once {
                    tracked.state = RevealState::Revealed;
                    if let Ok(true) = watchers.unobserve(watcher, element) {
                        doc.record(Change::Unobserve { watcher, element });
                    }
                } else {
                    tracked.state = RevealState::Visible;
                }
                if !was_shown {
                    log::trace!("revealed {:?}", element);
                    events.push(CoreEvent::Revealed { element });
                }
            } else if !tracked.once && tracked.state == RevealState::Visible {
                doc.remove_class(element, names::INVIEW_CLASS);
                tracked.state = RevealState::Hidden;
                log::trace!("hidden {:?}", element);
                events.push(CoreEvent::Hidden { element });
            }
        }
    }
}
