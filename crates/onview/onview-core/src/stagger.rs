//! Stagger propagator.
//!
//! A container with `data-ani-stagger="<time>"` offsets the delay of each
//! direct `data-ani` child by `increment × index`. The first delay seen for a
//! child is frozen in a side table, so repeated passes recompute from the same
//! base instead of compounding.

use hashbrown::HashMap;

use crate::configure::{ms, names};
use crate::document::Document;
use crate::ids::ElementId;
use crate::parse::parse_time_ms;

#[derive(Debug, Default)]
pub struct StaggerPropagator {
    base_delays: HashMap<ElementId, f64>,
}

impl StaggerPropagator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Freeze `delay_ms` as the base for `element` unless one is already
    /// recorded; returns the frozen base either way.
    pub fn freeze_base(&mut self, element: ElementId, delay_ms: f64) -> f64 {
        *self.base_delays.entry(element).or_insert(delay_ms)
    }

    pub fn base_delay(&self, element: ElementId) -> Option<f64> {
        self.base_delays.get(&element).copied()
    }

    /// Recompute `--ani-delay` for the direct animated children of every
    /// stagger container below `root`. Returns the number of children touched.
    pub fn apply(&mut self, doc: &mut Document, root: ElementId, default_delay_ms: f64) -> usize {
        let containers = doc.select(root, |d, id| d.has_attribute(id, names::STAGGER));
        let mut touched = 0;

        for container in containers {
            let increment = parse_time_ms(doc.attribute(container, names::STAGGER), 0.0);
            let children: Vec<ElementId> = doc
                .children(container)
                .iter()
                .copied()
                .filter(|c| doc.has_attribute(*c, names::ANI))
                .collect();

            for (index, child) in children.into_iter().enumerate() {
                let base = match self.base_delays.get(&child) {
                    Some(base) => *base,
                    None => {
                        let declared =
                            parse_time_ms(doc.attribute(child, names::DELAY), default_delay_ms);
                        self.freeze_base(child, declared)
                    }
                };
                let effective = base + increment * index as f64;
                doc.set_style(child, names::VAR_DELAY, &ms(effective));
                touched += 1;
            }
            log::trace!("stagger container {:?}: increment {}ms", container, increment);
        }
        touched
    }
}
