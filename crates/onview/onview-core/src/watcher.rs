//! Shared visibility watchers, one per distinct configuration.
//!
//! A watcher is identified by `(role, threshold, root margin)`. Elements with
//! identical criteria share one watcher; each watcher only reports entries for
//! elements explicitly subscribed to it.

use hashbrown::HashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{OnviewError, Result};
use crate::geometry::{Rect, RootMargin};
use crate::ids::{ElementId, IdAllocator, WatcherId};

/// Which callback a watcher feeds. Different roles never share a watcher.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WatcherRole {
    Reveal,
    Counter,
    /// Watchers owned by components outside the core engine.
    Named(String),
}

/// Cache key for a watcher.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WatcherKey {
    pub role: WatcherRole,
    threshold_bits: u64,
    pub root_margin: String,
}

impl WatcherKey {
    pub fn new(role: WatcherRole, threshold: f64, root_margin: impl Into<String>) -> Self {
        // -0.0 and 0.0 must land on the same watcher.
        let threshold = if threshold == 0.0 { 0.0 } else { threshold };
        Self {
            role,
            threshold_bits: threshold.to_bits(),
            root_margin: root_margin.into(),
        }
    }

    #[inline]
    pub fn threshold(&self) -> f64 {
        f64::from_bits(self.threshold_bits)
    }
}

/// One visibility change delivered to a watcher callback.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub is_intersecting: bool,
    #[serde(default)]
    pub ratio: f64,
}

impl IntersectionEntry {
    pub fn entering(target: ElementId) -> Self {
        Self {
            target,
            is_intersecting: true,
            ratio: 1.0,
        }
    }

    pub fn leaving(target: ElementId) -> Self {
        Self {
            target,
            is_intersecting: false,
            ratio: 0.0,
        }
    }
}

#[derive(Debug)]
pub struct Watcher {
    pub id: WatcherId,
    pub key: WatcherKey,
    margin: RootMargin,
    /// Subscribers in subscription order with their last reported state.
    subscribers: IndexMap<ElementId, Option<bool>>,
}

impl Watcher {
    fn new(id: WatcherId, key: WatcherKey) -> Self {
        let margin = match RootMargin::parse(&key.root_margin) {
            Some(m) => m,
            None => {
                log::warn!(
                    "invalid root margin {:?}; watcher {:?} uses 0px",
                    key.root_margin,
                    id
                );
                RootMargin::default()
            }
        };
        Self {
            id,
            key,
            margin,
            subscribers: IndexMap::new(),
        }
    }

    #[inline]
    pub fn threshold(&self) -> f64 {
        self.key.threshold()
    }

    #[inline]
    pub fn is_observing(&self, element: ElementId) -> bool {
        self.subscribers.contains_key(&element)
    }

    pub fn subscribers(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.subscribers.keys().copied()
    }

    /// Compute visibility entries for the current viewport.
    ///
    /// An entry is produced on the first evaluation after subscribing and
    /// whenever an element's intersecting state flips. Elements without a
    /// rect are skipped.
    pub fn evaluate(
        &mut self,
        viewport: &Rect,
        rect_of: impl Fn(ElementId) -> Option<Rect>,
    ) -> Vec<IntersectionEntry> {
        let root = self.margin.apply(viewport);
        let threshold = self.key.threshold();
        let mut entries = Vec::new();

        for (element, last) in self.subscribers.iter_mut() {
            let Some(rect) = rect_of(*element) else {
                continue;
            };
            let overlap = rect.intersect(&root);
            let ratio = match overlap {
                Some(o) if rect.area() > 0.0 => o.area() / rect.area(),
                Some(_) => 1.0,
                None => 0.0,
            };
            let is_intersecting = overlap.is_some() && ratio >= threshold;
            if *last != Some(is_intersecting) {
                *last = Some(is_intersecting);
                entries.push(IntersectionEntry {
                    target: *element,
                    is_intersecting,
                    ratio,
                });
            }
        }
        entries
    }
}

/// Creation-on-miss cache of watchers.
#[derive(Debug, Default)]
pub struct WatcherRegistry {
    ids: IdAllocator,
    watchers: Vec<Watcher>,
    by_key: HashMap<WatcherKey, WatcherId>,
}

impl WatcherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the watcher for `key`, creating it on a miss.
    /// The flag is true when the watcher was created by this call.
    pub fn get_or_create(&mut self, key: WatcherKey) -> (WatcherId, bool) {
        if let Some(id) = self.by_key.get(&key) {
            return (*id, false);
        }
        let id = self.ids.alloc_watcher();
        log::debug!(
            "creating watcher {:?} role={:?} threshold={} margin={:?}",
            id,
            key.role,
            key.threshold(),
            key.root_margin
        );
        self.by_key.insert(key.clone(), id);
        self.watchers.push(Watcher::new(id, key));
        (id, true)
    }

    pub fn get(&self, id: WatcherId) -> Option<&Watcher> {
        self.watchers.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: WatcherId) -> Option<&mut Watcher> {
        self.watchers.get_mut(id.0 as usize)
    }

    pub fn find(&self, key: &WatcherKey) -> Option<WatcherId> {
        self.by_key.get(key).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.watchers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.watchers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Watcher> {
        self.watchers.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Watcher> {
        self.watchers.iter_mut()
    }

    /// Subscribe `element`; returns false if it was already subscribed.
    pub fn observe(&mut self, id: WatcherId, element: ElementId) -> Result<bool> {
        let watcher = self.get_mut(id).ok_or(OnviewError::UnknownWatcher(id))?;
        if watcher.subscribers.contains_key(&element) {
            return Ok(false);
        }
        watcher.subscribers.insert(element, None);
        Ok(true)
    }

    /// Unsubscribe `element`; returns false if it was not subscribed.
    pub fn unobserve(&mut self, id: WatcherId, element: ElementId) -> Result<bool> {
        let watcher = self.get_mut(id).ok_or(OnviewError::UnknownWatcher(id))?;
        Ok(watcher.subscribers.shift_remove(&element).is_some())
    }

    pub fn is_observing(&self, id: WatcherId, element: ElementId) -> bool {
        self.get(id)
            .map(|w| w.is_observing(element))
            .unwrap_or(false)
    }

    /// Drop entries for elements not subscribed to `id`, keeping batch order.
    pub fn filter_entries(
        &self,
        id: WatcherId,
        entries: &[IntersectionEntry],
    ) -> Result<Vec<IntersectionEntry>> {
        let watcher = self.get(id).ok_or(OnviewError::UnknownWatcher(id))?;
        Ok(entries
            .iter()
            .filter(|e| watcher.is_observing(e.target))
            .copied()
            .collect())
    }
}
