//! Identifiers and simple allocators for core entities.

use serde::{Deserialize, Serialize};

/// Handle for a node in the mirrored [`Document`](crate::document::Document).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u32);

/// Handle for a shared visibility watcher.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct WatcherId(pub u32);

/// Monotonic allocator for ElementId and WatcherId.
/// Dense indices double as arena slots; IDs are opaque externally.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_element: u32,
    next_watcher: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_element(&mut self) -> ElementId {
        let id = ElementId(self.next_element);
        self.next_element = self.next_element.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_watcher(&mut self) -> WatcherId {
        let id = WatcherId(self.next_watcher);
        self.next_watcher = self.next_watcher.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
