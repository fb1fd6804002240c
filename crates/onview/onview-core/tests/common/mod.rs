#![allow(dead_code)]

use std::collections::HashMap;

use onview_core::{Document, ElementId, ElementSpec, Rect};

/// Mount a named fixture tree into a fresh document.
pub fn mount_fixture(name: &str) -> anyhow::Result<Document> {
    let spec: ElementSpec = onview_test_fixtures::trees::load(name)?;
    let mut doc = Document::new();
    doc.mount(&spec)?;
    Ok(doc)
}

/// Look up an element by its `id` attribute, panicking on typos.
pub fn by_id(doc: &Document, id: &str) -> ElementId {
    doc.element_by_id(id)
        .unwrap_or_else(|| panic!("fixture has no element #{id}"))
}

/// Resolve a layout fixture (keyed by `id` attribute) against `doc`.
pub fn layout(doc: &Document, name: &str) -> anyhow::Result<HashMap<ElementId, Rect>> {
    let raw: HashMap<String, Rect> = onview_test_fixtures::layouts::load(name)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, rect)| doc.element_by_id(&key).map(|id| (id, rect)))
        .collect())
}

/// A viewport of the default environment size scrolled to `scroll_y`.
pub fn viewport_at(scroll_y: f64) -> Rect {
    Rect::new(0.0, scroll_y, 1280.0, 800.0)
}
