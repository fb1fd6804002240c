//! Tree queries the flourishes share.

use onview_core::{Document, ElementId};

/// Nearest ancestor of `element` (itself included) matching `pred`.
pub fn closest(
    doc: &Document,
    element: ElementId,
    pred: impl Fn(ElementId) -> bool,
) -> Option<ElementId> {
    let mut cursor = Some(element);
    while let Some(current) = cursor {
        if pred(current) {
            return Some(current);
        }
        cursor = doc.parent(current);
    }
    None
}

/// Nearest ancestor of `element` (itself included) carrying `class`.
pub fn closest_with_class(doc: &Document, element: ElementId, class: &str) -> Option<ElementId> {
    closest(doc, element, |id| doc.has_class(id, class))
}

/// Nearest ancestor of `element` (itself included) that is one of `candidates`.
pub fn closest_of(
    doc: &Document,
    element: ElementId,
    candidates: &[ElementId],
) -> Option<ElementId> {
    closest(doc, element, |id| candidates.contains(&id))
}

/// Every descendant of `root` carrying `class`, in document order.
pub fn all_with_class(doc: &Document, root: ElementId, class: &str) -> Vec<ElementId> {
    doc.select(root, |d, id| d.has_class(id, class))
}

/// Format a pixel length with two decimals and no negative zero.
pub fn px2(value: f64) -> String {
    let text = format!("{value:.2}");
    match text.as_str() {
        "-0.00" => "0.00".to_string(),
        _ => text,
    }
}
