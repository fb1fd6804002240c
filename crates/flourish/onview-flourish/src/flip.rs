//! Flip cards: a click on the wrapper turns the card over.

use onview_core::{Document, ElementId};

use crate::dom::all_with_class;

pub const WRAPPER_CLASS: &str = "value-card__wrapper";
pub const CARD_CLASS: &str = "value-card";
pub const FLIPPED_CLASS: &str = "is-flipped";

pub fn wrappers(doc: &Document, root: ElementId) -> Vec<ElementId> {
    all_with_class(doc, root, WRAPPER_CLASS)
}

/// Toggle the card inside `wrapper`. Returns the new flipped state, or `None`
/// when `wrapper` is not a card wrapper or holds no card.
pub fn click(doc: &mut Document, wrapper: ElementId) -> Option<bool> {
    if !doc.has_class(wrapper, WRAPPER_CLASS) {
        return None;
    }
    let card = doc.first_with_class(wrapper, CARD_CLASS)?;
    Some(doc.toggle_class(card, FLIPPED_CLASS))
}
