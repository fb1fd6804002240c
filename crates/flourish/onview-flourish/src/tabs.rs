//! Tabbed panels with deep linking.
//!
//! A button names its panel through `aria-controls`, falling back to
//! `data-tab`. Switching re-arms entrance animations inside the new panel.

use onview_core::{Document, ElementId};

use crate::dom::{all_with_class, closest_of};
use crate::error::FlourishError;

pub const CONTAINER_CLASS: &str = "our-work-tabs";
pub const BUTTON_CLASS: &str = "tab-btn";
pub const PANEL_CLASS: &str = "tab-panel";
pub const ACTIVE_CLASS: &str = "active";
/// Class set by entrance animations that have already played.
pub const PLAYED_CLASS: &str = "ani-visible";

#[derive(Debug)]
pub struct Tabs {
    buttons: Vec<ElementId>,
    panels: Vec<ElementId>,
}

impl Tabs {
    /// Collect buttons and panels of the first tab container under `root`.
    pub fn attach(doc: &Document, root: ElementId) -> Option<Self> {
        let container = doc.first_with_class(root, CONTAINER_CLASS)?;
        Some(Self {
            buttons: all_with_class(doc, container, BUTTON_CLASS),
            panels: all_with_class(doc, container, PANEL_CLASS),
        })
    }

    pub fn buttons(&self) -> &[ElementId] {
        &self.buttons
    }

    /// Panel id a button points at.
    pub fn target_of<'a>(doc: &'a Document, button: ElementId) -> Option<&'a str> {
        doc.attribute(button, "aria-controls")
            .filter(|v| !v.is_empty())
            .or_else(|| doc.attribute(button, "data-tab"))
            .filter(|v| !v.is_empty())
    }

    /// Handle a click on one of the buttons or anything inside one. Other
    /// elements are ignored.
    pub fn click(&self, doc: &mut Document, target: ElementId) -> Result<bool, FlourishError> {
        let Some(button) = closest_of(doc, target, &self.buttons) else {
            return Ok(false);
        };
        let Some(target) = Self::target_of(doc, button).map(str::to_string) else {
            return Ok(false);
        };
        self.switch_to(doc, &target)?;
        Ok(true)
    }

    /// Deactivate every tab, then activate the button and panel for `tab_id`.
    ///
    /// Both must exist; otherwise all tabs stay inactive and
    /// [`FlourishError::UnknownTab`] is returned.
    pub fn switch_to(&self, doc: &mut Document, tab_id: &str) -> Result<(), FlourishError> {
        for button in &self.buttons {
            doc.remove_class(*button, ACTIVE_CLASS);
            doc.set_attribute(*button, "aria-selected", "false");
        }
        for panel in &self.panels {
            doc.remove_class(*panel, ACTIVE_CLASS);
        }

        let button = self.buttons.iter().copied().find(|b| {
            doc.attribute(*b, "aria-controls") == Some(tab_id)
                || doc.attribute(*b, "data-tab") == Some(tab_id)
        });
        let panel = doc.element_by_id(tab_id);
        let (Some(button), Some(panel)) = (button, panel) else {
            log::warn!("tab {tab_id:?} has no button or panel");
            return Err(FlourishError::UnknownTab(tab_id.to_string()));
        };

        doc.add_class(button, ACTIVE_CLASS);
        doc.set_attribute(button, "aria-selected", "true");
        doc.add_class(panel, ACTIVE_CLASS);
        for animated in doc.select(panel, |d, id| d.has_attribute(id, "data-ani")) {
            doc.remove_class(animated, PLAYED_CLASS);
        }
        Ok(())
    }

    /// Select the panel named by a URL fragment (`#projects` or `projects`).
    ///
    /// Only elements that are tab panels qualify. Returns true on a switch.
    pub fn deep_link(&self, doc: &mut Document, fragment: &str) -> bool {
        let id = fragment.strip_prefix('#').unwrap_or(fragment);
        if id.is_empty() {
            return false;
        }
        match doc.element_by_id(id) {
            Some(panel) if doc.has_class(panel, PANEL_CLASS) => self.switch_to(doc, id).is_ok(),
            _ => false,
        }
    }
}
