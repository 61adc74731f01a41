//! Smooth scrolling for in-page anchor links.

use crate::event::ClickOutcome;
use crate::page::{ElementId, Page, ScrollBehavior};
use log::{debug, trace};
use std::collections::BTreeSet;

#[derive(Debug)]
pub struct AnchorScroll {
    anchors: BTreeSet<ElementId>,
}

impl AnchorScroll {
    /// Collect every `a` whose `href` starts with `#`
    pub fn mount(page: &dyn Page) -> Self {
        let anchors: BTreeSet<ElementId> = page
            .descendants_with_tag(page.root(), "a")
            .into_iter()
            .filter(|anchor| {
                page.attribute(*anchor, "href")
                    .is_some_and(|href| href.starts_with('#'))
            })
            .collect();
        debug!("intercepting {} in-page anchors", anchors.len());
        Self { anchors }
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Replace navigation with a smooth scroll when the fragment resolves.
    /// A bare `#` or a missing target keeps the default behavior.
    pub fn on_element_click(
        &self,
        page: &mut dyn Page,
        element: ElementId,
        outcome: &mut ClickOutcome,
    ) {
        if !self.anchors.contains(&element) {
            return;
        }
        let Some(href) = page.attribute(element, "href") else {
            return;
        };
        let Some(target) = page.element_by_fragment(&href) else {
            trace!("fragment {} has no target, leaving default navigation", href);
            return;
        };

        outcome.prevent_default();
        let top = page.offset_top(target);
        page.scroll_to(top, ScrollBehavior::Smooth);
    }
}
