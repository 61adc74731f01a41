//! Collapsible navigation menu.
//!
//! The open state is the presence of the open class on the container. The
//! toggle icon stops propagation so the document-level outside-click handler
//! never sees the click that opened the menu.

use crate::config::MenuConfig;
use crate::event::ClickOutcome;
use crate::page::{ElementId, Page};
use log::debug;
use std::collections::BTreeSet;

#[derive(Debug)]
pub struct NavMenu {
    config: MenuConfig,
    container: ElementId,
    icon: Option<ElementId>,
    links: Vec<ElementId>,
}

impl NavMenu {
    /// Returns `None` when the page has no menu container.
    pub fn mount(page: &mut dyn Page, config: &MenuConfig) -> Option<Self> {
        let container = page
            .elements_with_class(&config.container_class)
            .into_iter()
            .next()?;
        let icon = page
            .elements_with_class(&config.icon_class)
            .into_iter()
            .find(|icon| *icon != container && page.contains(container, *icon));
        let links = menu_links(page, container);
        debug!(
            "menu mounted with {} links (icon: {})",
            links.len(),
            icon.is_some()
        );

        Some(Self {
            config: config.clone(),
            container,
            icon,
            links,
        })
    }

    pub fn is_open(&self, page: &dyn Page) -> bool {
        page.has_class(self.container, &self.config.open_class)
    }

    pub fn links(&self) -> &[ElementId] {
        &self.links
    }

    /// Handlers registered on `element` itself: the toggle icon and menu links.
    pub fn on_element_click(
        &self,
        page: &mut dyn Page,
        element: ElementId,
        outcome: &mut ClickOutcome,
    ) {
        if Some(element) == self.icon {
            outcome.prevent_default();
            outcome.stop_propagation();
            let open = page.toggle_class(self.container, &self.config.open_class);
            debug!("menu {}", if open { "opened" } else { "closed" });
        } else if self.links.contains(&element) {
            page.remove_class(self.container, &self.config.open_class);
            self.emphasize(page, element);
        }
    }

    /// Document-level handler: any click outside the container closes the menu.
    pub fn on_document_click(&self, page: &mut dyn Page, target: ElementId) {
        if !page.contains(self.container, target) {
            page.remove_class(self.container, &self.config.open_class);
        }
    }

    fn emphasize(&self, page: &mut dyn Page, clicked: ElementId) {
        for link in &self.links {
            page.set_style(*link, "color", None);
            page.set_style(*link, "font-weight", None);
        }
        page.set_style(clicked, "color", Some(&self.config.active_link_color));
        page.set_style(clicked, "font-weight", Some(&self.config.active_link_weight));
    }
}

/// Anchors inside list items of lists inside the container, in document order.
fn menu_links(page: &dyn Page, container: ElementId) -> Vec<ElementId> {
    let mut seen = BTreeSet::new();
    let mut links = Vec::new();
    for list in page.descendants_with_tag(container, "ul") {
        for item in page.descendants_with_tag(list, "li") {
            for link in page.descendants_with_tag(item, "a") {
                if seen.insert(link) {
                    links.push(link);
                }
            }
        }
    }
    links
}
