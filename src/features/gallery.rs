//! Category filter for the gallery page.
//!
//! Every configured section key owns a container (`[data-section=key]`) and a
//! title. Titles name their section with `data-section-title`; titles that do
//! not are paired with keys by position, which only holds while the markup
//! lists titles in the configured key order.

use crate::config::GalleryConfig;
use crate::event::PageEvent;
use crate::page::{ElementId, Page, ScrollBehavior};
use crate::timing::Scheduler;
use log::{debug, warn};

/// What a filter button selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    Section(String),
}

impl Filter {
    pub fn parse(value: &str, all_value: &str) -> Self {
        if value == all_value {
            Filter::All
        } else {
            Filter::Section(value.to_string())
        }
    }

    pub fn shows(&self, key: &str) -> bool {
        match self {
            Filter::All => true,
            Filter::Section(selected) => selected == key,
        }
    }
}

#[derive(Debug, Clone)]
struct GallerySection {
    key: String,
    container: Option<ElementId>,
    title: Option<ElementId>,
}

#[derive(Debug)]
pub struct GalleryFilter {
    config: GalleryConfig,
    buttons: Vec<(ElementId, String)>,
    sections: Vec<GallerySection>,
    dividers: Vec<ElementId>,
    active: Option<Filter>,
}

impl GalleryFilter {
    /// Returns `None` when the page has no filter buttons.
    pub fn mount(page: &dyn Page, config: &GalleryConfig) -> Option<Self> {
        let buttons: Vec<(ElementId, String)> = page
            .elements_with_class(&config.button_class)
            .into_iter()
            .map(|button| {
                let value = page
                    .attribute(button, &config.filter_attribute)
                    .unwrap_or_default();
                (button, value)
            })
            .collect();
        if buttons.is_empty() {
            return None;
        }

        let containers = page.elements_with_attribute(&config.section_attribute);
        let mut sections: Vec<GallerySection> = config
            .sections
            .iter()
            .map(|key| GallerySection {
                key: key.clone(),
                container: containers.iter().copied().find(|element| {
                    page.attribute(*element, &config.section_attribute)
                        .is_some_and(|value| value == *key)
                }),
                title: None,
            })
            .collect();
        pair_titles(page, config, &mut sections);

        let dividers = page
            .descendants_with_tag(page.root(), &config.divider_parent_tag)
            .into_iter()
            .flat_map(|parent| page.children_with_tag(parent, &config.divider_tag))
            .collect();

        debug!(
            "gallery mounted with {} buttons and {} sections",
            buttons.len(),
            sections.iter().filter(|s| s.container.is_some()).count()
        );
        Some(Self {
            config: config.clone(),
            buttons,
            sections,
            dividers,
            active: None,
        })
    }

    /// Filter selected by the most recent button click
    pub fn active_filter(&self) -> Option<&Filter> {
        self.active.as_ref()
    }

    /// Container and title resolved for `key`
    pub fn section_elements(&self, key: &str) -> Option<(Option<ElementId>, Option<ElementId>)> {
        self.sections
            .iter()
            .find(|section| section.key == key)
            .map(|section| (section.container, section.title))
    }

    pub fn dividers(&self) -> &[ElementId] {
        &self.dividers
    }

    /// Apply the filter when `element` is a filter button. Returns whether it was.
    pub fn on_element_click(
        &mut self,
        page: &mut dyn Page,
        scheduler: &Scheduler,
        element: ElementId,
    ) -> bool {
        let Some(value) = self
            .buttons
            .iter()
            .find(|(button, _)| *button == element)
            .map(|(_, value)| value.clone())
        else {
            return false;
        };
        self.select(page, scheduler, element, &value);
        true
    }

    fn select(&mut self, page: &mut dyn Page, scheduler: &Scheduler, button: ElementId, value: &str) {
        for (other, _) in &self.buttons {
            page.remove_class(*other, &self.config.active_class);
        }
        page.add_class(button, &self.config.active_class);

        let filter = Filter::parse(value, &self.config.all_value);
        for section in &self.sections {
            let visible = filter.shows(&section.key);
            for element in [section.container, section.title].into_iter().flatten() {
                self.set_visible(page, element, visible);
            }
        }

        let display = if filter == Filter::All { "block" } else { "none" };
        for divider in &self.dividers {
            page.set_style(*divider, "display", Some(display));
        }

        if let Filter::Section(key) = &filter {
            if self.container(key).is_some() {
                scheduler.after(
                    self.config.scroll_delay(),
                    PageEvent::FilterScrollDue {
                        section: key.clone(),
                    },
                );
            }
        }
        debug!("gallery filter set to {:?}", filter);
        self.active = Some(filter);
    }

    /// Delay elapsed: bring the selected section just below the viewport top
    pub fn on_scroll_due(&self, page: &mut dyn Page, key: &str) {
        if let Some(container) = self.container(key) {
            let top = page.offset_top(container) - self.config.scroll_offset;
            page.scroll_to(top, ScrollBehavior::Smooth);
        }
    }

    fn container(&self, key: &str) -> Option<ElementId> {
        self.sections
            .iter()
            .find(|section| section.key == key)
            .and_then(|section| section.container)
    }

    fn set_visible(&self, page: &mut dyn Page, element: ElementId, visible: bool) {
        if visible {
            page.remove_class(element, &self.config.hidden_class);
            page.add_class(element, &self.config.visible_class);
        } else {
            page.add_class(element, &self.config.hidden_class);
            page.remove_class(element, &self.config.visible_class);
        }
    }
}

/// Attach titles to sections: by key attribute first, then by position for
/// titles without one.
fn pair_titles(page: &dyn Page, config: &GalleryConfig, sections: &mut [GallerySection]) {
    let titles = page.elements_with_class(&config.title_class);

    for title in &titles {
        let Some(key) = page.attribute(*title, &config.title_key_attribute) else {
            continue;
        };
        match sections.iter_mut().find(|section| section.key == key) {
            Some(section) if section.title.is_none() => section.title = Some(*title),
            Some(_) => warn!("gallery section `{}` has more than one title", key),
            None => warn!("gallery title names unknown section `{}`", key),
        }
    }

    for (index, title) in titles.iter().enumerate() {
        if page.attribute(*title, &config.title_key_attribute).is_some() {
            continue;
        }
        let Some(section) = sections.get_mut(index) else {
            continue;
        };
        if section.title.is_none() {
            warn!(
                "gallery title {} has no `{}`, pairing it with `{}` by position",
                index, config.title_key_attribute, section.key
            );
            section.title = Some(*title);
        }
    }
}
