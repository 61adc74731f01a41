//! One-shot reveal of flagged elements as they scroll into view.

use crate::config::RevealConfig;
use crate::page::{ElementId, IntersectionEntry, IntersectionOptions, Page};
use log::{debug, trace};
use std::collections::BTreeSet;

#[derive(Debug)]
pub struct ScrollReveal {
    revealed_class: String,
    watched: BTreeSet<ElementId>,
}

impl ScrollReveal {
    /// Start watching every flagged element. Always mounts, possibly watching nothing.
    pub fn mount(page: &mut dyn Page, config: &RevealConfig) -> Self {
        let options = IntersectionOptions {
            threshold: config.threshold,
            bottom_inset: config.bottom_inset,
        };
        let mut watched = BTreeSet::new();
        for element in page.elements_with_attribute(&config.attribute) {
            page.observe(element, options);
            watched.insert(element);
        }
        debug!("watching {} elements for reveal", watched.len());

        Self {
            revealed_class: config.revealed_class.clone(),
            watched,
        }
    }

    /// Reveal and stop watching every intersecting watched target. Returns how many were revealed.
    pub fn on_intersections(&mut self, page: &mut dyn Page, entries: &[IntersectionEntry]) -> usize {
        let mut revealed = 0;
        for entry in entries.iter().filter(|entry| entry.is_intersecting) {
            if !self.watched.remove(&entry.target) {
                continue;
            }
            page.add_class(entry.target, &self.revealed_class);
            page.unobserve(entry.target);
            trace!("revealed {} at ratio {:.2}", entry.target, entry.ratio);
            revealed += 1;
        }
        revealed
    }

    /// Elements still waiting to be revealed
    pub fn pending(&self) -> usize {
        self.watched.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::PageEvent;
    use crate::page::MemoryPage;

    fn drain_entries(page: &mut MemoryPage) -> Vec<IntersectionEntry> {
        page.take_host_events()
            .into_iter()
            .filter_map(|event| match event {
                PageEvent::Intersections(entries) => Some(entries),
                _ => None,
            })
            .flatten()
            .collect()
    }

    #[test]
    fn test_reveal_is_one_shot() {
        let mut page = MemoryPage::new(600.0);
        let root = page.root();
        let above = page.append_element(root, "div");
        page.set_attribute(above, "data-reveal", "");
        page.set_layout(above, 100.0, 200.0);
        let below = page.append_element(root, "div");
        page.set_attribute(below, "data-reveal", "fade-up");
        page.set_layout(below, 1500.0, 200.0);
        let plain = page.append_element(root, "div");
        page.set_layout(plain, 2000.0, 200.0);

        let mut reveal = ScrollReveal::mount(&mut page, &RevealConfig::default());
        assert_eq!(reveal.pending(), 2);
        assert!(page.is_observed(above) && page.is_observed(below));
        assert!(!page.is_observed(plain));

        let entries = drain_entries(&mut page);
        assert_eq!(reveal.on_intersections(&mut page, &entries), 1);
        assert!(page.has_class(above, "revealed"));
        assert!(!page.is_observed(above));

        page.user_scroll(1200.0);
        let entries = drain_entries(&mut page);
        assert_eq!(reveal.on_intersections(&mut page, &entries), 1);
        assert!(page.has_class(below, "revealed"));
        assert_eq!(reveal.pending(), 0);

        // Leaving and re-entering never re-triggers
        page.user_scroll(0.0);
        page.user_scroll(1200.0);
        let entries = drain_entries(&mut page);
        assert!(entries.is_empty());
        let replay = [IntersectionEntry {
            target: below,
            is_intersecting: true,
            ratio: 1.0,
        }];
        assert_eq!(reveal.on_intersections(&mut page, &replay), 0);
        assert_eq!(page.classes(below), &["revealed".to_string()]);
    }
}
