//! Page loader overlay.

use crate::config::LoaderConfig;
use crate::event::PageEvent;
use crate::page::{ElementId, Page, ReadyState};
use crate::timing::Scheduler;
use log::debug;

/// Hides the loader overlay shortly after a full load, or at mount if the
/// document had already finished loading. Hiding twice is harmless.
#[derive(Debug)]
pub struct PageLoader {
    config: LoaderConfig,
    loader: Option<ElementId>,
}

impl PageLoader {
    pub fn mount(page: &mut dyn Page, config: &LoaderConfig) -> Self {
        let loader = Self {
            config: config.clone(),
            loader: page.element_by_id(&config.id),
        };
        if page.ready_state() == ReadyState::Complete {
            debug!("document already complete at mount, hiding loader");
            loader.hide(page);
        }
        loader
    }

    /// Full-load event: hide after the configured delay
    pub fn on_load(&self, scheduler: &Scheduler) {
        if self.loader.is_some() {
            scheduler.after(self.config.delay(), PageEvent::LoaderDelayElapsed);
        }
    }

    pub fn on_delay_elapsed(&self, page: &mut dyn Page) {
        self.hide(page);
    }

    pub fn is_hidden(&self, page: &dyn Page) -> bool {
        self.loader
            .is_some_and(|loader| page.has_class(loader, &self.config.hidden_class))
    }

    fn hide(&self, page: &mut dyn Page) {
        if let Some(loader) = self.loader {
            page.add_class(loader, &self.config.hidden_class);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::MemoryPage;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn page_with_loader(state: ReadyState) -> MemoryPage {
        let mut page = MemoryPage::default();
        let root = page.root();
        let overlay = page.append_element(root, "div");
        page.set_attribute(overlay, "id", "pageLoader");
        page.set_ready_state(state);
        page
    }

    #[test]
    fn test_complete_document_hides_at_mount() {
        let mut page = page_with_loader(ReadyState::Complete);
        let loader = PageLoader::mount(&mut page, &LoaderConfig::default());
        assert!(loader.is_hidden(&page));
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_hides_after_delay() {
        let mut page = page_with_loader(ReadyState::Interactive);
        let loader = PageLoader::mount(&mut page, &LoaderConfig::default());
        assert!(!loader.is_hidden(&page));

        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = Scheduler::current(tx).unwrap();
        loader.on_load(&scheduler);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(rx.recv().await, Some(PageEvent::LoaderDelayElapsed));

        loader.on_delay_elapsed(&mut page);
        loader.on_delay_elapsed(&mut page);
        assert!(loader.is_hidden(&page));
        let overlay = page.element_by_id("pageLoader").unwrap();
        assert_eq!(page.classes(overlay), &["hide".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_loader_schedules_nothing() {
        let mut page = MemoryPage::default();
        page.set_ready_state(ReadyState::Complete);
        let loader = PageLoader::mount(&mut page, &LoaderConfig::default());
        assert!(!loader.is_hidden(&page));

        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = Scheduler::current(tx).unwrap();
        loader.on_load(&scheduler);
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(rx.try_recv().is_err());
    }
}
