//! Application orchestration layer
//!
//! `Application::mount` is the single registration pass: it resolves every
//! feature against the page once and applies the initial state. Afterwards
//! every host and timer event flows through `handle_event`, one at a time, so
//! the features never observe each other mid-update.

use crate::config::SiteConfig;
use crate::error::Result;
use crate::event::{ClickOutcome, PageEvent};
use crate::features::{
    AnchorScroll, GalleryFilter, NavMenu, PageLoader, ScrollIndicators, ScrollReveal, ThemeToggle,
};
use crate::page::{ElementId, Page};
use crate::store::PreferenceStore;
use crate::timing::Scheduler;
use log::{debug, info, trace};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Page controller - owns the page handle, the store and every mounted feature
pub struct Application<P: Page, S: PreferenceStore> {
    page: P,
    store: S,
    scheduler: Scheduler,
    theme: Option<ThemeToggle>,
    menu: Option<NavMenu>,
    reveal: ScrollReveal,
    scroll: Option<ScrollIndicators>,
    loader: PageLoader,
    anchors: AnchorScroll,
    gallery: Option<GalleryFilter>,
}

impl<P: Page, S: PreferenceStore> Application<P, S> {
    /// Attach every feature to a rendered page.
    ///
    /// Timer events are posted to `events`; the host posts its own events to
    /// the same queue and feeds the receiving end to [`Application::run`]. Must
    /// be called from within a tokio runtime.
    pub fn mount(
        mut page: P,
        store: S,
        config: &SiteConfig,
        events: UnboundedSender<PageEvent>,
    ) -> Result<Self> {
        let scheduler = Scheduler::current(events)?;

        let theme = ThemeToggle::mount(&mut page, &store, &config.theme);
        let menu = NavMenu::mount(&mut page, &config.menu);
        let reveal = ScrollReveal::mount(&mut page, &config.reveal);
        let scroll = ScrollIndicators::mount(&page, &config.scroll, &scheduler);
        let loader = PageLoader::mount(&mut page, &config.loader);
        let anchors = AnchorScroll::mount(&page);
        let gallery = GalleryFilter::mount(&page, &config.gallery);

        info!(
            "mounted page features: theme={} menu={} scroll={} gallery={} anchors={} reveal={}",
            theme.is_some(),
            menu.is_some(),
            scroll.is_some(),
            gallery.is_some(),
            anchors.len(),
            reveal.pending()
        );

        Ok(Self {
            page,
            store,
            scheduler,
            theme,
            menu,
            reveal,
            scroll,
            loader,
            anchors,
            gallery,
        })
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn theme(&self) -> Option<&ThemeToggle> {
        self.theme.as_ref()
    }

    pub fn menu(&self) -> Option<&NavMenu> {
        self.menu.as_ref()
    }

    pub fn reveal(&self) -> &ScrollReveal {
        &self.reveal
    }

    pub fn scroll(&self) -> Option<&ScrollIndicators> {
        self.scroll.as_ref()
    }

    pub fn loader(&self) -> &PageLoader {
        &self.loader
    }

    pub fn gallery(&self) -> Option<&GalleryFilter> {
        self.gallery.as_ref()
    }

    /// Handle one event - returns false once the loop should stop
    pub fn handle_event(&mut self, event: PageEvent) -> bool {
        trace!("handling {:?}", event);
        match event {
            PageEvent::Load => self.loader.on_load(&self.scheduler),
            PageEvent::Click { target } => {
                self.dispatch_click(target);
            }
            PageEvent::Scroll => {
                if let Some(scroll) = &mut self.scroll {
                    scroll.on_scroll();
                }
            }
            PageEvent::Intersections(entries) => {
                self.reveal.on_intersections(&mut self.page, &entries);
            }
            PageEvent::ScrollSettled => {
                if let Some(scroll) = &self.scroll {
                    scroll.on_settled(&mut self.page);
                }
            }
            PageEvent::LoaderDelayElapsed => self.loader.on_delay_elapsed(&mut self.page),
            PageEvent::FilterScrollDue { section } => {
                if let Some(gallery) = &self.gallery {
                    gallery.on_scroll_due(&mut self.page, &section);
                }
            }
            PageEvent::Shutdown => return false,
        }
        true
    }

    /// Deliver a click the way the DOM bubbles it.
    ///
    /// Handlers registered on the target run first, then those on each
    /// ancestor, then the document-level outside-click handler. A handler that
    /// stops propagation ends the walk after its own element and keeps the
    /// document handler from running.
    pub fn dispatch_click(&mut self, target: ElementId) -> ClickOutcome {
        let mut outcome = ClickOutcome::default();

        for node in self.page.ancestry(target) {
            if let Some(theme) = &mut self.theme {
                theme.on_element_click(&mut self.page, &mut self.store, node);
            }
            if let Some(menu) = &self.menu {
                menu.on_element_click(&mut self.page, node, &mut outcome);
            }
            if let Some(scroll) = &self.scroll {
                scroll.on_element_click(&mut self.page, node);
            }
            self.anchors.on_element_click(&mut self.page, node, &mut outcome);
            if let Some(gallery) = &mut self.gallery {
                gallery.on_element_click(&mut self.page, &self.scheduler, node);
            }

            if outcome.propagation_stopped {
                debug!("click on {} stopped at {}", target, node);
                break;
            }
        }

        if !outcome.propagation_stopped {
            if let Some(menu) = &self.menu {
                menu.on_document_click(&mut self.page, target);
            }
        }
        outcome
    }

    /// Process events until shutdown or until every sender is gone
    pub async fn run(&mut self, events: &mut UnboundedReceiver<PageEvent>) {
        while let Some(event) = events.recv().await {
            if !self.handle_event(event) {
                debug!("shutdown requested");
                break;
            }
        }
    }

    pub fn into_parts(self) -> (P, S) {
        (self.page, self.store)
    }
}
