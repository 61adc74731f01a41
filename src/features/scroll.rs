//! Back-to-top button and scroll progress bar.
//!
//! Scroll events are debounced; once scrolling has been quiet for the
//! configured window the button visibility and the progress width are
//! recomputed from the current offset.

use crate::config::ScrollConfig;
use crate::event::PageEvent;
use crate::page::{ElementId, Page, ScrollBehavior};
use crate::timing::{Debounced, Scheduler};
use log::{debug, trace};

/// Percentage of the scrollable distance covered at `offset`.
///
/// Returns `None` when the document is not taller than the viewport.
pub fn scroll_percent(offset: f64, scroll_height: f64, viewport_height: f64) -> Option<f64> {
    let scrollable = scroll_height - viewport_height;
    if scrollable <= 0.0 {
        return None;
    }
    Some(offset / scrollable * 100.0)
}

#[derive(Debug)]
pub struct ScrollIndicators {
    config: ScrollConfig,
    button: Option<ElementId>,
    progress: Option<ElementId>,
    settle: Debounced<()>,
}

impl ScrollIndicators {
    /// Returns `None` when neither the button nor the progress bar exists.
    pub fn mount(page: &dyn Page, config: &ScrollConfig, scheduler: &Scheduler) -> Option<Self> {
        let button = page.element_by_id(&config.back_to_top_id);
        let progress = page.element_by_id(&config.progress_id);
        if button.is_none() && progress.is_none() {
            return None;
        }
        debug!(
            "scroll indicators mounted (button: {}, progress: {})",
            button.is_some(),
            progress.is_some()
        );

        let events = scheduler.clone();
        let settle = Debounced::new(config.debounce(), scheduler.clone(), move |()| {
            events.post(PageEvent::ScrollSettled);
        });

        Some(Self {
            config: config.clone(),
            button,
            progress,
            settle,
        })
    }

    /// Raw scroll event: restart the quiet window
    pub fn on_scroll(&mut self) {
        self.settle.call(());
    }

    pub fn is_settling(&self) -> bool {
        self.settle.is_pending()
    }

    /// Quiet window elapsed: refresh the button and the progress bar
    pub fn on_settled(&self, page: &mut dyn Page) {
        let offset = page.scroll_offset();

        if let Some(button) = self.button {
            if offset > self.config.show_after {
                page.add_class(button, &self.config.visible_class);
            } else {
                page.remove_class(button, &self.config.visible_class);
            }
        }

        if let Some(progress) = self.progress {
            match scroll_percent(offset, page.scroll_height(), page.viewport_height()) {
                Some(percent) => {
                    let width = format!("{}%", percent);
                    page.set_style(progress, "width", Some(&width));
                }
                None => trace!("document fits the viewport, progress left unchanged"),
            }
        }
    }

    /// Smooth-scroll to the top when `element` is the button. Returns whether it was.
    pub fn on_element_click(&self, page: &mut dyn Page, element: ElementId) -> bool {
        if Some(element) != self.button {
            return false;
        }
        page.scroll_to(0.0, ScrollBehavior::Smooth);
        true
    }
}
