//! Events delivered to the page controller.
//!
//! Host events (clicks, scrolls, visibility reports, load) and timer events
//! (posted by deferred callbacks) share one queue so every handler runs on the
//! same consumer, one event at a time.

use crate::page::{ElementId, IntersectionEntry};

/// Everything the controller reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// All resources finished loading
    Load,
    /// A click whose innermost target is `target`
    Click { target: ElementId },
    /// The viewport scroll offset changed
    Scroll,
    /// Visibility reports for observed elements
    Intersections(Vec<IntersectionEntry>),
    /// The scroll debounce window elapsed without a new scroll
    ScrollSettled,
    /// The post-load loader delay elapsed
    LoaderDelayElapsed,
    /// The delay before scrolling to a freshly filtered gallery section elapsed
    FilterScrollDue { section: String },
    /// Stop the event loop
    Shutdown,
}

impl PageEvent {
    /// Whether the event originates from a deferred callback rather than the host
    pub fn is_timer(&self) -> bool {
        matches!(
            self,
            PageEvent::ScrollSettled
                | PageEvent::LoaderDelayElapsed
                | PageEvent::FilterScrollDue { .. }
        )
    }
}

/// What handlers decided about a click while it bubbled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickOutcome {
    /// Default navigation must not happen
    pub default_prevented: bool,
    /// Ancestors and the document-level handler must not see the click
    pub propagation_stopped: bool,
}

impl ClickOutcome {
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_classification() {
        assert!(PageEvent::ScrollSettled.is_timer());
        assert!(PageEvent::LoaderDelayElapsed.is_timer());
        assert!(PageEvent::FilterScrollDue {
            section: "honors".to_string()
        }
        .is_timer());
        assert!(!PageEvent::Scroll.is_timer());
        assert!(!PageEvent::Load.is_timer());
    }

    #[test]
    fn test_click_outcome_flags() {
        let mut outcome = ClickOutcome::default();
        assert!(!outcome.default_prevented && !outcome.propagation_stopped);
        outcome.prevent_default();
        outcome.stop_propagation();
        assert!(outcome.default_prevented);
        assert!(outcome.propagation_stopped);
    }
}
