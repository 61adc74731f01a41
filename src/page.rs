//! Page abstraction consumed by the feature handlers.
//!
//! The handlers never own the visual tree. They read and write classes,
//! inline styles and the scroll position of a host page through the [`Page`]
//! trait, which a browser binding or the in-memory [`MemoryPage`] implements.
//! Nodes are never created or destroyed through this interface.

pub mod fixture;
pub mod memory;

pub use fixture::{FixturePage, NodeSpec, PageFixture};
pub use memory::{ElementSnapshot, MemoryPage};

use serde::Deserialize;
use std::fmt;

/// Opaque handle to an element owned by the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a programmatic scroll should be performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    /// Jump instantly
    #[default]
    Auto,
    /// Animated scroll handled by the host
    Smooth,
}

/// Document loading progress as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadyState {
    Loading,
    #[default]
    Interactive,
    Complete,
}

/// Region and threshold used when watching an element's visibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionOptions {
    /// Fraction of the element's area that must be inside the region (0.0-1.0)
    pub threshold: f64,
    /// Pixels trimmed from the bottom edge of the viewport region
    pub bottom_inset: f64,
}

impl Default for IntersectionOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            bottom_inset: 0.0,
        }
    }
}

/// Visibility report delivered by the host for one observed element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub is_intersecting: bool,
    pub ratio: f64,
}

/// Host page interface: the visual tree plus the viewport it is shown in.
pub trait Page {
    /// The document's root element
    fn root(&self) -> ElementId;

    /// Parent of `element`, `None` for the root
    fn parent(&self, element: ElementId) -> Option<ElementId>;

    /// Element whose `id` attribute equals `id`
    fn element_by_id(&self, id: &str) -> Option<ElementId>;

    /// Elements carrying `class`, in document order
    fn elements_with_class(&self, class: &str) -> Vec<ElementId>;

    /// Elements carrying attribute `name` (any value), in document order
    fn elements_with_attribute(&self, name: &str) -> Vec<ElementId>;

    /// Descendants of `ancestor` (excluding itself) with tag `tag`, in document order
    fn descendants_with_tag(&self, ancestor: ElementId, tag: &str) -> Vec<ElementId>;

    /// Direct children of `parent` with tag `tag`, in document order
    fn children_with_tag(&self, parent: ElementId, tag: &str) -> Vec<ElementId>;

    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    fn has_class(&self, element: ElementId, class: &str) -> bool;

    fn add_class(&mut self, element: ElementId, class: &str);

    fn remove_class(&mut self, element: ElementId, class: &str);

    /// Set an inline style property, or clear it with `None`
    fn set_style(&mut self, element: ElementId, property: &str, value: Option<&str>);

    /// Vertical scroll offset of the viewport
    fn scroll_offset(&self) -> f64;

    fn viewport_height(&self) -> f64;

    /// Full scrollable height of the document
    fn scroll_height(&self) -> f64;

    /// Distance from the document top to the element's top edge
    fn offset_top(&self, element: ElementId) -> f64;

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);

    fn ready_state(&self) -> ReadyState;

    /// Whether the system color-scheme preference is dark
    fn prefers_dark_scheme(&self) -> bool;

    /// Start reporting visibility changes for `element` as intersection entries
    fn observe(&mut self, element: ElementId, options: IntersectionOptions);

    fn unobserve(&mut self, element: ElementId);

    /// Inclusive containment: an element contains itself
    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut current = Some(node);
        while let Some(element) = current {
            if element == ancestor {
                return true;
            }
            current = self.parent(element);
        }
        false
    }

    /// Flip `class` on `element`, returning whether it is now present
    fn toggle_class(&mut self, element: ElementId, class: &str) -> bool {
        if self.has_class(element, class) {
            self.remove_class(element, class);
            false
        } else {
            self.add_class(element, class);
            true
        }
    }

    /// Resolve an in-page fragment such as `#contact` to its target element
    fn element_by_fragment(&self, fragment: &str) -> Option<ElementId> {
        let id = fragment.strip_prefix('#')?;
        if id.is_empty() {
            return None;
        }
        self.element_by_id(id)
    }

    /// Elements that are at `element` or above it, nearest first
    fn ancestry(&self, element: ElementId) -> Vec<ElementId> {
        let mut chain = Vec::new();
        let mut current = Some(element);
        while let Some(node) = current {
            chain.push(node);
            current = self.parent(node);
        }
        chain
    }
}
