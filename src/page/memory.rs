//! In-memory page used by the simulator and the tests.
//!
//! `MemoryPage` keeps a small element tree with per-element layout (top offset
//! and height) and a single vertical viewport. Like a browser it reports its
//! own activity back to the driver: scroll events after the offset changes, and
//! intersection entries when an element is first observed and whenever its
//! visibility crosses the observation threshold. Those reports are queued and
//! drained with [`MemoryPage::take_host_events`].

use crate::event::PageEvent;
use crate::page::{
    ElementId, IntersectionEntry, IntersectionOptions, Page, ReadyState, ScrollBehavior,
};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    top: f64,
    height: f64,
}

impl Node {
    fn new(tag: &str, parent: Option<ElementId>) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            parent,
            children: Vec::new(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            top: 0.0,
            height: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Observation {
    options: IntersectionOptions,
    intersecting: bool,
}

/// Element tree plus viewport, implementing [`Page`].
#[derive(Debug, Clone)]
pub struct MemoryPage {
    nodes: Vec<Node>,
    viewport_height: f64,
    scroll_height: Option<f64>,
    scroll_offset: f64,
    ready_state: ReadyState,
    prefers_dark: bool,
    observed: BTreeMap<ElementId, Observation>,
    host_events: VecDeque<PageEvent>,
    last_scroll_behavior: Option<ScrollBehavior>,
}

impl MemoryPage {
    /// Create a page holding only an `html` root element
    pub fn new(viewport_height: f64) -> Self {
        Self {
            nodes: vec![Node::new("html", None)],
            viewport_height: viewport_height.max(0.0),
            scroll_height: None,
            scroll_offset: 0.0,
            ready_state: ReadyState::default(),
            prefers_dark: false,
            observed: BTreeMap::new(),
            host_events: VecDeque::new(),
            last_scroll_behavior: None,
        }
    }

    /// Append a new element with `tag` as the last child of `parent`
    pub fn append_element(&mut self, parent: ElementId, tag: &str) -> ElementId {
        let id = ElementId::new(self.nodes.len());
        self.nodes.push(Node::new(tag, Some(parent)));
        if let Some(node) = self.nodes.get_mut(parent.index()) {
            node.children.push(id);
        }
        id
    }

    pub fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(node) = self.node_mut(element) {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    /// Place `element` at `top` pixels from the document top with the given height
    pub fn set_layout(&mut self, element: ElementId, top: f64, height: f64) {
        if let Some(node) = self.node_mut(element) {
            node.top = top;
            node.height = height.max(0.0);
        }
    }

    /// Override the document height instead of deriving it from element layout
    pub fn set_scroll_height(&mut self, height: Option<f64>) {
        self.scroll_height = height;
    }

    pub fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
    }

    pub fn set_prefers_dark(&mut self, prefers_dark: bool) {
        self.prefers_dark = prefers_dark;
    }

    /// Scroll as the user would, without recording a programmatic behavior
    pub fn user_scroll(&mut self, top: f64) {
        self.apply_scroll(top);
    }

    pub fn tag(&self, element: ElementId) -> Option<&str> {
        self.node(element).map(|node| node.tag.as_str())
    }

    pub fn classes(&self, element: ElementId) -> &[String] {
        self.node(element)
            .map(|node| node.classes.as_slice())
            .unwrap_or(&[])
    }

    /// Current value of an inline style property
    pub fn style(&self, element: ElementId, property: &str) -> Option<&str> {
        self.node(element)
            .and_then(|node| node.styles.get(property))
            .map(String::as_str)
    }

    pub fn is_observed(&self, element: ElementId) -> bool {
        self.observed.contains_key(&element)
    }

    /// Behavior of the most recent programmatic [`Page::scroll_to`]
    pub fn last_scroll_behavior(&self) -> Option<ScrollBehavior> {
        self.last_scroll_behavior
    }

    /// Drain scroll and intersection reports produced since the last call
    pub fn take_host_events(&mut self) -> Vec<PageEvent> {
        self.host_events.drain(..).collect()
    }

    /// All elements in document order
    pub fn document_order(&self) -> Vec<ElementId> {
        self.descendants_inclusive(self.root())
    }

    /// Visual state of every element, in document order
    pub fn snapshot(&self) -> Vec<ElementSnapshot> {
        self.document_order()
            .into_iter()
            .filter_map(|element| {
                self.node(element).map(|node| ElementSnapshot {
                    element,
                    tag: node.tag.clone(),
                    id: node.attributes.get("id").cloned(),
                    classes: node.classes.clone(),
                    styles: node
                        .styles
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect(),
                })
            })
            .collect()
    }

    fn node(&self, element: ElementId) -> Option<&Node> {
        self.nodes.get(element.index())
    }

    fn node_mut(&mut self, element: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(element.index())
    }

    fn descendants_inclusive(&self, element: ElementId) -> Vec<ElementId> {
        let mut order = Vec::new();
        let mut stack = vec![element];
        while let Some(current) = stack.pop() {
            let Some(node) = self.node(current) else {
                continue;
            };
            order.push(current);
            stack.extend(node.children.iter().rev().copied());
        }
        order
    }

    fn max_scroll(&self) -> f64 {
        (self.scroll_height() - self.viewport_height).max(0.0)
    }

    fn apply_scroll(&mut self, top: f64) {
        let clamped = top.clamp(0.0, self.max_scroll());
        if clamped == self.scroll_offset {
            return;
        }
        self.scroll_offset = clamped;
        self.host_events.push_back(PageEvent::Scroll);

        let mut crossings = Vec::new();
        let observed: Vec<ElementId> = self.observed.keys().copied().collect();
        for element in observed {
            let Some(observation) = self.observed.get(&element).copied() else {
                continue;
            };
            let entry = self.intersection(element, observation.options);
            if entry.is_intersecting != observation.intersecting {
                if let Some(slot) = self.observed.get_mut(&element) {
                    slot.intersecting = entry.is_intersecting;
                }
                crossings.push(entry);
            }
        }
        if !crossings.is_empty() {
            self.host_events
                .push_back(PageEvent::Intersections(crossings));
        }
    }

    fn intersection(&self, element: ElementId, options: IntersectionOptions) -> IntersectionEntry {
        let (top, height) = self
            .node(element)
            .map(|node| (node.top, node.height))
            .unwrap_or((0.0, 0.0));
        let region_top = self.scroll_offset;
        let region_bottom = self.scroll_offset + self.viewport_height - options.bottom_inset;

        let ratio = if height > 0.0 {
            let overlap = (region_bottom.min(top + height) - region_top.max(top)).max(0.0);
            (overlap / height).min(1.0)
        } else if top >= region_top && top <= region_bottom {
            1.0
        } else {
            0.0
        };

        IntersectionEntry {
            target: element,
            is_intersecting: ratio > 0.0 && ratio >= options.threshold,
            ratio,
        }
    }
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT_HEIGHT)
    }
}

impl Page for MemoryPage {
    fn root(&self) -> ElementId {
        ElementId::new(0)
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.node(element).and_then(|node| node.parent)
    }

    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.document_order().into_iter().find(|element| {
            self.node(*element)
                .and_then(|node| node.attributes.get("id"))
                .is_some_and(|value| value == id)
        })
    }

    fn elements_with_class(&self, class: &str) -> Vec<ElementId> {
        self.document_order()
            .into_iter()
            .filter(|element| self.has_class(*element, class))
            .collect()
    }

    fn elements_with_attribute(&self, name: &str) -> Vec<ElementId> {
        self.document_order()
            .into_iter()
            .filter(|element| {
                self.node(*element)
                    .is_some_and(|node| node.attributes.contains_key(name))
            })
            .collect()
    }

    fn descendants_with_tag(&self, ancestor: ElementId, tag: &str) -> Vec<ElementId> {
        self.descendants_inclusive(ancestor)
            .into_iter()
            .skip(1)
            .filter(|element| {
                self.node(*element)
                    .is_some_and(|node| node.tag.eq_ignore_ascii_case(tag))
            })
            .collect()
    }

    fn children_with_tag(&self, parent: ElementId, tag: &str) -> Vec<ElementId> {
        self.node(parent)
            .map(|node| {
                node.children
                    .iter()
                    .copied()
                    .filter(|child| {
                        self.node(*child)
                            .is_some_and(|c| c.tag.eq_ignore_ascii_case(tag))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.node(element)
            .and_then(|node| node.attributes.get(name))
            .cloned()
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.node(element)
            .is_some_and(|node| node.classes.iter().any(|c| c == class))
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.node_mut(element) {
            if !node.classes.iter().any(|c| c == class) {
                node.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.node_mut(element) {
            node.classes.retain(|c| c != class);
        }
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: Option<&str>) {
        if let Some(node) = self.node_mut(element) {
            match value {
                Some(value) if !value.is_empty() => {
                    node.styles.insert(property.to_string(), value.to_string());
                }
                _ => {
                    node.styles.remove(property);
                }
            }
        }
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn scroll_height(&self) -> f64 {
        self.scroll_height.unwrap_or_else(|| {
            self.nodes
                .iter()
                .map(|node| node.top + node.height)
                .fold(self.viewport_height, f64::max)
        })
    }

    fn offset_top(&self, element: ElementId) -> f64 {
        self.node(element).map(|node| node.top).unwrap_or(0.0)
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.last_scroll_behavior = Some(behavior);
        self.apply_scroll(top);
    }

    fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    fn prefers_dark_scheme(&self) -> bool {
        self.prefers_dark
    }

    fn observe(&mut self, element: ElementId, options: IntersectionOptions) {
        if self.node(element).is_none() {
            return;
        }
        let entry = self.intersection(element, options);
        self.observed.insert(
            element,
            Observation {
                options,
                intersecting: entry.is_intersecting,
            },
        );
        self.host_events
            .push_back(PageEvent::Intersections(vec![entry]));
    }

    fn unobserve(&mut self, element: ElementId) {
        self.observed.remove(&element);
    }
}

/// Visual state of one element, as printed by the simulator.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSnapshot {
    pub element: ElementId,
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub styles: Vec<(String, String)>,
}

impl fmt::Display for ElementSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)?;
        if let Some(id) = &self.id {
            write!(f, "#{}", id)?;
        }
        for class in &self.classes {
            write!(f, ".{}", class)?;
        }
        if !self.styles.is_empty() {
            let styles: Vec<String> = self
                .styles
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v))
                .collect();
            write!(f, " [{}]", styles.join("; "))?;
        }
        Ok(())
    }
}
