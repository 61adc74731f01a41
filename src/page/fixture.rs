//! TOML description of a rendered page, built into a [`MemoryPage`].
//!
//! ```toml
//! viewport_height = 800
//! ready_state = "interactive"
//!
//! [[node]]
//! tag = "button"
//! id = "backToTop"
//! parent = "body"
//! ```
//!
//! Nodes are appended in file order, so a parent must be declared before its
//! children. The implicit root is addressed as `html`.

use super::{ElementId, MemoryPage, Page, ReadyState};
use crate::error::{PageKitError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

const ROOT_KEY: &str = "html";
const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;

fn default_viewport_height() -> f64 {
    DEFAULT_VIEWPORT_HEIGHT
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageFixture {
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,
    /// Overrides the height derived from the node layout
    #[serde(default)]
    pub scroll_height: Option<f64>,
    #[serde(default)]
    pub ready_state: ReadyState,
    #[serde(default)]
    pub prefers_dark: bool,
    #[serde(default, rename = "node")]
    pub nodes: Vec<NodeSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSpec {
    pub tag: String,
    /// Name other nodes and scripts use to refer to this one; defaults to `id`
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    /// Key of the parent node; defaults to the root
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub height: f64,
}

/// A built fixture: the page plus the key of every named node.
#[derive(Debug)]
pub struct FixturePage {
    pub page: MemoryPage,
    keys: BTreeMap<String, ElementId>,
}

impl FixturePage {
    pub fn element(&self, key: &str) -> Option<ElementId> {
        self.keys.get(key).copied()
    }

    pub fn keys(&self) -> &BTreeMap<String, ElementId> {
        &self.keys
    }
}

impl PageFixture {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| PageKitError::fixture(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PageKitError::storage(format!("Failed to read fixture {}", path.display()), e)
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn build(&self) -> Result<FixturePage> {
        if self.viewport_height <= 0.0 {
            return Err(PageKitError::fixture(format!(
                "viewport_height must be positive, got {}",
                self.viewport_height
            )));
        }

        let mut page = MemoryPage::new(self.viewport_height);
        page.set_scroll_height(self.scroll_height);
        page.set_ready_state(self.ready_state);
        page.set_prefers_dark(self.prefers_dark);

        let mut keys = BTreeMap::new();
        keys.insert(ROOT_KEY.to_string(), page.root());

        for (index, node) in self.nodes.iter().enumerate() {
            let parent_key = node.parent.as_deref().unwrap_or(ROOT_KEY);
            let parent = keys.get(parent_key).copied().ok_or_else(|| {
                PageKitError::fixture(format!(
                    "node {} ({}) references undeclared parent `{}`",
                    index, node.tag, parent_key
                ))
            })?;

            let element = page.append_element(parent, &node.tag);
            if let Some(id) = &node.id {
                page.set_attribute(element, "id", id);
            }
            for (name, value) in &node.attrs {
                page.set_attribute(element, name, value);
            }
            for class in &node.classes {
                page.add_class(element, class);
            }
            page.set_layout(element, node.top, node.height);

            if let Some(key) = node.key.as_ref().or(node.id.as_ref()) {
                if keys.insert(key.clone(), element).is_some() {
                    return Err(PageKitError::fixture(format!("duplicate node key `{}`", key)));
                }
            }
        }

        Ok(FixturePage { page, keys })
    }
}
