//! Page contract and timing configuration.
//!
//! Every element name, class, attribute and delay the handlers rely on lives
//! here. All fields default to the markup the site ships with, so an empty
//! TOML file (or no file at all) yields the stock behavior.

use crate::error::{PageKitError, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Scroll events quieter than this fire the back-to-top/progress update.
const DEFAULT_SCROLL_DEBOUNCE_MS: u64 = 50;
/// Offset past which the back-to-top button shows.
const DEFAULT_SHOW_AFTER_PX: f64 = 300.0;
/// Delay after the full-load event before hiding the loader.
const DEFAULT_LOADER_DELAY_MS: u64 = 500;
/// Delay after a filter click before scrolling to the selected section.
const DEFAULT_FILTER_SCROLL_DELAY_MS: u64 = 100;
/// Gap kept between the viewport top and a filtered section.
const DEFAULT_FILTER_SCROLL_OFFSET_PX: f64 = 150.0;
const DEFAULT_REVEAL_THRESHOLD: f64 = 0.1;
const DEFAULT_REVEAL_BOTTOM_INSET_PX: f64 = 50.0;

/// Complete handler configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub theme: ThemeConfig,
    pub menu: MenuConfig,
    pub reveal: RevealConfig,
    pub scroll: ScrollConfig,
    pub loader: LoaderConfig,
    pub gallery: GalleryConfig,
}

impl SiteConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: SiteConfig =
            toml::from_str(contents).map_err(|e| PageKitError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PageKitError::storage(format!("Failed to read config {}", path.display()), e)
        })?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(PageKitError::config(format!(
                "reveal.threshold must be within 0.0..=1.0, got {}",
                self.reveal.threshold
            )));
        }
        if let Some(key) = self
            .gallery
            .sections
            .iter()
            .find(|key| key.as_str() == self.gallery.all_value)
        {
            return Err(PageKitError::config(format!(
                "gallery section `{}` collides with the show-all filter value",
                key
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Id of the toggle control
    pub toggle_id: String,
    /// Tag of the icon child inside the toggle
    pub icon_tag: String,
    /// Class placed on the root element while dark
    pub dark_class: String,
    /// Preference store key
    pub storage_key: String,
    /// Icon class shown while light (offers switching to dark)
    pub light_glyph: String,
    /// Icon class shown while dark (offers switching to light)
    pub dark_glyph: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            toggle_id: "darkModeToggle".to_string(),
            icon_tag: "i".to_string(),
            dark_class: "dark-mode".to_string(),
            storage_key: "darkMode".to_string(),
            light_glyph: "fa-moon".to_string(),
            dark_glyph: "fa-sun".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MenuConfig {
    pub container_class: String,
    pub icon_class: String,
    /// Class marking the menu as open
    pub open_class: String,
    pub active_link_color: String,
    pub active_link_weight: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            container_class: "links".to_string(),
            icon_class: "icon".to_string(),
            open_class: "active".to_string(),
            active_link_color: "var(--secondary)".to_string(),
            active_link_weight: "700".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    /// Attribute flagging elements for reveal
    pub attribute: String,
    pub revealed_class: String,
    pub threshold: f64,
    pub bottom_inset: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            attribute: "data-reveal".to_string(),
            revealed_class: "revealed".to_string(),
            threshold: DEFAULT_REVEAL_THRESHOLD,
            bottom_inset: DEFAULT_REVEAL_BOTTOM_INSET_PX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    pub back_to_top_id: String,
    pub progress_id: String,
    /// Class making the back-to-top button visible
    pub visible_class: String,
    pub show_after: f64,
    pub debounce_ms: u64,
}

impl ScrollConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            back_to_top_id: "backToTop".to_string(),
            progress_id: "scrollProgress".to_string(),
            visible_class: "show".to_string(),
            show_after: DEFAULT_SHOW_AFTER_PX,
            debounce_ms: DEFAULT_SCROLL_DEBOUNCE_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    pub id: String,
    pub hidden_class: String,
    pub delay_ms: u64,
}

impl LoaderConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            id: "pageLoader".to_string(),
            hidden_class: "hide".to_string(),
            delay_ms: DEFAULT_LOADER_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    pub button_class: String,
    /// Attribute on buttons naming the filter value
    pub filter_attribute: String,
    /// Attribute on section containers naming their key
    pub section_attribute: String,
    pub title_class: String,
    /// Attribute on titles naming the section they head
    pub title_key_attribute: String,
    /// Section keys, in the order their titles appear in legacy markup
    pub sections: Vec<String>,
    /// Filter value that shows every section
    pub all_value: String,
    pub active_class: String,
    pub hidden_class: String,
    pub visible_class: String,
    /// Tag of the element whose direct children are the dividers
    pub divider_parent_tag: String,
    pub divider_tag: String,
    pub scroll_delay_ms: u64,
    pub scroll_offset: f64,
}

impl GalleryConfig {
    pub fn scroll_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_delay_ms)
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            button_class: "filter-btn".to_string(),
            filter_attribute: "data-filter".to_string(),
            section_attribute: "data-section".to_string(),
            title_class: "gallery-title".to_string(),
            title_key_attribute: "data-section-title".to_string(),
            sections: ["certificates", "honors", "radio", "culture", "share"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            all_value: "all".to_string(),
            active_class: "active".to_string(),
            hidden_class: "hidden".to_string(),
            visible_class: "visible".to_string(),
            divider_parent_tag: "main".to_string(),
            divider_tag: "hr".to_string(),
            scroll_delay_ms: DEFAULT_FILTER_SCROLL_DELAY_MS,
            scroll_offset: DEFAULT_FILTER_SCROLL_OFFSET_PX,
        }
    }
}
