//! Light/dark theme toggle with a persisted preference.

use crate::config::ThemeConfig;
use crate::page::{ElementId, Page};
use crate::store::PreferenceStore;
use log::{debug, warn};

/// The two theme states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    /// Resolve the initial mode: a stored value wins, then the system
    /// preference. Only the literal `"true"` counts as a stored dark choice.
    pub fn resolve(stored: Option<&str>, prefers_dark: bool) -> Self {
        match stored {
            Some("true") => ThemeMode::Dark,
            Some(_) => ThemeMode::Light,
            None if prefers_dark => ThemeMode::Dark,
            None => ThemeMode::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }

    /// Value written to the preference store
    pub fn as_stored(self) -> &'static str {
        if self.is_dark() {
            "true"
        } else {
            "false"
        }
    }
}

/// Theme toggle bound to its control, icon and the root element.
#[derive(Debug)]
pub struct ThemeToggle {
    config: ThemeConfig,
    root: ElementId,
    toggle: ElementId,
    icon: Option<ElementId>,
    mode: ThemeMode,
}

impl ThemeToggle {
    /// Returns `None` when the page has no toggle control.
    pub fn mount(
        page: &mut dyn Page,
        store: &dyn PreferenceStore,
        config: &ThemeConfig,
    ) -> Option<Self> {
        let toggle = page.element_by_id(&config.toggle_id)?;
        let icon = page
            .descendants_with_tag(toggle, &config.icon_tag)
            .into_iter()
            .next();

        let stored = store.get(&config.storage_key).unwrap_or_else(|err| {
            warn!("ignoring stored theme preference: {}", err);
            None
        });
        let mode = ThemeMode::resolve(stored.as_deref(), page.prefers_dark_scheme());
        debug!("theme mounted in {:?} mode (stored: {:?})", mode, stored);

        let theme = Self {
            config: config.clone(),
            root: page.root(),
            toggle,
            icon,
            mode,
        };
        theme.apply(page);
        Some(theme)
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn toggle_element(&self) -> ElementId {
        self.toggle
    }

    /// Toggle when `element` is the control. Returns whether it was.
    pub fn on_element_click(
        &mut self,
        page: &mut dyn Page,
        store: &mut dyn PreferenceStore,
        element: ElementId,
    ) -> bool {
        if element != self.toggle {
            return false;
        }
        self.toggle(page, store);
        true
    }

    /// Flip the mode, apply it and persist it
    pub fn toggle(&mut self, page: &mut dyn Page, store: &mut dyn PreferenceStore) -> ThemeMode {
        self.mode = self.mode.toggled();
        self.apply(page);
        if let Err(err) = store.set(&self.config.storage_key, self.mode.as_stored()) {
            warn!("failed to persist theme preference: {}", err);
        }
        debug!("theme toggled to {:?}", self.mode);
        self.mode
    }

    fn apply(&self, page: &mut dyn Page) {
        let (show, hide) = if self.mode.is_dark() {
            page.add_class(self.root, &self.config.dark_class);
            (&self.config.dark_glyph, &self.config.light_glyph)
        } else {
            page.remove_class(self.root, &self.config.dark_class);
            (&self.config.light_glyph, &self.config.dark_glyph)
        };

        if let Some(icon) = self.icon {
            page.remove_class(icon, hide);
            page.add_class(icon, show);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::MemoryPage;
    use crate::store::MemoryStore;

    fn page_with_toggle(with_icon: bool) -> (MemoryPage, ElementId, Option<ElementId>) {
        let mut page = MemoryPage::default();
        let root = page.root();
        let button = page.append_element(root, "button");
        page.set_attribute(button, "id", "darkModeToggle");
        let icon = with_icon.then(|| {
            let icon = page.append_element(button, "i");
            page.add_class(icon, "fas");
            page.add_class(icon, "fa-moon");
            icon
        });
        (page, button, icon)
    }

    #[test]
    fn test_resolve_order() {
        assert_eq!(ThemeMode::resolve(Some("true"), false), ThemeMode::Dark);
        assert_eq!(ThemeMode::resolve(Some("false"), true), ThemeMode::Light);
        assert_eq!(ThemeMode::resolve(Some("yes"), true), ThemeMode::Light);
        assert_eq!(ThemeMode::resolve(None, true), ThemeMode::Dark);
        assert_eq!(ThemeMode::resolve(None, false), ThemeMode::Light);
    }

    #[test]
    fn test_system_dark_then_toggle() {
        let (mut page, button, icon) = page_with_toggle(true);
        page.set_prefers_dark(true);
        let mut store = MemoryStore::new();
        let config = ThemeConfig::default();

        let mut theme = ThemeToggle::mount(&mut page, &store, &config).unwrap();
        let icon = icon.unwrap();
        assert!(page.has_class(page.root(), "dark-mode"));
        assert!(page.has_class(icon, "fa-sun"));
        assert!(!page.has_class(icon, "fa-moon"));
        // Nothing is stored until the first toggle
        assert_eq!(store.get("darkMode").unwrap(), None);

        assert!(theme.on_element_click(&mut page, &mut store, button));
        assert!(!page.has_class(page.root(), "dark-mode"));
        assert!(page.has_class(icon, "fa-moon"));
        assert!(!page.has_class(icon, "fa-sun"));
        assert!(page.has_class(icon, "fas"));
        assert_eq!(store.get("darkMode").unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn test_stored_preference_beats_system() {
        let (mut page, _, _) = page_with_toggle(true);
        page.set_prefers_dark(false);
        let store = MemoryStore::with_values([("darkMode", "true")]);

        let theme = ThemeToggle::mount(&mut page, &store, &ThemeConfig::default()).unwrap();
        assert_eq!(theme.mode(), ThemeMode::Dark);
        assert!(page.has_class(page.root(), "dark-mode"));
    }

    #[test]
    fn test_clicks_elsewhere_are_ignored() {
        let (mut page, _, _) = page_with_toggle(true);
        let mut store = MemoryStore::new();
        let mut theme = ThemeToggle::mount(&mut page, &store, &ThemeConfig::default()).unwrap();

        let root = page.root();
        assert!(!theme.on_element_click(&mut page, &mut store, root));
        assert_eq!(theme.mode(), ThemeMode::Light);
    }

    #[test]
    fn test_missing_pieces() {
        let mut page = MemoryPage::default();
        let store = MemoryStore::new();
        assert!(ThemeToggle::mount(&mut page, &store, &ThemeConfig::default()).is_none());

        // Without an icon the root class still follows the mode
        let (mut page, button, _) = page_with_toggle(false);
        let mut store = MemoryStore::new();
        let mut theme = ThemeToggle::mount(&mut page, &store, &ThemeConfig::default()).unwrap();
        theme.on_element_click(&mut page, &mut store, button);
        assert!(page.has_class(page.root(), "dark-mode"));
        assert_eq!(store.get("darkMode").unwrap().as_deref(), Some("true"));
    }
}
