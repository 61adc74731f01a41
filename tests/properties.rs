use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use proptest::prelude::*;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tokio::time::Instant;

use pagekit::config::ThemeConfig;
use pagekit::features::{scroll_percent, ThemeMode, ThemeToggle};
use pagekit::page::Page;
use pagekit::{
    Application, Debounced, MemoryPage, MemoryStore, PageFixture, PreferenceStore, Scheduler,
    SiteConfig,
};

const SITE: &str = include_str!("../demos/site.toml");
const SECTIONS: [&str; 5] = ["certificates", "honors", "radio", "culture", "share"];
const MENU_LINKS: [&str; 3] = ["linkAbout", "linkGallery", "linkContact"];
const DEBOUNCE_MS: u64 = 50;

fn paused_runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("build paused runtime")
}

fn theme_page(prefers_dark: bool) -> (MemoryPage, pagekit::ElementId) {
    let mut page = MemoryPage::default();
    page.set_prefers_dark(prefers_dark);
    let root = page.root();
    let toggle = page.append_element(root, "button");
    page.set_attribute(toggle, "id", "darkModeToggle");
    let icon = page.append_element(toggle, "i");
    (page, icon)
}

/// Gallery, menu and the element keys, mounted on the site fixture
fn mount_site(runtime: &Runtime) -> (Application<MemoryPage, MemoryStore>, PageFixtureKeys) {
    let _guard = runtime.enter();
    let built = PageFixture::from_toml_str(SITE)
        .expect("parse site")
        .build()
        .expect("build site");
    let keys = PageFixtureKeys(built.keys().clone());
    let (tx, _rx) = mpsc::unbounded_channel();
    let app = Application::mount(built.page, MemoryStore::new(), &SiteConfig::default(), tx)
        .expect("mount site");
    (app, keys)
}

struct PageFixtureKeys(std::collections::BTreeMap<String, pagekit::ElementId>);

impl PageFixtureKeys {
    fn get(&self, key: &str) -> pagekit::ElementId {
        self.0[key]
    }
}

proptest! {
    #[test]
    fn debounce_fires_once_with_last_arguments(gaps in prop::collection::vec(0u64..DEBOUNCE_MS, 1..20)) {
        let runtime = paused_runtime();
        runtime.block_on(async {
            let (tx, _rx) = mpsc::unbounded_channel();
            let scheduler = Scheduler::current(tx).unwrap();
            let fired: Arc<Mutex<Vec<(usize, Instant)>>> = Arc::new(Mutex::new(Vec::new()));
            let sink = Arc::clone(&fired);
            let mut debounced = Debounced::new(
                Duration::from_millis(DEBOUNCE_MS),
                scheduler,
                move |call: usize| sink.lock().push((call, Instant::now())),
            );

            let mut last_call = Instant::now();
            for (call, gap) in gaps.iter().enumerate() {
                debounced.call(call);
                last_call = Instant::now();
                tokio::time::sleep(Duration::from_millis(*gap)).await;
            }
            tokio::time::sleep(Duration::from_millis(DEBOUNCE_MS * 4)).await;

            let fired = fired.lock();
            prop_assert_eq!(fired.len(), 1);
            prop_assert_eq!(fired[0].0, gaps.len() - 1);
            prop_assert!(fired[0].1 - last_call >= Duration::from_millis(DEBOUNCE_MS));
            Ok(())
        })?;
    }

    #[test]
    fn theme_flag_tracks_click_parity(
        stored in prop::option::of(any::<bool>()),
        prefers_dark in any::<bool>(),
        clicks in 0usize..16,
    ) {
        let (mut page, icon) = theme_page(prefers_dark);
        let mut store = match stored {
            Some(dark) => MemoryStore::with_values([("darkMode", dark.to_string())]),
            None => MemoryStore::new(),
        };
        let config = ThemeConfig::default();
        let mut theme = ThemeToggle::mount(&mut page, &store, &config).unwrap();
        let initial = theme.mode().is_dark();
        prop_assert_eq!(initial, stored.unwrap_or(prefers_dark));

        let toggle = theme.toggle_element();
        for _ in 0..clicks {
            theme.on_element_click(&mut page, &mut store, toggle);
            let dark = theme.mode() == ThemeMode::Dark;
            prop_assert_eq!(page.has_class(icon, "fa-sun"), dark);
            prop_assert_eq!(page.has_class(icon, "fa-moon"), !dark);
            prop_assert_eq!(page.has_class(page.root(), "dark-mode"), dark);
        }

        let expected = initial ^ (clicks % 2 == 1);
        if clicks > 0 {
            let persisted = store.get("darkMode").unwrap();
            prop_assert_eq!(persisted.as_deref(), Some(if expected { "true" } else { "false" }));
        }
        prop_assert_eq!(theme.mode().is_dark(), expected);
    }

    #[test]
    fn progress_is_monotonic_from_zero_to_hundred(
        extra in 1.0f64..20_000.0,
        viewport in 200.0f64..2_000.0,
        fractions in prop::collection::vec(0.0f64..=1.0, 1..32),
    ) {
        let height = viewport + extra;
        let max = height - viewport;
        prop_assert_eq!(scroll_percent(0.0, height, viewport), Some(0.0));
        prop_assert_eq!(scroll_percent(max, height, viewport), Some(100.0));

        let mut fractions = fractions;
        fractions.sort_by(|a, b| a.total_cmp(b));
        let mut previous = 0.0;
        for fraction in fractions {
            let percent = scroll_percent(max * fraction, height, viewport).unwrap();
            prop_assert!(percent >= previous);
            prop_assert!((0.0..=100.0).contains(&percent));
            previous = percent;
        }
    }

    #[test]
    fn filter_shows_exactly_the_selection(picks in prop::collection::vec(0usize..=SECTIONS.len(), 1..12)) {
        let runtime = paused_runtime();
        let (mut app, keys) = mount_site(&runtime);
        let _guard = runtime.enter();

        for pick in picks {
            let button = if pick == SECTIONS.len() {
                keys.get("filterAll")
            } else {
                keys.get(&format!("filter-{}", SECTIONS[pick]))
            };
            app.dispatch_click(button);
            let page = app.page();

            let active: Vec<_> = page
                .elements_with_class("filter-btn")
                .into_iter()
                .filter(|b| page.has_class(*b, "active"))
                .collect();
            prop_assert_eq!(active, vec![button]);

            for (index, key) in SECTIONS.iter().enumerate() {
                let shown = pick == SECTIONS.len() || pick == index;
                for element in [keys.get(&format!("section-{}", key)), keys.get(&format!("title-{}", key))] {
                    prop_assert_eq!(page.has_class(element, "visible"), shown);
                    prop_assert_eq!(page.has_class(element, "hidden"), !shown);
                }
            }

            let display = if pick == SECTIONS.len() { "block" } else { "none" };
            for index in 0..SECTIONS.len() {
                let divider = keys.get(&format!("divider{}", index));
                prop_assert_eq!(page.style(divider, "display"), Some(display));
            }
        }
    }

    #[test]
    fn menu_link_click_closes_and_emphasizes_one(clicks in prop::collection::vec(0usize..5, 1..16)) {
        let runtime = paused_runtime();
        let (mut app, keys) = mount_site(&runtime);
        let _guard = runtime.enter();
        let container = keys.get("links");

        for click in clicks {
            let was_open = app.page().has_class(container, "active");
            match click {
                0..=2 => {
                    let link = keys.get(MENU_LINKS[click]);
                    app.dispatch_click(link);
                    let page = app.page();
                    prop_assert!(!page.has_class(container, "active"));
                    let emphasized: Vec<_> = MENU_LINKS
                        .iter()
                        .map(|key| keys.get(key))
                        .filter(|l| page.style(*l, "font-weight").is_some())
                        .collect();
                    prop_assert_eq!(emphasized, vec![link]);
                }
                3 => {
                    let outcome = app.dispatch_click(keys.get("menuIcon"));
                    prop_assert!(outcome.propagation_stopped);
                    prop_assert_eq!(app.page().has_class(container, "active"), !was_open);
                }
                _ => {
                    app.dispatch_click(keys.get("main"));
                    prop_assert!(!app.page().has_class(container, "active"));
                }
            }
        }
    }
}
