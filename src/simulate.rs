//! Scripted event driver for a [`MemoryPage`].
//!
//! A script is a TOML list of steps replayed against a mounted
//! [`Application`]. Between steps the driver drains everything the page
//! reported back (scroll and intersection events) so the application sees the
//! same sequence a browser would deliver. `wait` steps let the tokio clock run
//! and dispatch timer events as they fire.
//!
//! ```toml
//! [[step]]
//! action = "load"
//!
//! [[step]]
//! action = "click"
//! target = "darkModeToggle"
//!
//! [[step]]
//! action = "scroll"
//! top = 1200
//!
//! [[step]]
//! action = "wait"
//! ms = 200
//! ```

use crate::app::Application;
use crate::config::SiteConfig;
use crate::error::{PageKitError, Result};
use crate::event::{ClickOutcome, PageEvent};
use crate::page::{ElementId, FixturePage, MemoryPage};
use crate::store::PreferenceStore;
use log::{debug, info, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::Instant;

/// One scripted user or host action
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", deny_unknown_fields)]
pub enum Step {
    /// The document finished loading
    Load,
    /// Click the element registered under `target`
    Click { target: String },
    /// User scroll to an absolute offset
    Scroll { top: f64 },
    /// Let `ms` milliseconds of timers run
    Wait { ms: u64 },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| PageKitError::script(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PageKitError::storage(format!("Failed to read script {}", path.display()), e)
        })?;
        Self::from_toml_str(&contents)
    }
}

/// A mounted application plus the event queue feeding it
pub struct Simulation<S: PreferenceStore> {
    app: Application<MemoryPage, S>,
    events: UnboundedReceiver<PageEvent>,
    keys: BTreeMap<String, ElementId>,
    stopped: bool,
}

impl<S: PreferenceStore> Simulation<S> {
    /// Mount the application on a built fixture. Must run inside a tokio runtime.
    pub fn start(fixture: FixturePage, store: S, config: &SiteConfig) -> Result<Self> {
        let keys = fixture.keys().clone();
        let (tx, events) = mpsc::unbounded_channel();
        let app = Application::mount(fixture.page, store, config, tx)?;

        let mut simulation = Self {
            app,
            events,
            keys,
            stopped: false,
        };
        simulation.settle();
        Ok(simulation)
    }

    pub fn app(&self) -> &Application<MemoryPage, S> {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut Application<MemoryPage, S> {
        &mut self.app
    }

    pub fn page(&self) -> &MemoryPage {
        self.app.page()
    }

    pub fn element(&self, key: &str) -> Option<ElementId> {
        self.keys.get(key).copied()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub async fn run(&mut self, script: &Script) -> Result<()> {
        info!("running script with {} steps", script.steps.len());
        for step in &script.steps {
            if self.stopped {
                warn!("application stopped, skipping remaining steps");
                break;
            }
            self.step(step).await?;
        }
        Ok(())
    }

    pub async fn step(&mut self, step: &Step) -> Result<()> {
        debug!("step {:?}", step);
        match step {
            Step::Load => self.dispatch(PageEvent::Load),
            Step::Click { target } => {
                self.click(target)?;
            }
            Step::Scroll { top } => self.scroll(*top),
            Step::Wait { ms } => self.wait(Duration::from_millis(*ms)).await,
        }
        Ok(())
    }

    /// Click a named element and return what the handlers decided
    pub fn click(&mut self, key: &str) -> Result<ClickOutcome> {
        let target = self
            .element(key)
            .ok_or_else(|| PageKitError::script(format!("unknown click target `{}`", key)))?;
        let outcome = self.app.dispatch_click(target);
        self.settle();
        Ok(outcome)
    }

    pub fn scroll(&mut self, top: f64) {
        self.app.page_mut().user_scroll(top);
        self.settle();
    }

    /// Advance the tokio clock, dispatching timer events in firing order
    pub async fn wait(&mut self, duration: Duration) {
        let deadline = Instant::now() + duration;
        while !self.stopped {
            self.settle();
            match tokio::time::timeout_at(deadline, self.events.recv()).await {
                Ok(Some(event)) => self.dispatch(event),
                Ok(None) | Err(_) => break,
            }
        }
        self.settle();
    }

    fn dispatch(&mut self, event: PageEvent) {
        if self.stopped {
            return;
        }
        if !self.app.handle_event(event) {
            self.stopped = true;
        }
        self.settle();
    }

    /// Deliver queued host reports and already-fired timers until both are quiet
    fn settle(&mut self) {
        loop {
            let mut delivered = false;
            for event in self.app.page_mut().take_host_events() {
                delivered = true;
                if !self.app.handle_event(event) {
                    self.stopped = true;
                }
            }
            while let Ok(event) = self.events.try_recv() {
                delivered = true;
                if !self.app.handle_event(event) {
                    self.stopped = true;
                }
            }
            if !delivered || self.stopped {
                break;
            }
        }
    }

    pub fn into_inner(self) -> Application<MemoryPage, S> {
        self.app
    }
}
