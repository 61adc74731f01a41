//! # pagekit - Interactive behaviors for a static personal site
//!
//! The scripted layer of a static site: a color theme toggle with a remembered
//! preference, a collapsible navigation menu, scroll-triggered reveals, a
//! back-to-top button with a scroll progress bar, a page loader overlay,
//! smooth in-page anchor scrolling and a sectioned gallery filter.
//!
//! ## Features
//!
//! - **Host agnostic**: handlers talk to the page through the [`Page`] trait
//! - **Single dispatch queue**: host events and timers share one channel
//! - **Debounced scrolling**: scroll bursts collapse into one update
//! - **Persistent theme**: the chosen theme survives reloads via a [`PreferenceStore`]
//! - **Simulator**: replay TOML event scripts against a TOML page fixture
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`page`] - Page abstraction, in-memory page and fixtures
//! - [`timing`] - Timer scheduling and the debounce wrapper
//! - [`features`] - The individual page behaviors
//! - [`store`] - Preference persistence
//! - [`config`] - Element ids, class names and timings
//! - [`app`] - Feature registration and event dispatch
//! - [`simulate`] - Scripted event driver

// Core modules
pub mod config;
pub mod error;
pub mod event;
pub mod page;
pub mod store;
pub mod timing;

// Behaviors and their orchestration
pub mod app;
pub mod features;
pub mod simulate;

// Re-export commonly used types for convenience
pub use error::{PageKitError, Result};

// Public API surface for external usage
pub use app::Application;
pub use config::SiteConfig;
pub use event::{ClickOutcome, PageEvent};
pub use page::{ElementId, MemoryPage, Page, PageFixture};
pub use simulate::{Script, Simulation, Step};
pub use store::{AnyStore, FileStore, MemoryStore, PreferenceStore};
pub use timing::{Debounced, Scheduler};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
