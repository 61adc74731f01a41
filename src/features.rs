//! Independent page features.
//!
//! Each feature resolves the elements it needs once, at mount, and keeps its
//! own transient state. A feature whose required elements are missing is not
//! mounted at all; optional elements only disable the part that uses them.

pub mod anchors;
pub mod gallery;
pub mod loader;
pub mod menu;
pub mod reveal;
pub mod scroll;
pub mod theme;

pub use anchors::AnchorScroll;
pub use gallery::{Filter, GalleryFilter};
pub use loader::PageLoader;
pub use menu::NavMenu;
pub use reveal::ScrollReveal;
pub use scroll::{scroll_percent, ScrollIndicators};
pub use theme::{ThemeMode, ThemeToggle};
