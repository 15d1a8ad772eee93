//! Tabbed container widget for terminal UIs.
//!
//! [`tabs::TabContainer`] keeps an ordered set of tab entries, lays them out
//! in a single row with an overflow popup or in balanced table rows, paints
//! rounded chrome into a ratatui buffer and sequences component detachment
//! behind host focus settlement.

pub mod chrome;
pub mod component_context;
pub mod components;
pub mod constants;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod keybindings;
pub mod layout;
pub mod tabs;
pub mod theme;
pub mod tracing_sub;
pub mod ui;

pub use error::TabsError;
pub use tabs::{TabContainer, TabEntry, TabId};
