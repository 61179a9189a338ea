//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the player controller,
//! the current page and the state each page keeps.

mod model;

pub use model::*;
