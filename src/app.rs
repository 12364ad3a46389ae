//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the catalog, the cursor,
//! the active prompt and what the player is showing.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
