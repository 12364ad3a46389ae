//! Media catalog: the ordered list of tracked video files.
//!
//! `Catalog` is the only thing that mutates the list. `CatalogStore` moves it
//! to and from the flat text file between runs.

mod controller;
mod model;
mod scan;
mod store;

pub use controller::*;
pub use model::*;
pub use store::*;
