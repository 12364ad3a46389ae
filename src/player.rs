//! Player sessions and the engine boundary.
//!
//! The crate never decodes video. A `PlaybackSession` owns one engine
//! instance (an `mpv` process in practice) and forwards controls to it;
//! the engine reports time and length back through a channel that the UI
//! thread drains.

mod engine;
mod mpv;
mod progress;
mod session;

pub use engine::*;
pub use mpv::MpvEngine;
pub use progress::*;
pub use session::*;
