use std::path::{Path, PathBuf};

/// Notifications pushed by an engine from its own thread.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Playback position in milliseconds.
    TimeChanged(u64),
    /// Media length in milliseconds.
    LengthChanged(u64),
    Paused(bool),
    EndOfFile,
    /// The engine went away (window closed by the user, process exited).
    Closed,
}

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("playback engine unavailable: {0}")]
    EngineUnavailable(String),
    #[error("playback engine has exited")]
    EngineGone,
    #[error("playback engine I/O: {0}")]
    Io(#[from] std::io::Error),
}

/// Controls a playback engine must expose. Calls take effect immediately;
/// nothing is queued on this side of the boundary.
pub trait PlaybackEngine {
    fn load(&mut self, path: &Path) -> Result<(), PlaybackError>;
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self) -> Result<(), PlaybackError>;
    fn seek_relative(&mut self, delta_ms: i64) -> Result<(), PlaybackError>;
    fn stop(&mut self) -> Result<(), PlaybackError>;
    /// Free the engine's resources. Must be safe to call more than once.
    fn release(&mut self);
}
