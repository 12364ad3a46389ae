use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, TryRecvError};

use log::{debug, info, warn};

use super::engine::{EngineEvent, PlaybackEngine, PlaybackError};

/// One opened player, bound to exactly one engine instance.
///
/// The engine is released exactly once: by `close`, or by `Drop` on any other
/// exit path.
pub struct PlaybackSession<E: PlaybackEngine> {
    engine: E,
    events: Receiver<EngineEvent>,
    path: PathBuf,
    time_ms: u64,
    length_ms: Option<u64>,
    paused: bool,
    finished: bool,
    engine_closed: bool,
    released: bool,
}

impl<E: PlaybackEngine> PlaybackSession<E> {
    /// Check that `path` is an existing file, start an engine with `spawn`
    /// and load the file into it.
    pub fn open<F>(path: &Path, spawn: F) -> Result<Self, PlaybackError>
    where
        F: FnOnce() -> Result<(E, Receiver<EngineEvent>), PlaybackError>,
    {
        if !path.is_file() {
            return Err(PlaybackError::FileNotFound(path.to_path_buf()));
        }

        let (mut engine, events) = spawn()?;
        if let Err(e) = engine.load(path) {
            engine.release();
            return Err(e);
        }

        info!("opened player for {}", path.display());
        Ok(Self {
            engine,
            events,
            path: path.to_path_buf(),
            time_ms: 0,
            length_ms: None,
            paused: false,
            finished: false,
            engine_closed: false,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn play(&mut self) -> Result<(), PlaybackError> {
        self.engine.play()?;
        self.paused = false;
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), PlaybackError> {
        self.engine.pause()?;
        self.paused = true;
        Ok(())
    }

    pub fn toggle(&mut self) -> Result<(), PlaybackError> {
        if self.paused {
            self.play()
        } else {
            self.pause()
        }
    }

    pub fn seek_relative(&mut self, delta_ms: i64) -> Result<(), PlaybackError> {
        self.engine.seek_relative(delta_ms)
    }

    /// Apply every pending engine notification. Returns true when anything
    /// changed. Values are taken as they come: a rapid seek may move time
    /// backwards.
    pub fn pump_events(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    self.apply(event);
                    changed = true;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.engine_closed {
                        debug!("engine event channel closed");
                        self.engine_closed = true;
                        changed = true;
                    }
                    break;
                }
            }
        }
        changed
    }

    fn apply(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::TimeChanged(ms) => self.time_ms = ms,
            EngineEvent::LengthChanged(ms) => self.length_ms = Some(ms),
            EngineEvent::Paused(p) => self.paused = p,
            EngineEvent::EndOfFile => self.finished = true,
            EngineEvent::Closed => self.engine_closed = true,
        }
    }

    /// Last position reported by the engine (ms).
    pub fn current_time(&self) -> u64 {
        self.time_ms
    }

    /// Last length reported by the engine (ms), if any yet.
    pub fn duration(&self) -> Option<u64> {
        self.length_ms
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// True once the engine itself has gone away; the session should be closed.
    pub fn engine_closed(&self) -> bool {
        self.engine_closed
    }

    /// Stop playback and release the engine.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if !self.engine_closed {
            if let Err(e) = self.engine.stop() {
                warn!("stopping {} failed: {e}", self.path.display());
            }
        }
        self.engine.release();
        info!("closed player for {}", self.path.display());
    }
}

impl<E: PlaybackEngine> Drop for PlaybackSession<E> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
