use std::path::Path;

use log::{error, warn};

use crate::app::{App, NowPlaying, PlaybackState};
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::player::{MpvEngine, PlaybackError, PlaybackSession};
use crate::runtime::mpris_sync::update_mpris;

/// Holds the one open player session, if any.
#[derive(Default)]
pub struct PlayerSlot {
    session: Option<PlaybackSession<MpvEngine>>,
}

impl PlayerSlot {
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Open `path` in a new session, closing any previous one first.
    pub fn open(&mut self, path: &Path, app: &mut App, settings: &config::PlayerSettings) {
        if let Some(reason) = &app.playback_disabled {
            let msg = format!("Playback unavailable: {reason}");
            app.error(msg);
            return;
        }
        self.close(app);

        match PlaybackSession::open(path, || MpvEngine::spawn(settings)) {
            Ok(session) => {
                app.now_playing = Some(NowPlaying {
                    path: session.path().to_path_buf(),
                    time_ms: 0,
                    length_ms: None,
                });
                app.playback = PlaybackState::Playing;
                self.session = Some(session);
            }
            Err(PlaybackError::FileNotFound(p)) => {
                warn!("cannot play missing file {}", p.display());
                app.error("File not found!");
            }
            Err(PlaybackError::EngineUnavailable(reason)) => {
                error!("playback disabled: {reason}");
                app.error(format!("Playback unavailable: {reason}"));
                app.playback_disabled = Some(reason);
            }
            Err(e) => {
                error!("opening {} failed: {e}", path.display());
                app.error(format!("Error playing file: {e}"));
            }
        }
    }

    pub fn close(&mut self, app: &mut App) {
        if let Some(session) = self.session.take() {
            session.close();
        }
        app.now_playing = None;
        app.playback = PlaybackState::Stopped;
    }

    /// Run a control on the open session. Does nothing when no player is open.
    pub fn control(&mut self, cmd: &ControlCmd, app: &mut App) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let result = match cmd {
            ControlCmd::Play => session.play(),
            ControlCmd::Pause => session.pause(),
            ControlCmd::PlayPause => session.toggle(),
            ControlCmd::SeekBy(ms) => session.seek_relative(*ms),
            ControlCmd::Stop | ControlCmd::Quit => {
                self.close(app);
                return;
            }
        };

        match result {
            Ok(()) => {
                app.playback = if session.is_paused() {
                    PlaybackState::Paused
                } else {
                    PlaybackState::Playing
                };
            }
            Err(PlaybackError::EngineGone) => {
                warn!("player went away");
                self.close(app);
            }
            Err(e) => {
                warn!("player control failed: {e}");
                app.error(format!("Player error: {e}"));
            }
        }
    }

    /// Drain engine notifications on this (UI) thread and mirror them into
    /// `app`. Closes the session if the engine went away.
    pub fn sync(&mut self, app: &mut App, mpris: &MprisHandle) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.pump_events() {
            return;
        }

        if session.engine_closed() {
            self.close(app);
            update_mpris(mpris, app);
            return;
        }

        app.now_playing = Some(NowPlaying {
            path: session.path().to_path_buf(),
            time_ms: session.current_time(),
            length_ms: session.duration(),
        });
        app.playback = if session.is_finished() {
            PlaybackState::Stopped
        } else if session.is_paused() {
            PlaybackState::Paused
        } else {
            PlaybackState::Playing
        };
        update_mpris(mpris, app);
    }
}
