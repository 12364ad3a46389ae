//! `mpv` driven over its JSON IPC socket.
//!
//! mpv owns its own window and does all decoding and rendering. We only send
//! commands and listen for property changes.

use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::Shutdown;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::PlayerSettings;

use super::engine::{EngineEvent, PlaybackEngine, PlaybackError};

const OBSERVE_TIME: u64 = 1;
const OBSERVE_DURATION: u64 = 2;
const OBSERVE_PAUSE: u64 = 3;

static SOCKET_SEQ: AtomicU64 = AtomicU64::new(0);

pub struct MpvEngine {
    child: Child,
    stream: UnixStream,
    socket_path: PathBuf,
    reader: Option<JoinHandle<()>>,
    next_request_id: u64,
    released: bool,
}

impl MpvEngine {
    /// Start an idle mpv with an IPC socket and subscribe to time, length and
    /// pause changes.
    pub fn spawn(settings: &PlayerSettings) -> Result<(Self, Receiver<EngineEvent>), PlaybackError> {
        let socket_path = std::env::temp_dir().join(format!(
            "cinema-mpv-{}-{}.sock",
            std::process::id(),
            SOCKET_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        let _ = std::fs::remove_file(&socket_path);

        let mut child = Command::new(&settings.binary)
            .args(&settings.extra_args)
            .arg("--idle=yes")
            .arg("--force-window=yes")
            .arg("--no-terminal")
            .arg(format!("--input-ipc-server={}", socket_path.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    PlaybackError::EngineUnavailable(format!("{} not found", settings.binary))
                }
                _ => PlaybackError::EngineUnavailable(format!("{}: {e}", settings.binary)),
            })?;

        let timeout = Duration::from_millis(settings.startup_timeout_ms);
        let stream = match connect_when_ready(&mut child, &socket_path, timeout) {
            Ok(s) => s,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                let _ = std::fs::remove_file(&socket_path);
                return Err(e);
            }
        };

        info!(
            "started {} (pid {}) on {}",
            settings.binary,
            child.id(),
            socket_path.display()
        );

        // From here on, dropping `engine` on an error path quits mpv.
        let mut engine = Self {
            child,
            stream,
            socket_path,
            reader: None,
            next_request_id: 1,
            released: false,
        };
        let (tx, rx) = mpsc::channel();
        engine.reader = Some(spawn_reader(engine.stream.try_clone()?, tx)?);
        engine.command(&[json!("observe_property"), json!(OBSERVE_TIME), json!("time-pos")])?;
        engine.command(&[json!("observe_property"), json!(OBSERVE_DURATION), json!("duration")])?;
        engine.command(&[json!("observe_property"), json!(OBSERVE_PAUSE), json!("pause")])?;
        Ok((engine, rx))
    }

    fn command(&mut self, args: &[Value]) -> Result<(), PlaybackError> {
        let line = command_line(args, self.next_request_id);
        self.next_request_id += 1;
        self.stream.write_all(line.as_bytes()).map_err(|e| match e.kind() {
            ErrorKind::BrokenPipe | ErrorKind::ConnectionReset | ErrorKind::NotConnected => {
                PlaybackError::EngineGone
            }
            _ => PlaybackError::Io(e),
        })
    }
}

impl PlaybackEngine for MpvEngine {
    fn load(&mut self, path: &Path) -> Result<(), PlaybackError> {
        let target = path.to_string_lossy();
        self.command(&[json!("loadfile"), json!(target), json!("replace")])?;
        self.command(&[json!("set_property"), json!("pause"), json!(false)])
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        self.command(&[json!("set_property"), json!("pause"), json!(false)])
    }

    fn pause(&mut self) -> Result<(), PlaybackError> {
        self.command(&[json!("set_property"), json!("pause"), json!(true)])
    }

    fn seek_relative(&mut self, delta_ms: i64) -> Result<(), PlaybackError> {
        let secs = delta_ms as f64 / 1000.0;
        self.command(&[json!("seek"), json!(secs), json!("relative")])
    }

    fn stop(&mut self) -> Result<(), PlaybackError> {
        self.command(&[json!("stop")])
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        let _ = self.command(&[json!("quit")]);
        let _ = self.stream.shutdown(Shutdown::Both);

        let deadline = Instant::now() + Duration::from_secs(1);
        loop {
            match self.child.try_wait() {
                Ok(Some(_)) => break,
                Ok(None) if Instant::now() < deadline => thread::sleep(Duration::from_millis(20)),
                _ => {
                    warn!("mpv (pid {}) did not quit, killing it", self.child.id());
                    let _ = self.child.kill();
                    let _ = self.child.wait();
                    break;
                }
            }
        }

        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
        let _ = std::fs::remove_file(&self.socket_path);
        debug!("released mpv on {}", self.socket_path.display());
    }
}

impl Drop for MpvEngine {
    fn drop(&mut self) {
        self.release();
    }
}

fn connect_when_ready(
    child: &mut Child,
    socket_path: &Path,
    timeout: Duration,
) -> Result<UnixStream, PlaybackError> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Err(PlaybackError::EngineUnavailable(format!(
                "mpv exited during startup ({status})"
            )));
        }
        match UnixStream::connect(socket_path) {
            Ok(stream) => return Ok(stream),
            Err(_) if Instant::now() < deadline => thread::sleep(Duration::from_millis(25)),
            Err(e) => {
                return Err(PlaybackError::EngineUnavailable(format!(
                    "no IPC socket at {} after {}ms: {e}",
                    socket_path.display(),
                    timeout.as_millis()
                )));
            }
        }
    }
}

fn spawn_reader(stream: UnixStream, tx: Sender<EngineEvent>) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("mpv-events".into())
        .spawn(move || {
            for line in BufReader::new(stream).lines() {
                let Ok(line) = line else { break };
                if let Some(event) = parse_message(&line) {
                    if tx.send(event).is_err() {
                        return;
                    }
                }
            }
            let _ = tx.send(EngineEvent::Closed);
        })
}

/// Encode one IPC command as a newline-terminated JSON line.
pub(super) fn command_line(args: &[Value], request_id: u64) -> String {
    let mut line = json!({ "command": args, "request_id": request_id }).to_string();
    line.push('\n');
    line
}

#[derive(Debug, Deserialize)]
struct IpcMessage {
    event: Option<String>,
    name: Option<String>,
    data: Option<Value>,
    error: Option<String>,
    request_id: Option<u64>,
}

/// Translate one line from mpv into an engine event. Command replies and
/// unrelated events yield `None`.
pub(super) fn parse_message(line: &str) -> Option<EngineEvent> {
    let msg: IpcMessage = match serde_json::from_str(line) {
        Ok(m) => m,
        Err(e) => {
            warn!("unparseable mpv message {line:?}: {e}");
            return None;
        }
    };

    match msg.event.as_deref() {
        Some("property-change") => {
            let data = msg.data?;
            match msg.name.as_deref()? {
                "time-pos" => data.as_f64().map(|s| EngineEvent::TimeChanged(secs_to_ms(s))),
                "duration" => data.as_f64().map(|s| EngineEvent::LengthChanged(secs_to_ms(s))),
                "pause" => data.as_bool().map(EngineEvent::Paused),
                _ => None,
            }
        }
        Some("end-file") => Some(EngineEvent::EndOfFile),
        Some("shutdown") => Some(EngineEvent::Closed),
        Some(_) => None,
        None => {
            if let Some(err) = msg.error.filter(|e| e != "success") {
                warn!("mpv request {:?} failed: {err}", msg.request_id);
            }
            None
        }
    }
}

fn secs_to_ms(secs: f64) -> u64 {
    if secs.is_finite() && secs > 0.0 {
        (secs * 1000.0).round() as u64
    } else {
        0
    }
}
