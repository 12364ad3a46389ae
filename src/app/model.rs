//! Application model types: `App`, prompts and status messages.
//!
//! `App` turns user intents into `Catalog` calls and keeps the text shown in
//! the status line. It never touches the player engine; the runtime owns the
//! session and mirrors its progress into `now_playing`.

use std::env;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::catalog::{
    AddOutcome, Catalog, DeleteOutcome, InvalidQuery, MediaEntry, RejectReason, display_name_for,
};

/// The playback state shown in the UI and exported over MPRIS.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PromptKind {
    AddFile,
    AddFolder,
    Rename,
    Search,
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::AddFile => "Add file",
            Self::AddFolder => "Add from folder",
            Self::Rename => "Enter new name",
            Self::Search => "Search",
        }
    }
}

/// A single-line text input waiting for Enter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub buffer: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: MessageLevel,
    pub text: String,
}

/// What the open player reports, copied from the session each frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NowPlaying {
    pub path: PathBuf,
    pub time_ms: u64,
    pub length_ms: Option<u64>,
}

/// The main application model.
pub struct App {
    pub catalog: Catalog,
    pub selected: usize,
    /// Paths matched by the last search, drawn highlighted.
    pub highlighted: Vec<PathBuf>,
    pub last_search: Option<String>,
    pub prompt: Option<Prompt>,
    pub confirm_delete: bool,
    pub message: Option<StatusMessage>,
    pub playback: PlaybackState,
    pub now_playing: Option<NowPlaying>,
    /// Set once the engine could not be started; playback stays off afterwards.
    pub playback_disabled: Option<String>,
    pub catalog_path: Option<String>,
}

impl App {
    /// Create a new `App` around a loaded catalog.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            selected: 0,
            highlighted: Vec::new(),
            last_search: None,
            prompt: None,
            confirm_delete: false,
            message: None,
            playback: PlaybackState::Stopped,
            now_playing: None,
            playback_disabled: None,
            catalog_path: None,
        }
    }

    pub fn set_catalog_path(&mut self, path: &Path) {
        self.catalog_path = Some(path.display().to_string());
    }

    pub fn entries(&self) -> &[MediaEntry] {
        self.catalog.entries()
    }

    pub fn selected_entry(&self) -> Option<&MediaEntry> {
        self.catalog.entries().get(self.selected)
    }

    pub fn is_highlighted(&self, path: &Path) -> bool {
        self.highlighted.iter().any(|p| p == path)
    }

    pub fn player_open(&self) -> bool {
        self.now_playing.is_some()
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.set_message(MessageLevel::Info, text.into());
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.set_message(MessageLevel::Warning, text.into());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.set_message(MessageLevel::Error, text.into());
    }

    fn set_message(&mut self, level: MessageLevel, text: String) {
        self.message = Some(StatusMessage { level, text });
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Move selection to the next entry, wrapping to the first.
    pub fn next(&mut self) {
        let len = self.catalog.len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move selection to the previous entry, wrapping to the last.
    pub fn prev(&mut self) {
        let len = self.catalog.len();
        if len > 0 {
            self.selected = if self.selected == 0 {
                len - 1
            } else {
                self.selected - 1
            };
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.catalog.len().saturating_sub(1);
    }

    fn select_path(&mut self, path: &Path) {
        if let Some(idx) = self.catalog.position(path) {
            self.selected = idx;
        }
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.catalog.len() {
            self.selected = self.catalog.len().saturating_sub(1);
        }
    }

    /// Open a prompt. Rename starts from the selected name, search from the
    /// previous term.
    pub fn begin_prompt(&mut self, kind: PromptKind) {
        let buffer = match kind {
            PromptKind::Rename => match self.selected_entry() {
                Some(e) => e.display_name.clone(),
                None => {
                    self.warn("Nothing selected to rename.");
                    return;
                }
            },
            PromptKind::Search => self.last_search.clone().unwrap_or_default(),
            PromptKind::AddFile | PromptKind::AddFolder => String::new(),
        };
        self.confirm_delete = false;
        self.prompt = Some(Prompt { kind, buffer });
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    pub fn push_prompt_char(&mut self, c: char) {
        if let Some(p) = self.prompt.as_mut() {
            p.buffer.push(c);
        }
    }

    pub fn pop_prompt_char(&mut self) {
        if let Some(p) = self.prompt.as_mut() {
            p.buffer.pop();
        }
    }

    /// Close the prompt and run the action it was opened for.
    pub fn submit_prompt(&mut self) {
        let Some(Prompt { kind, buffer }) = self.prompt.take() else {
            return;
        };
        match kind {
            PromptKind::AddFile => self.add_file_input(&buffer),
            PromptKind::AddFolder => self.add_folder_input(&buffer),
            PromptKind::Rename => self.rename_selected(&buffer),
            PromptKind::Search => self.search(&buffer),
        }
    }

    /// Add a single file typed by the user.
    pub fn add_file_input(&mut self, input: &str) {
        if input.trim().is_empty() {
            return;
        }
        let path = resolve_input_path(input);
        if !path.is_file() {
            self.error(format!("File not found: {}", path.display()));
            return;
        }

        let outcome = self.catalog.add_file(path);
        self.report_add(&outcome);
        if outcome.is_added() {
            self.select_path(outcome.path());
        }
    }

    fn report_add(&mut self, outcome: &AddOutcome) {
        let name = display_name_for(outcome.path());
        match outcome {
            AddOutcome::Added(path) => {
                info!("added {}", path.display());
                self.info(format!("Added {name}"));
            }
            AddOutcome::Rejected {
                reason: RejectReason::DuplicatePath,
                ..
            } => self.warn(format!("Media file already added: {name}")),
            AddOutcome::Rejected {
                reason: RejectReason::UnsupportedType,
                ..
            } => self.error(format!("Unsupported file type: {name}")),
            AddOutcome::Rejected {
                reason: RejectReason::UnstorableName,
                ..
            } => self.error(format!("File names with line breaks are not supported: {name}")),
        }
    }

    /// Add every allowed file directly inside a folder typed by the user.
    pub fn add_folder_input(&mut self, input: &str) {
        if input.trim().is_empty() {
            return;
        }
        let dir = resolve_input_path(input);
        let outcomes = match self.catalog.add_folder(&dir) {
            Ok(o) => o,
            Err(e) => {
                warn!("{e}");
                self.error(format!("Error adding folder: {e}"));
                return;
            }
        };

        if outcomes.is_empty() {
            self.info("No valid media files found in the selected folder.");
            return;
        }

        let added = outcomes.iter().filter(|o| o.is_added()).count();
        let duplicates = outcomes.len() - added;
        info!("added {added} files from {}", dir.display());
        if let Some(first) = outcomes.iter().find(|o| o.is_added()) {
            let first = first.path().to_path_buf();
            self.select_path(&first);
        }
        if duplicates == 0 {
            self.info(format!("Added {added} files from {}", dir.display()));
        } else {
            self.warn(format!(
                "Added {added} files from {} ({duplicates} already added)",
                dir.display()
            ));
        }
    }

    pub fn rename_selected(&mut self, new_name: &str) {
        if new_name.trim().is_empty() {
            return;
        }
        let Some(old) = self.selected_entry().map(|e| e.path.clone()) else {
            return;
        };

        match self.catalog.rename(&old, new_name) {
            Ok(new_path) => {
                info!("renamed {} -> {}", old.display(), new_path.display());
                for p in self.highlighted.iter_mut().filter(|p| **p == old) {
                    *p = new_path.clone();
                }
                self.info(format!("Renamed to {}", display_name_for(&new_path)));
            }
            Err(e) => {
                warn!("{e}");
                self.error(format!("Error renaming file: {e}"));
            }
        }
    }

    /// Highlight entries whose names contain `term`, and jump to the first.
    pub fn search(&mut self, term: &str) {
        match self.catalog.search(term) {
            Ok(matches) => {
                let term = term.trim().to_string();
                if let Some(first) = matches.first() {
                    let first = first.clone();
                    self.select_path(&first);
                }
                let n = matches.len();
                self.highlighted = matches;
                self.last_search = Some(term.clone());
                let noun = if n == 1 { "match" } else { "matches" };
                self.info(format!("{n} {noun} for \"{term}\""));
            }
            Err(InvalidQuery) => {
                self.highlighted.clear();
                self.error("Please enter a valid search term.");
            }
        }
    }

    pub fn clear_highlights(&mut self) {
        self.highlighted.clear();
    }

    /// Peel one layer off the screen: highlights first, then the status
    /// message. Returns true when neither was showing, meaning the open
    /// player should close.
    pub fn escape(&mut self) -> bool {
        if !self.highlighted.is_empty() {
            self.clear_highlights();
            false
        } else if self.message.is_some() {
            self.clear_message();
            false
        } else {
            self.player_open()
        }
    }

    /// Ask for confirmation before deleting the selected entry.
    pub fn request_delete(&mut self) {
        if self.selected_entry().is_some() {
            self.prompt = None;
            self.confirm_delete = true;
        }
    }

    /// Answer the delete confirmation; only `yes` removes the entry.
    pub fn confirm_delete(&mut self, yes: bool) {
        if !std::mem::take(&mut self.confirm_delete) || !yes {
            return;
        }
        let Some(path) = self.selected_entry().map(|e| e.path.clone()) else {
            return;
        };

        match self.catalog.delete(&path) {
            DeleteOutcome::Removed => {
                info!("removed {}", path.display());
                self.highlighted.retain(|p| p != &path);
                self.clamp_selection();
                self.info(format!("Removed {}", display_name_for(&path)));
            }
            DeleteOutcome::NotFound => self.warn(format!("{} is not in the catalog", path.display())),
        }
    }
}

/// Turn typed text into an absolute path: trims, expands a leading `~/`.
pub fn resolve_input_path(input: &str) -> PathBuf {
    let input = input.trim();
    let expanded = match input.strip_prefix("~/") {
        Some(rest) => match env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(rest),
            None => PathBuf::from(input),
        },
        None => PathBuf::from(input),
    };
    std::path::absolute(&expanded).unwrap_or(expanded)
}
