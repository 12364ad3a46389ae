use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, PromptKind};
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::update_mpris;
use crate::runtime::player::PlayerSlot;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    pub player: PlayerSlot,
}

/// Main terminal event loop: handles input, UI drawing, engine notifications
/// and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        state.player.sync(app, mpris);

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.player))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if cmd == ControlCmd::Quit {
                state.player.close(app);
                return Ok(());
            }
            state.player.control(&cmd, app);
            update_mpris(mpris, app);
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, mpris, state) {
                    state.player.close(app);
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Returns true when the user asked to quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    mpris: &MprisHandle,
    state: &mut EventLoopState,
) -> bool {
    if app.confirm_delete {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.confirm_delete(false),
            _ => {}
        }
        return false;
    }

    if app.prompt.is_some() {
        match key.code {
            KeyCode::Esc => app.cancel_prompt(),
            KeyCode::Enter => app.submit_prompt(),
            KeyCode::Backspace => app.pop_prompt_char(),
            KeyCode::Char(c) if !c.is_control() => app.push_prompt_char(c),
            _ => {}
        }
        return false;
    }

    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    let seek_ms = i64::try_from(settings.player.seek_ms).unwrap_or(i64::MAX);
    let player_cmd = match key.code {
        KeyCode::Char('p') => Some(ControlCmd::Play),
        KeyCode::Char(' ') => Some(ControlCmd::PlayPause),
        KeyCode::Char('L') | KeyCode::Right => Some(ControlCmd::SeekBy(seek_ms)),
        KeyCode::Char('H') | KeyCode::Left => Some(ControlCmd::SeekBy(-seek_ms)),
        KeyCode::Char('x') => Some(ControlCmd::Stop),
        _ => None,
    };
    if let Some(cmd) = player_cmd {
        if state.player.is_open() {
            state.player.control(&cmd, app);
            update_mpris(mpris, app);
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('a') => app.begin_prompt(PromptKind::AddFile),
        KeyCode::Char('A') => app.begin_prompt(PromptKind::AddFolder),
        KeyCode::Char('r') => app.begin_prompt(PromptKind::Rename),
        KeyCode::Char('/') => app.begin_prompt(PromptKind::Search),
        KeyCode::Char('d') => app.request_delete(),
        KeyCode::Esc => {
            if app.escape() {
                state.player.close(app);
                update_mpris(mpris, app);
            }
        }
        KeyCode::Enter => {
            if let Some(path) = app.selected_entry().map(|e| e.path.clone()) {
                state.player.open(&path, app, &settings.player);
                update_mpris(mpris, app);
            }
        }
        _ => {}
    }

    false
}
